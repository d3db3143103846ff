//! SQLite-backed history of scored behavior windows. The raw feature window
//! (keystroke/mouse telemetry) is AES-GCM encrypted at rest; scores and
//! ordering columns stay plaintext so baseline and alert queries can run in
//! SQL. Key derived from a caller-supplied secret (in production:
//! Secure Enclave / Keystore / DPAPI).
//!
//! Records are append-only; retention/pruning belongs to the host.

use crate::error::EngineError;
use crate::features::FeatureWindow;
use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use rand::RngCore;
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Mutex;

const NONCE_LEN: usize = 12;
const KEY_LEN: usize = 32;

fn derive_key(seed: &[u8]) -> [u8; KEY_LEN] {
    use ring::digest;
    let mut out = [0u8; KEY_LEN];
    let h = digest::digest(&digest::SHA256, seed);
    out[..h.as_ref().len().min(KEY_LEN)].copy_from_slice(h.as_ref());
    out
}

fn encrypt(key: &[u8; KEY_LEN], plaintext: &[u8]) -> Result<String, EngineError> {
    let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| EngineError::Encrypt)?;
    let mut nonce = [0u8; NONCE_LEN];
    rand::thread_rng().fill_bytes(&mut nonce);
    let ciphertext = cipher
        .encrypt((&nonce).into(), plaintext)
        .map_err(|_| EngineError::Encrypt)?;
    let mut out = nonce.to_vec();
    out.extend(ciphertext);
    Ok(BASE64.encode(&out))
}

fn decrypt(key: &[u8; KEY_LEN], encoded: &str) -> Result<Vec<u8>, EngineError> {
    let raw = BASE64
        .decode(encoded)
        .map_err(|e| EngineError::Decrypt(e.to_string()))?;
    if raw.len() < NONCE_LEN {
        return Err(EngineError::Decrypt("payload too short".to_string()));
    }
    let (nonce, ct) = raw.split_at(NONCE_LEN);
    let cipher = Aes256Gcm::new_from_slice(key)
        .map_err(|e| EngineError::Decrypt(format!("{:?}", e)))?;
    cipher
        .decrypt(nonce.into(), ct)
        .map_err(|e| EngineError::Decrypt(format!("{:?}", e)))
}

/// One persisted scoring result: the original window verbatim plus the
/// fused, rule, and combined ML scores.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredRecord {
    pub id: String,
    pub session_id: String,
    /// Ingest time, epoch millis.
    pub ts: i64,
    /// Caller-supplied window timestamp, stored verbatim.
    pub timestamp: String,
    pub window: FeatureWindow,
    pub fatigue_score: f64,
    pub rule_score: f64,
    pub ml_score: f64,
}

pub struct HistoryStore {
    conn: Mutex<Connection>,
    key: [u8; KEY_LEN],
}

impl HistoryStore {
    /// Open or create the DB at path. Key is derived from `secret`.
    pub fn open(path: &Path, secret: &[u8]) -> Result<Self, EngineError> {
        let conn = Connection::open(path)?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS behavior_windows (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                id TEXT UNIQUE NOT NULL,
                session_id TEXT NOT NULL,
                ts INTEGER NOT NULL,
                timestamp TEXT NOT NULL,
                window_enc TEXT NOT NULL,
                fatigue_score REAL NOT NULL,
                rule_score REAL NOT NULL,
                ml_score REAL NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_windows_session ON behavior_windows(session_id, seq);
            "#,
        )?;
        let key = derive_key(secret);
        Ok(Self {
            conn: Mutex::new(conn),
            key,
        })
    }

    /// Append one scored record (window payload stored encrypted).
    pub fn append(&self, record: &ScoredRecord) -> Result<(), EngineError> {
        let payload = serde_json::to_string(&record.window)?;
        let enc = encrypt(&self.key, payload.as_bytes())?;
        self.conn.lock().expect("lock").execute(
            "INSERT INTO behavior_windows
             (id, session_id, ts, timestamp, window_enc, fatigue_score, rule_score, ml_score)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                record.id,
                record.session_id,
                record.ts,
                record.timestamp,
                enc,
                record.fatigue_score,
                record.rule_score,
                record.ml_score
            ],
        )?;
        Ok(())
    }

    /// Read one record by id (decrypts the window payload).
    pub fn get_record(&self, id: &str) -> Result<Option<ScoredRecord>, EngineError> {
        let conn = self.conn.lock().expect("lock");
        let mut stmt = conn.prepare(
            "SELECT session_id, ts, timestamp, window_enc, fatigue_score, rule_score, ml_score
             FROM behavior_windows WHERE id = ?1",
        )?;
        let mut rows = stmt.query(params![id])?;
        if let Some(row) = rows.next()? {
            let enc: String = row.get(3)?;
            let plain = decrypt(&self.key, &enc)?;
            let window: FeatureWindow = serde_json::from_slice(&plain)?;
            return Ok(Some(ScoredRecord {
                id: id.to_string(),
                session_id: row.get(0)?,
                ts: row.get(1)?,
                timestamp: row.get(2)?,
                window,
                fatigue_score: row.get(4)?,
                rule_score: row.get(5)?,
                ml_score: row.get(6)?,
            }));
        }
        Ok(None)
    }

    /// All stored feature windows in insertion order (baseline input).
    pub fn all_windows(&self) -> Result<Vec<FeatureWindow>, EngineError> {
        let conn = self.conn.lock().expect("lock");
        let mut stmt =
            conn.prepare("SELECT window_enc FROM behavior_windows ORDER BY seq ASC")?;
        let encoded: Vec<String> = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<_, _>>()?;
        drop(stmt);
        drop(conn);

        let mut windows = Vec::with_capacity(encoded.len());
        for enc in encoded {
            let plain = decrypt(&self.key, &enc)?;
            windows.push(serde_json::from_slice(&plain)?);
        }
        Ok(windows)
    }

    /// Number of stored windows.
    pub fn window_count(&self) -> Result<usize, EngineError> {
        let conn = self.conn.lock().expect("lock");
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM behavior_windows", [], |row| {
            row.get(0)
        })?;
        Ok(n as usize)
    }

    /// The session's most recent fused fatigue scores, newest first
    /// (sustained-alert input).
    pub fn recent_scores(&self, session_id: &str, limit: usize) -> Result<Vec<f64>, EngineError> {
        let conn = self.conn.lock().expect("lock");
        let mut stmt = conn.prepare(
            "SELECT fatigue_score FROM behavior_windows
             WHERE session_id = ?1 ORDER BY seq DESC LIMIT ?2",
        )?;
        let scores = stmt
            .query_map(params![session_id, limit as i64], |row| row.get(0))?
            .collect::<Result<_, _>>()?;
        Ok(scores)
    }

    /// Most recent (timestamp, fatigue score) pairs across sessions, newest
    /// first (dashboard feed).
    pub fn recent_points(&self, limit: usize) -> Result<Vec<(String, f64)>, EngineError> {
        let conn = self.conn.lock().expect("lock");
        let mut stmt = conn.prepare(
            "SELECT timestamp, fatigue_score FROM behavior_windows
             ORDER BY seq DESC LIMIT ?1",
        )?;
        let points = stmt
            .query_map(params![limit as i64], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })?
            .collect::<Result<_, _>>()?;
        Ok(points)
    }
}

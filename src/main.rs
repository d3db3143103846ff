//! Fatigue engine entrypoint: reads ndjson score requests from stdin and
//! writes one ndjson response per request to stdout. The HTTP layer (if any)
//! lives in the host; this surface is transport-neutral.

use fatigue_engine::{
    config::EngineConfig, engine::FatigueEngine, features::FeatureWindow,
    features::FEATURE_DIM, logging::StructuredLogger, model::ModelBundle,
    storage::HistoryStore,
};
use serde::{Deserialize, Serialize};
use std::io::{BufRead, Write};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Deserialize)]
struct ScoreRequest {
    #[serde(default = "default_session")]
    session_id: String,
    #[serde(flatten)]
    window: FeatureWindow,
}

fn default_session() -> String {
    "default".to_string()
}

#[derive(Serialize)]
struct ScoreResponse {
    status: &'static str,
    final_score: f64,
    rule_score: f64,
    ml_score: f64,
    alert: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config_path = std::env::var("FATIGUE_CONFIG_PATH")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| std::path::PathBuf::from("config.json"));
    let config = EngineConfig::load(&config_path);

    StructuredLogger::init(config.log.json, &config.log.level);

    info!(data_dir = ?config.data_dir, "fatigue engine starting");

    std::fs::create_dir_all(&config.data_dir)?;
    let store_path = config.data_dir.join("history.db");
    let secret = b"device-secret-placeholder"; // In production: from Secure Enclave / Keystore
    let store = Arc::new(HistoryStore::open(&store_path, secret)?);

    let static_bundle = ModelBundle::load(&config.models.static_bundle, FEATURE_DIM)?;
    let temporal_bundle = ModelBundle::load(&config.models.temporal_bundle, FEATURE_DIM)?;
    let engine = FatigueEngine::new(config, store, static_bundle, temporal_bundle);

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let request: ScoreRequest = match serde_json::from_str(&line) {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "malformed score request");
                continue;
            }
        };
        match engine.score_window(&request.session_id, request.window) {
            Ok(outcome) => {
                let response = ScoreResponse {
                    status: "stored",
                    final_score: outcome.fatigue_score,
                    rule_score: outcome.rule_score,
                    ml_score: outcome.ml_score,
                    alert: outcome.alert,
                };
                serde_json::to_writer(&mut out, &response)?;
                writeln!(out)?;
            }
            Err(e) => {
                // Nothing was persisted for this window; skip it.
                warn!(session_id = %request.session_id, error = %e, "scoring failed");
            }
        }
    }

    info!("fatigue engine stopping");
    Ok(())
}

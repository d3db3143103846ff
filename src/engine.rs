//! Scoring orchestrator: one call takes a (session, feature window) pair
//! through baseline deviation, both anomaly scorers, fusion, persistence,
//! and the alert decision.

use crate::config::{AlertPolicy, EngineConfig};
use crate::error::EngineError;
use crate::features::{BaselineEstimator, FeatureBaseline, FeatureWindow};
use crate::model::ModelBundle;
use crate::scoring::{
    combined_ml_score, fuse, rule_score, AlertEngine, StaticScorer, TemporalScorer,
};
use crate::session::SessionRegistry;
use crate::storage::{HistoryStore, ScoredRecord};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Result of scoring one feature window.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreOutcome {
    pub record_id: String,
    pub fatigue_score: f64,
    pub rule_score: f64,
    pub ml_score: f64,
    pub alert: bool,
}

/// Baseline readiness report.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BaselineReport {
    Ready {
        windows: usize,
        baseline: FeatureBaseline,
    },
    NotReady {
        windows: usize,
        required: usize,
    },
}

pub struct FatigueEngine {
    config: EngineConfig,
    store: Arc<HistoryStore>,
    estimator: BaselineEstimator,
    static_scorer: StaticScorer,
    temporal_scorer: TemporalScorer,
    sessions: SessionRegistry,
    alerts: AlertEngine,
}

impl FatigueEngine {
    /// Wire the engine from config, an open store, and whatever model
    /// bundles could be loaded. Absent bundles disable their scorer.
    pub fn new(
        config: EngineConfig,
        store: Arc<HistoryStore>,
        static_bundle: Option<ModelBundle>,
        temporal_bundle: Option<ModelBundle>,
    ) -> Self {
        let sequence_len = config.models.sequence_len;
        Self {
            estimator: BaselineEstimator::new(config.baseline.min_windows),
            static_scorer: StaticScorer::new(static_bundle),
            temporal_scorer: TemporalScorer::new(temporal_bundle, sequence_len),
            sessions: SessionRegistry::new(sequence_len),
            alerts: AlertEngine::new(config.alert.clone()),
            store,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn store(&self) -> &HistoryStore {
        &self.store
    }

    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    /// Score one window for a session. Persists exactly one record on
    /// success; an inference failure aborts the call with nothing stored.
    pub fn score_window(
        &self,
        session_id: &str,
        window: FeatureWindow,
    ) -> Result<ScoreOutcome, EngineError> {
        let history = self.store.all_windows()?;
        let rule = match self.estimator.estimate(&history) {
            Some(baseline) => rule_score(&window, &baseline, &self.config.rule_weights),
            None => 0.0,
        };

        let static_score = self.static_scorer.score(&window)?;

        // One scoring call per session in flight at a time: the session lock
        // is held from the buffer mutation through persistence and the alert
        // read, so same-session calls serialize end to end while distinct
        // sessions proceed in parallel.
        let session = self.sessions.get_or_create(session_id);
        let mut state = session.lock().expect("lock");
        let temporal_score = self.temporal_scorer.score(&window, &mut state.buffer)?;

        let ml = combined_ml_score(static_score, temporal_score);
        let fatigue = fuse(rule, static_score, temporal_score, &self.config.fusion);

        let record = ScoredRecord {
            id: Uuid::new_v4().to_string(),
            session_id: session_id.to_string(),
            ts: Utc::now().timestamp_millis(),
            timestamp: window.timestamp.clone(),
            window,
            fatigue_score: fatigue,
            rule_score: rule,
            ml_score: ml,
        };
        self.store.append(&record)?;

        // The sustained predicate counts the record just written.
        let recent = if self.config.alert.policy == AlertPolicy::Sustained {
            self.store
                .recent_scores(session_id, self.config.alert.sustained_windows)?
        } else {
            Vec::new()
        };
        let alert = self.alerts.evaluate(fatigue, &recent);
        drop(state);

        info!(
            session_id,
            fatigue_score = fatigue,
            rule_score = rule,
            ml_score = ml,
            alert,
            "window scored"
        );

        Ok(ScoreOutcome {
            record_id: record.id,
            fatigue_score: fatigue,
            rule_score: rule,
            ml_score: ml,
            alert,
        })
    }

    /// Current baseline over the full stored history, or how far away it is.
    pub fn baseline(&self) -> Result<BaselineReport, EngineError> {
        let history = self.store.all_windows()?;
        let windows = history.len();
        Ok(match self.estimator.estimate(&history) {
            Some(baseline) => BaselineReport::Ready { windows, baseline },
            None => BaselineReport::NotReady {
                windows,
                required: self.estimator.min_windows(),
            },
        })
    }
}

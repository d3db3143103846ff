//! Fatigue Engine — session fatigue scoring from behavioral telemetry.
//!
//! Modular structure:
//! - [`features`] — Feature windows and historical baseline estimation
//! - [`model`] — Trained autoencoder bundles (ONNX inference)
//! - [`scoring`] — Rule-based, static, and temporal scorers; fusion & alerts
//! - [`session`] — Per-session temporal state registry
//! - [`storage`] — Encrypted append-only history store
//! - [`engine`] — Scoring orchestrator
//! - [`logging`] — Structured JSON logging

pub mod config;
pub mod engine;
pub mod error;
pub mod features;
pub mod logging;
pub mod model;
pub mod scoring;
pub mod session;
pub mod storage;

pub use config::EngineConfig;
pub use engine::{BaselineReport, FatigueEngine, ScoreOutcome};
pub use error::EngineError;
pub use features::{BaselineEstimator, FeatureBaseline, FeatureWindow, FEATURES, FEATURE_DIM};
pub use model::{ModelBundle, Reconstructor};
pub use scoring::{StaticScorer, TemporalBuffer, TemporalScorer};
pub use session::SessionRegistry;
pub use storage::{HistoryStore, ScoredRecord};

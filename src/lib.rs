//! # HealthAI
//!
//! Local-first chronic-disease dashboard.
//!
//! - Weighted risk scoring over blood sugar, blood pressure, medication
//!   adherence, lifestyle and family history
//! - A mood-adaptive coaching assistant driven by keyword matching
//! - Digital-twin projections, gamification and a hash-chained audit log
//! - Terminal UI for local-only use
//!
//! ## Layers
//!
//! - `domain`: plain data and pure rules (metrics, assessments, audit chain)
//! - `ports`: the persistence boundary
//! - `adapters`: SQLite storage and log sanitization
//! - `application`: scorer, responder, digital twin and the service tying them to storage
//! - `config`: replaceable scoring and coaching tables
//! - `tui`: ratatui front end

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod tui;

pub use application::{MoodAdaptiveResponder, RiskScorer};
pub use domain::{HealthMetrics, RiskAssessment, RiskLevel};

pub type Result<T> = std::result::Result<T, HealthAiError>;

/// Errors surfaced by the service layer.
#[derive(Debug, thiserror::Error)]
pub enum HealthAiError {
    /// Malformed metrics; the message lists every offending field
    #[error("Invalid health data: {0}")]
    Validation(String),

    #[error("Storage failure: {0}")]
    Storage(#[from] adapters::StorageError),

    #[error("Audit log integrity check failed: {0}")]
    Integrity(#[from] domain::ChainError),

    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

//! Application layer: Use cases and services.
//!
//! The scorer, responder and digital twin are pure; `DashboardService`
//! wires them to storage and the audit chain.

mod coach;
mod risk;
mod service;
mod simulation;

pub use coach::{HealthContext, MoodAdaptiveResponder};
pub use risk::{RiskScorer, DEFAULT_TIME_HORIZON_DAYS};
pub use service::{ActionOutcome, DashboardService};
pub use simulation::DigitalTwin;

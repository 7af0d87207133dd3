//! Domain layer: Core types and pure rules.
//!
//! Nothing in here performs I/O. Types are serializable so the storage
//! adapter and the data export can persist them as-is.

pub mod audit;
mod assessment;
mod coaching;
pub mod gamification;
mod metrics;
mod profile;
mod simulation;

pub use assessment::{AlertKind, AlertSeverity, RiskAlert, RiskAssessment, RiskFactor, RiskFactors, RiskLevel};
pub use audit::{AuditAction, AuditEntry, ChainError};
pub use coaching::{ChatTurn, CoachReply, MessageCategory, Mood, MoodProfile, Tone, Urgency};
pub use gamification::{GamificationEvent, GamificationState, HealthAction};
pub use metrics::{BloodPressureReading, FamilyHistory, GeneticProfile, HealthMetrics, LifestyleData, MedicationDose};
pub use profile::{UserProfile, UserRole};
pub use simulation::{
    DietParams, ExerciseParams, Intensity, MedicationParams, Projection, SimulationKind, SimulationOutcome,
    SimulationParams,
};

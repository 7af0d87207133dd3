//! Storage port: Trait for local persistence.
//!
//! Abstracts the storage backend (SQLite) from the dashboard use cases.
//! Everything lives on the local device; there is a single profile per store.

use crate::domain::{AuditEntry, ChatTurn, GamificationState, RiskAssessment, UserProfile};

/// A stored risk assessment with the time it was computed.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentSnapshot {
    pub assessed_at: chrono::DateTime<chrono::Utc>,
    pub assessment: RiskAssessment,
}

/// Trait for local storage operations.
pub trait Storage: Send + Sync {
    /// Error type for storage operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Insert or replace the profile.
    ///
    /// # Errors
    /// Returns error if storage operation fails.
    fn save_profile(&self, profile: &UserProfile) -> Result<(), Self::Error>;

    /// Load the profile.
    ///
    /// # Returns
    /// `None` if no profile has been created yet.
    ///
    /// # Errors
    /// Returns error if storage operation fails.
    fn load_profile(&self) -> Result<Option<UserProfile>, Self::Error>;

    /// Record an assessment snapshot.
    ///
    /// # Errors
    /// Returns error if storage operation fails.
    fn save_assessment(&self, snapshot: &AssessmentSnapshot) -> Result<(), Self::Error>;

    /// Load up to `limit` snapshots, newest first.
    ///
    /// # Errors
    /// Returns error if storage operation fails.
    fn load_recent_assessments(&self, limit: usize) -> Result<Vec<AssessmentSnapshot>, Self::Error>;

    /// Append one chat exchange.
    ///
    /// # Errors
    /// Returns error if storage operation fails.
    fn append_chat_turn(&self, turn: &ChatTurn) -> Result<(), Self::Error>;

    /// Load the last `limit` chat turns in chronological order.
    ///
    /// # Errors
    /// Returns error if storage operation fails.
    fn load_recent_chat_turns(&self, limit: usize) -> Result<Vec<ChatTurn>, Self::Error>;

    /// Insert or replace the gamification state.
    ///
    /// # Errors
    /// Returns error if storage operation fails.
    fn save_gamification(&self, state: &GamificationState) -> Result<(), Self::Error>;

    /// # Errors
    /// Returns error if storage operation fails.
    fn load_gamification(&self) -> Result<Option<GamificationState>, Self::Error>;

    /// Append an audit entry. Entries are never updated.
    ///
    /// # Errors
    /// Returns error if storage fails or the sequence number is already taken.
    fn append_audit_entry(&self, entry: &AuditEntry) -> Result<(), Self::Error>;

    /// Load the whole audit log in ascending sequence order.
    ///
    /// # Errors
    /// Returns error if storage operation fails.
    fn load_audit_entries(&self) -> Result<Vec<AuditEntry>, Self::Error>;

    /// Load the entry with the highest sequence number.
    ///
    /// # Errors
    /// Returns error if storage operation fails.
    fn last_audit_entry(&self) -> Result<Option<AuditEntry>, Self::Error>;

    /// Delete everything: profile, history, gamification and audit log.
    ///
    /// # Errors
    /// Returns error if storage operation fails.
    fn clear_all(&self) -> Result<(), Self::Error>;
}

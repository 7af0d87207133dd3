//! Append-only audit trail.
//!
//! Each entry commits to its predecessor through a SHA-256 digest, so any
//! edit, deletion or reordering of stored entries is detected by
//! [`verify_chain`]. This is tamper evidence for a local log only; there is
//! no signing and no replication.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// `prev_hash` of the first entry.
pub const GENESIS_HASH: &str = "0000000000000000000000000000000000000000000000000000000000000000";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    ProfileCreated,
    RiskAssessed,
    ChatMessage,
    SimulationRun,
    ActionLogged,
    DataExported,
}

impl AuditAction {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ProfileCreated => "PROFILE_CREATED",
            Self::RiskAssessed => "RISK_ASSESSED",
            Self::ChatMessage => "CHAT_MESSAGE",
            Self::SimulationRun => "SIMULATION_RUN",
            Self::ActionLogged => "ACTION_LOGGED",
            Self::DataExported => "DATA_EXPORTED",
        }
    }

    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "PROFILE_CREATED" => Some(Self::ProfileCreated),
            "RISK_ASSESSED" => Some(Self::RiskAssessed),
            "CHAT_MESSAGE" => Some(Self::ChatMessage),
            "SIMULATION_RUN" => Some(Self::SimulationRun),
            "ACTION_LOGGED" => Some(Self::ActionLogged),
            "DATA_EXPORTED" => Some(Self::DataExported),
            _ => None,
        }
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    /// Position in the chain, starting at 0
    pub sequence: u64,
    pub action: AuditAction,
    /// User the event belongs to
    pub actor: String,
    /// Short JSON summary of the event
    pub payload: String,
    pub recorded_at: chrono::DateTime<chrono::Utc>,
    pub prev_hash: String,
    pub hash: String,
}

impl AuditEntry {
    /// Build the entry that follows `prev` (or the genesis entry).
    #[must_use]
    pub fn next(
        prev: Option<&AuditEntry>,
        action: AuditAction,
        actor: impl Into<String>,
        payload: impl Into<String>,
    ) -> Self {
        Self::next_at(prev, action, actor, payload, chrono::Utc::now())
    }

    #[must_use]
    pub fn next_at(
        prev: Option<&AuditEntry>,
        action: AuditAction,
        actor: impl Into<String>,
        payload: impl Into<String>,
        recorded_at: chrono::DateTime<chrono::Utc>,
    ) -> Self {
        let (sequence, prev_hash) = match prev {
            Some(p) => (p.sequence + 1, p.hash.clone()),
            None => (0, GENESIS_HASH.to_string()),
        };
        let mut entry = Self {
            sequence,
            action,
            actor: actor.into(),
            payload: payload.into(),
            recorded_at,
            prev_hash,
            hash: String::new(),
        };
        entry.hash = entry.compute_hash();
        entry
    }

    /// Digest over every field except `hash` itself.
    #[must_use]
    pub fn compute_hash(&self) -> String {
        let recorded_at = self.recorded_at.to_rfc3339();
        let mut hasher = Sha256::new();
        hasher.update(self.sequence.to_be_bytes());
        for part in [
            self.action.as_str(),
            self.actor.as_str(),
            self.payload.as_str(),
            recorded_at.as_str(),
            self.prev_hash.as_str(),
        ] {
            hasher.update((part.len() as u64).to_be_bytes());
            hasher.update(part.as_bytes());
        }
        hasher
            .finalize()
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect()
    }

    /// Short prefix of the hash for display.
    #[must_use]
    pub fn short_hash(&self) -> &str {
        let mut end = self.hash.len().min(12);
        while !self.hash.is_char_boundary(end) {
            end -= 1;
        }
        &self.hash[..end]
    }
}

/// Why a chain failed verification.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChainError {
    #[error("Entry {sequence} has been modified (hash mismatch)")]
    HashMismatch { sequence: u64 },

    #[error("Entry {sequence} does not link to its predecessor")]
    BrokenLink { sequence: u64 },

    #[error("Expected sequence {expected}, found {found}")]
    SequenceGap { expected: u64, found: u64 },
}

/// Verify entries in ascending sequence order.
///
/// # Errors
/// Returns the first inconsistency found.
pub fn verify_chain(entries: &[AuditEntry]) -> Result<(), ChainError> {
    let mut expected_prev: &str = GENESIS_HASH;
    for (i, entry) in entries.iter().enumerate() {
        let expected_seq = i as u64;
        if entry.sequence != expected_seq {
            return Err(ChainError::SequenceGap {
                expected: expected_seq,
                found: entry.sequence,
            });
        }
        if entry.prev_hash != expected_prev {
            return Err(ChainError::BrokenLink {
                sequence: entry.sequence,
            });
        }
        if entry.compute_hash() != entry.hash {
            return Err(ChainError::HashMismatch {
                sequence: entry.sequence,
            });
        }
        expected_prev = entry.hash.as_str();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(n: usize) -> Vec<AuditEntry> {
        let mut entries: Vec<AuditEntry> = Vec::new();
        for i in 0..n {
            let entry = AuditEntry::next(
                entries.last(),
                AuditAction::ActionLogged,
                "local_user_1",
                format!("{{\"n\":{i}}}"),
            );
            entries.push(entry);
        }
        entries
    }

    #[test]
    fn test_genesis_entry() {
        let entries = chain(1);
        assert_eq!(entries[0].sequence, 0);
        assert_eq!(entries[0].prev_hash, GENESIS_HASH);
        assert_eq!(entries[0].hash.len(), 64);
    }

    #[test]
    fn test_valid_chain_verifies() {
        let entries = chain(5);
        assert!(verify_chain(&entries).is_ok());
        assert_eq!(entries[3].prev_hash, entries[2].hash);
    }

    #[test]
    fn test_tampered_payload_detected() {
        let mut entries = chain(4);
        entries[2].payload = "{\"n\":99}".to_string();
        assert_eq!(
            verify_chain(&entries),
            Err(ChainError::HashMismatch { sequence: 2 })
        );
    }

    #[test]
    fn test_deleted_entry_detected() {
        let mut entries = chain(4);
        entries.remove(1);
        assert_eq!(
            verify_chain(&entries),
            Err(ChainError::SequenceGap {
                expected: 1,
                found: 2
            })
        );
    }

    #[test]
    fn test_rehashed_entry_breaks_link() {
        let mut entries = chain(3);
        entries[1].payload = "{}".to_string();
        entries[1].hash = entries[1].compute_hash();
        assert_eq!(
            verify_chain(&entries),
            Err(ChainError::BrokenLink { sequence: 2 })
        );
    }

    #[test]
    fn test_short_hash_respects_char_boundaries() {
        let mut entry = chain(1).remove(0);
        assert_eq!(entry.short_hash(), &entry.hash[..12]);

        entry.hash = "a\u{e9}\u{e9}\u{e9}\u{e9}\u{e9}\u{e9}\u{e9}\u{e9}\u{e9}\u{e9}\u{e9}\u{e9}".to_string();
        assert_eq!(entry.short_hash(), "a\u{e9}\u{e9}\u{e9}\u{e9}\u{e9}");

        entry.hash = "abc".to_string();
        assert_eq!(entry.short_hash(), "abc");
        assert_eq!(verify_chain(&[entry]), Err(ChainError::HashMismatch { sequence: 0 }));
    }

    #[test]
    fn test_empty_chain_verifies() {
        assert!(verify_chain(&[]).is_ok());
    }
}

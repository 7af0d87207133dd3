//! Local user profile.

use serde::{Deserialize, Serialize};

use super::HealthMetrics;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Patient,
    Provider,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Patient => write!(f, "patient"),
            Self::Provider => write!(f, "provider"),
        }
    }
}

/// The single profile stored on this device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Random identifier (local only, never transmitted)
    pub id: String,
    pub display_name: String,
    pub role: UserRole,
    pub metrics: HealthMetrics,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl UserProfile {
    /// Create a profile with a fresh identifier.
    #[must_use]
    pub fn new(display_name: impl Into<String>, role: UserRole, metrics: HealthMetrics) -> Self {
        Self {
            id: uuid_v4(),
            display_name: display_name.into(),
            role,
            metrics,
            created_at: chrono::Utc::now(),
        }
    }

    /// Profile seeded the way new accounts are.
    ///
    /// Family history of diabetes and hypertension is only seeded for patients.
    #[must_use]
    pub fn sample(display_name: impl Into<String>, role: UserRole) -> Self {
        let mut metrics = HealthMetrics::sample_patient();
        if role == UserRole::Provider {
            if let Some(genetics) = metrics.genetic_profile.as_mut() {
                genetics.family_history.diabetes = false;
                genetics.family_history.hypertension = false;
            }
        }
        Self::new(display_name, role, metrics)
    }
}

/// Generate a random UUID v4 string from a ChaCha20 stream seeded by the OS.
fn uuid_v4() -> String {
    use rand::Rng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    let mut rng = ChaCha20Rng::from_entropy();
    let bytes: [u8; 16] = rng.gen();

    format!(
        "{:02x}{:02x}{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}{:02x}{:02x}{:02x}{:02x}",
        bytes[0], bytes[1], bytes[2], bytes[3],
        bytes[4], bytes[5],
        (bytes[6] & 0x0f) | 0x40, bytes[7],
        (bytes[8] & 0x3f) | 0x80, bytes[9],
        bytes[10], bytes[11], bytes[12], bytes[13], bytes[14], bytes[15]
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_ids_are_unique() {
        let a = UserProfile::sample("ana", UserRole::Patient);
        let b = UserProfile::sample("ana", UserRole::Patient);
        assert_ne!(a.id, b.id);
        assert_eq!(a.id.len(), 36);
    }

    #[test]
    fn test_provider_sample_has_no_family_history() {
        let profile = UserProfile::sample("dr", UserRole::Provider);
        let genetics = profile.metrics.genetic_profile.expect("Should have genetics");
        assert!(!genetics.family_history.diabetes);
        assert!(!genetics.family_history.hypertension);
    }
}

//! Risk assessment result types.
//!
//! Represents the output of the weighted risk scorer.

use serde::{Deserialize, Serialize};

/// Display band for a 0-100 risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    /// Score of 50 or below
    Low,
    /// Score above 50, up to 70
    Moderate,
    /// Score above 70
    High,
}

impl RiskLevel {
    /// Band a score. Comparisons are strict.
    #[must_use]
    pub fn from_score(score: u8) -> Self {
        if score > 70 {
            Self::High
        } else if score > 50 {
            Self::Moderate
        } else {
            Self::Low
        }
    }

    /// Get a human-readable description.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Low => "Low risk - keep up the current routine",
            Self::Moderate => "Moderate risk - small adjustments recommended",
            Self::High => "High risk - review your plan with your care team",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "LOW"),
            Self::Moderate => write!(f, "MODERATE"),
            Self::High => write!(f, "HIGH"),
        }
    }
}

/// The five scored factors, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RiskFactor {
    BloodSugar,
    BloodPressure,
    MedicationAdherence,
    Lifestyle,
    Genetics,
}

impl RiskFactor {
    pub const ALL: [RiskFactor; 5] = [
        Self::BloodSugar,
        Self::BloodPressure,
        Self::MedicationAdherence,
        Self::Lifestyle,
        Self::Genetics,
    ];

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::BloodSugar => "Blood Sugar",
            Self::BloodPressure => "Blood Pressure",
            Self::MedicationAdherence => "Medication Adherence",
            Self::Lifestyle => "Lifestyle",
            Self::Genetics => "Genetics",
        }
    }
}

/// Per-factor sub-scores, each in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskFactors {
    pub blood_sugar: u8,
    pub blood_pressure: u8,
    pub medication_adherence: u8,
    pub lifestyle: u8,
    pub genetics: u8,
}

impl RiskFactors {
    #[must_use]
    pub fn get(&self, factor: RiskFactor) -> u8 {
        match factor {
            RiskFactor::BloodSugar => self.blood_sugar,
            RiskFactor::BloodPressure => self.blood_pressure,
            RiskFactor::MedicationAdherence => self.medication_adherence,
            RiskFactor::Lifestyle => self.lifestyle,
            RiskFactor::Genetics => self.genetics,
        }
    }

    /// Iterate factors with their scores in evaluation order.
    pub fn iter(&self) -> impl Iterator<Item = (RiskFactor, u8)> + '_ {
        RiskFactor::ALL.iter().map(move |f| (*f, self.get(*f)))
    }
}

/// What triggered an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AlertKind {
    OverallRisk,
    BloodSugar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Moderate,
    High,
}

impl std::fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Moderate => write!(f, "MODERATE"),
            Self::High => write!(f, "HIGH"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAlert {
    pub kind: AlertKind,
    pub severity: AlertSeverity,
    pub message: String,
}

/// Complete risk assessment. Built fresh on every call; carries no identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
    /// Weighted composite score in [0, 100]
    pub overall_risk: u8,

    pub risk_factors: RiskFactors,

    /// Horizon the caller asked about, in days
    pub time_horizon_days: u32,

    /// Advice in factor evaluation order
    pub recommendations: Vec<String>,

    pub alerts: Vec<RiskAlert>,
}

impl RiskAssessment {
    #[must_use]
    pub fn risk_level(&self) -> RiskLevel {
        RiskLevel::from_score(self.overall_risk)
    }

    /// Highest alert severity raised, if any.
    #[must_use]
    pub fn max_severity(&self) -> Option<AlertSeverity> {
        self.alerts.iter().map(|a| a.severity).max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_level_bands_are_strict() {
        assert_eq!(RiskLevel::from_score(50), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(51), RiskLevel::Moderate);
        assert_eq!(RiskLevel::from_score(70), RiskLevel::Moderate);
        assert_eq!(RiskLevel::from_score(71), RiskLevel::High);
    }

    #[test]
    fn test_factor_iteration_order() {
        let factors = RiskFactors {
            blood_sugar: 1,
            blood_pressure: 2,
            medication_adherence: 3,
            lifestyle: 4,
            genetics: 5,
        };
        let scores: Vec<u8> = factors.iter().map(|(_, s)| s).collect();
        assert_eq!(scores, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_max_severity() {
        let assessment = RiskAssessment {
            overall_risk: 85,
            risk_factors: RiskFactors {
                blood_sugar: 85,
                blood_pressure: 50,
                medication_adherence: 50,
                lifestyle: 50,
                genetics: 50,
            },
            time_horizon_days: 90,
            recommendations: vec![],
            alerts: vec![
                RiskAlert {
                    kind: AlertKind::OverallRisk,
                    severity: AlertSeverity::Moderate,
                    message: "a".to_string(),
                },
                RiskAlert {
                    kind: AlertKind::BloodSugar,
                    severity: AlertSeverity::High,
                    message: "b".to_string(),
                },
            ],
        };
        assert_eq!(assessment.max_severity(), Some(AlertSeverity::High));
        assert_eq!(assessment.risk_level(), RiskLevel::High);
    }
}

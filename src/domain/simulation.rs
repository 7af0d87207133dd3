//! Digital-twin simulation inputs and projections.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimulationKind {
    Diet,
    Exercise,
    Medication,
}

impl SimulationKind {
    pub const ALL: [SimulationKind; 3] = [Self::Diet, Self::Exercise, Self::Medication];

    #[must_use]
    pub fn title(&self) -> &'static str {
        match self {
            Self::Diet => "Diet Change",
            Self::Exercise => "Exercise Change",
            Self::Medication => "Medication Change",
        }
    }
}

impl std::fmt::Display for SimulationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Diet => write!(f, "diet"),
            Self::Exercise => write!(f, "exercise"),
            Self::Medication => write!(f, "medication"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intensity {
    Low,
    #[default]
    Moderate,
    High,
}

/// Diet adjustments in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DietParams {
    pub carb_reduction: f64,
    pub protein_increase: f64,
    pub fat_adjustment: f64,
}

impl Default for DietParams {
    fn default() -> Self {
        Self {
            carb_reduction: 20.0,
            protein_increase: 10.0,
            fat_adjustment: 0.0,
        }
    }
}

/// Daily exercise plan in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseParams {
    pub cardio_minutes: f64,
    pub strength_training: f64,
    pub intensity: Intensity,
}

impl Default for ExerciseParams {
    fn default() -> Self {
        Self {
            cardio_minutes: 30.0,
            strength_training: 15.0,
            intensity: Intensity::Moderate,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicationParams {
    pub dosage_change: f64,
    pub timing_adjustment: f64,
    pub new_medication: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "params", rename_all = "lowercase")]
pub enum SimulationParams {
    Diet(DietParams),
    Exercise(ExerciseParams),
    Medication(MedicationParams),
}

impl SimulationParams {
    /// Default parameters for a simulation kind.
    #[must_use]
    pub fn defaults(kind: SimulationKind) -> Self {
        match kind {
            SimulationKind::Diet => Self::Diet(DietParams::default()),
            SimulationKind::Exercise => Self::Exercise(ExerciseParams::default()),
            SimulationKind::Medication => Self::Medication(MedicationParams::default()),
        }
    }

    #[must_use]
    pub fn kind(&self) -> SimulationKind {
        match self {
            Self::Diet(_) => SimulationKind::Diet,
            Self::Exercise(_) => SimulationKind::Exercise,
            Self::Medication(_) => SimulationKind::Medication,
        }
    }
}

/// Projected effect of a change, per kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Projection {
    #[serde(rename_all = "camelCase")]
    Diet {
        /// mg/dL
        blood_sugar_impact: f64,
        /// kg
        weight_impact: f64,
        energy_level: f64,
        risk_reduction: f64,
    },
    #[serde(rename_all = "camelCase")]
    Exercise {
        cardiovascular_improvement: f64,
        /// mmHg
        blood_pressure_reduction: f64,
        /// kg
        weight_loss: f64,
        mood_improvement: f64,
    },
    #[serde(rename_all = "camelCase")]
    Medication {
        effectiveness: f64,
        side_effects: f64,
        adherence: f64,
        cost_impact: f64,
    },
}

impl Projection {
    /// Headline number shown for the projection.
    #[must_use]
    pub fn impact_score(&self) -> f64 {
        match self {
            Self::Diet { risk_reduction, .. } => *risk_reduction,
            Self::Exercise {
                cardiovascular_improvement,
                ..
            } => *cardiovascular_improvement,
            Self::Medication { effectiveness, .. } => *effectiveness,
        }
    }

    /// Labelled values for display.
    #[must_use]
    pub fn metrics(&self) -> Vec<(&'static str, f64)> {
        match *self {
            Self::Diet {
                blood_sugar_impact,
                weight_impact,
                energy_level,
                risk_reduction,
            } => vec![
                ("Blood sugar (mg/dL)", blood_sugar_impact),
                ("Weight (kg)", weight_impact),
                ("Energy level", energy_level),
                ("Risk reduction", risk_reduction),
            ],
            Self::Exercise {
                cardiovascular_improvement,
                blood_pressure_reduction,
                weight_loss,
                mood_improvement,
            } => vec![
                ("Cardiovascular", cardiovascular_improvement),
                ("Blood pressure (mmHg)", blood_pressure_reduction),
                ("Weight (kg)", weight_loss),
                ("Mood", mood_improvement),
            ],
            Self::Medication {
                effectiveness,
                side_effects,
                adherence,
                cost_impact,
            } => vec![
                ("Effectiveness", effectiveness),
                ("Side effects", side_effects),
                ("Adherence", adherence),
                ("Cost impact", cost_impact),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationOutcome {
    pub kind: SimulationKind,
    pub params: SimulationParams,
    pub projection: Projection,
    pub timeline: String,
    /// Percent
    pub confidence: u8,
    pub recommendations: Vec<String>,
}

impl SimulationOutcome {
    #[must_use]
    pub fn impact_score(&self) -> f64 {
        self.projection.impact_score()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params_match_kind() {
        for kind in SimulationKind::ALL {
            assert_eq!(SimulationParams::defaults(kind).kind(), kind);
        }
    }

    #[test]
    fn test_impact_score_per_kind() {
        let p = Projection::Medication {
            effectiveness: 75.0,
            side_effects: 10.0,
            adherence: 85.0,
            cost_impact: 0.0,
        };
        assert!((p.impact_score() - 75.0).abs() < f64::EPSILON);
        assert_eq!(p.metrics().len(), 4);
    }
}

//! Health metric inputs for risk scoring.
//!
//! The shapes mirror what the dashboard stores per user: blood sugar and blood
//! pressure histories, a per-dose medication log, lifestyle answers and family
//! history. Every collection may be short or absent; scoring treats that as
//! "insufficient data", never as an error.

use serde::{Deserialize, Serialize};

/// One blood pressure measurement in mmHg.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BloodPressureReading {
    pub systolic: f64,
    pub diastolic: f64,
}

impl BloodPressureReading {
    #[must_use]
    pub fn new(systolic: f64, diastolic: f64) -> Self {
        Self {
            systolic,
            diastolic,
        }
    }
}

/// One expected medication dose and whether it was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicationDose {
    pub taken: bool,
}

/// Self-reported lifestyle answers.
///
/// Missing answers add no penalty when scoring.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LifestyleData {
    /// Minutes of exercise per week
    #[serde(alias = "exercise")]
    pub exercise_minutes_per_week: Option<f64>,

    /// Hours of sleep per night
    #[serde(alias = "sleep")]
    pub sleep_hours_per_night: Option<f64>,

    /// Stress on a 1-10 scale
    #[serde(alias = "stress")]
    pub stress_level: Option<f64>,

    pub smoking: bool,

    /// Alcoholic drinks per day
    #[serde(alias = "alcohol")]
    pub alcohol_drinks_per_day: Option<f64>,
}

/// Conditions present in the immediate family.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FamilyHistory {
    pub diabetes: bool,
    pub heart_disease: bool,
    pub hypertension: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneticProfile {
    pub family_history: FamilyHistory,
}

/// Historical metrics for one user, oldest reading first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HealthMetrics {
    /// Blood sugar readings in mg/dL
    pub blood_sugar_history: Vec<f64>,

    pub blood_pressure_history: Vec<BloodPressureReading>,

    /// One record per expected dose
    pub medication_history: Vec<MedicationDose>,

    pub lifestyle_data: Option<LifestyleData>,

    pub genetic_profile: Option<GeneticProfile>,
}

impl HealthMetrics {
    /// Validate that every supplied value is a usable number.
    ///
    /// Short or missing histories are fine; malformed values are not.
    ///
    /// # Errors
    /// Returns every validation failure found.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        for (i, reading) in self.blood_sugar_history.iter().enumerate() {
            if !reading.is_finite() || *reading < 0.0 {
                errors.push(format!("Blood sugar reading #{i} is invalid: {reading}"));
            }
        }

        for (i, reading) in self.blood_pressure_history.iter().enumerate() {
            if !reading.systolic.is_finite() || reading.systolic < 0.0 {
                errors.push(format!(
                    "Systolic reading #{i} is invalid: {}",
                    reading.systolic
                ));
            }
            if !reading.diastolic.is_finite() || reading.diastolic < 0.0 {
                errors.push(format!(
                    "Diastolic reading #{i} is invalid: {}",
                    reading.diastolic
                ));
            }
        }

        if let Some(lifestyle) = &self.lifestyle_data {
            check_non_negative(
                &mut errors,
                "Exercise minutes per week",
                lifestyle.exercise_minutes_per_week,
            );
            check_non_negative(
                &mut errors,
                "Sleep hours per night",
                lifestyle.sleep_hours_per_night,
            );
            check_non_negative(
                &mut errors,
                "Alcohol drinks per day",
                lifestyle.alcohol_drinks_per_day,
            );
            if let Some(stress) = lifestyle.stress_level {
                if !(1.0..=10.0).contains(&stress) {
                    errors.push(format!("Stress level {stress} out of range [1, 10]"));
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Metrics seeded for a new patient account.
    ///
    /// Six blood sugar readings and three blood pressure readings, so both
    /// trend factors start at the neutral baseline until more data arrives.
    #[must_use]
    pub fn sample_patient() -> Self {
        Self {
            blood_sugar_history: vec![140.0, 135.0, 130.0, 125.0, 120.0, 125.0],
            blood_pressure_history: vec![
                BloodPressureReading::new(150.0, 90.0),
                BloodPressureReading::new(145.0, 85.0),
                BloodPressureReading::new(140.0, 80.0),
            ],
            medication_history: vec![MedicationDose { taken: true }; 30],
            lifestyle_data: Some(LifestyleData {
                exercise_minutes_per_week: Some(120.0),
                sleep_hours_per_night: Some(7.0),
                stress_level: Some(5.0),
                smoking: false,
                alcohol_drinks_per_day: Some(1.0),
            }),
            genetic_profile: Some(GeneticProfile {
                family_history: FamilyHistory {
                    diabetes: true,
                    heart_disease: false,
                    hypertension: true,
                },
            }),
        }
    }
}

fn check_non_negative(errors: &mut Vec<String>, label: &str, value: Option<f64>) {
    if let Some(v) = value {
        if !v.is_finite() || v < 0.0 {
            errors.push(format!("{label} is invalid: {v}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_patient_is_valid() {
        let metrics = HealthMetrics::sample_patient();
        assert!(metrics.validate().is_ok());
        assert_eq!(metrics.medication_history.len(), 30);
    }

    #[test]
    fn test_validation_reports_every_bad_field() {
        let metrics = HealthMetrics {
            blood_sugar_history: vec![120.0, f64::NAN],
            blood_pressure_history: vec![BloodPressureReading::new(f64::INFINITY, -1.0)],
            lifestyle_data: Some(LifestyleData {
                stress_level: Some(11.0),
                sleep_hours_per_night: Some(-2.0),
                ..Default::default()
            }),
            ..Default::default()
        };

        let errors = metrics.validate().expect_err("Should reject");
        assert_eq!(errors.len(), 5);
    }

    #[test]
    fn test_empty_metrics_are_valid() {
        assert!(HealthMetrics::default().validate().is_ok());
    }

    #[test]
    fn test_deserialize_dashboard_shape() {
        let json = r#"{
            "bloodSugarHistory": [140, 135],
            "bloodPressureHistory": [{"systolic": 150, "diastolic": 90}],
            "medicationHistory": [{"taken": true}, {"taken": false}],
            "lifestyleData": {"exercise": 120, "sleep": 7, "stress": 5, "smoking": false, "alcohol": 1},
            "geneticProfile": {"familyHistory": {"diabetes": true, "heartDisease": false, "hypertension": true}}
        }"#;

        let metrics: HealthMetrics = serde_json::from_str(json).expect("Should parse");
        assert_eq!(metrics.blood_sugar_history, vec![140.0, 135.0]);
        assert_eq!(metrics.medication_history.len(), 2);
        let lifestyle = metrics.lifestyle_data.expect("Should have lifestyle");
        assert_eq!(lifestyle.exercise_minutes_per_week, Some(120.0));
        let genetics = metrics.genetic_profile.expect("Should have genetics");
        assert!(genetics.family_history.hypertension);
    }

    #[test]
    fn test_deserialize_missing_fields() {
        let metrics: HealthMetrics = serde_json::from_str("{}").expect("Should parse");
        assert!(metrics.blood_sugar_history.is_empty());
        assert!(metrics.lifestyle_data.is_none());
        assert!(metrics.genetic_profile.is_none());
    }
}

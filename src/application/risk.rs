//! Weighted risk scoring over a user's health history.
//!
//! Five sub-scores start from a neutral baseline and collect bonuses when
//! thresholds are crossed. Short or missing histories keep the baseline; the
//! scorer never fails and never panics.

use crate::config::ScoringConfig;
use crate::domain::{
    AlertKind, AlertSeverity, FamilyHistory, HealthMetrics, LifestyleData, RiskAlert, RiskAssessment, RiskFactor,
    RiskFactors,
};

/// Horizon used when the caller does not pick one.
pub const DEFAULT_TIME_HORIZON_DAYS: u32 = 90;

/// Stateless risk scorer.
#[derive(Debug, Clone, Default)]
pub struct RiskScorer {
    config: ScoringConfig,
}

impl RiskScorer {
    #[must_use]
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Score `metrics` and derive recommendations and alerts.
    #[must_use]
    pub fn compute_risk(&self, metrics: &HealthMetrics, time_horizon_days: u32) -> RiskAssessment {
        let risk_factors = RiskFactors {
            blood_sugar: self.blood_sugar_risk(&metrics.blood_sugar_history),
            blood_pressure: self.blood_pressure_risk(metrics),
            medication_adherence: self.medication_risk(metrics),
            lifestyle: self.lifestyle_risk(metrics.lifestyle_data.as_ref()),
            genetics: self.genetic_risk(metrics.genetic_profile.map(|g| g.family_history)),
        };

        let weighted = self.weighted_sum(&risk_factors);

        RiskAssessment {
            overall_risk: to_score(weighted),
            risk_factors,
            time_horizon_days,
            recommendations: self.recommendations(&risk_factors),
            alerts: self.alerts(weighted, &risk_factors),
        }
    }

    /// Unrounded weighted sum. Alerts compare against this value.
    fn weighted_sum(&self, factors: &RiskFactors) -> f64 {
        factors
            .iter()
            .map(|(factor, score)| f64::from(score) * self.config.weights.get(factor))
            .sum()
    }

    fn blood_sugar_risk(&self, history: &[f64]) -> u8 {
        let rules = &self.config.blood_sugar;
        let Some(recent) = last_window(history, self.config.reading_window) else {
            return to_score(self.config.baseline);
        };

        let avg = mean(recent);
        let mut risk = self.config.baseline;
        if avg > rules.elevated_mean {
            risk += rules.elevated_bonus;
        }
        if avg > rules.high_mean {
            risk += rules.high_bonus;
        }
        if trend_slope(recent) > 0.0 {
            risk += rules.rising_trend_bonus;
        }

        to_score(risk)
    }

    fn blood_pressure_risk(&self, metrics: &HealthMetrics) -> u8 {
        let rules = &self.config.blood_pressure;
        let Some(recent) = last_window(&metrics.blood_pressure_history, self.config.reading_window) else {
            return to_score(self.config.baseline);
        };

        let n = recent.len() as f64;
        let systolic = recent.iter().map(|r| r.systolic).sum::<f64>() / n;
        let diastolic = recent.iter().map(|r| r.diastolic).sum::<f64>() / n;

        let mut risk = self.config.baseline;
        if systolic > rules.stage1_systolic || diastolic > rules.stage1_diastolic {
            risk += rules.stage1_bonus;
        }
        if systolic > rules.stage2_systolic || diastolic > rules.stage2_diastolic {
            risk += rules.stage2_bonus;
        }

        to_score(risk)
    }

    /// Non-adherence risk: share of missed doses in the window.
    fn medication_risk(&self, metrics: &HealthMetrics) -> u8 {
        let Some(recent) = last_window(&metrics.medication_history, self.config.dose_window) else {
            return to_score(self.config.baseline);
        };

        let taken = recent.iter().filter(|d| d.taken).count() as f64;
        let adherence = taken / recent.len() as f64;
        to_score((1.0 - adherence) * 100.0)
    }

    /// Unanswered lifestyle questions add nothing.
    fn lifestyle_risk(&self, lifestyle: Option<&LifestyleData>) -> u8 {
        let rules = &self.config.lifestyle;
        let mut risk = self.config.baseline;
        let Some(data) = lifestyle else {
            return to_score(risk);
        };

        if data.exercise_minutes_per_week.is_some_and(|m| m < rules.min_exercise_minutes) {
            risk += rules.exercise_penalty;
        }
        if data.sleep_hours_per_night.is_some_and(|h| h < rules.min_sleep_hours) {
            risk += rules.sleep_penalty;
        }
        if data.stress_level.is_some_and(|s| s > rules.max_stress) {
            risk += rules.stress_penalty;
        }
        if data.smoking {
            risk += rules.smoking_penalty;
        }
        if data.alcohol_drinks_per_day.is_some_and(|a| a > rules.max_alcohol_drinks) {
            risk += rules.alcohol_penalty;
        }

        to_score(risk)
    }

    fn genetic_risk(&self, family: Option<FamilyHistory>) -> u8 {
        let rules = &self.config.genetics;
        let mut risk = self.config.baseline;
        let Some(history) = family else {
            return to_score(risk);
        };

        if history.diabetes {
            risk += rules.diabetes;
        }
        if history.heart_disease {
            risk += rules.heart_disease;
        }
        if history.hypertension {
            risk += rules.hypertension;
        }

        to_score(risk)
    }

    fn recommendations(&self, factors: &RiskFactors) -> Vec<String> {
        factors
            .iter()
            .filter(|(_, score)| *score > self.config.recommendation_threshold)
            .filter_map(|(factor, _)| self.config.recommendations.get(factor))
            .map(str::to_string)
            .collect()
    }

    fn alerts(&self, weighted: f64, factors: &RiskFactors) -> Vec<RiskAlert> {
        let rules = &self.config.alerts;
        let mut alerts = Vec::new();

        if weighted > rules.high_threshold {
            alerts.push(RiskAlert {
                kind: AlertKind::OverallRisk,
                severity: AlertSeverity::High,
                message: rules.high_message.clone(),
            });
        } else if weighted > rules.moderate_threshold {
            alerts.push(RiskAlert {
                kind: AlertKind::OverallRisk,
                severity: AlertSeverity::Moderate,
                message: rules.moderate_message.clone(),
            });
        }

        if factors.get(RiskFactor::BloodSugar) > rules.blood_sugar_threshold {
            alerts.push(RiskAlert {
                kind: AlertKind::BloodSugar,
                severity: AlertSeverity::High,
                message: rules.blood_sugar_message.clone(),
            });
        }

        alerts
    }
}

/// The last `window` items, or `None` if there are fewer.
fn last_window<T>(items: &[T], window: usize) -> Option<&[T]> {
    if window == 0 || items.len() < window {
        return None;
    }
    Some(&items[items.len() - window..])
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Least-squares slope of `values` against their index.
fn trend_slope(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    if values.len() < 2 {
        return 0.0;
    }
    let sum_x = n * (n - 1.0) / 2.0;
    let sum_xx = n * (n - 1.0) * (2.0 * n - 1.0) / 6.0;
    let sum_y: f64 = values.iter().sum();
    let sum_xy: f64 = values.iter().enumerate().map(|(i, y)| i as f64 * y).sum();

    (n * sum_xy - sum_x * sum_y) / (n * sum_xx - sum_x * sum_x)
}

/// Round and clamp into [0, 100]. NaN maps to 0.
fn to_score(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RiskWeights;
    use crate::domain::{BloodPressureReading, GeneticProfile, MedicationDose};

    fn scorer() -> RiskScorer {
        RiskScorer::default()
    }

    fn readings(values: &[f64]) -> HealthMetrics {
        HealthMetrics {
            blood_sugar_history: values.to_vec(),
            ..Default::default()
        }
    }

    fn doses(taken: usize, missed: usize) -> Vec<MedicationDose> {
        let mut v = vec![MedicationDose { taken: true }; taken];
        v.extend(vec![MedicationDose { taken: false }; missed]);
        v
    }

    #[test]
    fn test_short_histories_use_baseline() {
        let metrics = HealthMetrics {
            blood_sugar_history: vec![300.0; 6],
            blood_pressure_history: vec![BloodPressureReading::new(200.0, 120.0); 6],
            medication_history: doses(0, 29),
            ..Default::default()
        };
        let assessment = scorer().compute_risk(&metrics, DEFAULT_TIME_HORIZON_DAYS);

        assert_eq!(assessment.risk_factors.blood_sugar, 50);
        assert_eq!(assessment.risk_factors.blood_pressure, 50);
        assert_eq!(assessment.risk_factors.medication_adherence, 50);
    }

    #[test]
    fn test_declining_blood_sugar_stays_at_baseline() {
        let metrics = readings(&[140.0, 135.0, 130.0, 125.0, 120.0, 125.0, 120.0]);
        let assessment = scorer().compute_risk(&metrics, 90);
        assert_eq!(assessment.risk_factors.blood_sugar, 50);
    }

    #[test]
    fn test_high_rising_blood_sugar() {
        // mean 190 > 180, slope positive: 50 + 20 + 15 + 10
        let metrics = readings(&[170.0, 175.0, 180.0, 190.0, 200.0, 205.0, 210.0]);
        let assessment = scorer().compute_risk(&metrics, 90);
        assert_eq!(assessment.risk_factors.blood_sugar, 95);
        assert!(assessment
            .alerts
            .iter()
            .any(|a| a.kind == AlertKind::BloodSugar && a.severity == AlertSeverity::High));
    }

    #[test]
    fn test_only_last_seven_readings_count() {
        let mut values = vec![400.0; 20];
        values.extend([140.0, 135.0, 130.0, 125.0, 120.0, 125.0, 120.0]);
        let assessment = scorer().compute_risk(&readings(&values), 90);
        assert_eq!(assessment.risk_factors.blood_sugar, 50);
    }

    #[test]
    fn test_blood_pressure_stage_one() {
        let metrics = HealthMetrics {
            blood_pressure_history: vec![BloodPressureReading::new(150.0, 90.0); 7],
            ..Default::default()
        };
        assert_eq!(scorer().compute_risk(&metrics, 90).risk_factors.blood_pressure, 75);
    }

    #[test]
    fn test_blood_pressure_stages_stack() {
        let metrics = HealthMetrics {
            blood_pressure_history: vec![BloodPressureReading::new(130.0, 105.0); 7],
            ..Default::default()
        };
        assert_eq!(scorer().compute_risk(&metrics, 90).risk_factors.blood_pressure, 95);
    }

    #[test]
    fn test_blood_sugar_thresholds_are_strict() {
        let at_elevated = scorer().compute_risk(&readings(&[140.0; 7]), 90);
        assert_eq!(at_elevated.risk_factors.blood_sugar, 50);

        let at_high = scorer().compute_risk(&readings(&[180.0; 7]), 90);
        assert_eq!(at_high.risk_factors.blood_sugar, 70);
        assert!(at_high.alerts.is_empty());
    }

    #[test]
    fn test_blood_pressure_thresholds_are_strict() {
        let bp = |systolic, diastolic| HealthMetrics {
            blood_pressure_history: vec![BloodPressureReading::new(systolic, diastolic); 7],
            ..Default::default()
        };
        assert_eq!(scorer().compute_risk(&bp(140.0, 90.0), 90).risk_factors.blood_pressure, 50);
        assert_eq!(scorer().compute_risk(&bp(160.0, 100.0), 90).risk_factors.blood_pressure, 75);
    }

    #[test]
    fn test_medication_non_adherence() {
        let metrics = HealthMetrics {
            medication_history: doses(24, 6),
            ..Default::default()
        };
        assert_eq!(
            scorer().compute_risk(&metrics, 90).risk_factors.medication_adherence,
            20
        );

        let perfect = HealthMetrics {
            medication_history: doses(30, 0),
            ..Default::default()
        };
        assert_eq!(
            scorer().compute_risk(&perfect, 90).risk_factors.medication_adherence,
            0
        );
    }

    #[test]
    fn test_lifestyle_penalties_clamp() {
        let metrics = HealthMetrics {
            lifestyle_data: Some(LifestyleData {
                exercise_minutes_per_week: Some(0.0),
                sleep_hours_per_night: Some(4.0),
                stress_level: Some(9.0),
                smoking: true,
                alcohol_drinks_per_day: Some(5.0),
            }),
            ..Default::default()
        };
        // 50 + 15 + 10 + 15 + 20 + 10 = 120
        assert_eq!(scorer().compute_risk(&metrics, 90).risk_factors.lifestyle, 100);
    }

    #[test]
    fn test_lifestyle_limits_are_strict() {
        let metrics = HealthMetrics {
            lifestyle_data: Some(LifestyleData {
                exercise_minutes_per_week: Some(150.0),
                sleep_hours_per_night: Some(7.0),
                stress_level: Some(7.0),
                smoking: false,
                alcohol_drinks_per_day: Some(2.0),
            }),
            ..Default::default()
        };
        assert_eq!(scorer().compute_risk(&metrics, 90).risk_factors.lifestyle, 50);
    }

    #[test]
    fn test_unanswered_lifestyle_adds_nothing() {
        let metrics = HealthMetrics {
            lifestyle_data: Some(LifestyleData::default()),
            ..Default::default()
        };
        assert_eq!(scorer().compute_risk(&metrics, 90).risk_factors.lifestyle, 50);
    }

    #[test]
    fn test_genetics() {
        let absent = scorer().compute_risk(&HealthMetrics::default(), 90);
        assert_eq!(absent.risk_factors.genetics, 50);

        let metrics = HealthMetrics {
            genetic_profile: Some(GeneticProfile {
                family_history: FamilyHistory {
                    diabetes: true,
                    heart_disease: true,
                    hypertension: true,
                },
            }),
            ..Default::default()
        };
        assert_eq!(scorer().compute_risk(&metrics, 90).risk_factors.genetics, 85);
    }

    #[test]
    fn test_overall_is_rounded_weighted_sum() {
        let assessment = scorer().compute_risk(&HealthMetrics::sample_patient(), 30);
        let f = assessment.risk_factors;
        let expected = (f64::from(f.blood_sugar) * 0.25
            + f64::from(f.blood_pressure) * 0.20
            + f64::from(f.medication_adherence) * 0.20
            + f64::from(f.lifestyle) * 0.25
            + f64::from(f.genetics) * 0.10)
            .round() as u8;

        assert_eq!(assessment.overall_risk, expected);
        assert_eq!(assessment.time_horizon_days, 30);
        assert!(assessment.overall_risk <= 100);
    }

    #[test]
    fn test_sample_patient_scores() {
        let assessment = scorer().compute_risk(&HealthMetrics::sample_patient(), 90);
        let f = assessment.risk_factors;
        assert_eq!(
            (f.blood_sugar, f.blood_pressure, f.medication_adherence, f.lifestyle, f.genetics),
            (50, 50, 0, 65, 75)
        );
        // 12.5 + 10 + 0 + 16.25 + 7.5 = 46.25
        assert_eq!(assessment.overall_risk, 46);
        assert!(assessment.alerts.is_empty());
        assert!(assessment.recommendations.is_empty());
    }

    #[test]
    fn test_single_recommendation_for_blood_sugar() {
        let factors = RiskFactors {
            blood_sugar: 80,
            blood_pressure: 40,
            medication_adherence: 40,
            lifestyle: 40,
            genetics: 50,
        };
        let recs = scorer().recommendations(&factors);
        assert_eq!(
            recs,
            vec!["Focus on carbohydrate management and meal timing".to_string()]
        );
    }

    #[test]
    fn test_recommendation_threshold_is_strict() {
        let factors = RiskFactors {
            blood_sugar: 70,
            blood_pressure: 71,
            medication_adherence: 70,
            lifestyle: 100,
            genetics: 100,
        };
        let recs = scorer().recommendations(&factors);
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0], "Increase physical activity and reduce sodium intake");
        assert_eq!(recs[1], "Prioritize sleep, exercise, and stress management");
    }

    #[test]
    fn test_alert_bands() {
        let s = scorer();
        let factors = RiskFactors {
            blood_sugar: 50,
            blood_pressure: 50,
            medication_adherence: 50,
            lifestyle: 50,
            genetics: 50,
        };

        assert!(s.alerts(60.0, &factors).is_empty());

        let moderate = s.alerts(60.5, &factors);
        assert_eq!(moderate.len(), 1);
        assert_eq!(moderate[0].severity, AlertSeverity::Moderate);

        let at_eighty = s.alerts(80.0, &factors);
        assert_eq!(at_eighty[0].severity, AlertSeverity::Moderate);

        let high = s.alerts(80.25, &factors);
        assert_eq!(high[0].severity, AlertSeverity::High);
        assert_eq!(high[0].message, "High risk detected - immediate attention recommended");
    }

    fn overall_sixty(hypertension: bool) -> HealthMetrics {
        HealthMetrics {
            blood_sugar_history: vec![160.0; 7],
            blood_pressure_history: vec![BloodPressureReading::new(150.0, 90.0); 7],
            medication_history: doses(30, 0),
            lifestyle_data: Some(LifestyleData {
                exercise_minutes_per_week: Some(100.0),
                sleep_hours_per_night: Some(8.0),
                stress_level: Some(8.0),
                smoking: false,
                alcohol_drinks_per_day: Some(0.0),
            }),
            genetic_profile: Some(GeneticProfile {
                family_history: FamilyHistory {
                    diabetes: true,
                    heart_disease: true,
                    hypertension,
                },
            }),
        }
    }

    #[test]
    fn test_overall_alert_threshold_is_strict() {
        // 70*.25 + 75*.2 + 0*.2 + 80*.25 + 75*.1 = 60
        let at_sixty = scorer().compute_risk(&overall_sixty(false), 90);
        let f = at_sixty.risk_factors;
        assert_eq!(
            (f.blood_sugar, f.blood_pressure, f.medication_adherence, f.lifestyle, f.genetics),
            (70, 75, 0, 80, 75)
        );
        assert_eq!(at_sixty.overall_risk, 60);
        assert!(at_sixty.alerts.is_empty());

        // genetics 85 lifts the sum to 61
        let above = scorer().compute_risk(&overall_sixty(true), 90);
        assert_eq!(above.overall_risk, 61);
        assert_eq!(above.alerts.len(), 1);
        assert_eq!(above.alerts[0].kind, AlertKind::OverallRisk);
        assert_eq!(above.alerts[0].severity, AlertSeverity::Moderate);
    }

    #[test]
    fn test_worst_case_is_bounded() {
        let metrics = HealthMetrics {
            blood_sugar_history: (0..7).map(|i| 300.0 + f64::from(i)).collect(),
            blood_pressure_history: vec![BloodPressureReading::new(200.0, 130.0); 7],
            medication_history: doses(0, 30),
            lifestyle_data: Some(LifestyleData {
                exercise_minutes_per_week: Some(0.0),
                sleep_hours_per_night: Some(3.0),
                stress_level: Some(10.0),
                smoking: true,
                alcohol_drinks_per_day: Some(6.0),
            }),
            genetic_profile: Some(GeneticProfile {
                family_history: FamilyHistory {
                    diabetes: true,
                    heart_disease: true,
                    hypertension: true,
                },
            }),
        };
        let assessment = scorer().compute_risk(&metrics, 90);

        // 95*.25 + 95*.2 + 100*.2 + 100*.25 + 85*.1 = 96.25
        assert_eq!(assessment.overall_risk, 96);
        assert_eq!(assessment.recommendations.len(), 4);
        assert_eq!(assessment.alerts.len(), 2);
    }

    #[test]
    fn test_custom_weights() {
        let config = ScoringConfig {
            weights: RiskWeights::parse("0.0001,0.0001,0.0001,0.0001,0.9996").expect("Should parse"),
            ..Default::default()
        };
        let metrics = HealthMetrics {
            genetic_profile: Some(GeneticProfile {
                family_history: FamilyHistory {
                    diabetes: true,
                    ..Default::default()
                },
            }),
            ..Default::default()
        };
        assert_eq!(RiskScorer::new(config).compute_risk(&metrics, 90).overall_risk, 65);
    }

    #[test]
    fn test_non_finite_input_does_not_panic() {
        let metrics = readings(&[f64::NAN, 120.0, f64::INFINITY, 130.0, 125.0, 120.0, 110.0]);
        let assessment = scorer().compute_risk(&metrics, 90);
        assert!(assessment.overall_risk <= 100);
    }
}

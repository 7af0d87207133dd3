//! Digital-twin "what if" projections.
//!
//! Linear estimates of how a diet, exercise or medication change would move
//! the user's numbers. Results are indicative only and carry a fixed
//! confidence per kind.

use crate::domain::{
    DietParams, ExerciseParams, MedicationParams, Projection, SimulationKind, SimulationOutcome, SimulationParams,
};

const DIET_ADVICE: [&str; 4] = [
    "Gradually reduce carbohydrate intake",
    "Increase protein consumption",
    "Monitor blood sugar levels closely",
    "Consult with a nutritionist",
];

const EXERCISE_ADVICE: [&str; 4] = [
    "Start with low-intensity activities",
    "Gradually increase duration and intensity",
    "Monitor heart rate during exercise",
    "Include both cardio and strength training",
];

const MEDICATION_ADVICE: [&str; 4] = [
    "Consult your healthcare provider",
    "Monitor for side effects",
    "Maintain consistent timing",
    "Keep detailed medication logs",
];

/// Runs projections for the simulation screen.
#[derive(Debug, Clone, Copy, Default)]
pub struct DigitalTwin;

impl DigitalTwin {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Project the outcome of `params`.
    #[must_use]
    pub fn run_simulation(&self, params: SimulationParams) -> SimulationOutcome {
        let (projection, timeline, confidence, advice) = match params {
            SimulationParams::Diet(p) => (diet(&p), "2-4 weeks", 85, &DIET_ADVICE),
            SimulationParams::Exercise(p) => (exercise(&p), "4-6 weeks", 90, &EXERCISE_ADVICE),
            SimulationParams::Medication(p) => (medication(&p), "1-2 weeks", 95, &MEDICATION_ADVICE),
        };

        tracing::debug!(
            "Simulated {} change: impact {:.1}",
            params.kind(),
            projection.impact_score()
        );

        SimulationOutcome {
            kind: params.kind(),
            params,
            projection,
            timeline: timeline.to_string(),
            confidence,
            recommendations: advice.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    /// Run `kind` with its default parameters.
    #[must_use]
    pub fn run_default(&self, kind: SimulationKind) -> SimulationOutcome {
        self.run_simulation(SimulationParams::defaults(kind))
    }
}

fn diet(p: &DietParams) -> Projection {
    Projection::Diet {
        blood_sugar_impact: -15.0 - p.carb_reduction * 0.5,
        weight_impact: -2.0 - p.carb_reduction * 0.1,
        energy_level: 5.0 + p.protein_increase * 0.3,
        risk_reduction: 8.0 + p.carb_reduction * 0.2,
    }
}

fn exercise(p: &ExerciseParams) -> Projection {
    Projection::Exercise {
        cardiovascular_improvement: 20.0 + p.cardio_minutes * 0.5,
        blood_pressure_reduction: -8.0 - p.cardio_minutes * 0.2,
        weight_loss: -1.0 - p.cardio_minutes * 0.05,
        mood_improvement: 15.0 + p.cardio_minutes * 0.3,
    }
}

fn medication(p: &MedicationParams) -> Projection {
    Projection::Medication {
        effectiveness: 75.0 + p.dosage_change * 2.0,
        side_effects: 10.0 + (p.dosage_change * 1.5).abs(),
        adherence: 85.0 - p.timing_adjustment * 0.5,
        cost_impact: if p.new_medication { 25.0 } else { 0.0 },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_default_diet_projection() {
        let outcome = DigitalTwin::new().run_default(SimulationKind::Diet);
        let Projection::Diet {
            blood_sugar_impact,
            weight_impact,
            energy_level,
            risk_reduction,
        } = outcome.projection
        else {
            panic!("Expected diet projection");
        };

        assert!(approx(blood_sugar_impact, -25.0));
        assert!(approx(weight_impact, -4.0));
        assert!(approx(energy_level, 8.0));
        assert!(approx(risk_reduction, 12.0));
        assert_eq!(outcome.timeline, "2-4 weeks");
        assert_eq!(outcome.confidence, 85);
        assert_eq!(outcome.recommendations.len(), 4);
    }

    #[test]
    fn test_default_exercise_projection() {
        let outcome = DigitalTwin::new().run_default(SimulationKind::Exercise);
        assert!(approx(outcome.impact_score(), 35.0));
        assert_eq!(outcome.confidence, 90);
        assert_eq!(outcome.recommendations[0], "Start with low-intensity activities");
    }

    #[test]
    fn test_medication_dose_change() {
        let params = SimulationParams::Medication(MedicationParams {
            dosage_change: -10.0,
            timing_adjustment: 4.0,
            new_medication: true,
        });
        let outcome = DigitalTwin::new().run_simulation(params);
        let Projection::Medication {
            effectiveness,
            side_effects,
            adherence,
            cost_impact,
        } = outcome.projection
        else {
            panic!("Expected medication projection");
        };

        assert!(approx(effectiveness, 55.0));
        assert!(approx(side_effects, 25.0));
        assert!(approx(adherence, 83.0));
        assert!(approx(cost_impact, 25.0));
        assert_eq!(outcome.kind, SimulationKind::Medication);
        assert_eq!(outcome.timeline, "1-2 weeks");
    }
}

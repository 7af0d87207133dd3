//! Replaceable configuration tables.
//!
//! The scorer and the responder never hard-code their weights, thresholds,
//! keyword lists or templates; they read them from these structs. `Default`
//! gives the production tables, tests may build their own.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::{MessageCategory, Mood, MoodProfile, RiskFactor, Tone, Urgency};
use crate::HealthAiError;

const RISK_WEIGHTS_ENV: &str = "HEALTHAI_RISK_WEIGHTS";
const COACH_CONFIG_ENV: &str = "HEALTHAI_COACH_CONFIG";
const DB_PATH_ENV: &str = "HEALTHAI_DB_PATH";
const CHAT_HISTORY_ENV: &str = "HEALTHAI_CHAT_HISTORY";
const EXPORT_PATH_ENV: &str = "HEALTHAI_EXPORT_PATH";

/// Allowed drift of the weight sum from 1.0.
const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

// ---------------------------------------------------------------------------
// Risk scoring
// ---------------------------------------------------------------------------

/// Contribution of each factor to the overall score. Must sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskWeights {
    pub blood_sugar: f64,
    pub blood_pressure: f64,
    pub medication_adherence: f64,
    pub lifestyle: f64,
    pub genetics: f64,
}

impl Default for RiskWeights {
    fn default() -> Self {
        Self {
            blood_sugar: 0.25,
            blood_pressure: 0.20,
            medication_adherence: 0.20,
            lifestyle: 0.25,
            genetics: 0.10,
        }
    }
}

impl RiskWeights {
    #[must_use]
    pub fn get(&self, factor: RiskFactor) -> f64 {
        match factor {
            RiskFactor::BloodSugar => self.blood_sugar,
            RiskFactor::BloodPressure => self.blood_pressure,
            RiskFactor::MedicationAdherence => self.medication_adherence,
            RiskFactor::Lifestyle => self.lifestyle,
            RiskFactor::Genetics => self.genetics,
        }
    }

    #[must_use]
    pub fn sum(&self) -> f64 {
        RiskFactor::ALL.iter().map(|f| self.get(*f)).sum()
    }

    /// Parse `"bs,bp,med,life,gen"`.
    ///
    /// # Errors
    /// Rejects anything but five finite positive numbers summing to 1.
    pub fn parse(input: &str) -> Result<Self, String> {
        let values = input
            .split(',')
            .map(|p| p.trim().parse::<f64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| format!("not a number: {e}"))?;

        let [blood_sugar, blood_pressure, medication_adherence, lifestyle, genetics] = values[..] else {
            return Err(format!("expected 5 weights, got {}", values.len()));
        };

        if values.iter().any(|w| !w.is_finite() || *w <= 0.0) {
            return Err("weights must be finite and positive".to_string());
        }

        let weights = Self {
            blood_sugar,
            blood_pressure,
            medication_adherence,
            lifestyle,
            genetics,
        };
        if (weights.sum() - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(format!("weights sum to {}, expected 1.0", weights.sum()));
        }
        Ok(weights)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BloodSugarRules {
    /// Mean above this (mg/dL) adds `elevated_bonus`
    pub elevated_mean: f64,
    pub elevated_bonus: f64,
    /// Mean above this adds `high_bonus` on top
    pub high_mean: f64,
    pub high_bonus: f64,
    /// Added when the least-squares slope is positive
    pub rising_trend_bonus: f64,
}

impl Default for BloodSugarRules {
    fn default() -> Self {
        Self {
            elevated_mean: 140.0,
            elevated_bonus: 20.0,
            high_mean: 180.0,
            high_bonus: 15.0,
            rising_trend_bonus: 10.0,
        }
    }
}

/// Either limit being exceeded triggers the stage; stages stack.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BloodPressureRules {
    pub stage1_systolic: f64,
    pub stage1_diastolic: f64,
    pub stage1_bonus: f64,
    pub stage2_systolic: f64,
    pub stage2_diastolic: f64,
    pub stage2_bonus: f64,
}

impl Default for BloodPressureRules {
    fn default() -> Self {
        Self {
            stage1_systolic: 140.0,
            stage1_diastolic: 90.0,
            stage1_bonus: 25.0,
            stage2_systolic: 160.0,
            stage2_diastolic: 100.0,
            stage2_bonus: 20.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LifestyleRules {
    pub min_exercise_minutes: f64,
    pub exercise_penalty: f64,
    pub min_sleep_hours: f64,
    pub sleep_penalty: f64,
    pub max_stress: f64,
    pub stress_penalty: f64,
    pub smoking_penalty: f64,
    pub max_alcohol_drinks: f64,
    pub alcohol_penalty: f64,
}

impl Default for LifestyleRules {
    fn default() -> Self {
        Self {
            min_exercise_minutes: 150.0,
            exercise_penalty: 15.0,
            min_sleep_hours: 7.0,
            sleep_penalty: 10.0,
            max_stress: 7.0,
            stress_penalty: 15.0,
            smoking_penalty: 20.0,
            max_alcohol_drinks: 2.0,
            alcohol_penalty: 10.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeneticsRules {
    pub diabetes: f64,
    pub heart_disease: f64,
    pub hypertension: f64,
}

impl Default for GeneticsRules {
    fn default() -> Self {
        Self {
            diabetes: 15.0,
            heart_disease: 10.0,
            hypertension: 10.0,
        }
    }
}

/// Advice emitted when a factor exceeds the recommendation threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationTexts {
    pub blood_sugar: String,
    pub blood_pressure: String,
    pub medication_adherence: String,
    pub lifestyle: String,
}

impl Default for RecommendationTexts {
    fn default() -> Self {
        Self {
            blood_sugar: "Focus on carbohydrate management and meal timing".to_string(),
            blood_pressure: "Increase physical activity and reduce sodium intake".to_string(),
            medication_adherence: "Set up medication reminders and simplify your routine".to_string(),
            lifestyle: "Prioritize sleep, exercise, and stress management".to_string(),
        }
    }
}

impl RecommendationTexts {
    /// Text for a factor. Genetics has none.
    #[must_use]
    pub fn get(&self, factor: RiskFactor) -> Option<&str> {
        match factor {
            RiskFactor::BloodSugar => Some(&self.blood_sugar),
            RiskFactor::BloodPressure => Some(&self.blood_pressure),
            RiskFactor::MedicationAdherence => Some(&self.medication_adherence),
            RiskFactor::Lifestyle => Some(&self.lifestyle),
            RiskFactor::Genetics => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlertRules {
    /// Overall score above this raises a high alert
    pub high_threshold: f64,
    pub high_message: String,
    /// Overall score above this (and not high) raises a moderate alert
    pub moderate_threshold: f64,
    pub moderate_message: String,
    /// Blood-sugar factor above this raises its own high alert
    pub blood_sugar_threshold: u8,
    pub blood_sugar_message: String,
}

impl Default for AlertRules {
    fn default() -> Self {
        Self {
            high_threshold: 80.0,
            high_message: "High risk detected - immediate attention recommended".to_string(),
            moderate_threshold: 60.0,
            moderate_message: "Elevated risk - consider lifestyle adjustments".to_string(),
            blood_sugar_threshold: 80,
            blood_sugar_message: "Blood sugar levels require attention".to_string(),
        }
    }
}

/// Everything the risk scorer reads.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringConfig {
    pub weights: RiskWeights,
    /// Neutral score used when data is missing
    pub baseline: f64,
    /// Most recent readings considered for blood sugar and blood pressure
    pub reading_window: usize,
    /// Most recent doses considered for adherence
    pub dose_window: usize,
    pub blood_sugar: BloodSugarRules,
    pub blood_pressure: BloodPressureRules,
    pub lifestyle: LifestyleRules,
    pub genetics: GeneticsRules,
    /// A factor above this produces a recommendation
    pub recommendation_threshold: u8,
    pub recommendations: RecommendationTexts,
    pub alerts: AlertRules,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: RiskWeights::default(),
            baseline: 50.0,
            reading_window: 7,
            dose_window: 30,
            blood_sugar: BloodSugarRules::default(),
            blood_pressure: BloodPressureRules::default(),
            lifestyle: LifestyleRules::default(),
            genetics: GeneticsRules::default(),
            recommendation_threshold: 70,
            recommendations: RecommendationTexts::default(),
            alerts: AlertRules::default(),
        }
    }
}

impl ScoringConfig {
    /// Defaults, with weights overridden by `HEALTHAI_RISK_WEIGHTS` when valid.
    #[must_use]
    pub fn from_env_or_default() -> Self {
        let mut cfg = Self::default();

        if let Ok(v) = std::env::var(RISK_WEIGHTS_ENV) {
            match RiskWeights::parse(&v) {
                Ok(weights) => {
                    tracing::info!("Using risk weights from {RISK_WEIGHTS_ENV}");
                    cfg.weights = weights;
                }
                Err(e) => tracing::warn!("Ignoring {RISK_WEIGHTS_ENV}: {e}"),
            }
        }

        cfg
    }
}

// ---------------------------------------------------------------------------
// Coaching
// ---------------------------------------------------------------------------

/// Keywords that signal a mood.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodKeywords {
    pub mood: Mood,
    pub keywords: Vec<String>,
}

/// A reply opener whose closing clause depends on the mood's tone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyTemplate {
    pub category: MessageCategory,
    pub prefix: String,
    /// Tone that selects `matched`
    pub tone: Tone,
    pub matched: String,
    pub otherwise: String,
}

impl ReplyTemplate {
    #[must_use]
    pub fn render(&self, tone: Tone) -> String {
        let clause = if tone == self.tone {
            &self.matched
        } else {
            &self.otherwise
        };
        format!("{}{}", self.prefix, clause)
    }
}

/// Advice appended when a message mentions a topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicAdvice {
    pub topic: String,
    pub keywords: Vec<String>,
    pub advice: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodProfileEntry {
    pub mood: Mood,
    pub profile: MoodProfile,
}

/// Next steps offered per urgency tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionTiers {
    pub low: Vec<String>,
    pub medium: Vec<String>,
    pub high: Vec<String>,
}

impl ActionTiers {
    #[must_use]
    pub fn for_urgency(&self, urgency: Urgency) -> &[String] {
        match urgency {
            Urgency::Low => &self.low,
            Urgency::Medium => &self.medium,
            Urgency::High => &self.high,
        }
    }
}

/// Everything the mood-adaptive responder reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CoachConfig {
    /// Checked in order; first set with a hit wins
    pub mood_keywords: Vec<MoodKeywords>,
    pub fallback_mood: Mood,
    pub greeting_keywords: Vec<String>,
    pub concern_keywords: Vec<String>,
    pub templates: Vec<ReplyTemplate>,
    /// Checked in order; first topic with a hit wins
    pub topic_advice: Vec<TopicAdvice>,
    pub fallback_advice: String,
    pub mood_profiles: Vec<MoodProfileEntry>,
    /// Used for moods without an entry in `mood_profiles`
    pub default_profile: MoodProfile,
    pub action_tiers: ActionTiers,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

fn template(category: MessageCategory, prefix: &str, tone: Tone, matched: &str, otherwise: &str) -> ReplyTemplate {
    ReplyTemplate {
        category,
        prefix: prefix.to_string(),
        tone,
        matched: matched.to_string(),
        otherwise: otherwise.to_string(),
    }
}

fn profile(tone: Tone, suggestions: &[&str], urgency: Urgency) -> MoodProfile {
    MoodProfile {
        tone,
        suggestions: strings(suggestions),
        urgency,
    }
}

impl Default for CoachConfig {
    fn default() -> Self {
        use MessageCategory::{Concern, Greeting, Question};

        let motivated = profile(
            Tone::Encouraging,
            &["goal setting", "challenges", "progress tracking"],
            Urgency::High,
        );

        Self {
            mood_keywords: vec![
                MoodKeywords {
                    mood: Mood::Stressed,
                    keywords: strings(&["stressed", "worried", "anxious"]),
                },
                MoodKeywords {
                    mood: Mood::Motivated,
                    keywords: strings(&["motivated", "excited", "ready"]),
                },
                MoodKeywords {
                    mood: Mood::Confused,
                    keywords: strings(&["confused", "don't understand", "help"]),
                },
                MoodKeywords {
                    mood: Mood::Discouraged,
                    keywords: strings(&["discouraged", "frustrated", "giving up"]),
                },
            ],
            fallback_mood: Mood::Motivated,
            greeting_keywords: strings(&["hello", "hi"]),
            concern_keywords: strings(&["worried", "concerned", "problem"]),
            templates: vec![
                template(
                    Greeting,
                    "Hello! I'm here to support you on your health journey. ",
                    Tone::Calming,
                    "Let's take this one step at a time.",
                    "Ready to make some positive changes?",
                ),
                template(
                    Greeting,
                    "Hi there! I can see you're working hard on your health. ",
                    Tone::Encouraging,
                    "That's fantastic!",
                    "Remember, every small step counts.",
                ),
                template(
                    Greeting,
                    "Welcome back! ",
                    Tone::Supportive,
                    "I'm here to help you succeed.",
                    "Let's continue building on your progress.",
                ),
                template(
                    Question,
                    "That's a great question! ",
                    Tone::Educational,
                    "Let me break this down for you.",
                    "I'm happy to help clarify this.",
                ),
                template(
                    Question,
                    "I understand your concern. ",
                    Tone::Calming,
                    "Let's work through this together.",
                    "Here's what I recommend.",
                ),
                template(
                    Question,
                    "Excellent question! ",
                    Tone::Encouraging,
                    "This shows you're really engaged in your health.",
                    "Let me provide some guidance.",
                ),
                template(
                    Concern,
                    "I hear your concern, and that's completely valid. ",
                    Tone::Supportive,
                    "You're not alone in this.",
                    "Let's address this together.",
                ),
                template(
                    Concern,
                    "Thank you for sharing that with me. ",
                    Tone::Calming,
                    "It's okay to feel this way.",
                    "We can work through this.",
                ),
                template(
                    Concern,
                    "I understand this is challenging. ",
                    Tone::Supportive,
                    "Remember, progress isn't always linear.",
                    "Let's find a solution.",
                ),
            ],
            topic_advice: vec![
                TopicAdvice {
                    topic: "bloodSugar".to_string(),
                    keywords: strings(&["blood sugar", "bloodsugar"]),
                    advice: "For blood sugar management, consider monitoring your carbohydrate intake and timing your meals consistently.".to_string(),
                },
                TopicAdvice {
                    topic: "exercise".to_string(),
                    keywords: strings(&["exercise"]),
                    advice: "Regular physical activity is one of the most effective ways to manage chronic conditions. Start with what feels comfortable.".to_string(),
                },
                TopicAdvice {
                    topic: "medication".to_string(),
                    keywords: strings(&["medication"]),
                    advice: "Medication adherence is crucial. If you're having trouble, let's explore some strategies to make it easier.".to_string(),
                },
                TopicAdvice {
                    topic: "diet".to_string(),
                    keywords: strings(&["diet"]),
                    advice: "Nutrition plays a key role in managing chronic diseases. Focus on whole foods and balanced meals.".to_string(),
                },
                TopicAdvice {
                    topic: "sleep".to_string(),
                    keywords: strings(&["sleep"]),
                    advice: "Quality sleep is essential for overall health and can significantly impact your condition management.".to_string(),
                },
                TopicAdvice {
                    topic: "stress".to_string(),
                    keywords: strings(&["stress"]),
                    advice: "Stress management is crucial. Consider techniques like deep breathing, meditation, or gentle movement.".to_string(),
                },
            ],
            fallback_advice: "Remember, small consistent changes often lead to the biggest improvements in health outcomes.".to_string(),
            mood_profiles: vec![
                MoodProfileEntry {
                    mood: Mood::Stressed,
                    profile: profile(
                        Tone::Calming,
                        &["breathing exercises", "meditation", "gentle movement"],
                        Urgency::Low,
                    ),
                },
                MoodProfileEntry {
                    mood: Mood::Motivated,
                    profile: motivated.clone(),
                },
                MoodProfileEntry {
                    mood: Mood::Confused,
                    profile: profile(
                        Tone::Educational,
                        &["simplified explanations", "step-by-step guidance", "resources"],
                        Urgency::Medium,
                    ),
                },
                MoodProfileEntry {
                    mood: Mood::Discouraged,
                    profile: profile(
                        Tone::Supportive,
                        &["small wins", "celebration", "support groups"],
                        Urgency::Medium,
                    ),
                },
            ],
            default_profile: motivated,
            action_tiers: ActionTiers {
                low: strings(&["Take a deep breath", "Review your progress", "Plan for tomorrow"]),
                medium: strings(&["Set a small goal", "Connect with support", "Track one metric"]),
                high: strings(&["Take immediate action", "Set a challenge", "Share your progress"]),
            },
        }
    }
}

impl CoachConfig {
    /// Profile configured for `mood`, or the default profile.
    #[must_use]
    pub fn profile_for(&self, mood: Mood) -> &MoodProfile {
        self.mood_profiles
            .iter()
            .find(|entry| entry.mood == mood)
            .map_or(&self.default_profile, |entry| &entry.profile)
    }

    /// Check that every message category has at least one template.
    ///
    /// # Errors
    /// Names the first category without templates.
    pub fn validate(&self) -> Result<(), String> {
        for category in [
            MessageCategory::Greeting,
            MessageCategory::Question,
            MessageCategory::Concern,
        ] {
            if !self.templates.iter().any(|t| t.category == category) {
                return Err(format!("no templates for category {category:?}"));
            }
        }
        Ok(())
    }

    /// Read a JSON coaching configuration and validate it.
    ///
    /// # Errors
    /// Returns `Io` or `Serialization` for unreadable files and `Config` when
    /// the tables are incomplete.
    pub fn load(path: &Path) -> crate::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let cfg: Self = serde_json::from_str(&text)?;
        cfg.validate().map_err(HealthAiError::Config)?;
        Ok(cfg)
    }

    /// Defaults, replaced by the JSON file named in `HEALTHAI_COACH_CONFIG`
    /// when it can be loaded.
    #[must_use]
    pub fn from_env_or_default() -> Self {
        let Ok(path) = std::env::var(COACH_CONFIG_ENV) else {
            return Self::default();
        };

        match Self::load(Path::new(path.trim())) {
            Ok(cfg) => {
                tracing::info!("Loaded coach configuration from {COACH_CONFIG_ENV}");
                cfg
            }
            Err(e) => {
                tracing::warn!("Ignoring {COACH_CONFIG_ENV}: {e}");
                Self::default()
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Application
// ---------------------------------------------------------------------------

/// Process-level settings for the binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    /// Chat turns loaded into the conversation view
    pub chat_history_limit: usize,
    /// Where `x` on the dashboard writes the data export
    pub export_path: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("healthai.db"),
            chat_history_limit: 50,
            export_path: PathBuf::from("healthai-export.json"),
        }
    }
}

impl AppConfig {
    #[must_use]
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(v) = std::env::var(DB_PATH_ENV) {
            if !v.trim().is_empty() {
                cfg.db_path = PathBuf::from(v.trim());
            }
        }

        if let Ok(v) = std::env::var(EXPORT_PATH_ENV) {
            if !v.trim().is_empty() {
                cfg.export_path = PathBuf::from(v.trim());
            }
        }

        if let Ok(v) = std::env::var(CHAT_HISTORY_ENV) {
            if let Ok(n) = v.trim().parse::<usize>() {
                if n > 0 {
                    cfg.chat_history_limit = n;
                }
            }
        }

        cfg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights_sum_to_one() {
        assert!((RiskWeights::default().sum() - 1.0).abs() < WEIGHT_SUM_TOLERANCE);
    }

    #[test]
    fn test_parse_weights() {
        let w = RiskWeights::parse("0.2, 0.2, 0.2, 0.2, 0.2").expect("Should parse");
        assert!((w.genetics - 0.2).abs() < f64::EPSILON);

        assert!(RiskWeights::parse("0.5,0.5").is_err());
        assert!(RiskWeights::parse("0.3,0.3,0.3,0.3,0.3").is_err());
        assert!(RiskWeights::parse("1.0,0.0,0.0,0.0,0.0").is_err());
        assert!(RiskWeights::parse("a,b,c,d,e").is_err());
    }

    #[test]
    fn test_default_coach_config_is_valid() {
        let cfg = CoachConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.templates.len(), 9);
    }

    #[test]
    fn test_neutral_uses_default_profile() {
        let cfg = CoachConfig::default();
        assert_eq!(cfg.profile_for(Mood::Neutral), cfg.profile_for(Mood::Motivated));
        assert_eq!(cfg.profile_for(Mood::Stressed).urgency, Urgency::Low);
    }

    #[test]
    fn test_template_render_by_tone() {
        let t = template(MessageCategory::Greeting, "Hi. ", Tone::Calming, "Calm.", "Go!");
        assert_eq!(t.render(Tone::Calming), "Hi. Calm.");
        assert_eq!(t.render(Tone::Supportive), "Hi. Go!");
    }

    #[test]
    fn test_partial_json_override_keeps_defaults() {
        let cfg: CoachConfig =
            serde_json::from_str(r#"{"fallbackAdvice": "Drink water."}"#).expect("Should parse");
        assert_eq!(cfg.fallback_advice, "Drink water.");
        assert_eq!(cfg.templates.len(), 9);
    }

    #[test]
    fn test_config_without_concern_templates_rejected() {
        let mut cfg = CoachConfig::default();
        cfg.templates.retain(|t| t.category != MessageCategory::Concern);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_load_coach_config_errors() {
        let missing = std::env::temp_dir().join("healthai-missing-coach-config.json");
        assert!(matches!(CoachConfig::load(&missing), Err(HealthAiError::Io(_))));

        let path = std::env::temp_dir().join("healthai-empty-templates.json");
        std::fs::write(&path, r#"{"templates": []}"#).expect("Should write");
        let err = CoachConfig::load(&path).expect_err("Should reject");
        std::fs::remove_file(&path).ok();
        assert!(matches!(err, HealthAiError::Config(_)));
    }
}

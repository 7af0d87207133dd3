//! Mood-adaptive coaching replies.
//!
//! Keyword matching only: the message is lower-cased, scanned for mood and
//! intent keywords, and answered from a fixed template pool. The random
//! source is injected so replies are reproducible under a seeded RNG.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::CoachConfig;
use crate::domain::{CoachReply, HealthMetrics, MessageCategory, Mood, RiskAssessment};

/// What the caller knows about the user when a message arrives.
///
/// Carried for context only; replies are driven by the message text.
#[derive(Debug, Clone, Copy, Default)]
pub struct HealthContext<'a> {
    pub metrics: Option<&'a HealthMetrics>,
    pub latest_assessment: Option<&'a RiskAssessment>,
}

#[derive(Debug, Clone, Default)]
pub struct MoodAdaptiveResponder {
    config: CoachConfig,
}

impl MoodAdaptiveResponder {
    #[must_use]
    pub fn new(config: CoachConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &CoachConfig {
        &self.config
    }

    /// First mood whose keyword set matches, else the fallback mood.
    #[must_use]
    pub fn classify_mood(&self, message: &str) -> Mood {
        let text = message.to_lowercase();
        self.config
            .mood_keywords
            .iter()
            .find(|set| contains_any(&text, &set.keywords))
            .map_or(self.config.fallback_mood, |set| set.mood)
    }

    /// Greeting, then concern, otherwise question.
    ///
    /// Keywords match as substrings, so "this" counts as a greeting.
    #[must_use]
    pub fn categorize_message(&self, message: &str) -> MessageCategory {
        let text = message.to_lowercase();
        if contains_any(&text, &self.config.greeting_keywords) {
            MessageCategory::Greeting
        } else if contains_any(&text, &self.config.concern_keywords) {
            MessageCategory::Concern
        } else {
            MessageCategory::Question
        }
    }

    /// Advice for the first topic mentioned, or the generic fallback.
    #[must_use]
    pub fn topic_advice(&self, message: &str) -> &str {
        let text = message.to_lowercase();
        self.config
            .topic_advice
            .iter()
            .find(|topic| contains_any(&text, &topic.keywords))
            .map_or(self.config.fallback_advice.as_str(), |topic| topic.advice.as_str())
    }

    /// Build a reply to `message`.
    pub fn respond<R: Rng + ?Sized>(&self, message: &str, context: &HealthContext<'_>, rng: &mut R) -> CoachReply {
        let mood = self.classify_mood(message);
        let category = self.categorize_message(message);
        let profile = self.config.profile_for(mood);

        let pool: Vec<_> = self
            .config
            .templates
            .iter()
            .filter(|t| t.category == category)
            .collect();
        let opener = pool
            .choose(rng)
            .map(|t| t.render(profile.tone))
            .unwrap_or_default();

        let advice = self.topic_advice(message);
        let text = if opener.is_empty() {
            advice.to_string()
        } else {
            format!("{opener} {advice}")
        };

        tracing::debug!(
            "Coach reply: mood={mood}, category={category:?}, has_assessment={}",
            context.latest_assessment.is_some()
        );

        CoachReply {
            text,
            mood,
            category,
            suggestions: profile.suggestions.clone(),
            suggested_actions: self.config.action_tiers.for_urgency(profile.urgency).to_vec(),
        }
    }
}

fn contains_any(text: &str, keywords: &[String]) -> bool {
    keywords.iter().any(|k| text.contains(k.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn responder() -> MoodAdaptiveResponder {
        MoodAdaptiveResponder::default()
    }

    fn rng() -> ChaCha20Rng {
        ChaCha20Rng::seed_from_u64(42)
    }

    #[test]
    fn test_classify_mood() {
        let r = responder();
        assert_eq!(r.classify_mood("I am stressed and overwhelmed"), Mood::Stressed);
        assert_eq!(r.classify_mood("let's go, I'm motivated"), Mood::Motivated);
        assert_eq!(r.classify_mood(""), Mood::Motivated);
        assert_eq!(r.classify_mood("I'm so CONFUSED"), Mood::Confused);
        assert_eq!(r.classify_mood("about to start giving up"), Mood::Discouraged);
    }

    #[test]
    fn test_mood_priority_order() {
        // stressed outranks confused
        assert_eq!(
            responder().classify_mood("worried and I need help"),
            Mood::Stressed
        );
    }

    #[test]
    fn test_categorize_message() {
        let r = responder();
        assert_eq!(r.categorize_message("Hello there"), MessageCategory::Greeting);
        assert_eq!(r.categorize_message("I have a problem"), MessageCategory::Concern);
        assert_eq!(r.categorize_message("What should I eat"), MessageCategory::Question);
        assert_eq!(r.categorize_message(""), MessageCategory::Question);
        // substring match
        assert_eq!(r.categorize_message("is this normal"), MessageCategory::Greeting);
    }

    #[test]
    fn test_topic_advice_order() {
        let r = responder();
        assert!(r
            .topic_advice("my blood sugar and sleep")
            .starts_with("For blood sugar management"));
        assert!(r.topic_advice("diet or sleep?").starts_with("Nutrition plays"));
        assert!(r.topic_advice("feeling stressed").starts_with("Stress management"));
        assert!(r.topic_advice("nothing here").starts_with("Remember, small consistent"));
    }

    #[test]
    fn test_reply_uses_category_pool_and_tone() {
        let r = responder();
        let reply = r.respond("I am stressed about my diet", &HealthContext::default(), &mut rng());

        assert_eq!(reply.mood, Mood::Stressed);
        assert_eq!(reply.category, MessageCategory::Question);
        assert!(reply.text.ends_with(
            "Nutrition plays a key role in managing chronic diseases. Focus on whole foods and balanced meals."
        ));

        let openers: Vec<String> = r
            .config()
            .templates
            .iter()
            .filter(|t| t.category == MessageCategory::Question)
            .map(|t| t.render(crate::domain::Tone::Calming))
            .collect();
        assert!(openers.iter().any(|o| reply.text.starts_with(o.as_str())));

        assert_eq!(
            reply.suggested_actions,
            vec!["Take a deep breath", "Review your progress", "Plan for tomorrow"]
        );
        assert_eq!(reply.suggestions[0], "breathing exercises");
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let r = responder();
        let a = r.respond("hello", &HealthContext::default(), &mut rng());
        let b = r.respond("hello", &HealthContext::default(), &mut rng());
        assert_eq!(a, b);
    }

    #[test]
    fn test_never_fails_on_odd_input() {
        let r = responder();
        let mut rng = rng();
        for input in ["", "   ", "?!.,;", "\u{1F600}\u{1F600}", "İSTANBUL", "\0"] {
            let reply = r.respond(input, &HealthContext::default(), &mut rng);
            assert!(!reply.text.is_empty());
            assert_eq!(reply.suggested_actions.len(), 3);
        }
    }

    #[test]
    fn test_empty_message_defaults() {
        let reply = responder().respond("", &HealthContext::default(), &mut rng());
        assert_eq!(reply.mood, Mood::Motivated);
        assert_eq!(reply.category, MessageCategory::Question);
        assert_eq!(
            reply.suggested_actions,
            vec!["Take immediate action", "Set a challenge", "Share your progress"]
        );
    }

    #[test]
    fn test_empty_template_pool_still_replies() {
        let mut config = CoachConfig::default();
        config.templates.clear();
        let reply = MoodAdaptiveResponder::new(config).respond("hi", &HealthContext::default(), &mut rng());
        assert!(reply.text.starts_with("Remember, small consistent"));
    }
}

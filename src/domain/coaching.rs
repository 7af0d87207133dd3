//! Coaching conversation types.

use serde::{Deserialize, Serialize};

/// Coarse emotional state read from a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Stressed,
    Motivated,
    Confused,
    Discouraged,
    Neutral,
}

impl Mood {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stressed => "stressed",
            Self::Motivated => "motivated",
            Self::Confused => "confused",
            Self::Discouraged => "discouraged",
            Self::Neutral => "neutral",
        }
    }

    /// Parse a stored label. Unknown labels map to `Neutral`.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label {
            "stressed" => Self::Stressed,
            "motivated" => Self::Motivated,
            "confused" => Self::Confused,
            "discouraged" => Self::Discouraged,
            _ => Self::Neutral,
        }
    }
}

impl std::fmt::Display for Mood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which clause variant a reply template uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Calming,
    Encouraging,
    Educational,
    Supportive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Low,
    Medium,
    High,
}

/// Broad intent of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageCategory {
    Greeting,
    Question,
    Concern,
}

/// Static configuration attached to a mood.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodProfile {
    pub tone: Tone,
    pub suggestions: Vec<String>,
    pub urgency: Urgency,
}

/// One assistant reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoachReply {
    pub text: String,
    pub mood: Mood,
    pub category: MessageCategory,
    /// Mood-specific coping suggestions
    pub suggestions: Vec<String>,
    /// Next steps picked by urgency tier
    pub suggested_actions: Vec<String>,
}

/// One completed exchange in the conversation log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatTurn {
    pub user_text: String,
    pub assistant_text: String,
    pub mood: Mood,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl ChatTurn {
    #[must_use]
    pub fn new(user_text: impl Into<String>, reply: &CoachReply) -> Self {
        Self {
            user_text: user_text.into(),
            assistant_text: reply.text.clone(),
            mood: reply.mood,
            timestamp: chrono::Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mood_label_roundtrip() {
        for mood in [
            Mood::Stressed,
            Mood::Motivated,
            Mood::Confused,
            Mood::Discouraged,
            Mood::Neutral,
        ] {
            assert_eq!(Mood::from_label(mood.as_str()), mood);
        }
        assert_eq!(Mood::from_label("elated"), Mood::Neutral);
    }

    #[test]
    fn test_mood_serializes_lowercase() {
        let json = serde_json::to_string(&Mood::Discouraged).expect("Should serialize");
        assert_eq!(json, "\"discouraged\"");
    }
}

//! Color palette and styles for the dashboard.
//!
//! Sky-blue accent on a near-black surface. Green, amber and red carry the
//! low / moderate / high risk meaning on every screen.

use ratatui::style::{Color, Modifier, Style};

use crate::domain::{AlertSeverity, Mood, RiskLevel};

/// Dashboard color palette.
pub struct HealthTheme;

impl HealthTheme {
    /// Sky blue
    pub const ACCENT: Color = Color::Rgb(14, 165, 233);
    pub const ACCENT_SOFT: Color = Color::Rgb(125, 211, 252);

    /// Panel outlines
    pub const OUTLINE: Color = Color::Rgb(82, 82, 91);

    pub const GOOD: Color = Color::Rgb(34, 197, 94);
    pub const CAUTION: Color = Color::Rgb(245, 158, 11);
    pub const CRITICAL: Color = Color::Rgb(239, 68, 68);
    pub const NOTICE: Color = Color::Rgb(99, 102, 241);

    /// Points and achievements
    pub const REWARD: Color = Color::Rgb(217, 70, 239);

    pub const SURFACE: Color = Color::Rgb(9, 9, 11);
    pub const INK: Color = Color::Rgb(244, 244, 245);
    pub const INK_DIM: Color = Color::Rgb(161, 161, 170);
    pub const INK_FAINT: Color = Color::Rgb(113, 113, 122);

    fn fg(color: Color) -> Style {
        Style::new().fg(color)
    }

    fn bold(color: Color) -> Style {
        Style::new().fg(color).add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn title() -> Style {
        Self::bold(Self::INK)
    }

    #[must_use]
    pub fn subtitle() -> Style {
        Self::bold(Self::ACCENT_SOFT)
    }

    #[must_use]
    pub fn text() -> Style {
        Self::fg(Self::INK)
    }

    #[must_use]
    pub fn text_secondary() -> Style {
        Self::fg(Self::INK_DIM)
    }

    #[must_use]
    pub fn text_muted() -> Style {
        Self::fg(Self::INK_FAINT)
    }

    #[must_use]
    pub fn success() -> Style {
        Self::fg(Self::GOOD)
    }

    #[must_use]
    pub fn warning() -> Style {
        Self::fg(Self::CAUTION)
    }

    #[must_use]
    pub fn danger() -> Style {
        Self::fg(Self::CRITICAL)
    }

    #[must_use]
    pub fn info() -> Style {
        Self::fg(Self::NOTICE)
    }

    #[must_use]
    pub fn reward() -> Style {
        Self::bold(Self::REWARD)
    }

    /// Highlighted scenario or row
    #[must_use]
    pub fn selected() -> Style {
        Self::bold(Self::SURFACE).bg(Self::ACCENT)
    }

    #[must_use]
    pub fn border() -> Style {
        Self::fg(Self::OUTLINE)
    }

    #[must_use]
    pub fn border_focused() -> Style {
        Self::fg(Self::ACCENT)
    }

    #[must_use]
    pub fn key_hint() -> Style {
        Self::bold(Self::ACCENT)
    }

    #[must_use]
    pub fn key_desc() -> Style {
        Self::fg(Self::INK_DIM)
    }

    #[must_use]
    pub fn user_message() -> Style {
        Self::bold(Self::ACCENT_SOFT)
    }

    #[must_use]
    pub fn risk_level(level: RiskLevel) -> Style {
        match level {
            RiskLevel::Low => Self::success(),
            RiskLevel::Moderate => Self::warning(),
            RiskLevel::High => Self::danger(),
        }
    }

    /// Gauge color for a 0-100 risk score (higher is worse).
    #[must_use]
    pub fn risk_gauge(score: u8) -> Style {
        Self::risk_level(RiskLevel::from_score(score))
    }

    #[must_use]
    pub fn alert(severity: AlertSeverity) -> Style {
        match severity {
            AlertSeverity::Moderate => Self::warning(),
            AlertSeverity::High => Self::bold(Self::CRITICAL),
        }
    }

    #[must_use]
    pub fn mood(mood: Mood) -> Style {
        match mood {
            Mood::Stressed => Self::warning(),
            Mood::Motivated => Self::success(),
            Mood::Confused => Self::info(),
            Mood::Discouraged => Self::danger(),
            Mood::Neutral => Self::text_secondary(),
        }
    }
}

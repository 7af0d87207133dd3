//! Streaks, points, levels and achievements.
//!
//! All rules take the current date explicitly so callers (and tests) control
//! the calendar.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A one-off reward for reaching a streak length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Achievement {
    pub id: &'static str,
    pub name: &'static str,
    /// Streak length required
    pub requirement: u32,
    /// Points awarded once
    pub reward: u32,
}

pub const ACHIEVEMENTS: [Achievement; 3] = [
    Achievement {
        id: "first_week",
        name: "First Week",
        requirement: 7,
        reward: 100,
    },
    Achievement {
        id: "first_month",
        name: "First Month",
        requirement: 30,
        reward: 500,
    },
    Achievement {
        id: "consistency",
        name: "Consistency Master",
        requirement: 100,
        reward: 1000,
    },
];

/// Tracked health actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthAction {
    Medication,
    Exercise,
    FoodLog,
    Checkup,
    GoalComplete,
}

impl HealthAction {
    #[must_use]
    pub fn points(&self) -> u32 {
        match self {
            Self::Medication => 10,
            Self::Exercise => 15,
            Self::FoodLog => 5,
            Self::Checkup => 25,
            Self::GoalComplete => 20,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Medication => "medication",
            Self::Exercise => "exercise",
            Self::FoodLog => "food_log",
            Self::Checkup => "checkup",
            Self::GoalComplete => "goal_complete",
        }
    }
}

/// Something worth announcing after an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GamificationEvent {
    AchievementUnlocked { name: &'static str, reward: u32 },
    LevelUp { level: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GamificationState {
    pub streak: u32,
    pub achievements: Vec<String>,
    pub points: u32,
    pub level: u32,
    pub last_action_date: Option<NaiveDate>,
}

impl Default for GamificationState {
    fn default() -> Self {
        Self {
            streak: 0,
            achievements: Vec::new(),
            points: 0,
            level: 1,
            last_action_date: None,
        }
    }
}

impl GamificationState {
    /// Record an action taken on `today`.
    ///
    /// Only the first action of a calendar day counts. The streak grows by one
    /// for every day with activity; gaps between days do not reset it.
    pub fn record_action(&mut self, action: HealthAction, today: NaiveDate) -> Vec<GamificationEvent> {
        if self.last_action_date == Some(today) {
            return Vec::new();
        }

        self.streak += 1;
        self.last_action_date = Some(today);

        let mut events = self.check_achievements();
        self.points += action.points();
        if let Some(level) = self.update_level() {
            events.push(GamificationEvent::LevelUp { level });
        }
        events
    }

    fn check_achievements(&mut self) -> Vec<GamificationEvent> {
        let mut events = Vec::new();
        for achievement in ACHIEVEMENTS.iter() {
            if self.streak >= achievement.requirement
                && !self.achievements.iter().any(|a| a == achievement.id)
            {
                self.achievements.push(achievement.id.to_string());
                self.points += achievement.reward;
                events.push(GamificationEvent::AchievementUnlocked {
                    name: achievement.name,
                    reward: achievement.reward,
                });
            }
        }
        events
    }

    fn update_level(&mut self) -> Option<u32> {
        let new_level = self.points / 100 + 1;
        if new_level > self.level {
            self.level = new_level;
            Some(new_level)
        } else {
            None
        }
    }

    /// Points still needed to reach the next level.
    #[must_use]
    pub fn points_to_next_level(&self) -> u32 {
        (self.level * 100).saturating_sub(self.points)
    }
}

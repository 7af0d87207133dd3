//! Main TUI application state machine.
//!
//! Handles:
//! - Screen navigation
//! - Input event handling
//! - Service integration

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::NaiveDate;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};

use crate::adapters::sqlite::SqliteStorage;
use crate::application::{ActionOutcome, DashboardService};
use crate::config::{AppConfig, CoachConfig, ScoringConfig};
use crate::domain::{GamificationEvent, HealthAction, SimulationParams, UserRole};

use super::ui::{
    audit::{render_audit, AuditState, Verification},
    chat::{render_chat, ChatState},
    dashboard::{render_dashboard, DashboardState},
    render_disclaimer,
    simulation::{render_simulation, SimulationState},
    StatusMessage,
};

/// Name given to the profile created on first run.
const DEFAULT_DISPLAY_NAME: &str = "Local user";

/// Current screen/view in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Dashboard,
    Chat,
    Simulation,
    Audit,
}

/// Main application state
pub struct App {
    /// Current screen
    screen: Screen,

    /// Whether the app should quit
    should_quit: bool,

    service: DashboardService<SqliteStorage>,

    /// Destination of data exports
    export_path: PathBuf,

    dashboard_state: DashboardState,
    chat_state: ChatState,
    simulation_state: SimulationState,
    audit_state: AuditState,

    /// Feedback for the last action, shown under every screen
    status: Option<StatusMessage>,
}

impl App {
    /// Create a new application instance from process configuration.
    ///
    /// # Errors
    /// Returns error if the database cannot be opened.
    pub fn new(config: &AppConfig) -> Result<Self> {
        let storage = Arc::new(SqliteStorage::new(&config.db_path)?);
        let service = DashboardService::new(
            storage,
            ScoringConfig::from_env_or_default(),
            CoachConfig::from_env_or_default(),
        )
        .with_chat_history_limit(config.chat_history_limit);

        Ok(Self::with_service(service, config.export_path.clone()))
    }

    /// Create application around a pre-built service (Composition Root pattern).
    #[must_use]
    pub fn with_service(service: DashboardService<SqliteStorage>, export_path: PathBuf) -> Self {
        Self {
            screen: Screen::Dashboard,
            should_quit: false,
            service,
            export_path,
            dashboard_state: DashboardState::default(),
            chat_state: ChatState::default(),
            simulation_state: SimulationState::default(),
            audit_state: AuditState::default(),
            status: None,
        }
    }

    /// Run the main application loop.
    ///
    /// # Errors
    /// Returns error if the profile cannot be loaded or terminal operations fail.
    pub fn run(&mut self) -> Result<()> {
        self.service
            .initialize_profile(DEFAULT_DISPLAY_NAME, UserRole::Patient)?;

        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        self.refresh_dashboard();

        let result = self.main_loop(&mut terminal);

        // Restore terminal
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        result
    }

    fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        loop {
            terminal.draw(|f| {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Min(0), Constraint::Length(3)])
                    .split(f.area());

                match self.screen {
                    Screen::Dashboard => render_dashboard(f, chunks[0], &self.dashboard_state),
                    Screen::Chat => render_chat(f, chunks[0], &self.chat_state),
                    Screen::Simulation => render_simulation(f, chunks[0], &self.simulation_state),
                    Screen::Audit => render_audit(f, chunks[0], &self.audit_state),
                }

                render_disclaimer(f, chunks[1], self.status.as_ref());
            })?;

            // Handle input (short poll to stay responsive)
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code, key.modifiers);
                    }
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        // Global quit handling
        if key == KeyCode::Char('q') && modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match self.screen {
            Screen::Dashboard => self.handle_dashboard_key(key),
            Screen::Chat => self.handle_chat_key(key),
            Screen::Simulation => self.handle_simulation_key(key),
            Screen::Audit => self.handle_audit_key(key),
        }
    }

    fn handle_dashboard_key(&mut self, key: KeyCode) {
        if self.dashboard_state.confirm_delete {
            self.dashboard_state.confirm_delete = false;
            if matches!(key, KeyCode::Char('y') | KeyCode::Char('Y')) {
                self.delete_data();
            } else {
                self.status = Some(StatusMessage::Info("Deletion cancelled".to_string()));
            }
            return;
        }

        match key {
            KeyCode::Char('c') | KeyCode::Char('C') => {
                self.load_chat();
                self.screen = Screen::Chat;
            }
            KeyCode::Char('s') | KeyCode::Char('S') => {
                self.screen = Screen::Simulation;
            }
            KeyCode::Char('l') | KeyCode::Char('L') => {
                self.load_audit();
                self.screen = Screen::Audit;
            }
            KeyCode::Char('r') | KeyCode::Char('R') => self.reassess(),
            KeyCode::Char('m') | KeyCode::Char('M') => self.log_action(HealthAction::Medication),
            KeyCode::Char('e') | KeyCode::Char('E') => self.log_action(HealthAction::Exercise),
            KeyCode::Char('f') | KeyCode::Char('F') => self.log_action(HealthAction::FoodLog),
            KeyCode::Char('k') | KeyCode::Char('K') => self.log_action(HealthAction::Checkup),
            KeyCode::Char('g') | KeyCode::Char('G') => self.log_action(HealthAction::GoalComplete),
            KeyCode::Char('x') | KeyCode::Char('X') => self.export_data(),
            KeyCode::Char('d') | KeyCode::Char('D') => {
                self.dashboard_state.confirm_delete = true;
                self.status = Some(StatusMessage::Info(
                    "Press Y to delete all local data, any other key to cancel".to_string(),
                ));
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            _ => {}
        }
    }

    fn handle_chat_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => {
                self.refresh_dashboard();
                self.screen = Screen::Dashboard;
            }
            KeyCode::Enter => self.send_chat(),
            KeyCode::Backspace => self.chat_state.delete_char(),
            KeyCode::Char(c) => self.chat_state.input_char(c),
            _ => {}
        }
    }

    fn handle_simulation_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => {
                self.screen = Screen::Dashboard;
            }
            KeyCode::Left | KeyCode::Up => self.simulation_state.prev(),
            KeyCode::Right | KeyCode::Down | KeyCode::Tab => self.simulation_state.next(),
            KeyCode::Enter => self.run_simulation(),
            _ => {}
        }
    }

    fn handle_audit_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => {
                self.screen = Screen::Dashboard;
            }
            KeyCode::Char('r') | KeyCode::Char('R') => self.load_audit(),
            KeyCode::Char('v') | KeyCode::Char('V') => self.verify_audit(),
            _ => {}
        }
    }

    fn report_error(&mut self, context: &str, e: impl std::fmt::Display) {
        tracing::error!("{}: {}", context, e);
        self.status = Some(StatusMessage::Error(format!("{context}: {e}")));
    }

    fn refresh_dashboard(&mut self) {
        match self.service.profile() {
            Ok(profile) => self.dashboard_state.display_name = profile.display_name,
            Err(e) => self.report_error("Failed to load profile", e),
        }
        // A profile with no stored snapshot is scored on first display.
        let latest = self
            .service
            .latest_assessment()
            .map_err(anyhow::Error::from)
            .and_then(|latest| match latest {
                Some(snapshot) => Ok(snapshot.assessment),
                None => self.service.assess_risk().map_err(anyhow::Error::from),
            });
        match latest {
            Ok(assessment) => self.dashboard_state.assessment = Some(assessment),
            Err(e) => self.report_error("Failed to load assessment", e),
        }
        match self.service.gamification() {
            Ok(state) => self.dashboard_state.gamification = state,
            Err(e) => self.report_error("Failed to load progress", e),
        }
    }

    fn reassess(&mut self) {
        match self.service.assess_risk() {
            Ok(assessment) => {
                self.status = Some(StatusMessage::Success(format!(
                    "Risk reassessed: {}/100 ({})",
                    assessment.overall_risk,
                    assessment.risk_level()
                )));
                self.dashboard_state.assessment = Some(assessment);
            }
            Err(e) => self.report_error("Risk assessment failed", e),
        }
    }

    fn log_action(&mut self, action: HealthAction) {
        self.log_action_on(action, chrono::Local::now().date_naive());
    }

    fn log_action_on(&mut self, action: HealthAction, today: NaiveDate) {
        match self.service.log_action(action, today) {
            Ok(outcome) => {
                self.status = Some(StatusMessage::Success(describe_outcome(action, &outcome)));
                self.dashboard_state.gamification = outcome.state;
            }
            Err(e) => self.report_error("Failed to log action", e),
        }
    }

    fn export_data(&mut self) {
        let result = self
            .service
            .export_user_data()
            .map_err(anyhow::Error::from)
            .and_then(|json| std::fs::write(&self.export_path, json).map_err(anyhow::Error::from));
        match result {
            Ok(()) => {
                self.status = Some(StatusMessage::Success(format!(
                    "Data exported to {}",
                    self.export_path.display()
                )));
            }
            Err(e) => self.report_error("Export failed", e),
        }
    }

    fn delete_data(&mut self) {
        let result = self.service.delete_user_data().and_then(|()| {
            self.service
                .initialize_profile(DEFAULT_DISPLAY_NAME, UserRole::Patient)
        });
        match result {
            Ok(_) => {
                self.chat_state = ChatState::default();
                self.audit_state = AuditState::default();
                self.simulation_state = SimulationState::default();
                self.dashboard_state = DashboardState::default();
                self.refresh_dashboard();
                self.status = Some(StatusMessage::Success("All local data deleted".to_string()));
            }
            Err(e) => self.report_error("Delete failed", e),
        }
    }

    fn load_chat(&mut self) {
        match self.service.chat_history() {
            Ok(history) => self.chat_state.history = history,
            Err(e) => self.chat_state.error = Some(e.to_string()),
        }
    }

    fn send_chat(&mut self) {
        let Some(message) = self.chat_state.take_input() else {
            return;
        };
        match self.service.send_chat_message(&message) {
            Ok(reply) => {
                self.chat_state.last_reply = Some(reply);
                self.load_chat();
            }
            Err(e) => {
                tracing::error!("Chat failed: {}", e);
                self.chat_state.error = Some(format!("Message not sent: {e}"));
            }
        }
    }

    fn run_simulation(&mut self) {
        let params = SimulationParams::defaults(self.simulation_state.selected_kind());
        match self.service.run_simulation(params) {
            Ok(outcome) => {
                self.simulation_state.outcome = Some(outcome);
                self.simulation_state.error = None;
            }
            Err(e) => self.simulation_state.error = Some(e.to_string()),
        }
    }

    fn load_audit(&mut self) {
        match self.service.audit_log() {
            Ok(entries) => self.audit_state.entries = entries,
            Err(e) => self.report_error("Failed to load audit log", e),
        }
        self.audit_state.verification = None;
    }

    fn verify_audit(&mut self) {
        self.audit_state.verification = Some(match self.service.verify_audit_chain() {
            Ok(entries) => Verification::Valid { entries },
            Err(e) => Verification::Invalid {
                reason: e.to_string(),
            },
        });
    }
}

fn describe_outcome(action: HealthAction, outcome: &ActionOutcome) -> String {
    if !outcome.counted {
        return format!("Logged {}; today already counts toward your streak", action.as_str());
    }

    let mut msg = format!(
        "+{} points for {} (streak {})",
        action.points(),
        action.as_str(),
        outcome.state.streak
    );
    for event in &outcome.events {
        match event {
            GamificationEvent::AchievementUnlocked { name, reward } => {
                msg.push_str(&format!(" | Achievement: {name} (+{reward})"));
            }
            GamificationEvent::LevelUp { level } => {
                msg.push_str(&format!(" | Level up: {level}"));
            }
        }
    }
    msg
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn app() -> App {
        let storage = Arc::new(SqliteStorage::in_memory().expect("Should open in-memory db"));
        let service = DashboardService::with_rng(
            storage,
            ScoringConfig::default(),
            CoachConfig::default(),
            ChaCha20Rng::seed_from_u64(11),
        );
        service
            .initialize_profile(DEFAULT_DISPLAY_NAME, UserRole::Patient)
            .expect("Should create profile");
        let mut app = App::with_service(service, std::env::temp_dir().join("healthai-app-test.json"));
        app.refresh_dashboard();
        app
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(KeyCode::Char(c), KeyModifiers::NONE);
        }
    }

    #[test]
    fn test_navigation_and_back() {
        let mut app = app();
        app.handle_key(KeyCode::Char('s'), KeyModifiers::NONE);
        assert_eq!(app.screen, Screen::Simulation);
        app.handle_key(KeyCode::Esc, KeyModifiers::NONE);
        assert_eq!(app.screen, Screen::Dashboard);
        app.handle_key(KeyCode::Char('l'), KeyModifiers::NONE);
        assert_eq!(app.screen, Screen::Audit);
        assert!(!app.audit_state.entries.is_empty());
    }

    #[test]
    fn test_ctrl_q_quits_from_chat() {
        let mut app = app();
        app.handle_key(KeyCode::Char('c'), KeyModifiers::NONE);
        app.handle_key(KeyCode::Char('q'), KeyModifiers::CONTROL);
        assert!(app.should_quit);
    }

    #[test]
    fn test_plain_q_is_typed_in_chat() {
        let mut app = app();
        app.handle_key(KeyCode::Char('c'), KeyModifiers::NONE);
        type_text(&mut app, "q");
        assert!(!app.should_quit);
        assert_eq!(app.chat_state.input, "q");
    }

    #[test]
    fn test_chat_roundtrip() {
        let mut app = app();
        app.handle_key(KeyCode::Char('c'), KeyModifiers::NONE);
        type_text(&mut app, "I feel worried today");
        app.handle_key(KeyCode::Enter, KeyModifiers::NONE);

        assert!(app.chat_state.input.is_empty());
        assert_eq!(app.chat_state.history.len(), 1);
        let reply = app.chat_state.last_reply.as_ref().expect("Should have reply");
        assert_eq!(reply.mood, crate::domain::Mood::Stressed);
    }

    #[test]
    fn test_first_load_assesses_risk() {
        let app = app();
        let assessment = app
            .dashboard_state
            .assessment
            .as_ref()
            .expect("Should assess on first load");
        assert_eq!(assessment.overall_risk, 46);
        let stored = app
            .service
            .latest_assessment()
            .expect("Should read snapshot")
            .expect("Should store first assessment");
        assert_eq!(stored.assessment.overall_risk, 46);
    }

    #[test]
    fn test_manual_refresh_reassesses() {
        let mut app = app();
        app.dashboard_state.assessment = None;
        app.handle_key(KeyCode::Char('r'), KeyModifiers::NONE);
        let assessment = app.dashboard_state.assessment.as_ref().expect("Should assess");
        assert_eq!(assessment.overall_risk, 46);
        assert!(matches!(&app.status, Some(StatusMessage::Success(m)) if m.contains("46/100")));
    }

    #[test]
    fn test_second_action_same_day_not_counted() {
        let mut app = app();
        let day = NaiveDate::from_ymd_opt(2026, 5, 1).expect("Valid date");
        app.log_action_on(HealthAction::Exercise, day);
        app.log_action_on(HealthAction::Checkup, day);

        assert_eq!(app.dashboard_state.gamification.points, 15);
        assert!(matches!(&app.status, Some(StatusMessage::Success(m)) if m.contains("already counts")));
    }

    #[test]
    fn test_goal_key_logs_goal_complete() {
        let mut app = app();
        app.handle_key(KeyCode::Char('g'), KeyModifiers::NONE);
        assert_eq!(app.dashboard_state.gamification.points, 20);
        assert_eq!(app.dashboard_state.gamification.streak, 1);
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let mut app = app();
        app.handle_key(KeyCode::Char('e'), KeyModifiers::NONE);
        assert_eq!(app.dashboard_state.gamification.streak, 1);

        app.handle_key(KeyCode::Char('D'), KeyModifiers::NONE);
        app.handle_key(KeyCode::Char('n'), KeyModifiers::NONE);
        assert_eq!(app.dashboard_state.gamification.streak, 1);

        app.handle_key(KeyCode::Char('D'), KeyModifiers::NONE);
        app.handle_key(KeyCode::Char('y'), KeyModifiers::NONE);
        assert_eq!(app.dashboard_state.gamification.streak, 0);
        assert_eq!(app.dashboard_state.display_name, DEFAULT_DISPLAY_NAME);
    }

    #[test]
    fn test_audit_verification() {
        let mut app = app();
        app.handle_key(KeyCode::Char('l'), KeyModifiers::NONE);
        app.handle_key(KeyCode::Char('v'), KeyModifiers::NONE);
        assert!(matches!(
            app.audit_state.verification,
            Some(Verification::Valid { .. })
        ));
    }
}

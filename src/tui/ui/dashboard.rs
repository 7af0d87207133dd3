//! Dashboard view: Risk overview and progress.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Gauge, Paragraph, Wrap},
    Frame,
};

use super::{panel, render_footer, render_header};
use crate::domain::{GamificationState, RiskAssessment, RiskLevel};
use crate::tui::styles::HealthTheme;

/// Dashboard state for rendering.
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    pub display_name: String,
    pub assessment: Option<RiskAssessment>,
    pub gamification: GamificationState,
    /// Waiting for the user to confirm data deletion
    pub confirm_delete: bool,
}

/// Render the main dashboard view.
pub fn render_dashboard(f: &mut Frame, area: Rect, state: &DashboardState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Main content
            Constraint::Length(2), // Footer
        ])
        .split(area);

    let subtitle = format!("Health overview for {}", state.display_name);
    render_header(f, chunks[0], "HealthAI", &subtitle);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(chunks[1]);

    render_risk_panel(f, columns[0], state.assessment.as_ref());
    render_insights(f, columns[1], state);

    if state.confirm_delete {
        render_footer(f, chunks[2], &[("Y", "Confirm delete ALL data"), ("Any", "Cancel")]);
    } else {
        render_footer(
            f,
            chunks[2],
            &[
                ("C", "Coach"),
                ("S", "Simulate"),
                ("L", "Audit"),
                ("R", "Refresh"),
                ("M/E/F/K/G", "Log med/exercise/food/checkup/goal"),
                ("X", "Export"),
                ("D", "Delete"),
                ("Q", "Quit"),
            ],
        );
    }
}

fn render_risk_panel(f: &mut Frame, area: Rect, assessment: Option<&RiskAssessment>) {
    let block = panel("Risk Assessment");

    let Some(assessment) = assessment else {
        let empty = Paragraph::new(Line::from(vec![Span::styled(
            "No assessment yet. Press [R] to compute one.",
            HealthTheme::text_muted(),
        )]))
        .block(block);
        f.render_widget(empty, area);
        return;
    };

    let inner = block.inner(area);
    f.render_widget(block, area);

    let mut constraints = vec![Constraint::Length(3), Constraint::Length(2)];
    constraints.extend(std::iter::repeat(Constraint::Length(2)).take(5));
    constraints.push(Constraint::Min(0));

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .margin(1)
        .split(inner);

    let level = assessment.risk_level();
    let overall = Gauge::default()
        .block(panel("Overall"))
        .gauge_style(HealthTheme::risk_level(level))
        .percent(u16::from(assessment.overall_risk))
        .label(format!("{}/100  {}", assessment.overall_risk, level));
    f.render_widget(overall, rows[0]);

    let horizon = Paragraph::new(Line::from(vec![
        Span::styled(level.description(), HealthTheme::risk_level(level)),
        Span::styled(
            format!("  ({}-day horizon)", assessment.time_horizon_days),
            HealthTheme::text_muted(),
        ),
    ]));
    f.render_widget(horizon, rows[1]);

    for (i, (factor, score)) in assessment.risk_factors.iter().enumerate() {
        let band = RiskLevel::from_score(score);
        let gauge = Gauge::default()
            .gauge_style(HealthTheme::risk_gauge(score))
            .percent(u16::from(score))
            .label(format!("{:<22}{score:>3}  {band}", factor.label()));
        f.render_widget(gauge, rows[2 + i]);
    }
}

fn render_insights(f: &mut Frame, area: Rect, state: &DashboardState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6),      // Alerts
            Constraint::Percentage(50), // Recommendations
            Constraint::Min(6),         // Progress
        ])
        .split(area);

    let mut alert_lines = Vec::new();
    let mut rec_lines = Vec::new();
    if let Some(assessment) = &state.assessment {
        for alert in &assessment.alerts {
            alert_lines.push(Line::from(vec![
                Span::styled(format!("[{}] ", alert.severity), HealthTheme::alert(alert.severity)),
                Span::styled(alert.message.clone(), HealthTheme::text()),
            ]));
        }
        for rec in &assessment.recommendations {
            rec_lines.push(Line::from(vec![
                Span::styled("• ", HealthTheme::key_hint()),
                Span::styled(rec.clone(), HealthTheme::text()),
            ]));
        }
    }
    if alert_lines.is_empty() {
        alert_lines.push(Line::from(Span::styled("No active alerts", HealthTheme::success())));
    }
    if rec_lines.is_empty() {
        rec_lines.push(Line::from(Span::styled(
            "Keep up your current routine.",
            HealthTheme::text_muted(),
        )));
    }

    f.render_widget(
        Paragraph::new(alert_lines)
            .block(panel("Alerts"))
            .wrap(Wrap { trim: true }),
        chunks[0],
    );
    f.render_widget(
        Paragraph::new(rec_lines)
            .block(panel("Recommendations"))
            .wrap(Wrap { trim: true }),
        chunks[1],
    );

    render_progress(f, chunks[2], &state.gamification);
}

fn render_progress(f: &mut Frame, area: Rect, g: &GamificationState) {
    let lines = vec![
        Line::from(vec![
            Span::styled("Streak: ", HealthTheme::text_secondary()),
            Span::styled(format!("{} day(s)", g.streak), HealthTheme::text()),
            Span::styled("   Level: ", HealthTheme::text_secondary()),
            Span::styled(g.level.to_string(), HealthTheme::reward()),
        ]),
        Line::from(vec![
            Span::styled("Points: ", HealthTheme::text_secondary()),
            Span::styled(g.points.to_string(), HealthTheme::reward()),
            Span::styled(
                format!("   ({} to next level)", g.points_to_next_level()),
                HealthTheme::text_muted(),
            ),
        ]),
        Line::from(vec![
            Span::styled("Achievements: ", HealthTheme::text_secondary()),
            Span::styled(
                if g.achievements.is_empty() {
                    "none yet".to_string()
                } else {
                    g.achievements.join(", ")
                },
                HealthTheme::text(),
            ),
        ]),
    ];

    f.render_widget(Paragraph::new(lines).block(panel("Progress")), area);
}

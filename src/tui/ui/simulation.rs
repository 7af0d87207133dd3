//! Simulation view: Digital-twin what-if projections.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Gauge, Paragraph, Wrap},
    Frame,
};

use super::{panel, render_footer, render_header};
use crate::domain::{SimulationKind, SimulationOutcome};
use crate::tui::styles::HealthTheme;

#[derive(Debug, Clone, Default)]
pub struct SimulationState {
    /// Index into `SimulationKind::ALL`
    pub selected: usize,
    pub outcome: Option<SimulationOutcome>,
    pub error: Option<String>,
}

impl SimulationState {
    #[must_use]
    pub fn selected_kind(&self) -> SimulationKind {
        SimulationKind::ALL[self.selected % SimulationKind::ALL.len()]
    }

    pub fn next(&mut self) {
        self.selected = (self.selected + 1) % SimulationKind::ALL.len();
        self.outcome = None;
    }

    pub fn prev(&mut self) {
        let n = SimulationKind::ALL.len();
        self.selected = (self.selected + n - 1) % n;
        self.outcome = None;
    }
}

pub fn render_simulation(f: &mut Frame, area: Rect, state: &SimulationState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(3), // Kind tabs
            Constraint::Min(0),    // Outcome
            Constraint::Length(2), // Footer
        ])
        .split(area);

    render_header(f, chunks[0], "Digital Twin", "Project the effect of a change");

    let mut tabs = Vec::new();
    for (i, kind) in SimulationKind::ALL.iter().enumerate() {
        let style = if i == state.selected {
            HealthTheme::selected()
        } else {
            HealthTheme::text_secondary()
        };
        tabs.push(Span::styled(format!(" {} ", kind.title()), style));
        tabs.push(Span::styled(" │ ", HealthTheme::text_muted()));
    }
    tabs.pop();
    f.render_widget(Paragraph::new(Line::from(tabs)).block(panel("Scenario")), chunks[1]);

    match (&state.outcome, &state.error) {
        (_, Some(err)) => {
            let p = Paragraph::new(Line::from(Span::styled(err.clone(), HealthTheme::danger())))
                .block(panel("Error"));
            f.render_widget(p, chunks[2]);
        }
        (Some(outcome), None) => render_outcome(f, chunks[2], outcome),
        (None, None) => {
            let p = Paragraph::new(Line::from(Span::styled(
                "Press [Enter] to run the selected scenario with default parameters.",
                HealthTheme::text_muted(),
            )))
            .block(panel("Projection"));
            f.render_widget(p, chunks[2]);
        }
    }

    render_footer(
        f,
        chunks[3],
        &[("←/→", "Scenario"), ("Enter", "Run"), ("Esc", "Back")],
    );
}

fn render_outcome(f: &mut Frame, area: Rect, outcome: &SimulationOutcome) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Timeline: ", HealthTheme::text_secondary()),
            Span::styled(outcome.timeline.clone(), HealthTheme::text()),
        ]),
        Line::from(""),
    ];
    for (label, value) in outcome.projection.metrics() {
        let style = if value < 0.0 {
            HealthTheme::success()
        } else {
            HealthTheme::text()
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{label:<24}"), HealthTheme::text_secondary()),
            Span::styled(format!("{value:>8.1}"), style),
        ]));
    }

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(columns[0]);

    f.render_widget(
        Paragraph::new(lines).block(panel(outcome.kind.title())),
        left[0],
    );

    let confidence = Gauge::default()
        .block(panel("Confidence"))
        .gauge_style(HealthTheme::info())
        .percent(u16::from(outcome.confidence.min(100)))
        .label(format!("{}%", outcome.confidence));
    f.render_widget(confidence, left[1]);

    let recs: Vec<Line> = outcome
        .recommendations
        .iter()
        .map(|r| {
            Line::from(vec![
                Span::styled("• ", HealthTheme::key_hint()),
                Span::styled(r.clone(), HealthTheme::text()),
            ])
        })
        .collect();
    f.render_widget(
        Paragraph::new(recs)
            .block(panel("Recommendations"))
            .wrap(Wrap { trim: true }),
        columns[1],
    );
}

//! Audit view: Hash-chained activity log.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::{panel, render_footer, render_header};
use crate::domain::AuditEntry;
use crate::tui::styles::HealthTheme;

/// Result of the last chain verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verification {
    Valid { entries: usize },
    Invalid { reason: String },
}

#[derive(Debug, Clone, Default)]
pub struct AuditState {
    pub entries: Vec<AuditEntry>,
    pub verification: Option<Verification>,
}

pub fn render_audit(f: &mut Frame, area: Rect, state: &AuditState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(3), // Verification
            Constraint::Min(0),    // Entries
            Constraint::Length(2), // Footer
        ])
        .split(area);

    render_header(f, chunks[0], "Audit Log", "Tamper-evident activity trail");

    let status = match &state.verification {
        None => Line::from(Span::styled(
            "Not verified. Press [V] to verify the chain.",
            HealthTheme::text_muted(),
        )),
        Some(Verification::Valid { entries }) => Line::from(Span::styled(
            format!("✓ Chain intact ({entries} entries)"),
            HealthTheme::success(),
        )),
        Some(Verification::Invalid { reason }) => Line::from(Span::styled(
            format!("✗ Chain broken: {reason}"),
            HealthTheme::danger(),
        )),
    };
    f.render_widget(Paragraph::new(status).block(panel("Integrity")), chunks[1]);

    let mut lines = vec![Line::from(Span::styled(
        format!("{:<6}{:<21}{:<17}{:<14}{}", "#", "Time (UTC)", "Action", "Hash", "Details"),
        HealthTheme::subtitle(),
    ))];

    // Newest first
    for e in state.entries.iter().rev() {
        lines.push(Line::from(vec![
            Span::styled(format!("{:<6}", e.sequence), HealthTheme::text_muted()),
            Span::styled(
                format!("{:<21}", e.recorded_at.format("%Y-%m-%d %H:%M:%S").to_string()),
                HealthTheme::text_secondary(),
            ),
            Span::styled(format!("{:<17}", e.action.as_str()), HealthTheme::text()),
            Span::styled(format!("{:<14}", e.short_hash()), HealthTheme::text_muted()),
            Span::styled(e.payload.clone(), HealthTheme::text()),
        ]));
    }

    f.render_widget(Paragraph::new(lines).block(panel("Entries")), chunks[2]);

    render_footer(
        f,
        chunks[3],
        &[("V", "Verify"), ("R", "Reload"), ("Esc", "Back")],
    );
}

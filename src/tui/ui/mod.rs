//! UI module: View components for the TUI.

pub mod audit;
pub mod chat;
pub mod dashboard;
pub mod simulation;

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::tui::styles::HealthTheme;

/// Transient message shown under the current screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusMessage {
    Info(String),
    Success(String),
    Error(String),
}

pub fn render_disclaimer(f: &mut Frame, area: Rect, status: Option<&StatusMessage>) {
    let mut text = vec![Line::from(vec![Span::styled(
        "DISCLAIMER: Scores and projections are indicative estimates and do not replace professional medical advice.",
        HealthTheme::text_muted(),
    )])];

    if let Some(status) = status {
        let (msg, style) = match status {
            StatusMessage::Info(m) => (m, HealthTheme::info()),
            StatusMessage::Success(m) => (m, HealthTheme::success()),
            StatusMessage::Error(m) => (m, HealthTheme::danger()),
        };
        text.push(Line::from(vec![Span::styled(msg.clone(), style)]));
    }

    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(HealthTheme::border());

    let p = Paragraph::new(text).block(block).wrap(Wrap { trim: true });

    f.render_widget(p, area);
}

/// Title bar shared by all screens.
pub(crate) fn render_header(f: &mut Frame, area: Rect, title: &str, subtitle: &str) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", HealthTheme::text()),
        Span::styled(title.to_string(), HealthTheme::title()),
        Span::styled(" │ ", HealthTheme::text_muted()),
        Span::styled(subtitle.to_string(), HealthTheme::text_secondary()),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(HealthTheme::border()),
    );

    f.render_widget(header, area);
}

/// One line of `[key] description` pairs.
pub(crate) fn key_hints(hints: &[(&str, &str)]) -> Line<'static> {
    let mut spans = Vec::with_capacity(hints.len() * 2);
    for (key, desc) in hints {
        spans.push(Span::styled(format!("[{key}] "), HealthTheme::key_hint()));
        spans.push(Span::styled(format!("{desc}  "), HealthTheme::key_desc()));
    }
    Line::from(spans)
}

pub(crate) fn render_footer(f: &mut Frame, area: Rect, hints: &[(&str, &str)]) {
    let footer = Paragraph::new(key_hints(hints)).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(HealthTheme::border()),
    );
    f.render_widget(footer, area);
}

/// Bordered block with a styled title.
pub(crate) fn panel(title: &str) -> Block<'static> {
    Block::default()
        .title(Span::styled(format!(" {title} "), HealthTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(HealthTheme::border())
}

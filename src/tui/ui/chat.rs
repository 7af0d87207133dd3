//! Chat view: Mood-adaptive coaching conversation.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

use super::{panel, render_footer, render_header};
use crate::domain::{ChatTurn, CoachReply};
use crate::tui::styles::HealthTheme;

/// Longest message the input box accepts.
pub const MAX_INPUT_CHARS: usize = 500;

#[derive(Debug, Clone, Default)]
pub struct ChatState {
    pub input: String,
    pub history: Vec<ChatTurn>,
    /// Most recent reply, for the suggestion panel
    pub last_reply: Option<CoachReply>,
    pub error: Option<String>,
}

impl ChatState {
    pub fn input_char(&mut self, c: char) {
        if self.input.chars().count() < MAX_INPUT_CHARS {
            self.input.push(c);
        }
        self.error = None;
    }

    pub fn delete_char(&mut self) {
        self.input.pop();
    }

    /// Take the pending message, leaving the input empty.
    ///
    /// Returns `None` for blank input.
    pub fn take_input(&mut self) -> Option<String> {
        let message = std::mem::take(&mut self.input);
        let trimmed = message.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}

pub fn render_chat(f: &mut Frame, area: Rect, state: &ChatState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Conversation + side panel
            Constraint::Length(3), // Input
            Constraint::Length(2), // Footer
        ])
        .split(area);

    render_header(f, chunks[0], "AI Health Coach", "Tell me how you are doing");

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(chunks[1]);

    render_conversation(f, columns[0], &state.history);
    render_suggestions(f, columns[1], state.last_reply.as_ref());

    let input_text = match &state.error {
        Some(err) => Line::from(Span::styled(err.clone(), HealthTheme::danger())),
        None => Line::from(vec![
            Span::styled("> ", HealthTheme::key_hint()),
            Span::styled(state.input.clone(), HealthTheme::text()),
            Span::styled("█", HealthTheme::key_hint()),
        ]),
    };
    let input = Paragraph::new(input_text).block(
        panel("Message").border_style(HealthTheme::border_focused()),
    );
    f.render_widget(input, chunks[2]);

    render_footer(f, chunks[3], &[("Enter", "Send"), ("Esc", "Back")]);
}

fn render_conversation(f: &mut Frame, area: Rect, history: &[ChatTurn]) {
    let mut lines = Vec::new();
    if history.is_empty() {
        lines.push(Line::from(Span::styled(
            "No messages yet. Ask about blood sugar, exercise, diet or medication.",
            HealthTheme::text_muted(),
        )));
    }
    for turn in history {
        lines.push(Line::from(vec![
            Span::styled("You: ", HealthTheme::user_message()),
            Span::styled(turn.user_text.clone(), HealthTheme::text()),
        ]));
        lines.push(Line::from(vec![
            Span::styled(format!("Coach ({}): ", turn.mood), HealthTheme::mood(turn.mood)),
            Span::styled(turn.assistant_text.clone(), HealthTheme::text_secondary()),
        ]));
        lines.push(Line::from(""));
    }

    // Keep the newest lines in view
    let visible = area.height.saturating_sub(2) as usize;
    let skip = lines.len().saturating_sub(visible);
    let lines: Vec<Line> = lines.into_iter().skip(skip).collect();

    f.render_widget(
        Paragraph::new(lines)
            .block(panel("Conversation"))
            .wrap(Wrap { trim: true }),
        area,
    );
}

fn render_suggestions(f: &mut Frame, area: Rect, reply: Option<&CoachReply>) {
    let mut lines = Vec::new();
    match reply {
        None => lines.push(Line::from(Span::styled(
            "Suggestions appear after your first message.",
            HealthTheme::text_muted(),
        ))),
        Some(reply) => {
            lines.push(Line::from(vec![
                Span::styled("Mood: ", HealthTheme::text_secondary()),
                Span::styled(reply.mood.to_string(), HealthTheme::mood(reply.mood)),
            ]));
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled("Try this", HealthTheme::subtitle())));
            for s in &reply.suggestions {
                lines.push(Line::from(vec![
                    Span::styled("• ", HealthTheme::key_hint()),
                    Span::styled(s.clone(), HealthTheme::text()),
                ]));
            }
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled("Next steps", HealthTheme::subtitle())));
            for a in &reply.suggested_actions {
                lines.push(Line::from(vec![
                    Span::styled("→ ", HealthTheme::key_hint()),
                    Span::styled(a.clone(), HealthTheme::text()),
                ]));
            }
        }
    }

    f.render_widget(
        Paragraph::new(lines)
            .block(panel("Support"))
            .wrap(Wrap { trim: true }),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_input_trims_and_clears() {
        let mut state = ChatState {
            input: "  hello  ".to_string(),
            ..Default::default()
        };
        assert_eq!(state.take_input().as_deref(), Some("hello"));
        assert!(state.input.is_empty());
    }

    #[test]
    fn test_blank_input_is_rejected() {
        let mut state = ChatState {
            input: "   ".to_string(),
            ..Default::default()
        };
        assert!(state.take_input().is_none());
    }

    #[test]
    fn test_input_is_capped() {
        let mut state = ChatState::default();
        for _ in 0..MAX_INPUT_CHARS + 10 {
            state.input_char('a');
        }
        assert_eq!(state.input.len(), MAX_INPUT_CHARS);
        state.delete_char();
        assert_eq!(state.input.len(), MAX_INPUT_CHARS - 1);
    }
}

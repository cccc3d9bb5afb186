//! Chat with the blog assistant

use ratatui::{prelude::*, widgets::*};
use unicode_width::UnicodeWidthStr;

use crate::{
    core::state::AppState,
    model::assistant::{ChatMessage, Role},
    presentation::widgets::input_line::InputLine,
};

#[derive(Debug, Clone, Default)]
pub struct AssistantComponent;

impl AssistantComponent {
    pub fn view(&self, state: &AppState, frame: &mut Frame, area: Rect) {
        frame.render_widget(Clear, area);
        let [log_area, input_area] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(3)]).areas(area);

        let block = Block::bordered()
            .title(" Assistant ")
            .title_bottom(" Enter send | Esc back ");
        let inner = block.inner(log_area);
        frame.render_widget(block, log_area);

        let assistant = &state.assistant;
        let mut lines = Vec::new();
        for message in visible_messages(assistant.messages(), inner.width, inner.height) {
            lines.extend(message_lines(message));
        }
        if assistant.is_pending() {
            lines.push(Line::styled(
                "Thinking...",
                Style::default().fg(Color::Gray).italic(),
            ));
        }
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);

        let input = InputLine::new(assistant.input(), " Ask ").placeholder("Ask about the blog");
        frame.set_cursor_position(input.cursor_position(input_area));
        frame.render_widget(input, input_area);
    }
}

fn message_lines(message: &ChatMessage) -> Vec<Line<'_>> {
    let (label, style) = match message.role {
        Role::User => ("You", Style::default().fg(Color::Cyan).bold()),
        Role::Assistant => ("Assistant", Style::default().fg(Color::Green).bold()),
        Role::Error => ("Error", Style::default().fg(Color::Red).bold()),
    };
    let mut header = vec![Span::styled(label, style)];
    if let Some(seconds) = message.processing_time {
        header.push(Span::styled(
            format!(" ({seconds:.1}s)"),
            Style::default().fg(Color::DarkGray),
        ));
    }
    let mut lines = vec![Line::from(header)];
    lines.extend(message.content.lines().map(Line::raw));
    lines
}

/// Rows `message` takes when wrapped to `width` columns
fn wrapped_height(message: &ChatMessage, width: u16) -> usize {
    let width = usize::from(width.max(1));
    1 + message
        .content
        .lines()
        .map(|line| line.width().div_ceil(width).max(1))
        .sum::<usize>()
}

/// The newest messages that fit into `height` rows, oldest first
fn visible_messages(messages: &[ChatMessage], width: u16, height: u16) -> &[ChatMessage] {
    let mut used = 1; // "Thinking..."
    let mut start = messages.len();
    while start > 0 {
        let needed = wrapped_height(&messages[start - 1], width);
        if used + needed > usize::from(height) && start < messages.len() {
            break;
        }
        used += needed;
        start -= 1;
    }
    &messages[start..]
}

use ratatui::{prelude::*, widgets::*};
use unicode_width::UnicodeWidthStr;

use crate::model::line_input::LineInput;

/// A bordered single-line input showing the tail of the text when it does not fit
#[derive(Clone, Debug)]
pub struct InputLine<'a> {
    input: &'a LineInput,
    title: &'a str,
    placeholder: &'a str,
}

impl<'a> InputLine<'a> {
    pub fn new(input: &'a LineInput, title: &'a str) -> Self {
        Self {
            input,
            title,
            placeholder: "",
        }
    }

    pub fn placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = placeholder;
        self
    }

    /// Columns skipped so that the cursor stays inside `inner_width`
    fn scroll(&self, inner_width: u16) -> usize {
        let before_cursor: String = self.input.text().chars().take(self.input.cursor()).collect();
        before_cursor
            .width()
            .saturating_sub(inner_width.saturating_sub(1) as usize)
    }

    /// Terminal position of the cursor when rendered into `area`
    pub fn cursor_position(&self, area: Rect) -> Position {
        let inner = Block::bordered().inner(area);
        let before_cursor: String = self.input.text().chars().take(self.input.cursor()).collect();
        let column = before_cursor.width().saturating_sub(self.scroll(inner.width));
        Position::new(
            inner.x + (column as u16).min(inner.width.saturating_sub(1)),
            inner.y,
        )
    }
}

impl Widget for InputLine<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered().title(self.title);
        let inner = block.inner(area);
        let line = if self.input.text().is_empty() {
            Line::styled(self.placeholder, Style::default().fg(Color::DarkGray))
        } else {
            Line::raw(self.input.text())
        };
        Paragraph::new(line)
            .block(block)
            .scroll((0, self.scroll(inner.width) as u16))
            .render(area, buf);
    }
}

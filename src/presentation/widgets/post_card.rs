use ratatui::{prelude::*, widgets::*};

use crate::domain::{
    post::Post,
    text::{preview, truncate_width},
};

/// Characters of content shown under the title
pub const PREVIEW_CHARS: usize = 100;

/// One post in the feed: title, metadata, a content preview and a separator
#[derive(Clone, Debug)]
pub struct PostCard<'a> {
    pub post: &'a Post,
    pub highlight: bool,
}

impl<'a> PostCard<'a> {
    pub fn new(post: &'a Post) -> Self {
        Self {
            post,
            highlight: false,
        }
    }

    pub fn highlight(mut self, highlight: bool) -> Self {
        self.highlight = highlight;
        self
    }

    pub fn meta(&self) -> String {
        let mut parts = vec![self.post.visibility.to_string()];
        if let Some(created_at) = self.post.created_at() {
            parts.push(created_at.format("%Y-%m-%d %H:%M").to_string());
        }
        if !self.post.tags.is_empty() {
            parts.push(format!("#{}", self.post.tags.join(" #")));
        }
        parts.join(" | ")
    }
}

impl Widget for PostCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let width = area.width as usize;
        let title_style = if self.highlight {
            Style::default().fg(Color::Yellow).bold().reversed()
        } else {
            Style::default().bold()
        };

        let lines = vec![
            Line::from(vec![
                Span::styled(format!("#{} ", self.post.id), Style::default().fg(Color::DarkGray)),
                Span::styled(
                    truncate_width(&self.post.title, width.saturating_sub(8)),
                    title_style,
                ),
            ]),
            Line::styled(
                truncate_width(&self.meta(), width),
                Style::default().fg(Color::Gray),
            ),
            Line::raw(truncate_width(
                &preview(&self.post.content, PREVIEW_CHARS),
                width,
            )),
            Line::styled("─".repeat(width), Style::default().fg(Color::DarkGray)),
        ];
        Paragraph::new(lines).render(area, buf);
    }
}

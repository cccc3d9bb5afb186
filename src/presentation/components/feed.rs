//! Feed list component
//!
//! Draws the posts from the first visible row down, followed by a footer line
//! describing the pagination state.

use ratatui::{prelude::*, widgets::*};

use crate::{core::state::AppState, presentation::widgets::post_card::PostCard};

#[derive(Debug, Clone, Default)]
pub struct FeedComponent;

impl FeedComponent {
    pub fn view(&self, state: &AppState, frame: &mut Frame, area: Rect) {
        frame.render_widget(Clear, area);
        if state.feed.is_empty() {
            let placeholder = Paragraph::new(self.empty_text(state))
                .style(Style::default().fg(Color::Gray))
                .alignment(Alignment::Center);
            frame.render_widget(placeholder, area);
            return;
        }

        let row_height = state.viewport.row_height();
        let bottom = area.bottom();
        let mut y = area.y;
        let mut index = state.viewport.first_visible();
        while y < bottom {
            let Some(post) = state.feed.get(index) else {
                break;
            };
            let height = row_height.min(bottom - y);
            let card = PostCard::new(post).highlight(state.viewport.selected() == Some(index));
            frame.render_widget(card, Rect::new(area.x, y, area.width, height));
            y += height;
            index += 1;
        }

        if y < bottom {
            if let Some((text, style)) = self.footer(state) {
                let footer = Paragraph::new(Line::styled(text, style));
                frame.render_widget(footer, Rect::new(area.x, y, area.width, 1));
            }
        }
    }

    fn empty_text(&self, state: &AppState) -> String {
        if state.feed.is_loading() {
            "Loading posts...".into()
        } else if let Some(error) = state.feed.error() {
            format!("Failed to load: {error} (press n to retry)")
        } else if state.feed.has_more() {
            "Press n to load posts".into()
        } else {
            format!("No posts ({})", state.feed.filter())
        }
    }

    /// Line below the last post, `None` while more posts are simply waiting to be fetched
    pub fn footer(&self, state: &AppState) -> Option<(String, Style)> {
        if state.feed.is_loading() {
            Some(("Loading more...".into(), Style::default().fg(Color::Gray)))
        } else if let Some(error) = state.feed.error() {
            Some((
                format!("Failed to load: {error} (press n to retry)"),
                Style::default().fg(Color::Red),
            ))
        } else if !state.feed.has_more() {
            Some(("No more posts".into(), Style::default().fg(Color::DarkGray)))
        } else {
            None
        }
    }
}

use ratatui::{prelude::*, widgets::*};

use crate::core::state::{AppState, View};

#[derive(Debug, Clone, Default)]
pub struct TitleBarComponent;

impl TitleBarComponent {
    pub fn view(&self, state: &AppState, frame: &mut Frame, area: Rect) {
        let user = match state.session.username() {
            Some(name) => format!("@{name}"),
            None if state.session.is_logged_in() => "logged in".into(),
            None => "not logged in".into(),
        };
        let section = match state.ui.view {
            View::Feed | View::Search => format!(
                "{} ({} posts{})",
                state.feed.filter(),
                state.feed.len(),
                if state.feed.has_more() { "+" } else { "" }
            ),
            View::Detail => "post".into(),
            View::Assistant => "assistant".into(),
        };

        let line = Line::from(vec![
            Span::styled("inkfeed", Style::default().fg(Color::Magenta).bold()),
            Span::raw(format!(" | {section}")),
            Span::styled(format!(" | {user}"), Style::default().fg(Color::Gray)),
        ]);
        frame.render_widget(
            Paragraph::new(line).style(Style::default().bg(Color::Black)),
            area,
        );
    }
}

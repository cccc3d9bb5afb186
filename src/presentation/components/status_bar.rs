//! Status bar component
//!
//! Displays the latest status message at the bottom of the screen,
//! or the key hints of the focused view when there is none.

use ratatui::{prelude::*, widgets::*};

use crate::{
    core::state::{AppState, View},
    model::status_bar::Level,
};

#[derive(Debug, Clone, Default)]
pub struct StatusBarComponent;

impl StatusBarComponent {
    pub fn view(&self, state: &AppState, frame: &mut Frame, area: Rect) {
        frame.render_widget(Clear, area);
        let line = match (state.status.line(), state.status.level()) {
            (Some(line), Some(Level::Error)) => {
                Line::styled(line.to_string(), Style::default().fg(Color::Red))
            }
            (Some(line), _) => Line::raw(line.to_string()),
            _ => Line::styled(self.hints(state), Style::default().fg(Color::DarkGray)),
        };
        frame.render_widget(Paragraph::new(line), area);
    }

    pub fn hints(&self, state: &AppState) -> &'static str {
        match state.ui.view {
            View::Feed if state.session.is_logged_in() => {
                "j/k move | Enter open | n more | r refresh | v visibility | / tags | a ask | d delete | L logout | q quit"
            }
            View::Feed => "j/k move | Enter open | n more | r refresh | a ask | q quit",
            View::Detail => "Esc back | a ask | d delete",
            View::Assistant => "Enter send | Esc back",
            View::Search => "Enter apply | Esc cancel",
        }
    }
}

//! Presentation layer
//!
//! Stateless components that draw [`AppState`] into a ratatui frame.

use ratatui::prelude::*;

use crate::core::state::{AppState, View};

pub mod components;
pub mod widgets;

use components::{
    assistant::AssistantComponent, detail::DetailComponent, feed::FeedComponent,
    search::SearchComponent, status_bar::StatusBarComponent, title_bar::TitleBarComponent,
};

/// Draw the whole screen: title row, the focused view and the status row
pub fn render(frame: &mut Frame, state: &AppState) {
    let [title, body, status] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    TitleBarComponent.view(state, frame, title);
    match state.ui.view {
        View::Feed => FeedComponent.view(state, frame, body),
        View::Detail => DetailComponent.view(state, frame, body),
        View::Assistant => AssistantComponent.view(state, frame, body),
        View::Search => {
            FeedComponent.view(state, frame, body);
            SearchComponent.view(state, frame, body);
        }
    }
    StatusBarComponent.view(state, frame, status);
}

#[cfg(test)]
mod tests {
    use ratatui::backend::TestBackend;

    use super::*;
    use crate::{
        core::state::CHROME_ROWS,
        domain::post::Post,
        model::{pagination::Message as FeedMessage, viewport},
    };

    fn draw(state: &AppState, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).expect("test backend");
        terminal
            .draw(|frame| render(frame, state))
            .expect("draw to test backend");
        let buffer = terminal.backend().buffer();
        (0..buffer.area.height)
            .map(|y| {
                (0..buffer.area.width)
                    .map(|x| buffer[(x, y)].symbol())
                    .collect::<String>()
                    .trim_end()
                    .to_string()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn loaded_state(count: i64, height: u16) -> AppState {
        let mut state = AppState::default();
        state.viewport.update(viewport::Message::Resized {
            height: height - CHROME_ROWS,
        });
        let request = state.feed.start_fetch();
        state.feed.update(FeedMessage::PageLoaded {
            request,
            posts: (1..=count).map(|i| Post::new(i, format!("post {i}"))).collect(),
        });
        state
    }

    #[test]
    fn test_feed_screen_has_chrome() {
        let state = loaded_state(2, 12);
        let screen = draw(&state, 120, 12);
        let lines: Vec<&str> = screen.lines().collect();
        assert!(lines[0].starts_with("inkfeed"));
        assert!(lines[1].starts_with("#1 post 1"));
        assert!(lines[5].starts_with("#2 post 2"));
        assert!(lines[11].contains("q quit"));
    }

    #[test]
    fn test_search_popup_overlays_feed() {
        let mut state = loaded_state(2, 12);
        state.ui.view = View::Search;
        let screen = draw(&state, 60, 12);
        assert!(screen.contains("Tags (comma separated)"));
        assert!(screen.contains("#1 post 1"));
    }
}

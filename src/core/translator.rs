use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::{
    core::{
        msg::{AssistantMsg, DeleteMsg, DetailMsg, FeedMsg, Msg, SearchMsg, SessionMsg, SystemMsg},
        raw_msg::RawMsg,
        state::{AppState, View},
    },
    model::{line_input, pagination},
};

/// Translates raw external events into domain messages
/// This function is pure and contains no side effects
pub fn translate_raw_to_domain(raw: RawMsg, state: &AppState) -> Vec<Msg> {
    match raw {
        RawMsg::Quit => vec![Msg::System(SystemMsg::Quit)],
        RawMsg::Resize(width, height) => vec![Msg::System(SystemMsg::Resized { width, height })],
        RawMsg::Key(key) => translate_key_event(key, state),
        RawMsg::Paste(text) => translate_paste(&text, state),
        RawMsg::Error(error) => vec![Msg::System(SystemMsg::ErrorReported(error))],

        // Ignore frequent system events in domain layer
        RawMsg::Tick | RawMsg::Render => vec![],
    }
}

/// Translates keyboard input to domain messages based on the focused view
fn translate_key_event(key: KeyEvent, state: &AppState) -> Vec<Msg> {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return vec![Msg::System(SystemMsg::Quit)];
    }

    match state.ui.view {
        View::Feed => translate_feed_keys(key, state),
        View::Detail => translate_detail_keys(key, state),
        View::Assistant => match key.code {
            KeyCode::Esc => vec![Msg::Assistant(AssistantMsg::Closed)],
            KeyCode::Enter => vec![Msg::Assistant(AssistantMsg::Submitted)],
            _ => translate_line_input(key)
                .map(|m| vec![Msg::Assistant(AssistantMsg::Input(m))])
                .unwrap_or_default(),
        },
        View::Search => match key.code {
            KeyCode::Esc => vec![Msg::Search(SearchMsg::Cancelled)],
            KeyCode::Enter => vec![Msg::Search(SearchMsg::Submitted)],
            _ => translate_line_input(key)
                .map(|m| vec![Msg::Search(SearchMsg::Input(m))])
                .unwrap_or_default(),
        },
    }
}

fn translate_feed_keys(key: KeyEvent, state: &AppState) -> Vec<Msg> {
    let selected = state.selected_post().map(|post| post.id);
    let msg = match key.code {
        KeyCode::Char('q') => Msg::System(SystemMsg::Quit),
        KeyCode::Char('j') | KeyCode::Down => Msg::Feed(FeedMsg::NextSelected),
        KeyCode::Char('k') | KeyCode::Up => Msg::Feed(FeedMsg::PreviousSelected),
        KeyCode::Char('g') | KeyCode::Home => Msg::Feed(FeedMsg::FirstSelected),
        KeyCode::Char('G') | KeyCode::End => Msg::Feed(FeedMsg::LastSelected),
        KeyCode::Char('n') => Msg::Feed(FeedMsg::Pagination(
            pagination::Message::NextPageRequested,
        )),
        KeyCode::Char('r') => Msg::Feed(FeedMsg::Refreshed),
        KeyCode::Char('v') => Msg::Feed(FeedMsg::VisibilityFilterCycled),
        KeyCode::Char('/') => Msg::Search(SearchMsg::Opened),
        KeyCode::Char('a') => Msg::Assistant(AssistantMsg::Opened),
        KeyCode::Char('L') if state.session.is_logged_in() => {
            Msg::Session(SessionMsg::LogoutRequested)
        }
        KeyCode::Esc => Msg::System(SystemMsg::StatusCleared),
        KeyCode::Enter => match selected {
            Some(id) => Msg::Detail(DetailMsg::Opened(id)),
            None => return vec![],
        },
        KeyCode::Char('d') => match selected {
            Some(id) => Msg::Delete(DeleteMsg::Requested(id)),
            None => return vec![],
        },
        _ => return vec![],
    };
    vec![msg]
}

fn translate_detail_keys(key: KeyEvent, state: &AppState) -> Vec<Msg> {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Backspace => {
            vec![Msg::Detail(DetailMsg::Closed)]
        }
        KeyCode::Char('a') => vec![Msg::Assistant(AssistantMsg::Opened)],
        KeyCode::Char('d') => state
            .detail
            .id()
            .map(|id| vec![Msg::Delete(DeleteMsg::Requested(id))])
            .unwrap_or_default(),
        _ => vec![],
    }
}

/// Pasted text goes into the focused input, line breaks become spaces
fn translate_paste(text: &str, state: &AppState) -> Vec<Msg> {
    let chars = text
        .chars()
        .filter(|c| *c != '\r')
        .map(|c| if c == '\n' { ' ' } else { c })
        .map(line_input::Message::CharInserted);
    match state.ui.view {
        View::Assistant => chars.map(|m| Msg::Assistant(AssistantMsg::Input(m))).collect(),
        View::Search => chars.map(|m| Msg::Search(SearchMsg::Input(m))).collect(),
        View::Feed | View::Detail => vec![],
    }
}

/// Editing keys shared by every single-line input
fn translate_line_input(key: KeyEvent) -> Option<line_input::Message> {
    let message = match key.code {
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            line_input::Message::CharInserted(c)
        }
        KeyCode::Backspace => line_input::Message::BackspacePressed,
        KeyCode::Delete => line_input::Message::DeletePressed,
        KeyCode::Left => line_input::Message::CursorMovedLeft,
        KeyCode::Right => line_input::Message::CursorMovedRight,
        KeyCode::Home => line_input::Message::CursorMovedHome,
        KeyCode::End => line_input::Message::CursorMovedEnd,
        _ => return None,
    };
    Some(message)
}

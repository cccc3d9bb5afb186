use crossterm::event::KeyEvent;

/// Raw messages from the terminal and the runner loop
///
/// These represent unprocessed external events that need to be translated to domain messages
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawMsg {
    Tick,
    Render,
    Resize(u16, u16),
    Quit,
    Key(KeyEvent),
    /// Bracketed paste
    Paste(String),
    Error(String),
}

impl RawMsg {
    /// Helper to exclude frequent messages during debugging
    pub fn is_frequent(&self) -> bool {
        matches!(self, RawMsg::Tick | RawMsg::Render)
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyModifiers};

    use super::*;

    #[test]
    fn test_raw_msg_frequent_detection() {
        assert!(RawMsg::Tick.is_frequent());
        assert!(RawMsg::Render.is_frequent());
        assert!(!RawMsg::Quit.is_frequent());
        assert!(!RawMsg::Key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)).is_frequent());
    }
}

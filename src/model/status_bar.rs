/// Severity of the status line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    InfoReported { label: String, message: String },
    ErrorReported { label: String, message: String },
    Cleared,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    level: Level,
    line: String,
    message: String,
}

/// One-line status shown under the feed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusBar {
    entry: Option<Entry>,
}

impl StatusBar {
    /// The labelled line as displayed
    pub fn line(&self) -> Option<&str> {
        self.entry.as_ref().map(|entry| entry.line.as_str())
    }

    /// The reported message without its label
    pub fn message(&self) -> Option<&str> {
        self.entry.as_ref().map(|entry| entry.message.as_str())
    }

    pub fn level(&self) -> Option<Level> {
        self.entry.as_ref().map(|entry| entry.level)
    }

    fn set(&mut self, level: Level, label: &str, message: &str) {
        let message = message.split_whitespace().collect::<Vec<_>>().join(" ");
        self.entry = Some(Entry {
            level,
            line: format!("[{label}] {message}"),
            message,
        });
    }

    pub fn update(&mut self, message: Message) {
        match message {
            Message::InfoReported { label, message } => self.set(Level::Info, &label, &message),
            Message::ErrorReported { label, message } => {
                self.set(Level::Error, &format!("ERR: {label}"), &message)
            }
            Message::Cleared => self.entry = None,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_status_bar_default() {
        let status_bar = StatusBar::default();
        assert_eq!(status_bar.line(), None);
        assert_eq!(status_bar.level(), None);
    }

    #[test]
    fn test_info_reported() {
        let mut status_bar = StatusBar::default();
        status_bar.update(Message::InfoReported {
            label: "Login".to_string(),
            message: "Welcome back, alice".to_string(),
        });
        assert_eq!(status_bar.line(), Some("[Login] Welcome back, alice"));
        assert_eq!(status_bar.level(), Some(Level::Info));
    }

    #[test]
    fn test_error_reported_flattens_lines() {
        let mut status_bar = StatusBar::default();
        status_bar.update(Message::ErrorReported {
            label: "Feed".to_string(),
            message: "Network Error\n  connection refused".to_string(),
        });
        assert_eq!(
            status_bar.line(),
            Some("[ERR: Feed] Network Error connection refused")
        );
        assert_eq!(
            status_bar.message(),
            Some("Network Error connection refused")
        );
        assert_eq!(status_bar.level(), Some(Level::Error));
    }

    #[test]
    fn test_cleared() {
        let mut status_bar = StatusBar::default();
        status_bar.update(Message::InfoReported {
            label: "x".to_string(),
            message: "y".to_string(),
        });
        status_bar.update(Message::Cleared);
        assert_eq!(status_bar, StatusBar::default());
    }
}

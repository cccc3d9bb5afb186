//! Single-line text input with a cursor
//!
//! Used by the tag search and the assistant prompt.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    CharInserted(char),
    BackspacePressed,
    DeletePressed,
    CursorMovedLeft,
    CursorMovedRight,
    CursorMovedHome,
    CursorMovedEnd,
    Cleared,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineInput {
    text: String,
    /// Cursor position in characters
    cursor: usize,
}

impl LineInput {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let cursor = text.chars().count();
        Self { text, cursor }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Return the content and clear the input
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.text)
    }

    fn byte_index(&self, cursor: usize) -> usize {
        self.text
            .char_indices()
            .nth(cursor)
            .map_or(self.text.len(), |(i, _)| i)
    }

    pub fn update(&mut self, message: Message) {
        let len = self.text.chars().count();
        match message {
            Message::CharInserted(c) => {
                let at = self.byte_index(self.cursor);
                self.text.insert(at, c);
                self.cursor += 1;
            }
            Message::BackspacePressed => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    let at = self.byte_index(self.cursor);
                    self.text.remove(at);
                }
            }
            Message::DeletePressed => {
                if self.cursor < len {
                    let at = self.byte_index(self.cursor);
                    self.text.remove(at);
                }
            }
            Message::CursorMovedLeft => self.cursor = self.cursor.saturating_sub(1),
            Message::CursorMovedRight => self.cursor = (self.cursor + 1).min(len),
            Message::CursorMovedHome => self.cursor = 0,
            Message::CursorMovedEnd => self.cursor = len,
            Message::Cleared => {
                self.text.clear();
                self.cursor = 0;
            }
        }
    }
}

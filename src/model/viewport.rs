//! Selection and scroll window over the feed list
//!
//! This module follows the Elm Architecture pattern:
//! - State changes only through the `update` function
//! - All state transitions are explicitly defined as `Message` variants
//! - The module is self-contained and doesn't know about the posts it windows over
//!
//! Every post occupies the same number of terminal rows, so visibility is plain arithmetic
//! over indices.

/// Messages that can be sent to update the viewport state
///
/// Following Elm conventions, messages are named in past tense
/// to indicate "what happened" rather than "what to do"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    /// The list area was resized to the given number of rows
    Resized { height: u16 },
    /// The previous post was selected
    PreviousItemSelected,
    /// The next post was selected
    NextItemSelected { len: usize },
    /// The first post was selected
    FirstItemSelected,
    /// The last post was selected
    LastItemSelected { len: usize },
    /// The list shrank, e.g. after a post was removed
    ItemsTruncated { len: usize },
    /// The list was emptied
    Cleared,
}

/// Scroll window over a list of fixed-height rows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewport {
    selected: Option<usize>,
    first_visible: usize,
    height: u16,
    row_height: u16,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(Self::DEFAULT_ROW_HEIGHT)
    }
}

impl Viewport {
    /// Title, preview and a separator line
    pub const DEFAULT_ROW_HEIGHT: u16 = 4;

    pub fn new(row_height: u16) -> Self {
        Self {
            selected: None,
            first_visible: 0,
            height: 0,
            row_height: row_height.max(1),
        }
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn first_visible(&self) -> usize {
        self.first_visible
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn row_height(&self) -> u16 {
        self.row_height
    }

    /// Number of rows that fit, counting a partially shown trailing row
    pub fn capacity(&self) -> usize {
        (self.height as usize).div_ceil(self.row_height as usize)
    }

    /// Whether the row at `index` is at least partially on screen
    pub fn is_visible(&self, index: usize) -> bool {
        index >= self.first_visible && index < self.first_visible + self.capacity()
    }

    /// Index of the last row on screen for a list of `len` rows
    pub fn last_visible_index(&self, len: usize) -> Option<usize> {
        if len == 0 || self.capacity() == 0 || self.first_visible >= len {
            return None;
        }
        Some((self.first_visible + self.capacity()).min(len) - 1)
    }

    /// Update the viewport state based on a message
    pub fn update(&mut self, message: Message) {
        match message {
            Message::Resized { height } => {
                self.height = height;
                self.scroll_to_selection();
            }
            Message::PreviousItemSelected => {
                self.selected = Some(self.selected.map_or(0, |i| i.saturating_sub(1)));
                self.scroll_to_selection();
            }
            Message::NextItemSelected { len } => {
                if len == 0 {
                    return;
                }
                self.selected = Some(match self.selected {
                    Some(i) => (i + 1).min(len - 1),
                    None => 0,
                });
                self.scroll_to_selection();
            }
            Message::FirstItemSelected => {
                self.selected = Some(0);
                self.first_visible = 0;
            }
            Message::LastItemSelected { len } => {
                if len == 0 {
                    return;
                }
                self.selected = Some(len - 1);
                self.scroll_to_selection();
            }
            Message::ItemsTruncated { len } => {
                if len == 0 {
                    self.selected = None;
                    self.first_visible = 0;
                    return;
                }
                self.selected = self.selected.map(|i| i.min(len - 1));
                self.first_visible = self.first_visible.min(len - 1);
                self.scroll_to_selection();
            }
            Message::Cleared => {
                self.selected = None;
                self.first_visible = 0;
            }
        }
    }

    fn scroll_to_selection(&mut self) {
        let Some(selected) = self.selected else {
            return;
        };
        // Only fully shown rows count when scrolling down
        let full_rows = ((self.height / self.row_height) as usize).max(1);
        if selected < self.first_visible {
            self.first_visible = selected;
        } else if selected >= self.first_visible + full_rows {
            self.first_visible = selected + 1 - full_rows;
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::*;

    use super::*;

    #[fixture]
    fn viewport() -> Viewport {
        let mut viewport = Viewport::new(4);
        viewport.update(Message::Resized { height: 12 });
        viewport
    }

    #[test]
    fn test_viewport_default() {
        let viewport = Viewport::default();
        assert_eq!(viewport.selected(), None);
        assert_eq!(viewport.capacity(), 0);
        assert_eq!(viewport.last_visible_index(10), None);
    }

    #[rstest]
    #[case(12, 3)]
    #[case(13, 4)]
    #[case(3, 1)]
    fn test_capacity(#[case] height: u16, #[case] expected: usize) {
        let mut viewport = Viewport::new(4);
        viewport.update(Message::Resized { height });
        assert_eq!(viewport.capacity(), expected);
    }

    #[rstest]
    #[case(0, None)]
    #[case(2, Some(1))]
    #[case(3, Some(2))]
    #[case(10, Some(2))]
    fn test_last_visible_index(
        viewport: Viewport,
        #[case] len: usize,
        #[case] expected: Option<usize>,
    ) {
        assert_eq!(viewport.last_visible_index(len), expected);
    }

    #[rstest]
    fn test_scrolls_down_with_selection(mut viewport: Viewport) {
        for _ in 0..4 {
            viewport.update(Message::NextItemSelected { len: 10 });
        }

        assert_eq!(viewport.selected(), Some(3));
        assert_eq!(viewport.first_visible(), 1);
        assert!(!viewport.is_visible(0));
        assert!(viewport.is_visible(3));
        assert_eq!(viewport.last_visible_index(10), Some(3));
    }

    #[rstest]
    fn test_next_stops_at_end(mut viewport: Viewport) {
        viewport.update(Message::LastItemSelected { len: 2 });
        viewport.update(Message::NextItemSelected { len: 2 });
        assert_eq!(viewport.selected(), Some(1));
    }

    #[rstest]
    fn test_scrolls_up_with_selection(mut viewport: Viewport) {
        viewport.update(Message::LastItemSelected { len: 10 });
        assert_eq!(viewport.first_visible(), 7);

        for _ in 0..3 {
            viewport.update(Message::PreviousItemSelected);
        }
        assert_eq!(viewport.selected(), Some(6));
        assert_eq!(viewport.first_visible(), 6);

        viewport.update(Message::FirstItemSelected);
        assert_eq!(viewport.first_visible(), 0);
    }

    #[rstest]
    fn test_empty_list_keeps_no_selection(mut viewport: Viewport) {
        viewport.update(Message::NextItemSelected { len: 0 });
        viewport.update(Message::LastItemSelected { len: 0 });
        assert_eq!(viewport.selected(), None);
    }

    #[rstest]
    fn test_items_truncated_clamps(mut viewport: Viewport) {
        viewport.update(Message::LastItemSelected { len: 10 });
        viewport.update(Message::ItemsTruncated { len: 5 });

        assert_eq!(viewport.selected(), Some(4));
        assert!(viewport.is_visible(4));

        viewport.update(Message::ItemsTruncated { len: 0 });
        assert_eq!(viewport.selected(), None);
        assert_eq!(viewport.first_visible(), 0);
    }
}

//! Tag filter popup drawn over the feed

use ratatui::{prelude::*, widgets::*};

use crate::{core::state::AppState, presentation::widgets::input_line::InputLine};

#[derive(Debug, Clone, Default)]
pub struct SearchComponent;

impl SearchComponent {
    pub fn view(&self, state: &AppState, frame: &mut Frame, area: Rect) {
        let popup = popup_area(area, 60, 3);
        frame.render_widget(Clear, popup);
        let input = InputLine::new(&state.ui.search, " Tags (comma separated) ")
            .placeholder("empty shows every tag");
        frame.set_cursor_position(input.cursor_position(popup));
        frame.render_widget(input, popup);
    }
}

/// Horizontally centered rect of `percent_x` width and `height` rows, a third of the way down
fn popup_area(area: Rect, percent_x: u16, height: u16) -> Rect {
    let [_, row, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height),
        Constraint::Fill(2),
    ])
    .areas(area);
    let [_, popup, _] = Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .areas(row);
    popup
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_popup_area() {
        let popup = popup_area(Rect::new(0, 0, 100, 30), 60, 3);
        assert_eq!(popup.width, 60);
        assert_eq!(popup.height, 3);
        assert_eq!(popup.x, 20);
    }
}

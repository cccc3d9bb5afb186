//! Single post view

use ratatui::{prelude::*, widgets::*};

use crate::{core::state::AppState, presentation::widgets::post_card::PostCard};

#[derive(Debug, Clone, Default)]
pub struct DetailComponent;

impl DetailComponent {
    pub fn view(&self, state: &AppState, frame: &mut Frame, area: Rect) {
        frame.render_widget(Clear, area);
        let block = Block::bordered()
            .title(" Post ")
            .title_bottom(" Esc back | a assistant | d delete ");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let detail = &state.detail;
        let text = if detail.is_loading() {
            Text::styled("Loading...", Style::default().fg(Color::Gray))
        } else if let Some(error) = detail.error() {
            Text::styled(format!("Error: {error}"), Style::default().fg(Color::Red))
        } else if let Some(post) = detail.post() {
            let card = PostCard::new(post);
            let mut lines = vec![
                Line::styled(post.title.clone(), Style::default().bold()),
                Line::styled(card.meta(), Style::default().fg(Color::Gray)),
            ];
            if let Some(url) = post.image_url(&state.settings.blog_url) {
                lines.push(Line::styled(
                    format!("Image: {url}"),
                    Style::default().fg(Color::Cyan).underlined(),
                ));
            }
            lines.push(Line::raw(""));
            lines.extend(post.content.lines().map(|line| Line::raw(line.to_string())));
            Text::from(lines)
        } else {
            Text::raw("")
        };

        frame.render_widget(Paragraph::new(text).wrap(Wrap { trim: false }), inner);
    }
}

#[cfg(test)]
mod tests {
    use ratatui::backend::TestBackend;

    use super::*;
    use crate::{
        domain::post::{Post, PostId},
        model::post_detail::Message,
    };

    fn screen(state: &AppState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(70, 12)).expect("test backend");
        terminal
            .draw(|frame| DetailComponent.view(state, frame, frame.area()))
            .expect("draw to test backend");
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_loading_then_loaded() {
        let mut state = AppState::default();
        state.detail.update(Message::Requested(PostId(3)));
        assert!(screen(&state).contains("Loading..."));

        let mut post = Post::new(3, "Detail title");
        post.content = "first paragraph\nsecond paragraph".into();
        post.main_image_url = Some("/static/images/a.png".into());
        state.detail.update(Message::Loaded(post));
        let screen = screen(&state);
        assert!(screen.contains("Detail title"));
        assert!(screen.contains("Image: http://127.0.0.1:8000/static/images/a.png"));
        assert!(screen.contains("second paragraph"));
    }

    #[test]
    fn test_error_is_shown() {
        let mut state = AppState::default();
        state.detail.update(Message::Requested(PostId(3)));
        state.detail.update(Message::Failed {
            id: PostId(3),
            error: "Blog not found".into(),
        });
        assert!(screen(&state).contains("Error: Blog not found"));
    }
}

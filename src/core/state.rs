use crate::{
    domain::post::{FeedFilter, Post},
    infrastructure::config::Config,
    model::{
        assistant::Assistant, composer::Composer, line_input::LineInput, pagination::Pagination,
        post_detail::PostDetail, scroll_trigger::ScrollTrigger, session::Session,
        status_bar::StatusBar, viewport::Viewport,
    },
};

/// Rows taken by the title bar and the status bar around the feed list
pub const CHROME_ROWS: u16 = 2;

/// Unified application state
#[derive(Debug, Clone)]
pub struct AppState {
    pub feed: Pagination,
    pub trigger: ScrollTrigger,
    pub viewport: Viewport,
    pub detail: PostDetail,
    pub session: Session,
    pub composer: Composer,
    pub assistant: Assistant,
    pub status: StatusBar,
    pub ui: UiState,
    pub system: SystemState,
    pub settings: Settings,
}

/// Which screen has the keyboard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum View {
    #[default]
    Feed,
    Detail,
    Assistant,
    Search,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UiState {
    pub view: View,
    pub search: LineInput,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SystemState {
    pub should_quit: bool,
    /// Set once the feed is rendered; until then nothing is fetched automatically
    pub feed_mounted: bool,
    pub width: u16,
    pub height: u16,
}

/// Values from the configuration that update needs
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub top_k: usize,
    pub blog_url: String,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        let filter = FeedFilter {
            visibility: config.feed.visibility,
            tags: vec![],
        };
        Self {
            feed: Pagination::new(config.feed.page_size, filter)
                .with_policy(config.feed.end_of_feed),
            trigger: ScrollTrigger::new(),
            viewport: Viewport::default(),
            detail: PostDetail::default(),
            session: Session::default(),
            composer: Composer::default(),
            assistant: Assistant::default(),
            status: StatusBar::default(),
            ui: UiState::default(),
            system: SystemState::default(),
            settings: Settings {
                top_k: config.assistant.top_k,
                blog_url: config.api.blog_url.clone(),
            },
        }
    }

    /// Post under the cursor in the feed
    pub fn selected_post(&self) -> Option<&Post> {
        self.viewport
            .selected()
            .and_then(|index| self.feed.get(index))
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::domain::post::Visibility;

    #[test]
    fn test_app_state_from_default_config() {
        let state = AppState::default();
        assert_eq!(state.feed.limit(), 10);
        assert_eq!(state.feed.filter().visibility, Some(Visibility::Public));
        assert_eq!(state.settings.top_k, 3);
        assert_eq!(state.ui.view, View::Feed);
        assert!(!state.system.feed_mounted);
        assert_eq!(state.selected_post(), None);
    }
}

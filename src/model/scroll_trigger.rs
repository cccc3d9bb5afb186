//! Decides when the feed should load its next page
//!
//! The trigger watches the last rendered post. It fires while that post is visible, no fetch
//! is outstanding and the feed is believed to have more pages. It is level-triggered: the
//! coordinator asks [`ScrollTrigger::should_fetch`] after every state change, so a short page
//! that leaves the sentinel on screen keeps loading until the screen is filled or the feed ends.

use crate::{domain::post::PostId, model::pagination::Pagination};

/// Handle returned by [`ScrollTrigger::attach`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

/// Messages that can be sent to update the trigger state
///
/// Following Elm conventions, messages are named in past tense
/// to indicate "what happened" rather than "what to do"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    /// The watched post entered or left the screen
    VisibilityChanged { observer: ObserverId, visible: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Observation {
    observer: ObserverId,
    target: PostId,
    visible: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrollTrigger {
    current: Option<Observation>,
    next_observer: u64,
}

impl ScrollTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start watching `target`, replacing any previous target
    ///
    /// The new target starts out as not visible until a visibility report arrives.
    pub fn attach(&mut self, target: PostId) -> ObserverId {
        let observer = ObserverId(self.next_observer);
        self.next_observer += 1;
        if let Some(previous) = self.current.replace(Observation {
            observer,
            target,
            visible: false,
        }) {
            log::trace!(
                "Scroll trigger moved from post {} to {}",
                previous.target,
                target
            );
        }
        observer
    }

    /// Stop watching; later reports for `observer` are ignored
    pub fn detach(&mut self, observer: ObserverId) {
        if self.observer() == Some(observer) {
            self.current = None;
        }
    }

    pub fn observer(&self) -> Option<ObserverId> {
        self.current.map(|observation| observation.observer)
    }

    pub fn target(&self) -> Option<PostId> {
        self.current.map(|observation| observation.target)
    }

    pub fn is_visible(&self) -> bool {
        self.current.is_some_and(|observation| observation.visible)
    }

    pub fn update(&mut self, message: Message) {
        match message {
            Message::VisibilityChanged { observer, visible } => match self.current.as_mut() {
                Some(observation) if observation.observer == observer => {
                    observation.visible = visible;
                }
                _ => log::trace!("Ignoring visibility report from detached observer"),
            },
        }
    }

    /// Whether a fetch should start right now
    pub fn should_fetch(&self, feed: &Pagination) -> bool {
        self.is_visible() && !feed.is_loading() && feed.has_more()
    }
}

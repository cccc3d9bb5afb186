//! Pagination store for the post feed
//!
//! This module follows the Elm Architecture pattern:
//! - State changes only through the `update` function
//! - All state transitions are explicitly defined as `Message` variants
//! - The module is self-contained and doesn't know about the scroll trigger or the network
//!
//! The store never talks to the network itself. Starting a fetch hands back a [`PageRequest`]
//! describing the page to load; the caller turns it into a command and later feeds the outcome
//! back as [`Message::PageLoaded`] or [`Message::PageFailed`] carrying the same request.

use std::collections::HashSet;

use serde::Deserialize;

use crate::domain::post::{FeedFilter, Post, PostId};

/// Decides when the feed is considered exhausted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndOfFeedPolicy {
    /// Stop once a page contributes no new posts (empty or duplicates only)
    #[default]
    NoNewItems,
    /// Stop only once the server returns an empty page
    EmptyPage,
}

/// Parameters of one page fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Reset generation the request was issued in
    pub epoch: u64,
    pub offset: usize,
    pub limit: usize,
    pub filter: FeedFilter,
}

/// Messages that can be sent to update the pagination state
///
/// Following Elm conventions, messages are named in past tense
/// to indicate "what happened" rather than "what to do"
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// The next page was requested
    NextPageRequested,
    /// A page fetch succeeded
    PageLoaded {
        request: PageRequest,
        posts: Vec<Post>,
    },
    /// A page fetch failed
    PageFailed { request: PageRequest, error: String },
    /// The accumulated history was dropped, optionally switching to a new filter
    Reset { filter: Option<FeedFilter> },
    /// A post was deleted on the server
    PostRemoved(PostId),
}

/// What a page merge did to the store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    pub appended: usize,
    pub duplicates: usize,
}

/// Accumulated, de-duplicated list of posts loaded page by page
#[derive(Debug, Clone, PartialEq)]
pub struct Pagination {
    items: Vec<Post>,
    offset: usize,
    limit: usize,
    has_more: bool,
    in_flight: usize,
    error: Option<String>,
    filter: FeedFilter,
    epoch: u64,
    policy: EndOfFeedPolicy,
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(10, FeedFilter::default())
    }
}

impl Pagination {
    /// Create an empty store with a fixed page size
    pub fn new(limit: usize, filter: FeedFilter) -> Self {
        Self {
            items: vec![],
            offset: 0,
            limit: limit.max(1),
            has_more: true,
            in_flight: 0,
            error: None,
            filter,
            epoch: 0,
            policy: EndOfFeedPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: EndOfFeedPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn items(&self) -> &[Post] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Post> {
        self.items.get(index)
    }

    pub fn last(&self) -> Option<&Post> {
        self.items.last()
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    /// True while at least one fetch is outstanding
    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn filter(&self) -> &FeedFilter {
        &self.filter
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Start fetching the next page
    ///
    /// Does not check `is_loading`; callers that must not overlap fetches check it first.
    pub fn start_fetch(&mut self) -> PageRequest {
        self.in_flight += 1;
        self.error = None;
        PageRequest {
            epoch: self.epoch,
            offset: self.offset,
            limit: self.limit,
            filter: self.filter.clone(),
        }
    }

    /// Update the pagination state based on a message
    ///
    /// Returns the request to execute for [`Message::NextPageRequested`], `None` otherwise.
    pub fn update(&mut self, message: Message) -> Option<PageRequest> {
        match message {
            Message::NextPageRequested => return Some(self.start_fetch()),
            Message::PageLoaded { request, posts } => {
                if self.is_stale(&request) {
                    log::debug!(
                        "Discarding stale page (epoch {} != {})",
                        request.epoch,
                        self.epoch
                    );
                    return None;
                }
                self.in_flight = self.in_flight.saturating_sub(1);
                let outcome = self.merge(posts);
                log::debug!(
                    "Merged page at offset {}: {} new, {} duplicate",
                    request.offset,
                    outcome.appended,
                    outcome.duplicates
                );
            }
            Message::PageFailed { request, error } => {
                if self.is_stale(&request) {
                    return None;
                }
                self.in_flight = self.in_flight.saturating_sub(1);
                self.error = Some(error);
            }
            Message::Reset { filter } => {
                self.items.clear();
                self.offset = 0;
                self.has_more = true;
                self.in_flight = 0;
                self.error = None;
                self.epoch += 1;
                if let Some(filter) = filter {
                    self.filter = filter;
                }
            }
            Message::PostRemoved(id) => {
                self.items.retain(|post| post.id != id);
            }
        }
        None
    }

    fn is_stale(&self, request: &PageRequest) -> bool {
        request.epoch != self.epoch
    }

    /// Append the posts whose ids are not present yet, preserving server order
    fn merge(&mut self, posts: Vec<Post>) -> MergeOutcome {
        let returned = posts.len();
        let mut seen: HashSet<PostId> = self.items.iter().map(|post| post.id).collect();
        let before = self.items.len();
        // `seen` also guards against ids repeated within the same page
        self.items
            .extend(posts.into_iter().filter(|post| seen.insert(post.id)));
        let appended = self.items.len() - before;

        match self.policy {
            EndOfFeedPolicy::NoNewItems => {
                self.has_more = appended > 0;
                if appended > 0 {
                    self.offset += self.limit;
                }
            }
            EndOfFeedPolicy::EmptyPage => {
                self.has_more = returned > 0;
                if returned > 0 {
                    self.offset += self.limit;
                }
            }
        }

        MergeOutcome {
            appended,
            duplicates: returned - appended,
        }
    }
}

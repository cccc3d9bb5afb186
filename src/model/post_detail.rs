use crate::domain::post::{Post, PostId};

#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Requested(PostId),
    Loaded(Post),
    Failed { id: PostId, error: String },
    /// The shown post was deleted
    Removed(PostId),
    Closed,
}

/// Single post opened from the feed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostDetail {
    id: Option<PostId>,
    post: Option<Post>,
    loading: bool,
    error: Option<String>,
}

impl PostDetail {
    pub fn id(&self) -> Option<PostId> {
        self.id
    }

    pub fn post(&self) -> Option<&Post> {
        self.post.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_open(&self) -> bool {
        self.id.is_some()
    }

    pub fn update(&mut self, message: Message) {
        match message {
            Message::Requested(id) => {
                self.id = Some(id);
                self.post = None;
                self.loading = true;
                self.error = None;
            }
            Message::Loaded(post) => {
                // A late response for a post that is no longer open
                if self.id != Some(post.id) {
                    return;
                }
                self.post = Some(post);
                self.loading = false;
                self.error = None;
            }
            Message::Failed { id, error } => {
                if self.id != Some(id) {
                    return;
                }
                self.loading = false;
                self.error = Some(error);
            }
            Message::Removed(id) => {
                if self.id == Some(id) {
                    *self = Self::default();
                }
            }
            Message::Closed => *self = Self::default(),
        }
    }
}

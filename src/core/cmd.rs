use std::path::PathBuf;

use crate::{
    domain::{
        post::{NewPost, PostId},
        session::{AccessToken, Credentials, Registration},
    },
    model::pagination::PageRequest,
};

/// Elm-like command definitions
///
/// Represents side effects (HTTP calls and session persistence). Commands describe what
/// should happen; `CmdExecutor` decides how.
#[derive(Debug, Clone, PartialEq)]
pub enum Cmd {
    // Blog API
    FetchPage(PageRequest),
    FetchPost(PostId),
    CreatePost {
        post: NewPost,
        token: AccessToken,
    },
    DeletePost {
        id: PostId,
        token: AccessToken,
    },
    UploadImage {
        path: PathBuf,
        token: AccessToken,
    },
    Login(Credentials),
    Signup(Registration),

    // Assistant services
    GenerateImage {
        prompt: String,
    },
    AskAssistant {
        query: String,
        top_k: usize,
    },
    /// Remove a deleted post from the assistant's index; failures are only logged
    DeindexPost(PostId),

    // Session persistence
    SaveSession {
        token: AccessToken,
        username: Option<String>,
    },
    ClearSession,
}

impl Cmd {
    /// Get command priority (smaller numbers = higher priority)
    pub fn priority(&self) -> u8 {
        match self {
            // User actions have the highest priority
            Cmd::Login(..)
            | Cmd::Signup(..)
            | Cmd::CreatePost { .. }
            | Cmd::DeletePost { .. }
            | Cmd::UploadImage { .. } => 0,

            // Reads that fill the screen
            Cmd::FetchPage(..) | Cmd::FetchPost(..) | Cmd::AskAssistant { .. } => 1,

            Cmd::GenerateImage { .. } => 2,

            // File operations
            Cmd::SaveSession { .. } | Cmd::ClearSession => 3,

            // Best effort
            Cmd::DeindexPost(..) => 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::domain::post::FeedFilter;

    fn fetch_page() -> Cmd {
        Cmd::FetchPage(PageRequest {
            epoch: 0,
            offset: 0,
            limit: 10,
            filter: FeedFilter::default(),
        })
    }

    #[test]
    fn test_cmd_priority() {
        assert_eq!(Cmd::Login(Credentials::new("a", "b")).priority(), 0);
        assert_eq!(fetch_page().priority(), 1);
        assert_eq!(Cmd::ClearSession.priority(), 3);
        assert_eq!(Cmd::DeindexPost(PostId(1)).priority(), 4);
    }
}

use crate::{
    domain::{
        post::{Post, PostId},
        session::{AccessToken, Credentials, Registration},
    },
    model::{composer::Draft, line_input, pagination, scroll_trigger},
};

/// Domain messages representing application intent and results of side effects
///
/// These are processed by the update function. Raw terminal input is translated into these
/// by the translator; command results are posted back by the command executor.
#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    System(SystemMsg),
    Feed(FeedMsg),
    Detail(DetailMsg),
    Session(SessionMsg),
    Composer(ComposerMsg),
    Assistant(AssistantMsg),
    Search(SearchMsg),
    Delete(DeleteMsg),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SystemMsg {
    Quit,
    Resized { width: u16, height: u16 },
    /// The feed is on screen and may load pages on its own
    FeedMounted,
    StatusCleared,
    ErrorReported(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum FeedMsg {
    Pagination(pagination::Message),
    ScrollTrigger(scroll_trigger::Message),
    PreviousSelected,
    NextSelected,
    FirstSelected,
    LastSelected,
    /// Reload from the first page keeping the current filter
    Refreshed,
    VisibilityFilterCycled,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DetailMsg {
    Opened(PostId),
    Loaded(Post),
    Failed { id: PostId, error: String },
    Closed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionMsg {
    LoginRequested(Credentials),
    SignupRequested(Registration),
    LoginSucceeded(AccessToken),
    SignupSucceeded(Option<AccessToken>),
    LoginFailed(String),
    SignupFailed(String),
    Restored {
        token: AccessToken,
        username: Option<String>,
    },
    LogoutRequested,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ComposerMsg {
    DraftChanged(Draft),
    SubmitRequested,
    ImageResolved(String),
    Created(Post),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum AssistantMsg {
    Opened,
    Closed,
    Input(line_input::Message),
    Submitted,
    Answered { answer: String, processing_time: f64 },
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchMsg {
    Opened,
    Input(line_input::Message),
    Submitted,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DeleteMsg {
    Requested(PostId),
    Succeeded(PostId),
    Failed(String),
}

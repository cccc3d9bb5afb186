use crate::{
    core::{
        cmd::Cmd,
        msg::{
            AssistantMsg, ComposerMsg, DeleteMsg, DetailMsg, FeedMsg, Msg, SearchMsg, SessionMsg,
            SystemMsg,
        },
        state::{AppState, View, CHROME_ROWS},
    },
    domain::{
        post::{FeedFilter, Visibility},
        session::AccessToken,
        text::parse_tags,
    },
    model::{
        assistant, composer,
        composer::{Phase, Step},
        line_input::{self, LineInput},
        pagination, post_detail, scroll_trigger, session, status_bar, viewport,
    },
};

/// Elm-like update function
///
/// Applies `msg` to the state and returns the commands to execute. After every message the
/// scroll trigger is re-evaluated, so fetching the next page depends only on the current
/// state and not on which event happened to change it.
pub fn update(msg: Msg, state: &mut AppState) -> Vec<Cmd> {
    let mut cmds = match msg {
        Msg::System(msg) => update_system(msg, state),
        Msg::Feed(msg) => update_feed(msg, state),
        Msg::Detail(msg) => update_detail(msg, state),
        Msg::Session(msg) => update_session(msg, state),
        Msg::Composer(msg) => update_composer(msg, state),
        Msg::Assistant(msg) => update_assistant(msg, state),
        Msg::Search(msg) => update_search(msg, state),
        Msg::Delete(msg) => update_delete(msg, state),
    };
    cmds.extend(sync_scroll_trigger(state));
    cmds
}

fn report_info(state: &mut AppState, label: &str, message: impl Into<String>) {
    state.status.update(status_bar::Message::InfoReported {
        label: label.to_string(),
        message: message.into(),
    });
}

fn report_error(state: &mut AppState, label: &str, message: impl Into<String>) {
    state.status.update(status_bar::Message::ErrorReported {
        label: label.to_string(),
        message: message.into(),
    });
}

fn update_system(msg: SystemMsg, state: &mut AppState) -> Vec<Cmd> {
    match msg {
        SystemMsg::Quit => state.system.should_quit = true,
        SystemMsg::Resized { width, height } => {
            state.system.width = width;
            state.system.height = height;
            state.viewport.update(viewport::Message::Resized {
                height: height.saturating_sub(CHROME_ROWS),
            });
        }
        SystemMsg::FeedMounted => state.system.feed_mounted = true,
        SystemMsg::StatusCleared => state.status.update(status_bar::Message::Cleared),
        SystemMsg::ErrorReported(error) => report_error(state, "System", error),
    }
    vec![]
}

/// Drop the loaded history and start over with `filter` (or the current one)
fn reset_feed(state: &mut AppState, filter: Option<FeedFilter>) {
    state.feed.update(pagination::Message::Reset { filter });
    state.viewport.update(viewport::Message::Cleared);
    if let Some(observer) = state.trigger.observer() {
        state.trigger.detach(observer);
    }
}

fn update_feed(msg: FeedMsg, state: &mut AppState) -> Vec<Cmd> {
    match msg {
        FeedMsg::Pagination(pagination::Message::NextPageRequested) => {
            if state.feed.is_loading() {
                log::debug!("Next page requested while a fetch is in flight, ignoring");
                return vec![];
            }
            return vec![Cmd::FetchPage(state.feed.start_fetch())];
        }
        FeedMsg::Pagination(pagination::Message::PageFailed { request, error }) => {
            let current = request.epoch == state.feed.epoch();
            state
                .feed
                .update(pagination::Message::PageFailed { request, error: error.clone() });
            if current {
                report_error(state, "Feed", error);
            }
        }
        FeedMsg::Pagination(pagination::Message::Reset { filter }) => reset_feed(state, filter),
        FeedMsg::Pagination(pagination::Message::PostRemoved(id)) => {
            state.feed.update(pagination::Message::PostRemoved(id));
            state.viewport.update(viewport::Message::ItemsTruncated {
                len: state.feed.len(),
            });
        }
        FeedMsg::Pagination(message) => {
            state.feed.update(message);
        }
        FeedMsg::ScrollTrigger(message) => state.trigger.update(message),
        FeedMsg::PreviousSelected => state.viewport.update(viewport::Message::PreviousItemSelected),
        FeedMsg::NextSelected => state.viewport.update(viewport::Message::NextItemSelected {
            len: state.feed.len(),
        }),
        FeedMsg::FirstSelected => state.viewport.update(viewport::Message::FirstItemSelected),
        FeedMsg::LastSelected => state.viewport.update(viewport::Message::LastItemSelected {
            len: state.feed.len(),
        }),
        FeedMsg::Refreshed => reset_feed(state, None),
        FeedMsg::VisibilityFilterCycled => {
            if !state.session.is_logged_in() {
                report_error(state, "Feed", "Please log in to see non-public posts");
                return vec![];
            }
            let mut filter = state.feed.filter().clone();
            filter.visibility = Some(filter.visibility.unwrap_or_default().next());
            report_info(state, "Feed", format!("Showing {filter}"));
            reset_feed(state, Some(filter));
        }
    }
    vec![]
}

fn update_detail(msg: DetailMsg, state: &mut AppState) -> Vec<Cmd> {
    match msg {
        DetailMsg::Opened(id) => {
            state.detail.update(post_detail::Message::Requested(id));
            state.ui.view = View::Detail;
            return vec![Cmd::FetchPost(id)];
        }
        DetailMsg::Loaded(post) => state.detail.update(post_detail::Message::Loaded(post)),
        DetailMsg::Failed { id, error } => {
            state.detail.update(post_detail::Message::Failed { id, error })
        }
        DetailMsg::Closed => {
            state.detail.update(post_detail::Message::Closed);
            state.ui.view = View::Feed;
        }
    }
    vec![]
}

fn save_session(state: &AppState, token: AccessToken) -> Cmd {
    Cmd::SaveSession {
        token,
        username: state.session.username().map(String::from),
    }
}

fn update_session(msg: SessionMsg, state: &mut AppState) -> Vec<Cmd> {
    match msg {
        SessionMsg::LoginRequested(credentials) => {
            state.session.update(session::Message::RequestStarted {
                username: credentials.username.clone(),
            });
            vec![Cmd::Login(credentials)]
        }
        SessionMsg::SignupRequested(registration) => {
            state.session.update(session::Message::RequestStarted {
                username: registration.credentials.username.clone(),
            });
            vec![Cmd::Signup(registration)]
        }
        SessionMsg::LoginSucceeded(token) => {
            state.session.update(session::Message::LoginSucceeded {
                token: token.clone(),
            });
            let who = state.session.username().unwrap_or("user").to_string();
            report_info(state, "Login", format!("Logged in as {who}"));
            vec![save_session(state, token)]
        }
        SessionMsg::SignupSucceeded(token) => {
            let logged_in = state.session.update(session::Message::SignupSucceeded {
                token: token.clone(),
            });
            match token {
                Some(token) if logged_in => {
                    report_info(state, "Signup", "Signup successful!");
                    vec![save_session(state, token)]
                }
                _ => {
                    report_info(state, "Signup", "Signup successful! Please login.");
                    vec![]
                }
            }
        }
        SessionMsg::LoginFailed(error) => {
            state
                .session
                .update(session::Message::RequestFailed(error.clone()));
            report_error(state, "Login", error);
            vec![]
        }
        SessionMsg::SignupFailed(error) => {
            state
                .session
                .update(session::Message::RequestFailed(error.clone()));
            report_error(state, "Signup", error);
            vec![]
        }
        SessionMsg::Restored { token, username } => {
            state
                .session
                .update(session::Message::Restored { token, username });
            vec![]
        }
        SessionMsg::LogoutRequested => {
            state.session.update(session::Message::LoggedOut);
            // Tag search and non-public feeds need a login
            let filter = FeedFilter {
                visibility: state.feed.filter().visibility.map(|_| Visibility::Public),
                tags: vec![],
            };
            if &filter != state.feed.filter() {
                reset_feed(state, Some(filter));
            }
            report_info(state, "Logout", "Logged out");
            vec![Cmd::ClearSession]
        }
    }
}

fn step_to_cmd(step: Step, token: AccessToken) -> Cmd {
    match step {
        Step::UploadImage(path) => Cmd::UploadImage { path, token },
        Step::GenerateImage(prompt) => Cmd::GenerateImage { prompt },
        Step::CreatePost(post) => Cmd::CreatePost { post, token },
    }
}

/// Turn a composer step into a command, failing the composer if the login went away
fn continue_composer(state: &mut AppState, step: Option<Step>) -> Vec<Cmd> {
    let Some(step) = step else {
        if let Phase::Failed(error) = state.composer.phase().clone() {
            report_error(state, "Post", error);
        }
        return vec![];
    };
    match state.session.token().cloned() {
        Some(token) => vec![step_to_cmd(step, token)],
        None => {
            state.composer.update(composer::Message::Failed(
                "You must be logged in to create a blog.".into(),
            ));
            vec![]
        }
    }
}

fn update_composer(msg: ComposerMsg, state: &mut AppState) -> Vec<Cmd> {
    match msg {
        ComposerMsg::DraftChanged(draft) => {
            state.composer.update(composer::Message::DraftChanged(draft));
            vec![]
        }
        ComposerMsg::SubmitRequested => {
            let step = state.composer.update(composer::Message::Submitted {
                authenticated: state.session.is_logged_in(),
            });
            continue_composer(state, step)
        }
        ComposerMsg::ImageResolved(url) => {
            let step = state
                .composer
                .update(composer::Message::ImageResolved(url));
            if step.is_none() {
                return vec![];
            }
            continue_composer(state, step)
        }
        ComposerMsg::Created(post) => {
            let id = post.id;
            state.composer.update(composer::Message::Created(post));
            report_info(state, "Post", format!("Blog created successfully! (#{id})"));
            reset_feed(state, None);
            vec![]
        }
        ComposerMsg::Failed(error) => {
            state
                .composer
                .update(composer::Message::Failed(error.clone()));
            report_error(state, "Post", error);
            vec![]
        }
    }
}

fn update_assistant(msg: AssistantMsg, state: &mut AppState) -> Vec<Cmd> {
    match msg {
        AssistantMsg::Opened => state.ui.view = View::Assistant,
        AssistantMsg::Closed => {
            state.ui.view = if state.detail.is_open() {
                View::Detail
            } else {
                View::Feed
            };
        }
        AssistantMsg::Input(message) => {
            state.assistant.update(assistant::Message::Input(message));
        }
        AssistantMsg::Submitted => {
            if let Some(query) = state.assistant.update(assistant::Message::Submitted) {
                return vec![Cmd::AskAssistant {
                    query,
                    top_k: state.settings.top_k,
                }];
            }
        }
        AssistantMsg::Answered {
            answer,
            processing_time,
        } => {
            state.assistant.update(assistant::Message::Answered {
                answer,
                processing_time,
            });
        }
        AssistantMsg::Failed(error) => {
            state.assistant.update(assistant::Message::Failed(error));
        }
    }
    vec![]
}

fn update_search(msg: SearchMsg, state: &mut AppState) -> Vec<Cmd> {
    match msg {
        SearchMsg::Opened => {
            if !state.session.is_logged_in() {
                report_error(state, "Search", "Please log in to search by tag");
                return vec![];
            }
            state.ui.search = LineInput::new(state.feed.filter().tags.join(", "));
            state.ui.view = View::Search;
        }
        SearchMsg::Input(message) => state.ui.search.update(message),
        SearchMsg::Submitted => {
            let tags = parse_tags(&state.ui.search.take());
            state.ui.view = View::Feed;
            let filter = FeedFilter {
                visibility: state.feed.filter().visibility,
                tags,
            };
            if &filter != state.feed.filter() {
                report_info(state, "Search", format!("Showing {filter}"));
                reset_feed(state, Some(filter));
            }
        }
        SearchMsg::Cancelled => {
            state.ui.search.update(line_input::Message::Cleared);
            state.ui.view = View::Feed;
        }
    }
    vec![]
}

fn update_delete(msg: DeleteMsg, state: &mut AppState) -> Vec<Cmd> {
    match msg {
        DeleteMsg::Requested(id) => match state.session.token().cloned() {
            Some(token) => vec![Cmd::DeletePost { id, token }],
            None => {
                report_error(state, "Delete", "Please log in to delete posts");
                vec![]
            }
        },
        DeleteMsg::Succeeded(id) => {
            state.feed.update(pagination::Message::PostRemoved(id));
            state.viewport.update(viewport::Message::ItemsTruncated {
                len: state.feed.len(),
            });
            if state.detail.id() == Some(id) {
                state.detail.update(post_detail::Message::Removed(id));
                state.ui.view = View::Feed;
            }
            report_info(state, "Delete", format!("Deleted post #{id}"));
            vec![Cmd::DeindexPost(id)]
        }
        DeleteMsg::Failed(error) => {
            report_error(state, "Delete", error);
            vec![]
        }
    }
}

/// Keep the scroll trigger on the last post and start a fetch when it fires
///
/// The viewport reports visibility only once the terminal has given it a size. A mounted,
/// empty feed that may have more pages loads its first page. Nothing is fetched on its own
/// while the last fetch's error is shown.
fn sync_scroll_trigger(state: &mut AppState) -> Vec<Cmd> {
    if !state.system.feed_mounted {
        return vec![];
    }

    let len = state.feed.len();
    match state.feed.last().map(|post| post.id) {
        Some(last) => {
            let observer = match state.trigger.observer() {
                Some(observer) if state.trigger.target() == Some(last) => observer,
                _ => state.trigger.attach(last),
            };
            if state.viewport.height() > 0 {
                let visible = state.ui.view == View::Feed
                    && state.viewport.last_visible_index(len) == Some(len - 1);
                state
                    .trigger
                    .update(scroll_trigger::Message::VisibilityChanged { observer, visible });
            }
        }
        None => {
            if let Some(observer) = state.trigger.observer() {
                state.trigger.detach(observer);
            }
        }
    }

    if state.feed.error().is_some() {
        return vec![];
    }
    let first_page =
        state.feed.is_empty() && state.feed.has_more() && !state.feed.is_loading();
    if first_page || state.trigger.should_fetch(&state.feed) {
        return vec![Cmd::FetchPage(state.feed.start_fetch())];
    }
    vec![]
}

//! One-shot operations behind the CLI subcommands
//!
//! Each operation feeds messages into a [`Runtime`] exactly like the terminal UI does, waits for
//! the state to settle and turns the outcome into a value or an error.

use color_eyre::eyre::{bail, eyre, Result};

use crate::{
    core::msg::{
        AssistantMsg, ComposerMsg, DeleteMsg, DetailMsg, FeedMsg, Msg, SessionMsg, SystemMsg,
    },
    domain::{
        post::{FeedFilter, Post, PostId},
        session::{Credentials, Registration},
    },
    integration::runtime::Runtime,
    model::{
        assistant::{ChatMessage, Role},
        composer::{Draft, Phase},
        line_input, pagination,
        status_bar::Level,
    },
};

/// Fail with the status line when the last report was an error
fn ensure_no_error(runtime: &Runtime) -> Result<()> {
    let status = &runtime.state().status;
    if status.level() == Some(Level::Error) {
        bail!("{}", status.message().unwrap_or("unknown error"));
    }
    Ok(())
}

fn status_message(runtime: &Runtime) -> String {
    runtime.state().status.message().unwrap_or_default().to_string()
}

pub async fn login(runtime: &mut Runtime, credentials: Credentials) -> Result<String> {
    runtime.send_msg(Msg::Session(SessionMsg::LoginRequested(credentials)));
    runtime.run_until(|state| !state.session.is_loading()).await?;
    if let Some(error) = runtime.state().session.error() {
        bail!("{error}");
    }
    runtime.run_to_idle().await?;
    ensure_no_error(runtime)?;
    Ok(status_message(runtime))
}

pub async fn signup(runtime: &mut Runtime, registration: Registration) -> Result<String> {
    runtime.send_msg(Msg::Session(SessionMsg::SignupRequested(registration)));
    runtime.run_until(|state| !state.session.is_loading()).await?;
    if let Some(error) = runtime.state().session.error() {
        bail!("{error}");
    }
    runtime.run_to_idle().await?;
    ensure_no_error(runtime)?;
    Ok(status_message(runtime))
}

pub async fn logout(runtime: &mut Runtime) -> Result<String> {
    runtime.send_msg(Msg::Session(SessionMsg::LogoutRequested));
    runtime.run_to_idle().await?;
    ensure_no_error(runtime)?;
    Ok(status_message(runtime))
}

/// Load up to `pages` pages of the feed, stopping early at its end
pub async fn list(
    runtime: &mut Runtime,
    pages: usize,
    filter: Option<FeedFilter>,
) -> Result<Vec<Post>> {
    if filter.is_some() {
        runtime.send_msg(Msg::Feed(FeedMsg::Pagination(
            pagination::Message::Reset { filter },
        )));
    }
    runtime.send_msg(Msg::System(SystemMsg::FeedMounted));
    for page in 0..pages.max(1) {
        if page > 0 {
            if !runtime.state().feed.has_more() {
                break;
            }
            runtime.send_msg(Msg::Feed(FeedMsg::Pagination(
                pagination::Message::NextPageRequested,
            )));
        }
        runtime.run_until(|state| !state.feed.is_loading()).await?;
        if let Some(error) = runtime.state().feed.error() {
            bail!("{error}");
        }
    }
    Ok(runtime.state().feed.items().to_vec())
}

pub async fn show(runtime: &mut Runtime, id: PostId) -> Result<Post> {
    runtime.send_msg(Msg::Detail(DetailMsg::Opened(id)));
    runtime.run_until(|state| !state.detail.is_loading()).await?;
    let detail = &runtime.state().detail;
    if let Some(error) = detail.error() {
        bail!("{error}");
    }
    detail
        .post()
        .cloned()
        .ok_or_else(|| eyre!("Blog not found"))
}

/// Validate and publish `draft`, uploading or generating its image first
pub async fn publish(runtime: &mut Runtime, draft: Draft) -> Result<PostId> {
    runtime.send_msg(Msg::Composer(ComposerMsg::DraftChanged(draft)));
    runtime.send_msg(Msg::Composer(ComposerMsg::SubmitRequested));
    runtime
        .run_until(|state| !state.composer.is_busy())
        .await?;
    match runtime.state().composer.phase().clone() {
        Phase::Created(id) => Ok(id),
        Phase::Failed(error) => Err(eyre!(error)),
        phase => Err(eyre!("post was not submitted ({phase:?})")),
    }
}

/// Delete a post; removing it from the assistant's index is best effort
pub async fn delete(runtime: &mut Runtime, id: PostId) -> Result<String> {
    runtime.send_msg(Msg::Delete(DeleteMsg::Requested(id)));
    runtime.run_to_idle().await?;
    ensure_no_error(runtime)?;
    Ok(status_message(runtime))
}

/// Ask the assistant and return its answer
pub async fn ask(runtime: &mut Runtime, question: &str) -> Result<ChatMessage> {
    for c in question.chars() {
        runtime.send_msg(Msg::Assistant(AssistantMsg::Input(
            line_input::Message::CharInserted(c),
        )));
    }
    runtime.send_msg(Msg::Assistant(AssistantMsg::Submitted));
    // Blank questions never leave the input line
    runtime.process_all_messages();
    if !runtime.state().assistant.is_pending() {
        bail!("the question is empty");
    }
    runtime
        .run_until(|state| !state.assistant.is_pending())
        .await?;

    let reply = runtime
        .state()
        .assistant
        .messages()
        .last()
        .cloned()
        .ok_or_else(|| eyre!("no reply"))?;
    match reply.role {
        Role::Error => Err(eyre!(reply.content)),
        _ => Ok(reply),
    }
}

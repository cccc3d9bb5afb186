use std::future::Future;

use color_eyre::eyre::Result;
use tokio::sync::mpsc;
use tokio_util::task::TaskTracker;

use crate::{
    core::{
        cmd::Cmd,
        msg::{
            AssistantMsg, ComposerMsg, DeleteMsg, DetailMsg, FeedMsg, Msg, SessionMsg, SystemMsg,
        },
    },
    infrastructure::{
        api::{AssistantClient, BlogClient},
        config::Config,
        session_store::SessionStore,
    },
    model::pagination,
};

/// Runs commands on the tokio runtime
///
/// Each command becomes a task that posts at most one [`Msg`] back to the runtime. Errors never
/// escape a task: they travel back as the failure variant of the matching message, using the
/// error's display text.
#[derive(Clone)]
pub struct CmdExecutor {
    blog: BlogClient,
    assistant: AssistantClient,
    sessions: SessionStore,
    msg_sender: mpsc::UnboundedSender<Msg>,
    tracker: TaskTracker,
}

impl CmdExecutor {
    pub fn new(
        blog: BlogClient,
        assistant: AssistantClient,
        sessions: SessionStore,
        msg_sender: mpsc::UnboundedSender<Msg>,
    ) -> Self {
        Self {
            blog,
            assistant,
            sessions,
            msg_sender,
            tracker: TaskTracker::new(),
        }
    }

    pub fn from_config(config: &Config, msg_sender: mpsc::UnboundedSender<Msg>) -> Result<Self> {
        let timeout = config.api.timeout();
        Ok(Self::new(
            BlogClient::new(&config.api.blog_url, timeout)?,
            AssistantClient::new(&config.api.assistant_url, timeout)?,
            SessionStore::new(&config.config._data_dir),
            msg_sender,
        ))
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Number of commands still running
    pub fn pending(&self) -> usize {
        self.tracker.len()
    }

    /// Wait until every spawned command has finished
    pub async fn wait_idle(&self) {
        self.tracker.close();
        self.tracker.wait().await;
        self.tracker.reopen();
    }

    /// Execute a single command; asynchronous ones are spawned and return immediately
    pub fn execute_command(&self, cmd: Cmd) {
        log::debug!("Executing {}", cmd.name());
        match cmd {
            Cmd::FetchPage(request) => {
                let blog = self.blog.clone();
                self.spawn(async move {
                    let message = match blog
                        .list_posts(request.offset, request.limit, &request.filter)
                        .await
                    {
                        Ok(posts) => pagination::Message::PageLoaded { request, posts },
                        Err(e) => pagination::Message::PageFailed {
                            request,
                            error: e.to_string(),
                        },
                    };
                    Some(Msg::Feed(FeedMsg::Pagination(message)))
                });
            }

            Cmd::FetchPost(id) => {
                let blog = self.blog.clone();
                self.spawn(async move {
                    let msg = match blog.get_post(id).await {
                        Ok(post) => DetailMsg::Loaded(post),
                        Err(e) => DetailMsg::Failed {
                            id,
                            error: e.to_string(),
                        },
                    };
                    Some(Msg::Detail(msg))
                });
            }

            Cmd::CreatePost { post, token } => {
                let blog = self.blog.clone();
                self.spawn(async move {
                    let msg = match blog.create_post(&post, &token).await {
                        Ok(created) => ComposerMsg::Created(created),
                        Err(e) => ComposerMsg::Failed(e.to_string()),
                    };
                    Some(Msg::Composer(msg))
                });
            }

            Cmd::DeletePost { id, token } => {
                let blog = self.blog.clone();
                self.spawn(async move {
                    let msg = match blog.delete_post(id, &token).await {
                        Ok(()) => DeleteMsg::Succeeded(id),
                        Err(e) => DeleteMsg::Failed(e.to_string()),
                    };
                    Some(Msg::Delete(msg))
                });
            }

            Cmd::UploadImage { path, token } => {
                let blog = self.blog.clone();
                self.spawn(async move {
                    let msg = match blog.upload_image(&path, &token).await {
                        Ok(url) => ComposerMsg::ImageResolved(url),
                        Err(e) => ComposerMsg::Failed(format!("Image upload failed: {e}")),
                    };
                    Some(Msg::Composer(msg))
                });
            }

            Cmd::Login(credentials) => {
                let blog = self.blog.clone();
                self.spawn(async move {
                    let msg = match blog.login(&credentials).await {
                        Ok(token) => SessionMsg::LoginSucceeded(token),
                        Err(e) => SessionMsg::LoginFailed(e.to_string()),
                    };
                    Some(Msg::Session(msg))
                });
            }

            Cmd::Signup(registration) => {
                let blog = self.blog.clone();
                self.spawn(async move {
                    let msg = match blog.signup(&registration).await {
                        Ok(token) => SessionMsg::SignupSucceeded(token),
                        Err(e) => SessionMsg::SignupFailed(e.to_string()),
                    };
                    Some(Msg::Session(msg))
                });
            }

            Cmd::GenerateImage { prompt } => {
                let assistant = self.assistant.clone();
                self.spawn(async move {
                    let msg = match assistant.generate_image(&prompt).await {
                        Ok(url) => ComposerMsg::ImageResolved(url),
                        Err(e) => ComposerMsg::Failed(format!("Image generation failed: {e}")),
                    };
                    Some(Msg::Composer(msg))
                });
            }

            Cmd::AskAssistant { query, top_k } => {
                let assistant = self.assistant.clone();
                self.spawn(async move {
                    let msg = match assistant.ask(&query, top_k).await {
                        Ok(answer) => AssistantMsg::Answered {
                            answer: answer.answer,
                            processing_time: answer.processing_time,
                        },
                        Err(e) => AssistantMsg::Failed(e.to_string()),
                    };
                    Some(Msg::Assistant(msg))
                });
            }

            Cmd::DeindexPost(id) => {
                let assistant = self.assistant.clone();
                self.spawn(async move {
                    match assistant.deindex_post(id).await {
                        Ok(()) => log::info!("Post #{id} removed from the assistant index"),
                        Err(e) => log::warn!("Failed to remove post #{id} from the index: {e}"),
                    }
                    None
                });
            }

            Cmd::SaveSession { token, username } => {
                let sessions = self.sessions.clone();
                self.spawn(async move {
                    let error = sessions.save(&token, username.as_deref()).await.err()?;
                    log::error!("{error:?}");
                    Some(Msg::System(SystemMsg::ErrorReported(format!(
                        "Cannot save the session: {error}"
                    ))))
                });
            }

            Cmd::ClearSession => {
                let sessions = self.sessions.clone();
                self.spawn(async move {
                    let error = sessions.clear().await.err()?;
                    log::error!("{error:?}");
                    Some(Msg::System(SystemMsg::ErrorReported(format!(
                        "Cannot remove the saved session: {error}"
                    ))))
                });
            }
        }
    }

    /// Execute multiple commands, most urgent first
    pub fn execute_commands(&self, mut commands: Vec<Cmd>) -> Vec<String> {
        commands.sort_by_key(Cmd::priority);
        commands
            .into_iter()
            .map(|cmd| {
                let name = cmd.name();
                self.execute_command(cmd);
                name
            })
            .collect()
    }

    fn spawn<F>(&self, task: F)
    where
        F: Future<Output = Option<Msg>> + Send + 'static,
    {
        let sender = self.msg_sender.clone();
        self.tracker.spawn(async move {
            if let Some(msg) = task.await {
                if sender.send(msg).is_err() {
                    log::warn!("Command result dropped: the runtime is gone");
                }
            }
        });
    }
}

/// Human-readable command names for logs
trait CmdName {
    fn name(&self) -> String;
}

impl CmdName for Cmd {
    fn name(&self) -> String {
        match self {
            Cmd::FetchPage(request) => format!(
                "FetchPage(offset={}, limit={})",
                request.offset, request.limit
            ),
            Cmd::FetchPost(id) => format!("FetchPost({id})"),
            Cmd::CreatePost { .. } => "CreatePost".to_string(),
            Cmd::DeletePost { id, .. } => format!("DeletePost({id})"),
            Cmd::UploadImage { .. } => "UploadImage".to_string(),
            Cmd::Login(..) => "Login".to_string(),
            Cmd::Signup(..) => "Signup".to_string(),
            Cmd::GenerateImage { .. } => "GenerateImage".to_string(),
            Cmd::AskAssistant { .. } => "AskAssistant".to_string(),
            Cmd::DeindexPost(id) => format!("DeindexPost({id})"),
            Cmd::SaveSession { .. } => "SaveSession".to_string(),
            Cmd::ClearSession => "ClearSession".to_string(),
        }
    }
}

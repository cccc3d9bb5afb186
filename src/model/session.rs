//! Authentication state
//!
//! Login and signup share one request state: a `loading` flag and the last error.

use crate::domain::session::AccessToken;

/// Messages that can be sent to update the session state
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// A login or signup request was sent
    RequestStarted { username: String },
    LoginSucceeded { token: AccessToken },
    /// Signup completed; the server may or may not log the user in directly
    SignupSucceeded { token: Option<AccessToken> },
    RequestFailed(String),
    /// A session was read back from disk at startup
    Restored {
        token: AccessToken,
        username: Option<String>,
    },
    LoggedOut,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    token: Option<AccessToken>,
    username: Option<String>,
    pending_username: Option<String>,
    loading: bool,
    error: Option<String>,
}

impl Session {
    pub fn token(&self) -> Option<&AccessToken> {
        self.token.as_ref()
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.token.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Returns true when the message left the user logged in with a new token
    pub fn update(&mut self, message: Message) -> bool {
        match message {
            Message::RequestStarted { username } => {
                self.loading = true;
                self.error = None;
                self.pending_username = Some(username);
                false
            }
            Message::LoginSucceeded { token } => {
                self.loading = false;
                self.token = Some(token);
                self.username = self.pending_username.take();
                true
            }
            Message::SignupSucceeded { token } => {
                self.loading = false;
                match token {
                    Some(token) => {
                        self.token = Some(token);
                        self.username = self.pending_username.take();
                        true
                    }
                    None => {
                        self.pending_username = None;
                        false
                    }
                }
            }
            Message::RequestFailed(error) => {
                self.loading = false;
                self.pending_username = None;
                self.error = Some(error);
                false
            }
            Message::Restored { token, username } => {
                self.token = Some(token);
                self.username = username;
                false
            }
            Message::LoggedOut => {
                *self = Self::default();
                false
            }
        }
    }
}

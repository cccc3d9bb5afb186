//! Conversation with the blog assistant

use strum::Display;

use crate::model::line_input::{self, LineInput};

pub const GREETING: &str = "Hi! I'm your blog assistant. How can I help?";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    /// Seconds the service spent answering
    pub processing_time: Option<f64>,
}

impl ChatMessage {
    fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            processing_time: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Input(line_input::Message),
    /// The current input was sent as a question
    Submitted,
    Answered { answer: String, processing_time: f64 },
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Assistant {
    messages: Vec<ChatMessage>,
    input: LineInput,
    pending: usize,
}

impl Default for Assistant {
    fn default() -> Self {
        Self {
            messages: vec![ChatMessage::new(Role::Assistant, GREETING)],
            input: LineInput::default(),
            pending: 0,
        }
    }
}

impl Assistant {
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn input(&self) -> &LineInput {
        &self.input
    }

    pub fn is_pending(&self) -> bool {
        self.pending > 0
    }

    /// Returns the question to send for [`Message::Submitted`]
    pub fn update(&mut self, message: Message) -> Option<String> {
        match message {
            Message::Input(message) => self.input.update(message),
            Message::Submitted => {
                if self.input.is_blank() {
                    return None;
                }
                let query = self.input.take().trim().to_string();
                self.messages.push(ChatMessage::new(Role::User, query.clone()));
                self.pending += 1;
                return Some(query);
            }
            Message::Answered {
                answer,
                processing_time,
            } => {
                self.pending = self.pending.saturating_sub(1);
                self.messages.push(ChatMessage {
                    role: Role::Assistant,
                    content: answer,
                    processing_time: Some(processing_time),
                });
            }
            Message::Failed(error) => {
                self.pending = self.pending.saturating_sub(1);
                self.messages.push(ChatMessage::new(Role::Error, error));
            }
        }
        None
    }
}

//! # inkfeed
//!
//! A terminal client for a blog platform with a retrieval-augmented assistant, built with
//! Ratatui around an Elm-like architecture.
//!
//! ## Architecture Overview
//!
//! - **Models** ([`model`]): self-contained state machines such as the paginated feed
//! - **State** ([`core::state`]): the models composed into one application state
//! - **Messages** ([`core::msg`]): past-tense events that change the state
//! - **Update** ([`core::update`]): the pure function applying a message
//! - **Commands** ([`core::cmd`]): side effects returned by update, run by
//!   [`infrastructure::cmd_executor::CmdExecutor`]
//! - **View** ([`presentation`]): stateless rendering of the state
//!
//! ## Example
//!
//! ```rust
//! use inkfeed::{
//!     core::{msg::{Msg, SystemMsg}, state::AppState, update::update},
//!     Cmd,
//! };
//!
//! let mut state = AppState::default();
//! let commands = update(Msg::System(SystemMsg::FeedMounted), &mut state);
//!
//! // Mounting an empty feed asks for its first page
//! assert!(commands.iter().any(|cmd| matches!(cmd, Cmd::FetchPage(..))));
//! assert!(state.feed.is_loading());
//! ```

pub mod core;
pub mod domain;
pub mod infrastructure;
pub mod integration;
pub mod model;
pub mod presentation;
pub mod utils;

pub use crate::core::{cmd::Cmd, msg::Msg, state::AppState, update::update};

/// Result type used throughout the library
pub type Result<T> = color_eyre::eyre::Result<T>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! Infrastructure layer
//!
//! This module handles external integrations and services:
//! - HTTP clients for the blog API and the assistant services
//! - Command execution on the tokio runtime
//! - Configuration and CLI argument processing
//! - Session persistence
//! - TUI foundation

pub mod api;
pub mod cli;
pub mod cmd_executor;
pub mod config;
pub mod session_store;
pub mod tui;

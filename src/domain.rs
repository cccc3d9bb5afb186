//! Domain logic
//!
//! This module contains domain-specific types and helpers:
//! - Blog posts and listing filters
//! - Authentication secrets
//! - Text processing utilities

pub mod post;
pub mod session;
pub mod text;

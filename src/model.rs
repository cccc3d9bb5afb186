//! Self-contained state machines
//!
//! Each model owns its state and exposes a past-tense `Message` enum with a single `update`
//! entry point. Models do not know about each other; `core::update` coordinates them.

pub mod assistant;
pub mod composer;
pub mod line_input;
pub mod pagination;
pub mod post_detail;
pub mod scroll_trigger;
pub mod session;
pub mod status_bar;
pub mod viewport;

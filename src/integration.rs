//! Wiring of the pure core to the outside world
//!
//! - [`runtime::Runtime`] owns the state and runs the update loop
//! - [`app_runner::AppRunner`] feeds it terminal events and renders the screen
//! - [`headless`] drives the same loop for one-shot CLI commands

pub mod app_runner;
pub mod headless;
pub mod runtime;

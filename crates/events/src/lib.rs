//! Event system for autoplay
//!
//! This crate provides the event bus and event types used to report game
//! progress (moves, lifecycle, failures) to observers such as a GUI or a
//! metrics sink, without coupling the driver to any presentation layer.

mod bus;
mod types;

pub use bus::EventBus;
pub use types::*;

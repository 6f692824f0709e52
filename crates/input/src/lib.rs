//! Terminal input module (engine-facing).
//!
//! This module is intentionally independent of the renderer. It maps
//! `crossterm` key events into [`crate::types::ShipAction`] and provides a
//! held-key latch suitable for terminals without key-release events.

pub mod handler;
pub mod map;

pub use lunar_oasis_types as types;

pub use handler::InputHandler;
pub use map::{handle_key_event, map_code, should_quit};

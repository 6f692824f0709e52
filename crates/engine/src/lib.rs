//! Lander engine module - game rules driven by fixed ticks.
//!
//! The engine owns a [`core::Simulation`] and layers the lander on top of it:
//! a ship with heading, thrust and fuel; ballistic shots that blast craters;
//! landings, crashes and level progression. It is deterministic for a given
//! seed and action sequence, and knows nothing about terminals.

pub mod game;
pub mod ship;

pub use lunar_oasis_core as core;
pub use lunar_oasis_types as types;

pub use game::{Game, Hud, LevelSource, Phase, Shot};
pub use ship::Ship;

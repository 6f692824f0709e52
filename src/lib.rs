//! Lunar Oasis (workspace facade crate).
//!
//! Re-exports the workspace crates as `lunar_oasis::{core,engine,input,term,types}`
//! and adds the host-side [`config`] module used by the binary.

pub mod config;

pub use lunar_oasis_core as core;
pub use lunar_oasis_engine as engine;
pub use lunar_oasis_input as input;
pub use lunar_oasis_term as term;
pub use lunar_oasis_types as types;

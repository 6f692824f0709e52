//! Terminal presentation module.
//!
//! A small, game-oriented rendering layer: the simulation's 64×64 RGBA
//! framebuffer is mapped to half-block cells ([`view`]) and flushed to the
//! terminal with run diffing ([`renderer`]). It avoids widget/layout
//! libraries entirely.

pub mod fb;
pub mod renderer;
pub mod view;

pub use lunar_oasis_core as core;
pub use lunar_oasis_types as types;

pub use fb::{Cell, CellBuffer, CellStyle, Rgb};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
pub use view::{Layout, PixelView, Viewport, HALF_BLOCK};

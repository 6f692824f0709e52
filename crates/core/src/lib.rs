//! Core simulation module - pure, deterministic, and testable
//!
//! This crate holds everything that turns a sprite atlas and a level
//! descriptor into pixels. It has **no dependencies** on the terminal or any
//! other I/O, which keeps it:
//!
//! - **Deterministic**: the same seed and inputs produce the same frames
//! - **Testable**: every stage can be driven with a synthetic atlas
//! - **Fast**: the per-frame path does not allocate
//!
//! # Module Structure
//!
//! - [`grid`]: bounds-checked 2D storage shared by the other modules
//! - [`atlas`]: the 1024-stride sprite sheet and its palette ramps
//! - [`fb`]: the 64×64 RGBA framebuffer with blending and blits
//! - [`terrain`]: the 1024×1024 height field, stamping and speckle
//! - [`shade`]: slope-shaded rendering of the height field
//! - [`hash`]: spatial hash used for particle neighbour queries
//! - [`particles`]: the fixed 2048-slot particle pool
//! - [`probe`]: sprite-versus-terrain collision tests
//! - [`level`]: level descriptors and terrain construction
//! - [`sim`]: the [`Simulation`] context tying it all together
//!
//! # Frame Order
//!
//! [`Simulation::render_frame`] clears the framebuffer, shades the terrain
//! under the camera, then advances and composites particles. Anything drawn
//! afterwards (ship, overlays) lands on top.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use lunar_oasis_core::{Atlas, Shading, Simulation};
//! use lunar_oasis_core::types::{Rgba, ROCKS, TICK_DT};
//!
//! let mut atlas = Atlas::blank(64);
//! atlas.fill_region(ROCKS[0], Rgba::new(40, 40, 40, 255));
//!
//! let mut sim = Simulation::new(Arc::new(atlas), Shading::Lambert, 1);
//! sim.stamp(ROCKS[0], 512, 512, 128, 100);
//! assert!(sim.collides(ROCKS[0], 508, 508));
//!
//! sim.render_frame(TICK_DT, 512, 512);
//! ```

pub mod atlas;
pub mod fb;
pub mod grid;
pub mod hash;
pub mod level;
pub mod particles;
pub mod probe;
pub mod rng;
pub mod shade;
pub mod sim;
pub mod terrain;

pub use lunar_oasis_types as types;

// Re-export commonly used types for convenience
pub use atlas::{Atlas, AtlasError, Palettes};
pub use fb::{blend, Framebuffer};
pub use grid::Grid;
pub use hash::SpatialHash;
pub use level::{build_level, LevelDesc, LevelError, LevelLayout};
pub use particles::{Particle, ParticlePool};
pub use rng::SimpleRng;
pub use shade::{Shading, TerrainRenderer};
pub use sim::Simulation;
pub use terrain::Terrain;

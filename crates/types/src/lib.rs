//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the game.
//! All types are pure data with no external dependencies, so they can be used
//! by the simulation core, the lander rules and the terminal presentation alike.
//!
//! # Dimensions
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `FB_SIZE` | 64 | Framebuffer width and height in pixels |
//! | `WORLD_SIZE` | 1024 | Terrain field width and height in world cells |
//! | `ATLAS_STRIDE` | 1024 | Sprite atlas row stride in pixels |
//! | `HASH_SIZE` | 512 | Particle spatial hash cells per axis |
//! | `PARTICLE_CAPACITY` | 2048 | Fixed particle pool size |
//! | `LEVEL_GRID` | 64 | Level descriptor cells per axis |
//!
//! # Timing
//!
//! The simulation runs on a fixed 60 Hz tick: `TICK_DT` seconds per frame.
//! `TICK_MS` is the rounded wall-clock interval the host loop sleeps for.
//!
//! # Examples
//!
//! ```
//! use lunar_oasis_types::{ShipAction, SpriteDesc, ROCKS, FB_SIZE, WORLD_SIZE};
//!
//! // Sprite descriptors pack into a single u64 and back.
//! let rock = ROCKS[0];
//! assert_eq!(SpriteDesc::unpack(rock.pack()), rock);
//!
//! // Parse a ship action.
//! assert_eq!(ShipAction::from_str("thrust"), Some(ShipAction::Thrust));
//!
//! assert_eq!(FB_SIZE, 64);
//! assert_eq!(WORLD_SIZE, 1024);
//! ```

/// Framebuffer width and height in pixels.
pub const FB_SIZE: usize = 64;

/// Number of pixels in the framebuffer.
pub const FB_PIXELS: usize = FB_SIZE * FB_SIZE;

/// Half the framebuffer size: the camera sits at the centre of the view.
pub const VIEW_HALF: i32 = (FB_SIZE / 2) as i32;

/// Terrain field width and height in world cells.
pub const WORLD_SIZE: usize = 1024;

/// Row stride of the sprite atlas in pixels.
pub const ATLAS_STRIDE: usize = 1024;

/// Spatial hash cells per axis. Each cell spans `WORLD_SIZE / HASH_SIZE` world units.
pub const HASH_SIZE: usize = 512;

/// Fixed particle pool capacity.
pub const PARTICLE_CAPACITY: usize = 2048;

/// Level descriptor cells per axis.
pub const LEVEL_GRID: usize = 64;

/// World cells covered by one level descriptor cell.
pub const LEVEL_CELL: usize = WORLD_SIZE / LEVEL_GRID;

/// Logical tick rate.
pub const TICK_HZ: u32 = 60;

/// Fixed simulation step in seconds.
pub const TICK_DT: f32 = 1.0 / TICK_HZ as f32;

/// Host loop tick interval in milliseconds (16ms ≈ 60 FPS).
pub const TICK_MS: u32 = 16;

/// Downward acceleration applied to particles and the ship, in world units per second².
pub const GRAVITY: f32 = 16.0;

/// Number of ship headings (45° steps, 0 = up, clockwise).
pub const SHIP_HEADINGS: u8 = 8;

/// 8-bit RGBA color.
///
/// The atlas stores pixels as little-endian `u32` words, so `r` is the low
/// byte and `a` the high byte of [`Rgba::to_u32`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::new(0, 0, 0, 255);
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Same color with a different alpha.
    pub const fn with_alpha(self, a: u8) -> Self {
        Self::new(self.r, self.g, self.b, a)
    }

    /// Build from the packed atlas word (`0xAABBGGRR`).
    ///
    /// ```
    /// use lunar_oasis_types::Rgba;
    ///
    /// assert_eq!(Rgba::from_u32(0xFF00_0000), Rgba::BLACK);
    /// assert_eq!(Rgba::from_u32(0x8040_2010).r, 0x10);
    /// ```
    pub const fn from_u32(word: u32) -> Self {
        Self::new(
            (word & 0xFF) as u8,
            ((word >> 8) & 0xFF) as u8,
            ((word >> 16) & 0xFF) as u8,
            (word >> 24) as u8,
        )
    }

    pub const fn to_u32(self) -> u32 {
        (self.r as u32) | ((self.g as u32) << 8) | ((self.b as u32) << 16) | ((self.a as u32) << 24)
    }
}

/// Mask for one 10-bit descriptor field.
const FIELD_MASK: u64 = 1023;

/// Rectangular region of the sprite atlas.
///
/// Every field is a 10-bit value (`0..1024`). Descriptors can be packed into
/// a single `u64` (`x | y<<10 | w<<20 | h<<30`) for compact tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpriteDesc {
    pub x: u16,
    pub y: u16,
    pub w: u16,
    pub h: u16,
}

impl SpriteDesc {
    /// Create a descriptor. Values are truncated to the 10-bit field width.
    pub const fn new(x: u16, y: u16, w: u16, h: u16) -> Self {
        Self {
            x: x & FIELD_MASK as u16,
            y: y & FIELD_MASK as u16,
            w: w & FIELD_MASK as u16,
            h: h & FIELD_MASK as u16,
        }
    }

    pub const fn pack(self) -> u64 {
        (self.x as u64) | ((self.y as u64) << 10) | ((self.w as u64) << 20) | ((self.h as u64) << 30)
    }

    /// Decode a packed descriptor. Bits above the four fields are ignored.
    ///
    /// ```
    /// use lunar_oasis_types::SpriteDesc;
    ///
    /// let packed = 83u64 | (5 << 10) | (9 << 20) | (9 << 30);
    /// assert_eq!(SpriteDesc::unpack(packed), SpriteDesc::new(83, 5, 9, 9));
    /// ```
    pub const fn unpack(packed: u64) -> Self {
        Self {
            x: (packed & FIELD_MASK) as u16,
            y: ((packed >> 10) & FIELD_MASK) as u16,
            w: ((packed >> 20) & FIELD_MASK) as u16,
            h: ((packed >> 30) & FIELD_MASK) as u16,
        }
    }
}

/// Rock height masks stamped into the terrain.
pub const ROCKS: [SpriteDesc; 9] = [
    SpriteDesc::new(83, 5, 9, 9),
    SpriteDesc::new(102, 7, 4, 4),
    SpriteDesc::new(112, 1, 15, 13),
    SpriteDesc::new(83, 19, 9, 9),
    SpriteDesc::new(102, 22, 4, 4),
    SpriteDesc::new(113, 17, 15, 13),
    SpriteDesc::new(83, 36, 9, 9),
    SpriteDesc::new(102, 38, 4, 4),
    SpriteDesc::new(113, 34, 15, 13),
];

/// Ship sprites with the engine off, indexed by heading.
pub const SHIP_OFF: [SpriteDesc; 8] = [
    SpriteDesc::new(0, 0, 4, 9),
    SpriteDesc::new(42, 0, 6, 6),
    SpriteDesc::new(31, 10, 9, 4),
    SpriteDesc::new(41, 13, 6, 6),
    SpriteDesc::new(10, 0, 4, 9),
    SpriteDesc::new(58, 13, 6, 6),
    SpriteDesc::new(10, 10, 9, 4),
    SpriteDesc::new(59, 0, 6, 6),
];

/// Ship sprites with the engine firing, indexed by heading.
pub const SHIP_ON: [SpriteDesc; 8] = [
    SpriteDesc::new(5, 0, 4, 9),
    SpriteDesc::new(49, 0, 9, 9),
    SpriteDesc::new(20, 20, 9, 4),
    SpriteDesc::new(48, 10, 9, 9),
    SpriteDesc::new(15, 0, 4, 9),
    SpriteDesc::new(68, 10, 9, 9),
    SpriteDesc::new(0, 10, 9, 4),
    SpriteDesc::new(6, 0, 9, 9),
];

/// Reserved atlas block holding the six palette ramps (one per row).
pub const PALETTE_SPR: SpriteDesc = SpriteDesc::new(0, 32, 9, 6);

/// Entries per palette ramp.
pub const RAMP_LEN: usize = 9;

/// The six palette ramps, in atlas row order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaletteId {
    Red,
    Green,
    Pink,
    Blue,
    Brown,
    Grey,
}

impl PaletteId {
    pub const ALL: [PaletteId; 6] = [
        PaletteId::Red,
        PaletteId::Green,
        PaletteId::Pink,
        PaletteId::Blue,
        PaletteId::Brown,
        PaletteId::Grey,
    ];

    /// Row offset inside [`PALETTE_SPR`].
    pub const fn row(self) -> usize {
        match self {
            PaletteId::Red => 0,
            PaletteId::Green => 1,
            PaletteId::Pink => 2,
            PaletteId::Blue => 3,
            PaletteId::Brown => 4,
            PaletteId::Grey => 5,
        }
    }
}

/// One cell of a level descriptor grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LevelCell {
    #[default]
    Empty,
    /// Dense destructible rock.
    Rock,
    /// Landing goal marker.
    Goal,
    /// Resource depot marker.
    Depot,
}

impl LevelCell {
    /// Decode the small-integer cell code (`0..=3`).
    ///
    /// ```
    /// use lunar_oasis_types::LevelCell;
    ///
    /// assert_eq!(LevelCell::from_code(2), Some(LevelCell::Goal));
    /// assert_eq!(LevelCell::from_code(9), None);
    /// ```
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(LevelCell::Empty),
            1 => Some(LevelCell::Rock),
            2 => Some(LevelCell::Goal),
            3 => Some(LevelCell::Depot),
            _ => None,
        }
    }

    pub const fn code(self) -> u8 {
        match self {
            LevelCell::Empty => 0,
            LevelCell::Rock => 1,
            LevelCell::Goal => 2,
            LevelCell::Depot => 3,
        }
    }
}

/// Discrete control events delivered by the host loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShipAction {
    TurnLeft,
    TurnRight,
    Thrust,
    Fire,
    Restart,
}

impl ShipAction {
    /// Parse an action name (case-insensitive).
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "turnleft" | "left" => Some(ShipAction::TurnLeft),
            "turnright" | "right" => Some(ShipAction::TurnRight),
            "thrust" => Some(ShipAction::Thrust),
            "fire" => Some(ShipAction::Fire),
            "restart" => Some(ShipAction::Restart),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ShipAction::TurnLeft => "turnLeft",
            ShipAction::TurnRight => "turnRight",
            ShipAction::Thrust => "thrust",
            ShipAction::Fire => "fire",
            ShipAction::Restart => "restart",
        }
    }
}

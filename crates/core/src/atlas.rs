//! Sprite atlas and palette ramps.
//!
//! The atlas is a single decoded RGBA8 image with a fixed 1024-column stride.
//! Sprites are addressed with [`SpriteDesc`] rectangles; the reserved
//! [`PALETTE_SPR`] block holds six 9-color ramps, one per row.

use thiserror::Error;

use crate::grid::Grid;
use crate::types::{PaletteId, Rgba, SpriteDesc, ATLAS_STRIDE, PALETTE_SPR, RAMP_LEN};

/// Errors raised when building an atlas from raw pixel data.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AtlasError {
    /// The image is not exactly one atlas stride wide.
    #[error("atlas must be {expected} pixels wide, got {actual}")]
    Stride { expected: usize, actual: usize },
    /// The byte buffer does not match `width * height * 4`.
    #[error("atlas byte length mismatch: expected {expected}, got {actual}")]
    ByteLength { expected: usize, actual: usize },
    /// The image is too short to contain the palette block.
    #[error("atlas has {height} rows, palette block needs {needed}")]
    MissingPalette { height: usize, needed: usize },
}

/// Decoded sprite sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Atlas {
    pixels: Grid<Rgba>,
}

impl Atlas {
    /// Fully transparent atlas with `height` rows.
    pub fn blank(height: usize) -> Self {
        Self {
            pixels: Grid::new(ATLAS_STRIDE, height, Rgba::TRANSPARENT),
        }
    }

    /// Build from row-major RGBA8 bytes.
    pub fn from_rgba8(width: usize, height: usize, bytes: &[u8]) -> Result<Self, AtlasError> {
        if width != ATLAS_STRIDE {
            return Err(AtlasError::Stride {
                expected: ATLAS_STRIDE,
                actual: width,
            });
        }
        let expected = width * height * 4;
        if bytes.len() != expected {
            return Err(AtlasError::ByteLength {
                expected,
                actual: bytes.len(),
            });
        }
        let needed = (PALETTE_SPR.y + PALETTE_SPR.h) as usize;
        if height < needed {
            return Err(AtlasError::MissingPalette { height, needed });
        }

        let mut atlas = Self::blank(height);
        for (dst, px) in atlas.pixels.as_mut_slice().iter_mut().zip(bytes.chunks_exact(4)) {
            *dst = Rgba::new(px[0], px[1], px[2], px[3]);
        }
        Ok(atlas)
    }

    pub fn width(&self) -> usize {
        self.pixels.width()
    }

    pub fn height(&self) -> usize {
        self.pixels.height()
    }

    /// Pixel at `(x, y)`, or `None` outside the image.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<Rgba> {
        self.pixels.get(x, y)
    }

    pub fn set(&mut self, x: i32, y: i32, color: Rgba) -> bool {
        self.pixels.set(x, y, color)
    }

    /// Paint a whole sprite region with one color.
    ///
    /// Used to author masks in tests and benchmarks without a sprite sheet.
    pub fn fill_region(&mut self, desc: SpriteDesc, color: Rgba) {
        for y in 0..desc.h as i32 {
            for x in 0..desc.w as i32 {
                self.pixels.set(desc.x as i32 + x, desc.y as i32 + y, color);
            }
        }
    }

    /// Visit every pixel of a sprite as `(dx, dy, color)` with offsets relative to
    /// the sprite origin. Pixels falling outside the atlas are skipped.
    pub fn for_each_in(&self, desc: SpriteDesc, mut f: impl FnMut(i32, i32, Rgba)) {
        for dy in 0..desc.h as i32 {
            for dx in 0..desc.w as i32 {
                if let Some(c) = self.get(desc.x as i32 + dx, desc.y as i32 + dy) {
                    f(dx, dy, c);
                }
            }
        }
    }

    /// Find the first pixel of a sprite matching `pred`, short-circuiting.
    pub fn any_in(&self, desc: SpriteDesc, mut pred: impl FnMut(i32, i32, Rgba) -> bool) -> bool {
        for dy in 0..desc.h as i32 {
            for dx in 0..desc.w as i32 {
                if let Some(c) = self.get(desc.x as i32 + dx, desc.y as i32 + dy) {
                    if pred(dx, dy, c) {
                        return true;
                    }
                }
            }
        }
        false
    }
}

/// The six palette ramps, extracted once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palettes {
    ramps: [[Rgba; RAMP_LEN]; 6],
}

impl Palettes {
    /// Read the ramps from the reserved palette block of the atlas.
    pub fn extract(atlas: &Atlas) -> Self {
        let mut ramps = [[Rgba::BLACK; RAMP_LEN]; 6];
        for id in PaletteId::ALL {
            let y = PALETTE_SPR.y as i32 + id.row() as i32;
            for (i, slot) in ramps[id.row()].iter_mut().enumerate() {
                if let Some(c) = atlas.get(PALETTE_SPR.x as i32 + i as i32, y) {
                    *slot = c;
                }
            }
        }
        Self { ramps }
    }

    pub fn from_ramps(ramps: [[Rgba; RAMP_LEN]; 6]) -> Self {
        Self { ramps }
    }

    #[inline]
    pub fn ramp(&self, id: PaletteId) -> &[Rgba; RAMP_LEN] {
        &self.ramps[id.row()]
    }
}

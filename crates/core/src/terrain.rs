//! Terrain module - the 1024×1024 height field and its speckle overlay
//!
//! Heights are `u16`; `0` means "no solid terrain". The field is only ever
//! changed by [`Terrain::stamp`], which rasterises a sprite's mask as a
//! localised raise (positive scale) or lower (non-positive scale).
//!
//! The speckle field marks decorative starfield pixels in empty space. It is
//! filled once per level by [`Terrain::speckle`] and read-only afterwards.

use tracing::debug;

use crate::atlas::Atlas;
use crate::grid::Grid;
use crate::rng::SimpleRng;
use crate::types::{SpriteDesc, WORLD_SIZE};

/// Sprite pixels at or below this alpha do not touch the height field.
pub const STAMP_ALPHA_THRESHOLD: u8 = 16;

/// One speckle sample per this many world cells.
pub const SPECKLE_DENSITY: usize = 128;

const SPECKLE_INDEX_BITS: u32 = 20;

/// Height field plus speckle flags.
#[derive(Debug, Clone)]
pub struct Terrain {
    heights: Grid<u16>,
    speckle: Grid<u8>,
}

impl Default for Terrain {
    fn default() -> Self {
        Self::new()
    }
}

impl Terrain {
    pub fn new() -> Self {
        Self {
            heights: Grid::new(WORLD_SIZE, WORLD_SIZE, 0),
            speckle: Grid::new(WORLD_SIZE, WORLD_SIZE, 0),
        }
    }

    /// Zero both the height field and the speckle field.
    pub fn clear(&mut self) {
        self.heights.fill(0);
        self.speckle.fill(0);
    }

    /// Height at `(x, y)`; `0` outside the field.
    #[inline]
    pub fn height(&self, x: i32, y: i32) -> u16 {
        self.heights.get_or(x, y, 0)
    }

    #[inline]
    pub fn is_solid(&self, x: i32, y: i32) -> bool {
        self.height(x, y) > 0
    }

    #[inline]
    pub fn is_speckled(&self, x: i32, y: i32) -> bool {
        self.speckle.get_or(x, y, 0) != 0
    }

    pub fn heights(&self) -> &Grid<u16> {
        &self.heights
    }

    /// Rasterise a sprite mask into the height field.
    ///
    /// The footprint is centred on `(cx, cy)`. Each sprite pixel whose alpha
    /// exceeds [`STAMP_ALPHA_THRESHOLD`] yields
    /// `candidate = clamp(base + r * scale / 100, 0, 65535)`, where `r` is the
    /// pixel's low byte. With `scale > 0` the cell becomes
    /// `max(current, candidate)`; otherwise `min(current, candidate)`.
    /// Cells outside the world are skipped individually.
    pub fn stamp(&mut self, atlas: &Atlas, desc: SpriteDesc, cx: i32, cy: i32, base: i32, scale: i32) {
        let x1 = cx - desc.w as i32 / 2;
        let y1 = cy - desc.h as i32 / 2;
        let raise = scale > 0;
        atlas.for_each_in(desc, |dx, dy, px| {
            if px.a <= STAMP_ALPHA_THRESHOLD {
                return;
            }
            let Some(cell) = self.heights.get_mut(x1 + dx, y1 + dy) else {
                return;
            };
            let candidate = (base as i64 + px.r as i64 * scale as i64 / 100).clamp(0, u16::MAX as i64) as u16;
            *cell = if raise {
                (*cell).max(candidate)
            } else {
                (*cell).min(candidate)
            };
        });
    }

    /// Scatter the decorative speckle for `level`.
    ///
    /// Reseeds from the level number, so the pattern is stable per level.
    pub fn speckle(&mut self, level: u32) {
        let mut rng = SimpleRng::for_level(level);
        let samples = WORLD_SIZE * WORLD_SIZE / SPECKLE_DENSITY;
        for _ in 0..samples {
            let idx = rng.next_bits(SPECKLE_INDEX_BITS) as usize;
            self.speckle.as_mut_slice()[idx] = 1;
        }
        debug!(level, samples, "speckle field seeded");
    }

    /// Count of speckled cells.
    pub fn speckle_count(&self) -> usize {
        self.speckle.as_slice().iter().filter(|&&s| s != 0).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Rgba;

    const MASK: SpriteDesc = SpriteDesc::new(0, 0, 3, 3);

    fn atlas_with_mask(value: u8, alpha: u8) -> Atlas {
        let mut atlas = Atlas::blank(64);
        atlas.fill_region(MASK, Rgba::new(value, value, value, alpha));
        atlas
    }

    #[test]
    fn stamp_centres_the_footprint() {
        let atlas = atlas_with_mask(10, 255);
        let mut t = Terrain::new();
        t.stamp(&atlas, MASK, 5, 5, 100, 100);
        assert_eq!(t.height(4, 4), 110);
        assert_eq!(t.height(6, 6), 110);
        assert_eq!(t.height(7, 5), 0);
        assert_eq!(t.height(3, 5), 0);
    }

    #[test]
    fn stamp_ignores_faint_pixels() {
        let atlas = atlas_with_mask(200, STAMP_ALPHA_THRESHOLD);
        let mut t = Terrain::new();
        t.stamp(&atlas, MASK, 5, 5, 100, 100);
        assert_eq!(t.height(5, 5), 0);
    }

    #[test]
    fn stamp_scales_the_mask() {
        let atlas = atlas_with_mask(200, 255);
        let mut t = Terrain::new();
        t.stamp(&atlas, MASK, 5, 5, 0, 50);
        assert_eq!(t.height(5, 5), 100);
    }

    #[test]
    fn stamp_skips_cells_outside_the_world() {
        let atlas = atlas_with_mask(1, 255);
        let mut t = Terrain::new();
        t.stamp(&atlas, MASK, 0, 1023, 7, 100);
        assert_eq!(t.height(0, 1023), 8);
        assert_eq!(t.height(1, 1022), 8);
        assert_eq!(t.height(-1, 1023), 0);
    }

    #[test]
    fn non_positive_scale_lowers() {
        let atlas = atlas_with_mask(50, 255);
        let mut t = Terrain::new();
        t.stamp(&atlas, MASK, 5, 5, 500, 100);
        t.stamp(&atlas, MASK, 5, 5, 0, 0);
        assert_eq!(t.height(5, 5), 0);
    }

    #[test]
    fn speckle_is_deterministic_per_level() {
        let mut a = Terrain::new();
        let mut b = Terrain::new();
        a.speckle(3);
        b.speckle(3);
        assert_eq!(a.speckle, b.speckle);

        let n = a.speckle_count();
        // Roughly 1/128 of the field, minus collisions.
        assert!(n > 7_000 && n <= 8_192, "unexpected speckle count {n}");

        let mut c = Terrain::new();
        c.speckle(4);
        assert_ne!(a.speckle, c.speckle);
    }

    #[test]
    fn clear_resets_both_fields() {
        let atlas = atlas_with_mask(9, 255);
        let mut t = Terrain::new();
        t.stamp(&atlas, MASK, 50, 50, 1, 100);
        t.speckle(1);
        t.clear();
        assert_eq!(t.height(50, 50), 0);
        assert_eq!(t.speckle_count(), 0);
    }
}

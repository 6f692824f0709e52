//! Terrain renderer - slope shading of the height field through the camera window.
//!
//! Each visible pixel samples its height and the ±1/±2 neighbours on both
//! axes, smooths each direction toward the nearer sample (2:1, or 1:1 for
//! the stepped model), and turns the resulting gradient into an index on the
//! grey palette ramp.

use crate::atlas::Palettes;
use crate::fb::Framebuffer;
use crate::terrain::Terrain;
use crate::types::{PaletteId, Rgba, FB_SIZE, VIEW_HALF, WORLD_SIZE};

/// Dot blended over empty space where the speckle field is set.
pub const SPECKLE_DOT: Rgba = Rgba::new(0x90, 0x90, 0x90, 0x60);

/// How a gradient becomes a ramp index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Shading {
    /// Pseudo surface normal dotted with a fixed light direction.
    #[default]
    Lambert,
    /// Earlier heuristic: brightness nudged by the order of opposing samples.
    Stepped,
}

impl Shading {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "lambert" | "normal" => Some(Shading::Lambert),
            "stepped" | "legacy" => Some(Shading::Stepped),
            _ => None,
        }
    }

    /// Ramp index for a sampled neighbourhood with a non-zero centre.
    pub fn ramp_index(self, s: &Slope) -> usize {
        match self {
            Shading::Lambert => lambert_index(s),
            Shading::Stepped => stepped_index(s),
        }
    }

    /// Weight of the nearer sample when smoothing each direction.
    /// The stepped heuristic averages both samples evenly.
    pub fn near_weight(self) -> i32 {
        match self {
            Shading::Lambert => 2,
            Shading::Stepped => 1,
        }
    }
}

/// Smoothed neighbourhood of one height sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slope {
    pub center: i32,
    pub east: i32,
    pub west: i32,
    pub south: i32,
    pub north: i32,
}

impl Slope {
    /// Sample around `(x, y)`. The caller guarantees `(x, y)` is inside the field.
    ///
    /// Edge policy: a missing ±1 sample reuses the centre, a missing ±2 sample
    /// reuses the ±1 sample.
    pub fn sample(terrain: &Terrain, x: i32, y: i32) -> Self {
        Self::sample_weighted(terrain, x, y, 2)
    }

    /// Like [`Slope::sample`], but each arm is `(near * w + far) / (w + 1)`.
    pub fn sample_weighted(terrain: &Terrain, x: i32, y: i32, w: i32) -> Self {
        let h = terrain.heights();
        let center = h.get_or(x, y, 0) as i32;
        let arm = |dx: i32, dy: i32| {
            let near = h.get_or(x + dx, y + dy, center as u16) as i32;
            let far = h.get_or(x + 2 * dx, y + 2 * dy, near as u16) as i32;
            (near * w + far) / (w + 1)
        };
        Self {
            center,
            east: arm(1, 0),
            west: arm(-1, 0),
            south: arm(0, 1),
            north: arm(0, -1),
        }
    }
}

fn lambert_index(s: &Slope) -> usize {
    let nx = 2 * (s.east - s.west) as i64;
    let ny = 2 * (s.south - s.north) as i64;
    let nz = -4i64;
    let len2 = nx * nx + ny * ny + nz * nz;
    let dot = (ny - nz - nx) * 65535 / len2;
    (dot / 64 + 4).clamp(2, 7) as usize
}

fn stepped_index(s: &Slope) -> usize {
    let dim = |l: i32, lit: bool| if lit { (l + l / 2) / 2 } else { (l + l / 4) / 2 };
    let mut l = s.center;
    l = if s.east > s.west {
        dim(l, s.center > s.west)
    } else {
        l + l / 5
    };
    l = if s.south < s.north {
        dim(l, s.center > s.north)
    } else {
        l + l / 5
    };
    ((l * 9) >> 8).clamp(1, 8) as usize
}

/// Renders the visible window of a terrain into a framebuffer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerrainRenderer {
    shading: Shading,
}

impl TerrainRenderer {
    pub fn new(shading: Shading) -> Self {
        Self { shading }
    }

    pub fn shading(&self) -> Shading {
        self.shading
    }

    /// Shade the 64×64 window centred on `(cam_x, cam_y)`.
    ///
    /// Pixels whose world coordinate lies outside the field, and empty cells
    /// without speckle, are left untouched.
    pub fn render(&self, terrain: &Terrain, palettes: &Palettes, fb: &mut Framebuffer, cam_x: i32, cam_y: i32) {
        let grey = palettes.ramp(PaletteId::Grey);
        let world = WORLD_SIZE as i32;
        for sy in 0..FB_SIZE as i32 {
            let y = cam_y - VIEW_HALF + sy;
            if y < 0 || y >= world {
                continue;
            }
            for sx in 0..FB_SIZE as i32 {
                let x = cam_x - VIEW_HALF + sx;
                if x < 0 || x >= world {
                    continue;
                }
                let slope = Slope::sample_weighted(terrain, x, y, self.shading.near_weight());
                if slope.center == 0 {
                    if terrain.is_speckled(x, y) {
                        fb.blend_pixel(sx, sy, SPECKLE_DOT);
                    }
                    continue;
                }
                fb.set(sx, sy, grey[self.shading.ramp_index(&slope)]);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat(h: i32) -> Slope {
        Slope {
            center: h,
            east: h,
            west: h,
            south: h,
            north: h,
        }
    }

    #[test]
    fn flat_ground_is_fully_lit() {
        assert_eq!(Shading::Lambert.ramp_index(&flat(128)), 7);
    }

    #[test]
    fn slopes_facing_away_from_light_darken() {
        let s = Slope {
            east: 160,
            west: 100,
            ..flat(128)
        };
        assert_eq!(Shading::Lambert.ramp_index(&s), 2);
    }

    #[test]
    fn lambert_index_stays_in_range() {
        for e in (0..400).step_by(7) {
            for n in (0..400).step_by(11) {
                let s = Slope {
                    east: e,
                    north: n,
                    ..flat(200)
                };
                let i = Shading::Lambert.ramp_index(&s);
                assert!((2..=7).contains(&i));
            }
        }
    }

    #[test]
    fn stepped_index_stays_in_range() {
        for c in [1, 50, 128, 400, 65535] {
            for e in [0, c / 2, c, c * 2] {
                let s = Slope { east: e, ..flat(c) };
                let i = Shading::Stepped.ramp_index(&s);
                assert!((1..=8).contains(&i));
            }
        }
    }

    #[test]
    fn sample_reuses_nearer_values_at_edges() {
        let mut t = Terrain::new();
        let mut atlas = crate::atlas::Atlas::blank(64);
        let mask = crate::types::SpriteDesc::new(0, 0, 1, 1);
        atlas.fill_region(mask, Rgba::new(0, 0, 0, 255));
        t.stamp(&atlas, mask, 0, 0, 90, 100);
        let s = Slope::sample(&t, 0, 0);
        assert_eq!(s.center, 90);
        // West and north fall outside: both arms collapse to the centre.
        assert_eq!(s.west, 90);
        assert_eq!(s.north, 90);
        // East neighbours are empty.
        assert_eq!(s.east, 0);
    }

    #[test]
    fn stepped_shading_averages_samples_evenly() {
        let mut atlas = crate::atlas::Atlas::blank(64);
        let mask = crate::types::SpriteDesc::new(0, 0, 1, 1);
        atlas.fill_region(mask, Rgba::new(0, 0, 0, 255));
        let mut t = Terrain::new();
        for (x, h) in [(3, 100), (4, 100), (5, 200), (6, 200)] {
            t.stamp(&atlas, mask, x, 5, h, 100);
        }

        let even = Slope::sample_weighted(&t, 5, 5, Shading::Stepped.near_weight());
        assert_eq!((even.east, even.west), (100, 100));
        assert_eq!(Shading::Stepped.ramp_index(&even), 8);

        let near = Slope::sample(&t, 5, 5);
        assert_eq!((near.east, near.west), (133, 100));
        assert_eq!(Shading::Stepped.ramp_index(&near), 6);
    }

    #[test]
    fn parses_shading_names() {
        assert_eq!(Shading::from_str("Lambert"), Some(Shading::Lambert));
        assert_eq!(Shading::from_str(" stepped "), Some(Shading::Stepped));
        assert_eq!(Shading::from_str("phong"), None);
    }
}

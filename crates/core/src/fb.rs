//! Framebuffer - the fixed 64×64 RGBA canvas handed to presentation.
//!
//! All primitives clip silently: draw calls that fall partly or wholly
//! outside the canvas write only the visible pixels, or nothing.

use crate::atlas::Atlas;
use crate::grid::Grid;
use crate::types::{Rgba, SpriteDesc, FB_SIZE};

const LAST: i32 = FB_SIZE as i32 - 1;

/// Alpha-over compositing of `src` onto `dst`.
///
/// Channels are weighted with `>> 8` rather than `/ 255`, so even an opaque
/// source lands one step dark. Alpha accumulates and saturates.
///
/// ```
/// use lunar_oasis_core::fb::blend;
/// use lunar_oasis_core::types::Rgba;
///
/// let out = blend(Rgba::BLACK, Rgba::new(255, 255, 255, 128));
/// assert_eq!(out, Rgba::new(127, 127, 127, 255));
/// ```
#[inline]
pub fn blend(dst: Rgba, src: Rgba) -> Rgba {
    let sa = src.a as u32;
    let inv = 255 - sa;
    let mix = |d: u8, s: u8| ((d as u32 * inv + s as u32 * sa) >> 8).min(255) as u8;
    Rgba {
        r: mix(dst.r, src.r),
        g: mix(dst.g, src.g),
        b: mix(dst.b, src.b),
        a: (dst.a as u32 + sa).min(255) as u8,
    }
}

/// 64×64 RGBA canvas, row-major with stride 64.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Framebuffer {
    pixels: Grid<Rgba>,
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Framebuffer {
    pub fn new() -> Self {
        Self {
            pixels: Grid::new(FB_SIZE, FB_SIZE, Rgba::BLACK),
        }
    }

    pub fn pixels(&self) -> &[Rgba] {
        self.pixels.as_slice()
    }

    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<Rgba> {
        self.pixels.get(x, y)
    }

    #[inline]
    pub fn set(&mut self, x: i32, y: i32, color: Rgba) -> bool {
        self.pixels.set(x, y, color)
    }

    /// Blend `color` over the pixel at `(x, y)`. No-op outside the canvas.
    #[inline]
    pub fn blend_pixel(&mut self, x: i32, y: i32, color: Rgba) {
        if let Some(px) = self.pixels.get_mut(x, y) {
            *px = blend(*px, color);
        }
    }

    /// Fill every pixel with `color`.
    pub fn clear(&mut self, color: Rgba) {
        self.pixels.fill(color);
    }

    /// Axis-aligned fill, clipped to the canvas.
    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Rgba) {
        if x > LAST || y > LAST || w <= 0 || h <= 0 || x + w <= 0 || y + h <= 0 {
            return;
        }
        let x1 = x.clamp(0, LAST);
        let y1 = y.clamp(0, LAST);
        let x2 = (x + w).clamp(0, FB_SIZE as i32);
        let y2 = (y + h).clamp(0, FB_SIZE as i32);
        for yy in y1..y2 {
            for xx in x1..x2 {
                self.pixels.set(xx, yy, color);
            }
        }
    }

    /// Fill all pixels within radius `r` of `(cx, cy)` (inclusive).
    ///
    /// When the circle's bounding box misses the canvas entirely the whole
    /// buffer is filled instead; fades rely on this to black out the screen.
    pub fn fill_circle(&mut self, cx: i32, cy: i32, r: i32, color: Rgba) {
        if cx.saturating_add(r) < 0
            || cy.saturating_add(r) < 0
            || cx.saturating_sub(r) > LAST
            || cy.saturating_sub(r) > LAST
        {
            self.clear(color);
            return;
        }
        let x1 = cx.saturating_sub(r).clamp(0, LAST);
        let y1 = cy.saturating_sub(r).clamp(0, LAST);
        let x2 = cx.saturating_add(r).clamp(0, LAST);
        let y2 = cy.saturating_add(r).clamp(0, LAST);
        let r2 = r as i64 * r as i64;
        for yy in y1..=y2 {
            for xx in x1..=x2 {
                if dist2(xx, yy, cx, cy) <= r2 {
                    self.pixels.set(xx, yy, color);
                }
            }
        }
    }

    /// Fill every pixel strictly farther than `r` from `(cx, cy)`.
    pub fn fill_outside_circle(&mut self, cx: i32, cy: i32, r: i32, color: Rgba) {
        let r2 = r as i64 * r as i64;
        for yy in 0..FB_SIZE as i32 {
            for xx in 0..FB_SIZE as i32 {
                if dist2(xx, yy, cx, cy) > r2 {
                    self.pixels.set(xx, yy, color);
                }
            }
        }
    }

    /// Copy an atlas region verbatim (alpha ignored).
    #[allow(clippy::too_many_arguments)]
    pub fn blit_opaque(&mut self, atlas: &Atlas, sx: i32, sy: i32, w: i32, h: i32, dx: i32, dy: i32) {
        self.blit_with(atlas, sx, sy, w, h, dx, dy, |dst, src| {
            *dst = src;
        });
    }

    /// Blend an atlas region; fully transparent source pixels are skipped.
    #[allow(clippy::too_many_arguments)]
    pub fn blit_alpha(&mut self, atlas: &Atlas, sx: i32, sy: i32, w: i32, h: i32, dx: i32, dy: i32) {
        self.blit_with(atlas, sx, sy, w, h, dx, dy, |dst, src| {
            if src.a > 0 {
                *dst = blend(*dst, src);
            }
        });
    }

    /// Draw a sprite by descriptor with its top-left corner at `(dx, dy)`.
    pub fn blit_sprite(&mut self, atlas: &Atlas, desc: SpriteDesc, dx: i32, dy: i32, alpha: bool) {
        let (sx, sy, w, h) = (desc.x as i32, desc.y as i32, desc.w as i32, desc.h as i32);
        if alpha {
            self.blit_alpha(atlas, sx, sy, w, h, dx, dy);
        } else {
            self.blit_opaque(atlas, sx, sy, w, h, dx, dy);
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn blit_with(
        &mut self,
        atlas: &Atlas,
        sx: i32,
        sy: i32,
        w: i32,
        h: i32,
        dx: i32,
        dy: i32,
        mut put: impl FnMut(&mut Rgba, Rgba),
    ) {
        if dx > LAST || dy > LAST || w <= 0 || h <= 0 || dx + w <= 0 || dy + h <= 0 {
            return;
        }
        for y in 0..h {
            let ty = dy + y;
            if !(0..=LAST).contains(&ty) {
                continue;
            }
            for x in 0..w {
                let tx = dx + x;
                if !(0..=LAST).contains(&tx) {
                    continue;
                }
                let Some(src) = atlas.get(sx + x, sy + y) else {
                    continue;
                };
                if let Some(dst) = self.pixels.get_mut(tx, ty) {
                    put(dst, src);
                }
            }
        }
    }
}

/// Squared distance, widened so far-off centres cannot overflow.
fn dist2(x: i32, y: i32, cx: i32, cy: i32) -> i64 {
    let dx = x as i64 - cx as i64;
    let dy = y as i64 - cy as i64;
    dx * dx + dy * dy
}

//! PixelView: maps the 64×64 RGBA frame into terminal cells.
//!
//! Each terminal cell shows two vertically stacked pixels using the upper
//! half block `▀`: foreground = upper pixel, background = lower pixel. Since
//! terminal glyphs are about twice as tall as wide, this keeps pixels square.
//! The image is upscaled by the largest integer factor that fits, centred
//! horizontally, with one HUD text row underneath.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::Framebuffer;
use crate::fb::{CellBuffer, CellStyle, Rgb};
use crate::types::FB_SIZE;

/// Upper half block.
pub const HALF_BLOCK: char = '▀';

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Where the image lands inside a viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    /// Terminal cells per pixel column; pixel rows per cell is `2 / scale`.
    pub scale: u16,
    pub origin_x: u16,
    pub origin_y: u16,
    /// Image size in cells.
    pub cols: u16,
    pub rows: u16,
    /// Row holding the status text.
    pub hud_row: u16,
}

#[derive(Debug, Clone, Copy)]
pub struct PixelView {
    hud_style: CellStyle,
    background: CellStyle,
}

impl Default for PixelView {
    fn default() -> Self {
        Self {
            hud_style: CellStyle {
                fg: Rgb::new(200, 200, 200),
                bg: Rgb::new(0, 0, 0),
                bold: true,
            },
            background: CellStyle::default(),
        }
    }
}

impl PixelView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Largest integer scale that fits the viewport (minimum 1; smaller
    /// terminals get a clipped image).
    pub fn layout(&self, viewport: Viewport) -> Layout {
        let size = FB_SIZE as u16;
        let by_width = viewport.width / size;
        let by_height = viewport.height.saturating_sub(1) / (size / 2);
        let scale = by_width.min(by_height).max(1);
        let cols = size * scale;
        let rows = size / 2 * scale;
        Layout {
            scale,
            origin_x: viewport.width.saturating_sub(cols) / 2,
            origin_y: 0,
            cols,
            rows,
            hud_row: rows,
        }
    }

    /// Render `frame` plus the status line into `out`, resizing it to the viewport.
    ///
    /// This is the allocation-free hot path once `out` has been sized.
    pub fn render_into(&self, frame: &Framebuffer, hud: &str, viewport: Viewport, out: &mut CellBuffer) {
        out.resize(viewport.width, viewport.height);
        out.clear(self.background.into_cell(' '));

        let layout = self.layout(viewport);
        let s = layout.scale as i32;
        for cy in 0..layout.rows {
            let top = (2 * cy as i32) / s;
            let bottom = (2 * cy as i32 + 1) / s;
            for cx in 0..layout.cols {
                let px = cx as i32 / s;
                let fg = frame.get(px, top).unwrap_or_default();
                let bg = frame.get(px, bottom).unwrap_or_default();
                let style = CellStyle::colors(fg.into(), bg.into());
                out.set(
                    layout.origin_x + cx,
                    layout.origin_y + cy,
                    style.into_cell(HALF_BLOCK),
                );
            }
        }

        out.put_str(layout.origin_x, layout.hud_row, hud, self.hud_style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Rgba;

    #[test]
    fn layout_picks_the_largest_fitting_scale() {
        let view = PixelView::new();
        let l = view.layout(Viewport::new(200, 80));
        assert_eq!(l.scale, 2);
        assert_eq!((l.cols, l.rows), (128, 64));
        assert_eq!(l.origin_x, 36);
        assert_eq!(l.hud_row, 64);

        let tiny = view.layout(Viewport::new(20, 10));
        assert_eq!(tiny.scale, 1);
        assert_eq!(tiny.origin_x, 0);
    }

    #[test]
    fn half_blocks_pair_upper_and_lower_pixels() {
        let mut frame = Framebuffer::new();
        frame.set(0, 0, Rgba::opaque(255, 0, 0));
        frame.set(0, 1, Rgba::opaque(0, 0, 255));
        let mut out = CellBuffer::new(1, 1);
        PixelView::new().render_into(&frame, "", Viewport::new(64, 33), &mut out);

        let cell = out.get(0, 0).unwrap();
        assert_eq!(cell.ch, HALF_BLOCK);
        assert_eq!(cell.style.fg, Rgb::new(255, 0, 0));
        assert_eq!(cell.style.bg, Rgb::new(0, 0, 255));
    }

    #[test]
    fn upscaling_repeats_pixels() {
        let mut frame = Framebuffer::new();
        frame.set(1, 0, Rgba::opaque(9, 9, 9));
        let mut out = CellBuffer::new(1, 1);
        PixelView::new().render_into(&frame, "", Viewport::new(128, 65), &mut out);
        // Scale 2: pixel column 1 covers cell columns 2 and 3; cell row 0
        // shows pixel row 0 on top and bottom.
        for cx in [2, 3] {
            let cell = out.get(cx, 0).unwrap();
            assert_eq!(cell.style.fg, Rgb::new(9, 9, 9));
            assert_eq!(cell.style.bg, Rgb::new(9, 9, 9));
        }
        assert_eq!(out.get(4, 0).unwrap().style.fg, Rgb::new(0, 0, 0));
    }

    #[test]
    fn hud_sits_under_the_image() {
        let frame = Framebuffer::new();
        let mut out = CellBuffer::new(1, 1);
        PixelView::new().render_into(&frame, "FUEL", Viewport::new(64, 33), &mut out);
        assert_eq!(out.get(0, 32).map(|c| c.ch), Some('F'));
        assert_eq!(out.get(3, 32).map(|c| c.ch), Some('L'));
    }
}

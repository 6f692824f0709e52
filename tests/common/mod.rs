//! Synthetic sprite sheet shared by the integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use lunar_oasis::core::Atlas;
use lunar_oasis::types::{PaletteId, Rgba, SpriteDesc, PALETTE_SPR, RAMP_LEN, ROCKS, SHIP_OFF, SHIP_ON};

/// Fully opaque 9×9 mask with low byte 200.
pub const ROCK9: SpriteDesc = SpriteDesc::new(300, 0, 9, 9);
/// 9×9 region left fully transparent.
pub const GHOST9: SpriteDesc = SpriteDesc::new(320, 0, 9, 9);
/// Wide flat landing strip.
pub const STRIP: SpriteDesc = SpriteDesc::new(340, 0, 64, 4);
/// Single opaque pixel.
pub const DOT: SpriteDesc = SpriteDesc::new(420, 0, 1, 1);

/// Distinct colour for every `(palette, index)` pair.
pub fn ramp_color(id: PaletteId, i: usize) -> Rgba {
    Rgba::opaque(20 + 25 * i as u8, 30 * id.row() as u8, 250 - 25 * i as u8)
}

pub fn atlas() -> Atlas {
    let mut atlas = Atlas::blank(64);
    for s in SHIP_OFF.iter().chain(SHIP_ON.iter()) {
        atlas.fill_region(*s, Rgba::new(180, 180, 200, 255));
    }
    for s in ROCKS {
        atlas.fill_region(s, Rgba::new(60, 60, 60, 255));
    }
    atlas.fill_region(ROCK9, Rgba::new(200, 200, 200, 255));
    atlas.fill_region(STRIP, Rgba::new(20, 20, 20, 255));
    atlas.fill_region(DOT, Rgba::new(255, 255, 255, 255));
    for id in PaletteId::ALL {
        for i in 0..RAMP_LEN {
            atlas.set(
                PALETTE_SPR.x as i32 + i as i32,
                PALETTE_SPR.y as i32 + id.row() as i32,
                ramp_color(id, i),
            );
        }
    }
    atlas
}

pub fn shared_atlas() -> Arc<Atlas> {
    Arc::new(atlas())
}

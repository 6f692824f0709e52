//! Collision probe - sprite footprint against the height field.

use crate::atlas::Atlas;
use crate::terrain::Terrain;
use crate::types::SpriteDesc;

/// True if any visible pixel of `desc`, placed with its top-left corner at
/// `(wx, wy)`, covers solid terrain.
///
/// Transparent pixels never collide, and pixels landing outside the field
/// are skipped rather than treated as hits.
pub fn collides(atlas: &Atlas, terrain: &Terrain, desc: SpriteDesc, wx: i32, wy: i32) -> bool {
    atlas.any_in(desc, |dx, dy, px| px.a > 0 && terrain.is_solid(wx + dx, wy + dy))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Rgba;

    const SHIP: SpriteDesc = SpriteDesc::new(0, 0, 4, 4);
    const ROCK: SpriteDesc = SpriteDesc::new(10, 0, 4, 4);

    fn scene() -> (Atlas, Terrain) {
        let mut atlas = Atlas::blank(64);
        atlas.fill_region(SHIP, Rgba::opaque(255, 255, 255));
        atlas.fill_region(ROCK, Rgba::opaque(40, 40, 40));
        let mut terrain = Terrain::new();
        terrain.stamp(&atlas, ROCK, 100, 100, 10, 100);
        (atlas, terrain)
    }

    #[test]
    fn overlap_is_a_hit() {
        let (atlas, terrain) = scene();
        assert!(collides(&atlas, &terrain, SHIP, 97, 97));
        assert!(collides(&atlas, &terrain, SHIP, 101, 101));
    }

    #[test]
    fn adjacent_is_not_a_hit() {
        let (atlas, terrain) = scene();
        // Rock covers 98..102 on both axes.
        assert!(!collides(&atlas, &terrain, SHIP, 94, 98));
        assert!(!collides(&atlas, &terrain, SHIP, 102, 98));
    }

    #[test]
    fn transparent_pixels_never_collide() {
        let (mut atlas, terrain) = scene();
        atlas.fill_region(SHIP, Rgba::TRANSPARENT);
        assert!(!collides(&atlas, &terrain, SHIP, 98, 98));
    }

    #[test]
    fn probes_reach_the_far_half_of_the_field() {
        let (atlas, mut terrain) = scene();
        terrain.stamp(&atlas, ROCK, 900, 900, 10, 100);
        assert!(collides(&atlas, &terrain, SHIP, 898, 898));
    }

    #[test]
    fn out_of_field_probes_are_misses() {
        let (atlas, terrain) = scene();
        assert!(!collides(&atlas, &terrain, SHIP, -10, -10));
        assert!(!collides(&atlas, &terrain, SHIP, 2000, 5));
    }
}

//! Simulation context - owns every piece of per-run state.
//!
//! One [`Simulation`] holds the framebuffer, terrain, particle pool and
//! renderer for a session. The sprite atlas is shared read-only behind an
//! `Arc`, so several contexts (tests, benches, replays) can use one decoded
//! sheet.
//!
//! A frame is always: clear, terrain, particles. Callers draw the ship and
//! overlays afterwards through [`Simulation::draw_sprite`] and
//! [`Simulation::fb_mut`].

use std::sync::Arc;

use tracing::{debug, info};

use crate::atlas::{Atlas, Palettes};
use crate::fb::Framebuffer;
use crate::level::{build_level, LevelDesc, LevelLayout, CARVE_BRUSH};
use crate::particles::ParticlePool;
use crate::probe;
use crate::rng::SimpleRng;
use crate::shade::{Shading, TerrainRenderer};
use crate::terrain::Terrain;
use crate::types::{Rgba, SpriteDesc, VIEW_HALF, WORLD_SIZE};

/// Cameras stay this far from the world edge.
pub const CAMERA_MARGIN: i32 = VIEW_HALF;

#[derive(Debug, Clone)]
pub struct Simulation {
    atlas: Arc<Atlas>,
    palettes: Palettes,
    fb: Framebuffer,
    terrain: Terrain,
    particles: ParticlePool,
    renderer: TerrainRenderer,
    rng: SimpleRng,
    background: Rgba,
}

impl Simulation {
    pub fn new(atlas: Arc<Atlas>, shading: Shading, seed: u32) -> Self {
        let palettes = Palettes::extract(&atlas);
        info!(?shading, seed, "simulation created");
        Self {
            atlas,
            palettes,
            fb: Framebuffer::new(),
            terrain: Terrain::new(),
            particles: ParticlePool::new(seed ^ 0xA5A5_5A5A),
            renderer: TerrainRenderer::new(shading),
            rng: SimpleRng::new(seed),
            background: Rgba::BLACK,
        }
    }

    pub fn atlas(&self) -> &Atlas {
        &self.atlas
    }

    pub fn palettes(&self) -> &Palettes {
        &self.palettes
    }

    pub fn fb(&self) -> &Framebuffer {
        &self.fb
    }

    pub fn fb_mut(&mut self) -> &mut Framebuffer {
        &mut self.fb
    }

    pub fn terrain(&self) -> &Terrain {
        &self.terrain
    }

    pub fn particles(&self) -> &ParticlePool {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut ParticlePool {
        &mut self.particles
    }

    pub fn shading(&self) -> Shading {
        self.renderer.shading()
    }

    pub fn set_background(&mut self, color: Rgba) {
        self.background = color;
    }

    /// Kill all particles and rebuild the terrain for `desc`.
    pub fn load_level(&mut self, desc: &LevelDesc, level: u32) -> LevelLayout {
        self.particles.clear();
        let layout = build_level(desc, level, &self.atlas, &mut self.terrain, &mut self.rng);
        info!(level, start = ?layout.start, "level loaded");
        layout
    }

    /// Clear, shade the terrain window, then advance and draw particles.
    pub fn render_frame(&mut self, dt: f32, cam_x: i32, cam_y: i32) {
        self.fb.clear(self.background);
        self.renderer
            .render(&self.terrain, &self.palettes, &mut self.fb, cam_x, cam_y);
        self.particles.update_and_render(
            dt,
            &mut self.fb,
            &self.terrain,
            &self.palettes,
            cam_x,
            cam_y,
        );
    }

    /// Draw a sprite in screen space.
    pub fn draw_sprite(&mut self, desc: SpriteDesc, sx: i32, sy: i32) {
        self.fb.blit_sprite(&self.atlas, desc, sx, sy, true);
    }

    /// Stamp a sprite mask into the terrain; see [`Terrain::stamp`].
    pub fn stamp(&mut self, desc: SpriteDesc, cx: i32, cy: i32, base: i32, scale: i32) {
        self.terrain.stamp(&self.atlas, desc, cx, cy, base, scale);
    }

    /// Blow a crater at `(x, y)` and burst `count` particles from it.
    pub fn detonate(&mut self, x: f32, y: f32, xv: f32, yv: f32, count: usize) -> usize {
        let (cx, cy) = (x.floor() as i32, y.floor() as i32);
        self.terrain.stamp(&self.atlas, CARVE_BRUSH, cx, cy, 0, 0);
        let spawned = self.particles.explode(x, y, xv, yv, count);
        debug!(cx, cy, spawned, "detonation");
        spawned
    }

    /// Does `desc`, drawn with its top-left at world `(wx, wy)`, touch solid terrain?
    pub fn collides(&self, desc: SpriteDesc, wx: i32, wy: i32) -> bool {
        probe::collides(&self.atlas, &self.terrain, desc, wx, wy)
    }

    /// Camera centre following `(x, y)`, kept [`CAMERA_MARGIN`] cells inside the world.
    pub fn camera_for(x: f32, y: f32) -> (i32, i32) {
        let hi = WORLD_SIZE as i32 - CAMERA_MARGIN;
        (
            (x.floor() as i32).clamp(CAMERA_MARGIN, hi),
            (y.floor() as i32).clamp(CAMERA_MARGIN, hi),
        )
    }

    /// Convert a world position to framebuffer coordinates for a camera.
    pub fn to_screen(x: f32, y: f32, cam: (i32, i32)) -> (i32, i32) {
        (
            x.floor() as i32 - cam.0 + VIEW_HALF,
            y.floor() as i32 - cam.1 + VIEW_HALF,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PaletteId, ROCKS, PALETTE_SPR};

    fn atlas() -> Arc<Atlas> {
        let mut atlas = Atlas::blank(64);
        for rock in ROCKS {
            atlas.fill_region(rock, Rgba::new(60, 60, 60, 255));
        }
        for id in PaletteId::ALL {
            for i in 0..9 {
                let shade = (i * 28) as u8;
                atlas.set(
                    PALETTE_SPR.x as i32 + i,
                    PALETTE_SPR.y as i32 + id.row() as i32,
                    Rgba::opaque(shade, shade, shade),
                );
            }
        }
        Arc::new(atlas)
    }

    #[test]
    fn camera_is_clamped_to_the_world() {
        assert_eq!(Simulation::camera_for(0.0, 0.0), (32, 32));
        assert_eq!(Simulation::camera_for(500.7, 20.0), (500, 32));
        assert_eq!(Simulation::camera_for(5000.0, 1023.0), (992, 992));
    }

    #[test]
    fn to_screen_centres_the_camera() {
        assert_eq!(Simulation::to_screen(100.0, 200.0, (100, 200)), (32, 32));
        assert_eq!(Simulation::to_screen(90.5, 210.0, (100, 200)), (22, 42));
    }

    #[test]
    fn detonate_carves_and_spawns() {
        let mut sim = Simulation::new(atlas(), Shading::Lambert, 1);
        sim.stamp(ROCKS[2], 300, 300, 200, 100);
        assert!(sim.terrain().is_solid(300, 300));
        let spawned = sim.detonate(300.0, 300.0, 0.0, 0.0, 64);
        assert_eq!(spawned, 64);
        assert!(!sim.terrain().is_solid(300, 300));
        assert_eq!(sim.particles().live_count(), 64);
    }

    #[test]
    fn load_level_clears_particles_and_carves_the_start() {
        let mut sim = Simulation::new(atlas(), Shading::Stepped, 7);
        sim.particles_mut().spawn_fire(10.0, 10.0, 0.0, 0.0, 5, 1.0);
        let desc = LevelDesc::generated(3);
        let layout = sim.load_level(&desc, 1);
        assert_eq!(sim.particles().live_count(), 0);
        let (sx, sy) = (layout.start.0 as i32, layout.start.1 as i32);
        assert!(!sim.terrain().is_solid(sx, sy));
        assert_eq!(layout.goals.len(), 1);
        assert!(sim.terrain().speckle_count() > 0);
    }

    #[test]
    fn render_frame_draws_terrain_under_the_camera() {
        let mut sim = Simulation::new(atlas(), Shading::Lambert, 1);
        sim.stamp(ROCKS[2], 500, 500, 200, 100);
        sim.render_frame(0.0, 500, 500);
        let centre = sim.fb().get(32, 32).unwrap();
        assert_ne!(centre, Rgba::BLACK);
        let corner = sim.fb().get(0, 0).unwrap();
        assert_eq!(corner, Rgba::BLACK);
    }
}

//! Particle system - fixed pool of fire/explosion points.
//!
//! One [`ParticlePool::update_and_render`] call per frame runs three full
//! passes in order:
//!
//! 1. rebuild the spatial hash from every live particle,
//! 2. age, damp and accelerate each particle, then apply short-range pair
//!    impulses against neighbours found in the 3×3 hash block,
//! 3. integrate, composite into the framebuffer, and resolve terrain
//!    contact (kill outside the world, bounce off solid cells).
//!
//! Spawning never fails loudly: a full pool drops the request.

use std::f32::consts::TAU;

use tracing::trace;

use crate::atlas::Palettes;
use crate::fb::Framebuffer;
use crate::hash::SpatialHash;
use crate::rng::SimpleRng;
use crate::terrain::Terrain;
use crate::types::{PaletteId, FB_SIZE, GRAVITY, PARTICLE_CAPACITY, VIEW_HALF, WORLD_SIZE};

/// Mass of fire particles.
pub const FIRE_MASS: f32 = 0.25;

/// Velocity lost per second, as a fraction of the current velocity.
pub const DAMPING: f32 = 0.25;

/// Pairs closer than this interact.
pub const INTERACTION_RADIUS: f32 = 1.0;

/// Added to the pair distance before taking the reciprocal.
pub const DISTANCE_FLOOR: f32 = 0.1;

/// Strength of the inverse-cube pair force.
pub const PAIR_FORCE: f32 = 0.5;

/// Attractive offset: pairs near the edge of the radius pull together.
pub const COHESION: f32 = 1.2;

/// Velocity kept (and reversed) on the dominant axis after hitting terrain.
pub const BOUNCE: f32 = 0.5;

/// Burst radius and speed of a 256-particle explosion.
pub const EXPLODE_RADIUS: f32 = 8.0;
pub const EXPLODE_SPEED: f32 = 40.0;
pub const EXPLODE_LIFE: f32 = 0.5;

/// A single point particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub xv: f32,
    pub yv: f32,
    /// Seconds remaining; `<= 0` means the slot is free.
    pub life: f32,
    /// Fade-rate coefficient used to pick the ramp entry.
    pub fade: f32,
    pub mass: f32,
    pub palette: PaletteId,
    /// Pool index, assigned on spawn.
    pub id: usize,
}

impl Particle {
    pub fn new(x: f32, y: f32, xv: f32, yv: f32, life: f32) -> Self {
        Self {
            x,
            y,
            xv,
            yv,
            life,
            fade: 1.0,
            mass: FIRE_MASS,
            palette: PaletteId::Red,
            id: 0,
        }
    }

    pub const fn dead() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            xv: 0.0,
            yv: 0.0,
            life: 0.0,
            fade: 1.0,
            mass: FIRE_MASS,
            palette: PaletteId::Red,
            id: 0,
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.life > 0.0
    }

    /// Ramp entry for the current life: `clamp(floor(life * fade * 3), 1, 7)`.
    #[inline]
    pub fn ramp_index(&self) -> usize {
        ((self.life * self.fade * 3.0).floor() as i32).clamp(1, 7) as usize
    }

    /// Alpha for the current life: `clamp(floor(life * 255), 0, 255)`.
    #[inline]
    pub fn alpha(&self) -> u8 {
        (self.life * 255.0).floor().clamp(0.0, 255.0) as u8
    }
}

/// Velocity changes for an interacting pair `(a, b)`, or `None` when the
/// pair is out of range.
///
/// The force falls off with the inverse cube of `d + DISTANCE_FLOOR`; each
/// side receives it weighted by the partner's share of the combined mass, so
/// `a.mass * dva + b.mass * dvb == 0`.
pub fn pair_impulse(a: &Particle, b: &Particle, dt: f32) -> Option<([f32; 2], [f32; 2])> {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let d = (dx * dx + dy * dy).sqrt();
    if d >= INTERACTION_RADIUS {
        return None;
    }
    let inv = 1.0 / (d + DISTANCE_FLOOR);
    let f = PAIR_FORCE * dt * (inv * inv * inv - COHESION);
    let (ux, uy) = (dx * inv, dy * inv);
    let total = a.mass + b.mass;
    if total <= 0.0 {
        return None;
    }
    let wa = b.mass / total;
    let wb = a.mass / total;
    Some(([-f * ux * wa, -f * uy * wa], [f * ux * wb, f * uy * wb]))
}

/// Fixed-capacity particle pool.
#[derive(Debug, Clone)]
pub struct ParticlePool {
    slots: Vec<Particle>,
    hash: SpatialHash,
    rng: SimpleRng,
}

impl ParticlePool {
    pub fn new(seed: u32) -> Self {
        Self::with_capacity(PARTICLE_CAPACITY, seed)
    }

    pub fn with_capacity(capacity: usize, seed: u32) -> Self {
        Self {
            slots: vec![Particle::dead(); capacity],
            hash: SpatialHash::new(capacity),
            rng: SimpleRng::new(seed),
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Kill every particle and empty the hash.
    pub fn clear(&mut self) {
        for p in &mut self.slots {
            p.life = 0.0;
        }
        self.hash.clear();
    }

    pub fn get(&self, id: usize) -> Option<&Particle> {
        self.slots.get(id)
    }

    pub fn iter_live(&self) -> impl Iterator<Item = &Particle> {
        self.slots.iter().filter(|p| p.is_alive())
    }

    pub fn live_count(&self) -> usize {
        self.iter_live().count()
    }

    /// Place `particle` in the first free slot and return its id.
    ///
    /// Returns `None` when the pool is full; the particle is dropped.
    pub fn spawn(&mut self, particle: Particle) -> Option<usize> {
        let id = self.slots.iter().position(|p| !p.is_alive())?;
        self.slots[id] = Particle { id, ..particle };
        self.hash.unlink(id);
        Some(id)
    }

    /// Spawn `count` fire particles around `(x, y)`.
    ///
    /// Each gets ±0.5 positional jitter and `life_factor * U{32..=47} / 16`
    /// seconds of life. Returns how many were actually placed.
    pub fn spawn_fire(&mut self, x: f32, y: f32, xv: f32, yv: f32, count: usize, life_factor: f32) -> usize {
        if life_factor <= 0.0 {
            return 0;
        }
        for n in 0..count {
            let life = life_factor * self.rng.range_inclusive(32, 47) as f32 / 16.0;
            let p = Particle {
                x: x + self.rng.jitter(),
                y: y + self.rng.jitter(),
                xv,
                yv,
                life,
                fade: 1.0 / life_factor,
                mass: FIRE_MASS,
                palette: PaletteId::Red,
                id: 0,
            };
            if self.spawn(p).is_none() {
                trace!(dropped = count - n, "particle pool full");
                return n;
            }
        }
        count
    }

    /// Radial burst of `count` fire particles.
    ///
    /// Spawn offset and speed scale with `count / 256`, so small and large
    /// explosions look equally dense.
    pub fn explode(&mut self, x: f32, y: f32, xv: f32, yv: f32, count: usize) -> usize {
        let scale = count as f32 / 256.0;
        let mut spawned = 0;
        for _ in 0..count {
            let (s, c) = (self.rng.next_f32() * TAU).sin_cos();
            let offset = self.rng.next_f32() * EXPLODE_RADIUS * scale;
            let speed = (0.25 + 0.75 * self.rng.next_f32()) * EXPLODE_SPEED * scale;
            let placed = self.spawn_fire(
                x + c * offset,
                y + s * offset,
                xv + c * speed,
                yv + s * speed,
                1,
                EXPLODE_LIFE,
            );
            if placed == 0 {
                break;
            }
            spawned += placed;
        }
        spawned
    }

    /// Advance every particle by `dt` and draw it into `fb` relative to the camera.
    pub fn update_and_render(
        &mut self,
        dt: f32,
        fb: &mut Framebuffer,
        terrain: &Terrain,
        palettes: &Palettes,
        cam_x: i32,
        cam_y: i32,
    ) {
        let Self { slots, hash, .. } = self;

        hash.clear();
        for (i, p) in slots.iter().enumerate() {
            if !p.is_alive() {
                continue;
            }
            if let Some(cell) = SpatialHash::cell_of(p.x, p.y) {
                hash.insert(i, cell);
            }
        }

        for i in 0..slots.len() {
            if !slots[i].is_alive() {
                continue;
            }
            {
                let p = &mut slots[i];
                p.life = (p.life - dt).max(0.0);
                if !p.is_alive() {
                    continue;
                }
                p.xv -= p.xv * dt * DAMPING;
                p.yv -= p.yv * dt * DAMPING;
                p.yv += dt * GRAVITY;
            }
            let Some(cell) = SpatialHash::cell_of(slots[i].x, slots[i].y) else {
                continue;
            };
            for near in SpatialHash::neighborhood(cell) {
                for j in hash.chain(near) {
                    if j == i || !slots[j].is_alive() {
                        continue;
                    }
                    if let Some((da, db)) = pair_impulse(&slots[i], &slots[j], dt) {
                        slots[i].xv += da[0];
                        slots[i].yv += da[1];
                        slots[j].xv += db[0];
                        slots[j].yv += db[1];
                    }
                }
            }
        }

        let origin_x = cam_x - VIEW_HALF;
        let origin_y = cam_y - VIEW_HALF;
        let view = 0..FB_SIZE as i32;
        let world = 0..WORLD_SIZE as i32;
        for p in slots.iter_mut() {
            if !p.is_alive() {
                continue;
            }
            let (ox, oy) = (p.x, p.y);
            p.x += p.xv * dt;
            p.y += p.yv * dt;

            let (cx, cy) = (p.x.floor() as i32, p.y.floor() as i32);
            let (sx, sy) = (cx - origin_x, cy - origin_y);
            if view.contains(&sx) && view.contains(&sy) {
                let color = palettes.ramp(p.palette)[p.ramp_index()].with_alpha(p.alpha());
                fb.blend_pixel(sx, sy, color);
            }

            if !world.contains(&cx) || !world.contains(&cy) {
                p.life = 0.0;
                continue;
            }
            if terrain.is_solid(cx, cy) {
                p.x = ox;
                p.y = oy;
                if p.xv.abs() > p.yv.abs() {
                    p.xv = -p.xv * BOUNCE;
                } else {
                    p.yv = -p.yv * BOUNCE;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_takes_first_free_slot_and_assigns_id() {
        let mut pool = ParticlePool::with_capacity(4, 1);
        assert_eq!(pool.spawn(Particle::new(1.0, 1.0, 0.0, 0.0, 1.0)), Some(0));
        assert_eq!(pool.spawn(Particle::new(2.0, 1.0, 0.0, 0.0, 1.0)), Some(1));
        assert_eq!(pool.get(1).unwrap().id, 1);
    }

    #[test]
    fn spawn_reuses_dead_slots() {
        let mut pool = ParticlePool::with_capacity(2, 1);
        pool.spawn(Particle::new(1.0, 1.0, 0.0, 0.0, 1.0));
        pool.spawn(Particle::new(2.0, 1.0, 0.0, 0.0, 1.0));
        pool.slots[0].life = 0.0;
        assert_eq!(pool.spawn(Particle::new(3.0, 1.0, 0.0, 0.0, 1.0)), Some(0));
        assert_eq!(pool.get(0).unwrap().x, 3.0);
    }

    #[test]
    fn full_pool_drops_spawns() {
        let mut pool = ParticlePool::with_capacity(3, 1);
        assert_eq!(pool.spawn_fire(5.0, 5.0, 0.0, 0.0, 10, 1.0), 3);
        assert_eq!(pool.live_count(), 3);
        assert_eq!(pool.spawn(Particle::new(1.0, 1.0, 0.0, 0.0, 1.0)), None);
        assert_eq!(pool.live_count(), 3);
    }

    #[test]
    fn fire_life_follows_life_factor() {
        let mut pool = ParticlePool::with_capacity(64, 9);
        pool.spawn_fire(100.0, 100.0, 1.0, -1.0, 64, 2.0);
        for p in pool.iter_live() {
            assert!(p.life >= 2.0 * 32.0 / 16.0 && p.life <= 2.0 * 47.0 / 16.0);
            assert_eq!(p.fade, 0.5);
            assert_eq!(p.palette, PaletteId::Red);
            assert!((p.x - 100.0).abs() <= 0.5 && (p.y - 100.0).abs() <= 0.5);
            assert_eq!((p.xv, p.yv), (1.0, -1.0));
        }
    }

    #[test]
    fn zero_life_factor_spawns_nothing() {
        let mut pool = ParticlePool::with_capacity(8, 1);
        assert_eq!(pool.spawn_fire(1.0, 1.0, 0.0, 0.0, 4, 0.0), 0);
        assert_eq!(pool.live_count(), 0);
    }

    #[test]
    fn explosion_spread_scales_with_count() {
        let mut small = ParticlePool::with_capacity(PARTICLE_CAPACITY, 3);
        small.explode(500.0, 500.0, 0.0, 0.0, 32);
        let max_small = small
            .iter_live()
            .map(|p| (p.x - 500.0).abs().max((p.y - 500.0).abs()))
            .fold(0.0f32, f32::max);
        // 32/256 of the full radius plus the 0.5 jitter.
        assert!(max_small <= EXPLODE_RADIUS * 32.0 / 256.0 + 0.5);
        assert_eq!(small.live_count(), 32);
    }

    #[test]
    fn pair_impulse_conserves_momentum() {
        let mut a = Particle::new(10.0, 10.0, 0.0, 0.0, 1.0);
        let mut b = Particle::new(10.3, 10.2, 0.0, 0.0, 1.0);
        a.mass = 0.25;
        b.mass = 1.0;
        let (da, db) = pair_impulse(&a, &b, 1.0 / 60.0).unwrap();
        for k in 0..2 {
            let p = a.mass * da[k] + b.mass * db[k];
            assert!(p.abs() < 1e-6, "momentum not conserved: {p}");
        }
        // Close pairs repel: a is pushed away from b.
        assert!(da[0] < 0.0 && db[0] > 0.0);
    }

    #[test]
    fn pair_impulse_ignores_distant_pairs() {
        let a = Particle::new(10.0, 10.0, 0.0, 0.0, 1.0);
        let b = Particle::new(11.0, 10.0, 0.0, 0.0, 1.0);
        assert!(pair_impulse(&a, &b, 1.0 / 60.0).is_none());
    }

    #[test]
    fn coincident_pairs_stay_finite() {
        let a = Particle::new(4.0, 4.0, 0.0, 0.0, 1.0);
        let (da, db) = pair_impulse(&a, &a, 1.0 / 60.0).unwrap();
        assert!(da.iter().chain(db.iter()).all(|v| v.is_finite()));
    }

    #[test]
    fn ramp_index_and_alpha_are_clamped() {
        let mut p = Particle::new(0.0, 0.0, 0.0, 0.0, 5.0);
        assert_eq!(p.ramp_index(), 7);
        assert_eq!(p.alpha(), 255);
        p.life = 0.1;
        assert_eq!(p.ramp_index(), 1);
        assert_eq!(p.alpha(), 25);
    }
}

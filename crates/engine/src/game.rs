//! Game module - the lander rules on top of a [`Simulation`]
//!
//! One [`Game::tick`] per fixed frame applies the frame's actions, moves the
//! ship and its shots, and resolves terrain contact. [`Game::render`] then
//! draws the frame: simulation (terrain + particles), goal and depot markers,
//! ship, shots, and the transition overlay.
//!
//! # Phases
//!
//! | Phase | Enters when | Leaves when |
//! |-------|-------------|-------------|
//! | `Flying` | level start, take-off | touchdown or crash |
//! | `Landed` | slow upright touchdown | thrust |
//! | `Crashed` | any other contact, or leaving the world | iris closes, level restarts |
//! | `Cleared` | landing next to a goal | circle fills, next level starts |

use arrayvec::ArrayVec;
use tracing::{debug, info};

use crate::core::{LevelDesc, LevelLayout, Simulation};
use crate::ship::{Ship, LAND_SPEED};
use crate::types::{PaletteId, Rgba, ShipAction, GRAVITY, TICK_DT, VIEW_HALF, WORLD_SIZE};

/// Shots alive at once.
pub const MAX_SHOTS: usize = 8;
/// Muzzle speed added to the ship's velocity.
pub const SHOT_SPEED: f32 = 60.0;
/// Minimum seconds between shots.
pub const SHOT_INTERVAL: f32 = 0.25;
/// Shots expire after this many seconds.
pub const SHOT_LIFE: f32 = 3.0;
/// Particles released by a shot hitting terrain.
pub const SHOT_BLAST: usize = 48;
/// Particles released by a crash.
pub const CRASH_BLAST: usize = 256;
/// Exhaust particles per thrusting tick.
pub const EXHAUST_COUNT: usize = 2;
pub const EXHAUST_LIFE: f32 = 0.3;
pub const EXHAUST_SPEED: f32 = 30.0;
/// Landing within this many cells of a goal or depot centre counts.
pub const PAD_RADIUS: f32 = 24.0;
/// Duration of the crash and clear transitions.
pub const TRANSITION_TIME: f32 = 1.5;
/// Iris radius at the start of a crash and the end of a clear.
pub const IRIS_RADIUS: f32 = 48.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Flying,
    Landed,
    Crashed,
    Cleared,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shot {
    pub x: f32,
    pub y: f32,
    pub xv: f32,
    pub yv: f32,
    pub life: f32,
}

/// Where the next level comes from.
#[derive(Debug, Clone)]
pub enum LevelSource {
    /// `LevelDesc::generated(seed + level)` for every level.
    Generated(u32),
    /// The same descriptor every level.
    Fixed(LevelDesc),
}

impl LevelSource {
    fn desc(&self, level: u32) -> LevelDesc {
        match self {
            LevelSource::Generated(seed) => LevelDesc::generated(seed.wrapping_add(level)),
            LevelSource::Fixed(desc) => desc.clone(),
        }
    }
}

/// Status line values for the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hud {
    pub level: u32,
    pub fuel: f32,
    pub speed: f32,
    pub phase: Phase,
    pub landings: u32,
}

#[derive(Debug, Clone)]
pub struct Game {
    sim: Simulation,
    source: LevelSource,
    layout: LevelLayout,
    level: u32,
    ship: Ship,
    shots: ArrayVec<Shot, MAX_SHOTS>,
    shot_timer: f32,
    phase: Phase,
    phase_time: f32,
    camera: (i32, i32),
    landings: u32,
}

impl Game {
    /// Create a game and load level 1.
    pub fn new(sim: Simulation, source: LevelSource) -> Self {
        let mut game = Self {
            sim,
            source,
            layout: LevelLayout::default(),
            level: 1,
            ship: Ship::new(0.0, 0.0),
            shots: ArrayVec::new(),
            shot_timer: 0.0,
            phase: Phase::Flying,
            phase_time: 0.0,
            camera: (VIEW_HALF, VIEW_HALF),
            landings: 0,
        };
        game.start_level(1);
        game
    }

    pub fn sim(&self) -> &Simulation {
        &self.sim
    }

    pub fn sim_mut(&mut self) -> &mut Simulation {
        &mut self.sim
    }

    pub fn ship(&self) -> &Ship {
        &self.ship
    }

    pub fn ship_mut(&mut self) -> &mut Ship {
        &mut self.ship
    }

    pub fn shots(&self) -> &[Shot] {
        &self.shots
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn layout(&self) -> &LevelLayout {
        &self.layout
    }

    pub fn camera(&self) -> (i32, i32) {
        self.camera
    }

    pub fn hud(&self) -> Hud {
        Hud {
            level: self.level,
            fuel: self.ship.fuel(),
            speed: self.ship.speed(),
            phase: self.phase,
            landings: self.landings,
        }
    }

    /// Reload the current level from scratch.
    pub fn restart(&mut self) {
        self.start_level(self.level);
    }

    fn start_level(&mut self, level: u32) {
        let desc = self.source.desc(level);
        self.layout = self.sim.load_level(&desc, level);
        self.level = level;
        self.ship = Ship::new(self.layout.start.0, self.layout.start.1);
        self.shots.clear();
        self.shot_timer = 0.0;
        self.set_phase(Phase::Flying);
        self.camera = Simulation::camera_for(self.ship.x, self.ship.y);
    }

    fn set_phase(&mut self, phase: Phase) {
        if self.phase != phase {
            info!(level = self.level, from = ?self.phase, to = ?phase, "phase change");
        }
        self.phase = phase;
        self.phase_time = 0.0;
    }

    /// Advance one fixed frame.
    pub fn tick(&mut self, actions: &[ShipAction]) {
        if actions.contains(&ShipAction::Restart) {
            self.restart();
            return;
        }
        self.phase_time += TICK_DT;
        self.shot_timer = (self.shot_timer - TICK_DT).max(0.0);
        self.step_shots();

        match self.phase {
            Phase::Flying => self.fly(actions),
            Phase::Landed => {
                if actions.contains(&ShipAction::Thrust) {
                    self.set_phase(Phase::Flying);
                    self.fly(actions);
                } else if actions.contains(&ShipAction::Fire) {
                    self.fire();
                }
            }
            Phase::Crashed => {
                if self.phase_time >= TRANSITION_TIME {
                    self.restart();
                }
            }
            Phase::Cleared => {
                if self.phase_time >= TRANSITION_TIME {
                    self.start_level(self.level + 1);
                }
            }
        }

        if self.phase != Phase::Crashed {
            self.camera = Simulation::camera_for(self.ship.x, self.ship.y);
        }
    }

    fn fly(&mut self, actions: &[ShipAction]) {
        let mut thrust = false;
        for action in actions {
            match action {
                ShipAction::TurnLeft => {
                    self.ship.turn(false);
                }
                ShipAction::TurnRight => {
                    self.ship.turn(true);
                }
                ShipAction::Thrust => thrust = true,
                ShipAction::Fire => self.fire(),
                ShipAction::Restart => {}
            }
        }

        let (px, py) = (self.ship.x, self.ship.y);
        self.ship.step(TICK_DT, thrust);
        if self.ship.thrusting() {
            let (tx, ty) = self.ship.tail();
            let (dx, dy) = self.ship.direction();
            self.sim.particles_mut().spawn_fire(
                tx,
                ty,
                self.ship.xv - dx * EXHAUST_SPEED,
                self.ship.yv - dy * EXHAUST_SPEED,
                EXHAUST_COUNT,
                EXHAUST_LIFE,
            );
        }

        let world = WORLD_SIZE as f32;
        if !(0.0..world).contains(&self.ship.x) || !(0.0..world).contains(&self.ship.y) {
            self.crash();
            return;
        }

        let (wx, wy) = self.ship.top_left();
        if !self.sim.collides(self.ship.sprite(), wx, wy) {
            return;
        }
        if self.ship.is_upright() && self.ship.speed() <= LAND_SPEED {
            self.ship.settle(px, py);
            self.touch_down();
        } else {
            self.crash();
        }
    }

    fn touch_down(&mut self) {
        self.landings += 1;
        let near = |&(x, y): &(i32, i32)| {
            (x as f32 - self.ship.x).abs() <= PAD_RADIUS && (y as f32 - self.ship.y).abs() <= PAD_RADIUS
        };
        let at_depot = self.layout.depots.iter().any(near);
        let at_goal = self.layout.goals.iter().any(near);
        if at_depot {
            self.ship.refuel();
            debug!(level = self.level, "refuelled at depot");
        }
        if at_goal {
            self.set_phase(Phase::Cleared);
        } else {
            self.set_phase(Phase::Landed);
        }
    }

    fn crash(&mut self) {
        let Ship { x, y, xv, yv, .. } = self.ship;
        self.sim.detonate(x, y, xv, yv, CRASH_BLAST);
        self.shots.clear();
        self.set_phase(Phase::Crashed);
    }

    fn fire(&mut self) {
        if self.shot_timer > 0.0 || self.shots.is_full() {
            return;
        }
        let (nx, ny) = self.ship.nose();
        let (dx, dy) = self.ship.direction();
        self.shots.push(Shot {
            x: nx,
            y: ny,
            xv: self.ship.xv + dx * SHOT_SPEED,
            yv: self.ship.yv + dy * SHOT_SPEED,
            life: SHOT_LIFE,
        });
        self.shot_timer = SHOT_INTERVAL;
    }

    fn step_shots(&mut self) {
        let world = 0..WORLD_SIZE as i32;
        let mut i = 0;
        while i < self.shots.len() {
            let shot = &mut self.shots[i];
            shot.life -= TICK_DT;
            shot.yv += GRAVITY * TICK_DT;
            shot.x += shot.xv * TICK_DT;
            shot.y += shot.yv * TICK_DT;
            let (cx, cy) = (shot.x.floor() as i32, shot.y.floor() as i32);
            let Shot { x, y, xv, yv, life } = *shot;

            if life <= 0.0 || !world.contains(&cx) || !world.contains(&cy) {
                self.shots.swap_remove(i);
                continue;
            }
            if self.sim.terrain().is_solid(cx, cy) {
                self.sim.detonate(x, y, xv * 0.1, yv * 0.1, SHOT_BLAST);
                self.shots.swap_remove(i);
                continue;
            }
            i += 1;
        }
    }

    /// Draw the current frame into the simulation framebuffer.
    pub fn render(&mut self) {
        let cam = self.camera;
        self.sim.render_frame(TICK_DT, cam.0, cam.1);

        let green = self.sim.palettes().ramp(PaletteId::Green)[6];
        let blue = self.sim.palettes().ramp(PaletteId::Blue)[6];
        let pink = self.sim.palettes().ramp(PaletteId::Pink)[7];

        let LevelLayout { goals, depots, .. } = &self.layout;
        let fb = self.sim.fb_mut();
        for &(gx, gy) in goals {
            let (sx, sy) = Simulation::to_screen(gx as f32, gy as f32, cam);
            fb.fill_rect(sx, sy - 3, 1, 4, green);
            fb.fill_rect(sx + 1, sy - 3, 3, 2, green);
        }
        for &(dx, dy) in depots {
            let (sx, sy) = Simulation::to_screen(dx as f32, dy as f32, cam);
            fb.fill_rect(sx - 1, sy - 1, 3, 3, blue);
        }

        if self.phase != Phase::Crashed {
            let (wx, wy) = self.ship.top_left();
            let (sx, sy) = Simulation::to_screen(wx as f32, wy as f32, cam);
            self.sim.draw_sprite(self.ship.sprite(), sx, sy);
        }

        let fb = self.sim.fb_mut();
        for shot in &self.shots {
            let (sx, sy) = Simulation::to_screen(shot.x, shot.y, cam);
            fb.set(sx, sy, pink);
        }

        let (sx, sy) = Simulation::to_screen(self.ship.x, self.ship.y, cam);
        let t = (self.phase_time / TRANSITION_TIME).clamp(0.0, 1.0);
        match self.phase {
            Phase::Crashed => {
                let r = (IRIS_RADIUS * (1.0 - t)) as i32;
                fb.fill_outside_circle(sx, sy, r, Rgba::BLACK);
            }
            Phase::Cleared => {
                let r = (IRIS_RADIUS * t) as i32;
                fb.fill_circle(sx, sy, r, Rgba::BLACK);
            }
            Phase::Flying | Phase::Landed => {}
        }
    }

    /// `tick` then `render`.
    pub fn frame(&mut self, actions: &[ShipAction]) {
        self.tick(actions);
        self.render();
    }
}

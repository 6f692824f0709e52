//! Ship module - lander kinematics, heading and fuel
//!
//! The ship has eight headings in 45° steps; heading 0 points up and headings
//! advance clockwise, matching the order of the `SHIP_OFF` / `SHIP_ON`
//! sprite tables. Position is the centre of the current sprite.

use crate::types::{SpriteDesc, GRAVITY, SHIP_HEADINGS, SHIP_OFF, SHIP_ON};

/// Engine acceleration in world cells per second squared.
pub const THRUST: f32 = 40.0;

/// Full tank.
pub const FUEL_MAX: f32 = 100.0;

/// Fuel burned per second of thrust.
pub const FUEL_BURN: f32 = 12.0;

/// Minimum seconds between two heading changes.
pub const TURN_INTERVAL: f32 = 0.1;

/// Touchdowns at or below this speed are landings.
pub const LAND_SPEED: f32 = 12.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Ship {
    pub x: f32,
    pub y: f32,
    pub xv: f32,
    pub yv: f32,
    heading: u8,
    fuel: f32,
    thrusting: bool,
    turn_timer: f32,
}

impl Ship {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            xv: 0.0,
            yv: 0.0,
            heading: 0,
            fuel: FUEL_MAX,
            thrusting: false,
            turn_timer: 0.0,
        }
    }

    pub fn heading(&self) -> u8 {
        self.heading
    }

    pub fn fuel(&self) -> f32 {
        self.fuel
    }

    pub fn thrusting(&self) -> bool {
        self.thrusting
    }

    pub fn refuel(&mut self) {
        self.fuel = FUEL_MAX;
    }

    pub fn is_upright(&self) -> bool {
        self.heading == 0
    }

    pub fn speed(&self) -> f32 {
        (self.xv * self.xv + self.yv * self.yv).sqrt()
    }

    /// Rotate one step; `clockwise` follows the heading order.
    ///
    /// Returns false while the turn interval has not elapsed.
    pub fn turn(&mut self, clockwise: bool) -> bool {
        if self.turn_timer > 0.0 {
            return false;
        }
        self.heading = if clockwise {
            (self.heading + 1) % SHIP_HEADINGS
        } else {
            (self.heading + SHIP_HEADINGS - 1) % SHIP_HEADINGS
        };
        self.turn_timer = TURN_INTERVAL;
        true
    }

    /// Unit vector of the nose direction (screen space, y down).
    pub fn direction(&self) -> (f32, f32) {
        let angle = self.heading as f32 * std::f32::consts::FRAC_PI_4;
        (angle.sin(), -angle.cos())
    }

    /// Sprite for the current heading and engine state.
    pub fn sprite(&self) -> SpriteDesc {
        let table = if self.thrusting { &SHIP_ON } else { &SHIP_OFF };
        table[self.heading as usize]
    }

    /// Top-left world cell of the current sprite.
    pub fn top_left(&self) -> (i32, i32) {
        let s = self.sprite();
        (
            self.x.floor() as i32 - s.w as i32 / 2,
            self.y.floor() as i32 - s.h as i32 / 2,
        )
    }

    /// Where exhaust leaves the ship.
    pub fn tail(&self) -> (f32, f32) {
        let (dx, dy) = self.direction();
        let reach = self.sprite().h.max(self.sprite().w) as f32 / 2.0 + 1.0;
        (self.x - dx * reach, self.y - dy * reach)
    }

    /// Where shots leave the ship.
    pub fn nose(&self) -> (f32, f32) {
        let (dx, dy) = self.direction();
        let reach = self.sprite().h.max(self.sprite().w) as f32 / 2.0 + 1.0;
        (self.x + dx * reach, self.y + dy * reach)
    }

    /// Advance one tick. Thrust only applies while there is fuel left.
    pub fn step(&mut self, dt: f32, thrust: bool) {
        self.turn_timer = (self.turn_timer - dt).max(0.0);
        self.thrusting = thrust && self.fuel > 0.0;
        if self.thrusting {
            let (dx, dy) = self.direction();
            self.xv += dx * THRUST * dt;
            self.yv += dy * THRUST * dt;
            self.fuel = (self.fuel - FUEL_BURN * dt).max(0.0);
        }
        self.yv += GRAVITY * dt;
        self.x += self.xv * dt;
        self.y += self.yv * dt;
    }

    /// Come to rest at `(x, y)`.
    pub fn settle(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
        self.xv = 0.0;
        self.yv = 0.0;
        self.thrusting = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TICK_DT;

    #[test]
    fn headings_wrap_both_ways() {
        let mut ship = Ship::new(0.0, 0.0);
        assert!(ship.turn(false));
        assert_eq!(ship.heading(), 7);
        ship.step(TURN_INTERVAL, false);
        assert!(ship.turn(true));
        assert_eq!(ship.heading(), 0);
    }

    #[test]
    fn turning_is_rate_limited() {
        let mut ship = Ship::new(0.0, 0.0);
        assert!(ship.turn(true));
        ship.step(TICK_DT, false);
        assert!(!ship.turn(true));
        assert_eq!(ship.heading(), 1);
    }

    #[test]
    fn heading_zero_points_up() {
        let ship = Ship::new(0.0, 0.0);
        let (dx, dy) = ship.direction();
        assert!(dx.abs() < 1e-6);
        assert!((dy + 1.0).abs() < 1e-6);
    }

    #[test]
    fn gravity_pulls_down_without_thrust() {
        let mut ship = Ship::new(100.0, 100.0);
        ship.step(TICK_DT, false);
        assert!(ship.yv > 0.0);
        assert!(ship.y > 100.0);
        assert_eq!(ship.fuel(), FUEL_MAX);
    }

    #[test]
    fn upright_thrust_beats_gravity_and_burns_fuel() {
        let mut ship = Ship::new(100.0, 100.0);
        ship.step(TICK_DT, true);
        assert!(ship.yv < 0.0);
        assert!(ship.fuel() < FUEL_MAX);
        assert!(ship.thrusting());
        assert_eq!(ship.sprite(), SHIP_ON[0]);
    }

    #[test]
    fn empty_tank_cannot_thrust() {
        let mut ship = Ship::new(100.0, 100.0);
        ship.fuel = 0.0;
        ship.step(TICK_DT, true);
        assert!(!ship.thrusting());
        assert!(ship.yv > 0.0);
    }

    #[test]
    fn top_left_centres_the_sprite() {
        let ship = Ship::new(50.0, 60.0);
        let s = SHIP_OFF[0];
        assert_eq!(ship.top_left(), (50 - s.w as i32 / 2, 60 - s.h as i32 / 2));
    }
}

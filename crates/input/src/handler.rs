//! Held-key input handler for terminal environments.
//!
//! Steering and thrust are continuous: the game wants them every tick while
//! the key is down. Most terminals only report presses (plus OS key repeat),
//! so a held key is latched and auto-released after a timeout unless a
//! release event or a repeat arrives first. Fire and restart are one-shots.

use std::time::{Duration, Instant};

use arrayvec::ArrayVec;
use crossterm::event::KeyCode;

use crate::map::map_code;
use crate::types::ShipAction;

// Long enough to bridge the gap before OS key repeat kicks in.
const DEFAULT_KEY_RELEASE_TIMEOUT_MS: u32 = 200;

const HELD_COUNT: usize = 3;

/// Actions latched while their key is down, in emission order.
const HELD: [ShipAction; HELD_COUNT] = [ShipAction::TurnLeft, ShipAction::TurnRight, ShipAction::Thrust];

fn held_slot(action: ShipAction) -> Option<usize> {
    HELD.iter().position(|&a| a == action)
}

#[derive(Debug, Clone)]
pub struct InputHandler {
    /// Last press (or repeat) per held action.
    held: [Option<Instant>; HELD_COUNT],
    pending: ArrayVec<ShipAction, 8>,
    key_release_timeout_ms: u32,
}

impl InputHandler {
    pub fn new() -> Self {
        Self {
            held: [None; HELD_COUNT],
            pending: ArrayVec::new(),
            key_release_timeout_ms: DEFAULT_KEY_RELEASE_TIMEOUT_MS,
        }
    }

    pub fn with_key_release_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.key_release_timeout_ms = timeout_ms;
        self
    }

    pub fn key_release_timeout_ms(&self) -> u32 {
        self.key_release_timeout_ms
    }

    /// Record a press. Returns the mapped action, if any.
    pub fn handle_key_press(&mut self, code: KeyCode) -> Option<ShipAction> {
        let action = map_code(code)?;
        match held_slot(action) {
            Some(slot) => {
                self.held[slot] = Some(Instant::now());
                // Opposite turns cancel the older one.
                match action {
                    ShipAction::TurnLeft => self.held[1] = None,
                    ShipAction::TurnRight => self.held[0] = None,
                    _ => {}
                }
            }
            None => {
                if !self.pending.contains(&action) {
                    let _ = self.pending.try_push(action);
                }
            }
        }
        Some(action)
    }

    pub fn handle_key_release(&mut self, code: KeyCode) {
        if let Some(slot) = map_code(code).and_then(held_slot) {
            self.held[slot] = None;
        }
    }

    /// Actions for this tick: every latched key still inside its timeout,
    /// followed by queued one-shots.
    pub fn update(&mut self) -> ArrayVec<ShipAction, 8> {
        self.update_at(Instant::now())
    }

    fn update_at(&mut self, now: Instant) -> ArrayVec<ShipAction, 8> {
        let timeout = Duration::from_millis(self.key_release_timeout_ms as u64);
        let mut actions = ArrayVec::new();
        for (slot, since) in self.held.iter_mut().enumerate() {
            match *since {
                Some(t) if now.saturating_duration_since(t) > timeout => *since = None,
                Some(_) => actions.push(HELD[slot]),
                None => {}
            }
        }
        for action in self.pending.drain(..) {
            let _ = actions.try_push(action);
        }
        actions
    }

    pub fn is_held(&self, action: ShipAction) -> bool {
        held_slot(action).is_some_and(|slot| self.held[slot].is_some())
    }

    pub fn reset(&mut self) {
        self.held = [None; HELD_COUNT];
        self.pending.clear();
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

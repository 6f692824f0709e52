//! Key mapping from terminal events to ship actions.

use crate::types::ShipAction;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Map keyboard input to a ship action.
pub fn handle_key_event(key: KeyEvent) -> Option<ShipAction> {
    map_code(key.code)
}

/// Map a bare key code; shared with the held-key handler.
pub fn map_code(code: KeyCode) -> Option<ShipAction> {
    match code {
        // Steering
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(ShipAction::TurnLeft),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(ShipAction::TurnRight),

        // Engine
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Some(ShipAction::Thrust),

        // Actions
        KeyCode::Char(' ') => Some(ShipAction::Fire),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(ShipAction::Restart),

        _ => None,
    }
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc)
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steering_keys() {
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Left)),
            Some(ShipAction::TurnLeft)
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('D'))),
            Some(ShipAction::TurnRight)
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('w'))),
            Some(ShipAction::Thrust)
        );
        assert_eq!(handle_key_event(KeyEvent::from(KeyCode::Down)), None);
    }

    #[test]
    fn test_action_keys() {
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char(' '))),
            Some(ShipAction::Fire)
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('r'))),
            Some(ShipAction::Restart)
        );
    }

    #[test]
    fn test_quit_keys() {
        assert!(should_quit(KeyEvent::from(KeyCode::Char('q'))));
        assert!(should_quit(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL
        )));
        assert!(!should_quit(KeyEvent::from(KeyCode::Char('c'))));
        assert!(!should_quit(KeyEvent::from(KeyCode::Char('x'))));
    }
}

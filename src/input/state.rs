//! Input state management
//!
//! Keyboard and mouse are read once per frame into an [`InputSnapshot`].
//! The simulation only sees snapshots, so tests can build them by hand.

use std::collections::HashSet;

use macroquad::prelude::{is_key_down, is_key_pressed, is_mouse_button_pressed, mouse_position, KeyCode, MouseButton};

use super::Action;
use crate::rasterizer::Vec2;

/// Input for one frame
#[derive(Debug, Clone, Default)]
pub struct InputSnapshot {
    held: HashSet<Action>,
    pressed: HashSet<Action>,
    /// Pointer position in window pixels
    pub pointer: Vec2,
    /// Left mouse button went down this frame
    pub clicked: bool,
}

impl InputSnapshot {
    /// Snapshot with `actions` held (and not newly pressed)
    #[cfg(test)]
    pub fn holding(actions: &[Action]) -> Self {
        Self {
            held: actions.iter().copied().collect(),
            ..Self::default()
        }
    }

    /// Snapshot with `actions` pressed this frame (and therefore held)
    #[cfg(test)]
    pub fn pressing(actions: &[Action]) -> Self {
        Self {
            held: actions.iter().copied().collect(),
            pressed: actions.iter().copied().collect(),
            ..Self::default()
        }
    }

    /// Action is currently held down
    pub fn down(&self, action: Action) -> bool {
        self.held.contains(&action)
    }

    /// Action went down this frame
    pub fn pressed(&self, action: Action) -> bool {
        self.pressed.contains(&action)
    }
}

/// Keyboard bindings and per-frame polling
#[derive(Debug, Default)]
pub struct InputState;

impl InputState {
    pub fn new() -> Self {
        Self
    }

    /// Read the platform's keyboard and mouse state
    pub fn poll(&self) -> InputSnapshot {
        let mut snapshot = InputSnapshot::default();
        for action in Action::ALL {
            let keys = bindings(action);
            if keys.iter().any(|k| is_key_down(*k)) {
                snapshot.held.insert(action);
            }
            if keys.iter().any(|k| is_key_pressed(*k)) {
                snapshot.pressed.insert(action);
                snapshot.held.insert(action);
            }
        }
        let (x, y) = mouse_position();
        snapshot.pointer = Vec2::new(x, y);
        snapshot.clicked = is_mouse_button_pressed(MouseButton::Left);
        snapshot
    }
}

fn bindings(action: Action) -> &'static [KeyCode] {
    match action {
        Action::MoveForward => &[KeyCode::W],
        Action::MoveBackward => &[KeyCode::S],
        Action::StrafeLeft => &[KeyCode::Q, KeyCode::Left],
        Action::StrafeRight => &[KeyCode::E, KeyCode::Right],
        Action::TurnLeft => &[KeyCode::A],
        Action::TurnRight => &[KeyCode::D],
        Action::SlowTurn => &[KeyCode::LeftShift],
        Action::Fire => &[KeyCode::Space],
        Action::Interact => &[KeyCode::F],
        Action::SelectPistol => &[KeyCode::Key1],
        Action::SelectShotgun => &[KeyCode::Key2],
        Action::SelectMinigun => &[KeyCode::Key3],
        Action::MenuUp => &[KeyCode::Up],
        Action::MenuDown => &[KeyCode::Down],
        Action::MenuConfirm => &[KeyCode::Enter],
        Action::Back => &[KeyCode::Escape],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_builders() {
        let held = InputSnapshot::holding(&[Action::Fire]);
        assert!(held.down(Action::Fire));
        assert!(!held.pressed(Action::Fire));

        let pressed = InputSnapshot::pressing(&[Action::Interact]);
        assert!(pressed.down(Action::Interact));
        assert!(pressed.pressed(Action::Interact));
        assert!(!pressed.down(Action::Fire));
    }

    #[test]
    fn test_every_action_is_bound() {
        for action in Action::ALL {
            assert!(!bindings(action).is_empty(), "{:?} has no key", action);
        }
    }
}

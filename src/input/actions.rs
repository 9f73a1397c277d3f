//! Game action definitions
//!
//! Gameplay code only ever asks about actions; the key bindings live in
//! [`super::InputState`].

/// Everything the player can ask the game to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    // Movement
    MoveForward,
    MoveBackward,
    StrafeLeft,
    StrafeRight,
    TurnLeft,
    TurnRight,
    /// Held to turn at the slow (aiming) speed
    SlowTurn,

    // Combat
    Fire,
    Interact,
    SelectPistol,
    SelectShotgun,
    SelectMinigun,

    // Menus
    MenuUp,
    MenuDown,
    MenuConfirm,
    Back,
}

impl Action {
    pub const ALL: [Action; 16] = [
        Action::MoveForward,
        Action::MoveBackward,
        Action::StrafeLeft,
        Action::StrafeRight,
        Action::TurnLeft,
        Action::TurnRight,
        Action::SlowTurn,
        Action::Fire,
        Action::Interact,
        Action::SelectPistol,
        Action::SelectShotgun,
        Action::SelectMinigun,
        Action::MenuUp,
        Action::MenuDown,
        Action::MenuConfirm,
        Action::Back,
    ];
}

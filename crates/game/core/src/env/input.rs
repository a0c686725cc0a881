//! Input intent interface.
//!
//! The core consumes boolean per-action queries per tick; it never polls raw
//! devices. Hosts map whatever input backend they have onto [`InputAction`].

use glam::Vec2;

/// Named input actions the gameplay core reacts to.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum InputAction {
    MoveLeft,
    MoveRight,
    MoveForward,
    MoveBack,
    Run,
    Attack,
    /// Place the selected item in front of the actor.
    PutDown,
    /// Throw the selected item along the facing direction.
    Throw,
    /// Pick up the nearest world item.
    TakeUp,
    ItemUse,
    ItemSelectLeft,
    ItemSelectRight,
}

/// Per-tick input queries.
pub trait InputIntent {
    /// True on the tick the action was pressed.
    fn just_pressed(&self, action: InputAction) -> bool;

    /// True while the action is held.
    fn held(&self, action: InputAction) -> bool;

    /// Movement axis derived from the held directional actions,
    /// normalized so diagonals are not faster.
    fn movement_axis(&self) -> Vec2 {
        let mut axis = Vec2::ZERO;
        if self.held(InputAction::MoveLeft) {
            axis.x -= 1.0;
        }
        if self.held(InputAction::MoveRight) {
            axis.x += 1.0;
        }
        if self.held(InputAction::MoveForward) {
            axis.y -= 1.0;
        }
        if self.held(InputAction::MoveBack) {
            axis.y += 1.0;
        }
        axis.normalize_or_zero()
    }
}

/// Intent source that reports nothing pressed. Used for AI-driven actors,
/// whose decisions come from their controllers instead of input.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoInput;

impl InputIntent for NoInput {
    fn just_pressed(&self, _action: InputAction) -> bool {
        false
    }

    fn held(&self, _action: InputAction) -> bool {
        false
    }
}

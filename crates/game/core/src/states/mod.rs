//! Concrete state sets for player- and AI-controlled actors.
//!
//! Both sets run on the shared [`StateMachine`](crate::fsm::StateMachine);
//! they differ in their context type and in how intent arrives (input vs.
//! the attack controller).

pub mod enemy;
pub mod player;

use glam::Vec2;

/// Canonical state names used by both state sets.
pub mod names {
    pub const IDLE: &str = "Idle";
    pub const WALK: &str = "Walk";
    pub const RUN: &str = "Run";
    pub const ATTACK: &str = "Attack";
    pub const PICK_UP: &str = "PickUp";
    pub const THROW: &str = "Throw";
    pub const HURT: &str = "Hurt";
    pub const DEATH: &str = "Death";
    pub const CHASE: &str = "Chase";
}

/// Moves `current` toward `target` by at most `max_delta`.
pub(crate) fn move_toward(current: Vec2, target: Vec2, max_delta: f32) -> Vec2 {
    let to = target - current;
    let distance = to.length();
    if distance <= max_delta || distance < f32::EPSILON {
        target
    } else {
        current + to / distance * max_delta
    }
}

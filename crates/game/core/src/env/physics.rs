//! Physics body interface.

use glam::Vec2;

/// The exact surface world items need from a host physics body.
///
/// Deliberately narrow: no impulses, no collision shapes, no reflection
/// into engine properties. Contact reporting flows the other way - the host
/// calls into the entity when its physics engine observes a collision.
pub trait PhysicsBody {
    fn position(&self) -> Vec2;
    fn set_position(&mut self, position: Vec2);

    fn velocity(&self) -> Vec2;
    fn set_velocity(&mut self, velocity: Vec2);

    /// A frozen body ignores integration and keeps its pose.
    fn is_frozen(&self) -> bool;
    fn set_frozen(&mut self, frozen: bool);

    /// Multiplier on the world's gravity; 0 disables gravity entirely.
    fn gravity_scale(&self) -> f32;
    fn set_gravity_scale(&mut self, scale: f32);
}

//! Host collaborator interfaces.
//!
//! The engine (scene tree, physics, animation playback, input devices) is an
//! external host. Gameplay code never discovers collaborators by walking a
//! scene tree; it receives them through these narrow traits at construction
//! or per tick. Failures are reported as `None`/`false`, never as panics
//! that unwind through gameplay logic.

pub mod anim;
pub mod input;
pub mod physics;
pub mod scene;
pub mod world;

pub use anim::AnimationSink;
pub use input::{InputAction, InputIntent};
pub use physics::PhysicsBody;
pub use scene::{SceneHandle, SceneResolver};
pub use world::{CombatTargets, GameWorld, OverlapQuery, RegionKind, WorldParts};

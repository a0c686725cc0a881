//! Headless host for the skirmish gameplay core.
//!
//! Provides deterministic stand-ins for the engine collaborators (scripted
//! input, kinematic bodies, recording animation sinks, a static scene
//! table) and a [`Session`] that drives the whole pipeline one physics tick
//! at a time. Used by integration tests and offline tooling; an engine
//! integration replaces these collaborators with real ones.

pub mod input;
pub mod session;
pub mod sim;

pub use input::ScriptedInput;
pub use session::{EnemyUnit, Session, SessionError, SimArena, SimRegions};
pub use sim::{RecordingAnimations, SimBody, SimScenes, SimSpace, GRAVITY};

//! World-item entities: the spawned representation of dropped and thrown
//! stacks, with their own physics-driven sub-state-machine.

pub mod entity;
pub mod registry;

pub use entity::{FinishReason, ImpactPolicy, MotionState, WorldItemEntity, WorldItemTuning};
pub use registry::{PickupProp, SpawnError, WorldItemId, WorldItemRegistry};

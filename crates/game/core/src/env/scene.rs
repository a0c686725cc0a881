//! Resource and scene resolution interface.

use crate::items::ItemId;

use super::physics::PhysicsBody;

/// Opaque handle to a loaded world scene for an item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SceneHandle(pub u32);

/// Resolves item ids to world scenes and instantiates them.
///
/// Both operations report failure as `None`; a missing mapping is a
/// configuration problem for the caller to log, never an exception that
/// unwinds through gameplay logic. Implementations are free to cache
/// resolved scenes, hence `&mut self`.
pub trait SceneResolver {
    /// Looks up the world scene for an item. `None` when the item has no
    /// world representation configured.
    fn resolve_world_scene(&mut self, item: &ItemId) -> Option<SceneHandle>;

    /// Instantiates a resolved scene, yielding the physics body of the
    /// spawned entity. `None` when instantiation fails.
    fn instantiate(&mut self, handle: SceneHandle) -> Option<Box<dyn PhysicsBody>>;
}

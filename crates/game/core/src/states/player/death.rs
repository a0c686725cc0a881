//! Player death state. Terminal.

use glam::Vec2;

use crate::env::GameWorld;
use crate::fsm::{State, TransitionQueue};
use crate::states::names;

use super::PlayerContext;

pub struct PlayerDeathState;

impl PlayerDeathState {
    pub fn new() -> Self {
        Self
    }
}

impl State<PlayerContext> for PlayerDeathState {
    fn name(&self) -> &'static str {
        names::DEATH
    }

    fn enter(
        &mut self,
        ctx: &mut PlayerContext,
        _world: &mut dyn GameWorld,
        _queue: &mut TransitionQueue,
    ) {
        ctx.actor.velocity = Vec2::ZERO;
        ctx.animation.play(&ctx.animations.death, false, 1.0);
        tracing::warn!(actor = %ctx.actor.name, "actor died");
    }
}

//! Player throw state: a visible wind-up before the stack leaves the hand.
//!
//! Entering this state defers the extraction; the committed throw happens
//! here once the wind-up has played, via the interaction component's
//! deferred entry point.

use glam::Vec2;

use crate::env::GameWorld;
use crate::fsm::{State, TransitionQueue};
use crate::states::names;

use super::{interrupt_gate, PlayerContext};

pub struct PlayerThrowState {
    windup: f32,
    elapsed: f32,
    thrown: bool,
}

impl PlayerThrowState {
    pub fn new() -> Self {
        Self {
            windup: 0.3,
            elapsed: 0.0,
            thrown: false,
        }
    }
}

impl Default for PlayerThrowState {
    fn default() -> Self {
        Self::new()
    }
}

impl State<PlayerContext> for PlayerThrowState {
    fn name(&self) -> &'static str {
        names::THROW
    }

    fn enter(
        &mut self,
        ctx: &mut PlayerContext,
        _world: &mut dyn GameWorld,
        _queue: &mut TransitionQueue,
    ) {
        self.elapsed = 0.0;
        self.thrown = false;
        ctx.actor.velocity = Vec2::ZERO;
        ctx.animation.play(&ctx.animations.throw, false, 1.0);
    }

    fn physics_update(
        &mut self,
        ctx: &mut PlayerContext,
        world: &mut dyn GameWorld,
        delta: f32,
        queue: &mut TransitionQueue,
    ) {
        if interrupt_gate(ctx, queue) {
            return;
        }
        self.elapsed += delta;
        if self.elapsed < self.windup {
            return;
        }
        if !self.thrown {
            self.thrown = true;
            let PlayerContext {
                actor,
                inventory,
                interaction,
                ..
            } = ctx;
            interaction.throw_after_animation(actor, inventory, world);
        }
        queue.change_state(names::IDLE);
    }
}

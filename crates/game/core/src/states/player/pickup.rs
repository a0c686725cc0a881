//! Player pickup state: wind-up, then the actual inventory transfer.

use glam::Vec2;

use crate::env::GameWorld;
use crate::fsm::{State, TransitionQueue};
use crate::states::names;

use super::{interrupt_gate, PlayerContext};

pub struct PlayerPickUpState {
    windup: f32,
    elapsed: f32,
    executed: bool,
}

impl PlayerPickUpState {
    pub fn new() -> Self {
        Self {
            windup: 0.25,
            elapsed: 0.0,
            executed: false,
        }
    }
}

impl Default for PlayerPickUpState {
    fn default() -> Self {
        Self::new()
    }
}

impl State<PlayerContext> for PlayerPickUpState {
    fn name(&self) -> &'static str {
        names::PICK_UP
    }

    fn enter(
        &mut self,
        ctx: &mut PlayerContext,
        _world: &mut dyn GameWorld,
        _queue: &mut TransitionQueue,
    ) {
        self.elapsed = 0.0;
        self.executed = false;
        ctx.actor.velocity = Vec2::ZERO;
        ctx.animation.play(&ctx.animations.pickup, false, 1.0);
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
        if self.elapsed < self.windup || self.executed {
            if self.executed {
                queue.change_state(names::IDLE);
            }
            return;
        }

        self.executed = true;
        let PlayerContext {
            actor,
            inventory,
            interaction,
            ..
        } = ctx;
        interaction.execute_pickup(actor, inventory, world, false);
        queue.change_state(names::IDLE);
    }
}

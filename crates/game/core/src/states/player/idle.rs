//! Player idle state.

use glam::Vec2;

use crate::env::{GameWorld, InputAction};
use crate::fsm::{State, TransitionQueue};
use crate::states::{move_toward, names};

use super::{attack_requested, interrupt_gate, PlayerContext};

pub struct PlayerIdleState {
    animation_speed: f32,
}

impl PlayerIdleState {
    pub fn new() -> Self {
        Self {
            animation_speed: 1.0,
        }
    }
}

impl Default for PlayerIdleState {
    fn default() -> Self {
        Self::new()
    }
}

impl State<PlayerContext> for PlayerIdleState {
    fn name(&self) -> &'static str {
        names::IDLE
    }

    fn enter(
        &mut self,
        ctx: &mut PlayerContext,
        _world: &mut dyn GameWorld,
        _queue: &mut TransitionQueue,
    ) {
        ctx.notify_movement_state(names::IDLE);
        ctx.animation
            .play(&ctx.animations.idle, true, self.animation_speed);
        ctx.actor.velocity = Vec2::ZERO;
    }

    fn physics_update(
        &mut self,
        ctx: &mut PlayerContext,
        _world: &mut dyn GameWorld,
        delta: f32,
        queue: &mut TransitionQueue,
    ) {
        if interrupt_gate(ctx, queue) {
            return;
        }
        if attack_requested(ctx, names::IDLE) {
            queue.change_state(names::ATTACK);
            return;
        }

        let axis = ctx.input.movement_axis();
        if axis != Vec2::ZERO {
            if ctx.input.held(InputAction::Run) {
                queue.change_state(names::RUN);
            } else {
                queue.change_state(names::WALK);
            }
            return;
        }

        // friction stop
        let brake = ctx.actor.move_speed * 2.0 * delta;
        ctx.actor.velocity = move_toward(ctx.actor.velocity, Vec2::ZERO, brake);
        ctx.actor.integrate(delta);
    }
}

//! Player walk and run states.

use glam::Vec2;

use crate::env::{GameWorld, InputAction};
use crate::fsm::{State, TransitionQueue};
use crate::states::names;

use super::{attack_requested, interrupt_gate, PlayerContext};

pub struct PlayerWalkState;

impl PlayerWalkState {
    pub fn new() -> Self {
        Self
    }
}

impl State<PlayerContext> for PlayerWalkState {
    fn name(&self) -> &'static str {
        names::WALK
    }

    fn enter(
        &mut self,
        ctx: &mut PlayerContext,
        _world: &mut dyn GameWorld,
        _queue: &mut TransitionQueue,
    ) {
        ctx.notify_movement_state(names::WALK);
        let speed = ctx.animations.walk_speed;
        ctx.animation.play(&ctx.animations.walk, true, speed);
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
        if attack_requested(ctx, names::WALK) {
            queue.change_state(names::ATTACK);
            return;
        }
        if ctx.input.held(InputAction::Run) {
            queue.change_state(names::RUN);
            return;
        }

        let axis = ctx.input.movement_axis();
        if axis == Vec2::ZERO {
            queue.change_state(names::IDLE);
            return;
        }

        ctx.actor.velocity = axis * ctx.actor.move_speed;
        if axis.x != 0.0 {
            ctx.actor.flip_facing(axis.x > 0.0);
        }
        ctx.actor.integrate(delta);
    }
}

pub struct PlayerRunState;

impl PlayerRunState {
    pub fn new() -> Self {
        Self
    }
}

impl State<PlayerContext> for PlayerRunState {
    fn name(&self) -> &'static str {
        names::RUN
    }

    fn enter(
        &mut self,
        ctx: &mut PlayerContext,
        _world: &mut dyn GameWorld,
        _queue: &mut TransitionQueue,
    ) {
        ctx.notify_movement_state(names::RUN);
        let speed = ctx.animations.run_speed;
        ctx.animation.play(&ctx.animations.run, true, speed);
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
        if attack_requested(ctx, names::RUN) {
            queue.change_state(names::ATTACK);
            return;
        }
        if !ctx.input.held(InputAction::Run) {
            queue.change_state(names::WALK);
            return;
        }

        let axis = ctx.input.movement_axis();
        if axis == Vec2::ZERO {
            queue.change_state(names::IDLE);
            return;
        }

        ctx.actor.velocity = axis * ctx.actor.move_speed * ctx.animations.run_speed_multiplier;
        if axis.x != 0.0 {
            ctx.actor.flip_facing(axis.x > 0.0);
        }
        ctx.actor.integrate(delta);
    }
}

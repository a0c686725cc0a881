//! Enemy idle state: wait until the target wanders into aggro range.

use glam::Vec2;

use crate::env::GameWorld;
use crate::fsm::{State, TransitionQueue};
use crate::states::names;

use super::{interrupt_gate, EnemyContext};

pub struct EnemyIdleState;

impl EnemyIdleState {
    pub fn new() -> Self {
        Self
    }
}

impl State<EnemyContext> for EnemyIdleState {
    fn name(&self) -> &'static str {
        names::IDLE
    }

    fn enter(
        &mut self,
        ctx: &mut EnemyContext,
        _world: &mut dyn GameWorld,
        _queue: &mut TransitionQueue,
    ) {
        ctx.actor.velocity = Vec2::ZERO;
        ctx.animation.play(&ctx.animations.idle, true, 1.0);
    }

    fn physics_update(
        &mut self,
        ctx: &mut EnemyContext,
        world: &mut dyn GameWorld,
        _delta: f32,
        queue: &mut TransitionQueue,
    ) {
        if interrupt_gate(ctx, queue) {
            return;
        }
        let Some(target) = ctx.target else {
            return;
        };
        let Some(target_position) = world.targets().target_position(target) else {
            return;
        };
        let distance_sq = ctx.actor.position.distance_squared(target_position);
        if distance_sq <= ctx.behavior.aggro_radius * ctx.behavior.aggro_radius {
            queue.change_state(names::CHASE);
        }
    }
}

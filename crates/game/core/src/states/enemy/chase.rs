//! Enemy chase state: close on the target until attack range.

use crate::env::GameWorld;
use crate::fsm::{State, TransitionQueue};
use crate::states::names;

use super::{interrupt_gate, EnemyContext};

pub struct EnemyChaseState;

impl EnemyChaseState {
    pub fn new() -> Self {
        Self
    }
}

impl State<EnemyContext> for EnemyChaseState {
    fn name(&self) -> &'static str {
        names::CHASE
    }

    fn enter(
        &mut self,
        ctx: &mut EnemyContext,
        _world: &mut dyn GameWorld,
        _queue: &mut TransitionQueue,
    ) {
        ctx.animation.play(&ctx.animations.walk, true, 1.0);
    }

    fn physics_update(
        &mut self,
        ctx: &mut EnemyContext,
        world: &mut dyn GameWorld,
        delta: f32,
        queue: &mut TransitionQueue,
    ) {
        if interrupt_gate(ctx, queue) {
            return;
        }
        let target_position = ctx
            .target
            .and_then(|target| world.targets().target_position(target));
        let Some(target_position) = target_position else {
            queue.change_state(names::IDLE);
            return;
        };

        let offset = target_position - ctx.actor.position;
        let distance_sq = offset.length_squared();
        if distance_sq > ctx.behavior.aggro_radius * ctx.behavior.aggro_radius {
            queue.change_state(names::IDLE);
            return;
        }
        if distance_sq <= ctx.behavior.attack_range * ctx.behavior.attack_range {
            queue.change_state(names::ATTACK);
            return;
        }

        let direction = offset.normalize_or_zero();
        ctx.actor.velocity =
            direction * ctx.actor.move_speed * ctx.behavior.chase_speed_multiplier;
        if direction.x != 0.0 {
            ctx.actor.flip_facing(direction.x > 0.0);
        }
        ctx.actor.integrate(delta);
    }
}

//! Enemy hurt and death states.

use glam::Vec2;

use crate::env::GameWorld;
use crate::fsm::{State, TransitionQueue};
use crate::states::{move_toward, names};

use super::EnemyContext;

pub struct EnemyHurtState {
    stagger: f32,
    elapsed: f32,
}

impl EnemyHurtState {
    pub fn new() -> Self {
        Self {
            stagger: 0.25,
            elapsed: 0.0,
        }
    }
}

impl State<EnemyContext> for EnemyHurtState {
    fn name(&self) -> &'static str {
        names::HURT
    }

    fn enter(
        &mut self,
        ctx: &mut EnemyContext,
        _world: &mut dyn GameWorld,
        _queue: &mut TransitionQueue,
    ) {
        self.elapsed = 0.0;
        ctx.animation.play(&ctx.animations.hurt, false, 1.0);
        ctx.last_hurt = None;
    }

    fn physics_update(
        &mut self,
        ctx: &mut EnemyContext,
        _world: &mut dyn GameWorld,
        delta: f32,
        queue: &mut TransitionQueue,
    ) {
        if let Some(trigger) = ctx.actor.take_hurt_trigger() {
            if trigger.lethal {
                queue.change_state(names::DEATH);
                return;
            }
            self.elapsed = 0.0;
        }

        let brake = ctx.actor.move_speed * 3.0 * delta;
        ctx.actor.velocity = move_toward(ctx.actor.velocity, Vec2::ZERO, brake);
        ctx.actor.integrate(delta);

        self.elapsed += delta;
        if self.elapsed >= self.stagger {
            queue.change_state(names::CHASE);
        }
    }
}

pub struct EnemyDeathState;

impl EnemyDeathState {
    pub fn new() -> Self {
        Self
    }
}

impl State<EnemyContext> for EnemyDeathState {
    fn name(&self) -> &'static str {
        names::DEATH
    }

    fn enter(
        &mut self,
        ctx: &mut EnemyContext,
        _world: &mut dyn GameWorld,
        _queue: &mut TransitionQueue,
    ) {
        ctx.actor.velocity = Vec2::ZERO;
        ctx.animation.play(&ctx.animations.death, false, 1.0);
        tracing::debug!(actor = %ctx.actor.name, "enemy died");
    }
}

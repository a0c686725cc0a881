//! Player hurt state: brief stagger, then back to Idle.

use glam::Vec2;

use crate::env::GameWorld;
use crate::fsm::{State, TransitionQueue};
use crate::states::{move_toward, names};

use super::PlayerContext;

pub struct PlayerHurtState {
    stagger: f32,
    elapsed: f32,
}

impl PlayerHurtState {
    pub fn new() -> Self {
        Self {
            stagger: 0.3,
            elapsed: 0.0,
        }
    }
}

impl Default for PlayerHurtState {
    fn default() -> Self {
        Self::new()
    }
}

impl State<PlayerContext> for PlayerHurtState {
    fn name(&self) -> &'static str {
        names::HURT
    }

    fn enter(
        &mut self,
        ctx: &mut PlayerContext,
        _world: &mut dyn GameWorld,
        _queue: &mut TransitionQueue,
    ) {
        self.elapsed = 0.0;
        ctx.animation.play(&ctx.animations.hurt, false, 1.0);
        ctx.last_hurt = None;
    }

    fn physics_update(
        &mut self,
        ctx: &mut PlayerContext,
        _world: &mut dyn GameWorld,
        delta: f32,
        queue: &mut TransitionQueue,
    ) {
        // a lethal hit mid-stagger still ends in Death
        if let Some(trigger) = ctx.actor.take_hurt_trigger() {
            if trigger.lethal {
                queue.change_state(names::DEATH);
                return;
            }
            self.elapsed = 0.0;
        }

        // knockback decays during the stagger
        let brake = ctx.actor.move_speed * 3.0 * delta;
        ctx.actor.velocity = move_toward(ctx.actor.velocity, Vec2::ZERO, brake);
        ctx.actor.integrate(delta);

        self.elapsed += delta;
        if self.elapsed >= self.stagger {
            queue.change_state(names::IDLE);
        }
    }
}

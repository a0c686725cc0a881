//! Enemy attack state: one controller-selected template per activation.

use glam::Vec2;

use crate::combat::AttackContext;
use crate::env::GameWorld;
use crate::fsm::{State, TransitionQueue};
use crate::states::names;

use super::{interrupt_gate, EnemyContext};

pub struct EnemyAttackState;

impl EnemyAttackState {
    pub fn new() -> Self {
        Self
    }
}

impl State<EnemyContext> for EnemyAttackState {
    fn name(&self) -> &'static str {
        names::ATTACK
    }

    fn enter(
        &mut self,
        ctx: &mut EnemyContext,
        world: &mut dyn GameWorld,
        queue: &mut TransitionQueue,
    ) {
        ctx.actor.velocity = Vec2::ZERO;
        let EnemyContext {
            actor,
            controller,
            animation,
            rng,
            ..
        } = ctx;
        let mut attack_ctx = AttackContext {
            actor,
            inventory: None,
            weapon_skill: None,
            animation: animation.as_mut(),
            world,
            source_state: Some(names::CHASE),
        };
        // nothing eligible: fall back to chasing
        if !controller.select_and_start(&mut attack_ctx, rng) {
            queue.change_state(names::CHASE);
        }
    }

    fn exit(
        &mut self,
        ctx: &mut EnemyContext,
        _world: &mut dyn GameWorld,
        _queue: &mut TransitionQueue,
    ) {
        // an interrupted activation pays its cooldown
        if ctx.controller.is_attacking() {
            ctx.controller.cancel_active(false);
        }
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
        let EnemyContext {
            actor,
            controller,
            animation,
            ..
        } = &mut *ctx;
        let mut attack_ctx = AttackContext {
            actor,
            inventory: None,
            weapon_skill: None,
            animation: animation.as_mut(),
            world,
            source_state: None,
        };
        controller.tick(&mut attack_ctx, delta);
        ctx.actor.integrate(delta);

        if !ctx.controller.is_attacking() {
            queue.change_state(names::CHASE);
        }
    }
}

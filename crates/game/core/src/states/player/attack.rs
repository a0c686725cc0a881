//! Player attack state: drives the attack templates attached to the actor.

use glam::Vec2;

use crate::combat::AttackContext;
use crate::env::GameWorld;
use crate::fsm::{State, TransitionQueue};
use crate::states::names;

use super::{interrupt_gate, PlayerContext};

pub struct PlayerAttackState {
    active: Option<usize>,
}

impl PlayerAttackState {
    pub fn new() -> Self {
        Self { active: None }
    }

    /// Tries the templates in order with the recorded source state; the
    /// first that starts becomes the active one.
    fn try_start_template(&mut self, ctx: &mut PlayerContext, world: &mut dyn GameWorld) -> bool {
        let source = ctx
            .consume_attack_request_source()
            .unwrap_or(ctx.last_movement_state);

        let PlayerContext {
            actor,
            inventory,
            weapon_skill,
            attack_templates,
            animation,
            ..
        } = ctx;
        for (index, template) in attack_templates.iter_mut().enumerate() {
            let mut attack_ctx = AttackContext {
                actor: &mut *actor,
                inventory: Some(&mut *inventory),
                weapon_skill: weapon_skill.as_mut(),
                animation: animation.as_mut(),
                world: &mut *world,
                source_state: Some(source),
            };
            if template.try_start(&mut attack_ctx) {
                self.active = Some(index);
                return true;
            }
        }
        false
    }
}

impl Default for PlayerAttackState {
    fn default() -> Self {
        Self::new()
    }
}

impl State<PlayerContext> for PlayerAttackState {
    fn name(&self) -> &'static str {
        names::ATTACK
    }

    fn enter(
        &mut self,
        ctx: &mut PlayerContext,
        world: &mut dyn GameWorld,
        queue: &mut TransitionQueue,
    ) {
        ctx.actor.velocity = Vec2::ZERO;
        if !self.try_start_template(ctx, world) {
            queue.change_state(names::IDLE);
        }
    }

    fn exit(
        &mut self,
        ctx: &mut PlayerContext,
        _world: &mut dyn GameWorld,
        _queue: &mut TransitionQueue,
    ) {
        // only an interrupted activation is cancelled; natural completion
        // already cleared `active` and keeps its cooldown
        if let Some(index) = self.active.take() {
            if let Some(template) = ctx.attack_templates.get_mut(index) {
                template.cancel(true);
            }
        }
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
        let Some(index) = self.active else {
            queue.change_state(names::IDLE);
            return;
        };

        let PlayerContext {
            actor,
            inventory,
            weapon_skill,
            attack_templates,
            animation,
            ..
        } = &mut *ctx;
        let template = &mut attack_templates[index];
        let mut attack_ctx = AttackContext {
            actor,
            inventory: Some(inventory),
            weapon_skill: weapon_skill.as_mut(),
            animation: animation.as_mut(),
            world,
            source_state: None,
        };
        template.tick(&mut attack_ctx, delta);

        ctx.actor.integrate(delta);

        if !ctx.attack_templates[index].is_running() {
            self.active = None;
            queue.change_state(names::IDLE);
        }
    }
}

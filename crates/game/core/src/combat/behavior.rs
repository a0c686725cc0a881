//! Concrete attack behaviors plugged into [`AttackTemplate`].
//!
//! The template owns the shared phase machinery; a behavior contributes the
//! parts that differ between attacks: damage computation, animation choice,
//! extra start conditions, and the active-phase side effects.

use crate::items::attrs;

use super::AttackContext;

/// Variant-specific behavior of an attack.
pub trait AttackBehavior {
    /// Damage for this activation. Cached by the template and applied
    /// uniformly to every hit of the activation.
    fn compute_damage(&mut self, ctx: &mut AttackContext<'_>) -> f32;

    /// Animation replacing the spec's default for this activation.
    fn animation_override(&mut self, _ctx: &mut AttackContext<'_>) -> Option<String> {
        None
    }

    /// Additional start conditions beyond the spec's gating.
    fn conditions_met(&self, _ctx: &AttackContext<'_>) -> bool {
        true
    }

    /// Called once after a successful start, before the first tick.
    fn on_started(&mut self, _ctx: &mut AttackContext<'_>) {}

    /// Called once on entering the Active phase.
    fn on_active(&mut self, _ctx: &mut AttackContext<'_>) {}
}

/// The player's basic melee swing.
///
/// Damage is base actor damage plus the selected item's attack-power
/// attribute, then run through the weapon skill controller, which may also
/// swap the animation and fire its default skill.
#[derive(Debug, Default)]
pub struct BasicMeleeAttack;

impl BasicMeleeAttack {
    pub fn new() -> Self {
        Self
    }
}

impl AttackBehavior for BasicMeleeAttack {
    fn compute_damage(&mut self, ctx: &mut AttackContext<'_>) -> f32 {
        let mut damage = ctx.actor.base_damage;
        if let Some(inventory) = ctx.inventory.as_deref() {
            damage += inventory.selected_attribute_value(attrs::ATTACK_POWER, 0.0);
        }
        if let Some(skill) = ctx.weapon_skill.as_deref() {
            damage = skill.modify_attack_damage(damage);
        }
        damage
    }

    fn animation_override(&mut self, ctx: &mut AttackContext<'_>) -> Option<String> {
        ctx.weapon_skill
            .as_deref()
            .and_then(|s| s.primary_skill_animation())
            .map(str::to_owned)
    }

    fn on_started(&mut self, ctx: &mut AttackContext<'_>) {
        let actor = ctx.actor.id;
        if let Some(skill) = ctx.weapon_skill.as_deref_mut() {
            skill.trigger_default_skill(actor, ctx.world.events());
        }
    }
}

/// A plain enemy melee hit with a flat damage bonus on top of the actor's
/// base damage.
#[derive(Debug)]
pub struct SimpleMeleeAttack {
    bonus_damage: f32,
}

impl SimpleMeleeAttack {
    pub fn new(bonus_damage: f32) -> Self {
        Self { bonus_damage }
    }
}

impl AttackBehavior for SimpleMeleeAttack {
    fn compute_damage(&mut self, ctx: &mut AttackContext<'_>) -> f32 {
        ctx.actor.base_damage + self.bonus_damage
    }
}

/// A lunging attack: on entering the active phase the actor surges along
/// its facing, carrying the hit region through the target.
#[derive(Debug)]
pub struct ChargeEscapeAttack {
    bonus_damage: f32,
    charge_speed: f32,
}

impl ChargeEscapeAttack {
    pub fn new(bonus_damage: f32, charge_speed: f32) -> Self {
        Self {
            bonus_damage,
            charge_speed,
        }
    }
}

impl AttackBehavior for ChargeEscapeAttack {
    fn compute_damage(&mut self, ctx: &mut AttackContext<'_>) -> f32 {
        ctx.actor.base_damage + self.bonus_damage
    }

    fn on_active(&mut self, ctx: &mut AttackContext<'_>) {
        let lunge = ctx.actor.facing_dir() * self.charge_speed;
        ctx.actor.velocity = lunge;
    }
}

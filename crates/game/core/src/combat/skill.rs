//! Weapon skill modifiers applied on top of attack damage.

use crate::actor::ActorId;
use crate::events::{EventQueue, GameEvent};

/// Optional per-actor weapon skill layer.
///
/// Modifies computed attack damage, may override the attack animation, and
/// announces skill activation to observers.
#[derive(Clone, Debug)]
pub struct WeaponSkillController {
    damage_multiplier: f32,
    primary_skill_animation: Option<String>,
}

impl WeaponSkillController {
    pub fn new(damage_multiplier: f32) -> Self {
        Self {
            damage_multiplier,
            primary_skill_animation: None,
        }
    }

    pub fn with_skill_animation(mut self, animation: impl Into<String>) -> Self {
        self.primary_skill_animation = Some(animation.into());
        self
    }

    /// Applies the skill's damage modification.
    pub fn modify_attack_damage(&self, damage: f32) -> f32 {
        damage * self.damage_multiplier
    }

    /// Animation that replaces the attack's default, if the skill has one.
    pub fn primary_skill_animation(&self) -> Option<&str> {
        self.primary_skill_animation.as_deref()
    }

    /// Fires the default skill alongside an attack start.
    pub fn trigger_default_skill(&mut self, actor: ActorId, events: &mut EventQueue) {
        events.push(GameEvent::SkillTriggered { actor });
    }
}

impl Default for WeaponSkillController {
    fn default() -> Self {
        Self::new(1.0)
    }
}

//! Attack templates, enemy attack selection, and weapon skills.
//!
//! An [`AttackTemplate`] is a timed, phase-based action shared by player and
//! enemy attacks; concrete attacks differ only in their [`AttackBehavior`].
//! Enemies pick among their templates through the weighted
//! [`EnemyAttackController`].

pub mod attack;
pub mod behavior;
pub mod controller;
pub mod skill;

pub use attack::{AttackPhase, AttackSpec, AttackTemplate};
pub use behavior::{AttackBehavior, BasicMeleeAttack, ChargeEscapeAttack, SimpleMeleeAttack};
pub use controller::EnemyAttackController;
pub use skill::WeaponSkillController;

use crate::actor::Actor;
use crate::env::{AnimationSink, GameWorld};
use crate::items::InventoryComponent;

/// Borrows an attack needs while starting, ticking, or resolving hits.
///
/// Assembled by the acting state from its context fields; nothing here is
/// held across ticks.
pub struct AttackContext<'a> {
    pub actor: &'a mut Actor,
    pub inventory: Option<&'a mut InventoryComponent>,
    pub weapon_skill: Option<&'a mut WeaponSkillController>,
    pub animation: &'a mut dyn AnimationSink,
    pub world: &'a mut dyn GameWorld,
    /// State the attack was requested from, for source gating.
    pub source_state: Option<&'static str>,
}

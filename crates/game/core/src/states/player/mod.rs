//! Player state set: Idle, Walk, Run, Attack, PickUp, Throw, Hurt, Death.

mod attack;
mod death;
mod hurt;
mod idle;
mod movement;
mod pickup;
mod throw;

pub use attack::PlayerAttackState;
pub use death::PlayerDeathState;
pub use hurt::PlayerHurtState;
pub use idle::PlayerIdleState;
pub use movement::{PlayerRunState, PlayerWalkState};
pub use pickup::PlayerPickUpState;
pub use throw::PlayerThrowState;

use crate::actor::{Actor, HurtTrigger};
use crate::combat::{AttackTemplate, WeaponSkillController};
use crate::env::{AnimationSink, InputIntent};
use crate::fsm::{StateMachine, TransitionQueue};
use crate::interaction::ItemInteractionComponent;
use crate::items::InventoryComponent;

use super::names;

/// Animation names and speeds of the player rig.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PlayerAnimations {
    pub idle: String,
    pub walk: String,
    pub run: String,
    pub pickup: String,
    pub throw: String,
    pub hurt: String,
    pub death: String,
    pub walk_speed: f32,
    pub run_speed: f32,
    /// Movement speed multiplier while running.
    pub run_speed_multiplier: f32,
}

impl Default for PlayerAnimations {
    fn default() -> Self {
        Self {
            idle: "idle".to_owned(),
            walk: "walk".to_owned(),
            run: "run".to_owned(),
            pickup: "pickup".to_owned(),
            throw: "throw".to_owned(),
            hurt: "hurt".to_owned(),
            death: "death".to_owned(),
            walk_speed: 1.5,
            run_speed: 2.0,
            run_speed_multiplier: 2.0,
        }
    }
}

/// Everything actor-personal the player states operate on.
///
/// Owned by the host; the shared world arrives separately each tick.
pub struct PlayerContext {
    pub actor: Actor,
    pub inventory: InventoryComponent,
    pub weapon_skill: Option<WeaponSkillController>,
    pub interaction: ItemInteractionComponent,
    /// Attack templates available to the Attack state. Owned here so their
    /// cooldowns keep ticking while other states are active.
    pub attack_templates: Vec<AttackTemplate>,
    pub animation: Box<dyn AnimationSink>,
    pub input: Box<dyn InputIntent>,
    pub animations: PlayerAnimations,
    /// Last movement state entered; attack source gating reads this.
    pub last_movement_state: &'static str,
    attack_request_source: Option<&'static str>,
    /// Hurt trigger captured by the interrupt gate for the Hurt state.
    pub last_hurt: Option<HurtTrigger>,
}

impl PlayerContext {
    pub fn new(
        actor: Actor,
        inventory: InventoryComponent,
        interaction: ItemInteractionComponent,
        animation: Box<dyn AnimationSink>,
        input: Box<dyn InputIntent>,
    ) -> Self {
        Self {
            actor,
            inventory,
            weapon_skill: None,
            interaction,
            attack_templates: Vec::new(),
            animation,
            input,
            animations: PlayerAnimations::default(),
            last_movement_state: names::IDLE,
            attack_request_source: None,
            last_hurt: None,
        }
    }

    /// Records which movement state is active (Idle/Walk/Run).
    pub fn notify_movement_state(&mut self, name: &'static str) {
        self.last_movement_state = name;
    }

    /// Records the state an attack was requested from.
    pub fn request_attack_from(&mut self, name: &'static str) {
        self.attack_request_source = Some(name);
    }

    /// Consumes the recorded attack request source.
    pub fn consume_attack_request_source(&mut self) -> Option<&'static str> {
        self.attack_request_source.take()
    }

    /// Advances attack cooldowns while no attack is running. The host
    /// calls this once per tick, outside the state machine.
    pub fn tick_attack_cooldowns(&mut self, delta: f32) {
        for template in self.attack_templates.iter_mut() {
            template.tick_cooldown(delta);
        }
    }
}

/// Builds the player machine with the full state set registered.
pub fn player_state_machine(ctx: &PlayerContext) -> StateMachine<PlayerContext> {
    let mut machine = StateMachine::new(ctx.actor.id);
    machine
        .add_state(Box::new(PlayerIdleState::new()))
        .add_state(Box::new(PlayerWalkState::new()))
        .add_state(Box::new(PlayerRunState::new()))
        .add_state(Box::new(PlayerAttackState::new()))
        .add_state(Box::new(PlayerPickUpState::new()))
        .add_state(Box::new(PlayerThrowState::new()))
        .add_state(Box::new(PlayerHurtState::new()))
        .add_state(Box::new(PlayerDeathState::new()));
    machine
}

/// Routes a pending hurt trigger into the Hurt or Death state. Returns true
/// when the current state should stop updating this tick.
pub(crate) fn interrupt_gate(ctx: &mut PlayerContext, queue: &mut TransitionQueue) -> bool {
    if let Some(trigger) = ctx.actor.take_hurt_trigger() {
        ctx.last_hurt = Some(trigger);
        queue.change_state(if trigger.lethal { names::DEATH } else { names::HURT });
        return true;
    }
    false
}

/// Shared attack-input check for the movement states.
pub(crate) fn attack_requested(ctx: &mut PlayerContext, state: &'static str) -> bool {
    if ctx.input.just_pressed(crate::env::InputAction::Attack) {
        ctx.request_attack_from(state);
        return true;
    }
    false
}

//! Engine-agnostic gameplay core for a 2D action game.
//!
//! `skirmish-core` implements the actor state machine, the phase-based
//! attack pipeline, inventory storage, the drop/throw/pickup protocol, and
//! the world-item physics sub-state-machine. The host engine (rendering,
//! physics simulation, scene instancing, input devices) is consumed through
//! the narrow traits in [`env`]; everything here runs synchronously inside
//! one per-frame physics tick.

pub mod actor;
pub mod combat;
pub mod config;
pub mod env;
pub mod error;
pub mod events;
pub mod fsm;
pub mod interaction;
pub mod items;
pub mod rng;
pub mod states;
pub mod world;

#[cfg(test)]
pub(crate) mod testkit;

pub use actor::{Actor, ActorId, Facing, HurtTrigger};
pub use combat::{
    AttackBehavior, AttackContext, AttackPhase, AttackSpec, AttackTemplate, BasicMeleeAttack,
    ChargeEscapeAttack, EnemyAttackController, SimpleMeleeAttack, WeaponSkillController,
};
pub use config::GameConfig;
pub use env::{
    AnimationSink, CombatTargets, GameWorld, InputAction, InputIntent, OverlapQuery, PhysicsBody,
    RegionKind, SceneHandle, SceneResolver, WorldParts,
};
pub use error::{ErrorSeverity, GameError};
pub use events::{EventQueue, GameEvent};
pub use fsm::{MachineError, State, StateMachine, TransitionQueue};
pub use interaction::{
    DropDisposition, InteractionConfig, InteractionDirective, ItemInteractionComponent,
};
pub use items::{attrs, InventoryComponent, ItemDefinition, ItemId, ItemStack, SlotContainer};
pub use rng::{PcgRandom, RandomSource};
pub use states::enemy::{enemy_state_machine, EnemyBehavior, EnemyContext};
pub use states::player::{player_state_machine, PlayerAnimations, PlayerContext};
pub use world::{
    FinishReason, ImpactPolicy, PickupProp, SpawnError, WorldItemEntity, WorldItemId,
    WorldItemRegistry, WorldItemTuning,
};

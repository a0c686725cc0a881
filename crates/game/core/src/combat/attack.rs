//! Phase-based attack templates.

use crate::actor::ActorId;
use crate::env::RegionKind;
use crate::events::GameEvent;

use super::behavior::AttackBehavior;
use super::AttackContext;

/// Phase of an attack template's timeline.
///
/// `Idle` covers both "ready" and "cooling down"; the cooldown timer runs
/// independently of the phase machine once recovery completes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum AttackPhase {
    #[default]
    Idle,
    Warmup,
    Active,
    Recovery,
}

/// Timing and gating configuration of one attack.
#[derive(Clone, Debug)]
pub struct AttackSpec {
    /// Name the attack is addressed by (controller weight tables, logs).
    pub name: &'static str,
    pub warmup: f32,
    pub active: f32,
    pub recovery: f32,
    pub cooldown: f32,
    /// Default attack animation; behaviors may override per activation.
    pub animation: String,
    pub animation_speed: f32,
    /// States the attack may be triggered from. Empty means any.
    pub allowed_source_states: Vec<&'static str>,
    /// Require at least one target overlapping the attack region to start.
    pub requires_target_in_range: bool,
}

impl AttackSpec {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            warmup: 0.15,
            active: 0.2,
            recovery: 0.35,
            cooldown: 0.5,
            animation: "attack".to_owned(),
            animation_speed: 1.2,
            allowed_source_states: Vec::new(),
            requires_target_in_range: false,
        }
    }

    pub fn with_timings(mut self, warmup: f32, active: f32, recovery: f32, cooldown: f32) -> Self {
        self.warmup = warmup;
        self.active = active;
        self.recovery = recovery;
        self.cooldown = cooldown;
        self
    }

    pub fn from_states(mut self, states: &[&'static str]) -> Self {
        self.allowed_source_states = states.to_vec();
        self
    }

    pub fn requiring_target_in_range(mut self) -> Self {
        self.requires_target_in_range = true;
        self
    }
}

/// A timed, phase-based attack: Warmup → Active → Recovery, then cooldown.
///
/// One instance per configured attack per actor, living as long as the
/// actor does. Damage is computed once at start and used for every hit of
/// the activation; each target is hit at most once per activation no matter
/// how many ticks it stays inside the hit region.
pub struct AttackTemplate {
    spec: AttackSpec,
    behavior: Box<dyn AttackBehavior>,
    phase: AttackPhase,
    phase_elapsed: f32,
    cooldown_remaining: f32,
    cached_damage: f32,
    hit_this_activation: Vec<ActorId>,
}

impl AttackTemplate {
    pub fn new(spec: AttackSpec, behavior: Box<dyn AttackBehavior>) -> Self {
        Self {
            spec,
            behavior,
            phase: AttackPhase::Idle,
            phase_elapsed: 0.0,
            cooldown_remaining: 0.0,
            cached_damage: 0.0,
            hit_this_activation: Vec::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.spec.name
    }

    pub fn spec(&self) -> &AttackSpec {
        &self.spec
    }

    pub fn phase(&self) -> AttackPhase {
        self.phase
    }

    /// True from a successful start until recovery completes.
    pub fn is_running(&self) -> bool {
        self.phase != AttackPhase::Idle
    }

    pub fn cooldown_remaining(&self) -> f32 {
        self.cooldown_remaining
    }

    /// Damage cached at the last start. Meaningful while running.
    pub fn cached_damage(&self) -> f32 {
        self.cached_damage
    }

    /// Checks every start precondition without mutating anything.
    pub fn can_start(&self, ctx: &mut AttackContext<'_>) -> bool {
        if self.is_running() || self.cooldown_remaining > 0.0 {
            return false;
        }
        if !self.spec.allowed_source_states.is_empty() {
            let Some(source) = ctx.source_state else {
                return false;
            };
            if !self.spec.allowed_source_states.contains(&source) {
                return false;
            }
        }
        if self.spec.requires_target_in_range {
            let owner = ctx.actor.id;
            if ctx
                .world
                .overlaps()
                .overlapping_actors(owner, RegionKind::AttackArea)
                .is_empty()
            {
                return false;
            }
        }
        self.behavior.conditions_met(ctx)
    }

    /// Attempts to start the attack. Refusals (already running, cooling
    /// down, conditions unmet) are silent and return false.
    pub fn try_start(&mut self, ctx: &mut AttackContext<'_>) -> bool {
        if !self.can_start(ctx) {
            return false;
        }

        self.phase = AttackPhase::Warmup;
        self.phase_elapsed = 0.0;
        self.hit_this_activation.clear();
        self.cached_damage = self.behavior.compute_damage(ctx);

        let animation = self
            .behavior
            .animation_override(ctx)
            .unwrap_or_else(|| self.spec.animation.clone());
        ctx.animation.play(&animation, false, self.spec.animation_speed);
        ctx.world.events().push(GameEvent::AttackStarted {
            actor: ctx.actor.id,
        });
        self.behavior.on_started(ctx);
        true
    }

    /// Advances the phase timers by `delta`.
    ///
    /// Phase boundaries carry their deficit into the next phase, so a large
    /// time step walks through Warmup → Active → Recovery firing every
    /// boundary hook in order rather than skipping phases.
    pub fn tick(&mut self, ctx: &mut AttackContext<'_>, delta: f32) {
        let mut remaining = delta;

        if self.phase == AttackPhase::Idle {
            self.cooldown_remaining = (self.cooldown_remaining - remaining).max(0.0);
            return;
        }

        while remaining > 0.0 && self.phase != AttackPhase::Idle {
            let left_in_phase = (self.phase_duration() - self.phase_elapsed).max(0.0);
            if remaining < left_in_phase {
                self.phase_elapsed += remaining;
                remaining = 0.0;
            } else {
                remaining -= left_in_phase;
                self.enter_next_phase(ctx);
            }
            if self.phase == AttackPhase::Active {
                self.resolve_hits(ctx);
            }
        }

        // leftover time after recovery flows into the cooldown
        if self.phase == AttackPhase::Idle && remaining > 0.0 {
            self.cooldown_remaining = (self.cooldown_remaining - remaining).max(0.0);
        }
    }

    /// Advances only the cooldown timer. Hosts call this for templates
    /// whose owning state is not active, so cooldowns never stall.
    pub fn tick_cooldown(&mut self, delta: f32) {
        if !self.is_running() {
            self.cooldown_remaining = (self.cooldown_remaining - delta).max(0.0);
        }
    }

    /// Force-exits the phase machine immediately.
    ///
    /// Without `clear_cooldown` a cancelled activation still pays the full
    /// cooldown; with it the template is ready to start again at once.
    pub fn cancel(&mut self, clear_cooldown: bool) {
        if self.is_running() {
            self.cooldown_remaining = self.spec.cooldown;
        }
        self.phase = AttackPhase::Idle;
        self.phase_elapsed = 0.0;
        self.hit_this_activation.clear();
        if clear_cooldown {
            self.cooldown_remaining = 0.0;
        }
    }

    fn phase_duration(&self) -> f32 {
        match self.phase {
            AttackPhase::Idle => 0.0,
            AttackPhase::Warmup => self.spec.warmup,
            AttackPhase::Active => self.spec.active,
            AttackPhase::Recovery => self.spec.recovery,
        }
    }

    fn enter_next_phase(&mut self, ctx: &mut AttackContext<'_>) {
        self.phase_elapsed = 0.0;
        self.phase = match self.phase {
            AttackPhase::Idle => AttackPhase::Idle,
            AttackPhase::Warmup => {
                self.behavior.on_active(ctx);
                AttackPhase::Active
            }
            AttackPhase::Active => AttackPhase::Recovery,
            AttackPhase::Recovery => {
                self.cooldown_remaining = self.spec.cooldown;
                AttackPhase::Idle
            }
        };
    }

    /// Applies the cached damage to every target currently overlapping the
    /// attack region, once per target per activation.
    fn resolve_hits(&mut self, ctx: &mut AttackContext<'_>) {
        let owner = ctx.actor.id;
        let origin = ctx.actor.position;
        let targets = ctx
            .world
            .overlaps()
            .overlapping_actors(owner, RegionKind::AttackArea);
        let damage = (self.cached_damage.round() as u32).max(1);
        for target in targets {
            if target == owner || self.hit_this_activation.contains(&target) {
                continue;
            }
            ctx.world
                .targets()
                .deal_damage(target, damage, origin, Some(owner));
            self.hit_this_activation.push(target);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::{Actor, ActorId};
    use crate::combat::behavior::SimpleMeleeAttack;
    use crate::env::anim::NullAnimations;
    use crate::testkit::TestWorld;

    fn template() -> AttackTemplate {
        AttackTemplate::new(
            AttackSpec::new("melee").with_timings(0.1, 0.2, 0.3, 0.5),
            Box::new(SimpleMeleeAttack::new(3.0)),
        )
    }

    fn run<'a>(
        tpl: &mut AttackTemplate,
        actor: &'a mut Actor,
        anim: &'a mut NullAnimations,
        world: &'a mut TestWorld,
        steps: usize,
        dt: f32,
    ) {
        for _ in 0..steps {
            let mut ctx = AttackContext {
                actor: &mut *actor,
                inventory: None,
                weapon_skill: None,
                animation: &mut *anim,
                world: &mut *world,
                source_state: None,
            };
            tpl.tick(&mut ctx, dt);
        }
    }

    #[test]
    fn cannot_start_while_running_or_cooling_down() {
        let mut tpl = template();
        let mut actor = Actor::new(ActorId(1), "attacker");
        let mut anim = NullAnimations;
        let mut world = TestWorld::new();

        let mut ctx = AttackContext {
            actor: &mut actor,
            inventory: None,
            weapon_skill: None,
            animation: &mut anim,
            world: &mut world,
            source_state: None,
        };
        assert!(tpl.try_start(&mut ctx));
        assert!(tpl.is_running());
        assert!(!tpl.try_start(&mut ctx));

        // run to completion; cooldown now pending
        run(&mut tpl, &mut actor, &mut anim, &mut world, 7, 0.1);
        assert!(!tpl.is_running());
        assert!(tpl.cooldown_remaining() > 0.0);
        let mut ctx = AttackContext {
            actor: &mut actor,
            inventory: None,
            weapon_skill: None,
            animation: &mut anim,
            world: &mut world,
            source_state: None,
        };
        assert!(!tpl.try_start(&mut ctx));
    }

    #[test]
    fn cancel_with_clear_resets_everything() {
        let mut tpl = template();
        let mut actor = Actor::new(ActorId(1), "attacker");
        let mut anim = NullAnimations;
        let mut world = TestWorld::new();
        let mut ctx = AttackContext {
            actor: &mut actor,
            inventory: None,
            weapon_skill: None,
            animation: &mut anim,
            world: &mut world,
            source_state: None,
        };
        assert!(tpl.try_start(&mut ctx));
        tpl.cancel(true);
        assert!(!tpl.is_running());
        assert_eq!(tpl.cooldown_remaining(), 0.0);
        assert!(tpl.try_start(&mut ctx));
    }

    #[test]
    fn cancel_without_clear_keeps_cooldown() {
        let mut tpl = template();
        let mut actor = Actor::new(ActorId(1), "attacker");
        let mut anim = NullAnimations;
        let mut world = TestWorld::new();
        let mut ctx = AttackContext {
            actor: &mut actor,
            inventory: None,
            weapon_skill: None,
            animation: &mut anim,
            world: &mut world,
            source_state: None,
        };
        assert!(tpl.try_start(&mut ctx));
        tpl.cancel(false);
        assert!(!tpl.is_running());
        assert!(tpl.cooldown_remaining() > 0.0);
    }

    #[test]
    fn large_time_step_fires_every_phase_in_order() {
        let mut tpl = template();
        let mut actor = Actor::new(ActorId(1), "attacker");
        let mut anim = NullAnimations;
        let mut world = TestWorld::new();
        world.overlap_actors = vec![ActorId(2)];

        let mut ctx = AttackContext {
            actor: &mut actor,
            inventory: None,
            weapon_skill: None,
            animation: &mut anim,
            world: &mut world,
            source_state: None,
        };
        assert!(tpl.try_start(&mut ctx));
        // one giant step through warmup+active+recovery and into cooldown
        let mut ctx = AttackContext {
            actor: &mut actor,
            inventory: None,
            weapon_skill: None,
            animation: &mut anim,
            world: &mut world,
            source_state: None,
        };
        tpl.tick(&mut ctx, 10.0);
        assert!(!tpl.is_running());
        assert_eq!(tpl.cooldown_remaining(), 0.0);
        // the active phase still resolved its hit
        assert_eq!(world.damage_log.len(), 1);
    }

    #[test]
    fn each_target_is_hit_once_per_activation() {
        let mut tpl = template();
        let mut actor = Actor::new(ActorId(1), "attacker");
        let mut anim = NullAnimations;
        let mut world = TestWorld::new();
        world.overlap_actors = vec![ActorId(2), ActorId(3)];

        let mut ctx = AttackContext {
            actor: &mut actor,
            inventory: None,
            weapon_skill: None,
            animation: &mut anim,
            world: &mut world,
            source_state: None,
        };
        assert!(tpl.try_start(&mut ctx));
        // many small ticks across the active phase
        run(&mut tpl, &mut actor, &mut anim, &mut world, 20, 0.02);
        assert_eq!(world.damage_log.len(), 2);
    }

    #[test]
    fn source_state_gating() {
        let mut tpl = AttackTemplate::new(
            AttackSpec::new("melee").from_states(&["Idle", "Walk", "Run"]),
            Box::new(SimpleMeleeAttack::new(1.0)),
        );
        let mut actor = Actor::new(ActorId(1), "attacker");
        let mut anim = NullAnimations;
        let mut world = TestWorld::new();
        let mut ctx = AttackContext {
            actor: &mut actor,
            inventory: None,
            weapon_skill: None,
            animation: &mut anim,
            world: &mut world,
            source_state: Some("PickUp"),
        };
        assert!(!tpl.try_start(&mut ctx));
        ctx.source_state = Some("Run");
        assert!(tpl.try_start(&mut ctx));
    }
}

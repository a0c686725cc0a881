//! Weighted attack selection for AI actors.

use crate::rng::RandomSource;

use super::attack::AttackTemplate;
use super::AttackContext;

/// Chooses among weighted attack templates for an AI actor.
///
/// Selection is a relative-probability draw over the attacks whose start
/// preconditions currently hold (`weight / sum of eligible weights`), with
/// declaration order breaking ties. Enemy subtypes override only the weight
/// table; the selection algorithm is shared.
pub struct EnemyAttackController {
    attacks: Vec<(AttackTemplate, f32)>,
    active: Option<usize>,
}

impl EnemyAttackController {
    pub fn new() -> Self {
        Self {
            attacks: Vec::new(),
            active: None,
        }
    }

    /// Registers an attack with its selection weight, in declaration order.
    pub fn add_attack(&mut self, template: AttackTemplate, weight: f32) -> &mut Self {
        self.attacks.push((template, weight.max(0.0)));
        self
    }

    /// Overrides the weight of a registered attack. Unknown names are
    /// logged and leave the table unchanged.
    pub fn try_set_attack_weight(&mut self, name: &str, weight: f32) -> bool {
        match self.attacks.iter_mut().find(|(t, _)| t.name() == name) {
            Some((_, w)) => {
                *w = weight.max(0.0);
                true
            }
            None => {
                tracing::warn!(attack = name, "weight override for unknown attack");
                false
            }
        }
    }

    /// Names and weights in declaration order (diagnostics, tests).
    pub fn weights(&self) -> Vec<(&'static str, f32)> {
        self.attacks.iter().map(|(t, w)| (t.name(), *w)).collect()
    }

    /// Weighted draw over the attacks whose preconditions hold.
    /// Returns the chosen attack's name without starting it.
    pub fn select_attack(
        &mut self,
        ctx: &mut AttackContext<'_>,
        rng: &mut dyn RandomSource,
    ) -> Option<&'static str> {
        self.pick_eligible(ctx, rng)
            .map(|index| self.attacks[index].0.name())
    }

    /// Selects and starts an attack. Returns false when nothing is
    /// eligible; the caller falls back to its idle/chase behavior.
    pub fn select_and_start(
        &mut self,
        ctx: &mut AttackContext<'_>,
        rng: &mut dyn RandomSource,
    ) -> bool {
        let Some(index) = self.pick_eligible(ctx, rng) else {
            return false;
        };
        if self.attacks[index].0.try_start(ctx) {
            self.active = Some(index);
            true
        } else {
            false
        }
    }

    /// Advances the active template through its phases. Cooldowns of the
    /// other templates are advanced by [`tick_cooldowns`](Self::tick_cooldowns),
    /// which the host runs every tick regardless of state.
    pub fn tick(&mut self, ctx: &mut AttackContext<'_>, delta: f32) {
        if let Some(index) = self.active {
            self.attacks[index].0.tick(ctx, delta);
            if !self.attacks[index].0.is_running() {
                self.active = None;
            }
        }
    }

    /// Advances cooldowns only, for ticks when the owning actor is not in
    /// its attack state.
    pub fn tick_cooldowns(&mut self, delta: f32) {
        for (template, _) in self.attacks.iter_mut() {
            template.tick_cooldown(delta);
        }
    }

    /// True while a selected attack is running.
    pub fn is_attacking(&self) -> bool {
        self.active
            .is_some_and(|index| self.attacks[index].0.is_running())
    }

    /// Cancels the running attack, if any.
    pub fn cancel_active(&mut self, clear_cooldown: bool) {
        if let Some(index) = self.active.take() {
            self.attacks[index].0.cancel(clear_cooldown);
        }
    }

    fn pick_eligible(
        &mut self,
        ctx: &mut AttackContext<'_>,
        rng: &mut dyn RandomSource,
    ) -> Option<usize> {
        let mut eligible: Vec<(usize, f32)> = Vec::with_capacity(self.attacks.len());
        for (index, (template, weight)) in self.attacks.iter().enumerate() {
            if *weight > 0.0 && template.can_start(ctx) {
                eligible.push((index, *weight));
            }
        }
        if eligible.is_empty() {
            return None;
        }

        let total: f32 = eligible.iter().map(|(_, w)| w).sum();
        let mut draw = rng.next_f32() * total;
        for (index, weight) in &eligible {
            if draw < *weight {
                return Some(*index);
            }
            draw -= weight;
        }
        // floating point edge: fall back to the last eligible entry
        eligible.last().map(|(index, _)| *index)
    }
}

impl Default for EnemyAttackController {
    fn default() -> Self {
        Self::new()
    }
}

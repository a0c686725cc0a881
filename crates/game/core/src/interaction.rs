//! Player-initiated item interaction: drop, throw, pickup.
//!
//! The component reads the selected quickbar stack and drives the
//! drop/throw/pickup protocol against the world-item registry. It never
//! touches the state machine directly: input processing returns a
//! directive when a transition is wanted, and the Throw/PickUp states call
//! back into [`throw_after_animation`](ItemInteractionComponent::throw_after_animation)
//! and [`execute_pickup`](ItemInteractionComponent::execute_pickup) once
//! their wind-up has played.

use glam::Vec2;

use crate::actor::Actor;
use crate::env::{GameWorld, InputAction, InputIntent, RegionKind};
use crate::events::GameEvent;
use crate::items::{InventoryComponent, ItemStack};
use crate::world::WorldItemId;

/// How a drop leaves the actor's hand.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropDisposition {
    /// Set down in front of the actor.
    Place,
    /// Launched along the facing direction with an impulse.
    Throw,
}

/// State transition requested by input processing. The caller owns the
/// state machine and performs the change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InteractionDirective {
    EnterThrowState,
    EnterPickupState,
}

/// Tunables of the interaction component.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct InteractionConfig {
    /// Spawn offset for placed items, x scaled by facing.
    pub drop_offset: Vec2,
    /// Spawn offset for thrown items, x scaled by facing.
    pub throw_offset: Vec2,
    /// Launch speed applied along the facing direction.
    pub throw_impulse: f32,
    /// Fallback pickup scan radius.
    pub pickup_range: f32,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            drop_offset: Vec2::new(32.0, 0.0),
            throw_offset: Vec2::new(48.0, -10.0),
            throw_impulse: 800.0,
            pickup_range: 150.0,
        }
    }
}

/// Orchestrates drop/throw/pickup, including the multi-step recovery
/// protocol when a committed extraction cannot materialize in the world.
#[derive(Clone, Debug, Default)]
pub struct ItemInteractionComponent {
    config: InteractionConfig,
}

impl ItemInteractionComponent {
    pub fn new(config: InteractionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &InteractionConfig {
        &self.config
    }

    /// Dispatches this tick's interaction input.
    ///
    /// Throw and pickup prefer their dedicated states so the action gets a
    /// visible wind-up; the returned directive tells the caller which state
    /// to enter. When the machine lacks the state, the action executes
    /// immediately instead.
    pub fn process_input(
        &mut self,
        input: &dyn InputIntent,
        has_throw_state: bool,
        has_pickup_state: bool,
        actor: &mut Actor,
        inventory: &mut InventoryComponent,
        world: &mut dyn GameWorld,
    ) -> Option<InteractionDirective> {
        if input.just_pressed(InputAction::PutDown) {
            self.try_handle_drop(DropDisposition::Place, actor, inventory, world);
        }

        if input.just_pressed(InputAction::Throw) && self.can_drop_selected(inventory) {
            if has_throw_state {
                return Some(InteractionDirective::EnterThrowState);
            }
            self.try_handle_drop(DropDisposition::Throw, actor, inventory, world);
        }

        if input.just_pressed(InputAction::ItemSelectRight) {
            inventory.select_next_slot();
        }
        if input.just_pressed(InputAction::ItemSelectLeft) {
            inventory.select_previous_slot();
        }

        if input.just_pressed(InputAction::ItemUse) {
            self.try_use_selected(inventory, world);
        }

        if input.just_pressed(InputAction::TakeUp) {
            // pickup is refused while a hand item is selected
            if inventory.has_selected_item() {
                return None;
            }
            if has_pickup_state {
                return Some(InteractionDirective::EnterPickupState);
            }
            tracing::warn!(
                actor = %actor.name,
                "no PickUp state on the machine; picking up directly"
            );
            self.execute_pickup(actor, inventory, world, false);
        }

        None
    }

    /// Whether the selected slot holds something droppable.
    fn can_drop_selected(&self, inventory: &InventoryComponent) -> bool {
        inventory
            .selected_stack()
            .is_some_and(|s| !s.is_empty() && !s.id().is_empty_sentinel())
    }

    /// Deferred throw entry point, called by the Throw state once its
    /// wind-up has played.
    pub fn throw_after_animation(
        &mut self,
        actor: &mut Actor,
        inventory: &mut InventoryComponent,
        world: &mut dyn GameWorld,
    ) -> bool {
        self.try_handle_drop(DropDisposition::Throw, actor, inventory, world)
    }

    /// Commits a drop or throw of the whole selected stack.
    ///
    /// The world scene must resolve *before* removal is committed: an
    /// unmapped item fails the drop with the source slot untouched. After a
    /// successful extraction, a spawn failure runs the ordered recovery
    /// protocol - original slot, then backpack, then logged loss.
    pub fn try_handle_drop(
        &mut self,
        disposition: DropDisposition,
        actor: &mut Actor,
        inventory: &mut InventoryComponent,
        world: &mut dyn GameWorld,
    ) -> bool {
        let Some(selected) = inventory.selected_stack() else {
            return false;
        };
        if selected.is_empty() || selected.id().is_empty_sentinel() {
            return false;
        }
        let item_id = selected.id().clone();
        let quantity = selected.quantity();

        // resolve the scene before committing any removal
        if world.scenes().resolve_world_scene(&item_id).is_none() {
            tracing::warn!(
                actor = %actor.name,
                item = %item_id,
                quantity,
                "drop refused: item has no world scene mapping"
            );
            return false;
        }

        let Some(extracted) = inventory.try_extract_from_selected(quantity) else {
            return false;
        };

        let spawn_position = self.spawn_position(actor, disposition);
        let parts = world.parts();
        match parts
            .items
            .spawn_from_stack(parts.scenes, extracted, spawn_position)
        {
            Ok(id) => {
                let entity = parts
                    .items
                    .get_mut(id)
                    .expect("freshly spawned entity is present");
                entity.set_last_dropped_by(Some(actor.id));
                if disposition == DropDisposition::Throw {
                    entity.apply_throw_impulse(actor.facing_dir() * self.config.throw_impulse);
                }
                parts.events.push(GameEvent::ItemRemoved { item: item_id });
                true
            }
            Err((err, extracted)) => {
                tracing::warn!(actor = %actor.name, %err, "world spawn failed after extraction");
                self.recover_extracted(actor, inventory, world, extracted);
                false
            }
        }
    }

    /// Ordered recovery for an extracted stack that could not spawn:
    /// (1) back into the original slot, (2) remainder into the backpack,
    /// (3) anything left is irrevocably lost and logged with exact counts.
    /// Guarantees `recovered + lost == original`.
    fn recover_extracted(
        &mut self,
        actor: &Actor,
        inventory: &mut InventoryComponent,
        world: &mut dyn GameWorld,
        mut extracted: ItemStack,
    ) {
        let original = extracted.quantity();
        let item = extracted.id().clone();
        let mut recovered = 0;

        recovered += inventory.try_return_to_selected(&mut extracted);
        if !extracted.is_empty() {
            recovered += inventory.add_to_backpack(&mut extracted);
        }

        if !extracted.is_empty() {
            let lost = extracted.quantity();
            tracing::error!(
                actor = %actor.name,
                item = %item,
                lost,
                recovered,
                original,
                "item recovery failed; items lost to spawn failure and full inventory"
            );
            world.events().push(GameEvent::ItemsLost {
                item,
                original,
                recovered,
                lost,
            });
            extracted.remove(lost);
        }
    }

    /// Consumes one unit of the selected item.
    pub fn try_use_selected(
        &mut self,
        inventory: &mut InventoryComponent,
        world: &mut dyn GameWorld,
    ) -> bool {
        if !inventory.has_selected_item() {
            return false;
        }
        let Some(used) = inventory.try_extract_from_selected(1) else {
            return false;
        };
        world.events().push(GameEvent::ItemRemoved {
            item: used.id().clone(),
        });
        true
    }

    /// Resolves the nearest pickup candidate and delegates the transfer to
    /// it. `to_backpack` routes the stack past the hand slot, which is how
    /// pickup is allowed while an item is selected.
    pub fn execute_pickup(
        &mut self,
        actor: &mut Actor,
        inventory: &mut InventoryComponent,
        world: &mut dyn GameWorld,
        to_backpack: bool,
    ) -> bool {
        if inventory.has_selected_item() && !to_backpack {
            return false;
        }

        let candidate = self
            .candidate_from_region(actor, world)
            .or_else(|| self.candidate_by_distance(actor, world));

        let Some(candidate) = candidate else {
            return false;
        };

        let parts = world.parts();
        match candidate {
            PickupCandidate::Item(id) => match parts.items.get_mut(id) {
                Some(entity) => {
                    entity.try_pickup_by_actor(actor, inventory, to_backpack, parts.events)
                }
                None => false,
            },
            PickupCandidate::Prop(id) => match parts.items.prop_mut(id) {
                Some(prop) => prop.try_pickup_by_actor(actor, parts.events),
                None => false,
            },
        }
    }

    /// Preferred candidate source: entities overlapping the interaction
    /// region, nearest by squared distance.
    fn candidate_from_region(
        &self,
        actor: &Actor,
        world: &mut dyn GameWorld,
    ) -> Option<PickupCandidate> {
        let overlapping = world
            .overlaps()
            .overlapping_items(actor.id, RegionKind::InteractionArea);
        let items = world.items();
        let mut nearest: Option<(PickupCandidate, f32)> = None;
        for id in overlapping {
            let Some(entity) = items.get(id) else {
                continue;
            };
            if !entity.is_pickup_enabled() {
                continue;
            }
            let distance_sq = actor.position.distance_squared(entity.position());
            if nearest.as_ref().is_none_or(|(_, best)| distance_sq < *best) {
                nearest = Some((PickupCandidate::Item(id), distance_sq));
            }
        }
        nearest.map(|(candidate, _)| candidate)
    }

    /// Fallback candidate source: distance scan over all registered world
    /// items (requiring the mutual-range check) and pickup props.
    fn candidate_by_distance(
        &self,
        actor: &Actor,
        world: &mut dyn GameWorld,
    ) -> Option<PickupCandidate> {
        let range_sq = self.config.pickup_range * self.config.pickup_range;
        let items = world.items();
        let mut nearest: Option<(PickupCandidate, f32)> = None;

        for entity in items.entities() {
            if !entity.is_pickup_enabled() {
                continue;
            }
            // the item must also see the actor from its own grab region
            if !entity.is_actor_in_range(actor.id) {
                continue;
            }
            let distance_sq = actor.position.distance_squared(entity.position());
            if distance_sq < range_sq
                && nearest.as_ref().is_none_or(|(_, best)| distance_sq < *best)
            {
                nearest = Some((PickupCandidate::Item(entity.id()), distance_sq));
            }
        }

        for prop in items.props() {
            if !prop.is_enabled() {
                continue;
            }
            let distance_sq = actor.position.distance_squared(prop.position);
            if distance_sq < range_sq
                && nearest.as_ref().is_none_or(|(_, best)| distance_sq < *best)
            {
                nearest = Some((PickupCandidate::Prop(prop.id), distance_sq));
            }
        }

        nearest.map(|(candidate, _)| candidate)
    }

    fn spawn_position(&self, actor: &Actor, disposition: DropDisposition) -> Vec2 {
        let offset = match disposition {
            DropDisposition::Place => self.config.drop_offset,
            DropDisposition::Throw => self.config.throw_offset,
        };
        let facing = actor.facing_dir();
        actor.position + Vec2::new(facing.x * offset.x, offset.y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PickupCandidate {
    Item(WorldItemId),
    Prop(WorldItemId),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::ActorId;
    use crate::events::GameEvent;
    use crate::items::{attrs, ItemDefinition};
    use crate::testkit::TestWorld;
    use std::sync::Arc;

    fn sword() -> Arc<ItemDefinition> {
        Arc::new(
            ItemDefinition::new("sword", "Sword", 1)
                .with_attribute(attrs::ATTACK_POWER, 5.0)
                .with_world_scene("sword"),
        )
    }

    fn knife() -> Arc<ItemDefinition> {
        Arc::new(
            ItemDefinition::new("knife", "Knife", 10)
                .with_attribute(attrs::THROW_DAMAGE, 4.0)
                .with_world_scene("knife"),
        )
    }

    fn setup() -> (ItemInteractionComponent, Actor, InventoryComponent, TestWorld) {
        let interaction = ItemInteractionComponent::default();
        let actor = Actor::new(ActorId::PLAYER, "hero");
        let inventory = InventoryComponent::new();
        let world = TestWorld::with_scenes(&["sword", "knife"]);
        (interaction, actor, inventory, world)
    }

    #[test]
    fn drop_commits_extraction_and_spawns_at_facing_offset() {
        let (mut interaction, mut actor, mut inventory, mut world) = setup();
        inventory.add_item_smart(&sword(), 1);

        assert!(interaction.try_handle_drop(
            DropDisposition::Place,
            &mut actor,
            &mut inventory,
            &mut world,
        ));
        assert!(!inventory.has_selected_item());
        let entity = world.items.entities().next().unwrap();
        assert_eq!(entity.position(), Vec2::new(32.0, 0.0));
        assert_eq!(entity.last_dropped_by(), Some(ActorId::PLAYER));
        assert!(world
            .events
            .iter()
            .any(|e| matches!(e, GameEvent::ItemRemoved { item } if item.as_str() == "sword")));
    }

    #[test]
    fn unresolvable_scene_leaves_slot_untouched() {
        let (mut interaction, mut actor, mut inventory, _) = setup();
        let mut world = TestWorld::with_scenes(&[]); // no mappings
        inventory.add_item_smart(&sword(), 1);

        assert!(!interaction.try_handle_drop(
            DropDisposition::Place,
            &mut actor,
            &mut inventory,
            &mut world,
        ));
        assert!(inventory.has_selected_item());
        assert!(world.items.is_empty());
    }

    #[test]
    fn empty_or_sentinel_slot_fails_silently() {
        let (mut interaction, mut actor, mut inventory, mut world) = setup();
        assert!(!interaction.try_handle_drop(
            DropDisposition::Place,
            &mut actor,
            &mut inventory,
            &mut world,
        ));

        let sentinel = Arc::new(ItemDefinition::new("empty_item", "Empty", 1));
        inventory.add_item_smart(&sentinel, 1);
        assert!(!interaction.try_handle_drop(
            DropDisposition::Place,
            &mut actor,
            &mut inventory,
            &mut world,
        ));
    }

    #[test]
    fn throw_applies_impulse_along_facing() {
        let (mut interaction, mut actor, mut inventory, mut world) = setup();
        actor.flip_facing(false); // facing left
        inventory.add_item_smart(&knife(), 3);

        assert!(interaction.throw_after_animation(&mut actor, &mut inventory, &mut world));
        let entity = world.items.entities().next().unwrap();
        assert!(entity.is_armed());
        // spawned on the facing side
        assert!(entity.position().x < 0.0);
    }

    #[test]
    fn spawn_failure_recovers_to_original_slot() {
        let (mut interaction, mut actor, mut inventory, mut world) = setup();
        world.scenes.fail_instantiation = true;
        inventory.add_item_smart(&knife(), 5);

        assert!(!interaction.try_handle_drop(
            DropDisposition::Place,
            &mut actor,
            &mut inventory,
            &mut world,
        ));
        // everything returned to the slot it came from
        assert_eq!(inventory.selected_stack().unwrap().quantity(), 5);
        assert!(world
            .events
            .iter()
            .all(|e| !matches!(e, GameEvent::ItemsLost { .. })));
    }

    #[test]
    fn recovery_falls_back_to_backpack_then_logs_loss() {
        let (mut interaction, actor, mut inventory, mut world) = setup();

        // selected slot occupied by a sword, so the extracted knives cannot
        // return to their original slot; backpack has one open slot left
        inventory.add_item_smart(&sword(), 1);
        let small_knife = Arc::new(ItemDefinition::new("knife", "Knife", 3));
        let filler = Arc::new(ItemDefinition::new("rock", "Rock", 1));
        for _ in 0..inventory.backpack().capacity() - 1 {
            let mut rock = ItemStack::new(Arc::clone(&filler), 1);
            assert_eq!(inventory.add_to_backpack(&mut rock), 1);
        }

        let extracted = ItemStack::new(Arc::clone(&small_knife), 3);
        interaction.recover_extracted(&actor, &mut inventory, &mut world, extracted);
        // all 3 fit into the one open backpack slot (max_stack 3)
        assert_eq!(inventory.backpack().total_of(&small_knife), 3);

        // a second stack has nowhere to go at all
        let overflow = ItemStack::new(small_knife, 3);
        interaction.recover_extracted(&actor, &mut inventory, &mut world, overflow);
        let lost_events: Vec<_> = world
            .events
            .iter()
            .filter_map(|e| match e {
                GameEvent::ItemsLost {
                    original,
                    recovered,
                    lost,
                    ..
                } => Some((*original, *recovered, *lost)),
                _ => None,
            })
            .collect();
        assert_eq!(lost_events, vec![(3, 0, 3)]);
    }

    #[test]
    fn pickup_refused_while_holding_unless_to_backpack() {
        let (mut interaction, mut actor, mut inventory, mut world) = setup();
        inventory.add_item_smart(&sword(), 1);

        let id = world.spawn_resting(knife(), 3, Vec2::new(10.0, 0.0));
        world.items.get_mut(id).unwrap().actor_entered_range(actor.id);

        assert!(!interaction.execute_pickup(&mut actor, &mut inventory, &mut world, false));
        assert!(interaction.execute_pickup(&mut actor, &mut inventory, &mut world, true));
        assert_eq!(inventory.backpack().total_of(&knife()), 3);
    }

    #[test]
    fn fallback_scan_requires_mutual_range() {
        let (mut interaction, mut actor, mut inventory, mut world) = setup();
        // in distance range but the item does not see the actor
        world.spawn_resting(knife(), 1, Vec2::new(50.0, 0.0));
        assert!(!interaction.execute_pickup(&mut actor, &mut inventory, &mut world, false));

        // now the mutual check passes
        let id = world.items.entities().next().unwrap().id();
        world.items.get_mut(id).unwrap().actor_entered_range(actor.id);
        assert!(interaction.execute_pickup(&mut actor, &mut inventory, &mut world, false));
    }

    #[test]
    fn region_overlap_prefers_nearest() {
        let (mut interaction, mut actor, mut inventory, mut world) = setup();
        let far = world.spawn_resting(knife(), 1, Vec2::new(120.0, 0.0));
        let near = world.spawn_resting(knife(), 2, Vec2::new(40.0, 0.0));
        world.overlap_items = vec![far, near];

        assert!(interaction.execute_pickup(&mut actor, &mut inventory, &mut world, false));
        // the near entity (2 knives) was taken and freed
        assert!(world.items.get(near).unwrap().finished().is_some());
        assert!(world.items.get(far).unwrap().finished().is_none());
        assert_eq!(inventory.selected_stack().unwrap().quantity(), 2);
    }
}

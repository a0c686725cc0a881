//! Player inventory: quickbar + backpack + selection.

use std::sync::Arc;

use crate::config::GameConfig;
use crate::events::{EventQueue, GameEvent};

use super::container::SlotContainer;
use super::definition::ItemDefinition;
use super::stack::ItemStack;

/// An actor's item storage: a small directly-selectable quickbar (the
/// selected slot doubles as the hand slot) and a general backpack.
#[derive(Clone, Debug, Default)]
pub struct InventoryComponent {
    quickbar: SlotContainer<{ GameConfig::QUICKBAR_SLOTS }>,
    backpack: SlotContainer<{ GameConfig::BACKPACK_SLOTS }>,
    selected: usize,
}

impl InventoryComponent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn quickbar(&self) -> &SlotContainer<{ GameConfig::QUICKBAR_SLOTS }> {
        &self.quickbar
    }

    pub fn backpack(&self) -> &SlotContainer<{ GameConfig::BACKPACK_SLOTS }> {
        &self.backpack
    }

    // ========================================================================
    // Selection
    // ========================================================================

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn select_slot(&mut self, slot: usize) {
        if slot < GameConfig::QUICKBAR_SLOTS {
            self.selected = slot;
        }
    }

    pub fn select_next_slot(&mut self) {
        self.selected = (self.selected + 1) % GameConfig::QUICKBAR_SLOTS;
    }

    pub fn select_previous_slot(&mut self) {
        self.selected = (self.selected + GameConfig::QUICKBAR_SLOTS - 1) % GameConfig::QUICKBAR_SLOTS;
    }

    /// The stack in the selected quickbar slot, if any.
    pub fn selected_stack(&self) -> Option<&ItemStack> {
        self.quickbar.stack_at(self.selected)
    }

    /// True when the selected slot holds a real, non-empty item.
    pub fn has_selected_item(&self) -> bool {
        self.selected_stack().is_some_and(|s| !s.is_empty())
    }

    // ========================================================================
    // Transfers
    // ========================================================================

    /// Detaches up to `quantity` from the selected slot.
    pub fn try_extract_from_selected(&mut self, quantity: u32) -> Option<ItemStack> {
        self.quickbar.extract(self.selected, quantity)
    }

    /// Returns items from a detached stack back into the selected slot
    /// (merge-or-fill). Removes what was accepted from `stack` and returns
    /// the accepted count.
    pub fn try_return_to_selected(&mut self, stack: &mut ItemStack) -> u32 {
        let accepted =
            self.quickbar
                .add_item_to_slot(&Arc::clone(stack.item()), stack.quantity(), self.selected);
        stack.remove(accepted);
        accepted
    }

    /// Moves as much of a detached stack as fits into the backpack.
    pub fn add_to_backpack(&mut self, stack: &mut ItemStack) -> u32 {
        let accepted = self
            .backpack
            .add_item(&Arc::clone(stack.item()), stack.quantity());
        stack.remove(accepted);
        accepted
    }

    /// Adds items preferring the hand: selected slot first, then the rest of
    /// the quickbar, then the backpack. Returns how much was accepted.
    pub fn add_item_smart(&mut self, item: &Arc<ItemDefinition>, quantity: u32) -> u32 {
        let mut remaining = quantity;
        remaining -= self.quickbar.add_item_to_slot(item, remaining, self.selected);
        if remaining > 0 {
            remaining -= self.quickbar.add_item(item, remaining);
        }
        if remaining > 0 {
            remaining -= self.backpack.add_item(item, remaining);
        }
        quantity - remaining
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Attribute value contributed by the selected item, or `default` when
    /// no item is selected or it lacks the attribute.
    pub fn selected_attribute_value(&self, attr: &str, default: f32) -> f32 {
        self.selected_stack()
            .filter(|s| !s.is_empty())
            .and_then(|s| s.item().attribute(attr))
            .unwrap_or(default)
    }

    /// Publishes the removal of an item for UI observers.
    pub fn notify_item_removed(&self, item: &ItemStack, events: &mut EventQueue) {
        events.push(GameEvent::ItemRemoved {
            item: item.id().clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::definition::attrs;

    fn knife() -> Arc<ItemDefinition> {
        Arc::new(
            ItemDefinition::new("knife", "Knife", 10).with_attribute(attrs::ATTACK_POWER, 3.0),
        )
    }

    #[test]
    fn selection_wraps_both_directions() {
        let mut inv = InventoryComponent::new();
        inv.select_previous_slot();
        assert_eq!(inv.selected_index(), GameConfig::QUICKBAR_SLOTS - 1);
        inv.select_next_slot();
        assert_eq!(inv.selected_index(), 0);
    }

    #[test]
    fn extract_then_return_round_trips() {
        let mut inv = InventoryComponent::new();
        inv.add_item_smart(&knife(), 5);
        let mut detached = inv.try_extract_from_selected(5).unwrap();
        assert!(!inv.has_selected_item());
        assert_eq!(inv.try_return_to_selected(&mut detached), 5);
        assert!(detached.is_empty());
        assert_eq!(inv.selected_stack().unwrap().quantity(), 5);
    }

    #[test]
    fn smart_add_prefers_selected_slot() {
        let mut inv = InventoryComponent::new();
        inv.select_slot(2);
        inv.add_item_smart(&knife(), 4);
        assert_eq!(inv.quickbar().stack_at(2).unwrap().quantity(), 4);
    }

    #[test]
    fn smart_add_overflows_into_backpack() {
        let mut inv = InventoryComponent::new();
        // 5 quickbar slots * 10 max stack = 50; the rest lands in the backpack
        let accepted = inv.add_item_smart(&knife(), 60);
        assert_eq!(accepted, 60);
        assert_eq!(inv.backpack().total_of(&knife()), 10);
    }

    #[test]
    fn attribute_bonus_follows_selection() {
        let mut inv = InventoryComponent::new();
        inv.add_item_smart(&knife(), 1);
        assert_eq!(inv.selected_attribute_value(attrs::ATTACK_POWER, 0.0), 3.0);
        inv.select_next_slot();
        assert_eq!(inv.selected_attribute_value(attrs::ATTACK_POWER, 0.0), 0.0);
    }

    #[test]
    fn empty_selection_reports_no_item() {
        let inv = InventoryComponent::new();
        assert!(!inv.has_selected_item());
        assert!(inv.selected_stack().is_none());
    }
}

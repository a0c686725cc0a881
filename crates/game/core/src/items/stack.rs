//! Item stacks - the unit of inventory storage and transfer.

use std::sync::Arc;

use super::definition::ItemDefinition;
use super::ItemId;

/// A quantity of one item kind.
///
/// Invariant: `quantity == 0` means the stack is logically empty regardless
/// of which definition it still references; every consumer must treat it as
/// holding nothing. A stack is owned by exactly one container (quickbar
/// slot, backpack slot, or an in-flight extracted stack) at a time.
#[derive(Clone, Debug, PartialEq)]
pub struct ItemStack {
    item: Arc<ItemDefinition>,
    quantity: u32,
}

impl ItemStack {
    /// Creates a stack. Quantity is clamped to the definition's `max_stack`.
    pub fn new(item: Arc<ItemDefinition>, quantity: u32) -> Self {
        let quantity = quantity.min(item.max_stack);
        Self { item, quantity }
    }

    pub fn item(&self) -> &Arc<ItemDefinition> {
        &self.item
    }

    pub fn id(&self) -> &ItemId {
        &self.item.id
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// True when the stack holds nothing: zero quantity or the sentinel
    /// empty item.
    pub fn is_empty(&self) -> bool {
        self.quantity == 0 || self.item.id.is_empty_sentinel()
    }

    /// Remaining room before `max_stack`.
    pub fn free_space(&self) -> u32 {
        self.item.max_stack.saturating_sub(self.quantity)
    }

    /// Adds up to `amount`, bounded by `max_stack`. Returns what was
    /// actually added.
    pub fn add(&mut self, amount: u32) -> u32 {
        let accepted = amount.min(self.free_space());
        self.quantity += accepted;
        accepted
    }

    /// Removes up to `amount`. Returns what was actually removed.
    pub fn remove(&mut self, amount: u32) -> u32 {
        let removed = amount.min(self.quantity);
        self.quantity -= removed;
        removed
    }

    /// Splits off up to `amount` into a new stack, leaving the remainder.
    pub fn split(&mut self, amount: u32) -> ItemStack {
        let taken = self.remove(amount);
        ItemStack {
            item: Arc::clone(&self.item),
            quantity: taken,
        }
    }

    /// True when both stacks reference the same definition and this one has
    /// room left.
    pub fn can_merge(&self, other: &ItemStack) -> bool {
        self.item.id == other.item.id && self.free_space() > 0
    }
}

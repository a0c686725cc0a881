//! Fixed-size slot containers.

use std::sync::Arc;

use super::definition::ItemDefinition;
use super::stack::ItemStack;

/// A fixed array of item slots.
///
/// Slots never hold zero-quantity stacks: any operation that drains a stack
/// clears its slot back to `None`.
#[derive(Clone, Debug, PartialEq)]
pub struct SlotContainer<const N: usize> {
    slots: [Option<ItemStack>; N],
}

impl<const N: usize> Default for SlotContainer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> SlotContainer<N> {
    pub fn new() -> Self {
        Self {
            slots: std::array::from_fn(|_| None),
        }
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    pub fn stack_at(&self, slot: usize) -> Option<&ItemStack> {
        self.slots.get(slot).and_then(|s| s.as_ref())
    }

    pub fn is_slot_empty(&self, slot: usize) -> bool {
        match self.slots.get(slot) {
            Some(Some(stack)) => stack.is_empty(),
            _ => true,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &ItemStack)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|stack| (i, stack)))
    }

    /// Total quantity of the given item across all slots.
    pub fn total_of(&self, item: &ItemDefinition) -> u32 {
        self.iter()
            .filter(|(_, s)| s.id() == &item.id)
            .map(|(_, s)| s.quantity())
            .sum()
    }

    /// Adds `quantity` of `item`, merging into existing stacks first and
    /// then filling empty slots. Returns how much was accepted.
    pub fn add_item(&mut self, item: &Arc<ItemDefinition>, quantity: u32) -> u32 {
        let mut remaining = quantity;

        for slot in self.slots.iter_mut().flatten() {
            if remaining == 0 {
                break;
            }
            if slot.id() == &item.id {
                remaining -= slot.add(remaining);
            }
        }

        for slot in self.slots.iter_mut() {
            if remaining == 0 {
                break;
            }
            if slot.is_none() {
                let mut stack = ItemStack::new(Arc::clone(item), 0);
                remaining -= stack.add(remaining);
                if !stack.is_empty() {
                    *slot = Some(stack);
                }
            }
        }

        quantity - remaining
    }

    /// Adds `quantity` of `item` to one specific slot (merge or fill).
    /// Returns how much was accepted; 0 if the slot holds a different item.
    pub fn add_item_to_slot(
        &mut self,
        item: &Arc<ItemDefinition>,
        quantity: u32,
        slot: usize,
    ) -> u32 {
        let Some(entry) = self.slots.get_mut(slot) else {
            return 0;
        };
        match entry {
            Some(stack) if stack.id() == &item.id => stack.add(quantity),
            Some(_) => 0,
            None => {
                let mut stack = ItemStack::new(Arc::clone(item), 0);
                let accepted = stack.add(quantity);
                if accepted > 0 {
                    *entry = Some(stack);
                }
                accepted
            }
        }
    }

    /// Removes up to `quantity` from a slot, returning the detached stack.
    /// `None` if the slot was empty. A fully drained slot is cleared.
    pub fn extract(&mut self, slot: usize, quantity: u32) -> Option<ItemStack> {
        let entry = self.slots.get_mut(slot)?;
        let stack = entry.as_mut()?;
        if stack.is_empty() {
            *entry = None;
            return None;
        }
        let detached = stack.split(quantity);
        if stack.is_empty() {
            *entry = None;
        }
        if detached.is_empty() {
            None
        } else {
            Some(detached)
        }
    }

    /// Index of the first empty slot, if any.
    pub fn first_empty_slot(&self) -> Option<usize> {
        (0..N).find(|&i| self.is_slot_empty(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coin() -> Arc<ItemDefinition> {
        Arc::new(ItemDefinition::new("coin", "Coin", 20))
    }

    fn sword() -> Arc<ItemDefinition> {
        Arc::new(ItemDefinition::new("sword", "Sword", 1))
    }

    #[test]
    fn add_merges_before_filling_empty_slots() {
        let mut c: SlotContainer<3> = SlotContainer::new();
        assert_eq!(c.add_item(&coin(), 15), 15);
        assert_eq!(c.add_item(&coin(), 10), 10);
        // 20 in slot 0, 5 in slot 1
        assert_eq!(c.stack_at(0).unwrap().quantity(), 20);
        assert_eq!(c.stack_at(1).unwrap().quantity(), 5);
    }

    #[test]
    fn add_reports_partial_acceptance_when_full() {
        let mut c: SlotContainer<2> = SlotContainer::new();
        c.add_item(&sword(), 1);
        c.add_item(&sword(), 1);
        // both slots hold non-stackable swords; a third is rejected
        assert_eq!(c.add_item(&sword(), 1), 0);
        assert_eq!(c.add_item(&coin(), 5), 0);
    }

    #[test]
    fn extract_clears_drained_slot() {
        let mut c: SlotContainer<2> = SlotContainer::new();
        c.add_item(&coin(), 8);
        let taken = c.extract(0, 8).unwrap();
        assert_eq!(taken.quantity(), 8);
        assert!(c.is_slot_empty(0));
        assert!(c.extract(0, 1).is_none());
    }

    #[test]
    fn extract_partial_leaves_remainder() {
        let mut c: SlotContainer<2> = SlotContainer::new();
        c.add_item(&coin(), 8);
        let taken = c.extract(0, 3).unwrap();
        assert_eq!(taken.quantity(), 3);
        assert_eq!(c.stack_at(0).unwrap().quantity(), 5);
    }

    #[test]
    fn add_to_slot_refuses_mismatched_item() {
        let mut c: SlotContainer<2> = SlotContainer::new();
        c.add_item_to_slot(&coin(), 5, 0);
        assert_eq!(c.add_item_to_slot(&sword(), 1, 0), 0);
    }
}

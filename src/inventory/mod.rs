//! Capacity-bounded stack inventory carried by the player avatar.
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_SLOTS: usize = 10;
pub const DEFAULT_MAX_STACK: u32 = 16;

/// Kinds of items the world can yield.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Wood,
    Stone,
    Berries,
    Mushroom,
}

impl ItemKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Wood => "wood",
            Self::Stone => "stone",
            Self::Berries => "berries",
            Self::Mushroom => "mushroom",
        }
    }
}

/// Result of an add attempt. `added` may fall short of `requested` when the
/// remaining stack and slot capacity cannot hold the full amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemAddOutcome {
    pub requested: u32,
    pub added: u32,
}

impl ItemAddOutcome {
    pub fn accepted_all(&self) -> bool {
        self.added == self.requested
    }

    pub fn accepted_none(&self) -> bool {
        self.added == 0
    }
}

/// Stacked item storage with a fixed slot count and per-stack cap.
#[derive(Component, Debug, Clone)]
pub struct Inventory {
    slots: Vec<ItemStack>,
    max_slots: usize,
    max_stack: u32,
}

#[derive(Debug, Clone)]
struct ItemStack {
    kind: ItemKind,
    count: u32,
}

impl Default for Inventory {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_MAX_SLOTS, DEFAULT_MAX_STACK)
    }
}

impl Inventory {
    pub fn with_capacity(max_slots: usize, max_stack: u32) -> Self {
        Self {
            slots: Vec::new(),
            max_slots: max_slots.max(1),
            max_stack: max_stack.max(1),
        }
    }

    /// Adds up to `count` units, filling existing stacks before opening new
    /// slots. Returns how much was actually stored.
    pub fn add(&mut self, kind: ItemKind, count: u32) -> ItemAddOutcome {
        let mut remaining = count;

        for stack in self.slots.iter_mut().filter(|stack| stack.kind == kind) {
            let space = self.max_stack.saturating_sub(stack.count);
            let moved = space.min(remaining);
            stack.count += moved;
            remaining -= moved;
            if remaining == 0 {
                break;
            }
        }

        while remaining > 0 && self.slots.len() < self.max_slots {
            let moved = self.max_stack.min(remaining);
            self.slots.push(ItemStack { kind, count: moved });
            remaining -= moved;
        }

        ItemAddOutcome {
            requested: count,
            added: count - remaining,
        }
    }

    /// Removes `count` units if the inventory holds at least that many.
    /// Reserved for penalty and trade flows.
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn remove(&mut self, kind: ItemKind, count: u32) -> bool {
        if self.count_of(kind) < count {
            return false;
        }

        let mut remaining = count;
        for stack in self.slots.iter_mut().filter(|stack| stack.kind == kind) {
            let moved = stack.count.min(remaining);
            stack.count -= moved;
            remaining -= moved;
            if remaining == 0 {
                break;
            }
        }
        self.slots.retain(|stack| stack.count > 0);
        true
    }

    pub fn count_of(&self, kind: ItemKind) -> u32 {
        self.slots
            .iter()
            .filter(|stack| stack.kind == kind)
            .map(|stack| stack.count)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_existing_stacks_before_new_slots() {
        let mut inventory = Inventory::with_capacity(2, 10);

        let first = inventory.add(ItemKind::Wood, 7);
        assert!(first.accepted_all());

        let second = inventory.add(ItemKind::Wood, 7);
        assert!(second.accepted_all());
        assert_eq!(inventory.count_of(ItemKind::Wood), 14);
    }

    #[test]
    fn partial_add_reports_shortfall() {
        let mut inventory = Inventory::with_capacity(1, 10);
        inventory.add(ItemKind::Stone, 8);

        let outcome = inventory.add(ItemKind::Stone, 5);
        assert_eq!(outcome.added, 2);
        assert!(!outcome.accepted_all());
        assert!(!outcome.accepted_none());
        assert_eq!(inventory.count_of(ItemKind::Stone), 10);
    }

    #[test]
    fn full_inventory_rejects_additions() {
        let mut inventory = Inventory::with_capacity(1, 4);
        inventory.add(ItemKind::Berries, 4);

        let outcome = inventory.add(ItemKind::Wood, 1);
        assert!(outcome.accepted_none());
        assert_eq!(inventory.count_of(ItemKind::Wood), 0);
    }

    #[test]
    fn remove_spans_stacks_and_drops_empties() {
        let mut inventory = Inventory::with_capacity(3, 4);
        inventory.add(ItemKind::Mushroom, 10);

        assert!(inventory.remove(ItemKind::Mushroom, 6));
        assert_eq!(inventory.count_of(ItemKind::Mushroom), 4);
        assert!(!inventory.remove(ItemKind::Mushroom, 5));
        assert!(inventory.remove(ItemKind::Mushroom, 4));
        assert_eq!(inventory.count_of(ItemKind::Mushroom), 0);
    }
}

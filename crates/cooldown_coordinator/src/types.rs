//! Core type definitions: ids, ticks, items, and item stores.

use serde::{Deserialize, Serialize};

pub type EntityId = String;
pub type ItemKind = String;
pub type Tick = u64;
pub type WorldEventId = u64;

/// Ticks a hopper waits between transfers once it has moved or received items.
pub const HOPPER_COOLDOWN_TICKS: u64 = 8;
pub const DEFAULT_TRANSFER_UNITS_PER_MOVE: i64 = 1;
pub const JOURNAL_VERSION: u32 = 1;

// ============================================================================
// Execution context
// ============================================================================

/// Whether a world is the authoritative simulation or a passive replica.
///
/// Replicas mirror authoritative state for display or prediction; entity
/// state must never be mutated through coordinated notification there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Authority {
    Authoritative,
    Replica,
}

impl Authority {
    pub fn is_authoritative(self) -> bool {
        matches!(self, Authority::Authoritative)
    }
}

// ============================================================================
// Items and stores
// ============================================================================

/// One storage slot: an item kind and how many units of it are present.
///
/// A slot is blank when it holds no kind or a non-positive count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ItemStack {
    pub item: ItemKind,
    pub count: i64,
}

impl ItemStack {
    pub fn new(item: impl Into<ItemKind>, count: i64) -> Self {
        Self {
            item: item.into(),
            count,
        }
    }

    pub fn blank() -> Self {
        Self::default()
    }

    pub fn is_blank(&self) -> bool {
        self.item.is_empty() || self.count <= 0
    }

    pub fn clear(&mut self) {
        self.item.clear();
        self.count = 0;
    }
}

/// A slotted item container. Slots are the container's views; the container
/// is empty when every view is blank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ItemStore {
    pub slots: Vec<ItemStack>,
}

impl ItemStore {
    pub fn with_slots(slot_count: usize) -> Self {
        Self {
            slots: vec![ItemStack::blank(); slot_count],
        }
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// True when no slot holds a non-blank stack.
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(ItemStack::is_blank)
    }

    /// Total units of the given kind across all slots.
    pub fn count_of(&self, item: &str) -> i64 {
        self.slots
            .iter()
            .filter(|stack| !stack.is_blank() && stack.item == item)
            .map(|stack| stack.count)
            .sum()
    }

    /// Index of the first non-blank slot, scanning in view order.
    pub fn first_occupied_slot(&self) -> Option<usize> {
        self.slots.iter().position(|stack| !stack.is_blank())
    }

    /// Inserts `amount` units of `item`, topping up a matching stack first
    /// and falling back to the first blank slot. Returns how many units the
    /// store accepted (zero when no slot can take the item).
    pub fn insert(&mut self, item: &str, amount: i64) -> Result<i64, StoreError> {
        if amount < 0 {
            return Err(StoreError::NegativeAmount { amount });
        }
        if amount == 0 || item.is_empty() {
            return Ok(0);
        }
        for stack in &mut self.slots {
            if !stack.is_blank() && stack.item == item {
                stack.count = stack.count.saturating_add(amount);
                return Ok(amount);
            }
        }
        for stack in &mut self.slots {
            if stack.is_blank() {
                stack.item = item.to_string();
                stack.count = amount;
                return Ok(amount);
            }
        }
        Ok(0)
    }

    /// Extracts up to `amount` units of `item`, draining matching stacks in
    /// view order. Returns how many units came out.
    pub fn extract(&mut self, item: &str, amount: i64) -> Result<i64, StoreError> {
        if amount < 0 {
            return Err(StoreError::NegativeAmount { amount });
        }
        let mut remaining = amount;
        for stack in &mut self.slots {
            if remaining == 0 {
                break;
            }
            if stack.is_blank() || stack.item != item {
                continue;
            }
            let taken = remaining.min(stack.count);
            stack.count -= taken;
            remaining -= taken;
            if stack.count == 0 {
                stack.clear();
            }
        }
        Ok(amount - remaining)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    NegativeAmount { amount: i64 },
}

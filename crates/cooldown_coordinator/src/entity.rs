//! Transport entities: the polymorphic entity abstraction and the built-in
//! hopper.

use serde::{Deserialize, Serialize};

use crate::coordinator::CoordinatedCooldown;
use crate::types::{EntityId, ItemStore, Tick, HOPPER_COOLDOWN_TICKS};

// ============================================================================
// Transport entity abstraction
// ============================================================================

/// A simulation object that moves items between stores on simulation ticks.
///
/// The world owns every transport entity; an entity that is not registered
/// in a world is unattached and cannot receive coordinated notification.
pub trait TransportEntity: std::fmt::Debug {
    /// The entity's item store, if it exposes one.
    fn store(&self) -> Option<&ItemStore>;

    /// Mutable access to the entity's item store, if it exposes one.
    fn store_mut(&mut self) -> Option<&mut ItemStore>;

    /// Per-tick bookkeeping, called once per world step with the current
    /// tick. Participating entities record the tick here so a notification
    /// arriving later in the same tick can be told apart from one arriving
    /// before their update ran.
    fn tick(&mut self, _now: Tick) {
        // Default: no bookkeeping.
    }

    /// The entity's coordinated-cooldown capability, if it participates.
    fn coordinated(&mut self) -> Option<&mut dyn CoordinatedCooldown> {
        None
    }

    /// The built-in hopper facet. The dispatcher falls back to this for
    /// entities of the built-in kind, which carry no capability.
    fn as_hopper(&mut self) -> Option<&mut Hopper> {
        None
    }

    /// Whether the entity's persistent state changed since the last sync.
    fn is_dirty(&self) -> bool {
        false
    }

    /// Flags the entity's persistent state as changed.
    fn mark_dirty(&mut self) {
        // Default: no persistent state.
    }

    /// Clears the dirty flag after the save/sync layer has run.
    fn clear_dirty(&mut self) {
        // Default: nothing to clear.
    }
}

// ============================================================================
// Built-in hopper
// ============================================================================

/// The built-in item-transport entity. Once its transfer cooldown has
/// elapsed, a linked hopper pushes items into its output entity and puts
/// itself back on cooldown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Hopper {
    pub store: ItemStore,
    /// Entity the hopper pushes into, when linked.
    pub output: Option<EntityId>,
    /// Suppresses transfers and transfer cooldowns entirely while set.
    pub disabled: bool,
    pub transfer_cooldown: u64,
    /// Tick at which this hopper last ran its per-tick processing.
    pub last_tick: Tick,
    pub dirty: bool,
}

impl Hopper {
    pub fn new(slot_count: usize) -> Self {
        Self {
            store: ItemStore::with_slots(slot_count),
            ..Default::default()
        }
    }

    pub fn with_output(mut self, output: impl Into<EntityId>) -> Self {
        self.output = Some(output.into());
        self
    }

    pub fn on_cooldown(&self) -> bool {
        self.transfer_cooldown > 0
    }

    /// Applies the cooldown a hopper gives itself when another hopper fills
    /// its previously-empty store.
    ///
    /// A hopper that has already run its per-tick processing for `now` gets
    /// one tick less, so two linked hoppers stay in lockstep regardless of
    /// which of them the world processes first.
    pub(crate) fn notify_transfer_cooldown(&mut self, now: Tick) {
        if self.disabled {
            return;
        }
        if self.last_tick >= now {
            self.transfer_cooldown = HOPPER_COOLDOWN_TICKS - 1;
        } else {
            self.transfer_cooldown = HOPPER_COOLDOWN_TICKS;
        }
        self.dirty = true;
    }
}

impl TransportEntity for Hopper {
    fn store(&self) -> Option<&ItemStore> {
        Some(&self.store)
    }

    fn store_mut(&mut self) -> Option<&mut ItemStore> {
        Some(&mut self.store)
    }

    fn tick(&mut self, now: Tick) {
        self.last_tick = now;
        if self.transfer_cooldown > 0 {
            self.transfer_cooldown -= 1;
        }
    }

    // The hopper predates the capability and does not implement it; the
    // dispatcher reaches it through this fallback facet instead.
    fn as_hopper(&mut self) -> Option<&mut Hopper> {
        Some(self)
    }

    fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    fn clear_dirty(&mut self) {
        self.dirty = false;
    }
}

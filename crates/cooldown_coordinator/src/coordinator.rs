//! Coordinated cooldown dispatch: the capability contract, the notification
//! entry points, and the storage-emptiness check.

use log::debug;

use crate::types::{ItemStore, Tick};
use crate::world::World;

// ============================================================================
// Capability contract
// ============================================================================

/// Capability a transport entity implements to take part in coordinated
/// transfer cooldowns.
///
/// Implementors track the tick of their most recent per-tick update; a
/// notification arriving at that same tick applies a cooldown of one tick
/// less than usual, mirroring what the built-in hopper does to itself.
pub trait CoordinatedCooldown {
    /// Called when items arrived in this entity's previously-empty store.
    ///
    /// `now` is the world's current tick. Implementors check their own
    /// disabled state, apply the cooldown when enabled, and mark themselves
    /// dirty only when a cooldown was applied. The call itself constitutes
    /// successful notification: it cannot be rejected, and implementors must
    /// absorb internal error conditions rather than panic.
    fn notify_cooldown(&mut self, now: Tick);

    /// Whether the tick-skipping optimization layer should deliver
    /// coordinated cooldowns to this entity.
    fn can_receive_transfer_cooldown(&self) -> bool {
        true
    }

    /// Setter-shaped entry used by the tick-skipping optimization layer.
    ///
    /// The default funnels into [`CoordinatedCooldown::notify_cooldown`] so
    /// the cooldown policy has a single home; override only to opt out of
    /// that delegation.
    fn set_transfer_cooldown(&mut self, now: Tick) {
        self.notify_cooldown(now);
    }
}

// ============================================================================
// Dispatch
// ============================================================================

/// Notifies `target` that items arrived in its previously-empty store.
///
/// Transferring entities call this after a successful move, and only when
/// the destination store was empty beforehand; capture that with
/// [`is_store_empty`] before moving anything. The coordinator does not
/// re-check emptiness. A complete sender also sets its own cooldown once it
/// has moved items; that local half is the sender's concern.
///
/// Returns whether a notification was delivered, not whether the recipient
/// applied a cooldown. Absent targets, unattached targets, targets that do
/// not participate, and replica worlds are silent no-ops.
pub fn notify(world: &mut World, target: Option<&str>) -> bool {
    let Some(target) = target else {
        return false;
    };
    if !world.authority().is_authoritative() {
        return false;
    }
    let now = world.time();
    let Some(entity) = world.entity_mut(target) else {
        return false;
    };

    // Capability dispatch first, so a hopper that ever adopts the capability
    // is handled generically instead of through the fallback.
    if let Some(coordinated) = entity.coordinated() {
        debug!("notifying coordinated entity {target}");
        coordinated.notify_cooldown(now);
        return true;
    }
    if let Some(hopper) = entity.as_hopper() {
        debug!("notifying built-in hopper {target}");
        hopper.notify_transfer_cooldown(now);
        return true;
    }
    debug!("cannot notify {target}: entity does not participate");
    false
}

/// Entry point for the tick-skipping optimization layer.
///
/// Resolves the target's capability, asks whether it wants coordinated
/// delivery from that layer, and hands the current tick to its
/// `set_transfer_cooldown`. Built-in hoppers carry no capability and are
/// never reached here; that layer wakes hoppers through its own path.
pub fn notify_scheduled(world: &mut World, target: Option<&str>) -> bool {
    let Some(target) = target else {
        return false;
    };
    if !world.authority().is_authoritative() {
        return false;
    }
    let now = world.time();
    let Some(entity) = world.entity_mut(target) else {
        return false;
    };
    let Some(coordinated) = entity.coordinated() else {
        return false;
    };
    if !coordinated.can_receive_transfer_cooldown() {
        return false;
    }
    debug!("scheduled cooldown delivery to {target}");
    coordinated.set_transfer_cooldown(now);
    true
}

// ============================================================================
// Emptiness check
// ============================================================================

/// True when `store` is absent or holds only blank stacks.
///
/// Pure read, safe to call speculatively. Callers snapshot this before the
/// transfer they intend to report; the result is only meaningful as a
/// "before" state.
pub fn is_store_empty(store: Option<&ItemStore>) -> bool {
    match store {
        None => true,
        Some(store) => store.is_empty(),
    }
}

//! Coordinated transfer cooldowns for tick-driven item-transport entities.
//!
//! The built-in hopper only coordinates cooldowns with other hoppers: after
//! filling a previously-empty hopper it sets the recipient's cooldown, and
//! every other transport kind is invisible to that handshake. This crate
//! provides the neutral coordination point — any entity that fills another
//! entity's previously-empty store calls [`notify`], and any entity can opt
//! in to receiving those notifications by implementing
//! [`CoordinatedCooldown`]. The built-in hopper is reached through a
//! compatibility fallback and gets exactly the timing it would have given
//! itself.
//!
//! This module is organized into submodules:
//! - `types`: Core type definitions (ids, ticks, items, stores)
//! - `entity`: The transport-entity abstraction and the built-in hopper
//! - `coordinator`: The capability contract and notification dispatch
//! - `world`: The host world (time, registry, transfer pathways, journal)
//! - `persist`: Event log persistence

mod coordinator;
mod entity;
mod persist;
mod types;
mod world;


pub use coordinator::{is_store_empty, notify, notify_scheduled, CoordinatedCooldown};
pub use entity::{Hopper, TransportEntity};
pub use persist::{EventLog, PersistError};
pub use types::{
    Authority, EntityId, ItemKind, ItemStack, ItemStore, StoreError, Tick, WorldEventId,
    DEFAULT_TRANSFER_UNITS_PER_MOVE, HOPPER_COOLDOWN_TICKS, JOURNAL_VERSION,
};
pub use world::{World, WorldConfig, WorldError, WorldEvent, WorldEventKind};

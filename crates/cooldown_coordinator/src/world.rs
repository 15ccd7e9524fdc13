//! The host world: time, authority, the entity registry, the transfer
//! pathways, and the event journal.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::coordinator::{self, is_store_empty};
use crate::entity::TransportEntity;
use crate::types::{
    Authority, EntityId, ItemKind, ItemStore, StoreError, Tick, WorldEventId,
    DEFAULT_TRANSFER_UNITS_PER_MOVE, HOPPER_COOLDOWN_TICKS,
};

// ============================================================================
// Config
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldConfig {
    /// Units a single transfer operation moves at most.
    pub transfer_units_per_move: i64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            transfer_units_per_move: DEFAULT_TRANSFER_UNITS_PER_MOVE,
        }
    }
}

impl WorldConfig {
    pub fn sanitized(mut self) -> Self {
        if self.transfer_units_per_move < 1 {
            self.transfer_units_per_move = 1;
        }
        self
    }
}

// ============================================================================
// Events
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldEvent {
    pub id: WorldEventId,
    pub time: Tick,
    pub kind: WorldEventKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum WorldEventKind {
    EntityRegistered {
        entity_id: EntityId,
    },
    EntityRemoved {
        entity_id: EntityId,
    },
    ItemsMoved {
        from: EntityId,
        to: EntityId,
        item: ItemKind,
        amount: i64,
        dest_was_empty: bool,
    },
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum WorldError {
    EntityAlreadyExists { entity_id: EntityId },
    EntityNotFound { entity_id: EntityId },
    StoreUnavailable { entity_id: EntityId },
    InvalidAmount { amount: i64 },
}

impl From<StoreError> for WorldError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NegativeAmount { amount } => WorldError::InvalidAmount { amount },
        }
    }
}

// ============================================================================
// World
// ============================================================================

/// A tick-driven world owning the transport entities registered in it.
///
/// All transfer attempts, emptiness checks, and notifications for a tick run
/// sequentially on the caller's thread; the world introduces no locking or
/// scheduling of its own.
pub struct World {
    time: Tick,
    authority: Authority,
    config: WorldConfig,
    next_event_id: WorldEventId,
    journal: Vec<WorldEvent>,
    entities: BTreeMap<EntityId, Box<dyn TransportEntity>>,
}

impl World {
    pub fn new() -> Self {
        Self::with_config(WorldConfig::default())
    }

    pub fn with_config(config: WorldConfig) -> Self {
        Self {
            time: 0,
            authority: Authority::Authoritative,
            config: config.sanitized(),
            next_event_id: 0,
            journal: Vec::new(),
            entities: BTreeMap::new(),
        }
    }

    /// A display/prediction mirror of an authoritative world. Coordinated
    /// notification refuses to mutate entity state in a replica.
    pub fn replica() -> Self {
        let mut world = Self::new();
        world.authority = Authority::Replica;
        world
    }

    pub fn time(&self) -> Tick {
        self.time
    }

    pub fn authority(&self) -> Authority {
        self.authority
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn journal(&self) -> &[WorldEvent] {
        &self.journal
    }

    // ------------------------------------------------------------------
    // Entity registry
    // ------------------------------------------------------------------

    pub fn register(
        &mut self,
        entity_id: impl Into<EntityId>,
        entity: Box<dyn TransportEntity>,
    ) -> Result<(), WorldError> {
        let entity_id = entity_id.into();
        if self.entities.contains_key(&entity_id) {
            return Err(WorldError::EntityAlreadyExists { entity_id });
        }
        self.entities.insert(entity_id.clone(), entity);
        self.record(WorldEventKind::EntityRegistered { entity_id });
        Ok(())
    }

    pub fn remove(&mut self, entity_id: &str) -> Result<Box<dyn TransportEntity>, WorldError> {
        match self.entities.remove(entity_id) {
            Some(entity) => {
                self.record(WorldEventKind::EntityRemoved {
                    entity_id: entity_id.to_string(),
                });
                Ok(entity)
            }
            None => Err(WorldError::EntityNotFound {
                entity_id: entity_id.to_string(),
            }),
        }
    }

    pub fn entity(&self, entity_id: &str) -> Option<&dyn TransportEntity> {
        self.entities.get(entity_id).map(|entity| entity.as_ref())
    }

    pub fn entity_mut(&mut self, entity_id: &str) -> Option<&mut (dyn TransportEntity + 'static)> {
        self.entities
            .get_mut(entity_id)
            .map(|entity| entity.as_mut())
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Entities whose persistent state changed since the last sync pass.
    pub fn dirty_entities(&self) -> Vec<EntityId> {
        self.entities
            .iter()
            .filter(|(_, entity)| entity.is_dirty())
            .map(|(entity_id, _)| entity_id.clone())
            .collect()
    }

    pub fn clear_dirty(&mut self, entity_id: &str) {
        if let Some(entity) = self.entities.get_mut(entity_id) {
            entity.clear_dirty();
        }
    }

    // ------------------------------------------------------------------
    // Tick processing
    // ------------------------------------------------------------------

    /// Advances the world by one tick: per-entity bookkeeping, then built-in
    /// hopper transfer processing, in registry order.
    pub fn step(&mut self) {
        self.time = self.time.saturating_add(1);
        if !self.authority.is_authoritative() {
            // Replicas mirror state; they never run transfer processing.
            return;
        }
        let now = self.time;
        let ids: Vec<EntityId> = self.entities.keys().cloned().collect();
        for id in &ids {
            if let Some(entity) = self.entities.get_mut(id) {
                entity.tick(now);
            }
            self.process_hopper(id);
        }
    }

    // Push pathway of the built-in hopper: once its cooldown has elapsed, a
    // linked hopper moves items into its output entity and puts itself back
    // on cooldown.
    fn process_hopper(&mut self, entity_id: &str) {
        let max_units = self.config.transfer_units_per_move;
        let Some(entity) = self.entities.get_mut(entity_id) else {
            return;
        };
        let Some(hopper) = entity.as_hopper() else {
            return;
        };
        if hopper.disabled || hopper.on_cooldown() || hopper.store.is_empty() {
            return;
        }
        let Some(output) = hopper.output.clone() else {
            return;
        };
        if output == entity_id {
            return;
        }

        if let Ok(moved) = self.transfer_items(entity_id, &output, max_units) {
            if moved > 0 {
                if let Some(hopper) = self
                    .entities
                    .get_mut(entity_id)
                    .and_then(|entity| entity.as_hopper())
                {
                    hopper.transfer_cooldown = HOPPER_COOLDOWN_TICKS;
                    hopper.dirty = true;
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Transfer pathway
    // ------------------------------------------------------------------

    /// Moves up to `max_units` units of the first occupied slot's item from
    /// `from` to `to`.
    ///
    /// This is the generic storage-to-storage pathway and carries the
    /// coordination protocol with it: destination emptiness is snapshotted
    /// before the move, and when that snapshot was empty and at least one
    /// unit moved, the destination is notified before its dirty-mark step.
    pub fn transfer_items(
        &mut self,
        from: &str,
        to: &str,
        max_units: i64,
    ) -> Result<i64, WorldError> {
        if max_units <= 0 {
            return Err(WorldError::InvalidAmount { amount: max_units });
        }
        if from == to {
            return Ok(0);
        }

        let (item, available) = {
            let source = self.require_store(from)?;
            match source.first_occupied_slot() {
                None => return Ok(0),
                Some(slot) => {
                    let stack = &source.slots[slot];
                    (stack.item.clone(), stack.count)
                }
            }
        };
        let dest_was_empty = is_store_empty(Some(self.require_store(to)?));

        // Insert into the destination first so nothing is lost when it has
        // no room, then drain the same amount from the source.
        let units = max_units.min(available);
        let moved = self.require_store_mut(to)?.insert(&item, units)?;
        if moved == 0 {
            return Ok(0);
        }
        self.require_store_mut(from)?.extract(&item, moved)?;

        if dest_was_empty {
            coordinator::notify(self, Some(to));
        }
        if let Some(dest) = self.entities.get_mut(to) {
            dest.mark_dirty();
        }
        self.record(WorldEventKind::ItemsMoved {
            from: from.to_string(),
            to: to.to_string(),
            item,
            amount: moved,
            dest_was_empty,
        });

        Ok(moved)
    }

    fn require_store(&self, entity_id: &str) -> Result<&ItemStore, WorldError> {
        let entity = self
            .entities
            .get(entity_id)
            .ok_or_else(|| WorldError::EntityNotFound {
                entity_id: entity_id.to_string(),
            })?;
        entity.store().ok_or_else(|| WorldError::StoreUnavailable {
            entity_id: entity_id.to_string(),
        })
    }

    fn require_store_mut(&mut self, entity_id: &str) -> Result<&mut ItemStore, WorldError> {
        let entity = self
            .entities
            .get_mut(entity_id)
            .ok_or_else(|| WorldError::EntityNotFound {
                entity_id: entity_id.to_string(),
            })?;
        entity
            .store_mut()
            .ok_or_else(|| WorldError::StoreUnavailable {
                entity_id: entity_id.to_string(),
            })
    }

    fn record(&mut self, kind: WorldEventKind) {
        let event = WorldEvent {
            id: self.next_event_id,
            time: self.time,
            kind,
        };
        self.next_event_id = self.next_event_id.saturating_add(1);
        self.journal.push(event);
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

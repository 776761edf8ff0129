//! Arena: owner of everything that lives in the active room.
//!
//! The arena stores:
//! - Entities with deterministic iteration order (`BTreeMap`)
//! - Live attack hitboxes and uncollected pickups
//! - The active room (shared, immutable)
//! - This tick's input snapshot
//! - A journal of [`Event`]s recorded by resolvers
//!
//! # Lifecycle
//!
//! Entities are never removed mid-tick. Combat marks them dead; once every
//! resolver has run, [`Arena::compact`] removes dead non-boss entities in one
//! pass. Dead bosses stay as defeated markers.
//!
//! # Example
//!
//! ```
//! use oasis_core::arena::Arena;
//! use oasis_core::entity::{EntityInner, EnemyComponents, PlayerComponents};
//!
//! let mut arena = Arena::new();
//! let player = arena.spawn(EntityInner::Player(PlayerComponents::default()));
//! let enemy = arena.spawn(EntityInner::Enemy(EnemyComponents::default()));
//!
//! let ids: Vec<_> = arena.entity_ids_sorted().collect();
//! assert_eq!(ids, vec![player, enemy]);
//! assert_eq!(arena.player_id(), Some(player));
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use crate::entity::{Entity, EntityId, EntityInner};
use crate::hitbox::AttackHitbox;
use crate::input::InputSnapshot;
use crate::output::Event;
use crate::room::{Pickup, Room};

/// Entity and transient storage for the active room.
///
/// The simulation double-buffers arenas; cloning is cheap apart from the
/// entity map because the room is behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct Arena {
    /// Monotonically increasing entity ID counter.
    next_id: u64,
    /// Entity storage with deterministic iteration order.
    entities: BTreeMap<EntityId, Entity>,
    /// Attack hitboxes still in their active window.
    hitboxes: Vec<AttackHitbox>,
    /// Uncollected pickups.
    pickups: Vec<Pickup>,
    /// Current simulation tick.
    tick: u64,
    /// Input held this tick.
    input: InputSnapshot,
    /// Events recorded since the last drain.
    journal: Vec<Event>,
    /// Active room, if one is loaded.
    room: Option<Arc<Room>>,
}

impl Arena {
    /// Creates a new empty arena at tick 0 with no room.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawns a new entity and returns its id.
    ///
    /// Ids are never reused, including across room changes.
    pub fn spawn(&mut self, inner: EntityInner) -> EntityId {
        let id = EntityId::new(self.next_id);
        self.next_id += 1;
        self.entities.insert(id, Entity::new(id, inner));
        id
    }

    /// Removes an entity, returning it if it existed.
    pub fn despawn(&mut self, id: EntityId) -> Option<Entity> {
        self.entities.remove(&id)
    }

    /// Returns a reference to an entity by ID.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    /// Returns a mutable reference to an entity by ID.
    #[must_use]
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    /// Entity IDs in deterministic (sorted) order.
    pub fn entity_ids_sorted(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entities.keys().copied()
    }

    /// Entities in deterministic (sorted by ID) order.
    pub fn entities_sorted(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.entities.values()
    }

    /// Mutable entities in deterministic order.
    pub fn entities_sorted_mut(&mut self) -> impl Iterator<Item = &mut Entity> + '_ {
        self.entities.values_mut()
    }

    /// Entities that have not died, in id order.
    pub fn live(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.entities.values().filter(|e| e.is_live())
    }

    /// The player's id, if a player has been spawned.
    #[must_use]
    pub fn player_id(&self) -> Option<EntityId> {
        self.entities.values().find(|e| e.is_player()).map(Entity::id)
    }

    /// The player entity.
    #[must_use]
    pub fn player(&self) -> Option<&Entity> {
        self.entities.values().find(|e| e.is_player())
    }

    /// Mutable player entity.
    #[must_use]
    pub fn player_mut(&mut self) -> Option<&mut Entity> {
        self.entities.values_mut().find(|e| e.is_player())
    }

    /// Returns the number of entities in the arena, dead or alive.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Returns true if the arena has no entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Remove dead entities except bosses and the player.
    ///
    /// Returns the removed ids in id order.
    pub fn compact(&mut self) -> Vec<EntityId> {
        let removed: Vec<EntityId> = self
            .entities
            .values()
            .filter(|e| !e.is_live() && !e.is_boss() && !e.is_player())
            .map(Entity::id)
            .collect();
        for id in &removed {
            self.entities.remove(id);
        }
        if !removed.is_empty() {
            debug!(count = removed.len(), "compacted dead entities");
        }
        removed
    }

    /// Drop everything tied to the active room: enemies, bosses, hitboxes and
    /// pickups. The player stays.
    pub fn clear_room_transients(&mut self) {
        self.entities.retain(|_, e| e.is_player());
        self.hitboxes.clear();
        self.pickups.clear();
    }

    // -------------------------------------------------------------------------
    // Hitboxes / pickups
    // -------------------------------------------------------------------------

    /// Add a hitbox.
    pub fn push_hitbox(&mut self, hitbox: AttackHitbox) {
        self.hitboxes.push(hitbox);
    }

    /// Live hitboxes.
    #[must_use]
    pub fn hitboxes(&self) -> &[AttackHitbox] {
        &self.hitboxes
    }

    /// Mutable hitbox list.
    #[must_use]
    pub fn hitboxes_mut(&mut self) -> &mut Vec<AttackHitbox> {
        &mut self.hitboxes
    }

    /// Uncollected pickups.
    #[must_use]
    pub fn pickups(&self) -> &[Pickup] {
        &self.pickups
    }

    /// Mutable pickup list.
    #[must_use]
    pub fn pickups_mut(&mut self) -> &mut Vec<Pickup> {
        &mut self.pickups
    }

    // -------------------------------------------------------------------------
    // Room / input / journal
    // -------------------------------------------------------------------------

    /// Active room.
    #[must_use]
    pub fn room(&self) -> Option<&Arc<Room>> {
        self.room.as_ref()
    }

    /// Replace the active room.
    pub fn set_room(&mut self, room: Arc<Room>) {
        self.room = Some(room);
    }

    /// Input held this tick.
    #[must_use]
    pub const fn input(&self) -> InputSnapshot {
        self.input
    }

    /// Set this tick's input.
    pub fn set_input(&mut self, input: InputSnapshot) {
        self.input = input;
    }

    /// Append an event to the journal.
    pub fn record(&mut self, event: Event) {
        self.journal.push(event);
    }

    /// Events recorded so far this tick.
    #[must_use]
    pub fn journal(&self) -> &[Event] {
        &self.journal
    }

    /// Take and clear the journal.
    pub fn drain_journal(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.journal)
    }

    // -------------------------------------------------------------------------
    // Tick
    // -------------------------------------------------------------------------

    /// Returns the current simulation tick.
    #[must_use]
    pub const fn current_tick(&self) -> u64 {
        self.tick
    }

    /// Advances the simulation tick counter.
    pub fn advance_tick(&mut self) {
        self.tick += 1;
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{EnemyComponents, PlayerComponents, StatusFlags};

    fn kill(arena: &mut Arena, id: EntityId) {
        if let Some(entity) = arena.get_mut(id) {
            entity.combat_mut().status.insert(StatusFlags::DEAD);
        }
    }

    mod lifecycle_tests {
        use super::*;

        #[test]
        fn ids_are_monotonic_and_not_reused() {
            let mut arena = Arena::new();
            let a = arena.spawn(EntityInner::Enemy(EnemyComponents::default()));
            arena.despawn(a);
            let b = arena.spawn(EntityInner::Enemy(EnemyComponents::default()));
            assert!(b > a);
            assert!(arena.get(a).is_none());
        }

        #[test]
        fn compact_removes_dead_enemies_only() {
            let mut arena = Arena::new();
            let player = arena.spawn(EntityInner::Player(PlayerComponents::default()));
            let grunt = arena.spawn(EntityInner::Enemy(EnemyComponents::default()));
            let boss = arena.spawn(EntityInner::Boss(EnemyComponents::default()));
            let alive = arena.spawn(EntityInner::Enemy(EnemyComponents::default()));
            kill(&mut arena, player);
            kill(&mut arena, grunt);
            kill(&mut arena, boss);

            assert_eq!(arena.compact(), vec![grunt]);
            assert!(arena.get(player).is_some());
            assert!(arena.get(boss).is_some());
            assert!(arena.get(alive).is_some());
        }

        #[test]
        fn live_skips_dead() {
            let mut arena = Arena::new();
            let a = arena.spawn(EntityInner::Enemy(EnemyComponents::default()));
            let b = arena.spawn(EntityInner::Enemy(EnemyComponents::default()));
            kill(&mut arena, a);
            let live: Vec<_> = arena.live().map(Entity::id).collect();
            assert_eq!(live, vec![b]);
        }

        #[test]
        fn clear_room_transients_keeps_player() {
            let mut arena = Arena::new();
            let player = arena.spawn(EntityInner::Player(PlayerComponents::default()));
            arena.spawn(EntityInner::Boss(EnemyComponents::default()));
            arena.pickups_mut().push(Pickup {
                rect: loam::Rect::new(0.0, 0.0, 14.0, 14.0),
                value: 1,
            });
            arena.clear_room_transients();
            assert_eq!(arena.entity_ids_sorted().collect::<Vec<_>>(), vec![player]);
            assert!(arena.pickups().is_empty());
            assert!(arena.hitboxes().is_empty());
        }
    }

    mod journal_tests {
        use super::*;

        #[test]
        fn drain_empties_journal() {
            let mut arena = Arena::new();
            arena.record(Event::Victory);
            assert_eq!(arena.journal().len(), 1);
            assert_eq!(arena.drain_journal(), vec![Event::Victory]);
            assert!(arena.journal().is_empty());
        }
    }

    #[test]
    fn tick_advances() {
        let mut arena = Arena::new();
        arena.advance_tick();
        arena.advance_tick();
        assert_eq!(arena.current_tick(), 2);
    }
}

//! World: the set of rooms, the active room and progression state.
//!
//! Worlds are loaded once from a [`WorldDef`] (usually JSON) and validated up
//! front. Every error a world can have is reported at load time; nothing
//! about rooms or portals can fail once the simulation is running.
//!
//! # Example
//!
//! ```
//! use oasis_core::world::World;
//!
//! let world = World::from_json(r##########"{
//!     "start": "meadow",
//!     "rooms": [
//!         { "id": "meadow", "rows": ["#####", "#...#", "#...#", "#####"] }
//!     ]
//! }"##########).unwrap();
//!
//! assert_eq!(world.current_room().id.as_str(), "meadow");
//! assert!(world.current_grid().is_blocking(0, 0));
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use glam::Vec2;
use loam::{GridError, Rect, TileGrid};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::arena::Arena;
use crate::config::{SimConfig, DEFAULT_TILE_SIZE};
use crate::entity::{EntityInner, StatusFlags};
use crate::room::{Pickup, Portal, PortalTarget, PortalTrigger, Room, RoomId, SpawnDef, SpawnKind};

// =============================================================================
// Errors
// =============================================================================

/// Load-time world errors.
#[derive(Debug, Error)]
pub enum WorldError {
    /// A room's tile rows are malformed.
    #[error("room {room}: {source}")]
    Grid {
        /// Offending room
        room: RoomId,
        /// Underlying grid error
        #[source]
        source: GridError,
    },
    /// Two rooms share an id.
    #[error("duplicate room id {0}")]
    DuplicateRoom(RoomId),
    /// The start room does not exist.
    #[error("unknown start room {0}")]
    UnknownStartRoom(RoomId),
    /// A portal points at a room that does not exist.
    #[error("room {room}: portal leads to unknown room {target}")]
    InvalidTransitionTarget {
        /// Room holding the portal
        room: RoomId,
        /// Missing destination
        target: RoomId,
    },
    /// A portal trigger lies outside its room.
    #[error("room {room}: portal {index} trigger lies outside the grid")]
    TriggerOutOfBounds {
        /// Room holding the portal
        room: RoomId,
        /// Portal index
        index: usize,
    },
    /// A spawn, entry or arrival cell lies outside its room.
    #[error("room {room}: cell ({col}, {row}) lies outside the grid")]
    CellOutOfBounds {
        /// Room the cell belongs to
        room: RoomId,
        /// Column
        col: u32,
        /// Row
        row: u32,
    },
    /// The world file is not valid JSON for a [`WorldDef`].
    #[error("invalid world file: {0}")]
    Parse(#[from] serde_json::Error),
}

// =============================================================================
// Definitions
// =============================================================================

fn default_tile_size() -> f32 {
    DEFAULT_TILE_SIZE
}

/// One room as written in a world file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomDef {
    /// Unique id
    pub id: RoomId,
    /// Display name; defaults to the id
    #[serde(default)]
    pub name: Option<String>,
    /// Glyph rows (`.` floor, `#` wall, `~` water, `O` portal)
    pub rows: Vec<String>,
    /// Placed obstacles in world pixels
    #[serde(default)]
    pub obstacles: Vec<Rect>,
    /// Ways out
    #[serde(default)]
    pub portals: Vec<Portal>,
    /// Entry cell; defaults to the grid centre
    #[serde(default)]
    pub entry: Option<(u32, u32)>,
    /// Spawn table
    #[serde(default)]
    pub spawns: Vec<SpawnDef>,
    /// Banner text shown on entry
    #[serde(default)]
    pub intro: Option<String>,
}

/// A whole world file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldDef {
    /// Tile edge in pixels
    #[serde(default = "default_tile_size")]
    pub tile_size: f32,
    /// Room the player starts in
    pub start: RoomId,
    /// All rooms
    pub rooms: Vec<RoomDef>,
    /// Tuning overrides
    #[serde(default)]
    pub config: SimConfig,
}

// =============================================================================
// World
// =============================================================================

/// Loaded, validated world plus progression state.
#[derive(Debug, Clone)]
pub struct World {
    rooms: BTreeMap<RoomId, Arc<Room>>,
    current: Arc<Room>,
    flags: BTreeSet<String>,
    defeated: BTreeSet<(RoomId, usize)>,
    config: SimConfig,
}

impl World {
    /// Build and validate a world from its definition.
    ///
    /// # Errors
    ///
    /// Any [`WorldError`] except `Parse`.
    pub fn from_def(def: WorldDef) -> Result<Self, WorldError> {
        let tile_size = def.tile_size;
        let mut rooms = Vec::with_capacity(def.rooms.len());
        for room_def in def.rooms {
            let grid = TileGrid::parse(&room_def.rows, tile_size).map_err(|source| WorldError::Grid {
                room: room_def.id.clone(),
                source,
            })?;
            let mut room = Room::new(room_def.id.as_str(), grid);
            if let Some((col, row)) = room_def.entry {
                check_cell(&room, col, row)?;
                room.entry = room.cell_center(col, row);
            }
            room.name = room_def.name.unwrap_or_else(|| room_def.id.to_string());
            room.obstacles = room_def.obstacles;
            room.portals = room_def.portals;
            room.spawns = room_def.spawns;
            room.intro = room_def.intro;
            rooms.push(room);
        }
        Self::from_rooms(rooms, &def.start, def.config)
    }

    /// Parse and validate a JSON world file.
    ///
    /// # Errors
    ///
    /// `Parse` for malformed JSON, otherwise as [`World::from_def`].
    pub fn from_json(json: &str) -> Result<Self, WorldError> {
        let def: WorldDef = serde_json::from_str(json)?;
        Self::from_def(def)
    }

    /// Validate already-built rooms.
    ///
    /// # Errors
    ///
    /// Duplicate ids, a missing start room, portals to unknown rooms, and
    /// triggers or cells outside their grid.
    pub fn from_rooms(rooms: Vec<Room>, start: &RoomId, config: SimConfig) -> Result<Self, WorldError> {
        let mut map = BTreeMap::new();
        for room in rooms {
            let id = room.id.clone();
            if map.insert(id.clone(), Arc::new(room)).is_some() {
                return Err(WorldError::DuplicateRoom(id));
            }
        }

        for room in map.values() {
            validate_room(room, &map)?;
        }

        let current = map
            .get(start)
            .cloned()
            .ok_or_else(|| WorldError::UnknownStartRoom(start.clone()))?;

        info!(rooms = map.len(), start = %start, "world loaded");
        Ok(Self {
            rooms: map,
            current,
            flags: BTreeSet::new(),
            defeated: BTreeSet::new(),
            config,
        })
    }

    /// The active room.
    #[must_use]
    pub fn current_room(&self) -> &Arc<Room> {
        &self.current
    }

    /// The active room's tile grid.
    #[must_use]
    pub fn current_grid(&self) -> &TileGrid {
        &self.current.grid
    }

    /// The active room's placed obstacles.
    #[must_use]
    pub fn static_obstacles(&self) -> &[Rect] {
        &self.current.obstacles
    }

    /// Spawn table of any room.
    #[must_use]
    pub fn spawn_table_for(&self, room: &RoomId) -> Option<&[SpawnDef]> {
        self.rooms.get(room).map(|r| r.spawns.as_slice())
    }

    /// Look up a room.
    #[must_use]
    pub fn room(&self, id: &RoomId) -> Option<&Arc<Room>> {
        self.rooms.get(id)
    }

    /// All room ids in order.
    pub fn room_ids(&self) -> impl Iterator<Item = &RoomId> + '_ {
        self.rooms.keys()
    }

    /// Make `id` the active room. Returns `false` (and changes nothing) if
    /// it does not exist.
    pub fn enter(&mut self, id: &RoomId) -> bool {
        match self.rooms.get(id) {
            Some(room) => {
                self.current = Arc::clone(room);
                true
            }
            None => false,
        }
    }

    /// Tuning in use.
    #[must_use]
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Set a progression flag.
    pub fn set_flag(&mut self, flag: impl Into<String>) {
        self.flags.insert(flag.into());
    }

    /// True if a progression flag is set.
    #[must_use]
    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.contains(flag)
    }

    /// All set flags, sorted.
    pub fn flags(&self) -> impl Iterator<Item = &str> + '_ {
        self.flags.iter().map(String::as_str)
    }

    /// Remember that a guardian from the active room's spawn `slot` fell.
    pub fn mark_defeated(&mut self, slot: usize) {
        self.defeated.insert((self.current.id.clone(), slot));
    }

    /// True if the guardian in `room`'s spawn `slot` has fallen.
    #[must_use]
    pub fn is_defeated(&self, room: &RoomId, slot: usize) -> bool {
        self.defeated.contains(&(room.clone(), slot))
    }

    /// Fill `arena` with the active room: install the room, drop the old
    /// room's transients and spawn this room's table.
    ///
    /// Guardians already defeated come back as defeated markers.
    pub fn populate(&self, arena: &mut Arena) {
        let room = &self.current;
        arena.clear_room_transients();
        arena.set_room(Arc::clone(room));

        for (slot, spawn) in room.spawns.iter().enumerate() {
            let center = room.cell_center(spawn.col, spawn.row);
            match spawn.kind {
                SpawnKind::Enemy => {
                    let enemy = self.config.enemy.build(center, spawn.unlocks.clone(), slot);
                    warn_if_embedded(room, &enemy.body.rect);
                    arena.spawn(EntityInner::Enemy(enemy));
                }
                SpawnKind::Boss => {
                    let mut boss = self.config.boss.build(center, spawn.unlocks.clone(), slot);
                    if self.is_defeated(&room.id, slot) {
                        boss.combat.hp = 0;
                        boss.combat.status = StatusFlags::DEAD | StatusFlags::DEFEATED;
                    }
                    warn_if_embedded(room, &boss.body.rect);
                    arena.spawn(EntityInner::Boss(boss));
                }
                SpawnKind::Rupee => {
                    arena.pickups_mut().push(Pickup {
                        rect: Rect::centered(center, Vec2::splat(self.config.pickup_size)),
                        value: spawn.value,
                    });
                }
            }
        }
    }
}

fn warn_if_embedded(room: &Room, rect: &Rect) {
    if room.grid.overlaps_blocking(rect) {
        warn!(room = %room.id, ?rect, "spawn overlaps a blocking tile");
    }
}

fn check_cell(room: &Room, col: u32, row: u32) -> Result<(), WorldError> {
    let inside = i32::try_from(col)
        .ok()
        .zip(i32::try_from(row).ok())
        .is_some_and(|(c, r)| room.grid.in_bounds(c, r));
    if inside {
        Ok(())
    } else {
        Err(WorldError::CellOutOfBounds {
            room: room.id.clone(),
            col,
            row,
        })
    }
}

fn validate_room(room: &Room, rooms: &BTreeMap<RoomId, Arc<Room>>) -> Result<(), WorldError> {
    for (index, portal) in room.portals.iter().enumerate() {
        let trigger_ok = match &portal.trigger {
            PortalTrigger::Tile { col, row } => check_cell(room, *col, *row).is_ok(),
            PortalTrigger::Zone { rect } => {
                let bounds = room.grid.pixel_size();
                rect.intersects(&Rect::new(0.0, 0.0, bounds.x, bounds.y))
            }
            PortalTrigger::Edge { .. } => true,
        };
        if !trigger_ok {
            return Err(WorldError::TriggerOutOfBounds {
                room: room.id.clone(),
                index,
            });
        }

        if let PortalTarget::Room(target) = &portal.target {
            let Some(destination) = rooms.get(target) else {
                return Err(WorldError::InvalidTransitionTarget {
                    room: room.id.clone(),
                    target: target.clone(),
                });
            };
            if let Some((col, row)) = portal.arrival {
                check_cell(destination, col, row)?;
            }
        }
    }

    for spawn in &room.spawns {
        check_cell(room, spawn.col, spawn.row)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_ROOMS: &str = r##########"{
        "start": "meadow",
        "rooms": [
            {
                "id": "meadow",
                "name": "Meadow",
                "rows": ["#######", "#.....#", "#.....#", "#.....#", "#######"],
                "entry": [1, 1],
                "portals": [
                    { "trigger": { "kind": "tile", "col": 5, "row": 3 },
                      "target": { "room": "cave" },
                      "requires": "meadow_guardian" }
                ],
                "spawns": [
                    { "kind": "enemy", "col": 3, "row": 2 },
                    { "kind": "boss", "col": 4, "row": 3, "unlocks": "meadow_guardian" },
                    { "kind": "rupee", "col": 2, "row": 2, "value": 5 }
                ]
            },
            {
                "id": "cave",
                "rows": ["#####", "#...#", "#####"],
                "portals": [
                    { "trigger": { "kind": "edge", "side": "west" }, "target": "finish" }
                ]
            }
        ]
    }"##########;

    mod load_tests {
        use super::*;

        #[test]
        fn loads_two_rooms() {
            let world = World::from_json(TWO_ROOMS).unwrap();
            assert_eq!(world.room_ids().count(), 2);
            assert_eq!(world.current_room().name, "Meadow");
            assert_eq!(world.current_room().entry, Vec2::new(72.0, 72.0));
            assert_eq!(world.spawn_table_for(&"meadow".into()).map(<[SpawnDef]>::len), Some(3));
            assert!(world.static_obstacles().is_empty());
        }

        #[test]
        fn unknown_portal_target_is_fatal() {
            let json = TWO_ROOMS.replace(r#"{ "room": "cave" }"#, r#"{ "room": "attic" }"#);
            assert!(matches!(
                World::from_json(&json),
                Err(WorldError::InvalidTransitionTarget { target, .. }) if target.as_str() == "attic"
            ));
        }

        #[test]
        fn unknown_start_is_fatal() {
            let json = TWO_ROOMS.replace(r#""start": "meadow""#, r#""start": "void""#);
            assert!(matches!(World::from_json(&json), Err(WorldError::UnknownStartRoom(_))));
        }

        #[test]
        fn duplicate_room_is_fatal() {
            let json = TWO_ROOMS.replace(r#""id": "cave""#, r#""id": "meadow""#);
            assert!(matches!(World::from_json(&json), Err(WorldError::DuplicateRoom(_))));
        }

        #[test]
        fn ragged_rows_report_room() {
            let json = TWO_ROOMS.replace(r##########""#...#", "#####"]"##########, r##########""#..#", "#####"]"##########);
            let err = World::from_json(&json).unwrap_err();
            assert!(err.to_string().starts_with("room cave:"));
        }

        #[test]
        fn trigger_outside_grid_is_fatal() {
            let json = TWO_ROOMS.replace(r#""col": 5, "row": 3"#, r#""col": 50, "row": 3"#);
            assert!(matches!(World::from_json(&json), Err(WorldError::TriggerOutOfBounds { index: 0, .. })));
        }

        #[test]
        fn bad_json_is_parse_error() {
            assert!(matches!(World::from_json("{"), Err(WorldError::Parse(_))));
        }
    }

    mod populate_tests {
        use super::*;

        #[test]
        fn spawns_table_and_pickups() {
            let world = World::from_json(TWO_ROOMS).unwrap();
            let mut arena = Arena::new();
            world.populate(&mut arena);
            assert_eq!(arena.entity_count(), 2);
            assert_eq!(arena.pickups().len(), 1);
            assert_eq!(arena.pickups()[0].value, 5);
            assert!(arena.room().is_some());
        }

        #[test]
        fn defeated_guardian_returns_as_marker() {
            let mut world = World::from_json(TWO_ROOMS).unwrap();
            world.mark_defeated(1);
            let mut arena = Arena::new();
            world.populate(&mut arena);
            let boss = arena.entities_sorted().find(|e| e.is_boss()).unwrap();
            assert!(!boss.is_live());
            assert!(boss.combat().status.contains(StatusFlags::DEFEATED));
        }

        #[test]
        fn enter_switches_room() {
            let mut world = World::from_json(TWO_ROOMS).unwrap();
            assert!(world.enter(&"cave".into()));
            assert_eq!(world.current_room().id.as_str(), "cave");
            assert!(!world.enter(&"attic".into()));
            assert_eq!(world.current_room().id.as_str(), "cave");
        }
    }

    #[test]
    fn flags() {
        let mut world = World::from_json(TWO_ROOMS).unwrap();
        assert!(!world.has_flag("meadow_guardian"));
        world.set_flag("meadow_guardian");
        assert!(world.has_flag("meadow_guardian"));
        assert_eq!(world.flags().collect::<Vec<_>>(), vec!["meadow_guardian"]);
    }
}

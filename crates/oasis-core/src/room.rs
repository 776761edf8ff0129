//! Rooms, portals and spawn tables.
//!
//! A [`Room`] is the static description of one screen of the world: its tile
//! grid, placed obstacles, portals out, entry point and what spawns there.
//! Rooms are immutable once loaded and shared behind an `Arc`.

use glam::Vec2;
use loam::{Rect, TileGrid, EDGE_EPSILON};
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Room Id
// =============================================================================

/// Name of a room, unique within a world.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(String);

impl RoomId {
    /// Wrap a room name.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RoomId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

// =============================================================================
// Portals
// =============================================================================

/// World edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// Top edge (y = 0)
    North,
    /// Bottom edge
    South,
    /// Left edge (x = 0)
    West,
    /// Right edge
    East,
}

/// What the player must touch to use a portal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PortalTrigger {
    /// The player's centre lies in this cell.
    Tile {
        /// Column
        col: u32,
        /// Row
        row: u32,
    },
    /// The player's centre lies in this rectangle.
    Zone {
        /// Trigger area in world pixels
        rect: Rect,
    },
    /// The player's rectangle touches this world edge.
    Edge {
        /// Which edge
        side: Side,
    },
}

impl PortalTrigger {
    /// True if a body at `rect` is on this trigger.
    #[must_use]
    pub fn matches(&self, rect: &Rect, grid: &TileGrid) -> bool {
        match self {
            Self::Tile { col, row } => {
                let (c, r) = grid.tile_at_point(rect.center());
                i64::from(c) == i64::from(*col) && i64::from(r) == i64::from(*row)
            }
            Self::Zone { rect: zone } => zone.contains_point(rect.center()),
            Self::Edge { side } => {
                let bounds = grid.pixel_size();
                match side {
                    Side::North => rect.top() <= EDGE_EPSILON,
                    Side::South => rect.bottom() >= bounds.y - EDGE_EPSILON,
                    Side::West => rect.left() <= EDGE_EPSILON,
                    Side::East => rect.right() >= bounds.x - EDGE_EPSILON,
                }
            }
        }
    }
}

/// Where a portal leads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PortalTarget {
    /// Another room
    Room(RoomId),
    /// End of the game
    Finish,
}

/// A way out of a room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Portal {
    /// What the player must touch
    pub trigger: PortalTrigger,
    /// Destination
    pub target: PortalTarget,
    /// Progression flag required to pass
    #[serde(default)]
    pub requires: Option<String>,
    /// Message shown when the flag is missing
    #[serde(default)]
    pub locked_message: Option<String>,
    /// Arrival cell in the destination; defaults to its entry point
    #[serde(default)]
    pub arrival: Option<(u32, u32)>,
}

impl Portal {
    /// Ungated portal.
    #[must_use]
    pub fn new(trigger: PortalTrigger, target: PortalTarget) -> Self {
        Self {
            trigger,
            target,
            requires: None,
            locked_message: None,
            arrival: None,
        }
    }

    /// Builder: require a progression flag.
    #[must_use]
    pub fn requiring(mut self, flag: impl Into<String>) -> Self {
        self.requires = Some(flag.into());
        self
    }

    /// Builder: arrive at a specific cell.
    #[must_use]
    pub fn arriving_at(mut self, col: u32, row: u32) -> Self {
        self.arrival = Some((col, row));
        self
    }

    /// Message for a refused transition.
    #[must_use]
    pub fn denial_message(&self) -> String {
        self.locked_message
            .clone()
            .unwrap_or_else(|| "Portal locked: defeat this biome guardian first!".to_string())
    }
}

// =============================================================================
// Spawn Table
// =============================================================================

/// Kind of thing a spawn entry creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpawnKind {
    /// Regular enemy
    Enemy,
    /// Guardian
    Boss,
    /// Collectible
    Rupee,
}

/// One entry in a room's spawn table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnDef {
    /// What to spawn
    pub kind: SpawnKind,
    /// Column of the spawn cell
    pub col: u32,
    /// Row of the spawn cell
    pub row: u32,
    /// Progression flag set when this enemy dies
    #[serde(default)]
    pub unlocks: Option<String>,
    /// Pickup value (rupees only)
    #[serde(default = "default_pickup_value")]
    pub value: u32,
}

fn default_pickup_value() -> u32 {
    1
}

impl SpawnDef {
    /// Spawn entry at a cell.
    #[must_use]
    pub fn new(kind: SpawnKind, col: u32, row: u32) -> Self {
        Self {
            kind,
            col,
            row,
            unlocks: None,
            value: default_pickup_value(),
        }
    }

    /// Builder: set the unlock flag.
    #[must_use]
    pub fn unlocking(mut self, flag: impl Into<String>) -> Self {
        self.unlocks = Some(flag.into());
        self
    }
}

/// A collectible lying in the room.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pickup {
    /// Area that collects it
    pub rect: Rect,
    /// Rupees granted
    pub value: u32,
}

// =============================================================================
// Room
// =============================================================================

/// A loaded room.
#[derive(Debug, Clone, PartialEq)]
pub struct Room {
    /// Unique id
    pub id: RoomId,
    /// Display name (biome)
    pub name: String,
    /// Static tiles
    pub grid: TileGrid,
    /// Placed obstacles (rocks, trees) in world pixels
    pub obstacles: Vec<Rect>,
    /// Ways out
    pub portals: Vec<Portal>,
    /// Where the player appears, as a pixel centre
    pub entry: Vec2,
    /// What spawns here
    pub spawns: Vec<SpawnDef>,
    /// Banner shown on first entry
    pub intro: Option<String>,
}

impl Room {
    /// Room with no portals, obstacles or spawns, entered at the grid centre.
    #[must_use]
    pub fn new(id: impl Into<String>, grid: TileGrid) -> Self {
        let entry = grid.pixel_size() * 0.5;
        let id = RoomId::new(id);
        Self {
            name: id.as_str().to_string(),
            id,
            grid,
            obstacles: Vec::new(),
            portals: Vec::new(),
            entry,
            spawns: Vec::new(),
            intro: None,
        }
    }

    /// Pixel centre of a cell.
    #[must_use]
    pub fn cell_center(&self, col: u32, row: u32) -> Vec2 {
        let col = i32::try_from(col).unwrap_or(i32::MAX);
        let row = i32::try_from(row).unwrap_or(i32::MAX);
        self.grid.tile_rect(col, row).center()
    }

    /// Where a portal's traveller appears in this room.
    #[must_use]
    pub fn arrival_point(&self, portal: &Portal) -> Vec2 {
        portal
            .arrival
            .map_or(self.entry, |(col, row)| self.cell_center(col, row))
    }

    /// Index of the first portal whose trigger `rect` is on.
    #[must_use]
    pub fn portal_at(&self, rect: &Rect) -> Option<usize> {
        self.portals
            .iter()
            .position(|portal| portal.trigger.matches(rect, &self.grid))
    }
}

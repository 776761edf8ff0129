//! Tile kinds.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What occupies a single grid cell.
///
/// Wall and Water block movement. Floor and Portal are walkable; a Portal cell
/// is only special to whoever interprets transitions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    /// Walkable ground
    #[default]
    Floor,
    /// Impassable solid
    Wall,
    /// Impassable hazard
    Water,
    /// Walkable transition cell
    Portal,
}

impl TileKind {
    /// Number of tile kinds.
    pub const COUNT: usize = 4;

    /// All tile kinds in index order.
    #[must_use]
    pub const fn all() -> [TileKind; Self::COUNT] {
        [Self::Floor, Self::Wall, Self::Water, Self::Portal]
    }

    /// Stable index for lookup tables (sprites, colours, counts).
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Floor => 0,
            Self::Wall => 1,
            Self::Water => 2,
            Self::Portal => 3,
        }
    }

    /// True for kinds a moving rectangle may not overlap.
    #[must_use]
    pub const fn is_blocking(self) -> bool {
        matches!(self, Self::Wall | Self::Water)
    }

    /// Map-file glyph for this kind.
    #[must_use]
    pub const fn glyph(self) -> char {
        match self {
            Self::Floor => '.',
            Self::Wall => '#',
            Self::Water => '~',
            Self::Portal => 'O',
        }
    }

    /// Parse a map-file glyph.
    #[must_use]
    pub const fn from_glyph(glyph: char) -> Option<Self> {
        match glyph {
            '.' | ' ' => Some(Self::Floor),
            '#' => Some(Self::Wall),
            '~' => Some(Self::Water),
            'O' => Some(Self::Portal),
            _ => None,
        }
    }
}

impl fmt::Display for TileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Floor => write!(f, "Floor"),
            Self::Wall => write!(f, "Wall"),
            Self::Water => write!(f, "Water"),
            Self::Portal => write!(f, "Portal"),
        }
    }
}

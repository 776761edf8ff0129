//! # Loam
//!
//! Tile grid and rectangle collision substrate for top-down action games.
//!
//! Loam represents a room as a rectangular grid of tile kinds plus a list of
//! free-standing obstacle rectangles. It answers two questions:
//!
//! - **Is this cell blocked?** Out-of-bounds cells are walls, never errors.
//! - **Where does this rectangle end up?** Axis-separated, swept movement that
//!   slides along walls and never tunnels through them.
//!
//! ## Quick Start
//!
//! ```
//! use loam::{move_and_collide, Rect, TileGrid};
//! use glam::Vec2;
//!
//! let grid = TileGrid::parse(
//!     &["#####", "#...#", "#...#", "#...#", "#####"],
//!     32.0,
//! )
//! .unwrap();
//!
//! let start = Rect::new(68.0, 68.0, 24.0, 24.0);
//! let moved = move_and_collide(start, Vec2::new(100.0, 0.0), &grid, &[]);
//!
//! // Flush against the wall in column 4.
//! assert_eq!(moved.rect.right(), 128.0);
//! assert!(moved.blocked_x);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod collision;
pub mod grid;
pub mod rect;
pub mod tile;

// Re-exports for convenience
pub use collision::{move_and_collide, Axis, Resolved};
pub use grid::{CellRange, GridError, TileGrid};
pub use rect::Rect;
pub use tile::TileKind;

/// Tolerance used when comparing pixel edges.
///
/// Positions are integers in practice but velocities are scaled by a float
/// timestep, so edges can drift by a few ULPs.
pub const EDGE_EPSILON: f32 = 1.0e-3;

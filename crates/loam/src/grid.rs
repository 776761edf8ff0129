//! Static tile grid for a single room.
//!
//! A [`TileGrid`] is built once when a room loads and is never edited while the
//! room is occupied. Queries outside the grid resolve to [`TileKind::Wall`], so
//! callers never need to bounds-check before asking.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::rect::Rect;
use crate::tile::TileKind;

/// Errors raised while building a grid from map data.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GridError {
    /// No rows, or rows with no cells.
    #[error("grid has no cells")]
    Empty,
    /// A row's length differs from the first row.
    #[error("row {row} has {found} cells, expected {expected}")]
    Ragged {
        /// Zero-based row index
        row: usize,
        /// Width of the first row
        expected: usize,
        /// Width of the offending row
        found: usize,
    },
    /// A glyph with no tile kind.
    #[error("unknown glyph {glyph:?} at column {col}, row {row}")]
    UnknownGlyph {
        /// The glyph found
        glyph: char,
        /// Zero-based column
        col: usize,
        /// Zero-based row
        row: usize,
    },
    /// Tile size must be a positive, finite number of pixels.
    #[error("invalid tile size {0}")]
    InvalidTileSize(f32),
    /// Cell count does not match `width * height`.
    #[error("expected {expected} cells, got {found}")]
    CellCount {
        /// `width * height`
        expected: usize,
        /// Length of the supplied cell vector
        found: usize,
    },
}

/// Inclusive range of cells, possibly extending outside the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRange {
    /// First column
    pub first_col: i32,
    /// Last column (inclusive)
    pub last_col: i32,
    /// First row
    pub first_row: i32,
    /// Last row (inclusive)
    pub last_row: i32,
}

impl CellRange {
    /// True if the range covers no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.last_col < self.first_col || self.last_row < self.first_row
    }

    /// Iterate `(col, row)` pairs in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (i32, i32)> {
        let cols = self.first_col..=self.last_col;
        (self.first_row..=self.last_row).flat_map(move |row| cols.clone().map(move |col| (col, row)))
    }
}

/// Index span of cells of size `cell` whose open interval meets `(lo, hi)`.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn cell_span(lo: f32, hi: f32, cell: f32) -> (i32, i32) {
    let first = (lo / cell).floor() as i32;
    let last = (hi / cell).ceil() as i32 - 1;
    (first, last)
}

/// Rectangular grid of tile kinds with a fixed pixel tile size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileGrid {
    width: u32,
    height: u32,
    tile_size: f32,
    /// Row-major cells
    tiles: Vec<TileKind>,
}

impl TileGrid {
    /// Create a grid filled with one kind.
    ///
    /// # Errors
    ///
    /// Returns an error if the grid has no cells or the tile size is not a
    /// positive finite number.
    pub fn filled(width: u32, height: u32, tile_size: f32, kind: TileKind) -> Result<Self, GridError> {
        let cells = width as usize * height as usize;
        Self::from_cells(width, height, tile_size, vec![kind; cells])
    }

    /// Create a grid with a one-cell wall border and a floor interior.
    ///
    /// # Errors
    ///
    /// Same as [`TileGrid::filled`].
    pub fn bordered(width: u32, height: u32, tile_size: f32) -> Result<Self, GridError> {
        let mut grid = Self::filled(width, height, tile_size, TileKind::Floor)?;
        for row in 0..height {
            for col in 0..width {
                if row == 0 || col == 0 || row + 1 == height || col + 1 == width {
                    let idx = grid.index(col, row);
                    grid.tiles[idx] = TileKind::Wall;
                }
            }
        }
        Ok(grid)
    }

    /// Create a grid from row-major cells.
    ///
    /// # Errors
    ///
    /// Returns an error if the grid is empty, the cell count does not match the
    /// dimensions, or the tile size is invalid.
    pub fn from_cells(
        width: u32,
        height: u32,
        tile_size: f32,
        tiles: Vec<TileKind>,
    ) -> Result<Self, GridError> {
        if !(tile_size.is_finite() && tile_size > 0.0) {
            return Err(GridError::InvalidTileSize(tile_size));
        }
        if width == 0 || height == 0 {
            return Err(GridError::Empty);
        }
        let expected = width as usize * height as usize;
        if tiles.len() != expected {
            return Err(GridError::CellCount {
                expected,
                found: tiles.len(),
            });
        }
        Ok(Self {
            width,
            height,
            tile_size,
            tiles,
        })
    }

    /// Parse a grid from rows of glyphs (`.` floor, `#` wall, `~` water, `O` portal).
    ///
    /// # Errors
    ///
    /// Returns an error for empty input, rows of differing length, unknown
    /// glyphs, or an invalid tile size.
    pub fn parse<S: AsRef<str>>(rows: &[S], tile_size: f32) -> Result<Self, GridError> {
        let mut tiles = Vec::new();
        let mut width = None;

        for (row, line) in rows.iter().enumerate() {
            let line = line.as_ref();
            let mut count = 0;
            for (col, glyph) in line.chars().enumerate() {
                let kind = TileKind::from_glyph(glyph).ok_or(GridError::UnknownGlyph { glyph, col, row })?;
                tiles.push(kind);
                count += 1;
            }
            match width {
                None => width = Some(count),
                Some(expected) if expected != count => {
                    return Err(GridError::Ragged {
                        row,
                        expected,
                        found: count,
                    });
                }
                Some(_) => {}
            }
        }

        let width = width.unwrap_or(0);
        #[allow(clippy::cast_possible_truncation)]
        Self::from_cells(width as u32, rows.len() as u32, tile_size, tiles)
    }

    /// Returns a copy with one cell replaced. Intended for build time only.
    #[must_use]
    pub fn with_tile(mut self, col: u32, row: u32, kind: TileKind) -> Self {
        if col < self.width && row < self.height {
            let idx = self.index(col, row);
            self.tiles[idx] = kind;
        }
        self
    }

    fn index(&self, col: u32, row: u32) -> usize {
        row as usize * self.width as usize + col as usize
    }

    /// Width in tiles.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in tiles.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Tile edge length in pixels.
    #[must_use]
    pub const fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// World size in pixels.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn pixel_size(&self) -> Vec2 {
        Vec2::new(self.width as f32 * self.tile_size, self.height as f32 * self.tile_size)
    }

    /// True if the cell lies inside the grid.
    #[must_use]
    pub fn in_bounds(&self, col: i32, row: i32) -> bool {
        u32::try_from(col).is_ok_and(|c| c < self.width) && u32::try_from(row).is_ok_and(|r| r < self.height)
    }

    /// Tile kind at a cell. Out-of-bounds cells are walls.
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub fn kind_at(&self, col: i32, row: i32) -> TileKind {
        if self.in_bounds(col, row) {
            self.tiles[self.index(col as u32, row as u32)]
        } else {
            TileKind::Wall
        }
    }

    /// True if the cell blocks movement (wall, water, or out of bounds).
    #[must_use]
    pub fn is_blocking(&self, col: i32, row: i32) -> bool {
        self.kind_at(col, row).is_blocking()
    }

    /// Pixel rectangle of a cell.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn tile_rect(&self, col: i32, row: i32) -> Rect {
        Rect::new(
            col as f32 * self.tile_size,
            row as f32 * self.tile_size,
            self.tile_size,
            self.tile_size,
        )
    }

    /// Cell containing a pixel position.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn tile_at_point(&self, point: Vec2) -> (i32, i32) {
        (
            (point.x / self.tile_size).floor() as i32,
            (point.y / self.tile_size).floor() as i32,
        )
    }

    /// Cells whose interior overlaps `rect`.
    #[must_use]
    pub fn cells_overlapping(&self, rect: &Rect) -> CellRange {
        let (first_col, last_col) = cell_span(rect.left(), rect.right(), self.tile_size);
        let (first_row, last_row) = cell_span(rect.top(), rect.bottom(), self.tile_size);
        CellRange {
            first_col,
            last_col,
            first_row,
            last_row,
        }
    }

    /// True if `rect` overlaps any blocking cell.
    #[must_use]
    pub fn overlaps_blocking(&self, rect: &Rect) -> bool {
        !rect.is_empty()
            && self
                .cells_overlapping(rect)
                .iter()
                .any(|(col, row)| self.is_blocking(col, row))
    }

    /// Iterate all cells of one kind in row-major order.
    #[allow(clippy::cast_possible_wrap)]
    pub fn find(&self, kind: TileKind) -> impl Iterator<Item = (i32, i32)> + '_ {
        let width = self.width as usize;
        self.tiles
            .iter()
            .enumerate()
            .filter(move |(_, k)| **k == kind)
            .map(move |(i, _)| ((i % width) as i32, (i / width) as i32))
    }

    /// Render the grid back to glyph rows.
    #[must_use]
    pub fn to_rows(&self) -> Vec<String> {
        self.tiles
            .chunks(self.width as usize)
            .map(|row| row.iter().map(|k| k.glyph()).collect())
            .collect()
    }
}

//! Axis-separated, swept rectangle movement.
//!
//! Movement is applied one axis at a time, X before Y. Each axis is swept: every
//! blocking cell and obstacle between the rectangle's leading edge and its
//! destination is considered, and the rectangle stops flush against the nearest
//! one. Resolving the axes independently means a diagonal move into a wall
//! keeps its component along the wall (slide, not stop). Sweeping means a
//! displacement larger than a tile cannot skip over a wall.
//!
//! Obstacles the rectangle already overlaps when the move starts are ignored
//! on that axis; they cannot be entered further but do not push it out either.
//!
//! Cost is O(swept cells + obstacles) per axis. There is no broad phase.

use glam::Vec2;
use tracing::trace;

use crate::grid::{cell_span, TileGrid};
use crate::rect::Rect;
use crate::EDGE_EPSILON;

/// Movement axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Horizontal
    X,
    /// Vertical
    Y,
}

impl Axis {
    /// `(lo, len)` of the rectangle along this axis.
    fn along(self, r: &Rect) -> (f32, f32) {
        match self {
            Self::X => (r.x, r.w),
            Self::Y => (r.y, r.h),
        }
    }

    /// `(lo, hi)` of the rectangle across this axis.
    fn across(self, r: &Rect) -> (f32, f32) {
        match self {
            Self::X => (r.top(), r.bottom()),
            Self::Y => (r.left(), r.right()),
        }
    }

    fn with_along(self, r: Rect, lo: f32) -> Rect {
        match self {
            Self::X => Rect::new(lo, r.y, r.w, r.h),
            Self::Y => Rect::new(r.x, lo, r.w, r.h),
        }
    }

    /// Grid cell for an (along, across) index pair.
    fn cell(self, along: i32, across: i32) -> (i32, i32) {
        match self {
            Self::X => (along, across),
            Self::Y => (across, along),
        }
    }

    fn component(self, v: Vec2) -> f32 {
        match self {
            Self::X => v.x,
            Self::Y => v.y,
        }
    }
}

/// Outcome of [`move_and_collide`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolved {
    /// Final rectangle
    pub rect: Rect,
    /// Horizontal movement was cut short
    pub blocked_x: bool,
    /// Vertical movement was cut short
    pub blocked_y: bool,
}

impl Resolved {
    /// True if either axis was blocked.
    #[must_use]
    pub fn blocked(&self) -> bool {
        self.blocked_x || self.blocked_y
    }
}

/// Move `rect` by `delta` against the grid and obstacles.
///
/// X is resolved before Y. An axis with zero (or non-finite) displacement is
/// skipped entirely. The result is finally clamped to the grid's pixel bounds.
#[must_use]
pub fn move_and_collide(rect: Rect, delta: Vec2, grid: &TileGrid, obstacles: &[Rect]) -> Resolved {
    let mut out = Resolved {
        rect,
        blocked_x: false,
        blocked_y: false,
    };

    for axis in [Axis::X, Axis::Y] {
        let amount = axis.component(delta);
        if amount == 0.0 || !amount.is_finite() {
            continue;
        }
        let (moved, blocked) = sweep_axis(out.rect, amount, axis, grid, obstacles);
        out.rect = moved;
        match axis {
            Axis::X => out.blocked_x = blocked,
            Axis::Y => out.blocked_y = blocked,
        }
    }

    let bounds = grid.pixel_size();
    out.rect = out.rect.clamp_within(bounds.x, bounds.y);

    if out.blocked() {
        trace!(?rect, ?delta, resolved = ?out.rect, "movement blocked");
    }
    out
}

/// Sweep one axis. Returns the moved rectangle and whether it was stopped.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn sweep_axis(rect: Rect, amount: f32, axis: Axis, grid: &TileGrid, obstacles: &[Rect]) -> (Rect, bool) {
    let tile = grid.tile_size();
    let (lo, len) = axis.along(&rect);
    let (across_lo, across_hi) = axis.across(&rect);
    let (first_across, last_across) = cell_span(across_lo, across_hi, tile);
    let has_extent = across_hi > across_lo && last_across >= first_across;

    let blocked_line = |along: i32| (first_across..=last_across).any(|a| {
        let (col, row) = axis.cell(along, a);
        grid.is_blocking(col, row)
    });

    let overlaps_across = |o: &Rect| {
        let (o_lo, o_hi) = axis.across(o);
        o_lo < across_hi && o_hi > across_lo && !o.is_empty()
    };

    if amount > 0.0 {
        let front = lo + len;
        let target = front + amount;
        let mut limit = target;

        if has_extent {
            // Cells whose near (low) edge lies in [front, target).
            let first = ((front - EDGE_EPSILON) / tile).ceil() as i32;
            let last = (target / tile).ceil() as i32 - 1;
            let mut cell = first;
            while cell <= last {
                if blocked_line(cell) {
                    limit = limit.min(cell as f32 * tile);
                    break;
                }
                cell += 1;
            }
        }

        for o in obstacles.iter().filter(|o| overlaps_across(o)) {
            let (o_lo, _) = axis.along(o);
            if o_lo >= front - EDGE_EPSILON && o_lo < limit {
                limit = o_lo;
            }
        }

        let blocked = limit < target;
        (axis.with_along(rect, limit - len), blocked)
    } else {
        let front = lo;
        let target = front + amount;
        let mut limit = target;

        if has_extent {
            // Cells whose far (high) edge lies in (target, front].
            let first = ((front + EDGE_EPSILON) / tile).floor() as i32 - 1;
            let last = (target / tile).floor() as i32;
            let mut cell = first;
            while cell >= last {
                if blocked_line(cell) {
                    limit = limit.max((cell + 1) as f32 * tile);
                    break;
                }
                cell -= 1;
            }
        }

        for o in obstacles.iter().filter(|o| overlaps_across(o)) {
            let (o_lo, o_len) = axis.along(o);
            let o_hi = o_lo + o_len;
            if o_hi <= front + EDGE_EPSILON && o_hi > limit {
                limit = o_hi;
            }
        }

        let blocked = limit > target;
        (axis.with_along(rect, limit), blocked)
    }
}

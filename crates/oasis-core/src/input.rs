//! Per-tick input snapshot.
//!
//! The host samples its input device once per tick and hands the simulation
//! an [`InputSnapshot`]: one bit per held action. The core never talks to a
//! device directly.

use bitflags::bitflags;
use glam::Vec2;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Actions held during a tick.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct InputSnapshot: u8 {
        /// Move toward negative y
        const UP = 1 << 0;
        /// Move toward positive y
        const DOWN = 1 << 1;
        /// Move toward negative x
        const LEFT = 1 << 2;
        /// Move toward positive x
        const RIGHT = 1 << 3;
        /// Swing the sword
        const ATTACK = 1 << 4;
    }
}

impl InputSnapshot {
    /// Sum of held directions, normalized. Opposing keys cancel.
    ///
    /// Diagonals are scaled to unit length so they are no faster than
    /// cardinal movement.
    #[must_use]
    pub fn direction(self) -> Vec2 {
        let mut dir = Vec2::ZERO;
        if self.contains(Self::UP) {
            dir.y -= 1.0;
        }
        if self.contains(Self::DOWN) {
            dir.y += 1.0;
        }
        if self.contains(Self::LEFT) {
            dir.x -= 1.0;
        }
        if self.contains(Self::RIGHT) {
            dir.x += 1.0;
        }
        dir.normalize_or_zero()
    }

    /// True while the attack action is held.
    #[must_use]
    pub const fn attack(self) -> bool {
        self.contains(Self::ATTACK)
    }

    /// Parse a compact script token such as `"UR"`, `"A"`, `"DLA"` or `"-"`.
    ///
    /// `U`/`D`/`L`/`R` are directions, `A` is attack, `-` or `.` is no input.
    /// Case-insensitive. Returns `None` on any other character.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        let mut input = Self::empty();
        for ch in token.chars() {
            match ch.to_ascii_uppercase() {
                'U' => input |= Self::UP,
                'D' => input |= Self::DOWN,
                'L' => input |= Self::LEFT,
                'R' => input |= Self::RIGHT,
                'A' => input |= Self::ATTACK,
                '-' | '.' => {}
                _ => return None,
            }
        }
        Some(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_input_is_zero() {
        assert_eq!(InputSnapshot::empty().direction(), Vec2::ZERO);
    }

    #[test]
    fn opposing_keys_cancel() {
        let input = InputSnapshot::LEFT | InputSnapshot::RIGHT;
        assert_eq!(input.direction(), Vec2::ZERO);
    }

    #[test]
    fn diagonal_is_unit_length() {
        let input = InputSnapshot::UP | InputSnapshot::RIGHT;
        let dir = input.direction();
        assert!((dir.length() - 1.0).abs() < 1e-6);
        assert!(dir.x > 0.0 && dir.y < 0.0);
    }

    #[test]
    fn tokens() {
        assert_eq!(
            InputSnapshot::from_token("ur"),
            Some(InputSnapshot::UP | InputSnapshot::RIGHT)
        );
        assert_eq!(InputSnapshot::from_token("-"), Some(InputSnapshot::empty()));
        assert!(InputSnapshot::from_token("A").is_some_and(InputSnapshot::attack));
        assert_eq!(InputSnapshot::from_token("x"), None);
    }
}

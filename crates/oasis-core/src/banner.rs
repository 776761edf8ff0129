//! The on-screen message banner.

use serde::{Deserialize, Serialize};

/// Latest user-facing message and how long it stays up.
///
/// A new message replaces the old one outright.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Banner {
    /// Message text
    pub text: String,
    /// Ticks left on screen
    pub remaining: u32,
}

impl Banner {
    /// Banner shown for `ticks` ticks.
    #[must_use]
    pub fn new(text: impl Into<String>, ticks: u32) -> Self {
        Self {
            text: text.into(),
            remaining: ticks,
        }
    }

    /// Count one tick off. Returns `false` once the banner should go.
    pub fn tick(&mut self) -> bool {
        self.remaining = self.remaining.saturating_sub(1);
        self.remaining > 0
    }
}

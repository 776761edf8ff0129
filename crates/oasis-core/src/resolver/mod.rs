//! Resolvers for the Entity-Plugin-Resolver loop.
//!
//! Resolvers are the write phase. They receive the plugin outputs routed to
//! them by kind, read the frozen `current` arena, and mutate `next`. They
//! run serially in a fixed order:
//!
//! 1. [`MotionResolver`]: applies movement commands, integrates velocity
//!    through the collision resolver, advances wander timers and walk cycles
//! 2. [`CombatResolver`]: ticks combat timers, starts attacks, hit-tests
//!    hitboxes, applies contact damage and knockback
//! 3. [`LootResolver`]: collects pickups the player overlaps
//!
//! # Invariants
//!
//! - Resolvers MUST be deterministic given the same inputs and output order
//! - Entities are visited in id order
//! - Nothing is removed mid-tick; dead entities are compacted afterwards
//! - What happened is recorded as [`Event`](crate::output::Event)s in the
//!   `next` arena's journal

mod combat;
mod loot;
mod motion;

pub use combat::{CombatResolver, CombatRules};
pub use loot::LootResolver;
pub use motion::MotionResolver;

use crate::arena::Arena;
use crate::output::{OutputEnvelope, OutputKind};

/// Processes outputs and mutates the next state.
///
/// # Example
///
/// ```
/// use oasis_core::resolver::Resolver;
/// use oasis_core::output::{OutputKind, OutputEnvelope};
/// use oasis_core::arena::Arena;
///
/// struct Noop;
///
/// impl Resolver for Noop {
///     fn handles(&self) -> &[OutputKind] {
///         &[OutputKind::Command]
///     }
///
///     fn resolve(&self, _outputs: &[&OutputEnvelope], _current: &Arena, _next: &mut Arena) {}
/// }
/// ```
pub trait Resolver: Send + Sync {
    /// Output kinds routed to this resolver. A resolver with no kinds still
    /// runs every tick with an empty output slice.
    fn handles(&self) -> &[OutputKind];

    /// Apply `outputs` to `next`.
    ///
    /// `current` is the frozen start-of-tick state. `next` starts as a copy of
    /// it and already carries the changes of earlier resolvers this tick.
    fn resolve(&self, outputs: &[&OutputEnvelope], current: &Arena, next: &mut Arena);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolver_is_object_safe() {
        fn _accepts_boxed(_resolver: Box<dyn Resolver>) {}
        fn _accepts_slice(_resolvers: &[Box<dyn Resolver>]) {}
    }
}

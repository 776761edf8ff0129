//! Room transition detection.
//!
//! Runs after the player's position for the tick is final. Portals are
//! edge-triggered: a portal fires when the player steps onto it, not on
//! every tick spent standing there. The caller tracks which portal the
//! player stood on last tick and passes it back in. A refused portal is
//! not latched, so its gate is tested again on every tick.

use glam::Vec2;
use loam::Rect;
use tracing::trace;

use crate::room::{PortalTarget, RoomId};
use crate::world::World;

/// What the player's position means for the active room.
#[derive(Debug, Clone, PartialEq)]
pub enum TransitionOutcome {
    /// Not on a newly-entered portal.
    None,
    /// Move to another room.
    Enter {
        /// Index of the portal used in the current room
        portal: usize,
        /// Destination
        to: RoomId,
        /// Player centre in the destination
        arrival: Vec2,
    },
    /// The finish portal was reached.
    Finish,
    /// A gated portal refused entry. Nothing changes.
    Denied {
        /// Message for the player
        message: String,
    },
}

/// Check the player's rectangle against the active room's portals.
///
/// `standing_on` is the portal the player arrived on or last used;
/// staying on it yields [`TransitionOutcome::None`]. Gating is checked
/// against the world's progression flags.
///
/// # Example
///
/// ```
/// use oasis_core::transition::{check_transition, TransitionOutcome};
/// use oasis_core::world::World;
/// use loam::Rect;
///
/// let world = World::from_json(r##########"{
///     "start": "a",
///     "rooms": [
///         { "id": "a", "rows": ["#####", "#..O#", "#####"],
///           "portals": [{ "trigger": { "kind": "tile", "col": 3, "row": 1 },
///                         "target": "finish" }] }
///     ]
/// }"##########).unwrap();
///
/// let on_portal = Rect::centered(glam::Vec2::new(168.0, 72.0), glam::Vec2::splat(36.0));
/// assert_eq!(check_transition(&world, &on_portal, None), TransitionOutcome::Finish);
/// assert_eq!(check_transition(&world, &on_portal, Some(0)), TransitionOutcome::None);
/// ```
#[must_use]
pub fn check_transition(world: &World, player: &Rect, standing_on: Option<usize>) -> TransitionOutcome {
    let room = world.current_room();
    let Some(index) = room.portal_at(player) else {
        return TransitionOutcome::None;
    };
    if standing_on == Some(index) {
        return TransitionOutcome::None;
    }
    let Some(portal) = room.portals.get(index) else {
        return TransitionOutcome::None;
    };

    if let Some(flag) = &portal.requires {
        if !world.has_flag(flag) {
            trace!(room = %room.id, portal = index, flag = %flag, "transition denied");
            return TransitionOutcome::Denied {
                message: portal.denial_message(),
            };
        }
    }

    match &portal.target {
        PortalTarget::Finish => TransitionOutcome::Finish,
        PortalTarget::Room(to) => {
            // Targets are validated at load; a miss here means no move.
            let Some(destination) = world.room(to) else {
                return TransitionOutcome::None;
            };
            TransitionOutcome::Enter {
                portal: index,
                to: to.clone(),
                arrival: destination.arrival_point(portal),
            }
        }
    }
}

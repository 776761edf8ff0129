//! Loot resolver: pickups the player walks over.
//!
//! Consumes no outputs. Runs after motion and combat so it sees the
//! player's final position for the tick.

use crate::arena::Arena;
use crate::output::{Event, OutputEnvelope, OutputKind};
use crate::room::Pickup;

use super::Resolver;

/// Collects pickups overlapping the live player into its inventory.
#[derive(Debug, Clone, Default)]
pub struct LootResolver;

impl LootResolver {
    /// Creates a new loot resolver.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Resolver for LootResolver {
    fn handles(&self) -> &[OutputKind] {
        &[]
    }

    fn resolve(&self, _outputs: &[&OutputEnvelope], _current: &Arena, next: &mut Arena) {
        let Some(player_rect) = next.live().find(|e| e.is_player()).map(|p| p.body().rect) else {
            return;
        };

        let (collected, remaining): (Vec<Pickup>, Vec<Pickup>) = next
            .pickups()
            .iter()
            .copied()
            .partition(|pickup| pickup.rect.intersects(&player_rect));
        if collected.is_empty() {
            return;
        }
        *next.pickups_mut() = remaining;

        for pickup in collected {
            let Some(inventory) = next
                .player_mut()
                .and_then(|p| p.as_player_mut())
                .map(|p| &mut p.inventory)
            else {
                return;
            };
            inventory.rupees = inventory.rupees.saturating_add(pickup.value);
            let total = inventory.rupees;
            next.record(Event::PickupCollected {
                value: pickup.value,
                total,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlayerArchetype;
    use crate::entity::{EntityInner, StatusFlags};
    use glam::Vec2;
    use loam::Rect;

    fn setup() -> (Arena, crate::entity::EntityId) {
        let mut arena = Arena::new();
        let player = arena.spawn(EntityInner::Player(
            PlayerArchetype::default().build(Vec2::new(100.0, 100.0)),
        ));
        arena.pickups_mut().push(Pickup {
            rect: Rect::new(95.0, 95.0, 14.0, 14.0),
            value: 5,
        });
        arena.pickups_mut().push(Pickup {
            rect: Rect::new(300.0, 300.0, 14.0, 14.0),
            value: 1,
        });
        (arena, player)
    }

    fn step(arena: &mut Arena) {
        let current = arena.clone();
        LootResolver::new().resolve(&[], &current, arena);
    }

    #[test]
    fn overlapping_pickup_is_collected() {
        let (mut arena, player) = setup();
        step(&mut arena);
        assert_eq!(arena.pickups().len(), 1);
        assert_eq!(arena.get(player).unwrap().as_player().unwrap().inventory.rupees, 5);
        assert_eq!(arena.journal(), &[Event::PickupCollected { value: 5, total: 5 }]);
    }

    #[test]
    fn dead_player_collects_nothing() {
        let (mut arena, player) = setup();
        if let Some(p) = arena.get_mut(player) {
            p.combat_mut().status.insert(StatusFlags::DEAD);
        }
        step(&mut arena);
        assert_eq!(arena.pickups().len(), 2);
    }
}

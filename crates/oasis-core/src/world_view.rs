//! Scoped, read-only access to the arena for plugins.
//!
//! A [`WorldView`] only hands out the component groups the plugin declared in
//! its [`PluginDeclaration`](crate::plugin::PluginDeclaration):
//! - In debug builds, reading an undeclared component panics
//! - In release builds, it returns `None`
//!
//! Tag queries, the input snapshot and the active room are always available.
//!
//! # Example
//!
//! ```
//! use oasis_core::arena::Arena;
//! use oasis_core::entity::{EntityInner, PlayerComponents};
//! use oasis_core::plugin::{ComponentKind, PluginDeclaration, PluginId};
//! use oasis_core::output::OutputKind;
//! use oasis_core::world_view::WorldView;
//! use oasis_core::entity::EntityTag;
//!
//! let mut arena = Arena::new();
//! let player = arena.spawn(EntityInner::Player(PlayerComponents::default()));
//!
//! let decl = PluginDeclaration {
//!     id: PluginId::new("watcher"),
//!     required_tags: vec![EntityTag::Enemy],
//!     reads: vec![ComponentKind::Body],
//!     emits: vec![OutputKind::Command],
//! };
//! let view = WorldView::for_plugin(&arena, &decl, arena.current_tick());
//!
//! assert_eq!(view.player_id(), Some(player));
//! assert!(view.get_body(player).is_some());
//! ```

use std::sync::Arc;

use crate::arena::Arena;
use crate::entity::{AiState, BodyState, CombatState, Entity, EntityId, EntityTag, Inventory};
use crate::input::InputSnapshot;
use crate::plugin::{ComponentKind, PluginDeclaration};
use crate::room::Room;

// =============================================================================
// WorldView
// =============================================================================

/// Read-only, declaration-scoped view of the arena.
#[derive(Debug)]
pub struct WorldView<'a> {
    arena: &'a Arena,
    tick: u64,
    allowed_components: &'a [ComponentKind],
}

impl<'a> WorldView<'a> {
    /// View scoped to `decl.reads`.
    #[must_use]
    pub fn for_plugin(arena: &'a Arena, decl: &'a PluginDeclaration, tick: u64) -> Self {
        Self {
            arena,
            tick,
            allowed_components: &decl.reads,
        }
    }

    /// View with every component readable. For tests and tooling.
    #[must_use]
    pub fn full_access(arena: &'a Arena, tick: u64) -> Self {
        static ALL_COMPONENTS: &[ComponentKind] = &[
            ComponentKind::Body,
            ComponentKind::Combat,
            ComponentKind::Ai,
            ComponentKind::Inventory,
        ];

        Self {
            arena,
            tick,
            allowed_components: ALL_COMPONENTS,
        }
    }

    /// Tick being decided.
    #[must_use]
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Body of `id`.
    #[must_use]
    pub fn get_body(&self, id: EntityId) -> Option<&'a BodyState> {
        self.check_access(ComponentKind::Body)?;
        Some(self.arena.get(id)?.body())
    }

    /// Combat state of `id`.
    #[must_use]
    pub fn get_combat(&self, id: EntityId) -> Option<&'a CombatState> {
        self.check_access(ComponentKind::Combat)?;
        Some(self.arena.get(id)?.combat())
    }

    /// AI state of `id` (enemies and bosses only).
    #[must_use]
    pub fn get_ai(&self, id: EntityId) -> Option<&'a AiState> {
        self.check_access(ComponentKind::Ai)?;
        Some(&self.arena.get(id)?.as_enemy()?.ai)
    }

    /// Inventory of `id` (player only).
    #[must_use]
    pub fn get_inventory(&self, id: EntityId) -> Option<&'a Inventory> {
        self.check_access(ComponentKind::Inventory)?;
        Some(&self.arena.get(id)?.as_player()?.inventory)
    }

    /// Ids with `tag`, in id order. Always allowed.
    pub fn query_by_tag(&self, tag: EntityTag) -> impl Iterator<Item = EntityId> + 'a {
        self.arena
            .entities_sorted()
            .filter(move |e| e.tag() == tag)
            .map(Entity::id)
    }

    /// The live player's id. Always allowed.
    #[must_use]
    pub fn player_id(&self) -> Option<EntityId> {
        self.arena.live().find(|e| e.is_player()).map(Entity::id)
    }

    /// Input held this tick. Always allowed.
    #[must_use]
    pub fn input(&self) -> InputSnapshot {
        self.arena.input()
    }

    /// Active room. Always allowed.
    #[must_use]
    pub fn room(&self) -> Option<&'a Arc<Room>> {
        self.arena.room()
    }

    #[allow(clippy::unnecessary_wraps)]
    fn check_access(&self, kind: ComponentKind) -> Option<()> {
        if self.allowed_components.contains(&kind) {
            Some(())
        } else {
            #[cfg(debug_assertions)]
            panic!(
                "WorldView access denied: plugin tried to access {:?} but only declared: {:?}",
                kind, self.allowed_components
            );

            #[cfg(not(debug_assertions))]
            None
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{EnemyComponents, EntityInner, PlayerComponents, StatusFlags};
    use crate::output::{OutputKind, PluginId};

    fn decl(reads: Vec<ComponentKind>) -> PluginDeclaration {
        PluginDeclaration {
            id: PluginId::new("test"),
            required_tags: vec![EntityTag::Enemy],
            reads,
            emits: vec![OutputKind::Command],
        }
    }

    #[test]
    fn declared_components_are_readable() {
        let mut arena = Arena::new();
        let enemy = arena.spawn(EntityInner::Enemy(EnemyComponents::default()));
        let decl = decl(vec![ComponentKind::Body, ComponentKind::Ai]);
        let view = WorldView::for_plugin(&arena, &decl, 0);
        assert!(view.get_body(enemy).is_some());
        assert!(view.get_ai(enemy).is_some());
    }

    #[test]
    fn ai_of_player_is_none() {
        let mut arena = Arena::new();
        let player = arena.spawn(EntityInner::Player(PlayerComponents::default()));
        let view = WorldView::full_access(&arena, 0);
        assert!(view.get_ai(player).is_none());
        assert!(view.get_inventory(player).is_some());
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "WorldView access denied")]
    fn undeclared_component_panics_in_debug() {
        let mut arena = Arena::new();
        let enemy = arena.spawn(EntityInner::Enemy(EnemyComponents::default()));
        let decl = decl(vec![ComponentKind::Body]);
        let view = WorldView::for_plugin(&arena, &decl, 0);
        let _ = view.get_combat(enemy);
    }

    #[test]
    fn dead_player_is_not_reported() {
        let mut arena = Arena::new();
        let player = arena.spawn(EntityInner::Player(PlayerComponents::default()));
        if let Some(p) = arena.get_mut(player) {
            p.combat_mut().status.insert(StatusFlags::DEAD);
        }
        let view = WorldView::full_access(&arena, 0);
        assert_eq!(view.player_id(), None);
    }

    #[test]
    fn query_by_tag_is_sorted() {
        let mut arena = Arena::new();
        let a = arena.spawn(EntityInner::Enemy(EnemyComponents::default()));
        arena.spawn(EntityInner::Boss(EnemyComponents::default()));
        let c = arena.spawn(EntityInner::Enemy(EnemyComponents::default()));
        let view = WorldView::full_access(&arena, 0);
        assert_eq!(view.query_by_tag(EntityTag::Enemy).collect::<Vec<_>>(), vec![a, c]);
    }
}

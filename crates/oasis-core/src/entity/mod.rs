//! Entity types for the Entity-Plugin-Resolver loop.
//!
//! - [`EntityId`]: stable identifier, ordered for deterministic iteration
//! - [`EntityTag`]: selects the plugin bundle that runs on an entity
//! - [`EntityInner`]: per-tag component storage
//! - [`Entity`]: the container the arena owns
//!
//! # Example
//!
//! ```
//! use oasis_core::entity::{Entity, EntityId, EntityInner, EntityTag, PlayerComponents};
//!
//! let player = Entity::new(EntityId::new(0), EntityInner::Player(PlayerComponents::default()));
//!
//! assert_eq!(player.tag(), EntityTag::Player);
//! assert!(player.is_live());
//! ```

pub mod components;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use components::{
    AiMode, AiState, AttackKind, AttackPhase, AttackProfile, BodyState, CombatState,
    EnemyComponents, Facing, HitOutcome, Inventory, PlayerComponents, StatusFlags, Team,
    WalkCycle,
};

/// Unique identifier for an entity.
///
/// Ids are assigned monotonically by the arena and never reused, so ordering
/// by id is spawn order.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(u64);

impl EntityId {
    /// Wrap a raw id.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Raw id.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for EntityId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

impl From<EntityId> for u64 {
    fn from(id: EntityId) -> Self {
        id.0
    }
}

/// Entity type tag for plugin bundle selection.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EntityTag {
    /// The player character
    Player,
    /// Regular enemy
    Enemy,
    /// Room guardian; persists as a marker once defeated
    Boss,
}

impl fmt::Display for EntityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Player => write!(f, "Player"),
            Self::Enemy => write!(f, "Enemy"),
            Self::Boss => write!(f, "Boss"),
        }
    }
}

/// Per-tag component storage.
///
/// Enemies and bosses share a component layout; only the tag differs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EntityInner {
    /// Player components
    Player(PlayerComponents),
    /// Enemy components
    Enemy(EnemyComponents),
    /// Boss components
    Boss(EnemyComponents),
}

impl EntityInner {
    /// Tag implied by the variant.
    #[must_use]
    pub const fn tag(&self) -> EntityTag {
        match self {
            Self::Player(_) => EntityTag::Player,
            Self::Enemy(_) => EntityTag::Enemy,
            Self::Boss(_) => EntityTag::Boss,
        }
    }
}

/// An entity owned by the arena.
///
/// The tag is always derived from the inner variant, so the two cannot
/// disagree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    id: EntityId,
    inner: EntityInner,
}

impl Entity {
    /// Create an entity.
    #[must_use]
    pub const fn new(id: EntityId, inner: EntityInner) -> Self {
        Self { id, inner }
    }

    /// Identifier.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Type tag.
    #[must_use]
    pub const fn tag(&self) -> EntityTag {
        self.inner.tag()
    }

    /// Component storage.
    #[must_use]
    pub const fn inner(&self) -> &EntityInner {
        &self.inner
    }

    /// Mutable component storage.
    #[must_use]
    pub fn inner_mut(&mut self) -> &mut EntityInner {
        &mut self.inner
    }

    /// True for the player.
    #[must_use]
    pub const fn is_player(&self) -> bool {
        matches!(self.inner, EntityInner::Player(_))
    }

    /// True for bosses.
    #[must_use]
    pub const fn is_boss(&self) -> bool {
        matches!(self.inner, EntityInner::Boss(_))
    }

    /// True unless the entity has died.
    #[must_use]
    pub fn is_live(&self) -> bool {
        !self.combat().is_dead()
    }

    /// Body state (every entity has one).
    #[must_use]
    pub const fn body(&self) -> &BodyState {
        match &self.inner {
            EntityInner::Player(c) => &c.body,
            EntityInner::Enemy(c) | EntityInner::Boss(c) => &c.body,
        }
    }

    /// Mutable body state.
    #[must_use]
    pub fn body_mut(&mut self) -> &mut BodyState {
        match &mut self.inner {
            EntityInner::Player(c) => &mut c.body,
            EntityInner::Enemy(c) | EntityInner::Boss(c) => &mut c.body,
        }
    }

    /// Combat state (every entity has one).
    #[must_use]
    pub const fn combat(&self) -> &CombatState {
        match &self.inner {
            EntityInner::Player(c) => &c.combat,
            EntityInner::Enemy(c) | EntityInner::Boss(c) => &c.combat,
        }
    }

    /// Mutable combat state.
    #[must_use]
    pub fn combat_mut(&mut self) -> &mut CombatState {
        match &mut self.inner {
            EntityInner::Player(c) => &mut c.combat,
            EntityInner::Enemy(c) | EntityInner::Boss(c) => &mut c.combat,
        }
    }

    /// Walk animation state.
    #[must_use]
    pub const fn walk(&self) -> &WalkCycle {
        match &self.inner {
            EntityInner::Player(c) => &c.walk,
            EntityInner::Enemy(c) | EntityInner::Boss(c) => &c.walk,
        }
    }

    /// Mutable walk animation state.
    #[must_use]
    pub fn walk_mut(&mut self) -> &mut WalkCycle {
        match &mut self.inner {
            EntityInner::Player(c) => &mut c.walk,
            EntityInner::Enemy(c) | EntityInner::Boss(c) => &mut c.walk,
        }
    }

    /// Player components, if this is the player.
    #[must_use]
    pub const fn as_player(&self) -> Option<&PlayerComponents> {
        match &self.inner {
            EntityInner::Player(c) => Some(c),
            _ => None,
        }
    }

    /// Mutable player components, if this is the player.
    #[must_use]
    pub fn as_player_mut(&mut self) -> Option<&mut PlayerComponents> {
        match &mut self.inner {
            EntityInner::Player(c) => Some(c),
            _ => None,
        }
    }

    /// Enemy components for enemies and bosses.
    #[must_use]
    pub const fn as_enemy(&self) -> Option<&EnemyComponents> {
        match &self.inner {
            EntityInner::Enemy(c) | EntityInner::Boss(c) => Some(c),
            EntityInner::Player(_) => None,
        }
    }

    /// Mutable enemy components for enemies and bosses.
    #[must_use]
    pub fn as_enemy_mut(&mut self) -> Option<&mut EnemyComponents> {
        match &mut self.inner {
            EntityInner::Enemy(c) | EntityInner::Boss(c) => Some(c),
            EntityInner::Player(_) => None,
        }
    }
}

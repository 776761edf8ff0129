//! Read-only render snapshot.
//!
//! [`FrameView`] is everything a renderer needs to draw one tick: resolved
//! rectangles, facing, animation frame and health counters. It is plain data
//! and serializes to JSON for headless hosts.

use loam::Rect;
use serde::{Deserialize, Serialize};

use crate::arena::Arena;
use crate::banner::Banner;
use crate::entity::{AttackPhase, Entity, EntityId, EntityTag, Facing, StatusFlags};
use crate::room::RoomId;

/// Whether the run is still going.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameOutcome {
    /// Still exploring
    #[default]
    Playing,
    /// Reached the finish portal
    Victory,
}

/// One entity as a renderer sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityFrame {
    /// Entity id
    pub id: EntityId,
    /// What it is
    pub tag: EntityTag,
    /// Resolved body rectangle
    pub rect: Rect,
    /// Facing, for sprite selection
    pub facing: Facing,
    /// Walk cycle frame
    pub frame: u8,
    /// Idle or swinging
    pub phase: AttackPhase,
    /// Current health
    pub hp: u32,
    /// Maximum health
    pub max_hp: u32,
    /// Hit-flash feedback is showing
    pub flash: bool,
    /// Fallen guardian marker
    pub defeated: bool,
}

impl EntityFrame {
    fn from_entity(entity: &Entity) -> Self {
        let body = entity.body();
        let combat = entity.combat();
        Self {
            id: entity.id(),
            tag: entity.tag(),
            rect: body.rect,
            facing: body.facing,
            frame: entity.walk().frame,
            phase: combat.phase(),
            hp: combat.hp,
            max_hp: combat.max_hp,
            flash: combat.hit_flash > 0,
            defeated: combat.status.contains(StatusFlags::DEFEATED),
        }
    }
}

/// Everything drawable for one tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameView {
    /// Simulation tick
    pub tick: u64,
    /// Active room
    pub room: RoomId,
    /// Entities in id order
    pub entities: Vec<EntityFrame>,
    /// Live attack areas
    pub hitboxes: Vec<Rect>,
    /// Uncollected pickups
    pub pickups: Vec<Rect>,
    /// Message on screen, if any
    pub banner: Option<Banner>,
    /// Player's rupee count
    pub rupees: u32,
    /// Run state
    pub outcome: GameOutcome,
}

impl FrameView {
    /// Capture `arena` as it stands.
    #[must_use]
    pub fn capture(arena: &Arena, room: RoomId, banner: Option<Banner>, outcome: GameOutcome) -> Self {
        Self {
            tick: arena.current_tick(),
            room,
            entities: arena.entities_sorted().map(EntityFrame::from_entity).collect(),
            hitboxes: arena.hitboxes().iter().map(|h| h.rect).collect(),
            pickups: arena.pickups().iter().map(|p| p.rect).collect(),
            banner,
            rupees: arena
                .player()
                .and_then(Entity::as_player)
                .map_or(0, |p| p.inventory.rupees),
            outcome,
        }
    }

    /// The player's frame, if present.
    #[must_use]
    pub fn player(&self) -> Option<&EntityFrame> {
        self.entities.iter().find(|e| e.tag == EntityTag::Player)
    }
}

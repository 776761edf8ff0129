//! Test helper functions for setting up worlds and simulations.
//!
//! The standard test world has two rooms on 48 px tiles:
//!
//! - `meadow` (12×8, bordered): entry at the centre, a guardian in cell
//!   (9, 1) unlocking `meadow_guardian`, a 5-rupee pickup in cell (3, 6) and a
//!   portal in cell (10, 4) to `cave`, gated on `meadow_guardian`.
//! - `cave` (8×6, bordered): arrival in cell (2, 3), a portal back to the
//!   meadow in cell (1, 3) and a finish portal in cell (6, 3).

use std::sync::Arc;

use glam::Vec2;
use loam::{Rect, TileGrid};

use crate::config::SimConfig;
use crate::entity::{Entity, EntityId, EntityInner, EntityTag};
use crate::input::InputSnapshot;
use crate::output::Event;
use crate::plugin::PluginRegistry;
use crate::plugins::PlayerControlPlugin;
use crate::room::{Portal, PortalTarget, PortalTrigger, Room, SpawnDef, SpawnKind};
use crate::simulation::Simulation;
use crate::world::World;

/// Seed used unless a test says otherwise.
pub const SEED: u64 = 42;

/// Tile edge of every test room.
pub const TILE: f32 = 48.0;

// =============================================================================
// World Setup
// =============================================================================

/// Pixel centre of a cell.
#[allow(clippy::cast_precision_loss)]
pub fn cell(col: u32, row: u32) -> Vec2 {
    Vec2::new(col as f32 * TILE + TILE * 0.5, row as f32 * TILE + TILE * 0.5)
}

/// The meadow: guardian, rupee and a gated portal east.
pub fn meadow() -> Room {
    let mut room = Room::new("meadow", TileGrid::bordered(12, 8, TILE).unwrap());
    room.portals.push(
        Portal::new(PortalTrigger::Tile { col: 10, row: 4 }, PortalTarget::Room("cave".into()))
            .requiring("meadow_guardian")
            .arriving_at(2, 3),
    );
    room.spawns.push(SpawnDef::new(SpawnKind::Boss, 9, 1).unlocking("meadow_guardian"));
    room.spawns.push(SpawnDef {
        value: 5,
        ..SpawnDef::new(SpawnKind::Rupee, 3, 6)
    });
    room
}

/// The cave: a way back and the finish.
pub fn cave() -> Room {
    let mut room = Room::new("cave", TileGrid::bordered(8, 6, TILE).unwrap());
    room.portals.push(
        Portal::new(PortalTrigger::Tile { col: 1, row: 3 }, PortalTarget::Room("meadow".into()))
            .arriving_at(8, 4),
    );
    room.portals.push(Portal::new(PortalTrigger::Tile { col: 6, row: 3 }, PortalTarget::Finish));
    room
}

/// Standard two-room world with default tuning.
pub fn test_world() -> World {
    world_with_config(SimConfig::default())
}

/// Standard two-room world with custom tuning.
pub fn world_with_config(config: SimConfig) -> World {
    World::from_rooms(vec![meadow(), cave()], &"meadow".into(), config).unwrap()
}

/// One large empty room with regular enemies in the four corners, far
/// outside their aggro radius of the player.
pub fn corner_world() -> World {
    let mut room = Room::new("plaza", TileGrid::bordered(20, 12, TILE).unwrap());
    for (col, row) in [(1, 1), (18, 1), (1, 10), (18, 10)] {
        room.spawns.push(SpawnDef::new(SpawnKind::Enemy, col, row));
    }
    World::from_rooms(vec![room], &"plaza".into(), SimConfig::default()).unwrap()
}

/// Registry that only runs player control, so enemies stand still.
pub fn player_only(config: &SimConfig) -> PluginRegistry {
    let mut registry = PluginRegistry::new();
    registry.register(
        EntityTag::Player,
        Arc::new(PlayerControlPlugin::new(config.lock_movement_while_attacking)),
    );
    registry
}

/// Standard world with enemy AI switched off.
pub fn quiet_sim() -> Simulation {
    quiet_sim_with(SimConfig::default())
}

/// Standard world with custom tuning and enemy AI switched off.
pub fn quiet_sim_with(config: SimConfig) -> Simulation {
    let registry = player_only(&config);
    let mut sim = Simulation::new(world_with_config(config), SEED);
    *sim.plugins_mut() = registry;
    sim
}

// =============================================================================
// Driving
// =============================================================================

/// Step `ticks` times holding `input`.
pub fn hold(sim: &mut Simulation, input: InputSnapshot, ticks: u32) {
    for _ in 0..ticks {
        sim.step(input);
    }
}

/// Step holding `input` until `done` or `limit` ticks pass. Returns the
/// ticks taken, or `None` on timeout.
pub fn hold_until(
    sim: &mut Simulation,
    input: InputSnapshot,
    limit: u32,
    done: impl Fn(&Simulation) -> bool,
) -> Option<u32> {
    for ticks in 1..=limit {
        sim.step(input);
        if done(sim) {
            return Some(ticks);
        }
    }
    None
}

// =============================================================================
// Entity Access
// =============================================================================

/// Move the player so its centre is at `center`.
pub fn teleport_player(sim: &mut Simulation, center: Vec2) {
    let player = sim.arena_mut().player_mut().unwrap();
    let body = player.body_mut();
    body.rect = Rect::centered(center, body.rect.size());
}

/// Player centre.
pub fn player_center(sim: &Simulation) -> Vec2 {
    sim.arena().player().unwrap().body().center()
}

/// Player health.
pub fn player_hp(sim: &Simulation) -> u32 {
    sim.arena().player().unwrap().combat().hp
}

/// Health of any entity, `None` once it has been compacted away.
pub fn hp_of(sim: &Simulation, id: EntityId) -> Option<u32> {
    sim.arena().get(id).map(|e| e.combat().hp)
}

/// Spawn a regular enemy centred on `center`.
pub fn spawn_grunt(sim: &mut Simulation, center: Vec2) -> EntityId {
    let enemy = SimConfig::default().enemy.build(center, None, 0);
    sim.arena_mut().spawn(EntityInner::Enemy(enemy))
}

/// The room's guardian.
pub fn boss(sim: &Simulation) -> &Entity {
    sim.arena().entities_sorted().find(|e| e.is_boss()).unwrap()
}

/// Move the guardian so its centre is at `center` and set its health.
pub fn place_boss(sim: &mut Simulation, center: Vec2, hp: u32) -> EntityId {
    let id = boss(sim).id();
    let entity = sim.arena_mut().get_mut(id).unwrap();
    let body = entity.body_mut();
    body.rect = Rect::centered(center, body.rect.size());
    entity.combat_mut().hp = hp;
    id
}

/// Number of events matching `pred`.
pub fn count_events(events: &[Event], pred: impl Fn(&Event) -> bool) -> usize {
    events.iter().filter(|e| pred(e)).count()
}

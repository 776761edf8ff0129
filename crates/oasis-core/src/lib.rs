//! # Oasis Core
//!
//! Deterministic fixed-step simulation for a top-down action adventure.
//!
//! This crate runs the player, enemies and guardians of one room at a time,
//! implementing the Entity-Plugin-Resolver architecture on top of the
//! [`loam`] tile and collision substrate.
//!
//! ## Architecture
//!
//! - **Entities**: Player, enemies, guardians
//! - **Plugins**: Player control, enemy AI (chase / wander / ranged attack)
//! - **Resolvers**: Motion (collision-aware), combat (hitboxes, contact damage), loot
//! - **World**: Rooms, portals, progression flags, room transitions
//!
//! ## Usage
//!
//! ```
//! use oasis_core::{InputSnapshot, Simulation, World};
//!
//! let world = World::from_json(r##########"{
//!     "start": "meadow",
//!     "rooms": [{ "id": "meadow", "rows": ["#####", "#...#", "#...#", "#####"] }]
//! }"##########)?;
//!
//! let mut sim = Simulation::new(world, 1);
//! sim.step(InputSnapshot::DOWN | InputSnapshot::ATTACK);
//!
//! let frame = sim.frame();
//! assert_eq!(frame.tick, 1);
//! assert_eq!(frame.room.as_str(), "meadow");
//! # Ok::<(), oasis_core::WorldError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub use loam;

pub mod arena;
pub mod banner;
pub mod config;
pub mod entity;
pub mod frame;
pub mod hitbox;
pub mod input;
pub mod output;
pub mod plugin;
pub mod plugins;
pub mod resolver;
pub mod room;
pub mod simulation;
pub mod transition;
pub mod world;
pub mod world_view;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use arena::Arena;
pub use config::SimConfig;
pub use frame::{FrameView, GameOutcome};
pub use input::InputSnapshot;
pub use output::Event;
pub use simulation::Simulation;
pub use world::{World, WorldDef, WorldError};

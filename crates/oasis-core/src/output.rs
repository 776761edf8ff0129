//! Plugin outputs and resolver events.
//!
//! Plugins never mutate state. They emit [`Output`]s, proposals that the
//! resolution phase validates and applies:
//!
//! - [`Command`]: motion and AI bookkeeping (velocity, facing, wander rolls)
//! - [`Action`]: combat intents (start an attack)
//!
//! Every output is wrapped in an [`OutputEnvelope`] recording which plugin
//! instance produced it, so the resolution order can be made deterministic.
//!
//! Resolvers in turn record [`Event`]s describing what actually happened
//! (hits, deaths, pickups, room changes). Events are the simulation's
//! outward-facing journal.
//!
//! # Example
//!
//! ```
//! use oasis_core::output::{Command, Output, OutputEnvelope, OutputKind, PluginId, PluginInstanceId, TraceId};
//! use oasis_core::entity::EntityId;
//! use glam::Vec2;
//!
//! let envelope = OutputEnvelope::new(
//!     Output::Command(Command::Move {
//!         target: EntityId::new(1),
//!         velocity: Vec2::new(220.0, 0.0),
//!     }),
//!     PluginInstanceId::new(EntityId::new(1), PluginId::from_static("player_control")),
//!     TraceId::new(42),
//!     100,
//!     0,
//! );
//!
//! assert_eq!(envelope.kind(), OutputKind::Command);
//! ```

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

use crate::entity::{AiMode, EntityId, EntityTag, Facing};
use crate::room::RoomId;

// =============================================================================
// Plugin Identification Types
// =============================================================================

/// Registered name of a plugin type.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PluginId(Cow<'static, str>);

impl PluginId {
    /// Plugin id from an owned or borrowed string.
    #[must_use]
    pub fn new(id: &str) -> Self {
        Self(Cow::Owned(id.to_string()))
    }

    /// Plugin id from a static string, usable in `const` contexts.
    #[must_use]
    pub const fn from_static(id: &'static str) -> Self {
        Self(Cow::Borrowed(id))
    }

    /// The id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PluginId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PluginId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// One plugin running on one entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PluginInstanceId {
    entity_id: EntityId,
    plugin_id: PluginId,
}

impl PluginInstanceId {
    /// Create an instance id.
    #[must_use]
    pub fn new(entity_id: EntityId, plugin_id: PluginId) -> Self {
        Self {
            entity_id,
            plugin_id,
        }
    }

    /// Entity the plugin ran on.
    #[must_use]
    pub const fn entity_id(&self) -> EntityId {
        self.entity_id
    }

    /// Plugin type.
    #[must_use]
    pub fn plugin_id(&self) -> &PluginId {
        &self.plugin_id
    }
}

impl fmt::Display for PluginInstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.plugin_id, self.entity_id)
    }
}

/// Deterministic per-(tick, entity, plugin) identifier.
///
/// Also seeds the plugin's random stream, so two runs with the same master
/// seed draw the same numbers regardless of thread scheduling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TraceId(u64);

impl TraceId {
    /// Wrap a raw trace id.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Raw value.
    #[must_use]
    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "trace:{}", self.0)
    }
}

// =============================================================================
// Output Categories
// =============================================================================

/// Motion and AI state changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Set velocity (px/s). The motion resolver integrates and collides it.
    Move {
        /// Entity to move
        target: EntityId,
        /// New velocity
        velocity: Vec2,
    },
    /// Turn to face a direction.
    Face {
        /// Entity to turn
        target: EntityId,
        /// New facing
        facing: Facing,
    },
    /// Replace the wander direction and its duration.
    Wander {
        /// Enemy to update
        target: EntityId,
        /// Unit direction
        direction: Vec2,
        /// Ticks to hold it
        ticks: u32,
    },
    /// Switch chase / wander mode.
    SetAiMode {
        /// Enemy to update
        target: EntityId,
        /// New mode
        mode: AiMode,
    },
}

impl Command {
    /// Entity the command applies to.
    #[must_use]
    pub const fn target(&self) -> EntityId {
        match self {
            Self::Move { target, .. }
            | Self::Face { target, .. }
            | Self::Wander { target, .. }
            | Self::SetAiMode { target, .. } => *target,
        }
    }
}

/// Combat intents. Gated by the combat resolver, never trusted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Action {
    /// Start the source's attack if its cooldown allows.
    StartAttack {
        /// Attacker
        source: EntityId,
        /// Aim vector for projectiles; melee uses facing.
        aim: Option<Vec2>,
    },
}

impl Action {
    /// Entity performing the action.
    #[must_use]
    pub const fn source(&self) -> EntityId {
        match self {
            Self::StartAttack { source, .. } => *source,
        }
    }
}

// =============================================================================
// Top-Level Output Enum
// =============================================================================

/// Output kind for resolver routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutputKind {
    /// [`Command`] outputs
    Command,
    /// [`Action`] outputs
    Action,
}

impl fmt::Display for OutputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Command => write!(f, "Command"),
            Self::Action => write!(f, "Action"),
        }
    }
}

/// A plugin output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Output {
    /// Motion / AI command
    Command(Command),
    /// Combat intent
    Action(Action),
}

impl Output {
    /// Routing kind.
    #[must_use]
    pub const fn kind(&self) -> OutputKind {
        match self {
            Self::Command(_) => OutputKind::Command,
            Self::Action(_) => OutputKind::Action,
        }
    }

    /// The command, if this is one.
    #[must_use]
    pub const fn as_command(&self) -> Option<&Command> {
        match self {
            Self::Command(cmd) => Some(cmd),
            Self::Action(_) => None,
        }
    }

    /// The action, if this is one.
    #[must_use]
    pub const fn as_action(&self) -> Option<&Action> {
        match self {
            Self::Action(action) => Some(action),
            Self::Command(_) => None,
        }
    }
}

impl From<Command> for Output {
    fn from(cmd: Command) -> Self {
        Self::Command(cmd)
    }
}

impl From<Action> for Output {
    fn from(action: Action) -> Self {
        Self::Action(action)
    }
}

// =============================================================================
// Output Envelope
// =============================================================================

/// An output plus the metadata needed to order it deterministically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputEnvelope {
    output: Output,
    source: PluginInstanceId,
    trace_id: TraceId,
    tick: u64,
    sequence: u32,
}

impl OutputEnvelope {
    /// Wrap an output.
    #[must_use]
    pub fn new(
        output: Output,
        source: PluginInstanceId,
        trace_id: TraceId,
        tick: u64,
        sequence: u32,
    ) -> Self {
        Self {
            output,
            source,
            trace_id,
            tick,
            sequence,
        }
    }

    /// The wrapped output.
    #[must_use]
    pub fn output(&self) -> &Output {
        &self.output
    }

    /// Plugin instance that emitted it.
    #[must_use]
    pub fn source(&self) -> &PluginInstanceId {
        &self.source
    }

    /// Trace id of the emitting run.
    #[must_use]
    pub const fn trace_id(&self) -> TraceId {
        self.trace_id
    }

    /// Tick it was emitted on.
    #[must_use]
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Position within the emitting plugin's output list.
    #[must_use]
    pub const fn sequence(&self) -> u32 {
        self.sequence
    }

    /// Routing kind of the wrapped output.
    #[must_use]
    pub const fn kind(&self) -> OutputKind {
        self.output.kind()
    }
}

// =============================================================================
// Events
// =============================================================================

/// Something that happened during a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// An attack window opened.
    AttackStarted {
        /// Attacker
        source: EntityId,
    },
    /// A hitbox or contact damaged a target.
    Hit {
        /// Hitbox owner or touching enemy
        source: EntityId,
        /// Entity hit
        target: EntityId,
        /// Damage applied
        damage: u32,
        /// Target health afterwards
        remaining_hp: u32,
    },
    /// A non-player entity died.
    Died {
        /// Entity that died
        entity: EntityId,
        /// Its tag
        tag: EntityTag,
    },
    /// A boss died; its progression flag (if any) should be set.
    BossDefeated {
        /// Boss entity
        entity: EntityId,
        /// Flag to set
        unlocks: Option<String>,
        /// Spawn table slot, so the boss is not respawned
        spawn_slot: usize,
    },
    /// Player health reached zero.
    PlayerFainted {
        /// Player entity
        entity: EntityId,
    },
    /// The player picked something up.
    PickupCollected {
        /// Value of the pickup
        value: u32,
        /// Inventory total afterwards
        total: u32,
    },
    /// An enemy switched between chase and wander.
    AiModeChanged {
        /// Enemy
        entity: EntityId,
        /// New mode
        mode: AiMode,
    },
    /// The active room changed.
    RoomEntered {
        /// Room now active
        room: RoomId,
    },
    /// A gated portal refused entry.
    TransitionDenied {
        /// Room the player stayed in
        room: RoomId,
        /// Message shown to the player
        message: String,
    },
    /// The player reached a finish portal.
    Victory,
}

// =============================================================================
// Tests
// =============================================================================

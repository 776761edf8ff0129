//! Plugin system for the Entity-Plugin-Resolver loop.
//!
//! Plugins are the decision phase: they read a frozen [`WorldView`] and emit
//! [`Output`]s proposing changes. They never mutate state, so every plugin
//! for every entity can run in parallel.
//!
//! Each plugin declares:
//! - Its unique identifier ([`PluginId`])
//! - The entity tags it runs on
//! - The components it reads (for `WorldView` scoping)
//! - The output kinds it emits
//!
//! # Example
//!
//! ```
//! use oasis_core::plugin::{ComponentKind, Plugin, PluginContext, PluginDeclaration, PluginId, PluginRegistry};
//! use oasis_core::world_view::WorldView;
//! use oasis_core::output::{Output, OutputKind};
//! use oasis_core::entity::EntityTag;
//! use std::sync::Arc;
//!
//! struct Idle {
//!     declaration: PluginDeclaration,
//! }
//!
//! impl Plugin for Idle {
//!     fn declaration(&self) -> &PluginDeclaration {
//!         &self.declaration
//!     }
//!
//!     fn run(&self, _ctx: &PluginContext, _view: &WorldView) -> Vec<Output> {
//!         Vec::new()
//!     }
//! }
//!
//! let mut registry = PluginRegistry::new();
//! registry.register(
//!     EntityTag::Enemy,
//!     Arc::new(Idle {
//!         declaration: PluginDeclaration {
//!             id: PluginId::new("idle"),
//!             required_tags: vec![EntityTag::Enemy],
//!             reads: vec![ComponentKind::Body],
//!             emits: vec![OutputKind::Command],
//!         },
//!     }),
//! );
//! assert_eq!(registry.plugins_for(EntityTag::Enemy).len(), 1);
//! assert!(registry.plugins_for(EntityTag::Boss).is_empty());
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::config::SimConfig;
use crate::entity::{EntityId, EntityTag};
use crate::output::{Output, OutputKind, TraceId};
use crate::world_view::WorldView;

pub use crate::output::PluginId;

// =============================================================================
// Component Kind
// =============================================================================

/// Component groups a plugin may read through its [`WorldView`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComponentKind {
    /// Rectangle, velocity, facing
    Body,
    /// Health, timers, attack profile
    Combat,
    /// Chase / wander state
    Ai,
    /// Collected items
    Inventory,
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Body => write!(f, "Body"),
            Self::Combat => write!(f, "Combat"),
            Self::Ai => write!(f, "Ai"),
            Self::Inventory => write!(f, "Inventory"),
        }
    }
}

// =============================================================================
// Plugin Declaration
// =============================================================================

/// What a plugin runs on, reads and emits.
#[derive(Debug, Clone)]
pub struct PluginDeclaration {
    /// Unique plugin id; also the secondary output sort key
    pub id: PluginId,
    /// Entity tags this plugin runs on
    pub required_tags: Vec<EntityTag>,
    /// Components accessible through the view
    pub reads: Vec<ComponentKind>,
    /// Output kinds this plugin may emit
    pub emits: Vec<OutputKind>,
}

impl PluginDeclaration {
    /// True if the plugin runs on `tag`.
    #[must_use]
    pub fn supports_tag(&self, tag: EntityTag) -> bool {
        self.required_tags.contains(&tag)
    }

    /// True if `kind` is declared as read.
    #[must_use]
    pub fn reads_component(&self, kind: ComponentKind) -> bool {
        self.reads.contains(&kind)
    }

    /// True if `kind` is declared as emitted.
    #[must_use]
    pub fn emits_output(&self, kind: OutputKind) -> bool {
        self.emits.contains(&kind)
    }
}

// =============================================================================
// Plugin Context
// =============================================================================

/// Per-run context handed to [`Plugin::run`].
#[derive(Debug, Clone, Copy)]
pub struct PluginContext {
    /// Entity the plugin is running on
    pub entity_id: EntityId,
    /// Current tick
    pub tick: u64,
    /// Deterministic id of this run
    pub trace_id: TraceId,
}

impl PluginContext {
    /// Random stream for this run.
    ///
    /// Seeded from the trace id, so it depends only on the master seed, the
    /// tick, the entity and the plugin slot.
    #[must_use]
    pub fn rng(&self) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.trace_id.as_u64())
    }
}

// =============================================================================
// Plugin Trait
// =============================================================================

/// Decision logic for one aspect of an entity.
pub trait Plugin: Send + Sync {
    /// Static declaration.
    fn declaration(&self) -> &PluginDeclaration;

    /// Read the view and propose outputs.
    fn run(&self, ctx: &PluginContext, view: &WorldView) -> Vec<Output>;
}

// =============================================================================
// Plugin Registry
// =============================================================================

/// Plugins bundled by entity tag.
#[derive(Default)]
pub struct PluginRegistry {
    bundles: HashMap<EntityTag, Vec<Arc<dyn Plugin>>>,
}

impl PluginRegistry {
    /// Empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            bundles: HashMap::new(),
        }
    }

    /// Add `plugin` to the bundle for `tag`. Bundles run in registration order.
    pub fn register(&mut self, tag: EntityTag, plugin: Arc<dyn Plugin>) {
        self.bundles.entry(tag).or_default().push(plugin);
    }

    /// Plugins for `tag`, empty if none are registered.
    #[must_use]
    pub fn plugins_for(&self, tag: EntityTag) -> &[Arc<dyn Plugin>] {
        self.bundles.get(&tag).map_or(&[], Vec::as_slice)
    }

    /// Total registrations across all tags.
    #[must_use]
    pub fn registration_count(&self) -> usize {
        self.bundles.values().map(Vec::len).sum()
    }

    /// True if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bundles.values().all(Vec::is_empty)
    }

    /// Standard bundles with default tuning.
    #[must_use]
    pub fn default_bundles() -> Self {
        Self::for_config(&SimConfig::default())
    }

    /// Standard bundles: player control for the player, AI for enemies and
    /// bosses.
    #[must_use]
    pub fn for_config(config: &SimConfig) -> Self {
        use crate::plugins::{EnemyAiPlugin, PlayerControlPlugin};

        let mut registry = Self::new();
        registry.register(
            EntityTag::Player,
            Arc::new(PlayerControlPlugin::new(config.lock_movement_while_attacking)),
        );
        let ai: Arc<dyn Plugin> = Arc::new(EnemyAiPlugin::new());
        registry.register(EntityTag::Enemy, Arc::clone(&ai));
        registry.register(EntityTag::Boss, ai);
        registry
    }
}

impl fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginRegistry")
            .field("bundle_count", &self.bundles.len())
            .field("registration_count", &self.registration_count())
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================

//! Simulation module with the fixed-step execution loop.
//!
//! The `Simulation` struct orchestrates the Entity-Plugin-Resolver architecture
//! through a deterministic execution loop:
//!
//! 1. **SNAPSHOT**: Freeze current state and the tick's input
//! 2. **PLUGIN**: Execute player control and enemy AI in parallel, collecting outputs
//! 3. **RESOLUTION**: Clone current to next, run motion, combat and loot resolvers,
//!    then compact dead entities
//! 4. **APPLY**: Swap buffers, advance tick
//! 5. **WORLD**: Apply journaled consequences (progression flags, fainting),
//!    then check the player against the room's portals
//!
//! # Determinism
//!
//! The simulation guarantees deterministic execution:
//! - Plugins are executed in parallel but their outputs are sorted deterministically
//! - Entities are iterated in ID order (via `BTreeMap`)
//! - Trace IDs, and the wander rolls seeded from them, derive from the master seed
//!
//! # Example
//!
//! ```
//! use oasis_core::simulation::Simulation;
//! use oasis_core::input::InputSnapshot;
//! use oasis_core::world::World;
//!
//! let world = World::from_json(r##########"{
//!     "start": "meadow",
//!     "rooms": [{ "id": "meadow", "rows": ["#######", "#.....#", "#.....#", "#######"] }]
//! }"##########).unwrap();
//!
//! let mut sim = Simulation::new(world, 42);
//! for _ in 0..10 {
//!     sim.step(InputSnapshot::RIGHT);
//! }
//!
//! assert_eq!(sim.tick(), 10);
//! ```

use rayon::prelude::*;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use glam::Vec2;
use loam::Rect;
use tracing::{debug, info};

use crate::arena::Arena;
use crate::banner::Banner;
use crate::config::SimConfig;
use crate::entity::{Entity, EntityInner};
use crate::frame::{FrameView, GameOutcome};
use crate::input::InputSnapshot;
use crate::output::{Event, OutputEnvelope, PluginInstanceId, TraceId};
use crate::plugin::{PluginContext, PluginRegistry};
use crate::resolver::{CombatResolver, CombatRules, LootResolver, MotionResolver, Resolver};
use crate::transition::{check_transition, TransitionOutcome};
use crate::world::World;
use crate::world_view::WorldView;

// =============================================================================
// Simulation
// =============================================================================

/// The main simulation orchestrator.
///
/// `Simulation` manages:
/// - Current and next arena state (double-buffered)
/// - Plugin registry for entity-to-plugin mapping
/// - Resolvers for output processing
/// - The world: rooms, the active room and progression flags
/// - The message banner and the events of the last step
///
/// # Double Buffering
///
/// The simulation uses two arenas:
/// - `current`: Read-only snapshot for plugin execution
/// - `next`: Mutable state that resolvers write to
///
/// After each tick, the buffers are swapped to avoid copying.
pub struct Simulation {
    /// Current arena state (read-only during plugin phase).
    current: Arena,
    /// Next arena state (written to by resolvers).
    next: Arena,
    /// Registry of plugins organized by entity tag.
    plugins: PluginRegistry,
    /// Resolvers that process plugin outputs, in run order.
    resolvers: Vec<Box<dyn Resolver>>,
    /// Master seed for deterministic trace ID generation.
    master_seed: u64,
    /// Rooms and progression.
    world: World,
    /// Tuning, copied from the world.
    config: SimConfig,
    /// Portal the player arrived on or used, until they step off it.
    standing_on: Option<usize>,
    /// Gated portal whose refusal has already been shown.
    refused_at: Option<usize>,
    /// Message on screen.
    banner: Option<Banner>,
    /// Events since the last [`Simulation::take_events`].
    events: Vec<Event>,
    /// Run state.
    outcome: GameOutcome,
}

impl fmt::Debug for Simulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Simulation")
            .field("current", &self.current)
            .field("plugins", &self.plugins)
            .field("resolvers", &format!("[{} resolvers]", self.resolvers.len()))
            .field("master_seed", &self.master_seed)
            .field("room", &self.world.current_room().id)
            .field("banner", &self.banner)
            .field("outcome", &self.outcome)
            .finish_non_exhaustive()
    }
}

impl Simulation {
    /// Start a run in `world`'s start room with the given master seed.
    ///
    /// The player spawns at the start room's entry point and the room's
    /// spawn table is populated. Tuning comes from the world's config.
    #[must_use]
    pub fn new(world: World, seed: u64) -> Self {
        let config = world.config().clone();
        let mut current = Arena::new();
        let room = Arc::clone(world.current_room());
        current.spawn(EntityInner::Player(config.player.build(room.entry)));
        world.populate(&mut current);

        let standing_on = current.player().and_then(|p| room.portal_at(&p.body().rect));
        let banner = Some(match &room.intro {
            Some(intro) => Banner::new(intro.clone(), config.banners.intro),
            None => Banner::new(format!("Entered: {}", room.name), config.banners.room_entered),
        });
        info!(room = %room.id, seed, "simulation started");

        Self {
            next: current.clone(),
            current,
            plugins: PluginRegistry::for_config(&config),
            resolvers: vec![
                Box::new(MotionResolver::from_config(&config)),
                Box::new(CombatResolver::with_rules(CombatRules::from(&config))),
                Box::new(LootResolver::new()),
            ],
            master_seed: seed,
            world,
            config,
            standing_on,
            refused_at: None,
            banner,
            events: Vec::new(),
            outcome: GameOutcome::Playing,
        }
    }

    /// Executes one fixed tick with `input` held.
    ///
    /// # Execution Phases
    ///
    /// 1. **SNAPSHOT**: The input is stored on the current arena, which is
    ///    then immutable for the plugin phase.
    ///
    /// 2. **PLUGIN**: All plugins for all entities are executed in parallel.
    ///    Each plugin reads from a `WorldView` scoped to its declared components
    ///    and emits `Output`s wrapped in `OutputEnvelope`s.
    ///
    /// 3. **RESOLUTION**: The next arena is cloned from current. Motion, combat
    ///    and loot resolvers run in that order; dead entities are compacted
    ///    once all hit-tests are done.
    ///
    /// 4. **APPLY**: The current and next arenas are swapped and the tick
    ///    counter is advanced.
    ///
    /// 5. **WORLD**: Journaled events update progression and respawn a fainted
    ///    player, then the player's final position is checked against portals.
    ///
    /// Once the finish portal has been reached the world is frozen: steps
    /// only count down the banner.
    pub fn step(&mut self, input: InputSnapshot) {
        self.tick_banner();
        if self.outcome == GameOutcome::Victory {
            return;
        }

        // PHASE 1: SNAPSHOT
        self.current.set_input(input);
        let tick = self.current.current_tick();

        // PHASE 2: PLUGIN - execute all plugins in parallel
        let outputs = self.execute_plugins_parallel(tick);

        // PHASE 3: RESOLUTION - clone current to next, run resolvers
        self.next.clone_from(&self.current);
        for resolver in &self.resolvers {
            let relevant: Vec<_> = outputs
                .iter()
                .filter(|o| resolver.handles().contains(&o.output().kind()))
                .collect();
            resolver.resolve(&relevant, &self.current, &mut self.next);
        }
        self.next.compact();

        // PHASE 4: APPLY - swap buffers, advance tick
        std::mem::swap(&mut self.current, &mut self.next);
        self.current.advance_tick();

        // PHASE 5: WORLD - consequences, then transitions
        let journal = self.current.drain_journal();
        for event in journal {
            self.apply_event(&event);
            self.events.push(event);
        }
        self.resolve_transition();
    }

    /// Executes all plugins in parallel and collects their outputs.
    ///
    /// Returns envelopes sorted by (`entity_id`, `plugin_id`, sequence).
    fn execute_plugins_parallel(&self, tick: u64) -> Vec<OutputEnvelope> {
        let plugin_instances: Vec<_> = self
            .current
            .live()
            .flat_map(|entity| {
                self.plugins
                    .plugins_for(entity.tag())
                    .iter()
                    .enumerate()
                    .map(move |(idx, plugin)| (entity.id(), idx, Arc::clone(plugin)))
            })
            .collect();

        let mut all_outputs: Vec<OutputEnvelope> = plugin_instances
            .par_iter()
            .flat_map(|(entity_id, plugin_idx, plugin)| {
                let decl = plugin.declaration();
                let view = WorldView::for_plugin(&self.current, decl, tick);
                let trace_id = self.generate_trace_id(tick, entity_id.as_u64(), *plugin_idx as u64);

                let ctx = PluginContext {
                    entity_id: *entity_id,
                    tick,
                    trace_id,
                };

                // Plugins emit a handful of outputs per tick; u32 is plenty.
                #[allow(clippy::cast_possible_truncation)]
                let envelopes = plugin
                    .run(&ctx, &view)
                    .into_iter()
                    .enumerate()
                    .map(|(seq, output)| {
                        OutputEnvelope::new(
                            output,
                            PluginInstanceId::new(*entity_id, decl.id.clone()),
                            trace_id,
                            tick,
                            seq as u32,
                        )
                    })
                    .collect::<Vec<_>>();
                envelopes
            })
            .collect();

        // CRITICAL: Sort for determinism
        all_outputs.sort_by(|a, b| {
            a.source()
                .entity_id()
                .cmp(&b.source().entity_id())
                .then_with(|| a.source().plugin_id().as_str().cmp(b.source().plugin_id().as_str()))
                .then_with(|| a.sequence().cmp(&b.sequence()))
        });

        all_outputs
    }

    /// Hash of (seed, tick, entity, plugin index).
    fn generate_trace_id(&self, tick: u64, entity: u64, plugin: u64) -> TraceId {
        let mut hasher = DefaultHasher::new();
        self.master_seed.hash(&mut hasher);
        tick.hash(&mut hasher);
        entity.hash(&mut hasher);
        plugin.hash(&mut hasher);
        TraceId::new(hasher.finish())
    }

    // -------------------------------------------------------------------------
    // World phase
    // -------------------------------------------------------------------------

    fn apply_event(&mut self, event: &Event) {
        let banners = self.config.banners;
        match event {
            Event::Hit { target, remaining_hp, .. } if Some(*target) == self.current.player_id() => {
                if *remaining_hp > 0 {
                    self.show("Ouch! Watch your step.", banners.hurt);
                }
            }
            Event::BossDefeated { unlocks, spawn_slot, .. } => {
                if let Some(flag) = unlocks {
                    self.world.set_flag(flag.clone());
                }
                self.world.mark_defeated(*spawn_slot);
                let name = self.world.current_room().name.clone();
                debug!(room = %self.world.current_room().id, flag = ?unlocks, slot = spawn_slot, "progression updated");
                self.show(format!("{name} guardian defeated! Portal unlocked."), banners.boss_defeated);
            }
            Event::PlayerFainted { .. } => {
                let entry = self.world.current_room().entry;
                if let Some(player) = self.current.player_mut() {
                    player.combat_mut().restore();
                    place_at(player, entry);
                }
                self.current.hitboxes_mut().clear();
                self.standing_on = self.portal_under_player();
                self.refused_at = None;
                debug!(room = %self.world.current_room().id, "player fainted and respawned");
                self.show("You fainted... and woke up at the room entrance.", banners.fainted);
            }
            _ => {}
        }
    }

    fn resolve_transition(&mut self) {
        let Some(rect) = self.current.player().filter(|p| p.is_live()).map(|p| p.body().rect) else {
            return;
        };
        let on = self.world.current_room().portal_at(&rect);
        if self.refused_at != on {
            self.refused_at = None;
        }
        let outcome = check_transition(&self.world, &rect, self.standing_on);
        // A refused portal stays armed so it opens once its flag is set.
        self.standing_on = match outcome {
            TransitionOutcome::Denied { .. } => None,
            _ => on,
        };

        let banners = self.config.banners;
        match outcome {
            TransitionOutcome::None => {}
            TransitionOutcome::Denied { message } => {
                if self.refused_at == on {
                    return;
                }
                self.refused_at = on;
                let room = self.world.current_room().id.clone();
                self.show(message.clone(), banners.locked);
                self.events.push(Event::TransitionDenied { room, message });
            }
            TransitionOutcome::Finish => {
                info!(room = %self.world.current_room().id, tick = self.tick(), "victory");
                self.outcome = GameOutcome::Victory;
                if let Some(player) = self.current.player_mut() {
                    player.body_mut().velocity = Vec2::ZERO;
                }
                self.show("You reached the oasis... The shards glow. You win!", banners.victory);
                self.events.push(Event::Victory);
            }
            TransitionOutcome::Enter { to, arrival, .. } => {
                if !self.world.enter(&to) {
                    return;
                }
                if let Some(player) = self.current.player_mut() {
                    place_at(player, arrival);
                }
                self.world.populate(&mut self.current);
                self.standing_on = self.portal_under_player();
                self.refused_at = None;

                let room = Arc::clone(self.world.current_room());
                info!(room = %room.id, "entered room");
                match &room.intro {
                    Some(intro) => self.show(intro.clone(), banners.intro),
                    None => self.show(format!("Entered: {}", room.name), banners.room_entered),
                }
                self.events.push(Event::RoomEntered { room: room.id.clone() });
            }
        }
    }

    fn portal_under_player(&self) -> Option<usize> {
        let rect = self.current.player()?.body().rect;
        self.world.current_room().portal_at(&rect)
    }

    fn show(&mut self, text: impl Into<String>, ticks: u32) {
        self.banner = Some(Banner::new(text, ticks));
    }

    fn tick_banner(&mut self) {
        if let Some(banner) = &mut self.banner {
            if !banner.tick() {
                self.banner = None;
            }
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// Render snapshot of the current state.
    #[must_use]
    pub fn frame(&self) -> FrameView {
        FrameView::capture(
            &self.current,
            self.world.current_room().id.clone(),
            self.banner.clone(),
            self.outcome,
        )
    }

    /// Events since the last call, in the order they happened.
    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    /// Returns a read-only reference to the current arena state.
    #[must_use]
    pub fn arena(&self) -> &Arena {
        &self.current
    }

    /// Returns a mutable reference to the current arena.
    ///
    /// Use this for setup and tests. Avoid mutating the arena during a step;
    /// use plugins and resolvers instead.
    #[must_use]
    pub fn arena_mut(&mut self) -> &mut Arena {
        &mut self.current
    }

    /// Rooms and progression.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Mutable world, for setup and tests.
    #[must_use]
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Returns the current simulation tick.
    #[must_use]
    pub fn tick(&self) -> u64 {
        self.current.current_tick()
    }

    /// Returns the master seed.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.master_seed
    }

    /// Message on screen, if any.
    #[must_use]
    pub fn banner(&self) -> Option<&Banner> {
        self.banner.as_ref()
    }

    /// Run state.
    #[must_use]
    pub fn outcome(&self) -> GameOutcome {
        self.outcome
    }

    /// Returns a mutable reference to the plugin registry.
    ///
    /// Replacing plugins lets tests drive entities directly.
    #[must_use]
    pub fn plugins_mut(&mut self) -> &mut PluginRegistry {
        &mut self.plugins
    }
}

fn place_at(entity: &mut Entity, center: Vec2) {
    let body = entity.body_mut();
    body.rect = Rect::centered(center, body.rect.size());
    body.velocity = Vec2::ZERO;
}

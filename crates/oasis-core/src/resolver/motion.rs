//! Motion resolver: movement commands and collision-aware integration.
//!
//! Handles:
//! - `Move`: set velocity
//! - `Face`: set facing
//! - `Wander`: replace the wander direction and timer
//! - `SetAiMode`: switch chase / wander
//!
//! Then every live entity is moved by `velocity * dt` through
//! [`loam::move_and_collide`] against the active room's grid and obstacles.
//! Entities never collide with each other.

use std::sync::Arc;

use glam::Vec2;
use tracing::warn;

use crate::arena::Arena;
use crate::config::SimConfig;
use crate::entity::{AiMode, EntityId};
use crate::output::{Command, Event, OutputEnvelope, OutputKind};

use super::Resolver;

/// Resolver for movement commands and integration.
///
/// # Processing Order
///
/// 1. Apply commands in output order (last write wins per field)
/// 2. Integrate live entities in id order, X then Y, against the room
/// 3. Bounce wander direction off blocked axes, count down wander timers
/// 4. Advance walk cycles
///
/// # Example
///
/// ```
/// use oasis_core::resolver::{MotionResolver, Resolver};
/// use oasis_core::output::OutputKind;
///
/// let resolver = MotionResolver::new();
/// assert!(resolver.handles().contains(&OutputKind::Command));
/// ```
#[derive(Debug, Clone)]
pub struct MotionResolver {
    dt: f32,
    walk_ticks_per_frame: u32,
}

impl Default for MotionResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl MotionResolver {
    /// Resolver with the default timestep and walk speed.
    #[must_use]
    pub fn new() -> Self {
        Self::from_config(&SimConfig::default())
    }

    /// Resolver using the config's tick rate and walk animation speed.
    #[must_use]
    pub fn from_config(config: &SimConfig) -> Self {
        Self {
            dt: config.dt(),
            walk_ticks_per_frame: config.walk_ticks_per_frame,
        }
    }

    /// Resolver with a custom timestep.
    #[must_use]
    pub fn with_dt(dt: f32) -> Self {
        Self {
            dt,
            ..Self::new()
        }
    }

    /// Seconds per tick.
    #[must_use]
    pub fn dt(&self) -> f32 {
        self.dt
    }

    fn apply_command(next: &mut Arena, command: &Command) {
        let target = command.target();
        let Some(entity) = next.get_mut(target) else {
            warn!(%target, "command for unknown entity");
            return;
        };
        match command {
            Command::Move { velocity, .. } => {
                entity.body_mut().velocity = if velocity.is_finite() { *velocity } else { Vec2::ZERO };
            }
            Command::Face { facing, .. } => {
                entity.body_mut().facing = *facing;
            }
            Command::Wander { direction, ticks, .. } => {
                if let Some(enemy) = entity.as_enemy_mut() {
                    enemy.ai.wander_dir = *direction;
                    enemy.ai.wander_ticks = *ticks;
                }
            }
            Command::SetAiMode { mode, .. } => {
                let mut changed = false;
                if let Some(enemy) = entity.as_enemy_mut() {
                    changed = enemy.ai.mode != *mode;
                    enemy.ai.mode = *mode;
                }
                if changed {
                    next.record(Event::AiModeChanged {
                        entity: target,
                        mode: *mode,
                    });
                }
            }
        }
    }

    fn integrate(&self, next: &mut Arena) {
        let room = next.room().map(Arc::clone);
        let ids: Vec<EntityId> = next.live().map(|e| e.id()).collect();

        for id in ids {
            let Some(entity) = next.get_mut(id) else {
                continue;
            };
            let body = entity.body_mut();
            let delta = body.velocity * self.dt;
            let moving = delta != Vec2::ZERO;

            let (blocked_x, blocked_y) = match &room {
                Some(room) => {
                    let resolved = loam::move_and_collide(body.rect, delta, &room.grid, &room.obstacles);
                    body.rect = resolved.rect;
                    (resolved.blocked_x, resolved.blocked_y)
                }
                None => {
                    body.rect = body.rect.translate(delta);
                    (false, false)
                }
            };

            if let Some(enemy) = entity.as_enemy_mut() {
                if enemy.ai.mode == AiMode::Wander {
                    if blocked_x {
                        enemy.ai.wander_dir.x = -enemy.ai.wander_dir.x;
                    }
                    if blocked_y {
                        enemy.ai.wander_dir.y = -enemy.ai.wander_dir.y;
                    }
                }
                enemy.ai.wander_ticks = enemy.ai.wander_ticks.saturating_sub(1);
            }

            entity.walk_mut().advance(moving, self.walk_ticks_per_frame);
        }
    }
}

impl Resolver for MotionResolver {
    fn handles(&self) -> &[OutputKind] {
        &[OutputKind::Command]
    }

    fn resolve(&self, outputs: &[&OutputEnvelope], _current: &Arena, next: &mut Arena) {
        for envelope in outputs {
            if let Some(command) = envelope.output().as_command() {
                Self::apply_command(next, command);
            }
        }
        self.integrate(next);
    }
}

//! Enemy and boss decision making.
//!
//! Re-evaluated every tick with no hysteresis:
//! - **Chase** when the player's centre is closer than the aggro radius:
//!   head straight for it at full speed.
//! - **Wander** otherwise: hold a random unit direction for a random number
//!   of ticks at a fraction of full speed, then roll again.
//!
//! Enemies with an attack profile also fire at the player whenever it is in
//! range and the attack is off cooldown, regardless of mode.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use crate::entity::{AiMode, EntityTag, Facing};
use crate::output::{Action, Command, Output, OutputKind, PluginId};
use crate::plugin::{ComponentKind, Plugin, PluginContext, PluginDeclaration};
use crate::world_view::WorldView;

/// Chase / wander AI shared by enemies and bosses.
pub struct EnemyAiPlugin {
    declaration: PluginDeclaration,
}

impl EnemyAiPlugin {
    /// Creates the plugin.
    #[must_use]
    pub fn new() -> Self {
        Self {
            declaration: PluginDeclaration {
                id: PluginId::from_static("enemy_ai"),
                required_tags: vec![EntityTag::Enemy, EntityTag::Boss],
                reads: vec![ComponentKind::Body, ComponentKind::Combat, ComponentKind::Ai],
                emits: vec![OutputKind::Command, OutputKind::Action],
            },
        }
    }
}

impl Default for EnemyAiPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for EnemyAiPlugin {
    fn declaration(&self) -> &PluginDeclaration {
        &self.declaration
    }

    fn run(&self, ctx: &PluginContext, view: &WorldView) -> Vec<Output> {
        let id = ctx.entity_id;
        let (Some(body), Some(combat), Some(ai)) =
            (view.get_body(id), view.get_combat(id), view.get_ai(id))
        else {
            return Vec::new();
        };

        let to_player = view
            .player_id()
            .and_then(|player| view.get_body(player))
            .map(|player| player.center() - body.center());

        let mode = match to_player {
            Some(to) if to.length() < ai.aggro_radius => AiMode::Chase,
            _ => AiMode::Wander,
        };

        let mut outputs = Vec::new();
        if mode != ai.mode {
            outputs.push(Output::Command(Command::SetAiMode { target: id, mode }));
        }

        let velocity = match (mode, to_player) {
            (AiMode::Chase, Some(to)) => to.normalize_or_zero() * body.speed,
            _ => {
                let mut direction = ai.wander_dir;
                if ai.wander_ticks == 0 {
                    let mut rng = ctx.rng();
                    let angle = rng.gen_range(0.0..TAU);
                    let (lo, hi) = ai.wander_range;
                    let ticks = rng.gen_range(lo.min(hi)..=hi.max(lo));
                    direction = Vec2::from_angle(angle);
                    outputs.push(Output::Command(Command::Wander {
                        target: id,
                        direction,
                        ticks,
                    }));
                }
                direction * body.speed * ai.wander_factor
            }
        };

        outputs.push(Output::Command(Command::Move { target: id, velocity }));

        if let Some(facing) = Facing::from_vector(velocity) {
            if facing != body.facing {
                outputs.push(Output::Command(Command::Face { target: id, facing }));
            }
        }

        if let (Some(profile), Some(to)) = (combat.attack, to_player) {
            if combat.can_attack() && to.length() <= profile.range {
                outputs.push(Output::Action(Action::StartAttack {
                    source: id,
                    aim: Some(to),
                }));
            }
        }

        outputs
    }
}

// =============================================================================
// Tests
// =============================================================================

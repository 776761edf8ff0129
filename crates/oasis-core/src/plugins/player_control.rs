//! Player control from the per-tick input snapshot.
//!
//! Held directions are summed and normalized, so diagonal movement is no
//! faster than cardinal movement. Facing follows the dominant axis of the
//! latest non-zero input and is left alone when no direction is held.
//!
//! Holding attack emits a `StartAttack` every tick; the combat resolver
//! ignores it while the cooldown runs.

use glam::Vec2;

use crate::entity::{AttackPhase, EntityTag, Facing};
use crate::output::{Action, Command, Output, OutputKind, PluginId};
use crate::plugin::{ComponentKind, Plugin, PluginContext, PluginDeclaration};
use crate::world_view::WorldView;

/// Input-driven movement and sword attacks.
///
/// # Example
///
/// ```
/// use oasis_core::plugins::PlayerControlPlugin;
/// use oasis_core::plugin::Plugin;
///
/// let plugin = PlayerControlPlugin::new(true);
/// assert_eq!(plugin.declaration().id.as_str(), "player_control");
/// ```
pub struct PlayerControlPlugin {
    declaration: PluginDeclaration,
    lock_while_attacking: bool,
}

impl PlayerControlPlugin {
    /// Creates the plugin. With `lock_while_attacking`, movement input is
    /// ignored while the sword is out.
    #[must_use]
    pub fn new(lock_while_attacking: bool) -> Self {
        Self {
            declaration: PluginDeclaration {
                id: PluginId::from_static("player_control"),
                required_tags: vec![EntityTag::Player],
                reads: vec![ComponentKind::Body, ComponentKind::Combat],
                emits: vec![OutputKind::Command, OutputKind::Action],
            },
            lock_while_attacking,
        }
    }
}

impl Default for PlayerControlPlugin {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Plugin for PlayerControlPlugin {
    fn declaration(&self) -> &PluginDeclaration {
        &self.declaration
    }

    fn run(&self, ctx: &PluginContext, view: &WorldView) -> Vec<Output> {
        let id = ctx.entity_id;
        let (Some(body), Some(combat)) = (view.get_body(id), view.get_combat(id)) else {
            return Vec::new();
        };
        let input = view.input();

        let locked = self.lock_while_attacking && combat.phase() == AttackPhase::Active;
        let direction = if locked { Vec2::ZERO } else { input.direction() };

        let mut outputs = vec![Output::Command(Command::Move {
            target: id,
            velocity: direction * body.speed,
        })];

        if let Some(facing) = Facing::from_vector(direction) {
            if facing != body.facing {
                outputs.push(Output::Command(Command::Face { target: id, facing }));
            }
        }

        if input.attack() {
            outputs.push(Output::Action(Action::StartAttack {
                source: id,
                aim: None,
            }));
        }

        outputs
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::Arena;
    use crate::entity::{AttackProfile, BodyState, CombatState, EntityId, EntityInner, PlayerComponents, Team};
    use crate::input::InputSnapshot;
    use crate::output::TraceId;

    fn arena_with_player() -> (Arena, EntityId) {
        let mut arena = Arena::new();
        let player = PlayerComponents {
            body: BodyState::centered(Vec2::new(100.0, 100.0), 36.0, 220.0),
            combat: CombatState::new(6, Team::Hero).with_attack(AttackProfile::sword(48.0)),
            ..PlayerComponents::default()
        };
        let id = arena.spawn(EntityInner::Player(player));
        (arena, id)
    }

    fn run(plugin: &PlayerControlPlugin, arena: &Arena, id: EntityId) -> Vec<Output> {
        let view = WorldView::for_plugin(arena, plugin.declaration(), arena.current_tick());
        let ctx = PluginContext {
            entity_id: id,
            tick: arena.current_tick(),
            trace_id: TraceId::new(0),
        };
        plugin.run(&ctx, &view)
    }

    fn velocity_of(outputs: &[Output]) -> Option<Vec2> {
        outputs.iter().find_map(|o| match o {
            Output::Command(Command::Move { velocity, .. }) => Some(*velocity),
            _ => None,
        })
    }

    mod movement_tests {
        use super::*;

        #[test]
        fn right_moves_at_full_speed_and_turns() {
            let (mut arena, id) = arena_with_player();
            arena.set_input(InputSnapshot::RIGHT);
            let outputs = run(&PlayerControlPlugin::default(), &arena, id);
            assert_eq!(velocity_of(&outputs), Some(Vec2::new(220.0, 0.0)));
            assert!(outputs.contains(&Output::Command(Command::Face {
                target: id,
                facing: Facing::Right
            })));
        }

        #[test]
        fn diagonal_speed_matches_axial() {
            let (mut arena, id) = arena_with_player();
            arena.set_input(InputSnapshot::DOWN | InputSnapshot::LEFT);
            let outputs = run(&PlayerControlPlugin::default(), &arena, id);
            let v = velocity_of(&outputs).unwrap();
            assert!((v.length() - 220.0).abs() < 1e-3);
        }

        #[test]
        fn no_input_stops_without_turning() {
            let (arena, id) = arena_with_player();
            let outputs = run(&PlayerControlPlugin::default(), &arena, id);
            assert_eq!(velocity_of(&outputs), Some(Vec2::ZERO));
            assert_eq!(outputs.len(), 1);
        }

        #[test]
        fn attacking_locks_movement() {
            let (mut arena, id) = arena_with_player();
            if let Some(player) = arena.get_mut(id) {
                player.combat_mut().start_attack();
            }
            arena.set_input(InputSnapshot::UP);
            assert_eq!(velocity_of(&run(&PlayerControlPlugin::new(true), &arena, id)), Some(Vec2::ZERO));
            assert_eq!(
                velocity_of(&run(&PlayerControlPlugin::new(false), &arena, id)),
                Some(Vec2::new(0.0, -220.0))
            );
        }
    }

    #[test]
    fn held_attack_emits_start_attack() {
        let (mut arena, id) = arena_with_player();
        arena.set_input(InputSnapshot::ATTACK);
        let outputs = run(&PlayerControlPlugin::default(), &arena, id);
        assert!(outputs.contains(&Output::Action(Action::StartAttack { source: id, aim: None })));
    }

    #[test]
    fn missing_entity_yields_nothing() {
        let arena = Arena::new();
        assert!(run(&PlayerControlPlugin::default(), &arena, EntityId::new(9)).is_empty());
    }
}

//! Combat resolver: attack windows, hit detection, contact damage.
//!
//! Handles `StartAttack` actions and runs the per-tick combat pass:
//!
//! 1. Tick every live entity's combat timers (cooldown, active window,
//!    invulnerability, hit flash)
//! 2. Start requested attacks whose cooldown allows it and spawn their hitbox
//! 3. Test each active hitbox against every live entity on the other team
//! 4. Apply contact damage from monsters touching the player
//! 5. Advance hitboxes (projectiles travel) and discard expired ones
//!
//! # Death Handling
//!
//! An entity whose health reaches zero is flagged `DEAD` and excluded from
//! everything that follows, including later hitboxes in the same tick. It is
//! not removed here; the simulation compacts dead entities once all resolvers
//! have run. Bosses are additionally flagged `DEFEATED` and stay as markers.

use std::sync::Arc;

use glam::Vec2;
use tracing::{debug, info};

use crate::arena::Arena;
use crate::config::SimConfig;
use crate::entity::{EntityId, HitOutcome, StatusFlags};
use crate::hitbox::AttackHitbox;
use crate::output::{Action, Event, OutputEnvelope, OutputKind};
use crate::room::Room;

use super::Resolver;

/// Numbers the combat pass needs from the global config.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CombatRules {
    /// Player invulnerability after any hit (ticks)
    pub player_invulnerability: u32,
    /// Enemy invulnerability after a hit (ticks)
    pub enemy_invulnerability: u32,
    /// Hit-flash length (ticks)
    pub hit_flash: u32,
    /// Knockback from contact damage (px)
    pub contact_knockback: f32,
    /// Seconds per tick, for projectile travel
    pub dt: f32,
}

impl From<&SimConfig> for CombatRules {
    fn from(config: &SimConfig) -> Self {
        Self {
            player_invulnerability: config.player_invulnerability_ticks,
            enemy_invulnerability: config.enemy_invulnerability_ticks,
            hit_flash: config.hit_flash_ticks,
            contact_knockback: config.contact_knockback,
            dt: config.dt(),
        }
    }
}

impl Default for CombatRules {
    fn default() -> Self {
        Self::from(&SimConfig::default())
    }
}

/// Resolver for attacks and damage.
///
/// # Example
///
/// ```
/// use oasis_core::resolver::{CombatResolver, Resolver};
/// use oasis_core::output::OutputKind;
///
/// let resolver = CombatResolver::new();
/// assert!(resolver.handles().contains(&OutputKind::Action));
/// ```
#[derive(Debug, Clone, Default)]
pub struct CombatResolver {
    rules: CombatRules,
}

impl CombatResolver {
    /// Resolver with default rules.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolver with explicit rules.
    #[must_use]
    pub fn with_rules(rules: CombatRules) -> Self {
        Self { rules }
    }

    /// The rules in use.
    #[must_use]
    pub fn rules(&self) -> &CombatRules {
        &self.rules
    }

    fn tick_timers(next: &mut Arena) {
        for entity in next.entities_sorted_mut().filter(|e| e.is_live()) {
            entity.combat_mut().tick_timers();
        }
    }

    fn start_attack(next: &mut Arena, source: EntityId, aim: Option<Vec2>) {
        let Some(entity) = next.get_mut(source) else {
            return;
        };
        if !entity.is_live() {
            return;
        }
        let Some(profile) = entity.combat_mut().start_attack() else {
            return;
        };
        let team = entity.combat().team;
        let hitbox = AttackHitbox::spawn(source, team, entity.body(), &profile, aim);
        debug!(%source, projectile = hitbox.is_projectile(), "attack started");
        next.push_hitbox(hitbox);
        next.record(Event::AttackStarted { source });
    }

    /// Damage `target` and journal the consequences. Returns `false` if the
    /// hit was ignored (invulnerable or already dead).
    fn apply_hit(
        &self,
        next: &mut Arena,
        room: Option<&Room>,
        source: EntityId,
        target: EntityId,
        damage: u32,
        push: Vec2,
    ) -> bool {
        let Some(entity) = next.get_mut(target) else {
            return false;
        };
        let invulnerability = if entity.is_player() {
            self.rules.player_invulnerability
        } else {
            self.rules.enemy_invulnerability
        };
        let outcome = entity.combat_mut().take_hit(damage, invulnerability);
        if outcome == HitOutcome::Ignored {
            return false;
        }
        entity.combat_mut().hit_flash = self.rules.hit_flash;

        if push != Vec2::ZERO {
            let body = entity.body_mut();
            body.rect = match room {
                Some(room) => loam::move_and_collide(body.rect, push, &room.grid, &room.obstacles).rect,
                None => body.rect.translate(push),
            };
        }

        let tag = entity.tag();
        let is_player = entity.is_player();
        let remaining_hp = entity.combat().hp;
        let boss_unlock = if entity.is_boss() && outcome == HitOutcome::Killed {
            entity.combat_mut().status.insert(StatusFlags::DEFEATED);
            entity.as_enemy().map(|e| (e.unlocks.clone(), e.spawn_slot))
        } else {
            None
        };

        next.record(Event::Hit {
            source,
            target,
            damage,
            remaining_hp,
        });

        if outcome == HitOutcome::Killed {
            if is_player {
                debug!(%target, "player fainted");
                next.record(Event::PlayerFainted { entity: target });
            } else {
                debug!(%target, %tag, "entity died");
                next.record(Event::Died { entity: target, tag });
                if let Some((unlocks, spawn_slot)) = boss_unlock {
                    info!(%target, unlocks = ?unlocks, "guardian defeated");
                    next.record(Event::BossDefeated {
                        entity: target,
                        unlocks,
                        spawn_slot,
                    });
                }
            }
        }
        true
    }

    fn hit_test(&self, next: &mut Arena, room: Option<&Room>) {
        let mut hitboxes = std::mem::take(next.hitboxes_mut());

        for hitbox in &mut hitboxes {
            if !hitbox.is_active() {
                continue;
            }
            let targets: Vec<EntityId> = next
                .live()
                .filter(|e| hitbox.can_hit(e))
                .map(|e| e.id())
                .collect();

            for target in targets {
                let origin = if hitbox.is_projectile() {
                    hitbox.rect.center()
                } else {
                    next.get(hitbox.owner)
                        .map_or_else(|| hitbox.rect.center(), |owner| owner.body().center())
                };
                let Some(target_center) = next.get(target).map(|e| e.body().center()) else {
                    continue;
                };
                let push = (target_center - origin).normalize_or_zero() * hitbox.knockback;

                if self.apply_hit(next, room, hitbox.owner, target, hitbox.damage, push) {
                    hitbox.mark_struck(target);
                    if hitbox.is_projectile() {
                        hitbox.expire();
                        break;
                    }
                }
            }
        }

        next.hitboxes_mut().append(&mut hitboxes);
    }

    fn contact_damage(&self, next: &mut Arena, room: Option<&Room>) {
        let Some((player_id, player_rect)) = next
            .live()
            .find(|e| e.is_player())
            .map(|p| (p.id(), p.body().rect))
        else {
            return;
        };

        let touching: Vec<(EntityId, u32, Vec2)> = next
            .live()
            .filter(|e| !e.is_player() && e.combat().contact_damage > 0)
            .filter(|e| e.body().rect.intersects(&player_rect))
            .map(|e| (e.id(), e.combat().contact_damage, e.body().center()))
            .collect();

        for (source, damage, source_center) in touching {
            let push = (player_rect.center() - source_center).normalize_or_zero()
                * self.rules.contact_knockback;
            self.apply_hit(next, room, source, player_id, damage, push);
        }
    }

    fn advance_hitboxes(&self, next: &mut Arena, room: Option<&Room>) {
        let dt = self.rules.dt;
        next.hitboxes_mut().retain_mut(|hitbox| match room {
            Some(room) => hitbox.step(&room.grid, &room.obstacles, dt),
            None => hitbox.countdown(),
        });
    }
}

impl Resolver for CombatResolver {
    fn handles(&self) -> &[OutputKind] {
        &[OutputKind::Action]
    }

    fn resolve(&self, outputs: &[&OutputEnvelope], _current: &Arena, next: &mut Arena) {
        let room = next.room().map(Arc::clone);
        let room = room.as_deref();

        Self::tick_timers(next);

        for envelope in outputs {
            if let Some(Action::StartAttack { source, aim }) = envelope.output().as_action() {
                Self::start_attack(next, *source, *aim);
            }
        }

        self.hit_test(next, room);
        self.contact_damage(next, room);
        self.advance_hitboxes(next, room);
    }
}

// =============================================================================
// Tests
// =============================================================================

//! Transient attack hitboxes.
//!
//! A hitbox is created when an attack starts and lives for the attack's
//! active window. Melee hitboxes are placed once in front of the attacker and
//! stay put even if the attacker moves. Projectile hitboxes travel at a fixed
//! velocity and expire early when they hit a blocking tile or obstacle.
//!
//! Each hitbox remembers whom it has struck so that a single swing damages a
//! given target at most once, however many ticks they overlap.

use glam::Vec2;
use loam::{move_and_collide, Rect, TileGrid};
use serde::{Deserialize, Serialize};

use crate::entity::{AttackKind, AttackProfile, BodyState, Entity, EntityId, Facing, Team};

/// A live attack area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttackHitbox {
    /// Area in world pixels
    pub rect: Rect,
    /// Ticks left in the active window; inert at 0
    pub remaining: u32,
    /// Attacker; never damaged by its own hitbox
    pub owner: EntityId,
    /// Attacker's side
    pub team: Team,
    /// Health removed per hit
    pub damage: u32,
    /// Knockback distance in pixels
    pub knockback: f32,
    /// Travel velocity for projectiles (px/s)
    pub velocity: Option<Vec2>,
    struck: Vec<EntityId>,
}

impl AttackHitbox {
    /// Build the hitbox for `profile` fired by an attacker with `body`.
    ///
    /// Melee boxes sit flush against the attacker's leading edge, centred
    /// across the facing axis. Projectiles start centred on the attacker and
    /// travel along `aim`, falling back to the facing when `aim` is absent or
    /// zero.
    #[must_use]
    pub fn spawn(
        owner: EntityId,
        team: Team,
        body: &BodyState,
        profile: &AttackProfile,
        aim: Option<Vec2>,
    ) -> Self {
        let (rect, velocity) = match profile.kind {
            AttackKind::Melee { reach, thickness } => {
                (melee_rect(&body.rect, body.facing, reach, thickness), None)
            }
            AttackKind::Projectile { speed, size } => {
                let dir = aim
                    .map(Vec2::normalize_or_zero)
                    .filter(|d| *d != Vec2::ZERO)
                    .unwrap_or_else(|| body.facing.unit());
                (Rect::centered(body.center(), Vec2::splat(size)), Some(dir * speed))
            }
        };
        Self {
            rect,
            remaining: profile.active_ticks,
            owner,
            team,
            damage: profile.damage,
            knockback: profile.knockback,
            velocity,
            struck: Vec::new(),
        }
    }

    /// True while the window is open.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.remaining > 0
    }

    /// True for travelling hitboxes.
    #[must_use]
    pub const fn is_projectile(&self) -> bool {
        self.velocity.is_some()
    }

    /// True if `id` has already been damaged by this hitbox.
    #[must_use]
    pub fn has_struck(&self, id: EntityId) -> bool {
        self.struck.contains(&id)
    }

    /// Remember that `id` was damaged.
    pub fn mark_struck(&mut self, id: EntityId) {
        if !self.has_struck(id) {
            self.struck.push(id);
        }
    }

    /// True if this hitbox may damage `target` now.
    ///
    /// Requires an open window, a live target on the other team that is not
    /// the owner, has not been struck yet and overlaps the hitbox.
    #[must_use]
    pub fn can_hit(&self, target: &Entity) -> bool {
        self.is_active()
            && target.id() != self.owner
            && target.is_live()
            && target.combat().team != self.team
            && !self.has_struck(target.id())
            && self.rect.intersects(&target.body().rect)
    }

    /// Advance one tick. Returns `false` once the hitbox should be discarded.
    ///
    /// Projectiles move through the collision resolver first and expire on
    /// contact with a wall or obstacle.
    pub fn step(&mut self, grid: &TileGrid, obstacles: &[Rect], dt: f32) -> bool {
        if let Some(velocity) = self.velocity {
            let resolved = move_and_collide(self.rect, velocity * dt, grid, obstacles);
            self.rect = resolved.rect;
            if resolved.blocked() {
                self.expire();
            }
        }
        self.countdown()
    }

    /// Count one tick off the window without moving. Returns `false` once
    /// the hitbox should be discarded.
    pub fn countdown(&mut self) -> bool {
        self.remaining = self.remaining.saturating_sub(1);
        self.is_active()
    }

    /// Close the window immediately.
    pub fn expire(&mut self) {
        self.remaining = 0;
    }
}

fn melee_rect(body: &Rect, facing: Facing, reach: f32, thickness: f32) -> Rect {
    let center = body.center();
    match facing {
        Facing::Right => Rect::new(body.right(), center.y - thickness * 0.5, reach, thickness),
        Facing::Left => Rect::new(body.left() - reach, center.y - thickness * 0.5, reach, thickness),
        Facing::Down => Rect::new(center.x - thickness * 0.5, body.bottom(), thickness, reach),
        Facing::Up => Rect::new(center.x - thickness * 0.5, body.top() - reach, thickness, reach),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{EnemyComponents, EntityInner};

    fn body(facing: Facing) -> BodyState {
        BodyState {
            facing,
            ..BodyState::centered(Vec2::new(120.0, 120.0), 36.0, 220.0)
        }
    }

    fn target_at(id: u64, center: Vec2) -> Entity {
        let mut enemy = EnemyComponents::default();
        enemy.body = BodyState::centered(center, 36.0, 120.0);
        enemy.combat = crate::entity::CombatState::new(3, Team::Monsters);
        Entity::new(EntityId::new(id), EntityInner::Enemy(enemy))
    }

    mod placement_tests {
        use super::*;

        #[test]
        fn sword_sits_in_front() {
            let sword = AttackProfile::sword(48.0);
            let right = AttackHitbox::spawn(EntityId::new(0), Team::Hero, &body(Facing::Right), &sword, None);
            assert_eq!(right.rect, Rect::new(138.0, 108.0, 24.0, 24.0));

            let up = AttackHitbox::spawn(EntityId::new(0), Team::Hero, &body(Facing::Up), &sword, None);
            assert_eq!(up.rect, Rect::new(108.0, 78.0, 24.0, 24.0));
            assert!(!up.is_projectile());
            assert_eq!(up.remaining, 10);
        }

        #[test]
        fn projectile_follows_aim_or_facing() {
            let bolt = AttackProfile::bolt();
            let aimed = AttackHitbox::spawn(
                EntityId::new(1),
                Team::Monsters,
                &body(Facing::Down),
                &bolt,
                Some(Vec2::new(-10.0, 0.0)),
            );
            assert_eq!(aimed.velocity, Some(Vec2::new(-300.0, 0.0)));

            let unaimed =
                AttackHitbox::spawn(EntityId::new(1), Team::Monsters, &body(Facing::Down), &bolt, Some(Vec2::ZERO));
            assert_eq!(unaimed.velocity, Some(Vec2::new(0.0, 300.0)));
        }
    }

    mod hit_tests {
        use super::*;

        #[test]
        fn owner_and_teammates_are_exempt() {
            let sword = AttackProfile::sword(48.0);
            let hitbox = AttackHitbox::spawn(EntityId::new(5), Team::Monsters, &body(Facing::Right), &sword, None);
            let owner = target_at(5, Vec2::new(150.0, 120.0));
            let teammate = target_at(6, Vec2::new(150.0, 120.0));
            assert!(!hitbox.can_hit(&owner));
            assert!(!hitbox.can_hit(&teammate));
        }

        #[test]
        fn struck_targets_are_skipped() {
            let sword = AttackProfile::sword(48.0);
            let mut hitbox = AttackHitbox::spawn(EntityId::new(0), Team::Hero, &body(Facing::Right), &sword, None);
            let target = target_at(1, Vec2::new(160.0, 120.0));
            assert!(hitbox.can_hit(&target));
            hitbox.mark_struck(target.id());
            assert!(!hitbox.can_hit(&target));
        }

        #[test]
        fn expired_hitbox_is_inert() {
            let sword = AttackProfile::sword(48.0);
            let mut hitbox = AttackHitbox::spawn(EntityId::new(0), Team::Hero, &body(Facing::Right), &sword, None);
            hitbox.remaining = 0;
            assert!(!hitbox.can_hit(&target_at(1, Vec2::new(160.0, 120.0))));
        }
    }

    mod step_tests {
        use super::*;

        #[test]
        fn melee_counts_down_in_place() {
            let grid = TileGrid::bordered(10, 10, 48.0).unwrap();
            let sword = AttackProfile::sword(48.0);
            let mut hitbox = AttackHitbox::spawn(EntityId::new(0), Team::Hero, &body(Facing::Right), &sword, None);
            let start = hitbox.rect;
            let mut alive_ticks = 0;
            while hitbox.step(&grid, &[], 1.0 / 60.0) {
                alive_ticks += 1;
            }
            assert_eq!(alive_ticks, 9);
            assert_eq!(hitbox.rect, start);
        }

        #[test]
        fn projectile_expires_on_wall() {
            let grid = TileGrid::bordered(10, 10, 48.0).unwrap();
            let bolt = AttackProfile::bolt();
            let mut hitbox = AttackHitbox::spawn(
                EntityId::new(1),
                Team::Monsters,
                &body(Facing::Left),
                &bolt,
                None,
            );
            let mut ticks = 0;
            while hitbox.step(&grid, &[], 1.0 / 60.0) {
                ticks += 1;
                assert!(ticks < 90);
            }
            // Stopped flush against the wall column.
            assert!((hitbox.rect.left() - 48.0).abs() < 1e-3);
        }
    }
}

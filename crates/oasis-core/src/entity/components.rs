//! Component state structs for players, enemies and bosses.
//!
//! Components are plain data. Timers are counted in ticks and saturate at
//! zero; nothing here knows about the grid or other entities.

use bitflags::bitflags;
use glam::Vec2;
use loam::Rect;
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Facing / Attack Phase
// =============================================================================

/// Cardinal facing direction.
///
/// Closed set; use [`Facing::index`] for per-direction sprite or offset tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Facing {
    /// Toward negative y
    Up,
    /// Toward positive y
    #[default]
    Down,
    /// Toward negative x
    Left,
    /// Toward positive x
    Right,
}

impl Facing {
    /// Number of facings.
    pub const COUNT: usize = 4;

    /// Stable table index.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Up => 0,
            Self::Down => 1,
            Self::Left => 2,
            Self::Right => 3,
        }
    }

    /// Unit vector in screen space (y down).
    #[must_use]
    pub const fn unit(self) -> Vec2 {
        match self {
            Self::Up => Vec2::new(0.0, -1.0),
            Self::Down => Vec2::new(0.0, 1.0),
            Self::Left => Vec2::new(-1.0, 0.0),
            Self::Right => Vec2::new(1.0, 0.0),
        }
    }

    /// Facing along the dominant axis of `v`, or `None` for a zero vector.
    ///
    /// Ties (exact diagonals) resolve to the horizontal facing.
    #[must_use]
    pub fn from_vector(v: Vec2) -> Option<Self> {
        if v == Vec2::ZERO || !v.is_finite() {
            return None;
        }
        if v.x.abs() >= v.y.abs() {
            Some(if v.x > 0.0 { Self::Right } else { Self::Left })
        } else {
            Some(if v.y > 0.0 { Self::Down } else { Self::Up })
        }
    }
}

impl fmt::Display for Facing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Up => write!(f, "up"),
            Self::Down => write!(f, "down"),
            Self::Left => write!(f, "left"),
            Self::Right => write!(f, "right"),
        }
    }
}

/// Whether an attacker currently has a live hitbox out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttackPhase {
    /// No attack in progress
    #[default]
    Idle,
    /// Attack window open
    Active,
}

impl AttackPhase {
    /// Number of phases.
    pub const COUNT: usize = 2;

    /// Stable table index.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Idle => 0,
            Self::Active => 1,
        }
    }
}

// =============================================================================
// Status Flags
// =============================================================================

bitflags! {
    /// Lifecycle flags.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct StatusFlags: u8 {
        /// Health reached zero. Excluded from plugins, hit-tests and contact.
        const DEAD = 1 << 0;
        /// Dead boss kept in the arena as a marker.
        const DEFEATED = 1 << 1;
    }
}

/// Which side an entity fights for. Hitboxes never damage their own team.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    /// The player
    #[default]
    Hero,
    /// Enemies and bosses
    Monsters,
}

// =============================================================================
// Attack Profile
// =============================================================================

/// Shape and motion of an attack's hitbox.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AttackKind {
    /// Fixed rectangle in front of the attacker.
    Melee {
        /// Extent along the facing direction
        reach: f32,
        /// Extent across the facing direction
        thickness: f32,
    },
    /// Square bolt travelling at constant velocity until it expires or hits
    /// a blocking tile.
    Projectile {
        /// Pixels per second
        speed: f32,
        /// Edge length in pixels
        size: f32,
    },
}

/// Tuning for one attack.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttackProfile {
    /// Hitbox shape and motion
    pub kind: AttackKind,
    /// Health removed per hit
    pub damage: u32,
    /// Knockback distance in pixels (0 disables)
    pub knockback: f32,
    /// Ticks the hitbox stays live
    pub active_ticks: u32,
    /// Ticks before another attack may start
    pub cooldown_ticks: u32,
    /// AI only attacks targets closer than this
    pub range: f32,
}

impl AttackProfile {
    /// Sword swing sized to half a tile.
    #[must_use]
    pub fn sword(tile_size: f32) -> Self {
        Self {
            kind: AttackKind::Melee {
                reach: tile_size * 0.5,
                thickness: tile_size * 0.5,
            },
            damage: 1,
            knockback: 16.0,
            active_ticks: 10,
            cooldown_ticks: 15,
            range: tile_size,
        }
    }

    /// Slow magic bolt fired by bosses.
    #[must_use]
    pub fn bolt() -> Self {
        Self {
            kind: AttackKind::Projectile {
                speed: 300.0,
                size: 12.0,
            },
            damage: 1,
            knockback: 12.0,
            active_ticks: 90,
            cooldown_ticks: 90,
            range: 320.0,
        }
    }

    /// True for projectile attacks.
    #[must_use]
    pub const fn is_projectile(&self) -> bool {
        matches!(self.kind, AttackKind::Projectile { .. })
    }
}

// =============================================================================
// Body
// =============================================================================

/// Position, size and motion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BodyState {
    /// Collision rectangle in world pixels
    pub rect: Rect,
    /// Current velocity (px/s)
    pub velocity: Vec2,
    /// Top speed (px/s)
    pub speed: f32,
    /// Facing direction
    pub facing: Facing,
}

impl BodyState {
    /// Body of the given size centred on `center`.
    #[must_use]
    pub fn centered(center: Vec2, size: f32, speed: f32) -> Self {
        Self {
            rect: Rect::centered(center, Vec2::splat(size)),
            velocity: Vec2::ZERO,
            speed,
            facing: Facing::Down,
        }
    }

    /// Centre of the collision rectangle.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.rect.center()
    }
}

// =============================================================================
// Combat
// =============================================================================

/// Result of [`CombatState::take_hit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Invulnerable or already dead; nothing changed
    Ignored,
    /// Health reduced, still alive
    Damaged,
    /// Health reached zero
    Killed,
}

/// Health, attack timers and status.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CombatState {
    /// Current health
    pub hp: u32,
    /// Maximum health
    pub max_hp: u32,
    /// Side this entity fights for
    pub team: Team,
    /// Attack this entity can start, if any
    pub attack: Option<AttackProfile>,
    /// Damage dealt to the player on touch (0 for none)
    pub contact_damage: u32,
    /// Ticks until another attack may start
    pub cooldown: u32,
    /// Ticks left in the current attack window
    pub active: u32,
    /// Ticks during which hits are ignored
    pub invulnerable: u32,
    /// Ticks of hit-flash feedback for renderers
    pub hit_flash: u32,
    /// Lifecycle flags
    pub status: StatusFlags,
}

impl CombatState {
    /// Full-health state.
    #[must_use]
    pub fn new(max_hp: u32, team: Team) -> Self {
        Self {
            hp: max_hp,
            max_hp,
            team,
            ..Self::default()
        }
    }

    /// Builder: set the attack profile.
    #[must_use]
    pub fn with_attack(mut self, attack: AttackProfile) -> Self {
        self.attack = Some(attack);
        self
    }

    /// Builder: set contact damage.
    #[must_use]
    pub fn with_contact_damage(mut self, damage: u32) -> Self {
        self.contact_damage = damage;
        self
    }

    /// True once health has reached zero.
    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.status.contains(StatusFlags::DEAD)
    }

    /// Current attack phase.
    #[must_use]
    pub fn phase(&self) -> AttackPhase {
        if self.active > 0 {
            AttackPhase::Active
        } else {
            AttackPhase::Idle
        }
    }

    /// True if [`CombatState::start_attack`] would succeed.
    #[must_use]
    pub fn can_attack(&self) -> bool {
        self.attack.is_some() && self.cooldown == 0 && self.active == 0 && !self.is_dead()
    }

    /// Open an attack window if the cooldown allows it.
    ///
    /// Returns the profile used, or `None` with no state change when the
    /// entity has no attack, is dead, is mid-attack or is cooling down.
    pub fn start_attack(&mut self) -> Option<AttackProfile> {
        if !self.can_attack() {
            return None;
        }
        let profile = self.attack?;
        self.active = profile.active_ticks;
        self.cooldown = profile.cooldown_ticks;
        Some(profile)
    }

    /// Decrement every timer by one tick, saturating at zero.
    pub fn tick_timers(&mut self) {
        self.cooldown = self.cooldown.saturating_sub(1);
        self.active = self.active.saturating_sub(1);
        self.invulnerable = self.invulnerable.saturating_sub(1);
        self.hit_flash = self.hit_flash.saturating_sub(1);
    }

    /// Apply a hit of `damage`, then open an invulnerability window.
    ///
    /// Hits landing while invulnerable (from any source) or after death are
    /// ignored.
    pub fn take_hit(&mut self, damage: u32, invulnerability: u32) -> HitOutcome {
        if self.is_dead() || self.invulnerable > 0 {
            return HitOutcome::Ignored;
        }
        self.hp = self.hp.saturating_sub(damage);
        self.invulnerable = invulnerability;
        if self.hp == 0 {
            self.status.insert(StatusFlags::DEAD);
            self.active = 0;
            HitOutcome::Killed
        } else {
            HitOutcome::Damaged
        }
    }

    /// Back to full health with no timers running.
    pub fn restore(&mut self) {
        self.hp = self.max_hp;
        self.cooldown = 0;
        self.active = 0;
        self.invulnerable = 0;
        self.hit_flash = 0;
        self.status = StatusFlags::empty();
    }
}

// =============================================================================
// AI
// =============================================================================

/// Enemy behaviour mode, re-evaluated every tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AiMode {
    /// Random walk
    #[default]
    Wander,
    /// Head straight for the player
    Chase,
}

/// Enemy decision state and tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AiState {
    /// Current mode
    pub mode: AiMode,
    /// Unit wander direction
    pub wander_dir: Vec2,
    /// Ticks before the wander direction is re-rolled
    pub wander_ticks: u32,
    /// Chase when the player's centre is closer than this
    pub aggro_radius: f32,
    /// Wander speed as a fraction of top speed
    pub wander_factor: f32,
    /// Inclusive range of wander durations in ticks
    pub wander_range: (u32, u32),
}

impl Default for AiState {
    fn default() -> Self {
        Self {
            mode: AiMode::Wander,
            wander_dir: Vec2::ZERO,
            wander_ticks: 0,
            aggro_radius: 260.0,
            wander_factor: 0.6,
            wander_range: (36, 84),
        }
    }
}

// =============================================================================
// Animation / Inventory
// =============================================================================

/// Four-frame walk cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalkCycle {
    /// Current frame in `0..WalkCycle::FRAMES`
    pub frame: u8,
    /// Ticks spent on the current frame
    pub ticks: u32,
}

impl WalkCycle {
    /// Frames per cycle.
    pub const FRAMES: u8 = 4;

    /// Advance while moving; snap back to frame 0 when idle.
    pub fn advance(&mut self, moving: bool, ticks_per_frame: u32) {
        if !moving {
            self.frame = 0;
            self.ticks = 0;
            return;
        }
        self.ticks += 1;
        if self.ticks >= ticks_per_frame.max(1) {
            self.ticks = 0;
            self.frame = (self.frame + 1) % Self::FRAMES;
        }
    }
}

/// Collected items.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    /// Rupees collected this run
    pub rupees: u32,
}

// =============================================================================
// Per-Tag Bundles
// =============================================================================

/// Components for the player.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerComponents {
    /// Position and motion
    pub body: BodyState,
    /// Health and sword
    pub combat: CombatState,
    /// Walk animation
    pub walk: WalkCycle,
    /// Pickups
    pub inventory: Inventory,
}

/// Components for enemies and bosses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnemyComponents {
    /// Position and motion
    pub body: BodyState,
    /// Health, contact damage and optional attack
    pub combat: CombatState,
    /// Chase / wander state
    pub ai: AiState,
    /// Walk animation
    pub walk: WalkCycle,
    /// Progression flag set when this entity dies
    pub unlocks: Option<String>,
    /// Index into the room's spawn table this entity came from
    pub spawn_slot: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    mod facing_tests {
        use super::*;

        #[test]
        fn dominant_axis_wins() {
            assert_eq!(Facing::from_vector(Vec2::new(3.0, 1.0)), Some(Facing::Right));
            assert_eq!(Facing::from_vector(Vec2::new(-0.5, 2.0)), Some(Facing::Down));
            assert_eq!(Facing::from_vector(Vec2::new(0.0, -1.0)), Some(Facing::Up));
        }

        #[test]
        fn diagonal_tie_prefers_horizontal() {
            assert_eq!(Facing::from_vector(Vec2::new(1.0, 1.0)), Some(Facing::Right));
            assert_eq!(Facing::from_vector(Vec2::new(-1.0, -1.0)), Some(Facing::Left));
        }

        #[test]
        fn zero_has_no_facing() {
            assert_eq!(Facing::from_vector(Vec2::ZERO), None);
        }

        #[test]
        fn unit_matches_from_vector() {
            for facing in [Facing::Up, Facing::Down, Facing::Left, Facing::Right] {
                assert_eq!(Facing::from_vector(facing.unit()), Some(facing));
            }
        }
    }

    mod combat_tests {
        use super::*;

        fn swordsman() -> CombatState {
            CombatState::new(6, Team::Hero).with_attack(AttackProfile::sword(48.0))
        }

        #[test]
        fn start_attack_sets_both_timers() {
            let mut combat = swordsman();
            assert!(combat.start_attack().is_some());
            assert_eq!(combat.active, 10);
            assert_eq!(combat.cooldown, 15);
            assert_eq!(combat.phase(), AttackPhase::Active);
        }

        #[test]
        fn start_attack_during_cooldown_changes_nothing() {
            let mut combat = swordsman();
            combat.start_attack();
            for _ in 0..12 {
                combat.tick_timers();
            }
            let before = combat.clone();
            assert!(combat.start_attack().is_none());
            assert_eq!(combat, before);
        }

        #[test]
        fn no_attack_profile_cannot_attack() {
            let mut combat = CombatState::new(3, Team::Monsters);
            assert!(combat.start_attack().is_none());
        }

        #[test]
        fn timers_saturate_at_zero() {
            let mut combat = swordsman();
            combat.tick_timers();
            assert_eq!(combat.cooldown, 0);
            assert_eq!(combat.active, 0);
        }

        #[test]
        fn timers_are_independent() {
            let mut combat = swordsman();
            combat.start_attack();
            for _ in 0..10 {
                combat.tick_timers();
            }
            assert_eq!(combat.phase(), AttackPhase::Idle);
            assert_eq!(combat.cooldown, 5);
        }

        #[test]
        fn invulnerability_ignores_hits() {
            let mut combat = CombatState::new(3, Team::Monsters);
            assert_eq!(combat.take_hit(1, 4), HitOutcome::Damaged);
            assert_eq!(combat.take_hit(1, 4), HitOutcome::Ignored);
            assert_eq!(combat.hp, 2);
        }

        #[test]
        fn lethal_hit_marks_dead() {
            let mut combat = CombatState::new(2, Team::Monsters);
            assert_eq!(combat.take_hit(5, 0), HitOutcome::Killed);
            assert_eq!(combat.hp, 0);
            assert!(combat.is_dead());
            assert_eq!(combat.take_hit(1, 0), HitOutcome::Ignored);
        }

        #[test]
        fn restore_clears_death() {
            let mut combat = CombatState::new(2, Team::Hero);
            combat.take_hit(2, 10);
            combat.restore();
            assert!(!combat.is_dead());
            assert_eq!(combat.hp, 2);
            assert_eq!(combat.invulnerable, 0);
        }
    }

    mod walk_tests {
        use super::*;

        #[test]
        fn cycles_through_four_frames() {
            let mut walk = WalkCycle::default();
            let mut seen = Vec::new();
            for _ in 0..8 {
                walk.advance(true, 2);
                seen.push(walk.frame);
            }
            assert_eq!(seen, vec![0, 1, 1, 2, 2, 3, 3, 0]);
        }

        #[test]
        fn idle_resets() {
            let mut walk = WalkCycle { frame: 2, ticks: 1 };
            walk.advance(false, 7);
            assert_eq!(walk, WalkCycle::default());
        }
    }

    #[test]
    fn attack_profile_serializes_with_kind_tag() {
        let json = serde_json::to_string(&AttackProfile::bolt()).unwrap();
        assert!(json.contains(r#""kind":"projectile""#));
        let back: AttackProfile = serde_json::from_str(&json).unwrap();
        assert!(back.is_projectile());
    }
}

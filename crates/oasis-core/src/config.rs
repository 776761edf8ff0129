//! Tuning and archetypes.
//!
//! Every number the simulation uses lives here with a `Default` matching the
//! reference tuning (60 Hz, 48 px tiles). Worlds may override any of it from
//! JSON; missing fields fall back to the defaults.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::entity::{
    AiState, AttackProfile, BodyState, CombatState, EnemyComponents, PlayerComponents, Team,
};

/// Default tile edge in pixels.
pub const DEFAULT_TILE_SIZE: f32 = 48.0;

// =============================================================================
// Archetypes
// =============================================================================

/// Player tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerArchetype {
    /// Square body edge in pixels
    pub size: f32,
    /// Top speed (px/s)
    pub speed: f32,
    /// Maximum health
    pub max_hp: u32,
    /// Sword
    pub attack: AttackProfile,
}

impl Default for PlayerArchetype {
    fn default() -> Self {
        Self {
            size: 36.0,
            speed: 220.0,
            max_hp: 6,
            attack: AttackProfile::sword(DEFAULT_TILE_SIZE),
        }
    }
}

impl PlayerArchetype {
    /// Player components centred on `center`.
    #[must_use]
    pub fn build(&self, center: Vec2) -> PlayerComponents {
        PlayerComponents {
            body: BodyState::centered(center, self.size, self.speed),
            combat: CombatState::new(self.max_hp, Team::Hero).with_attack(self.attack),
            ..PlayerComponents::default()
        }
    }
}

/// Enemy or boss tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyArchetype {
    /// Square body edge in pixels
    pub size: f32,
    /// Top speed (px/s)
    pub speed: f32,
    /// Maximum health
    pub max_hp: u32,
    /// Chase radius in pixels
    pub aggro_radius: f32,
    /// Wander speed as a fraction of top speed
    pub wander_factor: f32,
    /// Inclusive wander duration range in ticks
    pub wander_ticks: (u32, u32),
    /// Damage on touching the player
    pub contact_damage: u32,
    /// Optional ranged or melee attack
    pub attack: Option<AttackProfile>,
}

impl Default for EnemyArchetype {
    fn default() -> Self {
        Self::grunt()
    }
}

impl EnemyArchetype {
    /// Regular biome enemy.
    #[must_use]
    pub fn grunt() -> Self {
        Self {
            size: 36.0,
            speed: 120.0,
            max_hp: 3,
            aggro_radius: 260.0,
            wander_factor: 0.6,
            wander_ticks: (36, 84),
            contact_damage: 1,
            attack: None,
        }
    }

    /// Biome guardian.
    #[must_use]
    pub fn guardian() -> Self {
        Self {
            size: 56.0,
            speed: 140.0,
            max_hp: 14,
            contact_damage: 2,
            attack: Some(AttackProfile::bolt()),
            ..Self::grunt()
        }
    }

    /// Enemy components centred on `center`.
    #[must_use]
    pub fn build(&self, center: Vec2, unlocks: Option<String>, spawn_slot: usize) -> EnemyComponents {
        let mut combat =
            CombatState::new(self.max_hp, Team::Monsters).with_contact_damage(self.contact_damage);
        combat.attack = self.attack;
        EnemyComponents {
            body: BodyState::centered(center, self.size, self.speed),
            combat,
            ai: AiState {
                aggro_radius: self.aggro_radius,
                wander_factor: self.wander_factor,
                wander_range: self.wander_ticks,
                ..AiState::default()
            },
            unlocks,
            spawn_slot,
            ..EnemyComponents::default()
        }
    }
}

// =============================================================================
// Banner Durations
// =============================================================================

/// How long each kind of message stays on the banner, in ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BannerDurations {
    /// Player took damage
    pub hurt: u32,
    /// A room was entered
    pub room_entered: u32,
    /// Room intro text
    pub intro: u32,
    /// A gated portal refused entry
    pub locked: u32,
    /// A guardian fell
    pub boss_defeated: u32,
    /// The player fainted and respawned
    pub fainted: u32,
    /// The finish portal was reached
    pub victory: u32,
}

impl Default for BannerDurations {
    fn default() -> Self {
        Self {
            hurt: 96,
            room_entered: 132,
            intro: 360,
            locked: 84,
            boss_defeated: 180,
            fainted: 180,
            victory: 360,
        }
    }
}

// =============================================================================
// Simulation Config
// =============================================================================

/// Global tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Fixed steps per second
    pub tick_rate: u32,
    /// Ignore movement input while the sword is out
    pub lock_movement_while_attacking: bool,
    /// Knockback applied to the player by contact damage (px)
    pub contact_knockback: f32,
    /// Player invulnerability after any hit (ticks)
    pub player_invulnerability_ticks: u32,
    /// Enemy invulnerability after a hit (ticks)
    pub enemy_invulnerability_ticks: u32,
    /// Hit-flash length for renderers (ticks)
    pub hit_flash_ticks: u32,
    /// Walk animation speed (ticks per frame)
    pub walk_ticks_per_frame: u32,
    /// Edge of a rupee pickup (px)
    pub pickup_size: f32,
    /// Message lifetimes
    pub banners: BannerDurations,
    /// Player tuning
    pub player: PlayerArchetype,
    /// Regular enemy tuning
    pub enemy: EnemyArchetype,
    /// Guardian tuning
    pub boss: EnemyArchetype,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60,
            lock_movement_while_attacking: true,
            contact_knockback: 18.0,
            player_invulnerability_ticks: 48,
            enemy_invulnerability_ticks: 0,
            hit_flash_ticks: 8,
            walk_ticks_per_frame: 7,
            pickup_size: 14.0,
            banners: BannerDurations::default(),
            player: PlayerArchetype::default(),
            enemy: EnemyArchetype::grunt(),
            boss: EnemyArchetype::guardian(),
        }
    }
}

impl SimConfig {
    /// Seconds per tick.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn dt(&self) -> f32 {
        1.0 / self.tick_rate.max(1) as f32
    }
}

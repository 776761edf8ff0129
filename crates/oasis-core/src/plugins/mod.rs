//! Decision plugins.
//!
//! - [`PlayerControlPlugin`]: turns the input snapshot into velocity, facing
//!   and attack intents
//! - [`EnemyAiPlugin`]: chase-if-near, wander otherwise, plus ranged attacks
//!   for armed enemies
//!
//! Use [`PluginRegistry::default_bundles()`](crate::plugin::PluginRegistry::default_bundles)
//! to register both for their entity tags.

mod enemy_ai;
mod player_control;

pub use enemy_ai::EnemyAiPlugin;
pub use player_control::PlayerControlPlugin;

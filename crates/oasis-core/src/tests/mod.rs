//! Test module for determinism and integration tests.
//!
//! This module drives the full simulation through rooms, combat and
//! transitions:
//! - **Determinism tests**: Same seed and script produce identical runs
//! - **Integration tests**: End-to-end behaviour of a two-room world
//! - **Helper functions**: World builders and state accessors
//!
//! # Test Structure
//!
//! - `determinism.rs`: Tests that verify deterministic execution
//! - `integration.rs`: End-to-end tests of the simulation
//! - `helpers.rs`: Test setup utilities and factory functions

mod determinism;
mod helpers;

// Re-export for convenience
pub use helpers::*;

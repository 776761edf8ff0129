//! Headless Oasis harness.
//!
//! Loads a world file, plays a scripted input sequence and reports what
//! happened.
//!
//! Usage:
//!   oasis-sim worlds/demo.json --ticks 600 --script "R*40 DA U*20"
//!   RUST_LOG=oasis_core=debug oasis-sim worlds/demo.json --json
//!
//! Script tokens are `U`/`D`/`L`/`R` directions and `A` attack, combined
//! freely (`UR`, `DA`); `-` is no input. `TOKEN*N` holds a token for N ticks.
//! Ticks past the end of the script get no input.

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use oasis_core::{Event, GameOutcome, InputSnapshot, Simulation, World};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "oasis-sim")]
#[command(about = "Run an Oasis world headless with scripted input")]
struct Cli {
    /// World file (JSON)
    world: PathBuf,
    /// Ticks to simulate
    #[arg(long, default_value_t = 600)]
    ticks: u64,
    /// Master seed
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Input script, e.g. "R*30 DA -*10"
    #[arg(long, default_value = "")]
    script: String,
    /// Print the final frame as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let text = fs::read_to_string(&cli.world)
        .with_context(|| format!("failed to read {}", cli.world.display()))?;
    let world = World::from_json(&text).with_context(|| format!("invalid world {}", cli.world.display()))?;
    let script = parse_script(&cli.script)?;

    let mut sim = Simulation::new(world, cli.seed);
    let mut summary = Summary::default();
    for tick in 0..cli.ticks {
        let input = usize::try_from(tick)
            .ok()
            .and_then(|t| script.get(t).copied())
            .unwrap_or_default();
        sim.step(input);
        for event in sim.take_events() {
            summary.record(&event);
        }
        if sim.outcome() == GameOutcome::Victory {
            info!(tick = sim.tick(), "finished");
            break;
        }
    }

    let frame = sim.frame();
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&frame)?);
    }
    info!(
        tick = frame.tick,
        room = %frame.room,
        rupees = frame.rupees,
        hp = frame.player().map_or(0, |p| p.hp),
        outcome = ?frame.outcome,
        hits = summary.hits,
        kills = summary.kills,
        rooms_entered = summary.rooms_entered,
        denials = summary.denials,
        faints = summary.faints,
        "run complete"
    );
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

/// Expand a script into one snapshot per tick.
fn parse_script(script: &str) -> Result<Vec<InputSnapshot>> {
    let mut inputs = Vec::new();
    for token in script.split_whitespace() {
        let (keys, count) = match token.split_once('*') {
            Some((keys, count)) => {
                let count: usize = count
                    .parse()
                    .with_context(|| format!("bad repeat count in script token {token:?}"))?;
                (keys, count)
            }
            None => (token, 1),
        };
        let Some(input) = InputSnapshot::from_token(keys) else {
            bail!("unknown keys in script token {token:?}");
        };
        inputs.extend(std::iter::repeat(input).take(count));
    }
    if inputs.is_empty() && !script.trim().is_empty() {
        warn!("script expanded to zero ticks");
    }
    Ok(inputs)
}

/// Counters reported at the end of a run.
#[derive(Debug, Default)]
struct Summary {
    hits: u32,
    kills: u32,
    rooms_entered: u32,
    denials: u32,
    faints: u32,
}

impl Summary {
    fn record(&mut self, event: &Event) {
        match event {
            Event::Hit { .. } => self.hits += 1,
            Event::Died { .. } => self.kills += 1,
            Event::RoomEntered { room } => {
                self.rooms_entered += 1;
                info!(%room, "entered");
            }
            Event::TransitionDenied { message, .. } => {
                self.denials += 1;
                info!(%message, "portal refused");
            }
            Event::PlayerFainted { .. } => self.faints += 1,
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_expands_repeats() {
        let inputs = parse_script("R*3 DA -").unwrap();
        assert_eq!(inputs.len(), 5);
        assert_eq!(inputs[0], InputSnapshot::RIGHT);
        assert_eq!(inputs[3], InputSnapshot::DOWN | InputSnapshot::ATTACK);
        assert_eq!(inputs[4], InputSnapshot::empty());
    }

    #[test]
    fn script_rejects_unknown_keys() {
        assert!(parse_script("RX").is_err());
        assert!(parse_script("R*lots").is_err());
    }

    #[test]
    fn empty_script_is_idle() {
        assert!(parse_script("").unwrap().is_empty());
    }

    #[test]
    fn demo_world_loads() {
        let text = include_str!("../worlds/demo.json");
        let world = World::from_json(text).unwrap();
        assert_eq!(world.current_room().id.as_str(), "forest");
    }
}

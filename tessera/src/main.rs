//! # Tessera
//!
//! Headless runner: loads the engine config, builds a demo world and
//! simulates it for the configured number of ticks.

mod demo;
mod logger;

use std::{env, fs, path::Path};

use anyhow::{Context, Result};
use tessera_core::{EngineConfig, RegistryBuilder};

const CONFIG_PATH: &str = "config/tessera_config.json5";

fn main() -> Result<()> {
    let warnings = logger::init("info")?;

    let config = EngineConfig::load_or_create(Path::new(CONFIG_PATH)).context("failed to load config")?;
    let seed = config.seed_value().unwrap_or_else(rand::random::<u64>);
    log::info!("Starting Tessera with seed {seed}");

    let registries = RegistryBuilder::vanilla(config.property_mode.into())?.build();
    log::info!(
        "Registered {} blocks with {} states",
        registries.blocks.block_count(),
        registries.blocks.state_count()
    );

    let ticks = config.ticks;
    let mut random = config.random_source.create(seed);
    let mut world = demo::build(registries, config);
    let total = {
        let _span = tracing::info_span!("simulate", ticks).entered();
        demo::run(&mut world, ticks, &mut random)
    };
    log::info!(
        "Simulated {} ticks: {} scheduled, {} stale, {} random, {} diagnostics",
        total.game_time,
        total.scheduled_fired,
        total.stale_dropped,
        total.random_ticks,
        total.diagnostics
    );

    // Optional first argument: where to write the final world record
    if let Some(out) = env::args().nth(1) {
        let json = world.save().to_json()?;
        fs::write(&out, json).with_context(|| format!("failed to write {out}"))?;
        log::info!("Saved world to {out}");
    }

    if warnings.count() > 0 {
        log::warn!("Finished with {} warnings", warnings.count());
    }
    Ok(())
}

//! The world the runner simulates.

use std::sync::Arc;

use tessera_core::{
    EngineConfig, Registries, TickReport, World,
    world::{EffectKind, FeatureRef, MenuKind, SimpleEntity, WorldListener},
};
use tessera_registry::BlockStateId;
use tessera_utils::{BlockPos, UpdateFlags, random::Random};

/// Forwards world notifications to the log.
#[derive(Default)]
pub struct LogListener;

impl WorldListener for LogListener {
    fn block_changed(&mut self, pos: BlockPos, old_state: BlockStateId, new_state: BlockStateId) {
        log::trace!("{pos}: {old_state:?} -> {new_state:?}");
    }

    fn play_effect(&mut self, pos: BlockPos, kind: EffectKind, data: i32) {
        log::debug!("Effect {kind:?} ({data}) at {pos}");
    }

    fn open_menu(&mut self, pos: BlockPos, kind: MenuKind) {
        log::debug!("Menu {kind:?} opened at {pos}");
    }

    fn place_feature(&mut self, pos: BlockPos, feature: &FeatureRef) -> bool {
        log::info!("Feature {} requested at {pos}", feature.0);
        false
    }
}

/// Builds a small plot with one of every kind of behaviour.
pub fn build(registries: Arc<Registries>, config: EngineConfig) -> World {
    let mut world = World::new(registries, config).with_listener(LogListener);
    let v = world.registries().vanilla;
    let stone = world.blocks().default_state(v.stone);
    for x in -8..=8 {
        for z in -8..=8 {
            world.set_block(BlockPos::new(x, -1, z), stone, UpdateFlags::UPDATE_NONE);
        }
    }

    for x in -6..=6 {
        world.place_block(BlockPos::new(x, 0, 0), v.farmland);
        world.place_block(BlockPos::new(x, 1, 0), v.wheat);
        let soul_sand = world.blocks().default_state(v.soul_sand);
        world.set_block(BlockPos::new(x, 0, 2), soul_sand, UpdateFlags::UPDATE_ALL);
        world.place_block(BlockPos::new(x, 1, 2), v.nether_wart);
        world.place_block(BlockPos::new(x, 0, -2), v.oak_fence);
    }

    let copper = world.blocks().default_state(v.copper_block);
    for x in -2..=2 {
        world.set_block(BlockPos::new(x, 0, -5), copper, UpdateFlags::UPDATE_ALL);
    }

    let log = world.blocks().default_state(v.oak_log);
    for y in 0..4 {
        world.set_block(BlockPos::new(6, y, 6), log, UpdateFlags::UPDATE_ALL);
    }
    for x in 4..=8 {
        for z in 4..=8 {
            world.place_block(BlockPos::new(x, 4, z), v.oak_leaves);
        }
    }

    let lever = BlockPos::new(-6, 0, 6);
    let lever_state = world.blocks().default_state(v.lever);
    world.set_block(lever, lever_state, UpdateFlags::UPDATE_ALL);
    world.place_block(BlockPos::new(-7, 0, 6), v.redstone_lamp);
    world.use_without_item(lever, &SimpleEntity::new(0));

    let nylium = world.blocks().default_state(v.crimson_nylium);
    world.set_block(BlockPos::new(-6, 0, -6), nylium, UpdateFlags::UPDATE_ALL);
    world.place_block(BlockPos::new(-6, 1, -6), v.crimson_fungus);
    world.place_block(BlockPos::new(0, 3, 6), v.sand);

    world
}

/// Runs `ticks` game ticks and sums the reports.
pub fn run(world: &mut World, ticks: u64, random: &mut dyn Random) -> TickReport {
    let mut total = TickReport::default();
    let lever = BlockPos::new(-6, 0, 6);
    let player = SimpleEntity::new(0);

    for _ in 0..ticks {
        let report = world.tick(random);
        total.game_time = report.game_time;
        total.scheduled_fired += report.scheduled_fired;
        total.stale_dropped += report.stale_dropped;
        total.random_ticks += report.random_ticks;
        total.diagnostics += report.diagnostics;

        // Flip the lever now and then so the lamp has something to do
        if report.game_time % 50 == 0 {
            world.use_without_item(lever, &player);
        }
        if report.game_time % 100 == 0 {
            world.apply_bonemeal(BlockPos::new(-6, 1, -6), random);
            log::info!(
                "Tick {}: {} pending ticks, {} block entities",
                report.game_time,
                world.pending_tick_count(),
                world.block_entity_count()
            );
        }
        for diagnostic in world.take_diagnostics() {
            log::warn!("{diagnostic}");
        }
    }
    total
}

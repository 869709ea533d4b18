//! Scheduled tick ordering, cancellation and the blocks that rely on them.

mod common;

use std::sync::Arc;

use common::{put, quiet_config, quiet_world};
use tessera_core::{
    EngineConfig, EngineError, RegistryBuilder, World,
    behavior::BlockBehaviour,
    ticks::TickPriority,
    world::{EffectKind, ListenerEvent, RecordingListener, SimpleEntity},
};
use tessera_registry::{BlockDef, BlockId, BlockStateId, PropertyMode, blocks::properties::state_properties};
use tessera_utils::{
    BlockPos, UpdateFlags,
    locks::SyncMutex,
    random::{Random, Xoroshiro},
};

/// Logs (position, game time) whenever its tick fires and reschedules itself
/// with `delay` if one is set.
struct Echo {
    block: BlockId,
    delay: Option<i32>,
    log: Arc<SyncMutex<Vec<(BlockPos, u64)>>>,
}

impl BlockBehaviour for Echo {
    fn scheduled_tick(
        &self,
        _state: BlockStateId,
        world: &mut World,
        pos: BlockPos,
        _random: &mut dyn Random,
    ) {
        self.log.lock().push((pos, world.game_time()));
        if let Some(delay) = self.delay {
            world.schedule_tick(pos, self.block, delay);
        }
    }
}

struct EchoWorld {
    world: World,
    echo: BlockId,
    log: Arc<SyncMutex<Vec<(BlockPos, u64)>>>,
}

fn echo_world(delay: Option<i32>, config: EngineConfig) -> EchoWorld {
    let log = Arc::new(SyncMutex::new(Vec::new()));
    let mut builder = RegistryBuilder::vanilla(PropertyMode::Strict).expect("vanilla registries should build");
    let echo_log = Arc::clone(&log);
    let echo = builder
        .register(BlockDef::new("tessera:echo".parse().expect("valid identifier")), move |block| {
            Box::new(Echo {
                block,
                delay,
                log: echo_log,
            })
        })
        .expect("echo should register");
    let mut world = World::new(builder.build(), config);
    for x in 0..4 {
        put(&mut world, BlockPos::new(x, 0, 0), echo);
    }
    EchoWorld { world, echo, log }
}

fn run(world: &mut World, ticks: u64) {
    let mut random = Xoroshiro::from_seed(0);
    for _ in 0..ticks {
        world.tick(&mut random);
    }
}

#[test]
fn test_ticks_fire_in_priority_then_insertion_order() {
    let EchoWorld { mut world, echo, log } = echo_world(None, quiet_config());
    let at = |x| BlockPos::new(x, 0, 0);

    world.schedule_tick(at(0), echo, 2);
    world.schedule_tick(at(1), echo, 2);
    world.schedule_tick_with_priority(at(2), echo, 2, TickPriority::High);
    world.schedule_tick(at(3), echo, 1);
    assert_eq!(world.pending_tick_count(), 4);

    run(&mut world, 2);
    assert_eq!(
        *log.lock(),
        vec![(at(3), 1), (at(2), 2), (at(0), 2), (at(1), 2)]
    );
    assert_eq!(world.pending_tick_count(), 0);
}

#[test]
fn test_first_schedule_wins() {
    let EchoWorld { mut world, echo, log } = echo_world(None, quiet_config());
    let pos = BlockPos::new(0, 0, 0);
    assert!(world.schedule_tick(pos, echo, 5));
    assert!(!world.schedule_tick(pos, echo, 1));
    run(&mut world, 6);
    assert_eq!(*log.lock(), vec![(pos, 5)]);
}

#[test]
fn test_negative_and_zero_delays_fire_next_tick() {
    let EchoWorld { mut world, echo, log } = echo_world(None, quiet_config());
    world.schedule_tick(BlockPos::new(0, 0, 0), echo, -5);
    assert_eq!(
        world.try_schedule_tick(BlockPos::new(1, 0, 0), echo, 0, TickPriority::Normal),
        Ok(true)
    );
    run(&mut world, 1);
    assert_eq!(log.lock().len(), 2);
    assert!(world.diagnostics().is_empty());
}

#[test]
fn test_zero_delay_self_reschedule_is_refused() {
    let EchoWorld { mut world, echo, log } = echo_world(Some(0), quiet_config());
    let pos = BlockPos::new(2, 0, 0);
    world.schedule_tick(pos, echo, 1);

    let report = world.tick(&mut Xoroshiro::from_seed(0));
    assert_eq!(report.scheduled_fired, 1);
    assert_eq!(report.diagnostics, 1);
    assert_eq!(log.lock().len(), 1);
    assert!(!world.has_scheduled_tick(pos, echo));
    assert_eq!(
        world.take_diagnostics(),
        vec![EngineError::ReentrantSchedule {
            pos,
            block: "tessera:echo".parse().expect("valid identifier"),
        }]
    );
}

#[test]
fn test_unknown_block_id_is_refused() {
    let mut world = quiet_world();
    let pos = BlockPos::new(0, 0, 0);
    let missing = BlockId(60000);
    assert_eq!(
        world.try_schedule_tick(pos, missing, 1, TickPriority::Normal),
        Err(EngineError::UnknownBlockId(missing))
    );
    assert!(!world.schedule_tick(pos, missing, 1));
    assert_eq!(world.pending_tick_count(), 0);
    assert_eq!(world.take_diagnostics(), vec![EngineError::UnknownBlockId(missing)]);
    assert!(world.save().scheduled_ticks.is_empty());
}

#[test]
fn test_diagnostic_list_is_capped() {
    let config = EngineConfig {
        max_diagnostics: 2,
        ..quiet_config()
    };
    let EchoWorld { mut world, echo, log } = echo_world(Some(0), config);
    for x in 0..4 {
        world.schedule_tick(BlockPos::new(x, 0, 0), echo, 1);
    }

    let report = world.tick(&mut Xoroshiro::from_seed(0));
    assert_eq!(log.lock().len(), 4);
    assert_eq!(report.diagnostics, 4);
    assert_eq!(world.diagnostics().len(), 2);

    // Taking them makes room again
    assert_eq!(world.take_diagnostics().len(), 2);
    world.schedule_tick(BlockPos::new(0, 0, 0), BlockId(60000), 1);
    assert_eq!(world.diagnostics().len(), 1);
}

#[test]
fn test_self_reschedule_with_delay_repeats() {
    let EchoWorld { mut world, echo, log } = echo_world(Some(3), quiet_config());
    let pos = BlockPos::new(1, 0, 0);
    world.schedule_tick(pos, echo, 1);
    run(&mut world, 10);
    let times: Vec<u64> = log.lock().iter().map(|(_, time)| *time).collect();
    assert_eq!(times, vec![1, 4, 7, 10]);
    assert!(world.has_scheduled_tick(pos, echo));
}

#[test]
fn test_per_tick_budget_defers_the_rest() {
    let config = EngineConfig {
        max_scheduled_ticks_per_tick: 2,
        ..quiet_config()
    };
    let EchoWorld { mut world, echo, log } = echo_world(None, config);
    for x in 0..3 {
        world.schedule_tick(BlockPos::new(x, 0, 0), echo, 1);
    }
    let mut random = Xoroshiro::from_seed(0);
    assert_eq!(world.tick(&mut random).scheduled_fired, 2);
    assert_eq!(world.tick(&mut random).scheduled_fired, 1);
    assert_eq!(log.lock().last(), Some(&(BlockPos::new(2, 0, 0), 2)));
}

#[test]
fn test_changed_block_drops_pending_tick() {
    let EchoWorld { mut world, echo, log } = echo_world(None, quiet_config());
    let pos = BlockPos::new(0, 0, 0);
    world.schedule_tick(pos, echo, 2);

    let stone = world.registries().vanilla.stone;
    put(&mut world, pos, stone);
    // The queue keeps the entry until it comes due
    assert!(world.has_scheduled_tick(pos, echo));

    let mut random = Xoroshiro::from_seed(0);
    world.tick(&mut random);
    let report = world.tick(&mut random);
    assert_eq!(report.stale_dropped, 1);
    assert_eq!(report.scheduled_fired, 0);
    assert!(log.lock().is_empty());
}

#[test]
fn test_same_block_state_change_keeps_tick() {
    let mut world = quiet_world();
    let lamp = world.registries().vanilla.redstone_lamp;
    let pos = BlockPos::new(0, 0, 0);
    put(&mut world, pos, lamp);
    world.schedule_tick(pos, lamp, 1);
    let lit = world
        .blocks()
        .set_value(world.get_block_state(&pos), &state_properties::LIT, true);
    world.set_block(pos, lit, UpdateFlags::UPDATE_NONE);

    let report = world.tick(&mut Xoroshiro::from_seed(0));
    assert_eq!(report.scheduled_fired, 1);
    // Fired with no signal around, so the lamp went out
    assert_eq!(
        world.blocks().get_value(world.get_block_state(&pos), &state_properties::LIT),
        Some(false)
    );
}

struct LampRig {
    world: World,
    lamp: BlockPos,
    lever: BlockPos,
    player: SimpleEntity,
}

impl LampRig {
    fn new() -> Self {
        let mut world = quiet_world();
        let v = world.registries().vanilla;
        let lamp = BlockPos::new(0, 0, 0);
        let lever = BlockPos::new(1, 0, 0);
        put(&mut world, lever, v.lever);
        assert!(world.place_block(lamp, v.redstone_lamp));
        Self {
            world,
            lamp,
            lever,
            player: SimpleEntity::new(7),
        }
    }

    fn flip(&mut self) {
        self.world.use_without_item(self.lever, &self.player);
    }

    fn lit(&self) -> bool {
        self.world
            .blocks()
            .get_value(self.world.get_block_state(&self.lamp), &state_properties::LIT)
            .expect("lamp has LIT")
    }

    fn tick(&mut self) {
        self.world.tick(&mut Xoroshiro::from_seed(0));
    }
}

#[test]
fn test_lamp_lights_at_once_and_goes_out_after_delay() {
    let mut rig = LampRig::new();
    assert!(!rig.lit());

    rig.flip();
    assert!(rig.lit());
    assert!(!rig.world.has_scheduled_tick(rig.lamp, rig.world.registries().vanilla.redstone_lamp));

    rig.flip();
    assert!(rig.lit());
    assert!(rig.world.has_scheduled_tick(rig.lamp, rig.world.registries().vanilla.redstone_lamp));
    for _ in 0..3 {
        rig.tick();
        assert!(rig.lit());
    }
    rig.tick();
    assert!(!rig.lit());
}

#[test]
fn test_lamp_stays_lit_when_signal_returns_before_delay() {
    let mut rig = LampRig::new();
    rig.flip();
    rig.flip();
    rig.tick();
    rig.tick();
    rig.flip();
    assert!(rig.lit());

    let listener = RecordingListener::new();
    rig.world.set_listener(Box::new(listener.clone()));
    rig.tick();
    rig.tick();
    assert!(rig.lit());
    assert!(listener.take().is_empty());
    assert_eq!(rig.world.pending_tick_count(), 0);
}

#[test]
fn test_lamp_placed_next_to_power_is_lit() {
    let mut world = quiet_world();
    let v = world.registries().vanilla;
    put(&mut world, BlockPos::new(0, 1, 0), v.redstone_block);
    assert!(world.place_block(BlockPos::new(0, 0, 0), v.redstone_lamp));
    assert_eq!(
        world
            .blocks()
            .get_value(world.get_block_state(&BlockPos::new(0, 0, 0)), &state_properties::LIT),
        Some(true)
    );
}

#[test]
fn test_lever_reports_toggle_effect() {
    let mut rig = LampRig::new();
    let listener = RecordingListener::new();
    rig.world.set_listener(Box::new(listener.clone()));
    rig.flip();
    let events = listener.take();
    assert!(events.contains(&ListenerEvent::Effect(rig.lever, EffectKind::LeverToggle, 1)));
}

#[test]
fn test_sand_falls_to_the_floor() {
    let mut world = quiet_world();
    let v = world.registries().vanilla;
    let listener = RecordingListener::new();
    world.set_listener(Box::new(listener.clone()));

    put(&mut world, BlockPos::new(0, 0, 0), v.stone);
    put(&mut world, BlockPos::new(0, 3, 0), v.sand);
    run(&mut world, 10);

    assert_eq!(world.get_block(&BlockPos::new(0, 1, 0)), v.sand);
    assert_eq!(world.get_block_state(&BlockPos::new(0, 2, 0)), BlockStateId::AIR);
    assert_eq!(world.get_block_state(&BlockPos::new(0, 3, 0)), BlockStateId::AIR);
    let falls = listener
        .take()
        .into_iter()
        .filter(|event| matches!(event, ListenerEvent::Effect(_, EffectKind::FallingBlock, _)))
        .count();
    assert_eq!(falls, 2);
}

#[test]
fn test_sand_leaves_the_bottom_of_the_world() {
    let mut world = quiet_world();
    let v = world.registries().vanilla;
    let pos = BlockPos::new(0, World::MIN_Y, 0);
    put(&mut world, pos, v.gravel);
    run(&mut world, 2);
    assert_eq!(world.get_block_state(&pos), BlockStateId::AIR);
    assert_eq!(world.get_block_state(&pos.below()), BlockStateId::AIR);
}

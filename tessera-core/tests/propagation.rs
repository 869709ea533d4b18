//! Neighbour update and shape cascade propagation.

mod common;

use std::sync::Arc;

use common::{put, quiet_config, quiet_world, registries};
use tessera_core::{
    EngineConfig, EngineError, RegistryBuilder, World,
    behavior::{BlockBehaviour, ShapeResponsive},
    world::{ListenerEvent, RecordingListener},
};
use tessera_registry::{
    BlockDef, BlockId, BlockStateId, PropertyMode,
    blocks::properties::{Direction, state_properties},
};
use tessera_utils::{BlockPos, UpdateFlags, locks::SyncMutex, random::Xoroshiro};

/// Flips LIT on every shape update, so two of them side by side never settle.
struct Flicker;

impl BlockBehaviour for Flicker {
    fn as_shape_responsive(&self) -> Option<&dyn ShapeResponsive> {
        Some(self)
    }
}

impl ShapeResponsive for Flicker {
    fn update_shape(
        &self,
        state: BlockStateId,
        world: &World,
        _pos: BlockPos,
        _direction: Direction,
        _neighbor_pos: BlockPos,
        _neighbor_state: BlockStateId,
    ) -> BlockStateId {
        world.blocks().cycle(state, &state_properties::LIT).unwrap_or(state)
    }
}

fn flicker_world(max_chained_updates: usize) -> (World, BlockId) {
    let mut builder = RegistryBuilder::vanilla(PropertyMode::Strict).expect("vanilla registries should build");
    let flicker = builder
        .register(
            BlockDef::new("tessera:flicker".parse().expect("valid identifier")).property(&state_properties::LIT),
            |_| Box::new(Flicker),
        )
        .expect("flicker should register");
    let config = EngineConfig {
        max_chained_updates,
        ..quiet_config()
    };
    (World::new(builder.build(), config), flicker)
}

#[test]
fn test_two_cycle_is_cut_at_the_limit() {
    let (mut world, flicker) = flicker_world(64);
    let a = BlockPos::new(0, 0, 0);
    let b = BlockPos::new(1, 0, 0);

    put(&mut world, a, flicker);
    assert!(world.take_diagnostics().is_empty());

    put(&mut world, b, flicker);
    assert_eq!(
        world.take_diagnostics(),
        vec![EngineError::PropagationOverflow { origin: b, processed: 64 }]
    );

    // The world keeps working after the cut
    assert_eq!(world.get_block(&a), flicker);
    assert_eq!(world.get_block(&b), flicker);
    let stone = world.registries().vanilla.stone;
    put(&mut world, BlockPos::new(10, 0, 0), stone);
    let report = world.tick(&mut Xoroshiro::from_seed(1));
    assert_eq!(report.diagnostics, 0);
    assert!(world.diagnostics().is_empty());
}

#[test]
fn test_single_flicker_settles() {
    let (mut world, flicker) = flicker_world(64);
    put(&mut world, BlockPos::new(0, 0, 0), flicker);
    put(&mut world, BlockPos::new(5, 0, 0), flicker);
    assert!(world.take_diagnostics().is_empty());
}

/// Logs every neighbour notification it receives. The cell at `trigger`
/// additionally places stone at `far` the first time it hears something.
struct Recorder {
    log: Arc<SyncMutex<Vec<BlockPos>>>,
    trigger: BlockPos,
    far: BlockPos,
    stone: BlockStateId,
}

impl BlockBehaviour for Recorder {
    fn neighbor_changed(
        &self,
        _state: BlockStateId,
        world: &mut World,
        pos: BlockPos,
        _source_block: BlockId,
        _source_pos: BlockPos,
        _moved_by_piston: bool,
    ) {
        self.log.lock().push(pos);
        if pos == self.trigger && world.get_block_state(&self.far) != self.stone {
            world.set_block(self.far, self.stone, UpdateFlags::UPDATE_ALL);
        }
    }
}

#[test]
fn test_updates_run_breadth_first() {
    let origin = BlockPos::new(0, 0, 0);
    let far = BlockPos::new(100, 0, 0);
    let trigger = Direction::ALL[0].relative(&origin);
    let log = Arc::new(SyncMutex::new(Vec::new()));

    let mut builder = RegistryBuilder::vanilla(PropertyMode::Strict).expect("vanilla registries should build");
    let stone = builder.blocks().default_state(builder.vanilla_blocks().stone);
    let recorder_log = Arc::clone(&log);
    let recorder = builder
        .register(BlockDef::new("tessera:recorder".parse().expect("valid identifier")), move |_| {
            Box::new(Recorder {
                log: recorder_log,
                trigger,
                far,
                stone,
            })
        })
        .expect("recorder should register");
    let mut world = World::new(builder.build(), quiet_config());

    for direction in Direction::ALL {
        put(&mut world, direction.relative(&origin), recorder);
    }
    put(&mut world, far.above(), recorder);
    log.lock().clear();

    world.set_block(origin, stone, UpdateFlags::UPDATE_ALL);

    let mut expected: Vec<BlockPos> = Direction::ALL
        .iter()
        .map(|direction| direction.relative(&origin))
        .collect();
    // Queued by the trigger's callback, so it runs after every original sibling
    expected.push(far.above());
    assert_eq!(*log.lock(), expected);
}

#[test]
fn test_update_none_skips_propagation() {
    let mut world = quiet_world();
    let v = world.registries().vanilla;
    let listener = RecordingListener::new();
    world.set_listener(Box::new(listener.clone()));

    let soil = BlockPos::new(0, 0, 0);
    put(&mut world, soil, v.soul_sand);
    put(&mut world, soil.above(), v.nether_wart);
    listener.take();

    world.set_block(soil, BlockStateId::AIR, UpdateFlags::UPDATE_NONE);
    // No shape cascade, so the wart stays floating
    assert_eq!(world.get_block(&soil.above()), v.nether_wart);
    assert!(listener.take().is_empty());
}

#[test]
fn test_losing_support_destroys_plants() {
    let mut world = quiet_world();
    let v = world.registries().vanilla;
    let listener = RecordingListener::new();
    world.set_listener(Box::new(listener.clone()));

    let soil = BlockPos::new(3, 64, -2);
    let wart = soil.above();
    put(&mut world, soil, v.soul_sand);
    put(&mut world, wart, v.nether_wart);
    let wart_state = world.get_block_state(&wart);
    let soil_state = world.get_block_state(&soil);
    listener.take();

    assert!(world.destroy_block(soil));
    assert_eq!(world.get_block_state(&wart), BlockStateId::AIR);
    assert_eq!(
        listener.take(),
        vec![
            ListenerEvent::BlockChanged(soil, soil_state, BlockStateId::AIR),
            ListenerEvent::BlockChanged(wart, wart_state, BlockStateId::AIR),
        ]
    );
}

#[test]
fn test_fences_connect_and_disconnect() {
    let mut world = quiet_world();
    let fence = world.registries().vanilla.oak_fence;
    let west = BlockPos::new(0, 0, 0);
    let east = BlockPos::new(1, 0, 0);

    assert!(world.place_block(west, fence));
    let lone = world.get_block_state(&west);
    assert_eq!(world.blocks().get_value(lone, &state_properties::EAST), Some(false));

    assert!(world.place_block(east, fence));
    let blocks = world.blocks();
    assert_eq!(blocks.get_value(world.get_block_state(&west), &state_properties::EAST), Some(true));
    assert_eq!(blocks.get_value(world.get_block_state(&east), &state_properties::WEST), Some(true));
    assert_eq!(blocks.get_value(world.get_block_state(&east), &state_properties::EAST), Some(false));

    assert!(world.destroy_block(east));
    assert_eq!(world.get_block_state(&west), lone);
}

#[test]
fn test_unknown_state_is_refused() {
    let mut world = quiet_world();
    let bogus = BlockStateId(u32::MAX);
    let pos = BlockPos::new(0, 0, 0);
    assert!(!world.set_block(pos, bogus, UpdateFlags::UPDATE_ALL));
    assert_eq!(world.get_block_state(&pos), BlockStateId::AIR);

    let stone = world.registries().vanilla.stone;
    put(&mut world, pos, stone);
    let stone_state = world.get_block_state(&pos);
    assert_eq!(world.swap_block(pos, bogus, UpdateFlags::UPDATE_ALL), stone_state);
    assert!(!world.set_block(pos, bogus, UpdateFlags::UPDATE_ALL));
    assert_eq!(world.get_block_state(&pos), stone_state);
}

#[test]
fn test_changes_at_the_edge_wrap_around() {
    let mut world = quiet_world();
    let v = world.registries().vanilla;
    let stone = world.blocks().default_state(v.stone);
    assert!(world.set_block(BlockPos::new(i32::MAX, 0, i32::MIN), stone, UpdateFlags::UPDATE_ALL));
    assert!(world.destroy_block(BlockPos::new(i32::MAX, 0, i32::MIN)));

    // The last column and the first one are neighbours
    let west = BlockPos::new(i32::MAX, 5, 0);
    let east = BlockPos::new(i32::MIN, 5, 0);
    assert!(world.place_block(west, v.oak_fence));
    assert!(world.place_block(east, v.oak_fence));
    let blocks = world.blocks();
    assert_eq!(blocks.get_value(world.get_block_state(&west), &state_properties::EAST), Some(true));
    assert_eq!(blocks.get_value(world.get_block_state(&east), &state_properties::WEST), Some(true));

    let copper = BlockPos::new(i32::MIN, i32::MAX, i32::MAX);
    put(&mut world, copper, v.copper_block);
    let mut random = Xoroshiro::from_seed(3);
    for _ in 0..32 {
        world.random_tick_at(copper, &mut random);
    }
    assert!(world.diagnostics().is_empty());
}

#[test]
fn test_fence_shape_grows_with_connections() {
    let mut world = quiet_world();
    let v = world.registries().vanilla;
    let pos = BlockPos::new(0, 0, 0);
    world.place_block(pos, v.oak_fence);
    let post = world.shape(&pos);
    put(&mut world, pos.offset(0, 0, -1), v.stone);
    let connected = world.shape(&pos);
    assert_eq!(post.boxes().len() + 1, connected.boxes().len());
}

#[test]
fn test_leaf_distance_follows_logs() {
    let mut world = quiet_world();
    let v = world.registries().vanilla;
    let leaves: Vec<BlockPos> = (1..=3).map(|x| BlockPos::new(x, 0, 0)).collect();
    for pos in &leaves {
        put(&mut world, *pos, v.oak_leaves);
    }
    let distance = |world: &World, pos: &BlockPos| {
        world
            .blocks()
            .get_value(world.get_block_state(pos), &state_properties::DISTANCE)
            .expect("leaves have a distance")
    };
    assert!(leaves.iter().all(|pos| distance(&world, pos) == 7));

    let log = BlockPos::new(0, 0, 0);
    put(&mut world, log, v.oak_log);
    let distances: Vec<u8> = leaves.iter().map(|pos| distance(&world, pos)).collect();
    assert_eq!(distances, vec![1, 2, 3]);
    for pos in &leaves {
        assert!(!world.registries().is_random_ticking(world.get_block_state(pos)));
    }

    assert!(world.destroy_block(log));
    assert!(world.take_diagnostics().is_empty());
    assert!(leaves.iter().all(|pos| distance(&world, pos) == 7));

    // Detached leaves decay on their next random tick
    let mut random = Xoroshiro::from_seed(0);
    for pos in &leaves {
        assert!(world.random_tick_at(*pos, &mut random));
        assert_eq!(world.get_block_state(pos), BlockStateId::AIR);
    }
}

#[test]
fn test_placed_leaves_are_persistent() {
    let mut world = quiet_world();
    let v = world.registries().vanilla;
    let pos = BlockPos::new(0, 10, 0);
    assert!(world.place_block(pos, v.oak_leaves));
    let state = world.get_block_state(&pos);
    assert_eq!(world.blocks().get_value(state, &state_properties::PERSISTENT), Some(true));
    assert!(!world.random_tick_at(pos, &mut Xoroshiro::from_seed(0)));
    assert_eq!(world.get_block_state(&pos), state);
}

/// Widens its shape updates to two blocks.
struct Emitter;

impl BlockBehaviour for Emitter {
    fn shape_update_radius(&self) -> u32 {
        2
    }
}

/// Remembers the directions its shape updates came from.
struct Watcher {
    seen: Arc<SyncMutex<Vec<Direction>>>,
}

impl BlockBehaviour for Watcher {
    fn as_shape_responsive(&self) -> Option<&dyn ShapeResponsive> {
        Some(self)
    }
}

impl ShapeResponsive for Watcher {
    fn update_shape(
        &self,
        state: BlockStateId,
        _world: &World,
        _pos: BlockPos,
        direction: Direction,
        _neighbor_pos: BlockPos,
        _neighbor_state: BlockStateId,
    ) -> BlockStateId {
        self.seen.lock().push(direction);
        state
    }
}

#[test]
fn test_shape_update_radius_reaches_past_neighbours() {
    let seen = Arc::new(SyncMutex::new(Vec::new()));
    let mut builder = RegistryBuilder::vanilla(PropertyMode::Strict).expect("vanilla registries should build");
    let emitter = builder
        .register(BlockDef::new("tessera:emitter".parse().expect("valid identifier")), |_| Box::new(Emitter))
        .expect("emitter should register");
    let watcher_seen = Arc::clone(&seen);
    let watcher = builder
        .register(BlockDef::new("tessera:watcher".parse().expect("valid identifier")), move |_| {
            Box::new(Watcher { seen: watcher_seen })
        })
        .expect("watcher should register");
    let mut world = World::new(builder.build(), quiet_config());

    put(&mut world, BlockPos::new(2, 0, 0), watcher);
    put(&mut world, BlockPos::new(0, 0, 3), watcher);
    seen.lock().clear();

    put(&mut world, BlockPos::new(0, 0, 0), emitter);
    // (2, 0, 0) is in range, (0, 0, 3) is not
    assert_eq!(*seen.lock(), vec![Direction::West]);
}

#[test]
fn test_registries_are_shared_between_worlds() {
    let registries = registries();
    let mut first = World::new(Arc::clone(&registries), quiet_config());
    let second = World::new(Arc::clone(&registries), quiet_config());
    put(&mut first, BlockPos::new(0, 0, 0), registries.vanilla.stone);
    assert_eq!(second.get_block_state(&BlockPos::new(0, 0, 0)), BlockStateId::AIR);
    assert_eq!(Arc::strong_count(&registries), 3);
}

//! Built-in block behaviours driven through the world.

mod common;

use std::sync::Arc;

use common::{put, quiet_config, quiet_world, registries};
use tessera_core::{
    EngineConfig, World,
    behavior::InteractionResult,
    block_entity::entities::{SkullBlockEntity, SkullOwner},
    world::{EffectKind, FeatureRef, ListenerEvent, MenuKind, RecordingListener, SimpleEntity},
};
use tessera_registry::{BlockStateId, blocks::properties::state_properties};
use tessera_utils::{BlockPos, UpdateFlags, random::Xoroshiro};

fn wart_age(world: &World, pos: &BlockPos) -> u8 {
    world
        .blocks()
        .get_value(world.get_block_state(pos), &state_properties::AGE_3)
        .expect("nether wart has an age")
}

#[test]
fn test_nether_wart_ages_monotonically() {
    let mut world = quiet_world();
    let v = world.registries().vanilla;
    let soil = BlockPos::new(0, 0, 0);
    let wart = soil.above();
    put(&mut world, soil, v.soul_sand);
    assert!(world.place_block(wart, v.nether_wart));
    assert_eq!(wart_age(&world, &wart), 0);

    let mut random = Xoroshiro::from_seed(42);
    let mut ages = vec![0];
    for _ in 0..100 {
        world.random_tick_at(wart, &mut random);
        ages.push(wart_age(&world, &wart));
    }
    assert!(ages.windows(2).all(|pair| pair[1] == pair[0] || pair[1] == pair[0] + 1));
    assert!(ages.iter().all(|age| *age <= 3));

    for _ in 0..1_000 {
        if wart_age(&world, &wart) == 3 {
            break;
        }
        world.random_tick_at(wart, &mut random);
    }
    assert_eq!(wart_age(&world, &wart), 3);
    // Fully grown wart leaves the random tick index
    assert!(!world.random_tick_at(wart, &mut random));
    assert_eq!(world.grid().random_ticking_count(), 0);

    let height = world.shape(&wart).bounds().expect("wart has a shape").height();
    assert!((height - 14.0 / 16.0).abs() < f64::EPSILON);
}

#[test]
fn test_nether_wart_grows_from_world_ticks() {
    let config = EngineConfig {
        random_tick_speed: 4096,
        ..quiet_config()
    };
    let mut world = World::new(registries(), config);
    let v = world.registries().vanilla;
    let soil = BlockPos::new(8, 8, 8);
    put(&mut world, soil, v.soul_sand);
    put(&mut world, soil.above(), v.nether_wart);

    let mut random = Xoroshiro::from_seed(3);
    let mut random_ticks = 0;
    for _ in 0..400 {
        random_ticks += world.tick(&mut random).random_ticks;
    }
    assert!(random_ticks > 0);
    assert_eq!(wart_age(&world, &soil.above()), 3);
}

#[test]
fn test_nether_wart_needs_soul_sand() {
    let mut world = quiet_world();
    let v = world.registries().vanilla;
    put(&mut world, BlockPos::new(0, 0, 0), v.stone);
    assert!(!world.place_block(BlockPos::new(0, 1, 0), v.nether_wart));
    assert_eq!(world.get_block_state(&BlockPos::new(0, 1, 0)), BlockStateId::AIR);
}

#[test]
fn test_copper_weathers_one_stage() {
    let mut world = quiet_world();
    let v = world.registries().vanilla;
    let listener = RecordingListener::new();
    world.set_listener(Box::new(listener.clone()));
    let pos = BlockPos::new(0, 0, 0);
    put(&mut world, pos, v.copper_block);

    let mut random = Xoroshiro::from_seed(11);
    for _ in 0..5_000 {
        if world.get_block(&pos) != v.copper_block {
            break;
        }
        world.random_tick_at(pos, &mut random);
    }
    assert_eq!(world.get_block(&pos), v.exposed_copper);
    assert!(
        listener
            .take()
            .contains(&ListenerEvent::Effect(pos, EffectKind::Weathered, 1))
    );
}

#[test]
fn test_younger_neighbour_blocks_weathering() {
    let mut world = quiet_world();
    let v = world.registries().vanilla;
    let exposed = BlockPos::new(0, 0, 0);
    put(&mut world, exposed, v.exposed_copper);
    put(&mut world, BlockPos::new(0, 0, 3), v.copper_block);

    let mut random = Xoroshiro::from_seed(11);
    for _ in 0..5_000 {
        world.random_tick_at(exposed, &mut random);
    }
    assert_eq!(world.get_block(&exposed), v.exposed_copper);
}

#[test]
fn test_oxidized_copper_is_final() {
    let mut world = quiet_world();
    let v = world.registries().vanilla;
    let pos = BlockPos::new(0, 0, 0);
    put(&mut world, pos, v.oxidized_copper);
    assert!(!world.random_tick_at(pos, &mut Xoroshiro::from_seed(0)));
    assert_eq!(world.grid().random_ticking_count(), 0);
}

#[test]
fn test_magma_hurts_walkers_but_not_sneakers() {
    let mut world = quiet_world();
    let v = world.registries().vanilla;
    let listener = RecordingListener::new();
    world.set_listener(Box::new(listener.clone()));
    let pos = BlockPos::new(0, 0, 0);
    put(&mut world, pos, v.magma_block);
    listener.take();

    let mut walker = SimpleEntity::new(3);
    assert!(world.entity_step_on(pos, &mut walker));
    assert!((walker.health - 19.0).abs() < f32::EPSILON);
    assert_eq!(listener.take(), vec![ListenerEvent::Effect(pos, EffectKind::Hurt, 3)]);

    let mut sneaker = SimpleEntity::new(4);
    sneaker.sneaking = true;
    world.entity_step_on(pos, &mut sneaker);
    assert!((sneaker.health - 20.0).abs() < f32::EPSILON);
    assert!(listener.take().is_empty());

    assert!(!world.entity_step_on(BlockPos::new(5, 5, 5), &mut walker));
}

#[test]
fn test_farmland_is_trampled_and_drops_its_crop() {
    let mut world = quiet_world();
    let v = world.registries().vanilla;
    let listener = RecordingListener::new();
    world.set_listener(Box::new(listener.clone()));
    let soil = BlockPos::new(0, 0, 0);
    assert!(world.place_block(soil, v.farmland));
    assert!(world.place_block(soil.above(), v.wheat));
    listener.take();

    let mut entity = SimpleEntity::new(9);
    let mut random = Xoroshiro::from_seed(5);
    assert!(world.entity_fall_on(soil, &mut entity, 10.0, &mut random));

    assert_eq!(world.get_block(&soil), v.dirt);
    assert_eq!(world.get_block_state(&soil.above()), BlockStateId::AIR);
    assert_eq!(
        listener.take().first(),
        Some(&ListenerEvent::Effect(soil, EffectKind::Trample, 9))
    );
}

#[test]
fn test_short_falls_do_not_trample() {
    let mut world = quiet_world();
    let v = world.registries().vanilla;
    let soil = BlockPos::new(0, 0, 0);
    world.place_block(soil, v.farmland);
    let mut entity = SimpleEntity::new(1);
    let mut random = Xoroshiro::from_seed(5);
    for _ in 0..50 {
        world.entity_fall_on(soil, &mut entity, 0.5, &mut random);
    }
    assert_eq!(world.get_block(&soil), v.farmland);
}

#[test]
fn test_farmland_under_a_solid_block() {
    let mut world = quiet_world();
    let v = world.registries().vanilla;
    let covered = BlockPos::new(0, 0, 0);
    put(&mut world, covered.above(), v.stone);
    assert!(world.place_block(covered, v.farmland));
    assert_eq!(world.get_block(&covered), v.dirt);

    let open = BlockPos::new(4, 0, 0);
    assert!(world.place_block(open, v.farmland));
    put(&mut world, open.above(), v.stone);
    assert_eq!(world.get_block(&open), v.dirt);
}

#[test]
fn test_bare_dry_farmland_reverts_on_random_tick() {
    let mut world = quiet_world();
    let v = world.registries().vanilla;
    let bare = BlockPos::new(0, 0, 0);
    let planted = BlockPos::new(3, 0, 0);
    world.place_block(bare, v.farmland);
    world.place_block(planted, v.farmland);
    world.place_block(planted.above(), v.wheat);

    let mut random = Xoroshiro::from_seed(0);
    world.random_tick_at(bare, &mut random);
    world.random_tick_at(planted, &mut random);
    assert_eq!(world.get_block(&bare), v.dirt);
    assert_eq!(world.get_block(&planted), v.farmland);
}

#[test]
fn test_bonemeal_grows_wheat() {
    let mut world = quiet_world();
    let v = world.registries().vanilla;
    let listener = RecordingListener::new();
    world.set_listener(Box::new(listener.clone()));
    let crop = BlockPos::new(0, 1, 0);
    world.place_block(crop.below(), v.farmland);
    world.place_block(crop, v.wheat);
    listener.take();

    let mut random = Xoroshiro::from_seed(8);
    assert!(world.apply_bonemeal(crop, &mut random));
    let age = world
        .blocks()
        .get_value(world.get_block_state(&crop), &state_properties::AGE_7)
        .expect("wheat has an age");
    assert!((2..=7).contains(&age));
    assert_eq!(
        listener.take().first(),
        Some(&ListenerEvent::Effect(crop, EffectKind::BonemealGrowth, 0))
    );

    while world.apply_bonemeal(crop, &mut random) {}
    let grown = world.get_block_state(&crop);
    assert_eq!(world.blocks().get_value(grown, &state_properties::AGE_7), Some(7));
    assert!(!world.registries().is_random_ticking(grown));
}

#[test]
fn test_fungus_requests_its_feature() {
    let mut world = quiet_world();
    let v = world.registries().vanilla;
    let listener = RecordingListener::new();
    world.set_listener(Box::new(listener.clone()));
    let fungus = BlockPos::new(0, 1, 0);
    put(&mut world, fungus.below(), v.crimson_nylium);
    assert!(world.place_block(fungus, v.crimson_fungus));
    listener.take();

    let mut random = Xoroshiro::from_seed(21);
    let mut features = Vec::new();
    for _ in 0..50 {
        assert!(world.apply_bonemeal(fungus, &mut random));
        features.extend(
            listener
                .take()
                .into_iter()
                .filter(|event| matches!(event, ListenerEvent::Feature(..))),
        );
    }
    assert!(!features.is_empty());
    assert!(features.len() < 50);
    assert!(
        features
            .iter()
            .all(|event| *event == ListenerEvent::Feature(fungus, FeatureRef::vanilla("crimson_fungus_planted")))
    );
}

#[test]
fn test_vetoed_feature_is_never_placed() {
    let mut world = quiet_world();
    let v = world.registries().vanilla;
    let listener = RecordingListener::new();
    listener.veto(FeatureRef::vanilla("warped_fungus_planted"));
    world.set_listener(Box::new(listener.clone()));
    let fungus = BlockPos::new(0, 1, 0);
    put(&mut world, fungus.below(), v.warped_nylium);
    world.place_block(fungus, v.warped_fungus);

    let mut random = Xoroshiro::from_seed(21);
    for _ in 0..50 {
        world.apply_bonemeal(fungus, &mut random);
    }
    assert!(
        !listener
            .take()
            .iter()
            .any(|event| matches!(event, ListenerEvent::Feature(..)))
    );
    assert_eq!(world.get_block(&fungus), v.warped_fungus);
}

#[test]
fn test_fungus_on_the_wrong_soil_ignores_bonemeal() {
    let mut world = quiet_world();
    let v = world.registries().vanilla;
    let fungus = BlockPos::new(0, 1, 0);
    put(&mut world, fungus.below(), v.stone);
    assert!(world.place_block(fungus, v.crimson_fungus));
    assert!(!world.apply_bonemeal(fungus, &mut Xoroshiro::from_seed(0)));
}

#[test]
fn test_crafting_table_opens_menu() {
    let mut world = quiet_world();
    let v = world.registries().vanilla;
    let listener = RecordingListener::new();
    world.set_listener(Box::new(listener.clone()));
    let pos = BlockPos::new(2, 0, 2);
    put(&mut world, pos, v.crafting_table);
    listener.take();

    let player = SimpleEntity::new(1);
    assert_eq!(world.use_without_item(pos, &player), InteractionResult::Success);
    assert_eq!(listener.take(), vec![ListenerEvent::Menu(pos, MenuKind::Crafting)]);
    assert_eq!(world.use_without_item(pos.above(), &player), InteractionResult::Pass);
}

#[test]
fn test_skull_sidecar_follows_its_block() {
    let mut world = quiet_world();
    let v = world.registries().vanilla;
    let pos = BlockPos::new(0, 0, 0);
    assert!(world.place_block(pos, v.player_head));
    assert_eq!(world.block_entity_count(), 1);

    let entity = world.get_block_entity(&pos).expect("heads own a block entity");
    {
        let mut guard = entity.lock();
        assert_eq!(guard.kind(), SkullBlockEntity::KIND);
        let skull = guard
            .as_any_mut()
            .downcast_mut::<SkullBlockEntity>()
            .expect("entity is a skull");
        skull.set_owner(Some(SkullOwner {
            name: "Notch".to_string(),
            id: None,
        }));
    }

    // Power it: the block stays the same, so the sidecar survives
    put(&mut world, pos.above(), v.redstone_block);
    let powered = world.get_block_state(&pos);
    assert_eq!(world.blocks().get_value(powered, &state_properties::POWERED), Some(true));
    let same = world.get_block_entity(&pos).expect("sidecar survives a state change");
    assert!(Arc::ptr_eq(&entity, &same));
    assert_eq!(entity.lock().get_block_state(), powered);

    assert!(world.destroy_block(pos));
    assert!(world.get_block_entity(&pos).is_none());
    assert_eq!(world.block_entity_count(), 0);
    assert!(entity.lock().is_removed());
}

#[test]
fn test_replacing_a_head_gives_a_fresh_sidecar() {
    let mut world = quiet_world();
    let v = world.registries().vanilla;
    let pos = BlockPos::new(0, 0, 0);
    world.place_block(pos, v.player_head);
    let first = world.get_block_entity(&pos).expect("heads own a block entity");

    put(&mut world, pos, v.stone);
    assert!(first.lock().is_removed());
    let head = world.blocks().default_state(v.player_head);
    world.set_block(pos, head, UpdateFlags::UPDATE_ALL);
    let second = world.get_block_entity(&pos).expect("heads own a block entity");
    assert!(!Arc::ptr_eq(&first, &second));
    assert!(!second.lock().is_removed());
}

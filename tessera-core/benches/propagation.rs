#![allow(missing_docs)]
//! Benchmarks for neighbour propagation and the tick loop.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::{hint::black_box, sync::Arc};

use tessera_core::{EngineConfig, Registries, RegistryBuilder, World};
use tessera_registry::PropertyMode;
use tessera_utils::{BlockPos, UpdateFlags, random::Xoroshiro};

fn registries() -> Arc<Registries> {
    RegistryBuilder::vanilla(PropertyMode::Permissive)
        .expect("vanilla registries should build")
        .build()
}

fn floor(world: &mut World, radius: i32) {
    let stone = world.blocks().default_state(world.registries().vanilla.stone);
    for x in -radius..=radius {
        for z in -radius..=radius {
            world.set_block(BlockPos::new(x, -1, z), stone, UpdateFlags::UPDATE_NONE);
        }
    }
}

fn bench_fence_row(c: &mut Criterion) {
    let registries = registries();
    let mut group = c.benchmark_group("fence_row");

    for length in [16, 64, 256] {
        group.bench_with_input(BenchmarkId::from_parameter(length), &length, |b, &length| {
            b.iter(|| {
                let mut world = World::new(Arc::clone(&registries), EngineConfig::default());
                let fence = world.registries().vanilla.oak_fence;
                for x in 0..length {
                    world.place_block(BlockPos::new(x, 0, 0), fence);
                }
                black_box(world.block_entity_count());
            });
        });
    }

    group.finish();
}

fn bench_leaves_decay(c: &mut Criterion) {
    let registries = registries();

    c.bench_function("leaves_cascade_on_log_removal", |b| {
        b.iter(|| {
            let mut world = World::new(Arc::clone(&registries), EngineConfig::default());
            let v = world.registries().vanilla;
            let log = world.blocks().default_state(v.oak_log);
            let leaves = world.blocks().default_state(v.oak_leaves);
            world.set_block(BlockPos::ZERO, log, UpdateFlags::UPDATE_ALL);
            for x in -3..=3 {
                for z in -3..=3 {
                    world.set_block(BlockPos::new(x, 1, z), leaves, UpdateFlags::UPDATE_ALL);
                }
            }
            world.destroy_block(black_box(BlockPos::ZERO));
        });
    });
}

fn bench_tick_loop(c: &mut Criterion) {
    let registries = registries();
    let config = EngineConfig {
        random_tick_speed: 64,
        ..EngineConfig::default()
    };

    c.bench_function("farm_100_ticks", |b| {
        b.iter(|| {
            let mut world = World::new(Arc::clone(&registries), config.clone());
            let v = world.registries().vanilla;
            floor(&mut world, 8);
            for x in -8..=8 {
                world.place_block(BlockPos::new(x, 0, 0), v.farmland);
                world.place_block(BlockPos::new(x, 1, 0), v.wheat);
            }
            let mut random = Xoroshiro::from_seed(42);
            for _ in 0..100 {
                black_box(world.tick(&mut random));
            }
        });
    });
}

criterion_group!(benches, bench_fence_row, bench_leaves_decay, bench_tick_loop);
criterion_main!(benches);

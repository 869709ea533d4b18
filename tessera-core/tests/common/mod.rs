#![allow(dead_code)]

use std::sync::Arc;

use tessera_core::{EngineConfig, Registries, RegistryBuilder, World};
use tessera_registry::{BlockId, BlockStateId, PropertyMode};
use tessera_utils::{BlockPos, UpdateFlags};

pub fn registries() -> Arc<Registries> {
    RegistryBuilder::vanilla(PropertyMode::Strict)
        .expect("vanilla registries should build")
        .build()
}

/// Config with random ticks off, so only explicit ticks change the world.
pub fn quiet_config() -> EngineConfig {
    EngineConfig {
        random_tick_speed: 0,
        ..EngineConfig::default()
    }
}

pub fn quiet_world() -> World {
    World::new(registries(), quiet_config())
}

pub fn default_state(world: &World, block: BlockId) -> BlockStateId {
    world.blocks().default_state(block)
}

/// Writes the default state of `block` with full notifications.
pub fn put(world: &mut World, pos: BlockPos, block: BlockId) {
    let state = default_state(world, block);
    world.set_block(pos, state, UpdateFlags::UPDATE_ALL);
}

/// A stone floor of `radius` around the origin at y = -1.
pub fn stone_floor(world: &mut World, radius: i32) {
    let stone = world.registries().vanilla.stone;
    let state = default_state(world, stone);
    for x in -radius..=radius {
        for z in -radius..=radius {
            world.set_block(BlockPos::new(x, -1, z), state, UpdateFlags::UPDATE_NONE);
        }
    }
}

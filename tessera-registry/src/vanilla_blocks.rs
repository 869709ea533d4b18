//! The built-in block list.

use crate::{
    blocks::{
        BlockConfig, BlockDef, BlockId, BlockRegistry,
        properties::{Axis, Direction, state_properties},
        shapes::RenderShape,
    },
    error::RegistryError,
};

// TODO: Generate this list from the data generator output instead of hardcoding it

/// Ids of the built-in blocks, filled in by [`register_vanilla_blocks`].
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VanillaBlocks {
    pub air: BlockId,
    pub stone: BlockId,
    pub dirt: BlockId,
    pub grass_block: BlockId,
    pub glass: BlockId,
    pub barrier: BlockId,
    pub soul_sand: BlockId,
    pub nether_wart: BlockId,
    pub farmland: BlockId,
    pub wheat: BlockId,
    pub redstone_lamp: BlockId,
    pub lever: BlockId,
    pub redstone_block: BlockId,
    pub oak_fence: BlockId,
    pub oak_log: BlockId,
    pub oak_leaves: BlockId,
    pub copper_block: BlockId,
    pub exposed_copper: BlockId,
    pub weathered_copper: BlockId,
    pub oxidized_copper: BlockId,
    pub sand: BlockId,
    pub gravel: BlockId,
    pub magma_block: BlockId,
    pub crimson_nylium: BlockId,
    pub crimson_fungus: BlockId,
    pub warped_nylium: BlockId,
    pub warped_fungus: BlockId,
    pub crafting_table: BlockId,
    pub player_head: BlockId,
}

/// Registers the built-in blocks. Air is registered first so it gets state 0.
pub fn register_vanilla_blocks(registry: &mut BlockRegistry) -> Result<VanillaBlocks, RegistryError> {
    let plant = BlockConfig::NON_SOLID;

    let blocks = VanillaBlocks {
        air: registry.register(BlockDef::vanilla("air").config(BlockConfig::AIR))?,
        stone: registry.register(BlockDef::vanilla("stone"))?,
        dirt: registry.register(BlockDef::vanilla("dirt"))?,
        grass_block: registry.register(BlockDef::vanilla("grass_block"))?,
        glass: registry.register(BlockDef::vanilla("glass").config(BlockConfig::NON_SOLID))?,
        barrier: registry.register(
            BlockDef::vanilla("barrier").config(BlockConfig::SOLID.render_shape(RenderShape::Invisible)),
        )?,
        soul_sand: registry.register(BlockDef::vanilla("soul_sand"))?,
        nether_wart: registry.register(
            BlockDef::vanilla("nether_wart")
                .property(&state_properties::AGE_3)
                .config(plant),
        )?,
        farmland: registry.register(
            BlockDef::vanilla("farmland")
                .property(&state_properties::MOISTURE)
                .config(BlockConfig::NON_SOLID),
        )?,
        wheat: registry.register(
            BlockDef::vanilla("wheat")
                .property(&state_properties::AGE_7)
                .config(plant),
        )?,
        redstone_lamp: registry.register(
            BlockDef::vanilla("redstone_lamp").property(&state_properties::LIT),
        )?,
        lever: registry.register(
            BlockDef::vanilla("lever")
                .property(&state_properties::FACING)
                .property(&state_properties::POWERED)
                .default_value(&state_properties::FACING, Direction::North)
                .config(BlockConfig::NON_SOLID),
        )?,
        redstone_block: registry.register(BlockDef::vanilla("redstone_block"))?,
        oak_fence: registry.register(
            BlockDef::vanilla("oak_fence")
                .property(&state_properties::EAST)
                .property(&state_properties::NORTH)
                .property(&state_properties::SOUTH)
                .property(&state_properties::WATERLOGGED)
                .property(&state_properties::WEST)
                .config(BlockConfig::NON_SOLID),
        )?,
        oak_log: registry.register(
            BlockDef::vanilla("oak_log")
                .property(&state_properties::AXIS)
                .default_value(&state_properties::AXIS, Axis::Y),
        )?,
        oak_leaves: registry.register(
            BlockDef::vanilla("oak_leaves")
                .property(&state_properties::DISTANCE)
                .property(&state_properties::PERSISTENT)
                .property(&state_properties::WATERLOGGED)
                .default_value(&state_properties::DISTANCE, 7)
                .config(BlockConfig::NON_SOLID),
        )?,
        copper_block: registry.register(BlockDef::vanilla("copper_block"))?,
        exposed_copper: registry.register(BlockDef::vanilla("exposed_copper"))?,
        weathered_copper: registry.register(BlockDef::vanilla("weathered_copper"))?,
        oxidized_copper: registry.register(BlockDef::vanilla("oxidized_copper"))?,
        sand: registry.register(BlockDef::vanilla("sand"))?,
        gravel: registry.register(BlockDef::vanilla("gravel"))?,
        magma_block: registry.register(BlockDef::vanilla("magma_block"))?,
        crimson_nylium: registry.register(BlockDef::vanilla("crimson_nylium"))?,
        crimson_fungus: registry.register(BlockDef::vanilla("crimson_fungus").config(plant))?,
        warped_nylium: registry.register(BlockDef::vanilla("warped_nylium"))?,
        warped_fungus: registry.register(BlockDef::vanilla("warped_fungus").config(plant))?,
        crafting_table: registry.register(BlockDef::vanilla("crafting_table"))?,
        player_head: registry.register(
            BlockDef::vanilla("player_head")
                .property(&state_properties::POWERED)
                .property(&state_properties::ROTATION_16)
                .config(BlockConfig::NON_SOLID.render_shape(RenderShape::AnimatedOnly)),
        )?,
    };
    log::info!(
        "Registered {} vanilla blocks with {} states",
        registry.block_count(),
        registry.state_count()
    );
    Ok(blocks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::BlockStateId;

    #[test]
    fn test_vanilla_registration() {
        let mut registry = BlockRegistry::default();
        let blocks = register_vanilla_blocks(&mut registry).expect("vanilla blocks should register");
        assert_eq!(blocks.air, BlockId::AIR);
        assert_eq!(registry.default_state(blocks.air), BlockStateId::AIR);
        // 2^4 connections * 2 waterlogged
        assert_eq!(registry.block(blocks.oak_fence).state_count(), 32);
        assert_eq!(
            registry.get_value(registry.default_state(blocks.oak_leaves), &state_properties::DISTANCE),
            Some(7)
        );
    }

    #[test]
    fn test_registering_twice_fails() {
        let mut registry = BlockRegistry::default();
        register_vanilla_blocks(&mut registry).expect("vanilla blocks should register");
        assert!(matches!(
            register_vanilla_blocks(&mut registry),
            Err(RegistryError::DuplicateBlock(_))
        ));
    }
}

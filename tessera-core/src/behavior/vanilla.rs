//! Binds the built-in blocks to their behaviours.

use tessera_registry::{BlockRegistry, VanillaBlocks};

use crate::{
    behavior::{
        BlockBehaviourRegistry,
        blocks::{
            CraftingTableBlock, CropBlock, FallingBlock, FarmlandBlock, FenceBlock, FungusBlock,
            LeavesBlock, LeverBlock, MagmaBlock, NetherWartBlock, RedstoneBlock, RedstoneLampBlock,
            SimpleBlock, SkullBlock, WeatheringCopperBlock,
        },
    },
    error::EngineError,
    world::FeatureRef,
};

/// Registers a behaviour for every built-in block except air, which keeps the
/// default behaviour.
pub fn register_vanilla_behaviours(
    blocks: &BlockRegistry,
    behaviours: &mut BlockBehaviourRegistry,
    vanilla: &VanillaBlocks,
) -> Result<(), EngineError> {
    let v = vanilla;

    for plain in [
        v.stone,
        v.dirt,
        v.grass_block,
        v.glass,
        v.barrier,
        v.soul_sand,
        v.oak_log,
        v.crimson_nylium,
        v.warped_nylium,
    ] {
        behaviours.register(blocks, plain, Box::new(SimpleBlock::new(plain)))?;
    }

    behaviours.register(blocks, v.nether_wart, Box::new(NetherWartBlock::new(v.nether_wart, v.soul_sand)))?;
    behaviours.register(blocks, v.wheat, Box::new(CropBlock::new(v.wheat, v.farmland)))?;
    behaviours.register(blocks, v.farmland, Box::new(FarmlandBlock::new(v.farmland, v.dirt, v.wheat)))?;
    behaviours.register(blocks, v.redstone_lamp, Box::new(RedstoneLampBlock::new(v.redstone_lamp)))?;
    behaviours.register(blocks, v.lever, Box::new(LeverBlock::new(v.lever)))?;
    behaviours.register(blocks, v.redstone_block, Box::new(RedstoneBlock::new(v.redstone_block)))?;
    behaviours.register(blocks, v.oak_fence, Box::new(FenceBlock::new(v.oak_fence)))?;
    behaviours.register(blocks, v.oak_leaves, Box::new(LeavesBlock::new(v.oak_leaves, v.oak_log)))?;

    let copper = [
        v.copper_block,
        v.exposed_copper,
        v.weathered_copper,
        v.oxidized_copper,
    ];
    for (age, block) in copper.iter().enumerate() {
        let next = copper.get(age + 1).copied();
        behaviours.register(
            blocks,
            *block,
            Box::new(WeatheringCopperBlock::new(*block, age as u8, next)),
        )?;
    }

    behaviours.register(blocks, v.sand, Box::new(FallingBlock::new(v.sand)))?;
    behaviours.register(blocks, v.gravel, Box::new(FallingBlock::new(v.gravel)))?;
    behaviours.register(blocks, v.magma_block, Box::new(MagmaBlock::new(v.magma_block)))?;
    behaviours.register(
        blocks,
        v.crimson_fungus,
        Box::new(FungusBlock::new(
            v.crimson_fungus,
            v.crimson_nylium,
            FeatureRef::vanilla("crimson_fungus_planted"),
        )),
    )?;
    behaviours.register(
        blocks,
        v.warped_fungus,
        Box::new(FungusBlock::new(
            v.warped_fungus,
            v.warped_nylium,
            FeatureRef::vanilla("warped_fungus_planted"),
        )),
    )?;
    behaviours.register(blocks, v.crafting_table, Box::new(CraftingTableBlock::new(v.crafting_table)))?;
    behaviours.register(blocks, v.player_head, Box::new(SkullBlock::new(v.player_head)))?;

    log::info!("Registered behaviours for {} blocks", blocks.block_count() - 1);
    Ok(())
}

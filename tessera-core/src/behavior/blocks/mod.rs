//! Block behavior implementations for vanilla blocks.
//!
//! The bindings from block ids to these types live in `behavior::vanilla`.

mod crafting_table_block;
mod crop_block;
mod falling_block;
mod farmland_block;
mod fence_block;
mod fungus_block;
mod leaves_block;
mod magma_block;
mod nether_wart_block;
mod redstone_blocks;
mod redstone_lamp_block;
mod simple_block;
mod skull_block;
mod weathering_copper_block;

pub use crafting_table_block::CraftingTableBlock;
pub use crop_block::CropBlock;
pub use falling_block::FallingBlock;
pub use farmland_block::FarmlandBlock;
pub use fence_block::FenceBlock;
pub use fungus_block::FungusBlock;
pub use leaves_block::LeavesBlock;
pub use magma_block::MagmaBlock;
pub use nether_wart_block::NetherWartBlock;
pub use redstone_blocks::{LeverBlock, RedstoneBlock};
pub use redstone_lamp_block::RedstoneLampBlock;
pub use simple_block::SimpleBlock;
pub use skull_block::SkullBlock;
pub use weathering_copper_block::WeatheringCopperBlock;

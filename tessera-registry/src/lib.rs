//! Block types, properties and the interned block state table.

pub mod blocks;
pub mod error;
pub mod vanilla_blocks;

pub use blocks::{
    Block, BlockConfig, BlockDef, BlockId, BlockRegistry, BlockStateId, BlockStateRecord,
    MAX_STATES_PER_BLOCK, PropertyMode,
};
pub use error::RegistryError;
pub use vanilla_blocks::{VanillaBlocks, register_vanilla_blocks};

/// Registries that stop accepting entries once built.
pub trait RegistryExt {
    /// Rejects every further registration.
    fn freeze(&mut self);
}

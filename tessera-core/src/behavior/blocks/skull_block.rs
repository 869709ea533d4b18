//! Skull block behavior implementation.
//!
//! Heads carry a [`SkullBlockEntity`] with the owner profile, and track whether
//! they receive a redstone signal.

use std::sync::Arc;

use tessera_registry::{
    BlockId, BlockRegistry, BlockStateId,
    blocks::{
        properties::{BoolProperty, state_properties},
        shapes::VoxelShape,
    },
};
use tessera_utils::{BlockPos, UpdateFlags, locks::SyncMutex};

use crate::{
    behavior::{BlockBehaviour, EntityBlock},
    block_entity::{SharedBlockEntity, entities::SkullBlockEntity},
    world::World,
};

/// Behavior for player and mob heads.
pub struct SkullBlock {
    block: BlockId,
}

impl SkullBlock {
    /// Powered property.
    pub const POWERED: &'static BoolProperty = &state_properties::POWERED;

    /// Creates a new skull behavior for the given block.
    #[must_use]
    pub const fn new(block: BlockId) -> Self {
        Self { block }
    }
}

impl BlockBehaviour for SkullBlock {
    fn get_state_for_placement(
        &self,
        default_state: BlockStateId,
        world: &World,
        pos: BlockPos,
    ) -> Option<BlockStateId> {
        Some(
            world
                .blocks()
                .set_value(default_state, Self::POWERED, world.has_neighbor_signal(pos)),
        )
    }

    fn neighbor_changed(
        &self,
        state: BlockStateId,
        world: &mut World,
        pos: BlockPos,
        _source_block: BlockId,
        _source_pos: BlockPos,
        _moved_by_piston: bool,
    ) {
        let powered = world.has_neighbor_signal(pos);
        if world.blocks().get_value(state, Self::POWERED) != Some(powered) {
            let updated = world.blocks().set_value(state, Self::POWERED, powered);
            world.set_block(pos, updated, UpdateFlags::UPDATE_CLIENTS);
        }
    }

    fn shape(&self, _state: BlockStateId, _blocks: &BlockRegistry) -> VoxelShape {
        VoxelShape::cuboid(4.0, 0.0, 4.0, 12.0, 8.0, 12.0)
    }

    fn as_entity_block(&self) -> Option<&dyn EntityBlock> {
        Some(self)
    }
}

impl EntityBlock for SkullBlock {
    fn new_block_entity(&self, pos: BlockPos, state: BlockStateId) -> SharedBlockEntity {
        log::trace!("creating skull entity for block {:?} at {pos}", self.block);
        Arc::new(SyncMutex::new(SkullBlockEntity::new(pos, state)))
    }
}

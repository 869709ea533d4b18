//! Redstone power sources: the lever and the block of redstone.

use tessera_registry::{
    BlockId, BlockRegistry, BlockStateId,
    blocks::{
        properties::{BoolProperty, Direction, EnumProperty, state_properties},
        shapes::VoxelShape,
    },
};
use tessera_utils::{BlockPos, UpdateFlags};

use crate::{
    behavior::{BlockBehaviour, InteractionResult, RedstoneSource},
    world::{EffectKind, EntityView, World},
};

/// Full signal strength.
const MAX_SIGNAL: u8 = 15;

/// Behavior for the lever.
///
/// The lever hangs on the block behind it (opposite its facing). Flipping it
/// toggles `powered` and notifies both its own neighbours and the neighbours
/// of the block it is attached to.
pub struct LeverBlock {
    block: BlockId,
}

impl LeverBlock {
    /// Facing property.
    pub const FACING: &'static EnumProperty<Direction> = &state_properties::FACING;
    /// Powered property.
    pub const POWERED: &'static BoolProperty = &state_properties::POWERED;

    /// Creates a new lever behavior for the given block.
    #[must_use]
    pub const fn new(block: BlockId) -> Self {
        Self { block }
    }

    fn attached_pos(blocks: &BlockRegistry, state: BlockStateId, pos: BlockPos) -> BlockPos {
        let facing = blocks.get_value(state, Self::FACING).unwrap_or(Direction::North);
        facing.opposite().relative(&pos)
    }

    fn is_powered(blocks: &BlockRegistry, state: BlockStateId) -> bool {
        blocks.get_value(state, Self::POWERED).unwrap_or(false)
    }
}

impl BlockBehaviour for LeverBlock {
    fn on_remove(
        &self,
        state: BlockStateId,
        world: &mut World,
        pos: BlockPos,
        _new_state: BlockStateId,
        moved_by_piston: bool,
    ) {
        if !moved_by_piston && Self::is_powered(world.blocks(), state) {
            let attached = Self::attached_pos(world.blocks(), state, pos);
            world.update_neighbors_at(attached, self.block);
        }
    }

    fn use_without_item(
        &self,
        state: BlockStateId,
        world: &mut World,
        pos: BlockPos,
        player: &dyn EntityView,
    ) -> InteractionResult {
        let toggled = world.blocks().set_value(state, Self::POWERED, !Self::is_powered(world.blocks(), state));
        let powered = Self::is_powered(world.blocks(), toggled);
        log::debug!("entity {} flipped lever at {pos} to {powered}", player.id());
        world.set_block(pos, toggled, UpdateFlags::UPDATE_ALL);
        world.play_effect(pos, EffectKind::LeverToggle, i32::from(powered));
        let attached = Self::attached_pos(world.blocks(), toggled, pos);
        world.update_neighbors_at(attached, self.block);
        InteractionResult::Success
    }

    fn shape(&self, state: BlockStateId, blocks: &BlockRegistry) -> VoxelShape {
        match blocks.get_value(state, Self::FACING) {
            Some(Direction::South) => VoxelShape::cuboid(5.0, 4.0, 0.0, 11.0, 12.0, 6.0),
            Some(Direction::West) => VoxelShape::cuboid(10.0, 4.0, 5.0, 16.0, 12.0, 11.0),
            Some(Direction::East) => VoxelShape::cuboid(0.0, 4.0, 5.0, 6.0, 12.0, 11.0),
            Some(Direction::Up) => VoxelShape::cuboid(5.0, 0.0, 4.0, 11.0, 6.0, 12.0),
            Some(Direction::Down) => VoxelShape::cuboid(5.0, 10.0, 4.0, 11.0, 16.0, 12.0),
            _ => VoxelShape::cuboid(5.0, 4.0, 10.0, 11.0, 12.0, 16.0),
        }
    }

    fn as_redstone_source(&self) -> Option<&dyn RedstoneSource> {
        Some(self)
    }
}

impl RedstoneSource for LeverBlock {
    fn signal(&self, state: BlockStateId, blocks: &BlockRegistry, _direction: Direction) -> u8 {
        if Self::is_powered(blocks, state) { MAX_SIGNAL } else { 0 }
    }
}

/// Behavior for the block of redstone: always emits a full signal.
pub struct RedstoneBlock {
    block: BlockId,
}

impl RedstoneBlock {
    /// Creates a new redstone block behavior for the given block.
    #[must_use]
    pub const fn new(block: BlockId) -> Self {
        Self { block }
    }
}

impl BlockBehaviour for RedstoneBlock {
    fn as_redstone_source(&self) -> Option<&dyn RedstoneSource> {
        Some(self)
    }
}

impl RedstoneSource for RedstoneBlock {
    fn signal(&self, state: BlockStateId, blocks: &BlockRegistry, _direction: Direction) -> u8 {
        if blocks.block_of(state) == self.block { MAX_SIGNAL } else { 0 }
    }
}

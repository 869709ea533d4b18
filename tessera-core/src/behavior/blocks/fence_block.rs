//! Fence block behavior implementation.
//!
//! Fences connect to adjacent fences of the same type and to solid blocks.

use tessera_registry::{
    BlockId, BlockRegistry, BlockStateId,
    blocks::{
        properties::{BoolProperty, Direction, state_properties},
        shapes::VoxelShape,
    },
};
use tessera_utils::BlockPos;

use crate::{
    behavior::{BlockBehaviour, ShapeResponsive},
    world::World,
};

/// Behavior for fence blocks.
///
/// Fences have 4 boolean properties (north, east, south, west) that indicate
/// whether the fence connects in that direction. A fence connects to:
/// - Other fences of the same type
/// - Solid blocks
pub struct FenceBlock {
    block: BlockId,
}

impl FenceBlock {
    /// North connection property.
    pub const NORTH: &'static BoolProperty = &state_properties::NORTH;
    /// East connection property.
    pub const EAST: &'static BoolProperty = &state_properties::EAST;
    /// South connection property.
    pub const SOUTH: &'static BoolProperty = &state_properties::SOUTH;
    /// West connection property.
    pub const WEST: &'static BoolProperty = &state_properties::WEST;

    /// Creates a new fence block behavior for the given block.
    #[must_use]
    pub const fn new(block: BlockId) -> Self {
        Self { block }
    }

    /// Checks if this fence should connect to the given neighbor state.
    fn connects_to(&self, blocks: &BlockRegistry, neighbor_state: BlockStateId) -> bool {
        let neighbor = blocks.get_block(neighbor_state);
        neighbor.id == self.block || neighbor.config.is_solid
    }

    /// Gets the connection state for a position by checking all 4 horizontal neighbors.
    fn get_connection_state(&self, mut state: BlockStateId, world: &World, pos: BlockPos) -> BlockStateId {
        for direction in Direction::HORIZONTAL {
            let Some(property) = direction.to_connection_property() else {
                continue;
            };
            let neighbor_state = world.get_block_state(&direction.relative(&pos));
            let connects = self.connects_to(world.blocks(), neighbor_state);
            state = world.blocks().set_value(state, property, connects);
        }
        state
    }
}

impl BlockBehaviour for FenceBlock {
    fn get_state_for_placement(
        &self,
        default_state: BlockStateId,
        world: &World,
        pos: BlockPos,
    ) -> Option<BlockStateId> {
        Some(self.get_connection_state(default_state, world, pos))
    }

    fn shape(&self, state: BlockStateId, blocks: &BlockRegistry) -> VoxelShape {
        let mut shape = VoxelShape::cuboid(6.0, 0.0, 6.0, 10.0, 16.0, 10.0);
        let arms = [
            (Self::NORTH, VoxelShape::cuboid(7.0, 0.0, 0.0, 9.0, 16.0, 6.0)),
            (Self::SOUTH, VoxelShape::cuboid(7.0, 0.0, 10.0, 9.0, 16.0, 16.0)),
            (Self::WEST, VoxelShape::cuboid(0.0, 0.0, 7.0, 6.0, 16.0, 9.0)),
            (Self::EAST, VoxelShape::cuboid(10.0, 0.0, 7.0, 16.0, 16.0, 9.0)),
        ];
        for (property, arm) in &arms {
            if blocks.get_value(state, *property).unwrap_or(false) {
                shape = shape.or(arm);
            }
        }
        shape
    }

    fn as_shape_responsive(&self) -> Option<&dyn ShapeResponsive> {
        Some(self)
    }
}

impl ShapeResponsive for FenceBlock {
    fn update_shape(
        &self,
        state: BlockStateId,
        world: &World,
        _pos: BlockPos,
        direction: Direction,
        _neighbor_pos: BlockPos,
        neighbor_state: BlockStateId,
    ) -> BlockStateId {
        if !direction.is_horizontal() {
            return state;
        }
        let Some(property) = direction.to_connection_property() else {
            return state;
        };
        let connects = self.connects_to(world.blocks(), neighbor_state);
        world.blocks().set_value(state, property, connects)
    }
}

//! Nether wart behavior implementation.
//!
//! Nether wart grows through four ages on soul sand, one random tick in ten.

use tessera_registry::{
    BlockId, BlockRegistry, BlockStateId,
    blocks::{
        properties::{Direction, IntProperty, state_properties},
        shapes::VoxelShape,
    },
};
use tessera_utils::{BlockPos, UpdateFlags, random::Random};

use crate::{
    behavior::{BlockBehaviour, RandomTickable, ShapeResponsive},
    world::World,
};

/// Behavior for nether wart.
pub struct NetherWartBlock {
    block: BlockId,
    soil: BlockId,
}

impl NetherWartBlock {
    /// Growth stage property.
    pub const AGE: &'static IntProperty = &state_properties::AGE_3;
    /// Last growth stage.
    pub const MAX_AGE: u8 = 3;
    /// One random tick in this many grows the wart.
    pub const GROWTH_CHANCE: i32 = 10;

    /// Outline height in pixels per age.
    const SHAPE_HEIGHTS: [f64; 4] = [5.0, 8.0, 11.0, 14.0];

    /// Creates a new nether wart behavior that grows on `soil`.
    #[must_use]
    pub const fn new(block: BlockId, soil: BlockId) -> Self {
        Self { block, soil }
    }

    fn age(blocks: &BlockRegistry, state: BlockStateId) -> u8 {
        blocks.get_value(state, Self::AGE).unwrap_or(Self::MAX_AGE)
    }
}

impl BlockBehaviour for NetherWartBlock {
    fn shape(&self, state: BlockStateId, blocks: &BlockRegistry) -> VoxelShape {
        let height = Self::SHAPE_HEIGHTS[usize::from(Self::age(blocks, state).min(Self::MAX_AGE))];
        VoxelShape::cuboid(0.0, 0.0, 0.0, 16.0, height, 16.0)
    }

    fn can_survive(&self, _state: BlockStateId, world: &World, pos: BlockPos) -> bool {
        world.blocks().block_of(world.get_block_state(&pos.below())) == self.soil
    }

    fn as_random_tickable(&self) -> Option<&dyn RandomTickable> {
        Some(self)
    }

    fn as_shape_responsive(&self) -> Option<&dyn ShapeResponsive> {
        Some(self)
    }
}

impl RandomTickable for NetherWartBlock {
    fn is_random_ticking(&self, state: BlockStateId, blocks: &BlockRegistry) -> bool {
        Self::age(blocks, state) < Self::MAX_AGE
    }

    fn random_tick(&self, state: BlockStateId, world: &mut World, pos: BlockPos, random: &mut dyn Random) {
        let age = Self::age(world.blocks(), state);
        if age < Self::MAX_AGE && random.next_i32_bounded(Self::GROWTH_CHANCE) == 0 {
            let grown = world.blocks().set_value(state, Self::AGE, age + 1);
            log::debug!("{} at {pos} grew to age {}", world.blocks().block(self.block).key, age + 1);
            world.set_block(pos, grown, UpdateFlags::UPDATE_CLIENTS);
        }
    }
}

impl ShapeResponsive for NetherWartBlock {
    fn update_shape(
        &self,
        state: BlockStateId,
        world: &World,
        pos: BlockPos,
        direction: Direction,
        _neighbor_pos: BlockPos,
        _neighbor_state: BlockStateId,
    ) -> BlockStateId {
        if direction == Direction::Down && !self.can_survive(state, world, pos) {
            return BlockStateId::AIR;
        }
        state
    }
}

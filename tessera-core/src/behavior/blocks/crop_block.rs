//! Crop block behavior implementation.
//!
//! Crops grow through their age property on farmland. Growth speed depends on
//! the farmland under and around the crop.

use tessera_registry::{
    BlockId, BlockRegistry, BlockStateId,
    blocks::{
        properties::{Direction, IntProperty, state_properties},
        shapes::VoxelShape,
    },
};
use tessera_utils::{BlockPos, UpdateFlags, random::Random};

use crate::{
    behavior::{BlockBehaviour, BonemealTarget, RandomTickable, ShapeResponsive},
    world::World,
};

/// Behavior for crops such as wheat.
pub struct CropBlock {
    block: BlockId,
    farmland: BlockId,
}

impl CropBlock {
    /// Growth stage property.
    pub const AGE: &'static IntProperty = &state_properties::AGE_7;
    /// Last growth stage.
    pub const MAX_AGE: u8 = 7;

    /// Creates a new crop behavior planted on `farmland`.
    #[must_use]
    pub const fn new(block: BlockId, farmland: BlockId) -> Self {
        Self { block, farmland }
    }

    fn age(blocks: &BlockRegistry, state: BlockStateId) -> u8 {
        blocks.get_value(state, Self::AGE).unwrap_or(Self::MAX_AGE)
    }

    /// Growth speed from the 3x3 farmland patch below. Moist farmland counts
    /// three times as much as dry farmland, and the diagonal and side cells a
    /// quarter of the centre.
    fn growth_speed(&self, world: &World, pos: BlockPos) -> f32 {
        let below = pos.below();
        let mut speed = 1.0;
        for dx in -1..=1 {
            for dz in -1..=1 {
                let soil = world.get_block_state(&below.offset(dx, 0, dz));
                let mut soil_speed = 0.0;
                if world.blocks().block_of(soil) == self.farmland {
                    soil_speed = 1.0;
                    if world
                        .blocks()
                        .get_value(soil, &state_properties::MOISTURE)
                        .is_some_and(|moisture| moisture > 0)
                    {
                        soil_speed = 3.0;
                    }
                }
                if dx != 0 || dz != 0 {
                    soil_speed /= 4.0;
                }
                speed += soil_speed;
            }
        }
        speed
    }
}

impl BlockBehaviour for CropBlock {
    fn shape(&self, state: BlockStateId, blocks: &BlockRegistry) -> VoxelShape {
        let age = Self::age(blocks, state).min(Self::MAX_AGE);
        VoxelShape::cuboid(0.0, 0.0, 0.0, 16.0, f64::from(age + 1) * 2.0, 16.0)
    }

    fn can_survive(&self, _state: BlockStateId, world: &World, pos: BlockPos) -> bool {
        world.blocks().block_of(world.get_block_state(&pos.below())) == self.farmland
    }

    fn as_random_tickable(&self) -> Option<&dyn RandomTickable> {
        Some(self)
    }

    fn as_shape_responsive(&self) -> Option<&dyn ShapeResponsive> {
        Some(self)
    }

    fn as_bonemeal_target(&self) -> Option<&dyn BonemealTarget> {
        Some(self)
    }
}

impl RandomTickable for CropBlock {
    fn is_random_ticking(&self, state: BlockStateId, blocks: &BlockRegistry) -> bool {
        Self::age(blocks, state) < Self::MAX_AGE
    }

    fn random_tick(&self, state: BlockStateId, world: &mut World, pos: BlockPos, random: &mut dyn Random) {
        let age = Self::age(world.blocks(), state);
        if age >= Self::MAX_AGE {
            return;
        }
        let speed = self.growth_speed(world, pos);
        if random.next_i32_bounded((25.0 / speed) as i32 + 1) == 0 {
            let grown = world.blocks().set_value(state, Self::AGE, age + 1);
            log::debug!("{} at {pos} grew to age {}", world.blocks().block(self.block).key, age + 1);
            world.set_block(pos, grown, UpdateFlags::UPDATE_CLIENTS);
        }
    }
}

impl BonemealTarget for CropBlock {
    fn is_valid_bonemeal_target(&self, state: BlockStateId, world: &World, _pos: BlockPos) -> bool {
        Self::age(world.blocks(), state) < Self::MAX_AGE
    }

    fn perform_bonemeal(&self, state: BlockStateId, world: &mut World, pos: BlockPos, random: &mut dyn Random) {
        let bonus = random.next_i32_between(2, 5) as u8;
        let age = Self::age(world.blocks(), state)
            .saturating_add(bonus)
            .min(Self::MAX_AGE);
        let grown = world.blocks().set_value(state, Self::AGE, age);
        world.set_block(pos, grown, UpdateFlags::UPDATE_CLIENTS);
    }
}

impl ShapeResponsive for CropBlock {
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

//! Farmland behavior implementation.
//!
//! Farmland dries out on random ticks, turns back into dirt when trampled or
//! when a solid block covers it.

use tessera_registry::{
    BlockId, BlockRegistry, BlockStateId,
    blocks::{
        properties::{Direction, IntProperty, state_properties},
        shapes::VoxelShape,
    },
};
use tessera_utils::{BlockPos, UpdateFlags, random::Random};

use crate::{
    behavior::{BlockBehaviour, FallListener, RandomTickable, ShapeResponsive},
    world::{EffectKind, EntityView, World},
};

/// Behavior for farmland.
pub struct FarmlandBlock {
    block: BlockId,
    dirt: BlockId,
    crop: BlockId,
}

impl FarmlandBlock {
    /// Moisture property.
    pub const MOISTURE: &'static IntProperty = &state_properties::MOISTURE;

    /// Creates a new farmland behavior. `dirt` is what it reverts to and
    /// `crop` keeps dry farmland from reverting.
    #[must_use]
    pub const fn new(block: BlockId, dirt: BlockId, crop: BlockId) -> Self {
        Self { block, dirt, crop }
    }

    fn dirt_state(&self, blocks: &BlockRegistry) -> BlockStateId {
        blocks.default_state(self.dirt)
    }

    fn turn_to_dirt(&self, world: &mut World, pos: BlockPos) {
        let dirt = self.dirt_state(world.blocks());
        log::debug!("{} at {pos} turned to dirt", world.blocks().block(self.block).key);
        world.set_block(pos, dirt, UpdateFlags::UPDATE_ALL);
    }

    fn should_maintain_farmland(&self, world: &World, pos: BlockPos) -> bool {
        world.blocks().block_of(world.get_block_state(&pos.above())) == self.crop
    }
}

impl BlockBehaviour for FarmlandBlock {
    fn get_state_for_placement(
        &self,
        default_state: BlockStateId,
        world: &World,
        pos: BlockPos,
    ) -> Option<BlockStateId> {
        if self.can_survive(default_state, world, pos) {
            Some(default_state)
        } else {
            Some(self.dirt_state(world.blocks()))
        }
    }

    fn scheduled_tick(&self, state: BlockStateId, world: &mut World, pos: BlockPos, _random: &mut dyn Random) {
        if !self.can_survive(state, world, pos) {
            self.turn_to_dirt(world, pos);
        }
    }

    fn shape(&self, _state: BlockStateId, _blocks: &BlockRegistry) -> VoxelShape {
        VoxelShape::cuboid(0.0, 0.0, 0.0, 16.0, 15.0, 16.0)
    }

    fn can_survive(&self, _state: BlockStateId, world: &World, pos: BlockPos) -> bool {
        !world.blocks().get_block(world.get_block_state(&pos.above())).config.is_solid
    }

    fn as_random_tickable(&self) -> Option<&dyn RandomTickable> {
        Some(self)
    }

    fn as_shape_responsive(&self) -> Option<&dyn ShapeResponsive> {
        Some(self)
    }

    fn as_fall_listener(&self) -> Option<&dyn FallListener> {
        Some(self)
    }
}

impl RandomTickable for FarmlandBlock {
    fn random_tick(&self, state: BlockStateId, world: &mut World, pos: BlockPos, _random: &mut dyn Random) {
        // There is no water in the grid, so farmland only ever dries out
        let moisture = world.blocks().get_value(state, Self::MOISTURE).unwrap_or(0);
        if moisture > 0 {
            let drier = world.blocks().set_value(state, Self::MOISTURE, moisture - 1);
            world.set_block(pos, drier, UpdateFlags::UPDATE_CLIENTS);
        } else if !self.should_maintain_farmland(world, pos) {
            self.turn_to_dirt(world, pos);
        }
    }
}

impl ShapeResponsive for FarmlandBlock {
    fn update_shape(
        &self,
        state: BlockStateId,
        world: &World,
        pos: BlockPos,
        direction: Direction,
        _neighbor_pos: BlockPos,
        _neighbor_state: BlockStateId,
    ) -> BlockStateId {
        if direction == Direction::Up && !self.can_survive(state, world, pos) {
            return self.dirt_state(world.blocks());
        }
        state
    }
}

impl FallListener for FarmlandBlock {
    fn fall_on(
        &self,
        _state: BlockStateId,
        world: &mut World,
        pos: BlockPos,
        entity: &mut dyn EntityView,
        fall_distance: f64,
        random: &mut dyn Random,
    ) {
        if entity.can_trample() && random.next_f64() < fall_distance - 0.5 {
            world.play_effect(pos, EffectKind::Trample, entity.id());
            self.turn_to_dirt(world, pos);
        }
    }
}

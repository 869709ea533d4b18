//! Fungus behavior implementation.
//!
//! Bonemeal on a fungus standing on its matching nylium grows a huge fungus.
//! The growth itself is a world generation feature, so the block only asks the
//! world to place it.

use tessera_registry::{BlockId, BlockStateId, blocks::properties::Direction};
use tessera_utils::{BlockPos, random::Random};

use crate::{
    behavior::{BlockBehaviour, BonemealTarget, ShapeResponsive},
    world::{FeatureRef, World},
};

/// Behavior for crimson and warped fungi.
pub struct FungusBlock {
    block: BlockId,
    nylium: BlockId,
    feature: FeatureRef,
}

impl FungusBlock {
    /// Chance that a bonemeal use actually grows the fungus.
    pub const GROWTH_CHANCE: f32 = 0.4;

    /// Creates a new fungus behavior that grows `feature` on `nylium`.
    #[must_use]
    pub const fn new(block: BlockId, nylium: BlockId, feature: FeatureRef) -> Self {
        Self { block, nylium, feature }
    }

    /// The feature placed when the fungus grows.
    #[must_use]
    pub const fn feature(&self) -> &FeatureRef {
        &self.feature
    }
}

impl BlockBehaviour for FungusBlock {
    fn can_survive(&self, _state: BlockStateId, world: &World, pos: BlockPos) -> bool {
        let below = world.blocks().get_block(world.get_block_state(&pos.below()));
        below.config.is_solid
    }

    fn as_bonemeal_target(&self) -> Option<&dyn BonemealTarget> {
        Some(self)
    }

    fn as_shape_responsive(&self) -> Option<&dyn ShapeResponsive> {
        Some(self)
    }
}

impl BonemealTarget for FungusBlock {
    fn is_valid_bonemeal_target(&self, _state: BlockStateId, world: &World, pos: BlockPos) -> bool {
        world.blocks().block_of(world.get_block_state(&pos.below())) == self.nylium
    }

    fn is_bonemeal_success(&self, _state: BlockStateId, _world: &World, _pos: BlockPos, random: &mut dyn Random) -> bool {
        random.next_f32() < Self::GROWTH_CHANCE
    }

    fn perform_bonemeal(&self, state: BlockStateId, world: &mut World, pos: BlockPos, _random: &mut dyn Random) {
        if world.blocks().block_of(state) != self.block {
            return;
        }
        if !world.request_feature_placement(pos, &self.feature) {
            log::debug!("{} at {pos} did not grow", self.feature.0);
        }
    }
}

impl ShapeResponsive for FungusBlock {
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

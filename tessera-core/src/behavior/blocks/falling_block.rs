//! Gravity-affected blocks such as sand and gravel.
//!
//! Two ticks after being placed or disturbed, a falling block with air (or
//! anything replaceable) below it moves down one cell. The move places it
//! again, so it keeps dropping until it lands. Below [`World::MIN_Y`] it is
//! gone.

use tessera_registry::{BlockId, BlockRegistry, BlockStateId};
use tessera_utils::{BlockPos, UpdateFlags, random::Random};

use crate::{
    behavior::BlockBehaviour,
    world::{EffectKind, World},
};

/// Behavior for blocks that fall.
pub struct FallingBlock {
    block: BlockId,
}

impl FallingBlock {
    /// Ticks between a disturbance and the fall check.
    pub const FALL_DELAY: i32 = 2;

    /// Creates a new falling block behavior for the given block.
    #[must_use]
    pub const fn new(block: BlockId) -> Self {
        Self { block }
    }

    /// Whether a falling block can move into a cell holding `state`.
    #[must_use]
    pub fn is_free(blocks: &BlockRegistry, state: BlockStateId) -> bool {
        let config = blocks.get_block(state).config;
        config.is_air || config.replaceable
    }
}

impl BlockBehaviour for FallingBlock {
    fn on_place(
        &self,
        _state: BlockStateId,
        world: &mut World,
        pos: BlockPos,
        _old_state: BlockStateId,
        _moved_by_piston: bool,
    ) {
        world.schedule_tick(pos, self.block, Self::FALL_DELAY);
    }

    fn neighbor_changed(
        &self,
        _state: BlockStateId,
        world: &mut World,
        pos: BlockPos,
        _source_block: BlockId,
        _source_pos: BlockPos,
        _moved_by_piston: bool,
    ) {
        world.schedule_tick(pos, self.block, Self::FALL_DELAY);
    }

    fn scheduled_tick(&self, state: BlockStateId, world: &mut World, pos: BlockPos, _random: &mut dyn Random) {
        let below = pos.below();
        if !Self::is_free(world.blocks(), world.get_block_state(&below)) {
            return;
        }
        world.play_effect(pos, EffectKind::FallingBlock, 0);
        world.set_block(pos, BlockStateId::AIR, UpdateFlags::UPDATE_ALL);
        if below.0.y < World::MIN_Y {
            log::debug!("{} fell out of the world at {pos}", world.blocks().block(self.block).key);
            return;
        }
        world.set_block(below, state, UpdateFlags::UPDATE_ALL);
    }
}

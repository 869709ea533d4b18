//! Redstone lamp behavior implementation.
//!
//! A lamp lights up as soon as it receives a signal and turns off four ticks
//! after losing it. Restoring the signal before then keeps it lit.

use tessera_registry::{
    BlockId, BlockStateId,
    blocks::properties::{BoolProperty, state_properties},
};
use tessera_utils::{BlockPos, UpdateFlags, random::Random};

use crate::{behavior::BlockBehaviour, world::World};

/// Behavior for the redstone lamp.
pub struct RedstoneLampBlock {
    block: BlockId,
}

impl RedstoneLampBlock {
    /// Lit property.
    pub const LIT: &'static BoolProperty = &state_properties::LIT;
    /// Ticks between losing the signal and turning off.
    pub const UNLIGHT_DELAY: i32 = 4;

    /// Creates a new redstone lamp behavior for the given block.
    #[must_use]
    pub const fn new(block: BlockId) -> Self {
        Self { block }
    }

    fn is_lit(world: &World, state: BlockStateId) -> bool {
        world.blocks().get_value(state, Self::LIT).unwrap_or(false)
    }

    fn check_signal(&self, state: BlockStateId, world: &mut World, pos: BlockPos) {
        let lit = Self::is_lit(world, state);
        if lit == world.has_neighbor_signal(pos) {
            return;
        }
        if lit {
            world.schedule_tick(pos, self.block, Self::UNLIGHT_DELAY);
        } else {
            let lit_state = world.blocks().set_value(state, Self::LIT, true);
            world.set_block(pos, lit_state, UpdateFlags::UPDATE_CLIENTS);
        }
    }
}

impl BlockBehaviour for RedstoneLampBlock {
    fn get_state_for_placement(
        &self,
        default_state: BlockStateId,
        world: &World,
        pos: BlockPos,
    ) -> Option<BlockStateId> {
        Some(
            world
                .blocks()
                .set_value(default_state, Self::LIT, world.has_neighbor_signal(pos)),
        )
    }

    fn on_place(
        &self,
        state: BlockStateId,
        world: &mut World,
        pos: BlockPos,
        old_state: BlockStateId,
        _moved_by_piston: bool,
    ) {
        if world.blocks().block_of(old_state) != self.block {
            self.check_signal(state, world, pos);
        }
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
        self.check_signal(state, world, pos);
    }

    fn scheduled_tick(&self, state: BlockStateId, world: &mut World, pos: BlockPos, _random: &mut dyn Random) {
        if Self::is_lit(world, state) && !world.has_neighbor_signal(pos) {
            let unlit = world.blocks().set_value(state, Self::LIT, false);
            world.set_block(pos, unlit, UpdateFlags::UPDATE_CLIENTS);
        }
    }
}

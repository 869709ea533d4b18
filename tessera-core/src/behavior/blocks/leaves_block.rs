//! Leaves behavior implementation.
//!
//! Every leaf tracks its taxicab distance to the nearest log, capped at
//! [`LeavesBlock::DECAY_DISTANCE`]. A change next to a leaf recomputes its
//! distance, and a changed distance is itself a change, so removing a log
//! ripples outward through the canopy. Non-persistent leaves at the cap decay
//! on random ticks.

use tessera_registry::{
    BlockId, BlockRegistry, BlockStateId,
    blocks::properties::{BoolProperty, Direction, IntProperty, state_properties},
};
use tessera_utils::{BlockPos, random::Random};

use crate::{
    behavior::{BlockBehaviour, RandomTickable, ShapeResponsive},
    world::World,
};

/// Behavior for leaves.
pub struct LeavesBlock {
    block: BlockId,
    log: BlockId,
}

impl LeavesBlock {
    /// Distance to the nearest log.
    pub const DISTANCE: &'static IntProperty = &state_properties::DISTANCE;
    /// Placed by a player, never decays.
    pub const PERSISTENT: &'static BoolProperty = &state_properties::PERSISTENT;
    /// Distance at which leaves count as disconnected.
    pub const DECAY_DISTANCE: u8 = 7;

    /// Creates a new leaves behavior sustained by `log`.
    #[must_use]
    pub const fn new(block: BlockId, log: BlockId) -> Self {
        Self { block, log }
    }

    fn distance_at(&self, blocks: &BlockRegistry, state: BlockStateId) -> u8 {
        let block = blocks.block_of(state);
        if block == self.log {
            0
        } else if block == self.block {
            blocks.get_value(state, Self::DISTANCE).unwrap_or(Self::DECAY_DISTANCE)
        } else {
            Self::DECAY_DISTANCE
        }
    }

    fn update_distance(&self, state: BlockStateId, world: &World, pos: BlockPos) -> BlockStateId {
        let mut distance = Self::DECAY_DISTANCE;
        for direction in Direction::ALL {
            let neighbor = world.get_block_state(&direction.relative(&pos));
            distance = distance.min(self.distance_at(world.blocks(), neighbor) + 1);
            if distance == 1 {
                break;
            }
        }
        world.blocks().set_value(state, Self::DISTANCE, distance)
    }

    fn is_decaying(&self, blocks: &BlockRegistry, state: BlockStateId) -> bool {
        !blocks.get_value(state, Self::PERSISTENT).unwrap_or(true)
            && blocks.get_value(state, Self::DISTANCE) == Some(Self::DECAY_DISTANCE)
    }
}

impl BlockBehaviour for LeavesBlock {
    fn get_state_for_placement(
        &self,
        default_state: BlockStateId,
        world: &World,
        pos: BlockPos,
    ) -> Option<BlockStateId> {
        let persistent = world.blocks().set_value(default_state, Self::PERSISTENT, true);
        Some(self.update_distance(persistent, world, pos))
    }

    fn as_random_tickable(&self) -> Option<&dyn RandomTickable> {
        Some(self)
    }

    fn as_shape_responsive(&self) -> Option<&dyn ShapeResponsive> {
        Some(self)
    }
}

impl RandomTickable for LeavesBlock {
    fn is_random_ticking(&self, state: BlockStateId, blocks: &BlockRegistry) -> bool {
        self.is_decaying(blocks, state)
    }

    fn random_tick(&self, state: BlockStateId, world: &mut World, pos: BlockPos, _random: &mut dyn Random) {
        if self.is_decaying(world.blocks(), state) {
            log::debug!("leaves at {pos} decayed");
            world.destroy_block(pos);
        }
    }
}

impl ShapeResponsive for LeavesBlock {
    fn update_shape(
        &self,
        state: BlockStateId,
        world: &World,
        pos: BlockPos,
        _direction: Direction,
        _neighbor_pos: BlockPos,
        _neighbor_state: BlockStateId,
    ) -> BlockStateId {
        self.update_distance(state, world, pos)
    }
}

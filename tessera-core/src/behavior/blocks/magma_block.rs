use tessera_registry::{BlockId, BlockStateId};
use tessera_utils::BlockPos;

use crate::{
    behavior::{BlockBehaviour, SteppedOn},
    world::{EffectKind, EntityView, World},
};

/// Behavior for the magma block: hurts entities that walk on it without
/// sneaking.
pub struct MagmaBlock {
    block: BlockId,
}

impl MagmaBlock {
    /// Damage dealt per step.
    pub const DAMAGE: f32 = 1.0;

    /// Creates a new magma block behavior for the given block.
    #[must_use]
    pub const fn new(block: BlockId) -> Self {
        Self { block }
    }
}

impl BlockBehaviour for MagmaBlock {
    fn as_stepped_on(&self) -> Option<&dyn SteppedOn> {
        Some(self)
    }
}

impl SteppedOn for MagmaBlock {
    fn step_on(&self, state: BlockStateId, world: &mut World, pos: BlockPos, entity: &mut dyn EntityView) {
        if world.blocks().block_of(state) != self.block || entity.is_stepping_carefully() {
            return;
        }
        entity.hurt(Self::DAMAGE);
        world.play_effect(pos, EffectKind::Hurt, entity.id());
    }
}

use tessera_registry::{BlockId, BlockStateId};
use tessera_utils::BlockPos;

use crate::{
    behavior::{BlockBehaviour, InteractionResult},
    world::{EntityView, MenuKind, World},
};

/// Behavior for the crafting table.
pub struct CraftingTableBlock {
    block: BlockId,
}

impl CraftingTableBlock {
    /// Creates a new crafting table behavior for the given block.
    #[must_use]
    pub const fn new(block: BlockId) -> Self {
        Self { block }
    }
}

impl BlockBehaviour for CraftingTableBlock {
    fn use_without_item(
        &self,
        state: BlockStateId,
        world: &mut World,
        pos: BlockPos,
        player: &dyn EntityView,
    ) -> InteractionResult {
        if world.blocks().block_of(state) != self.block {
            return InteractionResult::Pass;
        }
        log::debug!("entity {} opened the crafting table at {pos}", player.id());
        world.open_menu(pos, MenuKind::Crafting);
        InteractionResult::Success
    }
}

use tessera_registry::BlockId;

use crate::behavior::BlockBehaviour;

/// Behavior for plain blocks: full cube, rendered from the block's config,
/// no reactions.
pub struct SimpleBlock {
    block: BlockId,
}

impl SimpleBlock {
    /// Creates a new simple block behavior for the given block.
    #[must_use]
    pub const fn new(block: BlockId) -> Self {
        Self { block }
    }

    /// The block this behavior is bound to.
    #[must_use]
    pub const fn block(&self) -> BlockId {
        self.block
    }
}

impl BlockBehaviour for SimpleBlock {}

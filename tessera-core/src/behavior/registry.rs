//! Block behaviour lookup and the shared, frozen registries.

use std::sync::Arc;

use tessera_registry::{
    BlockDef, BlockId, BlockRegistry, BlockStateId, PropertyMode, RegistryError, RegistryExt,
    VanillaBlocks,
    blocks::shapes::RenderShape, register_vanilla_blocks,
};

use crate::{
    behavior::{BlockBehaviour, vanilla::register_vanilla_behaviours},
    error::EngineError,
};

/// Behaviour used for blocks nothing was registered for.
///
/// No random ticks, no shape changes, nothing rendered.
pub struct DefaultBlockBehaviour;

impl BlockBehaviour for DefaultBlockBehaviour {
    fn render_shape(&self, _state: BlockStateId, _blocks: &BlockRegistry) -> RenderShape {
        RenderShape::Invisible
    }
}

/// The fallback behaviour.
pub static DEFAULT_BEHAVIOUR: DefaultBlockBehaviour = DefaultBlockBehaviour;

/// Behaviours indexed by block id.
#[derive(Default)]
pub struct BlockBehaviourRegistry {
    behaviours: Vec<Option<Box<dyn BlockBehaviour>>>,
    allows_registering: bool,
}

impl BlockBehaviourRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            behaviours: Vec::new(),
            allows_registering: true,
        }
    }

    /// Binds `behaviour` to `block`. Each block gets at most one behaviour.
    pub fn register(
        &mut self,
        blocks: &BlockRegistry,
        block: BlockId,
        behaviour: Box<dyn BlockBehaviour>,
    ) -> Result<(), EngineError> {
        let key = &blocks.block(block).key;
        if !self.allows_registering {
            return Err(EngineError::Registry(RegistryError::Frozen(key.clone())));
        }
        let index = usize::from(block.0);
        if index >= self.behaviours.len() {
            self.behaviours.resize_with(index + 1, || None);
        }
        if self.behaviours[index].is_some() {
            return Err(EngineError::DuplicateRegistration { block: key.clone() });
        }
        self.behaviours[index] = Some(behaviour);
        Ok(())
    }

    /// The behaviour of `block`, or [`DEFAULT_BEHAVIOUR`].
    #[must_use]
    pub fn get(&self, block: BlockId) -> &dyn BlockBehaviour {
        match self.behaviours.get(usize::from(block.0)) {
            Some(Some(behaviour)) => behaviour.as_ref(),
            _ => &DEFAULT_BEHAVIOUR,
        }
    }

    /// Whether `block` has its own behaviour.
    #[must_use]
    pub fn has_behaviour(&self, block: BlockId) -> bool {
        matches!(self.behaviours.get(usize::from(block.0)), Some(Some(_)))
    }
}

impl RegistryExt for BlockBehaviourRegistry {
    fn freeze(&mut self) {
        self.allows_registering = false;
    }
}

/// Everything a world needs to know about blocks, built once and shared.
pub struct Registries {
    /// The block state table.
    pub blocks: BlockRegistry,
    /// Behaviour per block.
    pub behaviours: BlockBehaviourRegistry,
    /// Ids of the built-in blocks.
    pub vanilla: VanillaBlocks,
    random_ticking: Vec<bool>,
}

impl Registries {
    /// Behaviour of the block `state` belongs to.
    #[must_use]
    pub fn behaviour_of(&self, state: BlockStateId) -> &dyn BlockBehaviour {
        self.behaviours.get(self.blocks.block_of(state))
    }

    /// Whether `state` belongs in the random tick index.
    #[must_use]
    pub fn is_random_ticking(&self, state: BlockStateId) -> bool {
        self.random_ticking
            .get(state.0 as usize)
            .copied()
            .unwrap_or(false)
    }
}

/// Builds a [`Registries`]: the built-in blocks and behaviours plus anything
/// added on top.
pub struct RegistryBuilder {
    blocks: BlockRegistry,
    behaviours: BlockBehaviourRegistry,
    vanilla: VanillaBlocks,
}

impl RegistryBuilder {
    /// Starts from the built-in blocks and behaviours.
    pub fn vanilla(mode: PropertyMode) -> Result<Self, EngineError> {
        let mut blocks = BlockRegistry::new(mode);
        let vanilla = register_vanilla_blocks(&mut blocks)?;
        let mut behaviours = BlockBehaviourRegistry::new();
        register_vanilla_behaviours(&blocks, &mut behaviours, &vanilla)?;
        Ok(Self {
            blocks,
            behaviours,
            vanilla,
        })
    }

    /// The block table built so far.
    #[must_use]
    pub fn blocks(&self) -> &BlockRegistry {
        &self.blocks
    }

    /// Ids of the built-in blocks.
    #[must_use]
    pub fn vanilla_blocks(&self) -> &VanillaBlocks {
        &self.vanilla
    }

    /// Registers a block without a behaviour of its own.
    pub fn register_block(&mut self, def: BlockDef) -> Result<BlockId, EngineError> {
        Ok(self.blocks.register(def)?)
    }

    /// Binds a behaviour to an already registered block.
    pub fn register_behaviour(&mut self, block: BlockId, behaviour: Box<dyn BlockBehaviour>) -> Result<(), EngineError> {
        self.behaviours.register(&self.blocks, block, behaviour)
    }

    /// Registers a block and its behaviour. The closure receives the new id.
    pub fn register<F>(&mut self, def: BlockDef, behaviour: F) -> Result<BlockId, EngineError>
    where
        F: FnOnce(BlockId) -> Box<dyn BlockBehaviour>,
    {
        let id = self.register_block(def)?;
        self.register_behaviour(id, behaviour(id))?;
        Ok(id)
    }

    /// Freezes both registries and precomputes per-state flags.
    #[must_use]
    pub fn build(mut self) -> Arc<Registries> {
        self.blocks.freeze();
        self.behaviours.freeze();
        let random_ticking = self
            .blocks
            .states()
            .map(|state| {
                self.behaviours
                    .get(self.blocks.block_of(state))
                    .as_random_tickable()
                    .is_some_and(|tickable| tickable.is_random_ticking(state, &self.blocks))
            })
            .collect();
        log::debug!(
            "Built registries: {} blocks, {} states",
            self.blocks.block_count(),
            self.blocks.state_count()
        );
        Arc::new(Registries {
            blocks: self.blocks,
            behaviours: self.behaviours,
            vanilla: self.vanilla,
            random_ticking,
        })
    }
}

use tessera_registry::{BlockId, RegistryError};
use tessera_utils::{BlockPos, Identifier};
use thiserror::Error;

/// Errors and diagnostics raised by the engine.
///
/// Build-time variants are fatal. The runtime ones (`UnknownBlockId`,
/// `ReentrantSchedule`, `PropagationOverflow`) never abort a tick: they are logged and collected
/// by `World::take_diagnostics`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Errors from the block state table.
    #[error(transparent)]
    Registry(#[from] RegistryError),
    /// A block was given a second behaviour.
    #[error("block {block} already has a behaviour")]
    DuplicateRegistration {
        /// The block.
        block: Identifier,
    },
    /// A tick was requested for a block id the registry does not know.
    #[error("no block with id {0:?}")]
    UnknownBlockId(BlockId),
    /// A firing tick tried to reschedule itself for the same game tick.
    #[error("{block} at {pos} rescheduled itself with zero delay while firing")]
    ReentrantSchedule {
        /// Position of the firing tick.
        pos: BlockPos,
        /// Block of the firing tick.
        block: Identifier,
    },
    /// A neighbour update cascade hit the chained update limit and was cut.
    #[error("neighbour update cascade from {origin} cut after {processed} updates")]
    PropagationOverflow {
        /// Position of the change that started the cascade.
        origin: BlockPos,
        /// Updates processed before the cut.
        processed: usize,
    },
    /// A world or sidecar record could not be read.
    #[error("persistence error: {0}")]
    Persistence(String),
}

impl From<serde_json::Error> for EngineError {
    fn from(value: serde_json::Error) -> Self {
        Self::Persistence(value.to_string())
    }
}

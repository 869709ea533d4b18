//! Sidecar block entities: mutable per-position data beyond block state properties.

pub mod entities;

use std::{any::Any, sync::Arc};

use serde::{Deserialize, Serialize};
use tessera_registry::BlockStateId;
use tessera_utils::{BlockPos, locks::SyncMutex};

use crate::error::EngineError;

/// A block entity shared between the world and whoever holds it.
pub type SharedBlockEntity = Arc<SyncMutex<dyn BlockEntity>>;

/// Extra mutable data attached to a cell.
///
/// A block entity exists exactly while its cell holds a block whose behaviour
/// implements [`EntityBlock`](crate::behavior::EntityBlock).
pub trait BlockEntity: Send + Sync {
    /// Downcasting support.
    fn as_any(&self) -> &dyn Any;

    /// Downcasting support.
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Stable kind name written to records, e.g. `minecraft:skull`.
    fn kind(&self) -> &'static str;

    /// Position of the owning cell.
    fn get_block_pos(&self) -> BlockPos;

    /// The state of the owning cell as last seen.
    fn get_block_state(&self) -> BlockStateId;

    /// Updates the cached state when the cell changes without changing block.
    fn set_block_state(&mut self, state: BlockStateId);

    /// Whether the cell has dropped this entity.
    fn is_removed(&self) -> bool;

    /// Marks the entity as dropped from its cell.
    fn set_removed(&mut self);

    /// Reads the kind-specific data.
    fn load_additional(&mut self, data: &serde_json::Value) -> Result<(), EngineError>;

    /// Writes the kind-specific data.
    fn save_additional(&self) -> serde_json::Value;
}

/// A block entity as stored in a world record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockEntityRecord {
    /// Position of the owning cell.
    pub pos: BlockPos,
    /// Kind name, see [`BlockEntity::kind`].
    pub kind: String,
    /// Kind-specific data.
    pub data: serde_json::Value,
}

impl BlockEntityRecord {
    /// Captures a block entity.
    #[must_use]
    pub fn save(entity: &dyn BlockEntity) -> Self {
        Self {
            pos: entity.get_block_pos(),
            kind: entity.kind().to_string(),
            data: entity.save_additional(),
        }
    }
}

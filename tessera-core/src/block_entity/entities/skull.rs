use std::any::Any;

use serde::{Deserialize, Serialize};
use tessera_registry::BlockStateId;
use tessera_utils::{BlockPos, Identifier};

use crate::{block_entity::BlockEntity, error::EngineError};

/// Whose head a skull shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkullOwner {
    /// Player name.
    pub name: String,
    /// Player id, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct SkullData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    profile: Option<SkullOwner>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    note_block_sound: Option<Identifier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    custom_name: Option<String>,
}

/// Block entity for player and mob heads.
pub struct SkullBlockEntity {
    pos: BlockPos,
    state: BlockStateId,
    removed: bool,
    data: SkullData,
}

impl SkullBlockEntity {
    /// Kind name in records.
    pub const KIND: &'static str = "minecraft:skull";

    /// Creates an empty skull entity.
    #[must_use]
    pub fn new(pos: BlockPos, state: BlockStateId) -> Self {
        Self {
            pos,
            state,
            removed: false,
            data: SkullData::default(),
        }
    }

    /// The owner profile, if any.
    #[must_use]
    pub fn owner(&self) -> Option<&SkullOwner> {
        self.data.profile.as_ref()
    }

    /// Sets or clears the owner profile.
    pub fn set_owner(&mut self, owner: Option<SkullOwner>) {
        self.data.profile = owner;
    }

    /// Sound a note block plays when this head sits on top of it.
    #[must_use]
    pub fn note_block_sound(&self) -> Option<&Identifier> {
        self.data.note_block_sound.as_ref()
    }

    /// Sets the note block sound.
    pub fn set_note_block_sound(&mut self, sound: Option<Identifier>) {
        self.data.note_block_sound = sound;
    }

    /// Custom display name.
    #[must_use]
    pub fn custom_name(&self) -> Option<&str> {
        self.data.custom_name.as_deref()
    }

    /// Sets the custom display name.
    pub fn set_custom_name(&mut self, name: Option<String>) {
        self.data.custom_name = name;
    }
}

impl BlockEntity for SkullBlockEntity {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn get_block_pos(&self) -> BlockPos {
        self.pos
    }

    fn get_block_state(&self) -> BlockStateId {
        self.state
    }

    fn set_block_state(&mut self, state: BlockStateId) {
        self.state = state;
    }

    fn is_removed(&self) -> bool {
        self.removed
    }

    fn set_removed(&mut self) {
        self.removed = true;
    }

    fn load_additional(&mut self, data: &serde_json::Value) -> Result<(), EngineError> {
        self.data = SkullData::deserialize(data)?;
        Ok(())
    }

    fn save_additional(&self) -> serde_json::Value {
        serde_json::to_value(&self.data).unwrap_or_else(|err| {
            log::warn!("Failed to save skull at {}: {err}", self.pos);
            serde_json::Value::Null
        })
    }
}

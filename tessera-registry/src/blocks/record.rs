//! Name-based state records used by persistence.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tessera_utils::Identifier;

use crate::{
    blocks::{BlockRegistry, BlockStateId},
    error::RegistryError,
};

/// A state as `(block name, property name -> value name)`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockStateRecord {
    /// Block name.
    #[serde(rename = "Name")]
    pub name: Identifier,
    /// Property values by property name. Missing properties take their default.
    #[serde(rename = "Properties", default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, String>,
}

impl BlockRegistry {
    /// Converts a state to its record.
    #[must_use]
    pub fn to_record(&self, state: BlockStateId) -> BlockStateRecord {
        BlockStateRecord {
            name: self.get_block(state).key.clone(),
            properties: self
                .properties_of(state)
                .map(|(property, value)| (property.name.to_string(), value.into_owned()))
                .collect(),
        }
    }

    /// Resolves a record back to its interned state.
    pub fn from_record(&self, record: &BlockStateRecord) -> Result<BlockStateId, RegistryError> {
        let id = self
            .by_key(&record.name)
            .ok_or_else(|| RegistryError::UnknownBlock(record.name.to_string()))?;
        let block = self.block(id);
        let mut state = block.default_state();
        for (name, value) in &record.properties {
            let slot = block
                .property_index_by_name(name)
                .ok_or_else(|| RegistryError::InvalidProperty {
                    block: block.key.clone(),
                    property: name.clone(),
                })?;
            let index = block.properties[slot]
                .domain
                .parse(value)
                .ok_or_else(|| RegistryError::InvalidValue {
                    block: block.key.clone(),
                    property: name.clone(),
                    value: value.clone(),
                })?;
            state = block.with_index(state, slot, index);
        }
        Ok(state)
    }
}

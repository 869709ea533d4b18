use std::{borrow::Cow, iter};

use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;
use tessera_utils::Identifier;

use crate::{
    RegistryExt,
    blocks::{
        Block, BlockDef, BlockId, BlockStateId, MAX_STATES_PER_BLOCK, PropertyMode,
        properties::{Property, PropertyDef},
    },
    error::RegistryError,
};

/// The block state table.
///
/// Every block owns a contiguous range of state ids. Within that range a state
/// is the mixed-radix number formed by its property value indices, so reading
/// or replacing one value is a division and a multiplication.
pub struct BlockRegistry {
    blocks: Vec<Block>,
    by_key: FxHashMap<Identifier, BlockId>,
    // Owning block per state id.
    states: Vec<BlockId>,
    mode: PropertyMode,
    allows_registering: bool,
}

impl Default for BlockRegistry {
    fn default() -> Self {
        Self::new(PropertyMode::default())
    }
}

impl BlockRegistry {
    /// Creates an empty registry. Register `minecraft:air` first.
    #[must_use]
    pub fn new(mode: PropertyMode) -> Self {
        Self {
            blocks: Vec::new(),
            by_key: FxHashMap::default(),
            states: Vec::new(),
            mode,
            allows_registering: true,
        }
    }

    /// The mode derived-state operations use.
    #[must_use]
    pub const fn mode(&self) -> PropertyMode {
        self.mode
    }

    /// Registers a block and interns every state of its schema.
    pub fn register(&mut self, def: BlockDef) -> Result<BlockId, RegistryError> {
        if !self.allows_registering {
            return Err(RegistryError::Frozen(def.key));
        }
        if self.by_key.contains_key(&def.key) {
            return Err(RegistryError::DuplicateBlock(def.key));
        }
        let schema_error = |reason: String| RegistryError::Schema {
            block: def.key.clone(),
            reason,
        };

        let mut names = FxHashSet::default();
        let mut state_count: usize = 1;
        for property in &def.properties {
            let count = property.domain.value_count();
            if count == 0 {
                return Err(schema_error(format!("property {} has an empty domain", property.name)));
            }
            if count > usize::from(u8::MAX) + 1 {
                return Err(schema_error(format!("property {} has {count} values", property.name)));
            }
            if !names.insert(property.name) {
                return Err(schema_error(format!("property {} is declared twice", property.name)));
            }
            state_count = state_count
                .checked_mul(count)
                .filter(|total| *total <= MAX_STATES_PER_BLOCK)
                .ok_or_else(|| {
                    schema_error(format!("more than {MAX_STATES_PER_BLOCK} states"))
                })?;
        }

        let id = u16::try_from(self.blocks.len())
            .map(BlockId)
            .map_err(|_| schema_error("too many blocks".to_string()))?;
        let first_state = u32::try_from(self.states.len())
            .ok()
            .filter(|first| first.checked_add(state_count as u32).is_some())
            .ok_or_else(|| schema_error("state id space exhausted".to_string()))?;

        // The first property is the most significant digit.
        let mut strides: SmallVec<[u32; 4]> = SmallVec::from_elem(1, def.properties.len());
        for slot in (0..def.properties.len().saturating_sub(1)).rev() {
            strides[slot] = strides[slot + 1] * def.properties[slot + 1].domain.value_count() as u32;
        }

        let mut default_offset = 0u32;
        for (property, index) in &def.defaults {
            let slot = def
                .properties
                .iter()
                .position(|p| p == property)
                .ok_or_else(|| {
                    schema_error(format!("default given for undeclared property {}", property.name))
                })?;
            if *index >= property.domain.value_count() {
                return Err(schema_error(format!(
                    "default for {} is outside its domain",
                    property.name
                )));
            }
            default_offset += *index as u32 * strides[slot];
        }

        self.states.extend(iter::repeat_n(id, state_count));
        log::debug!("registered {} with {state_count} states", def.key);
        self.by_key.insert(def.key.clone(), id);
        self.blocks.push(Block {
            id,
            key: def.key,
            config: def.config,
            properties: def.properties.into_iter().collect(),
            strides,
            first_state,
            state_count: state_count as u32,
            default_state: BlockStateId(first_state + default_offset),
        });
        Ok(id)
    }

    /// The block with the given id.
    ///
    /// # Panics
    /// If `id` was not issued by this registry.
    #[must_use]
    pub fn block(&self, id: BlockId) -> &Block {
        &self.blocks[usize::from(id.0)]
    }

    /// The block a state belongs to.
    ///
    /// # Panics
    /// If `state` was not issued by this registry.
    #[must_use]
    pub fn block_of(&self, state: BlockStateId) -> BlockId {
        self.states[state.0 as usize]
    }

    /// Shortcut for `block(block_of(state))`.
    #[must_use]
    pub fn get_block(&self, state: BlockStateId) -> &Block {
        self.block(self.block_of(state))
    }

    /// Looks a block up by name.
    #[must_use]
    pub fn by_key(&self, key: &Identifier) -> Option<BlockId> {
        self.by_key.get(key).copied()
    }

    /// Default state of a block.
    #[must_use]
    pub fn default_state(&self, id: BlockId) -> BlockStateId {
        self.block(id).default_state
    }

    /// Whether the state is air.
    #[must_use]
    pub fn is_air(&self, state: BlockStateId) -> bool {
        self.get_block(state).config.is_air
    }

    /// Whether the state id was issued by this registry.
    #[must_use]
    pub fn is_valid_state(&self, state: BlockStateId) -> bool {
        (state.0 as usize) < self.states.len()
    }

    /// Total number of interned states.
    #[must_use]
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Number of registered blocks.
    #[must_use]
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Iterates all blocks in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter()
    }

    /// Iterates every interned state id.
    pub fn states(&self) -> impl Iterator<Item = BlockStateId> {
        (0..self.states.len() as u32).map(BlockStateId)
    }

    /// Returns the canonical state for a block and a value index per property.
    pub fn intern(&self, id: BlockId, values: &[usize]) -> Result<BlockStateId, RegistryError> {
        let block = self.block(id);
        if values.len() != block.properties.len() {
            return Err(RegistryError::InvalidValue {
                block: block.key.clone(),
                property: "*".to_string(),
                value: format!("{values:?}"),
            });
        }
        let mut state = block.first_state;
        for (slot, (property, index)) in block.properties.iter().zip(values).enumerate() {
            if *index >= property.domain.value_count() {
                return Err(RegistryError::InvalidValue {
                    block: block.key.clone(),
                    property: property.name.to_string(),
                    value: index.to_string(),
                });
            }
            state += *index as u32 * block.strides[slot];
        }
        Ok(BlockStateId(state))
    }

    /// Whether the state's block declares `property`.
    #[must_use]
    pub fn has_property(&self, state: BlockStateId, property: &PropertyDef) -> bool {
        self.get_block(state).property_index(property).is_some()
    }

    /// Reads a property, `None` if the block does not have it.
    #[must_use]
    pub fn get_value<P: Property>(&self, state: BlockStateId, property: &P) -> Option<P::Value> {
        let block = self.get_block(state);
        let slot = block.property_index(property.def())?;
        property.value_at(block.value_index(state, slot))
    }

    /// Every (property, value name) pair of a state, in schema order.
    pub fn properties_of(
        &self,
        state: BlockStateId,
    ) -> impl Iterator<Item = (&'static PropertyDef, Cow<'static, str>)> + '_ {
        let block = self.get_block(state);
        block.properties.iter().enumerate().filter_map(move |(slot, property)| {
            let name = property.domain.value_name(block.value_index(state, slot))?;
            Some((*property, name))
        })
    }

    /// Replaces a property value, failing if the property or value is invalid.
    pub fn try_set_value<P: Property>(
        &self,
        state: BlockStateId,
        property: &P,
        value: P::Value,
    ) -> Result<BlockStateId, RegistryError> {
        let block = self.get_block(state);
        let def = property.def();
        let slot = block
            .property_index(def)
            .ok_or_else(|| RegistryError::InvalidProperty {
                block: block.key.clone(),
                property: def.name.to_string(),
            })?;
        let index = property
            .index_of(value)
            .filter(|index| *index < def.domain.value_count())
            .ok_or_else(|| RegistryError::InvalidValue {
                block: block.key.clone(),
                property: def.name.to_string(),
                value: format!("{value:?}"),
            })?;
        Ok(block.with_index(state, slot, index))
    }

    /// Replaces a property value, honouring the registry's [`PropertyMode`].
    pub fn with_value<P: Property>(
        &self,
        state: BlockStateId,
        property: &P,
        value: P::Value,
    ) -> Result<BlockStateId, RegistryError> {
        match (self.try_set_value(state, property, value), self.mode) {
            (Ok(new_state), _) => Ok(new_state),
            (Err(err), PropertyMode::Strict) => Err(err),
            (Err(err), PropertyMode::Permissive) => {
                log::debug!("ignoring {err}");
                Ok(state)
            }
        }
    }

    /// Replaces a property value. Invalid requests are logged and return the input.
    #[must_use]
    pub fn set_value<P: Property>(&self, state: BlockStateId, property: &P, value: P::Value) -> BlockStateId {
        self.try_set_value(state, property, value)
            .unwrap_or_else(|err| {
                log::warn!("set_value: {err}");
                state
            })
    }

    /// Advances a property to its next value, wrapping around.
    pub fn try_cycle<P: Property>(&self, state: BlockStateId, property: &P) -> Result<BlockStateId, RegistryError> {
        let block = self.get_block(state);
        let def = property.def();
        let slot = block
            .property_index(def)
            .ok_or_else(|| RegistryError::InvalidProperty {
                block: block.key.clone(),
                property: def.name.to_string(),
            })?;
        let next = (block.value_index(state, slot) + 1) % def.domain.value_count();
        Ok(block.with_index(state, slot, next))
    }

    /// Advances a property to its next value, honouring the [`PropertyMode`].
    pub fn cycle<P: Property>(&self, state: BlockStateId, property: &P) -> Result<BlockStateId, RegistryError> {
        match (self.try_cycle(state, property), self.mode) {
            (Ok(new_state), _) => Ok(new_state),
            (Err(err), PropertyMode::Strict) => Err(err),
            (Err(err), PropertyMode::Permissive) => {
                log::debug!("ignoring {err}");
                Ok(state)
            }
        }
    }

    /// The default state of `target` with every property it shares with `from` copied over.
    #[must_use]
    pub fn with_properties_of(&self, target: BlockId, from: BlockStateId) -> BlockStateId {
        let source = self.get_block(from);
        let block = self.block(target);
        let mut state = block.default_state;
        for (slot, property) in block.properties.iter().enumerate() {
            if let Some(source_slot) = source.property_index(property) {
                state = block.with_index(state, slot, source.value_index(from, source_slot));
            }
        }
        state
    }
}

impl RegistryExt for BlockRegistry {
    fn freeze(&mut self) {
        self.allows_registering = false;
    }
}

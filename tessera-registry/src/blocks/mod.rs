pub mod properties;
pub mod record;
pub mod registry;
pub mod shapes;

use smallvec::SmallVec;
use tessera_utils::Identifier;

pub use record::BlockStateRecord;
pub use registry::BlockRegistry;

use crate::blocks::{
    properties::{Property, PropertyDef},
    shapes::RenderShape,
};

/// Upper bound on the number of states a single block may declare.
pub const MAX_STATES_PER_BLOCK: usize = 100_000;

/// Index of a block type in the [`BlockRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(pub u16);

impl BlockId {
    /// `minecraft:air`, always the first registered block.
    pub const AIR: BlockId = BlockId(0);
}

/// An interned block state. Two ids are equal exactly when the states are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockStateId(pub u32);

impl BlockStateId {
    /// The default (and only) state of air.
    pub const AIR: BlockStateId = BlockStateId(0);
}

/// How derived-state operations react to a property the block does not have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PropertyMode {
    /// Return an error.
    Strict,
    /// Return the input state unchanged.
    #[default]
    Permissive,
}

/// Static, per-type block settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockConfig {
    /// The empty sentinel.
    pub is_air: bool,
    /// Full, sturdy cube that supports things placed on it.
    pub is_solid: bool,
    /// Can be replaced by placing another block into it.
    pub replaceable: bool,
    /// How the renderer draws this block by default.
    pub render_shape: RenderShape,
}

impl BlockConfig {
    /// A full solid cube.
    pub const SOLID: BlockConfig = BlockConfig {
        is_air: false,
        is_solid: true,
        replaceable: false,
        render_shape: RenderShape::Model,
    };

    /// Air.
    pub const AIR: BlockConfig = BlockConfig {
        is_air: true,
        is_solid: false,
        replaceable: true,
        render_shape: RenderShape::Invisible,
    };

    /// A block that is drawn but is not a full sturdy cube.
    pub const NON_SOLID: BlockConfig = BlockConfig {
        is_air: false,
        is_solid: false,
        replaceable: false,
        render_shape: RenderShape::Model,
    };

    /// Sets the replaceable flag.
    #[must_use]
    pub const fn replaceable(mut self) -> Self {
        self.replaceable = true;
        self
    }

    /// Sets the render shape.
    #[must_use]
    pub const fn render_shape(mut self, render_shape: RenderShape) -> Self {
        self.render_shape = render_shape;
        self
    }
}

/// Declaration of a block type, consumed by [`BlockRegistry::register`].
#[derive(Debug, Clone)]
pub struct BlockDef {
    /// Unique name.
    pub key: Identifier,
    /// Property schema in declaration order.
    pub properties: Vec<&'static PropertyDef>,
    /// Default value index per property. Unlisted properties default to index 0.
    pub defaults: Vec<(&'static PropertyDef, usize)>,
    /// Static settings.
    pub config: BlockConfig,
}

impl BlockDef {
    /// Starts a solid block without properties.
    #[must_use]
    pub fn new(key: Identifier) -> Self {
        Self {
            key,
            properties: Vec::new(),
            defaults: Vec::new(),
            config: BlockConfig::SOLID,
        }
    }

    /// Starts a `minecraft:` block.
    #[must_use]
    pub fn vanilla(path: &'static str) -> Self {
        Self::new(Identifier::vanilla_static(path))
    }

    /// Adds a property to the schema.
    #[must_use]
    pub fn property<P: Property>(mut self, property: &'static P) -> Self {
        self.properties.push(property.def());
        self
    }

    /// Overrides the default value of a property already in the schema.
    ///
    /// A value outside the domain makes registration fail.
    #[must_use]
    pub fn default_value<P: Property>(mut self, property: &'static P, value: P::Value) -> Self {
        let index = property.index_of(value).unwrap_or(usize::MAX);
        self.defaults.push((property.def(), index));
        self
    }

    /// Replaces the static settings.
    #[must_use]
    pub const fn config(mut self, config: BlockConfig) -> Self {
        self.config = config;
        self
    }
}

/// A registered block type and its partition of the state table.
#[derive(Debug)]
pub struct Block {
    /// Registry index.
    pub id: BlockId,
    /// Unique name.
    pub key: Identifier,
    /// Static settings.
    pub config: BlockConfig,
    pub(crate) properties: SmallVec<[&'static PropertyDef; 4]>,
    pub(crate) strides: SmallVec<[u32; 4]>,
    pub(crate) first_state: u32,
    pub(crate) state_count: u32,
    pub(crate) default_state: BlockStateId,
}

impl Block {
    /// The property schema, in declaration order.
    #[must_use]
    pub fn properties(&self) -> &[&'static PropertyDef] {
        &self.properties
    }

    /// The default state.
    #[must_use]
    pub const fn default_state(&self) -> BlockStateId {
        self.default_state
    }

    /// Number of states this block owns.
    #[must_use]
    pub const fn state_count(&self) -> u32 {
        self.state_count
    }

    /// Whether `state` belongs to this block.
    #[must_use]
    pub const fn owns(&self, state: BlockStateId) -> bool {
        state.0 >= self.first_state && state.0 < self.first_state + self.state_count
    }

    /// Position of `property` in the schema, compared by identity.
    #[must_use]
    pub fn property_index(&self, property: &PropertyDef) -> Option<usize> {
        self.properties.iter().position(|p| *p == property)
    }

    /// Position of the property called `name` in the schema.
    #[must_use]
    pub fn property_index_by_name(&self, name: &str) -> Option<usize> {
        self.properties.iter().position(|p| p.name == name)
    }

    /// Value index of the schema property at `slot` in `state`.
    pub(crate) fn value_index(&self, state: BlockStateId, slot: usize) -> usize {
        let offset = state.0 - self.first_state;
        let count = self.properties[slot].domain.value_count() as u32;
        ((offset / self.strides[slot]) % count) as usize
    }

    /// The state with the value at `slot` replaced by `index`.
    pub(crate) fn with_index(&self, state: BlockStateId, slot: usize, index: usize) -> BlockStateId {
        let current = self.value_index(state, slot) as u32;
        let stride = self.strides[slot];
        BlockStateId(state.0 - current * stride + index as u32 * stride)
    }
}

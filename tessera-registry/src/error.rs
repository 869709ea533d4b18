use tessera_utils::Identifier;
use thiserror::Error;

/// Errors raised while building or querying the block state table.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// A block declared a property schema that cannot be interned.
    #[error("invalid schema for {block}: {reason}")]
    Schema {
        /// The offending block.
        block: Identifier,
        /// What is wrong with it.
        reason: String,
    },
    /// The same block key was registered twice.
    #[error("block {0} is already registered")]
    DuplicateBlock(Identifier),
    /// Registration was attempted after the registry was frozen.
    #[error("cannot register {0}: registry is frozen")]
    Frozen(Identifier),
    /// A derived-state operation named a property the block does not have.
    #[error("{block} has no property {property}")]
    InvalidProperty {
        /// The block of the input state.
        block: Identifier,
        /// The property name that was asked for.
        property: String,
    },
    /// A value outside the property's domain.
    #[error("{value} is not a valid value of {property} on {block}")]
    InvalidValue {
        /// The block of the input state.
        block: Identifier,
        /// The property name.
        property: String,
        /// The rejected value, as text.
        value: String,
    },
    /// A block name that is not registered.
    #[error("unknown block {0}")]
    UnknownBlock(String),
}

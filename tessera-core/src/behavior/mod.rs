//! Block behaviours and the registry that binds them to block types.

mod block;
pub mod blocks;
mod registry;
mod vanilla;

pub use block::{
    AgeFamily, BlockBehaviour, BonemealTarget, ChangeOverTime, EntityBlock, FallListener,
    InteractionResult, RandomTickable, RedstoneSource, ShapeResponsive, SteppedOn,
};
pub use registry::{
    BlockBehaviourRegistry, DEFAULT_BEHAVIOUR, DefaultBlockBehaviour, Registries, RegistryBuilder,
};
pub use vanilla::register_vanilla_behaviours;

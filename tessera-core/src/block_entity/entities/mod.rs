//! Block entity implementations.

mod skull;

pub use skull::{SkullBlockEntity, SkullOwner};

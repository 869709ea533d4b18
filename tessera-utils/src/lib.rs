//! # Tessera Utils
//!
//! Position types, identifiers, update flags and deterministic random sources
//! shared by every Tessera crate.

pub mod locks;
pub mod math;
pub mod random;
pub mod types;

pub use types::{BlockPos, ChunkPos, Identifier, SectionPos, UpdateFlags};

//! # Tessera Core
//!
//! The block behaviour engine: per-block hooks, the world grid they act on,
//! neighbour update propagation, scheduled and random ticks, sidecar block
//! entities and world records.

pub mod behavior;
pub mod block_entity;
pub mod config;
pub mod error;
pub mod persistence;
pub mod ticks;
pub mod world;

pub use behavior::{BlockBehaviour, Registries, RegistryBuilder};
pub use config::EngineConfig;
pub use error::EngineError;
pub use persistence::{ScheduledTickRecord, WorldRecord};
pub use world::{TickReport, World};

//! Scheduled ticks.
//!
//! - [`ScheduledTick`] - one pending event for a (position, type) pair
//! - [`TickPriority`] - ordering between events due on the same game tick
//! - [`LevelChunkTicks`] - per-chunk queue with first-wins deduplication
//! - [`LevelTicks`] - world-level coordinator merging every chunk queue

mod chunk_ticks;
mod level_ticks;
mod scheduled_tick;

pub use chunk_ticks::LevelChunkTicks;
pub use level_ticks::{DueTicks, LevelTicks};
pub use scheduled_tick::{ScheduledTick, TickKey, TickPriority};

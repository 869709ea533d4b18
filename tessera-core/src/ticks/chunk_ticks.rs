use std::{collections::BinaryHeap, hash::Hash};

use rustc_hash::FxHashSet;
use tessera_utils::BlockPos;

use super::{ScheduledTick, TickKey};

/// Scheduled ticks of one chunk column.
///
/// A second schedule for a (pos, type) that is already pending is ignored and
/// the first one keeps its timing.
pub struct LevelChunkTicks<T: Copy + Eq + Hash> {
    tick_queue: BinaryHeap<ScheduledTick<T>>,
    ticks_per_position: FxHashSet<TickKey<T>>,
}

impl<T: Copy + Eq + Hash> LevelChunkTicks<T> {
    /// Creates an empty container.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tick_queue: BinaryHeap::new(),
            ticks_per_position: FxHashSet::default(),
        }
    }

    /// Queues `tick` unless its (pos, type) is already pending.
    pub fn schedule(&mut self, tick: ScheduledTick<T>) -> bool {
        if self.ticks_per_position.insert(TickKey::from(&tick)) {
            self.tick_queue.push(tick);
            true
        } else {
            false
        }
    }

    /// The next tick to fire.
    #[must_use]
    pub fn peek(&self) -> Option<&ScheduledTick<T>> {
        self.tick_queue.peek()
    }

    /// Removes and returns the next tick to fire.
    pub fn poll(&mut self) -> Option<ScheduledTick<T>> {
        let tick = self.tick_queue.pop()?;
        self.ticks_per_position.remove(&TickKey::from(&tick));
        Some(tick)
    }

    /// Whether a tick is pending for (pos, type).
    #[must_use]
    pub fn has_scheduled_tick(&self, pos: BlockPos, tick_type: T) -> bool {
        self.ticks_per_position.contains(&TickKey { pos, tick_type })
    }

    /// Number of pending ticks.
    #[must_use]
    pub fn count(&self) -> usize {
        self.tick_queue.len()
    }

    /// True if nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tick_queue.is_empty()
    }

    /// All pending ticks, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &ScheduledTick<T>> {
        self.tick_queue.iter()
    }
}

impl<T: Copy + Eq + Hash> Default for LevelChunkTicks<T> {
    fn default() -> Self {
        Self::new()
    }
}

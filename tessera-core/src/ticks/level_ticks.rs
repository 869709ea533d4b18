use std::{cmp::Ordering, collections::BinaryHeap, hash::Hash};

use rustc_hash::FxHashMap;
use tessera_utils::{BlockPos, ChunkPos};

use super::{LevelChunkTicks, ScheduledTick, TickPriority};

/// World-level coordinator for scheduled ticks.
///
/// - Each chunk column with pending ticks has a `LevelChunkTicks` in
///   `all_containers`. Containers are created on the first schedule and
///   dropped once drained, since the grid has no notion of loaded chunks.
/// - `next_tick_for_container` tracks the earliest trigger tick per chunk so
///   idle chunks are skipped when collecting.
/// - `sub_tick_counter` hands out the insertion sequence used as the FIFO
///   tie-break across the whole world.
pub struct LevelTicks<T: Copy + Eq + Hash> {
    all_containers: FxHashMap<ChunkPos, LevelChunkTicks<T>>,
    next_tick_for_container: FxHashMap<ChunkPos, u64>,
    sub_tick_counter: u64,
}

impl<T: Copy + Eq + Hash> LevelTicks<T> {
    /// Creates an empty coordinator.
    #[must_use]
    pub fn new() -> Self {
        Self {
            all_containers: FxHashMap::default(),
            next_tick_for_container: FxHashMap::default(),
            sub_tick_counter: 0,
        }
    }

    /// Schedules `tick_type` at `pos` to fire on `current_tick + delay`.
    ///
    /// Returns `false` if a tick for (pos, type) is already pending.
    pub fn schedule(
        &mut self,
        pos: BlockPos,
        tick_type: T,
        current_tick: u64,
        delay: u32,
        priority: TickPriority,
    ) -> bool {
        self.schedule_at(pos, tick_type, current_tick + u64::from(delay), priority)
    }

    /// Schedules with normal priority.
    pub fn schedule_tick(&mut self, pos: BlockPos, tick_type: T, current_tick: u64, delay: u32) -> bool {
        self.schedule(pos, tick_type, current_tick, delay, TickPriority::Normal)
    }

    /// Schedules a tick for an absolute game tick.
    pub fn schedule_at(&mut self, pos: BlockPos, tick_type: T, trigger_tick: u64, priority: TickPriority) -> bool {
        let tick = ScheduledTick::with_priority(tick_type, pos, trigger_tick, priority, self.sub_tick_counter);
        let inserted = self.insert(tick);
        if inserted {
            self.sub_tick_counter += 1;
        }
        inserted
    }

    /// Re-inserts a saved tick, keeping its insertion sequence. Ticks scheduled
    /// afterwards sort after every restored one.
    pub fn restore(&mut self, tick: ScheduledTick<T>) -> bool {
        let next_order = tick.sub_tick_order + 1;
        let inserted = self.insert(tick);
        if inserted {
            self.sub_tick_counter = self.sub_tick_counter.max(next_order);
        }
        inserted
    }

    fn insert(&mut self, tick: ScheduledTick<T>) -> bool {
        let pos = tick.pos;
        let trigger_tick = tick.trigger_tick;
        let chunk_pos = pos.chunk_pos();

        let container = self.all_containers.entry(chunk_pos).or_default();
        if !container.schedule(tick) {
            log::trace!("tick at {pos} already pending, keeping the first one");
            return false;
        }

        self.next_tick_for_container
            .entry(chunk_pos)
            .and_modify(|earliest| *earliest = (*earliest).min(trigger_tick))
            .or_insert(trigger_tick);
        true
    }

    /// Whether a tick is pending for (pos, type).
    #[must_use]
    pub fn has_scheduled_tick(&self, pos: BlockPos, tick_type: T) -> bool {
        self.all_containers
            .get(&pos.chunk_pos())
            .is_some_and(|c| c.has_scheduled_tick(pos, tick_type))
    }

    /// Yields every tick due at or before `current_tick`, at most `max_ticks`
    /// of them, in global (trigger tick, priority, insertion) order.
    ///
    /// Ticks are removed from their queues as the iterator advances; ticks
    /// not pulled before it is dropped stay pending.
    pub fn collect_due(&mut self, current_tick: u64, max_ticks: usize) -> DueTicks<'_, T> {
        let mut chunks_to_tick: Vec<ChunkPos> = self
            .next_tick_for_container
            .iter()
            .filter(|(_, earliest)| **earliest <= current_tick)
            .map(|(pos, _)| *pos)
            .collect();
        chunks_to_tick.sort_unstable();

        // Seed the merge with the head of each due chunk
        let mut merged_heap = BinaryHeap::with_capacity(chunks_to_tick.len());
        for chunk_pos in &chunks_to_tick {
            if let Some(tick) = self.all_containers.get(chunk_pos).and_then(LevelChunkTicks::peek)
                && tick.trigger_tick <= current_tick
            {
                merged_heap.push(MergeEntry {
                    tick: tick.clone(),
                    chunk_pos: *chunk_pos,
                });
            }
        }

        DueTicks {
            level_ticks: self,
            current_tick,
            remaining: max_ticks,
            merged_heap,
            chunks_to_tick,
        }
    }

    /// Total pending ticks.
    #[must_use]
    pub fn count(&self) -> usize {
        self.all_containers.values().map(LevelChunkTicks::count).sum()
    }

    /// All pending ticks, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &ScheduledTick<T>> {
        self.all_containers.values().flat_map(LevelChunkTicks::iter)
    }

    fn refresh_container(&mut self, chunk_pos: ChunkPos) {
        match self.all_containers.get(&chunk_pos).and_then(LevelChunkTicks::peek) {
            Some(next) => {
                self.next_tick_for_container.insert(chunk_pos, next.trigger_tick);
            }
            None => {
                self.next_tick_for_container.remove(&chunk_pos);
                self.all_containers.remove(&chunk_pos);
            }
        }
    }
}

impl<T: Copy + Eq + Hash> Default for LevelTicks<T> {
    fn default() -> Self {
        Self::new()
    }
}

struct MergeEntry<T> {
    tick: ScheduledTick<T>,
    chunk_pos: ChunkPos,
}

impl<T: Eq> PartialEq for MergeEntry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.tick == other.tick
    }
}

impl<T: Eq> Eq for MergeEntry<T> {}

impl<T: Eq> PartialOrd for MergeEntry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: Eq> Ord for MergeEntry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.tick.cmp(&other.tick)
    }
}

/// Lazy iterator over due ticks, see [`LevelTicks::collect_due`].
pub struct DueTicks<'a, T: Copy + Eq + Hash> {
    level_ticks: &'a mut LevelTicks<T>,
    current_tick: u64,
    remaining: usize,
    merged_heap: BinaryHeap<MergeEntry<T>>,
    chunks_to_tick: Vec<ChunkPos>,
}

impl<T: Copy + Eq + Hash> Iterator for DueTicks<'_, T> {
    type Item = ScheduledTick<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let MergeEntry { chunk_pos, .. } = self.merged_heap.pop()?;
        let container = self.level_ticks.all_containers.get_mut(&chunk_pos)?;
        let tick = container.poll()?;
        if let Some(next) = container.peek()
            && next.trigger_tick <= self.current_tick
        {
            self.merged_heap.push(MergeEntry {
                tick: next.clone(),
                chunk_pos,
            });
        }
        self.remaining -= 1;
        Some(tick)
    }
}

impl<T: Copy + Eq + Hash> Drop for DueTicks<'_, T> {
    fn drop(&mut self) {
        for chunk_pos in self.chunks_to_tick.drain(..) {
            self.level_ticks.refresh_container(chunk_pos);
        }
    }
}

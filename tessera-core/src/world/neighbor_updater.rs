//! The breadth-first worklist behind block change propagation.
//!
//! A change enqueues its follow-up work here instead of running it in place.
//! Only the outermost change drains the queue, so a callback that changes
//! another block just adds to the same worklist. Every drain is capped at
//! `max_chained_updates` entries; whatever is left after that is discarded.

use std::collections::VecDeque;

use tessera_registry::{BlockId, BlockStateId, blocks::properties::Direction};
use tessera_utils::{BlockPos, UpdateFlags};

/// One unit of propagation work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NeighborUpdate {
    /// The cell at `pos` went from `old_state` to `new_state`: run `on_remove`
    /// on the old block if the block changed and `on_place` on the new one.
    Placed {
        /// The changed cell.
        pos: BlockPos,
        /// State before the change.
        old_state: BlockStateId,
        /// State after the change.
        new_state: BlockStateId,
        /// Whether the change moved a block.
        moved_by_piston: bool,
    },
    /// Tell the block at `pos` that `source_pos` changed.
    NeighborChanged {
        /// Cell to notify.
        pos: BlockPos,
        /// Block now at the source.
        source_block: BlockId,
        /// The changed cell.
        source_pos: BlockPos,
        /// Whether the change moved a block.
        moved_by_piston: bool,
    },
    /// Ask the block at `pos` to recompute its state because the cell at
    /// `neighbor_pos`, in `direction` from it, changed.
    ShapeUpdate {
        /// Cell to update.
        pos: BlockPos,
        /// Direction from `pos` toward the changed cell.
        direction: Direction,
        /// The changed cell.
        neighbor_pos: BlockPos,
        /// Flags of the change, reused when the update changes the cell.
        flags: UpdateFlags,
    },
}

impl NeighborUpdate {
    /// The cell the update is delivered to.
    #[must_use]
    pub const fn pos(&self) -> BlockPos {
        match self {
            Self::Placed { pos, .. } | Self::NeighborChanged { pos, .. } | Self::ShapeUpdate { pos, .. } => *pos,
        }
    }
}

/// Outcome of a finished drain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrainSummary {
    /// The change that started the drain.
    pub origin: BlockPos,
    /// Entries processed.
    pub processed: usize,
    /// Entries dropped when the cap was hit.
    pub dropped: usize,
}

impl DrainSummary {
    /// Whether the drain hit the cap.
    #[must_use]
    pub const fn overflowed(&self) -> bool {
        self.dropped > 0
    }
}

/// FIFO worklist with a per-drain cap.
#[derive(Debug)]
pub struct NeighborUpdater {
    queue: VecDeque<NeighborUpdate>,
    max_chained_updates: usize,
    origin: Option<BlockPos>,
    processed: usize,
    dropped: usize,
}

impl NeighborUpdater {
    /// Creates an idle updater.
    #[must_use]
    pub fn new(max_chained_updates: usize) -> Self {
        Self {
            queue: VecDeque::new(),
            max_chained_updates,
            origin: None,
            processed: 0,
            dropped: 0,
        }
    }

    /// Whether a drain is in progress.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.origin.is_some()
    }

    /// Entries waiting.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Appends an entry.
    pub fn push(&mut self, update: NeighborUpdate) {
        self.queue.push_back(update);
    }

    /// Starts a drain for a change at `origin`. Returns false if one is
    /// already running, in which case the caller must not drain.
    pub fn begin(&mut self, origin: BlockPos) -> bool {
        if self.is_running() {
            return false;
        }
        self.origin = Some(origin);
        self.processed = 0;
        self.dropped = 0;
        true
    }

    /// Next entry of the running drain. Once the cap is reached the rest of
    /// the queue is discarded and `None` is returned.
    pub fn next_update(&mut self) -> Option<NeighborUpdate> {
        if self.processed >= self.max_chained_updates && !self.queue.is_empty() {
            self.dropped += self.queue.len();
            self.queue.clear();
            return None;
        }
        let update = self.queue.pop_front()?;
        self.processed += 1;
        Some(update)
    }

    /// Ends the running drain.
    pub fn finish(&mut self) -> Option<DrainSummary> {
        let origin = self.origin.take()?;
        Some(DrainSummary {
            origin,
            processed: self.processed,
            dropped: self.dropped,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::iter;

    use super::*;

    fn changed(x: i32) -> NeighborUpdate {
        NeighborUpdate::NeighborChanged {
            pos: BlockPos::new(x, 0, 0),
            source_block: BlockId::AIR,
            source_pos: BlockPos::ZERO,
            moved_by_piston: false,
        }
    }

    #[test]
    fn test_fifo_order() {
        let mut updater = NeighborUpdater::new(16);
        assert!(updater.begin(BlockPos::ZERO));
        for x in 0..3 {
            updater.push(changed(x));
        }
        let order: Vec<i32> = iter::from_fn(|| updater.next_update())
            .map(|update| update.pos().0.x)
            .collect();
        assert_eq!(order, vec![0, 1, 2]);
        let summary = updater.finish().expect("drain was running");
        assert_eq!(summary.processed, 3);
        assert!(!summary.overflowed());
    }

    #[test]
    fn test_nested_begin_is_refused() {
        let mut updater = NeighborUpdater::new(16);
        assert!(updater.begin(BlockPos::ZERO));
        assert!(!updater.begin(BlockPos::new(1, 0, 0)));
        updater.finish();
        assert!(!updater.is_running());
    }

    #[test]
    fn test_cap_discards_the_rest() {
        let mut updater = NeighborUpdater::new(2);
        updater.begin(BlockPos::ZERO);
        for x in 0..5 {
            updater.push(changed(x));
        }
        assert!(updater.next_update().is_some());
        assert!(updater.next_update().is_some());
        assert!(updater.next_update().is_none());
        assert_eq!(updater.pending(), 0);
        let summary = updater.finish().expect("drain was running");
        assert_eq!(summary.processed, 2);
        assert_eq!(summary.dropped, 3);
        assert!(summary.overflowed());
    }
}

use std::cmp::Ordering;

use tessera_utils::BlockPos;

/// Ordering between ticks due on the same game tick. Lower values run first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(i8)]
pub enum TickPriority {
    /// -3
    ExtremelyHigh = -3,
    /// -2
    VeryHigh = -2,
    /// -1
    High = -1,
    /// 0
    #[default]
    Normal = 0,
    /// 1
    Low = 1,
    /// 2
    VeryLow = 2,
    /// 3
    ExtremelyLow = 3,
}

impl TickPriority {
    /// Numeric value, lower runs first.
    #[inline]
    #[must_use]
    pub const fn value(self) -> i8 {
        self as i8
    }

    /// Inverse of [`TickPriority::value`].
    #[must_use]
    pub const fn from_value(value: i8) -> Option<Self> {
        Some(match value {
            -3 => Self::ExtremelyHigh,
            -2 => Self::VeryHigh,
            -1 => Self::High,
            0 => Self::Normal,
            1 => Self::Low,
            2 => Self::VeryLow,
            3 => Self::ExtremelyLow,
            _ => return None,
        })
    }
}

impl PartialOrd for TickPriority {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TickPriority {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so that BinaryHeap pops High before Normal before Low
        other.value().cmp(&self.value())
    }
}

/// A pending event for `tick_type` at `pos`.
#[derive(Debug, Clone)]
pub struct ScheduledTick<T> {
    /// The type captured when the tick was scheduled.
    pub tick_type: T,
    /// Where the tick fires.
    pub pos: BlockPos,
    /// Absolute game tick the event is due on.
    pub trigger_tick: u64,
    /// Ordering within the same trigger tick.
    pub priority: TickPriority,
    /// Insertion sequence, the FIFO tie-break.
    pub sub_tick_order: u64,
}

impl<T> ScheduledTick<T> {
    /// Creates a tick with normal priority.
    pub fn new(tick_type: T, pos: BlockPos, trigger_tick: u64, sub_tick_order: u64) -> Self {
        Self::with_priority(tick_type, pos, trigger_tick, TickPriority::Normal, sub_tick_order)
    }

    /// Creates a tick with the given priority.
    pub fn with_priority(
        tick_type: T,
        pos: BlockPos,
        trigger_tick: u64,
        priority: TickPriority,
        sub_tick_order: u64,
    ) -> Self {
        Self {
            tick_type,
            pos,
            trigger_tick,
            priority,
            sub_tick_order,
        }
    }
}

impl<T: PartialEq> PartialEq for ScheduledTick<T> {
    fn eq(&self, other: &Self) -> bool {
        self.trigger_tick == other.trigger_tick
            && self.priority == other.priority
            && self.sub_tick_order == other.sub_tick_order
    }
}

impl<T: Eq> Eq for ScheduledTick<T> {}

impl<T: Eq> PartialOrd for ScheduledTick<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: Eq> Ord for ScheduledTick<T> {
    /// `BinaryHeap` is a max-heap, so "greater" means "fires earlier":
    /// earlier trigger tick, then higher priority, then lower sequence.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .trigger_tick
            .cmp(&self.trigger_tick)
            .then_with(|| self.priority.cmp(&other.priority))
            .then_with(|| other.sub_tick_order.cmp(&self.sub_tick_order))
    }
}

/// Deduplication key: position and type, ignoring timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickKey<T> {
    /// Where the tick fires.
    pub pos: BlockPos,
    /// The captured type.
    pub tick_type: T,
}

impl<T: Copy> From<&ScheduledTick<T>> for TickKey<T> {
    fn from(tick: &ScheduledTick<T>) -> Self {
        Self {
            pos: tick.pos,
            tick_type: tick.tick_type,
        }
    }
}

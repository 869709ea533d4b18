//! Sparse block storage.
//!
//! The grid only stores sections that hold at least one non-air block. Each
//! section is behind an `Arc`, so [`WorldGrid::snapshot`] is a shallow copy and
//! the live grid clones a section only when it writes to one a snapshot still
//! shares.

use std::{
    collections::{BTreeMap, BTreeSet},
    mem,
    sync::Arc,
};

use tessera_registry::BlockStateId;
use tessera_utils::{
    BlockPos, SectionPos,
    random::Random,
    types::SECTION_VOLUME,
};

#[derive(Debug, Clone)]
enum SectionStates {
    Homogeneous(BlockStateId),
    Dense(Box<[BlockStateId]>),
}

/// A 16x16x16 cube of block states.
#[derive(Debug, Clone)]
pub struct Section {
    states: SectionStates,
    non_air: u16,
    random_ticking: BTreeSet<u16>,
}

impl Section {
    fn empty() -> Self {
        Self {
            states: SectionStates::Homogeneous(BlockStateId::AIR),
            non_air: 0,
            random_ticking: BTreeSet::new(),
        }
    }

    /// State at a section-local index.
    #[must_use]
    pub fn get(&self, index: usize) -> BlockStateId {
        match &self.states {
            SectionStates::Homogeneous(state) => *state,
            SectionStates::Dense(states) => states[index],
        }
    }

    /// Number of non-air cells.
    #[must_use]
    pub const fn non_air_count(&self) -> u16 {
        self.non_air
    }

    /// Whether any cell takes random ticks.
    #[must_use]
    pub fn has_random_ticking(&self) -> bool {
        !self.random_ticking.is_empty()
    }

    fn set(&mut self, index: usize, state: BlockStateId, random_ticking: bool) -> BlockStateId {
        let old = match &mut self.states {
            SectionStates::Homogeneous(current) if *current == state => state,
            SectionStates::Homogeneous(current) => {
                let old = *current;
                let mut dense = vec![old; SECTION_VOLUME].into_boxed_slice();
                dense[index] = state;
                self.states = SectionStates::Dense(dense);
                old
            }
            SectionStates::Dense(states) => mem::replace(&mut states[index], state),
        };

        if old != BlockStateId::AIR {
            self.non_air -= 1;
        }
        if state != BlockStateId::AIR {
            self.non_air += 1;
        }

        let local = index as u16;
        if random_ticking {
            self.random_ticking.insert(local);
        } else {
            self.random_ticking.remove(&local);
        }
        old
    }

    fn iter_non_air(&self) -> impl Iterator<Item = (usize, BlockStateId)> + '_ {
        (0..SECTION_VOLUME)
            .map(|index| (index, self.get(index)))
            .filter(|(_, state)| *state != BlockStateId::AIR)
    }
}

/// The live block grid of a world.
#[derive(Debug, Clone, Default)]
pub struct WorldGrid {
    sections: BTreeMap<SectionPos, Arc<Section>>,
}

impl WorldGrid {
    /// Creates an empty grid.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// State at `pos`; air where nothing was ever placed.
    #[must_use]
    pub fn get(&self, pos: &BlockPos) -> BlockStateId {
        self.sections
            .get(&pos.section_pos())
            .map_or(BlockStateId::AIR, |section| section.get(pos.section_index()))
    }

    /// Writes `state` at `pos` and returns the previous state.
    ///
    /// `random_ticking` decides whether the cell is in the random tick index.
    pub fn set(&mut self, pos: &BlockPos, state: BlockStateId, random_ticking: bool) -> BlockStateId {
        let section_pos = pos.section_pos();
        if state == BlockStateId::AIR && !self.sections.contains_key(&section_pos) {
            return BlockStateId::AIR;
        }
        let section = Arc::make_mut(
            self.sections
                .entry(section_pos)
                .or_insert_with(|| Arc::new(Section::empty())),
        );
        let old = section.set(pos.section_index(), state, random_ticking);
        if section.non_air_count() == 0 {
            self.sections.remove(&section_pos);
        }
        old
    }

    /// Number of stored sections.
    #[must_use]
    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// Number of cells in the random tick index.
    #[must_use]
    pub fn random_ticking_count(&self) -> usize {
        self.sections
            .values()
            .map(|section| section.random_ticking.len())
            .sum()
    }

    /// Draws `speed` local positions in every section that has random-ticking
    /// cells, in ascending section order, and keeps the ones that hit an
    /// indexed cell.
    pub fn random_tick_candidates(&self, speed: u32, random: &mut dyn Random) -> Vec<BlockPos> {
        let mut candidates = Vec::new();
        for (section_pos, section) in &self.sections {
            if !section.has_random_ticking() {
                continue;
            }
            for _ in 0..speed {
                let index = random.next_i32_bounded(SECTION_VOLUME as i32) as u16;
                if section.random_ticking.contains(&index) {
                    candidates.push(section_pos.block_at(usize::from(index)));
                }
            }
        }
        candidates
    }

    /// Every non-air cell, section by section in ascending order.
    pub fn iter_non_air(&self) -> impl Iterator<Item = (BlockPos, BlockStateId)> + '_ {
        self.sections.iter().flat_map(|(section_pos, section)| {
            section
                .iter_non_air()
                .map(move |(index, state)| (section_pos.block_at(index), state))
        })
    }

    /// A read-only view of the grid as it is now.
    #[must_use]
    pub fn snapshot(&self) -> GridSnapshot {
        GridSnapshot {
            sections: self.sections.clone(),
        }
    }
}

/// A frozen copy of a [`WorldGrid`] that other threads can read while the world
/// keeps ticking.
#[derive(Debug, Clone)]
pub struct GridSnapshot {
    sections: BTreeMap<SectionPos, Arc<Section>>,
}

impl GridSnapshot {
    /// State at `pos` when the snapshot was taken.
    #[must_use]
    pub fn get(&self, pos: &BlockPos) -> BlockStateId {
        self.sections
            .get(&pos.section_pos())
            .map_or(BlockStateId::AIR, |section| section.get(pos.section_index()))
    }

    /// Number of non-air cells.
    #[must_use]
    pub fn non_air_count(&self) -> usize {
        self.sections
            .values()
            .map(|section| usize::from(section.non_air_count()))
            .sum()
    }
}

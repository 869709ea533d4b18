//! Weathering copper behavior implementation.
//!
//! Copper blocks oxidize one stage at a time on random ticks. The chance to
//! advance depends on the other copper blocks within a taxicab distance of 4:
//! any less weathered neighbour blocks the change, more weathered ones speed
//! it up.

use std::cmp::Ordering;

use tessera_registry::{BlockId, BlockRegistry, BlockStateId};
use tessera_utils::{BlockPos, UpdateFlags, random::Random};

use crate::{
    behavior::{AgeFamily, BlockBehaviour, ChangeOverTime, RandomTickable},
    world::{EffectKind, World},
};

/// Behavior for one oxidation stage of copper.
pub struct WeatheringCopperBlock {
    block: BlockId,
    age: u8,
    next: Option<BlockId>,
}

impl WeatheringCopperBlock {
    /// Chance per random tick to attempt a change at all.
    pub const CHANGE_ATTEMPT_CHANCE: f32 = 0.056_888_89;
    /// Taxicab radius scanned for other members of the family.
    pub const SCAN_DISTANCE: u32 = 4;

    /// Creates a new copper behavior at stage `age` that ages into `next`.
    #[must_use]
    pub const fn new(block: BlockId, age: u8, next: Option<BlockId>) -> Self {
        Self { block, age, next }
    }

    /// The block this state ages into, if the neighbourhood allows it and the roll succeeds.
    fn next_state(&self, state: BlockStateId, world: &World, pos: BlockPos, random: &mut dyn Random) -> Option<BlockStateId> {
        let next = self.next?;
        let registries = world.registries();
        let mut same_age = 0u32;
        let mut older = 0u32;

        for other in pos.within_manhattan(Self::SCAN_DISTANCE) {
            if other == pos {
                continue;
            }
            let other_state = world.get_block_state(&other);
            let Some(aging) = registries.behaviour_of(other_state).as_change_over_time() else {
                continue;
            };
            if aging.age_family() != self.age_family() {
                continue;
            }
            match aging.age().cmp(&self.age) {
                Ordering::Less => return None,
                Ordering::Greater => older += 1,
                Ordering::Equal => same_age += 1,
            }
        }

        let ratio = (older + 1) as f32 / (older + same_age + 1) as f32;
        let chance = ratio * ratio * self.chance_modifier();
        (random.next_f32() < chance).then(|| registries.blocks.with_properties_of(next, state))
    }
}

impl BlockBehaviour for WeatheringCopperBlock {
    fn as_random_tickable(&self) -> Option<&dyn RandomTickable> {
        Some(self)
    }

    fn as_change_over_time(&self) -> Option<&dyn ChangeOverTime> {
        Some(self)
    }
}

impl RandomTickable for WeatheringCopperBlock {
    fn is_random_ticking(&self, _state: BlockStateId, _blocks: &BlockRegistry) -> bool {
        self.next.is_some()
    }

    fn random_tick(&self, state: BlockStateId, world: &mut World, pos: BlockPos, random: &mut dyn Random) {
        if random.next_f32() >= Self::CHANGE_ATTEMPT_CHANCE {
            return;
        }
        if let Some(next) = self.next_state(state, world, pos, random) {
            log::debug!(
                "{} at {pos} weathered to stage {}",
                world.blocks().block(self.block).key,
                self.age + 1
            );
            world.set_block(pos, next, UpdateFlags::UPDATE_ALL);
            world.play_effect(pos, EffectKind::Weathered, i32::from(self.age + 1));
        }
    }
}

impl ChangeOverTime for WeatheringCopperBlock {
    fn age_family(&self) -> AgeFamily {
        AgeFamily::Copper
    }

    fn age(&self) -> u8 {
        self.age
    }

    fn next_block(&self) -> Option<BlockId> {
        self.next
    }
}

//! Name-based world records.
//!
//! A [`WorldRecord`] stores states through a palette of [`BlockStateRecord`]s,
//! so a record stays readable by a registry whose numeric ids differ from the
//! one that wrote it. Loading restores cells without running any behaviour.

use std::{collections::BTreeMap, sync::Arc};

use serde::{Deserialize, Serialize};
use tessera_registry::{BlockStateId, BlockStateRecord};
use tessera_utils::{BlockPos, Identifier};

use crate::{
    behavior::Registries,
    block_entity::BlockEntityRecord,
    config::EngineConfig,
    error::EngineError,
    ticks::{ScheduledTick, TickPriority},
    world::World,
};

/// A pending scheduled tick as stored in a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledTickRecord {
    /// Where the tick fires.
    pub pos: BlockPos,
    /// Block the tick was scheduled for.
    pub block: Identifier,
    /// Absolute game tick it fires on.
    pub trigger_tick: u64,
    /// See [`TickPriority::value`].
    pub priority: i8,
    /// Insertion order among ticks due on the same game tick.
    pub sub_tick_order: u64,
}

/// Everything needed to rebuild a [`World`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldRecord {
    /// Game time at save.
    pub game_time: u64,
    /// Distinct states referenced by `cells`.
    pub palette: Vec<BlockStateRecord>,
    /// Non-air cells as (position, palette index), in ascending section order.
    pub cells: Vec<(BlockPos, u32)>,
    /// Sidecar data.
    pub block_entities: Vec<BlockEntityRecord>,
    /// Pending ticks in firing order.
    pub scheduled_ticks: Vec<ScheduledTickRecord>,
}

impl WorldRecord {
    /// Serializes the record as JSON.
    pub fn to_json(&self) -> Result<String, EngineError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parses a record from JSON.
    pub fn from_json(text: &str) -> Result<Self, EngineError> {
        Ok(serde_json::from_str(text)?)
    }
}

impl World {
    /// Captures the world as a record.
    #[must_use]
    pub fn save(&self) -> WorldRecord {
        let blocks = self.blocks();

        let mut palette = Vec::new();
        let mut palette_index: BTreeMap<BlockStateId, u32> = BTreeMap::new();
        let mut cells = Vec::new();
        for (pos, state) in self.grid.iter_non_air() {
            let index = *palette_index.entry(state).or_insert_with(|| {
                palette.push(blocks.to_record(state));
                (palette.len() - 1) as u32
            });
            cells.push((pos, index));
        }

        let mut block_entities: Vec<BlockEntityRecord> = self
            .block_entities
            .values()
            .map(|entity| BlockEntityRecord::save(&*entity.lock()))
            .collect();
        block_entities.sort_by_key(|record| record.pos);

        let mut ticks: Vec<_> = self.ticks.iter().collect();
        ticks.sort_by_key(|tick| (tick.trigger_tick, tick.priority.value(), tick.sub_tick_order));
        let scheduled_ticks = ticks
            .into_iter()
            .map(|tick| ScheduledTickRecord {
                pos: tick.pos,
                block: blocks.block(tick.tick_type).key.clone(),
                trigger_tick: tick.trigger_tick,
                priority: tick.priority.value(),
                sub_tick_order: tick.sub_tick_order,
            })
            .collect();

        WorldRecord {
            game_time: self.game_time,
            palette,
            cells,
            block_entities,
            scheduled_ticks,
        }
    }

    /// Rebuilds a world from a record.
    ///
    /// Cells are written directly, with no listener calls and no propagation.
    /// Sidecars are recreated for every block that owns one and then read
    /// their saved data.
    pub fn load(
        registries: Arc<Registries>,
        config: EngineConfig,
        record: &WorldRecord,
    ) -> Result<Self, EngineError> {
        let palette = record
            .palette
            .iter()
            .map(|entry| registries.blocks.from_record(entry))
            .collect::<Result<Vec<_>, _>>()?;

        let mut world = World::new(Arc::clone(&registries), config);
        world.game_time = record.game_time;

        for (pos, index) in &record.cells {
            let state = *palette.get(*index as usize).ok_or_else(|| {
                EngineError::Persistence(format!("cell {pos} uses palette index {index} out of range"))
            })?;
            world
                .grid
                .set(pos, state, registries.is_random_ticking(state));
            if let Some(factory) = registries.behaviour_of(state).as_entity_block() {
                world
                    .block_entities
                    .insert(*pos, factory.new_block_entity(*pos, state));
            }
        }

        for saved in &record.block_entities {
            let entity = world.block_entities.get(&saved.pos).ok_or_else(|| {
                EngineError::Persistence(format!("no block entity owner at {}", saved.pos))
            })?;
            let mut entity = entity.lock();
            if entity.kind() != saved.kind {
                return Err(EngineError::Persistence(format!(
                    "block entity at {} is {}, record says {}",
                    saved.pos,
                    entity.kind(),
                    saved.kind
                )));
            }
            entity.load_additional(&saved.data)?;
        }

        let mut ticks: Vec<&ScheduledTickRecord> = record.scheduled_ticks.iter().collect();
        ticks.sort_by_key(|tick| (tick.trigger_tick, tick.priority, tick.sub_tick_order));
        for tick in ticks {
            let block = registries
                .blocks
                .by_key(&tick.block)
                .ok_or_else(|| EngineError::Persistence(format!("unknown tick block {}", tick.block)))?;
            let priority = TickPriority::from_value(tick.priority).ok_or_else(|| {
                EngineError::Persistence(format!("tick priority {} out of range", tick.priority))
            })?;
            world.ticks.restore(ScheduledTick::with_priority(
                block,
                tick.pos,
                tick.trigger_tick,
                priority,
                tick.sub_tick_order,
            ));
        }

        log::debug!(
            "Loaded world at game time {} with {} cells and {} pending ticks",
            world.game_time,
            record.cells.len(),
            world.pending_tick_count()
        );
        Ok(world)
    }
}

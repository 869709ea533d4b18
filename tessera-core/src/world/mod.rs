//! The simulated world.
//!
//! A [`World`] owns the block grid, the sidecar block entities, the scheduled
//! tick queues and the propagation worklist. Every mutation goes through
//! `&mut World` on one thread; other threads read through [`GridSnapshot`]s.
//!
//! Behaviours are looked up in the shared [`Registries`]. Before calling into
//! a behaviour the world clones its `Arc<Registries>`, so the callback can take
//! `&mut World` while the behaviour itself stays borrowed from the clone.

mod entity;
pub mod grid;
mod listener;
pub mod neighbor_updater;

use std::{mem, sync::Arc};

use rustc_hash::FxHashMap;
use tessera_registry::{
    BlockId, BlockRegistry, BlockStateId,
    blocks::{
        properties::Direction,
        shapes::{RenderShape, VoxelShape},
    },
};
use tessera_utils::{BlockPos, UpdateFlags, random::Random};

pub use entity::{EntityView, SimpleEntity};
pub use grid::{GridSnapshot, WorldGrid};
pub use listener::{
    EffectKind, FeatureRef, ListenerEvent, MenuKind, NoopListener, RecordingListener, WorldListener,
};
pub use neighbor_updater::{DrainSummary, NeighborUpdate, NeighborUpdater};

use crate::{
    behavior::{InteractionResult, Registries},
    block_entity::SharedBlockEntity,
    config::EngineConfig,
    error::EngineError,
    ticks::{LevelTicks, ScheduledTick, TickKey, TickPriority},
};

/// What happened during one [`World::tick`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Game time after the tick.
    pub game_time: u64,
    /// Scheduled ticks that reached their behaviour.
    pub scheduled_fired: usize,
    /// Scheduled ticks dropped because the block at their position changed.
    pub stale_dropped: usize,
    /// Random ticks delivered.
    pub random_ticks: usize,
    /// Diagnostics recorded during the tick, including any the full
    /// diagnostic list did not keep.
    pub diagnostics: usize,
}

/// A voxel world.
pub struct World {
    registries: Arc<Registries>,
    config: EngineConfig,
    pub(crate) grid: WorldGrid,
    pub(crate) block_entities: FxHashMap<BlockPos, SharedBlockEntity>,
    pub(crate) ticks: LevelTicks<BlockId>,
    neighbor_updater: NeighborUpdater,
    listener: Box<dyn WorldListener>,
    pub(crate) game_time: u64,
    firing: Option<TickKey<BlockId>>,
    diagnostics: Vec<EngineError>,
    diagnostics_recorded: usize,
}

impl World {
    /// Falling blocks that drop below this height leave the world.
    pub const MIN_Y: i32 = -64;

    /// Creates an empty world.
    #[must_use]
    pub fn new(registries: Arc<Registries>, config: EngineConfig) -> Self {
        let neighbor_updater = NeighborUpdater::new(config.max_chained_updates);
        Self {
            registries,
            config,
            grid: WorldGrid::new(),
            block_entities: FxHashMap::default(),
            ticks: LevelTicks::new(),
            neighbor_updater,
            listener: Box::new(NoopListener),
            game_time: 0,
            firing: None,
            diagnostics: Vec::new(),
            diagnostics_recorded: 0,
        }
    }

    /// Replaces the listener, builder style.
    #[must_use]
    pub fn with_listener(mut self, listener: impl WorldListener + 'static) -> Self {
        self.listener = Box::new(listener);
        self
    }

    /// Replaces the listener.
    pub fn set_listener(&mut self, listener: Box<dyn WorldListener>) {
        self.listener = listener;
    }

    /// The shared registries.
    #[must_use]
    pub fn registries(&self) -> &Arc<Registries> {
        &self.registries
    }

    /// The block state table.
    #[must_use]
    pub fn blocks(&self) -> &BlockRegistry {
        &self.registries.blocks
    }

    /// The engine config this world runs with.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Ticks simulated so far.
    #[must_use]
    pub const fn game_time(&self) -> u64 {
        self.game_time
    }

    /// The live grid.
    #[must_use]
    pub const fn grid(&self) -> &WorldGrid {
        &self.grid
    }

    /// A consistent copy of the grid that can be sent to other threads.
    #[must_use]
    pub fn snapshot(&self) -> GridSnapshot {
        self.grid.snapshot()
    }

    /// State at `pos`.
    #[must_use]
    pub fn get_block_state(&self, pos: &BlockPos) -> BlockStateId {
        self.grid.get(pos)
    }

    /// Block at `pos`.
    #[must_use]
    pub fn get_block(&self, pos: &BlockPos) -> BlockId {
        self.blocks().block_of(self.grid.get(pos))
    }

    /// Outline shape of the cell at `pos`.
    #[must_use]
    pub fn shape(&self, pos: &BlockPos) -> VoxelShape {
        let state = self.grid.get(pos);
        self.registries.behaviour_of(state).shape(state, self.blocks())
    }

    /// How the renderer draws the cell at `pos`.
    #[must_use]
    pub fn render_shape(&self, pos: &BlockPos) -> RenderShape {
        let state = self.grid.get(pos);
        self.registries
            .behaviour_of(state)
            .render_shape(state, self.blocks())
    }

    /// Sets the state at `pos`. Returns true if the cell changed.
    pub fn set_block(&mut self, pos: BlockPos, state: BlockStateId, flags: UpdateFlags) -> bool {
        self.try_swap_block(pos, state, flags)
            .is_some_and(|old_state| old_state != state)
    }

    /// Sets the state at `pos` and returns the previous state.
    ///
    /// On a real change this keeps the sidecar and the random tick index in
    /// step with the new state, notifies the listener unless `flags` suppress
    /// client feedback, and propagates the change to the neighbourhood as
    /// `flags` allow. Called from inside a behaviour callback it only queues
    /// the propagation; the outermost call drains it.
    ///
    /// A state the registry does not know is refused and the cell is left as
    /// it was, so the returned state is the one still there.
    pub fn swap_block(&mut self, pos: BlockPos, state: BlockStateId, flags: UpdateFlags) -> BlockStateId {
        self.try_swap_block(pos, state, flags)
            .unwrap_or_else(|| self.grid.get(&pos))
    }

    /// `swap_block`, with `None` for a refused state.
    fn try_swap_block(&mut self, pos: BlockPos, state: BlockStateId, flags: UpdateFlags) -> Option<BlockStateId> {
        let registries = Arc::clone(&self.registries);
        let blocks = &registries.blocks;
        if !blocks.is_valid_state(state) {
            log::warn!("Refusing to place unknown state {} at {pos}", state.0);
            return None;
        }

        let old_state = self.grid.set(&pos, state, registries.is_random_ticking(state));
        if old_state == state {
            return Some(old_state);
        }

        let old_block = blocks.block_of(old_state);
        let new_block = blocks.block_of(state);
        if old_block == new_block {
            if let Some(entity) = self.block_entities.get(&pos) {
                entity.lock().set_block_state(state);
            }
        } else {
            if let Some(entity) = self.block_entities.remove(&pos) {
                entity.lock().set_removed();
            }
            if let Some(factory) = registries.behaviour_of(state).as_entity_block() {
                self.block_entities
                    .insert(pos, factory.new_block_entity(pos, state));
            }
        }

        if !flags.suppresses_client_feedback() {
            self.listener.block_changed(pos, old_state, state);
        }

        let moved_by_piston = flags.is_move_context();
        self.neighbor_updater.push(NeighborUpdate::Placed {
            pos,
            old_state,
            new_state: state,
            moved_by_piston,
        });
        if flags.contains(UpdateFlags::UPDATE_NEIGHBORS) {
            self.push_neighbor_changes(pos, new_block, moved_by_piston);
        }
        if !flags.suppresses_shape_updates() {
            for direction in Direction::ALL {
                self.neighbor_updater.push(NeighborUpdate::ShapeUpdate {
                    pos: direction.relative(&pos),
                    direction: direction.opposite(),
                    neighbor_pos: pos,
                    flags,
                });
            }
            let radius = registries
                .behaviour_of(state)
                .shape_update_radius()
                .max(registries.behaviour_of(old_state).shape_update_radius());
            if radius > 1 {
                for target in pos.within_manhattan(radius) {
                    if target.manhattan_distance(&pos) <= 1 {
                        continue;
                    }
                    if let Some(direction) = Direction::toward(&target, &pos) {
                        self.neighbor_updater.push(NeighborUpdate::ShapeUpdate {
                            pos: target,
                            direction,
                            neighbor_pos: pos,
                            flags,
                        });
                    }
                }
            }
        }

        self.run_neighbor_updates(pos);
        Some(old_state)
    }

    /// Replaces the cell with air, notifying everything around it.
    pub fn destroy_block(&mut self, pos: BlockPos) -> bool {
        self.set_block(pos, BlockStateId::AIR, UpdateFlags::UPDATE_ALL)
    }

    /// Places `block` the way a player would: the behaviour picks the state,
    /// the target cell must be replaceable and the state must survive there.
    pub fn place_block(&mut self, pos: BlockPos, block: BlockId) -> bool {
        let registries = Arc::clone(&self.registries);
        let current = self.grid.get(&pos);
        if !registries.blocks.get_block(current).config.replaceable {
            return false;
        }
        let default_state = registries.blocks.default_state(block);
        let Some(state) = registries
            .behaviours
            .get(block)
            .get_state_for_placement(default_state, self, pos)
        else {
            return false;
        };
        if !registries.behaviour_of(state).can_survive(state, self, pos) {
            log::debug!("{} cannot survive at {pos}", registries.blocks.block(block).key);
            return false;
        }
        self.set_block(pos, state, UpdateFlags::UPDATE_ALL)
    }

    /// Notifies the six neighbours of `pos` that something there changed.
    pub fn update_neighbors_at(&mut self, pos: BlockPos, source_block: BlockId) {
        self.push_neighbor_changes(pos, source_block, false);
        self.run_neighbor_updates(pos);
    }

    fn push_neighbor_changes(&mut self, pos: BlockPos, source_block: BlockId, moved_by_piston: bool) {
        for direction in Direction::ALL {
            self.neighbor_updater.push(NeighborUpdate::NeighborChanged {
                pos: direction.relative(&pos),
                source_block,
                source_pos: pos,
                moved_by_piston,
            });
        }
    }

    fn run_neighbor_updates(&mut self, origin: BlockPos) {
        if !self.neighbor_updater.begin(origin) {
            return;
        }
        while let Some(update) = self.neighbor_updater.next_update() {
            self.apply_update(update);
        }
        if let Some(summary) = self.neighbor_updater.finish()
            && summary.overflowed()
        {
            log::warn!(
                "Update cascade from {} hit the limit of {} updates, dropped {}",
                summary.origin,
                self.config.max_chained_updates,
                summary.dropped
            );
            self.record_diagnostic(EngineError::PropagationOverflow {
                origin: summary.origin,
                processed: summary.processed,
            });
        }
    }

    fn apply_update(&mut self, update: NeighborUpdate) {
        let registries = Arc::clone(&self.registries);
        match update {
            NeighborUpdate::Placed {
                pos,
                old_state,
                new_state,
                moved_by_piston,
            } => {
                if registries.blocks.block_of(old_state) != registries.blocks.block_of(new_state) {
                    registries
                        .behaviour_of(old_state)
                        .on_remove(old_state, self, pos, new_state, moved_by_piston);
                }
                // A later change already replaced this state
                if self.grid.get(&pos) == new_state {
                    registries
                        .behaviour_of(new_state)
                        .on_place(new_state, self, pos, old_state, moved_by_piston);
                }
            }
            NeighborUpdate::NeighborChanged {
                pos,
                source_block,
                source_pos,
                moved_by_piston,
            } => {
                let state = self.grid.get(&pos);
                registries.behaviour_of(state).neighbor_changed(
                    state,
                    self,
                    pos,
                    source_block,
                    source_pos,
                    moved_by_piston,
                );
            }
            NeighborUpdate::ShapeUpdate {
                pos,
                direction,
                neighbor_pos,
                flags,
            } => {
                let state = self.grid.get(&pos);
                let Some(responsive) = registries.behaviour_of(state).as_shape_responsive() else {
                    return;
                };
                let neighbor_state = self.grid.get(&neighbor_pos);
                let updated = responsive.update_shape(state, self, pos, direction, neighbor_pos, neighbor_state);
                if updated == state {
                    return;
                }
                if registries.blocks.is_air(updated) {
                    self.destroy_block(pos);
                } else {
                    self.swap_block(pos, updated, flags.for_shape_cascade());
                }
            }
        }
    }

    /// Schedules a tick for `block` at `pos`, `delay` game ticks from now.
    ///
    /// Negative delays count as zero. A zero delay lands on the next tick.
    /// Returns false if a tick for (pos, block) is already pending or the
    /// request was refused; refusals are recorded as diagnostics.
    pub fn schedule_tick(&mut self, pos: BlockPos, block: BlockId, delay: i32) -> bool {
        self.schedule_tick_with_priority(pos, block, delay, TickPriority::Normal)
    }

    /// [`World::schedule_tick`] with an explicit priority.
    pub fn schedule_tick_with_priority(
        &mut self,
        pos: BlockPos,
        block: BlockId,
        delay: i32,
        priority: TickPriority,
    ) -> bool {
        match self.try_schedule_tick(pos, block, delay, priority) {
            Ok(scheduled) => scheduled,
            Err(err) => {
                log::warn!("{err}");
                self.record_diagnostic(err);
                false
            }
        }
    }

    /// Schedules a tick, returning refusals as errors instead of recording them.
    ///
    /// A tick firing for (pos, block) may not reschedule itself with zero
    /// delay: that would fire again on the same game tick.
    pub fn try_schedule_tick(
        &mut self,
        pos: BlockPos,
        block: BlockId,
        delay: i32,
        priority: TickPriority,
    ) -> Result<bool, EngineError> {
        if usize::from(block.0) >= self.blocks().block_count() {
            return Err(EngineError::UnknownBlockId(block));
        }
        let delay = u32::try_from(delay).unwrap_or_else(|_| {
            log::debug!("Clamping negative tick delay {delay} at {pos} to 0");
            0
        });
        if delay == 0 && self.firing == Some(TickKey { pos, tick_type: block }) {
            return Err(EngineError::ReentrantSchedule {
                pos,
                block: self.blocks().block(block).key.clone(),
            });
        }
        let scheduled = self.ticks.schedule(pos, block, self.game_time, delay, priority);
        if scheduled {
            log::trace!("Scheduled tick at {pos} for {}", self.game_time + u64::from(delay));
        }
        Ok(scheduled)
    }

    /// Whether a tick for `block` is pending at `pos`.
    #[must_use]
    pub fn has_scheduled_tick(&self, pos: BlockPos, block: BlockId) -> bool {
        self.ticks.has_scheduled_tick(pos, block)
    }

    /// Number of pending scheduled ticks.
    #[must_use]
    pub fn pending_tick_count(&self) -> usize {
        self.ticks.count()
    }

    /// Advances the world by one game tick.
    ///
    /// Fires every scheduled tick due now (up to the per-tick budget) in
    /// (trigger tick, priority, insertion) order, dropping those whose block
    /// changed since they were scheduled, then runs random ticks.
    pub fn tick(&mut self, random: &mut dyn Random) -> TickReport {
        self.game_time += 1;
        let span = tracing::debug_span!("world_tick", game_time = self.game_time);
        let _enter = span.enter();

        let diagnostics_before = self.diagnostics_recorded;
        let registries = Arc::clone(&self.registries);
        let mut report = TickReport {
            game_time: self.game_time,
            ..TickReport::default()
        };

        let due: Vec<ScheduledTick<BlockId>> = self
            .ticks
            .collect_due(self.game_time, self.config.max_scheduled_ticks_per_tick)
            .collect();
        for tick in due {
            let state = self.grid.get(&tick.pos);
            if registries.blocks.block_of(state) != tick.tick_type {
                log::trace!("Dropping stale tick at {}", tick.pos);
                report.stale_dropped += 1;
                continue;
            }
            self.firing = Some(TickKey::from(&tick));
            registries
                .behaviour_of(state)
                .scheduled_tick(state, self, tick.pos, random);
            self.firing = None;
            report.scheduled_fired += 1;
        }

        report.random_ticks = self.run_random_ticks(random);
        report.diagnostics = self.diagnostics_recorded - diagnostics_before;
        report
    }

    fn run_random_ticks(&mut self, random: &mut dyn Random) -> usize {
        let speed = self.config.random_tick_speed;
        if speed == 0 {
            return 0;
        }
        let candidates = self.grid.random_tick_candidates(speed, random);
        let mut delivered = 0;
        for pos in candidates {
            if self.random_tick_at(pos, random) {
                delivered += 1;
            }
        }
        delivered
    }

    /// Delivers one random tick to the cell at `pos`. Returns false if the
    /// state there does not take random ticks.
    pub fn random_tick_at(&mut self, pos: BlockPos, random: &mut dyn Random) -> bool {
        let registries = Arc::clone(&self.registries);
        let state = self.grid.get(&pos);
        if !registries.is_random_ticking(state) {
            return false;
        }
        let Some(tickable) = registries.behaviour_of(state).as_random_tickable() else {
            return false;
        };
        tickable.random_tick(state, self, pos, random);
        true
    }

    /// Signal strength the block at `pos` sends to its neighbour in `direction`.
    #[must_use]
    pub fn get_signal(&self, pos: BlockPos, direction: Direction) -> u8 {
        let state = self.grid.get(&pos);
        self.registries
            .behaviour_of(state)
            .as_redstone_source()
            .map_or(0, |source| source.signal(state, self.blocks(), direction))
    }

    /// Whether any neighbour of `pos` sends it a signal.
    #[must_use]
    pub fn has_neighbor_signal(&self, pos: BlockPos) -> bool {
        Direction::ALL
            .iter()
            .any(|direction| self.get_signal(direction.relative(&pos), direction.opposite()) > 0)
    }

    /// A player uses the block at `pos` with an empty hand.
    pub fn use_without_item(&mut self, pos: BlockPos, player: &dyn EntityView) -> InteractionResult {
        let registries = Arc::clone(&self.registries);
        let state = self.grid.get(&pos);
        registries
            .behaviour_of(state)
            .use_without_item(state, self, pos, player)
    }

    /// An entity lands on the block at `pos` after falling `fall_distance`
    /// blocks. Returns false if the block ignores falls.
    pub fn entity_fall_on(
        &mut self,
        pos: BlockPos,
        entity: &mut dyn EntityView,
        fall_distance: f64,
        random: &mut dyn Random,
    ) -> bool {
        let registries = Arc::clone(&self.registries);
        let state = self.grid.get(&pos);
        let Some(listener) = registries.behaviour_of(state).as_fall_listener() else {
            return false;
        };
        listener.fall_on(state, self, pos, entity, fall_distance, random);
        true
    }

    /// An entity walks on the block at `pos`. Returns false if the block
    /// ignores steps.
    pub fn entity_step_on(&mut self, pos: BlockPos, entity: &mut dyn EntityView) -> bool {
        let registries = Arc::clone(&self.registries);
        let state = self.grid.get(&pos);
        let Some(stepped_on) = registries.behaviour_of(state).as_stepped_on() else {
            return false;
        };
        stepped_on.step_on(state, self, pos, entity);
        true
    }

    /// Uses bonemeal on the block at `pos`. Returns true if the bonemeal was
    /// consumed, whether or not the growth roll succeeded.
    pub fn apply_bonemeal(&mut self, pos: BlockPos, random: &mut dyn Random) -> bool {
        let registries = Arc::clone(&self.registries);
        let state = self.grid.get(&pos);
        let Some(target) = registries.behaviour_of(state).as_bonemeal_target() else {
            return false;
        };
        if !target.is_valid_bonemeal_target(state, self, pos) {
            return false;
        }
        self.listener.play_effect(pos, EffectKind::BonemealGrowth, 0);
        if target.is_bonemeal_success(state, self, pos, random) {
            target.perform_bonemeal(state, self, pos, random);
        }
        true
    }

    /// Asks the generator to place `feature` at `pos`. Returns false if the
    /// listener vetoed it.
    pub fn request_feature_placement(&mut self, pos: BlockPos, feature: &FeatureRef) -> bool {
        if self.listener.veto_feature(pos, feature) {
            log::debug!("Feature {} at {pos} was vetoed", feature.0);
            return false;
        }
        let placed = self.listener.place_feature(pos, feature);
        log::trace!("Feature {} at {pos} placed: {placed}", feature.0);
        true
    }

    /// Forwards an effect to the listener.
    pub fn play_effect(&mut self, pos: BlockPos, kind: EffectKind, data: i32) {
        self.listener.play_effect(pos, kind, data);
    }

    /// Forwards a menu request to the listener.
    pub fn open_menu(&mut self, pos: BlockPos, kind: MenuKind) {
        self.listener.open_menu(pos, kind);
    }

    /// The sidecar at `pos`, if the block there has one.
    #[must_use]
    pub fn get_block_entity(&self, pos: &BlockPos) -> Option<SharedBlockEntity> {
        self.block_entities.get(pos).cloned()
    }

    /// Number of live sidecars.
    #[must_use]
    pub fn block_entity_count(&self) -> usize {
        self.block_entities.len()
    }

    /// Diagnostics recorded since the last [`World::take_diagnostics`], up to
    /// the configured `max_diagnostics`.
    #[must_use]
    pub fn diagnostics(&self) -> &[EngineError] {
        &self.diagnostics
    }

    /// Takes the recorded diagnostics, leaving the list empty.
    pub fn take_diagnostics(&mut self) -> Vec<EngineError> {
        mem::take(&mut self.diagnostics)
    }

    /// Keeps at most `max_diagnostics` until someone takes them; the rest are
    /// only logged and counted.
    fn record_diagnostic(&mut self, err: EngineError) {
        self.diagnostics_recorded += 1;
        if self.diagnostics.len() < self.config.max_diagnostics {
            self.diagnostics.push(err);
        } else {
            log::debug!("Diagnostic list is full, not keeping: {err}");
        }
    }
}

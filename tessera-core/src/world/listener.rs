//! Fire-and-forget seams toward presentation and generation layers.

use std::{mem, sync::Arc};

use tessera_registry::BlockStateId;
use tessera_utils::{BlockPos, Identifier, locks::SyncMutex};

/// Effects a behaviour can ask the presentation layer to play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectKind {
    /// An entity took damage from a block.
    Hurt,
    /// Farmland was trampled.
    Trample,
    /// Bonemeal was applied.
    BonemealGrowth,
    /// A block changed its weathering stage.
    Weathered,
    /// A falling block started to fall.
    FallingBlock,
    /// A lever was flipped.
    LeverToggle,
}

/// Menus a block can open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuKind {
    /// The 3x3 crafting grid.
    Crafting,
}

/// A reference to a world generation feature.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FeatureRef(pub Identifier);

impl FeatureRef {
    /// A built-in feature.
    #[must_use]
    pub const fn vanilla(path: &'static str) -> Self {
        Self(Identifier::vanilla_static(path))
    }
}

/// Receives the notifications a [`World`](super::World) emits.
///
/// Every method has a no-op default. None of the return values except
/// [`WorldListener::veto_feature`] influence the simulation.
pub trait WorldListener: Send {
    /// A cell changed state and client feedback was not suppressed.
    fn block_changed(&mut self, _pos: BlockPos, _old_state: BlockStateId, _new_state: BlockStateId) {}

    /// A behaviour asked for an effect.
    fn play_effect(&mut self, _pos: BlockPos, _kind: EffectKind, _data: i32) {}

    /// A behaviour asked for a menu.
    fn open_menu(&mut self, _pos: BlockPos, _kind: MenuKind) {}

    /// Returns true to cancel a feature placement before it runs.
    fn veto_feature(&mut self, _pos: BlockPos, _feature: &FeatureRef) -> bool {
        false
    }

    /// Runs the external generator. The result is informational.
    fn place_feature(&mut self, _pos: BlockPos, _feature: &FeatureRef) -> bool {
        false
    }
}

/// A listener that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopListener;

impl WorldListener for NoopListener {}

/// One notification captured by a [`RecordingListener`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListenerEvent {
    /// See [`WorldListener::block_changed`].
    BlockChanged(BlockPos, BlockStateId, BlockStateId),
    /// See [`WorldListener::play_effect`].
    Effect(BlockPos, EffectKind, i32),
    /// See [`WorldListener::open_menu`].
    Menu(BlockPos, MenuKind),
    /// See [`WorldListener::place_feature`]. Only recorded when not vetoed.
    Feature(BlockPos, FeatureRef),
}

/// A listener that records every notification in a shared log.
///
/// Clone it before handing it to a world to keep a handle on the log.
#[derive(Debug, Default, Clone)]
pub struct RecordingListener {
    events: Arc<SyncMutex<Vec<ListenerEvent>>>,
    vetoed_features: Arc<SyncMutex<Vec<FeatureRef>>>,
}

impl RecordingListener {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every future placement of `feature` get vetoed.
    pub fn veto(&self, feature: FeatureRef) {
        self.vetoed_features.lock().push(feature);
    }

    /// Takes the recorded events, leaving the log empty.
    #[must_use]
    pub fn take(&self) -> Vec<ListenerEvent> {
        mem::take(&mut *self.events.lock())
    }
}

impl WorldListener for RecordingListener {
    fn block_changed(&mut self, pos: BlockPos, old_state: BlockStateId, new_state: BlockStateId) {
        self.events
            .lock()
            .push(ListenerEvent::BlockChanged(pos, old_state, new_state));
    }

    fn play_effect(&mut self, pos: BlockPos, kind: EffectKind, data: i32) {
        self.events.lock().push(ListenerEvent::Effect(pos, kind, data));
    }

    fn open_menu(&mut self, pos: BlockPos, kind: MenuKind) {
        self.events.lock().push(ListenerEvent::Menu(pos, kind));
    }

    fn veto_feature(&mut self, _pos: BlockPos, feature: &FeatureRef) -> bool {
        self.vetoed_features.lock().contains(feature)
    }

    fn place_feature(&mut self, pos: BlockPos, feature: &FeatureRef) -> bool {
        self.events
            .lock()
            .push(ListenerEvent::Feature(pos, feature.clone()));
        true
    }
}

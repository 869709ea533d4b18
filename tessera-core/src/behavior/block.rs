//! The block behaviour trait and its capability traits.
//!
//! [`BlockBehaviour`] carries the hooks every block may answer. Optional
//! capabilities (random ticking, shape response, bonemeal, ...) live in their
//! own traits and are reached through the `as_*` accessors, which return
//! `None` unless a behaviour opts in. Callers check the accessor and never
//! assume a capability is present.

use tessera_registry::{
    BlockId, BlockRegistry, BlockStateId,
    blocks::{
        properties::Direction,
        shapes::{RenderShape, VoxelShape},
    },
};
use tessera_utils::{BlockPos, random::Random};

use crate::{
    block_entity::SharedBlockEntity,
    world::{EntityView, World},
};

/// Result of interacting with a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionResult {
    /// The block handled the interaction.
    Success,
    /// The block reacted but the caller should keep processing.
    Consume,
    /// The block ignored the interaction.
    Pass,
}

/// Hooks the engine calls on a block.
#[allow(unused_variables)]
pub trait BlockBehaviour: Send + Sync {
    /// State to use when this block is placed at `pos`, starting from the
    /// block's default state.
    ///
    /// `None` cancels the placement.
    fn get_state_for_placement(
        &self,
        default_state: BlockStateId,
        world: &World,
        pos: BlockPos,
    ) -> Option<BlockStateId> {
        Some(default_state)
    }

    /// Called after the cell at `pos` changed to `state`.
    fn on_place(
        &self,
        state: BlockStateId,
        world: &mut World,
        pos: BlockPos,
        old_state: BlockStateId,
        moved_by_piston: bool,
    ) {
    }

    /// Called after a block of this type was replaced by another block.
    fn on_remove(
        &self,
        state: BlockStateId,
        world: &mut World,
        pos: BlockPos,
        new_state: BlockStateId,
        moved_by_piston: bool,
    ) {
    }

    /// Called when an adjacent cell changed.
    fn neighbor_changed(
        &self,
        state: BlockStateId,
        world: &mut World,
        pos: BlockPos,
        source_block: BlockId,
        source_pos: BlockPos,
        moved_by_piston: bool,
    ) {
    }

    /// Called when a scheduled tick for this block fires.
    fn scheduled_tick(&self, state: BlockStateId, world: &mut World, pos: BlockPos, random: &mut dyn Random) {}

    /// Called when a player uses the block with an empty hand.
    fn use_without_item(
        &self,
        state: BlockStateId,
        world: &mut World,
        pos: BlockPos,
        player: &dyn EntityView,
    ) -> InteractionResult {
        InteractionResult::Pass
    }

    /// Outline shape.
    fn shape(&self, state: BlockStateId, blocks: &BlockRegistry) -> VoxelShape {
        VoxelShape::block()
    }

    /// How the renderer draws the state.
    fn render_shape(&self, state: BlockStateId, blocks: &BlockRegistry) -> RenderShape {
        blocks.get_block(state).config.render_shape
    }

    /// Taxicab radius of extra cells that receive shape updates when this block changes.
    ///
    /// The six direct neighbours are always updated; this widens the set.
    fn shape_update_radius(&self) -> u32 {
        0
    }

    /// Whether the state may stay at `pos`.
    fn can_survive(&self, state: BlockStateId, world: &World, pos: BlockPos) -> bool {
        true
    }

    /// See [`RandomTickable`].
    fn as_random_tickable(&self) -> Option<&dyn RandomTickable> {
        None
    }

    /// See [`ShapeResponsive`].
    fn as_shape_responsive(&self) -> Option<&dyn ShapeResponsive> {
        None
    }

    /// See [`BonemealTarget`].
    fn as_bonemeal_target(&self) -> Option<&dyn BonemealTarget> {
        None
    }

    /// See [`FallListener`].
    fn as_fall_listener(&self) -> Option<&dyn FallListener> {
        None
    }

    /// See [`SteppedOn`].
    fn as_stepped_on(&self) -> Option<&dyn SteppedOn> {
        None
    }

    /// See [`RedstoneSource`].
    fn as_redstone_source(&self) -> Option<&dyn RedstoneSource> {
        None
    }

    /// See [`EntityBlock`].
    fn as_entity_block(&self) -> Option<&dyn EntityBlock> {
        None
    }

    /// See [`ChangeOverTime`].
    fn as_change_over_time(&self) -> Option<&dyn ChangeOverTime> {
        None
    }
}

/// Blocks that react to random ticks.
pub trait RandomTickable: Send + Sync {
    /// Whether `state` should be in the random tick index. Computed once per
    /// state when the registries are built.
    fn is_random_ticking(&self, state: BlockStateId, blocks: &BlockRegistry) -> bool {
        let _ = (state, blocks);
        true
    }

    /// Called when the random tick sampler picks this cell.
    fn random_tick(&self, state: BlockStateId, world: &mut World, pos: BlockPos, random: &mut dyn Random);
}

/// Blocks whose state depends on their neighbours.
pub trait ShapeResponsive: Send + Sync {
    /// Returns the state this block should have after the neighbour at
    /// `neighbor_pos` (in `direction` from `pos`) became `neighbor_state`.
    ///
    /// Returning air destroys the block.
    fn update_shape(
        &self,
        state: BlockStateId,
        world: &World,
        pos: BlockPos,
        direction: Direction,
        neighbor_pos: BlockPos,
        neighbor_state: BlockStateId,
    ) -> BlockStateId;
}

/// Blocks that react to bonemeal.
pub trait BonemealTarget: Send + Sync {
    /// Whether bonemeal can be used at all.
    fn is_valid_bonemeal_target(&self, state: BlockStateId, world: &World, pos: BlockPos) -> bool;

    /// Rolled after a valid use; `false` consumes the bonemeal without effect.
    fn is_bonemeal_success(&self, state: BlockStateId, world: &World, pos: BlockPos, random: &mut dyn Random) -> bool {
        let _ = (state, world, pos, random);
        true
    }

    /// Applies the growth.
    fn perform_bonemeal(&self, state: BlockStateId, world: &mut World, pos: BlockPos, random: &mut dyn Random);
}

/// Blocks that react to an entity landing on them.
pub trait FallListener: Send + Sync {
    /// `fall_distance` is in blocks.
    fn fall_on(
        &self,
        state: BlockStateId,
        world: &mut World,
        pos: BlockPos,
        entity: &mut dyn EntityView,
        fall_distance: f64,
        random: &mut dyn Random,
    );
}

/// Blocks that react to an entity walking on them.
pub trait SteppedOn: Send + Sync {
    /// Called every tick an entity stands on the block.
    fn step_on(&self, state: BlockStateId, world: &mut World, pos: BlockPos, entity: &mut dyn EntityView);
}

/// Blocks that emit a redstone signal.
pub trait RedstoneSource: Send + Sync {
    /// Signal strength 0..=15 seen by the neighbour in `direction` from this block.
    fn signal(&self, state: BlockStateId, blocks: &BlockRegistry, direction: Direction) -> u8;
}

/// Blocks that own a sidecar block entity.
pub trait EntityBlock: Send + Sync {
    /// Creates the sidecar for a freshly placed cell.
    fn new_block_entity(&self, pos: BlockPos, state: BlockStateId) -> SharedBlockEntity;
}

/// A family of blocks that age into each other, compared by tag equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgeFamily {
    /// Copper oxidation: unaffected, exposed, weathered, oxidized.
    Copper,
}

/// Blocks that change into their next stage over time.
pub trait ChangeOverTime: Send + Sync {
    /// Family this block ages within.
    fn age_family(&self) -> AgeFamily;

    /// Stage within the family, starting at 0.
    fn age(&self) -> u8;

    /// Block of the next stage, `None` at the last stage.
    fn next_block(&self) -> Option<BlockId>;

    /// Multiplier on the change chance.
    fn chance_modifier(&self) -> f32 {
        if self.age() == 0 { 0.75 } else { 1.0 }
    }
}

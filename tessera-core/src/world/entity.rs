/// The slice of an entity that block behaviours may look at.
///
/// Entity physics lives elsewhere; blocks only need to identify the entity,
/// know whether it is sneaking and hurt it.
pub trait EntityView {
    /// Network id, used as effect data.
    fn id(&self) -> i32;

    /// Sneaking entities do not trigger step hooks.
    fn is_stepping_carefully(&self) -> bool;

    /// Deals `amount` damage.
    fn hurt(&mut self, amount: f32);

    /// Whether landing on farmland may trample it.
    fn can_trample(&self) -> bool {
        true
    }
}

/// A minimal [`EntityView`] for headless runs and tests.
#[derive(Debug, Clone, PartialEq)]
pub struct SimpleEntity {
    /// Network id.
    pub id: i32,
    /// Whether the entity sneaks.
    pub sneaking: bool,
    /// Remaining health.
    pub health: f32,
}

impl SimpleEntity {
    /// A standing entity with full health.
    #[must_use]
    pub const fn new(id: i32) -> Self {
        Self {
            id,
            sneaking: false,
            health: 20.0,
        }
    }
}

impl EntityView for SimpleEntity {
    fn id(&self) -> i32 {
        self.id
    }

    fn is_stepping_carefully(&self) -> bool {
        self.sneaking
    }

    fn hurt(&mut self, amount: f32) {
        self.health = (self.health - amount).max(0.0);
    }
}

//! Block state properties.
//!
//! A property is a name plus a finite domain. Properties are compared by
//! identity: two `static` definitions with the same name and domain are still
//! different properties. Always refer to the shared definitions in
//! [`state_properties`] (or your own `static`s), never to temporaries.

use std::{
    borrow::Cow,
    fmt::Debug,
    hash::{Hash, Hasher},
    marker::PhantomData,
    ptr,
};

use tessera_utils::BlockPos;

/// The finite set of values a property can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyDomain {
    /// `false`, `true`.
    Bool,
    /// Every integer in `min..=max`.
    Int {
        /// Smallest value.
        min: u8,
        /// Largest value.
        max: u8,
    },
    /// A named set of values, in declaration order.
    Enum(&'static [&'static str]),
}

impl PropertyDomain {
    /// Number of values in the domain.
    #[must_use]
    pub const fn value_count(&self) -> usize {
        match *self {
            Self::Bool => 2,
            Self::Int { min, max } => {
                if max < min {
                    0
                } else {
                    (max - min) as usize + 1
                }
            }
            Self::Enum(names) => names.len(),
        }
    }

    /// Serialized name of the value at `index`.
    #[must_use]
    pub fn value_name(&self, index: usize) -> Option<Cow<'static, str>> {
        if index >= self.value_count() {
            return None;
        }
        Some(match *self {
            Self::Bool => Cow::Borrowed(if index == 0 { "false" } else { "true" }),
            Self::Int { min, .. } => Cow::Owned((usize::from(min) + index).to_string()),
            Self::Enum(names) => Cow::Borrowed(names[index]),
        })
    }

    /// Parses a serialized value name back into its index.
    #[must_use]
    pub fn parse(&self, value: &str) -> Option<usize> {
        match *self {
            Self::Bool => match value {
                "false" => Some(0),
                "true" => Some(1),
                _ => None,
            },
            Self::Int { min, max } => {
                let parsed: u8 = value.parse().ok()?;
                (min..=max)
                    .contains(&parsed)
                    .then(|| usize::from(parsed - min))
            }
            Self::Enum(names) => names.iter().position(|name| *name == value),
        }
    }
}

/// The untyped definition shared by every property kind.
#[derive(Debug)]
pub struct PropertyDef {
    /// Name used in serialized states.
    pub name: &'static str,
    /// The values this property can take.
    pub domain: PropertyDomain,
}

impl PartialEq for PropertyDef {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self, other)
    }
}

impl Eq for PropertyDef {}

impl Hash for PropertyDef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        ptr::from_ref(self).hash(state);
    }
}

/// A typed view over a [`PropertyDef`].
pub trait Property: Sync + 'static {
    /// The Rust type of the property's values.
    type Value: Copy + PartialEq + Debug;

    /// The untyped definition.
    fn def(&self) -> &PropertyDef;

    /// Index of `value` in the domain, if it belongs to it.
    fn index_of(&self, value: Self::Value) -> Option<usize>;

    /// Value stored at `index` in the domain.
    fn value_at(&self, index: usize) -> Option<Self::Value>;
}

/// A boolean property.
#[derive(Debug)]
pub struct BoolProperty {
    def: PropertyDef,
}

impl BoolProperty {
    /// Creates a boolean property.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self {
            def: PropertyDef {
                name,
                domain: PropertyDomain::Bool,
            },
        }
    }
}

impl Property for BoolProperty {
    type Value = bool;

    fn def(&self) -> &PropertyDef {
        &self.def
    }

    fn index_of(&self, value: bool) -> Option<usize> {
        Some(usize::from(value))
    }

    fn value_at(&self, index: usize) -> Option<bool> {
        match index {
            0 => Some(false),
            1 => Some(true),
            _ => None,
        }
    }
}

/// A bounded integer property.
#[derive(Debug)]
pub struct IntProperty {
    def: PropertyDef,
    /// Smallest value.
    pub min: u8,
    /// Largest value.
    pub max: u8,
}

impl IntProperty {
    /// Creates an integer property covering `min..=max`.
    #[must_use]
    pub const fn new(name: &'static str, min: u8, max: u8) -> Self {
        Self {
            def: PropertyDef {
                name,
                domain: PropertyDomain::Int { min, max },
            },
            min,
            max,
        }
    }
}

impl Property for IntProperty {
    type Value = u8;

    fn def(&self) -> &PropertyDef {
        &self.def
    }

    fn index_of(&self, value: u8) -> Option<usize> {
        (self.min..=self.max)
            .contains(&value)
            .then(|| usize::from(value - self.min))
    }

    fn value_at(&self, index: usize) -> Option<u8> {
        let value = usize::from(self.min) + index;
        (value <= usize::from(self.max)).then_some(value as u8)
    }
}

/// An enum usable as a property value.
pub trait PropertyEnum: Copy + PartialEq + Debug + 'static {
    /// Every value, in ordinal order.
    const VALUES: &'static [Self];
    /// Serialized names, parallel to [`Self::VALUES`].
    const NAMES: &'static [&'static str];

    /// Position of this value in [`Self::VALUES`].
    fn ordinal(self) -> usize;
}

/// An enum property.
#[derive(Debug)]
pub struct EnumProperty<T: PropertyEnum> {
    def: PropertyDef,
    _marker: PhantomData<fn() -> T>,
}

impl<T: PropertyEnum> EnumProperty<T> {
    /// Creates an enum property over every value of `T`.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self {
            def: PropertyDef {
                name,
                domain: PropertyDomain::Enum(T::NAMES),
            },
            _marker: PhantomData,
        }
    }
}

impl<T: PropertyEnum> Property for EnumProperty<T> {
    type Value = T;

    fn def(&self) -> &PropertyDef {
        &self.def
    }

    fn index_of(&self, value: T) -> Option<usize> {
        Some(value.ordinal())
    }

    fn value_at(&self, index: usize) -> Option<T> {
        T::VALUES.get(index).copied()
    }
}

/// The three axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// East-west.
    X,
    /// Up-down.
    Y,
    /// North-south.
    Z,
}

impl PropertyEnum for Axis {
    const VALUES: &'static [Self] = &[Self::X, Self::Y, Self::Z];
    const NAMES: &'static [&'static str] = &["x", "y", "z"];

    fn ordinal(self) -> usize {
        self as usize
    }
}

/// The six axis-aligned directions.
///
/// [`Direction::ALL`] is the canonical order every neighbour walk uses.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    /// -Y
    Down = 0,
    /// +Y
    Up = 1,
    /// -Z
    North = 2,
    /// +Z
    South = 3,
    /// -X
    West = 4,
    /// +X
    East = 5,
}

impl PropertyEnum for Direction {
    const VALUES: &'static [Self] = &Self::ALL;
    const NAMES: &'static [&'static str] = &["down", "up", "north", "south", "west", "east"];

    fn ordinal(self) -> usize {
        self as usize
    }
}

impl Direction {
    /// All six directions in canonical order.
    pub const ALL: [Direction; 6] = [
        Direction::Down,
        Direction::Up,
        Direction::North,
        Direction::South,
        Direction::West,
        Direction::East,
    ];

    /// The four horizontal directions.
    pub const HORIZONTAL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::West,
        Direction::East,
    ];

    /// Returns the opposite direction.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Down => Self::Up,
            Self::Up => Self::Down,
            Self::North => Self::South,
            Self::South => Self::North,
            Self::West => Self::East,
            Self::East => Self::West,
        }
    }

    /// Returns (dx, dy, dz) for this direction.
    #[must_use]
    pub const fn offset(self) -> (i32, i32, i32) {
        match self {
            Self::Down => (0, -1, 0),
            Self::Up => (0, 1, 0),
            Self::North => (0, 0, -1),
            Self::South => (0, 0, 1),
            Self::West => (-1, 0, 0),
            Self::East => (1, 0, 0),
        }
    }

    /// The axis this direction lies on.
    #[must_use]
    pub const fn axis(self) -> Axis {
        match self {
            Self::Down | Self::Up => Axis::Y,
            Self::North | Self::South => Axis::Z,
            Self::West | Self::East => Axis::X,
        }
    }

    /// True for north, south, west and east.
    #[must_use]
    pub const fn is_horizontal(self) -> bool {
        !matches!(self, Self::Down | Self::Up)
    }

    /// Returns the position one step from `pos` in this direction.
    #[must_use]
    pub const fn relative(self, pos: &BlockPos) -> BlockPos {
        let (dx, dy, dz) = self.offset();
        pos.offset(dx, dy, dz)
    }

    /// The direction that best approximates the step from `from` toward `to`.
    ///
    /// The dominant axis wins; ties go to the axis that comes first in
    /// [`Direction::ALL`]. Returns `None` when both positions are equal.
    #[must_use]
    pub fn toward(from: &BlockPos, to: &BlockPos) -> Option<Self> {
        let dx = to.0.x.wrapping_sub(from.0.x);
        let dy = to.0.y.wrapping_sub(from.0.y);
        let dz = to.0.z.wrapping_sub(from.0.z);
        let (ax, ay, az) = (dx.unsigned_abs(), dy.unsigned_abs(), dz.unsigned_abs());
        if ax == 0 && ay == 0 && az == 0 {
            return None;
        }
        Some(if ay >= az && ay >= ax {
            if dy < 0 { Self::Down } else { Self::Up }
        } else if az >= ax {
            if dz < 0 { Self::North } else { Self::South }
        } else if dx < 0 {
            Self::West
        } else {
            Self::East
        })
    }

    /// The connection property fences and panes use for this side.
    #[must_use]
    pub fn to_connection_property(self) -> Option<&'static BoolProperty> {
        match self {
            Self::North => Some(&state_properties::NORTH),
            Self::South => Some(&state_properties::SOUTH),
            Self::West => Some(&state_properties::WEST),
            Self::East => Some(&state_properties::EAST),
            Self::Down | Self::Up => None,
        }
    }
}

/// Shared property definitions used by the built-in blocks.
pub mod state_properties {
    use super::{Axis, BoolProperty, Direction, EnumProperty, IntProperty};

    /// Growth stage 0..=3 (nether wart, beetroot).
    pub static AGE_3: IntProperty = IntProperty::new("age", 0, 3);
    /// Growth stage 0..=7 (wheat, carrots).
    pub static AGE_7: IntProperty = IntProperty::new("age", 0, 7);
    /// Light emitting state of lamps.
    pub static LIT: BoolProperty = BoolProperty::new("lit");
    /// Redstone power state.
    pub static POWERED: BoolProperty = BoolProperty::new("powered");
    /// Connection toward north.
    pub static NORTH: BoolProperty = BoolProperty::new("north");
    /// Connection toward east.
    pub static EAST: BoolProperty = BoolProperty::new("east");
    /// Connection toward south.
    pub static SOUTH: BoolProperty = BoolProperty::new("south");
    /// Connection toward west.
    pub static WEST: BoolProperty = BoolProperty::new("west");
    /// Connection toward up.
    pub static UP: BoolProperty = BoolProperty::new("up");
    /// Whether the block holds water.
    pub static WATERLOGGED: BoolProperty = BoolProperty::new("waterlogged");
    /// Leaves distance to the nearest log.
    pub static DISTANCE: IntProperty = IntProperty::new("distance", 1, 7);
    /// Player-placed leaves never decay.
    pub static PERSISTENT: BoolProperty = BoolProperty::new("persistent");
    /// Orientation of pillar blocks.
    pub static AXIS: EnumProperty<Axis> = EnumProperty::new("axis");
    /// Direction a block faces.
    pub static FACING: EnumProperty<Direction> = EnumProperty::new("facing");
    /// Note block pitch.
    pub static NOTE: IntProperty = IntProperty::new("note", 0, 24);
    /// Farmland moisture level.
    pub static MOISTURE: IntProperty = IntProperty::new("moisture", 0, 7);
    /// Rotation of standing skulls in sixteenths of a turn.
    pub static ROTATION_16: IntProperty = IntProperty::new("rotation", 0, 15);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_equality() {
        static OTHER_AGE: IntProperty = IntProperty::new("age", 0, 3);
        assert_eq!(state_properties::AGE_3.def(), state_properties::AGE_3.def());
        assert_ne!(state_properties::AGE_3.def(), OTHER_AGE.def());
    }

    #[test]
    fn test_domain_names() {
        let domain = state_properties::DISTANCE.def().domain;
        assert_eq!(domain.value_count(), 7);
        assert_eq!(domain.value_name(0).as_deref(), Some("1"));
        assert_eq!(domain.parse("7"), Some(6));
        assert_eq!(domain.parse("0"), None);
        assert_eq!(domain.parse("8"), None);

        let axis = state_properties::AXIS.def().domain;
        assert_eq!(axis.parse("z"), Some(2));
        assert_eq!(PropertyDomain::Bool.parse("true"), Some(1));
    }

    #[test]
    fn test_int_property_indices() {
        let age = &state_properties::AGE_7;
        assert_eq!(age.index_of(7), Some(7));
        assert_eq!(age.index_of(8), None);
        assert_eq!(age.value_at(3), Some(3));
        assert_eq!(age.value_at(8), None);
    }

    #[test]
    fn test_direction_toward() {
        let origin = BlockPos::new(0, 0, 0);
        assert_eq!(Direction::toward(&origin, &BlockPos::new(0, -1, 0)), Some(Direction::Down));
        assert_eq!(Direction::toward(&origin, &BlockPos::new(2, 1, 0)), Some(Direction::East));
        assert_eq!(Direction::toward(&origin, &BlockPos::new(1, 1, 0)), Some(Direction::Up));
        assert_eq!(Direction::toward(&origin, &origin), None);
        let edge = BlockPos::new(i32::MAX, 0, 0);
        assert_eq!(Direction::toward(&edge, &BlockPos::new(i32::MIN, 0, 0)), Some(Direction::East));
        for direction in Direction::ALL {
            let next = direction.relative(&origin);
            assert_eq!(Direction::toward(&origin, &next), Some(direction));
            assert_eq!(direction.opposite().opposite(), direction);
        }
    }
}

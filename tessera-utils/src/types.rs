// Wrapper types making it harder to accidentaly use the wrong underlying type.

use std::{
    borrow::Cow,
    fmt::{self, Display},
    str::FromStr,
};

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::math::{Vector2, Vector3};

/// Side length of a section cube and of a chunk column.
pub const SECTION_SIZE: i32 = 16;
/// Number of cells in one section.
pub const SECTION_VOLUME: usize = 16 * 16 * 16;

/// A block position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct BlockPos(pub Vector3<i32>);

/// A 16x16x16 section position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SectionPos(pub Vector3<i32>);

/// A chunk (column) position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkPos(pub Vector2<i32>);

impl BlockPos {
    /// The origin.
    pub const ZERO: Self = Self(Vector3::new(0, 0, 0));

    /// Creates a new block position.
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self(Vector3::new(x, y, z))
    }

    /// Returns the position offset by the given amounts, wrapping at the
    /// edge of the `i32` range.
    #[must_use]
    pub const fn offset(&self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(
            self.0.x.wrapping_add(dx),
            self.0.y.wrapping_add(dy),
            self.0.z.wrapping_add(dz),
        )
    }

    /// Returns the position above this one.
    #[must_use]
    pub const fn above(&self) -> Self {
        self.offset(0, 1, 0)
    }

    /// Returns the position below this one.
    #[must_use]
    pub const fn below(&self) -> Self {
        self.offset(0, -1, 0)
    }

    /// Taxicab distance between two positions, measured the short way
    /// around the wrapping coordinate space.
    #[must_use]
    pub const fn manhattan_distance(&self, other: &Self) -> u32 {
        let dx = self.0.x.wrapping_sub(other.0.x).unsigned_abs();
        let dy = self.0.y.wrapping_sub(other.0.y).unsigned_abs();
        let dz = self.0.z.wrapping_sub(other.0.z).unsigned_abs();
        dx.saturating_add(dy).saturating_add(dz)
    }

    /// The section containing this position.
    #[must_use]
    pub const fn section_pos(&self) -> SectionPos {
        SectionPos(Vector3::new(self.0.x >> 4, self.0.y >> 4, self.0.z >> 4))
    }

    /// The chunk column containing this position.
    #[must_use]
    pub const fn chunk_pos(&self) -> ChunkPos {
        ChunkPos(Vector2::new(self.0.x >> 4, self.0.z >> 4))
    }

    /// Index of this position inside its section, laid out as `y << 8 | z << 4 | x`.
    #[must_use]
    pub const fn section_index(&self) -> usize {
        (((self.0.y & 15) << 8) | ((self.0.z & 15) << 4) | (self.0.x & 15)) as usize
    }

    /// All positions within `radius` taxicab distance, including `self`.
    ///
    /// Sorted by distance first and by coordinate second, so callers iterate
    /// the neighbourhood in the same order on every run.
    #[must_use]
    pub fn within_manhattan(&self, radius: u32) -> Vec<BlockPos> {
        let r = radius as i32;
        let mut out = Vec::new();
        for dx in -r..=r {
            let rest_y = r - dx.abs();
            for dy in -rest_y..=rest_y {
                let rest_z = rest_y - dy.abs();
                for dz in -rest_z..=rest_z {
                    out.push(self.offset(dx, dy, dz));
                }
            }
        }
        out.sort_by_key(|pos| (pos.manhattan_distance(self), *pos));
        out
    }
}

impl Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.0.x, self.0.y, self.0.z)
    }
}

impl SectionPos {
    /// Creates a new section position.
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self(Vector3::new(x, y, z))
    }

    /// The lowest corner block of this section.
    #[must_use]
    pub const fn origin(&self) -> BlockPos {
        BlockPos::new(self.0.x << 4, self.0.y << 4, self.0.z << 4)
    }

    /// Resolves a section-local index (see [`BlockPos::section_index`]).
    #[must_use]
    pub const fn block_at(&self, index: usize) -> BlockPos {
        let i = index as i32;
        self.origin().offset(i & 15, (i >> 8) & 15, (i >> 4) & 15)
    }
}

impl ChunkPos {
    /// Creates a new chunk position.
    #[must_use]
    pub const fn new(x: i32, z: i32) -> Self {
        Self(Vector2::new(x, z))
    }
}

/// Error returned when parsing an [`Identifier`] fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    /// More or fewer than one `:` separator.
    #[error("invalid identifier: {0}")]
    Malformed(String),
    /// The namespace contains forbidden characters.
    #[error("invalid namespace: {0}")]
    Namespace(String),
    /// The path contains forbidden characters.
    #[error("invalid path: {0}")]
    Path(String),
}

/// A namespaced key such as `minecraft:nether_wart`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Identifier {
    /// The namespace, `minecraft` for built-in content.
    pub namespace: Cow<'static, str>,
    /// The path inside the namespace.
    pub path: Cow<'static, str>,
}

impl Identifier {
    /// The namespace used for built-in content.
    pub const VANILLA_NAMESPACE: &'static str = "minecraft";

    /// Creates a built-in identifier from an owned path.
    #[must_use]
    pub fn vanilla(path: String) -> Self {
        Identifier {
            namespace: Cow::Borrowed(Self::VANILLA_NAMESPACE),
            path: Cow::Owned(path),
        }
    }

    /// Creates a built-in identifier from a static path.
    #[must_use]
    pub const fn vanilla_static(path: &'static str) -> Self {
        Identifier {
            namespace: Cow::Borrowed(Self::VANILLA_NAMESPACE),
            path: Cow::Borrowed(path),
        }
    }

    /// Returns true if the character may appear in a namespace.
    #[must_use]
    pub fn valid_namespace_char(namespace_char: char) -> bool {
        namespace_char == '_'
            || namespace_char == '-'
            || namespace_char.is_ascii_lowercase()
            || namespace_char.is_ascii_digit()
            || namespace_char == '.'
    }

    /// Returns true if the character may appear in a path.
    #[must_use]
    pub fn valid_path_char(path_char: char) -> bool {
        Self::valid_namespace_char(path_char) || path_char == '/'
    }
}

impl Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.path)
    }
}

impl FromStr for Identifier {
    type Err = IdentifierError;

    /// Parses `namespace:path`; a bare `path` gets the vanilla namespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (namespace, path) = match s.split_once(':') {
            Some((namespace, path)) => (namespace, path),
            None => (Self::VANILLA_NAMESPACE, s),
        };
        if path.contains(':') || path.is_empty() {
            return Err(IdentifierError::Malformed(s.to_string()));
        }
        if !namespace.chars().all(Self::valid_namespace_char) {
            return Err(IdentifierError::Namespace(namespace.to_string()));
        }
        if !path.chars().all(Self::valid_path_char) {
            return Err(IdentifierError::Path(path.to_string()));
        }
        Ok(Identifier {
            namespace: Cow::Owned(namespace.to_string()),
            path: Cow::Owned(path.to_string()),
        })
    }
}

impl From<Identifier> for String {
    fn from(value: Identifier) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for Identifier {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

bitflags! {
    /// Flags controlling the side effects of a block change.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct UpdateFlags: u32 {
        /// Notify the six neighbours through `neighbor_changed`.
        const UPDATE_NEIGHBORS = 1;
        /// Report the change to the presentation layer.
        const UPDATE_CLIENTS = 1 << 1;
        /// Skip the shape propagation cascade.
        const UPDATE_KNOWN_SHAPE = 1 << 4;
        /// The change is part of a piston move.
        const UPDATE_MOVE_BY_PISTON = 1 << 6;

        /// Neighbour notifications plus client feedback.
        const UPDATE_ALL = Self::UPDATE_NEIGHBORS.bits() | Self::UPDATE_CLIENTS.bits();
        /// No notifications and no shape propagation.
        const UPDATE_NONE = Self::UPDATE_KNOWN_SHAPE.bits();
    }
}

impl UpdateFlags {
    /// True when the shape propagation cascade must not run.
    #[must_use]
    pub const fn suppresses_shape_updates(self) -> bool {
        self.contains(Self::UPDATE_KNOWN_SHAPE)
    }

    /// True when the presentation layer must not hear about the change.
    #[must_use]
    pub const fn suppresses_client_feedback(self) -> bool {
        !self.contains(Self::UPDATE_CLIENTS)
    }

    /// True when the change moves a block rather than placing a new one.
    #[must_use]
    pub const fn is_move_context(self) -> bool {
        self.contains(Self::UPDATE_MOVE_BY_PISTON)
    }

    /// Flags used to apply the result of a shape update to a neighbour.
    #[must_use]
    pub fn for_shape_cascade(self) -> Self {
        self.difference(Self::UPDATE_NEIGHBORS)
    }
}

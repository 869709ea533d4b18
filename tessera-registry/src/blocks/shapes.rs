//! Collision/outline shapes and render shapes.

use smallvec::SmallVec;

/// An axis aligned box in block units, relative to the block origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum x.
    pub min_x: f64,
    /// Minimum y.
    pub min_y: f64,
    /// Minimum z.
    pub min_z: f64,
    /// Maximum x.
    pub max_x: f64,
    /// Maximum y.
    pub max_y: f64,
    /// Maximum z.
    pub max_z: f64,
}

impl Aabb {
    /// The unit cube.
    pub const FULL: Aabb = Aabb::new(0.0, 0.0, 0.0, 1.0, 1.0, 1.0);

    /// Creates a box from its corners.
    #[must_use]
    pub const fn new(min_x: f64, min_y: f64, min_z: f64, max_x: f64, max_y: f64, max_z: f64) -> Self {
        Self {
            min_x,
            min_y,
            min_z,
            max_x,
            max_y,
            max_z,
        }
    }

    /// Creates a box from pixel coordinates (sixteenths of a block).
    #[must_use]
    pub const fn from_pixels(min_x: f64, min_y: f64, min_z: f64, max_x: f64, max_y: f64, max_z: f64) -> Self {
        Self::new(
            min_x / 16.0,
            min_y / 16.0,
            min_z / 16.0,
            max_x / 16.0,
            max_y / 16.0,
            max_z / 16.0,
        )
    }

    /// Height of the box.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Smallest box containing both.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self::new(
            self.min_x.min(other.min_x),
            self.min_y.min(other.min_y),
            self.min_z.min(other.min_z),
            self.max_x.max(other.max_x),
            self.max_y.max(other.max_y),
            self.max_z.max(other.max_z),
        )
    }
}

/// A shape made of a few boxes. Empty means no collision at all.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VoxelShape {
    boxes: SmallVec<[Aabb; 2]>,
}

impl VoxelShape {
    /// A shape with no boxes.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// The full block.
    #[must_use]
    pub fn block() -> Self {
        Self::from_box(Aabb::FULL)
    }

    /// A single box given in pixel coordinates.
    #[must_use]
    pub fn cuboid(min_x: f64, min_y: f64, min_z: f64, max_x: f64, max_y: f64, max_z: f64) -> Self {
        Self::from_box(Aabb::from_pixels(min_x, min_y, min_z, max_x, max_y, max_z))
    }

    /// A single box.
    #[must_use]
    pub fn from_box(aabb: Aabb) -> Self {
        let mut boxes = SmallVec::new();
        boxes.push(aabb);
        Self { boxes }
    }

    /// Joins two shapes without merging overlapping boxes.
    #[must_use]
    pub fn or(mut self, other: &VoxelShape) -> Self {
        self.boxes.extend_from_slice(&other.boxes);
        self
    }

    /// True if the shape has no boxes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// The boxes making up the shape.
    #[must_use]
    pub fn boxes(&self) -> &[Aabb] {
        &self.boxes
    }

    /// Bounding box of the whole shape, `None` when empty.
    #[must_use]
    pub fn bounds(&self) -> Option<Aabb> {
        let (first, rest) = self.boxes.split_first()?;
        Some(rest.iter().fold(*first, |acc, aabb| acc.union(aabb)))
    }
}

/// How a renderer should draw a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderShape {
    /// Nothing is drawn (air, barriers).
    Invisible,
    /// Drawn from the baked block model.
    Model,
    /// Only drawn by an animated block entity renderer.
    AnimatedOnly,
    /// Drawn by the fluid renderer.
    Liquid,
}

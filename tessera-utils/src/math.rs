//! Small integer vector types used for positions.

use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

/// A 2D vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Vector2<T> {
    /// The x component.
    pub x: T,
    /// The z component (vectors of this type describe horizontal columns).
    pub z: T,
}

impl<T> Vector2<T> {
    /// Creates a new vector.
    pub const fn new(x: T, z: T) -> Self {
        Self { x, z }
    }
}

/// A 3D vector.
///
/// Ordering is lexicographic on `(x, y, z)`, which gives positions a stable,
/// platform independent iteration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Vector3<T> {
    /// The x component.
    pub x: T,
    /// The y component.
    pub y: T,
    /// The z component.
    pub z: T,
}

impl<T> Vector3<T> {
    /// Creates a new vector.
    pub const fn new(x: T, y: T, z: T) -> Self {
        Self { x, y, z }
    }
}

impl<T: Add<Output = T>> Add for Vector3<T> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl<T: Sub<Output = T>> Sub for Vector3<T> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

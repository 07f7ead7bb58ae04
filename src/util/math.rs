//! Math type re-exports and the exported point type.
//!
//! This module re-exports the `glam` types used for scene math and
//! provides [`Vector3`], the plain float triple stored in keyframes.

// Re-export glam types
pub use glam::{Mat4, Quat, Vec2, Vec3, Vec4};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Plain 3-float point or RGB triple as written to the artifact.
///
/// Equality is exact field-wise `f32` comparison: `-0.0 == 0.0` and a
/// component that is NaN never compares equal.
#[derive(Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    /// All zeros.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// Opaque white, the fallback vertex color.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);

    /// Create a new vector.
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Components as an array.
    #[inline]
    pub fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<Vec3> for Vector3 {
    #[inline]
    fn from(v: Vec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<Vector3> for Vec3 {
    #[inline]
    fn from(v: Vector3) -> Self {
        Vec3::new(v.x, v.y, v.z)
    }
}

impl From<[f32; 3]> for Vector3 {
    #[inline]
    fn from(a: [f32; 3]) -> Self {
        Self::new(a[0], a[1], a[2])
    }
}

impl fmt::Debug for Vector3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

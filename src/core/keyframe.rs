//! Keyframe sample type.

use crate::util::Vector3;

/// One sample of a tracked point: frame index, world position and color.
///
/// Two keyframes are equal when their position and color are equal.
/// The frame index does not take part in the comparison, which is what
/// lets a track drop a sample that repeats the previous one.
#[derive(Clone, Copy, Debug, Default)]
pub struct KeyFrame {
    /// Scene frame this sample was taken at.
    pub frame: u32,
    /// World-space position.
    pub position: Vector3,
    /// RGB color, each channel nominally in [0, 1].
    pub color: Vector3,
}

impl KeyFrame {
    /// Create a new keyframe.
    #[inline]
    pub const fn new(frame: u32, position: Vector3, color: Vector3) -> Self {
        Self { frame, position, color }
    }

    /// Create a white keyframe at a position.
    #[inline]
    pub const fn white(frame: u32, position: Vector3) -> Self {
        Self::new(frame, position, Vector3::WHITE)
    }

    /// Field-for-field comparison including the frame index.
    #[inline]
    pub fn same_sample(&self, other: &Self) -> bool {
        self.frame == other.frame && self == other
    }
}

impl PartialEq for KeyFrame {
    fn eq(&self, other: &Self) -> bool {
        self.position == other.position && self.color == other.color
    }
}

//! Host traits.
//!
//! These traits define the surface the exporter needs from an authoring
//! environment. Everything is addressed through small copyable ids so a
//! host can back them with whatever handles it has.

use glam::Mat4;

use crate::geom::Mesh;
use crate::material::Material;
use crate::util::Result;

/// Handle to a collection of objects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollectionId(pub usize);

/// Handle to an object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub usize);

/// Inclusive frame range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameRange {
    pub start: u32,
    pub end: u32,
}

impl FrameRange {
    /// Create a new range.
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Whether `start <= end`.
    pub fn is_valid(&self) -> bool {
        self.start <= self.end
    }

    /// Number of frames, 0 for an inverted range.
    pub fn len(&self) -> usize {
        if self.is_valid() {
            (self.end - self.start) as usize + 1
        } else {
            0
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Frames from start to end inclusive.
    pub fn frames(&self) -> std::ops::RangeInclusive<u32> {
        self.start..=self.end
    }
}

/// The scene's current-frame control.
///
/// Every position read depends on the frame this cursor is set to.
pub trait FrameCursor {
    /// Frame the scene is currently evaluated at.
    fn current_frame(&self) -> u32;

    /// Move the scene to `frame` and re-evaluate it.
    fn set_frame(&mut self, frame: u32);
}

/// Read access to the host scene.
pub trait Scene: FrameCursor {
    /// Render frame rate.
    fn fps(&self) -> u32;

    /// Scene frame range.
    fn frame_range(&self) -> FrameRange;

    /// Look up a collection by name.
    fn find_collection(&self, name: &str) -> Option<CollectionId>;

    /// Collection name.
    fn collection_name(&self, collection: CollectionId) -> &str;

    /// Objects of a collection in the host's iteration order.
    fn collection_objects(&self, collection: CollectionId) -> Vec<ObjectId>;

    /// Object name.
    fn object_name(&self, object: ObjectId) -> &str;

    /// Object-to-world matrix at the current frame.
    fn world_matrix(&self, object: ObjectId) -> Mat4;

    /// Mesh data, if the object carries a mesh.
    fn mesh(&self, object: ObjectId) -> Option<&Mesh>;

    /// Material in the first material slot, if any.
    fn material(&self, object: ObjectId) -> Option<&Material>;
}

/// Mesh-simplification service.
pub trait Decimate: Scene {
    /// Duplicate `source` with every mesh reduced to `ratio` of its
    /// vertices (1.0 keeps everything). The caller owns the duplicate and
    /// must hand it back to [`Decimate::remove_collection`].
    fn decimate(&mut self, source: CollectionId, ratio: f32) -> Result<CollectionId>;

    /// Delete a collection and the objects only it holds.
    fn remove_collection(&mut self, collection: CollectionId);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_range() {
        let r = FrameRange::new(1, 3);
        assert!(r.is_valid());
        assert_eq!(r.len(), 3);
        assert_eq!(r.frames().collect::<Vec<_>>(), vec![1, 2, 3]);

        let single = FrameRange::new(5, 5);
        assert_eq!(single.len(), 1);

        let inverted = FrameRange::new(5, 4);
        assert!(!inverted.is_valid());
        assert!(inverted.is_empty());
    }
}

//! Frame-by-frame position sampling.
//!
//! The sampler steps the scene through an inclusive frame range one whole
//! frame at a time and appends a keyframe per tracked point per frame. The
//! scene's current frame is put back to its previous value when sampling
//! ends, whether it succeeds or not.

use serde::{Deserialize, Serialize};

use crate::color::ColorCache;
use crate::core::{KeyFrame, PointTrack, TrackCollection};
use crate::scene::{FrameRange, FrameRestore, ObjectId, Scene};
use crate::util::{Error, Result, Vector3};

/// What counts as a tracked point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExportMode {
    /// One point per object, at its origin.
    #[default]
    ObjectLocation,
    /// One point per mesh vertex, in world space.
    VerticesLocation,
}

impl ExportMode {
    /// Name as stored in settings files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ObjectLocation => "OBJECT_LOCATION",
            Self::VerticesLocation => "VERTICES_LOCATION",
        }
    }

    /// Parse a mode name (settings spelling or short CLI spelling).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "object_location" | "object" | "objects" => Some(Self::ObjectLocation),
            "vertices_location" | "vertices" | "vertex" => Some(Self::VerticesLocation),
            _ => None,
        }
    }
}

/// A point being tracked: an object origin or one of its vertices.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TrackedPoint {
    Origin(ObjectId),
    Vertex(ObjectId, usize),
}

/// Sample every tracked point of `objects` over `range`.
///
/// Tracks come out in object order, then vertex order. In vertex mode,
/// objects without a mesh contribute nothing; in object mode every point
/// is white and `colors` is not consulted.
#[tracing::instrument(skip_all, fields(mode = mode.as_str(), start = range.start, end = range.end))]
pub fn sample<S: Scene>(
    scene: &mut S,
    objects: &[ObjectId],
    mode: ExportMode,
    range: FrameRange,
    colors: &ColorCache,
) -> Result<TrackCollection> {
    if !range.is_valid() {
        return Err(Error::InvalidFrameRange { start: range.start, end: range.end });
    }

    let points = tracked_points(&*scene, objects, mode);
    let point_colors: Vec<Vector3> = points
        .iter()
        .map(|p| match *p {
            TrackedPoint::Origin(_) => Vector3::WHITE,
            TrackedPoint::Vertex(id, v) => colors.color(id, v),
        })
        .collect();
    tracing::debug!("{} tracked points over {} frames", points.len(), range.len());

    let mut tracks: Vec<PointTrack> = points.iter().map(|_| PointTrack::new()).collect();
    {
        let mut scene = FrameRestore::new(scene);
        for frame in range.frames() {
            scene.set_frame(frame);
            tracing::trace!("frame {}", frame);

            let mut current = None;
            for (i, point) in points.iter().enumerate() {
                let position = match *point {
                    TrackedPoint::Origin(id) => scene.world_matrix(id).w_axis.truncate(),
                    TrackedPoint::Vertex(id, v) => {
                        // one world matrix per object per frame
                        let matrix = match current {
                            Some((cid, m)) if cid == id => m,
                            _ => {
                                let m = scene.world_matrix(id);
                                current = Some((id, m));
                                m
                            }
                        };
                        let local = scene.mesh(id).and_then(|m| m.positions.get(v)).copied().unwrap_or_default();
                        matrix.transform_point3(local)
                    }
                };
                tracks[i].add_keyframe(KeyFrame::new(frame, position.into(), point_colors[i]));
            }
        }
    }

    let mut collection = TrackCollection::new(scene.fps());
    for track in tracks {
        collection.add_track(track);
    }
    Ok(collection)
}

fn tracked_points<S: Scene + ?Sized>(scene: &S, objects: &[ObjectId], mode: ExportMode) -> Vec<TrackedPoint> {
    match mode {
        ExportMode::ObjectLocation => objects.iter().map(|&id| TrackedPoint::Origin(id)).collect(),
        ExportMode::VerticesLocation => {
            let mut points = Vec::new();
            for &id in objects {
                let Some(mesh) = scene.mesh(id) else {
                    tracing::debug!("'{}' has no mesh, skipped", scene.object_name(id));
                    continue;
                };
                points.extend((0..mesh.num_vertices()).map(|v| TrackedPoint::Vertex(id, v)));
            }
            points
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::{Mesh, Transform, TransformKey};
    use crate::scene::{FrameCursor, MemoryScene, SceneObject};

    fn cube_corner_mesh() -> Mesh {
        Mesh::from_positions(vec![glam::Vec3::ZERO, glam::Vec3::X, glam::Vec3::Y])
    }

    fn slide(x0: f32, x1: f32) -> Transform {
        Transform::from_keys(vec![
            TransformKey::translate(1, glam::vec3(x0, 0.0, 0.0)),
            TransformKey::translate(3, glam::vec3(x1, 0.0, 0.0)),
        ])
    }

    #[test]
    fn test_object_mode_samples_origins() {
        let mut scene = MemoryScene::new(25);
        let c = scene.add_collection("C");
        let a = scene.add_object(c, SceneObject::new("A").with_transform(slide(0.0, 2.0))).unwrap();
        let b = scene.add_object(c, SceneObject::new("B")).unwrap();

        let out = sample(&mut scene, &[a, b], ExportMode::ObjectLocation, FrameRange::new(1, 3), &ColorCache::default()).unwrap();
        assert_eq!(out.fps(), 25);
        assert_eq!(out.count(), 2);

        let moving = out.tracks()[0].keyframes();
        assert_eq!(moving.len(), 3);
        assert_eq!(moving[1].position, Vector3::new(1.0, 0.0, 0.0));
        assert!(moving.iter().all(|k| k.color == Vector3::WHITE));

        // B never moves
        assert_eq!(out.tracks()[1].count(), 1);
        assert_eq!(out.tracks()[1].keyframes()[0].frame, 1);
    }

    #[test]
    fn test_vertex_mode_two_objects_three_vertices() {
        let mut scene = MemoryScene::new(24);
        let c = scene.add_collection("C");
        let still = scene.add_object(c, SceneObject::new("Still").with_mesh(cube_corner_mesh())).unwrap();
        let moving = scene
            .add_object(c, SceneObject::new("Moving").with_mesh(cube_corner_mesh()).with_transform(slide(0.0, 2.0)))
            .unwrap();
        let objects = [still, moving];
        let colors = ColorCache::build(&scene, &objects);

        let out = sample(&mut scene, &objects, ExportMode::VerticesLocation, FrameRange::new(1, 3), &colors).unwrap();
        assert_eq!(out.count(), 6);
        for track in &out.tracks()[..3] {
            assert_eq!(track.count(), 1);
            assert_eq!(track.keyframes()[0].frame, 1);
        }
        for track in &out.tracks()[3..] {
            assert_eq!(track.count(), 3);
        }
        // vertex X of the moving object at frame 3
        assert_eq!(out.tracks()[4].keyframes()[2].position, Vector3::new(3.0, 0.0, 0.0));
    }

    #[test]
    fn test_vertex_mode_skips_objects_without_mesh() {
        let mut scene = MemoryScene::new(24);
        let c = scene.add_collection("C");
        let empty = scene.add_object(c, SceneObject::new("Empty")).unwrap();
        let tri = scene.add_object(c, SceneObject::new("Tri").with_mesh(cube_corner_mesh())).unwrap();
        let out = sample(&mut scene, &[empty, tri], ExportMode::VerticesLocation, FrameRange::new(1, 1), &ColorCache::default()).unwrap();
        assert_eq!(out.count(), 3);
    }

    #[test]
    fn test_single_frame_range() {
        let mut scene = MemoryScene::new(24);
        let c = scene.add_collection("C");
        let a = scene.add_object(c, SceneObject::new("A").with_transform(slide(0.0, 2.0))).unwrap();
        let out = sample(&mut scene, &[a], ExportMode::ObjectLocation, FrameRange::new(2, 2), &ColorCache::default()).unwrap();
        assert_eq!(out.tracks()[0].count(), 1);
        assert_eq!(out.tracks()[0].keyframes()[0].frame, 2);
    }

    #[test]
    fn test_frame_restored() {
        let mut scene = MemoryScene::new(24);
        let c = scene.add_collection("C");
        let a = scene.add_object(c, SceneObject::new("A")).unwrap();
        scene.set_frame(17);
        sample(&mut scene, &[a], ExportMode::ObjectLocation, FrameRange::new(1, 5), &ColorCache::default()).unwrap();
        assert_eq!(scene.current_frame(), 17);
    }

    /// One object whose x position equals the current frame; records every frame set.
    struct FakeScene {
        frame: u32,
        visited: Vec<u32>,
    }

    impl FrameCursor for FakeScene {
        fn current_frame(&self) -> u32 {
            self.frame
        }

        fn set_frame(&mut self, frame: u32) {
            self.visited.push(frame);
            self.frame = frame;
        }
    }

    impl Scene for FakeScene {
        fn fps(&self) -> u32 {
            60
        }
        fn frame_range(&self) -> FrameRange {
            FrameRange::new(1, 1)
        }
        fn find_collection(&self, _: &str) -> Option<crate::scene::CollectionId> {
            None
        }
        fn collection_name(&self, _: crate::scene::CollectionId) -> &str {
            ""
        }
        fn collection_objects(&self, _: crate::scene::CollectionId) -> Vec<ObjectId> {
            Vec::new()
        }
        fn object_name(&self, _: ObjectId) -> &str {
            "fake"
        }
        fn world_matrix(&self, _: ObjectId) -> glam::Mat4 {
            glam::Mat4::from_translation(glam::vec3(self.frame as f32, 0.0, 0.0))
        }
        fn mesh(&self, _: ObjectId) -> Option<&Mesh> {
            None
        }
        fn material(&self, _: ObjectId) -> Option<&crate::material::Material> {
            None
        }
    }

    #[test]
    fn test_fake_cursor_visits_every_frame_in_order() {
        let mut scene = FakeScene { frame: 100, visited: Vec::new() };
        let out = sample(&mut scene, &[ObjectId(0)], ExportMode::ObjectLocation, FrameRange::new(3, 6), &ColorCache::default()).unwrap();

        // last entry is the restore
        assert_eq!(scene.visited, vec![3, 4, 5, 6, 100]);
        assert_eq!(scene.current_frame(), 100);
        assert_eq!(out.fps(), 60);
        let frames: Vec<u32> = out.tracks()[0].keyframes().iter().map(|k| k.frame).collect();
        assert_eq!(frames, vec![3, 4, 5, 6]);
    }

    #[test]
    fn test_inverted_range_is_error() {
        let mut scene = MemoryScene::new(24);
        let err = sample(&mut scene, &[], ExportMode::ObjectLocation, FrameRange::new(5, 1), &ColorCache::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidFrameRange { start: 5, end: 1 }));
    }

    #[test]
    fn test_mode_names() {
        assert_eq!(ExportMode::parse("vertices"), Some(ExportMode::VerticesLocation));
        assert_eq!(ExportMode::parse("OBJECT_LOCATION"), Some(ExportMode::ObjectLocation));
        assert_eq!(ExportMode::parse("faces"), None);
        assert_eq!(serde_json::to_string(&ExportMode::VerticesLocation).unwrap(), "\"VERTICES_LOCATION\"");
    }
}

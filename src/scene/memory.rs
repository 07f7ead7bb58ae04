//! In-memory host scene.
//!
//! [`MemoryScene`] implements every host trait over plain Rust data. It is
//! what the command-line tool exports from, and what tests drive.

use std::path::Path;

use glam::Mat4;

use super::{CollectionId, Decimate, FrameCursor, FrameRange, ObjectId, Scene};
use crate::geom::{Mesh, Transform};
use crate::material::Material;
use crate::util::{Error, Result};

/// Object stored in a [`MemoryScene`].
#[derive(Clone, Debug, Default)]
pub struct SceneObject {
    pub name: String,
    pub parent: Option<ObjectId>,
    pub transform: Transform,
    pub mesh: Option<Mesh>,
    pub material: Option<Material>,
}

impl SceneObject {
    /// Object with an identity transform and no data.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Default::default() }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_mesh(mut self, mesh: Mesh) -> Self {
        self.mesh = Some(mesh);
        self
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.material = Some(material);
        self
    }

    pub fn with_parent(mut self, parent: ObjectId) -> Self {
        self.parent = Some(parent);
        self
    }
}

#[derive(Clone, Debug)]
struct CollectionData {
    name: String,
    objects: Vec<ObjectId>,
}

/// Scene held entirely in memory.
///
/// Ids stay stable: removing a collection or object leaves an empty slot.
#[derive(Clone, Debug)]
pub struct MemoryScene {
    fps: u32,
    range: FrameRange,
    current: u32,
    objects: Vec<Option<SceneObject>>,
    collections: Vec<Option<CollectionData>>,
}

impl Default for MemoryScene {
    fn default() -> Self {
        Self::new(24)
    }
}

impl MemoryScene {
    /// Empty scene at frame 1 with a 1..250 range.
    pub fn new(fps: u32) -> Self {
        Self {
            fps,
            range: FrameRange::new(1, 250),
            current: 1,
            objects: Vec::new(),
            collections: Vec::new(),
        }
    }

    /// Load a JSON scene description; texture paths resolve against its directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::FileNotFound(path.to_path_buf())
            } else {
                Error::Io(e)
            }
        })?;
        let desc: super::SceneDescription = serde_json::from_str(&text)?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        desc.build(base)
    }

    pub fn set_fps(&mut self, fps: u32) {
        self.fps = fps;
    }

    pub fn set_frame_range(&mut self, range: FrameRange) {
        self.range = range;
    }

    /// Add an empty collection.
    pub fn add_collection(&mut self, name: impl Into<String>) -> CollectionId {
        self.collections.push(Some(CollectionData { name: name.into(), objects: Vec::new() }));
        CollectionId(self.collections.len() - 1)
    }

    /// Whether a collection id is live.
    pub fn has_collection(&self, collection: CollectionId) -> bool {
        matches!(self.collections.get(collection.0), Some(Some(_)))
    }

    /// Names of the live collections.
    pub fn collection_names(&self) -> impl Iterator<Item = &str> {
        self.collections.iter().flatten().map(|c| c.name.as_str())
    }

    /// Add an object and link it into a collection.
    ///
    /// The mesh, if any, must be consistent and the parent must already exist.
    pub fn add_object(&mut self, collection: CollectionId, object: SceneObject) -> Result<ObjectId> {
        if let Some(mesh) = &object.mesh {
            mesh.validate()
                .map_err(|e| Error::invalid(format!("object '{}': {}", object.name, e)))?;
        }
        if let Some(parent) = object.parent {
            if self.object(parent).is_none() {
                return Err(Error::invalid(format!("object '{}': unknown parent", object.name)));
            }
        }
        let id = ObjectId(self.objects.len());
        self.collection_mut(collection)?.objects.push(id);
        self.objects.push(Some(object));
        Ok(id)
    }

    /// Stored object, if the id is live.
    pub fn object(&self, object: ObjectId) -> Option<&SceneObject> {
        self.objects.get(object.0).and_then(Option::as_ref)
    }

    fn collection(&self, collection: CollectionId) -> Option<&CollectionData> {
        self.collections.get(collection.0).and_then(Option::as_ref)
    }

    fn collection_mut(&mut self, collection: CollectionId) -> Result<&mut CollectionData> {
        self.collections
            .get_mut(collection.0)
            .and_then(Option::as_mut)
            .ok_or_else(|| Error::other(format!("collection {} does not exist", collection.0)))
    }

    fn local_matrix(&self, object: ObjectId) -> Mat4 {
        self.object(object)
            .map(|o| o.transform.matrix_at(self.current))
            .unwrap_or(Mat4::IDENTITY)
    }
}

impl FrameCursor for MemoryScene {
    fn current_frame(&self) -> u32 {
        self.current
    }

    fn set_frame(&mut self, frame: u32) {
        self.current = frame;
    }
}

impl Scene for MemoryScene {
    fn fps(&self) -> u32 {
        self.fps
    }

    fn frame_range(&self) -> FrameRange {
        self.range
    }

    fn find_collection(&self, name: &str) -> Option<CollectionId> {
        self.collections
            .iter()
            .position(|c| c.as_ref().is_some_and(|c| c.name == name))
            .map(CollectionId)
    }

    fn collection_name(&self, collection: CollectionId) -> &str {
        self.collection(collection).map(|c| c.name.as_str()).unwrap_or("")
    }

    fn collection_objects(&self, collection: CollectionId) -> Vec<ObjectId> {
        self.collection(collection)
            .map(|c| c.objects.clone())
            .unwrap_or_default()
    }

    fn object_name(&self, object: ObjectId) -> &str {
        self.object(object).map(|o| o.name.as_str()).unwrap_or("")
    }

    fn world_matrix(&self, object: ObjectId) -> Mat4 {
        // parents always have lower ids, so this walk terminates
        let mut matrix = self.local_matrix(object);
        let mut parent = self.object(object).and_then(|o| o.parent);
        while let Some(p) = parent {
            matrix = self.local_matrix(p) * matrix;
            parent = self.object(p).and_then(|o| o.parent);
        }
        matrix
    }

    fn mesh(&self, object: ObjectId) -> Option<&Mesh> {
        self.object(object)?.mesh.as_ref()
    }

    fn material(&self, object: ObjectId) -> Option<&Material> {
        self.object(object)?.material.as_ref()
    }
}

impl Decimate for MemoryScene {
    fn decimate(&mut self, source: CollectionId, ratio: f32) -> Result<CollectionId> {
        let data = self
            .collection(source)
            .cloned()
            .ok_or_else(|| Error::other(format!("collection {} does not exist", source.0)))?;

        let duplicate = self.add_collection(format!("{}_decimated", data.name));
        for id in data.objects {
            let Some(original) = self.object(id) else { continue };
            let mut copy = original.clone();
            copy.name = format!("{}_decimated", original.name);
            copy.mesh = original.mesh.as_ref().map(|m| m.decimated(ratio));
            self.add_object(duplicate, copy)?;
        }
        Ok(duplicate)
    }

    fn remove_collection(&mut self, collection: CollectionId) {
        let Some(data) = self.collections.get_mut(collection.0).and_then(Option::take) else {
            return;
        };
        for id in data.objects {
            let linked_elsewhere = self
                .collections
                .iter()
                .flatten()
                .any(|c| c.objects.contains(&id));
            if !linked_elsewhere {
                if let Some(slot) = self.objects.get_mut(id.0) {
                    *slot = None;
                }
            }
        }
    }
}

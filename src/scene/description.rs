//! JSON scene description loaded by [`MemoryScene::load`].

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{FrameCursor, FrameRange, MemoryScene, ObjectId, SceneObject};
use crate::geom::{Mesh, Transform, TransformKey};
use crate::material::{Material, ShaderNode, Texture};
use crate::util::{Error, Result};

/// Node type name that marks an image texture node.
pub const IMAGE_TEXTURE_NODE: &str = "image_texture";

/// Whole scene.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneDescription {
    pub fps: u32,
    pub frame_start: u32,
    pub frame_end: u32,
    /// Named textures referenced by material nodes.
    pub textures: BTreeMap<String, TextureDescription>,
    pub collections: Vec<CollectionDescription>,
}

impl Default for SceneDescription {
    fn default() -> Self {
        Self {
            fps: 24,
            frame_start: 1,
            frame_end: 250,
            textures: BTreeMap::new(),
            collections: Vec::new(),
        }
    }
}

/// Texture given either as a file or inline pixels (RGBA, rows bottom-up).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextureDescription {
    File { path: PathBuf },
    Inline { width: u32, height: u32, pixels: Vec<[f32; 4]> },
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CollectionDescription {
    pub name: String,
    #[serde(default)]
    pub objects: Vec<ObjectDescription>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectDescription {
    pub name: String,
    /// Name of an object declared earlier.
    pub parent: Option<String>,
    pub keys: Vec<TransformKey>,
    pub mesh: Option<Mesh>,
    pub material: Option<MaterialDescription>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MaterialDescription {
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_true")]
    pub use_nodes: bool,
    #[serde(default)]
    pub nodes: Vec<NodeDescription>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeDescription {
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Texture name, for image texture nodes.
    #[serde(default)]
    pub image: Option<String>,
}

fn default_true() -> bool {
    true
}

impl SceneDescription {
    /// Build a scene, loading texture files relative to `base`.
    pub fn build(&self, base: &Path) -> Result<MemoryScene> {
        let mut scene = MemoryScene::new(self.fps);
        scene.set_frame_range(FrameRange::new(self.frame_start, self.frame_end));
        scene.set_frame(self.frame_start);

        let mut textures = HashMap::new();
        for (name, desc) in &self.textures {
            let texture = match desc {
                TextureDescription::File { path } => {
                    let mut tex = Texture::open(base.join(path))?;
                    tex.name = name.clone();
                    tex
                }
                TextureDescription::Inline { width, height, pixels } => {
                    Texture::new(name.clone(), *width, *height, pixels.clone())?
                }
            };
            tracing::debug!("texture '{}': {}x{}", name, texture.width(), texture.height());
            textures.insert(name.as_str(), Arc::new(texture));
        }

        let mut by_name: HashMap<&str, ObjectId> = HashMap::new();
        for collection in &self.collections {
            let cid = scene.add_collection(collection.name.clone());
            for obj in &collection.objects {
                if by_name.contains_key(obj.name.as_str()) {
                    return Err(Error::invalid(format!("duplicate object name '{}'", obj.name)));
                }
                let mut object = SceneObject::new(obj.name.clone())
                    .with_transform(Transform::from_keys(obj.keys.clone()));
                if let Some(parent) = &obj.parent {
                    let pid = by_name.get(parent.as_str()).ok_or_else(|| {
                        Error::invalid(format!("object '{}': parent '{}' not declared before it", obj.name, parent))
                    })?;
                    object = object.with_parent(*pid);
                }
                if let Some(mesh) = &obj.mesh {
                    object = object.with_mesh(mesh.clone());
                }
                if let Some(material) = &obj.material {
                    object = object.with_material(material.build(&textures)?);
                }
                let id = scene.add_object(cid, object)?;
                by_name.insert(obj.name.as_str(), id);
            }
        }
        Ok(scene)
    }
}

impl MaterialDescription {
    fn build(&self, textures: &HashMap<&str, Arc<Texture>>) -> Result<Material> {
        let mut nodes = Vec::with_capacity(self.nodes.len());
        for node in &self.nodes {
            let name = node.name.as_deref().unwrap_or(&node.node_type);
            if node.node_type == IMAGE_TEXTURE_NODE {
                let image = match &node.image {
                    Some(tex) => Some(textures.get(tex.as_str()).cloned().ok_or_else(|| {
                        Error::invalid(format!("material '{}': unknown texture '{}'", self.name, tex))
                    })?),
                    None => None,
                };
                nodes.push(ShaderNode::image_texture(name, image));
            } else {
                nodes.push(ShaderNode::shader(name, &node.node_type));
            }
        }
        Ok(Material { name: self.name.clone(), use_nodes: self.use_nodes, nodes })
    }
}

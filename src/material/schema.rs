//! Node-based materials.

use std::sync::Arc;

use super::Texture;

/// What a shader node does, as far as color baking cares.
#[derive(Clone, Debug)]
pub enum NodeKind {
    /// Image texture node, possibly with no image assigned.
    ImageTexture { image: Option<Arc<Texture>> },
    /// Any other node (BSDF, output, math, ...), identified by type name.
    Shader(String),
}

/// Shader node in a material's node graph.
#[derive(Clone, Debug)]
pub struct ShaderNode {
    /// Node name.
    pub name: String,
    /// Node behavior.
    pub kind: NodeKind,
}

impl ShaderNode {
    /// Create an image texture node.
    pub fn image_texture(name: &str, image: Option<Arc<Texture>>) -> Self {
        Self { name: name.to_string(), kind: NodeKind::ImageTexture { image } }
    }

    /// Create a non-texture node.
    pub fn shader(name: &str, shader_type: &str) -> Self {
        Self { name: name.to_string(), kind: NodeKind::Shader(shader_type.to_string()) }
    }

    /// Image held by this node, if it is an image texture with one assigned.
    pub fn image(&self) -> Option<&Texture> {
        match &self.kind {
            NodeKind::ImageTexture { image } => image.as_deref(),
            NodeKind::Shader(_) => None,
        }
    }
}

/// Material in an object's first material slot.
#[derive(Clone, Debug, Default)]
pub struct Material {
    /// Material name.
    pub name: String,
    /// Whether the node graph is active.
    pub use_nodes: bool,
    /// Nodes in host iteration order.
    pub nodes: Vec<ShaderNode>,
}

impl Material {
    /// Create a node-based material.
    pub fn with_nodes(name: &str, nodes: Vec<ShaderNode>) -> Self {
        Self { name: name.to_string(), use_nodes: true, nodes }
    }

    /// First image found on an image texture node, in node order.
    ///
    /// Returns `None` when the node graph is disabled.
    pub fn first_image(&self) -> Option<&Texture> {
        if !self.use_nodes {
            return None;
        }
        self.nodes.iter().find_map(ShaderNode::image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tex(name: &str) -> Arc<Texture> {
        Arc::new(Texture::solid(name, 1, 1, [1.0, 0.0, 0.0, 1.0]))
    }

    #[test]
    fn test_first_image_wins() {
        let mat = Material::with_nodes("m", vec![
            ShaderNode::shader("Principled BSDF", "bsdf_principled"),
            ShaderNode::image_texture("Empty", None),
            ShaderNode::image_texture("A", Some(tex("a"))),
            ShaderNode::image_texture("B", Some(tex("b"))),
        ]);
        assert_eq!(mat.first_image().map(|t| t.name.as_str()), Some("a"));
    }

    #[test]
    fn test_nodes_disabled() {
        let mut mat = Material::with_nodes("m", vec![ShaderNode::image_texture("A", Some(tex("a")))]);
        mat.use_nodes = false;
        assert!(mat.first_image().is_none());
    }

    #[test]
    fn test_no_texture_nodes() {
        let mat = Material::with_nodes("m", vec![ShaderNode::shader("Output", "output_material")]);
        assert!(mat.first_image().is_none());
    }
}

//! Materials and textures.
//!
//! A material is a list of shader nodes in host iteration order. The color
//! baker only cares about image texture nodes, and only the first one that
//! has an image assigned.

mod schema;
mod texture;

pub use schema::{Material, NodeKind, ShaderNode};
pub use texture::Texture;

//! Geometry as exposed by the host.
//!
//! - [`Mesh`] - Polygon mesh with per-corner UVs
//! - [`Transform`] / [`TransformKey`] - Keyframed object transforms

pub mod mesh;
pub mod xform;

pub use mesh::Mesh;
pub use xform::{KeySpan, Transform, TransformKey};

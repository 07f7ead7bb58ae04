//! Host scene access.
//!
//! - [`FrameCursor`] / [`Scene`] / [`Decimate`] - What the exporter needs from a host
//! - [`FrameRestore`] / [`DecimatedCollection`] - Scope guards over host state
//! - [`MemoryScene`] - In-memory host, loadable from a JSON [`SceneDescription`]

mod description;
mod memory;
mod scope;
mod traits;

pub use description::{
    CollectionDescription, MaterialDescription, NodeDescription, ObjectDescription,
    SceneDescription, TextureDescription, IMAGE_TEXTURE_NODE,
};
pub use memory::{MemoryScene, SceneObject};
pub use scope::{DecimatedCollection, FrameRestore};
pub use traits::{CollectionId, Decimate, FrameCursor, FrameRange, ObjectId, Scene};

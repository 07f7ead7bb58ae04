//! # droneshow
//!
//! Bake animated scene positions into drone-show keyframe data.
//!
//! Every tracked point (an object origin, or each vertex of a mesh) is
//! sampled once per frame over the scene's frame range. A point keeps a
//! static color baked from the first image texture of its material.
//! Consecutive identical samples are collapsed, and the result is written
//! as pretty JSON or packed little-endian binary.
//!
//! ## Modules
//!
//! - [`util`] - Errors and math types
//! - [`core`] - KeyFrame, PointTrack, TrackCollection
//! - [`geom`] - Mesh data and keyframed transforms
//! - [`material`] - Node materials and textures
//! - [`scene`] - Host traits, scope guards and the in-memory host
//! - [`color`] - Per-vertex color baking
//! - [`sampler`] - Frame-by-frame sampling
//! - [`codec`] - JSON and binary encoding
//! - [`config`] - Export settings
//! - [`export`] - The end-to-end pipeline
//!
//! ## Example
//!
//! ```ignore
//! use droneshow::prelude::*;
//!
//! let mut scene = MemoryScene::load("show.json")?;
//! let mut settings = ExportSettings::for_collection("Drones");
//! settings.data_format = DataFormat::Binary;
//! let report = export(&mut scene, &settings)?;
//! println!("{} tracks -> {}", report.tracks, report.path.display());
//! ```

pub mod util;
pub mod core;
pub mod geom;
pub mod material;
pub mod scene;
pub mod color;
pub mod sampler;
pub mod codec;
pub mod config;
pub mod export;

// Re-export commonly used types
pub use util::{Error, Result, Vector3};
pub use core::{KeyFrame, PointTrack, TrackCollection};
pub use export::{export, ExportReport};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::util::{Error, Result, Vector3};
    pub use crate::core::{KeyFrame, PointTrack, TrackCollection};
    pub use crate::scene::{Decimate, FrameCursor, FrameRange, MemoryScene, Scene, SceneObject};
    pub use crate::sampler::ExportMode;
    pub use crate::codec::{load_from_file, save_to_file, DataFormat};
    pub use crate::config::ExportSettings;
    pub use crate::export::{export, ExportReport};
}

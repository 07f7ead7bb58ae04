//! Core data model.
//!
//! This module provides:
//! - [`KeyFrame`] - A (frame, position, color) sample
//! - [`PointTrack`] - Deduplicating keyframe sequence for one tracked point
//! - [`TrackCollection`] - Frame rate plus every track; the exported artifact

mod keyframe;
mod track;

pub use keyframe::KeyFrame;
pub use track::{PointTrack, TrackCollection};

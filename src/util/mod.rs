//! Utility types shared across the crate.
//!
//! - [`Vector3`] - The float triple stored in keyframes
//! - [`Error`] / [`Result`] - Error handling
//! - Math type re-exports from glam

mod error;
mod math;

pub use error::*;
pub use math::*;

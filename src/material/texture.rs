//! Image textures sampled by the color baker.

use std::io::ErrorKind;
use std::path::Path;

use image::{DynamicImage, ImageError};

use crate::util::{Error, Result};

/// RGBA float image with rows stored bottom-up.
///
/// Row 0 is the bottom edge of the picture, so pixel `(x, y)` lines up with
/// UV `(x / width, y / height)` without flipping.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Texture {
    /// Image name, informational.
    pub name: String,
    width: u32,
    height: u32,
    pixels: Vec<[f32; 4]>,
}

impl Texture {
    /// Create from bottom-up RGBA pixels.
    pub fn new(name: impl Into<String>, width: u32, height: u32, pixels: Vec<[f32; 4]>) -> Result<Self> {
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(Error::invalid(format!(
                "texture {}x{} needs {} pixels, got {}",
                width,
                height,
                expected,
                pixels.len()
            )));
        }
        Ok(Self { name: name.into(), width, height, pixels })
    }

    /// Single-color texture.
    pub fn solid(name: impl Into<String>, width: u32, height: u32, rgba: [f32; 4]) -> Self {
        let pixels = vec![rgba; width as usize * height as usize];
        Self { name: name.into(), width, height, pixels }
    }

    /// Convert a decoded image (rows top-down) to a texture.
    pub fn from_image(name: impl Into<String>, image: &DynamicImage) -> Self {
        let rgba = image.to_rgba32f();
        let (width, height) = rgba.dimensions();
        let mut pixels = Vec::with_capacity(width as usize * height as usize);
        for y in (0..height).rev() {
            for x in 0..width {
                pixels.push(rgba.get_pixel(x, y).0);
            }
        }
        Self { name: name.into(), width, height, pixels }
    }

    /// Load an image file (PNG, JPEG, EXR).
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let image = image::open(path).map_err(|e| match e {
            ImageError::IoError(io) if io.kind() == ErrorKind::NotFound => Error::FileNotFound(path.to_path_buf()),
            other => Error::Image(other),
        })?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::from_image(name, &image))
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Pixel at `(x, y)`, counting rows from the bottom.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[f32; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(y as usize * self.width as usize + x as usize).copied()
    }
}

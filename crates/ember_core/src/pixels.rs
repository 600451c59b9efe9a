//! Decoded image pixel storage and loading.
//!
//! Images are decoded once into linear-RGB float grids and shared by
//! reference; the same file never loads twice through a [`PixelStore`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ember_math::Color;
use thiserror::Error;

/// Errors that can occur while loading texture data.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("failed to load texture: {0}")]
    Load(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image decoding error: {0}")]
    Image(#[from] image::ImageError),
}

pub type TextureResult<T> = Result<T, TextureError>;

/// A decoded image: linear RGB floats in row-major order, top row first.
#[derive(Clone, Debug)]
pub struct PixelData {
    pub width: u32,
    pub height: u32,
    /// `[R, G, B]` per pixel, linear, 0-1 range.
    pub pixels: Vec<[f32; 3]>,
}

impl PixelData {
    /// Create pixel data from a decoded grid.
    pub fn new(width: u32, height: u32, pixels: Vec<[f32; 3]>) -> Self {
        debug_assert_eq!(pixels.len(), (width * height) as usize);
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Decode an image file into linear RGB.
    pub fn open(path: impl AsRef<Path>) -> TextureResult<Self> {
        let path = path.as_ref();
        let img = image::open(path)
            .map_err(|e| TextureError::Load(format!("{}: {}", path.display(), e)))?;

        let rgb = img.to_rgb8();
        let (width, height) = rgb.dimensions();
        let pixels = rgb
            .pixels()
            .map(|p| [srgb_to_linear(p[0]), srgb_to_linear(p[1]), srgb_to_linear(p[2])])
            .collect();

        log::debug!("loaded texture {} ({}x{})", path.display(), width, height);

        Ok(Self::new(width, height, pixels))
    }

    /// Pixel at integer coordinates, clamped to the image bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Color {
        let x = x.min(self.width.saturating_sub(1));
        let y = y.min(self.height.saturating_sub(1));
        let idx = (y * self.width + x) as usize;
        match self.pixels.get(idx) {
            Some(p) => Color::new(p[0], p[1], p[2]),
            None => Color::ZERO,
        }
    }
}

/// Cache of loaded images keyed by file path.
#[derive(Default)]
pub struct PixelStore {
    images: HashMap<PathBuf, Arc<PixelData>>,
}

impl PixelStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load an image, reusing the cached copy if present.
    pub fn load(&mut self, path: impl AsRef<Path>) -> TextureResult<Arc<PixelData>> {
        let path = path.as_ref();
        if let Some(data) = self.images.get(path) {
            return Ok(data.clone());
        }

        let data = Arc::new(PixelData::open(path)?);
        self.images.insert(path.to_path_buf(), data.clone());
        Ok(data)
    }

    /// Number of cached images.
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// True if nothing has been loaded.
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

/// Convert an sRGB byte to a linear float.
fn srgb_to_linear(value: u8) -> f32 {
    let v = value as f32 / 255.0;
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

//! Texture model for the Ember path tracer.
//!
//! A texture is a pure function of surface coordinates: `value(u, v, p)`
//! returns a color. Image-backed textures load their pixel data out-of-band
//! through [`PixelStore`]; the renderer only ever calls the sampling
//! capability.

mod perlin;
mod pixels;
mod texture;

pub use perlin::Perlin;
pub use pixels::{PixelData, PixelStore, TextureError, TextureResult};
pub use texture::{CheckerTexture, ImageTexture, NoiseTexture, SolidColor, Texture};

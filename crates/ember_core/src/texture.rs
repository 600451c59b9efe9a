//! Texture trait and the built-in texture variants.

use std::sync::Arc;

use ember_math::{Color, Point3};

use crate::perlin::Perlin;
use crate::pixels::PixelData;

/// A color as a pure function of surface coordinates.
///
/// `(u, v)` are the primitive's parametric coordinates; `p` is the hit point
/// in world space for textures defined spatially rather than parametrically.
pub trait Texture: Send + Sync {
    fn value(&self, u: f32, v: f32, p: Point3) -> Color;
}

/// A single uniform color.
pub struct SolidColor {
    albedo: Color,
}

impl SolidColor {
    pub fn new(albedo: Color) -> Self {
        Self { albedo }
    }

    pub fn from_rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(Color::new(r, g, b))
    }
}

impl Texture for SolidColor {
    fn value(&self, _u: f32, _v: f32, _p: Point3) -> Color {
        self.albedo
    }
}

/// A 3D checkerboard alternating two textures based on the hit point.
pub struct CheckerTexture {
    inv_scale: f32,
    even: Arc<dyn Texture>,
    odd: Arc<dyn Texture>,
}

impl CheckerTexture {
    pub fn new(scale: f32, even: Arc<dyn Texture>, odd: Arc<dyn Texture>) -> Self {
        Self {
            inv_scale: 1.0 / scale,
            even,
            odd,
        }
    }

    /// Checker over two solid colors.
    pub fn from_colors(scale: f32, even: Color, odd: Color) -> Self {
        Self::new(
            scale,
            Arc::new(SolidColor::new(even)),
            Arc::new(SolidColor::new(odd)),
        )
    }
}

impl Texture for CheckerTexture {
    fn value(&self, u: f32, v: f32, p: Point3) -> Color {
        let x = (self.inv_scale * p.x).floor() as i64;
        let y = (self.inv_scale * p.y).floor() as i64;
        let z = (self.inv_scale * p.z).floor() as i64;

        if (x + y + z) % 2 == 0 {
            self.even.value(u, v, p)
        } else {
            self.odd.value(u, v, p)
        }
    }
}

/// A texture backed by decoded image pixels.
pub struct ImageTexture {
    image: Arc<PixelData>,
}

impl ImageTexture {
    pub fn new(image: Arc<PixelData>) -> Self {
        Self { image }
    }
}

impl Texture for ImageTexture {
    fn value(&self, u: f32, v: f32, _p: Point3) -> Color {
        // No usable pixel data: fail closed to solid cyan as a visible
        // debugging aid rather than aborting the render.
        if self.image.height == 0 || self.image.width == 0 {
            return Color::new(0.0, 1.0, 1.0);
        }

        let u = u.clamp(0.0, 1.0);
        // Flip v: image coordinates have row 0 at the top.
        let v = 1.0 - v.clamp(0.0, 1.0);

        let x = (u * self.image.width as f32) as u32;
        let y = (v * self.image.height as f32) as u32;
        self.image.pixel(x, y)
    }
}

/// Marble-like procedural texture built on Perlin turbulence.
pub struct NoiseTexture {
    noise: Perlin,
    scale: f32,
}

impl NoiseTexture {
    pub fn new(scale: f32) -> Self {
        Self {
            noise: Perlin::new(),
            scale,
        }
    }

    pub fn with_noise(noise: Perlin, scale: f32) -> Self {
        Self { noise, scale }
    }
}

impl Texture for NoiseTexture {
    fn value(&self, _u: f32, _v: f32, p: Point3) -> Color {
        let s = self.scale * p.z + 10.0 * self.noise.turbulence(p, 7);
        Color::splat(0.5) * (1.0 + s.sin())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_math::Vec3;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_solid_color_ignores_coordinates() {
        let tex = SolidColor::from_rgb(0.1, 0.2, 0.3);

        let a = tex.value(0.0, 0.0, Vec3::ZERO);
        let b = tex.value(0.9, 0.1, Vec3::splat(100.0));
        assert_eq!(a, b);
        assert_eq!(a, Color::new(0.1, 0.2, 0.3));
    }

    #[test]
    fn test_checker_alternates_along_an_axis() {
        let even = Color::ONE;
        let odd = Color::ZERO;
        let tex = CheckerTexture::from_colors(1.0, even, odd);

        let a = tex.value(0.0, 0.0, Vec3::new(0.5, 0.5, 0.5));
        let b = tex.value(0.0, 0.0, Vec3::new(1.5, 0.5, 0.5));
        assert_eq!(a, even);
        assert_eq!(b, odd);
    }

    #[test]
    fn test_image_texture_samples_and_clamps() {
        let data = Arc::new(PixelData::new(
            2,
            2,
            vec![
                [1.0, 0.0, 0.0],
                [0.0, 1.0, 0.0],
                [0.0, 0.0, 1.0],
                [1.0, 1.0, 1.0],
            ],
        ));
        let tex = ImageTexture::new(data);

        // v near 1 maps to the top row.
        assert_eq!(tex.value(0.0, 0.99, Vec3::ZERO), Color::new(1.0, 0.0, 0.0));
        // Out-of-range coordinates clamp rather than wrap.
        assert_eq!(tex.value(-3.0, 5.0, Vec3::ZERO), Color::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_empty_image_fails_closed() {
        let tex = ImageTexture::new(Arc::new(PixelData::new(0, 0, vec![])));
        assert_eq!(tex.value(0.5, 0.5, Vec3::ZERO), Color::new(0.0, 1.0, 1.0));
    }

    #[test]
    fn test_noise_texture_stays_in_unit_range() {
        let mut rng = StdRng::seed_from_u64(3);
        let tex = NoiseTexture::with_noise(Perlin::from_rng(&mut rng), 4.0);

        for i in 0..100 {
            let p = Vec3::new(i as f32 * 0.21, 0.0, i as f32 * 0.17);
            let c = tex.value(0.0, 0.0, p);
            for channel in [c.x, c.y, c.z] {
                assert!((0.0..=1.0).contains(&channel));
            }
        }
    }
}

//! Path-tracing integrator, parallel render loop, and image output.

use std::io::{self, Write};
use std::sync::atomic::{AtomicU32, Ordering};

use ember_math::{Color, Interval, Ray};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rayon::prelude::*;

use crate::camera::Camera;
use crate::hittable::{HitRecord, Hittable};

/// Hit-parameter lower bound; rejects self-intersections at the origin.
const T_MIN: f32 = 1e-3;

/// Radiance along a ray, estimated by recursive Monte Carlo sampling.
///
/// Emission plus attenuated incoming light along one sampled bounce path;
/// the recursion truncates at a fixed depth with no Russian roulette.
pub fn ray_color(
    ray: &Ray,
    world: &dyn Hittable,
    depth: u32,
    background: Color,
    rng: &mut dyn RngCore,
) -> Color {
    // Bounce budget exhausted: no more light is gathered.
    if depth == 0 {
        return Color::ZERO;
    }

    let mut rec = HitRecord::default();
    if !world.hit(ray, Interval::new(T_MIN, f32::INFINITY), &mut rec) {
        return background;
    }

    let emitted = rec.material.emitted(rec.u, rec.v, rec.p);

    match rec.material.scatter(ray, &rec, rng) {
        Some(result) => {
            let incoming = ray_color(&result.scattered, world, depth - 1, background, rng);
            emitted + result.attenuation * incoming
        }
        // Absorbed: only the emission contributes.
        None => emitted,
    }
}

/// Render output: per-pixel radiance sums, row-major, top row first.
///
/// Each cell holds the un-averaged sum of `samples_per_pixel` samples;
/// averaging and gamma correction happen at serialization time.
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub samples_per_pixel: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    pub fn new(width: u32, height: u32, samples_per_pixel: u32) -> Self {
        Self {
            width,
            height,
            samples_per_pixel,
            pixels: vec![Color::ZERO; (width * height) as usize],
        }
    }

    /// Sample sum stored for pixel (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[(y * self.width + x) as usize]
    }
}

/// Render the scene, drawing the random seed from the thread-local RNG.
pub fn render(camera: &Camera, world: &dyn Hittable) -> ImageBuffer {
    render_seeded(camera, world, rand::random())
}

/// Render the scene with a fixed seed.
///
/// Rows run in parallel and pixels within a row run in parallel; each pixel
/// is written by exactly one task. Every pixel derives its own generator
/// from the seed and its index, so the output depends only on the seed,
/// never on the thread count.
pub fn render_seeded(camera: &Camera, world: &dyn Hittable, seed: u64) -> ImageBuffer {
    let width = camera.image_width;
    let height = camera.image_height();
    let samples = camera.samples_per_pixel;
    let background = camera.background;
    let max_depth = camera.max_depth;

    log::info!(
        "rendering {}x{} at {} spp, max depth {}",
        width,
        height,
        samples,
        max_depth
    );

    let mut image = ImageBuffer::new(width, height, samples);
    let rows_done = AtomicU32::new(0);

    image
        .pixels
        .par_chunks_mut(width as usize)
        .enumerate()
        .for_each(|(j, row)| {
            row.par_iter_mut().enumerate().for_each(|(i, pixel)| {
                let index = j as u64 * width as u64 + i as u64;
                let mut rng = pixel_rng(seed, index);

                let mut sum = Color::ZERO;
                for _ in 0..samples {
                    let ray = camera.get_ray(i as u32, j as u32, &mut rng);
                    sum += ray_color(&ray, world, max_depth, background, &mut rng);
                }
                *pixel = sum;
            });

            // Progress is cosmetic; a relaxed counter is enough and the
            // log call must never stall sample computation.
            let done = rows_done.fetch_add(1, Ordering::Relaxed) + 1;
            if done % 32 == 0 || done == height {
                log::debug!("rendered {}/{} rows", done, height);
            }
        });

    log::info!("render finished");
    image
}

/// Independent generator for one pixel, derived from the render seed.
fn pixel_rng(seed: u64, pixel_index: u64) -> StdRng {
    // Splitmix-style mix so neighboring pixels get unrelated streams.
    let mixed = (seed ^ pixel_index.wrapping_mul(0x9E37_79B9_7F4A_7C15)).wrapping_add(pixel_index);
    StdRng::seed_from_u64(mixed)
}

/// Gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Average a sample sum, gamma-correct, and quantize to 8-bit channels.
pub fn color_to_rgb8(sum: Color, samples_per_pixel: u32) -> [u8; 3] {
    let scale = 1.0 / samples_per_pixel as f32;
    let intensity = Interval::new(0.0, 0.999);

    let quantize = |channel: f32| {
        let gamma = linear_to_gamma(channel * scale);
        (256.0 * intensity.clamp(gamma)) as u8
    };

    [quantize(sum.x), quantize(sum.y), quantize(sum.z)]
}

/// Serialize the image as plain-text PPM (P3): header with dimensions and
/// max value 255, then one `R G B` triplet per pixel in row-major order.
pub fn write_ppm<W: Write>(image: &ImageBuffer, writer: &mut W) -> io::Result<()> {
    writeln!(writer, "P3")?;
    writeln!(writer, "{} {}", image.width, image.height)?;
    writeln!(writer, "255")?;

    for y in 0..image.height {
        for x in 0..image.width {
            let [r, g, b] = color_to_rgb8(image.get(x, y), image.samples_per_pixel);
            writeln!(writer, "{} {} {}", r, g, b)?;
        }
    }

    Ok(())
}

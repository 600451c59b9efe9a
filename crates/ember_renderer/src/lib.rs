//! Ember - CPU Monte Carlo path tracing.
//!
//! Scene geometry is a tree of [`Hittable`] objects (spheres, quads, lists,
//! and a BVH for accelerated queries), materials decide how rays scatter or
//! emit, and the renderer samples every pixel in parallel.

mod bvh;
mod camera;
mod hittable;
mod material;
mod quad;
mod renderer;
mod sampling;
mod sphere;

pub use bvh::{BvhError, BvhNode};
pub use camera::Camera;
pub use hittable::{HitRecord, Hittable, HittableList};
pub use material::{Dielectric, DiffuseLight, Lambertian, Material, Metal, ScatterResult};
pub use quad::Quad;
pub use renderer::{
    color_to_rgb8, linear_to_gamma, ray_color, render, render_seeded, write_ppm, ImageBuffer,
};
pub use sampling::{gen_f32, random_in_unit_disk, random_unit_vector};
pub use sphere::Sphere;

/// Re-export the math value types.
pub use ember_math::{Aabb, Color, Interval, Point3, Ray, Vec3};

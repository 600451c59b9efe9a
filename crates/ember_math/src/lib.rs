// Re-export glam so downstream crates get Vec3 and friends from one place
pub use glam::*;

mod aabb;
mod interval;
mod ray;

pub use aabb::Aabb;
pub use interval::Interval;
pub use ray::Ray;

/// Positions, directions and RGB colors all share the same 3-component
/// representation.
pub type Point3 = Vec3;
pub type Color = Vec3;

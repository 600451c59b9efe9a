use crate::{Point3, Vec3};

/// A ray in 3D space.
///
/// Parameterizes the half-line `origin + t * direction`. The `time` field
/// records when during the shutter interval the ray was fired, for motion
/// sampling; scenes without moving geometry ignore it.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Point3,
    pub direction: Vec3,
    pub time: f32,
}

impl Ray {
    /// Create a new ray.
    #[inline]
    pub fn new(origin: Point3, direction: Vec3, time: f32) -> Self {
        Self {
            origin,
            direction,
            time,
        }
    }

    /// Create a ray at time 0.
    #[inline]
    pub fn at_start(origin: Point3, direction: Vec3) -> Self {
        Self::new(origin, direction, 0.0)
    }

    /// The point along the ray at parameter t: `origin + t * direction`.
    #[inline]
    pub fn at(&self, t: f32) -> Point3 {
        self.origin + t * self.direction
    }
}

impl Default for Ray {
    fn default() -> Self {
        Self {
            origin: Vec3::ZERO,
            direction: Vec3::Z,
            time: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_at() {
        let ray = Ray::at_start(Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 2.0, 0.0));

        assert_eq!(ray.at(0.0), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(ray.at(1.0), Vec3::new(1.0, 2.0, 0.0));
        assert_eq!(ray.at(-0.5), Vec3::new(1.0, -1.0, 0.0));
    }

    #[test]
    fn test_ray_time() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X, 0.75);
        assert_eq!(ray.time, 0.75);
        assert_eq!(Ray::at_start(Vec3::ZERO, Vec3::X).time, 0.0);
    }
}

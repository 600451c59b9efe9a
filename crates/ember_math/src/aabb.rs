use crate::{Interval, Point3, Ray, Vec3};

/// Axis-aligned bounding box, one interval per axis.
///
/// The invariant maintained by every constructor is that no axis is thinner
/// than a small epsilon, so ray-slab tests and BVH construction never see a
/// degenerate box.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub x: Interval,
    pub y: Interval,
    pub z: Interval,
}

impl Aabb {
    /// A box containing nothing.
    pub const EMPTY: Aabb = Aabb {
        x: Interval::EMPTY,
        y: Interval::EMPTY,
        z: Interval::EMPTY,
    };

    /// Minimum thickness of any axis.
    const MIN_EXTENT: f32 = 1e-4;

    /// Create a box from three per-axis intervals.
    pub fn new(x: Interval, y: Interval, z: Interval) -> Self {
        let mut aabb = Self { x, y, z };
        aabb.pad_to_minimums();
        aabb
    }

    /// Create a box spanning two corner points (in any order).
    pub fn from_points(a: Point3, b: Point3) -> Self {
        Self::new(
            Interval::new(a.x.min(b.x), a.x.max(b.x)),
            Interval::new(a.y.min(b.y), a.y.max(b.y)),
            Interval::new(a.z.min(b.z), a.z.max(b.z)),
        )
    }

    /// The union of two boxes.
    pub fn surrounding(a: &Aabb, b: &Aabb) -> Self {
        Self {
            x: Interval::surrounding(&a.x, &b.x),
            y: Interval::surrounding(&a.y, &b.y),
            z: Interval::surrounding(&a.z, &b.z),
        }
    }

    /// Interval for axis n (0 = X, 1 = Y, 2 = Z).
    pub fn axis_interval(&self, n: usize) -> Interval {
        match n {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    /// Slab-method ray intersection test.
    ///
    /// A zero direction component yields an infinite inverse, which the
    /// min/max comparisons handle without special cases (the axis either
    /// always or never overlaps).
    pub fn hit(&self, ray: &Ray, mut ray_t: Interval) -> bool {
        for axis in 0..3 {
            let slab = self.axis_interval(axis);
            let origin = ray.origin[axis];
            let inv_dir = 1.0 / ray.direction[axis];

            let mut t0 = (slab.min - origin) * inv_dir;
            let mut t1 = (slab.max - origin) * inv_dir;
            if inv_dir < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }

            ray_t.min = t0.max(ray_t.min);
            ray_t.max = t1.min(ray_t.max);
            if ray_t.max <= ray_t.min {
                return false;
            }
        }
        true
    }

    /// Index of the axis with the greatest extent.
    pub fn longest_axis(&self) -> usize {
        let x = self.x.size();
        let y = self.y.size();
        let z = self.z.size();

        if x > y && x > z {
            0
        } else if y > z {
            1
        } else {
            2
        }
    }

    /// Center point of the box.
    pub fn centroid(&self) -> Point3 {
        Vec3::new(
            (self.x.min + self.x.max) * 0.5,
            (self.y.min + self.y.max) * 0.5,
            (self.z.min + self.z.max) * 0.5,
        )
    }

    /// True if every bound is a finite number.
    pub fn is_finite(&self) -> bool {
        self.x.min.is_finite()
            && self.x.max.is_finite()
            && self.y.min.is_finite()
            && self.y.max.is_finite()
            && self.z.min.is_finite()
            && self.z.max.is_finite()
    }

    fn pad_to_minimums(&mut self) {
        if self.x.size() < Self::MIN_EXTENT {
            self.x = self.x.expand(Self::MIN_EXTENT);
        }
        if self.y.size() < Self::MIN_EXTENT {
            self.y = self.y.expand(Self::MIN_EXTENT);
        }
        if self.z.size() < Self::MIN_EXTENT {
            self.z = self.z.expand(Self::MIN_EXTENT);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_points_orders_corners() {
        let aabb = Aabb::from_points(Vec3::new(3.0, -1.0, 2.0), Vec3::new(-3.0, 1.0, 0.0));

        assert_eq!(aabb.x.min, -3.0);
        assert_eq!(aabb.x.max, 3.0);
        assert_eq!(aabb.y.min, -1.0);
        assert_eq!(aabb.z.max, 2.0);
    }

    #[test]
    fn test_surrounding_encloses_both() {
        let a = Aabb::from_points(Vec3::ZERO, Vec3::splat(2.0));
        let b = Aabb::from_points(Vec3::splat(-1.0), Vec3::splat(1.0));
        let union = Aabb::surrounding(&a, &b);

        assert_eq!(union.x.min, -1.0);
        assert_eq!(union.x.max, 2.0);
    }

    #[test]
    fn test_slab_hit_and_miss() {
        let aabb = Aabb::from_points(Vec3::splat(-1.0), Vec3::splat(1.0));
        let t = Interval::new(0.0, 100.0);

        let toward = Ray::at_start(Vec3::new(0.0, 0.0, -5.0), Vec3::Z);
        assert!(aabb.hit(&toward, t));

        let away = Ray::at_start(Vec3::new(0.0, 0.0, -5.0), -Vec3::Z);
        assert!(!aabb.hit(&away, t));

        let offset = Ray::at_start(Vec3::new(5.0, 0.0, -5.0), Vec3::Z);
        assert!(!aabb.hit(&offset, t));
    }

    #[test]
    fn test_axis_parallel_ray() {
        // Direction has a zero component; the inverse is infinite and the
        // slab comparisons must still behave.
        let aabb = Aabb::from_points(Vec3::splat(-1.0), Vec3::splat(1.0));
        let t = Interval::new(0.0, 100.0);

        let inside_slab = Ray::at_start(Vec3::new(0.5, 0.5, -5.0), Vec3::Z);
        assert!(aabb.hit(&inside_slab, t));

        let outside_slab = Ray::at_start(Vec3::new(2.0, 0.5, -5.0), Vec3::Z);
        assert!(!aabb.hit(&outside_slab, t));
    }

    #[test]
    fn test_flat_box_is_padded() {
        // A quad in the XY plane has zero Z extent before padding.
        let aabb = Aabb::from_points(Vec3::new(0.0, 0.0, 1.0), Vec3::new(2.0, 2.0, 1.0));
        assert!(aabb.z.size() > 0.0);

        let ray = Ray::at_start(Vec3::new(1.0, 1.0, 0.0), Vec3::Z);
        assert!(aabb.hit(&ray, Interval::new(0.0, 100.0)));
    }

    #[test]
    fn test_longest_axis() {
        let aabb = Aabb::from_points(Vec3::ZERO, Vec3::new(1.0, 5.0, 2.0));
        assert_eq!(aabb.longest_axis(), 1);
    }

    #[test]
    fn test_centroid() {
        let aabb = Aabb::from_points(Vec3::ZERO, Vec3::new(4.0, 2.0, 6.0));
        assert_eq!(aabb.centroid(), Vec3::new(2.0, 1.0, 3.0));
    }
}

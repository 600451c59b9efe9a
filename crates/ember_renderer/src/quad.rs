//! Axis-arbitrary parallelogram primitive.

use std::sync::Arc;

use ember_math::{Aabb, Interval, Point3, Ray, Vec3};

use crate::hittable::{HitRecord, Hittable};
use crate::material::Material;

/// A parallelogram spanned by two edge vectors from a corner point.
///
/// The surface covers `q + alpha*u + beta*v` for `alpha, beta` in `[0,1]`.
pub struct Quad {
    q: Point3,
    u: Vec3,
    v: Vec3,
    /// Plane basis for solving planar coordinates: `n / (n . n)`
    w: Vec3,
    normal: Vec3,
    /// Plane offset so that `normal . p = d` on the surface
    d: f32,
    material: Arc<dyn Material>,
    bbox: Aabb,
}

impl Quad {
    pub fn new(q: Point3, u: Vec3, v: Vec3, material: Arc<dyn Material>) -> Self {
        let n = u.cross(v);
        let normal = n.normalize();
        let d = normal.dot(q);
        let w = n / n.dot(n);

        // Box over both diagonals; Aabb padding handles the flat axis.
        let diag1 = Aabb::from_points(q, q + u + v);
        let diag2 = Aabb::from_points(q + u, q + v);
        let bbox = Aabb::surrounding(&diag1, &diag2);

        Self {
            q,
            u,
            v,
            w,
            normal,
            d,
            material,
            bbox,
        }
    }
}

impl Hittable for Quad {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        let denom = self.normal.dot(ray.direction);

        // Ray parallel to the plane.
        if denom.abs() < 1e-8 {
            return false;
        }

        let t = (self.d - self.normal.dot(ray.origin)) / denom;
        if !ray_t.contains(t) {
            return false;
        }

        // Planar coordinates of the hit point; outside [0,1]^2 is a miss.
        let intersection = ray.at(t);
        let planar_hit = intersection - self.q;
        let alpha = self.w.dot(planar_hit.cross(self.v));
        let beta = self.w.dot(self.u.cross(planar_hit));

        let unit = Interval::new(0.0, 1.0);
        if !unit.contains(alpha) || !unit.contains(beta) {
            return false;
        }

        rec.t = t;
        rec.p = intersection;
        rec.u = alpha;
        rec.v = beta;
        rec.set_face_normal(ray, self.normal);
        rec.material = self.material.as_ref();

        true
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

//! Hittable trait, HitRecord, and the flat object list.

use std::sync::Arc;

use ember_math::{Aabb, Interval, Point3, Ray, Vec3};
use rand::RngCore;

use crate::material::{Material, ScatterResult};

/// Placeholder material for `HitRecord::default()`; absorbs everything.
struct Absorber;

impl Material for Absorber {
    fn scatter(
        &self,
        _ray_in: &Ray,
        _rec: &HitRecord,
        _rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        None
    }
}

static ABSORBER: Absorber = Absorber;

/// Result of a ray-object intersection.
///
/// Created fresh per intersection test and overwritten by closer hits; never
/// persisted past the query that produced it.
#[derive(Clone)]
pub struct HitRecord<'a> {
    /// Hit point in world space
    pub p: Point3,
    /// Unit normal at the hit, always facing against the ray
    pub normal: Vec3,
    /// Material of the surface that was struck
    pub material: &'a dyn Material,
    /// Parametric texture coordinates
    pub u: f32,
    pub v: f32,
    /// Ray parameter of the hit
    pub t: f32,
    /// True if the ray struck the outside of the surface
    pub front_face: bool,
}

impl<'a> Default for HitRecord<'a> {
    fn default() -> Self {
        Self {
            p: Vec3::ZERO,
            normal: Vec3::ZERO,
            material: &ABSORBER,
            u: 0.0,
            v: 0.0,
            t: 0.0,
            front_face: false,
        }
    }
}

impl<'a> HitRecord<'a> {
    /// Store the normal facing against the ray, remembering which side was
    /// struck.
    ///
    /// `outward_normal` must be unit length.
    pub fn set_face_normal(&mut self, ray: &Ray, outward_normal: Vec3) {
        self.front_face = ray.direction.dot(outward_normal) < 0.0;
        self.normal = if self.front_face {
            outward_normal
        } else {
            -outward_normal
        };
    }
}

/// Anything a ray can intersect.
pub trait Hittable: Send + Sync {
    /// Test the ray against this object over the parameter range `ray_t`.
    ///
    /// On a hit, fills `rec` and returns true.
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool;

    /// Axis-aligned box enclosing this object for all ray times.
    fn bounding_box(&self) -> Aabb;
}

/// A collection of hittables queried by linear scan.
///
/// Objects are reference counted so aggregates (a BVH built over the list)
/// can share them without copying geometry.
pub struct HittableList {
    objects: Vec<Arc<dyn Hittable>>,
    bbox: Aabb,
}

impl HittableList {
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            bbox: Aabb::EMPTY,
        }
    }

    /// Add an object, growing the aggregate bounding box.
    pub fn add(&mut self, object: Arc<dyn Hittable>) {
        self.bbox = Aabb::surrounding(&self.bbox, &object.bounding_box());
        self.objects.push(object);
    }

    /// Shared handles to the contained objects.
    pub fn objects(&self) -> &[Arc<dyn Hittable>] {
        &self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn clear(&mut self) {
        self.objects.clear();
        self.bbox = Aabb::EMPTY;
    }
}

impl Default for HittableList {
    fn default() -> Self {
        Self::new()
    }
}

impl Hittable for HittableList {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        let mut hit_anything = false;
        let mut closest_so_far = ray_t.max;

        // Keep-closest scan: shrink the interval to the best t found so far
        // so farther hits cannot replace nearer ones.
        for object in &self.objects {
            let interval = Interval::new(ray_t.min, closest_so_far);
            if object.hit(ray, interval, rec) {
                hit_anything = true;
                closest_so_far = rec.t;
            }
        }

        hit_anything
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Lambertian, Sphere};
    use ember_math::Color;

    #[test]
    fn test_list_keeps_closest_hit() {
        let material: Arc<dyn Material> = Arc::new(Lambertian::new(Color::splat(0.5)));

        let mut list = HittableList::new();
        // Farther sphere added first; the scan must still return the nearer.
        list.add(Arc::new(Sphere::new(
            Vec3::new(0.0, 0.0, -10.0),
            1.0,
            material.clone(),
        )));
        list.add(Arc::new(Sphere::new(
            Vec3::new(0.0, 0.0, -3.0),
            1.0,
            material,
        )));

        let ray = Ray::at_start(Vec3::ZERO, -Vec3::Z);
        let mut rec = HitRecord::default();
        assert!(list.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rec));
        assert!((rec.t - 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_empty_list_never_hits() {
        let list = HittableList::new();
        let ray = Ray::at_start(Vec3::ZERO, Vec3::Z);
        let mut rec = HitRecord::default();
        assert!(!list.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rec));
    }

    #[test]
    fn test_face_normal_flips_for_back_hits() {
        let ray = Ray::at_start(Vec3::ZERO, Vec3::Z);
        let mut rec = HitRecord::default();

        rec.set_face_normal(&ray, -Vec3::Z);
        assert!(rec.front_face);
        assert_eq!(rec.normal, -Vec3::Z);

        rec.set_face_normal(&ray, Vec3::Z);
        assert!(!rec.front_face);
        assert_eq!(rec.normal, -Vec3::Z);
    }
}

//! Bounding volume hierarchy over scene primitives.
//!
//! Built once per scene before rendering, immutable afterwards, so
//! concurrent pixel tasks can query it without synchronization.

use std::cmp::Ordering;
use std::sync::Arc;

use ember_math::{Aabb, Interval, Ray};
use thiserror::Error;

use crate::hittable::{HitRecord, Hittable, HittableList};

/// Errors raised by BVH construction.
#[derive(Error, Debug)]
pub enum BvhError {
    #[error("cannot build a BVH over an empty object list")]
    EmptyScene,

    #[error("scene bounds are not finite; geometry produced a NaN or infinite bounding box")]
    NonFiniteBounds,
}

/// Largest number of primitives stored directly in a leaf.
const LEAF_MAX_SIZE: usize = 2;

/// A BVH subtree: either an interior split or a small leaf.
pub enum BvhNode {
    Branch {
        left: Box<BvhNode>,
        right: Box<BvhNode>,
        bbox: Aabb,
    },
    Leaf {
        objects: Vec<Arc<dyn Hittable>>,
        bbox: Aabb,
    },
}

impl BvhNode {
    /// Build a BVH over the given objects.
    ///
    /// An empty list or non-finite aggregate bounds are construction errors;
    /// rendering must not start with a broken acceleration structure.
    pub fn new(objects: Vec<Arc<dyn Hittable>>) -> Result<Self, BvhError> {
        if objects.is_empty() {
            return Err(BvhError::EmptyScene);
        }

        let bounds = objects
            .iter()
            .fold(Aabb::EMPTY, |acc, o| Aabb::surrounding(&acc, &o.bounding_box()));
        if !bounds.is_finite() {
            return Err(BvhError::NonFiniteBounds);
        }

        let node = Self::build(objects);
        log::debug!(
            "built BVH over bounds [{:.2}, {:.2}] x [{:.2}, {:.2}] x [{:.2}, {:.2}]",
            bounds.x.min,
            bounds.x.max,
            bounds.y.min,
            bounds.y.max,
            bounds.z.min,
            bounds.z.max
        );
        Ok(node)
    }

    /// Build a BVH sharing the objects of an existing list.
    pub fn from_list(list: &HittableList) -> Result<Self, BvhError> {
        Self::new(list.objects().to_vec())
    }

    /// Median split: sort by bounding-box centroid along the widest axis of
    /// the centroid cloud, halve, recurse.
    fn build(mut objects: Vec<Arc<dyn Hittable>>) -> Self {
        let n = objects.len();

        let bounds = objects
            .iter()
            .fold(Aabb::EMPTY, |acc, o| Aabb::surrounding(&acc, &o.bounding_box()));

        if n <= LEAF_MAX_SIZE {
            return BvhNode::Leaf {
                objects,
                bbox: bounds,
            };
        }

        let centroid_bounds = objects.iter().fold(Aabb::EMPTY, |acc, obj| {
            let c = obj.bounding_box().centroid();
            Aabb::surrounding(&acc, &Aabb::from_points(c, c))
        });
        let axis = centroid_bounds.longest_axis();

        objects.sort_unstable_by(|a, b| {
            let ca = a.bounding_box().centroid()[axis];
            let cb = b.bounding_box().centroid()[axis];
            ca.partial_cmp(&cb).unwrap_or(Ordering::Equal)
        });

        let right_objects = objects.split_off(n / 2);
        let left_objects = objects;

        BvhNode::Branch {
            left: Box::new(Self::build(left_objects)),
            right: Box::new(Self::build(right_objects)),
            bbox: bounds,
        }
    }
}

impl Hittable for BvhNode {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        match self {
            BvhNode::Leaf { objects, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return false;
                }

                let mut hit_anything = false;
                let mut closest = ray_t.max;
                for obj in objects {
                    if obj.hit(ray, Interval::new(ray_t.min, closest), rec) {
                        hit_anything = true;
                        closest = rec.t;
                    }
                }
                hit_anything
            }

            BvhNode::Branch { left, right, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return false;
                }

                let hit_left = left.hit(ray, ray_t, rec);

                // The right subtree only searches up to the closest hit
                // found on the left, so it can never return a farther one.
                let right_max = if hit_left { rec.t } else { ray_t.max };
                let hit_right = right.hit(ray, Interval::new(ray_t.min, right_max), rec);

                hit_left || hit_right
            }
        }
    }

    fn bounding_box(&self) -> Aabb {
        match self {
            BvhNode::Leaf { bbox, .. } => *bbox,
            BvhNode::Branch { bbox, .. } => *bbox,
        }
    }
}

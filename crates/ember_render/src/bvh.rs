//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! A binary tree of AABBs used to prune ray-object intersection tests.

use crate::hittable::{HitRecord, Hittable, HittableList};
use ember_math::{Aabb, Interval, Ray};
use rand::RngCore;
use std::cmp::Ordering;
use std::sync::Arc;

/// BVH node - either a branch with two children or a leaf with one object.
pub enum BvhNode {
    /// Internal node with two children.
    Branch {
        left: Box<BvhNode>,
        right: Box<BvhNode>,
        bbox: Aabb,
    },
    /// Leaf node holding a single object.
    Leaf { object: Arc<dyn Hittable> },
    /// Empty node (for edge cases).
    Empty,
}

impl BvhNode {
    /// Create a BVH from a list of hittable objects.
    pub fn new(objects: Vec<Arc<dyn Hittable>>) -> Self {
        if objects.is_empty() {
            return BvhNode::Empty;
        }
        Self::build(objects)
    }

    /// Create a BVH from the objects of a HittableList.
    pub fn from_list(list: HittableList) -> Self {
        Self::new(list.into_objects())
    }

    /// Recursive construction over an owned range of objects.
    fn build(mut objects: Vec<Arc<dyn Hittable>>) -> Self {
        if objects.len() == 1 {
            return BvhNode::Leaf {
                object: objects.pop().expect("length checked above"),
            };
        }

        // Bounds of everything in the range decide the split axis
        let bounds = objects
            .iter()
            .fold(Aabb::EMPTY, |acc, obj| Aabb::surrounding(&acc, &obj.bounding_box()));
        let axis = bounds.longest_axis();

        objects.sort_unstable_by(|a, b| {
            let a_val = a.bounding_box().centroid()[axis];
            let b_val = b.bounding_box().centroid()[axis];
            a_val.partial_cmp(&b_val).unwrap_or(Ordering::Equal)
        });

        let right_objects = objects.split_off(objects.len() / 2);
        let left = Self::build(objects);
        let right = Self::build(right_objects);

        BvhNode::Branch {
            left: Box::new(left),
            right: Box::new(right),
            bbox: bounds,
        }
    }
}

impl Hittable for BvhNode {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        rng: &mut dyn RngCore,
    ) -> bool {
        match self {
            BvhNode::Empty => false,

            BvhNode::Leaf { object } => object.hit(ray, ray_t, rec, rng),

            BvhNode::Branch { left, right, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return false;
                }

                let hit_left = left.hit(ray, ray_t, rec, rng);

                // Only check right up to the closest hit so far
                let right_max = if hit_left { rec.t } else { ray_t.max };
                let hit_right = right.hit(ray, Interval::new(ray_t.min, right_max), rec, rng);

                hit_left || hit_right
            }
        }
    }

    fn bounding_box(&self) -> Aabb {
        match self {
            BvhNode::Empty => Aabb::EMPTY,
            BvhNode::Leaf { object } => object.bounding_box(),
            BvhNode::Branch { bbox, .. } => *bbox,
        }
    }
}

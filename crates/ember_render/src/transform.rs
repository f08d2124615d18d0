//! Object-space transform wrappers.
//!
//! Translate and RotateY decorate another hittable: the incoming ray is
//! mapped into object space, intersected, and the hit mapped back. Wrappers
//! compose, so translate(rotate_y(box, 15), offset) is a valid subtree.

use crate::hittable::{HitRecord, Hittable};
use ember_math::{Aabb, Interval, Point3, Ray, Vec3};
use rand::RngCore;
use std::sync::Arc;

/// Moves an object by a fixed offset.
pub struct Translate {
    object: Arc<dyn Hittable>,
    offset: Vec3,
    bbox: Aabb,
}

impl Translate {
    pub fn new(object: Arc<dyn Hittable>, offset: Vec3) -> Self {
        let bbox = object.bounding_box().translate(offset);
        Self {
            object,
            offset,
            bbox,
        }
    }
}

impl Hittable for Translate {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        rng: &mut dyn RngCore,
    ) -> bool {
        // Move the ray backwards by the offset
        let offset_ray = Ray::new(ray.origin() - self.offset, ray.direction(), ray.time());

        if !self.object.hit(&offset_ray, ray_t, rec, rng) {
            return false;
        }

        // Move the intersection point forwards by the offset
        rec.p += self.offset;

        true
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

/// Rotates an object around the y-axis.
pub struct RotateY {
    object: Arc<dyn Hittable>,
    sin_theta: f64,
    cos_theta: f64,
    bbox: Aabb,
}

impl RotateY {
    /// Wrap an object rotated by `angle` degrees around the y-axis.
    pub fn new(object: Arc<dyn Hittable>, angle: f64) -> Self {
        let radians = angle.to_radians();
        let sin_theta = radians.sin();
        let cos_theta = radians.cos();

        // Envelope of the eight rotated corners of the inner box
        let bbox = object.bounding_box();
        let min_p = Point3::new(bbox.x.min, bbox.y.min, bbox.z.min);
        let max_p = Point3::new(bbox.x.max, bbox.y.max, bbox.z.max);

        let mut result_min = Point3::splat(f64::INFINITY);
        let mut result_max = Point3::splat(f64::NEG_INFINITY);

        for i in 0..2 {
            for j in 0..2 {
                for k in 0..2 {
                    let x = if i == 0 { min_p.x } else { max_p.x };
                    let y = if j == 0 { min_p.y } else { max_p.y };
                    let z = if k == 0 { min_p.z } else { max_p.z };

                    let rotated = Vec3::new(
                        cos_theta * x + sin_theta * z,
                        y,
                        -sin_theta * x + cos_theta * z,
                    );

                    result_min = result_min.min(rotated);
                    result_max = result_max.max(rotated);
                }
            }
        }

        Self {
            object,
            sin_theta,
            cos_theta,
            bbox: Aabb::from_points(result_min, result_max),
        }
    }

    /// World space -> object space (rotate by -theta).
    fn to_object(&self, v: Vec3) -> Vec3 {
        Vec3::new(
            self.cos_theta * v.x - self.sin_theta * v.z,
            v.y,
            self.sin_theta * v.x + self.cos_theta * v.z,
        )
    }

    /// Object space -> world space (rotate by +theta).
    fn to_world(&self, v: Vec3) -> Vec3 {
        Vec3::new(
            self.cos_theta * v.x + self.sin_theta * v.z,
            v.y,
            -self.sin_theta * v.x + self.cos_theta * v.z,
        )
    }
}

impl Hittable for RotateY {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        rng: &mut dyn RngCore,
    ) -> bool {
        // Transform the ray into object space
        let rotated = Ray::new(
            self.to_object(ray.origin()),
            self.to_object(ray.direction()),
            ray.time(),
        );

        if !self.object.hit(&rotated, ray_t, rec, rng) {
            return false;
        }

        // Transform the hit back to world space
        rec.p = self.to_world(rec.p);
        rec.normal = self.to_world(rec.normal);

        true
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::{Color, Lambertian, Material};
    use crate::sphere::Sphere;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn gray() -> Arc<dyn Material> {
        Arc::new(Lambertian::new(Color::splat(0.5)))
    }

    fn hit_t(object: &dyn Hittable, ray: &Ray) -> Option<f64> {
        let mut rec = HitRecord::default();
        let mut rng = StdRng::seed_from_u64(0);
        object
            .hit(ray, Interval::new(0.001, f64::INFINITY), &mut rec, &mut rng)
            .then_some(rec.t)
    }

    #[test]
    fn test_translate_moves_hit() {
        let sphere: Arc<dyn Hittable> = Arc::new(Sphere::new(Point3::ZERO, 1.0, gray()));
        let moved = Translate::new(sphere, Vec3::new(5.0, 0.0, 0.0));

        let ray = Ray::new_simple(Point3::new(5.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(hit_t(&moved, &ray), Some(4.0));

        // The original location no longer intersects
        let ray = Ray::new_simple(Point3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(hit_t(&moved, &ray), None);
    }

    #[test]
    fn test_translate_inverse_is_identity() {
        let sphere: Arc<dyn Hittable> = Arc::new(Sphere::new(Point3::new(1.0, 2.0, 3.0), 1.0, gray()));
        let offset = Vec3::new(4.0, -1.0, 2.0);
        let wrapped: Arc<dyn Hittable> = Arc::new(Translate::new(sphere.clone(), offset));
        let round_trip = Translate::new(wrapped, -offset);

        let rays = [
            Ray::new_simple(Point3::new(1.0, 2.0, 10.0), Vec3::new(0.0, 0.0, -1.0)),
            Ray::new_simple(Point3::new(-5.0, 2.0, 3.0), Vec3::new(1.0, 0.0, 0.0)),
            Ray::new_simple(Point3::ZERO, Vec3::new(1.0, 1.0, 1.0)),
        ];
        for ray in &rays {
            match (hit_t(sphere.as_ref(), ray), hit_t(&round_trip, ray)) {
                (Some(a), Some(b)) => assert!((a - b).abs() < 1e-12),
                (None, None) => {}
                other => panic!("round-trip diverged: {other:?}"),
            }
        }
    }

    #[test]
    fn test_rotate_y_quarter_turn() {
        // A sphere at +X, rotated 90 degrees about Y, ends up at -Z.
        let sphere: Arc<dyn Hittable> = Arc::new(Sphere::new(Point3::new(2.0, 0.0, 0.0), 1.0, gray()));
        let rotated = RotateY::new(sphere, 90.0);

        let ray = Ray::new_simple(Point3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, 1.0));
        let t = hit_t(&rotated, &ray).expect("rotated sphere should sit on -Z");
        assert!((t - 2.0).abs() < 1e-9);

        let bbox = rotated.bounding_box();
        assert!(bbox.z.min <= -3.0 + 1e-9);
        assert!(bbox.z.max >= -1.0 - 1e-9);
    }

    #[test]
    fn test_rotate_y_inverse_is_identity() {
        let sphere: Arc<dyn Hittable> = Arc::new(Sphere::new(Point3::new(2.0, 0.5, 1.0), 1.0, gray()));
        let wrapped: Arc<dyn Hittable> = Arc::new(RotateY::new(sphere.clone(), 37.0));
        let round_trip = RotateY::new(wrapped, -37.0);

        let rays = [
            Ray::new_simple(Point3::new(2.0, 0.5, 10.0), Vec3::new(0.0, 0.0, -1.0)),
            Ray::new_simple(Point3::new(-5.0, 0.5, 1.0), Vec3::new(1.0, 0.0, 0.0)),
            Ray::new_simple(Point3::ZERO, Vec3::new(0.0, 1.0, 0.0)),
        ];
        for ray in &rays {
            match (hit_t(sphere.as_ref(), ray), hit_t(&round_trip, ray)) {
                (Some(a), Some(b)) => assert!((a - b).abs() < 1e-9),
                (None, None) => {}
                other => panic!("round-trip diverged: {other:?}"),
            }
        }
    }
}

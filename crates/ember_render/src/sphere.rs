//! Sphere primitive for ray tracing.

use crate::hittable::{HitRecord, Hittable};
use crate::Material;
use ember_math::{Aabb, Interval, Point3, Ray, Vec3};
use rand::RngCore;
use std::f64::consts::PI;
use std::sync::Arc;

/// A sphere primitive, optionally moving linearly over the shutter interval.
///
/// The center is stored as a ray from the position at time 0 toward the
/// position at time 1, so `center.at(time)` gives the center for any ray.
pub struct Sphere {
    center: Ray,
    radius: f64,
    material: Arc<dyn Material>,
    bbox: Aabb,
}

impl Sphere {
    /// Create a stationary sphere.
    pub fn new(center: Point3, radius: f64, material: Arc<dyn Material>) -> Self {
        let radius = radius.max(0.0);
        let rvec = Vec3::splat(radius);
        let bbox = Aabb::from_points(center - rvec, center + rvec);

        Self {
            center: Ray::new_simple(center, Vec3::ZERO),
            radius,
            material,
            bbox,
        }
    }

    /// Create a sphere moving from `center0` at time 0 to `center1` at time 1.
    pub fn new_moving(
        center0: Point3,
        center1: Point3,
        radius: f64,
        material: Arc<dyn Material>,
    ) -> Self {
        let radius = radius.max(0.0);
        let rvec = Vec3::splat(radius);
        let box0 = Aabb::from_points(center0 - rvec, center0 + rvec);
        let box1 = Aabb::from_points(center1 - rvec, center1 + rvec);

        Self {
            center: Ray::new_simple(center0, center1 - center0),
            radius,
            material,
            bbox: Aabb::surrounding(&box0, &box1),
        }
    }

    /// Get the UV coordinates for a point on the unit sphere.
    fn get_sphere_uv(p: Vec3) -> (f64, f64) {
        // p is a point on the unit sphere centered at origin
        // theta: angle down from +Y
        // phi: angle around Y axis from +X
        let theta = (-p.y).acos();
        let phi = (-p.z).atan2(p.x) + PI;

        let u = phi / (2.0 * PI);
        let v = theta / PI;
        (u, v)
    }
}

impl Hittable for Sphere {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        _rng: &mut dyn RngCore,
    ) -> bool {
        let current_center = self.center.at(ray.time());
        let oc = current_center - ray.origin();
        let a = ray.direction().length_squared();
        let h = ray.direction().dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return false;
        }

        let sqrtd = discriminant.sqrt();

        // Find the nearest root in the acceptable range
        let mut root = (h - sqrtd) / a;
        if !ray_t.surrounds(root) {
            root = (h + sqrtd) / a;
            if !ray_t.surrounds(root) {
                return false;
            }
        }

        rec.t = root;
        rec.p = ray.at(rec.t);
        let outward_normal = (rec.p - current_center) / self.radius;
        rec.set_face_normal(ray, outward_normal);
        (rec.u, rec.v) = Self::get_sphere_uv(outward_normal);
        rec.material = self.material.as_ref();

        true
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::{Color, Lambertian};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn gray() -> Arc<dyn Material> {
        Arc::new(Lambertian::new(Color::splat(0.5)))
    }

    #[test]
    fn test_sphere_hit() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, gray());

        let ray = Ray::new_simple(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let mut rec = HitRecord::default();
        let mut rng = StdRng::seed_from_u64(0);

        assert!(sphere.hit(
            &ray,
            Interval::new(0.001, f64::INFINITY),
            &mut rec,
            &mut rng
        ));
        assert!((rec.t - 0.5).abs() < 1e-9);
        assert!(rec.front_face);
    }

    #[test]
    fn test_sphere_hit_from_center() {
        // A ray cast from the center hits the far side at t = r/|dir|, with
        // the outward normal along the ray.
        let sphere = Sphere::new(Vec3::ZERO, 2.0, gray());

        let dir = Vec3::new(1.0, 2.0, -2.0); // length 3
        let ray = Ray::new_simple(Vec3::ZERO, dir);
        let mut rec = HitRecord::default();
        let mut rng = StdRng::seed_from_u64(0);

        assert!(sphere.hit(
            &ray,
            Interval::new(0.001, f64::INFINITY),
            &mut rec,
            &mut rng
        ));
        assert!((rec.t - 2.0 / 3.0).abs() < 1e-9);
        // Leaving the sphere from the inside: stored normal points back at us
        assert!(!rec.front_face);
        assert!((rec.normal + dir.normalize()).length() < 1e-9);
    }

    #[test]
    fn test_sphere_miss() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, gray());

        // Ray pointing away from sphere
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0));
        let mut rec = HitRecord::default();
        let mut rng = StdRng::seed_from_u64(0);

        assert!(!sphere.hit(
            &ray,
            Interval::new(0.001, f64::INFINITY),
            &mut rec,
            &mut rng
        ));
    }

    #[test]
    fn test_moving_sphere_follows_time() {
        let sphere = Sphere::new_moving(
            Vec3::new(0.0, 3.0, 0.0),
            Vec3::new(0.0, 0.0, 0.0),
            0.5,
            gray(),
        );
        let mut rng = StdRng::seed_from_u64(0);

        // At t=0 the sphere is at y=3
        let ray = Ray::new(Vec3::new(0.0, 3.0, 5.0), Vec3::new(0.0, 0.0, -1.0), 0.0);
        let mut rec = HitRecord::default();
        assert!(sphere.hit(
            &ray,
            Interval::new(0.001, f64::INFINITY),
            &mut rec,
            &mut rng
        ));

        // At t=1 it has moved to the origin
        let ray = Ray::new(Vec3::new(0.0, 3.0, 5.0), Vec3::new(0.0, 0.0, -1.0), 1.0);
        let mut rec = HitRecord::default();
        assert!(!sphere.hit(
            &ray,
            Interval::new(0.001, f64::INFINITY),
            &mut rec,
            &mut rng
        ));

        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0), 1.0);
        let mut rec = HitRecord::default();
        assert!(sphere.hit(
            &ray,
            Interval::new(0.001, f64::INFINITY),
            &mut rec,
            &mut rng
        ));
    }

    #[test]
    fn test_moving_sphere_bbox_spans_endpoints() {
        let sphere = Sphere::new_moving(
            Vec3::new(0.0, 3.0, 0.0),
            Vec3::new(0.0, 0.0, 0.0),
            0.5,
            gray(),
        );
        let bbox = sphere.bounding_box();

        assert!(bbox.y.min <= -0.5);
        assert!(bbox.y.max >= 3.5);
        assert!((bbox.x.min - -0.5).abs() < 1e-9);
        assert!((bbox.x.max - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_sphere_uv_poles_and_equator() {
        // Equator along +X maps to the center of the texture
        let (u, v) = Sphere::get_sphere_uv(Vec3::new(1.0, 0.0, 0.0));
        assert!((u - 0.5).abs() < 1e-9);
        assert!((v - 0.5).abs() < 1e-9);

        // North pole
        let (_, v) = Sphere::get_sphere_uv(Vec3::new(0.0, 1.0, 0.0));
        assert!((v - 1.0).abs() < 1e-9);

        // South pole
        let (_, v) = Sphere::get_sphere_uv(Vec3::new(0.0, -1.0, 0.0));
        assert!(v.abs() < 1e-9);
    }
}

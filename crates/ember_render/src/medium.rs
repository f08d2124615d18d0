//! Constant-density participating medium.
//!
//! Wraps a boundary surface; rays passing through may scatter at an
//! exponentially distributed free-flight distance, handled by an isotropic
//! phase function.

use crate::hittable::{HitRecord, Hittable};
use crate::material::{gen_f64, Color, Isotropic, Material};
use crate::texture::Texture;
use ember_math::{Aabb, Interval, Ray, Vec3};
use rand::RngCore;
use std::sync::Arc;

pub struct ConstantMedium {
    boundary: Arc<dyn Hittable>,
    neg_inv_density: f64,
    phase_function: Arc<dyn Material>,
}

impl ConstantMedium {
    /// Medium with the given density and a flat scattering albedo.
    pub fn new(boundary: Arc<dyn Hittable>, density: f64, albedo: Color) -> Self {
        Self {
            boundary,
            neg_inv_density: -1.0 / density,
            phase_function: Arc::new(Isotropic::new(albedo)),
        }
    }

    /// Medium with a textured scattering albedo.
    pub fn textured(boundary: Arc<dyn Hittable>, density: f64, texture: Arc<dyn Texture>) -> Self {
        Self {
            boundary,
            neg_inv_density: -1.0 / density,
            phase_function: Arc::new(Isotropic::textured(texture)),
        }
    }
}

impl Hittable for ConstantMedium {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        rng: &mut dyn RngCore,
    ) -> bool {
        // Find where the ray enters and exits the boundary, ignoring the
        // requested interval so that origins inside the volume still work.
        let mut rec1 = HitRecord::default();
        if !self.boundary.hit(ray, Interval::UNIVERSE, &mut rec1, rng) {
            return false;
        }

        let mut rec2 = HitRecord::default();
        if !self.boundary.hit(
            ray,
            Interval::new(rec1.t + 0.0001, f64::INFINITY),
            &mut rec2,
            rng,
        ) {
            return false;
        }

        let mut t1 = rec1.t.max(ray_t.min);
        let t2 = rec2.t.min(ray_t.max);

        if t1 >= t2 {
            return false;
        }
        if t1 < 0.0 {
            t1 = 0.0;
        }

        let ray_length = ray.direction().length();
        let distance_within_boundary = (t2 - t1) * ray_length;
        let hit_distance = self.neg_inv_density * gen_f64(rng).ln();

        // Free flight carried the ray through without interaction
        if hit_distance > distance_within_boundary {
            return false;
        }

        rec.t = t1 + hit_distance / ray_length;
        rec.p = ray.at(rec.t);

        // Arbitrary: direction has no meaning for a scatter event inside a
        // volume
        rec.normal = Vec3::new(1.0, 0.0, 0.0);
        rec.front_face = true;
        rec.material = self.phase_function.as_ref();

        true
    }

    fn bounding_box(&self) -> Aabb {
        self.boundary.bounding_box()
    }
}

//! Material trait for surface scattering.

use crate::hittable::HitRecord;
use crate::texture::{SolidColor, Texture};
use ember_math::{Point3, Ray, Vec3, Vec3Ext};
use rand::RngCore;
use std::sync::Arc;

/// Color type alias (RGB values typically 0-1)
pub type Color = Vec3;

/// Result of scattering a ray off a material.
#[derive(Debug, Clone, Copy)]
pub struct ScatterResult {
    /// Color attenuation (how much light is absorbed)
    pub attenuation: Color,
    /// The scattered ray
    pub scattered: Ray,
}

/// Trait for materials that describe how light interacts with surfaces.
///
/// Uses `&mut dyn RngCore` for object safety (required for `dyn Material`).
pub trait Material: Send + Sync {
    /// Scatter an incoming ray.
    ///
    /// Returns Some(ScatterResult) if the ray scatters, or None if absorbed.
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult>;

    /// Get emitted light from this material.
    ///
    /// Returns the color of light emitted at the given UV coordinates and point.
    /// Most materials return black (no emission).
    fn emitted(&self, _u: f64, _v: f64, _p: Point3) -> Color {
        Color::ZERO
    }
}

// =============================================================================
// RNG helpers (object-safe)
// =============================================================================

/// Generate a random f64 in [0, 1) from an RngCore.
///
/// This is needed because `dyn RngCore` can't use `Rng::gen()` directly.
#[inline]
pub fn gen_f64(rng: &mut dyn RngCore) -> f64 {
    // Same algorithm as rand's Standard distribution for f64
    let bits = rng.next_u64();
    (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
}

/// Generate a random unit vector on the unit sphere.
pub fn random_unit_vector(rng: &mut dyn RngCore) -> Vec3 {
    // Rejection sampling for uniform distribution on the sphere
    loop {
        let v = Vec3::new(
            gen_f64(rng) * 2.0 - 1.0,
            gen_f64(rng) * 2.0 - 1.0,
            gen_f64(rng) * 2.0 - 1.0,
        );
        let len_sq = v.length_squared();
        if len_sq > 1e-160 && len_sq <= 1.0 {
            return v / len_sq.sqrt();
        }
    }
}

/// Reflect a vector about a normal.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract a vector through a surface.
#[inline]
pub fn refract(uv: Vec3, n: Vec3, etai_over_etat: f64) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}

// =============================================================================
// Materials
// =============================================================================

/// Lambertian (diffuse) material.
pub struct Lambertian {
    texture: Arc<dyn Texture>,
}

impl Lambertian {
    /// Create a Lambertian material with a flat albedo color.
    pub fn new(albedo: Color) -> Self {
        Self {
            texture: Arc::new(SolidColor::new(albedo)),
        }
    }

    /// Create a Lambertian material backed by a texture.
    pub fn textured(texture: Arc<dyn Texture>) -> Self {
        Self { texture }
    }
}

impl Material for Lambertian {
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        // Scatter in a random direction on the hemisphere around the normal
        let mut scatter_direction = rec.normal + random_unit_vector(rng);

        // Catch degenerate scatter direction
        if scatter_direction.near_zero() {
            scatter_direction = rec.normal;
        }

        Some(ScatterResult {
            attenuation: self.texture.value(rec.u, rec.v, rec.p),
            scattered: Ray::new(rec.p, scatter_direction, ray_in.time()),
        })
    }
}

/// Metal (specular) material.
pub struct Metal {
    texture: Arc<dyn Texture>,
    fuzz: f64,
}

impl Metal {
    /// Create a new Metal material.
    ///
    /// - `albedo`: The color of the metal
    /// - `fuzz`: Roughness, 0.0 = perfect mirror, 1.0 = very rough
    pub fn new(albedo: Color, fuzz: f64) -> Self {
        Self::textured(Arc::new(SolidColor::new(albedo)), fuzz)
    }

    /// Create a Metal material backed by a texture.
    pub fn textured(texture: Arc<dyn Texture>, fuzz: f64) -> Self {
        Self {
            texture,
            fuzz: fuzz.clamp(0.0, 1.0),
        }
    }
}

impl Material for Metal {
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        let reflected = reflect(ray_in.direction(), rec.normal);
        let scattered_dir = reflected.normalize() + self.fuzz * random_unit_vector(rng);

        // Only scatter if the reflected ray is in the same hemisphere as the normal
        if scattered_dir.dot(rec.normal) > 0.0 {
            Some(ScatterResult {
                attenuation: self.texture.value(rec.u, rec.v, rec.p),
                scattered: Ray::new(rec.p, scattered_dir, ray_in.time()),
            })
        } else {
            None
        }
    }
}

/// Dielectric (glass) material.
pub struct Dielectric {
    /// Index of refraction
    ior: f64,
}

impl Dielectric {
    /// Create a new Dielectric material.
    ///
    /// - `ior`: Index of refraction (1.0 = air, 1.5 = glass, 2.4 = diamond)
    pub fn new(ior: f64) -> Self {
        Self { ior }
    }

    /// Schlick's approximation for reflectance
    fn reflectance(cosine: f64, ior: f64) -> f64 {
        let r0 = ((1.0 - ior) / (1.0 + ior)).powi(2);
        r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
    }
}

impl Material for Dielectric {
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        let refraction_ratio = if rec.front_face {
            1.0 / self.ior
        } else {
            self.ior
        };

        let unit_direction = ray_in.direction().normalize();
        let cos_theta = (-unit_direction).dot(rec.normal).min(1.0);
        let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();

        // Check for total internal reflection
        let cannot_refract = refraction_ratio * sin_theta > 1.0;

        let direction =
            if cannot_refract || Self::reflectance(cos_theta, refraction_ratio) > gen_f64(rng) {
                reflect(unit_direction, rec.normal)
            } else {
                refract(unit_direction, rec.normal, refraction_ratio)
            };

        Some(ScatterResult {
            attenuation: Color::ONE,
            scattered: Ray::new(rec.p, direction, ray_in.time()),
        })
    }
}

/// Diffuse light emitter.
pub struct DiffuseLight {
    texture: Arc<dyn Texture>,
}

impl DiffuseLight {
    /// Create a diffuse light with a flat emission color.
    pub fn new(emit: Color) -> Self {
        Self {
            texture: Arc::new(SolidColor::new(emit)),
        }
    }

    /// Create a diffuse light backed by a texture.
    pub fn textured(texture: Arc<dyn Texture>) -> Self {
        Self { texture }
    }
}

impl Material for DiffuseLight {
    fn scatter(
        &self,
        _ray_in: &Ray,
        _rec: &HitRecord,
        _rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        // Lights don't scatter rays
        None
    }

    fn emitted(&self, u: f64, v: f64, p: Point3) -> Color {
        self.texture.value(u, v, p)
    }
}

/// Isotropic phase function for volumetric media.
///
/// Scatters into a uniformly random direction regardless of the incoming ray.
pub struct Isotropic {
    texture: Arc<dyn Texture>,
}

impl Isotropic {
    /// Create an isotropic material with a flat albedo color.
    pub fn new(albedo: Color) -> Self {
        Self {
            texture: Arc::new(SolidColor::new(albedo)),
        }
    }

    /// Create an isotropic material backed by a texture.
    pub fn textured(texture: Arc<dyn Texture>) -> Self {
        Self { texture }
    }
}

impl Material for Isotropic {
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        Some(ScatterResult {
            attenuation: self.texture.value(rec.u, rec.v, rec.p),
            scattered: Ray::new(rec.p, random_unit_vector(rng), ray_in.time()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn hit_at_origin<'a>(material: &'a dyn Material) -> HitRecord<'a> {
        HitRecord {
            p: Vec3::ZERO,
            normal: Vec3::new(0.0, 0.0, 1.0),
            material,
            u: 0.5,
            v: 0.5,
            t: 1.0,
            front_face: true,
        }
    }

    #[test]
    fn test_lambertian_always_scatters() {
        let mat = Lambertian::new(Color::new(0.8, 0.1, 0.1));
        let rec = hit_at_origin(&mat);
        let ray = Ray::new_simple(Vec3::new(0.0, 0.0, 1.0), Vec3::new(0.0, 0.0, -1.0));
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..100 {
            let result = mat.scatter(&ray, &rec, &mut rng).unwrap();
            assert_eq!(result.attenuation, Color::new(0.8, 0.1, 0.1));
            // Scatter direction can never be driven to zero
            assert!(result.scattered.direction().length() > 1e-9);
        }
    }

    #[test]
    fn test_metal_mirror_reflection() {
        let mat = Metal::new(Color::ONE, 0.0);
        let rec = hit_at_origin(&mat);
        // 45 degree incidence in the xz plane
        let ray = Ray::new_simple(Vec3::new(-1.0, 0.0, 1.0), Vec3::new(1.0, 0.0, -1.0));
        let mut rng = StdRng::seed_from_u64(7);

        let result = mat.scatter(&ray, &rec, &mut rng).unwrap();
        let dir = result.scattered.direction().normalize();
        let expected = Vec3::new(1.0, 0.0, 1.0).normalize();
        assert!((dir - expected).length() < 1e-9);
    }

    #[test]
    fn test_metal_absorbs_below_horizon() {
        // Grazing incidence with maximum fuzz can push the scattered ray
        // below the surface; the material must then absorb. Sample until we
        // observe both outcomes.
        let mat = Metal::new(Color::ONE, 1.0);
        let rec = hit_at_origin(&mat);
        let ray = Ray::new_simple(Vec3::new(-1.0, 0.0, 0.001), Vec3::new(1.0, 0.0, -0.001));
        let mut rng = StdRng::seed_from_u64(7);

        let mut absorbed = false;
        let mut scattered_up = true;
        for _ in 0..1000 {
            match mat.scatter(&ray, &rec, &mut rng) {
                None => absorbed = true,
                Some(result) => {
                    scattered_up &= result.scattered.direction().dot(rec.normal) > 0.0;
                }
            }
        }
        assert!(absorbed);
        assert!(scattered_up);
    }

    #[test]
    fn test_dielectric_unit_ior_never_reflects_internally() {
        // With ior = 1, sin_theta can never exceed 1, so total internal
        // reflection is impossible; at normal incidence Schlick reflectance
        // is zero too and the ray passes straight through.
        let mat = Dielectric::new(1.0);
        let rec = hit_at_origin(&mat);
        let ray = Ray::new_simple(Vec3::new(0.0, 0.0, 1.0), Vec3::new(0.0, 0.0, -1.0));
        let mut rng = StdRng::seed_from_u64(7);

        let incoming = ray.direction().normalize();
        for _ in 0..100 {
            let result = mat.scatter(&ray, &rec, &mut rng).unwrap();
            let out = result.scattered.direction().normalize();
            assert!((out - incoming).length() < 1e-9);
        }
    }

    #[test]
    fn test_diffuse_light_contract() {
        let mat = DiffuseLight::new(Color::new(4.0, 4.0, 4.0));
        let rec = hit_at_origin(&mat);
        let ray = Ray::new_simple(Vec3::new(0.0, 0.0, 1.0), Vec3::new(0.0, 0.0, -1.0));
        let mut rng = StdRng::seed_from_u64(7);

        assert!(mat.scatter(&ray, &rec, &mut rng).is_none());
        assert_eq!(mat.emitted(0.5, 0.5, Vec3::ZERO), Color::new(4.0, 4.0, 4.0));
    }

    #[test]
    fn test_isotropic_scatters_unit_directions() {
        let mat = Isotropic::new(Color::new(1.0, 1.0, 1.0));
        let rec = hit_at_origin(&mat);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 1.0), Vec3::new(0.0, 0.0, -1.0), 0.25);
        let mut rng = StdRng::seed_from_u64(7);

        let result = mat.scatter(&ray, &rec, &mut rng).unwrap();
        assert!((result.scattered.direction().length() - 1.0).abs() < 1e-9);
        // Scattered ray carries the incoming time for motion blur
        assert_eq!(result.scattered.time(), 0.25);
    }

    #[test]
    fn test_refract_identity_at_unit_ratio() {
        let uv = Vec3::new(0.6, 0.0, -0.8);
        let n = Vec3::new(0.0, 0.0, 1.0);
        let out = refract(uv, n, 1.0);
        assert!((out - uv).length() < 1e-12);
    }

    #[test]
    fn test_reflect_properties() {
        let v = Vec3::new(1.0, -2.0, 0.5);
        let n = Vec3::new(0.0, 1.0, 0.0);
        let r = reflect(v, n);
        // Reflection flips the normal component and preserves length
        assert!((r + v).dot(n) <= 1e-12);
        assert!((r.length() - v.length()).abs() < 1e-12);
    }

    #[test]
    fn test_random_unit_vector_is_unit() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let v = random_unit_vector(&mut rng);
            assert!((v.length() - 1.0).abs() < 1e-12);
        }
    }
}

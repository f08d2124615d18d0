//! Planar quadrilateral primitive, plus box and skybox factories.

use crate::hittable::{HitRecord, Hittable, HittableList};
use crate::material::{DiffuseLight, Material};
use crate::texture::Texture;
use ember_math::{Aabb, Interval, Point3, Ray, Vec3};
use rand::RngCore;
use std::sync::Arc;

/// A parallelogram defined by a corner Q and two edge vectors u, v.
pub struct Quad {
    q: Point3,
    u: Vec3,
    v: Vec3,
    /// n / dot(n, n), used to recover planar coordinates of a hit
    w: Vec3,
    material: Arc<dyn Material>,
    bbox: Aabb,
    normal: Vec3,
    /// Plane offset: dot(normal, Q)
    d: f64,
}

impl Quad {
    /// Create a quad whose normal follows the right-hand rule of u x v.
    pub fn new(q: Point3, u: Vec3, v: Vec3, material: Arc<dyn Material>) -> Self {
        Self::with_orientation(q, u, v, material, false)
    }

    /// Create a quad with the normal flipped inward (for skybox faces).
    pub fn new_inward(q: Point3, u: Vec3, v: Vec3, material: Arc<dyn Material>) -> Self {
        Self::with_orientation(q, u, v, material, true)
    }

    fn with_orientation(
        q: Point3,
        u: Vec3,
        v: Vec3,
        material: Arc<dyn Material>,
        inward_normal: bool,
    ) -> Self {
        let n = u.cross(v);
        let normal = if inward_normal { -n } else { n }.normalize();
        let d = normal.dot(q);
        let w = n / n.dot(n);

        let bbox_diagonal1 = Aabb::from_points(q, q + u + v);
        let bbox_diagonal2 = Aabb::from_points(q + u, q + v);

        Self {
            q,
            u,
            v,
            w,
            material,
            bbox: Aabb::surrounding(&bbox_diagonal1, &bbox_diagonal2),
            normal,
            d,
        }
    }

    /// Whether planar coordinates (alpha, beta) fall inside the shape.
    ///
    /// On success the coordinates become the hit's UV.
    fn is_interior(alpha: f64, beta: f64) -> bool {
        let unit = Interval::new(0.0, 1.0);
        unit.contains(alpha) && unit.contains(beta)
    }
}

impl Hittable for Quad {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        _rng: &mut dyn RngCore,
    ) -> bool {
        let denom = self.normal.dot(ray.direction());

        // No hit if the ray is parallel to the plane
        if denom.abs() < 1e-8 {
            return false;
        }

        // No hit if the intersection parameter is outside the ray interval
        let t = (self.d - self.normal.dot(ray.origin())) / denom;
        if !ray_t.contains(t) {
            return false;
        }

        let intersection = ray.at(t);

        let planar_hitpt = intersection - self.q;
        let alpha = self.w.dot(planar_hitpt.cross(self.v));
        let beta = self.w.dot(self.u.cross(planar_hitpt));

        if !Self::is_interior(alpha, beta) {
            return false;
        }

        rec.t = t;
        rec.p = intersection;
        rec.u = alpha;
        rec.v = beta;
        rec.material = self.material.as_ref();
        rec.set_face_normal(ray, self.normal);

        true
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

/// The six-sided axis-aligned box spanning two opposite corners.
pub fn make_box(a: Point3, b: Point3, material: Arc<dyn Material>) -> HittableList {
    let mut sides = HittableList::new();

    let min = Point3::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z));
    let max = Point3::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z));

    let dx = Vec3::new(max.x - min.x, 0.0, 0.0);
    let dy = Vec3::new(0.0, max.y - min.y, 0.0);
    let dz = Vec3::new(0.0, 0.0, max.z - min.z);

    let side = |q, u, v| -> Arc<dyn Hittable> { Arc::new(Quad::new(q, u, v, material.clone())) };

    sides.add(side(Point3::new(min.x, min.y, max.z), dx, dy)); // front
    sides.add(side(Point3::new(max.x, min.y, max.z), -dz, dy)); // right
    sides.add(side(Point3::new(max.x, min.y, min.z), -dx, dy)); // back
    sides.add(side(Point3::new(min.x, min.y, min.z), dz, dy)); // left
    sides.add(side(Point3::new(min.x, max.y, max.z), dx, -dz)); // top
    sides.add(side(Point3::new(min.x, min.y, min.z), dx, dz)); // bottom

    sides
}

/// A skybox: six inward-facing emissive quads of half-extent `sr` centered
/// on the origin, one image texture per face.
#[allow(clippy::too_many_arguments)]
pub fn cube_map(
    left: Arc<dyn Texture>,
    right: Arc<dyn Texture>,
    front: Arc<dyn Texture>,
    back: Arc<dyn Texture>,
    top: Arc<dyn Texture>,
    bottom: Arc<dyn Texture>,
    sr: f64,
) -> HittableList {
    let mut map = HittableList::new();

    let dx = Vec3::new(2.0 * sr, 0.0, 0.0);
    let dy = Vec3::new(0.0, 2.0 * sr, 0.0);
    let dz = Vec3::new(0.0, 0.0, 2.0 * sr);

    let mut face = |q, u, v, texture: Arc<dyn Texture>| {
        let emitter = Arc::new(DiffuseLight::textured(texture));
        map.add(Arc::new(Quad::new_inward(q, u, v, emitter)));
    };

    face(Point3::new(-sr, -sr, -sr), dz, dy, left);
    face(Point3::new(sr, -sr, -sr), dz, dy, right);
    face(Point3::new(-sr, -sr, sr), dx, dy, front);
    face(Point3::new(-sr, -sr, -sr), dx, dy, back);
    face(Point3::new(-sr, sr, -sr), dx, dz, top);
    face(Point3::new(-sr, -sr, -sr), dx, dz, bottom);

    map
}

//! Ember - CPU Path Tracing
//!
//! A Monte Carlo path tracer for physically-based rendering: spheres with
//! motion blur, quads, triangles, OBJ meshes, constant-density media,
//! object transforms, a BVH, and a defocus-capable camera.

mod bvh;
mod camera;
mod color;
mod hittable;
mod material;
mod medium;
mod mesh;
mod perlin;
mod quad;
mod renderer;
mod sphere;
mod texture;
mod transform;
mod triangle;

pub use bvh::BvhNode;
pub use camera::Camera;
pub use color::{linear_to_gamma, write_color, write_ppm};
pub use hittable::{HitRecord, Hittable, HittableList};
pub use material::{
    gen_f64, random_unit_vector, reflect, refract, Color, Dielectric, DiffuseLight, Isotropic,
    Lambertian, Material, Metal, ScatterResult,
};
pub use medium::ConstantMedium;
pub use mesh::{load_mesh, MeshError};
pub use perlin::Perlin;
pub use quad::{cube_map, make_box, Quad};
pub use renderer::{ray_color, render, render_pixel, render_with_threads, ImageBuffer};
pub use sphere::Sphere;
pub use texture::{CheckerTexture, ImageTexture, NoiseTexture, SolidColor, Texture, TextureError};
pub use transform::{RotateY, Translate};
pub use triangle::Triangle;

/// Re-export common math types
pub use ember_math::{Aabb, Interval, Point3, Ray, Vec3, Vec3Ext};

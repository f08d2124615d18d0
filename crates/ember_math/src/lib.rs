// Re-export glam for convenience. Rendering uses the f64 types throughout.
pub use glam::DVec3 as Vec3;

/// Points and colors share the vector representation; the distinction is
/// advisory.
pub type Point3 = Vec3;

mod aabb;
mod interval;
mod ray;
mod vec;

pub use aabb::Aabb;
pub use interval::Interval;
pub use ray::Ray;
pub use vec::Vec3Ext;

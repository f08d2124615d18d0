// Vector helpers for ray tracing.
//
// Note: glam::DVec3 already provides dot/cross/normalize/length; this
// extension adds only what shading needs on top.

use crate::Vec3;

/// Extension trait for DVec3 with ray-tracing predicates.
pub trait Vec3Ext {
    /// True when every component has magnitude below 1e-8.
    ///
    /// Used to catch degenerate scatter directions before they become
    /// zero-length rays.
    fn near_zero(&self) -> bool;
}

impl Vec3Ext for Vec3 {
    fn near_zero(&self) -> bool {
        const S: f64 = 1e-8;
        self.x.abs() < S && self.y.abs() < S && self.z.abs() < S
    }
}

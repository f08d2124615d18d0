//! Perlin value noise over a 3D lattice.

use ember_math::Point3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const POINT_COUNT: usize = 256;

/// Lattice seed. Fixed so noise textures look the same on every run.
const LATTICE_SEED: u64 = 0x9e3779b97f4a7c15;

/// Value noise: 256 random lattice values indexed through per-axis
/// permutation tables, trilinearly interpolated with Hermite smoothing.
pub struct Perlin {
    rand_float: Vec<f64>,
    perm_x: Vec<usize>,
    perm_y: Vec<usize>,
    perm_z: Vec<usize>,
}

impl Perlin {
    pub fn new() -> Self {
        let mut rng = StdRng::seed_from_u64(LATTICE_SEED);

        let rand_float = (0..POINT_COUNT).map(|_| rng.gen::<f64>()).collect();

        Self {
            rand_float,
            perm_x: Self::generate_perm(&mut rng),
            perm_y: Self::generate_perm(&mut rng),
            perm_z: Self::generate_perm(&mut rng),
        }
    }

    /// Smoothed noise value in [0, 1].
    pub fn noise(&self, p: Point3) -> f64 {
        let u = p.x - p.x.floor();
        let v = p.y - p.y.floor();
        let w = p.z - p.z.floor();

        // Hermite cubic smoothing removes the grid artifacts of straight
        // trilinear interpolation
        let uu = u * u * (3.0 - 2.0 * u);
        let vv = v * v * (3.0 - 2.0 * v);
        let ww = w * w * (3.0 - 2.0 * w);

        let i = p.x.floor() as i64;
        let j = p.y.floor() as i64;
        let k = p.z.floor() as i64;

        let mut accum = 0.0;
        for di in 0..2i64 {
            for dj in 0..2i64 {
                for dk in 0..2i64 {
                    let c = self.rand_float[self.perm_x[((i + di) & 255) as usize]
                        ^ self.perm_y[((j + dj) & 255) as usize]
                        ^ self.perm_z[((k + dk) & 255) as usize]];

                    let du = di as f64;
                    let dv = dj as f64;
                    let dw = dk as f64;
                    accum += (du * uu + (1.0 - du) * (1.0 - uu))
                        * (dv * vv + (1.0 - dv) * (1.0 - vv))
                        * (dw * ww + (1.0 - dw) * (1.0 - ww))
                        * c;
                }
            }
        }

        accum
    }

    /// Turbulence: sum of |noise| at geometrically increasing frequencies.
    pub fn turbulence(&self, p: Point3, depth: u32) -> f64 {
        let mut accum = 0.0;
        let mut temp_p = p;
        let mut weight = 1.0;

        for _ in 0..depth {
            accum += weight * self.noise(temp_p);
            weight *= 0.5;
            temp_p *= 2.0;
        }

        accum.abs()
    }

    fn generate_perm(rng: &mut StdRng) -> Vec<usize> {
        let mut perm: Vec<usize> = (0..POINT_COUNT).collect();

        // Fisher-Yates shuffle
        for i in (1..POINT_COUNT).rev() {
            let target = rng.gen_range(0..=i);
            perm.swap(i, target);
        }

        perm
    }
}

impl Default for Perlin {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_math::Vec3;

    #[test]
    fn test_noise_range() {
        let perlin = Perlin::new();
        for i in 0..200 {
            let p = Vec3::new(i as f64 * 0.173, i as f64 * -0.311, i as f64 * 0.539);
            let n = perlin.noise(p);
            assert!((0.0..=1.0).contains(&n), "noise out of range: {n}");
        }
    }

    #[test]
    fn test_noise_deterministic() {
        let a = Perlin::new();
        let b = Perlin::new();
        let p = Vec3::new(1.3, -2.7, 0.5);
        assert_eq!(a.noise(p), b.noise(p));
    }

    #[test]
    fn test_turbulence_bounded() {
        let perlin = Perlin::new();
        let p = Vec3::new(0.4, 1.9, -3.2);
        let turb = perlin.turbulence(p, 7);
        // Seven octaves of [0,1] noise with halving weights sum below 2
        assert!((0.0..2.0).contains(&turb));
    }
}

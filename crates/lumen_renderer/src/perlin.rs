//! Lattice gradient noise.

use lumen_math::{Point3, Vec3};
use rand::seq::SliceRandom;
use rand::RngCore;

use crate::sampling::random_unit_vector;

const POINT_COUNT: usize = 256;

/// Perlin noise generator: random unit gradients on an integer lattice,
/// hashed through three independent permutation tables.
pub struct Perlin {
    gradients: Vec<Vec3>,
    perm_x: Vec<usize>,
    perm_y: Vec<usize>,
    perm_z: Vec<usize>,
}

impl Perlin {
    pub fn new(rng: &mut dyn RngCore) -> Self {
        let gradients = (0..POINT_COUNT).map(|_| random_unit_vector(rng)).collect();

        Self {
            gradients,
            perm_x: generate_perm(rng),
            perm_y: generate_perm(rng),
            perm_z: generate_perm(rng),
        }
    }

    /// Noise value at `p`, roughly in [-1, 1].
    pub fn noise(&self, p: Point3) -> f64 {
        let floor = p.floor();
        let frac = p - floor;
        let (i, j, k) = (floor.x as i64, floor.y as i64, floor.z as i64);

        let mut c = [[[Vec3::ZERO; 2]; 2]; 2];
        for (di, plane) in c.iter_mut().enumerate() {
            for (dj, row) in plane.iter_mut().enumerate() {
                for (dk, cell) in row.iter_mut().enumerate() {
                    let idx = self.perm_x[lattice(i, di)]
                        ^ self.perm_y[lattice(j, dj)]
                        ^ self.perm_z[lattice(k, dk)];
                    *cell = self.gradients[idx];
                }
            }
        }

        perlin_interp(&c, frac)
    }

    /// Turbulence: absolute sum of `depth` octaves, each at double the
    /// frequency and half the weight of the previous one.
    pub fn turb(&self, p: Point3, depth: u32) -> f64 {
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
}

#[inline]
fn lattice(base: i64, offset: usize) -> usize {
    ((base + offset as i64) & (POINT_COUNT as i64 - 1)) as usize
}

fn generate_perm(rng: &mut dyn RngCore) -> Vec<usize> {
    let mut perm: Vec<usize> = (0..POINT_COUNT).collect();
    perm.shuffle(rng);
    perm
}

/// Trilinear blend of the corner gradients' contributions, with Hermite
/// smoothing of the fractional coordinates.
fn perlin_interp(c: &[[[Vec3; 2]; 2]; 2], frac: Vec3) -> f64 {
    let smooth = frac * frac * (Vec3::splat(3.0) - 2.0 * frac);
    let mut accum = 0.0;

    for (i, plane) in c.iter().enumerate() {
        for (j, row) in plane.iter().enumerate() {
            for (k, gradient) in row.iter().enumerate() {
                let corner = Vec3::new(i as f64, j as f64, k as f64);
                let weight_v = frac - corner;
                let blend = corner * smooth + (Vec3::ONE - corner) * (Vec3::ONE - smooth);
                accum += blend.x * blend.y * blend.z * gradient.dot(weight_v);
            }
        }
    }

    accum
}

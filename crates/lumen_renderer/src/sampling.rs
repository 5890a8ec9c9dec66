//! Random sampling and vector helpers shared by the camera and materials.
//!
//! Every function takes the generator explicitly. Workers own their
//! generators; nothing here touches global random state.

use lumen_math::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

/// Uniform f64 in [0, 1).
#[inline]
pub fn random_f64(rng: &mut dyn RngCore) -> f64 {
    rng.gen()
}

/// Uniform f64 in [min, max).
#[inline]
pub fn random_range(rng: &mut dyn RngCore, min: f64, max: f64) -> f64 {
    min + (max - min) * random_f64(rng)
}

/// Vector with each component uniform in [min, max).
pub fn random_vec_range(rng: &mut dyn RngCore, min: f64, max: f64) -> Vec3 {
    Vec3::new(
        random_range(rng, min, max),
        random_range(rng, min, max),
        random_range(rng, min, max),
    )
}

/// Generate a random unit vector on the unit sphere.
pub fn random_unit_vector(rng: &mut dyn RngCore) -> Vec3 {
    // Rejection sampling for uniform distribution on sphere
    loop {
        let v = random_vec_range(rng, -1.0, 1.0);
        let len_sq = v.length_squared();
        if len_sq > 1e-160 && len_sq <= 1.0 {
            return v / len_sq.sqrt();
        }
    }
}

/// Sample a random point in the unit disk (z = 0).
pub fn random_in_unit_disk(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = Vec3::new(
            random_range(rng, -1.0, 1.0),
            random_range(rng, -1.0, 1.0),
            0.0,
        );
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}

/// Sample a random point in the unit square [-0.5, 0.5] x [-0.5, 0.5].
pub fn sample_square(rng: &mut dyn RngCore) -> Vec3 {
    Vec3::new(random_f64(rng) - 0.5, random_f64(rng) - 0.5, 0.0)
}

/// Random point inside sub-cell (s_i, s_j) of a pixel split into a grid of
/// cells `recip_sqrt_spp` wide, relative to the pixel center.
pub fn sample_square_stratified(
    s_i: u32,
    s_j: u32,
    recip_sqrt_spp: f64,
    rng: &mut dyn RngCore,
) -> Vec3 {
    let px = ((s_i as f64 + random_f64(rng)) * recip_sqrt_spp) - 0.5;
    let py = ((s_j as f64 + random_f64(rng)) * recip_sqrt_spp) - 0.5;
    Vec3::new(px, py, 0.0)
}

/// True if every component is close to zero.
#[inline]
pub fn near_zero(v: Vec3) -> bool {
    const S: f64 = 1e-8;
    v.x.abs() < S && v.y.abs() < S && v.z.abs() < S
}

/// Reflect a vector about a normal.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract a unit vector through a surface.
#[inline]
pub fn refract(uv: Vec3, n: Vec3, etai_over_etat: f64) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}

/// Deterministic generator for one scanline of one render.
///
/// Seeding per row instead of per thread keeps the output identical no
/// matter which worker claims which rows.
pub fn row_rng(seed: u64, row: usize) -> StdRng {
    let mix = (row as u64).wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    StdRng::seed_from_u64(seed ^ mix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_unit_vector_is_unit() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..1000 {
            let v = random_unit_vector(&mut rng);
            assert!((v.length() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_random_in_unit_disk() {
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..1000 {
            let p = random_in_unit_disk(&mut rng);
            assert!(p.length_squared() < 1.0);
            assert_eq!(p.z, 0.0);
        }
    }

    #[test]
    fn test_stratified_sample_stays_in_cell() {
        let mut rng = StdRng::seed_from_u64(3);
        let recip = 1.0 / 4.0;
        for _ in 0..100 {
            let p = sample_square_stratified(1, 3, recip, &mut rng);
            assert!(p.x >= -0.25 && p.x < 0.0);
            assert!(p.y >= 0.25 && p.y < 0.5);
        }
    }

    #[test]
    fn test_reflect() {
        let v = Vec3::new(1.0, -1.0, 0.0);
        let n = Vec3::Y;
        assert_eq!(reflect(v, n), Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_refract_straight_through() {
        let v = Vec3::new(0.0, -1.0, 0.0);
        let r = refract(v, Vec3::Y, 1.0 / 1.5);
        assert!((r - v).length() < 1e-12);
    }

    #[test]
    fn test_near_zero() {
        assert!(near_zero(Vec3::splat(1e-9)));
        assert!(!near_zero(Vec3::new(0.0, 1e-7, 0.0)));
    }

    #[test]
    fn test_row_rng_is_deterministic() {
        let mut a = row_rng(9, 5);
        let mut b = row_rng(9, 5);
        let first = a.next_u64();
        assert_eq!(first, b.next_u64());
        for _ in 0..4 {
            assert_eq!(a.next_u64(), b.next_u64());
        }

        let mut other = row_rng(9, 6);
        assert_ne!(first, other.next_u64());
    }
}

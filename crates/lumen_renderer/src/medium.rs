//! Constant-density participating media (smoke, fog).

use std::sync::Arc;

use crate::hittable::{HitRecord, Hittable};
use crate::material::Isotropic;
use crate::sampling::random_f64;
use crate::texture::{SolidColor, Texture};
use lumen_math::{Aabb, Color, Interval, Ray, Vec3};
use rand::RngCore;

/// Gap between the entry and exit searches, so the exit search does not
/// find the entry point again.
const EXIT_EPSILON: f64 = 0.0001;

/// A volume of uniform density filling a convex boundary.
///
/// Rays passing through scatter at an exponentially distributed distance;
/// the scatter direction comes from an isotropic phase function.
pub struct ConstantMedium {
    boundary: Arc<dyn Hittable>,
    /// `-1 / density`, `None` when the density cannot scatter
    neg_inv_density: Option<f64>,
    phase_function: Isotropic,
}

impl ConstantMedium {
    pub fn new(boundary: Arc<dyn Hittable>, density: f64, texture: Arc<dyn Texture>) -> Self {
        let neg_inv_density = if density.is_finite() && density > 0.0 {
            Some(-1.0 / density)
        } else {
            log::warn!("Medium density {} never scatters", density);
            None
        };

        Self {
            boundary,
            neg_inv_density,
            phase_function: Isotropic::textured(texture),
        }
    }

    pub fn with_color(boundary: Arc<dyn Hittable>, density: f64, albedo: Color) -> Self {
        Self::new(boundary, density, Arc::new(SolidColor::new(albedo)))
    }
}

impl Hittable for ConstantMedium {
    fn hit(&self, ray: &Ray, ray_t: Interval, rng: &mut dyn RngCore) -> Option<HitRecord<'_>> {
        let neg_inv_density = self.neg_inv_density?;

        let entry = self.boundary.hit(ray, Interval::UNIVERSE, rng)?;
        let exit = self
            .boundary
            .hit(ray, Interval::new(entry.t + EXIT_EPSILON, f64::INFINITY), rng)?;

        let t_enter = entry.t.max(ray_t.min);
        let t_exit = exit.t.min(ray_t.max);
        if t_enter >= t_exit {
            return None;
        }
        let t_enter = t_enter.max(0.0);

        let ray_length = ray.direction().length();
        if ray_length == 0.0 {
            return None;
        }
        let distance_inside_boundary = (t_exit - t_enter) * ray_length;
        let hit_distance = neg_inv_density * random_f64(rng).ln();

        if hit_distance > distance_inside_boundary {
            return None;
        }

        let t = t_enter + hit_distance / ray_length;
        Some(HitRecord {
            p: ray.at(t),
            // Arbitrary: the phase function ignores orientation
            normal: Vec3::X,
            material: &self.phase_function,
            u: 0.0,
            v: 0.0,
            t,
            front_face: true,
        })
    }

    fn bounding_box(&self) -> Aabb {
        self.boundary.bounding_box()
    }
}

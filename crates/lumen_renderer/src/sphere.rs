//! Sphere primitive for ray tracing.

use std::f64::consts::PI;
use std::sync::Arc;

use crate::{
    hittable::{HitRecord, Hittable},
    Material,
};
use lumen_math::{Aabb, Interval, Ray, Vec3};
use rand::RngCore;

/// A sphere primitive, either static or moving linearly over the shutter
/// interval [0, 1].
pub struct Sphere {
    /// Center path: `center.at(time)` is the center at a given ray time
    center: Ray,
    radius: f64,
    material: Arc<dyn Material>,
    bbox: Aabb,
}

impl Sphere {
    /// Create a stationary sphere.
    pub fn new(center: Vec3, radius: f64, material: Arc<dyn Material>) -> Self {
        let radius = radius.max(0.0);
        let rvec = Vec3::splat(radius);
        let bbox = Aabb::from_points(center - rvec, center + rvec);

        Self {
            center: Ray::new(center, Vec3::ZERO, 0.0),
            radius,
            material,
            bbox,
        }
    }

    /// Create a sphere moving from `center1` at time 0 to `center2` at time 1.
    pub fn moving(center1: Vec3, center2: Vec3, radius: f64, material: Arc<dyn Material>) -> Self {
        let radius = radius.max(0.0);
        let center = Ray::new(center1, center2 - center1, 0.0);
        let rvec = Vec3::splat(radius);
        let box1 = Aabb::from_points(center.at(0.0) - rvec, center.at(0.0) + rvec);
        let box2 = Aabb::from_points(center.at(1.0) - rvec, center.at(1.0) + rvec);

        Self {
            center,
            radius,
            material,
            bbox: Aabb::surrounding(&box1, &box2),
        }
    }

    /// Get the UV coordinates for a point on the unit sphere.
    ///
    /// u: angle around the Y axis from X=-1, v: angle from Y=-1 to Y=+1,
    /// both mapped to [0, 1].
    fn get_sphere_uv(p: Vec3) -> (f64, f64) {
        let theta = (-p.y).acos();
        let phi = (-p.z).atan2(p.x) + PI;

        (phi / (2.0 * PI), theta / PI)
    }
}

impl Hittable for Sphere {
    fn hit(&self, ray: &Ray, ray_t: Interval, _rng: &mut dyn RngCore) -> Option<HitRecord<'_>> {
        if self.radius <= 0.0 {
            return None;
        }

        let current_center = self.center.at(ray.time());
        let oc = current_center - ray.origin();
        let a = ray.direction().length_squared();
        if a == 0.0 {
            return None;
        }
        let h = ray.direction().dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();

        // Find the nearest root in the acceptable range
        let mut root = (h - sqrtd) / a;
        if !ray_t.surrounds(root) {
            root = (h + sqrtd) / a;
            if !ray_t.surrounds(root) {
                return None;
            }
        }

        let outward_normal = (ray.at(root) - current_center) / self.radius;
        Some(HitRecord::new(
            ray,
            root,
            outward_normal,
            self.material.as_ref(),
            Self::get_sphere_uv(outward_normal),
        ))
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Lambertian;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn gray() -> Arc<dyn Material> {
        Arc::new(Lambertian::new(Vec3::splat(0.5)))
    }

    fn forward() -> Interval {
        Interval::new(0.0, f64::INFINITY)
    }

    #[test]
    fn test_sphere_hit() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, gray());
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), 0.0);
        let mut rng = StdRng::seed_from_u64(0);

        let rec = sphere.hit(&ray, Interval::new(0.001, f64::INFINITY), &mut rng).unwrap();
        assert!((rec.t - 0.5).abs() < 1e-9);
        assert!(rec.front_face);
        assert!((rec.normal - Vec3::Z).length() < 1e-9);
    }

    #[test]
    fn test_sphere_miss() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, gray());
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0), 0.0);
        let mut rng = StdRng::seed_from_u64(0);

        assert!(sphere.hit(&ray, forward(), &mut rng).is_none());
    }

    #[test]
    fn test_origin_on_surface() {
        let sphere = Sphere::new(Vec3::ZERO, 1.0, gray());
        let mut rng = StdRng::seed_from_u64(0);
        let on_surface = Vec3::new(1.0, 0.0, 0.0);

        // Leaving along the normal: the only roots are t=0 and t<0
        let outward = Ray::new(on_surface, Vec3::X, 0.0);
        assert!(sphere.hit(&outward, forward(), &mut rng).is_none());

        // Entering: the far root is taken, from the inside
        let inward = Ray::new(on_surface, -Vec3::X, 0.0);
        let rec = sphere.hit(&inward, forward(), &mut rng).unwrap();
        assert!((rec.t - 2.0).abs() < 1e-9);
        assert!(!rec.front_face);
        assert!((rec.normal - Vec3::X).length() < 1e-9);
    }

    #[test]
    fn test_nearest_root_selected() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -5.0), 1.0, gray());
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), 0.0);
        let mut rng = StdRng::seed_from_u64(0);

        let near = sphere.hit(&ray, forward(), &mut rng).unwrap();
        assert!((near.t - 4.0).abs() < 1e-9);

        // Near root excluded by the range, far root remains
        let far = sphere.hit(&ray, Interval::new(4.5, 100.0), &mut rng).unwrap();
        assert!((far.t - 6.0).abs() < 1e-9);

        assert!(sphere.hit(&ray, Interval::new(0.0, 3.0), &mut rng).is_none());
    }

    #[test]
    fn test_degenerate_inputs_do_not_hit() {
        let mut rng = StdRng::seed_from_u64(0);

        let point = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.0, gray());
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), 0.0);
        assert!(point.hit(&ray, forward(), &mut rng).is_none());

        let negative = Sphere::new(Vec3::new(0.0, 0.0, -1.0), -2.0, gray());
        assert!(negative.hit(&ray, forward(), &mut rng).is_none());

        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, gray());
        let stalled = Ray::new(Vec3::ZERO, Vec3::ZERO, 0.0);
        assert!(sphere.hit(&stalled, forward(), &mut rng).is_none());
    }

    #[test]
    fn test_moving_sphere_follows_time() {
        let sphere = Sphere::moving(Vec3::new(0.0, 0.0, -2.0), Vec3::new(4.0, 0.0, -2.0), 0.5, gray());
        let mut rng = StdRng::seed_from_u64(0);

        let at_start = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), 0.0);
        assert!(sphere.hit(&at_start, forward(), &mut rng).is_some());

        let at_end = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), 1.0);
        assert!(sphere.hit(&at_end, forward(), &mut rng).is_none());

        let chasing = Ray::new(Vec3::new(4.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -1.0), 1.0);
        assert!(sphere.hit(&chasing, forward(), &mut rng).is_some());

        let bbox = sphere.bounding_box();
        assert!((bbox.x.min + 0.5).abs() < 1e-9);
        assert!((bbox.x.max - 4.5).abs() < 1e-9);
    }

    #[test]
    fn test_sphere_uv() {
        let (u, v) = Sphere::get_sphere_uv(Vec3::new(1.0, 0.0, 0.0));
        assert!((u - 0.5).abs() < 1e-9 && (v - 0.5).abs() < 1e-9);

        let (u, v) = Sphere::get_sphere_uv(Vec3::new(0.0, 1.0, 0.0));
        assert!((u - 0.5).abs() < 1e-9 && (v - 1.0).abs() < 1e-9);

        let (u, v) = Sphere::get_sphere_uv(Vec3::new(0.0, 0.0, 1.0));
        assert!((u - 0.25).abs() < 1e-9 && (v - 0.5).abs() < 1e-9);
    }
}

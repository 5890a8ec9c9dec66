//! Hittable trait and HitRecord for ray-object intersection.

use std::sync::Arc;

use crate::Material;
use lumen_math::{Aabb, Interval, Ray, Vec3};
use rand::RngCore;

/// Record of a ray-object intersection.
#[derive(Clone, Copy)]
pub struct HitRecord<'a> {
    /// Point of intersection
    pub p: Vec3,
    /// Surface normal at intersection (always points against ray)
    pub normal: Vec3,
    /// Material at the intersection point, borrowed from the scene
    pub material: &'a dyn Material,
    /// UV texture coordinates
    pub u: f64,
    pub v: f64,
    /// Parameter t where the intersection occurs
    pub t: f64,
    /// Whether the ray hit the front face (outside) of the surface
    pub front_face: bool,
}

impl<'a> HitRecord<'a> {
    /// Build a record for a hit at `t`, orienting `outward_normal` against
    /// the ray.
    pub fn new(
        ray: &Ray,
        t: f64,
        outward_normal: Vec3,
        material: &'a dyn Material,
        (u, v): (f64, f64),
    ) -> Self {
        let mut rec = Self {
            p: ray.at(t),
            normal: outward_normal,
            material,
            u,
            v,
            t,
            front_face: true,
        };
        rec.set_face_normal(ray, outward_normal);
        rec
    }

    /// Set the face normal based on ray direction and outward normal.
    ///
    /// The normal is always stored pointing against the ray direction,
    /// so we need to track whether we hit the front or back face.
    pub fn set_face_normal(&mut self, ray: &Ray, outward_normal: Vec3) {
        // If the ray and normal point in the same direction, we're inside
        self.front_face = ray.direction().dot(outward_normal) < 0.0;

        self.normal = if self.front_face {
            outward_normal
        } else {
            -outward_normal
        };
    }
}

/// Trait for objects that can be hit by rays.
///
/// Scenes are immutable once built and shared by every render worker.
pub trait Hittable: Send + Sync {
    /// Find the nearest intersection with `ray` whose parameter lies in
    /// `ray_t`.
    ///
    /// `rng` is the calling worker's generator, used by primitives whose
    /// intersection is stochastic (participating media).
    fn hit(&self, ray: &Ray, ray_t: Interval, rng: &mut dyn RngCore) -> Option<HitRecord<'_>>;

    /// Get the axis-aligned bounding box of this object.
    fn bounding_box(&self) -> Aabb;
}

/// A list of hittable objects.
///
/// Children are reference counted so the same object can sit in several
/// lists or behind several transforms.
#[derive(Clone)]
pub struct HittableList {
    objects: Vec<Arc<dyn Hittable>>,
    bbox: Aabb,
}

impl HittableList {
    /// Create a new empty hittable list.
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            bbox: Aabb::EMPTY,
        }
    }

    /// Add a shared object to the list.
    pub fn add(&mut self, object: Arc<dyn Hittable>) {
        self.bbox = Aabb::surrounding(&self.bbox, &object.bounding_box());
        self.objects.push(object);
    }

    /// Add an owned object to the list.
    pub fn push<H: Hittable + 'static>(&mut self, object: H) {
        self.add(Arc::new(object));
    }

    /// Clear all objects from the list.
    pub fn clear(&mut self) {
        self.objects.clear();
        self.bbox = Aabb::EMPTY;
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn objects(&self) -> &[Arc<dyn Hittable>] {
        &self.objects
    }

    pub fn into_objects(self) -> Vec<Arc<dyn Hittable>> {
        self.objects
    }
}

impl Default for HittableList {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: Hittable + 'static> FromIterator<H> for HittableList {
    fn from_iter<I: IntoIterator<Item = H>>(iter: I) -> Self {
        let mut list = HittableList::new();
        for object in iter {
            list.push(object);
        }
        list
    }
}

impl Hittable for HittableList {
    fn hit(&self, ray: &Ray, ray_t: Interval, rng: &mut dyn RngCore) -> Option<HitRecord<'_>> {
        let mut closest = None;
        let mut closest_so_far = ray_t.max;

        for object in &self.objects {
            let interval = Interval::new(ray_t.min, closest_so_far);
            if let Some(rec) = object.hit(ray, interval, rng) {
                closest_so_far = rec.t;
                closest = Some(rec);
            }
        }

        closest
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Lambertian, Sphere};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sphere_at(z: f64) -> Sphere {
        Sphere::new(
            Vec3::new(0.0, 0.0, z),
            0.5,
            Arc::new(Lambertian::new(Vec3::splat(0.5))),
        )
    }

    #[test]
    fn test_list_returns_closest_hit() {
        // Far sphere added first so the range has to shrink
        let list: HittableList = [sphere_at(-5.0), sphere_at(-2.0)].into_iter().collect();
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), 0.0);
        let mut rng = StdRng::seed_from_u64(0);

        let rec = list
            .hit(&ray, Interval::new(0.001, f64::INFINITY), &mut rng)
            .unwrap();
        assert!((rec.t - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_list_bounding_box_merges_children() {
        let list: HittableList = [sphere_at(-5.0), sphere_at(-2.0)].into_iter().collect();
        let bbox = list.bounding_box();

        assert!((bbox.z.min + 5.5).abs() < 1e-9);
        assert!((bbox.z.max + 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_empty_list_misses() {
        let list = HittableList::new();
        let ray = Ray::new(Vec3::ZERO, Vec3::Z, 0.0);
        let mut rng = StdRng::seed_from_u64(0);

        assert!(list.is_empty());
        assert!(list.hit(&ray, Interval::UNIVERSE, &mut rng).is_none());
        assert_eq!(list.bounding_box(), Aabb::EMPTY);
    }

    #[test]
    fn test_face_normal_orientation() {
        let mat = Lambertian::new(Vec3::ONE);
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), 0.0);

        let front = HitRecord::new(&ray, 1.0, Vec3::Z, &mat, (0.0, 0.0));
        assert!(front.front_face);
        assert_eq!(front.normal, Vec3::Z);

        let back = HitRecord::new(&ray, 1.0, -Vec3::Z, &mat, (0.0, 0.0));
        assert!(!back.front_face);
        assert_eq!(back.normal, Vec3::Z);
    }
}

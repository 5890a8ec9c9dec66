//! Transform wrappers that place a shared hittable in the world.
//!
//! Rays are moved into the wrapped object's space, intersected there, and
//! the hit is moved back. Bounding boxes are computed once at construction.

use std::sync::Arc;

use crate::hittable::{HitRecord, Hittable};
use lumen_math::{Aabb, Interval, Mat3, Mat3Ext, Ray, Vec3};
use rand::RngCore;

/// Rigid translation of a hittable.
pub struct Translate {
    object: Arc<dyn Hittable>,
    offset: Vec3,
    bbox: Aabb,
}

impl Translate {
    pub fn new(object: Arc<dyn Hittable>, offset: Vec3) -> Self {
        let bbox = object.bounding_box().translate(offset);
        Self {
            object,
            offset,
            bbox,
        }
    }
}

impl Hittable for Translate {
    fn hit(&self, ray: &Ray, ray_t: Interval, rng: &mut dyn RngCore) -> Option<HitRecord<'_>> {
        let offset_ray = Ray::new(ray.origin() - self.offset, ray.direction(), ray.time());

        let mut rec = self.object.hit(&offset_ray, ray_t, rng)?;
        rec.p += self.offset;
        Some(rec)
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

/// Rotation of a hittable about an axis through the origin.
pub struct Rotate {
    object: Arc<dyn Hittable>,
    /// Object space to world space
    rotation: Mat3,
    /// World space to object space
    inverse: Mat3,
    bbox: Aabb,
}

impl Rotate {
    /// Rotate by `degrees` about `axis`. A zero axis leaves the object as is.
    pub fn new(object: Arc<dyn Hittable>, axis: Vec3, degrees: f64) -> Self {
        let rotation = match axis.try_normalize() {
            Some(axis) => Mat3::from_axis_angle(axis, degrees.to_radians()),
            None => Mat3::IDENTITY,
        };
        let bbox = rotation.transform_aabb(&object.bounding_box());

        Self {
            object,
            rotation,
            // Orthonormal, so the transpose is the inverse
            inverse: rotation.transpose(),
            bbox,
        }
    }

    /// Rotate by `degrees` about the Y axis.
    pub fn y(object: Arc<dyn Hittable>, degrees: f64) -> Self {
        Self::new(object, Vec3::Y, degrees)
    }
}

impl Hittable for Rotate {
    fn hit(&self, ray: &Ray, ray_t: Interval, rng: &mut dyn RngCore) -> Option<HitRecord<'_>> {
        let rotated = Ray::new(
            self.inverse * ray.origin(),
            self.inverse * ray.direction(),
            ray.time(),
        );

        let mut rec = self.object.hit(&rotated, ray_t, rng)?;
        rec.p = self.rotation * rec.p;
        rec.normal = self.rotation * rec.normal;
        Some(rec)
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

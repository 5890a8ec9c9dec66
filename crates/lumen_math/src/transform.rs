// Transform utilities for DMat3
//
// Extends glam's DMat3 with the bounding-box helper the instance wrappers
// need. glam already provides `mul_vec3`, `transpose` and `from_axis_angle`.

use crate::{Aabb, Mat3};

/// Extension trait for Mat3 to provide additional transform utilities
pub trait Mat3Ext {
    /// Transform an axis-aligned bounding box.
    /// Computes the bounding box of all 8 transformed corners.
    fn transform_aabb(&self, aabb: &Aabb) -> Aabb;
}

impl Mat3Ext for Mat3 {
    fn transform_aabb(&self, aabb: &Aabb) -> Aabb {
        // Infinite corners would turn into NaN under rotation
        if aabb.is_empty() {
            return Aabb::EMPTY;
        }

        let corners = aabb.corners();
        let first = self.mul_vec3(corners[0]);

        let (min, max) = corners[1..]
            .iter()
            .map(|&corner| self.mul_vec3(corner))
            .fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p)));

        Aabb::from_points(min, max)
    }
}

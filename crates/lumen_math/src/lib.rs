//! Lumen math - vectors, intervals, bounding boxes and rays.
//!
//! All geometry is double precision. `Vec3` is glam's `DVec3` and doubles
//! as a point and an RGB color.

// Re-export glam for convenience
pub use glam;
pub use glam::{DMat3 as Mat3, DVec3 as Vec3};

mod aabb;
mod interval;
mod ray;
mod transform;

pub use aabb::Aabb;
pub use interval::Interval;
pub use ray::Ray;
pub use transform::Mat3Ext;

/// RGB color with linear components, nominally in [0, 1].
pub type Color = Vec3;

/// A position in world or object space.
pub type Point3 = Vec3;

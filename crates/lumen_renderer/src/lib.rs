//! Lumen renderer - CPU path tracing
//!
//! A Monte Carlo path tracer over an immutable scene of primitives,
//! materials and textures. Scenes are built from [`Hittable`] values shared
//! through `Arc`, usually gathered into a [`BvhNode`]; a [`Camera`] turns a
//! [`CameraConfig`] into rays, and [`render`] distributes scanlines over a
//! thread pool into an [`ImageBuffer`].

pub mod bvh;
pub mod camera;
pub mod hittable;
pub mod instance;
pub mod material;
pub mod medium;
pub mod perlin;
pub mod planar;
pub mod renderer;
pub mod sampling;
pub mod scanline;
pub mod sphere;
pub mod texture;

pub use bvh::BvhNode;
pub use camera::{Camera, CameraConfig, MAX_IMAGE_DIMENSION};
pub use hittable::{HitRecord, Hittable, HittableList};
pub use instance::{Rotate, Translate};
pub use material::{Dielectric, DiffuseLight, Isotropic, Lambertian, Material, Metal, ScatterResult};
pub use medium::ConstantMedium;
pub use perlin::Perlin;
pub use planar::{cuboid, Quad, Triangle};
pub use renderer::{
    color_to_rgb8, linear_to_gamma, ray_color, render, render_pixel, ImageBuffer, RenderOptions,
};
pub use scanline::{BlockCursor, RowBlock, DEFAULT_BLOCK_ROWS};
pub use sphere::Sphere;
pub use texture::{CheckerTexture, ImageTexture, NoiseTexture, SolidColor, Texture};

/// Re-export the math types scenes are written in
pub use lumen_math::{Aabb, Color, Interval, Point3, Ray, Vec3};

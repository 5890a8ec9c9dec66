//! Camera for ray generation.
//!
//! A [`CameraConfig`] holds the user-facing view settings; [`Camera::new`]
//! validates it and precomputes the viewport, after which the camera only
//! hands out rays.

use lumen_math::{Color, Point3, Ray, Vec3};
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::sampling::{random_f64, random_in_unit_disk, sample_square, sample_square_stratified};

/// Largest image width or height accepted; larger values are clamped.
pub const MAX_IMAGE_DIMENSION: u32 = 1 << 16;

/// View and quality settings for a render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Ratio of image width over height
    pub aspect_ratio: f64,
    /// Rendered image width in pixels
    pub image_width: u32,
    /// Random samples per pixel
    pub samples_per_pixel: u32,
    /// Maximum number of ray bounces
    pub max_depth: u32,
    /// Radiance returned by rays that escape the scene
    pub background: Color,

    /// Vertical field of view in degrees
    pub vfov: f64,
    pub look_from: Point3,
    pub look_at: Point3,
    /// Camera-relative "up" direction
    pub vup: Vec3,

    /// Variation angle of rays through each pixel, in degrees
    pub defocus_angle: f64,
    /// Distance from `look_from` to the plane of perfect focus
    pub focus_dist: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            aspect_ratio: 1.0,
            image_width: 100,
            samples_per_pixel: 10,
            max_depth: 10,
            background: Color::new(0.70, 0.80, 1.00),
            vfov: 90.0,
            look_from: Point3::ZERO,
            look_at: Point3::new(0.0, 0.0, -1.0),
            vup: Vec3::Y,
            defocus_angle: 0.0,
            focus_dist: 10.0,
        }
    }
}

impl CameraConfig {
    /// Set image width and aspect ratio.
    pub fn with_image(mut self, image_width: u32, aspect_ratio: f64) -> Self {
        self.image_width = image_width;
        self.aspect_ratio = aspect_ratio;
        self
    }

    /// Set quality settings.
    pub fn with_quality(mut self, samples_per_pixel: u32, max_depth: u32) -> Self {
        self.samples_per_pixel = samples_per_pixel;
        self.max_depth = max_depth;
        self
    }

    /// Set camera position.
    pub fn with_position(mut self, look_from: Point3, look_at: Point3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self
    }

    /// Set lens settings.
    pub fn with_lens(mut self, vfov: f64, defocus_angle: f64, focus_dist: f64) -> Self {
        self.vfov = vfov;
        self.defocus_angle = defocus_angle;
        self.focus_dist = focus_dist;
        self
    }

    /// Set background color.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }

    /// Copy of this configuration with out-of-range values replaced by safe
    /// ones. Every replacement is logged.
    pub fn sanitized(&self) -> Self {
        let mut config = self.clone();

        if config.image_width < 1 {
            log::warn!("Image width {} clamped to 1", config.image_width);
            config.image_width = 1;
        }
        if config.image_width > MAX_IMAGE_DIMENSION {
            log::warn!("Image width {} clamped to {}", config.image_width, MAX_IMAGE_DIMENSION);
            config.image_width = MAX_IMAGE_DIMENSION;
        }
        if config.samples_per_pixel < 1 {
            log::warn!("Samples per pixel {} clamped to 1", config.samples_per_pixel);
            config.samples_per_pixel = 1;
        }
        if !(config.aspect_ratio.is_finite() && config.aspect_ratio > 0.0) {
            log::warn!("Aspect ratio {} replaced by 1.0", config.aspect_ratio);
            config.aspect_ratio = 1.0;
        }
        let min_aspect = config.image_width as f64 / MAX_IMAGE_DIMENSION as f64;
        if config.aspect_ratio < min_aspect {
            log::warn!(
                "Aspect ratio {} raised to {} to keep the image height within {}",
                config.aspect_ratio,
                min_aspect,
                MAX_IMAGE_DIMENSION
            );
            config.aspect_ratio = min_aspect;
        }
        if !(config.focus_dist.is_finite() && config.focus_dist > 0.0) {
            log::warn!("Focus distance {} replaced by 1.0", config.focus_dist);
            config.focus_dist = 1.0;
        }
        if !(config.vfov.is_finite() && config.vfov > 0.0 && config.vfov < 180.0) {
            let vfov = if config.vfov.is_nan() { 90.0 } else { config.vfov.clamp(1e-3, 179.9) };
            log::warn!("Vertical field of view {} replaced by {}", config.vfov, vfov);
            config.vfov = vfov;
        }
        if !config.defocus_angle.is_finite() {
            log::warn!("Defocus angle {} replaced by 0", config.defocus_angle);
            config.defocus_angle = 0.0;
        }

        config
    }
}

/// Camera for generating rays into the scene.
#[derive(Debug, Clone)]
pub struct Camera {
    config: CameraConfig,

    image_height: u32,
    /// Side of the stratified sample grid
    sqrt_spp: u32,
    recip_sqrt_spp: f64,

    center: Point3,
    pixel00_loc: Point3,
    pixel_delta_u: Vec3,
    pixel_delta_v: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
    defocus_disk_u: Vec3,
    defocus_disk_v: Vec3,
}

impl Camera {
    /// Validate `config` and precompute the viewport.
    pub fn new(config: CameraConfig) -> Self {
        let config = config.sanitized();

        let image_height =
            ((config.image_width as f64 / config.aspect_ratio) as u32).clamp(1, MAX_IMAGE_DIMENSION);
        let sqrt_spp = ((config.samples_per_pixel as f64).sqrt() as u32).max(1);
        let center = config.look_from;

        // Viewport dimensions
        let theta = config.vfov.to_radians();
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h * config.focus_dist;
        let viewport_width = viewport_height * (config.image_width as f64 / image_height as f64);

        // Orthonormal camera basis; degenerate inputs fall back to any frame
        let w = (config.look_from - config.look_at)
            .try_normalize()
            .unwrap_or(Vec3::Z);
        let u = config
            .vup
            .cross(w)
            .try_normalize()
            .unwrap_or_else(|| w.any_orthonormal_vector());
        let v = w.cross(u);

        // Vectors across the horizontal and down the vertical viewport edges
        let viewport_u = viewport_width * u;
        let viewport_v = viewport_height * -v;

        let pixel_delta_u = viewport_u / config.image_width as f64;
        let pixel_delta_v = viewport_v / image_height as f64;

        let viewport_upper_left =
            center - config.focus_dist * w - viewport_u / 2.0 - viewport_v / 2.0;
        let pixel00_loc = viewport_upper_left + 0.5 * (pixel_delta_u + pixel_delta_v);

        let defocus_radius = config.focus_dist * (config.defocus_angle / 2.0).to_radians().tan();

        log::debug!(
            "Camera initialized: {}x{}, {} samples per pixel ({}x{} strata), max depth {}",
            config.image_width,
            image_height,
            config.samples_per_pixel,
            sqrt_spp,
            sqrt_spp,
            config.max_depth
        );

        Self {
            image_height,
            sqrt_spp,
            recip_sqrt_spp: 1.0 / sqrt_spp as f64,
            center,
            pixel00_loc,
            pixel_delta_u,
            pixel_delta_v,
            u,
            v,
            w,
            defocus_disk_u: u * defocus_radius,
            defocus_disk_v: v * defocus_radius,
            config,
        }
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    pub fn image_width(&self) -> u32 {
        self.config.image_width
    }

    pub fn image_height(&self) -> u32 {
        self.image_height
    }

    pub fn max_depth(&self) -> u32 {
        self.config.max_depth
    }

    pub fn background(&self) -> Color {
        self.config.background
    }

    /// Side of the stratified sample grid, `floor(sqrt(spp))` and at least 1.
    pub fn sqrt_spp(&self) -> u32 {
        self.sqrt_spp
    }

    /// Number of samples actually taken per pixel.
    pub fn samples_per_pixel(&self, stratified: bool) -> u32 {
        if stratified {
            self.sqrt_spp * self.sqrt_spp
        } else {
            self.config.samples_per_pixel
        }
    }

    /// Camera frame: right, up and backward unit vectors.
    pub fn basis(&self) -> (Vec3, Vec3, Vec3) {
        (self.u, self.v, self.w)
    }

    /// Generate a ray through a random point of pixel (i, j).
    pub fn get_ray(&self, i: u32, j: u32, rng: &mut dyn RngCore) -> Ray {
        let offset = sample_square(rng);
        self.ray_through(i, j, offset, rng)
    }

    /// Generate a ray through a random point of sub-cell (s_i, s_j) of
    /// pixel (i, j).
    pub fn get_ray_stratified(&self, i: u32, j: u32, s_i: u32, s_j: u32, rng: &mut dyn RngCore) -> Ray {
        let offset = sample_square_stratified(s_i, s_j, self.recip_sqrt_spp, rng);
        self.ray_through(i, j, offset, rng)
    }

    fn ray_through(&self, i: u32, j: u32, offset: Vec3, rng: &mut dyn RngCore) -> Ray {
        let pixel_sample = self.pixel00_loc
            + (i as f64 + offset.x) * self.pixel_delta_u
            + (j as f64 + offset.y) * self.pixel_delta_v;

        let ray_origin = if self.config.defocus_angle <= 0.0 {
            self.center
        } else {
            self.defocus_disk_sample(rng)
        };

        let ray_direction = pixel_sample - ray_origin;
        let ray_time = random_f64(rng);

        Ray::new(ray_origin, ray_direction, ray_time)
    }

    /// Sample a point on the defocus disk.
    fn defocus_disk_sample(&self, rng: &mut dyn RngCore) -> Point3 {
        let p = random_in_unit_disk(rng);
        self.center + p.x * self.defocus_disk_u + p.y * self.defocus_disk_v
    }
}

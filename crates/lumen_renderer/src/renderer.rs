//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Iterative ray tracing with configurable depth
//! - Stratified or purely random anti-aliasing
//! - Scanline blocks claimed dynamically by a per-render rayon pool
//! - Gamma correction

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use lumen_math::{Color, Interval, Ray};
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::camera::Camera;
use crate::hittable::Hittable;
use crate::sampling::row_rng;
use crate::scanline::{BlockCursor, RowResult, DEFAULT_BLOCK_ROWS};

/// Closest hit distance accepted for a bounce, avoiding self-intersection.
const SHADOW_ACNE_EPSILON: f64 = 0.001;

/// How a render is executed. Does not affect what the image depicts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Worker count; `None` uses the available hardware parallelism
    pub threads: Option<usize>,
    /// Base random seed; `None` draws a fresh one
    pub seed: Option<u64>,
    /// Sample on a sqrt(spp) x sqrt(spp) grid inside each pixel
    pub stratified: bool,
    /// Rows per claimed block
    pub block_rows: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            threads: None,
            seed: None,
            stratified: true,
            block_rows: DEFAULT_BLOCK_ROWS,
        }
    }
}

impl RenderOptions {
    /// Worker count to use, at least 1.
    pub fn resolved_threads(&self) -> usize {
        match self.threads {
            Some(n) if n > 0 => n,
            _ => std::thread::available_parallelism().map_or(1, |n| n.get()),
        }
    }
}

/// Compute the radiance carried back along a ray.
///
/// Walks the bounce chain in a loop: emission at each hit is added, weighted
/// by the product of the attenuations so far. An escaped ray picks up the
/// background; an absorbed ray or an exhausted depth adds nothing more.
pub fn ray_color(
    ray: &Ray,
    world: &dyn Hittable,
    max_depth: u32,
    background: Color,
    rng: &mut dyn RngCore,
) -> Color {
    let mut radiance = Color::ZERO;
    let mut throughput = Color::ONE;
    let mut ray = *ray;

    for _ in 0..max_depth {
        let Some(rec) = world.hit(&ray, Interval::new(SHADOW_ACNE_EPSILON, f64::INFINITY), rng) else {
            return radiance + throughput * background;
        };

        radiance += throughput * rec.material.emitted(rec.u, rec.v, rec.p);

        match rec.material.scatter(&ray, &rec, rng) {
            Some(result) => {
                throughput *= result.attenuation;
                ray = result.scattered;
            }
            None => return radiance,
        }
    }

    radiance
}

/// Render a single pixel with multi-sampling.
///
/// Stratified sampling takes one sample in each cell of the camera's
/// sqrt(spp) grid; otherwise `spp` samples land anywhere in the pixel. The
/// sum is scaled by the number of samples actually taken.
pub fn render_pixel(
    camera: &Camera,
    world: &dyn Hittable,
    i: u32,
    j: u32,
    stratified: bool,
    rng: &mut dyn RngCore,
) -> Color {
    let max_depth = camera.max_depth();
    let background = camera.background();
    let mut pixel_color = Color::ZERO;

    if stratified {
        let n = camera.sqrt_spp();
        for s_j in 0..n {
            for s_i in 0..n {
                let ray = camera.get_ray_stratified(i, j, s_i, s_j, rng);
                pixel_color += ray_color(&ray, world, max_depth, background, rng);
            }
        }
    } else {
        for _ in 0..camera.samples_per_pixel(false) {
            let ray = camera.get_ray(i, j, rng);
            pixel_color += ray_color(&ray, world, max_depth, background, rng);
        }
    }

    pixel_color / camera.samples_per_pixel(stratified) as f64
}

/// Image buffer of linear colors, row-major, top row first.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let idx = self.index(x, y);
        self.pixels[idx] = color;
    }

    /// Copy a full row of pixels into place.
    pub fn set_row(&mut self, y: u32, row: &[Color]) {
        let start = self.index(0, y);
        self.pixels[start..start + self.width as usize].copy_from_slice(row);
    }

    /// Convert to gamma-corrected RGB bytes (for saving).
    pub fn to_rgb8(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|&color| color_to_rgb8(color))
            .collect()
    }
}

/// Apply gamma correction (gamma = 2.0). Non-finite and non-positive values
/// map to 0.
#[inline]
pub fn linear_to_gamma(linear: f64) -> f64 {
    if linear.is_finite() && linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert a linear color to 8-bit RGB.
pub fn color_to_rgb8(color: Color) -> [u8; 3] {
    let byte = |c: f64| (256.0 * linear_to_gamma(c).clamp(0.0, 0.999)) as u8;
    [byte(color.x), byte(color.y), byte(color.z)]
}

/// Shared state of one render call.
struct RenderJob<'a> {
    camera: &'a Camera,
    world: &'a dyn Hittable,
    seed: u64,
    stratified: bool,
    cursor: BlockCursor,
    rows_done: AtomicUsize,
}

impl RenderJob<'_> {
    /// Worker loop: claim blocks until none are left, returning the
    /// finished rows.
    fn run(&self) -> Vec<RowResult> {
        let width = self.camera.image_width();
        let height = self.camera.image_height() as usize;
        let mut rows = Vec::new();

        while let Some(block) = self.cursor.next_block() {
            for row in block.rows() {
                let mut rng = row_rng(self.seed, row);
                let pixels = (0..width)
                    .map(|i| render_pixel(self.camera, self.world, i, row as u32, self.stratified, &mut rng))
                    .collect();
                rows.push(RowResult { row, pixels });

                let done = self.rows_done.fetch_add(1, Ordering::Relaxed) + 1;
                report_progress(done, height);
            }
        }

        rows
    }
}

/// Log each time another tenth of the scanlines is finished.
fn report_progress(done: usize, total: usize) {
    if total == 0 {
        return;
    }
    if done * 10 / total != (done - 1) * 10 / total {
        log::info!("{:3}% ({}/{} scanlines)", done * 100 / total, done, total);
    }
}

/// Render the entire scene to an image buffer.
///
/// A thread pool is built for this call and dropped at its end. Every
/// worker claims blocks of scanlines from a shared cursor, and each row is
/// sampled with a generator seeded from `(seed, row)`, so the image is the
/// same for a given seed whatever the thread count.
pub fn render(camera: &Camera, world: &dyn Hittable, options: &RenderOptions) -> ImageBuffer {
    let width = camera.image_width();
    let height = camera.image_height();
    let threads = options.resolved_threads();
    let seed = options.seed.unwrap_or_else(rand::random);

    log::info!(
        "Rendering {}x{}, {} samples per pixel, max depth {}, {} threads (seed {})",
        width,
        height,
        camera.samples_per_pixel(options.stratified),
        camera.max_depth(),
        threads,
        seed
    );
    let start = Instant::now();

    let job = RenderJob {
        camera,
        world,
        seed,
        stratified: options.stratified,
        cursor: BlockCursor::new(height as usize, options.block_rows),
        rows_done: AtomicUsize::new(0),
    };

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("lumen-render-{}", i))
        .build();

    let per_worker: Vec<Vec<RowResult>> = match pool {
        Ok(pool) => pool.broadcast(|_| job.run()),
        Err(e) => {
            log::warn!("Could not build render thread pool ({}), rendering on the calling thread", e);
            vec![job.run()]
        }
    };

    let mut image = ImageBuffer::new(width, height);
    for result in per_worker.into_iter().flatten() {
        image.set_row(result.row as u32, &result.pixels);
    }

    log::info!("Render finished in {:.2?}", start.elapsed());
    image
}

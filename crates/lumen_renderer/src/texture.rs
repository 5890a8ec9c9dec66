//! Textures: map a surface point and UV coordinate to a color.

use std::path::Path;
use std::sync::Arc;

use lumen_core::ImageData;
use lumen_math::{Color, Interval, Point3};
use rand::RngCore;

use crate::perlin::Perlin;

/// Debug color returned by image textures without pixel data.
const CYAN: Color = Color::new(0.0, 1.0, 1.0);

/// Trait for color lookups on a surface.
pub trait Texture: Send + Sync {
    fn value(&self, u: f64, v: f64, p: Point3) -> Color;
}

/// Constant color.
#[derive(Debug, Clone, Copy)]
pub struct SolidColor {
    albedo: Color,
}

impl SolidColor {
    pub fn new(albedo: Color) -> Self {
        Self { albedo }
    }

    pub fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::new(Color::new(red, green, blue))
    }
}

impl Texture for SolidColor {
    fn value(&self, _u: f64, _v: f64, _p: Point3) -> Color {
        self.albedo
    }
}

/// 3D checkerboard alternating between two sub-textures in cubes of side
/// `scale`.
pub struct CheckerTexture {
    inv_scale: f64,
    even: Arc<dyn Texture>,
    odd: Arc<dyn Texture>,
}

impl CheckerTexture {
    pub fn new(scale: f64, even: Arc<dyn Texture>, odd: Arc<dyn Texture>) -> Self {
        Self {
            inv_scale: 1.0 / scale,
            even,
            odd,
        }
    }

    pub fn from_colors(scale: f64, even: Color, odd: Color) -> Self {
        Self::new(
            scale,
            Arc::new(SolidColor::new(even)),
            Arc::new(SolidColor::new(odd)),
        )
    }
}

impl Texture for CheckerTexture {
    fn value(&self, u: f64, v: f64, p: Point3) -> Color {
        let cell = (self.inv_scale * p).floor();
        let sum = cell.x as i64 + cell.y as i64 + cell.z as i64;

        if sum.rem_euclid(2) == 0 {
            self.even.value(u, v, p)
        } else {
            self.odd.value(u, v, p)
        }
    }
}

/// Nearest-pixel lookup into a loaded image.
pub struct ImageTexture {
    image: ImageData,
}

impl ImageTexture {
    pub fn new(image: ImageData) -> Self {
        Self { image }
    }

    /// Load the image at `path`.
    ///
    /// A load failure is logged and leaves the texture empty, so it renders
    /// as solid cyan instead of aborting the render.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let image = match ImageData::load(path) {
            Ok(image) => image,
            Err(e) => {
                log::warn!("Could not load texture image {}: {}", path.display(), e);
                ImageData::default()
            }
        };
        Self::new(image)
    }

    pub fn has_data(&self) -> bool {
        !self.image.is_empty()
    }
}

impl Texture for ImageTexture {
    fn value(&self, u: f64, v: f64, _p: Point3) -> Color {
        if self.image.height() == 0 {
            return CYAN;
        }

        let unit = Interval::new(0.0, 1.0);
        let u = unit.clamp(u);
        // Flip V to image row order
        let v = 1.0 - unit.clamp(v);

        let i = (u * self.image.width() as f64) as i64;
        let j = (v * self.image.height() as f64) as i64;
        let pixel = self.image.pixel_data(i, j);

        let color_scale = 1.0 / 255.0;
        Color::new(
            color_scale * pixel[0] as f64,
            color_scale * pixel[1] as f64,
            color_scale * pixel[2] as f64,
        )
    }
}

/// Marble-like gray pattern from Perlin turbulence.
pub struct NoiseTexture {
    noise: Perlin,
    scale: f64,
}

impl NoiseTexture {
    pub fn new(scale: f64, rng: &mut dyn RngCore) -> Self {
        Self {
            noise: Perlin::new(rng),
            scale,
        }
    }
}

impl Texture for NoiseTexture {
    fn value(&self, _u: f64, _v: f64, p: Point3) -> Color {
        Color::splat(0.5) * (1.0 + (self.scale * p.z + 10.0 * self.noise.turb(p, 7)).sin())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_math::Vec3;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_solid_color() {
        let tex = SolidColor::rgb(0.2, 0.4, 0.6);
        assert_eq!(tex.value(0.9, 0.1, Vec3::splat(7.0)), Color::new(0.2, 0.4, 0.6));
    }

    #[test]
    fn test_checker_flips_across_one_cell() {
        let scale = 1.0;
        let tex = CheckerTexture::from_colors(scale, Color::ONE, Color::ZERO);

        let a = tex.value(0.0, 0.0, Vec3::ZERO);
        let b = tex.value(0.0, 0.0, Vec3::new(scale, 0.0, 0.0));
        assert_ne!(a, b);
        assert_eq!(a, Color::ONE);
    }

    #[test]
    fn test_checker_negative_coordinates() {
        let tex = CheckerTexture::from_colors(2.0, Color::ONE, Color::ZERO);

        // Cell (-1, 0, 0) is odd, cell (-1, -1, 0) is even
        assert_eq!(tex.value(0.0, 0.0, Vec3::new(-0.5, 0.5, 0.5)), Color::ZERO);
        assert_eq!(tex.value(0.0, 0.0, Vec3::new(-0.5, -0.5, 0.5)), Color::ONE);
    }

    #[test]
    fn test_image_texture_empty_is_cyan() {
        let tex = ImageTexture::new(ImageData::default());
        assert!(!tex.has_data());
        assert_eq!(tex.value(0.5, 0.5, Vec3::ZERO), CYAN);
    }

    #[test]
    fn test_image_texture_open_missing_degrades() {
        let _ = env_logger::builder().is_test(true).try_init();

        let tex = ImageTexture::open("/no/such/dir/earthmap.jpg");
        assert_eq!(tex.value(0.1, 0.9, Vec3::ZERO), CYAN);
    }

    #[test]
    fn test_image_texture_lookup_flips_v() {
        #[rustfmt::skip]
        let bytes = vec![
            255, 0, 0,    0, 255, 0,
            0, 0, 255,    255, 255, 255,
        ];
        let tex = ImageTexture::new(ImageData::from_rgb8(2, 2, bytes).unwrap());

        // v = 1 is the top row of the image
        assert_eq!(tex.value(0.0, 1.0, Vec3::ZERO), Color::new(1.0, 0.0, 0.0));
        assert_eq!(tex.value(0.99, 0.99, Vec3::ZERO), Color::new(0.0, 1.0, 0.0));
        assert_eq!(tex.value(0.0, 0.0, Vec3::ZERO), Color::new(0.0, 0.0, 1.0));
        // Out of range UVs clamp to the edge
        assert_eq!(tex.value(5.0, -3.0, Vec3::ZERO), Color::ONE);
    }

    #[test]
    fn test_noise_texture_range() {
        let mut rng = StdRng::seed_from_u64(4);
        let tex = NoiseTexture::new(4.0, &mut rng);

        for i in 0..50 {
            let p = Vec3::new(i as f64 * 0.3, 1.0, i as f64 * -0.7);
            let c = tex.value(0.0, 0.0, p);
            assert!(c.x >= 0.0 && c.x <= 1.0);
            assert_eq!(c.x, c.y);
            assert_eq!(c.y, c.z);
        }
    }
}

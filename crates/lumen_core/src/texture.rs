//! Texture image loading.
//!
//! Loads images from disk into an in-memory RGB buffer suitable for image
//! textures. Decoded bytes are converted to linear floats and quantized back
//! to 8-bit values, which is what texture lookups read.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that can occur during image loading.
#[derive(Error, Debug)]
pub enum ImageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image decoding error: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Image has no pixels: {}", path.display())]
    Empty { path: PathBuf },

    #[error("Pixel buffer holds {actual} bytes, expected {expected}")]
    SizeMismatch { expected: usize, actual: usize },
}

pub type ImageResult<T> = Result<T, ImageError>;

const BYTES_PER_PIXEL: usize = 3;

/// Returned by [`ImageData::pixel_data`] when there is no image data.
const MAGENTA: [u8; 3] = [255, 0, 255];

/// A loaded RGB image.
///
/// Pixels are contiguous, left to right, then top to bottom.
#[derive(Clone, Debug, Default)]
pub struct ImageData {
    width: usize,
    height: usize,

    /// Linear 8-bit data, 3 components per pixel
    bdata: Vec<u8>,
}

impl ImageData {
    /// Load an image file, converting gamma 2.2 encoded bytes to linear
    /// values.
    pub fn load(path: impl AsRef<Path>) -> ImageResult<Self> {
        let path = path.as_ref();

        let img = image::io::Reader::open(path)?
            .with_guessed_format()?
            .decode()?;
        let rgb = img.to_rgb8();
        let (width, height) = rgb.dimensions();

        if width == 0 || height == 0 {
            return Err(ImageError::Empty {
                path: path.to_path_buf(),
            });
        }

        let fdata: Vec<f32> = rgb.as_raw().iter().map(|&b| gamma_to_linear(b)).collect();
        let image = Self::from_linear(width as usize, height as usize, fdata)?;

        log::debug!(
            "Loaded image: {} ({}x{}, {:.1} KB)",
            path.display(),
            image.width,
            image.height,
            image.size_bytes() as f32 / 1024.0
        );

        Ok(image)
    }

    /// Build an image from 8-bit RGB bytes that are already linear.
    pub fn from_rgb8(width: usize, height: usize, bytes: Vec<u8>) -> ImageResult<Self> {
        let fdata = bytes.iter().map(|&b| b as f32 / 255.0).collect();
        Self::from_linear(width, height, fdata)
    }

    /// Build an image from linear float RGB data, quantized to bytes.
    pub fn from_linear(width: usize, height: usize, fdata: Vec<f32>) -> ImageResult<Self> {
        let expected = width * height * BYTES_PER_PIXEL;
        if fdata.len() != expected {
            return Err(ImageError::SizeMismatch {
                expected,
                actual: fdata.len(),
            });
        }

        let bdata = fdata.iter().map(|&f| float_to_byte(f)).collect();

        Ok(Self {
            width,
            height,
            bdata,
        })
    }

    /// Image width in pixels, 0 if no image is loaded.
    pub fn width(&self) -> usize {
        if self.bdata.is_empty() {
            0
        } else {
            self.width
        }
    }

    /// Image height in pixels, 0 if no image is loaded.
    pub fn height(&self) -> usize {
        if self.bdata.is_empty() {
            0
        } else {
            self.height
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bdata.is_empty()
    }

    /// The three RGB bytes of the pixel at (x, y).
    ///
    /// Coordinates are clamped into the image. Returns magenta if there is
    /// no image data.
    pub fn pixel_data(&self, x: i64, y: i64) -> [u8; 3] {
        if self.is_empty() {
            return MAGENTA;
        }

        let x = clamp_index(x, self.width);
        let y = clamp_index(y, self.height);
        let idx = (y * self.width + x) * BYTES_PER_PIXEL;

        [self.bdata[idx], self.bdata[idx + 1], self.bdata[idx + 2]]
    }

    /// Size of the pixel buffer in bytes.
    pub fn size_bytes(&self) -> usize {
        self.bdata.len()
    }
}

/// Clamp `v` into `[0, len)`.
fn clamp_index(v: i64, len: usize) -> usize {
    if v < 0 {
        0
    } else {
        (v as usize).min(len - 1)
    }
}

/// Quantize a linear [0, 1] value to a byte.
fn float_to_byte(value: f32) -> u8 {
    if value <= 0.0 {
        0
    } else if value >= 1.0 {
        255
    } else {
        (256.0 * value) as u8
    }
}

/// Convert a gamma 2.2 encoded byte to a linear float.
fn gamma_to_linear(value: u8) -> f32 {
    (value as f32 / 255.0).powf(2.2)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker_2x2() -> ImageData {
        #[rustfmt::skip]
        let bytes = vec![
            255, 0, 0,    0, 255, 0,
            0, 0, 255,    255, 255, 255,
        ];
        ImageData::from_rgb8(2, 2, bytes).unwrap()
    }

    #[test]
    fn test_pixel_data_lookup() {
        let img = checker_2x2();
        assert_eq!(img.width(), 2);
        assert_eq!(img.height(), 2);
        assert_eq!(img.pixel_data(0, 0), [255, 0, 0]);
        assert_eq!(img.pixel_data(1, 0), [0, 255, 0]);
        assert_eq!(img.pixel_data(0, 1), [0, 0, 255]);
    }

    #[test]
    fn test_pixel_data_clamps_coordinates() {
        let img = checker_2x2();
        assert_eq!(img.pixel_data(-5, -5), [255, 0, 0]);
        assert_eq!(img.pixel_data(2, 2), [255, 255, 255]);
        assert_eq!(img.pixel_data(100, 0), [0, 255, 0]);
    }

    #[test]
    fn test_empty_image_is_magenta() {
        let img = ImageData::default();
        assert!(img.is_empty());
        assert_eq!(img.width(), 0);
        assert_eq!(img.height(), 0);
        assert_eq!(img.pixel_data(0, 0), MAGENTA);
    }

    #[test]
    fn test_size_mismatch() {
        let err = ImageData::from_rgb8(2, 2, vec![0; 5]).unwrap_err();
        assert!(matches!(
            err,
            ImageError::SizeMismatch {
                expected: 12,
                actual: 5
            }
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let _ = env_logger::builder().is_test(true).try_init();

        let err = ImageData::load("/definitely/not/here/earthmap.jpg").unwrap_err();
        assert!(matches!(err, ImageError::Io(_)));
    }

    #[test]
    fn test_load_png_round_trip() {
        let path = std::env::temp_dir().join(format!("lumen_core_load_{}.png", std::process::id()));
        let mut img = image::RgbImage::new(3, 2);
        img.put_pixel(2, 1, image::Rgb([255, 255, 255]));
        img.save(&path).unwrap();

        let loaded = ImageData::load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded.width(), 3);
        assert_eq!(loaded.height(), 2);
        assert_eq!(loaded.pixel_data(2, 1), [255, 255, 255]);
        assert_eq!(loaded.pixel_data(0, 0), [0, 0, 0]);
    }

    #[test]
    fn test_float_to_byte() {
        assert_eq!(float_to_byte(-1.0), 0);
        assert_eq!(float_to_byte(0.0), 0);
        assert_eq!(float_to_byte(0.5), 128);
        assert_eq!(float_to_byte(1.0), 255);
        assert_eq!(float_to_byte(2.0), 255);
    }

    #[test]
    fn test_gamma_to_linear() {
        assert_eq!(gamma_to_linear(0), 0.0);
        assert!((gamma_to_linear(255) - 1.0).abs() < 1e-6);

        // Mid-gray: (128/255)^2.2 = 0.2195, quantized to 56
        let mid = gamma_to_linear(128);
        assert!((mid - 0.21952).abs() < 1e-4);
        assert_eq!(float_to_byte(mid), 56);
    }

    #[test]
    fn test_load_mid_gray() {
        let path = std::env::temp_dir().join(format!("lumen_core_gray_{}.png", std::process::id()));
        image::RgbImage::from_pixel(1, 1, image::Rgb([128, 128, 128]))
            .save(&path)
            .unwrap();

        let loaded = ImageData::load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded.pixel_data(0, 0), [56, 56, 56]);
        assert_eq!(loaded.size_bytes(), 3);
    }
}

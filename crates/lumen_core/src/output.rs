//! Writers for rendered frames.
//!
//! The canonical output is plain-text PPM ("P3"). PNG is available by file
//! extension through the `image` crate.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use thiserror::Error;

/// Errors that can occur while writing an image.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image encoding error: {0}")]
    Encode(#[from] image::ImageError),

    #[error("Pixel buffer holds {actual} bytes, expected {expected}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),
}

pub type OutputResult<T> = Result<T, OutputError>;

fn check_len(width: u32, height: u32, rgb: &[u8]) -> OutputResult<()> {
    let expected = width as usize * height as usize * 3;
    if rgb.len() != expected {
        return Err(OutputError::SizeMismatch {
            expected,
            actual: rgb.len(),
        });
    }
    Ok(())
}

/// Write RGB bytes as a plain-text PPM.
///
/// Layout: `P3`, `<width> <height>`, `255`, then one `r g b` line per pixel
/// in row-major order, top row first.
pub fn write_ppm<W: Write>(mut writer: W, width: u32, height: u32, rgb: &[u8]) -> OutputResult<()> {
    check_len(width, height, rgb)?;

    writeln!(writer, "P3")?;
    writeln!(writer, "{} {}", width, height)?;
    writeln!(writer, "255")?;

    for px in rgb.chunks_exact(3) {
        writeln!(writer, "{} {} {}", px[0], px[1], px[2])?;
    }

    Ok(())
}

/// Save RGB bytes to `path`, choosing the format from the extension.
///
/// `.ppm` (or no extension) writes P3 text, `.png` writes PNG.
pub fn save_image(path: impl AsRef<Path>, width: u32, height: u32, rgb: &[u8]) -> OutputResult<()> {
    let path = path.as_ref();
    check_len(width, height, rgb)?;

    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase());

    match ext.as_deref() {
        None | Some("ppm") => {
            let mut writer = BufWriter::new(File::create(path)?);
            write_ppm(&mut writer, width, height, rgb)?;
            writer.flush()?;
        }
        Some("png") => {
            image::save_buffer(path, rgb, width, height, image::ColorType::Rgb8)?;
        }
        Some(other) => return Err(OutputError::UnsupportedFormat(other.to_string())),
    }

    log::info!("Wrote {}x{} image to {}", width, height, path.display());
    Ok(())
}

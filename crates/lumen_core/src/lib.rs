//! Lumen Core - image input and output for the path tracer.
//!
//! This crate provides:
//!
//! - **Texture images**: `ImageData`, decoded from disk into linear float and
//!   8-bit buffers for image textures
//! - **Output**: plain-text PPM (P3) and PNG writers for rendered frames
//!
//! # Example
//!
//! ```ignore
//! use lumen_core::{save_image, ImageData};
//!
//! let earth = ImageData::load("earthmap.jpg")?;
//! println!("{}x{}", earth.width(), earth.height());
//!
//! save_image("out.ppm", width, height, &rgb_bytes)?;
//! ```

pub mod output;
pub mod texture;

// Re-export commonly used types
pub use output::{save_image, write_ppm, OutputError, OutputResult};
pub use texture::{ImageData, ImageError, ImageResult};

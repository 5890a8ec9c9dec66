use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;
use lumen_renderer::{CameraConfig, RenderOptions};

use crate::scenes::SceneName;

/// Log levels selectable on the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Command line arguments
#[derive(Debug, Parser)]
#[command(name = "lumen")]
#[command(about = "Offline path tracer rendering built-in scenes to PPM or PNG")]
pub struct Args {
    /// Scene to render
    #[arg(long, value_enum, default_value = "spheres")]
    pub scene: SceneName,

    /// Output file path (.ppm for plain text, .png for PNG)
    #[arg(short, long, default_value = "output.ppm")]
    pub output: PathBuf,

    /// JSON file overriding the scene's camera and the render options
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Image width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Samples per pixel
    #[arg(long, short = 's')]
    pub samples: Option<u32>,

    /// Maximum ray bounce depth
    #[arg(long)]
    pub depth: Option<u32>,

    /// Random seed for sampling and scene generation
    #[arg(long)]
    pub seed: Option<u64>,

    /// Number of render threads (defaults to all cores)
    #[arg(long, short = 'j')]
    pub threads: Option<usize>,

    /// Sample pixels purely at random instead of on a stratified grid
    #[arg(long)]
    pub no_stratified: bool,

    /// Set the logging level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,

    /// Image file for the earth scene
    #[arg(long, default_value = "earthmap.jpg")]
    pub texture: PathBuf,

    /// Print the available scenes and exit
    #[arg(long)]
    pub list_scenes: bool,
}

impl Args {
    /// Apply command line overrides on top of the scene and config file
    /// settings.
    pub fn apply_overrides(&self, camera: &mut CameraConfig, options: &mut RenderOptions) {
        if let Some(width) = self.width {
            camera.image_width = width;
        }
        if let Some(samples) = self.samples {
            camera.samples_per_pixel = samples;
        }
        if let Some(depth) = self.depth {
            camera.max_depth = depth;
        }
        if self.seed.is_some() {
            options.seed = self.seed;
        }
        if self.threads.is_some() {
            options.threads = self.threads;
        }
        if self.no_stratified {
            options.stratified = false;
        }
    }
}

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use lumen_core::save_image;
use lumen_renderer::{render, Camera, Hittable, RenderOptions};
use rand::rngs::StdRng;
use rand::SeedableRng;

mod cli;
mod config;
mod scenes;

use cli::Args;
use config::SceneFile;
use scenes::SceneName;

/// Seed for scene generation when none is given, so random scenes stay the
/// same between runs.
const SCENE_SEED: u64 = 42;

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_default_env()
        .filter_level(args.log_level.into())
        .init();

    if args.list_scenes {
        for name in SceneName::value_variants() {
            if let Some(value) = name.to_possible_value() {
                let help = value.get_help().map(|h| h.to_string()).unwrap_or_default();
                println!("{:<14} {}", value.get_name(), help);
            }
        }
        return Ok(());
    }

    let mut scene_rng = StdRng::seed_from_u64(args.seed.unwrap_or(SCENE_SEED));
    let scene = scenes::build(args.scene, &mut scene_rng, &args.texture);
    log::info!("Built scene {:?}, bounds {:?}", args.scene, scene.world.bounding_box());

    let mut camera_config = scene.camera;
    let mut options = RenderOptions::default();
    if let Some(path) = &args.config {
        SceneFile::load(path)?.apply(&mut camera_config, &mut options);
    }
    args.apply_overrides(&mut camera_config, &mut options);

    let camera = Camera::new(camera_config);
    let image = render(&camera, &scene.world, &options);

    save_image(&args.output, image.width, image.height, &image.to_rgb8())
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    Ok(())
}

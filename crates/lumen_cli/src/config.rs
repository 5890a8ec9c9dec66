//! JSON render configuration files.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use lumen_renderer::{CameraConfig, RenderOptions};
use serde::{Deserialize, Serialize};

/// Contents of a `--config` file. Both sections are optional; a present
/// section replaces the scene's own settings, with missing fields taking
/// their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SceneFile {
    pub camera: Option<CameraConfig>,
    pub render: Option<RenderOptions>,
}

impl SceneFile {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let file = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        log::debug!("Loaded config from {}", path.display());
        Ok(file)
    }

    /// Replace `camera` and `options` with the sections present in this file.
    pub fn apply(self, camera: &mut CameraConfig, options: &mut RenderOptions) {
        if let Some(c) = self.camera {
            *camera = c;
        }
        if let Some(r) = self.render {
            *options = r;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_renderer::Vec3;

    fn temp_file(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("lumen_cli_{}_{}", std::process::id(), name));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load_partial_file() {
        let path = temp_file(
            "partial.json",
            r#"{
                "camera": { "image_width": 64, "vfov": 40.0, "look_from": [278.0, 278.0, -800.0] },
                "render": { "seed": 11 }
            }"#,
        );
        let file = SceneFile::load(&path).unwrap();
        fs::remove_file(&path).ok();

        let camera = file.camera.clone().unwrap();
        assert_eq!(camera.image_width, 64);
        assert_eq!(camera.vfov, 40.0);
        assert_eq!(camera.look_from, Vec3::new(278.0, 278.0, -800.0));
        assert_eq!(camera.samples_per_pixel, 10);

        let mut camera = CameraConfig::default().with_quality(500, 50);
        let mut options = RenderOptions::default();
        file.apply(&mut camera, &mut options);
        assert_eq!(camera.samples_per_pixel, 10);
        assert_eq!(options.seed, Some(11));
        assert!(options.stratified);
    }

    #[test]
    fn test_missing_sections_keep_scene() {
        let file: SceneFile = serde_json::from_str("{}").unwrap();
        let mut camera = CameraConfig::default().with_quality(500, 50);
        let mut options = RenderOptions::default();
        file.apply(&mut camera, &mut options);

        assert_eq!(camera.samples_per_pixel, 500);
        assert_eq!(options, RenderOptions::default());
    }

    #[test]
    fn test_bad_files_are_errors() {
        assert!(SceneFile::load(Path::new("/no/such/lumen.json")).is_err());

        let path = temp_file("typo.json", r#"{ "camra": {} }"#);
        let err = SceneFile::load(&path).unwrap_err();
        fs::remove_file(&path).ok();
        assert!(format!("{:#}", err).contains("parse"));
    }
}

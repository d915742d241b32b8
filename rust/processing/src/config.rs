// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Conversion configuration: defaults, JSON files and environment overrides.

use crate::error::ConfigError;
use plan3d_geometry::DEFAULT_WALL_HEIGHT;
use plan3d_vision::DetectionConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default output directory.
pub const DEFAULT_OUTPUT_DIR: &str = "objects";

/// Default output file name prefix; the 1-based batch position follows it.
pub const DEFAULT_FILE_PREFIX: &str = "floor_plan_3d_";

/// Environment variable overriding the output directory.
pub const ENV_OUTPUT_DIR: &str = "PLAN3D_OUTPUT_DIR";

/// Environment variable overriding the wall height.
pub const ENV_WALL_HEIGHT: &str = "PLAN3D_WALL_HEIGHT";

/// Per-image pipeline settings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PipelineConfig {
    /// Cleaning and edge detection parameters.
    pub detection: DetectionConfig,
    /// Height walls are raised to, in pixels.
    pub wall_height: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            detection: DetectionConfig::default(),
            wall_height: DEFAULT_WALL_HEIGHT,
        }
    }
}

impl PipelineConfig {
    /// Reject values the pipeline cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let d = &self.detection;

        if !self.wall_height.is_finite() || self.wall_height <= 0.0 {
            return Err(out_of_range("wall_height", self.wall_height, "must be finite and positive"));
        }
        if !d.kernel_size.is_finite() || d.kernel_size <= 0.0 {
            return Err(out_of_range("kernel_size", d.kernel_size, "must be finite and positive"));
        }
        if !d.erosion_iterations.is_finite() || d.erosion_iterations < 0.0 {
            return Err(out_of_range(
                "erosion_iterations",
                d.erosion_iterations,
                "must be finite and non-negative",
            ));
        }
        if !d.dilation_iterations.is_finite() || d.dilation_iterations < 0.0 {
            return Err(out_of_range(
                "dilation_iterations",
                d.dilation_iterations,
                "must be finite and non-negative",
            ));
        }
        if !(d.canny_low.is_finite() && d.canny_low >= 0.0) {
            return Err(out_of_range("canny_low", d.canny_low.into(), "must be non-negative"));
        }
        if !(d.canny_high.is_finite() && d.canny_high >= d.canny_low) {
            return Err(out_of_range(
                "canny_high",
                d.canny_high.into(),
                "must be at least canny_low",
            ));
        }

        Ok(())
    }
}

fn out_of_range(field: &'static str, value: f64, reason: &'static str) -> ConfigError {
    ConfigError::OutOfRange {
        field,
        value,
        reason,
    }
}

/// Settings for a whole batch run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BatchConfig {
    /// Per-image pipeline settings.
    pub pipeline: PipelineConfig,
    /// Directory receiving the OBJ files, created if absent.
    pub output_dir: PathBuf,
    /// Output file name prefix.
    pub file_prefix: String,
    /// Save mask, cleaned mask and edge map PNGs next to each OBJ.
    pub debug_images: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            pipeline: PipelineConfig::default(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            file_prefix: DEFAULT_FILE_PREFIX.to_string(),
            debug_images: false,
        }
    }
}

impl BatchConfig {
    /// Load a JSON config file; missing fields keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply `PLAN3D_*` overrides from the process environment.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_env_with(|name| std::env::var(name).ok())
    }

    /// Apply overrides from an arbitrary variable lookup.
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(ENV_OUTPUT_DIR).filter(|s| !s.trim().is_empty()) {
            self.output_dir = PathBuf::from(dir.trim());
        }
        if let Some(raw) = lookup(ENV_WALL_HEIGHT) {
            self.pipeline.wall_height = raw.trim().parse().map_err(|_| ConfigError::Env {
                var: ENV_WALL_HEIGHT,
                value: raw.clone(),
            })?;
        }
        Ok(())
    }

    /// Validate the pipeline settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.pipeline.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = BatchConfig::default();
        assert_eq!(config.output_dir, PathBuf::from("objects"));
        assert_eq!(config.file_prefix, "floor_plan_3d_");
        assert_relative_eq!(config.pipeline.wall_height, 100.0);
        assert_eq!(config.pipeline.detection.kernel_dim(), 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json() {
        let config: BatchConfig = serde_json::from_str(
            r#"{ "output_dir": "out", "pipeline": { "wall_height": 250, "detection": { "erosion_iterations": 1 } } }"#,
        )
        .unwrap();

        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.file_prefix, DEFAULT_FILE_PREFIX);
        assert_relative_eq!(config.pipeline.wall_height, 250.0);
        assert_eq!(config.pipeline.detection.erosion_passes(), 1);
        assert_eq!(config.pipeline.detection.dilation_passes(), 2);
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> =
            [(ENV_OUTPUT_DIR, " meshes "), (ENV_WALL_HEIGHT, "42.5")].into();
        let mut config = BatchConfig::default();
        config
            .apply_env_with(|name| vars.get(name).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.output_dir, PathBuf::from("meshes"));
        assert_relative_eq!(config.pipeline.wall_height, 42.5);
    }

    #[test]
    fn test_env_rejects_bad_height() {
        let mut config = BatchConfig::default();
        let err = config
            .apply_env_with(|name| (name == ENV_WALL_HEIGHT).then(|| "tall".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Env { var: ENV_WALL_HEIGHT, .. }));
    }

    #[test]
    fn test_validation() {
        let mut config = PipelineConfig::default();
        config.wall_height = 0.0;
        assert!(config.validate().is_err());

        let mut config = PipelineConfig::default();
        config.detection.kernel_size = -1.0;
        assert!(config.validate().is_err());

        let mut config = PipelineConfig::default();
        config.detection.erosion_iterations = 0.0;
        config.detection.dilation_iterations = 0.0;
        assert!(config.validate().is_ok());

        let mut config = PipelineConfig::default();
        config.detection.canny_low = 200.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutOfRange { field: "canny_high", .. })
        ));
    }

    #[test]
    fn test_missing_config_file() {
        let err = BatchConfig::from_json_file("/nonexistent/plan3d.json").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}

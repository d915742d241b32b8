// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for conversion and configuration.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for conversion operations.
pub type Result<T> = std::result::Result<T, ConvertError>;

/// Per-image conversion failures.
///
/// None of these abort a batch; each is reported for the image it belongs to.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error(transparent)]
    Vision(#[from] plan3d_vision::VisionError),

    #[error("Mesh error: {0}")]
    Geometry(#[from] plan3d_geometry::Error),

    #[error("Cannot write '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: plan3d_geometry::Error,
    },

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

/// Configuration loading and validation failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot parse config file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{field} = {value} is out of range: {reason}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("Invalid value for {var}: '{value}'")]
    Env { var: &'static str, value: String },
}

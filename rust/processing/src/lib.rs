// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # plan3d processing
//!
//! Ties outline detection and extrusion together:
//! load an image, detect wall outlines, extrude them into a quad mesh and
//! write it as a Wavefront OBJ file. Batches report each image through a
//! channel of [`BatchEvent`]s.
//!
//! ```rust,ignore
//! use plan3d_processing::{run_batch, BatchConfig, BatchEvent};
//!
//! let (tx, rx) = std::sync::mpsc::channel();
//! let report = run_batch(&inputs, &BatchConfig::default(), &tx);
//! ```

pub mod batch;
pub mod config;
pub mod convert;
pub mod error;

pub use batch::{output_path, run_batch, BatchEvent, BatchFailure, BatchReport};
pub use config::{
    BatchConfig, PipelineConfig, DEFAULT_FILE_PREFIX, DEFAULT_OUTPUT_DIR, ENV_OUTPUT_DIR,
    ENV_WALL_HEIGHT,
};
pub use convert::{
    build_mesh, convert_bytes, convert_file, convert_grayscale, Conversion, ConversionStats,
};
pub use error::{ConfigError, ConvertError, Result};

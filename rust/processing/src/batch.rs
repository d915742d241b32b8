// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Batch conversion with per-image events.
//!
//! Images are converted one after another. A failing image is reported and
//! skipped; the batch always runs to the end and finishes with exactly one
//! [`BatchEvent::Completed`].

use crate::config::BatchConfig;
use crate::convert::{convert_file, Conversion, ConversionStats};
use crate::error::{ConvertError, Result};
use plan3d_geometry::{save_obj, OBJ_EXTENSION};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::time::Instant;

/// Events emitted while a batch runs.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BatchEvent {
    /// Batch accepted.
    Started {
        /// Number of input images.
        total: usize,
    },

    /// One image converted and written.
    ImageConverted {
        /// 1-based position in the batch.
        index: usize,
        input: PathBuf,
        output: PathBuf,
        stats: ConversionStats,
    },

    /// One image could not be converted or written.
    ImageFailed {
        /// 1-based position in the batch.
        index: usize,
        input: PathBuf,
        reason: String,
    },

    /// Images handled so far, successful or not.
    Progress { done: usize, total: usize },

    /// All images handled.
    Completed(BatchReport),
}

/// A failed image
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct BatchFailure {
    pub index: usize,
    pub input: PathBuf,
    pub reason: String,
}

/// Outcome of a whole batch
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct BatchReport {
    pub total: usize,
    pub converted: usize,
    pub failures: Vec<BatchFailure>,
    /// Most recently written OBJ file
    pub last_output: Option<PathBuf>,
    pub elapsed_ms: u64,
}

impl BatchReport {
    /// True when there was input but nothing converted
    pub fn all_failed(&self) -> bool {
        self.total > 0 && self.converted == 0
    }
}

/// Output path for the image at 1-based `index`: `{dir}/{prefix}{index}.obj`.
pub fn output_path(dir: &Path, prefix: &str, index: usize) -> PathBuf {
    dir.join(format!("{prefix}{index}.{OBJ_EXTENSION}"))
}

/// Convert every input image and write one OBJ file per image.
///
/// Send failures are ignored, so a receiver that went away does not stop
/// the batch.
pub fn run_batch(inputs: &[PathBuf], config: &BatchConfig, events: &Sender<BatchEvent>) -> BatchReport {
    let start = Instant::now();
    let total = inputs.len();
    let mut report = BatchReport {
        total,
        ..Default::default()
    };

    tracing::info!(
        total,
        output_dir = %config.output_dir.display(),
        "Starting batch"
    );
    let _ = events.send(BatchEvent::Started { total });

    if let Err(e) = std::fs::create_dir_all(&config.output_dir) {
        tracing::warn!(
            output_dir = %config.output_dir.display(),
            error = %e,
            "Cannot create output directory"
        );
    }

    for (i, input) in inputs.iter().enumerate() {
        let index = i + 1;
        let output = output_path(&config.output_dir, &config.file_prefix, index);

        match convert_one(input, &output, config) {
            Ok(stats) => {
                tracing::info!(
                    index,
                    input = %input.display(),
                    output = %output.display(),
                    faces = stats.face_count,
                    "Converted image"
                );
                report.converted += 1;
                report.last_output = Some(output.clone());
                let _ = events.send(BatchEvent::ImageConverted {
                    index,
                    input: input.clone(),
                    output,
                    stats,
                });
            }
            Err(e) => {
                let reason = e.to_string();
                tracing::warn!(index, input = %input.display(), error = %reason, "Image failed");
                report.failures.push(BatchFailure {
                    index,
                    input: input.clone(),
                    reason: reason.clone(),
                });
                let _ = events.send(BatchEvent::ImageFailed {
                    index,
                    input: input.clone(),
                    reason,
                });
            }
        }

        let _ = events.send(BatchEvent::Progress { done: index, total });
    }

    report.elapsed_ms = start.elapsed().as_millis() as u64;
    tracing::info!(
        converted = report.converted,
        failed = report.failures.len(),
        elapsed_ms = report.elapsed_ms,
        "Batch complete"
    );
    let _ = events.send(BatchEvent::Completed(report.clone()));
    report
}

fn convert_one(input: &Path, output: &Path, config: &BatchConfig) -> Result<ConversionStats> {
    let conversion = convert_file(input, &config.pipeline)?;

    save_obj(&conversion.mesh, output).map_err(|source| ConvertError::Write {
        path: output.to_path_buf(),
        source,
    })?;

    if config.debug_images {
        save_debug_images(&conversion, output);
    }

    Ok(conversion.stats)
}

/// Write the intermediate masks next to the OBJ. Failures are only logged.
fn save_debug_images(conversion: &Conversion, obj_path: &Path) {
    let stages = &conversion.stages;
    for (suffix, image) in [
        ("mask", &stages.mask),
        ("cleaned", &stages.cleaned),
        ("edges", &stages.edges),
    ] {
        let path = obj_path.with_extension(format!("{suffix}.png"));
        match image.save(&path) {
            Ok(()) => tracing::debug!(path = %path.display(), "Saved debug image"),
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "Cannot save debug image"),
        }
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for image loading and detection
pub type Result<T> = std::result::Result<T, VisionError>;

/// Errors raised while turning an input file or buffer into a grayscale image
#[derive(Error, Debug)]
pub enum VisionError {
    #[error("Cannot open image '{}': {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Image has zero size ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },
}

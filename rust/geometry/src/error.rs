// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for geometry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during mesh building and OBJ I/O
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid wall height: {0} (must be finite and positive)")]
    InvalidHeight(f64),

    #[error("Invalid face {face}: {reason}")]
    InvalidFace { face: usize, reason: String },

    #[error("Cannot load OBJ: {0}")]
    Load(#[from] tobj::LoadError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Error types for the quay CLI

use std::path::PathBuf;
use thiserror::Error;

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, QuayError>;

/// Errors that can occur while collecting and reading inputs.
///
/// Classification itself never fails; a file that reads successfully always
/// gets a verdict.
#[derive(Debug, Error)]
pub enum QuayError {
    /// A file could not be read
    #[error("failed to read {}: {source}", path.display())]
    Read {
        /// Path that failed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A directory walk failed partway
    #[error("failed to walk {}: {source}", path.display())]
    Walk {
        /// Root that was being walked
        path: PathBuf,
        /// Underlying traversal error
        #[source]
        source: walkdir::Error,
    },

    /// Reading from stdin failed
    #[error("failed to read stdin: {0}")]
    Stdin(#[from] std::io::Error),
}

impl QuayError {
    /// Create a read error for a path
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    /// Create a walk error for a root path
    pub fn walk(path: impl Into<PathBuf>, source: walkdir::Error) -> Self {
        Self::Walk {
            path: path.into(),
            source,
        }
    }
}

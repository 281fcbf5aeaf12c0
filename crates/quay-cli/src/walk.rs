// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Input collection: turning path arguments into a file list.

use crate::error::{QuayError, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Expands the CLI path arguments into the list of files to classify.
///
/// Directories are walked recursively and filtered by extension; explicitly
/// named files are taken as-is, whatever their extension.
pub fn collect_inputs(paths: &[PathBuf], exts: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            let before = files.len();
            for entry in WalkDir::new(path).sort_by_file_name() {
                let entry = entry.map_err(|source| QuayError::walk(path, source))?;
                if entry.file_type().is_file() && has_wanted_ext(entry.path(), exts) {
                    files.push(entry.into_path());
                }
            }
            debug!(
                root = %path.display(),
                matched = files.len() - before,
                "walked directory"
            );
            if files.len() == before {
                warn!(root = %path.display(), "no files matched the extension filter");
            }
        } else {
            files.push(path.clone());
        }
    }
    Ok(files)
}

fn has_wanted_ext(path: &Path, exts: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| exts.iter().any(|wanted| wanted.eq_ignore_ascii_case(ext)))
}

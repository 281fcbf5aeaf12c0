// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! CLI argument parsing for quay.

use clap::Parser;
use std::path::PathBuf;

/// quay - classify JavaScript sources as ESM, CJS, mixed, or unknown
#[derive(Parser, Debug)]
#[command(name = "quay")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Files or directories to classify; pass `-` to read from stdin
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Emit a JSON report instead of the colored listing
    #[arg(long)]
    pub json: bool,

    /// File extensions considered when walking directories
    #[arg(long, value_delimiter = ',', default_value = "js,mjs,cjs,jsx")]
    pub ext: Vec<String>,

    /// Only print the per-verdict summary
    #[arg(short, long)]
    pub quiet: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Per-file classification records and report rendering.

use owo_colors::OwoColorize;
use quay_syntax::ModuleSyntax;
use serde::{Serialize, Serializer};
use std::path::PathBuf;

/// Classification result for a single input.
#[derive(Debug, Serialize)]
pub struct FileReport {
    /// Input path (or `<stdin>`)
    pub path: PathBuf,
    /// Verdict for this file
    #[serde(serialize_with = "syntax_as_str")]
    pub syntax: ModuleSyntax,
}

fn syntax_as_str<S: Serializer>(syntax: &ModuleSyntax, ser: S) -> Result<S::Ok, S::Error> {
    ser.serialize_str(syntax.as_str())
}

/// Per-verdict tallies over one run.
#[derive(Debug, Default, Serialize)]
pub struct Summary {
    /// Files classified as ESM
    pub esm: usize,
    /// Files classified as CJS
    pub cjs: usize,
    /// Files with markers of both systems
    pub mixed: usize,
    /// Files with no markers
    pub unknown: usize,
}

/// Aggregated report over all inputs.
#[derive(Debug, Serialize)]
pub struct Report {
    /// One record per classified file, in input order
    pub files: Vec<FileReport>,
    /// Per-verdict totals
    pub summary: Summary,
}

impl Report {
    /// Builds a report, tallying the summary from the records.
    pub fn new(files: Vec<FileReport>) -> Self {
        let mut summary = Summary::default();
        for file in &files {
            match file.syntax {
                ModuleSyntax::Esm => summary.esm += 1,
                ModuleSyntax::Cjs => summary.cjs += 1,
                ModuleSyntax::Mixed => summary.mixed += 1,
                ModuleSyntax::Unknown => summary.unknown += 1,
            }
        }
        Self { files, summary }
    }

    /// Renders the JSON form of the report.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Prints the colored human-readable report to stdout.
    pub fn print(&self, quiet: bool) {
        if !quiet {
            for file in &self.files {
                println!("{:>10}  {}", colored_verdict(file.syntax), file.path.display());
            }
            if !self.files.is_empty() {
                println!();
            }
        }
        let s = &self.summary;
        println!(
            "{} esm, {} cjs, {} mixed, {} unknown ({} files)",
            s.esm.green(),
            s.cjs.yellow(),
            s.mixed.red(),
            s.unknown.dimmed(),
            self.files.len()
        );
    }
}

fn colored_verdict(syntax: ModuleSyntax) -> String {
    match syntax {
        ModuleSyntax::Esm => syntax.as_str().green().to_string(),
        ModuleSyntax::Cjs => syntax.as_str().yellow().to_string(),
        ModuleSyntax::Mixed => syntax.as_str().red().bold().to_string(),
        ModuleSyntax::Unknown => syntax.as_str().dimmed().to_string(),
    }
}

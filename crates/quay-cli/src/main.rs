// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! quay CLI - classify JavaScript sources by module syntax

use clap::Parser;
use rayon::prelude::*;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

mod cli;
mod error;
mod report;
mod walk;

use cli::Cli;
use error::{QuayError, Result};
use quay_syntax::detect_module_syntax;
use report::{FileReport, Report};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("quay=debug")
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "quay=warn".into()),
            )
            .init();
    }

    let report = run(&cli)?;

    if cli.json {
        println!("{}", report.to_json()?);
    } else {
        report.print(cli.quiet);
    }
    Ok(())
}

fn run(cli: &Cli) -> Result<Report> {
    if cli.paths.len() == 1 && cli.paths[0].as_path() == Path::new("-") {
        return classify_stdin();
    }

    let files = walk::collect_inputs(&cli.paths, &cli.ext)?;
    // independent inputs, stateless engine: classify in parallel
    let records = files
        .into_par_iter()
        .map(classify_file)
        .collect::<Result<Vec<_>>>()?;
    Ok(Report::new(records))
}

fn classify_stdin() -> Result<Report> {
    let mut source = String::new();
    std::io::stdin().read_to_string(&mut source)?;
    Ok(Report::new(vec![FileReport {
        path: PathBuf::from("<stdin>"),
        syntax: detect_module_syntax(&source),
    }]))
}

fn classify_file(path: PathBuf) -> Result<FileReport> {
    // lossy decoding keeps the engine's never-fail contract: even a file
    // with broken encoding still gets a verdict
    let bytes = std::fs::read(&path).map_err(|source| QuayError::read(&path, source))?;
    let source = String::from_utf8_lossy(&bytes);
    let syntax = detect_module_syntax(&source);
    debug!(path = %path.display(), %syntax, "classified");
    Ok(FileReport { path, syntax })
}

/*
Copyright 2025 Connor Nolan

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.
*/

use anyhow::{Context, Result};
use clap::Parser;
use hackc::file_reader::SourceFileReader;
use hackc::{translate, vm};
use std::fs;
use std::path::PathBuf;

/// Lowers one .vm file, or a directory of them, into a single .asm
/// program.
#[derive(Parser)]
#[clap(version = "0.1.0")]
struct Opts {
    /// Input .vm file or directory
    #[clap(short, long)]
    input: PathBuf,
    /// Output .asm file (defaults to the toolchain path conventions)
    #[clap(short, long)]
    output: Option<PathBuf>,
    /// Emit the Sys.init bootstrap even for a single-file input
    #[clap(long, conflicts_with = "no_bootstrap")]
    bootstrap: bool,
    /// Emit the test-harness pointer setup even for a directory input
    #[clap(long)]
    no_bootstrap: bool,
}

fn main() -> Result<()> {
    let opts: Opts = Opts::parse();

    let reader = SourceFileReader;
    let input_is_dir = opts.input.is_dir();

    // Whole programs boot through Sys.init; single files default to the
    // CPU-emulator harness setup.
    let bootstrap = if opts.bootstrap {
        true
    } else if opts.no_bootstrap {
        false
    } else {
        input_is_dir
    };

    let assembly = translate(&opts.input, bootstrap, &reader)?;

    let output = opts
        .output
        .unwrap_or_else(|| vm::output_path(&opts.input, input_is_dir));
    fs::write(&output, assembly)
        .with_context(|| format!("Failed to write output file: {}", output.display()))?;

    println!(
        "Successfully translated {} to {}",
        opts.input.display(),
        output.display()
    );

    Ok(())
}

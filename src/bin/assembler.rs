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
use hackc::assemble;
use hackc::file_reader::SourceFileReader;
use std::fs;
use std::path::PathBuf;

/// Translates a symbolic .asm program into .hack machine code.
#[derive(Parser)]
#[clap(version = "0.1.0")]
struct Opts {
    /// Input .asm file
    #[clap(short, long)]
    input: PathBuf,
    /// Output .hack file (defaults to the input with a .hack extension)
    #[clap(short, long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    let opts: Opts = Opts::parse();

    let reader = SourceFileReader;
    let machine_code = assemble(&opts.input, &reader)?;

    let output = opts
        .output
        .unwrap_or_else(|| opts.input.with_extension("hack"));
    fs::write(&output, machine_code)
        .with_context(|| format!("Failed to write output file: {}", output.display()))?;

    println!(
        "Successfully assembled {} to {}",
        opts.input.display(),
        output.display()
    );

    Ok(())
}

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

pub mod assembler;
pub mod ast;
pub mod errors;
pub mod file_reader;
pub mod parser;
pub mod vm;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, ensure};
use assembler::SymbolTable;
use file_reader::FileReader;
use vm::AsmEmitter;

/// Assembles one `.asm` source into Hack machine code, one 16-character
/// binary word per line.
pub fn assemble<F: FileReader>(source_path: &Path, reader: &F) -> Result<String> {
    let source = reader
        .read_to_string(source_path)
        .with_context(|| format!("Failed to read input file: {}", source_path.display()))?;

    let lines = parser::parse_source(&source).context("Failed during parsing stage")?;

    let mut symbols = SymbolTable::new();
    assembler::collect_labels(&lines, &mut symbols).context("Failed during assembler pass 1")?;

    let machine_code =
        assembler::encode_program(&lines, &mut symbols).context("Failed during assembler pass 2")?;

    Ok(machine_code)
}

/// Translates a `.vm` file, or a directory of them, into one Hack
/// assembly program. With `bootstrap` the output starts by initializing
/// SP and calling `Sys.init`; without it, with the pointer setup the
/// CPU-emulator test scripts expect.
pub fn translate<F: FileReader>(input: &Path, bootstrap: bool, reader: &F) -> Result<String> {
    let sources = collect_sources(input, reader)?;

    let mut emitter = AsmEmitter::new();
    if bootstrap {
        emitter.emit_bootstrap();
    } else {
        emitter.emit_harness_init();
    }

    for path in &sources {
        emitter.set_module(vm::module_name(path));

        let source = reader
            .read_to_string(path)
            .with_context(|| format!("Failed to read input file: {}", path.display()))?;
        let lines = vm::parser::parse_source(&source)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        for line in &lines {
            emitter
                .emit(line)
                .with_context(|| format!("Failed to translate {}", path.display()))?;
        }
    }

    Ok(emitter.finish())
}

// Directory inputs expand to their .vm files, sorted so a translation
// unit is deterministic regardless of enumeration order.
fn collect_sources<F: FileReader>(input: &Path, reader: &F) -> Result<Vec<PathBuf>> {
    if !reader.is_dir(input) {
        return Ok(vec![input.to_path_buf()]);
    }

    let mut sources = reader
        .list_sources(input, "vm")
        .with_context(|| format!("Failed to scan directory: {}", input.display()))?;
    sources.sort();
    ensure!(
        !sources.is_empty(),
        "no .vm files found in {}",
        input.display()
    );
    Ok(sources)
}

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

mod encoder;
mod symbol_table;

pub use symbol_table::SymbolTable;

use crate::ast::{AsmInstruction, AsmLine};
use crate::errors::TranslateError;

/// Pass 1: bind every label to the address of the next real instruction.
/// Labels occupy no address themselves, so the counter only advances on
/// real instructions.
pub fn collect_labels(lines: &[AsmLine], symbols: &mut SymbolTable) -> Result<(), TranslateError> {
    let mut address: u16 = 0;

    for line in lines {
        match &line.instruction {
            AsmInstruction::Label(name) => {
                symbols.define_label(name, address, line.line_number)?;
            }
            AsmInstruction::Address(_) | AsmInstruction::Compute { .. } => {
                address += 1;
            }
        }
    }

    Ok(())
}

/// Pass 2: resolve operands, allocate variables on first sight, and encode
/// one 16-bit word per real instruction. Runs only after pass 1 has fully
/// populated the label table.
pub fn encode_program(
    lines: &[AsmLine],
    symbols: &mut SymbolTable,
) -> Result<String, TranslateError> {
    let mut output = String::new();

    for line in lines {
        match &line.instruction {
            AsmInstruction::Label(_) => {}
            AsmInstruction::Address(operand) => {
                let value = symbols.resolve(operand, line.line_number)?;
                output.push_str(&encoder::encode_a_instruction(value));
                output.push('\n');
            }
            AsmInstruction::Compute { dest, comp, jump } => {
                let word = encoder::encode_c_instruction(
                    dest.as_deref(),
                    comp,
                    jump.as_deref(),
                    line.line_number,
                )?;
                output.push_str(&word);
                output.push('\n');
            }
        }
    }

    Ok(output)
}

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

use crate::errors::TranslateError;
use phf::phf_map;
use std::collections::HashMap;

/// RAM address handed to the first user variable.
const FIRST_VARIABLE_ADDRESS: u16 = 16;

// Symbols built into the platform. SP/LCL/ARG/THIS/THAT alias R0..R4.
static PREDEFINED_SYMBOLS: phf::Map<&'static str, u16> = phf_map! {
    "R0" => 0,
    "R1" => 1,
    "R2" => 2,
    "R3" => 3,
    "R4" => 4,
    "R5" => 5,
    "R6" => 6,
    "R7" => 7,
    "R8" => 8,
    "R9" => 9,
    "R10" => 10,
    "R11" => 11,
    "R12" => 12,
    "R13" => 13,
    "R14" => 14,
    "R15" => 15,

    "SP" => 0,
    "LCL" => 1,
    "ARG" => 2,
    "THIS" => 3,
    "THAT" => 4,

    "SCREEN" => 16384,
    "KBD" => 24576,
};

/// Maps symbolic names to 16-bit addresses: predefined symbols, labels
/// collected in pass 1, and variables allocated on first sight in pass 2.
#[derive(Debug)]
pub struct SymbolTable {
    user_symbols: HashMap<String, u16>,
    next_variable: u16,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    pub fn new() -> Self {
        Self {
            user_symbols: HashMap::new(),
            next_variable: FIRST_VARIABLE_ADDRESS,
        }
    }

    /// Binds a label to an instruction address during pass 1.
    pub fn define_label(
        &mut self,
        name: &str,
        address: u16,
        line: usize,
    ) -> Result<(), TranslateError> {
        if PREDEFINED_SYMBOLS.contains_key(name) {
            return Err(TranslateError::Semantic {
                line,
                reason: format!("label \"{name}\" redefines a predefined symbol"),
            });
        }
        if self.user_symbols.contains_key(name) {
            return Err(TranslateError::Semantic {
                line,
                reason: format!("duplicate label definition: {name}"),
            });
        }

        self.user_symbols.insert(name.to_string(), address);
        Ok(())
    }

    /// Resolves an A-instruction operand to its numeric value. Decimal
    /// literals pass through (range-checked); an unknown symbol is a
    /// variable reference and allocates the next free address.
    pub fn resolve(&mut self, operand: &str, line: usize) -> Result<u16, TranslateError> {
        if operand.bytes().all(|b| b.is_ascii_digit()) {
            let value: u32 = operand.parse().map_err(|_| TranslateError::Syntax {
                line,
                reason: format!("invalid decimal literal: {operand}"),
            })?;
            if value > 0x7FFF {
                return Err(TranslateError::Semantic {
                    line,
                    reason: format!("value {value} exceeds the 15-bit address range"),
                });
            }
            return Ok(value as u16);
        }

        if operand.as_bytes()[0].is_ascii_digit() {
            return Err(TranslateError::Syntax {
                line,
                reason: format!("symbols may not start with a digit: {operand}"),
            });
        }

        if let Some(&address) = PREDEFINED_SYMBOLS.get(operand) {
            return Ok(address);
        }
        if let Some(&address) = self.user_symbols.get(operand) {
            return Ok(address);
        }

        let address = self.next_variable;
        self.next_variable += 1;
        self.user_symbols.insert(operand.to_string(), address);
        Ok(address)
    }
}

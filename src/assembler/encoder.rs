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

// c1..c6 for the canonical computations. M-forms are keyed through their
// A-form after substitution; the a bit is added separately.
static COMP_BITS: phf::Map<&'static str, u16> = phf_map! {
    "0" => 0b101010,
    "1" => 0b111111,
    "-1" => 0b111010,
    "D" => 0b001100,
    "A" => 0b110000,
    "!D" => 0b001101,
    "!A" => 0b110001,
    "-D" => 0b001111,
    "-A" => 0b110011,
    "D+1" => 0b011111,
    "A+1" => 0b110111,
    "D-1" => 0b001110,
    "A-1" => 0b110010,
    "D+A" => 0b000010,
    "D-A" => 0b010011,
    "A-D" => 0b000111,
    "D&A" => 0b000000,
    "D|A" => 0b010101,
};

static JUMP_BITS: phf::Map<&'static str, u16> = phf_map! {
    "JGT" => 0b001,
    "JEQ" => 0b010,
    "JGE" => 0b011,
    "JLT" => 0b100,
    "JNE" => 0b101,
    "JLE" => 0b110,
    "JMP" => 0b111,
};

/// `0` + 15-bit value. The caller has already range-checked the value.
pub fn encode_a_instruction(value: u16) -> String {
    format!("{value:016b}")
}

/// `111` + a + c1..c6 + d1..d3 + j1..j3.
pub fn encode_c_instruction(
    dest: Option<&str>,
    comp: &str,
    jump: Option<&str>,
    line: usize,
) -> Result<String, TranslateError> {
    let word = 0b111 << 13
        | comp_bits(comp, line)? << 6
        | dest_bits(dest, line)? << 3
        | jump_bits(jump, line)?;
    Ok(format!("{word:016b}"))
}

// a + c1..c6. The a bit selects M (RAM[A]) over A as the second operand.
fn comp_bits(comp: &str, line: usize) -> Result<u16, TranslateError> {
    let uses_memory = comp.contains('M');
    let canonical = if uses_memory {
        comp.replace('M', "A")
    } else {
        comp.to_string()
    };

    let bits = COMP_BITS
        .get(canonical.as_str())
        .copied()
        .ok_or_else(|| TranslateError::Semantic {
            line,
            reason: format!("unsupported computation: {comp}"),
        })?;

    Ok(u16::from(uses_memory) << 6 | bits)
}

// d1=A, d2=D, d3=M, OR-ed per letter so every spelling order encodes
// alike.
fn dest_bits(dest: Option<&str>, line: usize) -> Result<u16, TranslateError> {
    let Some(dest) = dest else { return Ok(0) };

    let mut bits = 0;
    for letter in dest.chars() {
        bits |= match letter {
            'A' => 0b100,
            'D' => 0b010,
            'M' => 0b001,
            _ => {
                return Err(TranslateError::Semantic {
                    line,
                    reason: format!("invalid destination register: {letter}"),
                });
            }
        };
    }
    Ok(bits)
}

fn jump_bits(jump: Option<&str>, line: usize) -> Result<u16, TranslateError> {
    let Some(jump) = jump else { return Ok(0) };

    JUMP_BITS
        .get(jump)
        .copied()
        .ok_or_else(|| TranslateError::Semantic {
            line,
            reason: format!("unknown jump mnemonic: {jump}"),
        })
}

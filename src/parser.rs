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

use crate::ast::{AsmInstruction, AsmLine};
use crate::errors::TranslateError;

/// Parses a complete assembly source into its real lines. Blank and
/// comment-only lines are dropped; line numbers are 1-based.
pub fn parse_source(source: &str) -> Result<Vec<AsmLine>, TranslateError> {
    let mut lines = Vec::new();

    for (index, raw) in source.lines().enumerate() {
        let line_number = index + 1;
        if let Some(instruction) = parse_line(raw, line_number)? {
            lines.push(AsmLine {
                line_number,
                instruction,
            });
        }
    }

    Ok(lines)
}

// Comments run from "//" to end of line; whitespace carries no meaning
// anywhere in an instruction, so it is removed outright.
fn clean_line(raw: &str) -> String {
    let code = match raw.find("//") {
        Some(pos) => &raw[..pos],
        None => raw,
    };
    code.chars().filter(|c| !c.is_whitespace()).collect()
}

fn parse_line(raw: &str, line: usize) -> Result<Option<AsmInstruction>, TranslateError> {
    let cleaned = clean_line(raw);
    if cleaned.is_empty() {
        return Ok(None);
    }

    let instruction = match cleaned.as_bytes()[0] {
        b'(' => parse_label(&cleaned, line)?,
        b'@' => parse_address(&cleaned, line)?,
        _ => parse_compute(&cleaned, line)?,
    };

    Ok(Some(instruction))
}

fn parse_label(cleaned: &str, line: usize) -> Result<AsmInstruction, TranslateError> {
    let name = cleaned
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
        .ok_or_else(|| TranslateError::Syntax {
            line,
            reason: format!("unterminated label declaration: {cleaned}"),
        })?;

    if name.is_empty() {
        return Err(TranslateError::Syntax {
            line,
            reason: "empty label name".to_string(),
        });
    }

    Ok(AsmInstruction::Label(name.to_string()))
}

fn parse_address(cleaned: &str, line: usize) -> Result<AsmInstruction, TranslateError> {
    let operand = &cleaned[1..];
    if operand.is_empty() {
        return Err(TranslateError::Syntax {
            line,
            reason: "A-instruction without an operand".to_string(),
        });
    }

    Ok(AsmInstruction::Address(operand.to_string()))
}

// Field extraction: an optional dest before "=", then an optional jump
// after ";". A line with neither is not a computation at all.
fn parse_compute(cleaned: &str, line: usize) -> Result<AsmInstruction, TranslateError> {
    let (dest, rest) = match cleaned.split_once('=') {
        Some((dest, rest)) => (Some(dest), rest),
        None => (None, cleaned),
    };
    let (comp, jump) = match rest.split_once(';') {
        Some((comp, jump)) => (comp, Some(jump)),
        None => (rest, None),
    };

    if dest.is_none() && jump.is_none() {
        return Err(TranslateError::Syntax {
            line,
            reason: format!("instruction \"{cleaned}\" has neither a destination nor a jump"),
        });
    }
    if dest == Some("") {
        return Err(TranslateError::Syntax {
            line,
            reason: "empty destination field".to_string(),
        });
    }
    if comp.is_empty() {
        return Err(TranslateError::Syntax {
            line,
            reason: "empty computation field".to_string(),
        });
    }
    if jump == Some("") {
        return Err(TranslateError::Syntax {
            line,
            reason: "empty jump field".to_string(),
        });
    }

    Ok(AsmInstruction::Compute {
        dest: dest.map(str::to_string),
        comp: comp.to_string(),
        jump: jump.map(str::to_string),
    })
}

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

use crate::ast::{ComputeOp, Segment, VmCommand, VmLine};
use crate::errors::TranslateError;

/// Parses one VM source file into its real commands. Blank and
/// comment-only lines are dropped; line numbers are 1-based.
pub fn parse_source(source: &str) -> Result<Vec<VmLine>, TranslateError> {
    let mut lines = Vec::new();

    for (index, raw) in source.lines().enumerate() {
        let line_number = index + 1;
        if let Some(line) = parse_line(raw, line_number)? {
            lines.push(line);
        }
    }

    Ok(lines)
}

// Unlike assembly, internal whitespace is the token delimiter, so only
// comments and surrounding whitespace are removed.
fn parse_line(raw: &str, line: usize) -> Result<Option<VmLine>, TranslateError> {
    let code = match raw.find("//") {
        Some(pos) => &raw[..pos],
        None => raw,
    };
    let code = code.trim();
    let tokens: Vec<&str> = code.split_whitespace().collect();

    let command = match tokens.as_slice() {
        [] => return Ok(None),
        ["return"] => VmCommand::Return,
        [op] => VmCommand::Compute(parse_compute_op(op, line)?),
        ["label", name] => VmCommand::Label(name.to_string()),
        ["goto", name] => VmCommand::Goto(name.to_string()),
        ["if-goto", name] => VmCommand::IfGoto(name.to_string()),
        [op, _] => {
            return Err(TranslateError::Semantic {
                line,
                reason: format!("unknown branching operation: {op}"),
            });
        }
        ["push", segment, index] => {
            VmCommand::Push(parse_segment(segment, line)?, parse_index(index, line)?)
        }
        ["pop", segment, index] => {
            VmCommand::Pop(parse_segment(segment, line)?, parse_index(index, line)?)
        }
        ["call", name, count] => VmCommand::Call(name.to_string(), parse_index(count, line)?),
        ["function", name, count] => {
            VmCommand::Function(name.to_string(), parse_index(count, line)?)
        }
        [op, _, _] => {
            return Err(TranslateError::Semantic {
                line,
                reason: format!("unknown operation: {op}"),
            });
        }
        _ => {
            return Err(TranslateError::Syntax {
                line,
                reason: format!("too many tokens in command: {code}"),
            });
        }
    };

    Ok(Some(VmLine {
        line_number: line,
        source: code.to_string(),
        command,
    }))
}

fn parse_compute_op(op: &str, line: usize) -> Result<ComputeOp, TranslateError> {
    let parsed = match op {
        "add" => ComputeOp::Add,
        "sub" => ComputeOp::Sub,
        "neg" => ComputeOp::Neg,
        "eq" => ComputeOp::Eq,
        "gt" => ComputeOp::Gt,
        "lt" => ComputeOp::Lt,
        "and" => ComputeOp::And,
        "or" => ComputeOp::Or,
        "not" => ComputeOp::Not,
        _ => {
            return Err(TranslateError::Semantic {
                line,
                reason: format!("unknown operation: {op}"),
            });
        }
    };
    Ok(parsed)
}

fn parse_segment(name: &str, line: usize) -> Result<Segment, TranslateError> {
    Segment::parse(name).ok_or_else(|| TranslateError::Semantic {
        line,
        reason: format!("unknown memory segment: {name}"),
    })
}

fn parse_index(token: &str, line: usize) -> Result<u16, TranslateError> {
    token.parse().map_err(|_| TranslateError::Syntax {
        line,
        reason: format!("invalid numeric operand: {token}"),
    })
}

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

// --- Assembly (.asm) lines ---

// Represents one real line of Hack assembly. Blank and comment-only lines
// never reach this type.
#[derive(Debug, Clone, PartialEq)]
pub enum AsmInstruction {
    /// `(NAME)` — binds NAME to the address of the next real instruction.
    Label(String),
    /// `@operand` — a decimal constant or a symbol.
    Address(String),
    /// `dest=comp;jump` — either `dest=` or `;jump` may be missing, but
    /// not both.
    Compute {
        dest: Option<String>,
        comp: String,
        jump: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct AsmLine {
    pub line_number: usize,
    pub instruction: AsmInstruction,
}

// --- VM (.vm) lines ---

/// Arithmetic and logic operations of the stack machine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ComputeOp {
    Add,
    Sub,
    Neg,
    Eq,
    Gt,
    Lt,
    And,
    Or,
    Not,
}

/// Named memory regions of the VM, each with its own addressing rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
    Local,
    Argument,
    This,
    That,
    Constant,
    Static,
    Temp,
    Pointer,
}

impl Segment {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "local" => Some(Segment::Local),
            "argument" => Some(Segment::Argument),
            "this" => Some(Segment::This),
            "that" => Some(Segment::That),
            "constant" => Some(Segment::Constant),
            "static" => Some(Segment::Static),
            "temp" => Some(Segment::Temp),
            "pointer" => Some(Segment::Pointer),
            _ => None,
        }
    }

    /// Base-pointer symbol for the segments addressed indirectly through a
    /// runtime pointer; `None` for the segments with fixed addressing.
    pub fn base_symbol(self) -> Option<&'static str> {
        match self {
            Segment::Local => Some("LCL"),
            Segment::Argument => Some("ARG"),
            Segment::This => Some("THIS"),
            Segment::That => Some("THAT"),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum VmCommand {
    Compute(ComputeOp),
    Push(Segment, u16),
    Pop(Segment, u16),
    Label(String),
    Goto(String),
    IfGoto(String),
    Function(String, u16),
    Call(String, u16),
    Return,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VmLine {
    pub line_number: usize,
    /// Cleaned source text, echoed as a comment above the expansion.
    pub source: String,
    pub command: VmCommand,
}

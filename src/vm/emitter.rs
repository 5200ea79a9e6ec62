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

/// First RAM address of the temp segment.
const TEMP_BASE: u16 = 5;

/// Stateful assembly emitter. One instance spans the whole translation
/// unit: `label_counter` never resets, `module` changes at file
/// boundaries, and `buffer` accumulates the final program text.
pub struct AsmEmitter {
    module: String,
    label_counter: usize,
    buffer: String,
}

impl Default for AsmEmitter {
    fn default() -> Self {
        Self::new()
    }
}

impl AsmEmitter {
    pub fn new() -> Self {
        Self {
            module: String::new(),
            label_counter: 0,
            buffer: String::new(),
        }
    }

    /// Sets the source module name used to mangle static accesses.
    pub fn set_module(&mut self, name: &str) {
        self.module.clear();
        self.module.push_str(name);
    }

    pub fn finish(self) -> String {
        self.buffer
    }

    /// SP=256 followed by `call Sys.init 0`. Emitted once, before any
    /// user code, in whole-program mode.
    pub fn emit_bootstrap(&mut self) {
        self.comment("bootstrap");
        self.set_pointer("SP", 256);
        self.emit_call("Sys.init", 0);
    }

    /// Pointer setup used by the CPU-emulator test scripts in place of
    /// the bootstrap.
    pub fn emit_harness_init(&mut self) {
        self.comment("test harness initialization");
        self.set_pointer("SP", 256);
        self.set_pointer("LCL", 300);
        self.set_pointer("ARG", 400);
        self.set_pointer("THIS", 3000);
        self.set_pointer("THAT", 3010);
    }

    /// Translates one parsed command, appending its expansion to the
    /// output buffer.
    pub fn emit(&mut self, line: &VmLine) -> Result<(), TranslateError> {
        self.comment(&line.source);
        match &line.command {
            VmCommand::Compute(op) => self.emit_compute(*op),
            VmCommand::Push(segment, index) => self.emit_push(*segment, *index),
            VmCommand::Pop(segment, index) => {
                self.emit_pop(*segment, *index, line.line_number)?;
            }
            VmCommand::Label(name) => self.label(name),
            VmCommand::Goto(name) => self.emit_goto(name),
            VmCommand::IfGoto(name) => self.emit_if_goto(name),
            VmCommand::Function(name, locals) => self.emit_function(name, *locals),
            VmCommand::Call(name, args) => self.emit_call(name, *args),
            VmCommand::Return => self.emit_return(),
        }
        Ok(())
    }

    fn emit_compute(&mut self, op: ComputeOp) {
        match op {
            ComputeOp::Neg => self.emit_unary("M=-M"),
            ComputeOp::Not => self.emit_unary("M=!M"),
            ComputeOp::Add => self.emit_binary("D=D+A"),
            // y sits in D, x in A; the result must be x - y.
            ComputeOp::Sub => self.emit_binary("D=A-D"),
            ComputeOp::And => self.emit_binary("D=D&A"),
            ComputeOp::Or => self.emit_binary("D=D|A"),
            ComputeOp::Eq => self.emit_comparison("EQ"),
            ComputeOp::Gt => self.emit_comparison("GT"),
            ComputeOp::Lt => self.emit_comparison("LT"),
        }
    }

    // Unary ops rewrite the stack top in place.
    fn emit_unary(&mut self, expression: &str) {
        self.decrement_sp();
        self.point_at_stack_top();
        self.line(expression);
        self.increment_sp();
    }

    fn emit_binary(&mut self, expression: &str) {
        self.load_operands();
        self.line(expression);
        self.push_d();
    }

    // Pops y into D, then x into A.
    fn load_operands(&mut self) {
        self.pop_into_d();
        self.decrement_sp();
        self.point_at_stack_top();
        self.line("A=M");
    }

    // Comparisons branch on x - y and push -1 (true) or 0 (false).
    fn emit_comparison(&mut self, kind: &str) {
        let counter = self.next_label();

        self.load_operands();
        self.line("D=A-D");
        self.line(&format!("@{kind}_{counter}"));
        self.line(&format!("D;J{kind}"));

        self.line("D=0");
        self.line(&format!("@END_{kind}_{counter}"));
        self.line("0;JMP");

        self.label(&format!("{kind}_{counter}"));
        self.line("D=-1");
        self.label(&format!("END_{kind}_{counter}"));

        self.push_d();
    }

    fn emit_push(&mut self, segment: Segment, index: u16) {
        match segment {
            Segment::Constant => {
                self.line(&format!("@{index}"));
                self.line("D=A");
            }
            _ => {
                self.target_address_into_a(segment, index);
                self.line("D=M");
            }
        }
        self.push_d();
    }

    fn emit_pop(
        &mut self,
        segment: Segment,
        index: u16,
        line_number: usize,
    ) -> Result<(), TranslateError> {
        if segment == Segment::Constant {
            return Err(TranslateError::Semantic {
                line: line_number,
                reason: "cannot pop to the constant segment".to_string(),
            });
        }

        // Park the destination address in R13 while the value is fetched.
        self.target_address_into_a(segment, index);
        self.line("D=A");
        self.line("@R13");
        self.line("M=D");

        self.pop_into_d();
        self.line("@R13");
        self.line("A=M");
        self.line("M=D");
        Ok(())
    }

    // Leaves the target RAM address in A. Indirect segments compute
    // base + index; the rest resolve to a fixed register or a symbol.
    fn target_address_into_a(&mut self, segment: Segment, index: u16) {
        if let Some(base) = segment.base_symbol() {
            self.line(&format!("@{index}"));
            self.line("D=A");
            self.line(&format!("@{base}"));
            self.line("A=D+M");
            return;
        }

        match segment {
            Segment::Static => {
                debug_assert!(
                    !self.module.is_empty(),
                    "module must be set before a static access"
                );
                self.line(&format!("@{}.{index}", self.module));
            }
            Segment::Temp => self.line(&format!("@{}", TEMP_BASE + index)),
            Segment::Pointer => {
                let symbol = if index == 0 { "THIS" } else { "THAT" };
                self.line(&format!("@{symbol}"));
            }
            Segment::Constant => unreachable!("constant segment has no address"),
            Segment::Local | Segment::Argument | Segment::This | Segment::That => {
                unreachable!("indirect segments handled above")
            }
        }
    }

    fn emit_goto(&mut self, name: &str) {
        self.line(&format!("@{name}"));
        self.line("0;JMP");
    }

    // Jump when the popped value is nonzero.
    fn emit_if_goto(&mut self, name: &str) {
        self.pop_into_d();
        self.line(&format!("@{name}"));
        self.line("D;JNE");
    }

    fn emit_function(&mut self, name: &str, locals: u16) {
        self.label(name);
        self.line("D=0");
        for _ in 0..locals {
            self.push_d();
        }
    }

    fn emit_call(&mut self, name: &str, args: u16) {
        let return_label = format!("{name}$ret.{}", self.next_label());

        // push the return address
        self.line(&format!("@{return_label}"));
        self.line("D=A");
        self.push_d();

        // push the caller frame
        for pointer in ["LCL", "ARG", "THIS", "THAT"] {
            self.line(&format!("@{pointer}"));
            self.line("D=M");
            self.push_d();
        }

        // ARG = SP - 5 - args
        self.line("@5");
        self.line("D=A");
        self.line(&format!("@{args}"));
        self.line("D=D+A");
        self.line("@SP");
        self.line("D=M-D");
        self.line("@ARG");
        self.line("M=D");

        // LCL = SP
        self.line("@SP");
        self.line("D=M");
        self.line("@LCL");
        self.line("M=D");

        self.emit_goto(name);
        self.label(&return_label);
    }

    fn emit_return(&mut self) {
        // R13 = end frame
        self.line("@LCL");
        self.line("D=M");
        self.line("@R13");
        self.line("M=D");

        // R14 = saved return address
        self.frame_slot_into_d(5);
        self.line("@R14");
        self.line("M=D");

        // place the return value where the caller's stack top will be
        self.pop_into_d();
        self.line("@ARG");
        self.line("A=M");
        self.line("M=D");

        // SP = ARG + 1
        self.line("@ARG");
        self.line("D=M+1");
        self.line("@SP");
        self.line("M=D");

        // restore the caller frame
        for (offset, pointer) in [(1, "THAT"), (2, "THIS"), (3, "ARG"), (4, "LCL")] {
            self.frame_slot_into_d(offset);
            self.line(&format!("@{pointer}"));
            self.line("M=D");
        }

        // jump to the return address
        self.line("@R14");
        self.line("A=M");
        self.line("0;JMP");
    }

    // D = RAM[R13 - offset]
    fn frame_slot_into_d(&mut self, offset: u16) {
        self.line(&format!("@{offset}"));
        self.line("D=A");
        self.line("@R13");
        self.line("A=M-D");
        self.line("D=M");
    }

    fn set_pointer(&mut self, symbol: &str, value: u16) {
        self.line(&format!("@{value}"));
        self.line("D=A");
        self.line(&format!("@{symbol}"));
        self.line("M=D");
    }

    // *SP = D; SP++
    fn push_d(&mut self) {
        self.point_at_stack_top();
        self.line("M=D");
        self.increment_sp();
    }

    // SP--; D = *SP
    fn pop_into_d(&mut self) {
        self.decrement_sp();
        self.point_at_stack_top();
        self.line("D=M");
    }

    fn point_at_stack_top(&mut self) {
        self.line("@SP");
        self.line("A=M");
    }

    fn decrement_sp(&mut self) {
        self.line("@SP");
        self.line("M=M-1");
    }

    fn increment_sp(&mut self) {
        self.line("@SP");
        self.line("M=M+1");
    }

    fn next_label(&mut self) -> usize {
        let counter = self.label_counter;
        self.label_counter += 1;
        counter
    }

    fn line(&mut self, text: &str) {
        self.buffer.push_str(text);
        self.buffer.push('\n');
    }

    fn label(&mut self, name: &str) {
        self.line(&format!("({name})"));
    }

    fn comment(&mut self, text: &str) {
        self.line(&format!("// {text}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vm::parser::parse_source;

    fn emit(source: &str) -> String {
        let mut emitter = AsmEmitter::new();
        emitter.set_module("Test");
        for line in &parse_source(source).unwrap() {
            emitter.emit(line).unwrap();
        }
        emitter.finish()
    }

    #[test]
    fn test_push_constant() {
        let asm = emit("push constant 7\n");
        assert_eq!(
            asm,
            "// push constant 7\n@7\nD=A\n@SP\nA=M\nM=D\n@SP\nM=M+1\n"
        );
    }

    #[test]
    fn test_sub_computes_below_minus_top() {
        let asm = emit("sub\n");
        assert!(asm.contains("D=A-D"));
        assert!(!asm.contains("D=D-A"));
    }

    #[test]
    fn test_unary_rewrites_in_place() {
        let asm = emit("not\n");
        assert!(asm.contains("M=!M"));
        // net stack depth unchanged: one decrement, one increment
        assert_eq!(asm.matches("M=M-1").count(), 1);
        assert_eq!(asm.matches("M=M+1").count(), 1);
    }

    #[test]
    fn test_comparison_labels_are_unique() {
        let asm = emit("eq\neq\ngt\n");
        assert!(asm.contains("(EQ_0)"));
        assert!(asm.contains("(END_EQ_0)"));
        assert!(asm.contains("(EQ_1)"));
        assert!(asm.contains("(GT_2)"));
        assert_eq!(asm.matches("(EQ_0)").count(), 1);
    }

    #[test]
    fn test_lt_branch_structure() {
        let asm = emit("lt\n");
        assert!(asm.contains("@LT_0\nD;JLT\n"));
        assert!(asm.contains("0;JMP"));
        assert!(asm.contains("D=-1"));
    }

    #[test]
    fn test_indirect_segment_addressing() {
        let asm = emit("push local 3\n");
        assert!(asm.contains("@3\nD=A\n@LCL\nA=D+M\nD=M\n"));

        let asm = emit("push argument 0\n");
        assert!(asm.contains("@ARG\nA=D+M"));
    }

    #[test]
    fn test_pop_parks_address_in_r13() {
        let asm = emit("pop this 2\n");
        assert!(asm.contains("@2\nD=A\n@THIS\nA=D+M\nD=A\n@R13\nM=D\n"));
        assert!(asm.contains("@R13\nA=M\nM=D\n"));
    }

    #[test]
    fn test_static_is_mangled_with_the_module_name() {
        let asm = emit("push static 4\npop static 4\n");
        assert_eq!(asm.matches("@Test.4").count(), 2);
    }

    #[test]
    fn test_temp_and_pointer_resolve_to_fixed_registers() {
        assert!(emit("push temp 4\n").contains("@9\nD=M\n"));
        assert!(emit("pop pointer 0\n").contains("@THIS\nD=A\n"));
        assert!(emit("push pointer 1\n").contains("@THAT\nD=M\n"));
    }

    #[test]
    fn test_pop_constant_is_rejected() {
        let mut emitter = AsmEmitter::new();
        let lines = parse_source("pop constant 3\n").unwrap();
        let err = emitter.emit(&lines[0]).unwrap_err();
        assert!(matches!(err, TranslateError::Semantic { line: 1, .. }));
    }

    #[test]
    fn test_branching_ops() {
        assert!(emit("label WHILE\n").contains("(WHILE)\n"));
        assert!(emit("goto WHILE\n").contains("@WHILE\n0;JMP\n"));

        let asm = emit("if-goto WHILE\n");
        assert!(asm.contains("D=M\n@WHILE\nD;JNE\n"));
    }

    #[test]
    fn test_function_reserves_locals() {
        let asm = emit("function Main.run 2\n");
        assert!(asm.starts_with("// function Main.run 2\n(Main.run)\nD=0\n"));
        assert_eq!(asm.matches("M=M+1").count(), 2);
    }

    #[test]
    fn test_call_pushes_return_address_and_frame() {
        let asm = emit("call Main.run 2\n");
        assert!(asm.contains("@Main.run$ret.0\nD=A\n"));
        for pointer in ["@LCL\nD=M", "@ARG\nD=M", "@THIS\nD=M", "@THAT\nD=M"] {
            assert!(asm.contains(pointer));
        }
        assert!(asm.contains("@5\nD=A\n@2\nD=D+A\n@SP\nD=M-D\n@ARG\nM=D\n"));
        assert!(asm.contains("@Main.run\n0;JMP\n(Main.run$ret.0)\n"));
    }

    #[test]
    fn test_return_restores_frame_and_jumps_indirect() {
        let asm = emit("return\n");
        assert!(asm.contains("@LCL\nD=M\n@R13\nM=D\n"));
        assert!(asm.contains("@5\nD=A\n@R13\nA=M-D\nD=M\n@R14\nM=D\n"));
        for (offset, pointer) in [(1, "THAT"), (2, "THIS"), (3, "ARG"), (4, "LCL")] {
            assert!(asm.contains(&format!("@{offset}\nD=A\n@R13\nA=M-D\nD=M\n@{pointer}\nM=D\n")));
        }
        assert!(asm.ends_with("@R14\nA=M\n0;JMP\n"));
    }

    #[test]
    fn test_label_counter_spans_commands() {
        let mut emitter = AsmEmitter::new();
        emitter.set_module("A");
        for line in &parse_source("eq\n").unwrap() {
            emitter.emit(line).unwrap();
        }
        emitter.set_module("B");
        for line in &parse_source("call f 0\n").unwrap() {
            emitter.emit(line).unwrap();
        }
        let asm = emitter.finish();
        assert!(asm.contains("(EQ_0)"));
        assert!(asm.contains("(f$ret.1)"));
    }

    #[test]
    fn test_bootstrap_calls_sys_init() {
        let mut emitter = AsmEmitter::new();
        emitter.emit_bootstrap();
        let asm = emitter.finish();
        assert!(asm.starts_with("// bootstrap\n@256\nD=A\n@SP\nM=D\n"));
        assert!(asm.contains("@Sys.init\n0;JMP\n"));
        assert!(asm.contains("@Sys.init$ret.0\n"));
    }

    #[test]
    fn test_harness_init_sets_all_pointers() {
        let mut emitter = AsmEmitter::new();
        emitter.emit_harness_init();
        let asm = emitter.finish();
        for fragment in [
            "@256\nD=A\n@SP\nM=D\n",
            "@300\nD=A\n@LCL\nM=D\n",
            "@400\nD=A\n@ARG\nM=D\n",
            "@3000\nD=A\n@THIS\nM=D\n",
            "@3010\nD=A\n@THAT\nM=D\n",
        ] {
            assert!(asm.contains(fragment));
        }
    }
}

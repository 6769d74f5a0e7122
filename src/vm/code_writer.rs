//! Lowering of VM instructions to Hack assembly.

use log::trace;

use super::instruction::{LabelAction, Segment, VMCommand, VMInstruction};
use crate::hack::instruction::{Comp, Dest, Instruction, Jump, MAX_ADDRESS};

/// Initial value of the stack pointer.
pub const STACK_BASE: u16 = 256;
/// RAM address of `pointer 0` (`THIS`).
pub const POINTER_BASE: u16 = 3;
/// RAM address of `temp 0`.
pub const TEMP_BASE: u16 = 5;

pub const BOOTSTRAP_FUNCTION: &str = "Sys.init";

const SP: &str = "SP";
const LCL: &str = "LCL";
const ARG: &str = "ARG";
const THIS: &str = "THIS";
const THAT: &str = "THAT";

// scratch registers
const FRAME: &str = "R13";
const RETURN_ADDRESS: &str = "R14";
const POP_TARGET: &str = "R15";

/// Number of words a call saves below the callee's locals.
const FRAME_SIZE: usize = 5;

/// Accumulates the assembly for one output program.
#[derive(Debug, Default)]
pub struct CodeWriter {
    file_name: String,
    function_name: Option<String>,
    comparison_count: usize,
    return_count: usize,
    output: Vec<Instruction>,
}

impl CodeWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new source unit: statics become `file_name.index`.
    pub fn set_file_name(&mut self, file_name: &str) {
        file_name.clone_into(&mut self.file_name);
        self.function_name = None;
    }

    pub fn output(&self) -> &[Instruction] {
        &self.output
    }

    pub fn finish(self) -> Vec<Instruction> {
        self.output
    }

    /// `SP = 256; call Sys.init 0`
    pub fn write_init(&mut self) {
        self.emit([
            Instruction::value(STACK_BASE),
            Instruction::assign(Dest::D, Comp::A),
            Instruction::at(SP),
            Instruction::assign(Dest::M, Comp::D),
        ]);
        self.write_call(BOOTSTRAP_FUNCTION, 0);
    }

    pub fn write(&mut self, instruction: &VMInstruction) {
        trace!("{instruction}");

        match instruction {
            VMInstruction::Push(segment, index) => self.write_push(*segment, *index),
            VMInstruction::Pop(segment, index) => self.write_pop(*segment, *index),
            VMInstruction::Command(command) => self.write_arithmetic(*command),
            VMInstruction::Label(LabelAction::Label, label) => self.write_label(label),
            VMInstruction::Label(LabelAction::Goto, label) => self.write_goto(label),
            VMInstruction::Label(LabelAction::IfGoto, label) => self.write_if(label),
            VMInstruction::Function(name, local_count) => self.write_function(name, *local_count),
            VMInstruction::Call(name, argument_count) => self.write_call(name, *argument_count),
            VMInstruction::Return => self.write_return(),
        }
    }

    // region: arithmetic

    pub fn write_arithmetic(&mut self, command: VMCommand) {
        match command {
            VMCommand::Neg => self.write_unary(Comp::NegM),
            VMCommand::Not => self.write_unary(Comp::NotM),
            VMCommand::Add => self.write_binary(Comp::DPlusM),
            VMCommand::Sub => self.write_binary(Comp::MMinusD),
            VMCommand::And => self.write_binary(Comp::DAndM),
            VMCommand::Or => self.write_binary(Comp::DOrM),
            VMCommand::Eq => self.write_comparison(Jump::Jeq),
            VMCommand::Gt => self.write_comparison(Jump::Jgt),
            VMCommand::Lt => self.write_comparison(Jump::Jlt),
        }
    }

    /// Transform the top of the stack in place.
    fn write_unary(&mut self, comp: Comp) {
        self.emit([
            Instruction::at(SP),
            Instruction::assign(Dest::A, Comp::MMinusOne),
            Instruction::assign(Dest::M, comp),
        ]);
    }

    /// `D = y`, `A = &x`, then `x = comp`.
    fn write_binary(&mut self, comp: Comp) {
        self.pop_into_d();
        self.emit([
            Instruction::assign(Dest::A, Comp::AMinusOne),
            Instruction::assign(Dest::M, comp),
        ]);
    }

    /// `x - y` decides the branch; the result is all ones or all zeros.
    fn write_comparison(&mut self, jump: Jump) {
        let id = self.comparison_count;
        self.comparison_count += 1;

        let if_true = format!("COMPARE_TRUE_{id}");
        let end = format!("COMPARE_END_{id}");

        self.pop_into_d();
        self.emit([
            Instruction::assign(Dest::A, Comp::AMinusOne),
            Instruction::assign(Dest::D, Comp::MMinusD),
            Instruction::at(if_true.as_str()),
            Instruction::jump(Comp::D, jump),
            // false
            Instruction::at(SP),
            Instruction::assign(Dest::A, Comp::MMinusOne),
            Instruction::assign(Dest::M, Comp::Zero),
            Instruction::at(end.as_str()),
            Instruction::jump(Comp::Zero, Jump::Jmp),
            // true
            Instruction::label(if_true),
            Instruction::at(SP),
            Instruction::assign(Dest::A, Comp::MMinusOne),
            Instruction::assign(Dest::M, Comp::MinusOne),
            Instruction::label(end),
        ]);
    }

    // endregion

    // region: memory access

    pub fn write_push(&mut self, segment: Segment, index: usize) {
        match segment {
            Segment::Constant => self.emit([
                Instruction::value(word(index)),
                Instruction::assign(Dest::D, Comp::A),
            ]),
            Segment::Local | Segment::Argument | Segment::This | Segment::That => {
                self.emit([
                    Instruction::at(base_register(segment)),
                    Instruction::assign(Dest::D, Comp::M),
                    Instruction::value(word(index)),
                    Instruction::assign(Dest::A, Comp::DPlusA),
                    Instruction::assign(Dest::D, Comp::M),
                ]);
            }
            Segment::Pointer | Segment::Temp | Segment::Static => self.emit([
                self.fixed_address(segment, index),
                Instruction::assign(Dest::D, Comp::M),
            ]),
        }

        self.push_d();
    }

    pub fn write_pop(&mut self, segment: Segment, index: usize) {
        match segment {
            Segment::Local | Segment::Argument | Segment::This | Segment::That => {
                self.emit([
                    Instruction::at(base_register(segment)),
                    Instruction::assign(Dest::D, Comp::M),
                    Instruction::value(word(index)),
                    Instruction::assign(Dest::D, Comp::DPlusA),
                    Instruction::at(POP_TARGET),
                    Instruction::assign(Dest::M, Comp::D),
                ]);
                self.pop_into_d();
                self.emit([
                    Instruction::at(POP_TARGET),
                    Instruction::assign(Dest::A, Comp::M),
                    Instruction::assign(Dest::M, Comp::D),
                ]);
            }
            Segment::Pointer | Segment::Temp | Segment::Static => {
                self.pop_into_d();
                self.emit([
                    self.fixed_address(segment, index),
                    Instruction::assign(Dest::M, Comp::D),
                ]);
            }
            // the parser rejects this; a popped constant is simply discarded
            Segment::Constant => self.emit([
                Instruction::at(SP),
                Instruction::assign(Dest::M, Comp::MMinusOne),
            ]),
        }
    }

    /// `pointer`, `temp` and `static` need no base register.
    fn fixed_address(&self, segment: Segment, index: usize) -> Instruction {
        match segment {
            Segment::Pointer => Instruction::value(POINTER_BASE + word(index)),
            Segment::Temp => Instruction::value(TEMP_BASE + word(index)),
            _ => Instruction::at(format!("{}.{index}", self.file_name)),
        }
    }

    // endregion

    // region: program flow

    pub fn write_label(&mut self, label: &str) {
        let label = self.scoped_label(label);
        self.emit([Instruction::label(label)]);
    }

    pub fn write_goto(&mut self, label: &str) {
        let label = self.scoped_label(label);
        self.emit([Instruction::at(label), Instruction::jump(Comp::Zero, Jump::Jmp)]);
    }

    pub fn write_if(&mut self, label: &str) {
        let label = self.scoped_label(label);
        self.pop_into_d();
        self.emit([Instruction::at(label), Instruction::jump(Comp::D, Jump::Jne)]);
    }

    /// Labels live in the enclosing function, or in the file outside of one.
    fn scoped_label(&self, label: &str) -> String {
        let scope = self.function_name.as_deref().unwrap_or(&self.file_name);
        format!("{scope}${label}")
    }

    // endregion

    // region: function calls

    pub fn write_function(&mut self, name: &str, local_count: usize) {
        self.function_name = Some(name.to_owned());
        self.emit([Instruction::label(name)]);

        for _ in 0..local_count {
            self.emit([
                Instruction::at(SP),
                Instruction::assign(Dest::A, Comp::M),
                Instruction::assign(Dest::M, Comp::Zero),
                Instruction::at(SP),
                Instruction::assign(Dest::M, Comp::MPlusOne),
            ]);
        }
    }

    pub fn write_call(&mut self, name: &str, argument_count: usize) {
        // scoped user labels carry a single `$`, so this never collides
        let return_label = format!("{name}$ret${}", self.return_count);
        self.return_count += 1;

        self.emit([
            Instruction::at(return_label.as_str()),
            Instruction::assign(Dest::D, Comp::A),
        ]);
        self.push_d();

        for register in [LCL, ARG, THIS, THAT] {
            self.emit([Instruction::at(register), Instruction::assign(Dest::D, Comp::M)]);
            self.push_d();
        }

        self.emit([
            // ARG = SP - n - 5
            Instruction::at(SP),
            Instruction::assign(Dest::D, Comp::M),
            Instruction::value(word(argument_count + FRAME_SIZE)),
            Instruction::assign(Dest::D, Comp::DMinusA),
            Instruction::at(ARG),
            Instruction::assign(Dest::M, Comp::D),
            // LCL = SP
            Instruction::at(SP),
            Instruction::assign(Dest::D, Comp::M),
            Instruction::at(LCL),
            Instruction::assign(Dest::M, Comp::D),
            Instruction::at(name),
            Instruction::jump(Comp::Zero, Jump::Jmp),
            Instruction::label(return_label),
        ]);
    }

    /// The return address is read before `*ARG` is overwritten:
    /// with no arguments, `ARG` points at the saved return address.
    pub fn write_return(&mut self) {
        self.emit([
            // FRAME = LCL
            Instruction::at(LCL),
            Instruction::assign(Dest::D, Comp::M),
            Instruction::at(FRAME),
            Instruction::assign(Dest::M, Comp::D),
            // RET = *(FRAME - 5)
            Instruction::value(word(FRAME_SIZE)),
            Instruction::assign(Dest::A, Comp::DMinusA),
            Instruction::assign(Dest::D, Comp::M),
            Instruction::at(RETURN_ADDRESS),
            Instruction::assign(Dest::M, Comp::D),
        ]);

        // *ARG = pop()
        self.pop_into_d();
        self.emit([
            Instruction::at(ARG),
            Instruction::assign(Dest::A, Comp::M),
            Instruction::assign(Dest::M, Comp::D),
            // SP = ARG + 1
            Instruction::at(ARG),
            Instruction::assign(Dest::D, Comp::MPlusOne),
            Instruction::at(SP),
            Instruction::assign(Dest::M, Comp::D),
        ]);

        // THAT, THIS, ARG, LCL = *(FRAME - 1) .. *(FRAME - 4)
        for register in [THAT, THIS, ARG, LCL] {
            self.emit([
                Instruction::at(FRAME),
                Instruction::assign(Dest::Am, Comp::MMinusOne),
                Instruction::assign(Dest::D, Comp::M),
                Instruction::at(register),
                Instruction::assign(Dest::M, Comp::D),
            ]);
        }

        self.emit([
            Instruction::at(RETURN_ADDRESS),
            Instruction::assign(Dest::A, Comp::M),
            Instruction::jump(Comp::Zero, Jump::Jmp),
        ]);
    }

    // endregion

    // region: stack helpers

    /// `*SP = D; SP++`
    fn push_d(&mut self) {
        self.emit([
            Instruction::at(SP),
            Instruction::assign(Dest::A, Comp::M),
            Instruction::assign(Dest::M, Comp::D),
            Instruction::at(SP),
            Instruction::assign(Dest::M, Comp::MPlusOne),
        ]);
    }

    /// `SP--; D = *SP`, leaving `A` at the popped cell.
    fn pop_into_d(&mut self) {
        self.emit([
            Instruction::at(SP),
            Instruction::assign(Dest::Am, Comp::MMinusOne),
            Instruction::assign(Dest::D, Comp::M),
        ]);
    }

    fn emit<I: IntoIterator<Item = Instruction>>(&mut self, instructions: I) {
        self.output.extend(instructions);
    }

    // endregion
}

const fn base_register(segment: Segment) -> &'static str {
    match segment {
        Segment::Local => LCL,
        Segment::Argument => ARG,
        Segment::This => THIS,
        _ => THAT,
    }
}

/// Indices are validated to fit in 15 bits before they reach the writer.
#[allow(clippy::cast_possible_truncation)]
const fn word(value: usize) -> u16 {
    (value as u16) & MAX_ADDRESS
}

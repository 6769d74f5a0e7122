use log::debug;

use super::code_writer::CodeWriter;
use super::error::Error;
use super::instruction::VMInstruction;
use super::parser;
use crate::hack;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranslatorOptions {
    /// Emit `SP = 256; call Sys.init 0` before the first unit.
    pub bootstrap: bool,
}

impl Default for TranslatorOptions {
    fn default() -> Self {
        Self { bootstrap: true }
    }
}

/// Translates any number of VM units into a single assembly program.
///
/// A unit is parsed and validated completely before any of its code is
/// written, so a malformed unit leaves the program as it was.
#[derive(Debug)]
pub struct Translator {
    writer: CodeWriter,
    unit_count: usize,
}

impl Translator {
    pub fn new(options: TranslatorOptions) -> Self {
        let mut writer = CodeWriter::new();

        if options.bootstrap {
            writer.write_init();
        }

        Self {
            writer,
            unit_count: 0,
        }
    }

    /// Translate the (comment-stripped) lines of one `.vm` file.
    pub fn translate_unit<S: AsRef<str>>(&mut self, file_name: &str, lines: &[S]) -> Result<(), Error> {
        let instructions = parser::parse_program(lines)?;
        self.write_unit(file_name, &instructions);
        Ok(())
    }

    /// Translate instructions produced in memory, e.g. by the Jack compiler.
    /// Positions in errors are 1-based indices into `instructions`.
    pub fn translate_instructions(&mut self, file_name: &str, instructions: &[VMInstruction]) -> Result<(), Error> {
        for (index, instruction) in instructions.iter().enumerate() {
            parser::validate(instruction, index + 1)?;
        }

        self.write_unit(file_name, instructions);
        Ok(())
    }

    fn write_unit(&mut self, file_name: &str, instructions: &[VMInstruction]) {
        self.writer.set_file_name(file_name);

        for instruction in instructions {
            self.writer.write(instruction);
        }

        self.unit_count += 1;
        debug!("translated {file_name} ({} VM instructions)", instructions.len());
    }

    pub fn finish(self) -> Vec<hack::Instruction> {
        debug!(
            "{} unit(s) translated into {} assembly lines",
            self.unit_count,
            self.writer.output().len()
        );

        self.writer.finish()
    }
}

/// Translate a sequence of `(file name, lines)` units in order.
pub fn translate<N, S>(units: &[(N, Vec<S>)], options: TranslatorOptions) -> Result<Vec<hack::Instruction>, Error>
where
    N: AsRef<str>,
    S: AsRef<str>,
{
    let mut translator = Translator::new(options);

    for (file_name, lines) in units {
        translator.translate_unit(file_name.as_ref(), lines)?;
    }

    Ok(translator.finish())
}

/// Render assembly as `.asm` lines.
pub fn to_lines(instructions: &[hack::Instruction]) -> Vec<String> {
    instructions.iter().map(ToString::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hack::emulator::{Cpu, Halt};

    const SP: u16 = 0;
    const LCL: u16 = 1;
    const ARG: u16 = 2;
    const THIS: u16 = 3;
    const THAT: u16 = 4;

    /// Assemble and run with `SP = 256` preset, no bootstrap.
    fn run(lines: &[&str]) -> Cpu {
        let instructions = translate(&[("Test", lines.to_vec())], TranslatorOptions { bootstrap: false })
            .expect("program should translate");
        let words = hack::assemble_instructions(&instructions).expect("program should assemble");

        let mut cpu = Cpu::new(words);
        cpu.set(SP, 256);
        assert_eq!(cpu.run(10_000).0, Halt::EndOfProgram);
        cpu
    }

    #[test]
    fn test_push_push_add() {
        let cpu = run(&["push constant 2", "push constant 3", "add"]);

        assert_eq!(cpu.get(256), 5);
        assert_eq!(cpu.get(SP), 257);
    }

    #[test]
    fn test_stack_balance() {
        let cpu = run(&[
            "push constant 7",
            "push constant 8",
            "add",
            "push constant 20",
            "push constant 4",
            "sub",
            "push constant 3",
            "neg",
        ]);

        assert_eq!(cpu.get(SP), 259);
        assert_eq!(cpu.get(256), 15);
        assert_eq!(cpu.get(257), 16);
        assert_eq!(cpu.get(258), 3u16.wrapping_neg());
    }

    #[test]
    fn test_comparisons_and_logic() {
        let cpu = run(&[
            "push constant 7",
            "push constant 7",
            "eq",
            "push constant 3",
            "push constant 9",
            "gt",
            "push constant 3",
            "push constant 9",
            "lt",
            "push constant 12",
            "push constant 10",
            "and",
            "push constant 12",
            "push constant 3",
            "or",
        ]);

        assert_eq!(cpu.get(256), 0xFFFF);
        assert_eq!(cpu.get(257), 0);
        assert_eq!(cpu.get(258), 0xFFFF);
        assert_eq!(cpu.get(259), 8);
        assert_eq!(cpu.get(260), 15);
        assert_eq!(cpu.get(SP), 261);
    }

    #[test]
    fn test_memory_segments() {
        let mut lines = vec!["push constant 3000", "pop pointer 0", "push constant 4000", "pop pointer 1"];
        lines.extend([
            "push constant 10",
            "pop this 2",
            "push constant 21",
            "pop that 5",
            "push constant 36",
            "pop temp 6",
            "push constant 42",
            "pop static 1",
            "push this 2",
            "push that 5",
            "add",
            "push temp 6",
            "add",
            "push static 1",
            "add",
        ]);

        let cpu = run(&lines);

        assert_eq!(cpu.get(THIS), 3000);
        assert_eq!(cpu.get(THAT), 4000);
        assert_eq!(cpu.get(3002), 10);
        assert_eq!(cpu.get(4005), 21);
        assert_eq!(cpu.get(11), 36);
        assert_eq!(cpu.get(16), 42);
        assert_eq!(cpu.get(256), 10 + 21 + 36 + 42);
    }

    #[test]
    fn test_branching_loop() {
        // sum 1..=5 into temp 0
        let cpu = run(&[
            "push constant 5",
            "pop temp 1",
            "label LOOP",
            "push temp 0",
            "push temp 1",
            "add",
            "pop temp 0",
            "push temp 1",
            "push constant 1",
            "sub",
            "pop temp 1",
            "push temp 1",
            "if-goto LOOP",
        ]);

        assert_eq!(cpu.get(5), 15);
        assert_eq!(cpu.get(SP), 256);
    }

    #[test]
    fn test_call_return_symmetry() {
        let instructions = translate(
            &[(
                "Sys",
                vec![
                    "function Sys.init 0",
                    "push constant 7",
                    "push constant 8",
                    "call Sys.add 2",
                    "label HALT",
                    "goto HALT",
                    "function Sys.add 1",
                    "push argument 0",
                    "push argument 1",
                    "add",
                    "pop local 0",
                    "push local 0",
                    "return",
                ],
            )],
            TranslatorOptions::default(),
        )
        .expect("program should translate");

        let words = hack::assemble_instructions(&instructions).expect("program should assemble");
        let mut cpu = Cpu::new(words);
        assert_eq!(cpu.run(2_000).0, Halt::StepLimit);

        // bootstrap frame of Sys.init: saved at 256..=260, locals from 261
        assert_eq!(cpu.get(LCL), 261);
        assert_eq!(cpu.get(ARG), 256);
        // two arguments consumed, one result produced
        assert_eq!(cpu.get(SP), 262);
        assert_eq!(cpu.get(261), 15);
    }

    /// Run a bootstrapped program until the step budget is spent.
    fn run_bootstrapped(lines: Vec<&str>) -> (Vec<String>, Cpu) {
        let instructions = translate(&[("Sys", lines)], TranslatorOptions::default())
            .expect("program should translate");
        let words = hack::assemble_instructions(&instructions).expect("program should assemble");

        let mut cpu = Cpu::new(words);
        assert_eq!(cpu.run(2_000).0, Halt::StepLimit);
        (to_lines(&instructions), cpu)
    }

    #[test]
    fn test_return_labels_do_not_clash_with_user_labels() {
        let (output, cpu) = run_bootstrapped(vec![
            "function Sys.init 0",
            "call Foo.f 0",
            "pop temp 0",
            "label HALT",
            "goto HALT",
            "function Foo.f 0",
            "goto ret.1",
            "push constant 1",
            "label ret.1",
            "push constant 9",
            "return",
        ]);

        let labels: Vec<&String> = output.iter().filter(|line| line.starts_with('(')).collect();
        let unique: std::collections::HashSet<&String> = labels.iter().copied().collect();
        assert_eq!(labels.len(), unique.len(), "duplicate labels in {labels:?}");

        assert_eq!(cpu.get(5), 9);
        assert_eq!(cpu.get(SP), 261);
    }

    #[test]
    fn test_return_restores_caller_pointers() {
        let (_, cpu) = run_bootstrapped(vec![
            "function Sys.init 0",
            "push constant 3000",
            "pop pointer 0",
            "push constant 4000",
            "pop pointer 1",
            "call Foo.g 0",
            "pop temp 0",
            "label HALT",
            "goto HALT",
            "function Foo.g 0",
            "push constant 1234",
            "pop pointer 0",
            "push constant 5678",
            "pop pointer 1",
            "push constant 42",
            "return",
        ]);

        assert_eq!(cpu.get(5), 42);
        assert_eq!(cpu.get(THIS), 3000);
        assert_eq!(cpu.get(THAT), 4000);
        assert_eq!(cpu.get(SP), 261);
        assert_eq!(cpu.get(LCL), 261);
        assert_eq!(cpu.get(ARG), 256);
    }

    #[test]
    fn test_malformed_unit_is_rejected_whole() {
        let mut translator = Translator::new(TranslatorOptions { bootstrap: false });
        translator
            .translate_unit("Good", &["push constant 1"])
            .expect("unit should translate");

        let error = translator.translate_unit("Bad", &["push constant 2", "frobnicate"]);
        assert_eq!(
            error,
            Err(Error::UnknownCommand {
                line: 2,
                command: String::from("frobnicate"),
            })
        );

        let output = to_lines(&translator.finish());
        assert!(output.contains(&String::from("@1")));
        assert!(!output.contains(&String::from("@2")));
    }

    #[test]
    fn test_static_namespacing_per_unit() {
        let instructions = translate(
            &[
                ("A", vec!["push constant 1", "pop static 0"]),
                ("B", vec!["push constant 2", "pop static 0"]),
            ],
            TranslatorOptions { bootstrap: false },
        )
        .expect("program should translate");

        let output = to_lines(&instructions);
        assert!(output.contains(&String::from("@A.0")));
        assert!(output.contains(&String::from("@B.0")));
    }
}

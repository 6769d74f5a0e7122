//! A small Hack CPU model: 32K words of data memory, `A`, `D` and `PC`.
//! Used to observe what assembled programs actually do.

use log::trace;

use super::instruction::{Address, Instruction, Word, MAX_ADDRESS};

pub const RAM_SIZE: usize = 32 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Halt {
    /// `PC` left the loaded program.
    EndOfProgram,
    /// The step budget ran out first.
    StepLimit,
    /// The word at `PC` has no valid `comp` field.
    InvalidInstruction(u16),
}

#[derive(Debug, Clone)]
pub struct Cpu {
    rom: Vec<Word>,
    ram: Vec<u16>,
    a: u16,
    d: u16,
    pc: u16,
}

// Memory access
impl Cpu {
    pub fn get(&self, address: u16) -> u16 {
        self.ram[usize::from(address & MAX_ADDRESS)]
    }

    pub fn set(&mut self, address: u16, value: u16) {
        self.ram[usize::from(address & MAX_ADDRESS)] = value;
    }

    pub const fn a(&self) -> u16 {
        self.a
    }

    pub const fn d(&self) -> u16 {
        self.d
    }

    pub const fn pc(&self) -> u16 {
        self.pc
    }
}

impl Cpu {
    pub fn new(rom: Vec<Word>) -> Self {
        Self {
            rom,
            ram: vec![0; RAM_SIZE],
            a: 0,
            d: 0,
            pc: 0,
        }
    }

    /// Execute until the program runs off its end or `max_steps` instructions ran.
    /// Returns why execution stopped and how many instructions were executed.
    pub fn run(&mut self, max_steps: usize) -> (Halt, usize) {
        for step in 0..max_steps {
            if let Some(halt) = self.step() {
                return (halt, step);
            }
        }

        (Halt::StepLimit, max_steps)
    }

    /// Execute a single instruction. Returns `Some` when the CPU cannot proceed.
    pub fn step(&mut self) -> Option<Halt> {
        let Some(&word) = self.rom.get(usize::from(self.pc)) else {
            return Some(Halt::EndOfProgram);
        };
        let Some(instruction) = word.disassemble() else {
            return Some(Halt::InvalidInstruction(word.0));
        };

        trace!("[{:0>5}] {instruction}", self.pc);

        match instruction {
            Instruction::Address(Address::Value(value)) => {
                self.a = value;
                self.pc += 1;
            }
            Instruction::Compute { dest, comp, jump } => {
                let target = self.a;
                let value = comp.evaluate(self.a, self.d, self.get(target));

                if let Some(dest) = dest {
                    if dest.writes_m() {
                        self.set(target, value);
                    }
                    if dest.writes_a() {
                        self.a = value;
                    }
                    if dest.writes_d() {
                        self.d = value;
                    }
                }

                #[allow(clippy::cast_possible_wrap)]
                let signed = value as i16;
                self.pc = match jump {
                    Some(jump) if jump.is_taken(signed) => target,
                    _ => self.pc + 1,
                };
            }
            // disassembly never yields symbols or labels
            Instruction::Address(Address::Symbol(_)) | Instruction::Label(_) => self.pc += 1,
        }

        None
    }
}

impl std::fmt::Display for Halt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EndOfProgram => write!(f, "end of program"),
            Self::StepLimit => write!(f, "step limit reached"),
            Self::InvalidInstruction(word) => write!(f, "invalid instruction {word:016b}"),
        }
    }
}

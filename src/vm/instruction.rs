//! Hack VM vocabulary shared by the Jack code generator (which emits it)
//! and the VM translator (which parses and lowers it to Hack assembly).
//!
//! Both stages must always agree on spelling, so every mnemonic is defined
//! exactly once here, as a closed enum with its textual form derived by `strum`.

// region: VMInstructionBlock

/// An ordered run of VM instructions, rendered one per line.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct VMInstructionBlock {
    instructions: Vec<VMInstruction>,
}

impl VMInstructionBlock {
    pub fn instructions(&self) -> &[VMInstruction] {
        &self.instructions
    }

    pub fn lines(&self) -> Vec<String> {
        self.instructions.iter().map(ToString::to_string).collect()
    }

    pub fn compile(&self) -> String {
        self.to_string()
    }
}

impl std::fmt::Display for VMInstructionBlock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.lines().join("\n"))
    }
}

impl From<Vec<VMInstruction>> for VMInstructionBlock {
    fn from(instructions: Vec<VMInstruction>) -> Self {
        Self { instructions }
    }
}

impl From<&[VMInstruction]> for VMInstructionBlock {
    fn from(instructions: &[VMInstruction]) -> Self {
        Self {
            instructions: instructions.to_vec(),
        }
    }
}

// endregion

// region: VMInstruction

// region: VMInstruction utility functions

/// Utility function for the `push` VM instruction.
pub const fn push(segment: Segment, i: usize) -> VMInstruction {
    VMInstruction::Push(segment, i)
}

/// Utility function for the `pop` VM instruction.
pub const fn pop(segment: Segment, i: usize) -> VMInstruction {
    VMInstruction::Pop(segment, i)
}

/// Utility function for the arithmetic/logical VM instructions.
pub const fn command(command: VMCommand) -> VMInstruction {
    VMInstruction::Command(command)
}

/// Utility function for the `return` VM instruction.
pub const fn vm_return() -> VMInstruction {
    VMInstruction::Return
}

/// Utility function for the `label`, `goto` and `if-goto` VM instructions.
pub fn label<S: Into<String>>(label_action: LabelAction, label: S) -> VMInstruction {
    VMInstruction::Label(label_action, label.into())
}

/// Utility function for the `function` VM instruction.
pub fn function<S: Into<String>>(function_name: S, variable_count: usize) -> VMInstruction {
    VMInstruction::Function(function_name.into(), variable_count)
}

/// Utility function for the `call` VM instruction.
pub fn call<S: Into<String>>(function_name: S, argument_count: usize) -> VMInstruction {
    VMInstruction::Call(function_name.into(), argument_count)
}

/// Push the canonical `true` (all bits set).
pub fn r#true() -> Vec<VMInstruction> {
    vec![push(Segment::Constant, 1), command(VMCommand::Neg)]
}

/// Push the canonical `false` (no bits set).
pub const fn r#false() -> VMInstruction {
    push(Segment::Constant, 0)
}

// endregion

pub type Index = usize;
pub type Label = String;
pub type Count = usize;
pub type FunctionName = String;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VMInstruction {
    Push(Segment, Index),
    Pop(Segment, Index),
    Command(VMCommand),
    Label(LabelAction, Label),
    Function(FunctionName, Count),
    Call(FunctionName, Count),
    Return,
}

impl VMInstruction {
    fn as_instruction(&self) -> String {
        match self {
            Self::Push(segment, i) => format!("push {segment} {i}"),
            Self::Pop(segment, i) => format!("pop {segment} {i}"),
            Self::Command(command) => command.to_string(),
            Self::Label(label_action, label) => format!("{label_action} {label}"),
            Self::Function(function_name, variable_count) => {
                format!("function {function_name} {variable_count}")
            }
            Self::Call(function_name, argument_count) => {
                format!("call {function_name} {argument_count}")
            }
            Self::Return => String::from("return"),
        }
    }
}

impl std::fmt::Display for VMInstruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_instruction())
    }
}

/// Arithmetic and logical stack commands.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::EnumIter,
)]
#[strum(serialize_all = "kebab-case")]
pub enum VMCommand {
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

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::EnumIter,
)]
#[strum(serialize_all = "kebab-case")]
pub enum LabelAction {
    Label,
    Goto,
    IfGoto,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::EnumIter,
)]
#[strum(serialize_all = "kebab-case")]
pub enum Segment {
    Local,
    Argument,
    Static,
    Constant,
    This,
    That,
    Pointer,
    Temp,
}

impl Segment {
    /// Number of addressable cells for segments with a fixed size.
    pub const fn capacity(self) -> Option<usize> {
        match self {
            Self::Pointer => Some(2),
            Self::Temp => Some(8),
            // 15-bit constants
            Self::Constant => Some(32768),
            _ => None,
        }
    }
}

// endregion

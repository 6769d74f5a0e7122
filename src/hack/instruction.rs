//! Hack machine-language instructions and their 16-bit encodings.

use strum::IntoEnumIterator;

/// Largest value an A-instruction can load (15 bits).
pub const MAX_ADDRESS: u16 = 0x7FFF;

const COMPUTE_PREFIX: u16 = 0b111 << 13;

// region: Instruction

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Address {
    Value(u16),
    Symbol(String),
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Value(value) => write!(f, "{value}"),
            Self::Symbol(symbol) => write!(f, "{symbol}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Instruction {
    /// `@value` or `@symbol`
    Address(Address),
    /// `dest=comp;jump`
    Compute {
        dest: Option<Dest>,
        comp: Comp,
        jump: Option<Jump>,
    },
    /// `(LABEL)`, a pseudo-instruction occupying no ROM slot.
    Label(String),
}

impl Instruction {
    pub fn at<S: Into<String>>(symbol: S) -> Self {
        Self::Address(Address::Symbol(symbol.into()))
    }

    pub const fn value(value: u16) -> Self {
        Self::Address(Address::Value(value))
    }

    pub const fn assign(dest: Dest, comp: Comp) -> Self {
        Self::Compute {
            dest: Some(dest),
            comp,
            jump: None,
        }
    }

    pub const fn jump(comp: Comp, jump: Jump) -> Self {
        Self::Compute {
            dest: None,
            comp,
            jump: Some(jump),
        }
    }

    pub fn label<S: Into<String>>(name: S) -> Self {
        Self::Label(name.into())
    }
}

impl std::fmt::Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Address(address) => write!(f, "@{address}"),
            Self::Compute { dest, comp, jump } => {
                if let Some(dest) = dest {
                    write!(f, "{dest}=")?;
                }
                write!(f, "{comp}")?;
                if let Some(jump) = jump {
                    write!(f, ";{jump}")?;
                }
                Ok(())
            }
            Self::Label(name) => write!(f, "({name})"),
        }
    }
}

// endregion

// region: mnemonic tables

/// Destination field. The discriminant is the 3-bit `d1 d2 d3` encoding.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::EnumIter,
)]
#[repr(u16)]
pub enum Dest {
    #[strum(to_string = "M")]
    M = 0b001,
    #[strum(to_string = "D")]
    D = 0b010,
    #[strum(to_string = "MD", serialize = "DM")]
    Md = 0b011,
    #[strum(to_string = "A")]
    A = 0b100,
    #[strum(to_string = "AM", serialize = "MA")]
    Am = 0b101,
    #[strum(to_string = "AD", serialize = "DA")]
    Ad = 0b110,
    #[strum(to_string = "AMD", serialize = "ADM")]
    Amd = 0b111,
}

impl Dest {
    pub const fn bits(self) -> u16 {
        self as u16
    }

    pub fn from_bits(bits: u16) -> Option<Self> {
        Self::iter().find(|dest| dest.bits() == bits)
    }

    pub const fn writes_a(self) -> bool {
        self.bits() & 0b100 != 0
    }

    pub const fn writes_d(self) -> bool {
        self.bits() & 0b010 != 0
    }

    pub const fn writes_m(self) -> bool {
        self.bits() & 0b001 != 0
    }
}

/// Jump field. The discriminant is the 3-bit `j1 j2 j3` encoding.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::EnumIter,
)]
#[strum(serialize_all = "UPPERCASE")]
#[repr(u16)]
pub enum Jump {
    Jgt = 0b001,
    Jeq = 0b010,
    Jge = 0b011,
    Jlt = 0b100,
    Jne = 0b101,
    Jle = 0b110,
    Jmp = 0b111,
}

impl Jump {
    pub const fn bits(self) -> u16 {
        self as u16
    }

    pub fn from_bits(bits: u16) -> Option<Self> {
        Self::iter().find(|jump| jump.bits() == bits)
    }

    /// Whether the ALU output, read as a signed word, satisfies the condition.
    pub const fn is_taken(self, value: i16) -> bool {
        match self {
            Self::Jgt => value > 0,
            Self::Jeq => value == 0,
            Self::Jge => value >= 0,
            Self::Jlt => value < 0,
            Self::Jne => value != 0,
            Self::Jle => value <= 0,
            Self::Jmp => true,
        }
    }
}

/// Computation field. The discriminant is the 7-bit `a c1..c6` encoding.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::EnumIter,
)]
#[repr(u16)]
pub enum Comp {
    #[strum(to_string = "0")]
    Zero = 0b010_1010,
    #[strum(to_string = "1")]
    One = 0b011_1111,
    #[strum(to_string = "-1")]
    MinusOne = 0b011_1010,
    #[strum(to_string = "D")]
    D = 0b000_1100,
    #[strum(to_string = "A")]
    A = 0b011_0000,
    #[strum(to_string = "!D")]
    NotD = 0b000_1101,
    #[strum(to_string = "!A")]
    NotA = 0b011_0001,
    #[strum(to_string = "-D")]
    NegD = 0b000_1111,
    #[strum(to_string = "-A")]
    NegA = 0b011_0011,
    #[strum(to_string = "D+1")]
    DPlusOne = 0b001_1111,
    #[strum(to_string = "A+1")]
    APlusOne = 0b011_0111,
    #[strum(to_string = "D-1")]
    DMinusOne = 0b000_1110,
    #[strum(to_string = "A-1")]
    AMinusOne = 0b011_0010,
    #[strum(to_string = "D+A", serialize = "A+D")]
    DPlusA = 0b000_0010,
    #[strum(to_string = "D-A")]
    DMinusA = 0b001_0011,
    #[strum(to_string = "A-D")]
    AMinusD = 0b000_0111,
    #[strum(to_string = "D&A", serialize = "A&D")]
    DAndA = 0b000_0000,
    #[strum(to_string = "D|A", serialize = "A|D")]
    DOrA = 0b001_0101,
    #[strum(to_string = "M")]
    M = 0b111_0000,
    #[strum(to_string = "!M")]
    NotM = 0b111_0001,
    #[strum(to_string = "-M")]
    NegM = 0b111_0011,
    #[strum(to_string = "M+1")]
    MPlusOne = 0b111_0111,
    #[strum(to_string = "M-1")]
    MMinusOne = 0b111_0010,
    #[strum(to_string = "D+M", serialize = "M+D")]
    DPlusM = 0b100_0010,
    #[strum(to_string = "D-M")]
    DMinusM = 0b101_0011,
    #[strum(to_string = "M-D")]
    MMinusD = 0b100_0111,
    #[strum(to_string = "D&M", serialize = "M&D")]
    DAndM = 0b100_0000,
    #[strum(to_string = "D|M", serialize = "M|D")]
    DOrM = 0b101_0101,
}

impl Comp {
    pub const fn bits(self) -> u16 {
        self as u16
    }

    pub fn from_bits(bits: u16) -> Option<Self> {
        Self::iter().find(|comp| comp.bits() == bits)
    }

    /// The `a` bit: operand is `M` rather than `A`.
    pub const fn reads_memory(self) -> bool {
        self.bits() & 0b100_0000 != 0
    }

    /// Run the ALU. `m` is only meaningful when [`Self::reads_memory`] holds.
    pub const fn evaluate(self, a: u16, d: u16, m: u16) -> u16 {
        let y = if self.reads_memory() { m } else { a };

        match self {
            Self::Zero => 0,
            Self::One => 1,
            Self::MinusOne => u16::MAX,
            Self::D => d,
            Self::A | Self::M => y,
            Self::NotD => !d,
            Self::NotA | Self::NotM => !y,
            Self::NegD => d.wrapping_neg(),
            Self::NegA | Self::NegM => y.wrapping_neg(),
            Self::DPlusOne => d.wrapping_add(1),
            Self::APlusOne | Self::MPlusOne => y.wrapping_add(1),
            Self::DMinusOne => d.wrapping_sub(1),
            Self::AMinusOne | Self::MMinusOne => y.wrapping_sub(1),
            Self::DPlusA | Self::DPlusM => d.wrapping_add(y),
            Self::DMinusA | Self::DMinusM => d.wrapping_sub(y),
            Self::AMinusD | Self::MMinusD => y.wrapping_sub(d),
            Self::DAndA | Self::DAndM => d & y,
            Self::DOrA | Self::DOrM => d | y,
        }
    }
}

// endregion

// region: Word

/// One 16-bit word of Hack machine code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Word(pub u16);

impl Word {
    pub const fn address(value: u16) -> Self {
        Self(value & MAX_ADDRESS)
    }

    pub fn compute(dest: Option<Dest>, comp: Comp, jump: Option<Jump>) -> Self {
        Self(
            COMPUTE_PREFIX
                | comp.bits() << 6
                | dest.map_or(0, Dest::bits) << 3
                | jump.map_or(0, Jump::bits),
        )
    }

    pub const fn is_compute(self) -> bool {
        self.0 & (1 << 15) != 0
    }

    /// Decode the word back into a numeric instruction.
    /// Returns `None` for C-instruction words whose `comp` field has no mnemonic.
    pub fn disassemble(self) -> Option<Instruction> {
        if !self.is_compute() {
            return Some(Instruction::value(self.0));
        }

        let comp = Comp::from_bits((self.0 >> 6) & 0b111_1111)?;
        let dest = Dest::from_bits((self.0 >> 3) & 0b111);
        let jump = Jump::from_bits(self.0 & 0b111);

        Some(Instruction::Compute { dest, comp, jump })
    }
}

impl std::fmt::Display for Word {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016b}", self.0)
    }
}

// endregion

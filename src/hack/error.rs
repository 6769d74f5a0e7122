use thiserror::Error;

/// Which C-instruction field a mnemonic was looked up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Field {
    Dest,
    Comp,
    Jump,
}

/// Everything that aborts assembling a unit. Line numbers are 1-based.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("line {line}: cannot parse `{text}` as a Hack instruction")]
    Syntax { line: usize, text: String },

    #[error("line {line}: unknown {field} mnemonic `{mnemonic}`")]
    UnknownMnemonic {
        line: usize,
        field: Field,
        mnemonic: String,
    },

    #[error("line {line}: undefined symbol `{symbol}`")]
    UndefinedSymbol { line: usize, symbol: String },

    #[error("line {line}: address `{value}` does not fit in 15 bits")]
    AddressOutOfRange { line: usize, value: String },
}

//! Two-pass Hack assembler.

use log::{debug, trace};

use super::error::Error;
use super::instruction::{Address, Instruction, Word, MAX_ADDRESS};
use super::parser;
use super::symbol_table::SymbolTable;

type NumberedInstruction = (usize, Instruction);

/// Assemble comment-stripped assembly lines into machine words.
pub fn assemble<S: AsRef<str>>(lines: &[S]) -> Result<Vec<Word>, Error> {
    let program = parser::parse_program(lines)?;
    assemble_program(&program)
}

/// Assemble already-typed instructions (e.g. straight out of the VM translator).
/// Errors refer to the 1-based position in `instructions`.
pub fn assemble_instructions(instructions: &[Instruction]) -> Result<Vec<Word>, Error> {
    let program: Vec<NumberedInstruction> = instructions
        .iter()
        .cloned()
        .enumerate()
        .map(|(index, instruction)| (index + 1, instruction))
        .collect();

    assemble_program(&program)
}

/// Render machine words as `.hack` lines.
pub fn to_lines(words: &[Word]) -> Vec<String> {
    words.iter().map(ToString::to_string).collect()
}

fn assemble_program(program: &[NumberedInstruction]) -> Result<Vec<Word>, Error> {
    let mut symbols = SymbolTable::new();

    bind_labels(program, &mut symbols)?;
    bind_variables(program, &mut symbols)?;

    let words = program
        .iter()
        .map(|(line, instruction)| encode(instruction, *line, &symbols))
        .filter_map(Result::transpose)
        .collect::<Result<Vec<_>, _>>()?;

    debug!(
        "assembled {} words ({} variables allocated)",
        words.len(),
        symbols.variable_count()
    );

    Ok(words)
}

/// Pass 1: bind every label to the address of the next real instruction.
fn bind_labels(program: &[NumberedInstruction], symbols: &mut SymbolTable) -> Result<(), Error> {
    let mut program_counter: usize = 0;

    for (line, instruction) in program {
        match instruction {
            Instruction::Label(name) => {
                let address = u16::try_from(program_counter)
                    .ok()
                    .filter(|address| *address <= MAX_ADDRESS)
                    .ok_or_else(|| Error::AddressOutOfRange {
                        line: *line,
                        value: program_counter.to_string(),
                    })?;

                if symbols.add_entry(name, address) {
                    trace!("label {name} -> {address}");
                }
            }
            _ => program_counter += 1,
        }
    }

    Ok(())
}

/// Pass 2: bind every still-unknown address symbol to a fresh variable.
fn bind_variables(program: &[NumberedInstruction], symbols: &mut SymbolTable) -> Result<(), Error> {
    for (line, instruction) in program {
        let Instruction::Address(Address::Symbol(symbol)) = instruction else {
            continue;
        };

        if symbols.contains(symbol) {
            continue;
        }

        let address = symbols
            .allocate_variable(symbol)
            .ok_or_else(|| Error::AddressOutOfRange {
                line: *line,
                value: symbol.clone(),
            })?;

        trace!("variable {symbol} -> {address}");
    }

    Ok(())
}

/// Final pass: labels produce no word.
fn encode(instruction: &Instruction, line: usize, symbols: &SymbolTable) -> Result<Option<Word>, Error> {
    let word = match instruction {
        Instruction::Label(_) => return Ok(None),
        Instruction::Address(Address::Value(value)) => Word::address(*value),
        Instruction::Address(Address::Symbol(symbol)) => {
            let address = symbols
                .address_of(symbol)
                .ok_or_else(|| Error::UndefinedSymbol {
                    line,
                    symbol: symbol.clone(),
                })?;

            Word::address(address)
        }
        Instruction::Compute { dest, comp, jump } => Word::compute(*dest, *comp, *jump),
    };

    Ok(Some(word))
}

use std::collections::HashMap;

use phf::phf_map;

/// First RAM address handed out to assembly variables.
pub const VARIABLE_BASE: u16 = 16;

pub const SCREEN: u16 = 16384;
pub const KBD: u16 = 24576;

static PREDEFINED: phf::Map<&'static str, u16> = phf_map! {
    // virtual registers
    "SP" => 0,
    "LCL" => 1,
    "ARG" => 2,
    "THIS" => 3,
    "THAT" => 4,

    "R0" => 0,
    "R1" => 1,
    "R2" => 2,
    "R3" => 3,
    "R4" => 4,
    "R5" => 5,
    "R6" => 6,
    "R7" => 7,
    "R8" => 8,
    "R9" => 9,
    "R10" => 10,
    "R11" => 11,
    "R12" => 12,
    "R13" => 13,
    "R14" => 14,
    "R15" => 15,

    // memory-mapped I/O
    "SCREEN" => 16384,
    "KBD" => 24576,
};

/// Flat `symbol -> address` mapping, seeded with the predefined symbols.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    entries: HashMap<String, u16>,
    next_variable: u16,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    pub fn new() -> Self {
        let entries = PREDEFINED
            .entries()
            .map(|(symbol, address)| ((*symbol).to_owned(), *address))
            .collect();

        Self {
            entries,
            next_variable: VARIABLE_BASE,
        }
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.entries.contains_key(symbol)
    }

    pub fn address_of(&self, symbol: &str) -> Option<u16> {
        self.entries.get(symbol).copied()
    }

    /// Bind `symbol` unless it is already bound. Returns whether it was added.
    pub fn add_entry(&mut self, symbol: &str, address: u16) -> bool {
        if self.contains(symbol) {
            return false;
        }

        self.entries.insert(symbol.to_owned(), address);
        true
    }

    /// Bind `symbol` to the next free variable address.
    /// Returns `None` once the data memory below `SCREEN` is exhausted.
    pub fn allocate_variable(&mut self, symbol: &str) -> Option<u16> {
        if let Some(address) = self.address_of(symbol) {
            return Some(address);
        }

        if self.next_variable >= SCREEN {
            return None;
        }

        let address = self.next_variable;
        self.entries.insert(symbol.to_owned(), address);
        self.next_variable += 1;

        Some(address)
    }

    /// Number of variables allocated so far.
    pub const fn variable_count(&self) -> u16 {
        self.next_variable - VARIABLE_BASE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predefined_symbols() {
        let table = SymbolTable::new();

        assert_eq!(table.address_of("SP"), Some(0));
        assert_eq!(table.address_of("THAT"), Some(4));
        assert_eq!(table.address_of("R13"), Some(13));
        assert_eq!(table.address_of("SCREEN"), Some(SCREEN));
        assert_eq!(table.address_of("KBD"), Some(KBD));
        assert_eq!(table.address_of("LOOP"), None);
        assert_eq!(table.address_of("R15"), Some(15));
    }

    #[test]
    fn test_variables_are_allocated_sequentially() {
        let mut table = SymbolTable::new();

        assert_eq!(table.allocate_variable("i"), Some(16));
        assert_eq!(table.allocate_variable("sum"), Some(17));
        assert_eq!(table.allocate_variable("i"), Some(16));
        assert_eq!(table.allocate_variable("R2"), Some(2));
        assert_eq!(table.variable_count(), 2);
    }

    #[test]
    fn test_first_binding_wins() {
        let mut table = SymbolTable::new();

        assert!(table.add_entry("LOOP", 4));
        assert!(!table.add_entry("LOOP", 10));
        assert!(!table.add_entry("SP", 10));
        assert_eq!(table.address_of("LOOP"), Some(4));
        assert_eq!(table.address_of("SP"), Some(0));
    }
}

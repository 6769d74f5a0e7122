use std::collections::HashMap;

use log::debug;

use crate::vm;

/// Storage class of a Jack variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Kind {
    Static,
    Field,
    Argument,
    Local,
}

impl Kind {
    /// The VM segment variables of this kind live in.
    pub const fn segment(self) -> vm::Segment {
        match self {
            Self::Static => vm::Segment::Static,
            Self::Field => vm::Segment::This,
            Self::Argument => vm::Segment::Argument,
            Self::Local => vm::Segment::Local,
        }
    }

    const fn is_class_level(self) -> bool {
        matches!(self, Self::Static | Self::Field)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub r#type: String,
    pub kind: Kind,
    pub index: usize,
}

impl Entry {
    /// Helper function for performing a `push`
    /// action with the variable's segment and index.
    pub fn push(&self) -> vm::VMInstruction {
        vm::push(self.kind.segment(), self.index)
    }

    /// Helper function for performing a `pop`
    /// action with the variable's segment and index.
    pub fn pop(&self) -> vm::VMInstruction {
        vm::pop(self.kind.segment(), self.index)
    }
}

type Name = String;

// region: SymbolTable

/// Two-level scope: class (statics and fields) and the current subroutine
/// (arguments and locals). Subroutine entries shadow class entries.
#[derive(Debug, Default)]
pub struct SymbolTable {
    class_scope: ScopeFrame,
    subroutine_scope: ScopeFrame,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget every argument and local.
    pub fn start_subroutine(&mut self) {
        self.subroutine_scope = ScopeFrame::default();
    }

    /// Define a variable in the scope its kind belongs to.
    /// A name already defined in that scope keeps its first definition,
    /// in which case `false` is returned.
    pub fn define(&mut self, name: &str, r#type: &str, kind: Kind) -> bool {
        let frame = if kind.is_class_level() {
            &mut self.class_scope
        } else {
            &mut self.subroutine_scope
        };

        if frame.variables.contains_key(name) {
            debug!("`{name}` is already defined, keeping the first definition");
            return false;
        }

        let index = frame.variable_indices.add_variable(kind);
        frame.variables.insert(
            name.to_owned(),
            Entry {
                r#type: r#type.to_owned(),
                kind,
                index,
            },
        );

        true
    }

    /// Number of variables of `kind` defined in its scope so far.
    pub fn var_count(&self, kind: Kind) -> usize {
        let frame = if kind.is_class_level() {
            &self.class_scope
        } else {
            &self.subroutine_scope
        };

        frame.variable_indices.count(kind)
    }

    /// Search the subroutine scope first, then the class scope.
    pub fn lookup(&self, name: &str) -> Option<&Entry> {
        self.subroutine_scope
            .variables
            .get(name)
            .or_else(|| self.class_scope.variables.get(name))
    }

    pub fn kind_of(&self, name: &str) -> Option<Kind> {
        self.lookup(name).map(|entry| entry.kind)
    }

    pub fn type_of(&self, name: &str) -> Option<&str> {
        self.lookup(name).map(|entry| entry.r#type.as_str())
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.lookup(name).map(|entry| entry.index)
    }
}

#[derive(Debug, Default)]
struct ScopeFrame {
    variable_indices: VariableKindIndices,
    variables: HashMap<Name, Entry>,
}

#[derive(Debug, Default)]
struct VariableKindIndices {
    indices: HashMap<Kind, usize>,
}

impl VariableKindIndices {
    /// Gets current index of the kind and increases it for future usage.
    fn add_variable(&mut self, kind: Kind) -> usize {
        let next = self.indices.entry(kind).or_default();
        let index = *next;
        *next += 1;
        index
    }

    fn count(&self, kind: Kind) -> usize {
        self.indices.get(&kind).copied().unwrap_or_default()
    }
}

// endregion

use crate::{
    jack::{
        codegen::context::ClassContext,
        error::{Error, Span},
        symbol_table::Entry,
    },
    vm,
};

pub fn push(class_context: &mut ClassContext, name: &str, span: Span) -> Vec<vm::VMInstruction> {
    resolve(class_context, name, span)
        .map(|entry| vec![entry.push()])
        .unwrap_or_default()
}

pub fn pop(class_context: &mut ClassContext, name: &str, span: Span) -> Vec<vm::VMInstruction> {
    resolve(class_context, name, span)
        .map(|entry| vec![entry.pop()])
        .unwrap_or_default()
}

fn resolve(class_context: &mut ClassContext, name: &str, span: Span) -> Option<Entry> {
    if let Some(entry) = class_context.symbols.lookup(name) {
        return Some(entry.clone());
    }

    // a missing name has already been reported by the parser
    if !name.is_empty() {
        class_context.report(Error::UndefinedVariable {
            name: name.to_owned(),
            span,
        });
    }

    None
}

use crate::{
    jack::token::{Keyword, MAX_INTEGER},
    vm,
};

pub fn construct_integer(i: u16) -> Vec<vm::VMInstruction> {
    vec![vm::push(vm::Segment::Constant, usize::from(i))]
}

/// Fails with the first character whose code does not fit a Jack integer.
pub fn construct_string(s: &str) -> Result<Vec<vm::VMInstruction>, char> {
    if let Some(c) = s.chars().find(|c| u32::from(*c) > u32::from(MAX_INTEGER)) {
        return Err(c);
    }

    let string_init = vec![
        vm::push(vm::Segment::Constant, s.chars().count()),
        vm::call("String.new", 1),
    ];

    let string_population = s
        .chars()
        .flat_map(|c| {
            vec![
                vm::push(vm::Segment::Constant, to_code(c)),
                vm::call("String.appendChar", 2),
            ]
        })
        .collect();

    Ok([string_init, string_population].concat())
}

/// `true` | `false` | `null` | `this`
pub fn construct_keyword(keyword: Keyword) -> Vec<vm::VMInstruction> {
    match keyword {
        Keyword::True => vm::r#true(),
        Keyword::This => vec![vm::push(vm::Segment::Pointer, 0)],
        _ => vec![vm::r#false()],
    }
}

fn to_code(c: char) -> usize {
    u32::from(c) as usize
}

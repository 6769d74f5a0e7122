// region: Context

/// Context information shared by every class compiled in one run.
#[derive(Debug, Default)]
pub struct Context {
    pub labels: LabelAllocator,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }
}

// endregion

// region: Label Allocator

/// Hands out ids for `if`/`while` labels, unique across all classes.
#[derive(Debug, Default)]
pub struct LabelAllocator {
    next_id: usize,
}

impl LabelAllocator {
    pub fn next_id(&mut self) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

// endregion

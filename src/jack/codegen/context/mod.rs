pub mod class;
pub mod program;

pub use class::Context as ClassContext;
pub use program::Context as ProgramContext;

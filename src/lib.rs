//! `hackc`: the Jack to Hack toolchain.
//!
//! Three independent stages, each usable on its own:
//! - [`jack`] compiles one Jack class into VM instructions,
//! - [`vm`] translates VM code into Hack assembly,
//! - [`hack`] assembles Hack assembly into 16-bit machine words.
//!
//! The stages only exchange ordered line (or instruction) lists; reading
//! and writing files is left to [`fileio`].

pub mod error;
pub mod fileio;
pub mod hack;
pub mod jack;
pub mod vm;

pub use error::Error;

use std::{io, path::PathBuf};

use thiserror::Error;

use crate::{hack, jack, vm};

/// Failure of a whole toolchain run.
#[derive(Error, Debug)]
pub enum Error {
    #[error("unable to access `{}`: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("no `.{extension}` sources found at `{}`", .path.display())]
    NoSources { path: PathBuf, extension: String },

    #[error("{} class(es) failed to compile: {}", .failures.len(), summarize(.failures))]
    Diagnostics { failures: Vec<ClassFailure> },

    #[error("VM translation failed: {0}")]
    Vm(#[from] vm::Error),

    #[error("assembly failed: {0}")]
    Hack(#[from] hack::Error),
}

/// The diagnostics of one Jack class that did not compile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassFailure {
    pub class: String,
    pub diagnostics: Vec<jack::Error>,
}

fn summarize(failures: &[ClassFailure]) -> String {
    failures
        .iter()
        .map(|failure| format!("`{}` ({} error(s))", failure.class, failure.diagnostics.len()))
        .collect::<Vec<_>>()
        .join(", ")
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

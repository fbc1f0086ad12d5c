// src/error.rs

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while refreshing the derived data.
///
/// `MissingFile` and `Parse` are recovered inside the engine (placeholder
/// or previous snapshot); `InvalidFilter` is surfaced to the caller since
/// it indicates a caller defect rather than a data race.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The report file could not be opened or read.
    #[error("cannot read report {}: {source}", path.display())]
    MissingFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A malformed report row, usually a read that raced a rewrite.
    #[error("report line {line}: {msg}")]
    Parse { line: usize, msg: String },

    /// A domain name or rank letter outside the configured sets.
    #[error("unknown {kind} selection '{value}'")]
    InvalidFilter { kind: &'static str, value: String },
}

impl EngineError {
    pub(crate) fn parse(line: usize, msg: impl Into<String>) -> EngineError {
        EngineError::Parse {
            line,
            msg: msg.into(),
        }
    }
}

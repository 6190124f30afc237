// error.rs
use std::io;
use thiserror::Error;

/// Error types for enumeration operations
///
/// This enum represents all possible outcomes that end an enumeration
/// early, including the two abort signals that carry no underlying
/// operating system error.
#[derive(Error, Debug)]
pub enum EnumError {
    /// A directory listing failed and the error callback asked to stop
    #[error("cannot enumerate {path}: {source}")]
    Enumerate {
        path: String,
        #[source]
        source: io::Error,
    },

    /// A path could not be resolved to its absolute form
    #[error("cannot resolve {path}: {source}")]
    Resolve {
        path: String,
        #[source]
        source: io::Error,
    },

    /// The match callback returned `false`
    #[error("enumeration stopped by callback")]
    Stopped,

    /// The cancellation token was observed as set
    #[error("enumeration cancelled")]
    Cancelled,
}

impl EnumError {
    /// Returns `true` for the early-termination signals (`Stopped`,
    /// `Cancelled`) as opposed to genuine failures.
    pub fn is_abort(&self) -> bool {
        matches!(self, EnumError::Stopped | EnumError::Cancelled)
    }
}

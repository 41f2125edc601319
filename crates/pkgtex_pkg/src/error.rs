//! Error types that can be emitted from this library

use miette::Diagnostic;
use thiserror::Error;

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent wrapper for [`std::io::Error`]
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    /// Transparent wrapper for [`pkgtex_io::Error`]
    #[error(transparent)]
    Cursor(#[from] pkgtex_io::Error),

    /// The table of contents or an entry range is malformed
    #[error("file is an invalid package: {0}")]
    InvalidFormat(String),

    /// No entry matches the lookup
    #[error("package has no entry {0}")]
    FileNotFound(#[from] FileNotFoundError),
}

/// The lookup that found no entry
#[derive(Error, Diagnostic, Debug)]
pub enum FileNotFoundError {
    /// Lookup by position in the table of contents
    #[error("at index {0}")]
    Index(usize),

    /// Lookup by entry name
    #[error("named {0:?}")]
    Name(String),
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;

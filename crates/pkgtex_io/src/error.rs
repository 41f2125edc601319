//! Error types that can be emitted from this library

use miette::Diagnostic;
use thiserror::Error;

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// A read asked for more bytes than the buffer has left
    #[error("unexpected end of data: needed {needed} bytes but only {remaining} remain")]
    Truncated {
        /// Number of bytes the read required
        needed: usize,
        /// Number of bytes left after the cursor
        remaining: usize,
    },

    /// A length or count field holds a value the format does not allow
    #[error("invalid format: {0}")]
    InvalidFormat(String),

    /// Transparent wrapper for [`std::str::Utf8Error`]
    #[error(transparent)]
    InvalidEncoding(#[from] std::str::Utf8Error),

    /// Transparent wrapper for [`binrw::Error`]
    #[error(transparent)]
    BinRWError(#[from] binrw::Error),
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;

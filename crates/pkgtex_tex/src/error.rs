//! Error types that can be emitted from this library

use miette::Diagnostic;
use thiserror::Error;

use crate::types::{ImageFormat, TextureFormat};

/// Error type for library
///
/// Every variant is local to one texture: callers walking a package should
/// log it and move on to the next entry. [`Error::class`] tells malformed
/// data apart from well-formed data this crate has no decoder for.
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent wrapper for [`pkgtex_io::Error`]
    #[error(transparent)]
    Cursor(#[from] pkgtex_io::Error),

    /// A header field, count or size is out of range
    #[error("invalid texture: {0}")]
    InvalidFormat(String),

    /// None of the LZ4 framings produced the declared size
    #[error("lz4 payload did not decompress to {expected} bytes")]
    DecompressionFailed {
        /// The decompressed size declared by the container
        expected: usize,
    },

    /// The leading magic is not `TEXV0005` / `TEXI0001`
    #[error("not a texture")]
    NotATexture,

    /// The pixel format has no decoder
    #[error("no decoder for pixel format {0}")]
    UnsupportedFormat(TextureFormat),

    /// The payload is shorter than the dimensions require
    #[error("payload holds {actual} bytes but {needed} are required")]
    InsufficientData {
        /// Bytes required by the format and dimensions
        needed: u64,
        /// Bytes present
        actual: usize,
    },

    /// The payload is an MP4 video stream
    #[error("texture holds a video stream")]
    Video,

    /// The payload is a complete image in a standard format
    #[error("texture holds an embedded {0} image")]
    EmbeddedImage(ImageFormat),
}

/// Broad category of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The data is malformed: bad counts, truncation, failed decompression
    Structural,
    /// The data is well formed but holds nothing this crate decodes to pixels
    Unsupported,
}

impl Error {
    /// Classify the error
    pub fn class(&self) -> ErrorClass {
        match self {
            Error::NotATexture
            | Error::UnsupportedFormat(_)
            | Error::Video
            | Error::EmbeddedImage(_) => ErrorClass::Unsupported,
            Error::Cursor(_)
            | Error::InvalidFormat(_)
            | Error::DecompressionFailed { .. }
            | Error::InsufficientData { .. } => ErrorClass::Structural,
        }
    }

    /// Whether the error is [`ErrorClass::Unsupported`]
    pub fn is_unsupported(&self) -> bool {
        self.class() == ErrorClass::Unsupported
    }
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;

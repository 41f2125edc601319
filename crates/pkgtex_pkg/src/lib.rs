//! This library handles reading entries out of **PKG** asset packages.
//!
//! # PKG Format Documentation
//!
//! A package is a flat archive: a table of contents naming every entry,
//! immediately followed by the concatenated entry data. Packages are typically
//! identified with the `.pkg` extension and commonly hold `.tex` textures,
//! `.json` scene descriptions, shaders and models.
//!
//! ## File Structure
//!
//! | Offset (bytes) | Field         | Description                                               |
//! |----------------|---------------|-----------------------------------------------------------|
//! | 0x0000         | Magic length  | 4 bytes: `i32` length of the magic string (at most 32)    |
//! | 0x0004         | Magic         | Magic length bytes, e.g. `PKGV0001`; not validated        |
//! | ...            | Entry count   | 4 bytes: `i32` in `0..100000`                             |
//! | ...            | Entries       | Entry count records, see below                            |
//! | ...            | Body          | Entry data, addressed relative to the end of the entries  |
//!
//! ### Entry
//!
//! | Offset (bytes) | Field         | Description                                               |
//! |----------------|---------------|-----------------------------------------------------------|
//! | 0x0000         | Name length   | 4 bytes: `i32` in `1..=255`                               |
//! | 0x0004         | Name          | Name length bytes of UTF-8, no terminator                 |
//! | ...            | Offset        | 4 bytes: `i32 >= 0`, relative to the body start           |
//! | ...            | Size          | 4 bytes: `i32 >= 0`                                       |
//!
//! The body start is the byte right after the last entry, so an entry covers
//! `body_start + offset .. body_start + offset + size`. That range is checked
//! against the buffer when the entry is extracted, not when the table is read.
//!
//! ## Additional Information
//!
//! - **File Extension**: `.pkg`
//! - **Endianness**: Little-endian for all multi-byte integers
//!

pub mod error;
pub mod read;
pub mod types;

pub use read::{PkgArchive, PkgFile};
pub use types::PkgEntry;

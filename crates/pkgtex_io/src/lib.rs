//! Shared binary reading primitives for the **pkgtex** crates.
//!
//! Both the package table of contents and the texture container are laid out
//! as a flat little-endian stream of `i32` fields, length-prefixed strings and
//! raw byte blocks. [`ByteCursor`] reads that stream from a fully resident
//! buffer and refuses any read that would go past its end, which is what lets
//! the format readers stay panic free on hostile input.
//!
//! ## Primitives
//!
//! | Read                                           | Encoding                                   |
//! |------------------------------------------------|--------------------------------------------|
//! | [`ByteCursor::read_i32`] / [`ByteCursor::read_u32`] | 4 bytes, little endian                |
//! | [`ByteCursor::read_fixed_bytes`]               | `n` raw bytes                              |
//! | [`ByteCursor::read_length_prefixed_string`]    | `i32` length + UTF-8 bytes, no terminator  |
//! | [`ByteCursor::read_null_terminated_string`]    | UTF-8 bytes up to a `0x00`                 |
//! | [`ByteCursor::read_le`]                        | any `binrw` structure with a [`WireSize`]  |
//!

pub mod cursor;
pub mod error;

pub use cursor::{ByteCursor, WireSize};
pub use error::{Error, Result};

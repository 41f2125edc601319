//! Sequential reader over an in-memory buffer
//!

use binrw::{BinRead, Endian};
use byteorder::{ByteOrder, LittleEndian};
use std::io::Cursor;
use tracing::trace;

use crate::error::{Error, Result};

/// Bounds-checked little-endian reader over a borrowed byte buffer.
///
/// Every read either consumes exactly the bytes it describes or fails without
/// moving the cursor. Slices and strings handed out borrow from the source
/// buffer, so nothing is copied until the caller asks for it.
///
/// ```
/// use pkgtex_io::ByteCursor;
///
/// let data = [0x03, 0x00, 0x00, 0x00, b'p', b'k', b'g'];
/// let mut cursor = ByteCursor::new(&data);
///
/// assert_eq!(cursor.read_length_prefixed_string(32)?, "pkg");
/// assert!(cursor.is_empty());
/// # Ok::<(), pkgtex_io::error::Error>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> ByteCursor<'a> {
    /// Create a cursor positioned at the start of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Current offset from the start of the buffer
    pub fn position(&self) -> usize {
        self.position
    }

    /// Length of the whole underlying buffer
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether every byte of the buffer has been consumed
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Number of bytes left after the cursor
    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    /// The unread tail of the buffer
    pub fn remaining_slice(&self) -> &'a [u8] {
        &self.data[self.position..]
    }

    /// The whole underlying buffer
    pub fn get_ref(&self) -> &'a [u8] {
        self.data
    }

    fn ensure(&self, needed: usize) -> Result<()> {
        if needed > self.remaining() {
            return Err(Error::Truncated {
                needed,
                remaining: self.remaining(),
            });
        }
        Ok(())
    }

    /// Read exactly `n` bytes.
    pub fn read_fixed_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        self.ensure(n)?;
        let bytes = &self.data[self.position..self.position + n];
        self.position += n;
        Ok(bytes)
    }

    /// Read a little-endian `u32`.
    pub fn read_u32(&mut self) -> Result<u32> {
        self.read_fixed_bytes(4).map(LittleEndian::read_u32)
    }

    /// Read a little-endian `i32`.
    pub fn read_i32(&mut self) -> Result<i32> {
        self.read_fixed_bytes(4).map(LittleEndian::read_i32)
    }

    /// Look at the next little-endian `i32` without consuming it.
    pub fn peek_i32(&self) -> Result<i32> {
        let mut probe = *self;
        probe.read_i32()
    }

    /// Read an `i32` length followed by that many UTF-8 bytes.
    ///
    /// A negative length or one above `max_len` is rejected with
    /// [`Error::InvalidFormat`]. The string is not null terminated and may be
    /// empty.
    pub fn read_length_prefixed_string(&mut self, max_len: usize) -> Result<&'a str> {
        let mut probe = *self;

        let len = probe.read_i32()?;
        let len = usize::try_from(len)
            .ok()
            .filter(|len| *len <= max_len)
            .ok_or_else(|| {
                Error::InvalidFormat(format!("string length {len} outside 0..={max_len}"))
            })?;

        let value = std::str::from_utf8(probe.read_fixed_bytes(len)?)?;

        *self = probe;
        Ok(value)
    }

    /// Read a string terminated by a zero byte.
    ///
    /// Scanning stops at the terminator, after `max_len` bytes, or at the end
    /// of the buffer, whichever comes first. The terminator is consumed when
    /// present.
    pub fn read_null_terminated_string(&mut self, max_len: usize) -> Result<&'a str> {
        let window = &self.remaining_slice()[..max_len.min(self.remaining())];

        let (bytes, consumed) = match window.iter().position(|&b| b == 0) {
            Some(end) => (&window[..end], end + 1),
            None => (window, window.len()),
        };

        let value = std::str::from_utf8(bytes)?;
        self.position += consumed;
        Ok(value)
    }

    /// Read a fixed-layout little-endian structure described with `binrw`.
    ///
    /// The full [`WireSize::WIRE_SIZE`] must be available before anything is
    /// decoded, so a short buffer reports the on-disk size of `T`.
    pub fn read_le<T>(&mut self) -> Result<T>
    where
        T: for<'b> BinRead<Args<'b> = ()> + WireSize,
    {
        self.ensure(T::WIRE_SIZE)?;

        let mut reader = Cursor::new(self.remaining_slice());
        let value = T::read_options(&mut reader, Endian::Little, ())?;

        let consumed = reader.position() as usize;
        trace!(consumed, at = self.position, "read structure");
        self.position += consumed;
        Ok(value)
    }
}

/// Number of bytes a fixed-layout structure occupies on disk.
///
/// This is rarely `size_of::<T>()`: mapped fields and padding make the
/// in-memory layout differ from the stream.
pub trait WireSize {
    const WIRE_SIZE: usize;
}

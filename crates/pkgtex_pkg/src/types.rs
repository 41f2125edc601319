//! Base types for the structure of a package.

use pkgtex_io::ByteCursor;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::error::{Error, Result};

/// Longest magic string a package header may carry
pub const MAX_MAGIC_LEN: usize = 32;

/// Upper bound (exclusive) on the number of entries in the table of contents
pub const MAX_ENTRY_COUNT: i32 = 100_000;

/// Longest entry name in bytes
pub const MAX_NAME_LEN: usize = 255;

/// Package table of contents entry
///
/// The offset is relative to the first byte after the table of contents, see
/// [`crate::PkgArchive::data_start`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct PkgEntry {
    /// Path of the entry inside the package
    pub name: String,

    /// Offset of the entry data from the start of the package body
    pub offset: u32,

    /// Size of the entry data in bytes
    pub size: u32,
}

impl PkgEntry {
    /// Read one `name, offset, size` record.
    pub(crate) fn read(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let name = cursor.read_length_prefixed_string(MAX_NAME_LEN)?;
        if name.is_empty() {
            return Err(Error::InvalidFormat("entry name is empty".into()));
        }

        let offset = non_negative(cursor.read_i32()?, "entry offset")?;
        let size = non_negative(cursor.read_i32()?, "entry size")?;

        Ok(PkgEntry {
            name: name.to_owned(),
            offset,
            size,
        })
    }

    /// Absolute `start..end` of this entry given the body start.
    ///
    /// Returns [`None`] on arithmetic overflow.
    pub fn range(&self, data_start: usize) -> Option<std::ops::Range<usize>> {
        let start = data_start.checked_add(self.offset as usize)?;
        let end = start.checked_add(self.size as usize)?;
        Some(start..end)
    }
}

fn non_negative(value: i32, what: &str) -> Result<u32> {
    u32::try_from(value).map_err(|_| Error::InvalidFormat(format!("{what} is negative ({value})")))
}

#[cfg(test)]
mod test {
    use pkgtex_io::ByteCursor;
    use pretty_assertions::assert_eq;

    use crate::error::{Error, Result};
    use crate::types::PkgEntry;

    #[test]
    fn read_entry() -> Result<()> {
        #[rustfmt::skip]
        let input = [
            0x05, 0x00, 0x00, 0x00,
            b'a', b'.', b't', b'e', b'x',
            0x10, 0x00, 0x00, 0x00,
            0x20, 0x00, 0x00, 0x00,
        ];

        let expected = PkgEntry {
            name: "a.tex".into(),
            offset: 16,
            size: 32,
        };

        let mut cursor = ByteCursor::new(&input);
        assert_eq!(PkgEntry::read(&mut cursor)?, expected);
        assert!(cursor.is_empty());

        Ok(())
    }

    #[test]
    fn read_entry_with_empty_name() {
        #[rustfmt::skip]
        let input = [
            0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00,
        ];

        let result = PkgEntry::read(&mut ByteCursor::new(&input));
        assert!(matches!(result, Err(Error::InvalidFormat(_))));
    }

    #[test]
    fn read_entry_with_negative_size() {
        #[rustfmt::skip]
        let input = [
            0x01, 0x00, 0x00, 0x00,
            b'a',
            0x00, 0x00, 0x00, 0x00,
            0xFF, 0xFF, 0xFF, 0xFF,
        ];

        let result = PkgEntry::read(&mut ByteCursor::new(&input));
        assert!(matches!(result, Err(Error::InvalidFormat(_))));
    }

    #[test]
    fn range_is_relative_to_body() {
        let entry = PkgEntry {
            name: "a".into(),
            offset: 4,
            size: 8,
        };

        assert_eq!(entry.range(20), Some(24..32));
        assert_eq!(entry.range(usize::MAX), None);
    }
}

//! Types for reading packages
//!

use indexmap::IndexMap;
use pkgtex_io::ByteCursor;
use std::{
    fmt::{self, Debug},
    io::{Cursor, Read},
};
use tracing::{debug, instrument, trace};

use crate::{
    error::{Error, FileNotFoundError, Result},
    types::{PkgEntry, MAX_ENTRY_COUNT, MAX_MAGIC_LEN},
};

/// A struct for reading an entry from a package
pub struct PkgFile<'a> {
    entry: &'a PkgEntry,
    reader: Cursor<&'a [u8]>,
}

impl Debug for PkgFile<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "PkgFile({:#?})", self.entry)
    }
}

/// Methods for retrieving information on package entries
impl<'a> PkgFile<'a> {
    /// Get the name of the file
    ///
    /// # Warnings
    ///
    /// It is dangerous to use this name directly when extracting a package.
    /// It may contain an absolute path (`/etc/shadow`), or break out of the
    /// current directory (`../runtime`). Use [`PkgFile::enclosed_name`] when
    /// building output paths.
    pub fn name(&self) -> &'a str {
        &self.entry.name
    }

    /// Get the name of the file as a relative path that stays inside the
    /// extraction directory.
    ///
    /// Returns [`None`] if the name is absolute or climbs out through `..`.
    pub fn enclosed_name(&self) -> Option<std::path::PathBuf> {
        enclosed_name(&self.entry.name)
    }

    /// Get the size of the file, in bytes
    pub fn size(&self) -> u64 {
        self.entry.size as u64
    }

    /// Get the offset of the file relative to the package body
    pub fn offset(&self) -> u64 {
        self.entry.offset as u64
    }

    /// Borrow the whole content of the file
    pub fn data(&self) -> &'a [u8] {
        self.reader.get_ref()
    }

    /// Get the table of contents entry backing this file
    pub fn entry(&self) -> &'a PkgEntry {
        self.entry
    }
}

impl Read for PkgFile<'_> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.reader.read(buf)
    }
}

/// Package reader
///
/// The whole package has to be resident in memory; entries borrow from the
/// buffer handed to [`PkgArchive::new`] and are only copied when the caller
/// copies them.
///
/// ```no_run
/// use std::io::prelude::*;
///
/// fn list_pkg_contents(data: &[u8]) -> pkgtex_pkg::error::Result<()> {
///     let pkg = pkgtex_pkg::PkgArchive::new(data)?;
///
///     for i in 0..pkg.len() {
///         let mut file = pkg.by_index(i)?;
///         println!("Filename: {}", file.name());
///         std::io::copy(&mut file, &mut std::io::stdout()).ok();
///     }
///
///     Ok(())
/// }
/// ```
pub struct PkgArchive<'a> {
    data: &'a [u8],
    magic: Box<str>,
    entries: Vec<PkgEntry>,
    names: IndexMap<Box<str>, usize>,
    data_start: usize,
}

impl Debug for PkgArchive<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("PkgArchive")
            .field("magic", &self.magic)
            .field("entries", &self.entries.len())
            .field("data_start", &self.data_start)
            .finish()
    }
}

impl<'a> PkgArchive<'a> {
    /// Read a package collecting the entries it contains.
    #[instrument(skip(data), fields(len = data.len()), err)]
    pub fn new(data: &'a [u8]) -> Result<PkgArchive<'a>> {
        let mut cursor = ByteCursor::new(data);

        let magic = cursor.read_length_prefixed_string(MAX_MAGIC_LEN)?;

        let count = cursor.read_i32()?;
        if !(0..MAX_ENTRY_COUNT).contains(&count) {
            return Err(Error::InvalidFormat(format!(
                "entry count {count} outside 0..{MAX_ENTRY_COUNT}"
            )));
        }
        debug!(magic, count, "reading table of contents");

        let mut entries = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let entry = PkgEntry::read(&mut cursor)?;
            trace!(name = %entry.name, offset = entry.offset, size = entry.size, "entry");
            entries.push(entry);
        }

        let mut names = IndexMap::with_capacity(entries.len());
        for (index, entry) in entries.iter().enumerate() {
            names.entry(entry.name.as_str().into()).or_insert(index);
        }

        let data_start = cursor.position();
        debug!(data_start, "body starts");

        Ok(PkgArchive {
            data,
            magic: magic.into(),
            entries,
            names,
            data_start,
        })
    }

    /// Number of entries contained in this package.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether this package contains no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The magic string stored at the start of the package
    pub fn magic(&self) -> &str {
        &self.magic
    }

    /// Absolute offset of the package body, which every entry offset is
    /// relative to
    pub fn data_start(&self) -> usize {
        self.data_start
    }

    /// All table of contents entries in file order
    pub fn entries(&self) -> &[PkgEntry] {
        &self.entries
    }

    /// Returns an iterator over all the entry names in this package.
    pub fn file_names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    /// Sum of every entry size, if it fits in a `u64`
    pub fn total_size(&self) -> Option<u64> {
        self.entries
            .iter()
            .try_fold(0u64, |total, e| total.checked_add(e.size as u64))
    }

    /// Get the index of an entry by name, if it's present.
    ///
    /// When a name appears more than once the first entry wins.
    #[inline(always)]
    pub fn index_for_name(&self, name: &str) -> Option<usize> {
        self.names.get(name).copied()
    }

    /// Get the name of an entry, if it's present.
    #[inline(always)]
    pub fn name_for_index(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(|e| e.name.as_str())
    }

    /// Resolve the bytes of an entry.
    ///
    /// Fails with [`Error::InvalidFormat`] when the entry range does not lie
    /// inside the package buffer.
    pub fn extract(&self, entry: &PkgEntry) -> Result<&'a [u8]> {
        let range = entry
            .range(self.data_start)
            .filter(|r| r.end <= self.data.len())
            .ok_or_else(|| {
                Error::InvalidFormat(format!(
                    "entry {} ({} bytes at {}) lies outside the {} byte package",
                    entry.name,
                    entry.size,
                    entry.offset,
                    self.data.len()
                ))
            })?;

        Ok(&self.data[range])
    }

    /// Search for an entry by name
    pub fn by_name(&self, name: &str) -> Result<PkgFile<'_>> {
        let Some(index) = self.index_for_name(name) else {
            return Err(Error::FileNotFound(FileNotFoundError::Name(
                name.to_owned(),
            )));
        };
        self.by_index(index)
    }

    /// Get a contained file by index
    pub fn by_index(&self, file_number: usize) -> Result<PkgFile<'_>> {
        let entry = self
            .entries
            .get(file_number)
            .ok_or(Error::FileNotFound(FileNotFoundError::Index(file_number)))?;

        Ok(PkgFile {
            entry,
            reader: Cursor::new(self.extract(entry)?),
        })
    }
}

fn enclosed_name(name: &str) -> Option<std::path::PathBuf> {
    use std::path::{Component, PathBuf};

    let mut path = PathBuf::new();
    for component in std::path::Path::new(name).components() {
        match component {
            Component::Normal(part) => path.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }

    (!path.as_os_str().is_empty()).then_some(path)
}

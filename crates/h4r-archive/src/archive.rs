//! H4R archive reader.
//!
//! Opening an archive validates the 12-byte header and scans the whole file
//! table once. The resulting descriptor list is read-only afterwards, and
//! payloads are read as positioned slices of the memory map, so any number of
//! threads can extract from one archive without coordinating.

use std::fs::File;
use std::path::Path;

use h4r_common::BinaryReader;
use memmap2::Mmap;

use crate::entry::EntryDescriptor;
use crate::header::ArchiveHeader;
use crate::{Error, Result};

/// An opened and fully scanned H4R archive.
pub struct H4rArchive {
    /// Memory-mapped file data
    mmap: Mmap,
    /// Archive file name
    name: String,
    /// Validated header
    header: ArchiveHeader,
    /// File table, in on-disk order
    entries: Vec<EntryDescriptor>,
}

impl H4rArchive {
    /// Open an archive, validate its header and read the file table.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        // SAFETY: the map is only read, and archives are not modified while open.
        let mmap = unsafe { Mmap::map(&file)? };

        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string();

        let header = Self::read_header(&mmap)?;
        log::info!(
            "Checking header of {name}: OK. {} file records are located at {}",
            { header.entry_count },
            { header.table_offset }
        );

        let entries = Self::scan_table(&mmap, &header)?;

        let archive = Self {
            mmap,
            name,
            header,
            entries,
        };

        let unused = archive.unused_entries().count();
        if unused > 0 {
            log::warn!("Found {unused} unused files in {}", archive.name);
        }

        Ok(archive)
    }

    /// Get the archive file name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the archive header.
    #[inline]
    pub fn header(&self) -> &ArchiveHeader {
        &self.header
    }

    /// Total size of the archive file in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.mmap.len()
    }

    /// Whether the archive file is empty. An opened archive never is.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.mmap.is_empty()
    }

    /// Get the number of entries.
    #[inline]
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// All descriptors, in table order.
    #[inline]
    pub fn entries(&self) -> &[EntryDescriptor] {
        &self.entries
    }

    /// Iterate over descriptors in table order.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, EntryDescriptor> {
        self.entries.iter()
    }

    /// Entries whose payload was dropped while their slot remains.
    pub fn unused_entries(&self) -> impl Iterator<Item = &EntryDescriptor> + '_ {
        self.entries.iter().filter(|e| e.is_unused())
    }

    /// The stored (still compressed) bytes of an entry.
    pub fn read_stored(&self, entry: &EntryDescriptor) -> Result<&[u8]> {
        let start = entry.file_offset as usize;
        let end = start.checked_add(entry.compressed_size as usize);

        match end {
            Some(end) if end <= self.mmap.len() => Ok(&self.mmap[start..end]),
            _ => Err(Error::PayloadOutOfBounds {
                offset: entry.file_offset,
                size: entry.compressed_size,
                archive_len: self.mmap.len(),
            }),
        }
    }

    /// Read and decode an entry's payload.
    pub fn read_payload(&self, entry: &EntryDescriptor) -> Result<Vec<u8>> {
        let compression = entry.compression()?;
        let stored = self.read_stored(entry)?.to_vec();
        crate::compression::decode_payload(
            stored,
            compression,
            entry.uncompressed_size,
            &entry.name,
        )
    }

    // Internal methods

    fn read_header(data: &[u8]) -> Result<ArchiveHeader> {
        if data.len() < ArchiveHeader::SIZE {
            return Err(Error::BadHeader(format!(
                "file is {} bytes, header needs {}",
                data.len(),
                ArchiveHeader::SIZE
            )));
        }

        let mut reader = BinaryReader::new(data);
        let header: ArchiveHeader = reader.read_struct()?;
        if !header.is_valid() {
            return Err(Error::BadHeader(format!(
                "magic is {:02x?}, expected {:02x?}",
                { header.magic },
                ArchiveHeader::MAGIC
            )));
        }

        Ok(header)
    }

    fn scan_table(data: &[u8], header: &ArchiveHeader) -> Result<Vec<EntryDescriptor>> {
        let count = header.entry_count as usize;
        // The table repeats the entry count before the first record.
        let start = header.table_offset as usize + 4;
        let mut reader = BinaryReader::new_at(data, start);

        // Never reserve more records than the file could hold.
        let mut entries = Vec::with_capacity(count.min(data.len() / EntryDescriptor::MIN_SIZE));
        for index in 0..count {
            entries.push(EntryDescriptor::decode(&mut reader, index)?);
        }

        Ok(entries)
    }
}

impl std::fmt::Debug for H4rArchive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("H4rArchive")
            .field("name", &self.name)
            .field("entries", &self.entries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_too_short() {
        let data = [0x48, 0x34, 0x52, 0x05, 0x0C, 0, 0, 0, 0, 0, 0];
        assert!(matches!(
            H4rArchive::read_header(&data),
            Err(Error::BadHeader(_))
        ));
    }

    #[test]
    fn test_header_bad_magic() {
        let data = [0x48, 0x34, 0x52, 0x04, 0x0C, 0, 0, 0, 0, 0, 0, 0];
        assert!(matches!(
            H4rArchive::read_header(&data),
            Err(Error::BadHeader(_))
        ));
    }

    #[test]
    fn test_empty_table() {
        let data = [0x48, 0x34, 0x52, 0x05, 0x0C, 0, 0, 0, 0, 0, 0, 0];
        let header = H4rArchive::read_header(&data).unwrap();
        let entries = H4rArchive::scan_table(&data, &header).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_table_past_end_is_malformed() {
        let data = [0x48, 0x34, 0x52, 0x05, 0x0C, 0, 0, 0, 0x01, 0, 0, 0];
        let header = H4rArchive::read_header(&data).unwrap();
        assert!(matches!(
            H4rArchive::scan_table(&data, &header),
            Err(Error::MalformedEntry { index: 0, .. })
        ));
    }
}

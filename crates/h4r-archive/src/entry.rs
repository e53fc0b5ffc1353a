//! H4R file-table records.

use std::fmt;
use std::ops::Range;

use h4r_common::{format_bytes, BinaryReader};

use crate::category::Category;
use crate::compression::Compression;
use crate::{Error, Result};

/// One record of the archive's file table.
///
/// This is metadata only. Use [`H4rArchive::read_payload`](crate::H4rArchive::read_payload)
/// to get the stored bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryDescriptor {
    /// Offset of the stored payload in the archive.
    pub file_offset: u32,
    /// Bytes stored on disk.
    pub compressed_size: u32,
    /// Bytes after decompression.
    pub uncompressed_size: u32,
    /// Opaque timestamp.
    pub timestamp: u32,
    /// Entry name, `<category>.<rest>`.
    pub name: String,
    /// Opaque metadata string.
    pub extra_data: String,
    /// Name of the external file superseding this entry, or empty.
    pub replacement_name: String,
    /// Raw compression mode (1 = stored, 3 = gzip).
    pub compression_mode: u32,
    /// Byte range of this record inside the archive.
    pub record_span: Range<usize>,
    /// Category derived from the name prefix.
    pub category: Category,
}

impl EntryDescriptor {
    /// Smallest possible record: fixed fields and three empty strings.
    pub const MIN_SIZE: usize = 26;

    /// Decode one record at the reader's position.
    ///
    /// `index` is only used to give context to errors. On success the reader
    /// is left just past the record.
    pub fn decode(reader: &mut BinaryReader<'_>, index: usize) -> Result<Self> {
        let start = reader.position();
        let malformed = |source: h4r_common::Error| Error::MalformedEntry {
            index,
            offset: start,
            source,
        };

        let file_offset = reader.read_u32().map_err(malformed)?;
        let compressed_size = reader.read_u32().map_err(malformed)?;
        let uncompressed_size = reader.read_u32().map_err(malformed)?;
        let timestamp = reader.read_u32().map_err(malformed)?;
        let name = reader.read_prefixed_latin1().map_err(malformed)?;
        let extra_data = reader.read_prefixed_latin1().map_err(malformed)?;
        let replacement_name = reader.read_prefixed_latin1().map_err(malformed)?;
        let compression_mode = reader.read_u32().map_err(malformed)?;
        let end = reader.position();

        let category = Category::classify(&name)?;

        Ok(Self {
            file_offset,
            compressed_size,
            uncompressed_size,
            timestamp,
            name,
            extra_data,
            replacement_name,
            compression_mode,
            record_span: start..end,
            category,
        })
    }

    /// The payload is gone but the table slot remains.
    #[inline]
    pub fn is_unused(&self) -> bool {
        self.compressed_size == 0 && self.file_offset != 0
    }

    /// A deleted slot: neither offset nor payload.
    #[inline]
    pub fn is_empty_slot(&self) -> bool {
        self.compressed_size == 0 && self.file_offset == 0
    }

    /// A newer file outside the archive replaces this payload.
    #[inline]
    pub fn is_replaced(&self) -> bool {
        !self.replacement_name.is_empty()
    }

    /// Parsed compression mode.
    pub fn compression(&self) -> Result<Compression> {
        Compression::try_from(self.compression_mode).map_err(Error::UnsupportedCompression)
    }

    /// Size of the table record in bytes.
    #[inline]
    pub fn record_len(&self) -> usize {
        self.record_span.end - self.record_span.start
    }

    /// Payload byte range in the archive.
    #[inline]
    pub fn payload_range(&self) -> Range<u64> {
        let start = self.file_offset as u64;
        start..start + self.compressed_size as u64
    }

    /// The name with its last `.`-separated segment removed.
    ///
    /// Names without any `.` are returned whole.
    pub fn output_stem(&self) -> &str {
        match self.name.rfind('.') {
            Some(pos) => &self.name[..pos],
            None => &self.name,
        }
    }
}

impl fmt::Display for EntryDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "File {}", self.name)?;
        writeln!(f, "  Category is {}", self.category)?;
        match self.compression() {
            Ok(Compression::Gzip) => writeln!(
                f,
                "  Compressed size is {} and file size is {}",
                format_bytes(self.compressed_size as u64),
                format_bytes(self.uncompressed_size as u64)
            )?,
            Ok(Compression::Stored) => writeln!(
                f,
                "  File size is {}",
                format_bytes(self.uncompressed_size as u64)
            )?,
            Err(_) => writeln!(f, "  Unsupported compression mode {}", self.compression_mode)?,
        }
        writeln!(
            f,
            "  Table data starts at {} and ends at {}",
            self.record_span.start, self.record_span.end
        )?;
        write!(f, "  Data is at offset {}", self.file_offset)?;
        if self.is_replaced() {
            write!(f, "\n  File is replaced by {}", self.replacement_name)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, replacement: &str, mode: u32) -> Vec<u8> {
        let mut bytes = Vec::new();
        for value in [100u32, 20, 40, 0xDEADBEEF] {
            bytes.extend_from_slice(&value.to_le_bytes());
        }
        for field in [name, "extra", replacement] {
            bytes.extend_from_slice(&(field.len() as u16).to_le_bytes());
            bytes.extend_from_slice(field.as_bytes());
        }
        bytes.extend_from_slice(&mode.to_le_bytes());
        bytes
    }

    #[test]
    fn test_decode_fields_in_order() {
        let mut data = vec![0xAA; 4];
        data.extend(record("table.units.h4d", "", 3));
        let mut reader = BinaryReader::new_at(&data, 4);

        let entry = EntryDescriptor::decode(&mut reader, 0).unwrap();
        assert_eq!(entry.file_offset, 100);
        assert_eq!(entry.compressed_size, 20);
        assert_eq!(entry.uncompressed_size, 40);
        assert_eq!(entry.timestamp, 0xDEADBEEF);
        assert_eq!(entry.name, "table.units.h4d");
        assert_eq!(entry.extra_data, "extra");
        assert!(!entry.is_replaced());
        assert_eq!(entry.compression().unwrap(), Compression::Gzip);
        assert_eq!(entry.category, Category::Table);
        assert_eq!(entry.record_span, 4..data.len());
        assert_eq!(reader.position(), data.len());
    }

    #[test]
    fn test_truncated_record_is_malformed() {
        let data = record("table.units.h4d", "", 1);
        let short = &data[..data.len() - 2];
        let mut reader = BinaryReader::new(short);

        let err = EntryDescriptor::decode(&mut reader, 7).unwrap_err();
        assert!(matches!(err, Error::MalformedEntry { index: 7, offset: 0, .. }));
    }

    #[test]
    fn test_unknown_category_fails_decode() {
        let data = record("mystery.thing.h4d", "", 1);
        let mut reader = BinaryReader::new(&data);

        assert!(matches!(
            EntryDescriptor::decode(&mut reader, 0),
            Err(Error::UnknownCategory { .. })
        ));
    }

    #[test]
    fn test_replacement_and_stem() {
        let data = record("sound.click.h4d", "sound.click.new.h4d", 9);
        let mut reader = BinaryReader::new(&data);
        let entry = EntryDescriptor::decode(&mut reader, 0).unwrap();

        assert!(entry.is_replaced());
        assert_eq!(entry.output_stem(), "sound.click");
        assert!(matches!(
            entry.compression(),
            Err(Error::UnsupportedCompression(9))
        ));
    }

    #[test]
    fn test_slot_states() {
        let data = record("font.small.h4d", "", 1);
        let mut reader = BinaryReader::new(&data);
        let mut entry = EntryDescriptor::decode(&mut reader, 0).unwrap();

        entry.compressed_size = 0;
        assert!(entry.is_unused());
        assert!(!entry.is_empty_slot());

        entry.file_offset = 0;
        assert!(!entry.is_unused());
        assert!(entry.is_empty_slot());
    }
}

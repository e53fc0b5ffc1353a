//! Archive header structure.

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

/// The fixed 12-byte header at the start of every H4R archive.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C, packed)]
pub struct ArchiveHeader {
    /// Signature bytes, always [`ArchiveHeader::MAGIC`].
    pub magic: [u8; 4],
    /// Offset of the file table.
    pub table_offset: u32,
    /// Number of records in the file table.
    pub entry_count: u32,
}

impl ArchiveHeader {
    /// H4R signature bytes ("H4R" followed by format version 5).
    pub const MAGIC: [u8; 4] = [0x48, 0x34, 0x52, 0x05];

    /// Size of the header on disk.
    pub const SIZE: usize = 12;

    /// Check the signature.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.magic == Self::MAGIC
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout() {
        assert_eq!(std::mem::size_of::<ArchiveHeader>(), ArchiveHeader::SIZE);

        let bytes = [0x48, 0x34, 0x52, 0x05, 0x0C, 0, 0, 0, 0x02, 0, 0, 0];
        let header = ArchiveHeader::read_from_bytes(&bytes[..]).unwrap();
        assert!(header.is_valid());
        assert_eq!({ header.table_offset }, 12);
        assert_eq!({ header.entry_count }, 2);
    }
}

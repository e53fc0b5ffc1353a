//! Payload compression modes and decompression.

use std::io::Read;

use flate2::read::MultiGzDecoder;

use crate::{Error, Result};

/// Compression modes used in H4R archives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum Compression {
    /// Payload bytes are stored as-is.
    Stored = 1,
    /// Payload is a gzip member.
    Gzip = 3,
}

impl TryFrom<u32> for Compression {
    type Error = u32;

    fn try_from(value: u32) -> std::result::Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Stored),
            3 => Ok(Self::Gzip),
            other => Err(other),
        }
    }
}

/// Output preallocation never exceeds this multiple of the stored length.
const MAX_RESERVE_RATIO: usize = 64;

/// Decompress gzip data, including every concatenated member.
pub fn decompress_gzip(data: &[u8], output: &mut Vec<u8>) -> Result<()> {
    let mut decoder = MultiGzDecoder::new(data);

    output.clear();
    decoder
        .read_to_end(output)
        .map_err(|e| Error::Decompression(e.to_string()))?;

    Ok(())
}

/// Turn stored bytes into payload bytes.
///
/// A decoded length that differs from `expected_size` is only logged: a few
/// shipped archives declare slightly wrong sizes.
pub fn decode_payload(
    stored: Vec<u8>,
    compression: Compression,
    expected_size: u32,
    name: &str,
) -> Result<Vec<u8>> {
    let data = match compression {
        Compression::Stored => stored,
        Compression::Gzip => {
            let reserve = (expected_size as usize)
                .min(stored.len().saturating_mul(MAX_RESERVE_RATIO));
            let mut output = Vec::with_capacity(reserve);
            decompress_gzip(&stored, &mut output)?;
            output
        }
    };

    if data.len() != expected_size as usize {
        log::warn!(
            "{name}: decoded {} bytes, table declares {expected_size}",
            data.len()
        );
    }

    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gzip(data: &[u8]) -> Vec<u8> {
        use flate2::write::GzEncoder;
        use std::io::Write;

        let mut encoder = GzEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn test_mode_values() {
        assert_eq!(Compression::try_from(1), Ok(Compression::Stored));
        assert_eq!(Compression::try_from(3), Ok(Compression::Gzip));
        assert_eq!(Compression::try_from(2), Err(2));
        assert_eq!(Compression::try_from(0), Err(0));
    }

    #[test]
    fn test_stored_passthrough() {
        let stored = b"raw bytes".to_vec();
        let data = decode_payload(stored.clone(), Compression::Stored, 9, "t").unwrap();
        assert_eq!(data, stored);
    }

    #[test]
    fn test_gzip_roundtrip() {
        let original = b"Hello, World! This is a test of gzip compression.";
        let data =
            decode_payload(gzip(original), Compression::Gzip, original.len() as u32, "t").unwrap();
        assert_eq!(data, original);
    }

    #[test]
    fn test_size_mismatch_is_not_an_error() {
        let original = b"twelve bytes";
        let data = decode_payload(gzip(original), Compression::Gzip, 100, "t").unwrap();
        assert_eq!(data.len(), 12);
    }

    #[test]
    fn test_concatenated_members() {
        let mut stored = gzip(b"first-");
        stored.extend_from_slice(&gzip(b"second"));

        let data = decode_payload(stored, Compression::Gzip, 12, "t").unwrap();
        assert_eq!(data, b"first-second");
    }

    #[test]
    fn test_huge_declared_size() {
        let data = decode_payload(gzip(b"tiny"), Compression::Gzip, u32::MAX, "t").unwrap();
        assert_eq!(data, b"tiny");
        assert!(data.capacity() <= gzip(b"tiny").len() * MAX_RESERVE_RATIO);
    }

    #[test]
    fn test_corrupt_gzip() {
        let mut stored = gzip(b"checksummed payload");
        // Trailer is CRC32 then ISIZE.
        let crc_at = stored.len() - 8;
        stored[crc_at] ^= 0xFF;

        let result = decode_payload(stored, Compression::Gzip, 19, "t");
        assert!(matches!(result, Err(Error::Decompression(_))));
    }
}

//! Sound payload sub-header.
//!
//! Every decoded `sound.*` payload starts with a small header:
//!
//! | bytes   | field                                      |
//! |---------|--------------------------------------------|
//! | 0..3    | u24, `0` for raw PCM, anything else encoded |
//! | 3       | bits per sample                            |
//! | 4       | channel count                              |
//! | 5..9    | sample rate                                |
//!
//! Raw PCM continues with a u32 data size and one reserved byte; the whole
//! payload is `size + 15` bytes. Encoded (MP3) sound continues with a u32
//! sample count, two reserved bytes and a u32 data size; the whole payload is
//! `size + 19` bytes.

use h4r_common::BinaryReader;

use crate::{Error, Result};

/// Fixed bytes surrounding the data of a raw PCM sound.
pub const RAW_OVERHEAD: usize = 15;

/// Fixed bytes surrounding the data of an encoded sound.
pub const ENCODED_OVERHEAD: usize = 19;

/// Storage form of a sound payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundKind {
    /// Uncompressed samples.
    RawPcm,
    /// MP3-family stream.
    Encoded { sample_count: u32 },
}

/// Decoded sound sub-header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SoundInfo {
    pub kind: SoundKind,
    pub bits_per_sample: u8,
    pub channels: u8,
    pub sample_rate: u32,
    /// Size of the sample data as declared by the sub-header.
    pub data_size: u32,
}

impl SoundInfo {
    /// Parse and validate the sub-header of a decoded sound payload.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut reader = BinaryReader::new(data);

        let is_raw = reader.read_u24()? == 0;
        let bits_per_sample = reader.read_u8()?;
        let channels = reader.read_u8()?;
        let sample_rate = reader.read_u32()?;

        let (kind, data_size, overhead) = if is_raw {
            let data_size = reader.read_u32()?;
            let _reserved = reader.read_u8()?;
            (SoundKind::RawPcm, data_size, RAW_OVERHEAD)
        } else {
            let sample_count = reader.read_u32()?;
            let _reserved = reader.read_bytes(2)?;
            let data_size = reader.read_u32()?;
            (
                SoundKind::Encoded { sample_count },
                data_size,
                ENCODED_OVERHEAD,
            )
        };

        if data.len() as u64 != data_size as u64 + overhead as u64 {
            log::error!(
                "sound payload is {} bytes, sub-header says it should be {} + {overhead}",
                data.len(),
                data_size
            );
            return Err(Error::SoundSizeMismatch {
                actual: data.len(),
                declared: data_size,
                header_len: overhead,
            });
        }

        Ok(Self {
            kind,
            bits_per_sample,
            channels,
            sample_rate,
            data_size,
        })
    }

    #[inline]
    pub fn is_raw(&self) -> bool {
        self.kind == SoundKind::RawPcm
    }
}

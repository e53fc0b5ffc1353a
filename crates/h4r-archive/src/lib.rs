//! H4R resource archive reader for Heroes of Might and Magic IV.
//!
//! An H4R archive is a 12-byte header, a sequence of stored payloads and a
//! file table describing them:
//!
//! ```text
//! 0   magic "H4R\x05"
//! 4   u32 table offset
//! 8   u32 entry count
//! ..  payloads (stored or gzip)
//! table:
//!     u32 entry count (repeated)
//!     entry count records, see [`EntryDescriptor`]
//! ```
//!
//! All integers are little-endian. Entry names are ISO-8859-1 and start with
//! a [`Category`] prefix that decides where and how the entry is extracted.
//!
//! # Example
//!
//! ```no_run
//! use h4r_archive::{Extractor, H4rArchive};
//!
//! let archive = H4rArchive::open("Data/heroes4.h4r")?;
//!
//! for entry in archive.iter() {
//!     println!("{}: {} bytes", entry.name, entry.uncompressed_size);
//! }
//!
//! let summary = Extractor::new(&archive, "h4r_files").extract_all();
//! println!("{} of {} written", summary.written, summary.total);
//! # Ok::<(), h4r_archive::Error>(())
//! ```

mod archive;
mod category;
mod compression;
mod entry;
mod error;
mod extract;
mod header;
mod payload;
mod sound;

pub mod diagnostics;

pub use archive::H4rArchive;
pub use category::Category;
pub use compression::{decode_payload, decompress_gzip, Compression};
pub use entry::EntryDescriptor;
pub use error::{Error, Result};
pub use extract::{EntryOutcome, ExtractionSummary, Extractor, Transcode, TRANSCODED_DIR};
pub use header::ArchiveHeader;
pub use payload::Payload;
pub use sound::{SoundInfo, SoundKind};

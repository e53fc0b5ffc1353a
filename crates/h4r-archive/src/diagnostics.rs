//! Integrity checks over a scanned file table.
//!
//! None of this is needed for extraction. It answers "which bytes of the
//! archive does the table not account for", which is how undocumented parts
//! of the format are found.

use std::ops::Range;

use crate::entry::EntryDescriptor;
use crate::header::ArchiveHeader;

/// How many archive bytes the header, table records and payloads account for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Coverage {
    pub covered: u64,
    pub total: u64,
}

impl Coverage {
    /// Covered share of the archive, in percent.
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.covered as f64 / self.total as f64 * 100.0
    }

    /// Bytes left unaccounted for. Negative when records or payloads overlap.
    pub fn remaining(&self) -> i64 {
        self.total as i64 - self.covered as i64
    }
}

/// Sum of header, table record and stored payload sizes.
pub fn coverage(entries: &[EntryDescriptor], archive_len: u64) -> Coverage {
    let covered = entries
        .iter()
        .map(|e| e.record_len() as u64 + e.compressed_size as u64)
        .sum::<u64>()
        + ArchiveHeader::SIZE as u64;

    Coverage {
        covered,
        total: archive_len,
    }
}

/// Holes between consecutive payloads, ordered by offset.
///
/// Includes the hole between the last payload and the end of the archive.
pub fn payload_gaps(entries: &[EntryDescriptor], archive_len: u64) -> Vec<Range<u64>> {
    let mut sorted: Vec<&EntryDescriptor> = entries.iter().collect();
    sorted.sort_by_key(|e| e.file_offset);

    let mut gaps: Vec<Range<u64>> = sorted
        .windows(2)
        .filter_map(|pair| {
            let end = pair[0].payload_range().end;
            let next = pair[1].file_offset as u64;
            (end < next).then_some(end..next)
        })
        .collect();

    if let Some(last) = sorted.last() {
        let end = last.payload_range().end;
        if end < archive_len {
            gaps.push(end..archive_len);
        }
    }

    gaps
}

/// Every byte range not covered by the header, a table record or a payload.
pub fn uncovered_ranges(entries: &[EntryDescriptor], archive_len: u64) -> Vec<Range<u64>> {
    let mut known: Vec<Range<u64>> = Vec::with_capacity(entries.len() * 2 + 1);
    known.push(0..ArchiveHeader::SIZE as u64);
    for entry in entries {
        known.push(entry.record_span.start as u64..entry.record_span.end as u64);
        known.push(entry.payload_range());
    }
    known.retain(|r| r.start < r.end);
    known.sort_by_key(|r| r.start);

    let mut uncovered = Vec::new();
    let mut cursor = 0u64;
    for range in known {
        if range.start > cursor {
            uncovered.push(cursor..range.start.min(archive_len));
        }
        cursor = cursor.max(range.end);
        if cursor >= archive_len {
            break;
        }
    }
    if cursor < archive_len {
        uncovered.push(cursor..archive_len);
    }

    uncovered.retain(|r| r.start < r.end);
    uncovered
}

/// Declared size of payloads that are no longer stored.
pub fn stale_uncompressed_bytes(entries: &[EntryDescriptor]) -> u64 {
    entries
        .iter()
        .filter(|e| e.compressed_size == 0 && e.uncompressed_size != 0)
        .map(|e| e.uncompressed_size as u64)
        .sum()
}

/// All diagnostics for one archive.
#[derive(Debug, Clone)]
pub struct Report {
    pub unused: Vec<String>,
    pub replaced: Vec<String>,
    pub coverage: Coverage,
    pub gaps: Vec<Range<u64>>,
    pub uncovered: Vec<Range<u64>>,
    pub stale_bytes: u64,
}

impl Report {
    pub fn build(entries: &[EntryDescriptor], archive_len: u64) -> Self {
        Self {
            unused: entries
                .iter()
                .filter(|e| e.is_unused())
                .map(|e| e.name.clone())
                .collect(),
            replaced: entries
                .iter()
                .filter(|e| e.is_replaced())
                .map(|e| e.name.clone())
                .collect(),
            coverage: coverage(entries, archive_len),
            gaps: payload_gaps(entries, archive_len),
            uncovered: uncovered_ranges(entries, archive_len),
            stale_bytes: stale_uncompressed_bytes(entries),
        }
    }
}

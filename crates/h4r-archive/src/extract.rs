//! Extraction of archive entries to disk.
//!
//! Each entry lands in `<root>/<Category>/<stem>.<ext>`, where `stem` is the
//! entry name minus its last `.` segment and `ext` comes from the category or
//! the payload inspector. Errors on one entry are logged and counted; they
//! never stop the remaining entries.

use std::fs;
use std::path::{Path, PathBuf};

use crate::archive::H4rArchive;
use crate::entry::EntryDescriptor;
use crate::payload::Payload;
use crate::sound::SoundInfo;
use crate::{Error, Result};

/// Directory, under a category directory, receiving transcoded sound.
pub const TRANSCODED_DIR: &str = "transcoded";

/// Converts an extracted raw PCM file into a compressed audio file.
pub trait Transcode: Sync {
    /// Extension of the files this transcoder produces.
    fn extension(&self) -> &str;

    /// Convert `input` to `output` using the sample layout in `info`.
    fn transcode(&self, input: &Path, info: &SoundInfo, output: &Path) -> Result<()>;
}

/// Result of extracting one entry.
#[derive(Debug)]
pub enum EntryOutcome {
    /// Payload written to `path`.
    Written { path: PathBuf, bytes: usize },
    /// Superseded by an external file, not written.
    Replaced,
    /// Payload dropped from the archive, not written.
    Unused,
    /// Deleted table slot, not written.
    Empty,
    /// Extraction failed.
    Failed(Error),
}

/// Counts over one extraction run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractionSummary {
    pub total: usize,
    pub written: usize,
    pub replaced: usize,
    pub unused: usize,
    pub empty: usize,
    pub failed: usize,
}

impl ExtractionSummary {
    fn record(&mut self, outcome: &EntryOutcome) {
        self.total += 1;
        match outcome {
            EntryOutcome::Written { .. } => self.written += 1,
            EntryOutcome::Replaced => self.replaced += 1,
            EntryOutcome::Unused => self.unused += 1,
            EntryOutcome::Empty => self.empty += 1,
            EntryOutcome::Failed(_) => self.failed += 1,
        }
    }
}

/// Writes the entries of one archive below an output root.
pub struct Extractor<'a> {
    archive: &'a H4rArchive,
    output_root: PathBuf,
    transcoder: Option<&'a dyn Transcode>,
}

impl<'a> Extractor<'a> {
    pub fn new<P: Into<PathBuf>>(archive: &'a H4rArchive, output_root: P) -> Self {
        Self {
            archive,
            output_root: output_root.into(),
            transcoder: None,
        }
    }

    /// Also transcode raw PCM sound after writing it.
    pub fn with_transcoder(mut self, transcoder: &'a dyn Transcode) -> Self {
        self.transcoder = Some(transcoder);
        self
    }

    /// Directory receiving entries of the entry's category.
    pub fn category_dir(&self, entry: &EntryDescriptor) -> PathBuf {
        self.output_root.join(entry.category.dir_name())
    }

    /// Full output path for an entry once its payload has been inspected.
    ///
    /// Fails with [`Error::UnsafeName`] when the stem holds a path separator
    /// or is a parent reference.
    pub fn output_path(&self, entry: &EntryDescriptor, payload: &Payload) -> Result<PathBuf> {
        let stem = entry.output_stem();
        if stem.contains(&['/', '\\'][..]) || stem == ".." {
            return Err(Error::UnsafeName(entry.name.clone()));
        }

        let extension = payload.output_extension(entry.category);
        Ok(self.category_dir(entry).join(format!("{stem}.{extension}")))
    }

    /// Extract every entry in table order.
    pub fn extract_all(&self) -> ExtractionSummary {
        self.extract_all_with(|_, _, _| {})
    }

    /// Extract every entry in table order, reporting each outcome.
    pub fn extract_all_with<F>(&self, mut on_entry: F) -> ExtractionSummary
    where
        F: FnMut(usize, &EntryDescriptor, &EntryOutcome),
    {
        let mut summary = ExtractionSummary::default();
        for (index, entry) in self.archive.iter().enumerate() {
            let outcome = self.extract_entry(index, entry);
            on_entry(index, entry, &outcome);
            summary.record(&outcome);
        }
        self.log_summary(&summary);
        summary
    }

    /// Extract every entry on the rayon pool.
    ///
    /// Outcomes are the same as [`extract_all`](Self::extract_all); only the
    /// order in which files are written differs.
    #[cfg(feature = "parallel")]
    pub fn extract_all_parallel(&self) -> ExtractionSummary {
        use rayon::prelude::*;

        let outcomes: Vec<EntryOutcome> = self
            .archive
            .entries()
            .par_iter()
            .enumerate()
            .map(|(index, entry)| self.extract_entry(index, entry))
            .collect();

        let mut summary = ExtractionSummary::default();
        for outcome in &outcomes {
            summary.record(outcome);
        }
        self.log_summary(&summary);
        summary
    }

    /// Extract one entry. Never panics; errors are logged and returned as
    /// [`EntryOutcome::Failed`].
    pub fn extract_entry(&self, index: usize, entry: &EntryDescriptor) -> EntryOutcome {
        if entry.is_replaced() {
            log::debug!("{}: replaced by {}, skipped", entry.name, entry.replacement_name);
            return EntryOutcome::Replaced;
        }
        if entry.is_unused() {
            log::debug!("{}: unused, skipped", entry.name);
            return EntryOutcome::Unused;
        }
        if entry.is_empty_slot() {
            log::debug!("{}: empty slot, skipped", entry.name);
            return EntryOutcome::Empty;
        }

        match self.write_entry(entry) {
            Ok((path, payload, bytes)) => {
                if let Payload::Sound(info) = payload {
                    self.transcode(entry, &path, &info);
                }
                EntryOutcome::Written { path, bytes }
            }
            Err(err) => {
                log::error!("Error in file at index {index} ({}): {err}", entry.name);
                EntryOutcome::Failed(err)
            }
        }
    }

    fn write_entry(&self, entry: &EntryDescriptor) -> Result<(PathBuf, Payload, usize)> {
        let data = self.archive.read_payload(entry)?;
        let payload = Payload::inspect(entry.category, &data)?;

        let path = self.output_path(entry, &payload)?;
        fs::create_dir_all(self.category_dir(entry))?;
        fs::write(&path, &data)?;

        let written = data.len();
        if written != entry.uncompressed_size as usize {
            log::warn!(
                "File should be {} bytes, and is {written}: {}",
                entry.uncompressed_size,
                entry.name
            );
        }

        Ok((path, payload, written))
    }

    fn transcode(&self, entry: &EntryDescriptor, pcm_path: &Path, info: &SoundInfo) {
        let Some(transcoder) = self.transcoder else {
            return;
        };
        if !info.is_raw() {
            return;
        }

        let out_dir = self.category_dir(entry).join(TRANSCODED_DIR);
        let output = out_dir.join(format!(
            "{}.{}",
            entry.output_stem(),
            transcoder.extension()
        ));

        let result = fs::create_dir_all(&out_dir)
            .map_err(Error::from)
            .and_then(|_| transcoder.transcode(pcm_path, info, &output));
        if let Err(err) = result {
            log::error!("Transcoding {} failed: {err}", entry.name);
        }
    }

    fn log_summary(&self, summary: &ExtractionSummary) {
        log::info!(
            "{} files written out of {} ({} replaced, {} unused, {} empty, {} failed)",
            summary.written,
            summary.total,
            summary.replaced,
            summary.unused,
            summary.empty,
            summary.failed
        );
    }
}

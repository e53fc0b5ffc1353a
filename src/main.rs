//! h4r CLI - Command-line tool for Heroes of Might and Magic IV resource archives.
//!
//! This is the main entry point for the h4r command-line application.

mod config;
mod transcode;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
#[cfg(not(feature = "parallel"))]
use indicatif::{ProgressBar, ProgressStyle};

use h4r_archive::diagnostics::Report;
use h4r_archive::{ExtractionSummary, Extractor, H4rArchive};
use h4r_common::{format_bytes, scan};

use crate::config::Settings;
use crate::transcode::FfmpegTranscoder;

/// h4r - Heroes of Might and Magic IV resource extraction tool
#[derive(Parser)]
#[command(name = "h4r")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Game installation directory
    #[arg(
        long,
        global = true,
        env = "H4R_GAME_DIR",
        default_value = "../Heroes_of_Might_and_Magic_IV/"
    )]
    game_dir: PathBuf,

    /// Extraction root directory
    #[arg(short, long, global = true, env = "H4R_OUTPUT", default_value = "./h4r_files/")]
    output: PathBuf,

    /// Log debug messages
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract all files from one archive
    Extract {
        /// Archive name (text, movies, updates, heroes4, music) or path
        archive: String,

        #[command(flatten)]
        transcode: TranscodeArgs,
    },

    /// Extract all files from every known archive
    ExtractAll {
        #[command(flatten)]
        transcode: TranscodeArgs,
    },

    /// List contents of an archive
    List {
        /// Archive name or path
        archive: String,

        /// Show detailed information
        #[arg(short, long)]
        detailed: bool,
    },

    /// Report table coverage, gaps and unused entries of an archive
    Inspect {
        /// Archive name or path
        archive: String,
    },

    /// Find gzip signatures anywhere in a file
    ScanGzip {
        /// File to scan
        file: PathBuf,
    },
}

#[derive(clap::Args)]
struct TranscodeArgs {
    /// Convert raw PCM sound to MP3 after extraction
    #[arg(long)]
    transcode: bool,

    /// ffmpeg executable used for transcoding
    #[arg(long, env = "H4R_FFMPEG", default_value = "ffmpeg")]
    ffmpeg: PathBuf,
}

impl TranscodeArgs {
    fn transcoder(&self) -> Option<FfmpegTranscoder> {
        self.transcode
            .then(|| FfmpegTranscoder::new(self.ffmpeg.clone()))
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let settings = Settings::new(cli.game_dir, cli.output);

    match cli.command {
        Commands::Extract { archive, transcode } => {
            let path = settings.archive_path(&archive);
            cmd_extract(&path, settings.output(), transcode.transcoder().as_ref())?;
        }
        Commands::ExtractAll { transcode } => {
            cmd_extract_all(&settings, transcode.transcoder().as_ref())?;
        }
        Commands::List { archive, detailed } => {
            cmd_list(&settings.archive_path(&archive), detailed)?;
        }
        Commands::Inspect { archive } => {
            cmd_inspect(&settings.archive_path(&archive))?;
        }
        Commands::ScanGzip { file } => {
            cmd_scan_gzip(&file)?;
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn open_archive(path: &Path) -> Result<H4rArchive> {
    let start = Instant::now();
    let archive = H4rArchive::open(path)
        .with_context(|| format!("Failed to open H4R archive {}", path.display()))?;
    log::info!(
        "Loaded {} entries from {} in {:?}",
        archive.entry_count(),
        archive.name(),
        start.elapsed()
    );
    Ok(archive)
}

fn cmd_extract(
    path: &Path,
    output: &Path,
    transcoder: Option<&FfmpegTranscoder>,
) -> Result<ExtractionSummary> {
    let archive = open_archive(path)?;
    fs::create_dir_all(output)
        .with_context(|| format!("Failed to create {}", output.display()))?;

    let mut extractor = Extractor::new(&archive, output);
    if let Some(transcoder) = transcoder {
        extractor = extractor.with_transcoder(transcoder);
    }

    let start = Instant::now();

    #[cfg(feature = "parallel")]
    let summary = extractor.extract_all_parallel();

    #[cfg(not(feature = "parallel"))]
    let summary = {
        let pb = ProgressBar::new(archive.entry_count() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
                )?
                .progress_chars("#>-"),
        );
        let summary = extractor.extract_all_with(|_, _, _| pb.inc(1));
        pb.finish_with_message("Done");
        summary
    };

    println!(
        "{}: {} files written out of {} in {:?}",
        archive.name(),
        summary.written,
        summary.total,
        start.elapsed()
    );

    Ok(summary)
}

fn cmd_extract_all(settings: &Settings, transcoder: Option<&FfmpegTranscoder>) -> Result<()> {
    let mut failed = Vec::new();
    for (name, path) in settings.known_archives() {
        if let Err(err) = cmd_extract(&path, settings.output(), transcoder) {
            log::error!("{name}: {err:#}");
            failed.push(name);
        }
    }

    if !failed.is_empty() {
        anyhow::bail!("Could not extract: {}", failed.join(", "));
    }
    Ok(())
}

fn cmd_list(path: &Path, detailed: bool) -> Result<()> {
    let archive = open_archive(path)?;

    for entry in archive.iter() {
        if detailed {
            println!("{entry}");
        } else {
            println!("{}", entry.name);
        }
    }

    println!("\nTotal: {} entries", archive.entry_count());

    Ok(())
}

fn cmd_inspect(path: &Path) -> Result<()> {
    let archive = open_archive(path)?;
    let total = archive.len() as u64;
    let report = Report::build(archive.entries(), total);

    println!(
        "{} out of {}: {:.2} %",
        format_bytes(report.coverage.covered),
        format_bytes(total),
        report.coverage.percent()
    );
    println!("{} bytes remaining.", report.coverage.remaining());

    println!("\nUnused entries: {}", report.unused.len());
    for name in &report.unused {
        println!("  {name}");
    }

    println!("Replaced entries: {}", report.replaced.len());
    for name in &report.replaced {
        println!("  {name}");
    }

    println!(
        "Declared size of payloads no longer stored: {}",
        format_bytes(report.stale_bytes)
    );

    println!("\nGaps between payloads: {}", report.gaps.len());
    for gap in &report.gaps {
        println!("  {:>10} .. {:<10} ({} bytes)", gap.start, gap.end, gap.end - gap.start);
    }

    println!("\nBytes not described by the table: {}", report.uncovered.len());
    for range in &report.uncovered {
        println!(
            "  {:>10} .. {:<10} ({} bytes)",
            range.start,
            range.end,
            range.end - range.start
        );
    }

    Ok(())
}

fn cmd_scan_gzip(path: &Path) -> Result<()> {
    let data = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    println!("Looking into {} bytes", data.len());

    let offsets = scan::find_gzip_signatures(&data);
    for offset in &offsets {
        println!("{offset}");
    }

    println!("Found {} offsets.", offsets.len());

    Ok(())
}

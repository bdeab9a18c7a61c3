use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use log::{debug, info};

pub mod bamutil;
pub mod config;
pub mod output;
pub mod pileup;
pub mod progressbar;
pub mod readutil;
pub mod reference;
pub mod stat_type;
pub mod stats;

pub use config::{Config, CoordinateBase, UsageError};
pub use output::SinkError;
pub use stat_type::StatType;

/// Computes per-position and binned statistics from SAM/BAM/CRAM alignment files.
#[derive(Parser, Debug)]
#[command(name = "alnstats")]
#[command(version, long_about = None)]
pub struct Cli {
    /// Alignment file (SAM/BAM/CRAM). Region queries require an index.
    #[arg(value_name = "ALIGNMENT")]
    pub files: Vec<PathBuf>,

    /// Type of statistics to compute.
    #[arg(long = "type", short = 't', value_enum, default_value_t = StatType::Coverage)]
    pub stat_type: StatType,

    /// Chromosome (reference sequence) to restrict statistics to.
    #[arg(long, short = 'c')]
    pub chromosome: Option<String>,

    /// Start position of the queried interval.
    #[arg(long, short = 's')]
    pub start: Option<u64>,

    /// End position of the queried interval.
    #[arg(long, short = 'e')]
    pub end: Option<u64>,

    /// Use zero-based half-open coordinates for input and output (default is one-based, closed).
    #[arg(long, short = 'z')]
    pub zero_based: bool,

    /// Drop rows for positions outside the queried interval.
    #[arg(long, short = 'u')]
    pub truncate: bool,

    /// Emit a row for every position (or bin) in range, including those without coverage.
    #[arg(long, short = 'd')]
    pub pad: bool,

    /// Reference FASTA file. Required for variation, variation_strand, baseq_ext,
    /// baseq_ext_strand, coverage_gc, coverage_binned and coverage_ext_binned.
    #[arg(long, short = 'f')]
    pub fasta: Option<PathBuf>,

    /// Do not write the header row.
    #[arg(long, short = 'o')]
    pub omit_header: bool,

    /// Report progress every N rows.
    #[arg(long, short = 'p', value_name = "ROWS")]
    pub progress: Option<u64>,

    /// Window size for binned statistics and GC content.
    #[arg(long, default_value_t = 300)]
    pub window_size: u64,

    /// Window offset for binned statistics and GC content (default: half the window size).
    #[arg(long)]
    pub window_offset: Option<u64>,

    /// Minimum mapping quality for a read to be counted.
    #[arg(long, default_value_t = 0)]
    pub min_mapq: u8,

    /// Minimum base quality for a base to be counted in a pileup column.
    #[arg(long, default_value_t = 0)]
    pub min_baseq: u8,

    /// Skip reads flagged as duplicates.
    #[arg(long)]
    pub no_dup: bool,

    /// Do not count deletions in pileup columns.
    #[arg(long)]
    pub no_del: bool,

    /// Maximum number of reads entering a single pileup column.
    #[arg(long, default_value_t = 8000)]
    pub max_depth: u32,

    /// Write rows to this file instead of standard output.
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Log level (off, error, warn, info, debug, trace).
    #[arg(long, short = 'l', default_value = "warn")]
    pub log_level: String,
}

/// Opens the input files named by `config` and streams the selected statistic to its output.
pub fn run(config: &Config) -> anyhow::Result<()> {
    debug!("{:?}", config);

    let out: Box<dyn Write> = match &config.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file {}", path.display()))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(io::stdout()),
    };

    let mut alignments = bamutil::open(&config.input, config.region.as_ref())?;

    let mut reference = match &config.reference_path {
        Some(path) if config.stat_type.requires_reference() => {
            Some(reference::Reference::from_path(path)?)
        }
        _ => None,
    };

    info!(
        "Computing {} for {}",
        config.stat_type,
        config.input.display()
    );
    if config.stat_type.is_binned() {
        info!(
            "Window size {}, offset {}",
            config.window_size, config.window_offset
        );
    }

    let mut sink = output::TsvSink::new(out);
    let rows = stats::write_stats(
        config.stat_type,
        &mut sink,
        &mut alignments,
        reference.as_mut(),
        config,
    )?;
    sink.finish()?;

    info!("Wrote {} rows.", rows);
    Ok(())
}

use std::error::Error;
use std::fmt;
use std::path::PathBuf;

use crate::stat_type::StatType;
use crate::Cli;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CoordinateBase {
    OneBased,
    ZeroBased,
}

impl CoordinateBase {
    /// Offset added to a zero-based position when it is written out.
    pub fn offset(&self) -> i64 {
        match self {
            CoordinateBase::OneBased => 1,
            CoordinateBase::ZeroBased => 0,
        }
    }
}

/// A chromosome with optional bounds, always zero-based and half-open.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegionQuery {
    pub chrom: String,
    pub start: Option<u64>,
    pub end: Option<u64>,
}

/// Argument combinations that cannot be expressed through clap alone.
#[derive(Debug, PartialEq, Eq)]
pub enum UsageError {
    MissingFileOperand,
    MissingReference(StatType),
    RegionWithoutChromosome,
    InvertedRegion { start: u64, end: u64 },
    ZeroStart,
    ZeroWindowSize,
}

impl fmt::Display for UsageError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            UsageError::MissingFileOperand => write!(f, "missing file operand"),
            UsageError::MissingReference(t) => {
                write!(f, "--fasta is required for statistics type '{}'", t)
            }
            UsageError::RegionWithoutChromosome => {
                write!(f, "--start and --end require --chromosome")
            }
            UsageError::InvertedRegion { start, end } => {
                write!(f, "start ({}) must not be greater than end ({})", start, end)
            }
            UsageError::ZeroStart => {
                write!(f, "start must be at least 1 with one-based coordinates")
            }
            UsageError::ZeroWindowSize => write!(f, "--window-size must be positive"),
        }
    }
}

impl Error for UsageError {}

/// Validated options for one invocation.
#[derive(Clone, Debug)]
pub struct Config {
    pub input: PathBuf,
    pub stat_type: StatType,
    pub region: Option<RegionQuery>,
    pub coordinate_base: CoordinateBase,
    pub truncate: bool,
    pub pad: bool,
    pub reference_path: Option<PathBuf>,
    pub emit_header: bool,
    pub progress_interval: Option<u64>,
    pub window_size: u64,
    pub window_offset: u64,
    pub min_mapq: u8,
    pub min_baseq: u8,
    pub no_dup: bool,
    pub no_del: bool,
    pub max_depth: u32,
    pub output: Option<PathBuf>,
}

impl Config {
    /// Checks the parsed arguments without touching the file system.
    pub fn from_cli(cli: &Cli) -> Result<Self, UsageError> {
        if cli.files.len() != 1 {
            return Err(UsageError::MissingFileOperand);
        }

        if cli.stat_type.requires_reference() && cli.fasta.is_none() {
            return Err(UsageError::MissingReference(cli.stat_type));
        }

        if cli.window_size == 0 {
            return Err(UsageError::ZeroWindowSize);
        }

        let coordinate_base = if cli.zero_based {
            CoordinateBase::ZeroBased
        } else {
            CoordinateBase::OneBased
        };

        let region = match &cli.chromosome {
            Some(chrom) => Some(normalise_region(
                chrom,
                cli.start,
                cli.end,
                coordinate_base,
            )?),
            None if cli.start.is_some() || cli.end.is_some() => {
                return Err(UsageError::RegionWithoutChromosome)
            }
            None => None,
        };

        Ok(Self {
            input: cli.files[0].clone(),
            stat_type: cli.stat_type,
            region,
            coordinate_base,
            truncate: cli.truncate,
            pad: cli.pad,
            reference_path: cli.fasta.clone(),
            emit_header: !cli.omit_header,
            progress_interval: cli.progress.filter(|n| *n > 0),
            window_size: cli.window_size,
            window_offset: cli.window_offset.unwrap_or(cli.window_size / 2),
            min_mapq: cli.min_mapq,
            min_baseq: cli.min_baseq,
            no_dup: cli.no_dup,
            no_del: cli.no_del,
            max_depth: cli.max_depth,
            output: cli.output.clone(),
        })
    }
}

/// One-based closed `[start, end]` becomes zero-based `[start - 1, end)`.
fn normalise_region(
    chrom: &str,
    start: Option<u64>,
    end: Option<u64>,
    base: CoordinateBase,
) -> Result<RegionQuery, UsageError> {
    let start = match (start, base) {
        (Some(0), CoordinateBase::OneBased) => return Err(UsageError::ZeroStart),
        (Some(s), CoordinateBase::OneBased) => Some(s - 1),
        (s, CoordinateBase::ZeroBased) => s,
        (None, _) => None,
    };

    if let (Some(s), Some(e)) = (start, end) {
        if s > e {
            return Err(UsageError::InvertedRegion { start: s, end: e });
        }
    }

    Ok(RegionQuery {
        chrom: chrom.to_string(),
        start,
        end,
    })
}

//! Statistic writers and the dispatcher that selects one by type.

use std::io::Write;

use anyhow::{anyhow, bail};
use rust_htslib::bam::record::Record;

use crate::bamutil::{AlignmentSource, Region};
use crate::config::Config;
use crate::output::TsvSink;
use crate::pileup::{Pileup, PileupColumn, PileupOptions};
use crate::progressbar::ProgressBar;
use crate::readutil::{AlignedRead, ReadFilter};
use crate::reference::Reference;
use crate::stat_type::StatType;

pub mod baseq;
pub mod binned;
pub mod counts;
pub mod coverage;
pub mod mapq;
pub mod pad;
pub mod tlen;
pub mod variation;

use counts::Layout;
use pad::Padder;

/// Writes the statistic `stat_type` for every row of `source` into `sink`.
///
/// Returns the number of data rows written. `reference` must be present for
/// types that [`StatType::requires_reference`].
pub fn write_stats<W: Write>(
    stat_type: StatType,
    sink: &mut TsvSink<W>,
    source: &mut AlignmentSource,
    reference: Option<&mut Reference>,
    config: &Config,
) -> anyhow::Result<u64> {
    use Layout::{Combined, Stranded};

    let reference = if stat_type.requires_reference() {
        Some(reference.ok_or_else(|| {
            anyhow!("Statistics type {} needs a reference sequence", stat_type)
        })?)
    } else {
        None
    };

    macro_rules! pileup {
        ($stat:expr) => {
            write_pileup(&$stat, sink, source, reference, config)
        };
    }
    macro_rules! binned {
        ($stat:expr) => {
            write_binned(&$stat, sink, source, reference, config)
        };
    }

    match stat_type {
        StatType::Coverage => pileup!(coverage::Coverage(Combined)),
        StatType::CoverageStrand => pileup!(coverage::Coverage(Stranded)),
        StatType::CoverageExt => pileup!(coverage::CoverageExt(Combined)),
        StatType::CoverageExtStrand => pileup!(coverage::CoverageExt(Stranded)),
        StatType::Variation => pileup!(variation::Variation(Combined)),
        StatType::VariationStrand => pileup!(variation::Variation(Stranded)),
        StatType::Tlen => pileup!(tlen::Tlen(Combined)),
        StatType::TlenStrand => pileup!(tlen::Tlen(Stranded)),
        StatType::Mapq => pileup!(mapq::Mapq(Combined)),
        StatType::MapqStrand => pileup!(mapq::Mapq(Stranded)),
        StatType::Baseq => pileup!(baseq::Baseq(Combined)),
        StatType::BaseqStrand => pileup!(baseq::Baseq(Stranded)),
        StatType::BaseqExt => pileup!(baseq::BaseqExt(Combined)),
        StatType::BaseqExtStrand => pileup!(baseq::BaseqExt(Stranded)),
        StatType::CoverageGc => pileup!(coverage::CoverageGc),
        StatType::CoverageBinned => binned!(binned::CoverageBinned),
        StatType::CoverageExtBinned => binned!(binned::CoverageExtBinned),
        StatType::MapqBinned => binned!(binned::MapqBinned),
        StatType::AlignmentBinned => binned!(binned::AlignmentBinned),
        StatType::TlenBinned => binned!(binned::TlenBinned),
    }
}

/// What a per-position statistic needs from the reference.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RefUse {
    None,
    Base,
    BaseAndGc,
}

/// Per-position context handed to a [`PileupStat`].
pub struct Site<'a> {
    pub column: &'a PileupColumn,
    /// Upper-cased reference base, `N` when not looked up.
    pub ref_base: u8,
    /// GC percentage of the window around the position, 0 when not looked up.
    pub gc: u32,
}

pub trait PileupStat {
    /// Column names following `chrom` and `pos`.
    fn fields(&self) -> Vec<String>;

    fn values(&self, site: &Site) -> Vec<String>;

    fn reference_use(&self) -> RefUse {
        RefUse::None
    }
}

pub trait BinnedStat {
    type Bin: Default;

    /// Column names following `chrom` and `pos`.
    fn fields(&self) -> Vec<String>;

    /// `record` is the raw alignment behind `read`, for statistics that look
    /// past the decoded fields.
    fn add(&self, bin: &mut Self::Bin, read: &AlignedRead, record: &Record);

    /// `gc` is the bin's GC percentage when [`BinnedStat::uses_gc`] is set.
    fn values(&self, bin: &Self::Bin, gc: Option<u32>) -> Vec<String>;

    fn uses_gc(&self) -> bool {
        false
    }
}

fn header_row(fields: Vec<String>) -> Vec<String> {
    let mut header = vec!["chrom".to_string(), "pos".to_string()];
    header.extend(fields);
    header
}

fn contig_name(contigs: &[(u32, String, u64)], tid: u32) -> anyhow::Result<&str> {
    contigs
        .get(tid as usize)
        .map(|(_, name, _)| name.as_str())
        .ok_or_else(|| anyhow!("Alignment refers to unknown tid {}", tid))
}

/// Slot ranges to pad: the region if there is one, otherwise every contig.
/// An empty region pads nothing.
fn pad_ranges(
    contigs: &[(u32, String, u64)],
    region: Option<Region>,
    slot: impl Fn(i64) -> (i64, i64),
) -> Vec<(u32, i64, i64)> {
    match region {
        Some(r) if r.start >= r.end => Vec::new(),
        Some(r) => {
            let (start, _) = slot(r.start);
            let (_, end) = slot(r.end);
            vec![(r.tid, start, end)]
        }
        None => contigs
            .iter()
            .map(|(tid, _, len)| {
                let (_, end) = slot(*len as i64);
                (*tid, 0, end)
            })
            .collect(),
    }
}

struct PileupEmitter<'a, S, W: Write> {
    stat: &'a S,
    sink: &'a mut TsvSink<W>,
    reference: Option<&'a mut Reference>,
    contigs: Vec<(u32, String, u64)>,
    progress: ProgressBar,
    config: &'a Config,
}

impl<'a, S: PileupStat, W: Write> PileupEmitter<'a, S, W> {
    fn emit(&mut self, column: &PileupColumn) -> anyhow::Result<()> {
        let chrom = contig_name(&self.contigs, column.tid)?;
        let (mut ref_base, mut gc) = (b'N', 0);

        let ref_use = self.stat.reference_use();
        if ref_use != RefUse::None {
            let reference = match self.reference.as_mut() {
                Some(r) => r,
                None => bail!("Reference sequence required but not opened"),
            };
            ref_base = reference.base(chrom, column.pos)?;
            if ref_use == RefUse::BaseAndGc {
                let start = column.pos - self.config.window_offset as i64;
                let end = start + self.config.window_size as i64;
                gc = reference.gc_percent(chrom, start, end)?;
            }
        }

        let pos = column.pos + self.config.coordinate_base.offset();
        let site = Site {
            column,
            ref_base,
            gc,
        };
        let mut row = vec![chrom.to_string(), pos.to_string()];
        row.extend(self.stat.values(&site));
        self.sink.write_row(&row)?;
        self.progress.update(self.sink.rows(), chrom, pos);
        Ok(())
    }
}

/// Runs the pileup over `source` and writes one row per column, honouring
/// truncate and pad.
pub fn write_pileup<S: PileupStat, W: Write>(
    stat: &S,
    sink: &mut TsvSink<W>,
    source: &mut AlignmentSource,
    reference: Option<&mut Reference>,
    config: &Config,
) -> anyhow::Result<u64> {
    if config.emit_header {
        sink.write_header(&header_row(stat.fields()))?;
    }

    let contigs = source.contigs();
    let region = source.region();
    let mut padder = if config.pad {
        Padder::new(pad_ranges(&contigs, region, |p| (p, p)))
    } else {
        Padder::disabled()
    };

    let options = PileupOptions {
        filter: ReadFilter {
            min_mapq: config.min_mapq,
            no_dup: config.no_dup,
        },
        min_baseq: config.min_baseq,
        no_del: config.no_del,
    };

    let mut emitter = PileupEmitter {
        stat,
        sink,
        reference,
        contigs,
        progress: ProgressBar::new(config.progress_interval),
        config,
    };

    for column in Pileup::new(source.pileup(config.max_depth), options) {
        let column = column?;
        if config.truncate {
            if let Some(r) = region {
                if !r.contains(column.tid, column.pos) {
                    continue;
                }
            }
        }
        while let Some((tid, pos)) = padder.next_before(column.tid, column.pos) {
            emitter.emit(&PileupColumn::empty(tid, pos))?;
        }
        padder.consume(column.tid, column.pos);
        emitter.emit(&column)?;
    }
    while let Some((tid, pos)) = padder.next_remaining() {
        emitter.emit(&PileupColumn::empty(tid, pos))?;
    }

    let rows = emitter.sink.rows();
    emitter.progress.finish(rows);
    Ok(rows)
}

struct BinEmitter<'a, S, W: Write> {
    stat: &'a S,
    sink: &'a mut TsvSink<W>,
    reference: Option<&'a mut Reference>,
    contigs: Vec<(u32, String, u64)>,
    progress: ProgressBar,
    config: &'a Config,
}

impl<'a, S: BinnedStat, W: Write> BinEmitter<'a, S, W> {
    fn emit(&mut self, tid: u32, bin: i64, acc: &S::Bin) -> anyhow::Result<()> {
        let chrom = contig_name(&self.contigs, tid)?;
        let size = self.config.window_size as i64;
        let bin_start = bin * size;

        let gc = if self.stat.uses_gc() {
            let reference = match self.reference.as_mut() {
                Some(r) => r,
                None => bail!("Reference sequence required but not opened"),
            };
            Some(reference.gc_percent(chrom, bin_start, bin_start + size)?)
        } else {
            None
        };

        let pos =
            bin_start + self.config.window_offset as i64 + self.config.coordinate_base.offset();
        let mut row = vec![chrom.to_string(), pos.to_string()];
        row.extend(self.stat.values(acc, gc));
        self.sink.write_row(&row)?;
        self.progress.update(self.sink.rows(), chrom, pos);
        Ok(())
    }

    /// Fills empty bins up to `(tid, bin)`, then writes the bin itself.
    fn emit_padded(
        &mut self,
        padder: &mut Padder,
        tid: u32,
        bin: i64,
        acc: &S::Bin,
    ) -> anyhow::Result<()> {
        while let Some((t, b)) = padder.next_before(tid, bin) {
            self.emit(t, b, &S::Bin::default())?;
        }
        padder.consume(tid, bin);
        self.emit(tid, bin, acc)
    }
}

/// Assigns reads to fixed windows by their leftmost aligned position and
/// writes one row per window.
pub fn write_binned<S: BinnedStat, W: Write>(
    stat: &S,
    sink: &mut TsvSink<W>,
    source: &mut AlignmentSource,
    reference: Option<&mut Reference>,
    config: &Config,
) -> anyhow::Result<u64> {
    if config.emit_header {
        sink.write_header(&header_row(stat.fields()))?;
    }

    let size = config.window_size as i64;
    let contigs = source.contigs();
    let region = source.region();
    let mut padder = if config.pad {
        Padder::new(pad_ranges(&contigs, region, |p| {
            (p.div_euclid(size), (p + size - 1).div_euclid(size))
        }))
    } else {
        Padder::disabled()
    };
    let filter = ReadFilter {
        min_mapq: config.min_mapq,
        no_dup: config.no_dup,
    };
    let in_range = |tid: u32, bin: i64| match (config.truncate, region) {
        (true, Some(r)) => {
            tid == r.tid && r.start < r.end && bin * size < r.end && (bin + 1) * size > r.start
        }
        _ => true,
    };

    let mut emitter = BinEmitter {
        stat,
        sink,
        reference,
        contigs,
        progress: ProgressBar::new(config.progress_interval),
        config,
    };

    let mut current: Option<((u32, i64), S::Bin)> = None;
    for record in source.records() {
        let record = record?;
        if !filter.accepts(&record) {
            continue;
        }
        let read = AlignedRead::new(&record);
        let key = (read.tid, read.start.div_euclid(size));

        let same_bin = match &current {
            Some((k, _)) if *k == key => true,
            Some((k, _)) if *k > key => bail!(
                "Alignments are not coordinate-sorted (tid {} position {})",
                read.tid,
                read.start
            ),
            _ => false,
        };
        if !same_bin {
            if let Some(((tid, bin), acc)) = current.take() {
                if in_range(tid, bin) {
                    emitter.emit_padded(&mut padder, tid, bin, &acc)?;
                }
            }
            current = Some((key, S::Bin::default()));
        }
        if let Some((_, acc)) = current.as_mut() {
            stat.add(acc, &read, &record);
        }
    }
    if let Some(((tid, bin), acc)) = current.take() {
        if in_range(tid, bin) {
            emitter.emit_padded(&mut padder, tid, bin, &acc)?;
        }
    }
    while let Some((t, b)) = padder.next_remaining() {
        emitter.emit(t, b, &S::Bin::default())?;
    }

    let rows = emitter.sink.rows();
    emitter.progress.finish(rows);
    Ok(rows)
}

//! Statistics aggregated over fixed-size windows of the reference.

use rust_htslib::bam::record::{Cigar, Record};

use super::counts::{count_str, rounded, ExtCounts, Layout, Moments, Split};
use super::BinnedStat;
use crate::readutil::AlignedRead;

fn gc_str(gc: Option<u32>) -> String {
    gc.unwrap_or(0).to_string()
}

/// Reads per window with the window's GC content.
pub struct CoverageBinned;

impl BinnedStat for CoverageBinned {
    type Bin = Split<u64>;

    fn fields(&self) -> Vec<String> {
        vec!["gc".into(), "reads_all".into(), "reads_pp".into()]
    }

    fn add(&self, bin: &mut Self::Bin, read: &AlignedRead, _record: &Record) {
        bin.count(read);
    }

    fn values(&self, bin: &Self::Bin, gc: Option<u32>) -> Vec<String> {
        let mut values = vec![gc_str(gc)];
        values.extend(bin.values(Layout::Combined, count_str));
        values
    }

    fn uses_gc(&self) -> bool {
        true
    }
}

/// [`CoverageBinned`] with mate, clipping and duplicate classes.
pub struct CoverageExtBinned;

impl BinnedStat for CoverageExtBinned {
    type Bin = (Split<u64>, ExtCounts);

    fn fields(&self) -> Vec<String> {
        let mut fields = CoverageBinned.fields();
        fields.extend(ExtCounts::fields(Layout::Combined));
        fields
    }

    fn add(&self, bin: &mut Self::Bin, read: &AlignedRead, _record: &Record) {
        bin.0.count(read);
        bin.1.add(read);
    }

    fn values(&self, bin: &Self::Bin, gc: Option<u32>) -> Vec<String> {
        let mut values = vec![gc_str(gc)];
        values.extend(bin.0.values(Layout::Combined, count_str));
        values.extend(bin.1.values(Layout::Combined));
        values
    }

    fn uses_gc(&self) -> bool {
        true
    }
}

#[derive(Default)]
pub struct MapqBin {
    reads: u64,
    mapq0: u64,
    mapq: Moments,
}

pub struct MapqBinned;

impl BinnedStat for MapqBinned {
    type Bin = MapqBin;

    fn fields(&self) -> Vec<String> {
        vec!["reads_all".into(), "reads_mapq0".into(), "rms_mapq".into()]
    }

    fn add(&self, bin: &mut Self::Bin, read: &AlignedRead, _record: &Record) {
        bin.reads += 1;
        if read.mapq == 0 {
            bin.mapq0 += 1;
        }
        bin.mapq.add(read.mapq as f64);
    }

    fn values(&self, bin: &Self::Bin, _gc: Option<u32>) -> Vec<String> {
        vec![
            bin.reads.to_string(),
            bin.mapq0.to_string(),
            rounded(bin.mapq.rms()),
        ]
    }
}

/// CIGAR operation names in BAM encoding order.
const CIGAR_OPS: [&str; 9] = ["M", "I", "D", "N", "S", "H", "P", "=", "X"];

fn cigar_slot(c: &Cigar) -> (usize, u32) {
    match *c {
        Cigar::Match(l) => (0, l),
        Cigar::Ins(l) => (1, l),
        Cigar::Del(l) => (2, l),
        Cigar::RefSkip(l) => (3, l),
        Cigar::SoftClip(l) => (4, l),
        Cigar::HardClip(l) => (5, l),
        Cigar::Pad(l) => (6, l),
        Cigar::Equal(l) => (7, l),
        Cigar::Diff(l) => (8, l),
    }
}

#[derive(Default)]
pub struct AlignmentBin {
    reads: u64,
    ops: [u64; 9],
}

/// Total length of each CIGAR operation over the reads of a window.
pub struct AlignmentBinned;

impl BinnedStat for AlignmentBinned {
    type Bin = AlignmentBin;

    fn fields(&self) -> Vec<String> {
        let mut fields = vec!["reads_all".to_string(), "bases_all".to_string()];
        fields.extend(CIGAR_OPS.iter().map(|op| op.to_string()));
        fields
    }

    fn add(&self, bin: &mut Self::Bin, _read: &AlignedRead, record: &Record) {
        bin.reads += 1;
        for c in record.cigar().iter() {
            let (slot, len) = cigar_slot(c);
            bin.ops[slot] += len as u64;
        }
    }

    fn values(&self, bin: &Self::Bin, _gc: Option<u32>) -> Vec<String> {
        let mut values = vec![
            bin.reads.to_string(),
            bin.ops.iter().sum::<u64>().to_string(),
        ];
        values.extend(bin.ops.iter().map(u64::to_string));
        values
    }
}

#[derive(Default)]
pub struct TlenBin {
    reads: Split<u64>,
    tlen: Split<Moments>,
}

/// Insert size per window, over reads whose mate maps to the same contig.
pub struct TlenBinned;

impl BinnedStat for TlenBinned {
    type Bin = TlenBin;

    fn fields(&self) -> Vec<String> {
        [
            "reads_all",
            "reads_pp",
            "mean_tlen",
            "mean_tlen_pp",
            "rms_tlen",
            "rms_tlen_pp",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    fn add(&self, bin: &mut Self::Bin, read: &AlignedRead, _record: &Record) {
        bin.reads.count(read);
        if read.has_mate_on_same_contig() {
            bin.tlen.add_with(read, |m| m.add(read.tlen as f64));
        }
    }

    fn values(&self, bin: &Self::Bin, _gc: Option<u32>) -> Vec<String> {
        let mut values = bin.reads.values(Layout::Combined, count_str);
        values.extend(bin.tlen.values(Layout::Combined, |m| rounded(m.mean())));
        values.extend(bin.tlen.values(Layout::Combined, |m| rounded(m.rms())));
        values
    }
}

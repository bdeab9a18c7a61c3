//! Pileup columns built from htslib's pileup engine.
//!
//! htslib walks the CIGAR strings, caps the depth and checks coordinate order.
//! Read filters, the base quality threshold and the deletion filter are applied
//! here to every alignment of a column.

use rust_htslib::bam::pileup::{Alignment, Indel, Pileup as HtsColumn};
use rust_htslib::bam::record::Record;
use rust_htslib::errors::Error as HtsError;

use crate::readutil::{AlignedRead, ReadFilter};

/// One read's contribution to a column.
#[derive(Clone, Debug)]
pub struct PileupEntry {
    pub read: AlignedRead,
    /// Query position of the aligned base, `None` for a deletion.
    pub qpos: Option<usize>,
    pub indel: Indel,
    base: u8,
    qual: u8,
}

impl PileupEntry {
    pub fn is_del(&self) -> bool {
        self.qpos.is_none()
    }

    /// Upper-cased read base, `N` past the end of the stored sequence.
    pub fn base(&self) -> Option<u8> {
        self.qpos.map(|_| self.base)
    }

    /// Reads stored without qualities (0xff) report 0.
    pub fn qual(&self) -> Option<u8> {
        self.qpos.map(|_| self.qual)
    }
}

#[derive(Clone, Debug, Default)]
pub struct PileupColumn {
    pub tid: u32,
    pub pos: i64,
    pub entries: Vec<PileupEntry>,
}

impl PileupColumn {
    pub fn empty(tid: u32, pos: i64) -> Self {
        Self {
            tid,
            pos,
            entries: Vec::new(),
        }
    }
}

/// Filters applied per alignment. The depth cap is set on the htslib
/// iterator itself, see [`crate::bamutil::AlignmentSource::pileup`].
#[derive(Copy, Clone, Debug, Default)]
pub struct PileupOptions {
    pub filter: ReadFilter,
    pub min_baseq: u8,
    pub no_del: bool,
}

fn base_at(record: &Record, qpos: usize) -> u8 {
    if qpos < record.seq_len() {
        record.seq()[qpos].to_ascii_uppercase()
    } else {
        b'N'
    }
}

fn qual_at(record: &Record, qpos: usize) -> u8 {
    match record.qual().get(qpos) {
        Some(&q) if q != 0xff => q,
        _ => 0,
    }
}

fn build_entry(alignment: &Alignment, options: &PileupOptions) -> Option<PileupEntry> {
    if alignment.is_refskip() {
        return None;
    }
    let record = alignment.record();
    if !options.filter.accepts(&record) {
        return None;
    }

    let (qpos, base, qual) = match alignment.qpos() {
        Some(q) if !alignment.is_del() => {
            let qual = qual_at(&record, q);
            if qual < options.min_baseq {
                return None;
            }
            (Some(q), base_at(&record, q), qual)
        }
        _ if options.no_del => return None,
        _ => (None, b'N', 0),
    };

    Some(PileupEntry {
        read: AlignedRead::new(&record),
        qpos,
        indel: alignment.indel(),
        base,
        qual,
    })
}

/// Turns htslib pileup columns into [`PileupColumn`]s, skipping columns left
/// empty by the filters.
pub struct Pileup<I> {
    columns: I,
    options: PileupOptions,
}

impl<I> Pileup<I>
where
    I: Iterator<Item = Result<HtsColumn, HtsError>>,
{
    pub fn new(columns: I, options: PileupOptions) -> Self {
        Self { columns, options }
    }

    fn build_column(&self, column: &HtsColumn) -> PileupColumn {
        let mut built = PileupColumn::empty(column.tid(), column.pos() as i64);
        built.entries = column
            .alignments()
            .filter_map(|a| build_entry(&a, &self.options))
            .collect();
        built
    }
}

impl<I> Iterator for Pileup<I>
where
    I: Iterator<Item = Result<HtsColumn, HtsError>>,
{
    type Item = anyhow::Result<PileupColumn>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let column = match self.columns.next()? {
                Ok(column) => column,
                Err(e) => {
                    return Some(Err(anyhow::Error::new(e)
                        .context("Error building pileup (are alignments coordinate-sorted?)")))
                }
            };
            let built = self.build_column(&column);
            if !built.entries.is_empty() {
                return Some(Ok(built));
            }
        }
    }
}

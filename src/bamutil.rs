use std::convert::TryFrom;
use std::path::Path;

use anyhow::{anyhow, Context};
use log::debug;
use rust_htslib::errors::Error as HtsError;
use rust_htslib::{bam, bam::Read, bam::record::Record};

use crate::config::RegionQuery;

/// A region resolved against the alignment header.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Region {
    pub tid: u32,
    pub start: i64,
    pub end: i64,
}

impl Region {
    pub fn contains(&self, tid: u32, pos: i64) -> bool {
        tid == self.tid && pos >= self.start && pos < self.end
    }
}

enum Reader {
    Sequential(bam::Reader),
    Indexed(bam::IndexedReader),
}

/// An opened alignment file, positioned on the requested region if there is one.
pub struct AlignmentSource {
    reader: Reader,
    header: bam::HeaderView,
    region: Option<Region>,
}

pub type RecordIter<'a> = Box<dyn Iterator<Item = Result<Record, HtsError>> + 'a>;
pub type PileupIter<'a> = Box<dyn Iterator<Item = Result<bam::pileup::Pileup, HtsError>> + 'a>;

impl AlignmentSource {
    pub fn header(&self) -> &bam::HeaderView {
        &self.header
    }

    pub fn region(&self) -> Option<Region> {
        self.region
    }

    /// Records of the whole file, or of reads overlapping the region.
    pub fn records(&mut self) -> RecordIter<'_> {
        match &mut self.reader {
            Reader::Sequential(r) => Box::new(r.records()),
            Reader::Indexed(r) => Box::new(r.records()),
        }
    }

    /// htslib pileup columns over the same records, at most `max_depth` reads deep.
    pub fn pileup(&mut self, max_depth: u32) -> PileupIter<'_> {
        match &mut self.reader {
            Reader::Sequential(r) => {
                let mut p = r.pileup();
                p.set_max_depth(max_depth);
                Box::new(p)
            }
            Reader::Indexed(r) => {
                let mut p = r.pileup();
                p.set_max_depth(max_depth);
                Box::new(p)
            }
        }
    }

    /// (tid, name, length) for every contig in header order.
    pub fn contigs(&self) -> Vec<(u32, String, u64)> {
        (0..self.header.target_count())
            .map(|tid| {
                (
                    tid,
                    tid2chrom(tid, &self.header),
                    self.header.target_len(tid).unwrap_or(0),
                )
            })
            .collect()
    }
}

/// Opens an alignment file. A region query needs an index and seeks to the region.
pub fn open(input: &Path, query: Option<&RegionQuery>) -> anyhow::Result<AlignmentSource> {
    match query {
        None => {
            let reader = bam::Reader::from_path(input)
                .with_context(|| format!("Error opening alignment file {}", input.display()))?;
            let header = reader.header().clone();
            Ok(AlignmentSource {
                reader: Reader::Sequential(reader),
                header,
                region: None,
            })
        }
        Some(query) => {
            let mut reader = bam::IndexedReader::from_path(input).with_context(|| {
                format!(
                    "Error opening alignment file {} (random access requires an index)",
                    input.display()
                )
            })?;
            let header = reader.header().clone();
            let region = resolve_region(query, &header)?;
            debug!("Fetching {}:{}-{}", query.chrom, region.start, region.end);

            reader
                .fetch((region.tid as i32, region.start, region.end))
                .with_context(|| format!("Error fetching region {}", query.chrom))?;

            Ok(AlignmentSource {
                reader: Reader::Indexed(reader),
                header,
                region: Some(region),
            })
        }
    }
}

/// Clips the query to the contig length.
pub fn resolve_region(query: &RegionQuery, header: &bam::HeaderView) -> anyhow::Result<Region> {
    let tid = header
        .tid(query.chrom.as_bytes())
        .ok_or_else(|| anyhow!("Chromosome {} not present in alignment header", query.chrom))?;
    let len = header.target_len(tid).unwrap_or(0) as i64;

    let clip = |p: u64| i64::try_from(p).unwrap_or(i64::MAX);
    let end = query.end.map_or(len, |e| clip(e).min(len));
    let start = query.start.map_or(0, |s| clip(s).min(end));

    Ok(Region { tid, start, end })
}

pub fn tid2chrom(tid: u32, header: &bam::HeaderView) -> String {
    String::from_utf8_lossy(header.tid2name(tid)).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header() -> bam::HeaderView {
        bam::HeaderView::from_bytes(b"@SQ\tSN:chr1\tLN:1000\n@SQ\tSN:chr2\tLN:500\n")
    }

    #[test]
    fn region_is_clipped_to_contig() {
        let header = header();
        let query = RegionQuery {
            chrom: "chr2".to_string(),
            start: Some(100),
            end: Some(10_000),
        };
        let region = resolve_region(&query, &header).unwrap();
        assert_eq!(region, Region { tid: 1, start: 100, end: 500 });
        assert!(region.contains(1, 499));
        assert!(!region.contains(1, 500));
        assert!(!region.contains(0, 200));
    }

    #[test]
    fn huge_coordinates_clip_to_contig_end() {
        let header = header();
        let query = RegionQuery {
            chrom: "chr1".to_string(),
            start: Some(u64::MAX),
            end: Some(u64::MAX),
        };
        let region = resolve_region(&query, &header).unwrap();
        assert_eq!(region, Region { tid: 0, start: 1000, end: 1000 });
    }

    #[test]
    fn whole_chromosome_region() {
        let header = header();
        let query = RegionQuery {
            chrom: "chr1".to_string(),
            start: None,
            end: None,
        };
        let region = resolve_region(&query, &header).unwrap();
        assert_eq!(region, Region { tid: 0, start: 0, end: 1000 });
    }

    #[test]
    fn unknown_chromosome() {
        let header = header();
        let query = RegionQuery {
            chrom: "chrX".to_string(),
            start: None,
            end: None,
        };
        assert!(resolve_region(&query, &header).is_err());
    }

    #[test]
    fn tid2chrom_names() {
        let header = header();
        assert_eq!(tid2chrom(0, &header), "chr1");
        assert_eq!(tid2chrom(1, &header), "chr2");
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(open(Path::new("tests/no_such.bam"), None).is_err());
    }
}

use super::counts::{count_str, split_fields, ExtCounts, Layout, Split};
use super::{PileupStat, RefUse, Site};

/// Number of reads covering each position.
pub struct Coverage(pub Layout);

fn read_counts(site: &Site) -> Split<u64> {
    let mut reads = Split::<u64>::default();
    for entry in &site.column.entries {
        reads.count(&entry.read);
    }
    reads
}

impl PileupStat for Coverage {
    fn fields(&self) -> Vec<String> {
        split_fields("reads", self.0)
    }

    fn values(&self, site: &Site) -> Vec<String> {
        read_counts(site).values(self.0, count_str)
    }
}

/// Coverage broken down by mate placement, soft clipping and duplicate flag.
pub struct CoverageExt(pub Layout);

impl PileupStat for CoverageExt {
    fn fields(&self) -> Vec<String> {
        let mut fields = split_fields("reads", self.0);
        fields.extend(ExtCounts::fields(self.0));
        fields
    }

    fn values(&self, site: &Site) -> Vec<String> {
        let mut reads = Split::<u64>::default();
        let mut ext = ExtCounts::default();
        for entry in &site.column.entries {
            reads.count(&entry.read);
            ext.add(&entry.read);
        }
        let mut values = reads.values(self.0, count_str);
        values.extend(ext.values(self.0));
        values
    }
}

/// Coverage alongside the reference base and GC content of the surrounding window.
pub struct CoverageGc;

impl PileupStat for CoverageGc {
    fn fields(&self) -> Vec<String> {
        let mut fields = vec!["ref".to_string(), "gc".to_string()];
        fields.extend(split_fields("reads", Layout::Combined));
        fields
    }

    fn values(&self, site: &Site) -> Vec<String> {
        let mut values = vec![(site.ref_base as char).to_string(), site.gc.to_string()];
        values.extend(read_counts(site).values(Layout::Combined, count_str));
        values
    }

    fn reference_use(&self) -> RefUse {
        RefUse::BaseAndGc
    }
}

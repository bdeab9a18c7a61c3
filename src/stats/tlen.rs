use super::counts::{count_str, rounded, split_fields, strand_fields, Layout, Moments, Split};
use super::{PileupStat, Site};

/// Insert size of the reads covering each position.
///
/// `reads_paired` counts reads whose mate maps to the same contig; the insert
/// size aggregates are taken over those reads only.
pub struct Tlen(pub Layout);

/// `reads_*` columns with the paired counts between the overall and
/// proper-pair halves.
fn interleave<T: Clone>(split: Vec<T>, paired: Vec<T>) -> Vec<T> {
    let half = split.len() / 2;
    let mut out = split[..half].to_vec();
    out.extend(paired);
    out.extend_from_slice(&split[half..]);
    out
}

impl PileupStat for Tlen {
    fn fields(&self) -> Vec<String> {
        let mut fields = interleave(
            split_fields("reads", self.0),
            strand_fields("reads_paired", self.0),
        );
        for name in ["mean_tlen", "rms_tlen", "std_tlen"].iter() {
            fields.extend(split_fields(name, self.0));
        }
        fields
    }

    fn values(&self, site: &Site) -> Vec<String> {
        let mut reads = Split::<u64>::default();
        let mut paired = Split::<u64>::default();
        let mut tlen = Split::<Moments>::default();
        for entry in &site.column.entries {
            let read = &entry.read;
            reads.count(read);
            if read.has_mate_on_same_contig() {
                paired.count(read);
                tlen.add_with(read, |m| m.add(read.tlen as f64));
            }
        }

        let mut values = interleave(
            reads.values(self.0, count_str),
            paired.strand_values(self.0, count_str),
        );
        values.extend(tlen.values(self.0, |m| rounded(m.mean())));
        values.extend(tlen.values(self.0, |m| rounded(m.rms())));
        values.extend(tlen.values(self.0, |m| rounded(m.std())));
        values
    }
}

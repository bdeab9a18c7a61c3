use super::counts::{count_str, rounded, split_fields, Layout, Moments, Split};
use super::{PileupStat, Site};

/// Mapping quality of the reads covering each position.
pub struct Mapq(pub Layout);

impl PileupStat for Mapq {
    fn fields(&self) -> Vec<String> {
        ["reads", "reads_mapq0", "rms_mapq", "max_mapq"]
            .iter()
            .flat_map(|name| split_fields(name, self.0))
            .collect()
    }

    fn values(&self, site: &Site) -> Vec<String> {
        let mut reads = Split::<u64>::default();
        let mut mapq0 = Split::<u64>::default();
        let mut mapq = Split::<Moments>::default();
        for entry in &site.column.entries {
            let read = &entry.read;
            reads.count(read);
            if read.mapq == 0 {
                mapq0.count(read);
            }
            mapq.add_with(read, |m| m.add(read.mapq as f64));
        }

        let mut values = reads.values(self.0, count_str);
        values.extend(mapq0.values(self.0, count_str));
        values.extend(mapq.values(self.0, |m| rounded(m.rms())));
        values.extend(mapq.values(self.0, |m| rounded(m.max())));
        values
    }
}

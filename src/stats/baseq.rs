use super::counts::{count_str, rounded, split_fields, Layout, Moments, Split};
use super::{PileupStat, RefUse, Site};

/// Base quality at each position. Deletions count as reads but carry no
/// quality.
pub struct Baseq(pub Layout);

impl PileupStat for Baseq {
    fn fields(&self) -> Vec<String> {
        let mut fields = split_fields("reads", self.0);
        fields.extend(split_fields("rms_baseq", self.0));
        fields
    }

    fn values(&self, site: &Site) -> Vec<String> {
        let mut reads = Split::<u64>::default();
        let mut baseq = Split::<Moments>::default();
        for entry in &site.column.entries {
            reads.count(&entry.read);
            if let Some(q) = entry.qual() {
                baseq.add_with(&entry.read, |m| m.add(q as f64));
            }
        }

        let mut values = reads.values(self.0, count_str);
        values.extend(baseq.values(self.0, |m| rounded(m.rms())));
        values
    }
}

/// Base quality split by whether the base matches the reference.
pub struct BaseqExt(pub Layout);

impl PileupStat for BaseqExt {
    fn fields(&self) -> Vec<String> {
        let mut fields = vec!["ref".to_string()];
        for name in [
            "reads",
            "matches",
            "mismatches",
            "rms_baseq",
            "rms_baseq_matches",
            "rms_baseq_mismatches",
        ]
        .iter()
        {
            fields.extend(split_fields(name, self.0));
        }
        fields
    }

    fn values(&self, site: &Site) -> Vec<String> {
        let mut reads = Split::<u64>::default();
        let mut matches = Split::<u64>::default();
        let mut mismatches = Split::<u64>::default();
        let mut baseq = Split::<Moments>::default();
        let mut baseq_matches = Split::<Moments>::default();
        let mut baseq_mismatches = Split::<Moments>::default();

        for entry in &site.column.entries {
            let read = &entry.read;
            reads.count(read);
            let (base, q) = match (entry.base(), entry.qual()) {
                (Some(b), Some(q)) => (b, q as f64),
                _ => continue,
            };
            baseq.add_with(read, |m| m.add(q));
            if base == site.ref_base {
                matches.count(read);
                baseq_matches.add_with(read, |m| m.add(q));
            } else {
                mismatches.count(read);
                baseq_mismatches.add_with(read, |m| m.add(q));
            }
        }

        let mut values = vec![(site.ref_base as char).to_string()];
        for split in [&reads, &matches, &mismatches].iter() {
            values.extend(split.values(self.0, count_str));
        }
        for split in [&baseq, &baseq_matches, &baseq_mismatches].iter() {
            values.extend(split.values(self.0, |m| rounded(m.rms())));
        }
        values
    }

    fn reference_use(&self) -> RefUse {
        RefUse::Base
    }
}

use rust_htslib::bam::pileup::Indel;

use super::counts::{count_str, split_fields, Layout, Split};
use super::{PileupStat, RefUse, Site};

const NAMES: [&str; 10] = [
    "reads",
    "matches",
    "mismatches",
    "deletions",
    "insertions",
    "A",
    "C",
    "T",
    "G",
    "N",
];

const READS: usize = 0;
const MATCHES: usize = 1;
const MISMATCHES: usize = 2;
const DELETIONS: usize = 3;
const INSERTIONS: usize = 4;

fn base_slot(base: u8) -> usize {
    match base {
        b'A' => 5,
        b'C' => 6,
        b'T' => 7,
        b'G' => 8,
        _ => 9,
    }
}

/// Matches, mismatches, indels and base counts against the reference.
pub struct Variation(pub Layout);

impl PileupStat for Variation {
    fn fields(&self) -> Vec<String> {
        let mut fields = vec!["ref".to_string()];
        for name in NAMES.iter() {
            fields.extend(split_fields(name, self.0));
        }
        fields
    }

    fn values(&self, site: &Site) -> Vec<String> {
        let mut counts = [Split::<u64>::default(); 10];
        for entry in &site.column.entries {
            let read = &entry.read;
            counts[READS].count(read);
            match entry.base() {
                None => counts[DELETIONS].count(read),
                Some(base) => {
                    if base == site.ref_base {
                        counts[MATCHES].count(read);
                    } else {
                        counts[MISMATCHES].count(read);
                    }
                    counts[base_slot(base)].count(read);
                }
            }
            if let Indel::Ins(_) = entry.indel {
                counts[INSERTIONS].count(read);
            }
        }

        let mut values = vec![(site.ref_base as char).to_string()];
        for split in counts.iter() {
            values.extend(split.values(self.0, count_str));
        }
        values
    }

    fn reference_use(&self) -> RefUse {
        RefUse::Base
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::readutil::tests::record;
    use crate::stats::tests::column_at;
    use rust_htslib::bam::record::Cigar;

    #[test]
    fn counts_against_reference() {
        // column at position 1, reference base C
        let column = column_at(
            vec![
                record(0, &[Cigar::Match(1), Cigar::Del(1), Cigar::Match(1)], b"GA", 0),
                record(1, &[Cigar::Match(2)], b"CA", 0x1 | 0x2),
                record(1, &[Cigar::Match(1), Cigar::Ins(1), Cigar::Match(1)], b"TGA", 0x10),
                record(1, &[Cigar::Match(1)], b"C", 0),
            ],
            1,
        );
        let site = Site {
            column: &column,
            ref_base: b'C',
            gc: 0,
        };
        let stat = Variation(Layout::Combined);
        let fields = stat.fields();
        let values = stat.values(&site);
        assert_eq!(fields.len(), values.len());

        let get = |name: &str| {
            let i = fields.iter().position(|f| f == name).unwrap();
            values[i].clone()
        };
        assert_eq!(get("ref"), "C");
        assert_eq!(get("reads_all"), "4");
        assert_eq!(get("reads_pp"), "1");
        assert_eq!(get("matches"), "2");
        assert_eq!(get("matches_pp"), "1");
        assert_eq!(get("mismatches"), "1");
        assert_eq!(get("deletions"), "1");
        assert_eq!(get("insertions"), "1");
        assert_eq!(get("C"), "2");
        assert_eq!(get("T"), "1");
        assert_eq!(get("A"), "0");
    }

    #[test]
    fn stranded_fields() {
        let fields = Variation(Layout::Stranded).fields();
        assert_eq!(fields.len(), 1 + 10 * 6);
        assert_eq!(fields[1..7].to_vec(), vec![
            "reads_all",
            "reads_fwd",
            "reads_rev",
            "reads_pp",
            "reads_pp_fwd",
            "reads_pp_rev"
        ]);
        assert_eq!(fields[7], "matches");
    }
}

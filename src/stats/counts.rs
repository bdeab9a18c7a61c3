//! Accumulators shared by the statistic writers.

use itertools::iproduct;

use crate::readutil::{AlignedRead, MateState};

/// Whether a statistic reports combined totals or splits them by strand.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Layout {
    Combined,
    Stranded,
}

/// Column names for a value tracked over all reads and proper pairs.
///
/// `Combined` yields `X, X_pp`; `Stranded` yields
/// `X, X_fwd, X_rev, X_pp, X_pp_fwd, X_pp_rev`. The plain `reads` value is
/// spelled `reads_all`.
pub fn split_fields(name: &str, layout: Layout) -> Vec<String> {
    let strands: &[&str] = match layout {
        Layout::Combined => &[""],
        Layout::Stranded => &["", "_fwd", "_rev"],
    };
    iproduct!(["", "_pp"].iter(), strands.iter())
        .map(|(pp, strand)| {
            if name == "reads" && pp.is_empty() && strand.is_empty() {
                "reads_all".to_string()
            } else {
                format!("{}{}{}", name, pp, strand)
            }
        })
        .collect()
}

/// Column names for a value tracked over all reads only: `X` or `X, X_fwd, X_rev`.
pub fn strand_fields(name: &str, layout: Layout) -> Vec<String> {
    match layout {
        Layout::Combined => vec![name.to_string()],
        Layout::Stranded => vec![
            name.to_string(),
            format!("{}_fwd", name),
            format!("{}_rev", name),
        ],
    }
}

/// One value per read class: all, forward, reverse, and the same for proper pairs.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Split<T> {
    pub all: T,
    pub fwd: T,
    pub rev: T,
    pub pp: T,
    pub pp_fwd: T,
    pub pp_rev: T,
}

impl<T> Split<T> {
    /// Applies `f` to every class `read` belongs to.
    pub fn add_with<F: FnMut(&mut T)>(&mut self, read: &AlignedRead, mut f: F) {
        f(&mut self.all);
        if read.is_reverse {
            f(&mut self.rev);
        } else {
            f(&mut self.fwd);
        }
        if read.is_proper_pair {
            f(&mut self.pp);
            if read.is_reverse {
                f(&mut self.pp_rev);
            } else {
                f(&mut self.pp_fwd);
            }
        }
    }

    /// Values in the order of [`split_fields`].
    pub fn values<F: Fn(&T) -> String>(&self, layout: Layout, f: F) -> Vec<String> {
        match layout {
            Layout::Combined => vec![f(&self.all), f(&self.pp)],
            Layout::Stranded => vec![
                f(&self.all),
                f(&self.fwd),
                f(&self.rev),
                f(&self.pp),
                f(&self.pp_fwd),
                f(&self.pp_rev),
            ],
        }
    }

    /// Values in the order of [`strand_fields`].
    pub fn strand_values<F: Fn(&T) -> String>(&self, layout: Layout, f: F) -> Vec<String> {
        match layout {
            Layout::Combined => vec![f(&self.all)],
            Layout::Stranded => vec![f(&self.all), f(&self.fwd), f(&self.rev)],
        }
    }
}

impl Split<u64> {
    pub fn count(&mut self, read: &AlignedRead) {
        self.add_with(read, |n| *n += 1);
    }
}

pub fn count_str(n: &u64) -> String {
    n.to_string()
}

/// Running sums for mean, root mean square, standard deviation and maximum.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Moments {
    pub n: u64,
    sum: f64,
    sum_sq: f64,
    max: f64,
}

impl Moments {
    pub fn add(&mut self, x: f64) {
        if self.n == 0 || x > self.max {
            self.max = x;
        }
        self.n += 1;
        self.sum += x;
        self.sum_sq += x * x;
    }

    pub fn mean(&self) -> f64 {
        if self.n == 0 {
            0.0
        } else {
            self.sum / self.n as f64
        }
    }

    pub fn rms(&self) -> f64 {
        if self.n == 0 {
            0.0
        } else {
            (self.sum_sq / self.n as f64).sqrt()
        }
    }

    /// Population standard deviation.
    pub fn std(&self) -> f64 {
        if self.n == 0 {
            return 0.0;
        }
        let mean = self.mean();
        (self.sum_sq / self.n as f64 - mean * mean).max(0.0).sqrt()
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}

pub fn rounded(x: f64) -> String {
    (x.round() as i64).to_string()
}

/// Mate and clipping classes reported by the `coverage_ext` family.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ExtCounts {
    pub mate_unmapped: Split<u64>,
    pub mate_other_chr: Split<u64>,
    pub mate_same_strand: Split<u64>,
    pub faceaway: Split<u64>,
    pub softclipped: Split<u64>,
    pub duplicate: Split<u64>,
}

impl ExtCounts {
    const NAMES: [&'static str; 6] = [
        "reads_mate_unmapped",
        "reads_mate_other_chr",
        "reads_mate_same_strand",
        "reads_faceaway",
        "reads_softclipped",
        "reads_duplicate",
    ];

    pub fn add(&mut self, read: &AlignedRead) {
        match read.mate {
            MateState::Unmapped => self.mate_unmapped.count(read),
            MateState::OtherChr => self.mate_other_chr.count(read),
            MateState::SameStrand => self.mate_same_strand.count(read),
            MateState::FaceAway => self.faceaway.count(read),
            MateState::Unpaired | MateState::Inward => {}
        }
        if read.softclipped {
            self.softclipped.count(read);
        }
        if read.is_duplicate {
            self.duplicate.count(read);
        }
    }

    pub fn fields(layout: Layout) -> Vec<String> {
        ExtCounts::NAMES
            .iter()
            .flat_map(|name| strand_fields(name, layout))
            .collect()
    }

    pub fn values(&self, layout: Layout) -> Vec<String> {
        [
            &self.mate_unmapped,
            &self.mate_other_chr,
            &self.mate_same_strand,
            &self.faceaway,
            &self.softclipped,
            &self.duplicate,
        ]
        .iter()
        .flat_map(|split| split.strand_values(layout, count_str))
        .collect()
    }
}

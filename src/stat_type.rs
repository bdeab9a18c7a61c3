use std::fmt;

use clap::ValueEnum;

/// Statistic types understood by the `--type` option.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, ValueEnum)]
#[value(rename_all = "snake_case")]
pub enum StatType {
    Coverage,
    CoverageStrand,
    CoverageExt,
    CoverageExtStrand,
    Variation,
    VariationStrand,
    Tlen,
    TlenStrand,
    Mapq,
    MapqStrand,
    Baseq,
    BaseqStrand,
    BaseqExt,
    BaseqExtStrand,
    CoverageGc,
    CoverageBinned,
    CoverageExtBinned,
    MapqBinned,
    AlignmentBinned,
    TlenBinned,
}

impl StatType {
    pub const ALL: [StatType; 20] = [
        StatType::Coverage,
        StatType::CoverageStrand,
        StatType::CoverageExt,
        StatType::CoverageExtStrand,
        StatType::Variation,
        StatType::VariationStrand,
        StatType::Tlen,
        StatType::TlenStrand,
        StatType::Mapq,
        StatType::MapqStrand,
        StatType::Baseq,
        StatType::BaseqStrand,
        StatType::BaseqExt,
        StatType::BaseqExtStrand,
        StatType::CoverageGc,
        StatType::CoverageBinned,
        StatType::CoverageExtBinned,
        StatType::MapqBinned,
        StatType::AlignmentBinned,
        StatType::TlenBinned,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            StatType::Coverage => "coverage",
            StatType::CoverageStrand => "coverage_strand",
            StatType::CoverageExt => "coverage_ext",
            StatType::CoverageExtStrand => "coverage_ext_strand",
            StatType::Variation => "variation",
            StatType::VariationStrand => "variation_strand",
            StatType::Tlen => "tlen",
            StatType::TlenStrand => "tlen_strand",
            StatType::Mapq => "mapq",
            StatType::MapqStrand => "mapq_strand",
            StatType::Baseq => "baseq",
            StatType::BaseqStrand => "baseq_strand",
            StatType::BaseqExt => "baseq_ext",
            StatType::BaseqExtStrand => "baseq_ext_strand",
            StatType::CoverageGc => "coverage_gc",
            StatType::CoverageBinned => "coverage_binned",
            StatType::CoverageExtBinned => "coverage_ext_binned",
            StatType::MapqBinned => "mapq_binned",
            StatType::AlignmentBinned => "alignment_binned",
            StatType::TlenBinned => "tlen_binned",
        }
    }

    /// Types whose rows depend on the reference sequence and therefore need `--fasta`.
    pub fn requires_reference(&self) -> bool {
        matches!(
            self,
            StatType::Variation
                | StatType::VariationStrand
                | StatType::BaseqExt
                | StatType::BaseqExtStrand
                | StatType::CoverageGc
                | StatType::CoverageBinned
                | StatType::CoverageExtBinned
        )
    }

    pub fn is_binned(&self) -> bool {
        matches!(
            self,
            StatType::CoverageBinned
                | StatType::CoverageExtBinned
                | StatType::MapqBinned
                | StatType::AlignmentBinned
                | StatType::TlenBinned
        )
    }
}

impl Default for StatType {
    fn default() -> Self {
        StatType::Coverage
    }
}

impl fmt::Display for StatType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

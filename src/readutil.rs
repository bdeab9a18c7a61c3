use rust_htslib::bam::record::Record;
use rust_htslib::htslib;

/// Where the mate of a read sits relative to the read itself.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MateState {
    Unpaired,
    Unmapped,
    OtherChr,
    SameStrand,
    FaceAway,
    Inward,
}

/// The subset of a BAM record that statistics look at. Only flags and scalar
/// fields are copied; sequence and qualities stay in the record.
#[derive(Copy, Clone, Debug)]
pub struct AlignedRead {
    pub tid: u32,
    pub start: i64,
    pub mapq: u8,
    pub tlen: i64,
    pub is_reverse: bool,
    pub is_proper_pair: bool,
    pub is_duplicate: bool,
    pub mate: MateState,
    pub softclipped: bool,
}

impl AlignedRead {
    pub fn new(r: &Record) -> Self {
        let softclipped = r
            .raw_cigar()
            .iter()
            .any(|c| c & htslib::BAM_CIGAR_MASK == htslib::BAM_CSOFT_CLIP);

        Self {
            tid: r.tid() as u32,
            start: r.pos(),
            mapq: r.mapq(),
            tlen: r.insert_size(),
            is_reverse: r.is_reverse(),
            is_proper_pair: r.is_proper_pair(),
            is_duplicate: r.is_duplicate(),
            mate: mate_state(r),
            softclipped,
        }
    }

    /// A read is "paired" for insert size purposes when its mate maps to the same contig.
    pub fn has_mate_on_same_contig(&self) -> bool {
        matches!(
            self.mate,
            MateState::SameStrand | MateState::FaceAway | MateState::Inward
        )
    }
}

fn mate_state(r: &Record) -> MateState {
    if !r.is_paired() {
        MateState::Unpaired
    } else if r.is_mate_unmapped() {
        MateState::Unmapped
    } else if r.mtid() != r.tid() {
        MateState::OtherChr
    } else if r.is_reverse() == r.is_mate_reverse() {
        MateState::SameStrand
    } else if (r.is_reverse() && r.insert_size() > 0) || (!r.is_reverse() && r.insert_size() < 0) {
        MateState::FaceAway
    } else {
        MateState::Inward
    }
}

/// Read-level filters shared by pileup and binned statistics.
#[derive(Copy, Clone, Debug, Default)]
pub struct ReadFilter {
    pub min_mapq: u8,
    pub no_dup: bool,
}

impl ReadFilter {
    pub fn accepts(&self, r: &Record) -> bool {
        if r.tid() < 0 || r.is_unmapped() || r.is_secondary() || r.is_quality_check_failed() {
            return false;
        }
        if self.no_dup && r.is_duplicate() {
            return false;
        }
        r.mapq() >= self.min_mapq
    }
}

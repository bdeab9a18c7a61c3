#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use rust_htslib::bam;
use rust_htslib::bam::Read;
use tempfile::TempDir;

/// chr1 (1-based): A C G T A C G T A C G G C C G G C C A A
pub const FASTA: &str = ">chr1\nACGTACGTACGGCCGGCCAA\n>chr2\nAAAAAAAAAA\n";

/// Four reads: a proper pair on chr1 (3-6, 9-12), an unpaired MAPQ 0 read on
/// chr1 (5-8, mismatch at 8) and a reverse read on chr2 (2-4).
pub const SAM: &str = "@HD\tVN:1.6\tSO:coordinate
@SQ\tSN:chr1\tLN:20
@SQ\tSN:chr2\tLN:10
r1\t99\tchr1\t3\t60\t4M\t=\t9\t10\tGTAC\tIIII
r2\t0\tchr1\t5\t0\t4M\t*\t0\t0\tACGA\tIIII
r1\t147\tchr1\t9\t60\t4M\t=\t3\t-10\tACGG\tIIII
r4\t16\tchr2\t2\t30\t3M\t*\t0\t0\tAAA\tIII
";

pub const EMPTY_SAM: &str = "@HD\tVN:1.6\tSO:coordinate
@SQ\tSN:chr1\tLN:20
";

pub struct Fixture {
    pub dir: TempDir,
    pub bam: PathBuf,
    pub fasta: PathBuf,
}

/// Converts SAM text to a coordinate-sorted BAM with a .bai index.
pub fn write_bam(dir: &Path, name: &str, sam: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let sam_path = dir.join(format!("{}.sam", name));
    fs::write(&sam_path, sam)?;

    let bam_path = dir.join(format!("{}.bam", name));
    {
        let mut reader = bam::Reader::from_path(&sam_path)?;
        let header = bam::Header::from_template(reader.header());
        let mut writer = bam::Writer::from_path(&bam_path, &header, bam::Format::Bam)?;
        for record in reader.records() {
            writer.write(&record?)?;
        }
    }
    bam::index::build(&bam_path, None, bam::index::Type::Bai, 1)?;
    Ok(bam_path)
}

pub fn fixture() -> Result<Fixture, Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let bam = write_bam(dir.path(), "reads", SAM)?;
    let fasta = dir.path().join("ref.fa");
    fs::write(&fasta, FASTA)?;
    Ok(Fixture { dir, bam, fasta })
}

/// Data rows of TSV output, split into fields.
pub fn rows(stdout: &[u8]) -> Vec<Vec<String>> {
    String::from_utf8_lossy(stdout)
        .lines()
        .map(|line| line.split('\t').map(|f| f.to_string()).collect())
        .collect()
}

use std::path::{Path, PathBuf};

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rust_htslib::bam;
use rust_htslib::bam::record::{Cigar, CigarString, Record};
use tempfile::TempDir;

use alnstats::bamutil;
use alnstats::pileup::{Pileup, PileupColumn, PileupOptions};
use alnstats::readutil::AlignedRead;
use alnstats::stats::binned::AlignmentBinned;
use alnstats::stats::counts::Layout;
use alnstats::stats::coverage::Coverage;
use alnstats::stats::variation::Variation;
use alnstats::stats::{BinnedStat, PileupStat, Site};

const READ_LEN: usize = 100;

/// Sorted reads tiling a contig at the given depth.
fn synthetic_reads(n: usize, depth: usize) -> Vec<Record> {
    let seq: Vec<u8> = b"ACGT".iter().cycle().take(READ_LEN).copied().collect();
    let qual = vec![30u8; READ_LEN];
    let step = (READ_LEN / depth).max(1) as i64;

    (0..n)
        .map(|i| {
            let mut r = Record::new();
            let cigar = if i % 7 == 0 {
                CigarString(vec![Cigar::Match(50), Cigar::Del(2), Cigar::Match(50)])
            } else {
                CigarString(vec![Cigar::Match(READ_LEN as u32)])
            };
            r.set(b"read", Some(&cigar), &seq, &qual);
            r.set_tid(0);
            r.set_pos(i as i64 * step);
            r.set_mapq(60);
            r.set_flags(if i % 2 == 0 { 0x1 | 0x2 } else { 0x10 });
            r
        })
        .collect()
}

fn write_bam(dir: &TempDir, name: &str, reads: &[Record]) -> PathBuf {
    let path = dir.path().join(name);
    let header = bam::Header::from_template(&bam::HeaderView::from_bytes(
        b"@SQ\tSN:chr1\tLN:1000000\n",
    ));
    let mut writer = bam::Writer::from_path(&path, &header, bam::Format::Bam).unwrap();
    for r in reads {
        writer.write(r).unwrap();
    }
    path
}

fn for_each_column(path: &Path, mut f: impl FnMut(&PileupColumn)) {
    let mut source = bamutil::open(path, None).unwrap();
    for column in Pileup::new(source.pileup(8000), PileupOptions::default()) {
        f(&column.unwrap());
    }
}

fn benchmark_pileup(c: &mut Criterion) {
    let mut group = c.benchmark_group("Pileup");
    group.sample_size(10);

    let dir = tempfile::tempdir().unwrap();
    for depth in [10, 50].iter() {
        let bam = write_bam(&dir, &format!("depth{}.bam", depth), &synthetic_reads(5_000, *depth));
        group.bench_function(BenchmarkId::new("coverage", depth), |b| {
            b.iter(|| {
                let stat = Coverage(Layout::Stranded);
                let mut rows = 0;
                for_each_column(&bam, |column| {
                    let site = Site {
                        column,
                        ref_base: b'A',
                        gc: 0,
                    };
                    rows += stat.values(&site).len();
                });
                black_box(rows)
            });
        });
        group.bench_function(BenchmarkId::new("variation", depth), |b| {
            b.iter(|| {
                let stat = Variation(Layout::Combined);
                let mut rows = 0;
                for_each_column(&bam, |column| {
                    let site = Site {
                        column,
                        ref_base: b'C',
                        gc: 0,
                    };
                    rows += stat.values(&site).len();
                });
                black_box(rows)
            });
        });
    }

    group.finish();
}

fn benchmark_binned(c: &mut Criterion) {
    let mut group = c.benchmark_group("Binned");
    group.sample_size(10);

    let records = synthetic_reads(20_000, 20);
    let reads: Vec<AlignedRead> = records.iter().map(AlignedRead::new).collect();
    group.bench_function("alignment_binned", |b| {
        b.iter(|| {
            let stat = AlignmentBinned;
            let mut bin = <AlignmentBinned as BinnedStat>::Bin::default();
            for (read, record) in reads.iter().zip(&records) {
                stat.add(&mut bin, read, record);
            }
            black_box(stat.values(&bin, None))
        });
    });

    group.finish();
}

criterion_group!(benches, benchmark_pileup, benchmark_binned);
criterion_main!(benches);

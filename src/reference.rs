use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use log::debug;
use rust_htslib::faidx;

/// Reference sequences read through a FASTA index, one contig cached at a time.
pub struct Reference {
    reader: faidx::Reader,
    path: PathBuf,
    cached: Option<(String, Vec<u8>)>,
}

impl Reference {
    /// Opens a FASTA file. htslib builds the `.fai` index next to it when missing.
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let reader = faidx::Reader::from_path(path)
            .with_context(|| format!("Error opening reference file {}", path.display()))?;
        Ok(Self {
            reader,
            path: path.to_path_buf(),
            cached: None,
        })
    }

    /// Upper-cased sequence of a whole contig. Fails when the FASTA lacks it.
    pub fn contig(&mut self, chrom: &str) -> anyhow::Result<&[u8]> {
        let hit = matches!(&self.cached, Some((name, _)) if name == chrom);
        if !hit {
            // htslib reports -1 for unknown names
            let len = self.reader.fetch_seq_len(chrom) as i64;
            if len < 0 {
                bail!(
                    "Chromosome {} not present in reference {}",
                    chrom,
                    self.path.display()
                );
            }
            let seq = if len == 0 {
                Vec::new()
            } else {
                debug!("Loading reference sequence {} ({} bp)", chrom, len);
                self.reader
                    .fetch_seq(chrom, 0, len as usize - 1)
                    .with_context(|| format!("Error fetching reference sequence {}", chrom))?
                    .iter()
                    .map(|b| b.to_ascii_uppercase())
                    .collect()
            };
            self.cached = Some((chrom.to_string(), seq));
        }
        Ok(self.cached.as_ref().map_or(&[][..], |(_, seq)| seq.as_slice()))
    }

    /// Reference base at a zero-based position, `N` outside the contig.
    pub fn base(&mut self, chrom: &str, pos: i64) -> anyhow::Result<u8> {
        let seq = self.contig(chrom)?;
        Ok(base_at(seq, pos))
    }

    /// Rounded percentage of G and C in `[start, end)`, clipped to the contig.
    pub fn gc_percent(&mut self, chrom: &str, start: i64, end: i64) -> anyhow::Result<u32> {
        let seq = self.contig(chrom)?;
        Ok(gc_percent(seq, start, end))
    }
}

pub fn base_at(seq: &[u8], pos: i64) -> u8 {
    if pos < 0 {
        return b'N';
    }
    seq.get(pos as usize).copied().unwrap_or(b'N')
}

pub fn gc_percent(seq: &[u8], start: i64, end: i64) -> u32 {
    let start = start.max(0) as usize;
    let end = (end.max(0) as usize).min(seq.len());
    if start >= end {
        return 0;
    }
    let window = &seq[start..end];
    let gc = window.iter().filter(|b| matches!(b, b'G' | b'C')).count();
    (gc as f64 * 100.0 / window.len() as f64).round() as u32
}

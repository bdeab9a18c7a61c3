use assert_cmd::Command;
use predicates::prelude::*;

mod common;

#[cfg(test)]
mod cli_error_tests {
    use super::*;

    #[test]
    fn test_help_output() -> Result<(), Box<dyn std::error::Error>> {
        let mut cmd = Command::cargo_bin("alnstats")?;
        cmd.arg("--help");

        cmd.assert()
            .success()
            .stdout(predicate::str::contains("Usage:"))
            .stdout(predicate::str::contains("--type"))
            .stdout(predicate::str::contains("--fasta"))
            .stdout(predicate::str::contains("--window-size"));

        Ok(())
    }

    #[test]
    fn test_version_output() -> Result<(), Box<dyn std::error::Error>> {
        let mut cmd = Command::cargo_bin("alnstats")?;
        cmd.arg("--version");

        cmd.assert()
            .success()
            .stdout(predicate::str::contains("alnstats"));

        Ok(())
    }

    #[test]
    fn test_missing_file_operand() -> Result<(), Box<dyn std::error::Error>> {
        let mut cmd = Command::cargo_bin("alnstats")?;

        cmd.assert()
            .code(2)
            .stderr(predicate::str::contains("missing file operand"))
            .stderr(predicate::str::contains("Usage:"));

        Ok(())
    }

    #[test]
    fn test_invalid_type_lists_valid_values() -> Result<(), Box<dyn std::error::Error>> {
        let mut cmd = Command::cargo_bin("alnstats")?;
        cmd.arg("--type").arg("foo").arg("reads.bam");

        cmd.assert()
            .code(2)
            .stderr(predicate::str::contains("foo"))
            .stderr(predicate::str::contains("coverage_ext_strand"))
            .stderr(predicate::str::contains("alignment_binned"));

        Ok(())
    }

    #[test]
    fn test_fasta_required_before_opening_input() -> Result<(), Box<dyn std::error::Error>> {
        // The alignment file does not exist; the missing reference is reported first.
        for stat_type in &["variation", "baseq_ext_strand", "coverage_gc", "coverage_binned"] {
            let mut cmd = Command::cargo_bin("alnstats")?;
            cmd.arg("--type").arg(stat_type).arg("does_not_exist.bam");

            cmd.assert()
                .code(2)
                .stderr(predicate::str::contains("--fasta"))
                .stderr(predicate::str::contains("does_not_exist").not());
        }

        Ok(())
    }

    #[test]
    fn test_start_without_chromosome() -> Result<(), Box<dyn std::error::Error>> {
        let mut cmd = Command::cargo_bin("alnstats")?;
        cmd.arg("--start").arg("10").arg("reads.bam");

        cmd.assert()
            .code(2)
            .stderr(predicate::str::contains("--chromosome"));

        Ok(())
    }

    #[test]
    fn test_inverted_region() -> Result<(), Box<dyn std::error::Error>> {
        let mut cmd = Command::cargo_bin("alnstats")?;
        cmd.args(&["-c", "chr1", "-s", "10", "-e", "5", "reads.bam"]);

        cmd.assert()
            .code(2)
            .stderr(predicate::str::contains("must not be greater than"));

        Ok(())
    }

    #[test]
    fn test_zero_window_size() -> Result<(), Box<dyn std::error::Error>> {
        let mut cmd = Command::cargo_bin("alnstats")?;
        cmd.args(&["--type", "mapq_binned", "--window-size", "0", "reads.bam"]);

        cmd.assert()
            .code(2)
            .stderr(predicate::str::contains("--window-size"));

        Ok(())
    }

    #[test]
    fn test_nonexistent_alignment_file() -> Result<(), Box<dyn std::error::Error>> {
        let mut cmd = Command::cargo_bin("alnstats")?;
        cmd.arg("nonexistent.bam");

        cmd.assert()
            .code(1)
            .stderr(predicate::str::contains("Error:"))
            .stderr(predicate::str::contains("nonexistent.bam"));

        Ok(())
    }

    #[test]
    fn test_invalid_alignment_file() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("garbage.bam");
        std::fs::write(&path, "this is not an alignment file\n\x00\x01")?;

        let mut cmd = Command::cargo_bin("alnstats")?;
        cmd.arg(&path);

        cmd.assert().code(1).stderr(predicate::str::contains("Error:"));

        Ok(())
    }

    #[test]
    fn test_region_requires_index() -> Result<(), Box<dyn std::error::Error>> {
        let fixture = common::fixture()?;
        let unindexed = fixture.dir.path().join("unindexed.bam");
        std::fs::copy(&fixture.bam, &unindexed)?;

        let mut cmd = Command::cargo_bin("alnstats")?;
        cmd.args(&["-c", "chr1"]).arg(&unindexed);

        cmd.assert()
            .code(1)
            .stderr(predicate::str::contains("requires an index"));

        Ok(())
    }

    #[test]
    fn test_unknown_chromosome() -> Result<(), Box<dyn std::error::Error>> {
        let fixture = common::fixture()?;

        let mut cmd = Command::cargo_bin("alnstats")?;
        cmd.args(&["-c", "chrX"]).arg(&fixture.bam);

        cmd.assert()
            .code(1)
            .stderr(predicate::str::contains("chrX"));

        Ok(())
    }

    #[test]
    fn test_reference_lacking_alignment_contig() -> Result<(), Box<dyn std::error::Error>> {
        let fixture = common::fixture()?;
        let fasta = fixture.dir.path().join("numbered.fa");
        std::fs::write(&fasta, ">1\nACGTACGTACGGCCGGCCAA\n>2\nAAAAAAAAAA\n")?;

        let mut cmd = Command::cargo_bin("alnstats")?;
        cmd.args(&["-t", "variation", "--fasta"]).arg(&fasta).arg(&fixture.bam);

        cmd.assert()
            .code(1)
            .stderr(predicate::str::contains("chr1"))
            .stderr(predicate::str::contains("not present in reference"));

        Ok(())
    }

    #[test]
    fn test_output_directory_missing()-> Result<(), Box<dyn std::error::Error>> {
        let fixture = common::fixture()?;
        let output = fixture.dir.path().join("no_such_dir").join("out.tsv");

        let mut cmd = Command::cargo_bin("alnstats")?;
        cmd.arg("--output").arg(&output).arg(&fixture.bam);

        cmd.assert()
            .code(1)
            .stderr(predicate::str::contains("Failed to create output file"));

        Ok(())
    }
}

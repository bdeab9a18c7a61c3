use std::time::Instant;

use log::info;

/// Reports progress every `interval` rows, both as a spinner and in the log.
pub struct ProgressBar {
    bar: indicatif::ProgressBar,
    interval: Option<u64>,
    started: Instant,
}

impl ProgressBar {
    pub fn new(interval: Option<u64>) -> Self {
        let bar = match interval {
            Some(_) => indicatif::ProgressBar::new_spinner(),
            None => indicatif::ProgressBar::hidden(),
        };
        bar.set_style(
            indicatif::ProgressStyle::default_spinner()
                .template("{spinner} {elapsed_precise} {msg}")
                .expect("Invalid progress bar template"),
        );

        Self {
            bar,
            interval,
            started: Instant::now(),
        }
    }

    /// Called once per written row; `rows` counts rows written so far.
    pub fn update(&self, rows: u64, chrom: &str, pos: i64) {
        let interval = match self.interval {
            Some(n) => n,
            None => return,
        };
        if rows == 0 || rows % interval != 0 {
            return;
        }

        let elapsed = self.started.elapsed().as_secs_f64();
        let rate = if elapsed > 0.0 {
            (rows as f64 / elapsed) as u64
        } else {
            rows
        };
        let message = format!(
            "{} rows in {:.2}s ({} rows/s); last position: {}:{}",
            rows, elapsed, rate, chrom, pos
        );
        info!("{}", message);
        self.bar.set_message(message);
        self.bar.inc(interval);
    }

    pub fn finish(&self, rows: u64) {
        if self.interval.is_some() {
            let message = format!(
                "{} rows in {:.2}s",
                rows,
                self.started.elapsed().as_secs_f64()
            );
            info!("{}", message);
            self.bar.finish_with_message(message);
        }
    }
}

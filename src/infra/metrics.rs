// ============================================================
// Layer 6 — Metrics Logger
// ============================================================
// Appends one CSV row per epoch:
//
//   epoch,train_loss,batches
//   1,7.912345,32
//   2,6.104521,32
//
// Output file: <output_dir>/metrics.csv
// The header is written only when the file is new, so
// repeated runs into the same directory append.

use anyhow::Result;
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::PathBuf,
};
use serde::{Deserialize, Serialize};

/// One row of metrics data for a single training epoch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochMetrics {
    /// The epoch number (starts at 1)
    pub epoch: usize,

    /// Mean of the per-batch PAD-masked cross-entropy
    pub train_loss: f64,

    /// Non-empty batches that contributed to `train_loss`
    pub batches: usize,
}

impl EpochMetrics {
    pub fn new(epoch: usize, train_loss: f64, batches: usize) -> Self {
        Self { epoch, train_loss, batches }
    }

    /// True when this epoch's loss is below `previous`.
    pub fn improved_on(&self, previous: f64) -> bool {
        self.train_loss < previous
    }
}

/// Logs epoch metrics to a CSV file.
pub struct MetricsLogger {
    csv_path: PathBuf,
}

impl MetricsLogger {
    pub fn new(dir: impl Into<String>) -> Result<Self> {
        let dir = PathBuf::from(dir.into());
        fs::create_dir_all(&dir)?;

        let csv_path = dir.join("metrics.csv");
        if !csv_path.exists() {
            let mut f = fs::File::create(&csv_path)?;
            writeln!(f, "epoch,train_loss,batches")?;
            tracing::debug!("Created metrics CSV: '{}'", csv_path.display());
        }

        Ok(Self { csv_path })
    }

    pub fn log(&self, m: &EpochMetrics) -> Result<()> {
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)?;

        writeln!(f, "{},{:.6},{}", m.epoch, m.train_loss, m.batches)?;

        tracing::debug!("Logged epoch {} metrics: train_loss={:.4}", m.epoch, m.train_loss);
        Ok(())
    }

    pub fn csv_path(&self) -> &PathBuf {
        &self.csv_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_improved_on() {
        let m = EpochMetrics::new(2, 2.3, 4);
        assert!(m.improved_on(3.0));
        assert!(!m.improved_on(2.0));
    }

    #[test]
    fn test_appends_rows_after_header() {
        let dir = std::env::temp_dir().join(format!("nmt_metrics_{}", std::process::id()));
        fs::remove_dir_all(&dir).ok();

        let logger = MetricsLogger::new(dir.to_string_lossy().to_string()).unwrap();
        logger.log(&EpochMetrics::new(1, 4.5, 3)).unwrap();
        logger.log(&EpochMetrics::new(2, 3.25, 3)).unwrap();

        let text = fs::read_to_string(logger.csv_path()).unwrap();
        assert_eq!(text, "epoch,train_loss,batches\n1,4.500000,3\n2,3.250000,3\n");
        fs::remove_dir_all(&dir).ok();
    }
}

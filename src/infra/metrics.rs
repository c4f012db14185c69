// ============================================================
// Layer 6 - Metrics CSV
// ============================================================
// Writes the training Metrics Log to {output_dir}/metrics.csv
//
//   iteration,loss,error
//   0,2.302585,0.906250
//   500,0.231400,0.062500
//   ...
//
// A new file replaces any previous run's log.

use anyhow::{Context, Result};
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

use crate::domain::metrics::{MetricRecord, MetricsLog};

const HEADER: &str = "iteration,loss,error";

pub struct MetricsLogger {
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Create `dir` if needed and start a fresh CSV with just the header.
    pub fn create(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)
            .with_context(|| format!("Cannot create '{}'", dir.display()))?;

        let csv_path = dir.join("metrics.csv");
        let mut f = fs::File::create(&csv_path)
            .with_context(|| format!("Cannot create '{}'", csv_path.display()))?;
        writeln!(f, "{HEADER}")?;
        tracing::debug!("Created metrics CSV: '{}'", csv_path.display());

        Ok(Self { csv_path })
    }

    /// Append one row.
    pub fn log(&self, r: &MetricRecord) -> Result<()> {
        let mut f = OpenOptions::new().append(true).open(&self.csv_path)?;
        writeln!(f, "{},{:.6},{:.6}", r.iteration, r.loss, r.error)?;
        Ok(())
    }

    pub fn log_all(&self, log: &MetricsLog) -> Result<()> {
        for r in log.records() {
            self.log(r)?;
        }
        tracing::info!("Wrote {} metric rows to '{}'", log.len(), self.csv_path.display());
        Ok(())
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }
}

/// Parse a CSV written by MetricsLogger.
pub fn read_metrics(path: impl AsRef<Path>) -> Result<Vec<MetricRecord>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .with_context(|| format!("Cannot read '{}'", path.display()))?;

    let mut lines = text.lines();
    match lines.next() {
        Some(h) if h.trim() == HEADER => {}
        other => anyhow::bail!("'{}' has header {:?}, expected '{HEADER}'", path.display(), other),
    }

    lines
        .filter(|l| !l.trim().is_empty())
        .enumerate()
        .map(|(n, line)| -> Result<MetricRecord> {
            let fields: Vec<&str> = line.split(',').collect();
            let [iteration, loss, error] = fields.as_slice() else {
                anyhow::bail!("row {} of '{}' has {} fields", n + 1, path.display(), fields.len());
            };
            Ok(MetricRecord {
                iteration: iteration.trim().parse()?,
                loss:      loss.trim().parse()?,
                error:     error.trim().parse()?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::metrics::BatchScores;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("mnist_convnet_metrics_{name}_{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_header_and_rows_round_trip() {
        let dir = scratch_dir("round_trip");
        let mut log = MetricsLog::new();
        log.record(0, BatchScores::new(2.302585, 0.90625));
        log.record(500, BatchScores::new(0.2314, 0.0625));

        let logger = MetricsLogger::create(&dir).unwrap();
        logger.log_all(&log).unwrap();

        let text = fs::read_to_string(logger.csv_path()).unwrap();
        assert!(text.starts_with("iteration,loss,error\n"));

        let rows = read_metrics(logger.csv_path()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].iteration, 500);
        assert!((rows[0].loss - 2.302585).abs() < 1e-6);
        assert!((rows[1].error - 0.0625).abs() < 1e-6);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_create_truncates_previous_run() {
        let dir = scratch_dir("truncate");
        let first = MetricsLogger::create(&dir).unwrap();
        first.log(&MetricRecord { iteration: 0, loss: 1.0, error: 0.5 }).unwrap();

        let second = MetricsLogger::create(&dir).unwrap();
        assert!(read_metrics(second.csv_path()).unwrap().is_empty());

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_bad_header_is_rejected() {
        let dir = scratch_dir("bad_header");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("metrics.csv");
        fs::write(&path, "epoch,loss\n1,2\n").unwrap();
        assert!(read_metrics(&path).is_err());
        fs::remove_dir_all(&dir).ok();
    }
}

// ============================================================
// Layer 6 - Training Report
// ============================================================
// After evaluation: one chart per recorded metric, then the
// test summary line.
//
//   loss  vs minibatch number
//   error vs minibatch number
//   "Average test error: 1.23%"

use anyhow::Result;

use crate::domain::metrics::MetricsLog;
use crate::domain::traits::Plotter;

pub const X_LABEL: &str = "Minibatch number";
pub const LOSS_TITLE: &str = "iteration run vs. Training loss";
pub const ERROR_TITLE: &str = "iteration run vs. Label Prediction Error";

pub fn summary_line(average_error_pct: f64) -> String {
    format!("Average test error: {average_error_pct:.2}%")
}

/// Plot both curves and print the summary.
pub fn report(log: &MetricsLog, average_error_pct: f64, plotter: &dyn Plotter) -> Result<()> {
    plotter.render_line(&log.loss_series(), X_LABEL, "Loss", LOSS_TITLE)?;
    plotter.render_line(&log.error_series(), X_LABEL, "Label Prediction Error", ERROR_TITLE)?;
    println!("{}", summary_line(average_error_pct));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::metrics::BatchScores;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingPlotter {
        calls: RefCell<Vec<(usize, String, String)>>,
    }

    impl Plotter for RecordingPlotter {
        fn render_line(&self, points: &[(f32, f32)], _x: &str, y: &str, title: &str) -> Result<()> {
            self.calls.borrow_mut().push((points.len(), y.to_string(), title.to_string()));
            Ok(())
        }
    }

    #[test]
    fn test_summary_format() {
        assert_eq!(summary_line(1.234), "Average test error: 1.23%");
        assert_eq!(summary_line(0.0), "Average test error: 0.00%");
    }

    #[test]
    fn test_two_charts_in_order() {
        let mut log = MetricsLog::new();
        log.record(0, BatchScores::new(2.3, 0.9));
        log.record(500, BatchScores::new(0.3, 0.1));

        let plotter = RecordingPlotter::default();
        report(&log, 1.5, &plotter).unwrap();

        let calls = plotter.calls.borrow();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0], (2, "Loss".to_string(), LOSS_TITLE.to_string()));
        assert_eq!(calls[1], (2, "Label Prediction Error".to_string(), ERROR_TITLE.to_string()));
    }

    #[test]
    fn test_empty_log_still_reports() {
        let plotter = RecordingPlotter::default();
        report(&MetricsLog::new(), 0.0, &plotter).unwrap();
        assert!(plotter.calls.borrow().iter().all(|(n, _, _)| *n == 0));
    }
}

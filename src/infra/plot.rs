// ============================================================
// Layer 6 - Plotters
// ============================================================
// Two Plotter implementations:
//
//   TextPlotter → braille line chart on stdout via textplots
//   NoopPlotter → draws nothing, for --no-plot and batch runs
//
// textplots has no axis titles, so the title and the axis
// names are printed as a header above the chart.

use anyhow::Result;
use std::cmp::Ordering;
use textplots::{Chart, Plot, Shape};

use crate::domain::traits::Plotter;

/// textplots refuses canvases narrower than this
const MIN_WIDTH: u32 = 32;
const MIN_HEIGHT: u32 = 3;

pub struct TextPlotter {
    width:  u32,
    height: u32,
}

impl TextPlotter {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width:  width.max(MIN_WIDTH),
            height: height.max(MIN_HEIGHT),
        }
    }
}

impl Default for TextPlotter {
    fn default() -> Self {
        Self::new(160, 48)
    }
}

impl Plotter for TextPlotter {
    fn render_line(
        &self,
        points:  &[(f32, f32)],
        x_label: &str,
        y_label: &str,
        title:   &str,
    ) -> Result<()> {
        match line_chart(points, x_label, y_label, title, self.width, self.height) {
            Some(text) => println!("{text}"),
            None => tracing::warn!("Not enough points to plot '{}' ({})", title, points.len()),
        }
        Ok(())
    }
}

/// Renders the chart as text, or `None` when fewer than two
/// distinct x values are available.
pub fn line_chart(
    points:  &[(f32, f32)],
    x_label: &str,
    y_label: &str,
    title:   &str,
    width:   u32,
    height:  u32,
) -> Option<String> {
    if points.len() < 2 {
        return None;
    }
    let xmin = points.iter().map(|p| p.0).fold(f32::INFINITY, f32::min);
    let xmax = points.iter().map(|p| p.0).fold(f32::NEG_INFINITY, f32::max);
    // NaN-only x values leave the fold at (INF, -INF)
    if xmax.partial_cmp(&xmin) != Some(Ordering::Greater) {
        return None;
    }

    let shape = Shape::Lines(points);
    let mut chart = Chart::new(width.max(MIN_WIDTH), height.max(MIN_HEIGHT), xmin, xmax);
    let chart = chart.lineplot(&shape);
    chart.axis();
    chart.figures();

    Some(format!("{title}\n  y: {y_label}   x: {x_label}\n{chart}"))
}

/// Discards every chart.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopPlotter;

impl Plotter for NoopPlotter {
    fn render_line(&self, points: &[(f32, f32)], _: &str, _: &str, title: &str) -> Result<()> {
        tracing::debug!("Skipping chart '{}' with {} points", title, points.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chart_has_title_and_labels() {
        let pts = vec![(0.0, 2.3), (500.0, 0.4), (1000.0, 0.2)];
        let text = line_chart(&pts, "Minibatch number", "Loss", "loss curve", 64, 16).unwrap();
        assert!(text.starts_with("loss curve"));
        assert!(text.contains("Minibatch number"));
        assert!(text.contains("Loss"));
    }

    #[test]
    fn test_single_point_is_not_plotted() {
        assert!(line_chart(&[(0.0, 1.0)], "x", "y", "t", 64, 16).is_none());
        assert!(line_chart(&[], "x", "y", "t", 64, 16).is_none());
    }

    #[test]
    fn test_flat_x_range_is_not_plotted() {
        assert!(line_chart(&[(3.0, 1.0), (3.0, 2.0)], "x", "y", "t", 64, 16).is_none());
    }

    #[test]
    fn test_non_finite_x_range_is_not_plotted() {
        assert!(line_chart(&[(f32::NAN, 1.0), (f32::NAN, 2.0)], "x", "y", "t", 64, 16).is_none());
        assert!(line_chart(&[(5.0, 1.0), (2.0, 2.0)], "x", "y", "t", 64, 16).is_some());
    }

    #[test]
    fn test_plotters_never_fail() {
        let pts = vec![(0.0, 1.0), (1.0, 0.5)];
        assert!(TextPlotter::new(10, 1).render_line(&pts, "x", "y", "t").is_ok());
        assert!(NoopPlotter.render_line(&pts, "x", "y", "t").is_ok());
        assert!(TextPlotter::default().render_line(&[], "x", "y", "t").is_ok());
    }
}

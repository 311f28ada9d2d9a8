use std::io::{self, Write};

use crate::data::datatable::DataValue;
use crate::output::ChartRequest;

pub const DEFAULT_CHART_WIDTH: usize = 50;
pub const DEFAULT_CHART_HEIGHT: usize = 15;

const BAR_CHAR: char = '█';
const POINT_CHAR: char = '•';
const MAX_LABEL_WIDTH: usize = 20;
const MAX_BARS: usize = 30;
const NULL_LABEL: &str = "(vazio)";

/// Draws validated chart requests
pub trait ChartRenderer {
    fn render_bar(
        &self,
        out: &mut dyn Write,
        column: &str,
        counts: &[(DataValue, usize)],
    ) -> io::Result<()>;

    fn render_scatter(
        &self,
        out: &mut dyn Write,
        x_column: &str,
        y_column: &str,
        points: &[(f64, f64)],
    ) -> io::Result<()>;

    fn render(&self, out: &mut dyn Write, request: &ChartRequest) -> io::Result<()> {
        match request {
            ChartRequest::Bar { column, counts } => self.render_bar(out, column, counts),
            ChartRequest::Scatter {
                x_column,
                y_column,
                points,
            } => self.render_scatter(out, x_column, y_column, points),
        }
    }
}

/// Plain-text charts that work on any terminal
#[derive(Debug, Clone, Copy)]
pub struct TextChartRenderer {
    width: usize,
    height: usize,
}

impl Default for TextChartRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_CHART_WIDTH, DEFAULT_CHART_HEIGHT)
    }
}

impl TextChartRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width: width.max(2),
            height: height.max(2),
        }
    }

    fn label_for(value: &DataValue) -> String {
        let label = match value {
            DataValue::Null => NULL_LABEL.to_string(),
            other => other.to_string(),
        };
        if label.chars().count() > MAX_LABEL_WIDTH {
            let mut truncated: String = label.chars().take(MAX_LABEL_WIDTH - 1).collect();
            truncated.push('…');
            truncated
        } else {
            label
        }
    }

    fn bar_length(&self, count: usize, max: usize) -> usize {
        if count == 0 || max == 0 {
            return 0;
        }
        let scaled = (count as f64 / max as f64 * self.width as f64).round() as usize;
        scaled.clamp(1, self.width)
    }

    /// Map `value` in `[min, max]` onto `0..cells`. A zero-width range
    /// lands in the middle cell.
    fn scale(value: f64, min: f64, max: f64, cells: usize) -> usize {
        let span = max - min;
        if span <= 0.0 || !span.is_finite() {
            return cells / 2;
        }
        let pos = ((value - min) / span * (cells - 1) as f64).round();
        (pos.max(0.0) as usize).min(cells - 1)
    }
}

fn bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    })
}

impl ChartRenderer for TextChartRenderer {
    fn render_bar(
        &self,
        out: &mut dyn Write,
        column: &str,
        counts: &[(DataValue, usize)],
    ) -> io::Result<()> {
        writeln!(out, "Contagem de valores em '{}'", column)?;
        if counts.is_empty() {
            writeln!(out, "Sem valores para exibir.")?;
            return Ok(());
        }

        let shown = &counts[..counts.len().min(MAX_BARS)];
        let labels: Vec<String> = shown.iter().map(|(v, _)| Self::label_for(v)).collect();
        let label_width = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        let max_count = shown.iter().map(|(_, c)| *c).max().unwrap_or(0);

        for (label, (_, count)) in labels.iter().zip(shown) {
            let bar: String = std::iter::repeat(BAR_CHAR)
                .take(self.bar_length(*count, max_count))
                .collect();
            writeln!(
                out,
                "{:<width$} │{} {}",
                label,
                bar,
                count,
                width = label_width
            )?;
        }

        if counts.len() > shown.len() {
            writeln!(out, "... e mais {} valores", counts.len() - shown.len())?;
        }
        Ok(())
    }

    fn render_scatter(
        &self,
        out: &mut dyn Write,
        x_column: &str,
        y_column: &str,
        points: &[(f64, f64)],
    ) -> io::Result<()> {
        writeln!(out, "Dispersão: {} × {}", y_column, x_column)?;
        if points.is_empty() {
            writeln!(out, "Sem pontos numéricos para exibir.")?;
            return Ok(());
        }

        let (x_min, x_max) = bounds(points.iter().map(|(x, _)| *x));
        let (y_min, y_max) = bounds(points.iter().map(|(_, y)| *y));

        let mut grid = vec![vec![' '; self.width]; self.height];
        for (x, y) in points {
            let col = Self::scale(*x, x_min, x_max, self.width);
            let row = self.height - 1 - Self::scale(*y, y_min, y_max, self.height);
            grid[row][col] = POINT_CHAR;
        }

        let top = y_max.to_string();
        let bottom = y_min.to_string();
        let axis_width = top.chars().count().max(bottom.chars().count());

        for (i, line) in grid.iter().enumerate() {
            let label = if i == 0 {
                top.as_str()
            } else if i == self.height - 1 {
                bottom.as_str()
            } else {
                ""
            };
            let cells: String = line.iter().collect();
            writeln!(
                out,
                "{:>width$} │{}",
                label,
                cells.trim_end(),
                width = axis_width
            )?;
        }

        let rule: String = std::iter::repeat('─').take(self.width).collect();
        writeln!(out, "{:>width$} └{}", "", rule, width = axis_width)?;

        let left = x_min.to_string();
        let right = x_max.to_string();
        let gap = self
            .width
            .saturating_sub(left.chars().count() + right.chars().count())
            .max(1);
        writeln!(
            out,
            "{:>width$}  {}{}{}",
            "",
            left,
            " ".repeat(gap),
            right,
            width = axis_width
        )?;
        Ok(())
    }
}

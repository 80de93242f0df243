//! # beacon-chart
//!
//! **Tier 4 (Rendering)**
//!
//! Chart Renderer: pure text-grid primitives (bar, line, heatmap, trend)
//! shared by every section renderer. Generalizes this lineage's single
//! `sparkline` glyph-ramp primitive into a fuller chart family, while
//! keeping its "deterministic ASCII over a fixed grid, no allocation
//! surprises" shape.
//!
//! ## What belongs here
//! * Pure `&[..] -> String` chart rendering functions
//!
//! ## What does NOT belong here
//! * Analyzer computation
//! * Section composition (use `beacon-sections`)

#![forbid(unsafe_code)]

use std::fmt::Write as _;

/// The 4-shade intensity ramp shared by the bar and heatmap primitives.
const SHADES: [char; 4] = ['░', '▒', '▓', '█'];

/// One labeled value for [`horizontal_bar`].
#[derive(Debug, Clone, PartialEq)]
pub struct BarDatum {
    pub label: String,
    pub value: f64,
}

/// Render a horizontal bar chart: one row per datum, scaled into
/// `width - label_area` columns and shaded by quantile of the value range.
///
/// Returns an empty string for empty input, per the chart renderer's
/// "empty input, empty output" guarantee.
#[must_use]
pub fn horizontal_bar(data: &[BarDatum], width: usize, label_area: usize, max_label: usize) -> String {
    if data.is_empty() || width <= label_area {
        return String::new();
    }
    let bar_width = width - label_area;
    let max_value = data.iter().map(|d| d.value).fold(0.0_f64, f64::max);

    let mut out = String::new();
    for (idx, datum) in data.iter().enumerate() {
        if idx > 0 {
            out.push('\n');
        }
        let label = truncate_label(&datum.label, max_label);
        let _ = write!(out, "{label:<label_area$}");
        let filled = if max_value > 0.0 {
            ((datum.value / max_value) * bar_width as f64).round() as usize
        } else {
            0
        };
        let shade = shade_for_quantile(datum.value, max_value);
        for _ in 0..filled.min(bar_width) {
            out.push(shade);
        }
        let _ = write!(out, " {:.1}", datum.value);
    }
    out
}

fn shade_for_quantile(value: f64, max_value: f64) -> char {
    if max_value <= 0.0 {
        return SHADES[0];
    }
    let quantile = (value / max_value).clamp(0.0, 1.0);
    let idx = ((quantile * SHADES.len() as f64).ceil() as usize)
        .saturating_sub(1)
        .min(SHADES.len() - 1);
    SHADES[idx]
}

fn truncate_label(label: &str, max_len: usize) -> String {
    if max_len == 0 {
        return String::new();
    }
    let chars: Vec<char> = label.chars().collect();
    if chars.len() <= max_len {
        return label.to_string();
    }
    if max_len <= 1 {
        return ".".repeat(max_len);
    }
    let keep = max_len - 1;
    let mut truncated: String = chars[..keep].iter().collect();
    truncated.push('…');
    truncated
}

/// Render a line chart: an `(x, y)` series mapped into an `height x width`
/// character grid, points plotted with `*`, segments between adjacent
/// points drawn with `/`, `\`, or `-` by slope sign/magnitude.
#[must_use]
pub fn line_chart(series: &[(f64, f64)], width: usize, height: usize) -> String {
    if series.is_empty() || width < 2 || height < 2 {
        return String::new();
    }

    let min_y = series.iter().map(|(_, y)| *y).fold(f64::INFINITY, f64::min);
    let max_y = series.iter().map(|(_, y)| *y).fold(f64::NEG_INFINITY, f64::max);
    let min_x = series.iter().map(|(x, _)| *x).fold(f64::INFINITY, f64::min);
    let max_x = series.iter().map(|(x, _)| *x).fold(f64::NEG_INFINITY, f64::max);

    let y_span = (max_y - min_y).max(f64::EPSILON);
    let x_span = (max_x - min_x).max(f64::EPSILON);

    let mut grid = vec![vec![' '; width]; height];
    let mut columns: Vec<usize> = Vec::with_capacity(series.len());
    let mut rows: Vec<usize> = Vec::with_capacity(series.len());
    for (x, y) in series {
        let col = (((x - min_x) / x_span) * (width as f64 - 1.0)).round() as usize;
        let row = height - 1 - (((y - min_y) / y_span) * (height as f64 - 1.0)).round() as usize;
        columns.push(col.min(width - 1));
        rows.push(row.min(height - 1));
    }

    for window in columns.windows(2).zip(rows.windows(2)) {
        let (cols, rws) = window;
        draw_segment(&mut grid, (cols[0], rws[0]), (cols[1], rws[1]));
    }
    for (&col, &row) in columns.iter().zip(rows.iter()) {
        grid[row][col] = '*';
    }

    let label_width = format_label(max_y).len().max(format_label(min_y).len());
    let mut out = String::new();
    for (row_idx, row) in grid.iter().enumerate() {
        if row_idx > 0 {
            out.push('\n');
        }
        let label_value = max_y - (row_idx as f64 / (height - 1) as f64) * y_span;
        let _ = write!(out, "{:>label_width$} ", format_label(label_value));
        let line: String = row.iter().collect();
        out.push_str(&line);
    }
    out
}

fn format_label(value: f64) -> String {
    format!("{value:.1}")
}

fn draw_segment(grid: &mut [Vec<char>], from: (usize, usize), to: (usize, usize)) {
    let (x0, y0) = (from.0 as isize, from.1 as isize);
    let (x1, y1) = (to.0 as isize, to.1 as isize);
    let dx = x1 - x0;
    let dy = y1 - y0;
    let steps = dx.abs().max(dy.abs());
    if steps == 0 {
        return;
    }
    let glyph = if dy == 0 {
        '-'
    } else if dx == 0 {
        '|'
    } else if (dy < 0) == (dx > 0) {
        '/'
    } else {
        '\\'
    };
    for step in 0..=steps {
        let x = x0 + dx * step / steps;
        let y = y0 + dy * step / steps;
        if let Some(row) = grid.get_mut(y.max(0) as usize) {
            if let Some(cell) = row.get_mut(x.max(0) as usize) {
                if *cell == ' ' {
                    *cell = glyph;
                }
            }
        }
    }
}

/// Render a 2-D numeric matrix as a quantized heatmap with row/column
/// labels and an explicit value-range legend beneath it.
#[must_use]
pub fn heatmap(matrix: &[Vec<f64>], row_labels: &[String], col_labels: &[String]) -> String {
    if matrix.is_empty() || matrix[0].is_empty() {
        return String::new();
    }
    let max_value = matrix
        .iter()
        .flat_map(|row| row.iter())
        .fold(0.0_f64, |acc, v| acc.max(*v));

    let label_width = row_labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);

    let mut out = String::new();
    let _ = write!(out, "{:label_width$} ", "");
    for label in col_labels {
        let _ = write!(out, "{}", truncate_label(label, 1));
    }
    out.push('\n');

    for (row_idx, row) in matrix.iter().enumerate() {
        let label = row_labels.get(row_idx).cloned().unwrap_or_default();
        let _ = write!(out, "{label:<label_width$} ");
        for value in row {
            out.push(shade_for_quantile(*value, max_value));
        }
        out.push('\n');
    }

    out.push_str("legend: ");
    let step = max_value / SHADES.len() as f64;
    for (idx, shade) in SHADES.iter().enumerate() {
        if idx > 0 {
            out.push_str(", ");
        }
        let lo = step * idx as f64;
        let hi = if idx == SHADES.len() - 1 {
            max_value
        } else {
            step * (idx as f64 + 1.0)
        };
        let _ = write!(out, "{shade} {lo:.0}-{hi:.0}");
    }
    out
}

/// A line chart specialized with a textual direction/current/peak/average summary.
#[must_use]
pub fn trend(series: &[(f64, f64)], width: usize, height: usize, unit_label: &str) -> String {
    if series.is_empty() {
        return String::new();
    }
    let chart = line_chart(series, width, height);
    let current = series.last().map(|(_, y)| *y).unwrap_or(0.0);
    let peak = series.iter().map(|(_, y)| *y).fold(f64::NEG_INFINITY, f64::max);
    let average = series.iter().map(|(_, y)| *y).sum::<f64>() / series.len() as f64;
    let direction = classify_direction(series);

    format!(
        "{chart}\nsummary: {direction} | current {current:.1} {unit_label} | peak {peak:.1} {unit_label} | average {average:.1} {unit_label}"
    )
}

fn classify_direction(series: &[(f64, f64)]) -> &'static str {
    if series.len() < 2 {
        return "stable";
    }
    let first = series.first().unwrap().1;
    let last = series.last().unwrap().1;
    let delta = last - first;
    if delta > f64::EPSILON {
        "increasing"
    } else if delta < -f64::EPSILON {
        "decreasing"
    } else {
        "stable"
    }
}

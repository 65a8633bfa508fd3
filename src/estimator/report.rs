use crate::core::Diagnostics;
use indexmap::IndexMap;
use serde::{Serialize, Serializer};

/// Time, memory and parameters of one algorithm under one metric.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Estimate {
    #[serde(serialize_with = "finite_or_null")]
    pub time: f64,
    #[serde(serialize_with = "finite_or_null")]
    pub memory: f64,
    pub parameters: IndexMap<String, Option<i64>>,
}

impl Estimate {
    pub fn is_feasible(&self) -> bool {
        self.time.is_finite()
    }
}

/// Row of [`crate::estimator::Estimator::estimate`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AlgorithmEstimate {
    pub estimate: Estimate,
    pub diagnostics: Diagnostics,
    /// `None` when not requested or not supported by the algorithm.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tilde_o_estimate: Option<Estimate>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "optional_finite_or_null"
    )]
    pub quantum_time: Option<f64>,
}

fn finite_or_null<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.is_finite() {
        serializer.serialize_f64(*value)
    } else {
        serializer.serialize_none()
    }
}

fn optional_finite_or_null<S: Serializer>(
    value: &Option<f64>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(v) => finite_or_null(v, serializer),
        None => serializer.serialize_none(),
    }
}

pub const UNAVAILABLE: &str = "--";

/// Render `value` with `precision` decimals, rounded or truncated toward zero.
/// Infinite and NaN values render as `--`.
pub fn format_number(value: f64, precision: usize, truncate: bool) -> String {
    if !value.is_finite() {
        return UNAVAILABLE.to_string();
    }
    if !truncate {
        return format!("{:.*}", precision, value);
    }

    // Cut the shortest decimal form, so no digit past the cut is rounded in first.
    let shortest = format!("{}", value);
    let (whole, fraction) = shortest.split_once('.').unwrap_or((&shortest, ""));
    let mut cut = whole.to_string();
    if precision > 0 {
        let digits: String = fraction.chars().chain(std::iter::repeat('0')).take(precision).collect();
        cut = format!("{}.{}", cut, digits);
    }
    if cut.trim_start_matches('-').chars().all(|c| c == '0' || c == '.') {
        cut.trim_start_matches('-').to_string()
    } else {
        cut
    }
}

pub fn format_parameters(parameters: &IndexMap<String, Option<i64>>) -> String {
    let body: Vec<String> = parameters
        .iter()
        .map(|(name, value)| match value {
            Some(v) => format!("{}: {}", name, v),
            None => format!("{}: {}", name, UNAVAILABLE),
        })
        .collect();
    format!("{{{}}}", body.join(", "))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Align {
    Left,
    Right,
}

/// Plain-text grid with a header row.
pub(crate) fn render_table(headers: &[&str], align: &[Align], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let separator = {
        let parts: Vec<String> = widths.iter().map(|w| "-".repeat(w + 2)).collect();
        format!("+{}+", parts.join("+"))
    };
    let line = |cells: &[String], header: bool| {
        let parts: Vec<String> = cells
            .iter()
            .zip(&widths)
            .zip(align)
            .map(|((cell, &w), &a)| match (header, a) {
                (true, _) | (false, Align::Left) => format!(" {:<w$} ", cell, w = w),
                (false, Align::Right) => format!(" {:>w$} ", cell, w = w),
            })
            .collect();
        format!("|{}|", parts.join("|"))
    };

    let header_cells: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    let mut out = vec![separator.clone(), line(&header_cells, true), separator.clone()];
    for row in rows {
        out.push(line(row, false));
    }
    out.push(separator);
    out.join("\n")
}

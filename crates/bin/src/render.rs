//! Plain-text tables and charts for statements.

use std::fmt::Write as _;

use fundamentals::{FundamentalsError, Lookup, NormalizedStatement, Result, StatementKind};
use polars::prelude::{DataType, PolarsError};
use tracing::warn;

/// Bar length of the largest value in a chart.
pub(crate) const CHART_WIDTH: u32 = 40;

/// Formats an integer with comma thousands separators.
pub(crate) fn thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Section heading for a statement.
pub(crate) const fn heading(kind: StatementKind) -> &'static str {
    match kind {
        StatementKind::Income => "Profit and Loss KPIs",
        StatementKind::BalanceSheet => "Balance Sheet KPIs",
    }
}

fn frame_error(e: PolarsError) -> FundamentalsError {
    FundamentalsError::Other(e.to_string())
}

/// Metrics as rows, periods as columns, from the statement's transposed frame.
pub(crate) fn statement_table(statement: &NormalizedStatement) -> Result<String> {
    let frame = statement.transposed()?;
    let Some((metric, periods)) = frame.get_columns().split_first() else {
        return Ok(String::new());
    };

    let labels: Vec<&str> = metric
        .as_materialized_series()
        .str()
        .map_err(frame_error)?
        .into_iter()
        .map(Option::unwrap_or_default)
        .collect();

    let mut headers = Vec::with_capacity(periods.len());
    let mut cells: Vec<Vec<String>> = Vec::with_capacity(periods.len());
    for period in periods {
        headers.push(period.name().as_str());
        let values = period.as_materialized_series().i64().map_err(frame_error)?;
        cells.push(
            values
                .into_iter()
                .map(|v| v.map(thousands).unwrap_or_default())
                .collect(),
        );
    }

    let label_width = labels
        .iter()
        .map(|l| l.len())
        .chain(std::iter::once(metric.name().len()))
        .max()
        .unwrap_or_default();
    let widths: Vec<usize> = headers
        .iter()
        .zip(&cells)
        .map(|(header, column)| {
            column
                .iter()
                .map(String::len)
                .chain(std::iter::once(header.len()))
                .max()
                .unwrap_or_default()
        })
        .collect();

    let mut out = String::new();
    let _ = write!(out, "{:<label_width$}", metric.name().as_str());
    for (header, width) in headers.iter().zip(&widths) {
        let _ = write!(out, "  {header:>width$}");
    }
    out.push('\n');

    for (row, label) in labels.iter().enumerate() {
        let _ = write!(out, "{label:<label_width$}");
        for (column, width) in cells.iter().zip(&widths) {
            let _ = write!(out, "  {:>width$}", column[row]);
        }
        out.push('\n');
    }
    Ok(out)
}

/// Period labels and values of one field, read from the statement's frame.
///
/// Returns `None` when the statement has no such field.
pub(crate) fn chart_series(
    statement: &NormalizedStatement,
    field: &str,
) -> Result<Option<(Vec<String>, Vec<i64>)>> {
    if !statement.columns.iter().any(|c| c == field) {
        return Ok(None);
    }

    let frame = statement.to_dataframe()?;
    let dates = frame
        .column("date")
        .and_then(|c| c.cast(&DataType::String))
        .map_err(frame_error)?;
    let labels = dates
        .as_materialized_series()
        .str()
        .map_err(frame_error)?
        .into_iter()
        .map(|d| d.unwrap_or_default().to_string())
        .collect();
    let values = frame
        .column(field)
        .map_err(frame_error)?
        .as_materialized_series()
        .i64()
        .map_err(frame_error)?
        .into_iter()
        .map(Option::unwrap_or_default)
        .collect();

    Ok(Some((labels, values)))
}

/// Horizontal bar chart, one bar per period, scaled to the largest magnitude.
///
/// Negative values draw with `-` instead of `#`.
pub(crate) fn bar_chart(title: &str, labels: &[String], values: &[i64], width: u32) -> String {
    let max = values.iter().map(|v| v.unsigned_abs()).max().unwrap_or(0);
    let pad = width as usize;
    let width = u128::from(width);

    let mut out = format!("{title}\n");
    for (label, value) in labels.iter().zip(values) {
        let len = if max == 0 {
            0
        } else {
            let abs = u128::from(value.unsigned_abs());
            let max = u128::from(max);
            (abs * width + max / 2) / max
        };
        let mark = if *value < 0 { "-" } else { "#" };
        let bar = mark.repeat(usize::try_from(len).unwrap_or_default());
        let _ = writeln!(out, "{label}  {bar:<pad$}  {}", thousands(*value));
    }
    out
}

/// Full section for one statement lookup: heading, unit line, table and chart.
pub(crate) fn statement_section(
    company: &str,
    kind: StatementKind,
    lookup: &Lookup<NormalizedStatement>,
) -> String {
    let mut out = String::new();
    match lookup {
        Lookup::Found(statement) => {
            let _ = writeln!(
                out,
                "{} for {company} (last {} periods)",
                heading(kind),
                statement.len()
            );
            let _ = writeln!(
                out,
                "All figures are in millions {}",
                statement.currency.as_deref().unwrap_or("of the reporting currency")
            );
            out.push('\n');

            match statement_table(statement) {
                Ok(table) => out.push_str(&table),
                Err(e) => {
                    warn!(statement = %kind, error = %e, "Failed to render table");
                    let _ = writeln!(out, "Table unavailable ({e}).");
                }
            }

            let charted = match kind {
                StatementKind::Income => "net_income",
                StatementKind::BalanceSheet => "total_current_assets",
            };
            match chart_series(statement, charted) {
                Ok(Some((labels, values))) => {
                    out.push('\n');
                    out.push_str(&bar_chart(charted, &labels, &values, CHART_WIDTH));
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(statement = %kind, error = %e, "Failed to render chart");
                }
            }
        }
        Lookup::NotFound => {
            let _ = writeln!(out, "No {} data available.", kind.title().to_lowercase());
        }
        Lookup::Failed(e) => {
            let _ = writeln!(
                out,
                "No {} data available ({e}).",
                kind.title().to_lowercase()
            );
        }
    }
    out
}

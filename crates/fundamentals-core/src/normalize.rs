//! Statement normalization.
//!
//! Turns a provider's period records into a [`NormalizedStatement`]:
//! extract every period, order newest first, keep the `window` most recent,
//! then present them oldest first. Position in the provider's array is never
//! trusted for recency.

use tracing::{debug, warn};

use crate::{
    extract::{ExtractedPeriod, extract_period},
    manifest::StatementManifest,
    statement::{NormalizedStatement, StatementRow},
    types::RawPeriodRecord,
};

/// Normalizes period records against a manifest.
///
/// Malformed periods (missing date key, unparsable date, non-numeric value)
/// are skipped with a warning. Fewer than `window` periods is not an error.
/// Returns `None` when no period survives.
#[must_use]
pub fn normalize(
    records: &[RawPeriodRecord],
    manifest: &StatementManifest,
    window: usize,
) -> Option<NormalizedStatement> {
    let mut periods: Vec<ExtractedPeriod> = records
        .iter()
        .enumerate()
        .filter_map(|(index, record)| match extract_period(record, manifest) {
            Ok(period) => Some(period),
            Err(e) => {
                warn!(
                    statement = %manifest.kind,
                    index,
                    period = record.text(manifest.date_field).unwrap_or("<missing>"),
                    error = %e,
                    "Skipping malformed period"
                );
                None
            }
        })
        .collect();

    // Stable sort keeps provider order among equal dates, so dedup keeps the first.
    periods.sort_by(|a, b| b.date.cmp(&a.date));
    let before = periods.len();
    periods.dedup_by_key(|p| p.date);
    if periods.len() != before {
        warn!(
            statement = %manifest.kind,
            dropped = before - periods.len(),
            "Dropped periods with duplicate dates"
        );
    }

    periods.truncate(window);
    if periods.is_empty() {
        debug!(statement = %manifest.kind, "No usable periods");
        return None;
    }
    periods.reverse();

    let currency = periods.last().and_then(|p| p.currency.clone());
    if let Some(expected) = &currency {
        for period in &periods {
            if let Some(other) = &period.currency
                && other != expected
            {
                warn!(
                    statement = %manifest.kind,
                    period = %period.date,
                    currency = %other,
                    expected = %expected,
                    "Reporting currency differs from latest period"
                );
            }
        }
    }

    debug!(
        statement = %manifest.kind,
        periods = periods.len(),
        "Normalized statement"
    );

    Some(NormalizedStatement {
        kind: manifest.kind,
        columns: manifest.columns().into_iter().map(str::to_string).collect(),
        rows: periods
            .into_iter()
            .map(|p| StatementRow {
                date: p.date,
                values: p.values,
            })
            .collect(),
        currency,
    })
}

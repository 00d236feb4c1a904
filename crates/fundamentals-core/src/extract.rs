//! Field extraction from raw period records.
//!
//! Pulls the manifest's numeric fields out of one [`RawPeriodRecord`], scaled
//! to millions and rounded to whole units, ties to even. Blank values (null,
//! `""`, `None`) read as 0. A required key that is absent altogether is an error.

use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::{
    error::{FundamentalsError, Result},
    manifest::{FieldRequirement, FieldSpec, StatementManifest},
    types::{RawPeriodRecord, RawValue},
};

/// Date format used by providers for period end dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One period after extraction, values in manifest column order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtractedPeriod {
    /// Period end date.
    pub date: NaiveDate,
    /// Scaled values, one per manifest field.
    pub values: Vec<i64>,
    /// Reporting currency, if the record carries one.
    pub currency: Option<String>,
}

/// Extracts one numeric field, scaled by `scale` and rounded.
pub fn extract_value(record: &RawPeriodRecord, spec: &FieldSpec, scale: f64) -> Result<i64> {
    let raw = match (record.get(spec.source), spec.requirement) {
        (Some(raw), _) => raw,
        (None, FieldRequirement::Optional) => return Ok(0),
        (None, FieldRequirement::Required) => {
            return Err(FundamentalsError::MissingRequiredField {
                field: spec.source.to_string(),
            });
        }
    };

    if raw.is_blank() {
        return Ok(0);
    }

    let amount = parse_amount(raw).ok_or_else(|| {
        FundamentalsError::MalformedPayload(format!(
            "field {} is not numeric: {raw}",
            spec.source
        ))
    })?;

    Ok(scale_amount(amount, scale))
}

/// Extracts several numeric fields into a column-name keyed map.
pub fn extract_fields(
    record: &RawPeriodRecord,
    fields: &[FieldSpec],
    scale: f64,
) -> Result<BTreeMap<&'static str, i64>> {
    fields
        .iter()
        .map(|spec| Ok((spec.column, extract_value(record, spec, scale)?)))
        .collect()
}

/// Extracts the period end date. The key is always required.
pub fn extract_date(record: &RawPeriodRecord, field: &str) -> Result<NaiveDate> {
    let raw = record
        .get(field)
        .ok_or_else(|| FundamentalsError::MissingRequiredField {
            field: field.to_string(),
        })?;

    let text = match raw {
        RawValue::Text(s) if !raw.is_blank() => s.trim(),
        _ => {
            return Err(FundamentalsError::MalformedPayload(format!(
                "field {field} is not a date: {raw}"
            )));
        }
    };

    NaiveDate::parse_from_str(text, DATE_FORMAT).map_err(|e| {
        FundamentalsError::MalformedPayload(format!("field {field} is not a date: {text:?} ({e})"))
    })
}

/// Extracts the date, currency and every numeric field of a manifest.
pub fn extract_period(
    record: &RawPeriodRecord,
    manifest: &StatementManifest,
) -> Result<ExtractedPeriod> {
    let date = extract_date(record, manifest.date_field)?;
    let values = manifest
        .fields
        .iter()
        .map(|spec| extract_value(record, spec, manifest.scale))
        .collect::<Result<Vec<_>>>()?;
    let currency = manifest
        .currency_field
        .and_then(|field| record.text(field))
        .map(str::to_string);

    Ok(ExtractedPeriod {
        date,
        values,
        currency,
    })
}

fn parse_amount(raw: &RawValue) -> Option<f64> {
    let amount = match raw {
        RawValue::Number(n) => *n,
        RawValue::Text(s) => {
            let s = s.trim();
            // Integers first: f64 parsing of long digit strings loses precision.
            match s.parse::<i64>() {
                Ok(n) => n as f64,
                Err(_) => s.parse::<f64>().ok()?,
            }
        }
        RawValue::Null => return None,
    };
    amount.is_finite().then_some(amount)
}

fn scale_amount(amount: f64, scale: f64) -> i64 {
    (amount / scale).round_ties_even() as i64
}

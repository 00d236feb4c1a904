//! Normalized statement tables.
//!
//! A [`NormalizedStatement`] is the uniform shape every provider's statement
//! ends up in: one row per period, ascending by date, every value an integer
//! in millions.

use chrono::NaiveDate;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{
    error::{FundamentalsError, Result},
    period::StatementKind,
};

/// One period of a normalized statement.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementRow {
    /// Period end date.
    pub date: NaiveDate,
    /// Values in millions, aligned with [`NormalizedStatement::columns`].
    pub values: Vec<i64>,
}

/// A statement as a date-ordered table of integer series.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedStatement {
    /// Statement type.
    pub kind: StatementKind,
    /// Column names, in value order.
    pub columns: Vec<String>,
    /// Rows, ascending by date.
    pub rows: Vec<StatementRow>,
    /// Reporting currency of the newest period, if reported.
    pub currency: Option<String>,
}

impl NormalizedStatement {
    /// Number of periods.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if there are no periods.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Period end dates, ascending.
    #[must_use]
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.rows.iter().map(|r| r.date).collect()
    }

    /// One series by column name, ascending by date.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<Vec<i64>> {
        let idx = self.columns.iter().position(|c| c == name)?;
        Some(self.rows.iter().map(|r| r.values[idx]).collect())
    }

    /// The most recent period.
    #[must_use]
    pub fn latest(&self) -> Option<&StatementRow> {
        self.rows.last()
    }

    /// Long view: a `date` column plus one `Int64` column per field.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let days: Vec<i32> = self.rows.iter().map(|r| days_since_epoch(r.date)).collect();
        let date_col = Column::new("date".into(), days)
            .cast(&DataType::Date)
            .map_err(|e| FundamentalsError::Other(e.to_string()))?;

        let mut columns = Vec::with_capacity(self.columns.len() + 1);
        columns.push(date_col);
        for (idx, name) in self.columns.iter().enumerate() {
            let values: Vec<i64> = self.rows.iter().map(|r| r.values[idx]).collect();
            columns.push(Column::new(name.as_str().into(), values));
        }

        DataFrame::new(columns).map_err(|e| FundamentalsError::Other(e.to_string()))
    }

    /// Presentation view: a `metric` column plus one column per period date.
    pub fn transposed(&self) -> Result<DataFrame> {
        let mut columns = Vec::with_capacity(self.rows.len() + 1);
        let metrics: Vec<&str> = self.columns.iter().map(String::as_str).collect();
        columns.push(Column::new("metric".into(), metrics));
        for row in &self.rows {
            columns.push(Column::new(
                row.date.to_string().as_str().into(),
                row.values.clone(),
            ));
        }

        DataFrame::new(columns).map_err(|e| FundamentalsError::Other(e.to_string()))
    }
}

fn days_since_epoch(date: NaiveDate) -> i32 {
    // NaiveDate::default() is 1970-01-01.
    (date - NaiveDate::default()).num_days() as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> NormalizedStatement {
        NormalizedStatement {
            kind: StatementKind::Income,
            columns: vec!["total_revenue".into(), "net_income".into()],
            rows: vec![
                StatementRow {
                    date: NaiveDate::from_ymd_opt(2022, 3, 31).unwrap(),
                    values: vec![100, 10],
                },
                StatementRow {
                    date: NaiveDate::from_ymd_opt(2023, 3, 31).unwrap(),
                    values: vec![110, 11],
                },
            ],
            currency: Some("INR".into()),
        }
    }

    #[test]
    fn test_column_lookup() {
        let stmt = sample();
        assert_eq!(stmt.column("net_income"), Some(vec![10, 11]));
        assert_eq!(stmt.column("ebitda"), None);
        assert_eq!(stmt.latest().unwrap().values, vec![110, 11]);
        assert_eq!(stmt.len(), 2);
    }

    #[test]
    fn test_to_dataframe() {
        let df = sample().to_dataframe().unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(df.width(), 3);
        assert_eq!(df.column("date").unwrap().dtype(), &DataType::Date);
        assert_eq!(df.column("net_income").unwrap().dtype(), &DataType::Int64);
    }

    #[test]
    fn test_transposed_has_periods_as_columns() {
        let df = sample().transposed().unwrap();
        assert_eq!(df.height(), 2);
        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|n| n.to_string())
            .collect();
        assert_eq!(names, vec!["metric", "2022-03-31", "2023-03-31"]);
    }

    #[test]
    fn test_epoch_offset() {
        assert_eq!(days_since_epoch(NaiveDate::from_ymd_opt(1970, 1, 2).unwrap()), 1);
    }
}

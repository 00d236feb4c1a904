//! Statement field manifests.
//!
//! A [`StatementManifest`] names the date field and the numeric fields a
//! statement is built from, with the column each one lands in and whether the
//! provider is expected to always send it.

use serde::Serialize;

use crate::period::StatementKind;

/// Divisor taking whole currency units to millions.
pub const MILLIONS: f64 = 1_000_000.0;

/// Periods retained per statement unless configured otherwise.
pub const DEFAULT_PERIOD_WINDOW: usize = 9;

/// Whether the provider is expected to always send a field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum FieldRequirement {
    /// The key must be present; a blank value still reads as 0.
    Required,
    /// The key may be absent; absence reads as 0.
    Optional,
}

/// One numeric field of a statement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct FieldSpec {
    /// Provider field name, e.g. `totalRevenue`.
    pub source: &'static str,
    /// Output column name, e.g. `total_revenue`.
    pub column: &'static str,
    /// Presence policy.
    pub requirement: FieldRequirement,
}

impl FieldSpec {
    /// A field whose key the provider always sends.
    #[must_use]
    pub const fn required(source: &'static str, column: &'static str) -> Self {
        Self {
            source,
            column,
            requirement: FieldRequirement::Required,
        }
    }

    /// A field that defaults to 0 when the key is absent.
    #[must_use]
    pub const fn optional(source: &'static str, column: &'static str) -> Self {
        Self {
            source,
            column,
            requirement: FieldRequirement::Optional,
        }
    }
}

/// The fields a statement is built from.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StatementManifest {
    /// Statement this manifest describes.
    pub kind: StatementKind,
    /// Provider field holding the period end date (`YYYY-MM-DD`).
    pub date_field: &'static str,
    /// Provider field holding the reporting currency, if any.
    pub currency_field: Option<&'static str>,
    /// Numeric fields, in output column order.
    pub fields: Vec<FieldSpec>,
    /// Divisor applied to every numeric field.
    pub scale: f64,
}

impl StatementManifest {
    /// Income statement: revenue, EBITDA and net income.
    #[must_use]
    pub fn income() -> Self {
        Self {
            kind: StatementKind::Income,
            date_field: "fiscalDateEnding",
            currency_field: Some("reportedCurrency"),
            fields: vec![
                FieldSpec::required("totalRevenue", "total_revenue"),
                FieldSpec::required("ebitda", "ebitda"),
                FieldSpec::required("netIncome", "net_income"),
            ],
            scale: MILLIONS,
        }
    }

    /// Balance sheet: long-term debt, current assets and cash.
    #[must_use]
    pub fn balance_sheet() -> Self {
        Self {
            kind: StatementKind::BalanceSheet,
            date_field: "fiscalDateEnding",
            currency_field: Some("reportedCurrency"),
            fields: vec![
                FieldSpec::optional("longTermDebt", "long_term_debt"),
                FieldSpec::required("totalCurrentAssets", "total_current_assets"),
                FieldSpec::required(
                    "cashAndCashEquivalentsAtCarryingValue",
                    "cash_and_equivalents",
                ),
            ],
            scale: MILLIONS,
        }
    }

    /// Manifest for a statement kind.
    #[must_use]
    pub fn for_kind(kind: StatementKind) -> Self {
        match kind {
            StatementKind::Income => Self::income(),
            StatementKind::BalanceSheet => Self::balance_sheet(),
        }
    }

    /// Output column names, in order.
    #[must_use]
    pub fn columns(&self) -> Vec<&'static str> {
        self.fields.iter().map(|f| f.column).collect()
    }
}

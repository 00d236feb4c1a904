//! Period type and statement kind definitions.
//!
//! This module defines [`PeriodType`] for the reporting period of fundamental
//! data and [`StatementKind`] for the statements a provider can serve.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::FundamentalsError;

/// Period type for fundamental financial data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PeriodType {
    /// Annual reporting period.
    #[default]
    Annual,
    /// Quarterly reporting period.
    Quarterly,
}

impl PeriodType {
    /// Returns the lowercase name used in configuration values.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Annual => "annual",
            Self::Quarterly => "quarterly",
        }
    }
}

impl fmt::Display for PeriodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PeriodType {
    type Err = FundamentalsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "annual" | "yearly" => Ok(Self::Annual),
            "quarterly" | "quarter" => Ok(Self::Quarterly),
            other => Err(FundamentalsError::Configuration(format!(
                "Unknown period type: {other}. Supported: annual, quarterly"
            ))),
        }
    }
}

/// Financial statement served by a fundamentals provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatementKind {
    /// Income statement.
    Income,
    /// Balance sheet.
    BalanceSheet,
}

impl StatementKind {
    /// Human-readable title.
    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self {
            Self::Income => "Income Statement",
            Self::BalanceSheet => "Balance Sheet",
        }
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_type_parse() {
        assert_eq!("annual".parse::<PeriodType>().unwrap(), PeriodType::Annual);
        assert_eq!(" Quarterly ".parse::<PeriodType>().unwrap(), PeriodType::Quarterly);
        assert!("monthly".parse::<PeriodType>().is_err());
        assert_eq!(PeriodType::default(), PeriodType::Annual);
    }
}

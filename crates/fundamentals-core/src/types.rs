//! Core data types for fundamentals lookups.
//!
//! This module defines the fundamental data structures:
//!
//! - [`Symbol`] - Trading symbol/ticker
//! - [`CompanyQuery`] - Free-text company name used for symbol search
//! - [`SymbolCandidate`] - One symbol-search result as returned by a provider
//! - [`TickerMatch`] - The candidate chosen for the target market
//! - [`TargetMarket`] - Region string used to disambiguate listings
//! - [`RawValue`] / [`RawPeriodRecord`] - One provider period record
//! - [`Lookup`] - Found / not found / failed outcome

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::FundamentalsError;

/// A trading symbol/ticker.
///
/// Symbols are automatically uppercased on creation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Symbol(String);

impl Symbol {
    /// Creates a new symbol from a string, converting to uppercase.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into().to_uppercase())
    }

    /// Returns the symbol as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Symbol {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Symbol {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// Free-text company name handed to the symbol search.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompanyQuery(String);

impl CompanyQuery {
    /// Creates a query from a company name, trimming surrounding whitespace.
    pub fn new(name: impl AsRef<str>) -> Result<Self, FundamentalsError> {
        let name = name.as_ref().trim();
        if name.is_empty() {
            return Err(FundamentalsError::InvalidQuery(
                "company name is empty".to_string(),
            ));
        }
        Ok(Self(name.to_string()))
    }

    /// Derives the company name from a report's file name.
    ///
    /// The base name is truncated at its first dot, so `reports/Infosys.pdf`
    /// becomes `Infosys` and `Infosys` stays `Infosys`. Names that contain dots
    /// themselves (`J.P. Morgan.pdf`) are cut short.
    pub fn from_file_name(path: impl AsRef<Path>) -> Result<Self, FundamentalsError> {
        let path = path.as_ref();
        let base = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                FundamentalsError::InvalidQuery(format!(
                    "no file name in {}",
                    path.display()
                ))
            })?;
        let stem = base.split('.').next().unwrap_or_default();
        Self::new(stem)
    }

    /// Returns the company name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CompanyQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Region string a listing must carry to be eligible, e.g. `India/Bombay`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetMarket(String);

impl TargetMarket {
    /// Market used when none is configured.
    pub const DEFAULT: &'static str = "India/Bombay";

    /// Creates a target market. Matching against candidate regions is exact.
    pub fn new(region: impl Into<String>) -> Result<Self, FundamentalsError> {
        let region = region.into();
        if region.trim().is_empty() {
            return Err(FundamentalsError::Configuration(
                "target market is empty".to_string(),
            ));
        }
        Ok(Self(region))
    }

    /// Returns the region string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TargetMarket {
    fn default() -> Self {
        Self(Self::DEFAULT.to_string())
    }
}

impl fmt::Display for TargetMarket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One symbol-search result, in the order the provider returned it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolCandidate {
    /// Symbol as listed, possibly with an exchange suffix (`INFY.BSE`).
    pub symbol: String,
    /// Company name.
    pub name: String,
    /// Listing region (`India/Bombay`, `United States`, ...).
    pub region: String,
    /// Trading currency, when reported.
    pub currency: Option<String>,
}

impl SymbolCandidate {
    /// Creates a candidate with required fields.
    #[must_use]
    pub fn new(
        symbol: impl Into<String>,
        name: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            name: name.into(),
            region: region.into(),
            currency: None,
        }
    }

    /// Sets the trading currency.
    #[must_use]
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }
}

/// The listing chosen for the target market.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickerMatch {
    /// Symbol with the exchange suffix stripped.
    pub symbol: Symbol,
    /// Listing region.
    pub region: String,
}

/// A scalar as it appears in a provider period record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    /// JSON null.
    Null,
    /// JSON number.
    Number(f64),
    /// JSON string; providers usually quote numbers.
    Text(String),
}

impl RawValue {
    /// Returns true for values that stand for "no figure reported":
    /// null, the empty string and the literal `None`.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Number(_) => false,
            Self::Text(s) => {
                let s = s.trim();
                s.is_empty() || s == "None"
            }
        }
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s:?}"),
        }
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<f64> for RawValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

/// One fiscal period as returned by the provider: field name to scalar.
///
/// Non-scalar values are rejected when the record is deserialized, so every
/// field reaching the extractor is a number, a string or null.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawPeriodRecord(BTreeMap<String, RawValue>);

impl RawPeriodRecord {
    /// Creates an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a field, builder style.
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<RawValue>) -> Self {
        self.insert(field, value);
        self
    }

    /// Sets a field.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<RawValue>) {
        self.0.insert(field.into(), value.into());
    }

    /// Returns the value of a field, if the key is present.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&RawValue> {
        self.0.get(field)
    }

    /// Returns the value of a field as text, skipping blanks.
    #[must_use]
    pub fn text(&self, field: &str) -> Option<&str> {
        match self.0.get(field) {
            Some(RawValue::Text(s)) => {
                let s = s.trim();
                (!s.is_empty() && s != "None").then_some(s)
            }
            _ => None,
        }
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the record has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<RawValue>> FromIterator<(K, V)> for RawPeriodRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Outcome of a lookup against a remote provider.
///
/// Separates the expected "nothing there" case from failures, so callers can
/// show a message for the first and log or alert on the second.
#[derive(Debug)]
pub enum Lookup<T> {
    /// The value was found.
    Found(T),
    /// The provider answered but had nothing for the request.
    NotFound,
    /// The provider could not be reached or returned something unusable.
    Failed(FundamentalsError),
}

impl<T> Lookup<T> {
    /// Returns the found value, if any.
    #[must_use]
    pub const fn found(&self) -> Option<&T> {
        match self {
            Self::Found(v) => Some(v),
            _ => None,
        }
    }

    /// Converts into an `Option`, dropping the distinction between misses and failures.
    #[must_use]
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Found(v) => Some(v),
            _ => None,
        }
    }

    /// Returns true if the value was found.
    #[must_use]
    pub const fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// Returns the failure, if the lookup failed.
    #[must_use]
    pub const fn error(&self) -> Option<&FundamentalsError> {
        match self {
            Self::Failed(e) => Some(e),
            _ => None,
        }
    }
}

impl<T> From<Option<T>> for Lookup<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::NotFound, Self::Found)
    }
}

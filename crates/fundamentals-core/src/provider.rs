//! Provider traits for fetching fundamentals.
//!
//! This module defines the core provider traits:
//!
//! - [`DataProvider`] - Base trait for all data providers
//! - [`SymbolSearchProvider`] - Company name to listed symbols
//! - [`StatementProvider`] - Raw per-period statement records

use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    error::Result,
    period::{PeriodType, StatementKind},
    types::{RawPeriodRecord, Symbol, SymbolCandidate},
};

/// Base trait for all data providers.
pub trait DataProvider: Send + Sync + Debug {
    /// Returns the name of this provider (e.g., "Alpha Vantage").
    fn name(&self) -> &str;

    /// Returns a description of this provider.
    fn description(&self) -> &str;
}

/// Provider for symbol search.
#[async_trait]
pub trait SymbolSearchProvider: DataProvider {
    /// Searches listed symbols by free-text keywords.
    ///
    /// Candidates are returned in provider order. An empty vector means the
    /// search ran and matched nothing.
    async fn search_symbols(&self, keywords: &str) -> Result<Vec<SymbolCandidate>>;
}

/// Provider for raw financial statements.
#[async_trait]
pub trait StatementProvider: DataProvider {
    /// Fetches the raw period records of one statement.
    ///
    /// Records come back in provider order, which is not relied on. An empty
    /// vector means the provider has no data for the symbol.
    async fn fetch_statement(
        &self,
        symbol: &Symbol,
        kind: StatementKind,
        period_type: PeriodType,
    ) -> Result<Vec<RawPeriodRecord>>;
}

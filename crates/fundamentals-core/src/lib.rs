#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/fundamentals/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core traits and types for fundamentals providers.
//!
//! This crate provides the foundational pieces for turning a company name into
//! normalized financial statements:
//!
//! - [`extract`] - Field Extractor over a single raw period record
//! - [`normalize`](normalize::normalize) - Statement Normalizer
//! - [`resolve_ticker`](ticker::resolve_ticker) - Ticker Resolver
//! - [`SymbolSearchProvider`](provider::SymbolSearchProvider) and
//!   [`StatementProvider`](provider::StatementProvider) - remote provider traits

/// Error types for fundamentals operations.
pub mod error;
/// Field extraction from raw period records.
pub mod extract;
/// Statement field manifests.
pub mod manifest;
/// Statement normalization.
pub mod normalize;
/// Period type and statement kind definitions.
pub mod period;
/// Provider traits for fetching fundamentals.
pub mod provider;
/// Normalized statement tables.
pub mod statement;
/// Ticker resolution.
pub mod ticker;
/// Core data types (Symbol, CompanyQuery, RawPeriodRecord, etc.).
pub mod types;

// Re-export commonly used items at crate root
pub use error::{FundamentalsError, Result};
pub use manifest::{DEFAULT_PERIOD_WINDOW, FieldRequirement, FieldSpec, StatementManifest};
pub use normalize::normalize;
pub use period::{PeriodType, StatementKind};
pub use provider::{DataProvider, StatementProvider, SymbolSearchProvider};
pub use statement::{NormalizedStatement, StatementRow};
pub use ticker::resolve_ticker;
pub use types::{
    CompanyQuery, Lookup, RawPeriodRecord, RawValue, Symbol, SymbolCandidate, TargetMarket,
    TickerMatch,
};

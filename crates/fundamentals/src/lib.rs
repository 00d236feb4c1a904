#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/fundamentals/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Company fundamentals from annual reports.
//!
//! This crate re-exports the core types, the provider implementations and the
//! report insights pipeline, and provides a [`FundamentalsClient`] that turns a
//! company name into its normalized income statement and balance sheet.
//!
//! # Features
//!
//! - `alphavantage` - Alpha Vantage symbol search and statements
//! - `insights` - Passage retrieval and language-model report summaries

// Core types and traits
pub use fundamentals_core::*;

// Providers
#[cfg(feature = "alphavantage")]
pub use fundamentals_alphavantage::AlphaVantageProvider;

#[cfg(feature = "insights")]
pub use fundamentals_insights as insights;

/// Process configuration.
pub mod config;
pub use config::AppConfig;

mod client;
pub use client::{CompanyFundamentals, FundamentalsClient, StatementPair};

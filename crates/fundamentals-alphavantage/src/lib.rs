#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/fundamentals/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Alpha Vantage fundamentals provider.
//!
//! This crate implements the fundamentals-core traits for the
//! [Alpha Vantage](https://www.alphavantage.co/documentation/) query API.
//!
//! # Usage
//!
//! ```rust,ignore
//! use fundamentals_alphavantage::AlphaVantageProvider;
//! use fundamentals_core::{PeriodType, StatementKind, StatementProvider, Symbol, SymbolSearchProvider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = AlphaVantageProvider::new("your_api_key");
//!
//!     let matches = provider.search_symbols("Infosys").await?;
//!     let records = provider
//!         .fetch_statement(&Symbol::new("INFY"), StatementKind::Income, PeriodType::Annual)
//!         .await?;
//!
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use fundamentals_core::{
    DataProvider, FundamentalsError, PeriodType, RawPeriodRecord, Result, StatementKind,
    StatementProvider, Symbol, SymbolCandidate, SymbolSearchProvider,
};
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::fmt;
use tracing::debug;

/// Alpha Vantage query endpoint.
const ALPHA_VANTAGE_URL: &str = "https://www.alphavantage.co/query";

/// Provider name used in errors and logs.
const PROVIDER_NAME: &str = "Alpha Vantage";

/// Longest slice of a response body quoted in error messages.
const BODY_EXCERPT_LEN: usize = 200;

/// Alpha Vantage data provider.
///
/// Provides access to:
/// - Annual and quarterly income statements
/// - Annual and quarterly balance sheets
/// - Symbol search across global listings
#[derive(Clone)]
pub struct AlphaVantageProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl fmt::Debug for AlphaVantageProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlphaVantageProvider")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl AlphaVantageProvider {
    /// Create a new Alpha Vantage provider with the given API key.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_client(Client::new(), api_key)
    }

    /// Create a new Alpha Vantage provider with a custom HTTP client.
    #[must_use]
    pub fn with_client(client: Client, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            base_url: ALPHA_VANTAGE_URL.to_string(),
        }
    }

    /// Point the provider at another endpoint (a proxy or a local stub).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Make a GET request for one query function and parse the JSON response.
    async fn get<T: DeserializeOwned>(
        &self,
        function: &str,
        params: &[(&str, &str)],
    ) -> Result<T> {
        debug!(function, "Alpha Vantage request");

        let mut query: Vec<(&str, &str)> = Vec::with_capacity(params.len() + 2);
        query.push(("function", function));
        query.extend_from_slice(params);
        query.push(("apikey", self.api_key.as_str()));

        let response = self
            .client
            .get(&self.base_url)
            .query(&query)
            .send()
            .await
            .map_err(|e| FundamentalsError::Network(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(FundamentalsError::RateLimited {
                provider: PROVIDER_NAME.to_string(),
                message: format!("HTTP {status}"),
            });
        }

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(FundamentalsError::ProviderUnavailable {
                provider: PROVIDER_NAME.to_string(),
                status: Some(status.as_u16()),
                message: excerpt(&text),
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| FundamentalsError::Network(e.to_string()))?;

        parse_body(&text)
    }
}

/// Parses a 200 response, turning Alpha Vantage's in-band error documents into errors.
fn parse_body<T: DeserializeOwned>(text: &str) -> Result<T> {
    let value: serde_json::Value = serde_json::from_str(text).map_err(|e| {
        FundamentalsError::MalformedPayload(format!("{e}: {}", excerpt(text)))
    })?;

    if let Some(message) = value.get("Error Message").and_then(|m| m.as_str()) {
        return Err(FundamentalsError::ProviderUnavailable {
            provider: PROVIDER_NAME.to_string(),
            status: None,
            message: message.to_string(),
        });
    }

    // Quota messages arrive as "Note", or as "Information" alongside invalid-key
    // and premium-endpoint notices, all with a 200 status.
    if let Some(message) = value.get("Note").and_then(|m| m.as_str()) {
        return Err(FundamentalsError::RateLimited {
            provider: PROVIDER_NAME.to_string(),
            message: message.to_string(),
        });
    }

    if let Some(message) = value.get("Information").and_then(|m| m.as_str()) {
        return Err(if is_rate_limit_notice(message) {
            FundamentalsError::RateLimited {
                provider: PROVIDER_NAME.to_string(),
                message: message.to_string(),
            }
        } else {
            FundamentalsError::ProviderUnavailable {
                provider: PROVIDER_NAME.to_string(),
                status: None,
                message: message.to_string(),
            }
        });
    }

    serde_json::from_value(value).map_err(|e| {
        FundamentalsError::MalformedPayload(format!("{e}: {}", excerpt(text)))
    })
}

fn is_rate_limit_notice(message: &str) -> bool {
    let message = message.to_lowercase();
    message.contains("rate limit") || message.contains("call frequency")
}

fn excerpt(text: &str) -> String {
    match text.char_indices().nth(BODY_EXCERPT_LEN) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

const fn statement_function(kind: StatementKind) -> &'static str {
    match kind {
        StatementKind::Income => "INCOME_STATEMENT",
        StatementKind::BalanceSheet => "BALANCE_SHEET",
    }
}

impl DataProvider for AlphaVantageProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn description(&self) -> &str {
        "Alpha Vantage - Fundamental data and global symbol search"
    }
}

#[async_trait]
impl StatementProvider for AlphaVantageProvider {
    async fn fetch_statement(
        &self,
        symbol: &Symbol,
        kind: StatementKind,
        period_type: PeriodType,
    ) -> Result<Vec<RawPeriodRecord>> {
        let response: AvStatementResponse = self
            .get(statement_function(kind), &[("symbol", symbol.as_str())])
            .await?;

        let records = match period_type {
            PeriodType::Annual => response.annual_reports,
            PeriodType::Quarterly => response.quarterly_reports,
        };

        debug!(
            symbol = %symbol,
            statement = %kind,
            period = %period_type,
            records = records.len(),
            "Fetched statement"
        );

        Ok(records)
    }
}

#[async_trait]
impl SymbolSearchProvider for AlphaVantageProvider {
    async fn search_symbols(&self, keywords: &str) -> Result<Vec<SymbolCandidate>> {
        let response: AvSearchResponse = self
            .get("SYMBOL_SEARCH", &[("keywords", keywords)])
            .await?;

        debug!(
            keywords,
            candidates = response.best_matches.len(),
            "Symbol search"
        );

        Ok(response
            .best_matches
            .into_iter()
            .map(AvSymbolMatch::into_candidate)
            .collect())
    }
}

// ============================================================================
// Alpha Vantage API Response Types
// ============================================================================

/// INCOME_STATEMENT / BALANCE_SHEET response. An unknown symbol yields `{}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AvStatementResponse {
    #[serde(default)]
    annual_reports: Vec<RawPeriodRecord>,
    #[serde(default)]
    quarterly_reports: Vec<RawPeriodRecord>,
}

/// SYMBOL_SEARCH response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AvSearchResponse {
    #[serde(default)]
    best_matches: Vec<AvSymbolMatch>,
}

/// One SYMBOL_SEARCH match; keys are numbered.
#[derive(Debug, Clone, Deserialize)]
struct AvSymbolMatch {
    #[serde(rename = "1. symbol")]
    symbol: String,
    #[serde(rename = "2. name", default)]
    name: String,
    #[serde(rename = "4. region")]
    region: String,
    #[serde(rename = "8. currency")]
    currency: Option<String>,
}

impl AvSymbolMatch {
    fn into_candidate(self) -> SymbolCandidate {
        let candidate = SymbolCandidate::new(self.symbol, self.name, self.region);
        match self.currency {
            Some(currency) => candidate.with_currency(currency),
            None => candidate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_metadata() {
        let provider = AlphaVantageProvider::new("test_key");
        assert_eq!(provider.name(), "Alpha Vantage");
        assert!(!provider.description().is_empty());
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let provider = AlphaVantageProvider::new("secret_key_12345");
        let debug_str = format!("{:?}", provider);
        assert!(!debug_str.contains("secret_key_12345"));
        assert!(debug_str.contains("[REDACTED]"));
    }

    #[test]
    fn test_statement_functions() {
        assert_eq!(statement_function(StatementKind::Income), "INCOME_STATEMENT");
        assert_eq!(statement_function(StatementKind::BalanceSheet), "BALANCE_SHEET");
    }

    #[test]
    fn test_parse_statement() {
        let body = r#"{
            "symbol": "INFY",
            "annualReports": [
                {"fiscalDateEnding": "2024-03-31", "totalRevenue": "1536700000000", "ebitda": "None"}
            ],
            "quarterlyReports": []
        }"#;
        let response: AvStatementResponse = parse_body(body).unwrap();
        assert_eq!(response.annual_reports.len(), 1);
        assert!(response.quarterly_reports.is_empty());
        assert_eq!(
            response.annual_reports[0].text("fiscalDateEnding"),
            Some("2024-03-31")
        );
    }

    #[test]
    fn test_parse_empty_statement() {
        let response: AvStatementResponse = parse_body("{}").unwrap();
        assert!(response.annual_reports.is_empty());
    }

    #[test]
    fn test_parse_search() {
        let body = r#"{"bestMatches": [
            {"1. symbol": "INFY.BSE", "2. name": "Infosys Limited", "3. type": "Equity",
             "4. region": "India/Bombay", "8. currency": "INR", "9. matchScore": "0.6154"}
        ]}"#;
        let response: AvSearchResponse = parse_body(body).unwrap();
        let candidate = response.best_matches[0].clone().into_candidate();
        assert_eq!(candidate.symbol, "INFY.BSE");
        assert_eq!(candidate.region, "India/Bombay");
        assert_eq!(candidate.currency.as_deref(), Some("INR"));
    }

    #[test]
    fn test_in_band_errors() {
        let err = parse_body::<AvSearchResponse>(r#"{"Error Message": "Invalid API call."}"#)
            .unwrap_err();
        assert!(matches!(
            err,
            FundamentalsError::ProviderUnavailable { status: None, .. }
        ));

        let err = parse_body::<AvSearchResponse>(
            r#"{"Information": "Our standard API rate limit is 25 requests per day."}"#,
        )
        .unwrap_err();
        assert!(matches!(err, FundamentalsError::RateLimited { .. }));

        let err = parse_body::<AvSearchResponse>(
            r#"{"Note": "Thank you for using Alpha Vantage! Our standard API call frequency is 5 calls per minute."}"#,
        )
        .unwrap_err();
        assert!(matches!(err, FundamentalsError::RateLimited { .. }));
    }

    #[test]
    fn test_information_notices_are_not_rate_limits() {
        for body in [
            r#"{"Information": "The **demo** API key is for demo purposes only. Please claim your free API key."}"#,
            r#"{"Information": "Thank you for using Alpha Vantage! This is a premium endpoint."}"#,
        ] {
            let err = parse_body::<AvStatementResponse>(body).unwrap_err();
            assert!(
                matches!(
                    err,
                    FundamentalsError::ProviderUnavailable { status: None, .. }
                ),
                "{body}"
            );
        }
    }

    #[test]
    fn test_malformed_body() {
        let err = parse_body::<AvStatementResponse>("<html>busy</html>").unwrap_err();
        assert!(err.is_malformed());

        let err =
            parse_body::<AvStatementResponse>(r#"{"annualReports": [{"totalRevenue": [1]}]}"#)
                .unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn test_excerpt_truncates() {
        let long = "x".repeat(500);
        let short = excerpt(&long);
        assert_eq!(short.len(), BODY_EXCERPT_LEN + 3);
        assert_eq!(excerpt("short"), "short");
    }
}

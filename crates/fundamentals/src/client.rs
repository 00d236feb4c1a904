//! Company name to ticker to normalized statements.

use std::sync::Arc;

use tracing::{Level, debug, error, info, warn};

use fundamentals_core::{
    CompanyQuery, FundamentalsError, Lookup, NormalizedStatement, PeriodType, StatementKind,
    StatementManifest, StatementProvider, Symbol, SymbolSearchProvider, TargetMarket, TickerMatch,
    normalize, resolve_ticker,
};

use crate::config::AppConfig;

/// Income statement and balance sheet of one symbol, fetched independently.
#[derive(Debug)]
pub struct StatementPair {
    /// Income statement lookup.
    pub income: Lookup<NormalizedStatement>,
    /// Balance sheet lookup.
    pub balance_sheet: Lookup<NormalizedStatement>,
}

impl StatementPair {
    /// Returns the lookup for `kind`.
    #[must_use]
    pub const fn get(&self, kind: StatementKind) -> &Lookup<NormalizedStatement> {
        match kind {
            StatementKind::Income => &self.income,
            StatementKind::BalanceSheet => &self.balance_sheet,
        }
    }
}

/// Everything known about one company after a full lookup.
#[derive(Debug)]
pub struct CompanyFundamentals {
    /// The company name that was searched.
    pub query: CompanyQuery,
    /// Ticker resolution outcome.
    pub ticker: Lookup<TickerMatch>,
    /// Statements, present only when a ticker was found.
    pub statements: Option<StatementPair>,
}

/// Fundamentals client over a symbol search provider and a statement provider.
///
/// Every lookup returns a [`Lookup`]; provider failures are logged here and
/// never abort the caller.
///
/// # Example
///
/// ```rust,ignore
/// use fundamentals::{AppConfig, CompanyQuery, FundamentalsClient, StatementKind};
///
/// let client = FundamentalsClient::alpha_vantage(&AppConfig::from_env()?);
/// let query = CompanyQuery::new("Infosys")?;
/// if let Some(ticker) = client.resolve_ticker(&query).await.into_option() {
///     let income = client.fetch_statement(&ticker.symbol, StatementKind::Income).await;
/// }
/// ```
pub struct FundamentalsClient {
    search: Arc<dyn SymbolSearchProvider>,
    statements: Arc<dyn StatementProvider>,
    target_market: TargetMarket,
    period_window: usize,
    period_type: PeriodType,
}

impl std::fmt::Debug for FundamentalsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FundamentalsClient")
            .field("search", &self.search.name())
            .field("statements", &self.statements.name())
            .field("target_market", &self.target_market)
            .field("period_window", &self.period_window)
            .field("period_type", &self.period_type)
            .finish()
    }
}

impl FundamentalsClient {
    /// Create a client over the given providers.
    #[must_use]
    pub fn new(
        config: &AppConfig,
        search: Arc<dyn SymbolSearchProvider>,
        statements: Arc<dyn StatementProvider>,
    ) -> Self {
        debug!(
            search = search.name(),
            statements = statements.name(),
            "Creating fundamentals client"
        );
        Self {
            search,
            statements,
            target_market: config.target_market.clone(),
            period_window: config.period_window.max(1),
            period_type: config.period_type,
        }
    }

    /// Create a client backed by Alpha Vantage for both search and statements.
    #[cfg(feature = "alphavantage")]
    #[must_use]
    pub fn alpha_vantage(config: &AppConfig) -> Self {
        let provider = Arc::new(fundamentals_alphavantage::AlphaVantageProvider::new(
            config.fundamentals_api_key.clone(),
        ));
        Self::new(config, provider.clone(), provider)
    }

    /// The region listings must be in.
    #[must_use]
    pub const fn target_market(&self) -> &TargetMarket {
        &self.target_market
    }

    /// Resolves the company to its listing in the target market.
    pub async fn resolve_ticker(&self, query: &CompanyQuery) -> Lookup<TickerMatch> {
        debug!(
            provider = self.search.name(),
            query = %query,
            "Searching symbols"
        );

        match self.search.search_symbols(query.as_str()).await {
            Ok(candidates) => resolve_ticker(&candidates, &self.target_market).into(),
            Err(e) => {
                log_failure(self.search.name(), "symbol search", &e);
                Lookup::Failed(e)
            }
        }
    }

    /// Fetches and normalizes one statement.
    ///
    /// An empty provider answer is [`Lookup::NotFound`]; records that exist but
    /// all fail extraction are a malformed payload.
    pub async fn fetch_statement(
        &self,
        symbol: &Symbol,
        kind: StatementKind,
    ) -> Lookup<NormalizedStatement> {
        debug!(
            provider = self.statements.name(),
            symbol = %symbol,
            statement = %kind,
            period_type = %self.period_type,
            "Fetching statement"
        );

        let records = match self
            .statements
            .fetch_statement(symbol, kind, self.period_type)
            .await
        {
            Ok(records) => records,
            Err(e) => {
                log_failure(self.statements.name(), kind.title(), &e);
                return Lookup::Failed(e);
            }
        };

        if records.is_empty() {
            info!(symbol = %symbol, statement = %kind, "No statement data available");
            return Lookup::NotFound;
        }

        let manifest = StatementManifest::for_kind(kind);
        match normalize(&records, &manifest, self.period_window) {
            Some(statement) => Lookup::Found(statement),
            None => {
                let e = FundamentalsError::MalformedPayload(format!(
                    "{} for {symbol}: none of {} periods could be read",
                    kind.title(),
                    records.len()
                ));
                log_failure(self.statements.name(), kind.title(), &e);
                Lookup::Failed(e)
            }
        }
    }

    /// Fetches both statements; a failure in one does not affect the other.
    pub async fn fetch_statements(&self, symbol: &Symbol) -> StatementPair {
        let income = self.fetch_statement(symbol, StatementKind::Income).await;
        let balance_sheet = self
            .fetch_statement(symbol, StatementKind::BalanceSheet)
            .await;
        StatementPair {
            income,
            balance_sheet,
        }
    }

    /// Resolves the ticker, then fetches both statements when one was found.
    pub async fn analyze(&self, query: &CompanyQuery) -> CompanyFundamentals {
        let ticker = self.resolve_ticker(query).await;
        let statements = match ticker.found() {
            Some(found) => Some(self.fetch_statements(&found.symbol).await),
            None => None,
        };
        CompanyFundamentals {
            query: query.clone(),
            ticker,
            statements,
        }
    }
}

/// Log level for a failed lookup: transport failures are errors, unusable
/// payloads are warnings.
fn failure_level(e: &FundamentalsError) -> Level {
    match (e.is_transport(), e.is_malformed()) {
        (false, true) => Level::WARN,
        _ => Level::ERROR,
    }
}

fn log_failure(provider: &str, operation: &str, e: &FundamentalsError) {
    if failure_level(e) == Level::WARN {
        warn!(provider, operation, error = %e, "Unusable provider response");
    } else {
        error!(provider, operation, error = %e, "Provider request failed");
    }
}

//! Ticker resolution.
//!
//! Picks, from a provider's symbol-search results, the first listing whose
//! region is exactly the target market. Candidates are scanned in provider
//! order with no secondary ranking.

use tracing::{debug, info};

use crate::types::{Symbol, SymbolCandidate, TargetMarket, TickerMatch};

/// Strips an exchange suffix: `INFY.BSE` becomes `INFY`.
#[must_use]
pub fn strip_exchange_suffix(symbol: &str) -> &str {
    symbol.split('.').next().unwrap_or(symbol)
}

/// Returns the first candidate listed in `market`, suffix stripped.
#[must_use]
pub fn resolve_ticker(
    candidates: &[SymbolCandidate],
    market: &TargetMarket,
) -> Option<TickerMatch> {
    let found = candidates
        .iter()
        .find(|c| c.region == market.as_str())
        .map(|c| TickerMatch {
            symbol: Symbol::new(strip_exchange_suffix(&c.symbol)),
            region: c.region.clone(),
        });

    match &found {
        Some(m) => debug!(symbol = %m.symbol, market = %market, "Resolved ticker"),
        None => info!(
            candidates = candidates.len(),
            market = %market,
            "No symbol found for target market"
        ),
    }

    found
}

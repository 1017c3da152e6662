//! Price history loading shared by the simulation use cases.

use std::collections::{BTreeMap, BTreeSet};

use crate::application::ports::MarketDataPort;
use crate::application::services::PriceHistoryService;
use crate::config::MarketDataConfig;
use crate::domain::decision::Decision;
use crate::domain::portfolio::Portfolio;
use crate::domain::shared::Ticker;
use crate::domain::simulation::ReturnHistorySet;

/// Return histories for a request, with what could not be fetched.
#[derive(Debug, Clone)]
pub(crate) struct MarketInputs {
    pub histories: ReturnHistorySet,
    pub coverage: f64,
    pub failed_tickers: BTreeMap<String, String>,
}

/// Fetch every held ticker plus every ticker the decision trades.
pub(crate) async fn load<M: MarketDataPort>(
    prices: &PriceHistoryService<M>,
    config: &MarketDataConfig,
    portfolio: &Portfolio,
    decision: &Decision,
) -> MarketInputs {
    let tickers: BTreeSet<&Ticker> = portfolio
        .tickers()
        .chain(decision.actions().iter().map(|action| &action.symbol))
        .collect();

    let table = prices
        .fetch_prices(tickers, config.lookback_days, config.interval)
        .await;

    MarketInputs {
        histories: ReturnHistorySet::from_price_table(&table),
        coverage: table.coverage(portfolio),
        failed_tickers: table
            .failures()
            .iter()
            .map(|(ticker, error)| (ticker.to_string(), error.to_string()))
            .collect(),
    }
}

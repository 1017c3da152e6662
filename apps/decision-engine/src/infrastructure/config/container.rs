//! Dependency Injection Container
//!
//! Manages creation and wiring of all application components.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::application::dto::{
    EvaluateDecisionRequest, EvaluateDecisionResponse, MoatsResponse, RunMoatsRequest,
    StoredEvaluation, TaxImpactRequest,
};
use crate::application::ports::{MarketDataPort, PortfolioStorePort};
use crate::application::services::CachedMarketData;
use crate::application::use_cases::{
    ComputeTaxImpactUseCase, EvaluateDecisionUseCase, ParseDecisionUseCase, RunMoatsUseCase,
};
use crate::config::{Config, ConfigError, validate_config};
use crate::domain::decision::Decision;
use crate::domain::portfolio::{Portfolio, PortfolioError, Position};
use crate::domain::simulation::PathSimulator;
use crate::domain::tax::{TaxEngine, TaxImpact};
use crate::domain::temporal::TemporalDecisionEngine;
use crate::error::EngineError;

/// Dependency injection container.
///
/// Holds the validated configuration, the cached market data port, the
/// portfolio store and the shared decision engine. Use cases are built on
/// demand and share those components.
pub struct Container<M, S>
where
    M: MarketDataPort + 'static,
    S: PortfolioStorePort + 'static,
{
    config: Config,
    market_data: Arc<CachedMarketData<M>>,
    portfolio_store: Arc<S>,
    engine: Arc<TemporalDecisionEngine>,
}

impl<M, S> Container<M, S>
where
    M: MarketDataPort + 'static,
    S: PortfolioStorePort + 'static,
{
    /// Create a container from a configuration and the driven adapters.
    ///
    /// `market_data` is wrapped in a read-through cache with the configured TTL.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` when `config` is invalid.
    pub fn new(config: Config, market_data: M, portfolio_store: Arc<S>) -> Result<Self, ConfigError> {
        validate_config(&config)?;

        let engine = TemporalDecisionEngine::new(PathSimulator::default(), config.verdict);
        let market_data = CachedMarketData::new(market_data, config.market_data.cache_ttl());

        info!(
            n_paths = config.simulation.n_paths,
            horizon_days = config.simulation.horizon_days,
            cache_ttl_secs = config.market_data.cache_ttl_secs,
            "Decision engine container ready"
        );

        Ok(Self {
            config,
            market_data: Arc::new(market_data),
            portfolio_store,
            engine: Arc::new(engine),
        })
    }

    /// Get the configuration.
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Get the cached market data port.
    pub fn market_data(&self) -> Arc<CachedMarketData<M>> {
        Arc::clone(&self.market_data)
    }

    /// Get the portfolio store port.
    pub fn portfolio_store(&self) -> Arc<S> {
        Arc::clone(&self.portfolio_store)
    }

    /// Get the decision engine.
    pub fn engine(&self) -> Arc<TemporalDecisionEngine> {
        Arc::clone(&self.engine)
    }

    /// Create a `ParseDecisionUseCase`.
    pub fn parse_decision_use_case(&self) -> ParseDecisionUseCase {
        ParseDecisionUseCase::default()
    }

    /// Create an `EvaluateDecisionUseCase`.
    pub fn evaluate_decision_use_case(&self) -> EvaluateDecisionUseCase<CachedMarketData<M>> {
        EvaluateDecisionUseCase::new(
            Arc::clone(&self.market_data),
            Arc::clone(&self.engine),
            self.config.simulation.clone(),
            self.config.market_data.clone(),
        )
    }

    /// Create a `ComputeTaxImpactUseCase`.
    pub const fn compute_tax_impact_use_case(&self) -> ComputeTaxImpactUseCase {
        ComputeTaxImpactUseCase::new(TaxEngine::new())
    }

    /// Create a `RunMoatsUseCase`.
    pub fn run_moats_use_case(&self) -> RunMoatsUseCase<CachedMarketData<M>> {
        RunMoatsUseCase::new(
            Arc::clone(&self.market_data),
            Arc::clone(&self.engine),
            self.config.simulation.clone(),
            self.config.market_data.clone(),
            self.config.moats,
        )
    }

    /// Build a portfolio under the configured weight policy.
    ///
    /// # Errors
    ///
    /// Returns the violated portfolio invariant.
    pub fn build_portfolio(
        &self,
        positions: Vec<Position>,
        total_value: Decimal,
        base_currency: impl Into<String>,
    ) -> Result<Portfolio, PortfolioError> {
        Portfolio::new(
            positions,
            total_value,
            base_currency,
            self.config.portfolio.weight_policy,
        )
    }

    /// Parse free text, optionally in the context of a portfolio.
    pub fn parse_decision(&self, text: &str, portfolio: Option<&Portfolio>) -> Decision {
        self.parse_decision_use_case().execute(text, portfolio)
    }

    /// Simulate a decision against its baseline.
    ///
    /// # Errors
    ///
    /// See [`EvaluateDecisionUseCase::execute`].
    pub async fn evaluate_decision(
        &self,
        request: EvaluateDecisionRequest,
    ) -> Result<EvaluateDecisionResponse, EngineError> {
        self.evaluate_decision_use_case().execute(request).await
    }

    /// Tax on one realized gain or loss.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedJurisdiction` for an unknown code in a taxable account.
    pub fn compute_tax_impact(&self, request: &TaxImpactRequest) -> Result<TaxImpact, EngineError> {
        self.compute_tax_impact_use_case().execute(request)
    }

    /// Run every moat.
    ///
    /// # Errors
    ///
    /// See [`RunMoatsUseCase::execute`].
    pub async fn run_moats(&self, request: RunMoatsRequest) -> Result<MoatsResponse, EngineError> {
        self.run_moats_use_case().execute(request).await
    }

    /// Read a stored portfolio, parse `text` against it and evaluate the result.
    ///
    /// # Errors
    ///
    /// - `PortfolioNotFound` / `StoreUnavailable` from the store
    /// - anything [`EvaluateDecisionUseCase::execute`] returns
    pub async fn evaluate_stored(
        &self,
        portfolio_id: &str,
        text: &str,
        seed: Option<u64>,
        return_paths: bool,
    ) -> Result<StoredEvaluation, EngineError> {
        let portfolio = self.portfolio_store.get(portfolio_id).await?;
        let decision = self.parse_decision(text, Some(&portfolio));

        debug!(
            portfolio_id,
            decision_type = decision.decision_type().as_str(),
            confidence = decision.confidence_score(),
            "Parsed decision for stored portfolio"
        );

        let mut request = EvaluateDecisionRequest::new(portfolio, decision.clone());
        request.seed = seed;
        request.return_paths = return_paths;

        let response = self.evaluate_decision(request).await?;

        Ok(StoredEvaluation {
            portfolio_id: portfolio_id.to_string(),
            decision,
            response,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{InMemoryPortfolioStore, PortfolioSet};
    use crate::domain::decision::DecisionType;
    use crate::domain::portfolio::WeightPolicy;
    use crate::error::ErrorCode;
    use crate::infrastructure::marketdata::InMemoryMarketData;
    use rust_decimal_macros::dec;

    const TICKERS: [&str; 3] = ["AAPL", "JPM", "XOM"];

    fn config() -> Config {
        let mut config = Config::default();
        config.simulation.n_paths = 200;
        config.simulation.horizon_days = 60;
        config
    }

    fn store() -> Arc<InMemoryPortfolioStore> {
        let portfolio = Portfolio::new(
            vec![
                Position::new("AAPL", 0.5),
                Position::new("JPM", 0.3),
                Position::new("XOM", 0.2),
            ],
            dec!(250000),
            "USD",
            WeightPolicy::Reject,
        )
        .unwrap();
        let mut set = PortfolioSet::new();
        set.insert("core".to_string(), portfolio);
        Arc::new(InMemoryPortfolioStore::with_portfolios(set))
    }

    fn container() -> Container<InMemoryMarketData, InMemoryPortfolioStore> {
        Container::new(config(), InMemoryMarketData::synthetic(TICKERS, 400, 5), store()).unwrap()
    }

    #[test]
    fn rejects_invalid_config() {
        let mut config = config();
        config.simulation.n_paths = 0;
        let result = Container::new(config, InMemoryMarketData::new(), store());
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn builds_portfolios_with_configured_policy() {
        let container = container();
        let portfolio = container
            .build_portfolio(
                vec![Position::new("AAPL", 2.0), Position::new("JPM", 2.0)],
                dec!(1000),
                "USD",
            )
            .unwrap();
        assert!((portfolio.weight_of(&"AAPL".into()) - 0.5).abs() < 1e-12);
    }

    #[tokio::test]
    async fn evaluates_stored_portfolio() {
        let container = container();
        let result = container
            .evaluate_stored("core", "What if rates rise 1%?", Some(9), false)
            .await
            .unwrap();

        assert_eq!(result.portfolio_id, "core");
        assert_eq!(result.decision.decision_type(), DecisionType::MarketShock);
        assert_eq!(result.response.decision_type, DecisionType::MarketShock);
        assert!((result.response.coverage - 1.0).abs() < 1e-12);
        assert!(result.response.failed_tickers.is_empty());
        assert!(result.response.evaluation.baseline_paths.is_none());
        assert!(!result.response.request_id.is_empty());
    }

    #[tokio::test]
    async fn repeated_evaluations_hit_the_cache() {
        let container = container();
        container
            .evaluate_stored("core", "buy JPM 5%", Some(1), false)
            .await
            .unwrap();
        assert_eq!(container.market_data().len(), TICKERS.len());

        let second = container
            .evaluate_stored("core", "buy JPM 5%", Some(1), false)
            .await
            .unwrap();
        assert_eq!(container.market_data().len(), TICKERS.len());
        assert_eq!(second.decision.decision_type(), DecisionType::TradeAction);
    }

    #[tokio::test]
    async fn unknown_portfolio_is_not_found() {
        let err = container()
            .evaluate_stored("missing", "What if rates rise 1%?", None, false)
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::PortfolioNotFound);
        assert_eq!(err.code().http_status(), 404);
    }
}

//! Evaluate Decision Use Case

use std::sync::Arc;
use std::time::Instant;

use tokio::time::timeout;
use tracing::{info, warn};

use super::market_inputs;
use crate::application::dto::{EvaluateDecisionRequest, EvaluateDecisionResponse};
use crate::application::ports::MarketDataPort;
use crate::application::services::PriceHistoryService;
use crate::config::{MarketDataConfig, SimulationConfig};
use crate::domain::simulation::SimulationParams;
use crate::domain::temporal::TemporalDecisionEngine;
use crate::error::EngineError;
use crate::observability::{record_evaluation, record_simulation};

/// Use case for simulating a decision against its baseline.
pub struct EvaluateDecisionUseCase<M>
where
    M: MarketDataPort,
{
    prices: PriceHistoryService<M>,
    engine: Arc<TemporalDecisionEngine>,
    simulation: SimulationConfig,
    market_data: MarketDataConfig,
}

impl<M> EvaluateDecisionUseCase<M>
where
    M: MarketDataPort,
{
    /// Create a new EvaluateDecisionUseCase.
    pub fn new(
        market_data_port: Arc<M>,
        engine: Arc<TemporalDecisionEngine>,
        simulation: SimulationConfig,
        market_data: MarketDataConfig,
    ) -> Self {
        Self {
            prices: PriceHistoryService::new(market_data_port, market_data.fetch_timeout()),
            engine,
            simulation,
            market_data,
        }
    }

    /// Execute the use case within the configured request budget.
    ///
    /// # Errors
    ///
    /// - `InvalidRequest` for a zero horizon or path count
    /// - `InsufficientCoverage` when too little portfolio weight has history
    /// - `RequestTimeout` when the budget elapses
    pub async fn execute(
        &self,
        request: EvaluateDecisionRequest,
    ) -> Result<EvaluateDecisionResponse, EngineError> {
        let started = Instant::now();

        let response = timeout(self.market_data.request_timeout(), self.run(request))
            .await
            .map_err(|_| {
                warn!(
                    timeout_ms = self.market_data.request_timeout_ms,
                    "Evaluation exceeded request budget"
                );
                EngineError::request_timeout(self.market_data.request_timeout_ms)
            })??;

        record_evaluation(
            response.evaluation.verdict.verdict.as_str(),
            started.elapsed().as_secs_f64(),
        );
        Ok(response)
    }

    async fn run(
        &self,
        request: EvaluateDecisionRequest,
    ) -> Result<EvaluateDecisionResponse, EngineError> {
        let params = self.params_for(&request)?;
        let request_id = uuid::Uuid::new_v4().to_string();

        let inputs =
            market_inputs::load(&self.prices, &self.market_data, &request.portfolio, &request.decision)
                .await;

        if inputs.coverage < self.market_data.min_coverage {
            warn!(
                coverage = inputs.coverage,
                required = self.market_data.min_coverage,
                failed = inputs.failed_tickers.len(),
                "Insufficient price coverage"
            );
            return Err(EngineError::insufficient_coverage(
                inputs.coverage,
                self.market_data.min_coverage,
            ));
        }

        let EvaluateDecisionRequest {
            portfolio,
            decision,
            return_paths,
            ..
        } = request;
        let decision_type = decision.decision_type();
        let engine = Arc::clone(&self.engine);
        let histories = inputs.histories;

        let evaluation = tokio::task::spawn_blocking(move || {
            let started = Instant::now();
            let evaluation = engine.evaluate(&portfolio, &decision, &histories, &params, return_paths);
            record_simulation("pair", params.n_paths, started.elapsed().as_secs_f64());
            evaluation
        })
        .await?;

        info!(
            request_id = %request_id,
            decision_type = decision_type.as_str(),
            verdict = %evaluation.verdict.verdict,
            coverage = inputs.coverage,
            "Evaluation complete"
        );

        Ok(EvaluateDecisionResponse {
            request_id,
            decision_type,
            evaluation,
            coverage: inputs.coverage,
            failed_tickers: inputs.failed_tickers,
        })
    }

    fn params_for(&self, request: &EvaluateDecisionRequest) -> Result<SimulationParams, EngineError> {
        let mut params = self.simulation.params(request.seed);
        if let Some(horizon_days) = request.horizon_days {
            params = params.with_horizon(horizon_days);
        }
        if let Some(n_paths) = request.n_paths {
            params = params.with_paths(n_paths);
        }

        if params.horizon_days == 0 {
            return Err(EngineError::invalid_request("horizon_days must be positive"));
        }
        if params.n_paths == 0 {
            return Err(EngineError::invalid_request("n_paths must be positive"));
        }
        Ok(params)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::domain::decision::{Decision, MarketShock, ShockType, ShockUnit};
    use crate::domain::market_data::{Interval, MarketDataError, PricePoint, PriceSeries};
    use crate::domain::portfolio::{Portfolio, Position, WeightPolicy};
    use crate::domain::shared::Ticker;
    use crate::domain::temporal::VerdictThresholds;
    use crate::error::ErrorCode;
    use async_trait::async_trait;
    use chrono::{Duration as ChronoDuration, TimeZone, Utc};
    use rust_decimal_macros::dec;

    mockall::mock! {
        pub Market {}

        #[async_trait]
        impl MarketDataPort for Market {
            async fn fetch_series(
                &self,
                ticker: &Ticker,
                lookback_days: u32,
                interval: Interval,
            ) -> Result<PriceSeries, MarketDataError>;
        }
    }

    fn series(ticker: &Ticker) -> PriceSeries {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let phase = ticker.as_str().len() as f64;
        let mut close = 100.0;
        let points = (0..120)
            .map(|i| {
                close *= 1.0 + 0.01 * (i as f64 * 0.7 + phase).sin() + 0.0003;
                PricePoint {
                    timestamp: start + ChronoDuration::days(i),
                    close,
                }
            })
            .collect();
        PriceSeries::new(ticker.clone(), Interval::OneDay, points)
    }

    fn portfolio() -> Portfolio {
        Portfolio::new(
            vec![
                Position::new("AAPL", 0.4),
                Position::new("JPM", 0.3),
                Position::new("XOM", 0.3),
            ],
            dec!(100000),
            "USD",
            WeightPolicy::Normalize,
        )
        .unwrap()
    }

    fn use_case(market: MockMarket) -> EvaluateDecisionUseCase<MockMarket> {
        EvaluateDecisionUseCase::new(
            Arc::new(market),
            Arc::new(TemporalDecisionEngine::new(
                Default::default(),
                VerdictThresholds::default(),
            )),
            SimulationConfig {
                n_paths: 200,
                ..Default::default()
            },
            MarketDataConfig::default(),
        )
    }

    fn rate_hike() -> Decision {
        Decision::new(
            vec![MarketShock {
                shock_type: ShockType::InterestRate,
                target: "policy_rate".to_string(),
                magnitude: 1.0,
                unit: ShockUnit::PercentagePoints,
            }],
            Vec::new(),
            0.75,
        )
    }

    #[tokio::test]
    async fn evaluates_with_full_coverage() {
        let mut market = MockMarket::new();
        market
            .expect_fetch_series()
            .times(3)
            .returning(|ticker, _, _| Ok(series(ticker)));

        let response = use_case(market)
            .execute(EvaluateDecisionRequest::new(portfolio(), rate_hike()).returning_paths())
            .await
            .unwrap();

        assert!((response.coverage - 1.0).abs() < 1e-12);
        assert!(response.failed_tickers.is_empty());
        assert!(response.evaluation.comparison.delta_return < 0.0);
        assert!(response.evaluation.baseline_paths.is_some());
    }

    #[tokio::test]
    async fn one_failed_ticker_above_threshold_still_evaluates() {
        let mut market = MockMarket::new();
        market.expect_fetch_series().returning(|ticker, _, _| {
            if ticker.as_str() == "XOM" {
                Err(MarketDataError::DataUnavailable {
                    message: "provider down".to_string(),
                })
            } else {
                Ok(series(ticker))
            }
        });

        let response = use_case(market)
            .execute(EvaluateDecisionRequest::new(portfolio(), rate_hike()))
            .await
            .unwrap();

        assert!((response.coverage - 0.7).abs() < 1e-9);
        assert!(response.failed_tickers.contains_key("XOM"));
    }

    #[tokio::test]
    async fn coverage_below_threshold_is_retryable_upstream_error() {
        let mut market = MockMarket::new();
        market.expect_fetch_series().returning(|ticker, _, _| {
            if ticker.as_str() == "AAPL" {
                Ok(series(ticker))
            } else {
                Err(MarketDataError::Timeout {
                    ticker: ticker.to_string(),
                    timeout_ms: 5000,
                })
            }
        });

        let Err(err) = use_case(market)
            .execute(EvaluateDecisionRequest::new(portfolio(), rate_hike()))
            .await
        else {
            panic!("expected insufficient coverage");
        };
        assert_eq!(err.code(), ErrorCode::InsufficientCoverage);
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn zero_paths_is_bad_input() {
        let market = MockMarket::new();

        let Err(err) = use_case(market)
            .execute(EvaluateDecisionRequest::new(portfolio(), rate_hike()).with_paths(0))
            .await
        else {
            panic!("expected invalid request");
        };
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    struct StalledMarket;

    #[async_trait]
    impl MarketDataPort for StalledMarket {
        async fn fetch_series(
            &self,
            ticker: &Ticker,
            _lookback_days: u32,
            _interval: Interval,
        ) -> Result<PriceSeries, MarketDataError> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(series(ticker))
        }
    }

    #[tokio::test]
    async fn request_budget_elapsing_is_a_timeout() {
        let use_case = EvaluateDecisionUseCase::new(
            Arc::new(StalledMarket),
            Arc::new(TemporalDecisionEngine::default()),
            SimulationConfig::default(),
            MarketDataConfig {
                fetch_timeout_ms: 10_000,
                request_timeout_ms: 50,
                ..Default::default()
            },
        );

        let Err(err) = use_case
            .execute(EvaluateDecisionRequest::new(portfolio(), rate_hike()))
            .await
        else {
            panic!("expected request timeout");
        };
        assert_eq!(err.code(), ErrorCode::RequestTimeout);
    }
}

//! Run Moats Use Case

use std::sync::Arc;

use tokio::time::timeout;
use tracing::{debug, warn};

use super::market_inputs;
use crate::application::dto::{MoatsResponse, RunMoatsRequest};
use crate::application::ports::MarketDataPort;
use crate::application::services::PriceHistoryService;
use crate::config::{MarketDataConfig, MoatsConfig, SimulationConfig};
use crate::domain::moats::{correlation_risk, tax_harvest, time_travel};
use crate::domain::tax::TaxEngine;
use crate::domain::temporal::TemporalDecisionEngine;
use crate::error::EngineError;
use crate::observability::record_moat;

/// Use case for the supplementary moat analyses.
///
/// Moats never fail on their own; only the request budget and task
/// failures surface as errors.
pub struct RunMoatsUseCase<M>
where
    M: MarketDataPort,
{
    prices: PriceHistoryService<M>,
    engine: Arc<TemporalDecisionEngine>,
    tax_engine: TaxEngine,
    simulation: SimulationConfig,
    market_data: MarketDataConfig,
    moats: MoatsConfig,
}

impl<M> RunMoatsUseCase<M>
where
    M: MarketDataPort,
{
    /// Create a new RunMoatsUseCase.
    pub fn new(
        market_data_port: Arc<M>,
        engine: Arc<TemporalDecisionEngine>,
        simulation: SimulationConfig,
        market_data: MarketDataConfig,
        moats: MoatsConfig,
    ) -> Self {
        Self {
            prices: PriceHistoryService::new(market_data_port, market_data.fetch_timeout()),
            engine,
            tax_engine: TaxEngine::new(),
            simulation,
            market_data,
            moats,
        }
    }

    /// Execute the use case within the configured request budget.
    ///
    /// # Errors
    ///
    /// - `InvalidRequest` for a zero horizon
    /// - `RequestTimeout` when the budget elapses
    pub async fn execute(&self, request: RunMoatsRequest) -> Result<MoatsResponse, EngineError> {
        timeout(self.market_data.request_timeout(), self.run(request))
            .await
            .map_err(|_| {
                warn!(
                    timeout_ms = self.market_data.request_timeout_ms,
                    "Moat analysis exceeded request budget"
                );
                EngineError::request_timeout(self.market_data.request_timeout_ms)
            })?
    }

    async fn run(&self, request: RunMoatsRequest) -> Result<MoatsResponse, EngineError> {
        let mut params = self.simulation.params(request.seed);
        if let Some(horizon_days) = request.horizon_days {
            params = params.with_horizon(horizon_days);
        }
        if params.horizon_days == 0 {
            return Err(EngineError::invalid_request("horizon_days must be positive"));
        }

        let tax_harvest = tax_harvest::detect(
            &request.portfolio,
            Some(&request.decision),
            &request.tax_profile,
            &request.tax_context,
            &self.tax_engine,
            &self.moats.tax_harvest,
        );

        let inputs =
            market_inputs::load(&self.prices, &self.market_data, &request.portfolio, &request.decision)
                .await;
        debug!(
            coverage = inputs.coverage,
            failed = inputs.failed_tickers.len(),
            "Moat inputs loaded"
        );

        let engine = Arc::clone(&self.engine);
        let settings = self.moats;
        let RunMoatsRequest {
            portfolio,
            decision,
            ..
        } = request;
        let histories = inputs.histories;

        let (time_travel, correlation_risk) = tokio::task::spawn_blocking(move || {
            rayon::join(
                || {
                    time_travel::replay(
                        &engine,
                        &portfolio,
                        &decision,
                        &histories,
                        &params,
                        &settings.time_travel,
                    )
                },
                || correlation_risk::assess(&portfolio, &histories, &settings.correlation),
            )
        })
        .await?;

        record_moat("time_travel", time_travel.applicable);
        record_moat("tax_harvest", tax_harvest.applicable);
        record_moat("correlation_risk", correlation_risk.applicable);

        Ok(MoatsResponse {
            time_travel,
            tax_harvest,
            correlation_risk,
        })
    }
}

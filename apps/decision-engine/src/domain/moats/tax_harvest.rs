//! Tax-loss harvesting detector.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::MoatResult;
use crate::domain::decision::{Decision, TradeDirection};
use crate::domain::portfolio::Portfolio;
use crate::domain::shared::Ticker;
use crate::domain::tax::{HoldingPeriod, PortfolioTaxContext, TaxEngine, TaxError, TaxProfile};

/// Eligibility thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxHarvestSettings {
    /// Minimum unrealized loss as a percentage of cost basis.
    pub min_loss_pct: f64,
    /// Minimum unrealized loss in base currency.
    pub min_loss_amount: Decimal,
    /// Days around a sale in which a repurchase disallows the loss.
    pub wash_sale_window_days: u32,
}

impl Default for TaxHarvestSettings {
    fn default() -> Self {
        Self {
            min_loss_pct: 10.0,
            min_loss_amount: dec!(100),
            wash_sale_window_days: 30,
        }
    }
}

/// A position whose loss could be realized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HarvestCandidate {
    /// Ticker.
    pub ticker: Ticker,
    /// Cost basis.
    pub cost_basis: Decimal,
    /// Current market value.
    pub market_value: Decimal,
    /// Unrealized loss (positive number).
    pub unrealized_loss: Decimal,
    /// Loss as a percentage of cost basis.
    pub loss_pct: f64,
    /// Holding period the loss would be realized under.
    pub holding_period: HoldingPeriod,
    /// Tax saved by realizing the loss; `None` when it cannot be computed.
    pub estimated_tax_benefit: Option<Decimal>,
    /// The decision repurchases this ticker inside the wash-sale window.
    pub wash_sale_risk: bool,
}

/// Harvestable losses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxHarvestReport {
    /// Eligible positions, largest loss first.
    pub eligible: Vec<HarvestCandidate>,
    /// Sum of eligible losses.
    pub total_harvestable_loss: Decimal,
    /// Sum of computable benefits.
    pub total_estimated_benefit: Decimal,
}

/// Scan positions for losses worth realizing.
#[must_use]
pub fn detect(
    portfolio: &Portfolio,
    decision: Option<&Decision>,
    profile: &TaxProfile,
    context: &PortfolioTaxContext,
    tax_engine: &TaxEngine,
    settings: &TaxHarvestSettings,
) -> MoatResult<TaxHarvestReport> {
    if !context.is_taxable() {
        return MoatResult::not_applicable(
            "account is tax-advantaged; realized losses carry no tax benefit",
        );
    }

    let mut unsupported: Option<TaxError> = None;
    let mut eligible: Vec<HarvestCandidate> = Vec::new();

    for position in portfolio.positions() {
        let Some(cost_basis) = position.cost_basis.filter(|c| *c > Decimal::ZERO) else {
            continue;
        };
        let market_value = portfolio.market_value(position);
        let unrealized_loss = cost_basis - market_value;
        if unrealized_loss <= Decimal::ZERO {
            continue;
        }

        let loss_pct = (unrealized_loss / cost_basis * dec!(100)).to_f64().unwrap_or(0.0);
        if loss_pct < settings.min_loss_pct || unrealized_loss < settings.min_loss_amount {
            continue;
        }

        let holding_period = position
            .days_held
            .and_then(|days| tax_engine.classify_holding(&profile.jurisdiction, days).ok())
            .unwrap_or(context.holding_period);

        let estimated_tax_benefit = match tax_engine.compute(
            profile,
            &PortfolioTaxContext::taxable(holding_period),
            -unrealized_loss,
        ) {
            Ok(impact) => Some(-impact.total),
            Err(err) => {
                unsupported = Some(err);
                None
            }
        };

        eligible.push(HarvestCandidate {
            ticker: position.ticker.clone(),
            cost_basis,
            market_value,
            unrealized_loss,
            loss_pct,
            holding_period,
            estimated_tax_benefit,
            wash_sale_risk: repurchases_within(decision, &position.ticker, settings.wash_sale_window_days),
        });
    }

    if eligible.is_empty() {
        return MoatResult::not_applicable(format!(
            "no position has an unrealized loss of at least {}% and {}",
            settings.min_loss_pct, settings.min_loss_amount
        ));
    }

    eligible.sort_by(|a, b| b.unrealized_loss.cmp(&a.unrealized_loss));
    let report = TaxHarvestReport {
        total_harvestable_loss: eligible.iter().map(|c| c.unrealized_loss).sum(),
        total_estimated_benefit: eligible
            .iter()
            .filter_map(|c| c.estimated_tax_benefit)
            .sum(),
        eligible,
    };

    let mut reason = format!(
        "{} position(s) with {} of harvestable losses",
        report.eligible.len(),
        report.total_harvestable_loss
    );
    if let Some(err) = unsupported {
        reason.push_str(&format!("; tax benefit not estimated: {err}"));
    }

    MoatResult::applicable(reason, report)
}

fn repurchases_within(decision: Option<&Decision>, ticker: &Ticker, window_days: u32) -> bool {
    decision.is_some_and(|decision| {
        decision.actions().iter().any(|action| {
            action.direction == TradeDirection::Buy
                && &action.symbol == ticker
                && action.execution_offset_days() <= window_days
        })
    })
}

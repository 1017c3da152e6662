//! Integration tests for the decision engine.
//!
//! These tests drive the public API end to end: free text through the
//! parser, simulation against synthetic price history, layered tax and the
//! supplementary moats.

use std::sync::Arc;

use decision_engine::{
    AccountType, Action, Config, Container, Decision, DecisionType, EngineError, ErrorCode,
    EvaluateDecisionRequest, FilingStatus, HoldingPeriod, InMemoryMarketData,
    InMemoryPortfolioStore, IncomeTier, Portfolio, PortfolioSet, PortfolioTaxContext, Position,
    RunMoatsRequest, TaxEngine, TaxError, TaxImpactRequest, TaxProfile, Timing, TradeDirection,
    Verdict,
};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use test_case::test_case;

const UNIVERSE: [&str; 5] = ["AAPL", "MSFT", "JPM", "XOM", "NVDA"];

fn config() -> Config {
    let mut config = Config::default();
    config.simulation.n_paths = 300;
    config
}

fn container() -> Container<InMemoryMarketData, InMemoryPortfolioStore> {
    Container::new(
        config(),
        InMemoryMarketData::synthetic(UNIVERSE, 500, 21),
        Arc::new(InMemoryPortfolioStore::with_portfolios(PortfolioSet::new())),
    )
    .unwrap()
}

/// 40% tech, 30% financials, 30% energy.
fn sector_portfolio(container: &Container<InMemoryMarketData, InMemoryPortfolioStore>) -> Portfolio {
    container
        .build_portfolio(
            vec![
                Position::new("AAPL", 0.2),
                Position::new("MSFT", 0.2),
                Position::new("JPM", 0.3),
                Position::new("XOM", 0.3),
            ],
            dec!(100000),
            "USD",
        )
        .unwrap()
}

fn us_profile() -> TaxProfile {
    TaxProfile::new("US-CA", FilingStatus::Single, IncomeTier::High)
}

// =============================================================================
// Portfolio
// =============================================================================

#[test]
fn test_weights_are_normalized_on_construction() {
    let portfolio = container()
        .build_portfolio(
            vec![
                Position::new("AAPL", 3.0),
                Position::new("JPM", 1.0),
                Position::new("XOM", 1.0),
            ],
            dec!(10000),
            "USD",
        )
        .unwrap();

    assert!((portfolio.weight_sum() - 1.0).abs() < 1e-4);
    assert!((portfolio.weight_of(&"AAPL".into()) - 0.6).abs() < 1e-12);
}

// =============================================================================
// Parsing
// =============================================================================

proptest! {
    #[test]
    fn test_parse_is_total(text in "\\PC{0,120}") {
        let decision = container().parse_decision(&text, None);
        prop_assert!((0.0..=1.0).contains(&decision.confidence_score()));
    }
}

#[test]
fn test_delayed_buy_is_parsed() {
    let decision = container().parse_decision("Buy NVDA 10% after 10 days", None);

    assert_eq!(decision.decision_type(), DecisionType::TradeAction);
    assert_eq!(decision.actions().len(), 1);
    let action = &decision.actions()[0];
    assert_eq!(action.direction, TradeDirection::Buy);
    assert_eq!(action.symbol.as_str(), "NVDA");
    assert_eq!(action.execution_offset_days(), 10);
    assert!((action.size_percent - 10.0).abs() < 1e-12);
}

// =============================================================================
// Evaluation
// =============================================================================

#[tokio::test]
async fn test_empty_decision_has_exactly_zero_delta() {
    let container = container();
    let portfolio = sector_portfolio(&container);
    let decision = container.parse_decision("hello there", Some(&portfolio));
    assert!(decision.is_empty());

    let response = container
        .evaluate_decision(EvaluateDecisionRequest::new(portfolio, decision).with_seed(5))
        .await
        .unwrap();

    assert_eq!(response.evaluation.comparison.delta_return, 0.0);
    assert_eq!(response.evaluation.comparison.delta_drawdown, 0.0);
    assert_eq!(response.evaluation.verdict.verdict, Verdict::Neutral);
}

#[tokio::test]
async fn test_immediate_action_matches_direct_reweighting() {
    let container = container();
    let portfolio = sector_portfolio(&container);
    let action = Action {
        direction: TradeDirection::Buy,
        symbol: "AAPL".into(),
        size_percent: 10.0,
        timing: Timing::Immediate,
    };

    let via_action = container
        .evaluate_decision(
            EvaluateDecisionRequest::new(portfolio.clone(), Decision::new(vec![], vec![action.clone()], 0.9))
                .with_seed(17)
                .returning_paths(),
        )
        .await
        .unwrap();
    let reweighted = container
        .evaluate_decision(
            EvaluateDecisionRequest::new(portfolio.apply_action(&action), Decision::unrecognized(0.0))
                .with_seed(17)
                .returning_paths(),
        )
        .await
        .unwrap();

    let scenario = via_action.evaluation.scenario_paths.unwrap();
    let direct = reweighted.evaluation.baseline_paths.unwrap();
    assert_eq!(scenario.trajectory, direct.trajectory);
    assert_eq!(scenario.terminal_return, direct.terminal_return);
    assert_eq!(scenario.max_drawdown, direct.max_drawdown);
}

#[tokio::test]
async fn test_rate_rise_hurts_rate_sensitive_portfolio() {
    let container = container();
    let portfolio = sector_portfolio(&container);
    let decision = container.parse_decision("What if rates rise 1%?", Some(&portfolio));
    assert_eq!(decision.decision_type(), DecisionType::MarketShock);

    let response = container
        .evaluate_decision(EvaluateDecisionRequest::new(portfolio, decision).with_horizon(30))
        .await
        .unwrap();

    assert!(response.evaluation.comparison.delta_return < 0.0);
    assert!(response.evaluation.verdict.verdict < Verdict::Neutral);
}

#[tokio::test]
async fn test_delayed_buy_returns_matching_path_sets() {
    let container = container();
    let portfolio = sector_portfolio(&container);
    let decision = container.parse_decision("Buy NVDA 10% after 10 days", Some(&portfolio));

    let response = container
        .evaluate_decision(
            EvaluateDecisionRequest::new(portfolio, decision)
                .with_horizon(30)
                .returning_paths(),
        )
        .await
        .unwrap();

    let baseline = response.evaluation.baseline_paths.unwrap();
    let scenario = response.evaluation.scenario_paths.unwrap();
    assert_eq!(baseline.horizon_days, 30);
    assert_eq!(baseline.trajectory.len(), 30);
    assert_eq!(baseline.trajectory.len(), scenario.trajectory.len());
    assert!(scenario.excluded_tickers.is_empty());
}

#[tokio::test]
async fn test_missing_history_is_reported_not_fatal() {
    let container = container();
    let portfolio = container
        .build_portfolio(
            vec![
                Position::new("AAPL", 0.5),
                Position::new("JPM", 0.3),
                Position::new("ZZZZ", 0.2),
            ],
            dec!(50000),
            "USD",
        )
        .unwrap();

    let response = container
        .evaluate_decision(EvaluateDecisionRequest::new(portfolio, Decision::unrecognized(0.0)))
        .await
        .unwrap();

    assert!((response.coverage - 0.8).abs() < 1e-9);
    assert!(response.failed_tickers.contains_key("ZZZZ"));
}

// =============================================================================
// Tax
// =============================================================================

#[test_case("US", HoldingPeriod::ShortTerm)]
#[test_case("US-CA", HoldingPeriod::LongTerm)]
#[test_case("US-NY", HoldingPeriod::ShortTerm)]
#[test_case("UK", HoldingPeriod::LongTerm)]
#[test_case("IN", HoldingPeriod::ShortTerm)]
#[test_case("DE", HoldingPeriod::LongTerm)]
fn test_tax_layers_sum_to_total(jurisdiction: &str, holding_period: HoldingPeriod) {
    let profile = TaxProfile::new(jurisdiction, FilingStatus::MarriedJoint, IncomeTier::Top);
    for gain in [dec!(-12345.67), dec!(0), dec!(2500), dec!(1000000)] {
        let impact = TaxEngine::new()
            .compute(&profile, &PortfolioTaxContext::taxable(holding_period), gain)
            .unwrap();
        let sum: Decimal = impact.layers.iter().map(|layer| layer.amount).sum();
        assert_eq!(sum, impact.total, "{jurisdiction} {gain}");
    }
}

#[test_case("US")]
#[test_case("DE")]
#[test_case("XX")]
fn test_tax_advantaged_account_owes_nothing(jurisdiction: &str) {
    let request = TaxImpactRequest {
        profile: TaxProfile::new(jurisdiction, FilingStatus::Single, IncomeTier::Top),
        context: PortfolioTaxContext::new(AccountType::TaxAdvantaged, HoldingPeriod::ShortTerm),
        gain_or_loss: dec!(50000),
    };
    let impact = container().compute_tax_impact(&request).unwrap();
    assert_eq!(impact.total, Decimal::ZERO);
}

#[test]
fn test_unknown_jurisdiction_is_an_error() {
    let profile = TaxProfile::new("ATLANTIS", FilingStatus::Single, IncomeTier::Middle);
    let context = PortfolioTaxContext::taxable(HoldingPeriod::LongTerm);

    let domain = TaxEngine::new().compute(&profile, &context, dec!(1000));
    assert!(matches!(domain, Err(TaxError::UnsupportedJurisdiction { .. })));

    let err: EngineError = container()
        .compute_tax_impact(&TaxImpactRequest {
            profile,
            context,
            gain_or_loss: dec!(1000),
        })
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::UnsupportedJurisdiction);
    assert!(!err.is_retryable());
}

// =============================================================================
// Moats
// =============================================================================

fn losing_portfolio(container: &Container<InMemoryMarketData, InMemoryPortfolioStore>) -> Portfolio {
    // AAPL is worth 60,000 against a cost basis of 80,000: a 25% loss.
    container
        .build_portfolio(
            vec![
                Position::new("AAPL", 0.6)
                    .with_cost_basis(dec!(80000))
                    .with_days_held(400),
                Position::new("JPM", 0.4),
            ],
            dec!(100000),
            "USD",
        )
        .unwrap()
}

fn moats_request(
    portfolio: Portfolio,
    account_type: AccountType,
) -> RunMoatsRequest {
    RunMoatsRequest {
        portfolio,
        decision: Decision::unrecognized(0.0),
        tax_profile: us_profile(),
        tax_context: PortfolioTaxContext::new(account_type, HoldingPeriod::ShortTerm),
        seed: Some(3),
        horizon_days: Some(20),
    }
}

#[tokio::test]
async fn test_harvest_applies_to_taxable_loss() {
    let container = container();
    let portfolio = losing_portfolio(&container);

    let response = container
        .run_moats(moats_request(portfolio, AccountType::Taxable))
        .await
        .unwrap();

    assert!(response.tax_harvest.applicable);
    let report = response.tax_harvest.payload.unwrap();
    assert_eq!(report.eligible.len(), 1);
    assert_eq!(report.eligible[0].unrealized_loss, dec!(20000));
    assert_eq!(report.eligible[0].holding_period, HoldingPeriod::LongTerm);
    assert!(report.total_estimated_benefit > Decimal::ZERO);
}

#[tokio::test]
async fn test_harvest_does_not_apply_to_tax_advantaged_loss() {
    let container = container();
    let portfolio = losing_portfolio(&container);

    let response = container
        .run_moats(moats_request(portfolio, AccountType::TaxAdvantaged))
        .await
        .unwrap();

    assert!(!response.tax_harvest.applicable);
    assert!(response.tax_harvest.payload.is_none());
}

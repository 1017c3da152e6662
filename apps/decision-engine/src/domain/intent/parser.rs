//! Free-text decision parser.

use tracing::debug;

use super::matchers::{Family, Fragment, Matcher, ShockMatcher, TradeMatcher};
use super::scan::Scan;
use crate::domain::decision::Decision;
use crate::domain::portfolio::Portfolio;

const ONE_FAMILY: f64 = 0.6;
const TWO_FAMILIES: f64 = 0.75;
const VOCABULARY_ONLY: f64 = 0.1;
const EXPLICIT_BOOST: f64 = 0.15;
const HELD_TICKER_BOOST: f64 = 0.1;

/// Turns text such as "What if rates rise 1%?" or "Buy NVDA 10% after 10
/// days" into a [`Decision`].
///
/// Never fails: text with no recognizable intent becomes an `Unrecognized`
/// decision.
pub struct IntentParser {
    matchers: Vec<Box<dyn Matcher>>,
}

impl std::fmt::Debug for IntentParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntentParser")
            .field("matchers", &self.matchers.len())
            .finish()
    }
}

impl Default for IntentParser {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentParser {
    /// Parser with the macro-shock and trade-action families.
    #[must_use]
    pub fn new() -> Self {
        Self::with_matchers(vec![Box::new(ShockMatcher), Box::new(TradeMatcher)])
    }

    /// Parser with a custom, ordered set of matchers.
    #[must_use]
    pub fn with_matchers(matchers: Vec<Box<dyn Matcher>>) -> Self {
        Self { matchers }
    }

    /// Parse `text`, using `portfolio` (when given) to recognize held tickers.
    #[must_use]
    pub fn parse(&self, text: &str, portfolio: Option<&Portfolio>) -> Decision {
        let scan = Scan::new(text, portfolio);

        let mut families = Vec::new();
        let mut fragments = Vec::new();
        let mut vocabulary = false;

        for matcher in &self.matchers {
            let found = matcher.matches(&scan);
            vocabulary |= !found.is_empty() || matcher.vocabulary_present(&scan);
            if !found.is_empty() && !families.contains(&matcher.family()) {
                families.push(matcher.family());
            }
            fragments.extend(found);
        }

        let confidence = confidence(&families, &fragments, vocabulary, portfolio);

        let mut shocks = Vec::new();
        let mut actions = Vec::new();
        for fragment in fragments {
            match fragment {
                Fragment::Shock { shock, .. } => shocks.push(shock),
                Fragment::Action { action, .. } => actions.push(action),
            }
        }

        let decision = Decision::new(shocks, actions, confidence);
        debug!(
            decision_type = decision.decision_type().as_str(),
            confidence = decision.confidence_score(),
            shocks = decision.market_shocks().len(),
            actions = decision.actions().len(),
            "Parsed decision"
        );
        decision
    }
}

fn confidence(
    families: &[Family],
    fragments: &[Fragment],
    vocabulary: bool,
    portfolio: Option<&Portfolio>,
) -> f64 {
    let base = match families.len() {
        0 if vocabulary => return VOCABULARY_ONLY,
        0 => return 0.0,
        1 => ONE_FAMILY,
        _ => TWO_FAMILIES,
    };

    let explicit = if fragments.iter().all(Fragment::is_explicit) {
        EXPLICIT_BOOST
    } else {
        0.0
    };

    let held = portfolio.is_some_and(|portfolio| {
        fragments.iter().any(|fragment| match fragment {
            Fragment::Action { action, .. } => portfolio.holds(&action.symbol),
            Fragment::Shock { .. } => false,
        })
    });
    let held = if held { HELD_TICKER_BOOST } else { 0.0 };

    (base + explicit + held).clamp(0.0, 1.0)
}

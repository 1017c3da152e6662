//! Parse Decision Use Case

use crate::domain::decision::Decision;
use crate::domain::intent::IntentParser;
use crate::domain::portfolio::Portfolio;
use crate::observability::record_parse;

/// Use case for turning free text into a decision.
#[derive(Debug, Default)]
pub struct ParseDecisionUseCase {
    parser: IntentParser,
}

impl ParseDecisionUseCase {
    /// Create a new ParseDecisionUseCase.
    #[must_use]
    pub const fn new(parser: IntentParser) -> Self {
        Self { parser }
    }

    /// Parse `text`. Never fails.
    #[must_use]
    pub fn execute(&self, text: &str, portfolio: Option<&Portfolio>) -> Decision {
        let decision = self.parser.parse(text, portfolio);
        record_parse(
            decision.decision_type().as_str(),
            decision.confidence_score(),
        );
        decision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::decision::DecisionType;

    #[test]
    fn parses_through_the_default_parser() {
        let use_case = ParseDecisionUseCase::default();
        let decision = use_case.execute("sell TSLA 5% in 3 days", None);

        assert_eq!(decision.decision_type(), DecisionType::TradeAction);
        assert_eq!(decision.actions()[0].execution_offset_days(), 3);
    }
}

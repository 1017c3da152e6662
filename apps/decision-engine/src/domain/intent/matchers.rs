//! Pattern families.
//!
//! Each matcher reads the shared [`Scan`] and returns typed fragments. The
//! parser runs them in order and merges the fragments into a decision.

use std::collections::BTreeSet;
use std::ops::Range;
use std::sync::OnceLock;

use regex::Regex;

use super::scan::{Scan, distance, regex};
use crate::domain::decision::{Action, MarketShock, ShockType, Timing};
use crate::domain::sensitivity::LONG_YIELD_TARGET;

/// Trade size used when the text names none.
pub const DEFAULT_TRADE_SIZE_PERCENT: f64 = 5.0;

/// Pattern family a matcher belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Family {
    /// Rate, oil, GDP and inflation phrasing.
    MacroShock,
    /// Buy/sell phrasing.
    TradeAction,
}

/// A piece of a decision extracted by one matcher.
#[derive(Debug, Clone, PartialEq)]
pub enum Fragment {
    /// A macro shock.
    Shock {
        /// The shock.
        shock: MarketShock,
        /// Magnitude was read from the text rather than defaulted.
        explicit: bool,
    },
    /// A trade.
    Action {
        /// The action.
        action: Action,
        /// Size was read from the text rather than defaulted.
        explicit: bool,
    },
}

impl Fragment {
    /// Whether the fragment's magnitude came from the text.
    #[must_use]
    pub const fn is_explicit(&self) -> bool {
        match self {
            Self::Shock { explicit, .. } | Self::Action { explicit, .. } => *explicit,
        }
    }
}

/// One pattern family.
pub trait Matcher: Send + Sync {
    /// Family this matcher contributes to.
    fn family(&self) -> Family;

    /// Fragments found in the scanned text.
    fn matches(&self, scan: &Scan<'_>) -> Vec<Fragment>;

    /// Whether the family's vocabulary appears at all, parsed or not.
    fn vocabulary_present(&self, scan: &Scan<'_>) -> bool;
}

fn keyword_pattern(shock_type: ShockType) -> &'static Regex {
    static RATES: OnceLock<Regex> = OnceLock::new();
    static OIL: OnceLock<Regex> = OnceLock::new();
    static GDP: OnceLock<Regex> = OnceLock::new();
    static INFLATION: OnceLock<Regex> = OnceLock::new();

    match shock_type {
        ShockType::InterestRate => regex(
            &RATES,
            r"(?i)\b(interest\s+rates?|interest|fed\s+funds|fed|rates?|yields?|treasur(?:y|ies)|10[\s-]?year)\b",
        ),
        ShockType::Oil => regex(&OIL, r"(?i)\b(crude\s+oil|crude|oil|brent|wti)\b"),
        ShockType::Gdp => regex(&GDP, r"(?i)\b(gdp|growth|economy|recession)\b"),
        ShockType::Inflation => regex(&INFLATION, r"(?i)\b(inflation|cpi|prices)\b"),
    }
}

fn rising_words() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(
        &RE,
        r"(?i)\b(?:ris(?:e[sn]?|ing)|rose|rais\w*|increas\w*|hik\w*|jump\w*|spik\w*|climb\w*|surg\w*|soar\w*|higher|up)\b",
    )
}

fn falling_words() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(
        &RE,
        r"(?i)\b(?:fall\w*|fell|drop\w*|cut\w*|declin\w*|decreas\w*|plung\w*|slump\w*|sink\w*|sank|sunk|crash\w*|tumbl\w*|lower\w*|down)\b",
    )
}

const SHOCK_ORDER: [ShockType; 4] = [
    ShockType::InterestRate,
    ShockType::Oil,
    ShockType::Gdp,
    ShockType::Inflation,
];

const fn default_magnitude(shock_type: ShockType) -> f64 {
    match shock_type {
        ShockType::InterestRate => 0.25,
        ShockType::Oil => 10.0,
        ShockType::Gdp | ShockType::Inflation => 1.0,
    }
}

fn target_for(shock_type: ShockType, keyword: &str) -> String {
    let keyword = keyword.to_ascii_lowercase();
    let target = match shock_type {
        ShockType::InterestRate => {
            if keyword.starts_with("yield")
                || keyword.starts_with("treasur")
                || keyword.starts_with("10")
            {
                LONG_YIELD_TARGET
            } else {
                "policy_rate"
            }
        }
        ShockType::Oil => match keyword.as_str() {
            "brent" => "brent",
            "wti" => "wti",
            _ => "crude_oil",
        },
        ShockType::Gdp => "real_gdp",
        ShockType::Inflation => "cpi",
    };
    target.to_string()
}

#[derive(Debug)]
struct KeywordHit {
    shock_type: ShockType,
    keyword: String,
    span: Range<usize>,
}

/// Macro-shock family: one shock per shock type, anchored on its first keyword.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShockMatcher;

impl ShockMatcher {
    fn first_hits(scan: &Scan<'_>) -> Vec<KeywordHit> {
        let text = scan.text();
        let oil = keyword_pattern(ShockType::Oil);

        let mut hits: Vec<KeywordHit> = SHOCK_ORDER
            .iter()
            .filter_map(|&shock_type| {
                keyword_pattern(shock_type)
                    .find_iter(text)
                    .find(|m| {
                        // "oil prices" is an oil shock, not inflation
                        let clause = scan.clause_of(m.start());
                        !(shock_type == ShockType::Inflation
                            && m.as_str().eq_ignore_ascii_case("prices")
                            && oil.is_match(&text[clause]))
                    })
                    .map(|m| KeywordHit {
                        shock_type,
                        keyword: m.as_str().to_string(),
                        span: m.range(),
                    })
            })
            .collect();

        hits.sort_by_key(|hit| hit.span.start);
        hits
    }

    fn direction(scan: &Scan<'_>, hit: &KeywordHit, clause: &Range<usize>) -> f64 {
        let text = &scan.text()[clause.clone()];
        let nearest = |re: &Regex| {
            re.find_iter(text)
                .map(|m| distance(&hit.span, &(m.start() + clause.start..m.end() + clause.start)))
                .min()
        };

        match (nearest(rising_words()), nearest(falling_words())) {
            (Some(up), Some(down)) if down < up => -1.0,
            (Some(_), _) => 1.0,
            (None, Some(_)) => -1.0,
            (None, None) if hit.keyword.eq_ignore_ascii_case("recession") => -1.0,
            (None, None) => 1.0,
        }
    }
}

impl Matcher for ShockMatcher {
    fn family(&self) -> Family {
        Family::MacroShock
    }

    fn matches(&self, scan: &Scan<'_>) -> Vec<Fragment> {
        let mut claimed = BTreeSet::new();
        let mut fragments = Vec::new();

        for hit in Self::first_hits(scan) {
            let clause = scan.clause_of(hit.span.start);

            let nearest = scan
                .free_magnitudes()
                .filter(|(index, token)| {
                    !claimed.contains(index)
                        && token.span.start >= clause.start
                        && token.span.end <= clause.end
                })
                .min_by_key(|(_, token)| {
                    (distance(&hit.span, &token.span), token.span.start < hit.span.start)
                });

            let recession = hit.keyword.eq_ignore_ascii_case("recession");
            let (magnitude, explicit) = match nearest {
                Some((index, token)) => {
                    claimed.insert(index);
                    let value = if token.signed {
                        token.value
                    } else if recession {
                        -token.value.abs()
                    } else {
                        Self::direction(scan, &hit, &clause) * token.value.abs()
                    };
                    (value, true)
                }
                None => {
                    let sign = if recession {
                        -1.0
                    } else {
                        Self::direction(scan, &hit, &clause)
                    };
                    (sign * default_magnitude(hit.shock_type), false)
                }
            };

            fragments.push(Fragment::Shock {
                shock: MarketShock {
                    shock_type: hit.shock_type,
                    target: target_for(hit.shock_type, &hit.keyword),
                    magnitude,
                    unit: hit.shock_type.natural_unit(),
                },
                explicit,
            });
        }

        fragments
    }

    fn vocabulary_present(&self, scan: &Scan<'_>) -> bool {
        SHOCK_ORDER
            .iter()
            .any(|&shock_type| keyword_pattern(shock_type).is_match(scan.text()))
    }
}

/// Trade-action family: one action per recognized trade phrase.
#[derive(Debug, Clone, Copy, Default)]
pub struct TradeMatcher;

impl TradeMatcher {
    /// Delay per trade: each delay phrase binds to the nearest preceding
    /// trade, or the nearest following one when none precedes it.
    fn delays_by_trade(scan: &Scan<'_>) -> Vec<Option<u32>> {
        let trades = scan.trades();
        let mut delays = vec![None; trades.len()];

        for delay in scan.delays() {
            let preceding = trades
                .iter()
                .enumerate()
                .filter(|(_, trade)| trade.span.end <= delay.span.start)
                .max_by_key(|(_, trade)| trade.span.end)
                .map(|(index, _)| index);
            let target = preceding.or_else(|| {
                trades
                    .iter()
                    .enumerate()
                    .filter(|(_, trade)| trade.span.start >= delay.span.end)
                    .min_by_key(|(_, trade)| trade.span.start)
                    .map(|(index, _)| index)
            });

            if let Some(slot) = target.and_then(|index| delays.get_mut(index)) {
                slot.get_or_insert(delay.offset_days);
            }
        }

        delays
    }
}

impl Matcher for TradeMatcher {
    fn family(&self) -> Family {
        Family::TradeAction
    }

    fn matches(&self, scan: &Scan<'_>) -> Vec<Fragment> {
        scan.trades()
            .iter()
            .zip(Self::delays_by_trade(scan))
            .map(|(trade, delay)| {
                let timing = match delay {
                    Some(days) if days > 0 => Timing::AfterDays(days),
                    _ => Timing::Immediate,
                };
                Fragment::Action {
                    action: Action {
                        direction: trade.direction,
                        symbol: trade.ticker.clone(),
                        size_percent: trade.size_percent.unwrap_or(DEFAULT_TRADE_SIZE_PERCENT),
                        timing,
                    },
                    explicit: trade.size_percent.is_some(),
                }
            })
            .collect()
    }

    fn vocabulary_present(&self, scan: &Scan<'_>) -> bool {
        scan.trade_verbs_seen()
    }
}

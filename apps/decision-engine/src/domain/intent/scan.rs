//! Lexical scan shared by every matcher.
//!
//! One pass over the text finds clause boundaries, magnitude tokens, trade
//! phrases and delay phrases. Matchers then read from the scan instead of
//! running their own regexes over raw text.

use std::ops::Range;
use std::sync::OnceLock;

use regex::Regex;

use crate::domain::decision::TradeDirection;
use crate::domain::portfolio::Portfolio;
use crate::domain::sensitivity::Sector;
use crate::domain::shared::Ticker;

/// Words that follow a trade verb but are never tickers.
const NON_TICKERS: &[&str] = &[
    "a", "an", "the", "my", "our", "some", "more", "all", "it", "them", "i", "me", "shares",
    "share", "stock", "stocks", "position", "positions", "now", "today", "tomorrow", "back",
    "in", "into", "of", "and", "or", "to", "up", "down", "rates", "rate", "oil", "gdp",
    "inflation",
];

#[allow(clippy::expect_used)] // Patterns are compile-time constants
pub(super) fn regex(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("intent pattern is valid"))
}

fn clause_separator() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(&RE, r"(?i)[;,!?]|\.\s|\.$|\b(?:and|but|while|then|also|plus)\b")
}

fn magnitude_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(
        &RE,
        r"(?i)([+-]?\d+(?:\.\d+)?)\s*(percentage\s+points?\b|basis\s+points?\b|percent\b|bps\b|bp\b|pp\b|%)",
    )
}

fn trade_verb() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(&RE, r"(?i)\b(buy|add|purchase|sell|trim|reduce|dump)\b")
}

fn size_first() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(
        &RE,
        r"(?i)^\s+(?:(?:more|some|another)\s+)?(\d+(?:\.\d+)?)\s*%\s+(?:(?:of|in|into)\s+)?(?:(?:my|the|our)\s+)?(\^?[A-Za-z0-9][A-Za-z0-9.\-]*)",
    )
}

fn ticker_first() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(
        &RE,
        r"(?i)^\s+(?:(?:more|some|my|the|our)\s+)?(?:shares\s+of\s+)?(\^?[A-Za-z0-9][A-Za-z0-9.\-]*)(?:\s+(?:by\s+)?(\d+(?:\.\d+)?)\s*%)?",
    )
}

fn delay_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(
        &RE,
        r"(?i)\b(?:after|in|within)\s+(\d{1,4})\s+(?:trading\s+)?(days?|weeks?|months?)\b|\b(tomorrow)\b|\b(now|today|immediately)\b",
    )
}

/// A signed magnitude found in the text.
#[derive(Debug, Clone, PartialEq)]
pub struct MagnitudeToken {
    /// Value in percent or percentage points (basis points already divided by 100).
    pub value: f64,
    /// Whether the token carried an explicit `+` or `-`.
    pub signed: bool,
    /// Byte span in the text.
    pub span: Range<usize>,
}

/// A recognized trade phrase.
#[derive(Debug, Clone, PartialEq)]
pub struct TradePhrase {
    /// Buy or sell.
    pub direction: TradeDirection,
    /// Instrument.
    pub ticker: Ticker,
    /// Explicit size in percent, if given.
    pub size_percent: Option<f64>,
    /// Byte span covering verb, ticker and size.
    pub span: Range<usize>,
}

/// A delay phrase resolved to trading days.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelayPhrase {
    /// Trading-day offset.
    pub offset_days: u32,
    /// Byte span in the text.
    pub span: Range<usize>,
}

/// Result of scanning one input text.
#[derive(Debug, Clone)]
pub struct Scan<'a> {
    text: &'a str,
    portfolio: Option<&'a Portfolio>,
    clauses: Vec<Range<usize>>,
    magnitudes: Vec<MagnitudeToken>,
    trades: Vec<TradePhrase>,
    delays: Vec<DelayPhrase>,
    trade_verbs_seen: bool,
}

impl<'a> Scan<'a> {
    /// Scan `text`; `portfolio` helps recognize lower-case held tickers.
    #[must_use]
    pub fn new(text: &'a str, portfolio: Option<&'a Portfolio>) -> Self {
        let trade_verbs_seen = trade_verb().is_match(text);
        Self {
            text,
            portfolio,
            clauses: split_clauses(text),
            magnitudes: scan_magnitudes(text),
            trades: scan_trades(text, portfolio),
            delays: scan_delays(text),
            trade_verbs_seen,
        }
    }

    /// The scanned text.
    #[must_use]
    pub const fn text(&self) -> &'a str {
        self.text
    }

    /// Portfolio supplied with the text.
    #[must_use]
    pub const fn portfolio(&self) -> Option<&'a Portfolio> {
        self.portfolio
    }

    /// Clause byte ranges in order.
    #[must_use]
    pub fn clauses(&self) -> &[Range<usize>] {
        &self.clauses
    }

    /// Clause containing byte `offset`.
    #[must_use]
    pub fn clause_of(&self, offset: usize) -> Range<usize> {
        self.clauses
            .iter()
            .find(|clause| clause.start <= offset && offset < clause.end)
            .cloned()
            .unwrap_or(0..self.text.len())
    }

    /// Magnitude tokens that are not part of a trade phrase.
    pub fn free_magnitudes(&self) -> impl Iterator<Item = (usize, &MagnitudeToken)> {
        self.magnitudes
            .iter()
            .enumerate()
            .filter(|(_, token)| !self.trades.iter().any(|t| overlaps(&t.span, &token.span)))
    }

    /// Recognized trade phrases in order.
    #[must_use]
    pub fn trades(&self) -> &[TradePhrase] {
        &self.trades
    }

    /// Delay phrases in order.
    #[must_use]
    pub fn delays(&self) -> &[DelayPhrase] {
        &self.delays
    }

    /// Whether any trade verb appeared, recognized or not.
    #[must_use]
    pub const fn trade_verbs_seen(&self) -> bool {
        self.trade_verbs_seen
    }
}

/// Gap in bytes between two spans (0 when they touch or overlap).
#[must_use]
pub fn distance(a: &Range<usize>, b: &Range<usize>) -> usize {
    if b.start >= a.end {
        b.start - a.end
    } else if a.start >= b.end {
        a.start - b.end
    } else {
        0
    }
}

fn overlaps(a: &Range<usize>, b: &Range<usize>) -> bool {
    a.start < b.end && b.start < a.end
}

fn split_clauses(text: &str) -> Vec<Range<usize>> {
    let mut clauses = Vec::new();
    let mut start = 0;
    for separator in clause_separator().find_iter(text) {
        if separator.start() > start {
            clauses.push(start..separator.start());
        }
        start = separator.end();
    }
    if start < text.len() {
        clauses.push(start..text.len());
    }
    clauses
}

fn scan_magnitudes(text: &str) -> Vec<MagnitudeToken> {
    magnitude_pattern()
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let number = caps.get(1)?.as_str();
            let unit = caps.get(2)?.as_str().to_ascii_lowercase();
            let mut value: f64 = number.parse().ok().filter(|v: &f64| v.is_finite())?;
            if unit.starts_with("bp") || unit.starts_with("basis") {
                value /= 100.0;
            }
            Some(MagnitudeToken {
                value,
                signed: number.starts_with(['+', '-']),
                span: whole.range(),
            })
        })
        .collect()
}

fn scan_trades(text: &str, portfolio: Option<&Portfolio>) -> Vec<TradePhrase> {
    let mut trades = Vec::new();

    for verb in trade_verb().find_iter(text) {
        let direction = match verb.as_str().to_ascii_lowercase().as_str() {
            "buy" | "add" | "purchase" => TradeDirection::Buy,
            _ => TradeDirection::Sell,
        };
        let rest = &text[verb.end()..];

        let parsed = size_first()
            .captures(rest)
            .and_then(|caps| {
                let ticker = plausible_ticker(caps.get(2)?.as_str(), portfolio)?;
                let size = caps.get(1)?.as_str().parse::<f64>().ok();
                Some((ticker, size, caps.get(0)?.end()))
            })
            .or_else(|| {
                ticker_first().captures(rest).and_then(|caps| {
                    let ticker = plausible_ticker(caps.get(1)?.as_str(), portfolio)?;
                    let size = caps.get(2).and_then(|m| m.as_str().parse::<f64>().ok());
                    Some((ticker, size, caps.get(0)?.end()))
                })
            });

        if let Some((ticker, size_percent, consumed)) = parsed {
            trades.push(TradePhrase {
                direction,
                ticker,
                size_percent: size_percent.filter(|s| s.is_finite() && *s > 0.0),
                span: verb.start()..verb.end() + consumed,
            });
        }
    }

    trades
}

fn plausible_ticker(raw: &str, portfolio: Option<&Portfolio>) -> Option<Ticker> {
    let trimmed = raw.trim_end_matches(['.', '-']);
    if !trimmed.chars().any(|c| c.is_ascii_alphabetic())
        || NON_TICKERS.contains(&trimmed.to_ascii_lowercase().as_str())
    {
        return None;
    }

    let ticker = Ticker::new(trimmed);
    ticker.validate().ok()?;

    let looks_like_ticker = !trimmed.chars().any(|c| c.is_ascii_lowercase())
        || trimmed.contains(['.', '^'])
        || portfolio.is_some_and(|p| p.holds(&ticker))
        || Sector::of_ticker(&ticker).is_some();

    looks_like_ticker.then_some(ticker)
}

fn scan_delays(text: &str) -> Vec<DelayPhrase> {
    delay_pattern()
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let offset_days = if let (Some(count), Some(unit)) = (caps.get(1), caps.get(2)) {
                let count: u32 = count.as_str().parse().ok()?;
                let per_unit = match unit.as_str().to_ascii_lowercase().chars().next() {
                    Some('w') => 5,
                    Some('m') => 21,
                    _ => 1,
                };
                count.saturating_mul(per_unit)
            } else if caps.get(3).is_some() {
                1
            } else {
                0
            };
            Some(DelayPhrase {
                offset_days,
                span: whole.range(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clauses_split_on_conjunctions_and_punctuation() {
        let text = "rates rise 1% and oil falls 10%, then buy NVDA";
        let clauses: Vec<&str> = split_clauses(text).into_iter().map(|r| &text[r]).collect();
        assert_eq!(clauses, vec!["rates rise 1% ", " oil falls 10%", " ", " buy NVDA"]);
    }

    #[test]
    fn magnitudes_convert_basis_points() {
        let tokens = scan_magnitudes("up 50 bps or -1.5% or 2 percentage points");
        let values: Vec<f64> = tokens.iter().map(|t| t.value).collect();
        assert_eq!(values, vec![0.5, -1.5, 2.0]);
        assert!(!tokens[0].signed);
        assert!(tokens[1].signed);
    }

    #[test]
    fn trades_in_both_orders() {
        let trades = scan_trades("Buy NVDA 10% and sell 5% of my AAPL", None);
        assert_eq!(trades.len(), 2);
        assert_eq!(trades[0].ticker.as_str(), "NVDA");
        assert_eq!(trades[0].size_percent, Some(10.0));
        assert_eq!(trades[1].direction, TradeDirection::Sell);
        assert_eq!(trades[1].ticker.as_str(), "AAPL");
        assert_eq!(trades[1].size_percent, Some(5.0));
    }

    #[test]
    fn lowercase_words_are_not_tickers() {
        assert!(scan_trades("I want to buy something nice", None).is_empty());
        assert!(scan_trades("reduce rates by 1%", None).is_empty());
        assert_eq!(scan_trades("buy nvda", None).len(), 1);
        assert_eq!(scan_trades("buy reliance.ns 3%", None)[0].ticker.as_str(), "RELIANCE.NS");
    }

    #[test]
    fn delays_resolve_to_trading_days() {
        let offsets: Vec<u32> = scan_delays("after 10 days, in 2 weeks, within 1 month, tomorrow, now")
            .iter()
            .map(|d| d.offset_days)
            .collect();
        assert_eq!(offsets, vec![10, 10, 21, 1, 0]);
    }
}

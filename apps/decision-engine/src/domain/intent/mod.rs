//! Intent Parsing Bounded Context
//!
//! Free text to a structured [`Decision`](crate::domain::decision::Decision)
//! over a closed vocabulary of macro-shock and trade phrasing. Parsing is
//! total: text that cannot be understood becomes an `Unrecognized` decision
//! with near-zero confidence.

mod matchers;
mod parser;
mod scan;

pub use matchers::{Family, Fragment, Matcher, ShockMatcher, TradeMatcher};
pub use parser::IntentParser;
pub use scan::Scan;

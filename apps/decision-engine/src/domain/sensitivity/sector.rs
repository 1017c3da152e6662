//! Sector classification.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::shared::Ticker;

/// Equity sector (plus bonds and broad-market index exposure).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sector {
    /// Information technology, semiconductors, software.
    Technology,
    /// Media, telecom, interactive platforms.
    CommunicationServices,
    /// Retail, autos, leisure.
    ConsumerDiscretionary,
    /// Food, beverages, household products.
    ConsumerStaples,
    /// Banks, insurers, brokers.
    Financials,
    /// Oil and gas producers and services.
    Energy,
    /// Electric, gas and water utilities.
    Utilities,
    /// REITs and developers.
    RealEstate,
    /// Pharma, biotech, providers.
    Healthcare,
    /// Machinery, transports, aerospace.
    Industrials,
    /// Chemicals, metals, mining.
    Materials,
    /// Government and investment-grade bond funds.
    Bonds,
    /// Broad-market index exposure.
    BroadMarket,
}

impl Sector {
    /// Classify a ticker (regional suffixes ignored) or a sector name.
    #[must_use]
    pub fn classify(ticker_or_sector: &str) -> Option<Self> {
        ticker_or_sector
            .parse()
            .ok()
            .or_else(|| Self::of_ticker(&Ticker::new(ticker_or_sector)))
    }

    /// Sector of a known ticker.
    #[must_use]
    pub fn of_ticker(ticker: &Ticker) -> Option<Self> {
        let sector = match ticker.base_symbol() {
            "AAPL" | "MSFT" | "NVDA" | "AMD" | "INTC" | "ORCL" | "CRM" | "ADBE" | "AVGO"
            | "CSCO" | "IBM" | "QCOM" | "TXN" | "MU" | "TSM" | "ASML" | "SHOP" | "NOW"
            | "XLK" | "QQQ" | "VGT" | "SMH" | "SOXX" | "INFY" | "TCS" | "WIPRO" | "SAP" => {
                Self::Technology
            }
            "GOOGL" | "GOOG" | "META" | "NFLX" | "DIS" | "VZ" | "T" | "TMUS" | "XLC" | "VOD" => {
                Self::CommunicationServices
            }
            "AMZN" | "TSLA" | "HD" | "MCD" | "NKE" | "SBUX" | "LOW" | "BKNG" | "XLY" => {
                Self::ConsumerDiscretionary
            }
            "WMT" | "PG" | "KO" | "PEP" | "COST" | "PM" | "MO" | "CL" | "XLP" | "ULVR" => {
                Self::ConsumerStaples
            }
            "JPM" | "BAC" | "WFC" | "C" | "GS" | "MS" | "SCHW" | "BLK" | "AXP" | "V" | "MA"
            | "BRK-B" | "XLF" | "KRE" | "HDFCBANK" | "ICICIBANK" | "HSBA" | "BARC" => {
                Self::Financials
            }
            "XOM" | "CVX" | "COP" | "SLB" | "EOG" | "OXY" | "PSX" | "MPC" | "BP" | "SHEL"
            | "XLE" | "USO" | "RELIANCE" | "ONGC" => Self::Energy,
            "NEE" | "DUK" | "SO" | "D" | "AEP" | "XLU" | "NTPC" => Self::Utilities,
            "AMT" | "PLD" | "CCI" | "EQIX" | "O" | "SPG" | "VNQ" | "XLRE" => Self::RealEstate,
            "JNJ" | "UNH" | "PFE" | "MRK" | "ABBV" | "LLY" | "TMO" | "ABT" | "XLV" | "AZN" => {
                Self::Healthcare
            }
            "CAT" | "DE" | "BA" | "GE" | "HON" | "UPS" | "LMT" | "RTX" | "UNP" | "XLI" => {
                Self::Industrials
            }
            "LIN" | "FCX" | "NEM" | "DOW" | "APD" | "XLB" | "RIO" | "BHP" => Self::Materials,
            "TLT" | "IEF" | "SHY" | "AGG" | "BND" | "LQD" | "GOVT" => Self::Bonds,
            "SPY" | "VOO" | "IVV" | "VTI" | "DIA" | "IWM" | "^GSPC" | "^DJI" | "^IXIC"
            | "^NSEI" | "^FTSE" => Self::BroadMarket,
            _ => return None,
        };
        Some(sector)
    }

    /// Canonical snake_case name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Technology => "technology",
            Self::CommunicationServices => "communication_services",
            Self::ConsumerDiscretionary => "consumer_discretionary",
            Self::ConsumerStaples => "consumer_staples",
            Self::Financials => "financials",
            Self::Energy => "energy",
            Self::Utilities => "utilities",
            Self::RealEstate => "real_estate",
            Self::Healthcare => "healthcare",
            Self::Industrials => "industrials",
            Self::Materials => "materials",
            Self::Bonds => "bonds",
            Self::BroadMarket => "broad_market",
        }
    }
}

impl fmt::Display for Sector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sector {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let sector = match s.trim().to_ascii_lowercase().replace([' ', '-'], "_").as_str() {
            "tech" | "technology" | "information_technology" => Self::Technology,
            "communication" | "communication_services" | "communications" | "telecom" | "media" => {
                Self::CommunicationServices
            }
            "consumer_discretionary" | "discretionary" | "retail" => Self::ConsumerDiscretionary,
            "consumer_staples" | "staples" => Self::ConsumerStaples,
            "financials" | "financial" | "finance" | "banks" | "banking" => Self::Financials,
            "energy" | "oil_and_gas" => Self::Energy,
            "utilities" | "utility" => Self::Utilities,
            "real_estate" | "reit" | "reits" | "realestate" => Self::RealEstate,
            "healthcare" | "health_care" | "pharma" => Self::Healthcare,
            "industrials" | "industrial" => Self::Industrials,
            "materials" | "mining" => Self::Materials,
            "bonds" | "bond" | "fixed_income" | "treasuries" => Self::Bonds,
            "broad_market" | "index" | "market" => Self::BroadMarket,
            other => return Err(format!("unknown sector: {other}")),
        };
        Ok(sector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("AAPL", Some(Sector::Technology))]
    #[test_case("jpm", Some(Sector::Financials))]
    #[test_case("XOM", Some(Sector::Energy))]
    #[test_case("RELIANCE.NS", Some(Sector::Energy))]
    #[test_case("VOD.L", Some(Sector::CommunicationServices))]
    #[test_case("tech", Some(Sector::Technology))]
    #[test_case("Real Estate", Some(Sector::RealEstate))]
    #[test_case("ZZZZ", None)]
    fn classifies(input: &str, expected: Option<Sector>) {
        assert_eq!(Sector::classify(input), expected);
    }

    #[test]
    fn names_round_trip() {
        for sector in [Sector::Technology, Sector::RealEstate, Sector::BroadMarket] {
            assert_eq!(sector.as_str().parse::<Sector>(), Ok(sector));
        }
    }
}

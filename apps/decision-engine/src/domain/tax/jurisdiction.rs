//! Supported jurisdictions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::TaxError;
use super::rules::{GermanyRules, IndiaRules, TaxRules, UkRules, UsRules};

/// US states with a state capital gains layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UsState {
    /// California.
    California,
    /// New York.
    NewYork,
    /// Texas (no state income tax).
    Texas,
    /// Florida (no state income tax).
    Florida,
}

/// A jurisdiction with a known rule set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Jurisdiction {
    /// United States, optionally with a state layer.
    Us(Option<UsState>),
    /// United Kingdom.
    Uk,
    /// India.
    India,
    /// Germany.
    Germany,
}

static US_FEDERAL: UsRules = UsRules::new(None);
static US_CA: UsRules = UsRules::new(Some(UsState::California));
static US_NY: UsRules = UsRules::new(Some(UsState::NewYork));
static US_TX: UsRules = UsRules::new(Some(UsState::Texas));
static US_FL: UsRules = UsRules::new(Some(UsState::Florida));
static UK: UkRules = UkRules;
static INDIA: IndiaRules = IndiaRules;
static GERMANY: GermanyRules = GermanyRules;

impl Jurisdiction {
    /// Every supported jurisdiction.
    pub const ALL: [Self; 8] = [
        Self::Us(None),
        Self::Us(Some(UsState::California)),
        Self::Us(Some(UsState::NewYork)),
        Self::Us(Some(UsState::Texas)),
        Self::Us(Some(UsState::Florida)),
        Self::Uk,
        Self::India,
        Self::Germany,
    ];

    /// Resolve a jurisdiction code (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`TaxError::UnsupportedJurisdiction`] for any unknown code.
    pub fn resolve(code: &str) -> Result<Self, TaxError> {
        let jurisdiction = match code.trim().to_ascii_uppercase().as_str() {
            "US" => Self::Us(None),
            "US-CA" => Self::Us(Some(UsState::California)),
            "US-NY" => Self::Us(Some(UsState::NewYork)),
            "US-TX" => Self::Us(Some(UsState::Texas)),
            "US-FL" => Self::Us(Some(UsState::Florida)),
            "UK" | "GB" => Self::Uk,
            "IN" => Self::India,
            "DE" => Self::Germany,
            _ => {
                return Err(TaxError::UnsupportedJurisdiction {
                    code: code.to_string(),
                });
            }
        };
        Ok(jurisdiction)
    }

    /// Canonical code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Us(None) => "US",
            Self::Us(Some(UsState::California)) => "US-CA",
            Self::Us(Some(UsState::NewYork)) => "US-NY",
            Self::Us(Some(UsState::Texas)) => "US-TX",
            Self::Us(Some(UsState::Florida)) => "US-FL",
            Self::Uk => "UK",
            Self::India => "IN",
            Self::Germany => "DE",
        }
    }

    /// Rule set for this jurisdiction.
    #[must_use]
    pub fn rules(&self) -> &'static dyn TaxRules {
        match self {
            Self::Us(None) => &US_FEDERAL,
            Self::Us(Some(UsState::California)) => &US_CA,
            Self::Us(Some(UsState::NewYork)) => &US_NY,
            Self::Us(Some(UsState::Texas)) => &US_TX,
            Self::Us(Some(UsState::Florida)) => &US_FL,
            Self::Uk => &UK,
            Self::India => &INDIA,
            Self::Germany => &GERMANY,
        }
    }
}

impl FromStr for Jurisdiction {
    type Err = TaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::resolve(s)
    }
}

impl fmt::Display for Jurisdiction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("US", Jurisdiction::Us(None))]
    #[test_case("us-ca", Jurisdiction::Us(Some(UsState::California)))]
    #[test_case(" gb ", Jurisdiction::Uk)]
    #[test_case("In", Jurisdiction::India)]
    #[test_case("DE", Jurisdiction::Germany)]
    fn resolves(code: &str, expected: Jurisdiction) {
        assert_eq!(Jurisdiction::resolve(code), Ok(expected));
    }

    #[test_case("FR")]
    #[test_case("US-WA")]
    #[test_case("")]
    fn rejects_unknown(code: &str) {
        let Err(TaxError::UnsupportedJurisdiction { code: reported }) = Jurisdiction::resolve(code)
        else {
            panic!("expected UnsupportedJurisdiction for {code:?}");
        };
        assert_eq!(reported, code);
    }

    #[test]
    fn codes_round_trip() {
        for jurisdiction in Jurisdiction::ALL {
            assert_eq!(Jurisdiction::resolve(jurisdiction.code()), Ok(jurisdiction));
            assert_eq!(jurisdiction.rules().code(), jurisdiction.code());
        }
    }
}

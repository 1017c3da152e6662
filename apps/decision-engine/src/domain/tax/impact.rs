//! Tax impact value objects.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// One component of a jurisdiction's tax.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxLayer {
    /// Layer name ("federal", "state", "niit", "surcharge", ...).
    pub name: String,
    /// Rate applied to the gain.
    pub rate: Decimal,
    /// Amount in currency units, rounded to cents; negative for losses.
    pub amount: Decimal,
}

impl TaxLayer {
    /// Layer charging `rate` on `gain`.
    #[must_use]
    pub fn on_gain(name: impl Into<String>, rate: Decimal, gain: Decimal) -> Self {
        Self {
            name: name.into(),
            rate,
            amount: round_cents(gain * rate),
        }
    }
}

/// Layered tax on one realized gain or loss.
///
/// `total` is always the sum of the layer amounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxImpact {
    /// Canonical jurisdiction code.
    pub jurisdiction: String,
    /// Gain (positive) or loss (negative) taxed.
    pub gain: Decimal,
    /// Layers in application order.
    pub layers: Vec<TaxLayer>,
    /// Sum of layer amounts.
    pub total: Decimal,
    /// `total / gain`, zero when the gain is zero.
    pub effective_rate: Decimal,
}

impl TaxImpact {
    /// Build an impact from its layers.
    #[must_use]
    pub fn from_layers(jurisdiction: impl Into<String>, gain: Decimal, layers: Vec<TaxLayer>) -> Self {
        let total: Decimal = layers.iter().map(|layer| layer.amount).sum();
        let effective_rate = if gain.is_zero() {
            Decimal::ZERO
        } else {
            (total / gain).round_dp(6)
        };

        Self {
            jurisdiction: jurisdiction.into(),
            gain,
            layers,
            total,
            effective_rate,
        }
    }

    /// Impact with no layers.
    #[must_use]
    pub fn zero(jurisdiction: impl Into<String>, gain: Decimal) -> Self {
        Self::from_layers(jurisdiction, gain, Vec::new())
    }

    /// Amount of the named layer.
    #[must_use]
    pub fn layer(&self, name: &str) -> Option<&TaxLayer> {
        self.layers.iter().find(|layer| layer.name == name)
    }

    /// Gain left after tax.
    #[must_use]
    pub fn after_tax(&self) -> Decimal {
        self.gain - self.total
    }
}

/// Round to cents, half away from zero.
#[must_use]
pub fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

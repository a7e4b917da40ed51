//! Fixed-point monetary values and material quantities.
//!
//! All amounts in the ledger are decimals quantized to two fractional digits
//! at construction. Arithmetic is checked; negative inputs are rejected with
//! a validation error, never clamped. Credits/refunds are out of scope, so
//! both `Money` and `Quantity` are non-negative by construction.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::value_object::ValueObject;

/// Number of fractional digits carried by monetary columns.
pub const MONEY_SCALE: u32 = 2;

fn quantize(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// A non-negative monetary amount, fixed-point with two fractional digits.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    /// Quantizes to two decimal places; rejects negative amounts.
    pub fn new(amount: Decimal) -> DomainResult<Self> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(DomainError::validation(format!(
                "monetary amount cannot be negative: {amount}"
            )));
        }
        Ok(Self(quantize(amount)))
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn checked_add(self, other: Money) -> DomainResult<Money> {
        let sum = self
            .0
            .checked_add(other.0)
            .ok_or_else(|| DomainError::validation("monetary amount overflow"))?;
        Ok(Money(sum))
    }

    /// Sums a sequence of amounts; zero for an empty sequence.
    pub fn sum(amounts: impl IntoIterator<Item = Money>) -> DomainResult<Money> {
        let mut total = Money::ZERO;
        for amount in amounts {
            total = total.checked_add(amount)?;
        }
        Ok(total)
    }
}

impl TryFrom<Decimal> for Money {
    type Error = DomainError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Money::new(value)
    }
}

impl From<Money> for Decimal {
    fn from(value: Money) -> Self {
        value.0
    }
}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl ValueObject for Money {}

/// A non-negative material quantity, fixed-point with two fractional digits.
///
/// Quantities are decimals (not integers) because materials are sold in
/// fractional units: 2.50 metres of timber, 0.75 tonnes of ballast.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Quantity(Decimal);

impl Quantity {
    pub const ZERO: Quantity = Quantity(Decimal::ZERO);

    /// Quantizes to two decimal places; rejects negative quantities.
    pub fn new(value: Decimal) -> DomainResult<Self> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(DomainError::validation(format!(
                "quantity cannot be negative: {value}"
            )));
        }
        Ok(Self(quantize(value)))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Quantity × unit price, quantized to the monetary scale.
    pub fn times(self, unit_price: Money) -> DomainResult<Money> {
        let product = self
            .0
            .checked_mul(unit_price.amount())
            .ok_or_else(|| DomainError::validation("line total overflow"))?;
        Money::new(product)
    }
}

impl TryFrom<Decimal> for Quantity {
    type Error = DomainError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Quantity::new(value)
    }
}

impl From<Quantity> for Decimal {
    fn from(value: Quantity) -> Self {
        value.0
    }
}

impl core::fmt::Display for Quantity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl ValueObject for Quantity {}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn money_rejects_negative_amounts() {
        let err = Money::new(dec!(-0.01)).unwrap_err();
        match err {
            DomainError::Validation(_) => {}
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn money_quantizes_to_two_decimal_places() {
        let m = Money::new(dec!(10.005)).unwrap();
        assert_eq!(m.amount(), dec!(10.01));
        assert_eq!(m.to_string(), "10.01");
    }

    #[test]
    fn zero_money_equals_constructed_zero() {
        assert_eq!(Money::ZERO, Money::new(dec!(0.00)).unwrap());
        assert_eq!(Money::ZERO.to_string(), "0.00");
    }

    #[test]
    fn quantity_times_price_is_exact() {
        let qty = Quantity::new(dec!(10)).unwrap();
        let price = Money::new(dec!(25.00)).unwrap();
        assert_eq!(qty.times(price).unwrap(), Money::new(dec!(250.00)).unwrap());

        // 0.1 * 0.1 would lose pennies in binary floating point.
        let qty = Quantity::new(dec!(0.10)).unwrap();
        let price = Money::new(dec!(0.10)).unwrap();
        assert_eq!(qty.times(price).unwrap(), Money::new(dec!(0.01)).unwrap());
    }

    #[test]
    fn sum_of_no_amounts_is_zero() {
        assert_eq!(Money::sum([]).unwrap(), Money::ZERO);
    }

    #[test]
    fn negative_decimal_fails_deserialization() {
        let err = serde_json::from_str::<Money>("\"-5.00\"");
        assert!(err.is_err());
    }
}

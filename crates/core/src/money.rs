//! Money value object: a non-negative decimal amount paired with a currency.
//!
//! Every operation rounds its result to [`Money::SCALE`] fractional digits using
//! round-half-up (midpoint away from zero), so chained calculations round at
//! each step rather than only at display time.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::value_object::ValueObject;

/// Immutable monetary amount.
///
/// Invariants:
/// - `amount >= 0`
/// - `amount` carries exactly two fractional digits
/// - `currency` is upper-case
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "MoneyRepr", into = "MoneyRepr")]
pub struct Money {
    amount: Decimal,
    currency: String,
}

impl ValueObject for Money {}

impl Money {
    pub const SCALE: u32 = 2;
    pub const DEFAULT_CURRENCY: &'static str = "USD";

    /// Create a new amount, rounding to two decimals and normalizing the currency.
    pub fn new(amount: Decimal, currency: impl AsRef<str>) -> DomainResult<Self> {
        if amount < Decimal::ZERO {
            return Err(DomainError::InvalidAmount(amount));
        }

        Ok(Self {
            amount: round(amount)?,
            currency: currency.as_ref().trim().to_uppercase(),
        })
    }

    /// Create an amount in the default currency.
    pub fn usd(amount: Decimal) -> DomainResult<Self> {
        Self::new(amount, Self::DEFAULT_CURRENCY)
    }

    pub fn zero(currency: impl AsRef<str>) -> Self {
        Self {
            amount: Decimal::new(0, Money::SCALE),
            currency: currency.as_ref().trim().to_uppercase(),
        }
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    pub fn add(&self, other: &Money) -> DomainResult<Money> {
        self.ensure_same_currency(other)?;
        let sum = self
            .amount
            .checked_add(other.amount)
            .ok_or_else(|| DomainError::invariant("money addition overflowed"))?;
        Money::new(sum, &self.currency)
    }

    pub fn subtract(&self, other: &Money) -> DomainResult<Money> {
        self.ensure_same_currency(other)?;
        let difference = self.amount - other.amount;
        if difference < Decimal::ZERO {
            return Err(DomainError::NegativeResult);
        }
        Money::new(difference, &self.currency)
    }

    /// Scale the amount by a non-negative factor (a rate or a quantity).
    pub fn multiply(&self, factor: Decimal) -> DomainResult<Money> {
        if factor < Decimal::ZERO {
            return Err(DomainError::InvalidFactor(factor));
        }
        let product = self
            .amount
            .checked_mul(factor)
            .ok_or_else(|| DomainError::invariant("money multiplication overflowed"))?;
        Money::new(product, &self.currency)
    }

    /// `"45.00 USD"`.
    pub fn to_display_string(&self) -> String {
        self.to_string()
    }

    fn ensure_same_currency(&self, other: &Money) -> DomainResult<()> {
        if self.currency != other.currency {
            return Err(DomainError::currency_mismatch(&self.currency, &other.currency));
        }
        Ok(())
    }
}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} {}", self.amount, self.currency)
    }
}

/// Round half-up and pin the scale to exactly [`Money::SCALE`] digits.
///
/// `rescale` silently keeps a smaller scale when the mantissa has no room left
/// (28+ significant digits); such amounts are rejected.
fn round(amount: Decimal) -> DomainResult<Decimal> {
    let mut rounded = amount.round_dp_with_strategy(Money::SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(Money::SCALE);
    if rounded.scale() != Money::SCALE {
        return Err(DomainError::invariant(format!(
            "amount {amount} cannot be represented with {} decimals",
            Money::SCALE
        )));
    }
    Ok(rounded)
}

/// Wire representation; deserialization goes back through [`Money::new`].
#[derive(Serialize, Deserialize)]
struct MoneyRepr {
    amount: Decimal,
    currency: String,
}

impl TryFrom<MoneyRepr> for Money {
    type Error = DomainError;

    fn try_from(value: MoneyRepr) -> Result<Self, Self::Error> {
        Money::new(value.amount, value.currency)
    }
}

impl From<Money> for MoneyRepr {
    fn from(value: Money) -> Self {
        Self {
            amount: value.amount,
            currency: value.currency,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn usd(amount: Decimal) -> Money {
        Money::usd(amount).unwrap()
    }

    #[test]
    fn new_rounds_half_up_to_two_decimals() {
        assert_eq!(usd(dec!(10.005)).amount(), dec!(10.01));
        assert_eq!(usd(dec!(10.004)).amount(), dec!(10.00));
        assert_eq!(usd(dec!(2.5)).amount(), dec!(2.50));
    }

    #[test]
    fn new_rejects_negative_amounts() {
        let err = Money::usd(dec!(-0.01)).unwrap_err();
        assert_eq!(err, DomainError::InvalidAmount(dec!(-0.01)));
    }

    #[test]
    fn new_normalizes_currency() {
        let m = Money::new(dec!(1), " eur ").unwrap();
        assert_eq!(m.currency(), "EUR");
    }

    #[test]
    fn add_and_subtract_return_new_values() {
        let a = usd(dec!(20));
        let b = usd(dec!(2));
        assert_eq!(a.add(&b).unwrap(), usd(dec!(22)));
        assert_eq!(a.subtract(&b).unwrap(), usd(dec!(18)));
        // operands untouched
        assert_eq!(a.amount(), dec!(20.00));
        assert_eq!(b.amount(), dec!(2.00));
    }

    #[test]
    fn subtract_rejects_negative_result() {
        let err = usd(dec!(1)).subtract(&usd(dec!(1.01))).unwrap_err();
        assert_eq!(err, DomainError::NegativeResult);
    }

    #[test]
    fn subtract_to_exactly_zero_is_allowed() {
        assert!(usd(dec!(5)).subtract(&usd(dec!(5))).unwrap().is_zero());
    }

    #[test]
    fn arithmetic_across_currencies_fails() {
        let usd = usd(dec!(10));
        let eur = Money::new(dec!(10), "EUR").unwrap();

        assert!(matches!(usd.add(&eur), Err(DomainError::CurrencyMismatch { .. })));
        assert!(matches!(usd.subtract(&eur), Err(DomainError::CurrencyMismatch { .. })));
    }

    #[test]
    fn multiply_rounds_and_rejects_negative_factor() {
        assert_eq!(usd(dec!(20)).multiply(dec!(0.1)).unwrap(), usd(dec!(2)));
        assert_eq!(usd(dec!(0.15)).multiply(dec!(0.5)).unwrap().amount(), dec!(0.08));
        assert_eq!(
            usd(dec!(1)).multiply(dec!(-1)).unwrap_err(),
            DomainError::InvalidFactor(dec!(-1))
        );
    }

    #[test]
    fn equality_requires_same_currency_and_amount() {
        assert_eq!(usd(dec!(1.001)), usd(dec!(1)));
        assert_ne!(usd(dec!(1)), Money::new(dec!(1), "EUR").unwrap());
        assert_ne!(usd(dec!(1)), usd(dec!(1.01)));
    }

    #[test]
    fn display_uses_two_decimals_and_currency() {
        assert_eq!(usd(dec!(45)).to_display_string(), "45.00 USD");
        assert_eq!(Money::zero("gbp").to_string(), "0.00 GBP");
    }

    #[test]
    fn amounts_too_large_for_two_decimals_are_rejected() {
        let huge = Decimal::from_i128_with_scale(10i128.pow(26), 0);
        let err = usd(dec!(50)).multiply(huge).unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));

        let err = Money::usd(Decimal::MAX).unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
    }

    #[test]
    fn serde_uses_string_amounts_and_revalidates() {
        let json = serde_json::to_value(usd(dec!(108))).unwrap();
        assert_eq!(json, serde_json::json!({"amount": "108.00", "currency": "USD"}));

        let back: Money = serde_json::from_value(json).unwrap();
        assert_eq!(back, usd(dec!(108)));

        let bad = serde_json::from_value::<Money>(serde_json::json!({"amount": "-1", "currency": "USD"}));
        assert!(bad.is_err());
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn amount() -> impl Strategy<Value = Decimal> {
            (0i64..10_000_000, 0u32..5).prop_map(|(mantissa, scale)| Decimal::new(mantissa, scale))
        }

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 500,
                ..ProptestConfig::default()
            })]

            /// Property: construction rounds to two decimals.
            #[test]
            fn new_amount_is_rounded(a in amount()) {
                let m = Money::usd(a).unwrap();
                prop_assert_eq!(
                    m.amount(),
                    a.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
                );
            }

            /// Property: negative amounts are always rejected.
            #[test]
            fn negative_amount_is_rejected(a in amount().prop_filter("non-zero", |a| !a.is_zero())) {
                prop_assert_eq!(Money::usd(-a), Err(DomainError::InvalidAmount(-a)));
            }

            /// Property: mismatched currencies never coerce.
            #[test]
            fn mismatched_currencies_never_coerce(a in amount(), b in amount()) {
                let left = Money::new(a, "USD").unwrap();
                let right = Money::new(b, "EUR").unwrap();
                let add_is_mismatch = matches!(left.add(&right), Err(DomainError::CurrencyMismatch { .. }));
                let sub_is_mismatch = matches!(left.subtract(&right), Err(DomainError::CurrencyMismatch { .. }));
                prop_assert!(add_is_mismatch);
                prop_assert!(sub_is_mismatch);
            }
        }
    }
}

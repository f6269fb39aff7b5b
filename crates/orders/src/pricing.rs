//! Order pricing: the bulk-discount rule.
//!
//! Orders of [`BULK_DISCOUNT_THRESHOLD`] units or more get [`BULK_DISCOUNT_RATE`]
//! off the **unit** price; the discounted unit price is then multiplied by the
//! quantity. Every step rounds to two decimals (see [`Money`]).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use orderdesk_core::{DomainError, DomainResult, Money, ValueObject};

/// Minimum quantity (inclusive) that triggers the bulk discount.
pub const BULK_DISCOUNT_THRESHOLD: i64 = 5;

/// Per-unit discount rate applied at or above the threshold (0.1 = 10%).
pub const BULK_DISCOUNT_RATE: Decimal = Decimal::from_parts(1, 0, 0, false, 1);

/// Largest quantity a single order may carry.
pub const MAX_QUANTITY: i64 = 1_000_000;

/// Ordered quantity: an integer in `1..=MAX_QUANTITY`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Quantity(i64);

impl ValueObject for Quantity {}

impl Quantity {
    pub fn new(value: i64) -> DomainResult<Self> {
        if !(1..=MAX_QUANTITY).contains(&value) {
            return Err(DomainError::InvalidQuantity(value));
        }
        Ok(Self(value))
    }

    pub fn get(&self) -> i64 {
        self.0
    }

    pub fn as_decimal(&self) -> Decimal {
        Decimal::from(self.0)
    }

    pub fn qualifies_for_bulk_discount(&self) -> bool {
        self.0 >= BULK_DISCOUNT_THRESHOLD
    }
}

impl TryFrom<i64> for Quantity {
    type Error = DomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Quantity::new(value)
    }
}

impl From<Quantity> for i64 {
    fn from(value: Quantity) -> Self {
        value.0
    }
}

impl core::fmt::Display for Quantity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Derived pricing fields of an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pricing {
    /// Discount per unit.
    pub discount: Money,
    /// `(unit_price - discount) * quantity`.
    pub total: Money,
}

impl Pricing {
    /// Apply the bulk-discount rule to a unit price and quantity.
    ///
    /// Pure: the same inputs always produce the same result.
    pub fn calculate(unit_price: &Money, quantity: Quantity) -> DomainResult<Self> {
        let discount = if quantity.qualifies_for_bulk_discount() {
            unit_price.multiply(BULK_DISCOUNT_RATE)?
        } else {
            Money::zero(unit_price.currency())
        };

        let total = unit_price
            .subtract(&discount)?
            .multiply(quantity.as_decimal())?;

        Ok(Self { discount, total })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn usd(amount: Decimal) -> Money {
        Money::usd(amount).unwrap()
    }

    fn qty(n: i64) -> Quantity {
        Quantity::new(n).unwrap()
    }

    #[test]
    fn discount_rate_is_ten_percent() {
        assert_eq!(BULK_DISCOUNT_RATE, dec!(0.1));
    }

    #[test]
    fn scenario_small_order_has_no_discount() {
        let p = Pricing::calculate(&usd(dec!(50)), qty(2)).unwrap();
        assert!(p.discount.is_zero());
        assert_eq!(p.total, usd(dec!(100)));
    }

    #[test]
    fn scenario_bulk_order_discounts_each_unit() {
        let p = Pricing::calculate(&usd(dec!(20)), qty(6)).unwrap();
        assert_eq!(p.discount, usd(dec!(2.00)));
        assert_eq!(p.total, usd(dec!(108.00)));
    }

    #[test]
    fn scenario_threshold_is_inclusive() {
        let p = Pricing::calculate(&usd(dec!(100)), qty(5)).unwrap();
        assert_eq!(p.discount, usd(dec!(10.00)));
        assert_eq!(p.total, usd(dec!(450.00)));
    }

    #[test]
    fn just_below_threshold_has_no_discount() {
        let p = Pricing::calculate(&usd(dec!(100)), qty(4)).unwrap();
        assert!(p.discount.is_zero());
        assert_eq!(p.total, usd(dec!(400)));
    }

    #[test]
    fn scenario_free_product_prices_to_zero() {
        let p = Pricing::calculate(&usd(dec!(0)), qty(10)).unwrap();
        assert!(p.discount.is_zero());
        assert!(p.total.is_zero());
    }

    #[test]
    fn results_keep_unit_price_currency() {
        let eur = Money::new(dec!(9.99), "eur").unwrap();
        let p = Pricing::calculate(&eur, qty(7)).unwrap();
        assert_eq!(p.discount.currency(), "EUR");
        assert_eq!(p.total.currency(), "EUR");
        // 9.99 * 0.1 = 0.999 -> 1.00; (9.99 - 1.00) * 7 = 62.93
        assert_eq!(p.discount.amount(), dec!(1.00));
        assert_eq!(p.total.amount(), dec!(62.93));
    }

    #[test]
    fn non_positive_quantity_is_rejected() {
        assert_eq!(Quantity::new(0), Err(DomainError::InvalidQuantity(0)));
        assert_eq!(Quantity::new(-3), Err(DomainError::InvalidQuantity(-3)));
    }

    #[test]
    fn quantity_above_cap_is_rejected() {
        assert_eq!(qty(MAX_QUANTITY).get(), MAX_QUANTITY);
        assert_eq!(
            Quantity::new(MAX_QUANTITY + 1),
            Err(DomainError::InvalidQuantity(MAX_QUANTITY + 1))
        );
        assert_eq!(Quantity::new(i64::MAX), Err(DomainError::InvalidQuantity(i64::MAX)));
        assert!(
            DomainError::InvalidQuantity(0)
                .to_string()
                .contains(&MAX_QUANTITY.to_string())
        );
    }

    #[test]
    fn quantity_deserialization_validates() {
        assert_eq!(serde_json::from_str::<Quantity>("6").unwrap(), qty(6));
        assert!(serde_json::from_str::<Quantity>("0").is_err());
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn unit_price() -> impl Strategy<Value = Money> {
            (0i64..1_000_000).prop_map(|cents| Money::usd(Decimal::new(cents, 2)).unwrap())
        }

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 1000,
                ..ProptestConfig::default()
            })]

            /// Property: below the threshold there is never a discount.
            #[test]
            fn small_orders_are_never_discounted(price in unit_price(), q in 1i64..BULK_DISCOUNT_THRESHOLD) {
                let p = Pricing::calculate(&price, qty(q)).unwrap();
                prop_assert!(p.discount.is_zero());
                prop_assert_eq!(p.total, price.multiply(Decimal::from(q)).unwrap());
            }

            /// Property: at or above the threshold the discount is 10% per unit.
            #[test]
            fn bulk_orders_follow_the_rule(price in unit_price(), q in BULK_DISCOUNT_THRESHOLD..10_000) {
                let p = Pricing::calculate(&price, qty(q)).unwrap();
                let expected_discount = price.multiply(BULK_DISCOUNT_RATE).unwrap();
                let expected_total = price
                    .subtract(&expected_discount)
                    .unwrap()
                    .multiply(Decimal::from(q))
                    .unwrap();
                prop_assert_eq!(&p.discount, &expected_discount);
                prop_assert_eq!(&p.total, &expected_total);
            }

            /// Property: pricing is idempotent.
            #[test]
            fn pricing_is_deterministic(price in unit_price(), q in 1i64..10_000) {
                let first = Pricing::calculate(&price, qty(q)).unwrap();
                let second = Pricing::calculate(&price, qty(q)).unwrap();
                prop_assert_eq!(first, second);
            }
        }
    }
}

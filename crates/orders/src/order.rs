use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use orderdesk_core::{DomainError, DomainResult, Entity, Money, OrderId, ProductId, UserId};
use orderdesk_products::Product;

use crate::pricing::{Pricing, Quantity};

/// Order lifecycle.
///
/// `Draft -> Priced` is the only transition. Persistence accepts priced orders
/// only; a saved order is never modified afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Draft,
    Priced,
}

/// Aggregate root: Order.
///
/// `discount` and `total` are only ever written by [`Order::apply_pricing`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    id: Option<OrderId>,
    user_id: UserId,
    product_id: ProductId,
    quantity: Quantity,
    unit_price: Money,
    discount: Money,
    total: Money,
    status: OrderStatus,
    created_at: DateTime<Utc>,
}

impl Order {
    /// Start an order for `product`, copying its current price.
    pub fn draft(user_id: UserId, product: &Product, quantity: Quantity, created_at: DateTime<Utc>) -> Self {
        let unit_price = product.price().clone();
        let currency = unit_price.currency().to_string();

        Self {
            id: None,
            user_id,
            product_id: product.id_typed(),
            quantity,
            unit_price,
            discount: Money::zero(&currency),
            total: Money::zero(&currency),
            status: OrderStatus::Draft,
            created_at,
        }
    }

    /// Draft and price in one step.
    pub fn place(
        user_id: UserId,
        product: &Product,
        quantity: Quantity,
        created_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let mut order = Self::draft(user_id, product, quantity, created_at);
        order.apply_pricing()?;
        Ok(order)
    }

    /// Derive `discount` and `total` from `unit_price` and `quantity`.
    ///
    /// Idempotent: calling it again recomputes the same values.
    pub fn apply_pricing(&mut self) -> DomainResult<()> {
        let Pricing { discount, total } = Pricing::calculate(&self.unit_price, self.quantity)?;
        self.discount = discount;
        self.total = total;
        self.status = OrderStatus::Priced;
        Ok(())
    }

    pub fn ensure_priced(&self) -> DomainResult<()> {
        if self.status != OrderStatus::Priced {
            return Err(DomainError::invariant("order must be priced before it is persisted"));
        }
        Ok(())
    }

    /// Attach the identity assigned by the persistence layer.
    pub fn with_id(mut self, id: OrderId) -> Self {
        self.id = Some(id);
        self
    }

    /// Rebuild a persisted order, checking the stored derived fields against
    /// the pricing rule.
    pub fn restore(record: OrderRecord) -> DomainResult<Self> {
        let quantity = Quantity::new(record.quantity)?;
        let unit_price = Money::new(record.unit_price, &record.currency)?;
        let stored_discount = Money::new(record.discount, &record.currency)?;
        let stored_total = Money::new(record.total, &record.currency)?;

        let mut order = Self {
            id: Some(record.id),
            user_id: record.user_id,
            product_id: record.product_id,
            quantity,
            unit_price,
            discount: Money::zero(&record.currency),
            total: Money::zero(&record.currency),
            status: OrderStatus::Draft,
            created_at: record.created_at,
        };
        order.apply_pricing()?;

        if order.discount != stored_discount || order.total != stored_total {
            return Err(DomainError::invariant(format!(
                "stored pricing for order {} is inconsistent (discount {}, total {}; expected {}, {})",
                record.id, stored_discount, stored_total, order.discount, order.total
            )));
        }

        Ok(order)
    }

    pub fn id_typed(&self) -> Option<OrderId> {
        self.id
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    pub fn quantity(&self) -> Quantity {
        self.quantity
    }

    pub fn unit_price(&self) -> &Money {
        &self.unit_price
    }

    pub fn discount(&self) -> &Money {
        &self.discount
    }

    pub fn total(&self) -> &Money {
        &self.total
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Entity for Order {
    type Id = OrderId;

    fn id(&self) -> Option<&Self::Id> {
        self.id.as_ref()
    }
}

/// Storage-shaped order (one row).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub id: OrderId,
    pub user_id: UserId,
    pub product_id: ProductId,
    pub quantity: i64,
    pub unit_price: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
    pub currency: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn product(price: Decimal) -> Product {
        Product::new(ProductId::new(2), "Product B", Money::usd(price).unwrap()).unwrap()
    }

    fn qty(n: i64) -> Quantity {
        Quantity::new(n).unwrap()
    }

    #[test]
    fn draft_copies_price_and_zeroes_derived_fields() {
        let order = Order::draft(UserId::new(1), &product(dec!(20)), qty(6), Utc::now());

        assert_eq!(order.status(), OrderStatus::Draft);
        assert_eq!(order.unit_price(), &Money::usd(dec!(20)).unwrap());
        assert!(order.discount().is_zero());
        assert!(order.total().is_zero());
        assert_eq!(order.id_typed(), None);
        assert!(order.ensure_priced().is_err());
    }

    #[test]
    fn apply_pricing_transitions_to_priced() {
        let mut order = Order::draft(UserId::new(1), &product(dec!(20)), qty(6), Utc::now());
        order.apply_pricing().unwrap();

        assert_eq!(order.status(), OrderStatus::Priced);
        assert_eq!(order.discount().amount(), dec!(2.00));
        assert_eq!(order.total().amount(), dec!(108.00));
        assert!(order.ensure_priced().is_ok());
    }

    #[test]
    fn apply_pricing_is_idempotent() {
        let mut order = Order::place(UserId::new(1), &product(dec!(100)), qty(5), Utc::now()).unwrap();
        let once = order.clone();
        order.apply_pricing().unwrap();
        assert_eq!(order, once);
    }

    fn record(quantity: i64, unit_price: Decimal, discount: Decimal, total: Decimal) -> OrderRecord {
        OrderRecord {
            id: OrderId::new(11),
            user_id: UserId::new(3),
            product_id: ProductId::new(2),
            quantity,
            unit_price,
            discount,
            total,
            currency: "USD".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn restore_rebuilds_a_priced_order() {
        let stored = record(5, dec!(100), dec!(10), dec!(450));
        let created_at = stored.created_at;

        let restored = Order::restore(stored).unwrap();

        let expected = Order::place(UserId::new(3), &product(dec!(100)), qty(5), created_at)
            .unwrap()
            .with_id(OrderId::new(11));
        assert_eq!(restored, expected);
        assert_eq!(restored.status(), OrderStatus::Priced);
        assert_eq!(restored.total().amount(), dec!(450.00));
    }

    #[test]
    fn restore_rejects_tampered_totals() {
        let err = Order::restore(record(6, dec!(20), dec!(2), dec!(120))).unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
    }

    #[test]
    fn restore_rejects_non_positive_quantity() {
        let record = OrderRecord {
            id: OrderId::new(1),
            user_id: UserId::new(1),
            product_id: ProductId::new(1),
            quantity: 0,
            unit_price: dec!(10),
            discount: dec!(0),
            total: dec!(0),
            currency: "USD".to_string(),
            created_at: Utc::now(),
        };
        assert_eq!(Order::restore(record), Err(DomainError::InvalidQuantity(0)));
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use orderdesk_core::{DomainError, DomainResult, Money, OrderId, ProductId, UserId};
use orderdesk_events::Event;

use crate::order::Order;

/// Aggregate type used when wrapping order events in an envelope.
pub const ORDER_AGGREGATE_TYPE: &str = "orders.order";

/// Event: an order was priced and persisted.
///
/// Carries a snapshot of the order so consumers do not need to read it back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderPlaced {
    pub order_id: OrderId,
    pub user_id: UserId,
    pub product_id: ProductId,
    pub quantity: i64,
    pub unit_price: Money,
    pub discount: Money,
    pub total: Money,
    pub occurred_at: DateTime<Utc>,
}

impl OrderPlaced {
    /// Build the event from a persisted order.
    pub fn from_order(order: &Order, occurred_at: DateTime<Utc>) -> DomainResult<Self> {
        order.ensure_priced()?;
        let order_id = order
            .id_typed()
            .ok_or_else(|| DomainError::invariant("cannot announce an order that was never saved"))?;

        Ok(Self {
            order_id,
            user_id: order.user_id(),
            product_id: order.product_id(),
            quantity: order.quantity().get(),
            unit_price: order.unit_price().clone(),
            discount: order.discount().clone(),
            total: order.total().clone(),
            occurred_at,
        })
    }
}

impl Event for OrderPlaced {
    fn event_type(&self) -> &'static str {
        "orders.order.placed"
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orderdesk_products::Product;
    use rust_decimal_macros::dec;

    use crate::pricing::Quantity;

    fn placed_order() -> Order {
        let product = Product::new(ProductId::new(1), "Product A", Money::usd(dec!(50)).unwrap()).unwrap();
        Order::place(UserId::new(1), &product, Quantity::new(2).unwrap(), Utc::now()).unwrap()
    }

    #[test]
    fn event_snapshots_saved_order() {
        let order = placed_order().with_id(OrderId::new(5));
        let ev = OrderPlaced::from_order(&order, Utc::now()).unwrap();

        assert_eq!(ev.order_id, OrderId::new(5));
        assert_eq!(ev.quantity, 2);
        assert_eq!(ev.total, Money::usd(dec!(100)).unwrap());
        assert_eq!(ev.event_type(), "orders.order.placed");
    }

    #[test]
    fn unsaved_order_cannot_be_announced() {
        let err = OrderPlaced::from_order(&placed_order(), Utc::now()).unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
    }
}

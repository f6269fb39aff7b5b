use serde::{Deserialize, Serialize};

use orderdesk_core::{ProductId, UserId};

/// Input for placing an order.
///
/// `quantity` is kept raw here; it becomes a [`crate::Quantity`] (and may be
/// rejected with `InvalidQuantity`) when the order is placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateOrder {
    pub user_id: UserId,
    pub product_id: ProductId,
    pub quantity: i64,
}

impl CreateOrder {
    pub fn new(user_id: UserId, product_id: ProductId, quantity: i64) -> Self {
        Self {
            user_id,
            product_id,
            quantity,
        }
    }
}

use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};

use orderdesk_core::{Money, ProductId, UserId};
use orderdesk_infra::OrderView;
use orderdesk_orders::CreateOrder;
use orderdesk_products::Product;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub user_id: i64,
    pub product_id: i64,
    pub quantity: i64,
}

impl From<CreateOrderRequest> for CreateOrder {
    fn from(body: CreateOrderRequest) -> Self {
        CreateOrder::new(UserId::new(body.user_id), ProductId::new(body.product_id), body.quantity)
    }
}

// -------------------------
// Response DTOs
// -------------------------

/// Decimal amount with exactly two fractional digits, e.g. `"108.00"`.
fn amount(money: &Money) -> String {
    format!("{:.2}", money.amount())
}

#[derive(Debug, Serialize)]
pub struct UserSummary {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct ProductSummary {
    pub id: i64,
    pub name: String,
    pub price: String,
}

#[derive(Debug, Serialize)]
pub struct OrderResource {
    pub id: Option<i64>,
    pub quantity: i64,
    pub price: String,
    pub discount: String,
    pub total: String,
    pub user: UserSummary,
    pub product: ProductSummary,
}

impl From<&OrderView> for OrderResource {
    fn from(view: &OrderView) -> Self {
        let order = &view.order;
        Self {
            id: order.id_typed().map(|id| id.get()),
            quantity: order.quantity().get(),
            price: amount(order.unit_price()),
            discount: amount(order.discount()),
            total: amount(order.total()),
            user: UserSummary {
                id: view.user.id_typed().get(),
                name: view.user.name().to_string(),
            },
            product: ProductSummary {
                id: view.product.id_typed().get(),
                name: view.product.name().to_string(),
                price: amount(view.product.price()),
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProductResource {
    pub id: i64,
    pub name: String,
    pub price: String,
    pub currency: String,
}

impl From<&Product> for ProductResource {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id_typed().get(),
            name: product.name().to_string(),
            price: amount(product.price()),
            currency: product.price().currency().to_string(),
        }
    }
}

/// Success envelope: `{success, code, message, data?}`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub code: u16,
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

pub fn respond<T: Serialize>(
    status: StatusCode,
    message: &'static str,
    data: Option<T>,
) -> axum::response::Response {
    (
        status,
        axum::Json(ApiResponse {
            success: true,
            code: status.as_u16(),
            message,
            data,
        }),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use orderdesk_core::OrderId;
    use orderdesk_orders::{Order, Quantity};
    use orderdesk_users::User;

    #[test]
    fn order_resource_renders_two_decimal_strings() {
        let product = Product::new(ProductId::new(2), "Product B", Money::usd(20i64.into()).unwrap()).unwrap();
        let user = User::new(UserId::new(1), "Ada", "ada@example.com").unwrap();
        let order = Order::place(user.id_typed(), &product, Quantity::new(6).unwrap(), Utc::now())
            .unwrap()
            .with_id(OrderId::new(3));

        let resource = OrderResource::from(&OrderView { order, user, product });
        let json = serde_json::to_value(&resource).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "id": 3,
                "quantity": 6,
                "price": "20.00",
                "discount": "2.00",
                "total": "108.00",
                "user": {"id": 1, "name": "Ada"},
                "product": {"id": 2, "name": "Product B", "price": "20.00"}
            })
        );
    }
}

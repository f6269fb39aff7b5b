//! Demo data for in-memory deployments.

use chrono::Utc;
use rust_decimal::Decimal;

use orderdesk_core::{DomainResult, Money, ProductId, UserId};
use orderdesk_orders::{Order, Quantity};
use orderdesk_products::Product;
use orderdesk_users::User;

use crate::repository::{InMemoryProductCatalog, InMemoryUserDirectory, OrderRepository};
use crate::service::ServiceError;

pub fn demo_products() -> DomainResult<Vec<Product>> {
    [(1, "Product A", 50), (2, "Product B", 20), (3, "Product C", 100)]
        .into_iter()
        .map(|(id, name, price)| Product::new(ProductId::new(id), name, Money::usd(Decimal::from(price))?))
        .collect()
}

pub fn demo_users() -> DomainResult<Vec<User>> {
    Ok(vec![
        User::new(UserId::new(1), "Alice Example", "alice@example.com")?,
        User::new(UserId::new(2), "Bob Example", "bob@example.com")?,
    ])
}

/// Load products, users and two priced orders.
///
/// Orders go straight to the repository; seeding does not send confirmations.
pub async fn seed_demo_data<R>(
    catalog: &InMemoryProductCatalog,
    users: &InMemoryUserDirectory,
    orders: &R,
) -> Result<(), ServiceError>
where
    R: OrderRepository + ?Sized,
{
    let products = demo_products()?;
    for product in &products {
        catalog.insert(product.clone());
    }
    for user in demo_users()? {
        users.insert(user);
    }

    let now = Utc::now();
    for (user_id, product_index, quantity) in [(1, 0usize, 2), (2, 1usize, 6)] {
        let order = Order::place(UserId::new(user_id), &products[product_index], Quantity::new(quantity)?, now)?;
        orders.save(order).await?;
    }

    tracing::info!(products = products.len(), "demo data seeded");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    use crate::repository::{InMemoryOrderRepository, ProductCatalog};

    #[tokio::test]
    async fn seeded_orders_follow_the_pricing_rule() {
        let catalog = InMemoryProductCatalog::new();
        let users = InMemoryUserDirectory::new();
        let orders = InMemoryOrderRepository::new();

        seed_demo_data(&catalog, &users, &orders).await.unwrap();

        assert_eq!(catalog.list_products().await.unwrap().len(), 3);

        let listed = orders.list_all().await.unwrap();
        assert_eq!(listed.len(), 2);
        // Most recent first: the bulk order.
        assert_eq!(listed[0].discount().amount(), dec!(2.00));
        assert_eq!(listed[0].total().amount(), dec!(108.00));
        assert!(listed[1].discount().is_zero());
        assert_eq!(listed[1].total().amount(), dec!(100.00));
    }
}

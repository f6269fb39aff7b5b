use std::collections::BTreeMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;

use orderdesk_core::{OrderId, ProductId, UserId};
use orderdesk_orders::Order;
use orderdesk_products::Product;
use orderdesk_users::User;

use super::{OrderRepository, ProductCatalog, RepositoryError, UserDirectory, ensure_saveable};

fn poisoned() -> RepositoryError {
    RepositoryError::Storage("in-memory store lock poisoned".to_string())
}

/// In-memory order store for tests/dev.
///
/// Ids come from a monotonic counter, so id order is creation order.
#[derive(Debug)]
pub struct InMemoryOrderRepository {
    orders: RwLock<BTreeMap<OrderId, Order>>,
    next_id: AtomicI64,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self {
            orders: RwLock::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
        }
    }

    pub fn len(&self) -> usize {
        self.orders.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryOrderRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn save(&self, order: Order) -> Result<Order, RepositoryError> {
        ensure_saveable(&order)?;

        let mut orders = self.orders.write().map_err(|_| poisoned())?;
        let id = OrderId::new(self.next_id.fetch_add(1, Ordering::SeqCst));
        let order = order.with_id(id);
        orders.insert(id, order.clone());

        Ok(order)
    }

    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let orders = self.orders.read().map_err(|_| poisoned())?;
        Ok(orders.get(&id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Order>, RepositoryError> {
        let orders = self.orders.read().map_err(|_| poisoned())?;
        Ok(orders.values().rev().cloned().collect())
    }

    async fn delete(&self, order: &Order) -> Result<(), RepositoryError> {
        let id = order.id_typed().ok_or(RepositoryError::NotFound)?;
        let mut orders = self.orders.write().map_err(|_| poisoned())?;
        orders.remove(&id).map(|_| ()).ok_or(RepositoryError::NotFound)
    }
}

/// In-memory product catalog.
#[derive(Debug, Default)]
pub struct InMemoryProductCatalog {
    products: RwLock<BTreeMap<ProductId, Product>>,
}

impl InMemoryProductCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_products(products: impl IntoIterator<Item = Product>) -> Self {
        let catalog = Self::new();
        for product in products {
            catalog.insert(product);
        }
        catalog
    }

    /// Add or replace a product.
    pub fn insert(&self, product: Product) {
        if let Ok(mut products) = self.products.write() {
            products.insert(product.id_typed(), product);
        }
    }
}

#[async_trait]
impl ProductCatalog for InMemoryProductCatalog {
    async fn get_product_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let products = self.products.read().map_err(|_| poisoned())?;
        Ok(products.get(&id).cloned())
    }

    async fn list_products(&self) -> Result<Vec<Product>, RepositoryError> {
        let products = self.products.read().map_err(|_| poisoned())?;
        Ok(products.values().cloned().collect())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryUserDirectory {
    users: RwLock<BTreeMap<UserId, User>>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        let directory = Self::new();
        for user in users {
            directory.insert(user);
        }
        directory
    }

    pub fn insert(&self, user: User) {
        if let Ok(mut users) = self.users.write() {
            users.insert(user.id_typed(), user);
        }
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn get_user_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let users = self.users.read().map_err(|_| poisoned())?;
        Ok(users.get(&id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use orderdesk_core::{DomainError, Money};
    use orderdesk_orders::Quantity;
    use rust_decimal_macros::dec;

    fn product() -> Product {
        Product::new(ProductId::new(1), "Product A", Money::usd(dec!(50)).unwrap()).unwrap()
    }

    fn priced(quantity: i64) -> Order {
        Order::place(UserId::new(1), &product(), Quantity::new(quantity).unwrap(), Utc::now()).unwrap()
    }

    #[tokio::test]
    async fn save_assigns_sequential_ids() {
        let repo = InMemoryOrderRepository::new();

        let first = repo.save(priced(1)).await.unwrap();
        let second = repo.save(priced(2)).await.unwrap();

        assert_eq!(first.id_typed(), Some(OrderId::new(1)));
        assert_eq!(second.id_typed(), Some(OrderId::new(2)));
        assert_eq!(repo.len(), 2);
        assert_eq!(repo.find_by_id(OrderId::new(2)).await.unwrap(), Some(second));
    }

    #[tokio::test]
    async fn save_rejects_drafts_and_already_saved_orders() {
        let repo = InMemoryOrderRepository::new();

        let draft = Order::draft(UserId::new(1), &product(), Quantity::new(1).unwrap(), Utc::now());
        assert!(matches!(
            repo.save(draft).await,
            Err(RepositoryError::Domain(DomainError::InvariantViolation(_)))
        ));

        let saved = repo.save(priced(1)).await.unwrap();
        assert!(repo.save(saved).await.is_err());
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn list_all_returns_most_recent_first() {
        let repo = InMemoryOrderRepository::new();
        for q in 1..=3 {
            repo.save(priced(q)).await.unwrap();
        }

        let ids: Vec<i64> = repo
            .list_all()
            .await
            .unwrap()
            .iter()
            .filter_map(|o| o.id_typed().map(|id| id.get()))
            .collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[tokio::test]
    async fn delete_removes_once() {
        let repo = InMemoryOrderRepository::new();
        let saved = repo.save(priced(1)).await.unwrap();

        repo.delete(&saved).await.unwrap();
        assert!(repo.is_empty());
        assert!(matches!(repo.delete(&saved).await, Err(RepositoryError::NotFound)));
    }

    #[tokio::test]
    async fn catalog_and_directory_lookups() {
        let catalog = InMemoryProductCatalog::with_products([product()]);
        assert_eq!(catalog.get_product_by_id(ProductId::new(1)).await.unwrap(), Some(product()));
        assert_eq!(catalog.get_product_by_id(ProductId::new(9)).await.unwrap(), None);
        assert_eq!(catalog.list_products().await.unwrap().len(), 1);

        let user = User::new(UserId::new(4), "Ada", "ada@example.com").unwrap();
        let users = InMemoryUserDirectory::with_users([user.clone()]);
        assert_eq!(users.get_user_by_id(UserId::new(4)).await.unwrap(), Some(user));
        assert_eq!(users.get_user_by_id(UserId::new(5)).await.unwrap(), None);
    }
}

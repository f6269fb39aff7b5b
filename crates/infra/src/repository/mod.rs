//! Storage ports for orders and the read-only collaborators (catalog, users).
//!
//! Orders are written once and never updated. Products and users are owned by
//! other parts of the system; this layer only reads them.

mod in_memory;
#[cfg(feature = "postgres")]
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use orderdesk_core::{DomainError, OrderId, ProductId, UserId};
use orderdesk_orders::Order;
use orderdesk_products::Product;
use orderdesk_users::User;

pub use in_memory::{InMemoryOrderRepository, InMemoryProductCatalog, InMemoryUserDirectory};

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("storage error: {0}")]
    Storage(String),
}

/// Persistence for priced orders.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Persist a priced, not-yet-saved order and return it with its identity.
    async fn save(&self, order: Order) -> Result<Order, RepositoryError>;

    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, RepositoryError>;

    /// All orders, most recent first.
    async fn list_all(&self) -> Result<Vec<Order>, RepositoryError>;

    /// Remove a persisted order. `NotFound` when it no longer exists.
    async fn delete(&self, order: &Order) -> Result<(), RepositoryError>;
}

#[async_trait]
pub trait ProductCatalog: Send + Sync {
    async fn get_product_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError>;

    async fn list_products(&self) -> Result<Vec<Product>, RepositoryError>;
}

#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn get_user_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError>;
}

#[async_trait]
impl<R> OrderRepository for Arc<R>
where
    R: OrderRepository + ?Sized,
{
    async fn save(&self, order: Order) -> Result<Order, RepositoryError> {
        (**self).save(order).await
    }

    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        (**self).find_by_id(id).await
    }

    async fn list_all(&self) -> Result<Vec<Order>, RepositoryError> {
        (**self).list_all().await
    }

    async fn delete(&self, order: &Order) -> Result<(), RepositoryError> {
        (**self).delete(order).await
    }
}

#[async_trait]
impl<C> ProductCatalog for Arc<C>
where
    C: ProductCatalog + ?Sized,
{
    async fn get_product_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        (**self).get_product_by_id(id).await
    }

    async fn list_products(&self) -> Result<Vec<Product>, RepositoryError> {
        (**self).list_products().await
    }
}

#[async_trait]
impl<U> UserDirectory for Arc<U>
where
    U: UserDirectory + ?Sized,
{
    async fn get_user_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        (**self).get_user_by_id(id).await
    }
}

/// Shared precondition for every `save` implementation.
pub(crate) fn ensure_saveable(order: &Order) -> Result<(), RepositoryError> {
    order.ensure_priced()?;
    if order.id_typed().is_some() {
        return Err(DomainError::invariant("order is already persisted").into());
    }
    Ok(())
}

//! Order placement service.
//!
//! Wires the pricing rule to the storage and notification ports:
//!
//! ```text
//! CreateOrder → validate quantity → product → user → Order::place → save → notify
//! ```
//!
//! Precondition failures (bad quantity, unknown product or user) abort before
//! anything is written. Notification happens only after a successful save and
//! never affects the result.

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tracing::instrument;

use orderdesk_core::{DomainError, OrderId};
use orderdesk_orders::{CreateOrder, Order, Quantity};
use orderdesk_products::Product;
use orderdesk_users::User;

use crate::notification::OrderNotifier;
use crate::repository::{OrderRepository, ProductCatalog, RepositoryError, UserDirectory};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Repository(RepositoryError),
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Domain(e) => ServiceError::Domain(e),
            other => ServiceError::Repository(other),
        }
    }
}

/// An order together with the display data of its user and product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderView {
    pub order: Order,
    pub user: User,
    pub product: Product,
}

/// Service wired against trait objects, used by the HTTP layer.
pub type DynOrderService = PlaceOrderService<
    Arc<dyn OrderRepository>,
    Arc<dyn ProductCatalog>,
    Arc<dyn UserDirectory>,
    Arc<dyn OrderNotifier>,
>;

#[derive(Debug, Clone)]
pub struct PlaceOrderService<R, C, U, N> {
    orders: R,
    catalog: C,
    users: U,
    notifier: N,
}

impl<R, C, U, N> PlaceOrderService<R, C, U, N>
where
    R: OrderRepository,
    C: ProductCatalog,
    U: UserDirectory,
    N: OrderNotifier,
{
    pub fn new(orders: R, catalog: C, users: U, notifier: N) -> Self {
        Self {
            orders,
            catalog,
            users,
            notifier,
        }
    }

    /// Price and persist a new order, then announce it.
    #[instrument(
        skip(self, request),
        fields(
            user_id = %request.user_id,
            product_id = %request.product_id,
            quantity = request.quantity
        ),
        err
    )]
    pub async fn place(&self, request: CreateOrder) -> Result<OrderView, ServiceError> {
        let quantity = Quantity::new(request.quantity)?;

        let product = self
            .catalog
            .get_product_by_id(request.product_id)
            .await?
            .ok_or(DomainError::ProductNotFound(request.product_id))?;

        let user = self
            .users
            .get_user_by_id(request.user_id)
            .await?
            .ok_or(DomainError::UserNotFound(request.user_id))?;

        let order = Order::place(user.id_typed(), &product, quantity, Utc::now())?;
        let order = self.orders.save(order).await?;

        tracing::info!(
            order_id = ?order.id_typed(),
            discount = %order.discount(),
            total = %order.total(),
            "order placed"
        );
        self.notifier.notify_order_placed(&order);

        Ok(OrderView { order, user, product })
    }

    #[instrument(skip(self), fields(order_id = %id), err)]
    pub async fn get(&self, id: OrderId) -> Result<OrderView, ServiceError> {
        let order = self.find(id).await?;
        self.view(order).await
    }

    /// Every order, most recent first.
    #[instrument(skip(self), err)]
    pub async fn list(&self) -> Result<Vec<OrderView>, ServiceError> {
        let orders = self.orders.list_all().await?;

        let mut views = Vec::with_capacity(orders.len());
        for order in orders {
            views.push(self.view(order).await?);
        }
        Ok(views)
    }

    #[instrument(skip(self), fields(order_id = %id), err)]
    pub async fn delete(&self, id: OrderId) -> Result<(), ServiceError> {
        let order = self.find(id).await?;

        match self.orders.delete(&order).await {
            Ok(()) => {
                tracing::info!(order_id = %id, "order deleted");
                Ok(())
            }
            // Lost a race with another delete.
            Err(RepositoryError::NotFound) => Err(DomainError::OrderNotFound(id).into()),
            Err(err) => Err(err.into()),
        }
    }

    pub async fn products(&self) -> Result<Vec<Product>, ServiceError> {
        Ok(self.catalog.list_products().await?)
    }

    async fn find(&self, id: OrderId) -> Result<Order, ServiceError> {
        self.orders
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::OrderNotFound(id).into())
    }

    async fn view(&self, order: Order) -> Result<OrderView, ServiceError> {
        let user = self
            .users
            .get_user_by_id(order.user_id())
            .await?
            .ok_or(DomainError::UserNotFound(order.user_id()))?;
        let product = self
            .catalog
            .get_product_by_id(order.product_id())
            .await?
            .ok_or(DomainError::ProductNotFound(order.product_id()))?;

        Ok(OrderView { order, user, product })
    }
}

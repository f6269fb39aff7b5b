//! Postgres-backed adapters (feature `postgres`).
//!
//! Tables:
//!
//! ```text
//! products(id, name, price, currency)
//! users(id, name, email)
//! orders(id, user_id, product_id, quantity, price, discount, total, currency, created_at)
//! ```
//!
//! Amounts are stored as `NUMERIC(12, 2)`. Orders are insert-only; a row that
//! comes back with discount/total inconsistent with the pricing rule is
//! rejected on read.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Row};
use tracing::instrument;

use orderdesk_core::{Money, OrderId, ProductId, UserId};
use orderdesk_orders::{Order, OrderRecord};
use orderdesk_products::Product;
use orderdesk_users::User;

use super::{OrderRepository, ProductCatalog, RepositoryError, UserDirectory, ensure_saveable};

/// DDL for the three tables. Every statement is idempotent.
pub const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS products (
        id BIGSERIAL PRIMARY KEY,
        name TEXT NOT NULL,
        price NUMERIC(12, 2) NOT NULL CHECK (price >= 0),
        currency CHAR(3) NOT NULL DEFAULT 'USD'
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id BIGSERIAL PRIMARY KEY,
        name TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS orders (
        id BIGSERIAL PRIMARY KEY,
        user_id BIGINT NOT NULL REFERENCES users (id),
        product_id BIGINT NOT NULL REFERENCES products (id),
        quantity BIGINT NOT NULL CHECK (quantity > 0),
        price NUMERIC(12, 2) NOT NULL,
        discount NUMERIC(12, 2) NOT NULL,
        total NUMERIC(12, 2) NOT NULL,
        currency CHAR(3) NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
];

/// Create the tables if they do not exist yet.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), RepositoryError> {
    for statement in SCHEMA {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(|e| map_sqlx_error("ensure_schema", e))?;
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct PostgresOrderRepository {
    pool: Arc<PgPool>,
}

impl PostgresOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool: Arc::new(pool) }
    }
}

const ORDER_COLUMNS: &str =
    "id, user_id, product_id, quantity, price, discount, total, currency, created_at";

#[async_trait]
impl OrderRepository for PostgresOrderRepository {
    #[instrument(skip(self, order), fields(product_id = %order.product_id(), user_id = %order.user_id()), err)]
    async fn save(&self, order: Order) -> Result<Order, RepositoryError> {
        ensure_saveable(&order)?;

        let row = sqlx::query(
            r#"
            INSERT INTO orders (
                user_id,
                product_id,
                quantity,
                price,
                discount,
                total,
                currency,
                created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id
            "#,
        )
        .bind(order.user_id().get())
        .bind(order.product_id().get())
        .bind(order.quantity().get())
        .bind(order.unit_price().amount())
        .bind(order.discount().amount())
        .bind(order.total().amount())
        .bind(order.unit_price().currency())
        .bind(order.created_at())
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("save_order", e))?;

        let id: i64 = row
            .try_get("id")
            .map_err(|e| map_sqlx_error("save_order", e))?;

        Ok(order.with_id(OrderId::new(id)))
    }

    #[instrument(skip(self), fields(order_id = %id), err)]
    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"
        ))
        .bind(id.get())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_order", e))?;

        row.map(OrderRow::into_order).transpose()
    }

    #[instrument(skip(self), err)]
    async fn list_all(&self) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_orders", e))?;

        rows.into_iter().map(OrderRow::into_order).collect()
    }

    #[instrument(skip(self, order), fields(order_id = ?order.id_typed()), err)]
    async fn delete(&self, order: &Order) -> Result<(), RepositoryError> {
        let id = order.id_typed().ok_or(RepositoryError::NotFound)?;

        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id.get())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_order", e))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct PostgresProductCatalog {
    pool: Arc<PgPool>,
}

impl PostgresProductCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool: Arc::new(pool) }
    }
}

#[async_trait]
impl ProductCatalog for PostgresProductCatalog {
    #[instrument(skip(self), fields(product_id = %id), err)]
    async fn get_product_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            "SELECT id, name, price, currency FROM products WHERE id = $1",
        )
        .bind(id.get())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_product", e))?;

        row.map(ProductRow::into_product).transpose()
    }

    #[instrument(skip(self), err)]
    async fn list_products(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(
            "SELECT id, name, price, currency FROM products ORDER BY id ASC",
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_products", e))?;

        rows.into_iter().map(ProductRow::into_product).collect()
    }
}

#[derive(Debug, Clone)]
pub struct PostgresUserDirectory {
    pool: Arc<PgPool>,
}

impl PostgresUserDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool: Arc::new(pool) }
    }
}

#[async_trait]
impl UserDirectory for PostgresUserDirectory {
    #[instrument(skip(self), fields(user_id = %id), err)]
    async fn get_user_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query("SELECT id, name, email FROM users WHERE id = $1")
            .bind(id.get())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_user", e))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let id: i64 = row.try_get("id").map_err(|e| map_sqlx_error("find_user", e))?;
        let name: String = row.try_get("name").map_err(|e| map_sqlx_error("find_user", e))?;
        let email: String = row.try_get("email").map_err(|e| map_sqlx_error("find_user", e))?;

        Ok(Some(User::new(UserId::new(id), name, email)?))
    }
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> RepositoryError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {}: {}", operation, db_err.message());
            match db_err.code().as_deref() {
                // Foreign key violation: the referenced user or product is gone.
                Some("23503") => RepositoryError::Storage(format!("{msg} (missing referenced row)")),
                _ => RepositoryError::Storage(msg),
            }
        }
        sqlx::Error::RowNotFound => RepositoryError::NotFound,
        sqlx::Error::PoolClosed => {
            RepositoryError::Storage(format!("connection pool closed in {}", operation))
        }
        _ => RepositoryError::Storage(format!("sqlx error in {}: {}", operation, err)),
    }
}

// SQLx row types

#[derive(Debug)]
struct OrderRow {
    id: i64,
    user_id: i64,
    product_id: i64,
    quantity: i64,
    price: Decimal,
    discount: Decimal,
    total: Decimal,
    currency: String,
    created_at: DateTime<Utc>,
}

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for OrderRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(OrderRow {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            product_id: row.try_get("product_id")?,
            quantity: row.try_get("quantity")?,
            price: row.try_get("price")?,
            discount: row.try_get("discount")?,
            total: row.try_get("total")?,
            currency: row.try_get("currency")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

impl OrderRow {
    fn into_order(self) -> Result<Order, RepositoryError> {
        let record = OrderRecord {
            id: OrderId::new(self.id),
            user_id: UserId::new(self.user_id),
            product_id: ProductId::new(self.product_id),
            quantity: self.quantity,
            unit_price: self.price,
            discount: self.discount,
            total: self.total,
            currency: self.currency.trim().to_string(),
            created_at: self.created_at,
        };
        Ok(Order::restore(record)?)
    }
}

#[derive(Debug)]
struct ProductRow {
    id: i64,
    name: String,
    price: Decimal,
    currency: String,
}

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for ProductRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(ProductRow {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            price: row.try_get("price")?,
            currency: row.try_get("currency")?,
        })
    }
}

impl ProductRow {
    fn into_product(self) -> Result<Product, RepositoryError> {
        let price = Money::new(self.price, &self.currency)?;
        Ok(Product::new(ProductId::new(self.id), self.name, price)?)
    }
}

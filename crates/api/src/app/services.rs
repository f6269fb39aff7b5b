//! Service wiring: pick storage adapters from configuration, connect the
//! order bus to the confirmation listener, and build the order service.

use std::sync::Arc;

use thiserror::Error;

use orderdesk_events::{EventBus, InMemoryEventBus};
use orderdesk_infra::seed;
use orderdesk_infra::{
    AppConfig, BusOrderNotifier, ConfirmationListener, DynOrderService, InMemoryOrderRepository,
    InMemoryProductCatalog, InMemoryUserDirectory, Mailer, OrderEnvelope, OrderNotifier,
    OrderRepository, PlaceOrderService, ProductCatalog, RepositoryError, ServiceError,
    StorageConfig, UserDirectory,
};

#[derive(Debug, Error)]
pub enum ServicesError {
    #[error("failed to connect to database: {0}")]
    Database(String),

    #[error("failed to prepare storage: {0}")]
    Storage(#[from] RepositoryError),

    #[error("failed to seed demo data: {0}")]
    Seed(#[from] ServiceError),

    #[error("persistent stores requested but the `postgres` feature is disabled")]
    PostgresDisabled,
}

pub struct AppServices {
    pub orders: DynOrderService,
}

type Stores = (
    Arc<dyn OrderRepository>,
    Arc<dyn ProductCatalog>,
    Arc<dyn UserDirectory>,
);

pub async fn build_services(
    config: &AppConfig,
    mailer: Arc<dyn Mailer>,
) -> Result<AppServices, ServicesError> {
    let (orders, catalog, users) = match &config.storage {
        StorageConfig::InMemory { seed_demo_data } => in_memory_stores(*seed_demo_data).await?,
        StorageConfig::Postgres { database_url } => postgres_stores(database_url).await?,
    };

    let bus: Arc<InMemoryEventBus<OrderEnvelope>> = Arc::new(InMemoryEventBus::new());

    // Subscribe before the service can publish anything.
    let listener = Arc::new(ConfirmationListener::new(
        catalog.clone(),
        users.clone(),
        mailer,
        config.mail.clone(),
    ));
    listener.spawn(bus.subscribe());

    let notifier: Arc<dyn OrderNotifier> = Arc::new(BusOrderNotifier::new(bus));

    Ok(AppServices {
        orders: PlaceOrderService::new(orders, catalog, users, notifier),
    })
}

async fn in_memory_stores(seed_demo_data: bool) -> Result<Stores, ServicesError> {
    let orders = Arc::new(InMemoryOrderRepository::new());
    let catalog = Arc::new(InMemoryProductCatalog::new());
    let users = Arc::new(InMemoryUserDirectory::new());

    if seed_demo_data {
        seed::seed_demo_data(&catalog, &users, orders.as_ref()).await?;
    }
    tracing::info!(seed_demo_data, "using in-memory stores");

    let orders: Arc<dyn OrderRepository> = orders;
    let catalog: Arc<dyn ProductCatalog> = catalog;
    let users: Arc<dyn UserDirectory> = users;
    Ok((orders, catalog, users))
}

#[cfg(feature = "postgres")]
async fn postgres_stores(database_url: &str) -> Result<Stores, ServicesError> {
    use orderdesk_infra::repository::postgres::{
        PostgresOrderRepository, PostgresProductCatalog, PostgresUserDirectory, ensure_schema,
    };

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
        .map_err(|e| ServicesError::Database(e.to_string()))?;

    ensure_schema(&pool).await?;
    tracing::info!("using postgres stores");

    let orders: Arc<dyn OrderRepository> = Arc::new(PostgresOrderRepository::new(pool.clone()));
    let catalog: Arc<dyn ProductCatalog> = Arc::new(PostgresProductCatalog::new(pool.clone()));
    let users: Arc<dyn UserDirectory> = Arc::new(PostgresUserDirectory::new(pool));
    Ok((orders, catalog, users))
}

#[cfg(not(feature = "postgres"))]
async fn postgres_stores(_database_url: &str) -> Result<Stores, ServicesError> {
    Err(ServicesError::PostgresDisabled)
}

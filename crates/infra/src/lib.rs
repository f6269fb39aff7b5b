//! Infrastructure layer: storage adapters, notification delivery, configuration
//! and the order placement service that ties them together.

pub mod config;
pub mod notification;
pub mod repository;
pub mod seed;
pub mod service;


pub use config::{AppConfig, ConfigError, MailSettings, StorageConfig};
pub use notification::{
    BusOrderNotifier, ConfirmationListener, Email, MailError, Mailer, NoopOrderNotifier,
    OrderEnvelope, OrderNotifier, RecordingMailer, TracingMailer,
};
pub use repository::{
    InMemoryOrderRepository, InMemoryProductCatalog, InMemoryUserDirectory, OrderRepository,
    ProductCatalog, RepositoryError, UserDirectory,
};
pub use service::{DynOrderService, OrderView, PlaceOrderService, ServiceError};

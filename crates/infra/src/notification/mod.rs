//! Order notification: announcing placed orders and mailing confirmations.
//!
//! ```text
//! PlaceOrderService ──notify_order_placed──▶ BusOrderNotifier
//!                                                 │ EventEnvelope<OrderPlaced>
//!                                                 ▼
//!                                            InMemoryEventBus
//!                                                 │
//!                                                 ▼
//!                                      ConfirmationListener ──▶ Mailer
//! ```
//!
//! Nothing on this path can fail an order: every error is logged and dropped.

mod confirmation;
mod mail;
mod notifier;

pub use confirmation::{ConfirmationError, ConfirmationListener, render_confirmation};
pub use mail::{Email, MailError, Mailer, RecordingMailer, TracingMailer};
pub use notifier::{BusOrderNotifier, NoopOrderNotifier, OrderEnvelope, OrderNotifier};

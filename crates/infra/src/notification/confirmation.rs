use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Mutex};

use thiserror::Error;
use tokio::task::JoinHandle;
use uuid::Uuid;

use orderdesk_core::{ProductId, UserId};
use orderdesk_events::Subscription;
use orderdesk_orders::OrderPlaced;
use orderdesk_products::Product;
use orderdesk_users::User;

use crate::config::MailSettings;
use crate::repository::{ProductCatalog, RepositoryError, UserDirectory};

use super::mail::{Email, MailError, Mailer};
use super::notifier::OrderEnvelope;

pub const CONFIRMATION_SUBJECT: &str = "Order Confirmation";

/// Number of recent event ids remembered for duplicate suppression.
const SEEN_CAPACITY: usize = 1024;

#[derive(Debug, Error)]
pub enum ConfirmationError {
    #[error("user {0} not found")]
    UnknownUser(UserId),

    #[error("product {0} not found")]
    UnknownProduct(ProductId),

    #[error(transparent)]
    Lookup(#[from] RepositoryError),

    #[error(transparent)]
    Mail(#[from] MailError),
}

/// Turns `OrderPlaced` events into confirmation emails.
pub struct ConfirmationListener<C, U, M> {
    catalog: C,
    users: U,
    mailer: M,
    settings: MailSettings,
    seen: Mutex<(HashSet<Uuid>, VecDeque<Uuid>)>,
}

impl<C, U, M> ConfirmationListener<C, U, M>
where
    C: ProductCatalog,
    U: UserDirectory,
    M: Mailer,
{
    pub fn new(catalog: C, users: U, mailer: M, settings: MailSettings) -> Self {
        Self {
            catalog,
            users,
            mailer,
            settings,
            seen: Mutex::new((HashSet::new(), VecDeque::new())),
        }
    }

    /// Send the confirmation for one envelope.
    ///
    /// Returns `Ok(false)` when the envelope was already handled.
    pub async fn handle(&self, envelope: &OrderEnvelope) -> Result<bool, ConfirmationError> {
        if !self.first_delivery(envelope.event_id()) {
            tracing::debug!(event_id = %envelope.event_id(), "duplicate order event skipped");
            return Ok(false);
        }

        let event = envelope.payload();
        let user = self
            .users
            .get_user_by_id(event.user_id)
            .await?
            .ok_or(ConfirmationError::UnknownUser(event.user_id))?;
        let product = self
            .catalog
            .get_product_by_id(event.product_id)
            .await?
            .ok_or(ConfirmationError::UnknownProduct(event.product_id))?;

        let email = render_confirmation(&self.settings, event, &user, &product);
        self.mailer.send(&email).await?;

        tracing::info!(order_id = %event.order_id, to = %email.to, "order confirmation sent");
        Ok(true)
    }

    fn first_delivery(&self, event_id: Uuid) -> bool {
        let Ok(mut guard) = self.seen.lock() else {
            return true;
        };
        let (set, order) = &mut *guard;

        if !set.insert(event_id) {
            return false;
        }
        order.push_back(event_id);
        if order.len() > SEEN_CAPACITY {
            if let Some(oldest) = order.pop_front() {
                set.remove(&oldest);
            }
        }
        true
    }
}

impl<C, U, M> ConfirmationListener<C, U, M>
where
    C: ProductCatalog + 'static,
    U: UserDirectory + 'static,
    M: Mailer + 'static,
{
    /// Drain `subscription` on a blocking task until the bus goes away.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn(self: Arc<Self>, subscription: Subscription<OrderEnvelope>) -> JoinHandle<()> {
        let runtime = tokio::runtime::Handle::current();

        tokio::task::spawn_blocking(move || {
            while let Ok(envelope) = subscription.recv() {
                if let Err(err) = runtime.block_on(self.handle(&envelope)) {
                    tracing::warn!(
                        order_id = %envelope.payload().order_id,
                        error = %err,
                        "failed to send order confirmation"
                    );
                }
            }
            tracing::debug!("order bus closed; confirmation listener stopped");
        })
    }
}

/// Render the confirmation email for a placed order.
pub fn render_confirmation(
    settings: &MailSettings,
    event: &OrderPlaced,
    user: &User,
    product: &Product,
) -> Email {
    let body = format!(
        "Hello {name},\n\
         \n\
         Thank you for your order! Here are the details:\n\
         \n\
         - Order ID: {order_id}\n\
         - Product: {product}\n\
         - Quantity: {quantity}\n\
         - Price per item: {price}\n\
         - Discount: {discount}\n\
         - Total: {total}\n\
         \n\
         View your order: {base_url}/orders/{order_id}\n\
         \n\
         Thanks,\n\
         {app_name}\n",
        name = user.name(),
        order_id = event.order_id,
        product = product.name(),
        quantity = event.quantity,
        price = event.unit_price,
        discount = event.discount,
        total = event.total,
        base_url = settings.base_url,
        app_name = settings.app_name,
    );

    Email {
        from: settings.from.clone(),
        to: user.email().to_string(),
        subject: CONFIRMATION_SUBJECT.to_string(),
        body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use orderdesk_core::{Money, OrderId};
    use orderdesk_events::EventEnvelope;
    use orderdesk_orders::ORDER_AGGREGATE_TYPE;
    use rust_decimal_macros::dec;

    use crate::notification::RecordingMailer;
    use crate::repository::{InMemoryProductCatalog, InMemoryUserDirectory};

    fn product() -> Product {
        Product::new(ProductId::new(2), "Product B", Money::usd(dec!(20)).unwrap()).unwrap()
    }

    fn user() -> User {
        User::new(UserId::new(2), "Grace Hopper", "grace@example.com").unwrap()
    }

    fn placed(user_id: i64) -> OrderPlaced {
        OrderPlaced {
            order_id: OrderId::new(12),
            user_id: UserId::new(user_id),
            product_id: ProductId::new(2),
            quantity: 6,
            unit_price: Money::usd(dec!(20)).unwrap(),
            discount: Money::usd(dec!(2)).unwrap(),
            total: Money::usd(dec!(108)).unwrap(),
            occurred_at: Utc::now(),
        }
    }

    fn listener(
        mailer: Arc<RecordingMailer>,
    ) -> ConfirmationListener<InMemoryProductCatalog, InMemoryUserDirectory, Arc<RecordingMailer>> {
        ConfirmationListener::new(
            InMemoryProductCatalog::with_products([product()]),
            InMemoryUserDirectory::with_users([user()]),
            mailer,
            MailSettings::default(),
        )
    }

    #[test]
    fn renders_order_details() {
        let email = render_confirmation(&MailSettings::default(), &placed(2), &user(), &product());

        assert_eq!(email.subject, "Order Confirmation");
        assert_eq!(email.to, "grace@example.com");
        assert_eq!(email.from, "orders@orderdesk.local");
        assert!(email.body.starts_with("Hello Grace Hopper,"));
        assert!(email.body.contains("- Order ID: 12"));
        assert!(email.body.contains("- Product: Product B"));
        assert!(email.body.contains("- Quantity: 6"));
        assert!(email.body.contains("- Price per item: 20.00 USD"));
        assert!(email.body.contains("- Discount: 2.00 USD"));
        assert!(email.body.contains("- Total: 108.00 USD"));
        assert!(email.body.contains("http://localhost:8080/orders/12"));
        assert!(email.body.trim_end().ends_with("orderdesk"));
    }

    #[tokio::test]
    async fn handle_sends_once_per_event() {
        let mailer = Arc::new(RecordingMailer::new());
        let listener = listener(mailer.clone());
        let envelope = EventEnvelope::wrap(ORDER_AGGREGATE_TYPE, 12, placed(2));

        assert!(listener.handle(&envelope).await.unwrap());
        assert!(!listener.handle(&envelope).await.unwrap());
        assert_eq!(mailer.sent().len(), 1);
    }

    #[tokio::test]
    async fn unknown_user_is_reported() {
        let mailer = Arc::new(RecordingMailer::new());
        let listener = listener(mailer.clone());
        let envelope = EventEnvelope::wrap(ORDER_AGGREGATE_TYPE, 12, placed(99));

        let err = listener.handle(&envelope).await.unwrap_err();
        assert!(matches!(err, ConfirmationError::UnknownUser(id) if id == UserId::new(99)));
        assert!(mailer.sent().is_empty());
    }

    #[tokio::test]
    async fn mail_failure_is_reported_not_panicked() {
        let mailer = Arc::new(RecordingMailer::failing(MailError::Transport("down".to_string())));
        let listener = listener(mailer);
        let envelope = EventEnvelope::wrap(ORDER_AGGREGATE_TYPE, 12, placed(2));

        assert!(matches!(listener.handle(&envelope).await, Err(ConfirmationError::Mail(_))));
    }
}

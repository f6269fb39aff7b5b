use std::sync::Arc;

use chrono::Utc;

use orderdesk_events::{EventBus, EventEnvelope};
use orderdesk_orders::{ORDER_AGGREGATE_TYPE, Order, OrderPlaced};

/// Envelope type carried on the order bus.
pub type OrderEnvelope = EventEnvelope<OrderPlaced>;

/// Announces persisted orders.
///
/// Called exactly once per successful save, after the save. Implementations
/// must not fail the caller; problems are logged.
pub trait OrderNotifier: Send + Sync {
    fn notify_order_placed(&self, order: &Order);
}

impl<N> OrderNotifier for Arc<N>
where
    N: OrderNotifier + ?Sized,
{
    fn notify_order_placed(&self, order: &Order) {
        (**self).notify_order_placed(order)
    }
}

/// Publishes an `OrderPlaced` envelope on an event bus.
#[derive(Debug, Clone)]
pub struct BusOrderNotifier<B> {
    bus: B,
}

impl<B> BusOrderNotifier<B> {
    pub fn new(bus: B) -> Self {
        Self { bus }
    }
}

impl<B> OrderNotifier for BusOrderNotifier<B>
where
    B: EventBus<OrderEnvelope>,
{
    fn notify_order_placed(&self, order: &Order) {
        let event = match OrderPlaced::from_order(order, Utc::now()) {
            Ok(event) => event,
            Err(err) => {
                tracing::warn!(error = %err, "cannot announce order");
                return;
            }
        };

        let order_id = event.order_id;
        let envelope = EventEnvelope::wrap(ORDER_AGGREGATE_TYPE, order_id.get(), event);
        let event_id = envelope.event_id();

        match self.bus.publish(envelope) {
            Ok(()) => tracing::debug!(%order_id, %event_id, "order placed event published"),
            Err(err) => tracing::warn!(%order_id, error = ?err, "failed to publish order placed event"),
        }
    }
}

/// Drops every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopOrderNotifier;

impl OrderNotifier for NoopOrderNotifier {
    fn notify_order_placed(&self, order: &Order) {
        tracing::trace!(order_id = ?order.id_typed(), "notification disabled");
    }
}

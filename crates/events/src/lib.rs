//! Domain events and the in-process event bus that distributes them.
//!
//! Events are published **after** the state change they describe has been
//! persisted; consumers (e.g. the confirmation mailer) react to them without
//! being able to affect the operation that produced them.

pub mod bus;
pub mod envelope;
pub mod event;
pub mod in_memory_bus;

pub use bus::{EventBus, Subscription};
pub use envelope::EventEnvelope;
pub use event::Event;
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};

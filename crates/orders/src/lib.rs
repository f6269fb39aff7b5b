//! Orders domain module.
//!
//! Business rules for placing an order, implemented purely as deterministic
//! domain logic (no IO, no HTTP, no storage): the bulk-discount pricing rule
//! and the order aggregate that carries its results.

pub mod events;
pub mod order;
pub mod pricing;
pub mod request;

pub use events::{ORDER_AGGREGATE_TYPE, OrderPlaced};
pub use order::{Order, OrderRecord, OrderStatus};
pub use pricing::{BULK_DISCOUNT_RATE, BULK_DISCOUNT_THRESHOLD, MAX_QUANTITY, Pricing, Quantity};
pub use request::CreateOrder;

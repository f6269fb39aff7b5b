//! Products domain module.
//!
//! Products are read-only from the ordering core's point of view: an order only
//! needs a product's current price (and its name for display).

pub mod product;

pub use product::Product;

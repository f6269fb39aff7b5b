//! Users (customers) as seen by the ordering core.
//!
//! Read-only: orders reference users by id, and the user's name and email are
//! resolved for display and for the confirmation email.

pub mod user;

pub use user::User;

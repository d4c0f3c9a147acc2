//! tonic service implementations.
//!
//! Each handler validates and sanitises the wire request, calls the domain
//! service, and maps the result back. No business rule lives here.

mod health;
mod products;
mod subscriptions;

pub use health::HealthHandler;
pub use products::ProductHandler;
pub use subscriptions::SubscriptionHandler;

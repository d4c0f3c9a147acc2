//! Subscription plans domain module.
//!
//! Plans belong to a product and carry a name, a duration in days and a
//! price. There is no variant structure; the referenced product's existence
//! is enforced by the storage backend, not here.

pub mod in_memory;
pub mod plan;
pub mod service;
pub mod store;

pub use in_memory::InMemoryPlanStore;
pub use plan::{CreatePlan, PlanChange, PlanDuration, SubscriptionPlan, UpdatePlan};
pub use service::PlanService;
pub use store::PlanStore;

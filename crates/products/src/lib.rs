//! Products domain module.
//!
//! Business rules for the product catalog: the `Product` entity with its
//! Digital/Physical/Subscription variant payload, create/update requests, and
//! the `ProductService` that drives an injected [`ProductStore`]. No IO lives
//! here; storage backends implement the store trait elsewhere.

pub mod in_memory;
pub mod product;
pub mod service;
pub mod store;

pub use in_memory::InMemoryProductStore;
pub use product::{
    CreateProduct, DigitalDraft, DigitalInfo, PhysicalDraft, PhysicalInfo, Product, ProductChange,
    ProductType, ProductVariant, SubscriptionDraft, SubscriptionInfo, SubscriptionPeriod,
    UpdateProduct,
};
pub use service::ProductService;
pub use store::ProductStore;

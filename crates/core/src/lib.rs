//! `catalog-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives shared by the product and
//! subscription modules (no infrastructure concerns).

pub mod entity;
pub mod error;
pub mod id;
pub mod page;
pub mod price;
pub mod value_object;

pub use entity::Entity;
pub use error::{DomainError, DomainResult, StoreError};
pub use id::{PlanId, ProductId};
pub use page::{Page, PageRequest};
pub use price::Price;
pub use value_object::ValueObject;

//! Value object trait: equality by value, not identity.
//!
//! Value objects are domain objects that have **no identity** - they are defined entirely
//! by their attribute values. Two value objects with the same values are considered equal.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. Their constructors
/// are the only place a constraint on the wrapped value is checked, so holding
/// one is proof the constraint held:
///
/// ```ignore
/// let price = Price::try_new(29.99, "price")?;   // checked once, here
/// let plan = SubscriptionPlan { price, .. };      // never re-validated
/// ```
///
/// The trait requires:
/// - **Clone**: value objects are cheap to copy
/// - **PartialEq**: value objects are compared by their attribute values
/// - **Debug**: helpful for logging and tests
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}

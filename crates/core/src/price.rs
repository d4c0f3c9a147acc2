//! Monetary amounts.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::value_object::ValueObject;

/// A finite, non-negative monetary amount capped at [`Price::MAX`].
///
/// Constructors take the field name so the rejection message can be returned
/// to the caller unchanged (e.g. "renewal_price must be greater than 0").
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(f64);

impl ValueObject for Price {}

impl Price {
    pub const MAX: f64 = 1_000_000.0;

    /// Accepts `0..=MAX`.
    pub fn try_new(value: f64, field: &str) -> DomainResult<Self> {
        if !value.is_finite() {
            return Err(DomainError::bad_request(format!("{field} must be a finite number")));
        }
        if value < 0.0 {
            return Err(DomainError::bad_request(format!("{field} cannot be negative")));
        }
        if value > Self::MAX {
            return Err(DomainError::bad_request(format!("{field} cannot exceed 1,000,000")));
        }
        Ok(Self(value))
    }

    /// Accepts `(0, MAX]`.
    pub fn try_positive(value: f64, field: &str) -> DomainResult<Self> {
        let price = Self::try_new(value, field)?;
        if price.0 == 0.0 {
            return Err(DomainError::bad_request(format!("{field} must be greater than 0")));
        }
        Ok(price)
    }

    /// Wrap a value read back from storage without re-checking it.
    pub fn from_stored(value: f64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_a_valid_price_but_not_a_positive_one() {
        assert_eq!(Price::try_new(0.0, "price").unwrap().value(), 0.0);
        assert_eq!(
            Price::try_positive(0.0, "price").unwrap_err(),
            DomainError::bad_request("price must be greater than 0")
        );
    }

    #[test]
    fn negative_nan_and_oversized_values_are_rejected() {
        assert_eq!(
            Price::try_new(-0.01, "price").unwrap_err(),
            DomainError::bad_request("price cannot be negative")
        );
        assert!(Price::try_new(f64::NAN, "price").is_err());
        assert!(Price::try_new(f64::INFINITY, "price").is_err());
        assert_eq!(
            Price::try_positive(1_000_000.01, "renewal_price").unwrap_err(),
            DomainError::bad_request("renewal_price cannot exceed 1,000,000")
        );
        assert!(Price::try_new(Price::MAX, "price").is_ok());
    }
}

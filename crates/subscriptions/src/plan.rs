use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use catalog_core::{DomainError, DomainResult, Entity, PlanId, Price, ProductId, ValueObject};

/// Plan length in days, `1..=3650`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlanDuration(u32);

impl ValueObject for PlanDuration {}

impl PlanDuration {
    /// Ten years.
    pub const MAX_DAYS: u32 = 3650;

    pub fn new(days: i64) -> DomainResult<Self> {
        if days <= 0 {
            return Err(DomainError::bad_request("duration must be greater than 0"));
        }
        if days > i64::from(Self::MAX_DAYS) {
            return Err(DomainError::bad_request(
                "duration cannot exceed 10 years (3650 days)",
            ));
        }
        Ok(Self(days as u32))
    }

    pub fn days(&self) -> u32 {
        self.0
    }
}

/// Entity: SubscriptionPlan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionPlan {
    id: PlanId,
    product_id: ProductId,
    plan_name: String,
    duration: PlanDuration,
    price: Price,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl SubscriptionPlan {
    pub fn new(
        id: PlanId,
        product_id: ProductId,
        plan_name: impl Into<String>,
        duration: PlanDuration,
        price: Price,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            product_id,
            plan_name: plan_name.into(),
            duration,
            price,
            created_at,
            updated_at: created_at,
        }
    }

    pub fn with_updated_at(mut self, updated_at: DateTime<Utc>) -> Self {
        self.updated_at = updated_at;
        self
    }

    pub fn id_typed(&self) -> PlanId {
        self.id
    }

    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    pub fn plan_name(&self) -> &str {
        &self.plan_name
    }

    pub fn duration(&self) -> PlanDuration {
        self.duration
    }

    pub fn price(&self) -> Price {
        self.price
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn apply(&mut self, change: &PlanChange) {
        match change {
            PlanChange::PlanName(v) => self.plan_name = v.clone(),
            PlanChange::Duration(v) => self.duration = *v,
            PlanChange::Price(v) => self.price = *v,
        }
    }
}

impl Entity for SubscriptionPlan {
    type Id = PlanId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Request: create a plan.
///
/// `product_id` is the caller's raw string; the service parses it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatePlan {
    pub product_id: String,
    pub plan_name: String,
    pub duration: PlanDuration,
    pub price: Price,
}

/// Request: partially update a plan. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdatePlan {
    pub plan_name: Option<String>,
    pub duration: Option<PlanDuration>,
    pub price: Option<Price>,
}

impl UpdatePlan {
    pub fn changes(&self) -> Vec<PlanChange> {
        let mut changes = Vec::new();
        if let Some(name) = self.plan_name.as_ref().filter(|v| !v.is_empty()) {
            changes.push(PlanChange::PlanName(name.clone()));
        }
        if let Some(duration) = self.duration {
            changes.push(PlanChange::Duration(duration));
        }
        if let Some(price) = self.price {
            changes.push(PlanChange::Price(price));
        }
        changes
    }
}

/// One field => value assignment of a plan update set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlanChange {
    PlanName(String),
    Duration(PlanDuration),
    Price(Price),
}

impl PlanChange {
    /// Storage column this change writes.
    pub fn column(&self) -> &'static str {
        match self {
            Self::PlanName(_) => "plan_name",
            Self::Duration(_) => "duration",
            Self::Price(_) => "price",
        }
    }
}

//! Plan use cases on top of an injected [`PlanStore`].

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use catalog_core::{DomainError, DomainResult, Page, PageRequest, PlanId, ProductId, StoreError};

use crate::plan::{CreatePlan, SubscriptionPlan, UpdatePlan};
use crate::store::PlanStore;

const NOT_FOUND: &str = "subscription plan not found";

#[derive(Clone)]
pub struct PlanService {
    store: Arc<dyn PlanStore>,
}

impl PlanService {
    pub fn new(store: Arc<dyn PlanStore>) -> Self {
        Self { store }
    }

    /// Create a plan for an existing product.
    ///
    /// Product existence is not pre-checked; the storage foreign key rejects
    /// orphans and that rejection is reported as a bad request.
    pub async fn create(&self, req: CreatePlan) -> DomainResult<SubscriptionPlan> {
        let product_id = ProductId::parse(&req.product_id)?;
        let plan = SubscriptionPlan::new(
            PlanId::new(),
            product_id,
            req.plan_name,
            req.duration,
            req.price,
            Utc::now(),
        );

        let stored = self.store.create(&plan).await.map_err(|err| match err {
            StoreError::ForeignKey(_) => DomainError::bad_request("product does not exist"),
            other => other.into(),
        })?;
        info!(plan_id = %stored.id_typed(), product_id = %product_id, "subscription plan created");
        Ok(stored)
    }

    pub async fn get(&self, id: PlanId) -> DomainResult<SubscriptionPlan> {
        self.store
            .get_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(NOT_FOUND))
    }

    pub async fn update(&self, id: PlanId, req: UpdatePlan) -> DomainResult<SubscriptionPlan> {
        self.get(id).await?;

        let changes = req.changes();
        if changes.is_empty() {
            return Err(DomainError::bad_request("no fields to update"));
        }

        let updated = self
            .store
            .update(id, &changes)
            .await?
            .ok_or_else(|| DomainError::not_found(NOT_FOUND))?;
        info!(plan_id = %id, fields = changes.len(), "subscription plan updated");
        Ok(updated)
    }

    pub async fn delete(&self, id: PlanId) -> DomainResult<()> {
        self.get(id).await?;

        if !self.store.delete(id).await? {
            return Err(DomainError::not_found(NOT_FOUND));
        }
        info!(plan_id = %id, "subscription plan deleted");
        Ok(())
    }

    pub async fn list(
        &self,
        product_id: ProductId,
        request: PageRequest,
    ) -> DomainResult<Page<SubscriptionPlan>> {
        Ok(self.store.page_by_product(product_id, request).await?)
    }
}

impl core::fmt::Debug for PlanService {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PlanService").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::in_memory::InMemoryPlanStore;
    use crate::plan::PlanDuration;
    use catalog_core::Price;

    fn create_req(product_id: ProductId) -> CreatePlan {
        CreatePlan {
            product_id: product_id.to_string(),
            plan_name: "Monthly".into(),
            duration: PlanDuration::new(30).unwrap(),
            price: Price::try_positive(29.99, "price").unwrap(),
        }
    }

    #[tokio::test]
    async fn create_then_get_round_trips_every_field() {
        let svc = PlanService::new(Arc::new(InMemoryPlanStore::new()));
        let product_id = ProductId::new();

        let created = svc.create(create_req(product_id)).await.unwrap();
        let fetched = svc.get(created.id_typed()).await.unwrap();

        assert_eq!(fetched.plan_name(), "Monthly");
        assert_eq!(fetched.duration().days(), 30);
        assert_eq!(fetched.price().value(), 29.99);
        assert_eq!(fetched.product_id(), product_id);
    }

    #[tokio::test]
    async fn malformed_product_id_is_a_bad_request() {
        let svc = PlanService::new(Arc::new(InMemoryPlanStore::new()));
        let mut req = create_req(ProductId::new());
        req.product_id = "abc".into();
        assert_eq!(
            svc.create(req).await.unwrap_err(),
            DomainError::bad_request("invalid product ID format")
        );
    }

    #[tokio::test]
    async fn foreign_key_violation_becomes_bad_request() {
        let known = ProductId::new();
        let store = InMemoryPlanStore::with_product_check(move |id| id == known);
        let svc = PlanService::new(Arc::new(store));

        assert!(svc.create(create_req(known)).await.is_ok());
        assert_eq!(
            svc.create(create_req(ProductId::new())).await.unwrap_err(),
            DomainError::bad_request("product does not exist")
        );
    }

    #[tokio::test]
    async fn update_requires_at_least_one_field() {
        let svc = PlanService::new(Arc::new(InMemoryPlanStore::new()));
        let plan = svc.create(create_req(ProductId::new())).await.unwrap();

        assert_eq!(
            svc.update(plan.id_typed(), UpdatePlan::default()).await.unwrap_err(),
            DomainError::bad_request("no fields to update")
        );

        let updated = svc
            .update(
                plan.id_typed(),
                UpdatePlan {
                    price: Some(Price::try_positive(24.99, "price").unwrap()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.price().value(), 24.99);
        assert_eq!(updated.plan_name(), "Monthly");
    }

    #[tokio::test]
    async fn missing_plans_are_not_found() {
        let svc = PlanService::new(Arc::new(InMemoryPlanStore::new()));
        let id = PlanId::new();
        assert_eq!(svc.get(id).await.unwrap_err(), DomainError::not_found(NOT_FOUND));
        assert_eq!(svc.delete(id).await.unwrap_err(), DomainError::not_found(NOT_FOUND));
        let req = UpdatePlan {
            plan_name: Some("Yearly".into()),
            ..Default::default()
        };
        assert_eq!(svc.update(id, req).await.unwrap_err(), DomainError::not_found(NOT_FOUND));
    }

    #[tokio::test]
    async fn list_is_scoped_to_the_product() {
        let svc = PlanService::new(Arc::new(InMemoryPlanStore::new()));
        let a = ProductId::new();
        let b = ProductId::new();
        for _ in 0..3 {
            svc.create(create_req(a)).await.unwrap();
        }
        svc.create(create_req(b)).await.unwrap();

        let page = svc.list(a, PageRequest::new(0, 2)).await.unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total, 3);
        assert!(page.items.iter().all(|p| p.product_id() == a));
        assert_eq!(page.request, PageRequest::new(1, 2));
    }
}

//! Persistence contract for subscription plans.

use catalog_core::{Page, PageRequest, PlanId, ProductId, StoreError};

use crate::plan::{PlanChange, SubscriptionPlan};

/// Storage collaborator for plans.
///
/// `create` fails with [`StoreError::ForeignKey`] when the owning product
/// does not exist.
#[async_trait::async_trait]
pub trait PlanStore: Send + Sync {
    async fn create(&self, plan: &SubscriptionPlan) -> Result<SubscriptionPlan, StoreError>;

    async fn get_by_id(&self, id: PlanId) -> Result<Option<SubscriptionPlan>, StoreError>;

    async fn list_by_product(
        &self,
        product_id: ProductId,
        request: PageRequest,
    ) -> Result<Vec<SubscriptionPlan>, StoreError>;

    async fn count_by_product(&self, product_id: ProductId) -> Result<u64, StoreError>;

    async fn update(
        &self,
        id: PlanId,
        changes: &[PlanChange],
    ) -> Result<Option<SubscriptionPlan>, StoreError>;

    async fn delete(&self, id: PlanId) -> Result<bool, StoreError>;

    /// Page of a product's plans plus total; two independent calls unless
    /// overridden.
    async fn page_by_product(
        &self,
        product_id: ProductId,
        request: PageRequest,
    ) -> Result<Page<SubscriptionPlan>, StoreError> {
        let items = self.list_by_product(product_id, request).await?;
        let total = self.count_by_product(product_id).await?;
        Ok(Page::new(items, total, request))
    }
}

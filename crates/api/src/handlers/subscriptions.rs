use tonic::{Request, Response, Status};

use catalog_subscriptions::PlanService;

use super::products::wire_u32;
use crate::errors::to_status;
use crate::proto::{self, subscription_service_server::SubscriptionService as SubscriptionRpc};
use crate::validation;

#[derive(Debug, Clone)]
pub struct SubscriptionHandler {
    service: PlanService,
}

impl SubscriptionHandler {
    pub fn new(service: PlanService) -> Self {
        Self { service }
    }
}

#[tonic::async_trait]
impl SubscriptionRpc for SubscriptionHandler {
    async fn create_subscription_plan(
        &self,
        request: Request<proto::CreateSubscriptionPlanRequest>,
    ) -> Result<Response<proto::CreateSubscriptionPlanResponse>, Status> {
        let req = validation::create_plan(request.get_ref()).map_err(to_status)?;
        let plan = self.service.create(req).await.map_err(to_status)?;
        Ok(Response::new(proto::CreateSubscriptionPlanResponse {
            subscription_plan: Some((&plan).into()),
        }))
    }

    async fn get_subscription_plan(
        &self,
        request: Request<proto::GetSubscriptionPlanRequest>,
    ) -> Result<Response<proto::GetSubscriptionPlanResponse>, Status> {
        let id = validation::plan_id(&request.get_ref().id).map_err(to_status)?;
        let plan = self.service.get(id).await.map_err(to_status)?;
        Ok(Response::new(proto::GetSubscriptionPlanResponse {
            subscription_plan: Some((&plan).into()),
        }))
    }

    async fn update_subscription_plan(
        &self,
        request: Request<proto::UpdateSubscriptionPlanRequest>,
    ) -> Result<Response<proto::UpdateSubscriptionPlanResponse>, Status> {
        let (id, req) = validation::update_plan(request.get_ref()).map_err(to_status)?;
        let plan = self.service.update(id, req).await.map_err(to_status)?;
        Ok(Response::new(proto::UpdateSubscriptionPlanResponse {
            subscription_plan: Some((&plan).into()),
        }))
    }

    async fn delete_subscription_plan(
        &self,
        request: Request<proto::DeleteSubscriptionPlanRequest>,
    ) -> Result<Response<proto::DeleteSubscriptionPlanResponse>, Status> {
        let id = validation::plan_id(&request.get_ref().id).map_err(to_status)?;
        self.service.delete(id).await.map_err(to_status)?;
        Ok(Response::new(proto::DeleteSubscriptionPlanResponse { success: true }))
    }

    async fn list_subscription_plans(
        &self,
        request: Request<proto::ListSubscriptionPlansRequest>,
    ) -> Result<Response<proto::ListSubscriptionPlansResponse>, Status> {
        let req = request.get_ref();
        let product_id = validation::plan_owner(&req.product_id).map_err(to_status)?;
        let page_request = validation::page_request(req.page, req.page_size);

        let page = self
            .service
            .list(product_id, page_request)
            .await
            .map_err(to_status)?;
        Ok(Response::new(proto::ListSubscriptionPlansResponse {
            subscription_plans: page.items.iter().map(Into::into).collect(),
            total: i64::try_from(page.total).unwrap_or(i64::MAX),
            page: wire_u32(page.request.page()),
            page_size: wire_u32(page.request.page_size()),
        }))
    }
}

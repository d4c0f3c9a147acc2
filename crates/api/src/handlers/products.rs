use tonic::{Request, Response, Status};

use catalog_products::ProductService;

use crate::errors::to_status;
use crate::proto::{self, product_service_server::ProductService as ProductRpc};
use crate::validation;

#[derive(Debug, Clone)]
pub struct ProductHandler {
    service: ProductService,
}

impl ProductHandler {
    pub fn new(service: ProductService) -> Self {
        Self { service }
    }
}

#[tonic::async_trait]
impl ProductRpc for ProductHandler {
    async fn create_product(
        &self,
        request: Request<proto::CreateProductRequest>,
    ) -> Result<Response<proto::CreateProductResponse>, Status> {
        let req = validation::create_product(request.get_ref()).map_err(to_status)?;
        let product = self.service.create(req).await.map_err(to_status)?;
        Ok(Response::new(proto::CreateProductResponse {
            product: Some((&product).into()),
        }))
    }

    async fn get_product(
        &self,
        request: Request<proto::GetProductRequest>,
    ) -> Result<Response<proto::GetProductResponse>, Status> {
        let id = validation::product_id(&request.get_ref().id).map_err(to_status)?;
        let product = self.service.get(id).await.map_err(to_status)?;
        Ok(Response::new(proto::GetProductResponse {
            product: Some((&product).into()),
        }))
    }

    async fn update_product(
        &self,
        request: Request<proto::UpdateProductRequest>,
    ) -> Result<Response<proto::UpdateProductResponse>, Status> {
        let (id, req) = validation::update_product(request.get_ref()).map_err(to_status)?;
        let product = self.service.update(id, req).await.map_err(to_status)?;
        Ok(Response::new(proto::UpdateProductResponse {
            product: Some((&product).into()),
        }))
    }

    async fn delete_product(
        &self,
        request: Request<proto::DeleteProductRequest>,
    ) -> Result<Response<proto::DeleteProductResponse>, Status> {
        let id = validation::product_id(&request.get_ref().id).map_err(to_status)?;
        self.service.delete(id).await.map_err(to_status)?;
        Ok(Response::new(proto::DeleteProductResponse { success: true }))
    }

    async fn list_products(
        &self,
        request: Request<proto::ListProductsRequest>,
    ) -> Result<Response<proto::ListProductsResponse>, Status> {
        let req = request.get_ref();
        let filter = validation::list_filter(req.r#type).map_err(to_status)?;
        let page_request = validation::page_request(req.page, req.page_size);

        let page = self
            .service
            .list(filter, page_request)
            .await
            .map_err(to_status)?;
        Ok(Response::new(proto::ListProductsResponse {
            products: page.items.iter().map(Into::into).collect(),
            total: i64::try_from(page.total).unwrap_or(i64::MAX),
            page: wire_u32(page.request.page()),
            page_size: wire_u32(page.request.page_size()),
        }))
    }
}

pub(crate) fn wire_u32(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

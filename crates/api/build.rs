//! gRPC service stubs for the `catalog.v1` package.
//!
//! Messages are hand-written prost structs in `src/proto.rs`; only the
//! service traits, servers and clients are generated, so no `protoc` is
//! required.

use tonic_build::manual::{Builder, Method, Service};

fn method(name: &str, route: &str, input: &str, output: &str) -> Method {
    Method::builder()
        .name(name)
        .route_name(route)
        .input_type(format!("crate::proto::{input}"))
        .output_type(format!("crate::proto::{output}"))
        .codec_path("tonic::codec::ProstCodec")
        .build()
}

fn main() {
    let products = Service::builder()
        .name("ProductService")
        .package("catalog.v1")
        .method(method("create_product", "CreateProduct", "CreateProductRequest", "CreateProductResponse"))
        .method(method("get_product", "GetProduct", "GetProductRequest", "GetProductResponse"))
        .method(method("update_product", "UpdateProduct", "UpdateProductRequest", "UpdateProductResponse"))
        .method(method("delete_product", "DeleteProduct", "DeleteProductRequest", "DeleteProductResponse"))
        .method(method("list_products", "ListProducts", "ListProductsRequest", "ListProductsResponse"))
        .build();

    let subscriptions = Service::builder()
        .name("SubscriptionService")
        .package("catalog.v1")
        .method(method(
            "create_subscription_plan",
            "CreateSubscriptionPlan",
            "CreateSubscriptionPlanRequest",
            "CreateSubscriptionPlanResponse",
        ))
        .method(method(
            "get_subscription_plan",
            "GetSubscriptionPlan",
            "GetSubscriptionPlanRequest",
            "GetSubscriptionPlanResponse",
        ))
        .method(method(
            "update_subscription_plan",
            "UpdateSubscriptionPlan",
            "UpdateSubscriptionPlanRequest",
            "UpdateSubscriptionPlanResponse",
        ))
        .method(method(
            "delete_subscription_plan",
            "DeleteSubscriptionPlan",
            "DeleteSubscriptionPlanRequest",
            "DeleteSubscriptionPlanResponse",
        ))
        .method(method(
            "list_subscription_plans",
            "ListSubscriptionPlans",
            "ListSubscriptionPlansRequest",
            "ListSubscriptionPlansResponse",
        ))
        .build();

    let health = Service::builder()
        .name("HealthService")
        .package("catalog.v1")
        .method(method("health", "Health", "HealthRequest", "HealthResponse"))
        .build();

    Builder::new().compile(&[products, subscriptions, health]);
}

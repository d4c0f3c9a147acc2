//! Server assembly: domain services, gRPC handlers, reflection and the auth
//! layer, served on a caller-supplied listener.

use std::future::Future;
use std::sync::Arc;

use sqlx::PgPool;
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::Server;
use tracing::info;

use catalog_auth::AuthGate;
use catalog_infra::{PostgresPlanStore, PostgresProductStore};
use catalog_products::{InMemoryProductStore, ProductService};
use catalog_subscriptions::{InMemoryPlanStore, PlanService};

use crate::auth_layer::AuthLayer;
use crate::descriptor;
use crate::handlers::{HealthHandler, ProductHandler, SubscriptionHandler};
use crate::proto::health_service_server::HealthServiceServer;
use crate::proto::product_service_server::ProductServiceServer;
use crate::proto::subscription_service_server::SubscriptionServiceServer;

#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    #[error("failed to build reflection service: {0}")]
    Reflection(#[from] tonic_reflection::server::Error),

    #[error("transport error: {0}")]
    Transport(#[from] tonic::transport::Error),
}

/// The two domain services the handlers drive.
#[derive(Debug, Clone)]
pub struct AppServices {
    pub products: ProductService,
    pub plans: PlanService,
}

impl AppServices {
    /// Postgres-backed services sharing one pool.
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            products: ProductService::new(Arc::new(PostgresProductStore::new(pool.clone()))),
            plans: PlanService::new(Arc::new(PostgresPlanStore::new(pool))),
        }
    }

    /// In-memory services for tests and local runs. Plan creation checks the
    /// owning product against the product store, like the foreign key does.
    pub fn in_memory() -> Self {
        let products = InMemoryProductStore::arc();
        let lookup = products.clone();
        let plans = InMemoryPlanStore::with_product_check(move |id| lookup.contains(id));
        Self {
            products: ProductService::new(products),
            plans: PlanService::new(Arc::new(plans)),
        }
    }
}

/// Serve every catalog service on `listener` until `shutdown` resolves.
///
/// Reflection sits behind the auth layer like everything else; only methods
/// matching the gate's bypass suffix are reachable without credentials.
pub async fn serve(
    services: AppServices,
    gate: AuthGate,
    listener: TcpListener,
    shutdown: impl Future<Output = ()> + Send,
) -> Result<(), ServeError> {
    let reflection = tonic_reflection::server::Builder::configure()
        .register_file_descriptor_set(descriptor::file_descriptor_set())
        .build_v1()?;

    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "gRPC server listening");
    }

    Server::builder()
        .layer(AuthLayer::new(gate))
        .add_service(ProductServiceServer::new(ProductHandler::new(services.products)))
        .add_service(SubscriptionServiceServer::new(SubscriptionHandler::new(services.plans)))
        .add_service(HealthServiceServer::new(HealthHandler))
        .add_service(reflection)
        .serve_with_incoming_shutdown(TcpListenerStream::new(listener), shutdown)
        .await?;

    info!("gRPC server stopped");
    Ok(())
}

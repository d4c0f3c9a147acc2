//! Basic-auth gate as a tower layer around the whole tonic router.
//!
//! Running at the HTTP level means one check covers unary and streaming
//! calls alike, and it runs before any handler is reached. The request path
//! (`/catalog.v1.ProductService/CreateProduct`) is the method name the gate
//! matches its bypass suffix against.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use http::header::AUTHORIZATION;
use tonic::Status;
use tonic::body::BoxBody;
use tonic::metadata::{Ascii, MetadataValue};
use tonic::service::Interceptor;
use tower::{Layer, Service};
use tracing::{debug, warn};

use catalog_auth::{Access, AuthGate, CallMetadata, encode_basic_auth};

type BoxFuture<T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'static>>;

#[derive(Debug, Clone)]
pub struct AuthLayer {
    gate: Arc<AuthGate>,
}

impl AuthLayer {
    pub fn new(gate: AuthGate) -> Self {
        Self {
            gate: Arc::new(gate),
        }
    }
}

impl<S> Layer<S> for AuthLayer {
    type Service = AuthService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthService {
            inner,
            gate: self.gate.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AuthService<S> {
    inner: S,
    gate: Arc<AuthGate>,
}

impl<S, ReqBody> Service<http::Request<ReqBody>> for AuthService<S>
where
    S: Service<http::Request<ReqBody>, Response = http::Response<BoxBody>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    ReqBody: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = BoxFuture<Self::Response, Self::Error>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: http::Request<ReqBody>) -> Self::Future {
        let method = req.uri().path();
        // A header that is not visible ASCII cannot be a Basic credential;
        // hand the gate a value it will reject as malformed.
        let authorization = req
            .headers()
            .get(AUTHORIZATION)
            .map(|v| v.to_str().unwrap_or_default());

        match self.gate.check(method, Some(CallMetadata { authorization })) {
            Ok(access) => {
                match access {
                    Access::Bypassed => debug!(method, "auth bypassed"),
                    Access::Authenticated { username } => debug!(method, %username, "authenticated"),
                }
                // The clone that was polled ready is the one that must serve
                // the call.
                let clone = self.inner.clone();
                let mut inner = std::mem::replace(&mut self.inner, clone);
                Box::pin(inner.call(req))
            }
            Err(err) => {
                warn!(method, reason = %err, "rejected unauthenticated call");
                let response = Status::unauthenticated(err.to_string()).into_http();
                Box::pin(async move { Ok(response) })
            }
        }
    }
}

/// Client-side interceptor that attaches a Basic `authorization` header to
/// every outgoing call.
#[derive(Clone)]
pub struct BasicAuthInterceptor {
    header: MetadataValue<Ascii>,
}

impl BasicAuthInterceptor {
    pub fn new(username: &str, password: &str) -> Result<Self, Status> {
        let header = encode_basic_auth(username, password)
            .parse()
            .map_err(|_| Status::invalid_argument("credentials are not valid header text"))?;
        Ok(Self { header })
    }
}

impl core::fmt::Debug for BasicAuthInterceptor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("BasicAuthInterceptor([REDACTED])")
    }
}

impl Interceptor for BasicAuthInterceptor {
    fn call(&mut self, mut request: tonic::Request<()>) -> Result<tonic::Request<()>, Status> {
        request
            .metadata_mut()
            .insert("authorization", self.header.clone());
        Ok(request)
    }
}

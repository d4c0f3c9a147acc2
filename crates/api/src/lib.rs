//! gRPC API: wire messages, handlers, boundary validation, the auth layer
//! and server assembly.

pub mod auth_layer;
pub mod convert;
pub mod descriptor;
pub mod errors;
pub mod handlers;
pub mod proto;
pub mod sanitize;
pub mod server;
pub mod validation;

pub use auth_layer::{AuthLayer, BasicAuthInterceptor};
pub use server::{AppServices, ServeError, serve};

//! `catalog-auth`: Basic-auth credential checking (transport-agnostic).
//!
//! This crate is intentionally decoupled from gRPC/HTTP and storage: the API
//! layer hands it the method name and the raw `authorization` value, and gets
//! back an allow/deny decision.

pub mod authenticator;
pub mod basic;
pub mod credentials;
pub mod error;
pub mod gate;

pub use authenticator::Authenticator;
pub use basic::{encode_basic_auth, BasicCredentials};
pub use credentials::{CredentialStore, InMemoryCredentialStore, PasswordHash};
pub use error::{AuthError, CredentialError};
pub use gate::{Access, AuthGate, CallMetadata, DEFAULT_BYPASS_SUFFIX};

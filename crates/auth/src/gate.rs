//! Per-call authentication decision.
//!
//! The gate sees every call before any business logic runs. It is stateless:
//! each call re-authenticates, there are no sessions or tokens.

use crate::authenticator::Authenticator;
use crate::basic::BasicCredentials;
use crate::error::AuthError;

/// Method-name suffix that skips authentication (health checks).
pub const DEFAULT_BYPASS_SUFFIX: &str = "/Health";

/// The request facts the gate looks at.
#[derive(Debug, Clone, Copy, Default)]
pub struct CallMetadata<'a> {
    /// First `authorization` value, if any.
    pub authorization: Option<&'a str>,
}

/// Outcome of a successful gate check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    /// The method matched the bypass suffix; no credentials were looked at.
    Bypassed,
    Authenticated { username: String },
}

#[derive(Debug, Clone)]
pub struct AuthGate {
    authenticator: Authenticator,
    bypass_suffix: String,
}

impl AuthGate {
    pub fn new(authenticator: Authenticator) -> Self {
        Self::with_bypass_suffix(authenticator, DEFAULT_BYPASS_SUFFIX)
    }

    pub fn with_bypass_suffix(authenticator: Authenticator, suffix: impl Into<String>) -> Self {
        Self {
            authenticator,
            bypass_suffix: suffix.into(),
        }
    }

    pub fn authenticator(&self) -> &Authenticator {
        &self.authenticator
    }

    pub fn is_bypassed(&self, method: &str) -> bool {
        !self.bypass_suffix.is_empty() && method.ends_with(&self.bypass_suffix)
    }

    /// Decide whether `method` may proceed.
    ///
    /// `metadata` is `None` when the transport delivered no metadata at all.
    pub fn check(&self, method: &str, metadata: Option<CallMetadata<'_>>) -> Result<Access, AuthError> {
        if self.is_bypassed(method) {
            return Ok(Access::Bypassed);
        }

        let metadata = metadata.ok_or(AuthError::MissingMetadata)?;
        let header = metadata.authorization.ok_or(AuthError::MissingHeader)?;
        let creds = BasicCredentials::from_header(header)?;

        if !self.authenticator.validate(&creds.username, &creds.password) {
            return Err(AuthError::InvalidCredentials);
        }

        Ok(Access::Authenticated {
            username: creds.username,
        })
    }
}

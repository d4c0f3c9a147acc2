//! `Basic <base64(username:password)>` header codec.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::AuthError;

const SCHEME: &str = "Basic ";

/// Credentials decoded from an `authorization` value.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicCredentials {
    pub username: String,
    pub password: String,
}

impl BasicCredentials {
    /// Decode an `authorization` header value.
    ///
    /// The payload is split on the first colon only, so passwords may
    /// themselves contain colons.
    pub fn from_header(value: &str) -> Result<Self, AuthError> {
        let encoded = value
            .strip_prefix(SCHEME)
            .ok_or(AuthError::InvalidHeaderFormat)?;

        let decoded = STANDARD
            .decode(encoded.trim())
            .map_err(|_| AuthError::InvalidEncoding)?;
        let decoded = String::from_utf8(decoded).map_err(|_| AuthError::InvalidEncoding)?;

        let (username, password) = decoded
            .split_once(':')
            .ok_or(AuthError::InvalidCredentialsFormat)?;

        Ok(Self {
            username: username.to_string(),
            password: password.to_string(),
        })
    }

    pub fn to_header(&self) -> String {
        encode_basic_auth(&self.username, &self.password)
    }
}

impl core::fmt::Debug for BasicCredentials {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BasicCredentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Build the `authorization` value for a username/password pair.
pub fn encode_basic_auth(username: &str, password: &str) -> String {
    format!("{SCHEME}{}", STANDARD.encode(format!("{username}:{password}")))
}

use thiserror::Error;

/// Why a call was refused by the gate.
///
/// The `Display` text is what the caller sees in the `Unauthenticated` status,
/// so it never names the user or echoes the supplied secret.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    #[error("missing metadata")]
    MissingMetadata,

    #[error("missing authorization header")]
    MissingHeader,

    #[error("invalid authorization header format")]
    InvalidHeaderFormat,

    #[error("invalid base64 encoding")]
    InvalidEncoding,

    #[error("invalid credentials format")]
    InvalidCredentialsFormat,

    #[error("invalid username or password")]
    InvalidCredentials,
}

/// Credential store mutation failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CredentialError {
    #[error("username cannot be empty")]
    EmptyUsername,

    #[error("username cannot contain ':'")]
    ColonInUsername,

    #[error("credential store lock poisoned")]
    Poisoned,
}

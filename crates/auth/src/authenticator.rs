//! Username/password validation over an injected credential store.

use std::sync::Arc;

use crate::credentials::{CredentialStore, InMemoryCredentialStore};
use crate::error::CredentialError;

/// Validates username/password pairs.
///
/// Cheap to clone; clones share the same store.
#[derive(Clone)]
pub struct Authenticator {
    store: Arc<dyn CredentialStore>,
}

impl Authenticator {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    /// Authenticator backed by a fresh, empty in-memory store.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryCredentialStore::new()))
    }

    /// Exact match against the store. Empty or unknown usernames fail closed.
    pub fn validate(&self, username: &str, password: &str) -> bool {
        if username.is_empty() {
            return false;
        }
        self.store.verify(username, password)
    }

    /// Add (or replace) a user at runtime.
    pub fn add_user(&self, username: &str, password: &str) -> Result<(), CredentialError> {
        self.store.upsert(username, password)?;
        tracing::info!(username, "credential registered");
        Ok(())
    }

    pub fn usernames(&self) -> Vec<String> {
        self.store.usernames()
    }
}

impl core::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Authenticator")
            .field("usernames", &self.store.usernames())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> Authenticator {
        let auth = Authenticator::in_memory();
        auth.add_user("admin", "password123").unwrap();
        auth.add_user("client", "client456").unwrap();
        auth
    }

    #[test]
    fn validate_matches_exactly() {
        let auth = seeded();
        assert!(auth.validate("admin", "password123"));
        assert!(auth.validate("client", "client456"));
        assert!(!auth.validate("admin", "client456"));
        assert!(!auth.validate("Admin", "password123"));
    }

    #[test]
    fn empty_or_unknown_username_fails_closed() {
        let auth = seeded();
        assert!(!auth.validate("", "password123"));
        assert!(!auth.validate("ghost", ""));
    }

    #[test]
    fn added_users_are_visible_through_clones() {
        let auth = seeded();
        let clone = auth.clone();
        clone.add_user("test", "test789").unwrap();
        assert!(auth.validate("test", "test789"));
        assert_eq!(auth.usernames(), vec!["admin", "client", "test"]);
    }
}

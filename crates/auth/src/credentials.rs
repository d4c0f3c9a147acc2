//! Credential storage.
//!
//! Passwords are never kept in the clear: each entry is a random salt plus
//! `HMAC-SHA256(salt, password)`, and verification goes through
//! `Mac::verify_slice` so the comparison is constant time.

use std::collections::HashMap;
use std::sync::RwLock;

use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::Sha256;

use crate::error::CredentialError;

type HmacSha256 = Hmac<Sha256>;

const SALT_LEN: usize = 16;

/// Source of truth for username/password pairs.
///
/// Injected into [`crate::Authenticator`] so a secrets-aware backend can
/// replace the in-memory map without touching the gate.
pub trait CredentialStore: Send + Sync {
    /// True only when `username` exists and `password` matches.
    fn verify(&self, username: &str, password: &str) -> bool;

    /// Insert or replace a user's password.
    fn upsert(&self, username: &str, password: &str) -> Result<(), CredentialError>;

    fn contains(&self, username: &str) -> bool;

    /// Known usernames, sorted.
    fn usernames(&self) -> Vec<String>;
}

/// Salted password digest.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash {
    salt: [u8; SALT_LEN],
    digest: Vec<u8>,
}

impl PasswordHash {
    /// Hash `password` under a fresh random salt.
    pub fn new(password: &str) -> Self {
        let mut salt = [0u8; SALT_LEN];
        rand::thread_rng().fill_bytes(&mut salt);
        Self::with_salt(salt, password)
    }

    fn with_salt(salt: [u8; SALT_LEN], password: &str) -> Self {
        let digest = keyed(&salt, password).finalize().into_bytes().to_vec();
        Self { salt, digest }
    }

    pub fn verify(&self, password: &str) -> bool {
        keyed(&self.salt, password).verify_slice(&self.digest).is_ok()
    }
}

impl core::fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("PasswordHash([REDACTED])")
    }
}

fn keyed(salt: &[u8], password: &str) -> HmacSha256 {
    // HMAC accepts keys of any length, so this cannot fail for a 16-byte salt.
    let mut mac = match HmacSha256::new_from_slice(salt) {
        Ok(mac) => mac,
        Err(_) => unreachable!("hmac accepts any key length"),
    };
    mac.update(password.as_bytes());
    mac
}

/// In-memory credential store guarded by an `RwLock`.
///
/// Reads (every authenticated call) take the shared lock; `upsert` takes the
/// exclusive one, so concurrent admin writes are safe.
pub struct InMemoryCredentialStore {
    users: RwLock<HashMap<String, PasswordHash>>,
    // Compared against for unknown usernames so a miss costs the same as a
    // wrong password.
    decoy: PasswordHash,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            decoy: PasswordHash::new(""),
        }
    }

    /// Build a store from `(username, password)` pairs.
    pub fn with_users<'a>(
        users: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<Self, CredentialError> {
        let store = Self::new();
        for (username, password) in users {
            store.upsert(username, password)?;
        }
        Ok(store)
    }
}

impl Default for InMemoryCredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for InMemoryCredentialStore {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("InMemoryCredentialStore")
            .field("usernames", &self.usernames())
            .finish()
    }
}

impl CredentialStore for InMemoryCredentialStore {
    fn verify(&self, username: &str, password: &str) -> bool {
        let Ok(users) = self.users.read() else {
            return false;
        };
        match users.get(username) {
            Some(hash) => hash.verify(password),
            None => {
                let _ = self.decoy.verify(password);
                false
            }
        }
    }

    fn upsert(&self, username: &str, password: &str) -> Result<(), CredentialError> {
        if username.is_empty() {
            return Err(CredentialError::EmptyUsername);
        }
        if username.contains(':') {
            return Err(CredentialError::ColonInUsername);
        }
        let hash = PasswordHash::new(password);
        let mut users = self.users.write().map_err(|_| CredentialError::Poisoned)?;
        users.insert(username.to_string(), hash);
        Ok(())
    }

    fn contains(&self, username: &str) -> bool {
        self.users
            .read()
            .map(|users| users.contains_key(username))
            .unwrap_or(false)
    }

    fn usernames(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .users
            .read()
            .map(|users| users.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn hash_verifies_only_the_original_password() {
        let hash = PasswordHash::new("password123");
        assert!(hash.verify("password123"));
        assert!(!hash.verify("password124"));
        assert!(!hash.verify(""));
    }

    #[test]
    fn same_password_gets_different_salts() {
        let a = PasswordHash::new("secret");
        let b = PasswordHash::new("secret");
        assert_ne!(a, b);
        assert!(a.verify("secret") && b.verify("secret"));
    }

    #[test]
    fn debug_output_never_contains_digest_material() {
        let hash = PasswordHash::new("secret");
        assert_eq!(format!("{hash:?}"), "PasswordHash([REDACTED])");
    }

    #[test]
    fn store_verifies_known_users_and_fails_closed_otherwise() {
        let store = InMemoryCredentialStore::with_users([("admin", "password123")]).unwrap();
        assert!(store.verify("admin", "password123"));
        assert!(!store.verify("admin", "password12"));
        assert!(!store.verify("nobody", "password123"));
        assert!(!store.verify("", ""));
    }

    #[test]
    fn upsert_replaces_existing_password() {
        let store = InMemoryCredentialStore::new();
        store.upsert("client", "old").unwrap();
        store.upsert("client", "new").unwrap();
        assert!(!store.verify("client", "old"));
        assert!(store.verify("client", "new"));
        assert_eq!(store.usernames(), vec!["client".to_string()]);
    }

    #[test]
    fn upsert_rejects_usernames_basic_auth_cannot_carry() {
        let store = InMemoryCredentialStore::new();
        assert_eq!(store.upsert("", "x"), Err(CredentialError::EmptyUsername));
        assert_eq!(store.upsert("a:b", "x"), Err(CredentialError::ColonInUsername));
        assert!(store.usernames().is_empty());
    }

    #[test]
    fn concurrent_writers_and_readers_do_not_lose_users() {
        let store = Arc::new(InMemoryCredentialStore::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = store.clone();
                std::thread::spawn(move || {
                    let name = format!("user{i}");
                    store.upsert(&name, "pw").unwrap();
                    assert!(store.verify(&name, "pw"));
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(store.usernames().len(), 8);
    }
}

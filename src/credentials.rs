//! Bearer token lookup.
//!
//! The fetcher never reads ambient state: whatever provides the token is handed
//! to it explicitly as a [`CredentialSource`]. The usual source is
//! [`StorageCredential`], which reads a fixed key from a local storage area at
//! the time of every call, so logging in or out takes effect immediately.

use std::fmt;
use std::sync::Arc;

use crate::storage::StorageArea;

/// Something that can produce the bearer token for the next request.
pub trait CredentialSource: Send + Sync {
    /// Returns the current token, or `None` to send the request unauthenticated.
    fn bearer_token(&self) -> Option<String>;
}

/// Reads the token from a storage area under a fixed key.
#[derive(Clone)]
pub struct StorageCredential {
    area: Arc<dyn StorageArea>,
    key: String,
}

impl StorageCredential {
    pub fn new(area: Arc<dyn StorageArea>, key: impl Into<String>) -> Self {
        Self { area, key: key.into() }
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl fmt::Debug for StorageCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageCredential")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

impl CredentialSource for StorageCredential {
    fn bearer_token(&self) -> Option<String> {
        // An empty value is the same as no value
        self.area.get_item(&self.key).filter(|t| !t.is_empty())
    }
}

/// A fixed token, for service-to-service callers and tests.
#[derive(Clone)]
pub struct StaticCredential(Option<String>);

impl StaticCredential {
    pub fn new(token: impl Into<String>) -> Self {
        let token = token.into();
        Self((!token.is_empty()).then_some(token))
    }

    pub fn none() -> Self {
        Self(None)
    }
}

impl fmt::Debug for StaticCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print the token itself
        f.debug_tuple("StaticCredential")
            .field(&self.0.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl CredentialSource for StaticCredential {
    fn bearer_token(&self) -> Option<String> {
        self.0.clone()
    }
}

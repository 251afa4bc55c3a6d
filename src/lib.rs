//! JSON fetch helper.
//!
//! A thin layer over an HTTP transport that sends JSON, adds
//! `Authorization: Bearer <token>` when a token is stored in local storage and
//! hands back the parsed JSON reply.
//!
//! ```no_run
//! use gosub_fetcher::storage::{InMemoryLocalStore, LocalStore, StorageArea};
//! use gosub_fetcher::Fetcher;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let base = url::Url::parse("https://api.example.com")?;
//! let area = InMemoryLocalStore::new().area(&base.origin())?;
//! area.set_item("token", "eyJhbGciOi...")?;
//!
//! let fetcher = Fetcher::builder()
//!     .base_url(base)
//!     .local_storage(area)
//!     .build()?;
//!
//! let me = fetcher.get("/users/me").await?;
//! let created = fetcher.post("/posts", &serde_json::json!({ "title": "hi" })).await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod credentials;
pub mod errors;
pub mod net;
pub mod storage;

#[cfg(test)]
pub(crate) mod testing;

pub use config::FetcherConfig;
pub use credentials::{CredentialSource, StaticCredential, StorageCredential};
pub use errors::{FetchError, FetchErrorKind};
pub use net::{FetchRequest, Fetcher, FetcherBuilder, JsonResponse, Method, Transport};

//! Local storage for the fetcher.
//!
//! The fetcher reads its bearer token from a **LocalStorage**-like key/value
//! store: persistent data per origin, shared by every caller that talks to that
//! origin. This module provides the traits and the backends.
//!
//! - [`StorageArea`] — key/value API (`get_item`, `set_item`, `remove_item`, `clear`).
//! - [`LocalStore`] — hands out one [`StorageArea`] per origin.
//! - [`InMemoryLocalStore`] — non-persistent store, for tests and ephemeral sessions.
//! - [`SqliteLocalStore`] — SQLite-backed persistent store (feature `sqlite_store`).
//!
//! # Example
//!
//! ```no_run
//! use gosub_fetcher::storage::{InMemoryLocalStore, LocalStore, StorageArea};
//!
//! let store = InMemoryLocalStore::new();
//! let origin = url::Url::parse("https://api.example.com").unwrap().origin();
//! let area = store.area(&origin).unwrap();
//! area.set_item("token", "secret").unwrap();
//! ```

/// Storage area module, defining the key/value storage interface.
pub mod area;

/// Local storage backends.
pub mod local {
    /// In-memory local storage implementation.
    pub mod in_memory;
    /// SQLite-backed local storage implementation.
    #[cfg(feature = "sqlite_store")]
    pub mod sqlite_store;
}

pub use area::{LocalStore, StorageArea};
pub use local::in_memory::InMemoryLocalStore;
#[cfg(feature = "sqlite_store")]
pub use local::sqlite_store::SqliteLocalStore;

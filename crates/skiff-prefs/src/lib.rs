//! Skiff Prefs: preference synchronization core shared by Skiff clients.
//!
//! Responsibilities:
//! - enumerating and reading/writing per-profile preference sets through an
//!   injected storage backend
//! - fanning asynchronous profile reads/writes out and joining their keyed
//!   results deterministically
//! - assembling and validating the portable preference blob exchanged by
//!   export and import

pub mod blob;
pub mod error;
pub mod export;
pub mod fanout;
pub mod import;
pub mod store;

pub use blob::{PrefsBlob, PREFS_MAGIC, PREFS_VERSION};
pub use error::{FanOutError, PrefsError, StoreError};
pub use export::PrefsExporter;
pub use fanout::{join_keyed, DEFAULT_DEADLINE};
pub use import::PrefsImporter;
pub use store::{InMemoryProfileStore, ProfileEnumerator, ProfileStore};

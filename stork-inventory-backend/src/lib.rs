//! # stork-inventory-backend
//!
//! Record model and backend adapters for the Stork IT asset inventory.
//!
//! The inventory keeps three tables (computers, printers, network equipment)
//! in a hosted PostgREST service. This crate provides:
//!
//! - the typed record model ([`PcRecord`], [`PrinterRecord`],
//!   [`NetworkRecord`], [`InstalledSoftware`]) with a static
//!   [`RecordDescriptor`] per type,
//! - the [`RecordBackend`] CRUD + search trait and [`InstalledSoftwareSource`],
//! - [`RestBackend`] / [`RestInstalledSoftware`] for PostgREST (Supabase),
//! - [`InMemoryBackend`] / [`InMemorySoftwareSource`] for offline use and tests.
//!
//! ## Feature Flags
//!
//! - **`native-tls`** *(default)* — Use the platform's native TLS implementation.
//! - **`rustls`** — Use rustls. Recommended for cross-compilation.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use stork_inventory_backend::{PrinterRecord, RecordBackend, RestBackend, RestConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RestConfig::new("https://xyz.supabase.co", "anon-key")?;
//!     let printers = RestBackend::<PrinterRecord>::new(config)?;
//!
//!     for p in printers.search("laserjet").await? {
//!         println!("#{} {}", p.meta.id, p.data.model.unwrap_or_default());
//!     }
//!     Ok(())
//! }
//! ```

mod backends;
mod error;
mod http_client;
mod traits;
mod types;
mod utils;

pub use backends::{
    InMemoryBackend, InMemorySoftwareSource, RestBackend, RestConfig, RestInstalledSoftware,
};
pub use error::{BackendError, Result};
pub use traits::{InstalledSoftwareSource, RecordBackend};
pub use types::*;
pub use utils::datetime::parse_date;
pub use utils::log_sanitizer::truncate_for_log;

//! Stork Inventory Core Library
//!
//! Client-side list state engine shared by the PC, printer and network
//! equipment panels:
//! - pure list transforms (sort, visibility filter, paginate, validate,
//!   selection, confirmation gate)
//! - the generic panel controller with lifecycle and debounced search
//! - export shaping and the rich-text note value
//!
//! Storage is reached only through
//! [`RecordBackend`](stork_inventory_backend::RecordBackend); file writing
//! only through [`export::Exporter`].

pub mod engine;
pub mod error;
pub mod export;
pub mod i18n;
pub mod rich_text;
pub mod services;
pub mod utils;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use error::{CoreError, CoreResult};
pub use i18n::Language;
pub use services::{InventoryPanel, PanelOptions};

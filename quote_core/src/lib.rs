//! # quote_core - Interior Quotation Engine
//!
//! `quote_core` turns material selections into priced quotations. It owns the
//! inventory of priced materials, the selection state a quotation sheet is
//! built from, and the two pricing models: per-row accumulation for full
//! quotations and single-pick min/max bounds for the console estimator.
//!
//! ## Design Philosophy
//!
//! - **Pure pricing**: estimation functions take plain data and return plain data
//! - **JSON-First**: all types implement Serialize/Deserialize
//! - **No coercion**: negative amounts and blank names are errors, never clamped
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use quote_core::estimate::{Estimate, EstimateMeta};
//! use quote_core::selection::{QuoteSheet, SelectionRow};
//! use quote_core::store::InventoryStore;
//!
//! let store = InventoryStore::new("inventory.json");
//! store.add_material("knob types", "Brass Round", 45.0)?;
//!
//! let inventory = store.load()?;
//! let mut sheet = QuoteSheet::for_inventory(&inventory);
//! sheet.push("knob types", SelectionRow::existing("Brass Round", 10.0));
//!
//! let estimate = Estimate::new(EstimateMeta::default(), sheet.resolve(&inventory)?)?;
//! assert_eq!(estimate.total, 450.0);
//! # Ok::<(), quote_core::errors::QuoteError>(())
//! ```
//!
//! ## Modules
//!
//! - [`inventory`] - Category → material → price model
//! - [`store`] - JSON file persistence with atomic saves
//! - [`selection`] - Quotation sheet rows and their resolution to line items
//! - [`estimate`] - Fixed-price line items and totals
//! - [`range`] - Min/max range pricing
//! - [`catalog`] - Built-in console price lists
//! - [`errors`] - Structured error types

pub mod catalog;
pub mod errors;
pub mod estimate;
pub mod inventory;
pub mod range;
pub mod selection;
pub mod store;

// Re-export commonly used types at crate root for convenience
pub use errors::{QuoteError, QuoteResult};
pub use estimate::{price_line, total, Estimate, EstimateMeta, EstimateRecord, LineItem};
pub use inventory::{Inventory, MaterialEntry, DEFAULT_CATEGORIES};
pub use range::{price_range_line, total_range, PriceRange, RangeEstimate, RangeLineItem, RangeRecord};
pub use selection::{QuoteSheet, Selection, SelectionRow};
pub use store::{InventoryLock, InventoryStore};

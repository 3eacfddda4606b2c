//! # Fixed-Price Estimation
//!
//! Multi-row accumulation model: every resolved selection becomes a
//! [`LineItem`] whose total is `unit_price * quantity`, and the estimate total
//! is the sum over all lines.
//!
//! Unit prices are captured when the line is built. Later inventory edits do
//! not reprice an existing estimate.
//!
//! ## Example
//!
//! ```rust
//! use quote_core::estimate::{total, LineItem};
//!
//! let items = vec![LineItem::new("knob types", "Brass Round", 45.0, 10.0)];
//! assert_eq!(total(&items).unwrap(), 450.0);
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{ensure_non_negative, QuoteResult};

/// Price a single line: `unit_price * quantity`.
///
/// Fails with `InvalidInput` if either argument is negative (or not finite).
/// A zero quantity is valid and yields a zero line.
pub fn price_line(unit_price: f64, quantity: f64) -> QuoteResult<f64> {
    let unit_price = ensure_non_negative("unit_price", unit_price)?;
    let quantity = ensure_non_negative("quantity", quantity)?;
    Ok(unit_price * quantity)
}

/// Sum of [`price_line`] over all items; `0.0` for an empty slice.
pub fn total(items: &[LineItem]) -> QuoteResult<f64> {
    let mut sum = CompensatedSum::default();
    for item in items {
        sum.add(item.line_total()?);
    }
    Ok(sum.value())
}

/// Neumaier summation, keeps totals stable when lines are reordered.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct CompensatedSum {
    sum: f64,
    compensation: f64,
}

impl CompensatedSum {
    pub(crate) fn add(&mut self, value: f64) {
        let t = self.sum + value;
        if self.sum.abs() >= value.abs() {
            self.compensation += (self.sum - t) + value;
        } else {
            self.compensation += (value - t) + self.sum;
        }
        self.sum = t;
    }

    pub(crate) fn value(&self) -> f64 {
        self.sum + self.compensation
    }
}

/// One resolved (category, material, quantity) selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub category: String,
    pub name: String,
    /// Unit price resolved from the inventory when the line was built
    pub unit_price: f64,
    /// Quantity; fractional values (square footage) are allowed
    pub quantity: f64,
}

impl LineItem {
    pub fn new(
        category: impl Into<String>,
        name: impl Into<String>,
        unit_price: f64,
        quantity: f64,
    ) -> Self {
        LineItem {
            category: category.into(),
            name: name.into(),
            unit_price,
            quantity,
        }
    }

    /// `unit_price * quantity`, validated
    pub fn line_total(&self) -> QuoteResult<f64> {
        price_line(self.unit_price, self.quantity)
    }
}

/// Flat export row for downstream serialization (table, JSON, spreadsheet).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateRecord {
    pub category: String,
    pub name: String,
    pub unit_price: f64,
    pub quantity: f64,
    pub line_total: f64,
}

/// Free-text information attached to an estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimateMeta {
    pub project: String,
    pub client: String,
    pub notes: String,
}

impl Default for EstimateMeta {
    fn default() -> Self {
        EstimateMeta {
            project: "My Project".to_string(),
            client: String::new(),
            notes: String::new(),
        }
    }
}

/// A priced quotation: ordered line items plus their total.
///
/// Built on demand from the current selections and never persisted by the
/// core; export formats live with the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Estimate {
    pub id: Uuid,
    #[serde(flatten)]
    pub meta: EstimateMeta,
    pub created: DateTime<Utc>,
    pub items: Vec<LineItem>,
    pub total: f64,
}

impl Estimate {
    /// Price `items` and wrap them with `meta`.
    ///
    /// # Returns
    ///
    /// * `Ok(Estimate)` - All lines priced
    /// * `Err(QuoteError::InvalidInput)` - A line has a negative price or quantity
    pub fn new(meta: EstimateMeta, items: Vec<LineItem>) -> QuoteResult<Self> {
        let total = total(&items)?;
        Ok(Estimate {
            id: Uuid::new_v4(),
            meta,
            created: Utc::now(),
            items,
            total,
        })
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Flat, ordered export rows.
    pub fn records(&self) -> Vec<EstimateRecord> {
        self.items
            .iter()
            .map(|item| EstimateRecord {
                category: item.category.clone(),
                name: item.name.clone(),
                unit_price: item.unit_price,
                quantity: item.quantity,
                // Lines were validated in `new`
                line_total: item.unit_price * item.quantity,
            })
            .collect()
    }

    /// Sum of the lines belonging to one category.
    pub fn subtotal_for(&self, category: &str) -> f64 {
        let mut sum = CompensatedSum::default();
        for item in self.items.iter().filter(|item| item.category == category) {
            sum.add(item.unit_price * item.quantity);
        }
        sum.value()
    }
}

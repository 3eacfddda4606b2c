//! # Range-Price Estimation
//!
//! Single-pick-per-role model used by the console estimator. Some components
//! are flat fees charged once (a hinge set, a sliding track); others are
//! priced as a `[min, max]` per unit and scaled by a multiplier (an area in
//! square feet, or 1 for a flat range such as a handle).
//!
//! ```text
//! total_min = Σ fixed + Σ (min_unit_price × multiplier)
//! total_max = Σ fixed + Σ (max_unit_price × multiplier)
//! ```
//!
//! A single fixed price is the degenerate range `min == max`.
//!
//! This is a different algorithm from [`crate::estimate`]: no rows, no
//! quantities per category, one representative configuration bounded below
//! and above.
//!
//! ## Example
//!
//! ```rust
//! use quote_core::range::{price_range_line, PriceRange};
//!
//! let laminate = price_range_line(550.0, 600.0, 100.0).unwrap();
//! assert_eq!(laminate, PriceRange { min: 55_000.0, max: 60_000.0 });
//! ```

use std::ops::Add;

use serde::{Deserialize, Serialize};

use crate::errors::{ensure_non_negative, QuoteError, QuoteResult};
use crate::estimate::CompensatedSum;

/// Inclusive price bounds.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

impl PriceRange {
    /// A range with both bounds at `price`
    pub fn fixed(price: f64) -> Self {
        PriceRange {
            min: price,
            max: price,
        }
    }
}

impl Add for PriceRange {
    type Output = PriceRange;

    fn add(self, rhs: PriceRange) -> PriceRange {
        PriceRange {
            min: self.min + rhs.min,
            max: self.max + rhs.max,
        }
    }
}

/// Price one ranged component: `(min × multiplier, max × multiplier)`.
///
/// Fails with `InvalidInput` if `min_price > max_price` or any argument is
/// negative.
pub fn price_range_line(min_price: f64, max_price: f64, multiplier: f64) -> QuoteResult<PriceRange> {
    let min_price = ensure_non_negative("min_unit_price", min_price)?;
    let max_price = ensure_non_negative("max_unit_price", max_price)?;
    let multiplier = ensure_non_negative("multiplier", multiplier)?;

    if min_price > max_price {
        return Err(QuoteError::invalid_input(
            "min_unit_price",
            format!("{min_price} > {max_price}"),
            "Minimum price cannot exceed maximum price",
        ));
    }

    Ok(PriceRange {
        min: min_price * multiplier,
        max: max_price * multiplier,
    })
}

/// Sum flat fees and ranged components into one `[min, max]` total.
///
/// Each flat fee counts once toward both bounds.
pub fn total_range(fixed_prices: &[f64], ranged: &[RangeLineItem]) -> QuoteResult<PriceRange> {
    let mut fixed = CompensatedSum::default();
    for &price in fixed_prices {
        fixed.add(ensure_non_negative("fixed_price", price)?);
    }

    let mut min = CompensatedSum::default();
    let mut max = CompensatedSum::default();
    for item in ranged {
        let line = item.line_range()?;
        min.add(line.min);
        max.add(line.max);
    }

    let ranged = PriceRange {
        min: min.value(),
        max: max.value(),
    };
    Ok(PriceRange::fixed(fixed.value()) + ranged)
}

/// A ranged component: per-unit bounds and the multiplier applied to them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeLineItem {
    pub label: String,
    pub min_unit_price: f64,
    pub max_unit_price: f64,
    /// Quantity or area; non-negative
    pub multiplier: f64,
}

impl RangeLineItem {
    pub fn new(label: impl Into<String>, min_unit_price: f64, max_unit_price: f64, multiplier: f64) -> Self {
        RangeLineItem {
            label: label.into(),
            min_unit_price,
            max_unit_price,
            multiplier,
        }
    }

    /// `(min × multiplier, max × multiplier)`, validated
    pub fn line_range(&self) -> QuoteResult<PriceRange> {
        price_range_line(self.min_unit_price, self.max_unit_price, self.multiplier)
    }
}

/// A flat fee counted once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedCharge {
    pub label: String,
    pub price: f64,
}

/// Flat export row for a range estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeRecord {
    pub label: String,
    pub min: f64,
    pub max: f64,
}

/// Priced single-configuration estimate with min/max totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeEstimate {
    pub fixed: Vec<FixedCharge>,
    pub ranged: Vec<RangeLineItem>,
    pub total: PriceRange,
}

impl RangeEstimate {
    /// Validate and total the components.
    pub fn new(fixed: Vec<FixedCharge>, ranged: Vec<RangeLineItem>) -> QuoteResult<Self> {
        let prices: Vec<f64> = fixed.iter().map(|charge| charge.price).collect();
        let total = total_range(&prices, &ranged)?;
        Ok(RangeEstimate {
            fixed,
            ranged,
            total,
        })
    }

    /// Sum of the flat fees alone
    pub fn fixed_total(&self) -> f64 {
        let mut sum = CompensatedSum::default();
        for charge in &self.fixed {
            sum.add(charge.price);
        }
        sum.value()
    }

    /// Export rows: flat fees first (min == max), then ranged lines.
    pub fn records(&self) -> Vec<RangeRecord> {
        let fixed = self.fixed.iter().map(|charge| RangeRecord {
            label: charge.label.clone(),
            min: charge.price,
            max: charge.price,
        });
        let ranged = self.ranged.iter().map(|item| RangeRecord {
            label: item.label.clone(),
            min: item.min_unit_price * item.multiplier,
            max: item.max_unit_price * item.multiplier,
        });
        fixed.chain(ranged).collect()
    }
}

//! # Inventory Model
//!
//! The inventory is a two-level mapping: category name → material name →
//! [`MaterialEntry`]. It serializes to exactly the document kept on disk:
//!
//! ```json
//! {
//!   "knob types": { "Brass Round": { "price": 45.0 } },
//!   "wood types": { "Oak": { "price": 120.0 } }
//! }
//! ```
//!
//! Categories are open: any string is a valid key. [`DEFAULT_CATEGORIES`] is
//! only the display order offered to a new quotation.
//!
//! ## Example
//!
//! ```rust
//! use quote_core::inventory::Inventory;
//!
//! let mut inventory = Inventory::new();
//! inventory.upsert("knob types", "Brass Round", 45.0).unwrap();
//! assert_eq!(inventory.price_of("knob types", "Brass Round"), Some(45.0));
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::{ensure_non_negative, QuoteError, QuoteResult};

/// Categories shown by default, in display order.
pub const DEFAULT_CATEGORIES: [&str; 15] = [
    "wood types",
    "laminate types",
    "knob types",
    "handle types",
    "acrylic material types",
    "mirror types",
    "edge banding types",
    "strip light types",
    "false ceiling types",
    "granite types",
    "push magnet types",
    "channel types",
    "profile types",
    "tv panel types",
    "profile door types",
];

/// Separator between name and price in selection option labels
const OPTION_SEPARATOR: &str = " | ";

/// A single priced material.
///
/// Fields other than `price` found in the document are kept as-is and
/// written back on save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialEntry {
    /// Unit price, currency-agnostic
    pub price: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MaterialEntry {
    pub fn new(price: f64) -> Self {
        MaterialEntry {
            price,
            extra: Map::new(),
        }
    }
}

/// Materials of one category keyed by (case-sensitive) name
pub type CategoryMaterials = BTreeMap<String, MaterialEntry>;

/// Full inventory: category → material name → entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inventory {
    categories: BTreeMap<String, CategoryMaterials>,
}

impl Inventory {
    /// Create an empty inventory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a single material.
    pub fn get(&self, category: &str, name: &str) -> Option<&MaterialEntry> {
        self.categories.get(category)?.get(name)
    }

    /// Unit price of a material, if present.
    pub fn price_of(&self, category: &str, name: &str) -> Option<f64> {
        self.get(category, name).map(|entry| entry.price)
    }

    /// Insert or overwrite a material price.
    ///
    /// The name is trimmed before use. Blank names and negative prices are
    /// rejected. Re-adding an existing name replaces the whole entry, so any
    /// extra fields it carried are dropped.
    pub fn upsert(&mut self, category: &str, name: &str, price: f64) -> QuoteResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(QuoteError::invalid_input(
                "name",
                name,
                "Material name cannot be blank",
            ));
        }
        let price = ensure_non_negative("price", price)?;

        self.ensure_category(category)
            .insert(name.to_string(), MaterialEntry::new(price));
        Ok(())
    }

    /// Get the bucket for a category, creating it if absent.
    pub fn ensure_category(&mut self, category: &str) -> &mut CategoryMaterials {
        self.categories.entry(category.to_string()).or_default()
    }

    /// Materials in a category (empty when the category does not exist).
    pub fn materials(&self, category: &str) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.categories
            .get(category)
            .into_iter()
            .flat_map(|bucket| bucket.iter().map(|(name, entry)| (name.as_str(), entry.price)))
    }

    /// Category names present in the store.
    pub fn categories(&self) -> impl Iterator<Item = &str> + '_ {
        self.categories.keys().map(String::as_str)
    }

    /// Total number of materials over all categories.
    pub fn material_count(&self) -> usize {
        self.categories.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

/// Categories for display: the defaults first, then any extra store categories.
pub fn display_categories(inventory: &Inventory) -> Vec<String> {
    let mut out: Vec<String> = DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect();
    for category in inventory.categories() {
        if !DEFAULT_CATEGORIES.contains(&category) {
            out.push(category.to_string());
        }
    }
    out
}

/// Label shown in a selection list, e.g. `"Brass Round | Rs 45.00"`.
pub fn option_label(name: &str, price: f64, currency: &str) -> String {
    format!("{name}{OPTION_SEPARATOR}{currency} {price:.2}")
}

/// Recover the material name from an [`option_label`].
pub fn parse_option_label(label: &str) -> &str {
    label
        .split_once(OPTION_SEPARATOR)
        .map_or(label, |(name, _)| name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert_creates_category() {
        let mut inventory = Inventory::new();
        inventory.upsert("handle types", "Steel Bar", 250.0).unwrap();
        assert_eq!(inventory.price_of("handle types", "Steel Bar"), Some(250.0));
        assert_eq!(inventory.material_count(), 1);
    }

    #[test]
    fn test_upsert_overwrites() {
        let mut inventory = Inventory::new();
        inventory.upsert("wood types", "Oak", 100.0).unwrap();
        inventory.upsert("wood types", "Oak", 120.0).unwrap();
        assert_eq!(inventory.price_of("wood types", "Oak"), Some(120.0));
        assert_eq!(inventory.material_count(), 1);
    }

    #[test]
    fn test_upsert_trims_name() {
        let mut inventory = Inventory::new();
        inventory.upsert("wood types", "  Teak ", 300.0).unwrap();
        assert!(inventory.get("wood types", "Teak").is_some());
        assert!(inventory.get("wood types", "  Teak ").is_none());
    }

    #[test]
    fn test_names_are_case_sensitive() {
        let mut inventory = Inventory::new();
        inventory.upsert("wood types", "Oak", 100.0).unwrap();
        inventory.upsert("wood types", "oak", 90.0).unwrap();
        assert_eq!(inventory.material_count(), 2);
    }

    #[test]
    fn test_upsert_rejects_invalid() {
        let mut inventory = Inventory::new();
        assert!(inventory.upsert("wood types", "   ", 10.0).is_err());
        assert!(inventory.upsert("wood types", "Oak", -1.0).is_err());
        assert!(inventory.upsert("wood types", "Oak", f64::NAN).is_err());
        assert!(inventory.is_empty());
    }

    #[test]
    fn test_document_shape() {
        let json = r#"{"knob types": {"Brass Round": {"price": 45}}}"#;
        let inventory: Inventory = serde_json::from_str(json).unwrap();
        assert_eq!(inventory.price_of("knob types", "Brass Round"), Some(45.0));

        let value = serde_json::to_value(&inventory).unwrap();
        assert_eq!(value["knob types"]["Brass Round"]["price"], 45.0);
    }

    #[test]
    fn test_extra_entry_fields_survive() {
        let json = r#"{"wood types": {"Oak": {"price": 100, "unit": "sheet"}}}"#;
        let mut inventory: Inventory = serde_json::from_str(json).unwrap();
        let entry = inventory.get("wood types", "Oak").unwrap();
        assert_eq!(entry.extra["unit"], "sheet");

        inventory.upsert("wood types", "Pine", 80.0).unwrap();
        let value = serde_json::to_value(&inventory).unwrap();
        assert_eq!(value["wood types"]["Oak"]["unit"], "sheet");
        assert_eq!(value["wood types"]["Pine"], serde_json::json!({ "price": 80.0 }));

        // Re-adding a material replaces the whole entry
        inventory.upsert("wood types", "Oak", 120.0).unwrap();
        assert!(inventory.get("wood types", "Oak").unwrap().extra.is_empty());
    }

    #[test]
    fn test_missing_category_has_no_materials() {
        let inventory = Inventory::new();
        assert_eq!(inventory.materials("mirror types").count(), 0);
    }

    #[test]
    fn test_display_categories_appends_extras() {
        let mut inventory = Inventory::new();
        inventory.upsert("wood types", "Oak", 100.0).unwrap();
        inventory.upsert("wallpaper types", "Floral", 40.0).unwrap();

        let categories = display_categories(&inventory);
        assert_eq!(categories.len(), DEFAULT_CATEGORIES.len() + 1);
        assert_eq!(categories[0], "wood types");
        assert_eq!(categories.last().unwrap(), "wallpaper types");
    }

    #[test]
    fn test_option_label() {
        let label = option_label("Brass Round", 45.0, "Rs");
        assert_eq!(label, "Brass Round | Rs 45.00");
        assert_eq!(parse_option_label(&label), "Brass Round");
        assert_eq!(parse_option_label("Plain"), "Plain");
    }
}

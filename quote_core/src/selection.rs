//! # Selection State
//!
//! A quotation sheet holds, per category, an ordered list of rows. Each row is
//! a [`Selection`] plus a quantity. Only rows holding an existing material
//! become line items; the other states are filtered out before pricing:
//!
//! | Selection      | Becomes a line item?                         |
//! |----------------|----------------------------------------------|
//! | `NoneSelected` | no                                           |
//! | `Existing`     | yes, priced from the inventory at resolution |
//! | `NewMaterial`  | no, until committed to the store             |
//!
//! ## JSON Example
//!
//! ```json
//! { "selection": { "kind": "existing", "name": "Brass Round" }, "quantity": 10.0 }
//! ```

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::{ensure_non_negative, QuoteError, QuoteResult};
use crate::estimate::LineItem;
use crate::inventory::{display_categories, Inventory};
use crate::store::InventoryStore;

/// What a row currently points at.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Selection {
    /// Nothing picked yet
    #[default]
    NoneSelected,
    /// A material already in the inventory
    Existing { name: String },
    /// A material being defined on the row, not yet saved to the inventory
    NewMaterial { name: String, price: f64 },
}

/// One row of a category section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionRow {
    #[serde(default)]
    pub selection: Selection,
    #[serde(default = "default_quantity")]
    pub quantity: f64,
}

fn default_quantity() -> f64 {
    1.0
}

impl Default for SelectionRow {
    fn default() -> Self {
        SelectionRow {
            selection: Selection::NoneSelected,
            quantity: default_quantity(),
        }
    }
}

impl SelectionRow {
    /// Row pointing at an existing material
    pub fn existing(name: impl Into<String>, quantity: f64) -> Self {
        SelectionRow {
            selection: Selection::Existing { name: name.into() },
            quantity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct CategorySection {
    category: String,
    rows: Vec<SelectionRow>,
}

/// Per-session selection rows, grouped by category in display order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuoteSheet {
    sections: Vec<CategorySection>,
}

impl QuoteSheet {
    /// Empty sheet with no sections.
    pub fn new() -> Self {
        Self::default()
    }

    /// One empty row for each display category of `inventory`.
    pub fn for_inventory(inventory: &Inventory) -> Self {
        QuoteSheet {
            sections: display_categories(inventory)
                .into_iter()
                .map(|category| CategorySection {
                    category,
                    rows: vec![SelectionRow::default()],
                })
                .collect(),
        }
    }

    /// Category names in sheet order.
    pub fn categories(&self) -> impl Iterator<Item = &str> + '_ {
        self.sections.iter().map(|s| s.category.as_str())
    }

    /// Rows of a category (empty when the category has no section).
    pub fn rows(&self, category: &str) -> &[SelectionRow] {
        self.section(category)
            .map(|s| s.rows.as_slice())
            .unwrap_or(&[])
    }

    /// Append `row` to a category, creating the section if needed.
    /// Returns the new row's index.
    pub fn push(&mut self, category: &str, row: SelectionRow) -> usize {
        let section = self.section_or_insert(category);
        section.rows.push(row);
        section.rows.len() - 1
    }

    /// Append an empty row. Returns its index.
    pub fn add_row(&mut self, category: &str) -> usize {
        self.push(category, SelectionRow::default())
    }

    /// Remove the row at `index`, shifting later rows up.
    pub fn remove_row(&mut self, category: &str, index: usize) -> QuoteResult<SelectionRow> {
        self.row_mut(category, index)?;
        let section = self.section_or_insert(category);
        Ok(section.rows.remove(index))
    }

    pub fn set_selection(
        &mut self,
        category: &str,
        index: usize,
        selection: Selection,
    ) -> QuoteResult<()> {
        self.row_mut(category, index)?.selection = selection;
        Ok(())
    }

    /// Set a row quantity. Negative quantities are rejected, never clamped.
    pub fn set_quantity(&mut self, category: &str, index: usize, quantity: f64) -> QuoteResult<()> {
        let quantity = ensure_non_negative("quantity", quantity)?;
        self.row_mut(category, index)?.quantity = quantity;
        Ok(())
    }

    /// Save a row's new material to the store and point the row at it.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - Material upserted, row is now `Existing`
    /// * `Err(QuoteError::InvalidInput)` - Row is not a new material, or its
    ///   name/price is invalid
    /// * `Err(QuoteError::StorageUnavailable)` - The store could not be written
    pub fn commit_new_material(
        &mut self,
        store: &InventoryStore,
        category: &str,
        index: usize,
    ) -> QuoteResult<()> {
        let row = self.row_mut(category, index)?;
        let (name, price) = match &row.selection {
            Selection::NewMaterial { name, price } => (name.trim().to_string(), *price),
            other => {
                return Err(QuoteError::invalid_input(
                    "selection",
                    format!("{other:?}"),
                    "Only a new material row can be saved to the inventory",
                ))
            }
        };

        store.add_material(category, &name, price)?;
        row.selection = Selection::Existing { name };
        Ok(())
    }

    /// Turn the sheet into priced line items.
    ///
    /// Rows are visited in sheet order. Empty rows and unsaved new materials
    /// are skipped; existing materials take their current inventory price.
    ///
    /// # Returns
    ///
    /// * `Err(QuoteError::MaterialNotFound)` - A row names a material the
    ///   inventory does not have
    /// * `Err(QuoteError::InvalidInput)` - A row quantity is negative
    pub fn resolve(&self, inventory: &Inventory) -> QuoteResult<Vec<LineItem>> {
        let mut items = Vec::new();
        for section in &self.sections {
            for (index, row) in section.rows.iter().enumerate() {
                let name = match &row.selection {
                    Selection::NoneSelected => continue,
                    Selection::NewMaterial { name, .. } => {
                        warn!(
                            category = %section.category,
                            row = index,
                            name = %name,
                            "skipping new material that was never saved"
                        );
                        continue;
                    }
                    Selection::Existing { name } => name,
                };

                let unit_price = inventory
                    .price_of(&section.category, name)
                    .ok_or_else(|| QuoteError::material_not_found(&section.category, name))?;
                let quantity = ensure_non_negative("quantity", row.quantity)?;

                items.push(LineItem::new(&section.category, name, unit_price, quantity));
            }
        }
        Ok(items)
    }

    fn section(&self, category: &str) -> Option<&CategorySection> {
        self.sections.iter().find(|s| s.category == category)
    }

    fn section_or_insert(&mut self, category: &str) -> &mut CategorySection {
        let position = match self.sections.iter().position(|s| s.category == category) {
            Some(position) => position,
            None => {
                self.sections.push(CategorySection {
                    category: category.to_string(),
                    rows: Vec::new(),
                });
                self.sections.len() - 1
            }
        };
        &mut self.sections[position]
    }

    fn row_mut(&mut self, category: &str, index: usize) -> QuoteResult<&mut SelectionRow> {
        self.sections
            .iter_mut()
            .find(|s| s.category == category)
            .and_then(|s| s.rows.get_mut(index))
            .ok_or_else(|| {
                QuoteError::invalid_input(
                    "row",
                    format!("{category}[{index}]"),
                    "No such row in this category",
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env::temp_dir;
    use std::fs;

    fn sample_inventory() -> Inventory {
        let mut inventory = Inventory::new();
        inventory.upsert("knob types", "Brass Round", 45.0).unwrap();
        inventory.upsert("wood types", "Oak", 120.0).unwrap();
        inventory
    }

    #[test]
    fn test_sheet_for_inventory_has_one_row_per_category() {
        let sheet = QuoteSheet::for_inventory(&Inventory::new());
        assert_eq!(sheet.categories().count(), 15);
        assert_eq!(sheet.rows("wood types"), &[SelectionRow::default()]);
    }

    #[test]
    fn test_resolve_skips_placeholders() {
        let inventory = sample_inventory();
        let mut sheet = QuoteSheet::for_inventory(&inventory);
        sheet
            .set_selection("knob types", 0, Selection::Existing { name: "Brass Round".into() })
            .unwrap();
        sheet.set_quantity("knob types", 0, 10.0).unwrap();
        let row = sheet.add_row("knob types");
        sheet
            .set_selection(
                "knob types",
                row,
                Selection::NewMaterial { name: "Chrome".into(), price: 60.0 },
            )
            .unwrap();

        let items = sheet.resolve(&inventory).unwrap();
        assert_eq!(items, vec![LineItem::new("knob types", "Brass Round", 45.0, 10.0)]);
    }

    #[test]
    fn test_resolve_keeps_zero_quantity_selection() {
        let inventory = sample_inventory();
        let mut sheet = QuoteSheet::new();
        sheet.push("wood types", SelectionRow::existing("Oak", 0.0));

        let items = sheet.resolve(&inventory).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 0.0);
    }

    #[test]
    fn test_resolve_follows_sheet_order() {
        let inventory = sample_inventory();
        let mut sheet = QuoteSheet::for_inventory(&inventory);
        sheet.push("knob types", SelectionRow::existing("Brass Round", 1.0));
        sheet.push("wood types", SelectionRow::existing("Oak", 1.0));

        let items = sheet.resolve(&inventory).unwrap();
        assert_eq!(items[0].category, "wood types");
        assert_eq!(items[1].category, "knob types");
    }

    #[test]
    fn test_resolve_dangling_material() {
        let mut sheet = QuoteSheet::new();
        sheet.push("wood types", SelectionRow::existing("Mahogany", 1.0));
        let err = sheet.resolve(&sample_inventory()).unwrap_err();
        assert_eq!(err.error_code(), "MATERIAL_NOT_FOUND");
    }

    #[test]
    fn test_negative_quantity_rejected() {
        let mut sheet = QuoteSheet::new();
        sheet.add_row("wood types");
        assert!(sheet.set_quantity("wood types", 0, -2.0).is_err());
        assert_eq!(sheet.rows("wood types")[0].quantity, 1.0);

        sheet.push("wood types", SelectionRow::existing("Oak", -1.0));
        assert!(sheet.resolve(&sample_inventory()).is_err());
    }

    #[test]
    fn test_remove_row_shifts() {
        let mut sheet = QuoteSheet::new();
        sheet.push("wood types", SelectionRow::existing("Oak", 1.0));
        sheet.push("wood types", SelectionRow::existing("Teak", 2.0));

        let removed = sheet.remove_row("wood types", 0).unwrap();
        assert_eq!(removed.quantity, 1.0);
        assert_eq!(sheet.rows("wood types"), &[SelectionRow::existing("Teak", 2.0)]);
        assert!(sheet.remove_row("wood types", 5).is_err());
        assert!(sheet.remove_row("mirror types", 0).is_err());
    }

    #[test]
    fn test_commit_new_material() {
        let path = temp_dir().join(format!("interior_quote_sheet_{}.json", std::process::id()));
        let _ = fs::remove_file(&path);
        let store = InventoryStore::new(&path);

        let mut sheet = QuoteSheet::new();
        sheet.push(
            "handle types",
            SelectionRow {
                selection: Selection::NewMaterial { name: " Steel Bar ".into(), price: 250.0 },
                quantity: 4.0,
            },
        );
        sheet.commit_new_material(&store, "handle types", 0).unwrap();

        assert_eq!(
            sheet.rows("handle types")[0].selection,
            Selection::Existing { name: "Steel Bar".into() }
        );
        let items = sheet.resolve(&store.load().unwrap()).unwrap();
        assert_eq!(items[0].unit_price, 250.0);
        assert_eq!(items[0].quantity, 4.0);

        // Committing a row that is already existing is an input error
        assert!(sheet.commit_new_material(&store, "handle types", 0).is_err());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_row_json_shape() {
        let json = r#"{"selection": {"kind": "existing", "name": "Oak"}, "quantity": 2.5}"#;
        let row: SelectionRow = serde_json::from_str(json).unwrap();
        assert_eq!(row, SelectionRow::existing("Oak", 2.5));

        let blank: SelectionRow = serde_json::from_str("{}").unwrap();
        assert_eq!(blank, SelectionRow::default());
    }
}

//! `quote estimate <request.json>`

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use quote_core::estimate::{Estimate, EstimateMeta};
use quote_core::inventory::Inventory;
use quote_core::selection::{QuoteSheet, Selection, SelectionRow};
use quote_core::store::InventoryStore;
use serde::Deserialize;
use tracing::info;

use super::Context;
use crate::format::{estimate_table, export_file_name, EstimateExport};

/// Quotation request file.
///
/// ```json
/// {
///   "project": "Flat 4B",
///   "client": "A. Rao",
///   "notes": "Kitchen",
///   "rows": [
///     { "category": "knob types", "selection": { "kind": "existing", "name": "Brass Round" }, "quantity": 10 }
///   ]
/// }
/// ```
#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    #[serde(flatten)]
    pub meta: EstimateMeta,
    #[serde(default)]
    pub rows: Vec<RequestRow>,
}

#[derive(Debug, Deserialize)]
pub struct RequestRow {
    pub category: String,
    #[serde(flatten)]
    pub row: SelectionRow,
}

impl QuoteRequest {
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("reading request {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("parsing request {}", path.display()))
    }

    /// Lay the rows out on a sheet, optionally saving new materials first.
    pub fn build_sheet(
        self,
        inventory: &Inventory,
        store: &InventoryStore,
        save_new: bool,
    ) -> Result<(EstimateMeta, QuoteSheet)> {
        let mut sheet = QuoteSheet::for_inventory(inventory);
        for RequestRow { category, row } in self.rows {
            let is_new = matches!(row.selection, Selection::NewMaterial { .. });
            let index = sheet.push(&category, row);
            if is_new && save_new {
                sheet.commit_new_material(store, &category, index)?;
            }
        }
        Ok((self.meta, sheet))
    }
}

/// Write the export document for `estimate` to `path`.
pub fn write_export(estimate: &Estimate, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(&EstimateExport::from(estimate))?;
    fs::write(path, json).with_context(|| format!("writing estimate {}", path.display()))?;
    info!(path = %path.display(), "estimate exported");
    Ok(())
}

pub fn run(
    ctx: &Context,
    request: &Path,
    save_new: bool,
    output: Option<Option<PathBuf>>,
) -> Result<()> {
    let request = QuoteRequest::from_file(request)?;
    let inventory = ctx.store.load()?;
    let (meta, sheet) = request.build_sheet(&inventory, &ctx.store, save_new)?;

    // New materials may have been written; price against the current store
    let inventory = if save_new { ctx.store.load()? } else { inventory };
    let estimate = Estimate::new(meta, sheet.resolve(&inventory)?)?;
    info!(items = estimate.item_count(), total = estimate.total, "estimate built");

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&EstimateExport::from(&estimate))?);
    } else {
        print!("{}", estimate_table(&estimate, &ctx.money));
    }

    if let Some(path) = output {
        let path = path.unwrap_or_else(|| PathBuf::from(export_file_name(&estimate.meta.project)));
        write_export(&estimate, &path)?;
        if !ctx.json {
            println!("Estimate written to {}", path.display());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env::temp_dir;

    const REQUEST: &str = r#"{
        "project": "Flat 4B",
        "client": "A. Rao",
        "rows": [
            { "category": "knob types", "selection": { "kind": "existing", "name": "Brass Round" }, "quantity": 10 },
            { "category": "handle types", "selection": { "kind": "new_material", "name": "Steel Bar", "price": 250 }, "quantity": 2 },
            { "category": "wood types" }
        ]
    }"#;

    fn store(name: &str) -> InventoryStore {
        let path = temp_dir().join(format!("interior_quote_cli_{}_{}.json", name, std::process::id()));
        let _ = fs::remove_file(&path);
        fs::write(&path, r#"{"knob types": {"Brass Round": {"price": 45}}}"#).unwrap();
        InventoryStore::new(path)
    }

    #[test]
    fn test_request_parsing() {
        let request: QuoteRequest = serde_json::from_str(REQUEST).unwrap();
        assert_eq!(request.meta.project, "Flat 4B");
        assert_eq!(request.meta.notes, "");
        assert_eq!(request.rows.len(), 3);
        assert_eq!(request.rows[2].row, SelectionRow::default());
    }

    #[test]
    fn test_unsaved_new_material_is_dropped() {
        let store = store("drop");
        let inventory = store.load().unwrap();
        let request: QuoteRequest = serde_json::from_str(REQUEST).unwrap();

        let (meta, sheet) = request.build_sheet(&inventory, &store, false).unwrap();
        let estimate = Estimate::new(meta, sheet.resolve(&inventory).unwrap()).unwrap();
        assert_eq!(estimate.item_count(), 1);
        assert_eq!(estimate.total, 450.0);
        assert!(store.load().unwrap().price_of("handle types", "Steel Bar").is_none());

        let _ = fs::remove_file(store.path());
    }

    #[test]
    fn test_save_new_materials() {
        let store = store("save_new");
        let inventory = store.load().unwrap();
        let request: QuoteRequest = serde_json::from_str(REQUEST).unwrap();

        let (meta, sheet) = request.build_sheet(&inventory, &store, true).unwrap();
        let inventory = store.load().unwrap();
        let estimate = Estimate::new(meta, sheet.resolve(&inventory).unwrap()).unwrap();
        assert_eq!(estimate.item_count(), 2);
        assert_eq!(estimate.total, 950.0);

        let _ = fs::remove_file(store.path());
    }

    #[test]
    fn test_write_export() {
        let items = vec![quote_core::estimate::LineItem::new("knob types", "Brass Round", 45.0, 10.0)];
        let meta = EstimateMeta {
            project: "Flat 4B".to_string(),
            ..EstimateMeta::default()
        };
        let estimate = Estimate::new(meta, items).unwrap();
        let path = temp_dir().join(format!("interior_quote_export_{}.json", std::process::id()));

        write_export(&estimate, &path).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["project"], "Flat 4B");
        assert_eq!(json["items"][0]["name"], "Brass Round");
        assert_eq!(json["total"], 450.0);

        let _ = fs::remove_file(&path);
    }
}

//! Console rendering of inventories and estimates

use std::fmt::Write;

use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, ContentArrangement, Table};
use quote_core::estimate::{Estimate, EstimateRecord};
use quote_core::inventory::{display_categories, Inventory};
use quote_core::range::RangeEstimate;
use serde::Serialize;

/// Amount formatting settings
#[derive(Debug, Clone)]
pub struct Money {
    pub currency: String,
    pub decimals: usize,
}

impl Money {
    pub fn amount(&self, value: f64) -> String {
        format!("{} {:.*}", self.currency, self.decimals, value)
    }
}

/// "wood types" -> "Wood Types"
pub fn title_case(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Exported estimate document
#[derive(Debug, Serialize)]
pub struct EstimateExport<'a> {
    pub project: &'a str,
    pub client: &'a str,
    pub notes: &'a str,
    pub items: Vec<EstimateRecord>,
    pub total: f64,
}

impl<'a> From<&'a Estimate> for EstimateExport<'a> {
    fn from(estimate: &'a Estimate) -> Self {
        EstimateExport {
            project: &estimate.meta.project,
            client: &estimate.meta.client,
            notes: &estimate.meta.notes,
            items: estimate.records(),
            total: estimate.total,
        }
    }
}

/// `estimate_<project>.json`, spaces replaced by underscores
pub fn export_file_name(project: &str) -> String {
    format!("estimate_{}.json", project.replace(' ', "_"))
}

fn new_table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header.to_vec());
    table
}

fn amount_cell(text: String) -> Cell {
    Cell::new(text).set_alignment(CellAlignment::Right)
}

pub fn inventory_table(inventory: &Inventory, only: Option<&str>, money: &Money) -> String {
    let categories = match only {
        Some(category) => vec![category.to_string()],
        None => display_categories(inventory),
    };

    let mut table = new_table(&["Category", "Name", "Price"]);
    let mut rows = 0;
    for category in &categories {
        for (name, price) in inventory.materials(category) {
            table.add_row(vec![
                Cell::new(title_case(category)),
                Cell::new(name),
                amount_cell(money.amount(price)),
            ]);
            rows += 1;
        }
    }

    match (rows, only) {
        (0, Some(category)) => format!("No materials in {}.\n", title_case(category)),
        (0, None) => "Inventory is empty. Add materials with `quote inventory add`.\n".to_string(),
        _ => format!("{table}\n"),
    }
}

fn items_table(estimate: &Estimate, money: &Money) -> Table {
    let mut table = new_table(&["Category", "Name", "Unit Price", "Quantity", "Line Total"]);
    for record in estimate.records() {
        table.add_row(vec![
            Cell::new(title_case(&record.category)),
            Cell::new(&record.name),
            amount_cell(money.amount(record.unit_price)),
            Cell::new(record.quantity).set_alignment(CellAlignment::Right),
            amount_cell(money.amount(record.line_total)),
        ]);
    }
    table
}

/// Per-category subtotals, categories in order of first appearance
fn subtotals_table(estimate: &Estimate, money: &Money) -> Table {
    let mut table = new_table(&["Category", "Subtotal"]);
    let mut seen: Vec<&str> = Vec::new();
    for item in &estimate.items {
        if seen.contains(&item.category.as_str()) {
            continue;
        }
        seen.push(&item.category);
        table.add_row(vec![
            Cell::new(title_case(&item.category)),
            amount_cell(money.amount(estimate.subtotal_for(&item.category))),
        ]);
    }
    table
}

pub fn estimate_table(estimate: &Estimate, money: &Money) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Project: {}", estimate.meta.project);
    let _ = writeln!(out, "Client:  {}", estimate.meta.client);
    if !estimate.meta.notes.is_empty() {
        let _ = writeln!(out, "Notes:   {}", estimate.meta.notes);
    }
    let _ = writeln!(out);

    if estimate.items.is_empty() {
        let _ = writeln!(out, "No materials selected yet.");
        return out;
    }

    let _ = writeln!(out, "{}", items_table(estimate, money));
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", subtotals_table(estimate, money));
    let _ = writeln!(out);
    let _ = writeln!(out, "Items: {}", estimate.item_count());
    let _ = writeln!(out, "Total Estimate: {}", money.amount(estimate.total));
    out
}

pub fn range_bill(estimate: &RangeEstimate, money: &Money) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "========== BILL ==========");
    for record in estimate.records() {
        if record.min == record.max {
            let _ = writeln!(out, "{} = {}", record.label, money.amount(record.min));
        } else {
            let _ = writeln!(
                out,
                "{} = {} to {}",
                record.label,
                money.amount(record.min),
                money.amount(record.max)
            );
        }
    }
    let _ = writeln!(out, "---------------------------");
    let _ = writeln!(out, "TOTAL (min): {}", money.amount(estimate.total.min));
    let _ = writeln!(out, "TOTAL (max): {}", money.amount(estimate.total.max));
    let _ = writeln!(out, "========== END ==========");
    out
}

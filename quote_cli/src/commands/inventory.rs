//! `quote inventory ...`

use anyhow::Result;
use quote_core::inventory::display_categories;

use super::Context;
use crate::cli::InventoryCommand;
use crate::format::inventory_table;

pub fn run(ctx: &Context, action: InventoryCommand) -> Result<()> {
    match action {
        InventoryCommand::List { category } => {
            let inventory = ctx.store.load()?;
            match (&category, ctx.json) {
                (Some(category), true) => {
                    let materials: serde_json::Map<String, serde_json::Value> = inventory
                        .materials(category)
                        .map(|(name, price)| (name.to_string(), serde_json::json!({ "price": price })))
                        .collect();
                    println!("{}", serde_json::to_string_pretty(&materials)?);
                }
                (None, true) => println!("{}", serde_json::to_string_pretty(&inventory)?),
                (_, false) => print!("{}", inventory_table(&inventory, category.as_deref(), &ctx.money)),
            }
        }
        InventoryCommand::Add { category, name, price, lock } => {
            // Released when the guard drops, after the save
            let _guard = if lock { Some(ctx.store.lock(lock_holder())?) } else { None };
            ctx.store.add_material(&category, &name, price)?;
            if ctx.json {
                println!(
                    "{}",
                    serde_json::json!({ "category": category, "name": name.trim(), "price": price })
                );
            } else {
                println!(
                    "Added {} to {} with price {}",
                    name.trim(),
                    category,
                    ctx.money.amount(price)
                );
            }
        }
        InventoryCommand::Categories => {
            let categories = display_categories(&ctx.store.load()?);
            if ctx.json {
                println!("{}", serde_json::to_string_pretty(&categories)?);
            } else {
                for category in categories {
                    println!("{category}");
                }
            }
        }
    }
    Ok(())
}

fn lock_holder() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "quote".to_string())
}

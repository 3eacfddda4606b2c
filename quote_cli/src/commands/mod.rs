//! Subcommand implementations

pub mod console;
pub mod estimate;
pub mod inventory;

use quote_core::store::InventoryStore;

use crate::config::QuoteConfig;
use crate::format::Money;

/// Shared state handed to every subcommand
pub struct Context {
    pub store: InventoryStore,
    pub money: Money,
    pub json: bool,
}

impl Context {
    pub fn new(config: &QuoteConfig, json: bool) -> Self {
        Context {
            store: InventoryStore::new(&config.inventory_path),
            money: Money {
                currency: config.currency.clone(),
                decimals: config.decimals,
            },
            json,
        }
    }
}

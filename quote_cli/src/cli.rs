//! Command-line definitions

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

/// Interior quotation builder
#[derive(Parser, Debug)]
#[command(name = "quote", version, about = "Interior quotation builder")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Explicit config file (TOML)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Inventory JSON file (overrides config)
    #[arg(long, global = true, env = "QUOTE_INVENTORY")]
    pub inventory: Option<PathBuf>,

    /// Print machine-readable JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Inspect or extend the material inventory
    Inventory {
        #[command(subcommand)]
        action: InventoryCommand,
    },

    /// Price a quotation request file
    Estimate {
        /// Request JSON: project, client, notes and selection rows
        request: PathBuf,

        /// Save new materials named in the request before pricing
        #[arg(long)]
        save_new: bool,

        /// Also write the estimate JSON to a file (default: estimate_<project>.json)
        #[arg(short, long, num_args = 0..=1, value_name = "FILE")]
        output: Option<Option<PathBuf>>,
    },

    /// Interactive single-unit estimator with min/max totals
    Console {
        /// Replace the built-in price lists with a catalog JSON file
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
pub enum InventoryCommand {
    /// List materials and prices
    List {
        /// Only this category
        #[arg(long)]
        category: Option<String>,
    },

    /// Add a material, or update its price
    Add {
        category: String,
        name: String,
        #[arg(allow_negative_numbers = true)]
        price: f64,

        /// Hold the inventory lock while updating; fail if another writer has it
        #[arg(long)]
        lock: bool,
    },

    /// List categories (defaults first, then any extras in the store)
    Categories,
}

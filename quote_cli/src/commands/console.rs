//! `quote console` - interactive single-unit estimator

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::{bail, Context as _, Result};
use quote_core::catalog::{parse_choice, Catalog, ConsoleSelection, Role};
use quote_core::range::RangeEstimate;

use super::Context;
use crate::format::{range_bill, Money};

pub fn run(ctx: &Context, catalog_path: Option<&Path>) -> Result<()> {
    let custom;
    let catalog = match catalog_path {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("reading catalog {}", path.display()))?;
            custom = Catalog::from_json(&json)?;
            &custom
        }
        None => Catalog::builtin(),
    };

    let stdin = io::stdin();
    let stdout = io::stdout();
    let estimate = prompt_estimate(catalog, &mut stdin.lock(), &mut stdout.lock(), &ctx.money)?;

    if ctx.json {
        let body = serde_json::json!({
            "items": estimate.records(),
            "total_min": estimate.total.min,
            "total_max": estimate.total.max,
        });
        println!("{}", serde_json::to_string_pretty(&body)?);
    } else {
        println!();
        print!("{}", range_bill(&estimate, &ctx.money));
    }
    Ok(())
}

/// Ask for the area and one pick per role, re-prompting on bad input.
pub fn prompt_estimate<R: BufRead, W: Write>(
    catalog: &Catalog,
    input: &mut R,
    output: &mut W,
    money: &Money,
) -> Result<RangeEstimate> {
    writeln!(output, "INTERIOR ESTIMATOR (console)")?;

    let area = loop {
        let line = prompt_line(input, output, "Enter area in sqft (for doors/laminates): ")?;
        match line.trim().parse::<f64>() {
            Ok(area) if area.is_finite() && area >= 0.0 => break area,
            _ => writeln!(output, "Invalid area, try again.")?,
        }
    };

    let mut selection = ConsoleSelection::new(area);
    for role in Role::ALL {
        let choice = choose(catalog, role, input, output, money)?;
        selection = selection.with_pick(role, choice);
    }

    Ok(catalog.estimate(&selection)?)
}

fn choose<R: BufRead, W: Write>(
    catalog: &Catalog,
    role: Role,
    input: &mut R,
    output: &mut W,
    money: &Money,
) -> Result<usize> {
    let entries = catalog.entries(role);
    writeln!(output, "\n--- {} ---", role.title())?;
    for (i, entry) in entries.iter().enumerate() {
        if role.has_range() {
            writeln!(
                output,
                "{}. {}  -> {} to {}",
                i + 1,
                entry.name,
                money.amount(entry.min_price),
                money.amount(entry.max_price)
            )?;
        } else {
            writeln!(output, "{}. {}  -> {}", i + 1, entry.name, money.amount(entry.min_price))?;
        }
    }

    loop {
        let line = prompt_line(input, output, "Select option number: ")?;
        match parse_choice(&line, entries.len()) {
            Ok(choice) => return Ok(choice),
            Err(_) => writeln!(output, "Invalid choice, try again.")?,
        }
    }
}

fn prompt_line<R: BufRead, W: Write>(input: &mut R, output: &mut W, prompt: &str) -> Result<String> {
    write!(output, "{prompt}")?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        bail!("input closed before the estimate was complete");
    }
    Ok(line)
}

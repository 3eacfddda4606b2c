//! # Console Catalog
//!
//! Fixed price lists for the single-unit console estimator. Each [`Role`]
//! (plywood, hinge, channel, ...) is picked exactly once by a 1-based menu
//! number, and the role decides how its price enters the range total:
//!
//! | Role                             | Pricing                         |
//! |----------------------------------|---------------------------------|
//! | Plywood, Hinge, Channel, Sliding | flat fee, counted once          |
//! | Door/Profile                     | per sqft × area                 |
//! | Laminate                         | min–max per sqft × area         |
//! | Handle                           | flat min–max                    |
//!
//! The built-in price lists are available through [`Catalog::builtin`]; a
//! catalog with the same shape can also be read from JSON.
//!
//! ## Example
//!
//! ```rust
//! use quote_core::catalog::{Catalog, ConsoleSelection, Role};
//!
//! let selection = ConsoleSelection::new(100.0)
//!     .with_pick(Role::Plywood, 1)
//!     .with_pick(Role::Hinge, 1)
//!     .with_pick(Role::Channel, 1)
//!     .with_pick(Role::SlidingTrack, 1)
//!     .with_pick(Role::Door, 1)
//!     .with_pick(Role::Laminate, 1)
//!     .with_pick(Role::Handle, 1);
//!
//! let estimate = Catalog::builtin().estimate(&selection).unwrap();
//! assert_eq!(estimate.total.min, 126_458.0);
//! assert_eq!(estimate.total.max, 126_858.0);
//! ```

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::{ensure_non_negative, QuoteError, QuoteResult};
use crate::range::{FixedCharge, RangeEstimate, RangeLineItem};

/// A component slot of the console estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Plywood,
    Hinge,
    Channel,
    SlidingTrack,
    Door,
    Laminate,
    Handle,
}

/// How a role's price contributes to the total
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pricing {
    /// Single price, counted once
    FlatFee,
    /// Price range per sqft, scaled by the area
    PerArea,
    /// Price range, counted once
    FlatRange,
}

impl Role {
    /// All roles in prompt order
    pub const ALL: [Role; 7] = [
        Role::Plywood,
        Role::Hinge,
        Role::Channel,
        Role::SlidingTrack,
        Role::Door,
        Role::Laminate,
        Role::Handle,
    ];

    /// Menu title
    pub fn title(&self) -> &'static str {
        match self {
            Role::Plywood => "Plywood",
            Role::Hinge => "Hinge",
            Role::Channel => "Channel",
            Role::SlidingTrack => "Sliding Track",
            Role::Door => "Door/Profile (per sqft)",
            Role::Laminate => "Laminate (per sqft)",
            Role::Handle => "Handle",
        }
    }

    /// Short label used on bill lines
    pub fn label(&self) -> &'static str {
        match self {
            Role::Plywood => "Plywood",
            Role::Hinge => "Hinge",
            Role::Channel => "Channel",
            Role::SlidingTrack => "Sliding Track",
            Role::Door => "Door",
            Role::Laminate => "Laminate",
            Role::Handle => "Handle",
        }
    }

    pub fn pricing(&self) -> Pricing {
        match self {
            Role::Plywood | Role::Hinge | Role::Channel | Role::SlidingTrack => Pricing::FlatFee,
            Role::Door | Role::Laminate => Pricing::PerArea,
            Role::Handle => Pricing::FlatRange,
        }
    }

    /// Whether the menu shows a min–max pair for this role
    pub fn has_range(&self) -> bool {
        matches!(self, Role::Laminate | Role::Handle)
    }
}

/// One priced catalog option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    pub min_price: f64,
    pub max_price: f64,
}

impl CatalogEntry {
    fn fixed(name: &str, price: f64) -> Self {
        CatalogEntry {
            name: name.to_string(),
            min_price: price,
            max_price: price,
        }
    }

    fn ranged(name: &str, min_price: f64, max_price: f64) -> Self {
        CatalogEntry {
            name: name.to_string(),
            min_price,
            max_price,
        }
    }
}

/// Price lists for every role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    roles: BTreeMap<Role, Vec<CatalogEntry>>,
}

static BUILTIN: Lazy<Catalog> = Lazy::new(|| {
    let mut roles = BTreeMap::new();
    roles.insert(
        Role::Plywood,
        vec![
            CatalogEntry::fixed("Century club prime BWP 710", 138.0),
            CatalogEntry::fixed("Club prime commercial MR", 122.0),
            CatalogEntry::fixed("Green gold 710 BWP", 136.0),
            CatalogEntry::fixed("Green gold commercial", 123.0),
            CatalogEntry::fixed("Maxi platinum", 95.0),
            CatalogEntry::fixed("Red Daimond", 106.0),
            CatalogEntry::fixed("Century Sainik", 86.0),
            CatalogEntry::fixed("Green Ecotec", 86.0),
            CatalogEntry::fixed("Orchid", 68.0),
        ],
    );
    roles.insert(
        Role::Hinge,
        vec![
            CatalogEntry::fixed("Ebco zero crank normal", 60.0),
            CatalogEntry::fixed("Ebco eight crank normal", 62.0),
            CatalogEntry::fixed("Ebco zero crank soft", 120.0),
            CatalogEntry::fixed("Ebco eight crank soft", 125.0),
            CatalogEntry::fixed("Hitteck zero crank normal", 83.0),
            CatalogEntry::fixed("Hitteck eight crank normal", 86.0),
            CatalogEntry::fixed("Hitteck zero crank soft", 140.0),
            CatalogEntry::fixed("Hitteck eight crank soft", 150.0),
        ],
    );
    roles.insert(
        Role::Channel,
        vec![
            CatalogEntry::fixed("EBCO 20 inch normal", 360.0),
            CatalogEntry::fixed("EBCO 20 inch soft", 670.0),
            CatalogEntry::fixed("EBCO 18 inch normal", 330.0),
            CatalogEntry::fixed("EBCO 18 inch soft", 625.0),
            CatalogEntry::fixed("EBCO 16 inch normal", 300.0),
            CatalogEntry::fixed("EBCO 16 inch soft", 600.0),
            CatalogEntry::fixed("EBCO 14 inch normal", 295.0),
            CatalogEntry::fixed("EBCO 14 inch soft", 575.0),
            CatalogEntry::fixed("EBCO 12 inch normal", 255.0),
            CatalogEntry::fixed("EBCO 12 inch soft", 475.0),
            CatalogEntry::fixed("EBCO 10 inch normal", 185.0),
            CatalogEntry::fixed("Hittecfh 20 inch normal", 390.0),
            CatalogEntry::fixed("Hittecfh 20 inch soft", 1020.0),
            CatalogEntry::fixed("Hittecfh 18 inch normal", 380.0),
            CatalogEntry::fixed("Hittecfh 18 inch soft", 990.0),
            CatalogEntry::fixed("Hittecfh 16 inch normal", 370.0),
            CatalogEntry::fixed("Hittecfh 16 inch soft", 970.0),
            CatalogEntry::fixed("Hittecfh 14 inch normal", 350.0),
            CatalogEntry::fixed("Hittecfh 14 inch soft", 960.0),
            CatalogEntry::fixed("Hittecfh 12 inch normal", 345.0),
            CatalogEntry::fixed("Hittecfh 12 inch soft", 950.0),
        ],
    );
    roles.insert(
        Role::SlidingTrack,
        vec![
            CatalogEntry::fixed("CNR 8 feet 2 door", 3800.0),
            CatalogEntry::fixed("EBCO 8 feet 2 door", 4750.0),
            CatalogEntry::fixed("Hettic 8 feet 2 door", 3850.0),
            CatalogEntry::fixed("Haffle 8 feet 2 door", 5100.0),
        ],
    );
    roles.insert(
        Role::Door,
        vec![
            CatalogEntry::fixed("Normal company door (per sqft)", 850.0),
            CatalogEntry::fixed("Aristo company door (per sqft)", 2300.0),
            CatalogEntry::fixed("Profile door (per sqft)", 600.0),
        ],
    );
    roles.insert(
        Role::Laminate,
        vec![
            CatalogEntry::ranged("Inner 0.8mm (per sqft)", 370.0, 370.0),
            CatalogEntry::ranged("Inner 1mm (per sqft)", 550.0, 600.0),
            CatalogEntry::ranged("Outer Century M 1mm (per sqft)", 1600.0, 1600.0),
            CatalogEntry::ranged("Outer Century high glossy (per sqft)", 2550.0, 2550.0),
            CatalogEntry::ranged("Outer Royal Touch matt (per sqft)", 2200.0, 2200.0),
            CatalogEntry::ranged("Outer Royal Touch glossy (per sqft)", 3500.0, 3500.0),
            CatalogEntry::ranged("Outer Acrylic (per sqft)", 2600.0, 4000.0),
        ],
    );
    roles.insert(
        Role::Handle,
        vec![
            CatalogEntry::ranged("8 inch", 100.0, 500.0),
            CatalogEntry::ranged("2 feet", 800.0, 1500.0),
            CatalogEntry::ranged("4 feet", 1000.0, 2000.0),
        ],
    );
    Catalog { roles }
});

impl Catalog {
    /// The built-in wardrobe price lists.
    pub fn builtin() -> &'static Catalog {
        &BUILTIN
    }

    /// Parse and validate a catalog document.
    ///
    /// ```json
    /// { "roles": { "plywood": [ { "name": "Orchid", "min_price": 68, "max_price": 68 } ], ... } }
    /// ```
    pub fn from_json(json: &str) -> QuoteResult<Self> {
        let catalog: Catalog = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Check that every role has options and every option is well formed.
    pub fn validate(&self) -> QuoteResult<()> {
        for role in Role::ALL {
            let entries = self.entries(role);
            if entries.is_empty() {
                return Err(QuoteError::invalid_input(
                    "roles",
                    role.title(),
                    "Every role needs at least one option",
                ));
            }
            for entry in entries {
                let min = ensure_non_negative("min_price", entry.min_price)?;
                let max = ensure_non_negative("max_price", entry.max_price)?;
                if min > max {
                    return Err(QuoteError::invalid_input(
                        "min_price",
                        format!("{} ({min} > {max})", entry.name),
                        "Minimum price cannot exceed maximum price",
                    ));
                }
                if role.pricing() == Pricing::FlatFee && min != max {
                    return Err(QuoteError::invalid_input(
                        "max_price",
                        format!("{} ({min}..{max})", entry.name),
                        "Flat-fee roles take a single price",
                    ));
                }
            }
        }
        Ok(())
    }

    /// Options for a role, in menu order.
    pub fn entries(&self, role: Role) -> &[CatalogEntry] {
        self.roles.get(&role).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Look up a menu choice (1-based).
    pub fn pick(&self, role: Role, choice: usize) -> QuoteResult<&CatalogEntry> {
        let entries = self.entries(role);
        if choice == 0 || choice > entries.len() {
            return Err(QuoteError::invalid_input(
                role.label(),
                choice.to_string(),
                format!("Choice must be between 1 and {}", entries.len()),
            ));
        }
        Ok(&entries[choice - 1])
    }

    /// Price one configuration.
    ///
    /// # Returns
    ///
    /// * `Ok(RangeEstimate)` - Flat fees plus ranged lines and their total
    /// * `Err(QuoteError::InvalidInput)` - Negative area, a role was not
    ///   picked, or a pick is out of range
    pub fn estimate(&self, selection: &ConsoleSelection) -> QuoteResult<RangeEstimate> {
        let area = ensure_non_negative("area_sqft", selection.area_sqft)?;
        let mut fixed = Vec::new();
        let mut ranged = Vec::new();

        for role in Role::ALL {
            let choice = selection.picks.get(&role).copied().ok_or_else(|| {
                QuoteError::invalid_input(role.label(), "none", "No option picked for this role")
            })?;
            let entry = self.pick(role, choice)?;
            let label = format!("{}: {}", role.label(), entry.name);

            match role.pricing() {
                Pricing::FlatFee => fixed.push(FixedCharge {
                    label,
                    price: entry.min_price,
                }),
                Pricing::PerArea => ranged.push(RangeLineItem::new(
                    label,
                    entry.min_price,
                    entry.max_price,
                    area,
                )),
                Pricing::FlatRange => ranged.push(RangeLineItem::new(
                    label,
                    entry.min_price,
                    entry.max_price,
                    1.0,
                )),
            }
        }

        RangeEstimate::new(fixed, ranged)
    }
}

/// Parse a typed menu choice. Non-numeric or out-of-range input is rejected.
pub fn parse_choice(input: &str, len: usize) -> QuoteResult<usize> {
    let input = input.trim();
    let choice: usize = input
        .parse()
        .map_err(|_| QuoteError::invalid_input("choice", input, "Choice must be a whole number"))?;
    if choice == 0 || choice > len {
        return Err(QuoteError::invalid_input(
            "choice",
            input,
            format!("Choice must be between 1 and {len}"),
        ));
    }
    Ok(choice)
}

/// Area plus one 1-based pick per role.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConsoleSelection {
    /// Area in square feet applied to per-sqft roles
    pub area_sqft: f64,
    pub picks: BTreeMap<Role, usize>,
}

impl ConsoleSelection {
    pub fn new(area_sqft: f64) -> Self {
        ConsoleSelection {
            area_sqft,
            picks: BTreeMap::new(),
        }
    }

    pub fn with_pick(mut self, role: Role, choice: usize) -> Self {
        self.picks.insert(role, choice);
        self
    }
}

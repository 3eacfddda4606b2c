//! Configuration loading with multi-source merging

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// Project-level config file looked up in the working directory
const PROJECT_CONFIG: &str = "quote.toml";

/// Settings for the `quote` binary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuoteConfig {
    /// Inventory JSON document
    pub inventory_path: PathBuf,
    /// Currency label used when printing amounts
    pub currency: String,
    /// Decimal places used when printing amounts
    pub decimals: usize,
}

impl Default for QuoteConfig {
    fn default() -> Self {
        QuoteConfig {
            inventory_path: PathBuf::from("inventory.json"),
            currency: "Rs".to_string(),
            decimals: 2,
        }
    }
}

impl QuoteConfig {
    /// Load configuration from all sources.
    ///
    /// Priority (highest to lowest):
    /// 1. Explicit config path (if provided)
    /// 2. `QUOTE_*` environment variables
    /// 3. Project root: `./quote.toml`
    /// 4. Global: `$XDG_CONFIG_HOME/interior-quote/config.toml`
    /// 5. Default values
    pub fn load(explicit: Option<&Path>) -> Result<Self, Box<figment::Error>> {
        let mut figment = Figment::new().merge(Serialized::defaults(QuoteConfig::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        let project_path = Path::new(PROJECT_CONFIG);
        if project_path.exists() {
            figment = figment.merge(Toml::file(project_path));
        }

        figment = figment.merge(Env::prefixed("QUOTE_"));

        if let Some(path) = explicit {
            figment = figment.merge(Toml::file(path));
        }

        figment.extract().map_err(Box::new)
    }

    /// `$XDG_CONFIG_HOME/interior-quote/config.toml`, or the platform equivalent
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("interior-quote").join("config.toml"))
    }
}

//! Configuration file parsing for `~/.config/pantry/config.toml`

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::billing::PREMIUM_PRODUCT_ID;
use crate::billing::SandboxPurchaseMode;
use crate::kv::file::config_dir;
use crate::language::Language;
use crate::premium::DEFAULT_OLD_PRICE_MULTIPLIER;

const CONFIG_FILENAME: &str = "config.toml";

/// Environment variable consulted when `billing.api_key` is unset.
pub const API_KEY_ENV: &str = "PANTRY_BILLING_API_KEY";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PantryConfig {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub billing: BillingConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub pricing: PricingConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Language used until the user picks one
    #[serde(default)]
    pub language: Language,
}

/// Which billing backend to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BillingProvider {
    /// In-process ledger, no network
    #[default]
    Sandbox,
    /// Receipt/entitlement REST backend
    Http,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillingConfig {
    #[serde(default)]
    pub provider: BillingProvider,

    /// Base URL of the REST backend (http provider only)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API key: can also be set via PANTRY_BILLING_API_KEY
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Timeout for session, catalog and ledger calls
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Timeout for the purchase flow; 0 waits indefinitely
    #[serde(default)]
    pub purchase_timeout_secs: u64,

    /// Product ids that grant premium
    #[serde(default = "default_product_ids")]
    pub product_ids: Vec<String>,

    /// How the sandbox resolves purchases
    #[serde(default)]
    pub sandbox_mode: SandboxPurchaseMode,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// State file location (default: `~/.config/pantry/state.json`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Factor for the struck-through price on the paywall
    #[serde(default = "default_multiplier")]
    pub old_price_multiplier: f64,
}

// Default functions
fn default_base_url() -> String {
    "https://billing.example.com".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_product_ids() -> Vec<String> {
    vec![PREMIUM_PRODUCT_ID.to_string()]
}

fn default_multiplier() -> f64 {
    DEFAULT_OLD_PRICE_MULTIPLIER
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            provider: BillingProvider::default(),
            base_url: default_base_url(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
            purchase_timeout_secs: 0,
            product_ids: default_product_ids(),
            sandbox_mode: SandboxPurchaseMode::default(),
        }
    }
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            old_price_multiplier: default_multiplier(),
        }
    }
}

impl BillingConfig {
    /// Configured key, else the environment variable.
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var(API_KEY_ENV).ok())
            .filter(|k| !k.trim().is_empty())
    }
}

impl PantryConfig {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: PantryConfig =
            toml::from_str(&contents).with_context(|| format!("parsing {}", path.display()))?;
        Ok(config)
    }

    /// Load from an explicit path, else the default location, else defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match Self::default_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    /// `~/.config/pantry/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        config_dir().map(|d| d.join(CONFIG_FILENAME))
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
        }
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }
}

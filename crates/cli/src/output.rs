//! Machine-readable output for `pantry status --json`

use pantry_core::premium::PriceDisplay;
use pantry_core::{CatalogSummary, Offering};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct JsonStatus {
    pub has_premium: bool,
    /// Present when the store could not be consulted and the cached value was used
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    pub language: String,
    /// Onboarding seen and a language picked
    pub onboarded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    pub offerings: Vec<JsonOffering>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<JsonPrice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipes: Option<JsonRecipeCounts>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JsonOffering {
    pub product_id: String,
    pub localized_price: String,
    pub price: f64,
    pub currency: String,
}

impl From<&Offering> for JsonOffering {
    fn from(o: &Offering) -> Self {
        Self {
            product_id: o.product_id.clone(),
            localized_price: o.localized_price.clone(),
            price: o.raw_price,
            currency: o.currency_code.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JsonPrice {
    pub price: String,
    pub old_price: String,
}

impl From<&PriceDisplay> for JsonPrice {
    fn from(p: &PriceDisplay) -> Self {
        Self {
            price: p.price.clone(),
            old_price: p.old_price.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JsonRecipeCounts {
    pub free: usize,
    pub premium: usize,
    pub unlocked: usize,
}

impl JsonRecipeCounts {
    pub fn new(summary: CatalogSummary, has_premium: bool) -> Self {
        let entitlement = pantry_core::Entitlement { has_premium };
        Self {
            free: summary.free,
            premium: summary.premium,
            unlocked: summary.unlocked(entitlement),
        }
    }
}

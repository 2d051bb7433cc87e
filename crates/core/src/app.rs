//! Wiring: builds the storage, gateway and services from configuration

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::billing::{BillingGateway, SandboxGateway};
use crate::config::{BillingConfig, BillingProvider, PantryConfig};
use crate::entitlement::EntitlementStore;
use crate::favorites::Favorites;
use crate::kv::{file::default_state_path, FileKv, KeyValueStore};
use crate::language::LanguagePreference;
use crate::onboarding::Onboarding;
use crate::premium::{PremiumService, PriceDisplay};
use crate::search::RecentSearches;
use crate::shopping::ShoppingList;

const SANDBOX_LEDGER_FILENAME: &str = "sandbox-ledger.json";

/// Build the configured billing gateway.
///
/// The sandbox keeps its ledger next to the state file so purchases survive
/// restarts. The HTTP gateway identifies itself with the app user id kept in `kv`.
pub fn build_gateway(
    billing: &BillingConfig,
    state_path: &Path,
    kv: &dyn KeyValueStore,
) -> Result<Box<dyn BillingGateway>> {
    match billing.provider {
        BillingProvider::Sandbox => {
            let ledger = state_path
                .parent()
                .map(|p| p.join(SANDBOX_LEDGER_FILENAME))
                .unwrap_or_else(|| PathBuf::from(SANDBOX_LEDGER_FILENAME));
            let gateway = SandboxGateway::new().with_ledger_file(ledger);
            gateway.set_purchase_mode(billing.sandbox_mode);
            Ok(Box::new(gateway))
        }
        #[cfg(feature = "http-gateway")]
        BillingProvider::Http => {
            use crate::billing::{identity::app_user_id, HttpGateway, HttpGatewayConfig};
            use std::time::Duration;

            let purchase_timeout = match billing.purchase_timeout_secs {
                0 => None,
                secs => Some(Duration::from_secs(secs)),
            };
            Ok(Box::new(HttpGateway::new(HttpGatewayConfig {
                base_url: billing.base_url.clone(),
                api_key: billing.resolved_api_key(),
                timeout: Duration::from_secs(billing.timeout_secs),
                purchase_timeout,
                app_user_id: app_user_id(kv),
                platform: std::env::consts::OS.to_string(),
            })))
        }
        #[cfg(not(feature = "http-gateway"))]
        BillingProvider::Http => {
            anyhow::bail!("billing provider 'http' requires the http-gateway feature")
        }
    }
}

/// All app state behind one handle. Construct once per process and pass it down.
pub struct Pantry {
    config: PantryConfig,
    kv: Arc<dyn KeyValueStore>,
    premium: PremiumService,
}

impl Pantry {
    /// Open file-backed state and the configured gateway.
    ///
    /// `state_path` overrides `storage.path` from the config.
    pub fn open(config: PantryConfig, state_path: Option<PathBuf>) -> Result<Self> {
        let path = state_path
            .or_else(|| config.storage.path.clone())
            .or_else(default_state_path)
            .context("Could not determine where to keep app state")?;
        let kv: Arc<dyn KeyValueStore> = Arc::new(FileKv::open(&path));
        let gateway = build_gateway(&config.billing, &path, kv.as_ref())?;
        Ok(Self::with_parts(config, kv, gateway))
    }

    /// Assemble from explicit parts (tests, embedding hosts).
    pub fn with_parts(
        config: PantryConfig,
        kv: Arc<dyn KeyValueStore>,
        gateway: impl BillingGateway + 'static,
    ) -> Self {
        let store = Arc::new(EntitlementStore::load(Arc::clone(&kv)));
        let premium = PremiumService::new(gateway, store, config.billing.product_ids.clone());
        Self {
            config,
            kv,
            premium,
        }
    }

    pub fn config(&self) -> &PantryConfig {
        &self.config
    }

    pub fn premium(&self) -> &PremiumService {
        &self.premium
    }

    pub fn price_display(&self) -> PriceDisplay {
        self.premium
            .price_display(self.config.pricing.old_price_multiplier)
    }

    pub fn favorites(&self) -> Favorites {
        Favorites::load(Arc::clone(&self.kv))
    }

    pub fn shopping_list(&self) -> ShoppingList {
        ShoppingList::load(Arc::clone(&self.kv))
    }

    pub fn language(&self) -> LanguagePreference {
        LanguagePreference::load(Arc::clone(&self.kv), self.config.general.language)
    }

    pub fn recent_searches(&self) -> RecentSearches {
        RecentSearches::load(Arc::clone(&self.kv))
    }

    pub fn onboarding(&self) -> Onboarding {
        Onboarding::load(Arc::clone(&self.kv))
    }

    /// True until onboarding was seen and a language picked.
    pub fn needs_onboarding(&self) -> bool {
        !self.onboarding().is_complete(&self.language())
    }
}

impl Drop for Pantry {
    fn drop(&mut self) {
        self.premium.shutdown();
    }
}

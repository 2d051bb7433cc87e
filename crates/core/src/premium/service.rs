//! Premium service: reconciles the entitlement cache with the billing backend

use std::sync::{Arc, Mutex, MutexGuard};

use super::outcome::{BackendError, PurchaseResult, Reconciliation, RestoreOutcome};
use super::pricing::PriceDisplay;
use crate::billing::{BillingGateway, Offering, PurchaseOutcome, PurchaseRecord};
use crate::entitlement::{Entitlement, EntitlementStore};
use crate::kv::PersistenceError;

/// Entry point for everything the host may do with premium access.
///
/// The gateway lives behind a mutex: at most one reconciliation or purchase is
/// in flight, and a second caller blocks until the first resolves.
pub struct PremiumService {
    gateway: Mutex<Box<dyn BillingGateway>>,
    store: Arc<EntitlementStore>,
    product_ids: Vec<String>,
    offerings: Mutex<Vec<Offering>>,
}

impl PremiumService {
    pub fn new(
        gateway: impl BillingGateway + 'static,
        store: Arc<EntitlementStore>,
        product_ids: Vec<String>,
    ) -> Self {
        Self {
            gateway: Mutex::new(Box::new(gateway)),
            store,
            product_ids,
            offerings: Mutex::new(Vec::new()),
        }
    }

    pub fn store(&self) -> &Arc<EntitlementStore> {
        &self.store
    }

    pub fn product_ids(&self) -> &[String] {
        &self.product_ids
    }

    pub fn has_premium(&self) -> bool {
        self.store.get()
    }

    pub fn entitlement(&self) -> Entitlement {
        self.store.snapshot()
    }

    /// Silent startup reconciliation.
    ///
    /// Upgrades the cache when the backend reports a recognized purchase. Never
    /// downgrades: a backend "no" leaves a cached "yes" in place until `reset()`.
    /// Backend failures keep the cached value and come back as a warning.
    pub fn reconcile(&self) -> Reconciliation {
        let mut gateway = self.lock_gateway();
        let local = self.store.get();

        match self.backend_has_premium(&mut **gateway) {
            Ok(found) => {
                if found && !local {
                    // Failure is already logged; memory holds the upgrade either way.
                    let _ = self.store.set(true);
                    tracing::info!("premium recovered from purchase history");
                }
                Reconciliation {
                    has_premium: self.store.get(),
                    warning: None,
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, has_premium = local, "reconciliation skipped, using cached entitlement");
                Reconciliation {
                    has_premium: local,
                    warning: Some(e.to_string()),
                }
            }
        }
    }

    /// User-initiated restore. The only path that reports "not found".
    pub fn restore(&self) -> RestoreOutcome {
        let mut gateway = self.lock_gateway();

        match self.backend_has_premium(&mut **gateway) {
            Ok(true) => {
                if !self.store.get() {
                    let _ = self.store.set(true);
                }
                tracing::info!("purchase restored");
                RestoreOutcome::Restored
            }
            Ok(false) => {
                tracing::info!("restore found no recognized purchase");
                RestoreOutcome::NotFound
            }
            Err(e) => {
                tracing::warn!(error = %e, "restore failed");
                RestoreOutcome::Failed(e.to_string())
            }
        }
    }

    /// Run a purchase flow for one recognized product.
    ///
    /// Blocks for as long as the store UI does. Only `Completed` touches the cache.
    pub fn purchase(&self, product_id: &str) -> PurchaseResult {
        if !self.is_recognized(product_id) {
            return PurchaseResult::Failed(format!("'{}' is not a recognized product", product_id));
        }

        let mut gateway = self.lock_gateway();
        if let Err(e) = gateway.connect() {
            tracing::warn!(error = %e, "purchase aborted, store unreachable");
            return PurchaseResult::Failed(e.to_string());
        }

        if !self.has_offering(product_id) {
            tracing::debug!(product_id, "offerings not loaded, fetching before purchase");
            if let Err(e) = self.refresh_offerings(&mut **gateway) {
                return PurchaseResult::Failed(e.to_string());
            }
            if !self.has_offering(product_id) {
                return PurchaseResult::Failed(format!(
                    "'{}' is not available from the store",
                    product_id
                ));
            }
        }

        tracing::debug!(product_id, "starting purchase");
        match gateway.purchase(product_id) {
            Ok(PurchaseOutcome::Completed(record)) => {
                let _ = self.store.set(true);
                tracing::info!(product_id = %record.product_id, "purchase completed");
                PurchaseResult::Purchased
            }
            Ok(PurchaseOutcome::Pending) => {
                tracing::info!(product_id, "purchase pending approval");
                PurchaseResult::Pending
            }
            Ok(PurchaseOutcome::Cancelled) => {
                tracing::debug!(product_id, "purchase cancelled by user");
                PurchaseResult::Cancelled
            }
            Err(e) => {
                tracing::warn!(product_id, error = %e, "purchase failed");
                PurchaseResult::Failed(e.to_string())
            }
        }
    }

    /// Fetch current offerings for the recognized products and cache them for the session.
    pub fn list_offerings(&self) -> Result<Vec<Offering>, BackendError> {
        let mut gateway = self.lock_gateway();
        gateway.connect()?;
        self.refresh_offerings(&mut **gateway)
    }

    /// Offerings fetched earlier this session, without contacting the backend.
    pub fn offerings(&self) -> Vec<Offering> {
        self.lock_offerings().clone()
    }

    pub fn price_display(&self, old_price_multiplier: f64) -> PriceDisplay {
        PriceDisplay::from_offerings(&self.lock_offerings(), old_price_multiplier)
    }

    /// Developer-facing reset of the premium flag.
    pub fn reset(&self) -> Result<(), PersistenceError> {
        // Wait out any in-flight flow so it cannot re-set the flag afterwards.
        let _gateway = self.lock_gateway();
        self.store.reset()
    }

    /// Release the billing session. Called on host teardown.
    pub fn shutdown(&self) {
        self.lock_gateway().disconnect();
    }

    fn is_recognized(&self, product_id: &str) -> bool {
        self.product_ids.iter().any(|p| p == product_id)
    }

    fn has_offering(&self, product_id: &str) -> bool {
        self.lock_offerings()
            .iter()
            .any(|o| o.product_id == product_id)
    }

    fn recognizes_any(&self, records: &[PurchaseRecord]) -> bool {
        records.iter().any(|r| self.is_recognized(&r.product_id))
    }

    fn backend_has_premium(&self, gateway: &mut dyn BillingGateway) -> Result<bool, BackendError> {
        gateway.connect()?;
        let purchases = gateway.list_completed_purchases()?;
        tracing::debug!(count = purchases.len(), "completed purchases fetched");
        Ok(self.recognizes_any(&purchases))
    }

    fn refresh_offerings(
        &self,
        gateway: &mut dyn BillingGateway,
    ) -> Result<Vec<Offering>, BackendError> {
        let offerings = gateway.list_offerings(&self.product_ids)?;
        if offerings.is_empty() {
            tracing::warn!(product_ids = ?self.product_ids, "store returned no offerings");
        }
        *self.lock_offerings() = offerings.clone();
        Ok(offerings)
    }

    fn lock_gateway(&self) -> MutexGuard<'_, Box<dyn BillingGateway>> {
        self.gateway.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_offerings(&self) -> MutexGuard<'_, Vec<Offering>> {
        self.offerings.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl std::fmt::Debug for PremiumService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PremiumService")
            .field("store", &self.store)
            .field("product_ids", &self.product_ids)
            .finish_non_exhaustive()
    }
}

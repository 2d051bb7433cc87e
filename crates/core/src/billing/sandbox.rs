//! In-process billing gateway for tests and offline development
//!
//! Clones share one ledger, so a test (or the CLI host) can keep a handle to
//! script faults while the reconciliation service owns another.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};

use super::{
    BillingGateway, ConnectionError, Offering, PurchaseError, PurchaseOutcome, PurchaseRecord,
    QueryError, PREMIUM_PRODUCT_ID,
};

/// How the sandbox resolves purchase flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SandboxPurchaseMode {
    /// Complete immediately
    #[default]
    Approve,
    /// Behave as if the user dismissed the sheet
    Cancel,
    /// Leave the purchase pending (deferred payment)
    Defer,
    /// Decline with a backend error
    Fail,
}

#[derive(Debug, Default)]
struct SandboxState {
    catalog: Vec<Offering>,
    ledger: Vec<PurchaseRecord>,
    ledger_path: Option<PathBuf>,
    mode: SandboxPurchaseMode,
    connected: bool,
    fail_connect: bool,
    fail_queries: bool,
    connect_calls: usize,
    sessions_opened: usize,
    purchase_calls: usize,
    next_token: u64,
}

impl SandboxState {
    fn save_ledger(&self) {
        let Some(ref path) = self.ledger_path else {
            return;
        };
        let result = serde_json::to_string_pretty(&self.ledger)
            .map_err(|e| e.to_string())
            .and_then(|json| {
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent).map_err(|e| e.to_string())?;
                }
                fs::write(path, json).map_err(|e| e.to_string())
            });
        if let Err(e) = result {
            tracing::warn!(path = %path.display(), error = %e, "sandbox ledger not saved");
        }
    }
}

/// The catalog the sandbox serves when none is given.
pub fn default_catalog() -> Vec<Offering> {
    vec![Offering {
        product_id: PREMIUM_PRODUCT_ID.to_string(),
        localized_price: "$4.99".to_string(),
        raw_price: 4.99,
        currency_code: "USD".to_string(),
    }]
}

#[derive(Debug, Clone, Default)]
pub struct SandboxGateway {
    state: Arc<Mutex<SandboxState>>,
}

impl SandboxGateway {
    /// Sandbox with the default catalog and an empty ledger.
    pub fn new() -> Self {
        Self::with_catalog(default_catalog())
    }

    pub fn with_catalog(catalog: Vec<Offering>) -> Self {
        let gateway = Self::default();
        gateway.lock().catalog = catalog;
        gateway
    }

    /// Persist the ledger at `path`, loading any purchases already recorded there.
    pub fn with_ledger_file(self, path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        {
            let mut state = self.lock();
            state.ledger = match fs::read_to_string(&path) {
                Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                    tracing::warn!(path = %path.display(), error = %e, "sandbox ledger unreadable, starting empty");
                    Vec::new()
                }),
                Err(_) => Vec::new(),
            };
            state.next_token = state.ledger.len() as u64;
            state.ledger_path = Some(path);
        }
        self
    }

    pub fn set_purchase_mode(&self, mode: SandboxPurchaseMode) {
        self.lock().mode = mode;
    }

    /// Make every subsequent `connect()` fail.
    pub fn set_fail_connect(&self, fail: bool) {
        self.lock().fail_connect = fail;
    }

    /// Make catalog and ledger queries fail.
    pub fn set_fail_queries(&self, fail: bool) {
        self.lock().fail_queries = fail;
    }

    /// Record a completed purchase made outside this process (another device).
    pub fn grant(&self, product_id: &str) -> PurchaseRecord {
        let mut state = self.lock();
        let record = issue(&mut state, product_id);
        state.save_ledger();
        record
    }

    /// Drop every purchase, as a refund would.
    pub fn revoke_all(&self) {
        let mut state = self.lock();
        state.ledger.clear();
        state.save_ledger();
    }

    pub fn ledger(&self) -> Vec<PurchaseRecord> {
        self.lock().ledger.clone()
    }

    pub fn connect_calls(&self) -> usize {
        self.lock().connect_calls
    }

    /// Connects that actually opened a new session.
    pub fn sessions_opened(&self) -> usize {
        self.lock().sessions_opened
    }

    pub fn purchase_calls(&self) -> usize {
        self.lock().purchase_calls
    }

    fn lock(&self) -> MutexGuard<'_, SandboxState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn issue(state: &mut SandboxState, product_id: &str) -> PurchaseRecord {
    state.next_token += 1;
    let record = PurchaseRecord {
        product_id: product_id.to_string(),
        token: format!("sandbox-{:06}", state.next_token),
    };
    state.ledger.push(record.clone());
    record
}

impl BillingGateway for SandboxGateway {
    fn connect(&mut self) -> Result<(), ConnectionError> {
        let mut state = self.lock();
        state.connect_calls += 1;
        if state.fail_connect {
            state.connected = false;
            return Err(ConnectionError("sandbox store unreachable".to_string()));
        }
        if !state.connected {
            state.sessions_opened += 1;
        }
        state.connected = true;
        Ok(())
    }

    fn disconnect(&mut self) {
        self.lock().connected = false;
    }

    fn is_connected(&self) -> bool {
        self.lock().connected
    }

    fn list_offerings(&mut self, product_ids: &[String]) -> Result<Vec<Offering>, QueryError> {
        let state = self.lock();
        if !state.connected {
            return Err(QueryError::NotConnected);
        }
        if state.fail_queries {
            return Err(QueryError::Backend("sandbox catalog unavailable".to_string()));
        }
        Ok(state
            .catalog
            .iter()
            .filter(|o| product_ids.contains(&o.product_id))
            .cloned()
            .collect())
    }

    fn purchase(&mut self, product_id: &str) -> Result<PurchaseOutcome, PurchaseError> {
        let mut state = self.lock();
        if !state.connected {
            return Err(PurchaseError::NotConnected);
        }
        state.purchase_calls += 1;
        if !state.catalog.iter().any(|o| o.product_id == product_id) {
            return Err(PurchaseError::UnknownProduct(product_id.to_string()));
        }
        match state.mode {
            SandboxPurchaseMode::Approve => {
                let record = issue(&mut state, product_id);
                state.save_ledger();
                Ok(PurchaseOutcome::Completed(record))
            }
            SandboxPurchaseMode::Cancel => Ok(PurchaseOutcome::Cancelled),
            SandboxPurchaseMode::Defer => Ok(PurchaseOutcome::Pending),
            SandboxPurchaseMode::Fail => {
                Err(PurchaseError::Backend("sandbox payment declined".to_string()))
            }
        }
    }

    fn list_completed_purchases(&mut self) -> Result<Vec<PurchaseRecord>, QueryError> {
        let state = self.lock();
        if !state.connected {
            return Err(QueryError::NotConnected);
        }
        if state.fail_queries {
            return Err(QueryError::Backend("sandbox ledger unavailable".to_string()));
        }
        Ok(state.ledger.clone())
    }
}

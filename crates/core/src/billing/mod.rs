//! Billing gateway abstraction
//!
//! A `BillingGateway` fronts exactly one external purchase backend. Callers only
//! see the operations below, so adapters can be swapped without touching the
//! reconciliation code. Implementations:
//! - `HttpGateway`: receipt/entitlement REST backend (behind `http-gateway` feature)
//! - `SandboxGateway`: in-process ledger for tests and offline development

pub mod identity;
#[cfg(feature = "http-gateway")]
pub mod http;
pub mod sandbox;

#[cfg(feature = "http-gateway")]
pub use http::{HttpGateway, HttpGatewayConfig};
pub use sandbox::{SandboxGateway, SandboxPurchaseMode};

use serde::{Deserialize, Serialize};

/// Product id sold by the app for lifetime premium access.
pub const PREMIUM_PRODUCT_ID: &str = "premium-access";

/// A purchasable product as described by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offering {
    pub product_id: String,
    /// Price string with currency symbol, e.g. `"$4.99"`
    pub localized_price: String,
    pub raw_price: f64,
    /// ISO 4217 code, e.g. `"USD"`
    pub currency_code: String,
}

/// A purchase the backend attributes to this user/device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseRecord {
    pub product_id: String,
    /// Store receipt or purchase token; opaque and never persisted.
    pub token: String,
}

/// How an initiated purchase flow resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PurchaseOutcome {
    Completed(PurchaseRecord),
    /// Awaiting external approval (deferred payment, parental consent)
    Pending,
    /// The user dismissed the purchase sheet
    Cancelled,
}

#[derive(Debug, thiserror::Error)]
#[error("billing backend unavailable: {0}")]
pub struct ConnectionError(pub String);

#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("billing gateway is not connected")]
    NotConnected,
    #[error("billing query failed: {0}")]
    Backend(String),
    #[error("unexpected billing response: {0}")]
    Decode(String),
}

#[derive(Debug, thiserror::Error)]
pub enum PurchaseError {
    #[error("billing gateway is not connected")]
    NotConnected,
    #[error("product {0} is not available for purchase")]
    UnknownProduct(String),
    #[error("purchase failed: {0}")]
    Backend(String),
    #[error("unexpected billing response: {0}")]
    Decode(String),
}

/// Contract required of any purchase backend.
pub trait BillingGateway: Send {
    /// Establish a session. Idempotent when already connected.
    fn connect(&mut self) -> Result<(), ConnectionError>;

    /// Release the session.
    fn disconnect(&mut self);

    fn is_connected(&self) -> bool;

    /// Current price metadata for the given products. Unknown ids are skipped.
    fn list_offerings(&mut self, product_ids: &[String]) -> Result<Vec<Offering>, QueryError>;

    /// Run a purchase flow. May block until the user finishes with the store UI.
    fn purchase(&mut self, product_id: &str) -> Result<PurchaseOutcome, PurchaseError>;

    /// Every purchase the backend currently attributes to this user/device.
    fn list_completed_purchases(&mut self) -> Result<Vec<PurchaseRecord>, QueryError>;
}

impl<G: BillingGateway + ?Sized> BillingGateway for Box<G> {
    fn connect(&mut self) -> Result<(), ConnectionError> {
        (**self).connect()
    }

    fn disconnect(&mut self) {
        (**self).disconnect()
    }

    fn is_connected(&self) -> bool {
        (**self).is_connected()
    }

    fn list_offerings(&mut self, product_ids: &[String]) -> Result<Vec<Offering>, QueryError> {
        (**self).list_offerings(product_ids)
    }

    fn purchase(&mut self, product_id: &str) -> Result<PurchaseOutcome, PurchaseError> {
        (**self).purchase(product_id)
    }

    fn list_completed_purchases(&mut self) -> Result<Vec<PurchaseRecord>, QueryError> {
        (**self).list_completed_purchases()
    }
}

//! Result values handed back to the host for each premium operation

use crate::billing::{ConnectionError, QueryError};

/// Why the billing backend could not be consulted.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error(transparent)]
    Connection(#[from] ConnectionError),
    #[error(transparent)]
    Query(#[from] QueryError),
}

/// Outcome of a silent startup reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    pub has_premium: bool,
    /// Set when the backend could not be reached and the cached value was kept.
    /// Hosts log this; it is never shown to the user.
    pub warning: Option<String>,
}

/// Outcome of a user-initiated restore.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreOutcome {
    Restored,
    /// The backend answered, but holds no recognized purchase for this user.
    NotFound,
    Failed(String),
}

impl RestoreOutcome {
    pub fn success(&self) -> bool {
        matches!(self, RestoreOutcome::Restored)
    }
}

/// Outcome of a purchase flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PurchaseResult {
    Purchased,
    /// Awaiting external approval; a later reconciliation will pick it up.
    Pending,
    Cancelled,
    Failed(String),
}

impl PurchaseResult {
    pub fn success(&self) -> bool {
        matches!(self, PurchaseResult::Purchased)
    }

    /// User cancellation is not an error and must not be presented as one.
    pub fn cancelled(&self) -> bool {
        matches!(self, PurchaseResult::Cancelled)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            PurchaseResult::Failed(msg) => Some(msg),
            _ => None,
        }
    }
}

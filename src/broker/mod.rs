//! Settlement Broker Adapters
//!
//! The broker owns every balance. The gateway only reaches it through the
//! [`Broker`] trait, one call per request.
//!
//! - [`memory::MemoryBroker`] - in-process simulation of the ledger contract
//! - [`http::HttpBroker`] - client for a broker sidecar over HTTP
//! - [`value::BrokerValue`] - tagged value tree for account snapshots

pub mod http;
pub mod memory;
pub mod value;

pub use http::HttpBroker;
pub use memory::MemoryBroker;
pub use value::BrokerValue;

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

// ============================================================================
// Service Types
// ============================================================================

/// Sub-account partition a retrieval targets.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
pub enum ServiceType {
    #[serde(rename = "inference")]
    Inference,
    #[serde(rename = "fine-tuning")]
    FineTuning,
}

impl ServiceType {
    pub const ALL: [ServiceType; 2] = [ServiceType::Inference, ServiceType::FineTuning];

    pub fn as_str(self) -> &'static str {
        match self {
            ServiceType::Inference => "inference",
            ServiceType::FineTuning => "fine-tuning",
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceType {
    type Err = BrokerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ServiceType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| BrokerError::Rejected(format!("Unknown service type: {}", s)))
    }
}

// ============================================================================
// Amounts
// ============================================================================

/// Contract floor for opening a ledger, in OG
pub const MIN_LEDGER_OG: f64 = 3.0;

/// Finite, strictly positive amount in OG token units.
///
/// The only way to build one is [`OgAmount::new`], so a broker never sees
/// zero, negative or non-finite values.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct OgAmount(f64);

impl OgAmount {
    pub fn new(value: f64) -> Option<Self> {
        (value.is_finite() && value > 0.0).then_some(Self(value))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl fmt::Display for OgAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Broker failure. The display text is what callers see in `error`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BrokerError {
    /// The broker refused the operation; the message is passed through as-is.
    #[error("{0}")]
    Rejected(String),

    #[error("Broker unreachable: {0}")]
    Transport(String),

    #[error("Invalid broker response: {0}")]
    InvalidResponse(String),

    #[error("Broker unavailable: {0}")]
    Unavailable(String),
}

// ============================================================================
// Broker Trait
// ============================================================================

/// Operations the gateway needs from the settlement broker.
///
/// Every method is a single awaited call. Implementations own all account
/// state and any serialization of concurrent mutations.
#[async_trait]
pub trait Broker: Send + Sync {
    /// Adapter name for logging and health output
    fn name(&self) -> &'static str;

    /// Add funds to an existing ledger
    async fn deposit_funds(&self, amount: OgAmount) -> Result<String, BrokerError>;

    /// Current account snapshot (ledger, sub-accounts, pending fields)
    async fn get_balance(&self) -> Result<BrokerValue, BrokerError>;

    /// Return unused ledger funds to the wallet
    async fn request_refund(&self, amount: OgAmount) -> Result<String, BrokerError>;

    /// Create the ledger with its initial balance
    async fn add_funds_to_ledger(&self, amount: OgAmount) -> Result<String, BrokerError>;

    /// Move a sub-account's funds back into the main ledger
    async fn retrieve_funds(&self, service: ServiceType) -> Result<String, BrokerError>;

    /// Remove the ledger
    async fn delete_ledger(&self) -> Result<String, BrokerError>;
}

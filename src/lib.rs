//! Ledger Account Gateway
//!
//! HTTP gateway over a settlement broker's funded ledger: deposit, refund,
//! ledger creation and deletion, sub-account retrieval, balance inspection.
//!
//! # Modules
//!
//! - [`broker`] - Broker trait, adapters, snapshot value tree
//! - [`gateway`] - Axum router, validated requests, response envelope
//! - [`config`] - YAML configuration
//! - [`logging`] - tracing subscriber setup

pub mod broker;
pub mod config;
pub mod gateway;
pub mod logging;

// Convenient re-exports at crate root
pub use broker::{
    Broker, BrokerError, BrokerValue, HttpBroker, MIN_LEDGER_OG, MemoryBroker, OgAmount,
    ServiceType,
};
pub use config::AppConfig;
pub use gateway::{build_router, run_server, state::AppState};

//! HTTP handlers
//!
//! - [`account`]: ledger lifecycle and funds movement
//! - [`health`]: liveness
//! - `mock`: simulation routes (`mock-api` feature only)

pub mod account;
pub mod health;
#[cfg(feature = "mock-api")]
pub mod mock;

pub use account::{
    add_ledger, delete_ledger, deposit, get_account_info, request_refund, retrieve_funds,
};
pub use health::{HealthResponse, health_check};

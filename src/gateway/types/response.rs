//! Response envelope
//!
//! Every endpoint answers `{ success, message | accountInfo, error? }`:
//! - `MessageResponse`: mutating operations
//! - `AccountInfoResponse`: account snapshot
//! - `ErrorResponse`: any failure

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Success envelope for mutating operations
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = true)]
    pub success: bool,
    /// Broker result, passed through verbatim
    #[schema(example = "Deposited 5 OG to ledger")]
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// Success envelope for the account snapshot
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountInfoResponse {
    #[schema(example = true)]
    pub success: bool,
    /// Broker snapshot; big integers are exact decimal strings
    #[schema(value_type = Object, example = json!({
        "ledgerInfo": ["5000000000000000000", "0"],
        "infers": [],
        "fines": null
    }))]
    pub account_info: Value,
}

impl AccountInfoResponse {
    pub fn new(account_info: Value) -> Self {
        Self {
            success: true,
            account_info,
        }
    }
}

/// Failure envelope
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    #[schema(example = false)]
    pub success: bool,
    #[schema(example = "Valid amount required")]
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

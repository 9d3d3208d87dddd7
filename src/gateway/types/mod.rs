//! Gateway types module
//!
//! ## Input Types
//! - [`ValidatedJson`]: Axum extractor that only yields validated requests
//! - [`AmountField`]: shape of a raw `amount` field
//! - Typed requests: [`DepositRequest`], [`RefundRequest`],
//!   [`AddLedgerRequest`], [`RetrieveFundsRequest`]
//!
//! ## Output Types
//! - [`MessageResponse`], [`AccountInfoResponse`], [`ErrorResponse`]

pub mod request;
pub mod response;

pub use request::{
    AccountRequest, AddLedgerRequest, AmountBody, AmountField, DepositRequest, RefundRequest,
    RetrieveFundsRequest, ServiceTypeBody, ValidatedJson,
};
#[cfg(feature = "mock-api")]
pub use request::SubAccountTransferRequest;
pub use response::{AccountInfoResponse, ErrorResponse, MessageResponse};

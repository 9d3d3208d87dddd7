//! Simulation-only handlers
//!
//! [SECURITY WARNING] Compiled only with the `mock-api` feature. Moves funds
//! inside the in-process broker without any settlement.

use std::sync::Arc;

use axum::{Json, extract::State};

use super::super::error::{ApiResult, GatewayError};
use super::super::state::AppState;
use super::super::types::{MessageResponse, SubAccountTransferRequest, ValidatedJson};

/// Lock ledger funds into a sub-account of the simulated broker
///
/// POST /internal/mock/sub-account
pub async fn fund_sub_account(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<SubAccountTransferRequest>,
) -> ApiResult<MessageResponse> {
    let simulator = state.simulator.as_ref().ok_or(GatewayError::Unavailable(
        "Sub-account simulation requires the memory broker",
    ))?;
    tracing::info!(
        service_type = %req.service_type,
        amount = %req.amount,
        "simulated sub-account transfer"
    );
    let message = simulator.transfer_to_sub_account(req.service_type, req.amount)?;
    Ok(Json(MessageResponse::new(message)))
}

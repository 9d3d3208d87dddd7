//! Gateway error → HTTP mapping
//!
//! The single place where failures become status codes and envelopes:
//! validation → 400, broker → 500, missing collaborator → 503.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use super::types::ErrorResponse;
use crate::broker::BrokerError;

#[derive(Error, Debug)]
pub enum GatewayError {
    /// Caller input rejected before any broker call
    #[error("{0}")]
    Validation(&'static str),

    /// Broker call failed; text passed through
    #[error(transparent)]
    Downstream(#[from] BrokerError),

    /// Route needs a collaborator that is not configured
    #[error("{0}")]
    Unavailable(&'static str),
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::Validation(_) => StatusCode::BAD_REQUEST,
            GatewayError::Downstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
            GatewayError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            GatewayError::Validation(reason) => tracing::warn!(%reason, "request rejected"),
            GatewayError::Downstream(err) => tracing::error!(error = %err, "broker call failed"),
            GatewayError::Unavailable(reason) => tracing::warn!(%reason, "route unavailable"),
        }
        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

/// Handler result: 200 + payload, or a mapped [`GatewayError`]
pub type ApiResult<T> = Result<Json<T>, GatewayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            GatewayError::Validation("Valid amount required").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            GatewayError::from(BrokerError::Transport("refused".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_downstream_message_is_broker_text() {
        let err = GatewayError::from(BrokerError::Rejected("Ledger does not exist".into()));
        assert_eq!(err.to_string(), "Ledger does not exist");
    }
}

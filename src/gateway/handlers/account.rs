//! Account lifecycle handlers (deposit, info, refund, ledger, retrieval)
//!
//! Each handler makes exactly one broker call. Validation happens in the
//! [`ValidatedJson`] extractor, so an invalid body never reaches the broker.

use std::sync::Arc;

use axum::{Json, extract::State};

use super::super::error::ApiResult;
use super::super::state::AppState;
use super::super::types::{
    AccountInfoResponse, AddLedgerRequest, AmountBody, DepositRequest, ErrorResponse,
    MessageResponse, RefundRequest, RetrieveFundsRequest, ServiceTypeBody, ValidatedJson,
};

/// Deposit funds to the ledger
///
/// POST /account/deposit
#[utoipa::path(
    post,
    path = "/account/deposit",
    request_body = AmountBody,
    responses(
        (status = 200, description = "Deposit successful", body = MessageResponse),
        (status = 400, description = "Invalid amount", body = ErrorResponse),
        (status = 500, description = "Broker error", body = ErrorResponse)
    ),
    tag = "Account"
)]
pub async fn deposit(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<DepositRequest>,
) -> ApiResult<MessageResponse> {
    tracing::info!(amount = %req.amount, "deposit");
    let message = state.broker.deposit_funds(req.amount).await?;
    Ok(Json(MessageResponse::new(message)))
}

/// Account snapshot: ledger, inference and fine-tuning sub-accounts
///
/// GET /account/info
#[utoipa::path(
    get,
    path = "/account/info",
    responses(
        (status = 200, description = "Account information retrieved", body = AccountInfoResponse),
        (status = 500, description = "Broker error", body = ErrorResponse)
    ),
    tag = "Account"
)]
pub async fn get_account_info(
    State(state): State<Arc<AppState>>,
) -> ApiResult<AccountInfoResponse> {
    let snapshot = state.broker.get_balance().await?;
    tracing::debug!(?snapshot, "account snapshot");
    Ok(Json(AccountInfoResponse::new(snapshot.normalize())))
}

/// Refund unused ledger funds
///
/// POST /account/refund
#[utoipa::path(
    post,
    path = "/account/refund",
    request_body = AmountBody,
    responses(
        (status = 200, description = "Refund requested", body = MessageResponse),
        (status = 400, description = "Invalid amount", body = ErrorResponse),
        (status = 500, description = "Broker error", body = ErrorResponse)
    ),
    tag = "Account"
)]
pub async fn request_refund(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<RefundRequest>,
) -> ApiResult<MessageResponse> {
    tracing::info!(amount = %req.amount, "refund");
    let message = state.broker.request_refund(req.amount).await?;
    Ok(Json(MessageResponse::new(message)))
}

/// Create the ledger with an initial balance
///
/// POST /account/add-ledger
///
/// The contract requires at least 3 OG.
#[utoipa::path(
    post,
    path = "/account/add-ledger",
    request_body = AmountBody,
    responses(
        (status = 200, description = "Ledger created", body = MessageResponse),
        (status = 400, description = "Amount missing or below 3 OG", body = ErrorResponse),
        (status = 500, description = "Broker error", body = ErrorResponse)
    ),
    tag = "Account"
)]
pub async fn add_ledger(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<AddLedgerRequest>,
) -> ApiResult<MessageResponse> {
    tracing::info!(amount = %req.amount, "add ledger");
    let message = state.broker.add_funds_to_ledger(req.amount).await?;
    Ok(Json(MessageResponse::new(message)))
}

/// Move a sub-account's funds back to the main ledger
///
/// POST /account/retrieve-funds
#[utoipa::path(
    post,
    path = "/account/retrieve-funds",
    request_body = ServiceTypeBody,
    responses(
        (status = 200, description = "Funds retrieved", body = MessageResponse),
        (status = 400, description = "Invalid serviceType", body = ErrorResponse),
        (status = 500, description = "Broker error", body = ErrorResponse)
    ),
    tag = "Account"
)]
pub async fn retrieve_funds(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<RetrieveFundsRequest>,
) -> ApiResult<MessageResponse> {
    tracing::info!(service_type = %req.service_type, "retrieve funds");
    let message = state.broker.retrieve_funds(req.service_type).await?;
    Ok(Json(MessageResponse::new(message)))
}

/// Delete the ledger
///
/// DELETE /account/delete-ledger
///
/// Callers should retrieve sub-account funds first; whether the broker
/// insists on it is up to the broker.
#[utoipa::path(
    delete,
    path = "/account/delete-ledger",
    responses(
        (status = 200, description = "Ledger deleted", body = MessageResponse),
        (status = 500, description = "Broker error", body = ErrorResponse)
    ),
    tag = "Account"
)]
pub async fn delete_ledger(State(state): State<Arc<AppState>>) -> ApiResult<MessageResponse> {
    tracing::info!("delete ledger");
    let message = state.broker.delete_ledger().await?;
    Ok(Json(MessageResponse::new(message)))
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;
    use std::sync::Arc;

    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode},
    };
    use num_bigint::BigInt;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::broker::mock::RecordingBroker;
    use crate::broker::{BrokerValue, ServiceType};
    use crate::gateway::build_router;
    use crate::gateway::state::AppState;
    use crate::gateway::types::request::{INVALID_AMOUNT, INVALID_SERVICE_TYPE, LEDGER_MINIMUM};

    fn app(broker: Arc<RecordingBroker>) -> Router {
        build_router(Arc::new(AppState::new(broker)))
    }

    async fn send(
        app: Router,
        method: &str,
        uri: &str,
        body: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(b) => {
                builder = builder.header("content-type", "application/json");
                Body::from(b.to_string())
            }
            None => Body::empty(),
        };
        let response = app.oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_deposit_success_passes_message_through() {
        let broker = Arc::new(RecordingBroker::new("ok"));
        let (status, body) = send(
            app(broker.clone()),
            "POST",
            "/account/deposit",
            Some(r#"{"amount":5}"#),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"success": true, "message": "ok"}));
        assert_eq!(broker.calls(), 1);
        assert_eq!(broker.last_amount(), Some(5.0));
    }

    const INVALID_AMOUNT_BODIES: [Option<&str>; 9] = [
        Some(r#"{"amount":0}"#),
        Some(r#"{"amount":-3}"#),
        Some(r#"{"amount":"NaN"}"#),
        Some(r#"{"amount":"abc"}"#),
        Some(r#"{"amount":true}"#),
        Some(r#"{"amount":null}"#),
        Some(r#"{}"#),
        Some("not json"),
        None,
    ];

    #[tokio::test]
    async fn test_invalid_amounts_never_reach_broker() {
        let routes = [
            ("/account/deposit", INVALID_AMOUNT),
            ("/account/refund", INVALID_AMOUNT),
            ("/account/add-ledger", LEDGER_MINIMUM),
        ];
        for (uri, reason) in routes {
            let broker = Arc::new(RecordingBroker::new("ok"));
            for body in INVALID_AMOUNT_BODIES {
                let (status, json) = send(app(broker.clone()), "POST", uri, body).await;
                assert_eq!(status, StatusCode::BAD_REQUEST, "{} body {:?}", uri, body);
                assert_eq!(json, json!({"success": false, "error": reason}));
            }
            assert_eq!(broker.calls(), 0, "{}", uri);
        }
    }

    #[tokio::test]
    async fn test_refund_validation_and_success() {
        let broker = Arc::new(RecordingBroker::new("refunded"));
        let (status, _) = send(
            app(broker.clone()),
            "POST",
            "/account/refund",
            Some(r#"{"amount":0}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(broker.calls(), 0);

        let (status, body) = send(
            app(broker.clone()),
            "POST",
            "/account/refund",
            Some(r#"{"amount":"1.5"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "refunded");
        assert_eq!(broker.last_amount(), Some(1.5));
    }

    #[tokio::test]
    async fn test_add_ledger_below_minimum() {
        let broker = Arc::new(RecordingBroker::new("created"));
        let (status, body) = send(
            app(broker.clone()),
            "POST",
            "/account/add-ledger",
            Some(r#"{"amount":2}"#),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({
                "success": false,
                "error": "Minimum 3 OG required to create ledger (contract requirement)"
            })
        );
        assert_eq!(body["error"], LEDGER_MINIMUM);
        assert_eq!(broker.calls(), 0);
    }

    #[tokio::test]
    async fn test_add_ledger_at_minimum() {
        let broker = Arc::new(RecordingBroker::new("created"));
        let (status, body) = send(
            app(broker.clone()),
            "POST",
            "/account/add-ledger",
            Some(r#"{"amount":3}"#),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"success": true, "message": "created"}));
        assert_eq!(broker.last_amount(), Some(3.0));
    }

    #[tokio::test]
    async fn test_retrieve_funds_rejects_unknown_service() {
        let broker = Arc::new(RecordingBroker::new("ok"));
        for body in [r#"{"serviceType":"staking"}"#, r#"{"serviceType":""}"#, r#"{}"#] {
            let (status, json) = send(
                app(broker.clone()),
                "POST",
                "/account/retrieve-funds",
                Some(body),
            )
            .await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(json["error"], INVALID_SERVICE_TYPE);
        }
        assert_eq!(broker.calls(), 0);
    }

    #[tokio::test]
    async fn test_retrieve_funds_fine_tuning() {
        let broker = Arc::new(RecordingBroker::new("retrieved"));
        let (status, body) = send(
            app(broker.clone()),
            "POST",
            "/account/retrieve-funds",
            Some(r#"{"serviceType":"fine-tuning"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "retrieved");
        assert_eq!(broker.last_service(), Some(ServiceType::FineTuning));
    }

    #[tokio::test]
    async fn test_account_info_normalizes_snapshot() {
        let snapshot = BrokerValue::map([
            (
                "ledgerInfo",
                BrokerValue::List(vec![
                    BrokerValue::Integer(
                        BigInt::from_str("340282366920938463463374607431768211457").unwrap(),
                    ),
                    BrokerValue::Integer(BigInt::from(0)),
                ]),
            ),
            ("fines", BrokerValue::Null),
        ]);
        let broker = Arc::new(RecordingBroker::new("").with_snapshot(snapshot));
        let (status, body) = send(app(broker), "GET", "/account/info", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "success": true,
                "accountInfo": {
                    "ledgerInfo": ["340282366920938463463374607431768211457", "0"],
                    "fines": null
                }
            })
        );
    }

    #[tokio::test]
    async fn test_broker_failure_is_500_on_every_operation() {
        let broker = Arc::new(RecordingBroker::new("ok"));
        broker.set_failure("execution reverted: insufficient funds");

        let cases: [(&str, &str, Option<&str>); 6] = [
            ("POST", "/account/deposit", Some(r#"{"amount":1}"#)),
            ("GET", "/account/info", None),
            ("POST", "/account/refund", Some(r#"{"amount":1}"#)),
            ("POST", "/account/add-ledger", Some(r#"{"amount":3}"#)),
            (
                "POST",
                "/account/retrieve-funds",
                Some(r#"{"serviceType":"inference"}"#),
            ),
            ("DELETE", "/account/delete-ledger", None),
        ];
        for (method, uri, body) in cases {
            let (status, json) = send(app(broker.clone()), method, uri, body).await;
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{} {}", method, uri);
            assert_eq!(
                json,
                json!({"success": false, "error": "execution reverted: insufficient funds"})
            );
        }
        assert_eq!(broker.calls(), 6);
    }

    #[tokio::test]
    async fn test_delete_ledger_success() {
        let broker = Arc::new(RecordingBroker::new("deleted"));
        let (status, body) = send(
            app(broker.clone()),
            "DELETE",
            "/account/delete-ledger",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"success": true, "message": "deleted"}));
        assert_eq!(broker.calls(), 1);
    }
}

//! Request schemas and validation
//!
//! Bodies are read as raw JSON and turned into typed requests before any
//! handler runs. Each request type owns the fixed message returned on
//! rejection, so a malformed body, a missing field and an out-of-range value
//! all produce the same 400.

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde::Deserialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::broker::{MIN_LEDGER_OG, OgAmount, ServiceType};
use crate::gateway::error::GatewayError;

pub const INVALID_AMOUNT: &str = "Valid amount required";
pub const LEDGER_MINIMUM: &str = "Minimum 3 OG required to create ledger (contract requirement)";
pub const INVALID_SERVICE_TYPE: &str = "Valid serviceType required (inference or fine-tuning)";

// ============================================================================
// Field Shapes
// ============================================================================

/// `amount` as it arrived
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AmountField {
    Missing,
    /// Finite number, from a JSON number or a numeric string
    Numeric(f64),
    /// Present but not a finite number
    Malformed,
}

impl AmountField {
    pub fn from_body(body: &Value) -> Self {
        match body.get("amount") {
            None | Some(Value::Null) => AmountField::Missing,
            Some(Value::Number(n)) => finite(n.as_f64()),
            Some(Value::String(s)) => finite(s.trim().parse::<f64>().ok()),
            Some(_) => AmountField::Malformed,
        }
    }

    /// Amount strictly above zero
    pub fn positive(self) -> Option<OgAmount> {
        match self {
            AmountField::Numeric(v) => OgAmount::new(v),
            _ => None,
        }
    }

    /// Amount at or above `floor`
    pub fn at_least(self, floor: f64) -> Option<OgAmount> {
        match self {
            AmountField::Numeric(v) if v >= floor => OgAmount::new(v),
            _ => None,
        }
    }
}

fn finite(value: Option<f64>) -> AmountField {
    match value {
        Some(v) if v.is_finite() => AmountField::Numeric(v),
        _ => AmountField::Malformed,
    }
}

fn service_type_field(body: &Value) -> Option<ServiceType> {
    body.get("serviceType")
        .and_then(Value::as_str)
        .and_then(|s| s.parse().ok())
}

// ============================================================================
// Typed Requests
// ============================================================================

/// A request body that validates itself from raw JSON.
pub trait AccountRequest: Sized + Send {
    /// Message returned with 400 when the body does not validate
    const REJECTION: &'static str;

    fn from_body(body: &Value) -> Option<Self>;
}

#[derive(Debug, Clone, Copy)]
pub struct DepositRequest {
    pub amount: OgAmount,
}

impl AccountRequest for DepositRequest {
    const REJECTION: &'static str = INVALID_AMOUNT;

    fn from_body(body: &Value) -> Option<Self> {
        AmountField::from_body(body)
            .positive()
            .map(|amount| Self { amount })
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RefundRequest {
    pub amount: OgAmount,
}

impl AccountRequest for RefundRequest {
    const REJECTION: &'static str = INVALID_AMOUNT;

    fn from_body(body: &Value) -> Option<Self> {
        AmountField::from_body(body)
            .positive()
            .map(|amount| Self { amount })
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AddLedgerRequest {
    pub amount: OgAmount,
}

impl AccountRequest for AddLedgerRequest {
    const REJECTION: &'static str = LEDGER_MINIMUM;

    fn from_body(body: &Value) -> Option<Self> {
        AmountField::from_body(body)
            .at_least(MIN_LEDGER_OG)
            .map(|amount| Self { amount })
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RetrieveFundsRequest {
    pub service_type: ServiceType,
}

impl AccountRequest for RetrieveFundsRequest {
    const REJECTION: &'static str = INVALID_SERVICE_TYPE;

    fn from_body(body: &Value) -> Option<Self> {
        service_type_field(body).map(|service_type| Self { service_type })
    }
}

/// Simulation-only: lock ledger funds into a sub-account
#[cfg(feature = "mock-api")]
#[derive(Debug, Clone, Copy)]
pub struct SubAccountTransferRequest {
    pub service_type: ServiceType,
    pub amount: OgAmount,
}

#[cfg(feature = "mock-api")]
impl AccountRequest for SubAccountTransferRequest {
    const REJECTION: &'static str =
        "Valid serviceType (inference or fine-tuning) and amount required";

    fn from_body(body: &Value) -> Option<Self> {
        let service_type = service_type_field(body)?;
        let amount = AmountField::from_body(body).positive()?;
        Some(Self {
            service_type,
            amount,
        })
    }
}

// ============================================================================
// Documentation Schemas
// ============================================================================

/// Body for deposit, refund and ledger creation
#[derive(Debug, Deserialize, ToSchema)]
pub struct AmountBody {
    /// Amount in OG (ledger creation requires at least 3)
    #[schema(example = 5.0)]
    pub amount: f64,
}

/// Body for fund retrieval
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceTypeBody {
    pub service_type: ServiceType,
}

// ============================================================================
// ValidatedJson: Axum Extractor
// ============================================================================

/// Extractor that hands handlers only validated requests.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: AccountRequest,
{
    type Rejection = GatewayError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|_| GatewayError::Validation(T::REJECTION))?;
        let body = parse_body(&bytes);

        T::from_body(&body)
            .map(ValidatedJson)
            .ok_or(GatewayError::Validation(T::REJECTION))
    }
}

/// Empty or non-JSON bodies read as `null`, which fails every schema.
fn parse_body(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes).unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_amount_field_shapes() {
        assert_eq!(AmountField::from_body(&json!({})), AmountField::Missing);
        assert_eq!(
            AmountField::from_body(&json!({"amount": null})),
            AmountField::Missing
        );
        assert_eq!(AmountField::from_body(&Value::Null), AmountField::Missing);
        assert_eq!(
            AmountField::from_body(&json!({"amount": 5})),
            AmountField::Numeric(5.0)
        );
        assert_eq!(
            AmountField::from_body(&json!({"amount": " 2.5 "})),
            AmountField::Numeric(2.5)
        );
        assert_eq!(
            AmountField::from_body(&json!({"amount": "abc"})),
            AmountField::Malformed
        );
        assert_eq!(
            AmountField::from_body(&json!({"amount": "NaN"})),
            AmountField::Malformed
        );
        assert_eq!(
            AmountField::from_body(&json!({"amount": "inf"})),
            AmountField::Malformed
        );
        assert_eq!(
            AmountField::from_body(&json!({"amount": ""})),
            AmountField::Malformed
        );
        assert_eq!(
            AmountField::from_body(&json!({"amount": true})),
            AmountField::Malformed
        );
        assert_eq!(
            AmountField::from_body(&json!({"amount": [1]})),
            AmountField::Malformed
        );
    }

    #[test]
    fn test_deposit_requires_positive_amount() {
        assert!(DepositRequest::from_body(&json!({"amount": 0})).is_none());
        assert!(DepositRequest::from_body(&json!({"amount": -1})).is_none());
        assert!(DepositRequest::from_body(&json!({})).is_none());
        let req = DepositRequest::from_body(&json!({"amount": 0.01})).unwrap();
        assert_eq!(req.amount.value(), 0.01);
    }

    #[test]
    fn test_refund_accepts_numeric_string() {
        let req = RefundRequest::from_body(&json!({"amount": "7"})).unwrap();
        assert_eq!(req.amount.value(), 7.0);
    }

    #[test]
    fn test_add_ledger_floor() {
        assert!(AddLedgerRequest::from_body(&json!({"amount": 2})).is_none());
        assert!(AddLedgerRequest::from_body(&json!({"amount": 2.999})).is_none());
        assert!(AddLedgerRequest::from_body(&json!({"amount": 3})).is_some());
        assert!(AddLedgerRequest::from_body(&json!({"amount": 100})).is_some());
        assert!(AddLedgerRequest::from_body(&json!({"amount": "x"})).is_none());
    }

    #[test]
    fn test_retrieve_funds_service_types() {
        let req = RetrieveFundsRequest::from_body(&json!({"serviceType": "inference"})).unwrap();
        assert_eq!(req.service_type, ServiceType::Inference);
        let req =
            RetrieveFundsRequest::from_body(&json!({"serviceType": "fine-tuning"})).unwrap();
        assert_eq!(req.service_type, ServiceType::FineTuning);

        assert!(RetrieveFundsRequest::from_body(&json!({"serviceType": "staking"})).is_none());
        assert!(RetrieveFundsRequest::from_body(&json!({"serviceType": 1})).is_none());
        assert!(RetrieveFundsRequest::from_body(&json!({"service_type": "inference"})).is_none());
        assert!(RetrieveFundsRequest::from_body(&json!({})).is_none());
    }

    #[test]
    fn test_parse_body_falls_back_to_null() {
        assert_eq!(parse_body(b""), Value::Null);
        assert_eq!(parse_body(b"{not json"), Value::Null);
        assert_eq!(parse_body(br#"{"amount":1}"#), json!({"amount": 1}));
    }
}

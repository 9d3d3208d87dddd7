//! OpenAPI / Swagger UI Documentation
//!
//! - Swagger UI: `http://localhost:8080/docs`
//! - OpenAPI JSON: `http://localhost:8080/api-docs/openapi.json`

use utoipa::OpenApi;

use crate::broker::ServiceType;
use crate::gateway::handlers::HealthResponse;
use crate::gateway::types::{
    AccountInfoResponse, AmountBody, ErrorResponse, MessageResponse, ServiceTypeBody,
};

/// Main API Documentation struct
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Ledger Account Gateway API",
        version = "1.0.0",
        description = "Funded ledger management on a settlement broker: deposit, refund, ledger lifecycle and sub-account retrieval.",
        license(
            name = "MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Development"),
    ),
    paths(
        crate::gateway::handlers::health::health_check,
        crate::gateway::handlers::account::get_account_info,
        crate::gateway::handlers::account::deposit,
        crate::gateway::handlers::account::request_refund,
        crate::gateway::handlers::account::add_ledger,
        crate::gateway::handlers::account::retrieve_funds,
        crate::gateway::handlers::account::delete_ledger,
    ),
    components(
        schemas(
            HealthResponse,
            MessageResponse,
            AccountInfoResponse,
            ErrorResponse,
            AmountBody,
            ServiceTypeBody,
            ServiceType,
        )
    ),
    tags(
        (name = "Account", description = "Ledger lifecycle and funds movement"),
        (name = "System", description = "Health checks and system info")
    )
)]
pub struct ApiDoc;

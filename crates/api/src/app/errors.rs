use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use orderdesk_core::DomainError;
use orderdesk_infra::{RepositoryError, ServiceError};

pub fn service_error_to_response(err: ServiceError) -> axum::response::Response {
    match err {
        ServiceError::Domain(e) => domain_error_to_response(e),
        ServiceError::Repository(RepositoryError::NotFound) => {
            json_error(StatusCode::NOT_FOUND, "not_found", "not found")
        }
        ServiceError::Repository(e) => {
            tracing::error!(error = %e, "repository failure");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "storage_error", e.to_string())
        }
    }
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    let message = err.to_string();
    if !err.is_precondition() {
        tracing::error!(error = %message, "domain invariant broken");
    }

    match err {
        DomainError::InvalidQuantity(_)
        | DomainError::InvalidAmount(_)
        | DomainError::InvalidFactor(_) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "validation_error", message)
        }
        DomainError::InvalidId(_) => json_error(StatusCode::BAD_REQUEST, "invalid_id", message),
        DomainError::ProductNotFound(_) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "product_not_found", message)
        }
        DomainError::UserNotFound(_) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "user_not_found", message)
        }
        DomainError::OrderNotFound(_) => json_error(StatusCode::NOT_FOUND, "not_found", message),
        DomainError::NegativeResult
        | DomainError::CurrencyMismatch { .. }
        | DomainError::InvariantViolation(_) => {
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", message)
        }
    }
}

/// Malformed bodies are `invalid_request`; a well-formed body whose `quantity`
/// is not an integer is a quantity validation failure.
pub fn json_rejection_to_response(rejection: JsonRejection) -> axum::response::Response {
    let message = rejection.body_text();
    match rejection {
        JsonRejection::JsonDataError(_) if rejected_field(&message) == Some("quantity") => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "validation_error", message)
        }
        _ => json_error(rejection.status(), "invalid_request", message),
    }
}

/// Field path reported by the JSON extractor: `quantity` for
/// `...target type: quantity: invalid type: floating point ...`.
fn rejected_field(message: &str) -> Option<&str> {
    let (_, detail) = message.split_once("target type: ")?;
    let (path, _) = detail.split_once(": ")?;
    (!path.contains(' ')).then_some(path)
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "success": false,
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

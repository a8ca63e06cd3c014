use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use lifecycle::error::LifecycleError;
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

/// Web layer errors
#[derive(Debug)]
pub enum WebError {
    Lifecycle(LifecycleError),
    Validation(ValidationErrors),
    Unauthorized,
}

impl fmt::Display for WebError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lifecycle(e) => write!(f, "Lifecycle error: {}", e),
            Self::Validation(e) => write!(f, "Validation error: {}", e),
            Self::Unauthorized => write!(f, "Unauthorized"),
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status_code = match &self {
            Self::Lifecycle(LifecycleError::NotFound) => StatusCode::NOT_FOUND,
            Self::Lifecycle(LifecycleError::Conflict { .. }) => StatusCode::CONFLICT,
            Self::Lifecycle(LifecycleError::Validation(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Lifecycle(LifecycleError::ConfirmationRequired { .. }) => {
                StatusCode::PRECONDITION_REQUIRED
            }
            Self::Lifecycle(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
        };

        let body = match &self {
            Self::Lifecycle(LifecycleError::NotFound) => {
                json!({
                    "error": "Resource not found"
                })
            }
            Self::Lifecycle(LifecycleError::Conflict { expected, actual }) => {
                json!({
                    "error": "Competition was modified by someone else; reload and try again",
                    "expected_updated_at": expected,
                    "current_updated_at": actual,
                })
            }
            Self::Lifecycle(LifecycleError::Validation(errors)) => {
                json!({
                    "error": "Transition rejected",
                    "details": errors
                })
            }
            Self::Lifecycle(e @ LifecycleError::ConfirmationRequired { .. }) => {
                json!({
                    "error": e.to_string()
                })
            }
            Self::Lifecycle(e) => {
                tracing::error!("Lifecycle error: {:?}", e);
                json!({
                    "error": "An internal error occurred"
                })
            }
            Self::Validation(errors) => {
                let field_errors: Vec<String> = errors
                    .field_errors()
                    .iter()
                    .flat_map(|(field, errors)| {
                        errors.iter().map(move |e| {
                            format!(
                                "{}: {}",
                                field,
                                e.message
                                    .as_ref()
                                    .map(|m| m.to_string())
                                    .unwrap_or_else(|| e.code.to_string())
                            )
                        })
                    })
                    .collect();

                json!({
                    "error": "Validation failed",
                    "details": field_errors
                })
            }
            Self::Unauthorized => {
                json!({
                    "error": "Unauthorized"
                })
            }
        };

        (status_code, Json(body)).into_response()
    }
}

impl From<LifecycleError> for WebError {
    fn from(error: LifecycleError) -> Self {
        Self::Lifecycle(error)
    }
}

impl From<ValidationErrors> for WebError {
    fn from(error: ValidationErrors) -> Self {
        Self::Validation(error)
    }
}

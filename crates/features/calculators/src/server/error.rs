use crate::error::CalcError;
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use zelo_derive::api_model;
use zelo_factors::FactorError;
use zelo_kernel::server::ApiStateError;

const UNPROCESSABLE: StatusCode = StatusCode::UNPROCESSABLE_ENTITY;

/// Error payload; `field` points the form at the offending input.
#[api_model]
pub struct ErrorBody {
    /// Machine-readable category (`invalid_input`, `unknown_kind`, ...).
    pub error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub message: String,
}

#[derive(Debug)]
pub enum ApiError {
    /// The request body is not JSON of the expected shape.
    Body(JsonRejection),
    Calc(CalcError),
    Factors(FactorError),
    State(ApiStateError),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Body(rejection)
    }
}

impl From<CalcError> for ApiError {
    fn from(err: CalcError) -> Self {
        Self::Calc(err)
    }
}

impl From<FactorError> for ApiError {
    fn from(err: FactorError) -> Self {
        Self::Factors(err)
    }
}

impl From<ApiStateError> for ApiError {
    fn from(err: ApiStateError) -> Self {
        Self::State(err)
    }
}

impl ApiError {
    fn parts(&self) -> (StatusCode, &'static str, Option<String>, String) {
        match self {
            Self::Body(rejection) => {
                (rejection.status(), "invalid_body", None, rejection.body_text())
            },
            Self::Calc(err) => {
                let (status, code) = match err {
                    CalcError::InvalidInput { .. } => (UNPROCESSABLE, "invalid_input"),
                    CalcError::UnknownKind { .. } => (UNPROCESSABLE, "unknown_kind"),
                    CalcError::NonFinite { .. } => (UNPROCESSABLE, "out_of_range"),
                    CalcError::Internal { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
                };
                let message = match err {
                    CalcError::InvalidInput { message, .. } => message.to_string(),
                    other => other.to_string(),
                };
                (status, code, err.field().map(str::to_owned), message)
            },
            Self::Factors(FactorError::Invalid { source, .. }) => {
                (UNPROCESSABLE, "invalid_factor", None, source.to_string())
            },
            Self::Factors(err) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "factor_store", None, err.to_string())
            },
            Self::State(err) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal", None, err.to_string())
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, field, message) = self.parts();
        if status.is_server_error() {
            tracing::error!(error, %message, "Request failed");
        } else {
            tracing::debug!(error, ?field, %message, "Request rejected");
        }
        (status, Json(ErrorBody { error, field, message })).into_response()
    }
}

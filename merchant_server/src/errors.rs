use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use log::error;
use merchant_engine::{ProductApiError, StoreAuthError, ValidationError, VariantApiError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("{0}")]
    ValidationError(String),
    #[error("Invalid reference. {0}")]
    InvalidReference(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
    #[error("Unauthenticated")]
    Unauthenticated,
    #[error("Unauthorized")]
    Unauthorized,
    #[error("{0}")]
    NoRecordFound(String),
}

impl ServerError {
    /// The message sent to the client. Server-side failures are reported generically; the details only go to the log.
    fn public_message(&self) -> String {
        if self.status_code().is_server_error() {
            "Internal error".to_string()
        } else {
            self.to_string()
        }
    }
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthenticated => StatusCode::FORBIDDEN,
            Self::Unauthorized => StatusCode::METHOD_NOT_ALLOWED,
            Self::NoRecordFound(_) => StatusCode::NOT_FOUND,
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::ValidationError(_) => StatusCode::BAD_REQUEST,
            Self::InvalidReference(_) => StatusCode::BAD_REQUEST,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.status_code().is_server_error() {
            error!("💻️ Request failed. {self}");
        }
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "error": self.public_message() }).to_string())
    }
}

impl From<ValidationError> for ServerError {
    fn from(e: ValidationError) -> Self {
        Self::ValidationError(e.to_string())
    }
}

impl From<StoreAuthError> for ServerError {
    fn from(e: StoreAuthError) -> Self {
        match e {
            StoreAuthError::DatabaseError(e) => Self::BackendError(format!("Database error: {e}")),
            StoreAuthError::Unauthenticated => Self::Unauthenticated,
            StoreAuthError::Unauthorized { .. } => Self::Unauthorized,
        }
    }
}

impl From<ProductApiError> for ServerError {
    fn from(e: ProductApiError) -> Self {
        match e {
            ProductApiError::DatabaseError(e) => Self::BackendError(format!("Database error: {e}")),
            ProductApiError::InvalidReference(e) => Self::InvalidReference(e),
            ProductApiError::ConstraintViolation(e) => Self::ValidationError(e),
            ProductApiError::ValidationError(e) => e.into(),
            ProductApiError::ProductNotFound(_) => Self::NoRecordFound(e.to_string()),
            ProductApiError::DeletionFailed { .. } => Self::BackendError(e.to_string()),
        }
    }
}

impl From<VariantApiError> for ServerError {
    fn from(e: VariantApiError) -> Self {
        match e {
            VariantApiError::DatabaseError(e) => Self::BackendError(format!("Database error: {e}")),
            VariantApiError::InvalidReference(e) => Self::InvalidReference(e),
            VariantApiError::ConstraintViolation(e) => Self::ValidationError(e),
            VariantApiError::ValidationError(e) => e.into(),
            VariantApiError::ProductNotFound(_) | VariantApiError::VariantNotFound(_) => {
                Self::NoRecordFound(e.to_string())
            },
            VariantApiError::NoOp => Self::ValidationError(e.to_string()),
        }
    }
}

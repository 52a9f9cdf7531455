use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

/// Custom error type for every request handler
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Required input was missing or unusable
    #[error("Validation error: {0}")]
    Validation(String),

    /// The email address is already registered
    #[error("Email already exists")]
    EmailExists,

    /// Unknown email or wrong password
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The addressed row does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// The multipart body could not be read
    #[error("Multipart error: {0}")]
    Multipart(#[from] actix_multipart::MultipartError),

    /// The query access layer failed
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A result row did not have the expected shape
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Writing an uploaded file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    /// Maps the error kind to its HTTP status, machine readable code and client message.
    pub fn classify(&self) -> (StatusCode, &'static str, String) {
        match self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, "validation_error", msg.clone()),
            ApiError::EmailExists => (
                StatusCode::BAD_REQUEST,
                "email_exists",
                "An account with this email already exists".to_string(),
            ),
            ApiError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "invalid_credentials",
                "Invalid email or password".to_string(),
            ),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            ApiError::Multipart(e) => (
                StatusCode::BAD_REQUEST,
                "invalid_form",
                format!("Invalid form data: {}", e),
            ),
            ApiError::Database(_) | ApiError::Decode(_) | ApiError::Io(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "An internal error occurred".to_string(),
            ),
        }
    }

    /// Maps a unique-constraint violation to [`ApiError::EmailExists`], leaving other errors as they are.
    pub fn email_conflict(error: sqlx::Error) -> Self {
        match &error {
            sqlx::Error::Database(db_error) if db_error.is_unique_violation() => {
                ApiError::EmailExists
            }
            _ => ApiError::Database(error),
        }
    }
}

/// Unwraps a field that presence validation has already checked.
pub fn required<T>(value: Option<T>, field: &str) -> Result<T, ApiError> {
    value.ok_or_else(|| ApiError::Validation(format!("Missing required fields: {}", field)))
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors
            .field_errors()
            .keys()
            .map(|field| field.to_string())
            .collect();
        fields.sort();

        ApiError::Validation(format!("Missing required fields: {}", fields.join(", ")))
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        self.classify().0
    }

    fn error_response(&self) -> HttpResponse {
        let (status, code, message) = self.classify();

        if status.is_server_error() {
            log::error!("❌ Request failed: {}", self);
        }

        HttpResponse::build(status).json(serde_json::json!({
            "error": code,
            "message": message
        }))
    }
}

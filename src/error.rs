use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use sea_orm::DbErr;
use serde::Serialize;
use validator::{ValidationError, ValidationErrors};

/// Every failure a request can end with.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Missing or malformed client input.
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    /// Field-level constraint violations, reported together.
    #[error("Validation failed")]
    Validation(ValidationErrors),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::Validation(errors)
    }
}

/// One entry of the `violations` list in a 422 response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    pub property_path: String,
    pub code: String,
    pub message: String,
}

/// Flatten validator output into a stable, field-sorted list.
pub fn violations(errors: &ValidationErrors) -> Vec<Violation> {
    let mut out: Vec<Violation> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            let field = field.to_string();
            errs.iter().map(move |e| Violation {
                property_path: field.clone(),
                code: e.code.to_string(),
                message: e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| default_message(&e.code)),
            })
        })
        .collect();
    out.sort_by(|a, b| {
        a.property_path
            .cmp(&b.property_path)
            .then_with(|| a.code.cmp(&b.code))
    });
    out
}

fn default_message(code: &str) -> String {
    match code {
        "required" => "This value should not be blank.".to_string(),
        "length" => "This value has an invalid length.".to_string(),
        "range" => "This value is out of range.".to_string(),
        "regex" => "This value is not valid.".to_string(),
        "unique" => "This value is already used.".to_string(),
        other => format!("This value is not valid ({other})."),
    }
}

/// Violation for a value that collides with an existing row.
pub fn unique_violation() -> ValidationError {
    ValidationError::new("unique").with_message("This value is already used.".into())
}

/// Take a field that validation has already marked as required.
pub fn required<T>(value: Option<T>, field: &'static str) -> Result<T, ApiError> {
    value.ok_or_else(|| {
        let mut errors = ValidationErrors::new();
        errors.add(field, ValidationError::new("required"));
        ApiError::Validation(errors)
    })
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) | ApiError::Database(DbErr::RecordNotFound(_)) => {
                StatusCode::NOT_FOUND
            }
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Database(_) | ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        match self {
            ApiError::Validation(errors) => builder.json(serde_json::json!({
                "error": self.to_string(),
                "violations": violations(errors),
            })),
            ApiError::Database(DbErr::RecordNotFound(msg)) => builder.json(serde_json::json!({
                "error": msg,
            })),
            _ => builder.json(serde_json::json!({
                "error": self.to_string(),
            })),
        }
    }
}

/// Errors from a `validate()` call, or an empty set to add to.
pub fn validation_errors(result: Result<(), ValidationErrors>) -> ValidationErrors {
    result.err().unwrap_or_else(ValidationErrors::new)
}

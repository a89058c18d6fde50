use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, BindError>;

#[derive(Debug, Error)]
pub enum BindError {
    /// The lookup for a bound field matched no row.
    #[error("No {model} found where {column} = {value}")]
    ModelNotFound {
        model: String,
        column: String,
        value: String,
    },

    #[error("Unknown column '{column}' on model {model}")]
    UnknownColumn { model: String, column: String },

    #[error("Field '{field}' cannot hold a value of type {expected}")]
    TypeMismatch { field: String, expected: String },

    #[error("Unknown bindable field: {field}")]
    UnknownField { field: String },

    #[error("Missing route parameters: {0}")]
    MissingRouteParameters(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl BindError {
    pub fn not_found(
        model: impl Into<String>,
        column: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::ModelNotFound {
            model: model.into(),
            column: column.into(),
            value: value.into(),
        }
    }

    /// True for the "no such row" case, which hosts usually answer with a 404.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ModelNotFound { .. })
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            BindError::ModelNotFound { .. } => StatusCode::NOT_FOUND,
            BindError::MissingRouteParameters(_) => StatusCode::BAD_REQUEST,
            BindError::UnknownColumn { .. }
            | BindError::TypeMismatch { .. }
            | BindError::UnknownField { .. }
            | BindError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(feature = "sea-orm-db")]
impl From<sea_orm::DbErr> for BindError {
    fn from(err: sea_orm::DbErr) -> Self {
        BindError::Database(err.to_string())
    }
}

impl IntoResponse for BindError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        (
            status,
            Json(json!({
                "statusCode": status.as_u16(),
                "message": self.to_string(),
            })),
        )
            .into_response()
    }
}

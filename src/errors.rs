use axum::http::StatusCode;
use thiserror::Error;

/// Failures raised while loading and reshaping the source tables.
///
/// All of these are fatal during startup; the server never binds if one occurs.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to fetch {origin}: {reason}")]
    Fetch { origin: String, reason: String },
    #[error("expected exactly one row for {location}, found {matches}")]
    AmbiguousLocation { location: String, matches: usize },
    #[error("{table} table has no column for date {label}")]
    MissingDate { table: String, label: String },
}

impl DataError {
    pub fn fetch(origin: impl Into<String>, reason: impl ToString) -> Self {
        Self::Fetch {
            origin: origin.into(),
            reason: reason.to_string(),
        }
    }
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}

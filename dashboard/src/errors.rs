// dashboard/src/errors.rs

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use orka::OrkaError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Validation Error: {0}")]
  Validation(String),

  #[error("Upload Error: {0}")]
  Upload(String),

  /// Reserved for an authentication layer; nothing raises it yet.
  #[error("Authentication Failed: {0}")]
  Auth(String),

  #[error("Resource Not Found: {0}")]
  NotFound(String),

  #[error("Timed Out: {0}")]
  Timeout(String),

  #[error("Database Error: {0}")]
  Sqlx(#[from] sqlx::Error),

  #[error("I/O Error: {0}")]
  Io(#[from] std::io::Error),

  #[error("Template Error: {0}")]
  Template(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Orka Workflow Error: {source}")]
  Workflow {
    #[from]
    source: OrkaError,
  },

  #[error("Internal Server Error: {0}")]
  Internal(String),
}

impl AppError {
  /// Stable machine-readable category, rendered as `kind` in error bodies.
  pub fn kind(&self) -> &'static str {
    match self {
      AppError::Validation(_) => "validation",
      AppError::Upload(_) => "upload",
      AppError::Auth(_) => "auth",
      AppError::NotFound(_) => "not_found",
      AppError::Timeout(_) => "timeout",
      AppError::Sqlx(_) | AppError::Io(_) => "storage",
      AppError::Template(_) => "template",
      AppError::Config(_) => "config",
      AppError::Workflow { .. } => "workflow",
      AppError::Internal(_) => "internal",
    }
  }
}

impl From<minijinja::Error> for AppError {
  fn from(err: minijinja::Error) -> Self {
    AppError::Template(err.to_string())
  }
}

impl From<sqlx::migrate::MigrateError> for AppError {
  fn from(err: sqlx::migrate::MigrateError) -> Self {
    AppError::Sqlx(sqlx::Error::Migrate(Box::new(err)))
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Validation(_) | AppError::Upload(_) => StatusCode::BAD_REQUEST,
      AppError::Auth(_) => StatusCode::UNAUTHORIZED,
      AppError::NotFound(_) => StatusCode::NOT_FOUND,
      AppError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
      _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    tracing::error!(application_error = %self, kind = self.kind(), "Responding with error");
    let message = match self {
      AppError::Validation(m)
      | AppError::Upload(m)
      | AppError::Auth(m)
      | AppError::NotFound(m)
      | AppError::Timeout(m) => m.clone(),
      AppError::Sqlx(_) | AppError::Io(_) => "Database error".to_string(),
      AppError::Template(_) => "Failed to render page".to_string(),
      AppError::Config(_) => "Configuration issue".to_string(),
      AppError::Workflow { source } => {
        tracing::error!(orka_error_source = ?source, "Workflow error details");
        "Workflow processing error".to_string()
      }
      AppError::Internal(_) => "Unexpected server error".to_string(),
    };
    HttpResponse::build(self.status_code()).json(json!({ "error": message, "kind": self.kind() }))
  }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
  use super::*;
  use actix_web::body::to_bytes;

  #[actix_web::test]
  async fn not_found_and_timeout_render_distinct_kinds() {
    let not_found = AppError::NotFound("Product 5 not found".into());
    let timeout = AppError::Timeout("lookup of product 5".into());
    assert_eq!(not_found.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(timeout.status_code(), StatusCode::GATEWAY_TIMEOUT);

    let body = to_bytes(not_found.error_response().into_body()).await.unwrap();
    let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(value["kind"], "not_found");
    assert_eq!(value["error"], "Product 5 not found");
  }

  #[actix_web::test]
  async fn storage_errors_hide_driver_detail() {
    let err = AppError::Sqlx(sqlx::Error::RowNotFound);
    assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = to_bytes(err.error_response().into_body()).await.unwrap();
    let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(value["error"], "Database error");
    assert_eq!(value["kind"], "storage");
  }

  #[test]
  fn orka_errors_convert_into_workflow() {
    let err: AppError = OrkaError::Internal("boom".into()).into();
    assert_eq!(err.kind(), "workflow");
  }
}

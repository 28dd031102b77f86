//! Handler error type, mapped onto the service's HTTP status contract.
//!
//! Every failure a handler can produce is one of these variants; the
//! `IntoResponse` impl is the single place status codes are assigned, so the
//! route table in `lib.rs` stays free of status logic. Bodies are always
//! `{"error": "..."}`.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
  /// No entry with this id. 404.
  #[error("entry {0} not found")]
  EntryNotFound(String),

  /// The addressed `(from, kind, to)` edge does not exist. 404.
  #[error("relation not found")]
  RelationNotFound,

  /// A link request whose source or target entry is missing. 404.
  #[error("entry {0} or target not found")]
  LinkEndpointMissing(String),

  /// A PATCH body with every field null. 400.
  #[error("no valid fields to update")]
  EmptyPatch,

  /// The backing store failed. 500; the message is passed through.
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  pub fn store<E: std::error::Error + Send + Sync + 'static>(e: E) -> Self {
    Self::Store(Box::new(e))
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = match &self {
      ApiError::EntryNotFound(_)
      | ApiError::RelationNotFound
      | ApiError::LinkEndpointMissing(_) => StatusCode::NOT_FOUND,
      ApiError::EmptyPatch => StatusCode::BAD_REQUEST,
      ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let message = match &self {
      ApiError::Store(e) => e.to_string(),
      other => other.to_string(),
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}

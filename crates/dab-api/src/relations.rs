//! Handlers for `/account-entries/:id/relations`.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET` | `/account-entries/:id/relations` | `{"outgoing": [...], "incoming": [...]}` |
//! | `POST` | `/account-entries/:id/relations` | Body: [`NewRelation`]; 201, 404 if either end is missing |
//! | `DELETE` | `/account-entries/:from/relations/:kind/:to` | 204, 404 if no such relation |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use dab_core::{
  entry::{NewRelation, RelKind, RelationList},
  graph::EntryGraph,
};

use crate::error::ApiError;

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /account-entries/:id/relations`
pub async fn list<S>(
  State(graph): State<Arc<S>>,
  Path(id): Path<String>,
) -> Result<Json<RelationList>, ApiError>
where
  S: EntryGraph,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let relations = graph.relations(&id).await.map_err(ApiError::store)?;
  Ok(Json(relations))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /account-entries/:id/relations` — body: `{"to_id": "...", "kind": "RELATES_TO"}`.
///
/// Upserts on the `(from, kind, to)` composite identity.
pub async fn create<S>(
  State(graph): State<Arc<S>>,
  Path(id): Path<String>,
  Json(body): Json<NewRelation>,
) -> Result<impl IntoResponse, ApiError>
where
  S: EntryGraph,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let relation = graph
    .link(&id, body)
    .await
    .map_err(ApiError::store)?
    .ok_or(ApiError::LinkEndpointMissing(id))?;
  Ok((StatusCode::CREATED, Json(relation)))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /account-entries/:from/relations/:kind/:to` — 204 on success.
pub async fn delete_one<S>(
  State(graph): State<Arc<S>>,
  Path((from_id, kind, to_id)): Path<(String, RelKind, String)>,
) -> Result<StatusCode, ApiError>
where
  S: EntryGraph,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let removed = graph
    .unlink(&from_id, kind, &to_id)
    .await
    .map_err(ApiError::store)?;
  if !removed {
    return Err(ApiError::RelationNotFound);
  }
  Ok(StatusCode::NO_CONTENT)
}

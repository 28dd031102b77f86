//! Handlers for `/account-entries` entry CRUD.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET` | `/account-entries` | `?limit=` (default 50, clamped to 1..=200), `?offset=` |
//! | `GET` | `/account-entries/count` | `{"total": n}` |
//! | `GET` | `/account-entries/:id` | 404 if not found |
//! | `POST` | `/account-entries` | Body: [`NewEntry`]; 201 + created entry |
//! | `PATCH` | `/account-entries/:id` | 400 on an all-null body, 404 if not found |
//! | `DELETE` | `/account-entries/:id` | 204, 404 if not found |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use dab_core::{
  entry::{AccountEntry, EntryPatch, NewEntry},
  graph::EntryGraph,
};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub limit:  Option<usize>,
  pub offset: Option<usize>,
}

/// `GET /account-entries[?limit=&offset=]`
pub async fn list<S>(
  State(graph): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<AccountEntry>>, ApiError>
where
  S: EntryGraph,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let limit = params.limit.unwrap_or(50).clamp(1, 200);
  let offset = params.offset.unwrap_or(0);
  let entries = graph
    .list_entries(limit, offset)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(entries))
}

// ─── Count ────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct CountBody {
  pub total: u64,
}

/// `GET /account-entries/count`
pub async fn count<S>(
  State(graph): State<Arc<S>>,
) -> Result<Json<CountBody>, ApiError>
where
  S: EntryGraph,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let total = graph.count_entries().await.map_err(ApiError::store)?;
  Ok(Json(CountBody { total }))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /account-entries/:id`
pub async fn get_one<S>(
  State(graph): State<Arc<S>>,
  Path(id): Path<String>,
) -> Result<Json<AccountEntry>, ApiError>
where
  S: EntryGraph,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let entry = graph
    .get_entry(&id)
    .await
    .map_err(ApiError::store)?
    .ok_or(ApiError::EntryNotFound(id))?;
  Ok(Json(entry))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /account-entries` — body: `{"title": "...", "desc": ..., "tags": [...]}`
pub async fn create<S>(
  State(graph): State<Arc<S>>,
  Json(body): Json<NewEntry>,
) -> Result<impl IntoResponse, ApiError>
where
  S: EntryGraph,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let entry = graph.create_entry(body).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(entry)))
}

// ─── Patch ────────────────────────────────────────────────────────────────────

/// `PATCH /account-entries/:id` — returns the updated entry.
pub async fn patch_one<S>(
  State(graph): State<Arc<S>>,
  Path(id): Path<String>,
  Json(patch): Json<EntryPatch>,
) -> Result<Json<AccountEntry>, ApiError>
where
  S: EntryGraph,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  if patch.is_empty() {
    return Err(ApiError::EmptyPatch);
  }
  let entry = graph
    .patch_entry(&id, patch)
    .await
    .map_err(ApiError::store)?
    .ok_or(ApiError::EntryNotFound(id))?;
  Ok(Json(entry))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /account-entries/:id` — 204 on success, cascades to relations.
pub async fn delete_one<S>(
  State(graph): State<Arc<S>>,
  Path(id): Path<String>,
) -> Result<StatusCode, ApiError>
where
  S: EntryGraph,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let deleted = graph.delete_entry(&id).await.map_err(ApiError::store)?;
  if !deleted {
    return Err(ApiError::EntryNotFound(id));
  }
  Ok(StatusCode::NO_CONTENT)
}

//! Handlers for the exploration-tree endpoints.
//!
//! The traversal itself is the store's job (visited-set DFS); these handlers
//! only pick the direction and map a missing start entry to 404.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
};
use dab_core::{
  entry::{Direction, EntryTree},
  graph::EntryGraph,
};

use crate::error::ApiError;

/// `GET /account-entries/:id/explore-start-leaf`
pub async fn forward<S>(
  State(graph): State<Arc<S>>,
  Path(id): Path<String>,
) -> Result<Json<EntryTree>, ApiError>
where
  S: EntryGraph,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  tree(graph, id, Direction::Forward).await
}

/// `GET /account-entries/:id/explore-start-leaf-reverse`
pub async fn reverse<S>(
  State(graph): State<Arc<S>>,
  Path(id): Path<String>,
) -> Result<Json<EntryTree>, ApiError>
where
  S: EntryGraph,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  tree(graph, id, Direction::Reverse).await
}

async fn tree<S>(
  graph: Arc<S>,
  id: String,
  direction: Direction,
) -> Result<Json<EntryTree>, ApiError>
where
  S: EntryGraph,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let tree = graph
    .explore(&id, direction)
    .await
    .map_err(ApiError::store)?
    .ok_or(ApiError::EntryNotFound(id))?;
  Ok(Json(tree))
}

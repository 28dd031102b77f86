//! JSON REST API for DevAccountBook.
//!
//! Exposes an axum [`Router`] backed by any [`dab_core::graph::EntryGraph`].
//! Auth, TLS, and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/v1", dab_api::api_router(graph.clone()))
//! ```

pub mod entries;
pub mod error;
pub mod explore;
pub mod relations;

use std::sync::Arc;

use axum::{
  Router,
  routing::{delete, get},
};
use dab_core::graph::EntryGraph;

pub use error::ApiError;

/// Build a fully-materialised API router for `graph`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(graph: Arc<S>) -> Router<()>
where
  S: EntryGraph + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    // Entries
    .route(
      "/account-entries",
      get(entries::list::<S>).post(entries::create::<S>),
    )
    .route("/account-entries/count", get(entries::count::<S>))
    .route(
      "/account-entries/{id}",
      get(entries::get_one::<S>)
        .patch(entries::patch_one::<S>)
        .delete(entries::delete_one::<S>),
    )
    // Relations
    .route(
      "/account-entries/{id}/relations",
      get(relations::list::<S>).post(relations::create::<S>),
    )
    .route(
      "/account-entries/{from_id}/relations/{kind}/{to_id}",
      delete(relations::delete_one::<S>),
    )
    // Exploration trees
    .route(
      "/account-entries/{id}/explore-start-leaf",
      get(explore::forward::<S>),
    )
    .route(
      "/account-entries/{id}/explore-start-leaf-reverse",
      get(explore::reverse::<S>),
    )
    .with_state(graph)
}

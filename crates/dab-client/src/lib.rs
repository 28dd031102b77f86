//! Async HTTP client for the DevAccountBook JSON API.
//!
//! Implements [`dab_core::graph::EntryGraph`] over the REST surface, so the
//! view-model helpers in `dab-core` run unchanged against a remote service.
//! Point-read 404s (`get_entry`, `explore`) come back as `Ok(None)` and
//! delete 404s as `Ok(false)`; every other non-2xx answer is a
//! [`ClientError::Status`] carrying the numeric code. No retries.

pub mod error;

use std::time::Duration;

use dab_core::{
  entry::{
    AccountEntry, Direction, EntryPatch, EntryTree, NewEntry, NewRelation,
    RelKind, Relation, RelationList,
  },
  graph::EntryGraph,
};
use reqwest::Client;
use serde::Deserialize;

pub use error::{ClientError, Result};

/// Connection settings for the DevAccountBook API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
}

/// Async HTTP client for the `/v1` JSON REST API.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

#[derive(Debug, Deserialize)]
struct CountBody {
  total: u64,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!("{}/v1{}", self.config.base_url.trim_end_matches('/'), path)
  }

  /// Map a non-2xx answer to [`ClientError::Status`].
  fn check(
    method: &'static str,
    path: &str,
    resp: reqwest::Response,
  ) -> Result<reqwest::Response> {
    let status = resp.status();
    if status.is_success() {
      Ok(resp)
    } else {
      Err(ClientError::Status {
        method,
        path: path.to_string(),
        status: status.as_u16(),
      })
    }
  }

  // ── Strict endpoint calls ─────────────────────────────────────────────
  //
  // These surface every non-2xx answer, 404 included. The `EntryGraph`
  // impl below folds the 404s into `None`/`false`.

  /// `GET /v1/account-entries/{id}`
  pub async fn fetch_entry(&self, id: &str) -> Result<AccountEntry> {
    let path = format!("/account-entries/{id}");
    let resp = self.client.get(self.url(&path)).send().await?;
    Ok(Self::check("GET", &path, resp)?.json().await?)
  }

  /// `GET /v1/account-entries/{id}/explore-start-leaf[-reverse]`
  pub async fn fetch_tree(
    &self,
    id: &str,
    direction: Direction,
  ) -> Result<EntryTree> {
    let suffix = match direction {
      Direction::Forward => "explore-start-leaf",
      Direction::Reverse => "explore-start-leaf-reverse",
    };
    let path = format!("/account-entries/{id}/{suffix}");
    let resp = self.client.get(self.url(&path)).send().await?;
    Ok(Self::check("GET", &path, resp)?.json().await?)
  }

  /// `PATCH /v1/account-entries/{id}`
  pub async fn update_entry(
    &self,
    id: &str,
    patch: &EntryPatch,
  ) -> Result<AccountEntry> {
    let path = format!("/account-entries/{id}");
    let resp = self.client.patch(self.url(&path)).json(patch).send().await?;
    Ok(Self::check("PATCH", &path, resp)?.json().await?)
  }

  /// `DELETE /v1/account-entries/{id}` — tolerates an empty body.
  pub async fn remove_entry(&self, id: &str) -> Result<()> {
    let path = format!("/account-entries/{id}");
    let resp = self.client.delete(self.url(&path)).send().await?;
    Self::check("DELETE", &path, resp)?;
    Ok(())
  }

  /// `POST /v1/account-entries/{from}/relations`
  pub async fn add_relation(
    &self,
    from_id: &str,
    input: &NewRelation,
  ) -> Result<Relation> {
    let path = format!("/account-entries/{from_id}/relations");
    let resp = self.client.post(self.url(&path)).json(input).send().await?;
    Ok(Self::check("POST", &path, resp)?.json().await?)
  }

  /// `DELETE /v1/account-entries/{from}/relations/{kind}/{to}` — tolerates
  /// an empty body.
  pub async fn remove_relation(
    &self,
    from_id: &str,
    kind: RelKind,
    to_id: &str,
  ) -> Result<()> {
    let path = format!("/account-entries/{from_id}/relations/{kind}/{to_id}");
    let resp = self.client.delete(self.url(&path)).send().await?;
    Self::check("DELETE", &path, resp)?;
    Ok(())
  }
}

// ─── EntryGraph over HTTP ────────────────────────────────────────────────────

impl EntryGraph for ApiClient {
  type Error = ClientError;

  async fn list_entries(
    &self,
    limit: usize,
    offset: usize,
  ) -> Result<Vec<AccountEntry>> {
    let path = "/account-entries";
    let resp = self
      .client
      .get(self.url(path))
      .query(&[("limit", limit.to_string()), ("offset", offset.to_string())])
      .send()
      .await?;
    Ok(Self::check("GET", path, resp)?.json().await?)
  }

  async fn count_entries(&self) -> Result<u64> {
    let path = "/account-entries/count";
    let resp = self.client.get(self.url(path)).send().await?;
    let body: CountBody = Self::check("GET", path, resp)?.json().await?;
    Ok(body.total)
  }

  async fn get_entry(&self, id: &str) -> Result<Option<AccountEntry>> {
    match self.fetch_entry(id).await {
      Ok(entry) => Ok(Some(entry)),
      Err(e) if e.is_not_found() => Ok(None),
      Err(e) => Err(e),
    }
  }

  async fn create_entry(&self, input: NewEntry) -> Result<AccountEntry> {
    let path = "/account-entries";
    let resp = self.client.post(self.url(path)).json(&input).send().await?;
    Ok(Self::check("POST", path, resp)?.json().await?)
  }

  async fn patch_entry(
    &self,
    id: &str,
    patch: EntryPatch,
  ) -> Result<Option<AccountEntry>> {
    match self.update_entry(id, &patch).await {
      Ok(entry) => Ok(Some(entry)),
      Err(e) if e.is_not_found() => Ok(None),
      Err(e) => Err(e),
    }
  }

  async fn delete_entry(&self, id: &str) -> Result<bool> {
    match self.remove_entry(id).await {
      Ok(()) => Ok(true),
      Err(e) if e.is_not_found() => Ok(false),
      Err(e) => Err(e),
    }
  }

  async fn relations(&self, id: &str) -> Result<RelationList> {
    let path = format!("/account-entries/{id}/relations");
    let resp = self.client.get(self.url(&path)).send().await?;
    Ok(Self::check("GET", &path, resp)?.json().await?)
  }

  async fn link(
    &self,
    from_id: &str,
    input: NewRelation,
  ) -> Result<Option<Relation>> {
    match self.add_relation(from_id, &input).await {
      Ok(relation) => Ok(Some(relation)),
      Err(e) if e.is_not_found() => Ok(None),
      Err(e) => Err(e),
    }
  }

  async fn unlink(
    &self,
    from_id: &str,
    kind: RelKind,
    to_id: &str,
  ) -> Result<bool> {
    match self.remove_relation(from_id, kind, to_id).await {
      Ok(()) => Ok(true),
      Err(e) if e.is_not_found() => Ok(false),
      Err(e) => Err(e),
    }
  }

  async fn explore(
    &self,
    start_id: &str,
    direction: Direction,
  ) -> Result<Option<EntryTree>> {
    match self.fetch_tree(start_id, direction).await {
      Ok(tree) => Ok(Some(tree)),
      Err(e) if e.is_not_found() => Ok(None),
      Err(e) => Err(e),
    }
  }
}

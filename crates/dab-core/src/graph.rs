//! The `EntryGraph` trait — the seam between view-model logic and whatever
//! actually holds the graph.
//!
//! Implemented by `dab-store-mem` (in process) and `dab-client` (over HTTP).
//! The projection and exploration helpers in this crate are generic over it,
//! so they can be exercised against a fake in tests.
//!
//! All methods return `Send` futures so the trait can be used in
//! multi-threaded async runtimes (e.g. tokio with `axum`).

use std::future::Future;

use crate::entry::{
  AccountEntry, Direction, EntryPatch, EntryTree, NewEntry, NewRelation,
  Relation, RelationList,
};

pub trait EntryGraph: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Entries ───────────────────────────────────────────────────────────

  /// List entries in creation order, `offset` entries in, at most `limit`.
  fn list_entries(
    &self,
    limit: usize,
    offset: usize,
  ) -> impl Future<Output = Result<Vec<AccountEntry>, Self::Error>> + Send + '_;

  /// Total number of entries in the graph.
  fn count_entries(
    &self,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  /// Fetch one entry by id. Returns `None` if not found.
  fn get_entry<'a>(
    &'a self,
    id: &'a str,
  ) -> impl Future<Output = Result<Option<AccountEntry>, Self::Error>> + Send + 'a;

  /// Create an entry; the store assigns the id.
  fn create_entry(
    &self,
    input: NewEntry,
  ) -> impl Future<Output = Result<AccountEntry, Self::Error>> + Send + '_;

  /// Apply the non-`None` fields of `patch` to an entry and return the
  /// updated entry, or `None` if the entry does not exist.
  fn patch_entry<'a>(
    &'a self,
    id: &'a str,
    patch: EntryPatch,
  ) -> impl Future<Output = Result<Option<AccountEntry>, Self::Error>> + Send + 'a;

  /// Delete an entry and detach all of its relations, both directions.
  /// Returns `false` if the entry did not exist.
  fn delete_entry<'a>(
    &'a self,
    id: &'a str,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  // ── Relations ─────────────────────────────────────────────────────────

  /// Both edge lists of one entry.
  fn relations<'a>(
    &'a self,
    id: &'a str,
  ) -> impl Future<Output = Result<RelationList, Self::Error>> + Send + 'a;

  /// Create (or upsert, on the `(from, kind, to)` key) a relation.
  /// Returns `None` when either endpoint does not exist.
  fn link<'a>(
    &'a self,
    from_id: &'a str,
    input: NewRelation,
  ) -> impl Future<Output = Result<Option<Relation>, Self::Error>> + Send + 'a;

  /// Delete one relation. Returns `false` if no such relation existed.
  fn unlink<'a>(
    &'a self,
    from_id: &'a str,
    kind: crate::entry::RelKind,
    to_id: &'a str,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  // ── Exploration ───────────────────────────────────────────────────────

  /// The server-computed traversal rooted at `start_id`, or `None` if the
  /// start entry does not exist. Termination on cyclic graphs is part of
  /// the contract, not the caller's problem.
  fn explore<'a>(
    &'a self,
    start_id: &'a str,
    direction: Direction,
  ) -> impl Future<Output = Result<Option<EntryTree>, Self::Error>> + Send + 'a;
}

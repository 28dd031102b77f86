//! In-memory [`EntryGraph`] backend.
//!
//! Holds the whole graph behind one `tokio::sync::RwLock`: entries in
//! insertion order, relations as an adjacency list keyed by the composite
//! `(from, kind, to)`. This is the reference store the HTTP service serves
//! in tests and local development; nothing is persisted.

use std::{collections::HashSet, sync::Arc};

use dab_core::{
  entry::{
    AccountEntry, Direction, EntryPatch, EntryTree, NewEntry, NewRelation,
    RelKind, Relation, RelationList,
  },
  graph::EntryGraph,
};
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

#[cfg(test)]
mod tests;

// ─── Error ───────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum StoreError {
  #[error("patch carries no fields to update")]
  EmptyPatch,
}

// ─── Store ───────────────────────────────────────────────────────────────────

#[derive(Default)]
struct Inner {
  /// Insertion order doubles as listing order.
  entries:   Vec<AccountEntry>,
  relations: Vec<Relation>,
}

impl Inner {
  fn entry(&self, id: &str) -> Option<&AccountEntry> {
    self.entries.iter().find(|e| e.id == id)
  }
}

/// In-memory entry graph. Cheap to clone — all clones share one lock.
#[derive(Clone, Default)]
pub struct MemGraph {
  inner: Arc<RwLock<Inner>>,
}

impl MemGraph {
  pub fn new() -> Self { Self::default() }

  /// Visited-set-guarded depth-first traversal over the adjacency list.
  ///
  /// The visited set is shared across the whole traversal, so a relation
  /// cycle terminates and a node reachable along two paths appears only
  /// under the branch that reaches it first. Children follow relation
  /// insertion order.
  fn traverse(
    inner: &Inner,
    id: &str,
    direction: Direction,
    visited: &mut HashSet<String>,
  ) -> Option<EntryTree> {
    let entry = inner.entry(id)?;
    visited.insert(id.to_string());

    let mut children = Vec::new();
    for relation in &inner.relations {
      let child_id = match direction {
        Direction::Forward if relation.from_id == id => &relation.to_id,
        Direction::Reverse if relation.to_id == id => &relation.from_id,
        _ => continue,
      };
      if visited.contains(child_id) {
        continue;
      }
      if let Some(child) = Self::traverse(inner, child_id, direction, visited) {
        children.push(child);
      }
    }

    Some(EntryTree {
      id:    entry.id.clone(),
      title: entry.title.clone(),
      desc:  entry.desc.clone(),
      tags:  entry.tags.clone(),
      children,
    })
  }
}

impl EntryGraph for MemGraph {
  type Error = StoreError;

  // ── Entries ───────────────────────────────────────────────────────────

  async fn list_entries(
    &self,
    limit: usize,
    offset: usize,
  ) -> Result<Vec<AccountEntry>, StoreError> {
    let inner = self.inner.read().await;
    Ok(inner.entries.iter().skip(offset).take(limit).cloned().collect())
  }

  async fn count_entries(&self) -> Result<u64, StoreError> {
    Ok(self.inner.read().await.entries.len() as u64)
  }

  async fn get_entry(&self, id: &str) -> Result<Option<AccountEntry>, StoreError> {
    Ok(self.inner.read().await.entry(id).cloned())
  }

  async fn create_entry(
    &self,
    input: NewEntry,
  ) -> Result<AccountEntry, StoreError> {
    let entry = AccountEntry {
      id:    Uuid::new_v4().to_string(),
      title: input.title,
      desc:  input.desc,
      tags:  input.tags,
    };
    self.inner.write().await.entries.push(entry.clone());
    Ok(entry)
  }

  async fn patch_entry(
    &self,
    id: &str,
    patch: EntryPatch,
  ) -> Result<Option<AccountEntry>, StoreError> {
    if patch.is_empty() {
      return Err(StoreError::EmptyPatch);
    }
    let mut inner = self.inner.write().await;
    let Some(entry) = inner.entries.iter_mut().find(|e| e.id == id) else {
      return Ok(None);
    };
    if let Some(title) = patch.title {
      entry.title = title;
    }
    if let Some(desc) = patch.desc {
      entry.desc = Some(desc);
    }
    if let Some(tags) = patch.tags {
      entry.tags = tags;
    }
    Ok(Some(entry.clone()))
  }

  async fn delete_entry(&self, id: &str) -> Result<bool, StoreError> {
    let mut inner = self.inner.write().await;
    let before = inner.entries.len();
    inner.entries.retain(|e| e.id != id);
    if inner.entries.len() == before {
      return Ok(false);
    }
    // Detach both directions before removing the entry itself.
    inner.relations.retain(|r| r.from_id != id && r.to_id != id);
    Ok(true)
  }

  // ── Relations ─────────────────────────────────────────────────────────

  async fn relations(&self, id: &str) -> Result<RelationList, StoreError> {
    let inner = self.inner.read().await;
    Ok(RelationList {
      outgoing: inner
        .relations
        .iter()
        .filter(|r| r.from_id == id)
        .cloned()
        .collect(),
      incoming: inner
        .relations
        .iter()
        .filter(|r| r.to_id == id)
        .cloned()
        .collect(),
    })
  }

  async fn link(
    &self,
    from_id: &str,
    input: NewRelation,
  ) -> Result<Option<Relation>, StoreError> {
    let mut inner = self.inner.write().await;
    if inner.entry(from_id).is_none() || inner.entry(&input.to_id).is_none() {
      return Ok(None);
    }

    let relation = Relation {
      from_id: from_id.to_string(),
      to_id:   input.to_id,
      kind:    input.kind,
      props:   input.props,
    };

    // Upsert on the composite identity: a re-link replaces the props of the
    // existing edge instead of duplicating it.
    if let Some(existing) = inner.relations.iter_mut().find(|r| {
      r.from_id == relation.from_id
        && r.to_id == relation.to_id
        && r.kind == relation.kind
    }) {
      existing.props = relation.props.clone();
    } else {
      inner.relations.push(relation.clone());
    }
    Ok(Some(relation))
  }

  async fn unlink(
    &self,
    from_id: &str,
    kind: RelKind,
    to_id: &str,
  ) -> Result<bool, StoreError> {
    let mut inner = self.inner.write().await;
    let before = inner.relations.len();
    inner
      .relations
      .retain(|r| !(r.from_id == from_id && r.to_id == to_id && r.kind == kind));
    Ok(inner.relations.len() != before)
  }

  // ── Exploration ───────────────────────────────────────────────────────

  async fn explore(
    &self,
    start_id: &str,
    direction: Direction,
  ) -> Result<Option<EntryTree>, StoreError> {
    let inner = self.inner.read().await;
    let mut visited = HashSet::new();
    Ok(Self::traverse(&inner, start_id, direction, &mut visited))
  }
}

//! In-memory [`EntryGraph`] fake for exercising the view-model logic.
//! Test support only; the real in-process store lives in `dab-store-mem`.

use std::{
  collections::HashSet,
  convert::Infallible,
  sync::{Mutex, MutexGuard},
};

use crate::{
  entry::{
    AccountEntry, Direction, EntryPatch, EntryTree, NewEntry, NewRelation,
    RelKind, Relation, RelationList,
  },
  graph::EntryGraph,
};

#[derive(Default)]
struct Inner {
  entries:   Vec<AccountEntry>,
  relations: Vec<Relation>,
  next_id:   usize,
}

/// Insertion-ordered in-memory graph; ids are `"e0"`, `"e1"`, ...
#[derive(Default)]
pub struct TestGraph {
  inner: Mutex<Inner>,
}

impl TestGraph {
  pub fn new() -> Self { Self::default() }

  fn lock(&self) -> MutexGuard<'_, Inner> {
    self.inner.lock().expect("testgraph lock poisoned")
  }

  pub async fn seed(&self, input: NewEntry) -> String {
    let mut inner = self.lock();
    let id = format!("e{}", inner.next_id);
    inner.next_id += 1;
    inner.entries.push(AccountEntry {
      id:    id.clone(),
      title: input.title,
      desc:  input.desc,
      tags:  input.tags,
    });
    id
  }

  pub async fn seed_link(&self, from: &str, to: &str, kind: RelKind) {
    self.lock().relations.push(Relation {
      from_id: from.into(),
      to_id:   to.into(),
      kind,
      props:   Default::default(),
    });
  }

  /// Drop an entry but leave its edges dangling — the orphan scenario a
  /// well-behaved store never produces.
  pub async fn remove_entry_keep_edges(&self, id: &str) {
    self.lock().entries.retain(|e| e.id != id);
  }

  fn build_tree(
    inner: &Inner,
    id: &str,
    direction: Direction,
    visited: &mut HashSet<String>,
  ) -> Option<EntryTree> {
    let entry = inner.entries.iter().find(|e| e.id == id)?;
    visited.insert(id.to_string());

    let mut children = Vec::new();
    for rel in &inner.relations {
      let child_id = match direction {
        Direction::Forward if rel.from_id == id => &rel.to_id,
        Direction::Reverse if rel.to_id == id => &rel.from_id,
        _ => continue,
      };
      if visited.contains(child_id) {
        continue;
      }
      if let Some(child) = Self::build_tree(inner, child_id, direction, visited)
      {
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

impl EntryGraph for TestGraph {
  type Error = Infallible;

  async fn list_entries(
    &self,
    limit: usize,
    offset: usize,
  ) -> Result<Vec<AccountEntry>, Infallible> {
    let inner = self.lock();
    Ok(inner.entries.iter().skip(offset).take(limit).cloned().collect())
  }

  async fn count_entries(&self) -> Result<u64, Infallible> {
    Ok(self.lock().entries.len() as u64)
  }

  async fn get_entry(&self, id: &str) -> Result<Option<AccountEntry>, Infallible> {
    Ok(self.lock().entries.iter().find(|e| e.id == id).cloned())
  }

  async fn create_entry(
    &self,
    input: NewEntry,
  ) -> Result<AccountEntry, Infallible> {
    let id = self.seed(input).await;
    Ok(self.lock().entries.iter().find(|e| e.id == id).cloned().unwrap())
  }

  async fn patch_entry(
    &self,
    id: &str,
    patch: EntryPatch,
  ) -> Result<Option<AccountEntry>, Infallible> {
    let mut inner = self.lock();
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

  async fn delete_entry(&self, id: &str) -> Result<bool, Infallible> {
    let mut inner = self.lock();
    let before = inner.entries.len();
    inner.entries.retain(|e| e.id != id);
    inner.relations.retain(|r| r.from_id != id && r.to_id != id);
    Ok(inner.entries.len() != before)
  }

  async fn relations(&self, id: &str) -> Result<RelationList, Infallible> {
    let inner = self.lock();
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
  ) -> Result<Option<Relation>, Infallible> {
    let mut inner = self.lock();
    let both = inner.entries.iter().any(|e| e.id == from_id)
      && inner.entries.iter().any(|e| e.id == input.to_id);
    if !both {
      return Ok(None);
    }
    let relation = Relation {
      from_id: from_id.into(),
      to_id:   input.to_id,
      kind:    input.kind,
      props:   input.props,
    };
    inner.relations.retain(|r| {
      !(r.from_id == relation.from_id
        && r.to_id == relation.to_id
        && r.kind == relation.kind)
    });
    inner.relations.push(relation.clone());
    Ok(Some(relation))
  }

  async fn unlink(
    &self,
    from_id: &str,
    kind: RelKind,
    to_id: &str,
  ) -> Result<bool, Infallible> {
    let mut inner = self.lock();
    let before = inner.relations.len();
    inner
      .relations
      .retain(|r| !(r.from_id == from_id && r.to_id == to_id && r.kind == kind));
    Ok(inner.relations.len() != before)
  }

  async fn explore(
    &self,
    start_id: &str,
    direction: Direction,
  ) -> Result<Option<EntryTree>, Infallible> {
    let inner = self.lock();
    let mut visited = HashSet::new();
    Ok(Self::build_tree(&inner, start_id, direction, &mut visited))
  }
}

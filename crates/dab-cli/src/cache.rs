//! Deterministic-keyed query cache.
//!
//! The single piece of shared mutable state in the UI. Every view reads
//! through it; every successful mutation invalidates it and lets the active
//! view refetch — invalidate-and-refetch is the only coordination
//! discipline, there is no local splicing of cached rows.

use dab_core::{entry::Direction, explore::FlatTree, sheet::SheetRow};

/// Cache key. Keys are scoped to the operation, not the request, so a stale
/// in-flight response can only ever land in the slot it was asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKey {
  SheetRows,
  Trees(Direction),
}

/// One slot per query key. `None` means stale or never loaded.
#[derive(Default)]
pub struct QueryCache {
  sheet:   Option<Vec<SheetRow>>,
  forward: Option<Vec<FlatTree>>,
  reverse: Option<Vec<FlatTree>>,
}

impl QueryCache {
  pub fn new() -> Self { Self::default() }

  pub fn sheet(&self) -> Option<&[SheetRow]> { self.sheet.as_deref() }

  pub fn trees(&self, direction: Direction) -> Option<&[FlatTree]> {
    match direction {
      Direction::Forward => self.forward.as_deref(),
      Direction::Reverse => self.reverse.as_deref(),
    }
  }

  pub fn store_sheet(&mut self, rows: Vec<SheetRow>) { self.sheet = Some(rows); }

  pub fn store_trees(&mut self, direction: Direction, trees: Vec<FlatTree>) {
    match direction {
      Direction::Forward => self.forward = Some(trees),
      Direction::Reverse => self.reverse = Some(trees),
    }
  }

  pub fn is_loaded(&self, key: QueryKey) -> bool {
    match key {
      QueryKey::SheetRows => self.sheet.is_some(),
      QueryKey::Trees(direction) => self.trees(direction).is_some(),
    }
  }

  pub fn invalidate(&mut self, key: QueryKey) {
    match key {
      QueryKey::SheetRows => self.sheet = None,
      QueryKey::Trees(Direction::Forward) => self.forward = None,
      QueryKey::Trees(Direction::Reverse) => self.reverse = None,
    }
  }

  /// Drop everything. Called after every successful mutation: the sheet and
  /// both tree views all derive from the same graph.
  pub fn invalidate_all(&mut self) {
    self.sheet = None;
    self.forward = None;
    self.reverse = None;
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn invalidate_is_per_key() {
    let mut cache = QueryCache::new();
    cache.store_sheet(Vec::new());
    cache.store_trees(Direction::Forward, Vec::new());
    cache.store_trees(Direction::Reverse, Vec::new());

    cache.invalidate(QueryKey::Trees(Direction::Forward));
    assert!(!cache.is_loaded(QueryKey::Trees(Direction::Forward)));
    assert!(cache.is_loaded(QueryKey::Trees(Direction::Reverse)));
    assert!(cache.is_loaded(QueryKey::SheetRows));
  }

  #[test]
  fn invalidate_all_clears_every_slot() {
    let mut cache = QueryCache::new();
    cache.store_sheet(Vec::new());
    cache.store_trees(Direction::Forward, Vec::new());

    cache.invalidate_all();
    assert!(!cache.is_loaded(QueryKey::SheetRows));
    assert!(!cache.is_loaded(QueryKey::Trees(Direction::Forward)));
    assert!(!cache.is_loaded(QueryKey::Trees(Direction::Reverse)));
  }
}

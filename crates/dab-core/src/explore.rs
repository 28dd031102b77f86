//! Exploration view models — per-root traversal trees and their flattened,
//! table-friendly form.

use std::collections::HashSet;

use crate::{
  entry::{Direction, EntryTree},
  graph::EntryGraph,
  sheet::PAGE_LIMIT,
};

// ─── Flattened tree ──────────────────────────────────────────────────────────

/// One descendant of a flattened tree, annotated with its depth below the
/// root (direct children are depth 0).
#[derive(Debug, Clone, PartialEq)]
pub struct FlatTreeRow {
  /// Synthetic key: `"{parent_id}:{id}:{depth}"`.
  pub key:   String,
  pub depth: usize,
  pub id:    String,
  pub title: String,
  pub desc:  Option<String>,
  pub tags:  Vec<String>,
}

/// A traversal tree with every descendant flattened into one row list.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatTree {
  pub key:      String,
  pub id:       String,
  pub title:    String,
  pub desc:     Option<String>,
  pub tags:     Vec<String>,
  pub children: Vec<FlatTreeRow>,
}

/// Flatten a traversal tree into a root plus one depth-annotated row per
/// descendant, depth-first, in child order.
///
/// Carries a visited-id guard: if the server ever hands back a tree in which
/// a relation cycle reappears (`a → b → a`), the revisit is dropped at the
/// point it would recur, so flattening terminates and no node occurs beyond
/// its first visit.
pub fn flatten_tree(root: &EntryTree) -> FlatTree {
  let mut visited = HashSet::new();
  visited.insert(root.id.as_str());

  let mut children = Vec::new();
  flatten_into(root, 0, &mut visited, &mut children);

  FlatTree {
    key:      root.id.clone(),
    id:       root.id.clone(),
    title:    root.title.clone(),
    desc:     root.desc.clone(),
    tags:     root.tags.clone(),
    children,
  }
}

fn flatten_into<'t>(
  node: &'t EntryTree,
  depth: usize,
  visited: &mut HashSet<&'t str>,
  out: &mut Vec<FlatTreeRow>,
) {
  for child in &node.children {
    if !visited.insert(child.id.as_str()) {
      continue;
    }
    out.push(FlatTreeRow {
      key:   format!("{}:{}:{depth}", node.id, child.id),
      depth,
      id:    child.id.clone(),
      title: child.title.clone(),
      desc:  child.desc.clone(),
      tags:  child.tags.clone(),
    });
    flatten_into(child, depth + 1, visited, out);
  }
}

// ─── Fan-out ─────────────────────────────────────────────────────────────────

/// Fetch the traversal tree of every listed entry, sequentially, in listing
/// order. All-or-nothing: the first failed fetch aborts the rest and
/// discards completed results. A root that vanished between the listing and
/// its tree fetch is skipped.
pub async fn explore_all<G: EntryGraph>(
  graph: &G,
  direction: Direction,
) -> Result<Vec<EntryTree>, G::Error> {
  let entries = graph.list_entries(PAGE_LIMIT, 0).await?;

  let mut trees = Vec::with_capacity(entries.len());
  for entry in entries {
    if let Some(tree) = graph.explore(&entry.id, direction).await? {
      trees.push(tree);
    }
  }
  Ok(trees)
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    entry::{NewEntry, RelKind},
    testgraph::TestGraph,
  };

  fn leaf(id: &str, title: &str) -> EntryTree {
    EntryTree {
      id:       id.into(),
      title:    title.into(),
      desc:     None,
      tags:     Vec::new(),
      children: Vec::new(),
    }
  }

  fn branch(id: &str, title: &str, children: Vec<EntryTree>) -> EntryTree {
    EntryTree {
      children,
      ..leaf(id, title)
    }
  }

  #[test]
  fn flatten_annotates_depth_and_keys() {
    let tree = branch(
      "a",
      "Auth",
      vec![branch("b", "DB", vec![leaf("c", "Cache")]), leaf("d", "Docs")],
    );

    let flat = flatten_tree(&tree);
    assert_eq!(flat.id, "a");

    let rows: Vec<(&str, usize, &str)> = flat
      .children
      .iter()
      .map(|r| (r.id.as_str(), r.depth, r.key.as_str()))
      .collect();
    assert_eq!(rows, vec![
      ("b", 0, "a:b:0"),
      ("c", 1, "b:c:1"),
      ("d", 0, "a:d:0"),
    ]);
  }

  #[test]
  fn flatten_terminates_on_a_cycle_and_keeps_first_visit_only() {
    // a → b → a, as a server without cycle deduplication would serve it.
    let tree = branch("a", "Auth", vec![branch("b", "DB", vec![leaf("a", "Auth")])]);

    let flat = flatten_tree(&tree);
    let ids: Vec<&str> = flat.children.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["b"]);
  }

  #[test]
  fn flatten_deduplicates_diamond_reconvergence() {
    // a → {b, c}, both → d: d is emitted once, under the branch that
    // reaches it first.
    let tree = branch(
      "a",
      "A",
      vec![
        branch("b", "B", vec![leaf("d", "D")]),
        branch("c", "C", vec![leaf("d", "D")]),
      ],
    );

    let flat = flatten_tree(&tree);
    let ids: Vec<&str> = flat.children.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["b", "d", "c"]);
  }

  #[tokio::test]
  async fn explore_all_returns_one_tree_per_entry_in_listing_order() {
    let g = TestGraph::new();
    let a = g.seed(NewEntry::titled("Auth")).await;
    let b = g.seed(NewEntry::titled("DB")).await;
    g.seed_link(&a, &b, RelKind::RelatesTo).await;

    let trees = explore_all(&g, Direction::Forward).await.unwrap();
    assert_eq!(trees.len(), 2);
    assert_eq!(trees[0].id, a);
    assert_eq!(trees[0].children.len(), 1);
    assert_eq!(trees[0].children[0].id, b);
    assert_eq!(trees[1].id, b);
    assert!(trees[1].children.is_empty());
  }

  #[tokio::test]
  async fn reverse_direction_walks_incoming_edges() {
    let g = TestGraph::new();
    let a = g.seed(NewEntry::titled("Auth")).await;
    let b = g.seed(NewEntry::titled("DB")).await;
    g.seed_link(&a, &b, RelKind::RelatesTo).await;

    let trees = explore_all(&g, Direction::Reverse).await.unwrap();
    assert!(trees[0].children.is_empty());
    assert_eq!(trees[1].children[0].id, a);
  }

  #[tokio::test]
  async fn cyclic_graph_trees_terminate_end_to_end() {
    let g = TestGraph::new();
    let a = g.seed(NewEntry::titled("A")).await;
    let b = g.seed(NewEntry::titled("B")).await;
    g.seed_link(&a, &b, RelKind::RelatesTo).await;
    g.seed_link(&b, &a, RelKind::RelatesTo).await;

    let trees = explore_all(&g, Direction::Forward).await.unwrap();
    let flat = flatten_tree(&trees[0]);
    assert_eq!(flat.children.len(), 1);
    assert_eq!(flat.children[0].id, b);
  }
}

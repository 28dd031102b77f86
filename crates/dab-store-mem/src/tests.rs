//! Integration tests for `MemGraph`.

use dab_core::{
  entry::{Direction, EntryPatch, NewEntry, NewRelation, RelKind},
  graph::EntryGraph,
};

use crate::{MemGraph, StoreError};

fn new_entry(title: &str) -> NewEntry {
  NewEntry {
    title: title.into(),
    desc:  Some(format!("{title} description")),
    tags:  vec!["TAG".into()],
  }
}

// ─── Entries ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_get_entry() {
  let g = MemGraph::new();

  let created = g.create_entry(new_entry("Auth")).await.unwrap();
  assert_eq!(created.title, "Auth");
  assert!(!created.id.is_empty());

  let fetched = g.get_entry(&created.id).await.unwrap().unwrap();
  assert_eq!(fetched, created);
}

#[tokio::test]
async fn get_entry_missing_returns_none() {
  let g = MemGraph::new();
  assert!(g.get_entry("nope").await.unwrap().is_none());
}

#[tokio::test]
async fn list_entries_pages_in_creation_order() {
  let g = MemGraph::new();
  for i in 0..5 {
    g.create_entry(new_entry(&format!("E{i}"))).await.unwrap();
  }

  assert_eq!(g.count_entries().await.unwrap(), 5);

  let page = g.list_entries(2, 1).await.unwrap();
  let titles: Vec<_> = page.iter().map(|e| e.title.as_str()).collect();
  assert_eq!(titles, vec!["E1", "E2"]);

  let tail = g.list_entries(50, 4).await.unwrap();
  assert_eq!(tail.len(), 1);
  assert_eq!(tail[0].title, "E4");
}

#[tokio::test]
async fn patch_updates_only_supplied_fields() {
  let g = MemGraph::new();
  let entry = g.create_entry(new_entry("Auth")).await.unwrap();

  let patched = g
    .patch_entry(&entry.id, EntryPatch::title("Auth v2"))
    .await
    .unwrap()
    .unwrap();
  assert_eq!(patched.title, "Auth v2");
  assert_eq!(patched.desc.as_deref(), Some("Auth description"));
  assert_eq!(patched.tags, vec!["TAG".to_string()]);
}

#[tokio::test]
async fn empty_patch_is_rejected() {
  let g = MemGraph::new();
  let entry = g.create_entry(new_entry("Auth")).await.unwrap();

  let result = g.patch_entry(&entry.id, EntryPatch::default()).await;
  assert!(matches!(result, Err(StoreError::EmptyPatch)));
}

#[tokio::test]
async fn patch_missing_entry_returns_none() {
  let g = MemGraph::new();
  let result = g.patch_entry("nope", EntryPatch::title("x")).await.unwrap();
  assert!(result.is_none());
}

#[tokio::test]
async fn delete_detaches_relations_both_directions() {
  let g = MemGraph::new();
  let a = g.create_entry(new_entry("A")).await.unwrap();
  let b = g.create_entry(new_entry("B")).await.unwrap();
  let c = g.create_entry(new_entry("C")).await.unwrap();
  g.link(&a.id, NewRelation::new(&b.id, RelKind::RelatesTo))
    .await
    .unwrap();
  g.link(&b.id, NewRelation::new(&c.id, RelKind::Blocks))
    .await
    .unwrap();

  assert!(g.delete_entry(&b.id).await.unwrap());
  assert!(g.get_entry(&b.id).await.unwrap().is_none());

  // No edge on either side may still reference b.
  let a_rels = g.relations(&a.id).await.unwrap();
  assert!(a_rels.outgoing.is_empty());
  let c_rels = g.relations(&c.id).await.unwrap();
  assert!(c_rels.incoming.is_empty());

  // Second delete is a miss.
  assert!(!g.delete_entry(&b.id).await.unwrap());
}

// ─── Relations ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn link_lists_on_both_endpoints() {
  let g = MemGraph::new();
  let a = g.create_entry(new_entry("A")).await.unwrap();
  let b = g.create_entry(new_entry("B")).await.unwrap();

  let relation = g
    .link(&a.id, NewRelation::new(&b.id, RelKind::Influences))
    .await
    .unwrap()
    .unwrap();
  assert_eq!(relation.from_id, a.id);
  assert_eq!(relation.kind, RelKind::Influences);

  let a_rels = g.relations(&a.id).await.unwrap();
  assert_eq!(a_rels.outgoing.len(), 1);
  assert!(a_rels.incoming.is_empty());

  let b_rels = g.relations(&b.id).await.unwrap();
  assert!(b_rels.outgoing.is_empty());
  assert_eq!(b_rels.incoming.len(), 1);
}

#[tokio::test]
async fn link_with_missing_endpoint_returns_none() {
  let g = MemGraph::new();
  let a = g.create_entry(new_entry("A")).await.unwrap();

  let result = g
    .link(&a.id, NewRelation::new("nope", RelKind::RelatesTo))
    .await
    .unwrap();
  assert!(result.is_none());
  let result = g
    .link("nope", NewRelation::new(&a.id, RelKind::RelatesTo))
    .await
    .unwrap();
  assert!(result.is_none());
}

#[tokio::test]
async fn relink_same_triple_is_an_upsert() {
  let g = MemGraph::new();
  let a = g.create_entry(new_entry("A")).await.unwrap();
  let b = g.create_entry(new_entry("B")).await.unwrap();

  let mut input = NewRelation::new(&b.id, RelKind::RelatesTo);
  input.props.insert("note".into(), serde_json::json!("first"));
  g.link(&a.id, input).await.unwrap();

  let mut input = NewRelation::new(&b.id, RelKind::RelatesTo);
  input.props.insert("note".into(), serde_json::json!("second"));
  g.link(&a.id, input).await.unwrap();

  let rels = g.relations(&a.id).await.unwrap();
  assert_eq!(rels.outgoing.len(), 1);
  assert_eq!(rels.outgoing[0].props["note"], serde_json::json!("second"));

  // A different kind between the same pair is a distinct edge.
  g.link(&a.id, NewRelation::new(&b.id, RelKind::Blocks))
    .await
    .unwrap();
  assert_eq!(g.relations(&a.id).await.unwrap().outgoing.len(), 2);
}

#[tokio::test]
async fn unlink_twice_reports_a_miss_the_second_time() {
  let g = MemGraph::new();
  let a = g.create_entry(new_entry("A")).await.unwrap();
  let b = g.create_entry(new_entry("B")).await.unwrap();
  g.link(&a.id, NewRelation::new(&b.id, RelKind::RelatesTo))
    .await
    .unwrap();

  assert!(g.unlink(&a.id, RelKind::RelatesTo, &b.id).await.unwrap());
  assert!(!g.unlink(&a.id, RelKind::RelatesTo, &b.id).await.unwrap());
}

// ─── Exploration ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn explore_walks_forward_and_reverse() {
  let g = MemGraph::new();
  let a = g.create_entry(new_entry("A")).await.unwrap();
  let b = g.create_entry(new_entry("B")).await.unwrap();
  let c = g.create_entry(new_entry("C")).await.unwrap();
  g.link(&a.id, NewRelation::new(&b.id, RelKind::RelatesTo))
    .await
    .unwrap();
  g.link(&b.id, NewRelation::new(&c.id, RelKind::RelatesTo))
    .await
    .unwrap();

  let tree = g.explore(&a.id, Direction::Forward).await.unwrap().unwrap();
  assert_eq!(tree.id, a.id);
  assert_eq!(tree.children.len(), 1);
  assert_eq!(tree.children[0].id, b.id);
  assert_eq!(tree.children[0].children[0].id, c.id);

  let tree = g.explore(&c.id, Direction::Reverse).await.unwrap().unwrap();
  assert_eq!(tree.children[0].id, b.id);
  assert_eq!(tree.children[0].children[0].id, a.id);
}

#[tokio::test]
async fn explore_missing_start_returns_none() {
  let g = MemGraph::new();
  assert!(g.explore("nope", Direction::Forward).await.unwrap().is_none());
}

#[tokio::test]
async fn explore_terminates_on_cycles() {
  let g = MemGraph::new();
  let a = g.create_entry(new_entry("A")).await.unwrap();
  let b = g.create_entry(new_entry("B")).await.unwrap();
  g.link(&a.id, NewRelation::new(&b.id, RelKind::RelatesTo))
    .await
    .unwrap();
  g.link(&b.id, NewRelation::new(&a.id, RelKind::RelatesTo))
    .await
    .unwrap();

  let tree = g.explore(&a.id, Direction::Forward).await.unwrap().unwrap();
  assert_eq!(tree.children.len(), 1);
  assert_eq!(tree.children[0].id, b.id);
  // The cycle edge back to a is dropped, not expanded.
  assert!(tree.children[0].children.is_empty());
}

#[tokio::test]
async fn explore_emits_reconverging_nodes_once() {
  let g = MemGraph::new();
  let a = g.create_entry(new_entry("A")).await.unwrap();
  let b = g.create_entry(new_entry("B")).await.unwrap();
  let c = g.create_entry(new_entry("C")).await.unwrap();
  let d = g.create_entry(new_entry("D")).await.unwrap();
  for (from, to) in [(&a, &b), (&a, &c), (&b, &d), (&c, &d)] {
    g.link(&from.id, NewRelation::new(&to.id, RelKind::RelatesTo))
      .await
      .unwrap();
  }

  let tree = g.explore(&a.id, Direction::Forward).await.unwrap().unwrap();
  assert_eq!(tree.children.len(), 2);
  // d hangs under b (reached first); c is a leaf.
  assert_eq!(tree.children[0].children[0].id, d.id);
  assert!(tree.children[1].children.is_empty());
}

//! Account entries, typed relations, and exploration trees.
//!
//! An entry is a titled, tagged node. A relation is a typed directed edge
//! between two entries, identified by the composite `(from, kind, to)`.
//! Everything here serialises to the JSON wire shapes served under `/v1`.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::Error;

// ─── Entries ─────────────────────────────────────────────────────────────────

/// A titled, tagged unit of content — one node in the account graph.
/// The id is an opaque server-assigned string and never changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountEntry {
  pub id:    String,
  pub title: String,
  pub desc:  Option<String>,
  #[serde(default)]
  pub tags:  Vec<String>,
}

/// Input to [`crate::graph::EntryGraph::create_entry`].
/// The id is always assigned by the server; it is not accepted from callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEntry {
  pub title: String,
  #[serde(default)]
  pub desc:  Option<String>,
  #[serde(default)]
  pub tags:  Vec<String>,
}

impl NewEntry {
  pub fn titled(title: impl Into<String>) -> Self {
    Self {
      title: title.into(),
      desc:  None,
      tags:  Vec::new(),
    }
  }
}

/// Partial update body for [`crate::graph::EntryGraph::patch_entry`].
///
/// `None` fields are left untouched. An all-`None` patch carries no work and
/// is rejected by the service with a 400.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntryPatch {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub title: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub desc:  Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub tags:  Option<Vec<String>>,
}

impl EntryPatch {
  pub fn title(value: impl Into<String>) -> Self {
    Self {
      title: Some(value.into()),
      ..Self::default()
    }
  }

  pub fn desc(value: impl Into<String>) -> Self {
    Self {
      desc: Some(value.into()),
      ..Self::default()
    }
  }

  pub fn is_empty(&self) -> bool {
    self.title.is_none() && self.desc.is_none() && self.tags.is_none()
  }
}

// ─── Relations ───────────────────────────────────────────────────────────────

/// The kind of a directed relation. The wire form is the screaming-snake
/// discriminant (`RELATES_TO`, `INFLUENCES`, ...), which also appears as a
/// path segment in `DELETE /account-entries/{from}/relations/{kind}/{to}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelKind {
  RelatesTo,
  Influences,
  Blocks,
  Duplicates,
}

impl RelKind {
  /// The wire discriminant. Must match the serde tags above.
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::RelatesTo => "RELATES_TO",
      Self::Influences => "INFLUENCES",
      Self::Blocks => "BLOCKS",
      Self::Duplicates => "DUPLICATES",
    }
  }
}

impl fmt::Display for RelKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for RelKind {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "RELATES_TO" => Ok(Self::RelatesTo),
      "INFLUENCES" => Ok(Self::Influences),
      "BLOCKS" => Ok(Self::Blocks),
      "DUPLICATES" => Ok(Self::Duplicates),
      other => Err(Error::UnknownRelKind(other.to_string())),
    }
  }
}

/// Open key-value bag attached to a relation (notes, timestamps, anything).
pub type RelProps = serde_json::Map<String, serde_json::Value>;

/// A typed directed edge between two entries.
///
/// Identity is the composite `(from_id, kind, to_id)`; the store deduplicates
/// on that key, so re-linking the same pair with the same kind is an upsert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relation {
  pub from_id: String,
  pub to_id:   String,
  pub kind:    RelKind,
  #[serde(default)]
  pub props:   RelProps,
}

/// Input to [`crate::graph::EntryGraph::link`] — `POST .../relations` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRelation {
  pub to_id: String,
  pub kind:  RelKind,
  #[serde(default)]
  pub props: RelProps,
}

impl NewRelation {
  pub fn new(to_id: impl Into<String>, kind: RelKind) -> Self {
    Self {
      to_id: to_id.into(),
      kind,
      props: RelProps::new(),
    }
  }
}

/// Both edge lists of one entry, as served by `GET .../relations`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelationList {
  pub outgoing: Vec<Relation>,
  pub incoming: Vec<Relation>,
}

// ─── Exploration trees ───────────────────────────────────────────────────────

/// Which way an exploration traversal walks relations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
  /// Follow outgoing edges, from the start entry toward its targets.
  Forward,
  /// Follow incoming edges, from the start entry toward its sources.
  Reverse,
}

/// One traversal of the relation graph rooted at a start entry.
///
/// The server builds this with a visited set, so a relation cycle in the
/// underlying graph never produces an infinite tree; consumers still carry
/// their own guard when flattening (see [`crate::explore::flatten_tree`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryTree {
  pub id:       String,
  pub title:    String,
  pub desc:     Option<String>,
  #[serde(default)]
  pub tags:     Vec<String>,
  #[serde(default)]
  pub children: Vec<EntryTree>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn rel_kind_round_trips_through_wire_form() {
    for kind in [
      RelKind::RelatesTo,
      RelKind::Influences,
      RelKind::Blocks,
      RelKind::Duplicates,
    ] {
      assert_eq!(kind.as_str().parse::<RelKind>().unwrap(), kind);
      let json = serde_json::to_string(&kind).unwrap();
      assert_eq!(json, format!("\"{}\"", kind.as_str()));
    }
  }

  #[test]
  fn rel_kind_rejects_unknown_discriminant() {
    assert!("FRIENDS_WITH".parse::<RelKind>().is_err());
  }

  #[test]
  fn empty_patch_serialises_to_empty_object() {
    let patch = EntryPatch::default();
    assert!(patch.is_empty());
    assert_eq!(serde_json::to_string(&patch).unwrap(), "{}");
  }

  #[test]
  fn patch_skips_unset_fields() {
    let patch = EntryPatch::title("Auth");
    assert_eq!(serde_json::to_string(&patch).unwrap(), r#"{"title":"Auth"}"#);
  }

  #[test]
  fn tree_deserialises_with_missing_children() {
    let tree: EntryTree =
      serde_json::from_str(r#"{"id":"a","title":"Auth","desc":null}"#).unwrap();
    assert!(tree.children.is_empty());
    assert!(tree.tags.is_empty());
  }
}

//! The flat sheet projection — the editable, spreadsheet-style view model.
//!
//! The projection turns the entry list plus each entry's outgoing relations
//! into a flat sequence of rows: one `Node` row per entry, immediately
//! followed by one `Linked` row per outgoing relation. It is rebuilt in full
//! on every refresh and never partially patched.

use crate::{
  entry::{AccountEntry, EntryPatch, RelKind},
  graph::EntryGraph,
};

// ─── Rows ────────────────────────────────────────────────────────────────────

/// One row of the sheet. The two variants carry different data on purpose:
/// a `Node` row is an entry, a `Linked` row is an outgoing relation seen
/// from its owning entry.
#[derive(Debug, Clone, PartialEq)]
pub enum SheetRow {
  /// One account entry. Connected columns render blank.
  Node { entry: AccountEntry },
  /// One outgoing relation of the preceding `Node` row. Node columns render
  /// blank; edits apply to the connected entry, row deletion unlinks the
  /// `(owner, kind, connected)` edge.
  Linked {
    owner_id:    String,
    owner_title: String,
    kind:        RelKind,
    connected:   AccountEntry,
  },
}

impl SheetRow {
  /// Synthetic row key, collision-resistant across entries sharing a title.
  pub fn key(&self) -> String {
    match self {
      Self::Node { entry } => format!("{}:node", entry.id),
      Self::Linked {
        owner_title,
        connected,
        ..
      } => format!("{owner_title}:{}:linked", connected.id),
    }
  }

  /// The id that edits and entry-level deletes apply to: the entry's own id
  /// for a `Node` row, the connected entry's id for a `Linked` row.
  pub fn entry_id(&self) -> &str {
    match self {
      Self::Node { entry } => &entry.id,
      Self::Linked { connected, .. } => &connected.id,
    }
  }

  /// Tags of the entry this row is about (same id as [`Self::entry_id`]).
  pub fn tags(&self) -> &[String] {
    match self {
      Self::Node { entry } => &entry.tags,
      Self::Linked { connected, .. } => &connected.tags,
    }
  }

  pub fn kind_label(&self) -> &'static str {
    match self {
      Self::Node { .. } => "node",
      Self::Linked { .. } => "linked",
    }
  }

  pub fn is_node(&self) -> bool { matches!(self, Self::Node { .. }) }
}

// ─── Columns ─────────────────────────────────────────────────────────────────

/// The four data columns of the sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetColumn {
  NodeTitle,
  NodeDesc,
  ConnectedTitle,
  ConnectedDesc,
}

impl SheetColumn {
  pub const ALL: [SheetColumn; 4] = [
    SheetColumn::NodeTitle,
    SheetColumn::NodeDesc,
    SheetColumn::ConnectedTitle,
    SheetColumn::ConnectedDesc,
  ];

  pub fn header(&self) -> &'static str {
    match self {
      Self::NodeTitle => "node_title",
      Self::NodeDesc => "node_desc",
      Self::ConnectedTitle => "connected_title",
      Self::ConnectedDesc => "connected_desc",
    }
  }
}

impl SheetRow {
  /// Text shown in a cell. `None` means the column does not apply to this
  /// row kind and the cell renders blank and non-interactive.
  pub fn cell(&self, column: SheetColumn) -> Option<&str> {
    match (self, column) {
      (Self::Node { entry }, SheetColumn::NodeTitle) => Some(&entry.title),
      (Self::Node { entry }, SheetColumn::NodeDesc) => {
        Some(entry.desc.as_deref().unwrap_or(""))
      }
      (Self::Linked { connected, .. }, SheetColumn::ConnectedTitle) => {
        Some(&connected.title)
      }
      (Self::Linked { connected, .. }, SheetColumn::ConnectedDesc) => {
        Some(connected.desc.as_deref().unwrap_or(""))
      }
      _ => None,
    }
  }

  /// A cell is editable exactly when it applies to the row kind.
  pub fn is_editable(&self, column: SheetColumn) -> bool {
    self.cell(column).is_some()
  }

  /// The mutation a committed cell edit dispatches: which entry to patch and
  /// with what body. `None` for non-editable combinations.
  pub fn edit_patch(
    &self,
    column: SheetColumn,
    value: &str,
  ) -> Option<(String, EntryPatch)> {
    if !self.is_editable(column) {
      return None;
    }
    let patch = match column {
      SheetColumn::NodeTitle | SheetColumn::ConnectedTitle => {
        EntryPatch::title(value)
      }
      SheetColumn::NodeDesc | SheetColumn::ConnectedDesc => {
        EntryPatch::desc(value)
      }
    };
    Some((self.entry_id().to_string(), patch))
  }
}

// ─── Title lookup ────────────────────────────────────────────────────────────

/// Exact-title lookup over the loaded `Node` rows, used by "add connected
/// entry". Off-page entries are invisible here; no match is the caller's
/// no-op case.
pub fn find_by_title<'a>(
  rows: &'a [SheetRow],
  title: &str,
) -> Option<&'a AccountEntry> {
  rows.iter().find_map(|row| match row {
    SheetRow::Node { entry } if entry.title == title => Some(entry),
    _ => None,
  })
}

// ─── Projection ──────────────────────────────────────────────────────────────

/// Entry page size used by the sheet and exploration views.
pub const PAGE_LIMIT: usize = 50;

/// Build the full sheet projection.
///
/// Iterates entries in listing order; per entry emits one `Node` row, then
/// one `Linked` row per outgoing relation in the order the store returns
/// them. Issues O(entries + relations) sequential round trips; the first
/// failure aborts the whole projection. A relation whose target no longer
/// resolves (deleted between fetches) is skipped rather than rendered as an
/// orphan.
pub async fn project_sheet<G: EntryGraph>(
  graph: &G,
  limit: usize,
  offset: usize,
) -> Result<Vec<SheetRow>, G::Error> {
  let entries = graph.list_entries(limit, offset).await?;

  let mut rows = Vec::with_capacity(entries.len());
  for entry in entries {
    rows.push(SheetRow::Node {
      entry: entry.clone(),
    });

    let relations = graph.relations(&entry.id).await?;
    for relation in relations.outgoing {
      let Some(connected) = graph.get_entry(&relation.to_id).await? else {
        continue;
      };
      rows.push(SheetRow::Linked {
        owner_id:    entry.id.clone(),
        owner_title: entry.title.clone(),
        kind:        relation.kind,
        connected,
      });
    }
  }
  Ok(rows)
}

// ─── Tests ───────────────────────────────────────────────────────────────────

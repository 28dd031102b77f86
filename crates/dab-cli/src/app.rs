//! Application state machine and event dispatcher.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use dab_client::ApiClient;
use dab_core::{
  entry::{Direction, NewEntry, NewRelation, RelKind},
  explore::{explore_all, flatten_tree},
  graph::EntryGraph,
  sheet::{PAGE_LIMIT, SheetColumn, SheetRow, find_by_title, project_sheet},
};
use fuzzy_matcher::{FuzzyMatcher, skim::SkimMatcherV2};

use crate::cache::{QueryCache, QueryKey};

// ─── Screen & mode ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
  /// The editable sheet: node rows interleaved with their linked rows.
  Sheet,
  /// Flattened exploration trees, one per entry, forward or reverse.
  Explore,
}

/// Input mode. Everything except `Normal` owns the keyboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
  Normal,
  /// Typing a fuzzy filter over the sheet.
  Filter,
  /// Editing the selected cell; commits on Enter, cancels on Esc.
  EditCell { buffer: String },
  /// Typing the exact title of the entry to link to the selected node row.
  LinkPrompt { buffer: String },
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App {
  pub screen: Screen,
  pub mode:   Mode,

  /// Traversal direction of the explore screen.
  pub direction: Direction,

  /// All query data, keyed deterministically. See [`QueryCache`].
  pub cache: QueryCache,

  /// Cursor position within the *visible* (filtered) sheet rows.
  pub cursor: usize,

  /// Row key to re-select after the next sheet refetch, captured before a
  /// mutation invalidates the cache. See [`SheetRow::key`].
  selected_key: Option<String>,

  /// Selected column, an index into [`SheetColumn::ALL`].
  pub column_idx: usize,

  /// Scroll offset within the explore screen's flattened rows.
  pub explore_scroll: usize,

  /// Current fuzzy-filter string (sheet screen only).
  pub filter: String,

  /// One-line status message shown in the status bar.
  pub status_msg: String,

  /// Shared HTTP client.
  pub client: Arc<ApiClient>,
}

impl App {
  pub fn new(client: ApiClient) -> Self {
    Self {
      screen:         Screen::Sheet,
      mode:           Mode::Normal,
      direction:      Direction::Forward,
      cache:          QueryCache::new(),
      cursor:         0,
      selected_key:   None,
      column_idx:     0,
      explore_scroll: 0,
      filter:         String::new(),
      status_msg:     String::new(),
      client:         Arc::new(client),
    }
  }

  pub fn column(&self) -> SheetColumn { SheetColumn::ALL[self.column_idx] }

  // ── Data loading ──────────────────────────────────────────────────────

  /// Refetch whatever the active screen needs and is stale. Errors land in
  /// the status bar; the slot is marked loaded either way, so a failure is
  /// not retried until the next invalidation (`R` or any mutation).
  pub async fn ensure_loaded(&mut self) {
    match self.screen {
      Screen::Sheet => {
        if self.cache.is_loaded(QueryKey::SheetRows) {
          return;
        }
        self.status_msg = "Loading…".into();
        match project_sheet(self.client.as_ref(), PAGE_LIMIT, 0).await {
          Ok(rows) => {
            self.cache.store_sheet(rows);
            self.status_msg.clear();
          }
          Err(e) => {
            self.cache.store_sheet(Vec::new());
            self.status_msg = format!("Error: {e}");
          }
        }
        self.restore_selection();
      }
      Screen::Explore => {
        if self.cache.is_loaded(QueryKey::Trees(self.direction)) {
          return;
        }
        self.status_msg = "Loading…".into();
        match explore_all(self.client.as_ref(), self.direction).await {
          Ok(trees) => {
            let flat = trees.iter().map(flatten_tree).collect();
            self.cache.store_trees(self.direction, flat);
            self.status_msg.clear();
          }
          Err(e) => {
            self.cache.store_trees(self.direction, Vec::new());
            self.status_msg = format!("Error: {e}");
          }
        }
        self.explore_scroll = 0;
      }
    }
  }

  // ── Visible rows ──────────────────────────────────────────────────────

  /// Indices into the cached sheet that survive the current filter.
  /// Rows are matched on their own title (node or connected).
  pub fn visible_rows(&self) -> Vec<usize> {
    let Some(rows) = self.cache.sheet() else {
      return Vec::new();
    };
    if self.filter.is_empty() {
      return (0..rows.len()).collect();
    }
    let matcher = SkimMatcherV2::default();
    rows
      .iter()
      .enumerate()
      .filter(|(_, row)| {
        let title = row
          .cell(SheetColumn::NodeTitle)
          .or_else(|| row.cell(SheetColumn::ConnectedTitle))
          .unwrap_or("");
        matcher.fuzzy_match(title, &self.filter).is_some()
      })
      .map(|(i, _)| i)
      .collect()
  }

  /// The sheet row under the cursor in the filtered view, if any.
  pub fn selected_row(&self) -> Option<&SheetRow> {
    let index = *self.visible_rows().get(self.cursor)?;
    self.cache.sheet()?.get(index)
  }

  fn clamp_cursor(&mut self) {
    let len = self.visible_rows().len();
    if self.cursor >= len {
      self.cursor = len.saturating_sub(1);
    }
  }

  /// Re-select the row whose key was captured before the last refetch, if it
  /// survived; otherwise clamp the numeric cursor.
  fn restore_selection(&mut self) {
    let wanted = self.selected_key.take();
    let visible = self.visible_rows();
    if let (Some(key), Some(rows)) = (wanted, self.cache.sheet()) {
      if let Some(pos) = visible.iter().position(|&i| rows[i].key() == key) {
        self.cursor = pos;
        return;
      }
    }
    self.clamp_cursor();
  }

  /// Invalidate everything, remembering the selected row's key so the next
  /// sheet refetch puts the cursor back on the same row.
  fn refetch_keeping_selection(&mut self) {
    self.selected_key = self.selected_row().map(|row| row.key());
    self.cache.invalidate_all();
  }

  /// Total line count of the explore screen, for scroll bounding.
  pub fn explore_line_count(&self) -> usize {
    self
      .cache
      .trees(self.direction)
      .map(|trees| trees.iter().map(|t| 1 + t.children.len()).sum())
      .unwrap_or(0)
  }

  // ── Key handling ──────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub async fn handle_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    // Global: Ctrl-C quits from anywhere.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return Ok(false);
    }

    match std::mem::replace(&mut self.mode, Mode::Normal) {
      Mode::Normal => match self.screen {
        Screen::Sheet => return self.handle_sheet_key(key).await,
        Screen::Explore => return self.handle_explore_key(key).await,
      },
      Mode::Filter => self.handle_filter_key(key),
      Mode::EditCell { buffer } => self.handle_edit_key(key, buffer).await,
      Mode::LinkPrompt { buffer } => self.handle_link_key(key, buffer).await,
    }
    Ok(true)
  }

  async fn handle_sheet_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    match key.code {
      KeyCode::Char('q') => return Ok(false),
      KeyCode::Tab => {
        self.screen = Screen::Explore;
      }

      // Navigation
      KeyCode::Down | KeyCode::Char('j') => {
        let len = self.visible_rows().len();
        if len > 0 && self.cursor + 1 < len {
          self.cursor += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        self.cursor = self.cursor.saturating_sub(1);
      }
      KeyCode::Right | KeyCode::Char('l') => {
        self.column_idx = (self.column_idx + 1) % SheetColumn::ALL.len();
      }
      KeyCode::Left | KeyCode::Char('h') => {
        self.column_idx =
          (self.column_idx + SheetColumn::ALL.len() - 1) % SheetColumn::ALL.len();
      }

      // Editing
      KeyCode::Enter | KeyCode::Char('e') => {
        if let Some(row) = self.selected_row() {
          let column = self.column();
          if let Some(current) = row.cell(column).filter(|_| row.is_editable(column))
          {
            self.mode = Mode::EditCell {
              buffer: current.to_string(),
            };
          } else {
            self.status_msg = "Cell not editable on this row".into();
          }
        }
      }

      // Mutations
      KeyCode::Char('a') => self.create_entry().await,
      KeyCode::Char('d') => self.delete_selected().await,
      KeyCode::Char('c') => match self.selected_row() {
        Some(SheetRow::Node { .. }) => {
          self.mode = Mode::LinkPrompt {
            buffer: String::new(),
          };
        }
        _ => self.status_msg = "Select a node row to link from".into(),
      },

      // Filter
      KeyCode::Char('/') => {
        self.mode = Mode::Filter;
        self.filter.clear();
        self.cursor = 0;
      }
      KeyCode::Esc => {
        self.filter.clear();
        self.cursor = 0;
      }

      // Manual refresh of this view only
      KeyCode::Char('R') => {
        self.cache.invalidate(QueryKey::SheetRows);
      }

      _ => {}
    }
    Ok(true)
  }

  async fn handle_explore_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    match key.code {
      KeyCode::Char('q') => return Ok(false),
      KeyCode::Tab => {
        self.screen = Screen::Sheet;
      }
      KeyCode::Down | KeyCode::Char('j') => {
        if self.explore_scroll + 1 < self.explore_line_count() {
          self.explore_scroll += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        self.explore_scroll = self.explore_scroll.saturating_sub(1);
      }
      KeyCode::Char('r') => {
        self.direction = match self.direction {
          Direction::Forward => Direction::Reverse,
          Direction::Reverse => Direction::Forward,
        };
        self.explore_scroll = 0;
      }
      KeyCode::Char('R') => {
        self.cache.invalidate(QueryKey::Trees(self.direction));
      }
      _ => {}
    }
    Ok(true)
  }

  fn handle_filter_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Esc => {
        self.filter.clear();
        self.cursor = 0;
      }
      KeyCode::Enter => {
        self.cursor = 0;
      }
      KeyCode::Backspace => {
        self.filter.pop();
        self.cursor = 0;
        self.mode = Mode::Filter;
      }
      KeyCode::Char(c) => {
        self.filter.push(c);
        self.cursor = 0;
        self.mode = Mode::Filter;
      }
      _ => self.mode = Mode::Filter,
    }
  }

  async fn handle_edit_key(&mut self, key: KeyEvent, mut buffer: String) {
    match key.code {
      KeyCode::Esc => {}
      KeyCode::Enter => self.commit_edit(&buffer).await,
      KeyCode::Backspace => {
        buffer.pop();
        self.mode = Mode::EditCell { buffer };
      }
      KeyCode::Char(c) => {
        buffer.push(c);
        self.mode = Mode::EditCell { buffer };
      }
      _ => self.mode = Mode::EditCell { buffer },
    }
  }

  async fn handle_link_key(&mut self, key: KeyEvent, mut buffer: String) {
    match key.code {
      KeyCode::Esc => {}
      KeyCode::Enter => self.commit_link(&buffer).await,
      KeyCode::Backspace => {
        buffer.pop();
        self.mode = Mode::LinkPrompt { buffer };
      }
      KeyCode::Char(c) => {
        buffer.push(c);
        self.mode = Mode::LinkPrompt { buffer };
      }
      _ => self.mode = Mode::LinkPrompt { buffer },
    }
  }

  // ── Mutations ─────────────────────────────────────────────────────────
  //
  // Every success invalidates the whole cache; the active screen refetches
  // on the next loop iteration. No local splicing.

  async fn create_entry(&mut self) {
    let input = NewEntry {
      title: "New".into(),
      desc:  Some(String::new()),
      tags:  vec!["TAG".into()],
    };
    match self.client.create_entry(input).await {
      Ok(entry) => {
        self.status_msg = format!("Created \"{}\"", entry.title);
        self.refetch_keeping_selection();
      }
      Err(e) => self.status_msg = format!("Error: {e}"),
    }
  }

  async fn delete_selected(&mut self) {
    let Some(row) = self.selected_row().cloned() else {
      return;
    };
    let result = match &row {
      SheetRow::Node { entry } => self.client.delete_entry(&entry.id).await,
      SheetRow::Linked {
        owner_id,
        kind,
        connected,
        ..
      } => self.client.unlink(owner_id, *kind, &connected.id).await,
    };
    match result {
      Ok(true) => {
        self.status_msg = match &row {
          SheetRow::Node { entry } => format!("Deleted \"{}\"", entry.title),
          SheetRow::Linked { connected, .. } => {
            format!("Unlinked \"{}\"", connected.title)
          }
        };
        self.cache.invalidate_all();
      }
      Ok(false) => {
        // Already gone server-side; refetch to converge.
        self.status_msg = "Already deleted".into();
        self.cache.invalidate_all();
      }
      Err(e) => self.status_msg = format!("Error: {e}"),
    }
  }

  async fn commit_edit(&mut self, buffer: &str) {
    let Some(dispatch) = self
      .selected_row()
      .and_then(|row| row.edit_patch(self.column(), buffer))
    else {
      return;
    };
    let (id, patch) = dispatch;
    match self.client.patch_entry(&id, patch).await {
      Ok(Some(_)) => {
        self.status_msg = "Saved".into();
        self.refetch_keeping_selection();
      }
      Ok(None) => {
        self.status_msg = "Entry no longer exists".into();
        self.cache.invalidate_all();
      }
      Err(e) => self.status_msg = format!("Error: {e}"),
    }
  }

  async fn commit_link(&mut self, buffer: &str) {
    let Some(SheetRow::Node { entry }) = self.selected_row() else {
      return;
    };
    let from_id = entry.id.clone();

    // Exact-title lookup over the loaded rows only; off-page entries are
    // not found.
    let target = self
      .cache
      .sheet()
      .and_then(|rows| find_by_title(rows, buffer))
      .map(|found| found.id.clone());
    let Some(to_id) = target else {
      self.status_msg = format!("No entry titled \"{buffer}\"");
      return;
    };

    match self
      .client
      .link(&from_id, NewRelation::new(to_id, RelKind::RelatesTo))
      .await
    {
      Ok(Some(_)) => {
        self.status_msg = format!("Linked to \"{buffer}\"");
        self.refetch_keeping_selection();
      }
      Ok(None) => {
        self.status_msg = "Entry no longer exists".into();
        self.cache.invalidate_all();
      }
      Err(e) => self.status_msg = format!("Error: {e}"),
    }
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

//! Sheet pane — the editable table of node and linked rows.

use dab_core::sheet::{SheetColumn, SheetRow};
use ratatui::{
  Frame,
  layout::{Constraint, Rect},
  style::{Color, Modifier, Style},
  widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
};

use crate::app::{App, Mode};

/// Render the sheet into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let visible = app.visible_rows();
  let all_rows = app.cache.sheet().unwrap_or(&[]);

  // Title with count.
  let title = if app.filter.is_empty() {
    format!(" Sheet ({}) ", all_rows.len())
  } else {
    format!(" Sheet ({}/{}) ", visible.len(), all_rows.len())
  };

  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));

  let mut inner = block.inner(area);
  f.render_widget(block, area);

  // Input bar pinned to the bottom of the pane while filtering or linking.
  if inner.height > 2 {
    let bar = match &app.mode {
      Mode::Filter => Some(format!("/{}_", app.filter)),
      Mode::LinkPrompt { buffer } => Some(format!("link → {buffer}_")),
      _ if !app.filter.is_empty() => Some(format!("/{}", app.filter)),
      _ => None,
    };
    if let Some(text) = bar {
      let bar_area = Rect {
        x:      inner.x,
        y:      inner.y + inner.height - 1,
        width:  inner.width,
        height: 1,
      };
      inner.height -= 1;
      f.render_widget(
        Paragraph::new(text).style(Style::default().fg(Color::Yellow)),
        bar_area,
      );
    }
  }

  // Header: the four editable columns plus the read-only kind and tags.
  let header = Row::new(
    SheetColumn::ALL
      .iter()
      .map(|column| Cell::from(column.header()))
      .chain([Cell::from("kind"), Cell::from("tags")])
      .collect::<Vec<_>>(),
  )
  .style(
    Style::default()
      .fg(Color::White)
      .add_modifier(Modifier::BOLD),
  );

  let table_rows: Vec<Row> = visible
    .iter()
    .enumerate()
    .map(|(i, &index)| {
      let row = &all_rows[index];
      let at_cursor = i == app.cursor;

      let mut cells: Vec<Cell> = SheetColumn::ALL
        .iter()
        .enumerate()
        .map(|(ci, &column)| {
          let active = at_cursor && ci == app.column_idx;
          let text = match (&app.mode, active) {
            // The cell under edit shows the buffer, not the stored value.
            (Mode::EditCell { buffer }, true) => format!("{buffer}_"),
            _ => row.cell(column).unwrap_or("").to_string(),
          };
          let style = if active {
            Style::default()
              .bg(Color::Cyan)
              .fg(Color::Black)
              .add_modifier(Modifier::BOLD)
          } else {
            Style::default()
          };
          Cell::from(text).style(style)
        })
        .collect();

      let kind = match row {
        SheetRow::Node { .. } => String::new(),
        SheetRow::Linked { kind, .. } => kind.as_str().to_string(),
      };
      cells.push(
        Cell::from(kind).style(Style::default().fg(Color::Magenta)),
      );
      cells.push(
        Cell::from(row.tags().join(", "))
          .style(Style::default().fg(Color::Gray)),
      );

      Row::new(cells)
    })
    .collect();

  let mut state = TableState::default();
  state.select(if visible.is_empty() {
    None
  } else {
    Some(app.cursor)
  });

  let widths = [
    Constraint::Percentage(18),
    Constraint::Percentage(22),
    Constraint::Percentage(18),
    Constraint::Percentage(22),
    Constraint::Length(12),
    Constraint::Min(8),
  ];

  f.render_stateful_widget(
    Table::new(table_rows, widths)
      .header(header)
      .row_highlight_style(Style::default().bg(Color::Blue).fg(Color::White))
      .highlight_symbol(""),
    inner,
    &mut state,
  );
}

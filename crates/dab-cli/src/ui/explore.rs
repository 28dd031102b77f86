//! Explore pane — every entry's flattened traversal tree.

use dab_core::entry::Direction;
use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph},
};

use crate::app::App;

/// Render the flattened trees into `area`, honoring the scroll offset.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let title = match app.direction {
    Direction::Forward => " Explore (forward) ",
    Direction::Reverse => " Explore (reverse) ",
  };

  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);

  let Some(trees) = app.cache.trees(app.direction) else {
    return;
  };
  if trees.is_empty() {
    f.render_widget(
      Paragraph::new(Line::from(Span::styled(
        "No entries.",
        Style::default().fg(Color::Gray),
      ))),
      inner,
    );
    return;
  }

  // One line per root, one per flattened child row.
  let mut lines: Vec<Line> = Vec::new();
  for tree in trees {
    let mut root = vec![Span::styled(
      tree.title.clone(),
      Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD),
    )];
    if !tree.tags.is_empty() {
      root.push(Span::styled(
        format!("  [{}]", tree.tags.join(", ")),
        Style::default().fg(Color::Gray),
      ));
    }
    lines.push(Line::from(root));

    for child in &tree.children {
      let indent = "  ".repeat(child.depth);
      let mut spans = vec![
        Span::raw(indent),
        Span::styled("└ ", Style::default().fg(Color::DarkGray)),
        Span::raw(child.title.clone()),
      ];
      if let Some(desc) = child.desc.as_deref().filter(|d| !d.is_empty()) {
        spans.push(Span::styled(
          format!("  — {desc}"),
          Style::default().fg(Color::Gray),
        ));
      }
      lines.push(Line::from(spans));
    }
  }

  let visible: Vec<Line> = lines
    .into_iter()
    .skip(app.explore_scroll)
    .take(inner.height as usize)
    .collect();
  f.render_widget(Paragraph::new(visible), inner);
}

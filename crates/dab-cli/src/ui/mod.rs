//! TUI rendering — orchestrates all panes.

pub mod explore;
pub mod sheet;

use chrono::Local;
use dab_core::entry::Direction as TreeDirection;
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::Paragraph,
};

use crate::app::{App, Mode, Screen};

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw(f: &mut Frame, app: &App) {
  let area = f.area();

  // Vertical stack: header, body, status bar.
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Min(0),    // body
      Constraint::Length(1), // status bar
    ])
    .split(area);

  draw_header(f, rows[0], app);
  match app.screen {
    Screen::Sheet => sheet::draw(f, rows[1], app),
    Screen::Explore => explore::draw(f, rows[1], app),
  }
  draw_status(f, rows[2], app);
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header(f: &mut Frame, area: Rect, _app: &App) {
  let date = Local::now().format("%Y-%m-%d").to_string();

  let left = Span::styled(
    " dab  [Tab] view  [q] quit",
    Style::default()
      .fg(Color::White)
      .add_modifier(Modifier::BOLD),
  );
  let right = Span::styled(
    format!("{date} "),
    Style::default().fg(Color::Gray),
  );

  // Simple left-right header: pad the middle.
  let left_width = left.content.len() as u16;
  let right_width = right.content.len() as u16;
  let pad = area
    .width
    .saturating_sub(left_width)
    .saturating_sub(right_width);

  let line = Line::from(vec![
    left,
    Span::raw(" ".repeat(pad as usize)),
    right,
  ]);

  f.render_widget(
    Paragraph::new(line).style(Style::default().bg(Color::DarkGray)),
    area,
  );
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
  let (mode_label, hints) = match (&app.mode, app.screen) {
    (Mode::Filter, _) => ("SEARCH", "Type to filter  Esc cancel  Enter accept"),
    (Mode::EditCell { .. }, _) => ("EDIT", "Type  Enter save  Esc cancel"),
    (Mode::LinkPrompt { .. }, _) => {
      ("LINK", "Type the exact title  Enter link  Esc cancel")
    }
    (Mode::Normal, Screen::Sheet) => (
      "NORMAL",
      "↑↓/jk row  ←→/hl column  Enter edit  a add  d delete  c connect  / \
       search  Tab trees  q quit",
    ),
    (Mode::Normal, Screen::Explore) => match app.direction {
      TreeDirection::Reverse => {
        ("EXPLORE", "↑↓/jk scroll  r forward  Tab sheet  q quit")
      }
      TreeDirection::Forward => {
        ("EXPLORE", "↑↓/jk scroll  r reverse  Tab sheet  q quit")
      }
    },
  };

  let status = if app.status_msg.is_empty() {
    hints.to_string()
  } else {
    app.status_msg.clone()
  };

  let mode_span = Span::styled(
    format!(" {mode_label} "),
    Style::default()
      .fg(Color::Black)
      .bg(Color::Cyan)
      .add_modifier(Modifier::BOLD),
  );
  let hint_span = Span::styled(
    format!("  {status}"),
    Style::default().fg(Color::Gray),
  );

  let line = Line::from(vec![mode_span, hint_span]);
  f.render_widget(
    Paragraph::new(line).style(Style::default().bg(Color::Black)),
    area,
  );
}

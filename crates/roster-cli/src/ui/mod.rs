//! TUI rendering. Orchestrates all panes and popups.

pub mod form;
pub mod record_detail;
pub mod record_list;

use chrono::Local;
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph, Wrap},
};
use roster_core::list::LoadState;

use crate::app::{App, Focus};

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw(f: &mut Frame, app: &App) {
  let area = f.area();

  // Vertical stack: header, stats, body, status bar.
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Length(1), // stats
      Constraint::Min(0),    // body
      Constraint::Length(1), // status bar
    ])
    .split(area);

  draw_header(f, rows[0], app);

  if app.focus() == Focus::SignIn {
    draw_sign_in(f, rows[2], app);
  } else {
    draw_stats(f, rows[1], app);
    draw_body(f, rows[2], app);
  }

  draw_status(f, rows[3], app);

  // Popups, drawn over the body. The form wins over the confirmation.
  match app.focus() {
    Focus::Form => form::draw_form(f, area, app),
    Focus::DeleteConfirm => form::draw_delete_confirm(f, area, app),
    _ => {}
  }
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
  let date = Local::now().format("%d/%m/%Y").to_string();

  let who = match app.dashboard.gate().session() {
    Some(session) => format!("{}  {}", session.email, app.dashboard.role().label()),
    None => "signed out".to_string(),
  };

  let left = Span::styled(
    " roster  [/] search  [q] quit",
    Style::default()
      .fg(Color::White)
      .add_modifier(Modifier::BOLD),
  );
  let right = Span::styled(
    format!("{who}  {date} "),
    Style::default().fg(Color::Gray),
  );

  // Simple left-right header: pad the middle.
  let left_width = left.content.chars().count() as u16;
  let right_width = right.content.chars().count() as u16;
  let pad = area
    .width
    .saturating_sub(left_width)
    .saturating_sub(right_width);

  let line = Line::from(vec![
    left,
    Span::raw(" ".repeat(pad as usize)),
    right,
  ]);

  let block = Block::default().style(Style::default().bg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(Paragraph::new(line), inner);
}

// ─── Stats ────────────────────────────────────────────────────────────────────

fn draw_stats(f: &mut Frame, area: Rect, app: &App) {
  let stats = app.dashboard.list().stats();
  let line = Line::from(vec![
    Span::raw(" Total "),
    Span::styled(stats.total.to_string(), Style::default().add_modifier(Modifier::BOLD)),
    Span::raw("   Active "),
    Span::styled(stats.active.to_string(), Style::default().fg(Color::Green)),
    Span::raw("   Inactive "),
    Span::styled(stats.inactive.to_string(), Style::default().fg(Color::Red)),
  ]);
  f.render_widget(Paragraph::new(line), area);
}

// ─── Body ─────────────────────────────────────────────────────────────────────

fn draw_body(f: &mut Frame, area: Rect, app: &App) {
  let list = app.dashboard.list();
  if list.load_state() == LoadState::Loading && list.records().is_empty() {
    draw_placeholder(f, area, " Students ", "Loading…");
    return;
  }

  if app.dashboard.dialogs().is_details_open() {
    // Split into the table (55%) and the details pane (45%).
    let cols = Layout::default()
      .direction(Direction::Horizontal)
      .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
      .split(area);
    record_list::draw(f, cols[0], app);
    record_detail::draw(f, cols[1], app);
  } else {
    record_list::draw(f, area, app);
  }
}

fn draw_placeholder(f: &mut Frame, area: Rect, title: &str, text: &str) {
  let block = Block::default()
    .title(title.to_owned())
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(
    Paragraph::new(Line::from(vec![Span::styled(
      text.to_owned(),
      Style::default().fg(Color::DarkGray),
    )])),
    inner,
  );
}

// ─── Sign-in ──────────────────────────────────────────────────────────────────

fn draw_sign_in(f: &mut Frame, area: Rect, app: &App) {
  let block = Block::default()
    .title(" Sign in ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Yellow));
  let inner = block.inner(area);
  f.render_widget(block, area);

  let lines = vec![
    Line::from(format!("Signed out of {}.", app.client().base_url())),
    Line::from(""),
    Line::from(vec![
      Span::styled("Enter", Style::default().add_modifier(Modifier::BOLD)),
      Span::raw(" sign in again with the configured credentials   "),
      Span::styled("q", Style::default().add_modifier(Modifier::BOLD)),
      Span::raw(" quit"),
    ]),
  ];
  f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
  let (mode_label, hints) = match app.focus() {
    Focus::SignIn => ("SIGN IN", "Enter sign in  q quit"),
    Focus::Search => ("SEARCH", "Type to filter  Esc clear  Enter done"),
    Focus::List if app.dashboard.can_write() => (
      "NORMAL",
      "↑↓/jk navigate  / search  Enter details  a add  e edit  d delete  r refresh  s sign out",
    ),
    Focus::List => (
      "NORMAL",
      "↑↓/jk navigate  / search  Enter details  r refresh  s sign out  q quit",
    ),
    Focus::Details => ("DETAILS", "Esc close  e edit  d delete"),
    Focus::Form => ("FORM", "↑↓/Tab field  Space toggle status  Enter save  Esc cancel"),
    Focus::DeleteConfirm => ("DELETE", "y confirm  n cancel"),
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
    Style::default().fg(Color::DarkGray),
  );

  let line = Line::from(vec![mode_span, hint_span]);
  f.render_widget(
    Paragraph::new(line).style(Style::default().bg(Color::Black)),
    area,
  );
}

/// A rectangle of `width` x `height` centred in `area`, clamped to fit.
pub(crate) fn centered(area: Rect, width: u16, height: u16) -> Rect {
  let width = width.min(area.width);
  let height = height.min(area.height);
  Rect {
    x: area.x + (area.width - width) / 2,
    y: area.y + (area.height - height) / 2,
    width,
    height,
  }
}

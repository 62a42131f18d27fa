//! Modal popups: the create/edit form and the delete confirmation.

use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use roster_core::{dialog::FormMode, record::Field};

use super::centered;
use crate::app::App;

// ─── Form ─────────────────────────────────────────────────────────────────────

pub fn draw_form(f: &mut Frame, area: Rect, app: &App) {
  let dialogs = app.dashboard.dialogs();
  let title = match dialogs.form_mode() {
    FormMode::Create => " New student ".to_string(),
    FormMode::Edit => format!(
      " Edit {} ",
      dialogs.editing().map(|r| r.full_name.as_str()).unwrap_or_default()
    ),
  };

  // One line per field, a spacer, and room for the error.
  let height = Field::ALL.len() as u16 + 5;
  let popup = centered(area, 64, height);
  f.render_widget(Clear, popup);

  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Cyan));
  let inner = block.inner(popup);
  f.render_widget(block, popup);

  let draft = dialogs.draft();
  let cursor = app.form_field();

  let mut lines: Vec<Line> = Field::ALL
    .into_iter()
    .map(|field| {
      let focused = field == cursor;
      let label_style = if focused {
        Style::default()
          .fg(Color::Yellow)
          .add_modifier(Modifier::BOLD)
      } else {
        Style::default().fg(Color::Cyan)
      };
      let value = match field {
        Field::Status => format!("‹ {} ›", draft.get(field)),
        _ if focused => format!("{}_", draft.get(field)),
        _ => draft.get(field).to_owned(),
      };
      Line::from(vec![
        Span::styled(format!("{:<18}", field.label()), label_style),
        Span::raw(value),
      ])
    })
    .collect();

  lines.push(Line::from(""));
  if let Some(error) = dialogs.form_error() {
    lines.push(Line::from(Span::styled(
      error.to_owned(),
      Style::default().fg(Color::Red),
    )));
  } else if cursor == Field::BirthDate {
    lines.push(Line::from(Span::styled(
      "Format: YYYY-MM-DD",
      Style::default().fg(Color::DarkGray),
    )));
  }

  f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

// ─── Delete confirmation ──────────────────────────────────────────────────────

pub fn draw_delete_confirm(f: &mut Frame, area: Rect, app: &App) {
  let dialogs = app.dashboard.dialogs();
  let popup = centered(area, 56, 7);
  f.render_widget(Clear, popup);

  let block = Block::default()
    .title(" Delete student ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Red));
  let inner = block.inner(popup);
  f.render_widget(block, popup);

  let name = dialogs
    .target()
    .map(|r| format!("{} ({})", r.full_name, r.registration_number))
    .unwrap_or_default();

  let mut lines = vec![
    Line::from(format!("Delete {name}?")),
    Line::from(Span::styled(
      "This cannot be undone.",
      Style::default().fg(Color::DarkGray),
    )),
  ];
  if let Some(error) = dialogs.delete_error() {
    lines.push(Line::from(Span::styled(
      error.to_owned(),
      Style::default().fg(Color::Red),
    )));
  }
  lines.push(Line::from(vec![
    Span::styled("y", Style::default().add_modifier(Modifier::BOLD)),
    Span::raw(" delete   "),
    Span::styled("n", Style::default().add_modifier(Modifier::BOLD)),
    Span::raw(" cancel"),
  ]));

  f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

//! Student table, filtered by the search text.

use ratatui::{
  Frame,
  layout::{Constraint, Rect},
  style::{Color, Modifier, Style},
  text::Span,
  widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
};
use roster_core::record::Status;

use crate::app::{App, Focus};

/// Render the record table into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let list = app.dashboard.list();
  let view = list.view();
  let total = list.records().len();
  let searching = app.focus() == Focus::Search;

  // Title with count.
  let title = if searching || !list.filter().is_empty() {
    format!(" Students ({}/{}) ", view.len(), total)
  } else {
    format!(" Students ({total}) ")
  };

  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));

  let mut inner_area = block.inner(area);
  f.render_widget(block, area);

  // Search line at the bottom of the inner area.
  if (searching || !list.filter().is_empty()) && inner_area.height > 2 {
    let filter_area = Rect {
      x:      inner_area.x,
      y:      inner_area.y + inner_area.height - 1,
      width:  inner_area.width,
      height: 1,
    };
    inner_area.height = inner_area.height.saturating_sub(1);

    let filter_text = if searching {
      format!("/{}_", list.filter())
    } else {
      format!("/{}", list.filter())
    };
    f.render_widget(
      Paragraph::new(filter_text).style(Style::default().fg(Color::Yellow)),
      filter_area,
    );
  }

  if view.is_empty() {
    let text = match list.error() {
      Some(error) => Span::styled(error.to_owned(), Style::default().fg(Color::Red)),
      None if total == 0 => {
        Span::styled("No students yet.", Style::default().fg(Color::DarkGray))
      }
      None => Span::styled("No matches.", Style::default().fg(Color::DarkGray)),
    };
    f.render_widget(Paragraph::new(text), inner_area);
    return;
  }

  let header = Row::new(["Reg. no.", "Name", "Course", "E-mail", "Status"])
    .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));

  let rows: Vec<Row> = view
    .iter()
    .map(|record| {
      let status_style = match record.status {
        Status::Active => Style::default().fg(Color::Green),
        Status::Inactive => Style::default().fg(Color::Red),
      };
      Row::new(vec![
        Cell::from(record.registration_number.as_str()),
        Cell::from(record.full_name.as_str()),
        Cell::from(record.course.as_str()),
        Cell::from(record.email.as_str()),
        Cell::from(Span::styled(record.status.as_str(), status_style)),
      ])
    })
    .collect();

  // Scrollable table with cursor tracking.
  let mut state = TableState::default();
  state.select(Some(app.list_cursor.min(view.len() - 1)));

  f.render_stateful_widget(
    Table::new(rows, [
      Constraint::Length(12),
      Constraint::Percentage(30),
      Constraint::Percentage(25),
      Constraint::Percentage(30),
      Constraint::Length(8),
    ])
    .header(header)
    .row_highlight_style(
      Style::default()
        .bg(Color::Blue)
        .fg(Color::White)
        .add_modifier(Modifier::BOLD),
    ),
    inner_area,
    &mut state,
  );
}

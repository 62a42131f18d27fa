//! Details pane for the targeted record.

use chrono::{DateTime, Local, NaiveDate, Utc};
use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph, Wrap},
};
use roster_core::record::{Field, Record};

use crate::app::App;

// ─── Public entry ─────────────────────────────────────────────────────────────

/// Render the details pane into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let Some(record) = app.dashboard.dialogs().target() else {
    return;
  };

  let block = Block::default()
    .title(format!(" {} ", record.full_name))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Cyan));

  let inner = block.inner(area);
  f.render_widget(block, area);

  let mut lines: Vec<Line> = rows(record)
    .into_iter()
    .map(|(label, value)| labelled(label, value))
    .collect();

  lines.push(Line::from(""));
  lines.push(Line::from(Span::styled(
    format!("Created {}", format_timestamp(record.created_at)),
    Style::default().fg(Color::DarkGray),
  )));
  lines.push(Line::from(Span::styled(
    format!("Updated {}", format_timestamp(record.updated_at)),
    Style::default().fg(Color::DarkGray),
  )));

  f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

fn labelled(label: &str, value: String) -> Line<'static> {
  Line::from(vec![
    Span::styled(
      format!("{label:<18}"),
      Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD),
    ),
    Span::raw(value),
  ])
}

// ─── Formatting ───────────────────────────────────────────────────────────────

/// Every field of `record`, labelled, in form order.
fn rows(record: &Record) -> Vec<(&'static str, String)> {
  Field::ALL
    .into_iter()
    .map(|field| {
      let value = match field {
        Field::FullName => record.full_name.clone(),
        Field::BirthDate => format_date(record.birth_date),
        Field::Email => record.email.clone(),
        Field::Phone => record.phone.clone(),
        Field::Course => record.course.clone(),
        Field::RegistrationNumber => record.registration_number.clone(),
        Field::Status => record.status.as_str().to_owned(),
      };
      (field.label(), value)
    })
    .collect()
}

pub(crate) fn format_date(date: NaiveDate) -> String { date.format("%d/%m/%Y").to_string() }

/// Storage timestamps are shown in local time.
pub(crate) fn format_timestamp(at: DateTime<Utc>) -> String {
  at.with_timezone(&Local).format("%d/%m/%Y %H:%M").to_string()
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;
  use roster_core::record::Status;
  use uuid::Uuid;

  use super::*;

  #[test]
  fn birth_date_is_day_first() {
    let date = NaiveDate::from_ymd_opt(2000, 1, 31).unwrap();
    assert_eq!(format_date(date), "31/01/2000");
  }

  #[test]
  fn timestamp_has_minutes_but_no_seconds() {
    let at = Utc.with_ymd_and_hms(2024, 3, 5, 12, 0, 59).unwrap();
    let shown = format_timestamp(at);
    assert_eq!(shown.len(), "05/03/2024 12:00".len());
    assert_eq!(&shown[2..3], "/");
    assert_eq!(&shown[13..14], ":");
  }

  #[test]
  fn rows_follow_field_order() {
    let at = Utc::now();
    let record = Record {
      id:                  Uuid::new_v4(),
      full_name:           "Ana Silva".into(),
      birth_date:          NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(),
      email:               "ana@x.com".into(),
      phone:               "11999999999".into(),
      course:              "Engenharia".into(),
      registration_number: "2024001".into(),
      status:              Status::Inactive,
      created_at:          at,
      updated_at:          at,
    };
    let rows = rows(&record);
    let labels: Vec<_> = rows.iter().map(|(l, _)| *l).collect();
    assert_eq!(labels, Field::ALL.map(Field::label));
    assert_eq!(rows[1].1, "01/01/2000");
    assert_eq!(rows[6].1, "Inativo");
  }
}

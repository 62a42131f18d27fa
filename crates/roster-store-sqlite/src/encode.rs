//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings with a fixed microsecond
//! precision and a `Z` suffix, so lexical order equals chronological order.
//! Dates are stored as `YYYY-MM-DD`. UUIDs are stored as hyphenated lowercase
//! strings. Status uses its wire name.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use roster_core::{
  record::{Record, Status},
  session::Profile,
  store::{StoredSession, User},
  validate::DATE_FORMAT,
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── Dates and times ──────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

pub fn encode_date(d: NaiveDate) -> String { d.format(DATE_FORMAT).to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Status ───────────────────────────────────────────────────────────────────

pub fn decode_status(s: &str) -> Result<Status> {
  s.parse().map_err(|_| Error::Decode(format!("unknown status: {s:?}")))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching [`RawStudent::from_row`].
pub const STUDENT_COLUMNS: &str = "id, full_name, birth_date, email, phone, course, \
                                   registration_number, status, created_at, updated_at";

/// Raw strings read directly from a `students` row.
pub struct RawStudent {
  pub id:                  String,
  pub full_name:           String,
  pub birth_date:          String,
  pub email:               String,
  pub phone:               String,
  pub course:              String,
  pub registration_number: String,
  pub status:              String,
  pub created_at:          String,
  pub updated_at:          String,
}

impl RawStudent {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:                  row.get(0)?,
      full_name:           row.get(1)?,
      birth_date:          row.get(2)?,
      email:               row.get(3)?,
      phone:               row.get(4)?,
      course:              row.get(5)?,
      registration_number: row.get(6)?,
      status:              row.get(7)?,
      created_at:          row.get(8)?,
      updated_at:          row.get(9)?,
    })
  }

  pub fn into_record(self) -> Result<Record> {
    Ok(Record {
      id:                  decode_uuid(&self.id)?,
      full_name:           self.full_name,
      birth_date:          decode_date(&self.birth_date)?,
      email:               self.email,
      phone:               self.phone,
      course:              self.course,
      registration_number: self.registration_number,
      status:              decode_status(&self.status)?,
      created_at:          decode_dt(&self.created_at)?,
      updated_at:          decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw strings read directly from a `users` row.
pub struct RawUser {
  pub id:            String,
  pub email:         String,
  pub password_hash: String,
  pub created_at:    String,
}

impl RawUser {
  pub fn into_user(self) -> Result<User> {
    Ok(User {
      id:            decode_uuid(&self.id)?,
      email:         self.email,
      password_hash: self.password_hash,
      created_at:    decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `profiles` row.
pub struct RawProfile {
  pub id:   String,
  pub role: String,
}

impl RawProfile {
  pub fn into_profile(self) -> Result<Profile> {
    Ok(Profile { id: decode_uuid(&self.id)?, role: self.role })
  }
}

/// Raw strings read directly from a `sessions` row.
pub struct RawSession {
  pub token_digest: String,
  pub user_id:      String,
  pub created_at:   String,
  pub expires_at:   String,
}

impl RawSession {
  pub fn into_session(self) -> Result<StoredSession> {
    Ok(StoredSession {
      token_digest: self.token_digest,
      user_id:      decode_uuid(&self.user_id)?,
      created_at:   decode_dt(&self.created_at)?,
      expires_at:   decode_dt(&self.expires_at)?,
    })
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  #[test]
  fn timestamps_sort_lexically() {
    let earlier = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
    let later = earlier + chrono::Duration::microseconds(1);
    assert!(encode_dt(earlier) < encode_dt(later));
    assert_eq!(encode_dt(earlier), "2024-03-01T09:00:00.000000Z");
  }

  #[test]
  fn unknown_status_is_a_decode_error() {
    assert!(matches!(decode_status("Pendente"), Err(Error::Decode(_))));
    assert_eq!(decode_status("Inativo").unwrap(), Status::Inactive);
  }
}

//! Student records: the persisted shape, the validated candidate sent to the
//! gateway, and the free-text working copy edited in the form dialog.

use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Identifier assigned by the storage layer on creation.
pub type RecordId = Uuid;

// ─── Status ───────────────────────────────────────────────────────────────────

/// Enrolment status. Serialised with its Portuguese wire names.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
pub enum Status {
  #[default]
  #[serde(rename = "Ativo")]
  Active,
  #[serde(rename = "Inativo")]
  Inactive,
}

impl Status {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Active => "Ativo",
      Self::Inactive => "Inativo",
    }
  }

  pub fn is_active(self) -> bool { matches!(self, Self::Active) }

  /// The other value; used by the form's status selector.
  pub fn toggled(self) -> Self {
    match self {
      Self::Active => Self::Inactive,
      Self::Inactive => Self::Active,
    }
  }
}

impl fmt::Display for Status {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown status: {0:?}")]
pub struct ParseStatusError(pub String);

impl FromStr for Status {
  type Err = ParseStatusError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "Ativo" => Ok(Self::Active),
      "Inativo" => Ok(Self::Inactive),
      other => Err(ParseStatusError(other.to_owned())),
    }
  }
}

// ─── Fields ───────────────────────────────────────────────────────────────────

/// The user-editable fields, in the fixed order used for validation and for
/// the form layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
  FullName,
  BirthDate,
  Email,
  Phone,
  Course,
  RegistrationNumber,
  Status,
}

impl Field {
  pub const ALL: [Field; 7] = [
    Field::FullName,
    Field::BirthDate,
    Field::Email,
    Field::Phone,
    Field::Course,
    Field::RegistrationNumber,
    Field::Status,
  ];

  /// Column / JSON key name.
  pub fn name(self) -> &'static str {
    match self {
      Self::FullName => "full_name",
      Self::BirthDate => "birth_date",
      Self::Email => "email",
      Self::Phone => "phone",
      Self::Course => "course",
      Self::RegistrationNumber => "registration_number",
      Self::Status => "status",
    }
  }

  /// Human-readable label.
  pub fn label(self) -> &'static str {
    match self {
      Self::FullName => "Full name",
      Self::BirthDate => "Birth date",
      Self::Email => "E-mail",
      Self::Phone => "Phone",
      Self::Course => "Course",
      Self::RegistrationNumber => "Registration no.",
      Self::Status => "Status",
    }
  }
}

impl fmt::Display for Field {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

// ─── Record ───────────────────────────────────────────────────────────────────

/// A student as last confirmed by the storage layer.
///
/// `id`, `created_at` and `updated_at` are owned by storage and never written
/// by clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
  pub id:                  RecordId,
  pub full_name:           String,
  pub birth_date:          NaiveDate,
  pub email:               String,
  pub phone:               String,
  pub course:              String,
  pub registration_number: String,
  pub status:              Status,
  pub created_at:          DateTime<Utc>,
  pub updated_at:          DateTime<Utc>,
}

impl Record {
  /// The writable fields of this record.
  pub fn fields(&self) -> NewRecord {
    NewRecord {
      full_name:           self.full_name.clone(),
      birth_date:          self.birth_date,
      email:               self.email.clone(),
      phone:               self.phone.clone(),
      course:              self.course.clone(),
      registration_number: self.registration_number.clone(),
      status:              self.status,
    }
  }
}

/// A candidate that has passed the validator. This is the only shape the
/// gateway accepts for inserts and updates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRecord {
  pub full_name:           String,
  pub birth_date:          NaiveDate,
  pub email:               String,
  pub phone:               String,
  pub course:              String,
  pub registration_number: String,
  pub status:              Status,
}

impl NewRecord {
  /// Materialise a stored record. Used by storage backends.
  pub fn into_record(self, id: RecordId, at: DateTime<Utc>) -> Record {
    Record {
      id,
      full_name: self.full_name,
      birth_date: self.birth_date,
      email: self.email,
      phone: self.phone,
      course: self.course,
      registration_number: self.registration_number,
      status: self.status,
      created_at: at,
      updated_at: at,
    }
  }
}

// ─── Draft ────────────────────────────────────────────────────────────────────

/// The form's working copy: every field as free text, exactly as typed.
///
/// Deserialises from a [`NewRecord`]'s JSON, so the API can accept writes as
/// drafts and run them through the same validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordDraft {
  #[serde(default)]
  pub full_name:           String,
  #[serde(default)]
  pub birth_date:          String,
  #[serde(default)]
  pub email:               String,
  #[serde(default)]
  pub phone:               String,
  #[serde(default)]
  pub course:              String,
  #[serde(default)]
  pub registration_number: String,
  #[serde(default)]
  pub status:              String,
}

impl Default for RecordDraft {
  fn default() -> Self {
    Self {
      full_name:           String::new(),
      birth_date:          String::new(),
      email:               String::new(),
      phone:               String::new(),
      course:              String::new(),
      registration_number: String::new(),
      status:              Status::Active.as_str().to_owned(),
    }
  }
}

impl RecordDraft {
  pub fn get(&self, field: Field) -> &str {
    match field {
      Field::FullName => &self.full_name,
      Field::BirthDate => &self.birth_date,
      Field::Email => &self.email,
      Field::Phone => &self.phone,
      Field::Course => &self.course,
      Field::RegistrationNumber => &self.registration_number,
      Field::Status => &self.status,
    }
  }

  pub fn get_mut(&mut self, field: Field) -> &mut String {
    match field {
      Field::FullName => &mut self.full_name,
      Field::BirthDate => &mut self.birth_date,
      Field::Email => &mut self.email,
      Field::Phone => &mut self.phone,
      Field::Course => &mut self.course,
      Field::RegistrationNumber => &mut self.registration_number,
      Field::Status => &mut self.status,
    }
  }

  pub fn set(&mut self, field: Field, value: impl Into<String>) {
    *self.get_mut(field) = value.into();
  }
}

impl From<&NewRecord> for RecordDraft {
  fn from(r: &NewRecord) -> Self {
    Self {
      full_name:           r.full_name.clone(),
      birth_date:          r.birth_date.format("%Y-%m-%d").to_string(),
      email:               r.email.clone(),
      phone:               r.phone.clone(),
      course:              r.course.clone(),
      registration_number: r.registration_number.clone(),
      status:              r.status.as_str().to_owned(),
    }
  }
}

impl From<&Record> for RecordDraft {
  fn from(r: &Record) -> Self { Self::from(&r.fields()) }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn status_uses_portuguese_wire_names() {
    assert_eq!(serde_json::to_string(&Status::Active).unwrap(), "\"Ativo\"");
    assert_eq!(
      serde_json::from_str::<Status>("\"Inativo\"").unwrap(),
      Status::Inactive
    );
    assert!("Active".parse::<Status>().is_err());
  }

  #[test]
  fn draft_defaults_to_active() {
    let draft = RecordDraft::default();
    assert_eq!(draft.status, "Ativo");
    assert!(draft.full_name.is_empty());
  }

  #[test]
  fn draft_reads_new_record_json() {
    let fields = NewRecord {
      full_name:           "Ana Silva".into(),
      birth_date:          NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(),
      email:               "ana@x.com".into(),
      phone:               "11999999999".into(),
      course:              "Engenharia".into(),
      registration_number: "2024001".into(),
      status:              Status::Active,
    };
    let json = serde_json::to_string(&fields).unwrap();
    let draft: RecordDraft = serde_json::from_str(&json).unwrap();
    assert_eq!(draft, RecordDraft::from(&fields));
    assert_eq!(draft.birth_date, "2000-01-01");
  }
}

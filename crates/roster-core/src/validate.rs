//! The record validator.
//!
//! [`validate`] checks a [`RecordDraft`] field by field in [`Field::ALL`]
//! order and either returns the typed [`NewRecord`] or every violation found.
//! Each field reports at most one violation (the first rule it breaks), so the
//! first entry of [`Violations`] is deterministic.
//!
//! Lengths count Unicode scalar values. Input is not trimmed.

use std::{fmt, ops::RangeInclusive, sync::LazyLock};

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::record::{Field, NewRecord, RecordDraft, Status};

pub const FULL_NAME_LEN: RangeInclusive<usize> = 3..=100;
pub const EMAIL_MAX_LEN: usize = 255;
pub const PHONE_LEN: RangeInclusive<usize> = 10..=20;
pub const COURSE_LEN: RangeInclusive<usize> = 3..=100;
pub const REGISTRATION_NUMBER_LEN: RangeInclusive<usize> = 3..=50;

/// ISO calendar date, as produced by date inputs.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// ─── Violations ───────────────────────────────────────────────────────────────

/// The rule a field broke.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum Rule {
  Required,
  TooShort { min: usize },
  TooLong { max: usize },
  InvalidEmail,
  InvalidDate,
  InvalidStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
  pub field: Field,
  #[serde(flatten)]
  pub rule:  Rule,
}

impl fmt::Display for Violation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let label = self.field.label();
    match &self.rule {
      Rule::Required => write!(f, "{label} is required"),
      Rule::TooShort { min } => {
        write!(f, "{label} must have at least {min} characters")
      }
      Rule::TooLong { max } => {
        write!(f, "{label} must have at most {max} characters")
      }
      Rule::InvalidEmail => write!(f, "{label} is not a valid address"),
      Rule::InvalidDate => write!(f, "{label} must be a date (YYYY-MM-DD)"),
      Rule::InvalidStatus => write!(f, "{label} must be Ativo or Inativo"),
    }
  }
}

/// A non-empty, field-ordered list of violations. Only [`validate`] builds
/// one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Violations(Vec<Violation>);

impl Violations {
  /// The violation surfaced to the user.
  pub fn first(&self) -> &Violation {
    &self.0[0]
  }

  pub fn iter(&self) -> impl Iterator<Item = &Violation> { self.0.iter() }

  pub fn len(&self) -> usize { self.0.len() }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }

  pub fn fields(&self) -> Vec<Field> { self.0.iter().map(|v| v.field).collect() }
}

impl fmt::Display for Violations {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    self.first().fmt(f)
  }
}

// ─── Entry point ──────────────────────────────────────────────────────────────

/// Validate every field of `draft`.
pub fn validate(draft: &RecordDraft) -> Result<NewRecord, Violations> {
  let mut violations = Vec::new();
  let mut flag = |field: Field, rule: Option<Rule>| {
    if let Some(rule) = rule {
      violations.push(Violation { field, rule });
    }
  };

  flag(Field::FullName, check_len(&draft.full_name, &FULL_NAME_LEN));
  let birth_date = parse_date(&draft.birth_date);
  flag(Field::BirthDate, birth_date.as_ref().err().cloned());
  flag(Field::Email, check_email(&draft.email));
  flag(Field::Phone, check_len(&draft.phone, &PHONE_LEN));
  flag(Field::Course, check_len(&draft.course, &COURSE_LEN));
  flag(
    Field::RegistrationNumber,
    check_len(&draft.registration_number, &REGISTRATION_NUMBER_LEN),
  );
  let status = draft.status.parse::<Status>().map_err(|_| Rule::InvalidStatus);
  flag(Field::Status, status.as_ref().err().cloned());

  match (birth_date, status) {
    (Ok(birth_date), Ok(status)) if violations.is_empty() => Ok(NewRecord {
      full_name: draft.full_name.clone(),
      birth_date,
      email: draft.email.clone(),
      phone: draft.phone.clone(),
      course: draft.course.clone(),
      registration_number: draft.registration_number.clone(),
      status,
    }),
    _ => Err(Violations(violations)),
  }
}

// ─── Field rules ──────────────────────────────────────────────────────────────

fn check_len(value: &str, bounds: &RangeInclusive<usize>) -> Option<Rule> {
  let len = value.chars().count();
  if len < *bounds.start() {
    Some(Rule::TooShort { min: *bounds.start() })
  } else if len > *bounds.end() {
    Some(Rule::TooLong { max: *bounds.end() })
  } else {
    None
  }
}

fn parse_date(value: &str) -> Result<NaiveDate, Rule> {
  if value.is_empty() {
    return Err(Rule::Required);
  }
  NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| Rule::InvalidDate)
}

fn check_email(value: &str) -> Option<Rule> {
  static RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
      r"^[A-Za-z0-9_'+\-]+(\.[A-Za-z0-9_'+\-]+)*@([A-Za-z0-9]([A-Za-z0-9\-]*[A-Za-z0-9])?\.)+[A-Za-z]{2,}$",
    )
    .expect("valid regex")
  });

  if value.chars().count() > EMAIL_MAX_LEN {
    Some(Rule::TooLong { max: EMAIL_MAX_LEN })
  } else if !RE.is_match(value) {
    Some(Rule::InvalidEmail)
  } else {
    None
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn valid() -> RecordDraft {
    RecordDraft {
      full_name:           "Ana Silva".into(),
      birth_date:          "2000-01-01".into(),
      email:               "ana@x.com".into(),
      phone:               "11999999999".into(),
      course:              "Engenharia".into(),
      registration_number: "2024001".into(),
      status:              "Ativo".into(),
    }
  }

  fn rejected(draft: &RecordDraft) -> Violations {
    validate(draft).expect_err("draft should be rejected")
  }

  #[test]
  fn accepts_valid_draft() {
    let record = validate(&valid()).unwrap();
    assert_eq!(record.full_name, "Ana Silva");
    assert_eq!(record.birth_date, NaiveDate::from_ymd_opt(2000, 1, 1).unwrap());
    assert_eq!(record.status, Status::Active);
  }

  #[test]
  fn full_name_boundary() {
    let mut d = valid();
    d.full_name = "Al".into();
    assert_eq!(rejected(&d).first().rule, Rule::TooShort { min: 3 });
    d.full_name = "Ali".into();
    assert!(validate(&d).is_ok());
    d.full_name = "x".repeat(101);
    assert_eq!(rejected(&d).first().rule, Rule::TooLong { max: 100 });
  }

  #[test]
  fn course_boundary() {
    let mut d = valid();
    d.course = "TI".into();
    assert_eq!(rejected(&d).first().field, Field::Course);
    d.course = "ADS".into();
    assert!(validate(&d).is_ok());
  }

  #[test]
  fn registration_number_boundary() {
    let mut d = valid();
    d.registration_number = "12".into();
    assert_eq!(rejected(&d).first().field, Field::RegistrationNumber);
    d.registration_number = "123".into();
    assert!(validate(&d).is_ok());
    d.registration_number = "9".repeat(51);
    assert_eq!(rejected(&d).first().rule, Rule::TooLong { max: 50 });
  }

  #[test]
  fn phone_boundary() {
    let mut d = valid();
    d.phone = "119999999".into();
    assert_eq!(rejected(&d).first().field, Field::Phone);
    d.phone = "1199999999".into();
    assert!(validate(&d).is_ok());
    d.phone = "1".repeat(21);
    assert_eq!(rejected(&d).first().rule, Rule::TooLong { max: 20 });
  }

  #[test]
  fn lengths_count_characters_not_bytes() {
    let mut d = valid();
    d.full_name = "Zoë".into();
    assert!(validate(&d).is_ok());
  }

  #[test]
  fn email_format() {
    let mut d = valid();
    for bad in ["", "ana", "ana@", "@x.com", "ana@x", "ana silva@x.com", "a..b@x.com"] {
      d.email = bad.into();
      assert_eq!(rejected(&d).first().rule, Rule::InvalidEmail, "{bad:?}");
    }
    d.email = "ana.silva+turma@uni-x.edu.br".into();
    assert!(validate(&d).is_ok());
  }

  #[test]
  fn email_too_long() {
    let mut d = valid();
    d.email = format!("{}@x.com", "a".repeat(250));
    assert_eq!(rejected(&d).first().rule, Rule::TooLong { max: 255 });
  }

  #[test]
  fn birth_date_required_and_iso() {
    let mut d = valid();
    d.birth_date = String::new();
    assert_eq!(rejected(&d).first().rule, Rule::Required);
    d.birth_date = "01/01/2000".into();
    assert_eq!(rejected(&d).first().rule, Rule::InvalidDate);
    d.birth_date = "2000-02-30".into();
    assert_eq!(rejected(&d).first().rule, Rule::InvalidDate);
  }

  #[test]
  fn status_outside_enumeration_is_rejected() {
    let mut d = valid();
    d.status = "Suspenso".into();
    assert_eq!(rejected(&d).first().rule, Rule::InvalidStatus);
  }

  /// All violations are reported, in field order; only the first is shown.
  #[test]
  fn reports_all_violations_in_field_order() {
    let d = RecordDraft {
      status: "x".into(),
      ..RecordDraft::default()
    };
    let v = rejected(&d);
    assert_eq!(v.fields(), Field::ALL.to_vec());
    assert_eq!(v.first().field, Field::FullName);
    assert_eq!(v.to_string(), "Full name must have at least 3 characters");
  }

  #[test]
  fn first_violation_follows_field_order_not_severity() {
    let mut d = valid();
    d.status = "?".into();
    d.phone = "1".into();
    let v = rejected(&d);
    assert_eq!(v.fields(), vec![Field::Phone, Field::Status]);
  }
}

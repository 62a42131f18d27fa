//! Error type for `roster-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A stored value outside its column's enumeration.
  #[error("corrupt column value: {0}")]
  Decode(String),

  #[error("a user with email {0:?} already exists")]
  EmailTaken(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

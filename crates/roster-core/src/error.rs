//! Error types for `roster-core`.

use thiserror::Error;

use crate::{
  dialog::Dialog,
  gate::Action,
  gateway::GatewayError,
  validate::Violations,
};

#[derive(Debug, Error)]
pub enum Error {
  /// Raised locally before any network call.
  #[error("{0}")]
  Validation(Violations),

  /// Any gateway failure, authorization denials included.
  #[error("{0}")]
  Transport(String),

  /// The session ended underneath us; all in-memory state is discarded.
  #[error("session expired")]
  SessionExpired,

  #[error("{0} requires the admin role")]
  PermissionDenied(Action),

  #[error("no record is targeted")]
  NoTarget,

  #[error("the {0} dialog is not open")]
  DialogClosed(Dialog),
}

impl From<GatewayError> for Error {
  fn from(e: GatewayError) -> Self {
    match e {
      GatewayError::Transport(message) => Self::Transport(message),
      GatewayError::SessionExpired => Self::SessionExpired,
    }
  }
}

impl From<Violations> for Error {
  fn from(v: Violations) -> Self { Self::Validation(v) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

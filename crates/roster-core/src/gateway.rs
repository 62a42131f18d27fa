//! The client-side contract with the remote storage/auth service.
//!
//! [`RecordGateway`] covers the four record operations and [`AuthProvider`]
//! the session calls plus the profile lookup. Implementations live outside
//! this crate (`roster-cli` talks HTTP); the controllers only see these traits.
//!
//! Failures collapse into [`GatewayError`]. Authorization denials are reported
//! as [`GatewayError::Transport`] like any other backend failure; only a
//! session the service no longer recognises is reported separately.

use std::{future::Future, sync::Arc};

use thiserror::Error;
use uuid::Uuid;

use crate::{
  record::{NewRecord, Record, RecordId},
  session::{Role, Session},
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
  #[error("{0}")]
  Transport(String),

  #[error("session expired")]
  SessionExpired,
}

// ─── Traits ───────────────────────────────────────────────────────────────────

/// Record operations against the remote store.
///
/// None of these are idempotent except deleting a record that is already
/// gone, which succeeds as a no-op.
pub trait RecordGateway: Send + Sync {
  /// All records, newest-created first.
  fn list_records(
    &self,
  ) -> impl Future<Output = Result<Vec<Record>, GatewayError>> + Send + '_;

  /// Insert a record; storage assigns `id` and timestamps.
  fn insert_record(
    &self,
    candidate: NewRecord,
  ) -> impl Future<Output = Result<Record, GatewayError>> + Send + '_;

  fn update_record(
    &self,
    id: RecordId,
    candidate: NewRecord,
  ) -> impl Future<Output = Result<(), GatewayError>> + Send + '_;

  fn delete_record(
    &self,
    id: RecordId,
  ) -> impl Future<Output = Result<(), GatewayError>> + Send + '_;
}

/// Session calls and the role lookup.
pub trait AuthProvider: Send + Sync {
  /// The current session, or `None` when signed out or expired.
  fn get_session(
    &self,
  ) -> impl Future<Output = Result<Option<Session>, GatewayError>> + Send + '_;

  /// End the current session. Idempotent.
  fn sign_out(&self) -> impl Future<Output = Result<(), GatewayError>> + Send + '_;

  /// Look up the role on the profile keyed by `user_id`.
  fn fetch_role(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Role, GatewayError>> + Send + '_;
}

// ─── Shared handles ───────────────────────────────────────────────────────────

impl<T: RecordGateway> RecordGateway for Arc<T> {
  fn list_records(
    &self,
  ) -> impl Future<Output = Result<Vec<Record>, GatewayError>> + Send + '_ {
    (**self).list_records()
  }

  fn insert_record(
    &self,
    candidate: NewRecord,
  ) -> impl Future<Output = Result<Record, GatewayError>> + Send + '_ {
    (**self).insert_record(candidate)
  }

  fn update_record(
    &self,
    id: RecordId,
    candidate: NewRecord,
  ) -> impl Future<Output = Result<(), GatewayError>> + Send + '_ {
    (**self).update_record(id, candidate)
  }

  fn delete_record(
    &self,
    id: RecordId,
  ) -> impl Future<Output = Result<(), GatewayError>> + Send + '_ {
    (**self).delete_record(id)
  }
}

impl<T: AuthProvider> AuthProvider for Arc<T> {
  fn get_session(
    &self,
  ) -> impl Future<Output = Result<Option<Session>, GatewayError>> + Send + '_ {
    (**self).get_session()
  }

  fn sign_out(&self) -> impl Future<Output = Result<(), GatewayError>> + Send + '_ {
    (**self).sign_out()
  }

  fn fetch_role(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Role, GatewayError>> + Send + '_ {
    (**self).fetch_role(user_id)
  }
}

//! The `RosterStore` trait: server-side persistence for students, users,
//! profiles and sessions.
//!
//! Implemented by storage backends (`roster-store-sqlite`). The HTTP layer
//! (`roster-api`) depends on this abstraction, not on any concrete backend.
//! Clients never see it; they talk to the API through
//! [`RecordGateway`](crate::gateway::RecordGateway).

use std::future::Future;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  record::{NewRecord, Record, RecordId},
  session::Profile,
};

// ─── Supporting types ────────────────────────────────────────────────────────

/// A sign-in identity. Every user has exactly one [`Profile`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
  pub id:            Uuid,
  pub email:         String,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub password_hash: String,
  pub created_at:    DateTime<Utc>,
}

/// A session as persisted. The bearer token itself is never stored, only its
/// digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredSession {
  pub token_digest: String,
  pub user_id:      Uuid,
  pub created_at:   DateTime<Utc>,
  pub expires_at:   DateTime<Utc>,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a roster storage backend.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait RosterStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Students ──────────────────────────────────────────────────────────

  /// All students, newest-created first.
  fn list_students(
    &self,
  ) -> impl Future<Output = Result<Vec<Record>, Self::Error>> + Send + '_;

  fn get_student(
    &self,
    id: RecordId,
  ) -> impl Future<Output = Result<Option<Record>, Self::Error>> + Send + '_;

  /// Persist a new student. The store assigns `id`, `created_at` and
  /// `updated_at`.
  fn insert_student(
    &self,
    student: NewRecord,
  ) -> impl Future<Output = Result<Record, Self::Error>> + Send + '_;

  /// Overwrite every writable field and bump `updated_at`. `None` if `id` does
  /// not exist.
  fn update_student(
    &self,
    id: RecordId,
    student: NewRecord,
  ) -> impl Future<Output = Result<Option<Record>, Self::Error>> + Send + '_;

  /// Remove a student. Returns whether a row was removed; a missing id is not
  /// an error.
  fn delete_student(
    &self,
    id: RecordId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Users and profiles ────────────────────────────────────────────────

  /// Create a user and its profile in one step. Errors if the email is taken.
  fn create_user(
    &self,
    email: String,
    password_hash: String,
    role: String,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  fn get_user(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  fn find_user_by_email(
    &self,
    email: String,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  fn get_profile(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Option<Profile>, Self::Error>> + Send + '_;

  // ── Sessions ──────────────────────────────────────────────────────────

  fn create_session(
    &self,
    token_digest: String,
    user_id: Uuid,
    expires_at: DateTime<Utc>,
  ) -> impl Future<Output = Result<StoredSession, Self::Error>> + Send + '_;

  /// Look up a session by token digest. Sessions past `expires_at` are
  /// reported as absent.
  fn get_session(
    &self,
    token_digest: String,
  ) -> impl Future<Output = Result<Option<StoredSession>, Self::Error>> + Send + '_;

  /// Remove a session. Removing an unknown session is not an error.
  fn delete_session(
    &self,
    token_digest: String,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}

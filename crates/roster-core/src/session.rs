//! Authenticated sessions and the role attached to them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An authenticated session issued by the auth provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
  pub access_token: String,
  pub user_id:      Uuid,
  pub email:        String,
  pub expires_at:   DateTime<Utc>,
}

impl Session {
  pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool { now >= self.expires_at }

  /// Whether `other` is the same session (same token for the same user).
  pub fn same_as(&self, other: &Session) -> bool {
    self.user_id == other.user_id && self.access_token == other.access_token
  }
}

/// The single-row profile keyed by user id. `role` is free text; only the
/// exact value `"admin"` grants write access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
  pub id:   Uuid,
  pub role: String,
}

impl Profile {
  pub fn role(&self) -> Role { Role::from_profile(&self.role) }
}

/// The caller's privilege level.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  Admin,
  /// Anything that is not exactly `admin`, including an unresolved role.
  #[default]
  Member,
}

impl Role {
  pub fn from_profile(role: &str) -> Self {
    if role == "admin" { Self::Admin } else { Self::Member }
  }

  pub fn as_str(self) -> &'static str {
    match self {
      Self::Admin => "admin",
      Self::Member => "member",
    }
  }

  pub fn is_admin(self) -> bool { matches!(self, Self::Admin) }

  /// Shown in the dashboard header.
  pub fn label(self) -> &'static str {
    match self {
      Self::Admin => "Administrador",
      Self::Member => "Usuário",
    }
  }
}

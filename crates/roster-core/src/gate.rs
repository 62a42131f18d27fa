//! Session/role gate.
//!
//! Tracks `Unauthenticated → Authenticated` and the role resolved for the
//! current session. The role is looked up once per session and is never
//! refreshed mid-session. Lookup failures resolve to [`Role::Member`]: when
//! the privilege check cannot complete, write actions stay hidden. The server
//! enforces the same rule independently, so this gate only decides what the
//! dashboard offers.

use std::fmt;

use chrono::Utc;
use tracing::{info, warn};

use crate::{
  Error, Result,
  gateway::{AuthProvider, GatewayError},
  session::{Role, Session},
};

// ─── Actions ──────────────────────────────────────────────────────────────────

/// A write action gated on the admin role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
  Create,
  Edit,
  Delete,
}

impl fmt::Display for Action {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Self::Create => "creating a record",
      Self::Edit => "editing a record",
      Self::Delete => "deleting a record",
    })
  }
}

/// Refuse `action` unless `role` is admin.
pub fn authorize(role: Role, action: Action) -> Result<()> {
  if role.is_admin() {
    Ok(())
  } else {
    Err(Error::PermissionDenied(action))
  }
}

// ─── State ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthState {
  #[default]
  Unauthenticated,
  Authenticated { session: Session, role: Role },
}

/// Notifications from the auth provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
  SignedIn(Session),
  SignedOut,
  SessionExpired,
}

#[derive(Debug, Default)]
pub struct SessionGate {
  state: AuthState,
}

impl SessionGate {
  pub fn new() -> Self { Self::default() }

  pub fn state(&self) -> &AuthState { &self.state }

  pub fn is_authenticated(&self) -> bool {
    matches!(self.state, AuthState::Authenticated { .. })
  }

  pub fn session(&self) -> Option<&Session> {
    match &self.state {
      AuthState::Authenticated { session, .. } => Some(session),
      AuthState::Unauthenticated => None,
    }
  }

  /// The resolved role; [`Role::Member`] while unauthenticated.
  pub fn role(&self) -> Role {
    match &self.state {
      AuthState::Authenticated { role, .. } => *role,
      AuthState::Unauthenticated => Role::Member,
    }
  }

  // ── Transitions ───────────────────────────────────────────────────────────

  /// Ask the provider for the current session and resolve its role.
  ///
  /// Returns whether the gate ended up authenticated. A provider that reports
  /// an expired session leaves the gate unauthenticated without error.
  pub async fn establish<A: AuthProvider>(&mut self, auth: &A) -> Result<bool> {
    match auth.get_session().await {
      Ok(Some(session)) => {
        self.enter(auth, session).await;
        Ok(self.is_authenticated())
      }
      Ok(None) | Err(GatewayError::SessionExpired) => {
        self.leave("no session");
        Ok(false)
      }
      Err(e) => {
        self.leave("session lookup failed");
        Err(e.into())
      }
    }
  }

  /// Apply a provider notification. Returns whether the gate is authenticated
  /// afterwards.
  pub async fn handle_event<A: AuthProvider>(
    &mut self,
    auth: &A,
    event: AuthEvent,
  ) -> bool {
    match event {
      AuthEvent::SignedIn(session) => {
        self.enter(auth, session).await;
        self.is_authenticated()
      }
      AuthEvent::SignedOut => {
        self.leave("signed out");
        false
      }
      AuthEvent::SessionExpired => {
        self.expire();
        false
      }
    }
  }

  /// End the session with the provider. The gate is unauthenticated
  /// afterwards even if the provider call fails.
  pub async fn sign_out<A: AuthProvider>(&mut self, auth: &A) -> Result<()> {
    let result = auth.sign_out().await;
    self.leave("signed out");
    match result {
      Ok(()) | Err(GatewayError::SessionExpired) => Ok(()),
      Err(e) => {
        warn!(error = %e, "sign-out call failed; local session dropped anyway");
        Err(e.into())
      }
    }
  }

  pub fn expire(&mut self) { self.leave("session expired"); }

  async fn enter<A: AuthProvider>(&mut self, auth: &A, session: Session) {
    if let AuthState::Authenticated { session: current, .. } = &self.state
      && current.same_as(&session)
    {
      return;
    }
    if session.is_expired_at(Utc::now()) {
      self.leave("session already expired");
      return;
    }

    // Nothing from a previous session survives into the lookup.
    self.state = AuthState::Unauthenticated;
    let role = resolve_role(auth, &session).await;
    info!(user_id = %session.user_id, role = role.as_str(), "session established");
    self.state = AuthState::Authenticated { session, role };
  }

  fn leave(&mut self, reason: &str) {
    if self.is_authenticated() {
      info!(reason, "session ended");
    }
    self.state = AuthState::Unauthenticated;
  }
}

async fn resolve_role<A: AuthProvider>(auth: &A, session: &Session) -> Role {
  match auth.fetch_role(session.user_id).await {
    Ok(role) => role,
    Err(e) => {
      warn!(user_id = %session.user_id, error = %e, "role lookup failed; treating as member");
      Role::Member
    }
  }
}

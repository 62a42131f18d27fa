//! JSON API for the student roster.
//!
//! Exposes an axum [`Router`] backed by any [`RosterStore`]: bearer-token
//! sessions, the profile role lookup, and CRUD over student records. Every
//! `/students` route needs a live session; writes additionally need the
//! `admin` role, checked here regardless of what the client shows.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = roster_api::api_router(state).layer(TraceLayer::new_for_http());
//! ```

pub mod auth;
pub mod error;
pub mod profiles;
pub mod session;
pub mod students;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{get, post},
};
use roster_core::store::RosterStore;
use serde::Deserialize;

pub use error::ApiError;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `ROSTER_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:             String,
  #[serde(default = "default_port")]
  pub port:             u16,
  #[serde(default = "default_store_path")]
  pub store_path:       PathBuf,
  /// Lifetime of a session issued at sign-in.
  #[serde(default = "default_session_ttl")]
  pub session_ttl_secs: i64,
}

fn default_host() -> String { "127.0.0.1".into() }

fn default_port() -> u16 { 5232 }

fn default_store_path() -> PathBuf { PathBuf::from("~/.local/share/roster/roster.db") }

fn default_session_ttl() -> i64 { 60 * 60 * 12 }

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S> {
  pub store:  Arc<S>,
  pub config: Arc<ServerConfig>,
}

// Manual impl: `S` itself need not be `Clone`.
impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self { store: self.store.clone(), config: self.config.clone() }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the API router, mounted under `/api`.
pub fn api_router<S>(state: AppState<S>) -> Router
where
  S: RosterStore + 'static,
{
  let api = Router::new()
    // Auth
    .route("/auth/sign-in", post(session::sign_in::<S>))
    .route("/auth/session", get(session::current::<S>))
    .route("/auth/sign-out", post(session::sign_out::<S>))
    // Profiles
    .route("/profiles/{user_id}", get(profiles::get_one::<S>))
    // Students
    .route("/students", get(students::list::<S>).post(students::create::<S>))
    .route(
      "/students/{id}",
      axum::routing::patch(students::update::<S>).delete(students::delete::<S>),
    );

  Router::new().nest("/api", api).with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────

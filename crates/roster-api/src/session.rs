//! Handlers for `/auth` endpoints.
//!
//! | Method | Path             | Notes |
//! |--------|------------------|-------|
//! | `POST` | `/auth/sign-in`  | HTTP Basic credentials; returns a session |
//! | `GET`  | `/auth/session`  | The bearer's session; 401 if none |
//! | `POST` | `/auth/sign-out` | 204; idempotent |

use axum::{
  Json,
  extract::State,
  http::{HeaderMap, StatusCode},
};
use chrono::{Duration, Utc};
use roster_core::{session::Session, store::RosterStore};
use tracing::{info, warn};

use crate::{
  AppState,
  auth::{Caller, basic_credentials, bearer_token, generate_token, token_digest, verify_password},
  error::ApiError,
};

/// `POST /auth/sign-in`
pub async fn sign_in<S>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
) -> Result<Json<Session>, ApiError>
where
  S: RosterStore + 'static,
{
  let (email, password) = basic_credentials(&headers)?;
  let user = state
    .store
    .find_user_by_email(email.clone())
    .await
    .map_err(ApiError::store)?;

  let Some(user) = user.filter(|u| verify_password(&password, &u.password_hash)) else {
    warn!(%email, "sign-in rejected");
    return Err(ApiError::Unauthorized);
  };

  let token = generate_token();
  let expires_at = Utc::now() + Duration::seconds(state.config.session_ttl_secs);
  let stored = state
    .store
    .create_session(token_digest(&token), user.id, expires_at)
    .await
    .map_err(ApiError::store)?;

  info!(user_id = %user.id, "signed in");
  Ok(Json(Session {
    access_token: token,
    user_id:      user.id,
    email:        user.email,
    expires_at:   stored.expires_at,
  }))
}

/// `GET /auth/session`
pub async fn current<S>(
  State(state): State<AppState<S>>,
  caller: Caller,
) -> Result<Json<Session>, ApiError>
where
  S: RosterStore + 'static,
{
  // A session whose user vanished is no session.
  let user = state
    .store
    .get_user(caller.user_id)
    .await
    .map_err(ApiError::store)?
    .ok_or(ApiError::Unauthorized)?;

  Ok(Json(Session {
    access_token: caller.token,
    user_id:      user.id,
    email:        user.email,
    expires_at:   caller.expires_at,
  }))
}

/// `POST /auth/sign-out`
pub async fn sign_out<S>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
) -> Result<StatusCode, ApiError>
where
  S: RosterStore + 'static,
{
  if let Some(token) = bearer_token(&headers) {
    state
      .store
      .delete_session(token_digest(token))
      .await
      .map_err(ApiError::store)?;
    info!("signed out");
  }
  Ok(StatusCode::NO_CONTENT)
}

//! Credentials, bearer tokens and the request extractors that enforce them.
//!
//! Sign-in takes HTTP Basic credentials and hands back an opaque bearer token.
//! Only the token's SHA-256 digest is stored, so a leaked database does not
//! leak live sessions. [`Caller`] requires a live session; [`Admin`]
//! additionally requires the caller's profile role to be exactly `admin`.

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString,
};
use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, header, request::Parts},
};
use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
use chrono::{DateTime, Utc};
use rand_core::{OsRng, RngCore as _};
use roster_core::{session::Role, store::RosterStore};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::{AppState, error::ApiError};

/// Random bytes per bearer token.
const TOKEN_BYTES: usize = 32;

// ─── Passwords ───────────────────────────────────────────────────────────────

/// Hash `password` into an argon2 PHC string.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
  let salt = SaltString::generate(&mut OsRng);
  Ok(Argon2::default().hash_password(password.as_bytes(), &salt)?.to_string())
}

/// Whether `password` matches the PHC string `hash`. A malformed hash never
/// matches.
pub fn verify_password(password: &str, hash: &str) -> bool {
  PasswordHash::new(hash)
    .map(|parsed| {
      Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
    })
    .unwrap_or(false)
}

/// Decode `Authorization: Basic …` into `(email, password)`.
pub fn basic_credentials(headers: &HeaderMap) -> Result<(String, String), ApiError> {
  let encoded = headers
    .get(header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .and_then(|v| v.strip_prefix("Basic "))
    .ok_or(ApiError::Unauthorized)?;

  let decoded = B64.decode(encoded).map_err(|_| ApiError::Unauthorized)?;
  let creds = String::from_utf8(decoded).map_err(|_| ApiError::Unauthorized)?;
  let (email, password) = creds.split_once(':').ok_or(ApiError::Unauthorized)?;
  Ok((email.to_owned(), password.to_owned()))
}

// ─── Tokens ──────────────────────────────────────────────────────────────────

/// A fresh random bearer token, hex-encoded.
pub fn generate_token() -> String {
  let mut bytes = [0u8; TOKEN_BYTES];
  OsRng.fill_bytes(&mut bytes);
  hex::encode(bytes)
}

/// The digest under which a token's session is stored.
pub fn token_digest(token: &str) -> String {
  hex::encode(Sha256::digest(token.as_bytes()))
}

/// The token from `Authorization: Bearer …`, if present.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
  headers
    .get(header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .and_then(|v| v.strip_prefix("Bearer "))
    .map(str::trim)
    .filter(|t| !t.is_empty())
}

// ─── Extractors ──────────────────────────────────────────────────────────────

/// The authenticated caller behind a request.
#[derive(Debug, Clone)]
pub struct Caller {
  pub user_id:    Uuid,
  pub token:      String,
  pub expires_at: DateTime<Utc>,
}

impl<S> FromRequestParts<AppState<S>> for Caller
where
  S: RosterStore + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let token = bearer_token(&parts.headers).ok_or(ApiError::Unauthorized)?;
    let session = state
      .store
      .get_session(token_digest(token))
      .await
      .map_err(ApiError::store)?
      .ok_or(ApiError::Unauthorized)?;

    Ok(Caller {
      user_id:    session.user_id,
      token:      token.to_owned(),
      expires_at: session.expires_at,
    })
  }
}

/// A caller whose profile role is `admin`.
#[derive(Debug, Clone)]
pub struct Admin(pub Caller);

impl<S> FromRequestParts<AppState<S>> for Admin
where
  S: RosterStore + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let caller = Caller::from_request_parts(parts, state).await?;
    let role = state
      .store
      .get_profile(caller.user_id)
      .await
      .map_err(ApiError::store)?
      .map(|p| p.role())
      .unwrap_or_default();

    if role != Role::Admin {
      tracing::warn!(user_id = %caller.user_id, "write refused; caller is not admin");
      return Err(ApiError::Forbidden("admin role required".into()));
    }
    Ok(Admin(caller))
  }
}

#[cfg(test)]
mod tests {
  use axum::http::{HeaderValue, Request};

  use super::*;

  fn headers(value: &str) -> HeaderMap {
    let mut h = HeaderMap::new();
    h.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
    h
  }

  #[test]
  fn password_round_trip() {
    let hash = hash_password("secret").unwrap();
    assert!(verify_password("secret", &hash));
    assert!(!verify_password("wrong", &hash));
    assert!(!verify_password("secret", "not-a-phc-string"));
  }

  #[test]
  fn basic_credentials_decode() {
    let h = headers(&format!("Basic {}", B64.encode("ana@x.com:p:w")));
    let (email, password) = basic_credentials(&h).unwrap();
    assert_eq!(email, "ana@x.com");
    // Only the first colon separates.
    assert_eq!(password, "p:w");
  }

  #[test]
  fn malformed_basic_is_unauthorized() {
    assert!(matches!(
      basic_credentials(&headers("Basic !!!not-base64!!!")),
      Err(ApiError::Unauthorized)
    ));
    assert!(matches!(
      basic_credentials(&headers(&format!("Basic {}", B64.encode("no-colon")))),
      Err(ApiError::Unauthorized)
    ));
    assert!(matches!(basic_credentials(&HeaderMap::new()), Err(ApiError::Unauthorized)));
  }

  #[test]
  fn tokens_are_unique_and_digest_is_stable() {
    let a = generate_token();
    let b = generate_token();
    assert_ne!(a, b);
    assert_eq!(a.len(), TOKEN_BYTES * 2);
    assert_eq!(token_digest(&a), token_digest(&a));
    assert_ne!(token_digest(&a), a);
  }

  #[test]
  fn bearer_token_requires_scheme() {
    assert_eq!(bearer_token(&headers("Bearer abc")), Some("abc"));
    assert_eq!(bearer_token(&headers("Basic abc")), None);
    assert_eq!(bearer_token(&headers("Bearer ")), None);
    let req = Request::builder().body(()).unwrap();
    assert_eq!(bearer_token(req.headers()), None);
  }
}

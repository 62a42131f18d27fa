//! Async HTTP client wrapping the roster JSON API.
//!
//! Implements [`RecordGateway`] and [`AuthProvider`] so the dashboard can run
//! against the server. A 401 on any authenticated call means the session is
//! gone and surfaces as [`GatewayError::SessionExpired`]; every other failure
//! is a [`GatewayError::Transport`] carrying the server's message.

use std::{sync::RwLock, time::Duration};

use anyhow::Context;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use roster_core::{
  gateway::{AuthProvider, GatewayError, RecordGateway},
  record::{NewRecord, Record, RecordId},
  session::{Profile, Role, Session},
};
use serde::de::DeserializeOwned;
use tracing::{debug, info};
use uuid::Uuid;

/// Connection settings for the roster API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
  pub email:    String,
  pub password: String,
}

/// Async HTTP client for the roster JSON API.
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
  /// Bearer token of the current session, if signed in.
  token:  RwLock<Option<String>>,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> anyhow::Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config, token: RwLock::new(None) })
  }

  pub fn base_url(&self) -> &str { &self.config.base_url }

  fn url(&self, path: &str) -> String {
    format!(
      "{}/api{}",
      self.config.base_url.trim_end_matches('/'),
      path
    )
  }

  fn token(&self) -> Option<String> {
    self.token.read().ok().and_then(|t| t.clone())
  }

  fn set_token(&self, token: Option<String>) {
    if let Ok(mut slot) = self.token.write() {
      *slot = token;
    }
  }

  fn auth(&self, req: RequestBuilder) -> RequestBuilder {
    match self.token() {
      Some(token) => req.bearer_auth(token),
      None => req,
    }
  }

  /// Send `req`, mapping every non-success status to a [`GatewayError`].
  async fn send(&self, what: &str, req: RequestBuilder) -> Result<Response, GatewayError> {
    debug!(what, "request");
    let resp = self
      .auth(req)
      .send()
      .await
      .map_err(|e| GatewayError::Transport(format!("{what} failed: {e}")))?;

    let status = resp.status();
    if status.is_success() {
      return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(status_error(what, status, &body))
  }

  async fn json<T: DeserializeOwned>(what: &str, resp: Response) -> Result<T, GatewayError> {
    resp
      .json()
      .await
      .map_err(|e| GatewayError::Transport(format!("{what}: bad response: {e}")))
  }

  // ── Sign-in ───────────────────────────────────────────────────────────────

  /// `POST /api/auth/sign-in` with the configured credentials.
  pub async fn sign_in(&self) -> Result<Session, GatewayError> {
    let req = self
      .client
      .post(self.url("/auth/sign-in"))
      .basic_auth(&self.config.email, Some(&self.config.password));
    // Credentials, not a session, are being checked here.
    let resp = req
      .send()
      .await
      .map_err(|e| GatewayError::Transport(format!("sign-in failed: {e}")))?;

    if resp.status() == StatusCode::UNAUTHORIZED {
      return Err(GatewayError::Transport("invalid email or password".into()));
    }
    if !resp.status().is_success() {
      let status = resp.status();
      let body = resp.text().await.unwrap_or_default();
      return Err(status_error("sign-in", status, &body));
    }

    let session: Session = Self::json("sign-in", resp).await?;
    self.set_token(Some(session.access_token.clone()));
    info!(user_id = %session.user_id, "signed in");
    Ok(session)
  }
}

/// Map a failed response to a gateway error. The server's `{"error": …}`
/// message is preferred over the bare status.
fn status_error(what: &str, status: StatusCode, body: &str) -> GatewayError {
  if status == StatusCode::UNAUTHORIZED {
    return GatewayError::SessionExpired;
  }
  let message = serde_json::from_str::<serde_json::Value>(body)
    .ok()
    .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_owned))
    .unwrap_or_else(|| status.to_string());
  GatewayError::Transport(format!("{what} → {}: {message}", status.as_u16()))
}

// ─── Gateway impls ────────────────────────────────────────────────────────────

impl RecordGateway for ApiClient {
  async fn list_records(&self) -> Result<Vec<Record>, GatewayError> {
    let resp = self
      .send("GET /students", self.client.get(self.url("/students")))
      .await?;
    Self::json("GET /students", resp).await
  }

  async fn insert_record(&self, candidate: NewRecord) -> Result<Record, GatewayError> {
    let req = self.client.post(self.url("/students")).json(&candidate);
    let resp = self.send("POST /students", req).await?;
    Self::json("POST /students", resp).await
  }

  async fn update_record(
    &self,
    id: RecordId,
    candidate: NewRecord,
  ) -> Result<(), GatewayError> {
    let req = self
      .client
      .patch(self.url(&format!("/students/{id}")))
      .json(&candidate);
    self.send("PATCH /students", req).await?;
    Ok(())
  }

  async fn delete_record(&self, id: RecordId) -> Result<(), GatewayError> {
    let req = self.client.delete(self.url(&format!("/students/{id}")));
    self.send("DELETE /students", req).await?;
    Ok(())
  }
}

impl AuthProvider for ApiClient {
  async fn get_session(&self) -> Result<Option<Session>, GatewayError> {
    if self.token().is_none() {
      return Ok(None);
    }
    match self
      .send("GET /auth/session", self.client.get(self.url("/auth/session")))
      .await
    {
      Ok(resp) => Self::json("GET /auth/session", resp).await.map(Some),
      Err(GatewayError::SessionExpired) => {
        self.set_token(None);
        Ok(None)
      }
      Err(e) => Err(e),
    }
  }

  async fn sign_out(&self) -> Result<(), GatewayError> {
    let result = self
      .send("POST /auth/sign-out", self.client.post(self.url("/auth/sign-out")))
      .await;
    self.set_token(None);
    match result {
      Ok(_) | Err(GatewayError::SessionExpired) => Ok(()),
      Err(e) => Err(e),
    }
  }

  async fn fetch_role(&self, user_id: Uuid) -> Result<Role, GatewayError> {
    let what = "GET /profiles";
    let resp = self
      .send(what, self.client.get(self.url(&format!("/profiles/{user_id}"))))
      .await?;
    let profile: Profile = Self::json(what, resp).await?;
    Ok(profile.role())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn client() -> ApiClient {
    ApiClient::new(ApiConfig {
      base_url: "http://localhost:5232/".into(),
      email:    "ana@x.com".into(),
      password: "secret".into(),
    })
    .unwrap()
  }

  #[test]
  fn url_joins_without_double_slash() {
    assert_eq!(client().url("/students"), "http://localhost:5232/api/students");
  }

  #[test]
  fn unauthorized_means_session_expired() {
    assert_eq!(
      status_error("GET /students", StatusCode::UNAUTHORIZED, ""),
      GatewayError::SessionExpired
    );
  }

  #[test]
  fn forbidden_is_plain_transport_failure() {
    let err = status_error(
      "POST /students",
      StatusCode::FORBIDDEN,
      r#"{"error":"admin role required"}"#,
    );
    assert_eq!(
      err,
      GatewayError::Transport("POST /students → 403: admin role required".into())
    );
  }

  #[test]
  fn non_json_body_falls_back_to_status() {
    let err = status_error("GET /students", StatusCode::BAD_GATEWAY, "<html>");
    assert!(matches!(err, GatewayError::Transport(m) if m.contains("502")));
  }

  #[tokio::test]
  async fn no_token_means_no_session() {
    assert_eq!(client().get_session().await, Ok(None));
  }
}

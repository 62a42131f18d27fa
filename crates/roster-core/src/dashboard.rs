//! The dashboard: one authenticated browsing session.
//!
//! Owns the gateway and auth provider handles and the three controllers, and
//! routes every user intent through them. No state lives outside this struct;
//! the session and role reach the controllers only as arguments.
//!
//! Two cross-cutting rules are enforced here:
//!
//! - A mutation the gateway acknowledged is followed by a list reload, issued
//!   only after the acknowledgment arrives.
//! - [`Error::SessionExpired`] from any call discards every record and dialog
//!   and sends the user back to sign-in.

use tracing::{info, warn};

use crate::{
  Error, Result,
  dialog::{DialogOrchestrator, Mutation},
  gate::{AuthEvent, SessionGate},
  gateway::{AuthProvider, RecordGateway},
  list::ListController,
  record::{Field, Record, RecordDraft, RecordId},
  session::Role,
};

/// Where the presentation layer should be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
  SignIn,
  Dashboard,
}

pub struct Dashboard<G, A> {
  gateway: G,
  auth:    A,
  gate:    SessionGate,
  list:    ListController,
  dialogs: DialogOrchestrator,
}

impl<G: RecordGateway, A: AuthProvider> Dashboard<G, A> {
  pub fn new(gateway: G, auth: A) -> Self {
    Self {
      gateway,
      auth,
      gate: SessionGate::new(),
      list: ListController::new(),
      dialogs: DialogOrchestrator::new(),
    }
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  pub fn gate(&self) -> &SessionGate { &self.gate }

  pub fn list(&self) -> &ListController { &self.list }

  pub fn dialogs(&self) -> &DialogOrchestrator { &self.dialogs }

  pub fn role(&self) -> Role { self.gate.role() }

  /// Whether create, edit and delete should be offered.
  pub fn can_write(&self) -> bool { self.gate.role().is_admin() }

  pub fn route(&self) -> Route {
    if self.gate.is_authenticated() { Route::Dashboard } else { Route::SignIn }
  }

  pub fn gateway(&self) -> &G { &self.gateway }

  // ── Session ───────────────────────────────────────────────────────────────

  /// Pick up the provider's current session and load the list.
  pub async fn start(&mut self) -> Result<Route> {
    let established = self.gate.establish(&self.auth).await;
    let established = self.settle(established)?;
    if established {
      let loaded = self.list.refresh(&self.gateway).await;
      self.settle(loaded)?;
    } else {
      self.discard();
    }
    Ok(self.route())
  }

  pub async fn handle_auth_event(&mut self, event: AuthEvent) -> Result<Route> {
    let was = self.gate.session().cloned();
    let authenticated = self.gate.handle_event(&self.auth, event).await;
    if !authenticated {
      self.discard();
      return Ok(Route::SignIn);
    }

    let same = match (&was, self.gate.session()) {
      (Some(before), Some(now)) => before.same_as(now),
      _ => false,
    };
    if !same {
      // A different identity starts from nothing.
      self.list.clear();
      self.dialogs.clear();
      let loaded = self.list.refresh(&self.gateway).await;
      self.settle(loaded)?;
    }
    Ok(self.route())
  }

  pub async fn sign_out(&mut self) -> Result<Route> {
    let result = self.gate.sign_out(&self.auth).await;
    self.discard();
    result.map(|()| Route::SignIn)
  }

  /// The session ended underneath us.
  pub fn expire_session(&mut self) -> Route {
    warn!("session expired; discarding dashboard state");
    self.gate.expire();
    self.discard();
    Route::SignIn
  }

  // ── List ──────────────────────────────────────────────────────────────────

  pub async fn refresh(&mut self) -> Result<()> {
    self.require_session()?;
    let loaded = self.list.refresh(&self.gateway).await;
    self.settle(loaded)
  }

  pub fn set_search(&mut self, text: impl Into<String>) { self.list.set_filter(text); }

  // ── Dialogs ───────────────────────────────────────────────────────────────

  pub fn open_create(&mut self) -> Result<()> {
    self.require_session()?;
    self.dialogs.open_create(self.gate.role())
  }

  pub fn open_edit(&mut self, id: RecordId) -> Result<()> {
    self.require_session()?;
    let record = self.lookup(id)?;
    self.dialogs.open_edit(self.gate.role(), &record)
  }

  pub fn open_details(&mut self, id: RecordId) -> Result<()> {
    self.require_session()?;
    let record = self.lookup(id)?;
    self.dialogs.open_details(&record);
    Ok(())
  }

  pub fn open_delete(&mut self, id: RecordId) -> Result<()> {
    self.require_session()?;
    let record = self.lookup(id)?;
    self.dialogs.open_delete(self.gate.role(), &record)
  }

  pub fn close_form(&mut self) { self.dialogs.close_form(); }

  pub fn close_details(&mut self) { self.dialogs.close_details(); }

  pub fn close_delete(&mut self) { self.dialogs.close_delete(); }

  pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
    self.dialogs.set_field(field, value);
  }

  /// Mutable access to the form's working copy, for character-level editing.
  pub fn draft_mut(&mut self) -> &mut RecordDraft {
    self.dialogs.draft_mut()
  }

  // ── Mutations ─────────────────────────────────────────────────────────────

  pub async fn submit_form(&mut self) -> Result<Mutation> {
    self.require_session()?;
    let submitted = self.dialogs.submit_form(&self.gateway, self.gate.role()).await;
    let mutation = self.settle(submitted)?;
    self.after_mutation(mutation).await
  }

  pub async fn confirm_delete(&mut self) -> Result<Mutation> {
    self.require_session()?;
    let deleted = self.dialogs.confirm_delete(&self.gateway, self.gate.role()).await;
    let mutation = self.settle(deleted)?;
    self.after_mutation(mutation).await
  }

  /// Reload after an acknowledged write. A failed reload is reported through
  /// the list's error; the write itself still succeeded.
  async fn after_mutation(&mut self, mutation: Mutation) -> Result<Mutation> {
    info!(?mutation, "reloading after mutation");
    let loaded = self.list.refresh(&self.gateway).await;
    match self.settle(loaded) {
      Ok(()) => Ok(mutation),
      Err(Error::SessionExpired) => Err(Error::SessionExpired),
      Err(e) => {
        warn!(error = %e, "reload after mutation failed");
        Ok(mutation)
      }
    }
  }

  // ── Helpers ───────────────────────────────────────────────────────────────

  fn lookup(&self, id: RecordId) -> Result<Record> {
    self.list.find(id).cloned().ok_or(Error::NoTarget)
  }

  fn require_session(&self) -> Result<()> {
    if self.gate.is_authenticated() { Ok(()) } else { Err(Error::SessionExpired) }
  }

  /// Pass `result` through, tearing everything down first when it reports an
  /// expired session.
  fn settle<T>(&mut self, result: Result<T>) -> Result<T> {
    if let Err(Error::SessionExpired) = result {
      self.expire_session();
    }
    result
  }

  fn discard(&mut self) {
    self.list.clear();
    self.dialogs.clear();
  }
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use chrono::Duration;

  use super::*;
  use crate::{
    list::LoadState,
    testing::{Call, FakeService, Op, record, session},
  };

  type Fake = Arc<FakeService>;

  async fn started(fake: &Fake) -> Dashboard<Fake, Fake> {
    let mut dash = Dashboard::new(fake.clone(), fake.clone());
    assert_eq!(dash.start().await.unwrap(), Route::Dashboard);
    fake.clear_calls();
    dash
  }

  fn admin_with_records() -> Fake {
    FakeService::new()
      .with_role(Role::Admin)
      .with_records(vec![
        record("Ana Silva", "2024001", "Engenharia"),
        record("Bruno Costa", "2023117", "Direito"),
      ])
      .shared()
  }

  #[tokio::test]
  async fn start_establishes_session_then_loads() {
    let fake = admin_with_records();
    let mut dash = Dashboard::new(fake.clone(), fake.clone());

    assert_eq!(dash.start().await.unwrap(), Route::Dashboard);
    assert_eq!(
      fake.calls(),
      vec![Call::GetSession, Call::FetchRole(fake.user_id()), Call::List]
    );
    assert_eq!(dash.list().view_len(), 2);
    assert!(dash.can_write());
  }

  #[tokio::test]
  async fn start_without_session_routes_to_sign_in() {
    let fake = FakeService::new().signed_out().shared();
    let mut dash = Dashboard::new(fake.clone(), fake.clone());

    assert_eq!(dash.start().await.unwrap(), Route::SignIn);
    assert!(!fake.calls().contains(&Call::List));
  }

  #[tokio::test]
  async fn create_requests_refresh_after_acknowledgment() {
    let fake = admin_with_records();
    let mut dash = started(&fake).await;

    dash.open_create().unwrap();
    dash.set_field(Field::FullName, "Carla Souza");
    dash.set_field(Field::BirthDate, "1999-12-31");
    dash.set_field(Field::Email, "carla@x.com");
    dash.set_field(Field::Phone, "11977776666");
    dash.set_field(Field::Course, "Engenharia Civil");
    dash.set_field(Field::RegistrationNumber, "2024050");

    assert_eq!(dash.submit_form().await.unwrap(), Mutation::Created);
    let calls = fake.calls();
    assert_eq!(calls.len(), 2);
    assert!(matches!(calls[0], Call::Insert(_)));
    assert_eq!(calls[1], Call::List);

    // Round-trip: the new record is in the reloaded collection.
    let created = &dash.list().records()[0];
    assert_eq!(created.full_name, "Carla Souza");
    assert_eq!(created.registration_number, "2024050");
    assert_eq!(dash.list().stats().total, 3);
    assert!(!dash.dialogs().is_form_open());
  }

  #[tokio::test]
  async fn failed_update_requests_no_refresh() {
    let fake = admin_with_records();
    let mut dash = started(&fake).await;
    let id = dash.list().records()[0].id;
    fake.fail(Op::Update);

    dash.open_edit(id).unwrap();
    dash.set_field(Field::Course, "Arquitetura");
    assert!(dash.submit_form().await.is_err());

    assert!(!fake.calls().contains(&Call::List));
    assert!(dash.dialogs().is_form_open());
    assert_eq!(dash.dialogs().target().map(|r| r.id), Some(id));
    assert!(dash.dialogs().form_error().is_some());
  }

  #[tokio::test]
  async fn delete_then_refresh() {
    let fake = admin_with_records();
    let mut dash = started(&fake).await;
    let id = dash.list().records()[1].id;

    dash.open_delete(id).unwrap();
    assert_eq!(dash.confirm_delete().await.unwrap(), Mutation::Deleted);
    assert_eq!(fake.calls(), vec![Call::Delete(id), Call::List]);
    assert!(dash.list().find(id).is_none());
  }

  #[tokio::test]
  async fn failed_reload_after_write_still_reports_the_write() {
    let fake = admin_with_records();
    let mut dash = started(&fake).await;
    let id = dash.list().records()[1].id;
    fake.fail(Op::List);

    dash.open_delete(id).unwrap();
    assert_eq!(dash.confirm_delete().await.unwrap(), Mutation::Deleted);
    assert_eq!(dash.list().load_state(), LoadState::Failed);
  }

  #[tokio::test]
  async fn members_are_refused_write_dialogs() {
    let fake = FakeService::new()
      .with_records(vec![record("Ana Silva", "2024001", "Engenharia")])
      .shared();
    let mut dash = started(&fake).await;
    let id = dash.list().records()[0].id;

    assert!(!dash.can_write());
    assert!(matches!(dash.open_create(), Err(Error::PermissionDenied(_))));
    assert!(matches!(dash.open_edit(id), Err(Error::PermissionDenied(_))));
    assert!(matches!(dash.open_delete(id), Err(Error::PermissionDenied(_))));
    dash.open_details(id).unwrap();
    assert!(dash.dialogs().is_details_open());
  }

  #[tokio::test]
  async fn unknown_id_has_no_target() {
    let fake = admin_with_records();
    let mut dash = started(&fake).await;
    assert!(matches!(dash.open_details(uuid::Uuid::new_v4()), Err(Error::NoTarget)));
  }

  #[tokio::test]
  async fn expired_session_discards_everything() {
    let fake = admin_with_records();
    let mut dash = started(&fake).await;
    let id = dash.list().records()[0].id;
    dash.open_edit(id).unwrap();

    fake.expire_session();
    let err = dash.submit_form().await.unwrap_err();
    assert!(matches!(err, Error::SessionExpired));
    assert_eq!(dash.route(), Route::SignIn);
    assert!(dash.list().records().is_empty());
    assert!(!dash.dialogs().is_any_open());
    assert!(dash.dialogs().target().is_none());
    assert_eq!(dash.role(), Role::Member);
  }

  #[tokio::test]
  async fn sign_out_discards_state() {
    let fake = admin_with_records();
    let mut dash = started(&fake).await;
    dash.set_search("ana");

    assert_eq!(dash.sign_out().await.unwrap(), Route::SignIn);
    assert!(dash.list().records().is_empty());
    assert_eq!(dash.list().filter(), "");
    assert!(matches!(dash.refresh().await, Err(Error::SessionExpired)));
  }

  #[tokio::test]
  async fn new_identity_starts_clean_and_reloads() {
    let fake = admin_with_records();
    let mut dash = started(&fake).await;
    let id = dash.list().records()[0].id;
    dash.open_details(id).unwrap();

    let next = session(fake.user_id(), Duration::hours(1));
    let route = dash.handle_auth_event(AuthEvent::SignedIn(next)).await.unwrap();
    assert_eq!(route, Route::Dashboard);
    assert!(!dash.dialogs().is_details_open());
    assert_eq!(fake.calls().last(), Some(&Call::List));
  }

  #[tokio::test]
  async fn expiry_event_routes_to_sign_in() {
    let fake = admin_with_records();
    let mut dash = started(&fake).await;

    let route = dash.handle_auth_event(AuthEvent::SessionExpired).await.unwrap();
    assert_eq!(route, Route::SignIn);
    assert!(dash.list().records().is_empty());
  }

  #[tokio::test]
  async fn search_filters_the_view() {
    let fake = admin_with_records();
    let mut dash = started(&fake).await;
    dash.set_search("DIREITO");
    assert_eq!(dash.list().view_len(), 1);
    assert_eq!(dash.list().view_get(0).map(|r| r.full_name.as_str()), Some("Bruno Costa"));
  }
}

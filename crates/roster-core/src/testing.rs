//! In-memory stand-in for the remote service, used by the controller tests.
//!
//! Records every call in order and can be told to fail specific operations.

use std::{
  collections::HashSet,
  sync::{Arc, Mutex},
};

use chrono::{Duration, NaiveDate, Utc};
use uuid::Uuid;

use crate::{
  gateway::{AuthProvider, GatewayError, RecordGateway},
  record::{NewRecord, Record, RecordId, Status},
  session::{Role, Session},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
  List,
  Insert(NewRecord),
  Update(RecordId, NewRecord),
  Delete(RecordId),
  GetSession,
  SignOut,
  FetchRole(Uuid),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
  List,
  Insert,
  Update,
  Delete,
  GetSession,
  SignOut,
  FetchRole,
}

struct Inner {
  records:  Vec<Record>,
  calls:    Vec<Call>,
  failing:  HashSet<Op>,
  expired:  bool,
  session:  Option<Session>,
  role:     Role,
}

pub struct FakeService {
  user_id: Uuid,
  inner:   Mutex<Inner>,
}

pub fn session(user_id: Uuid, ttl: Duration) -> Session {
  Session {
    access_token: Uuid::new_v4().simple().to_string(),
    user_id,
    email: "user@example.com".into(),
    expires_at: Utc::now() + ttl,
  }
}

pub fn fields(full_name: &str, registration_number: &str, course: &str) -> NewRecord {
  NewRecord {
    full_name:           full_name.into(),
    birth_date:          NaiveDate::from_ymd_opt(2001, 5, 17).unwrap(),
    email:               "student@example.com".into(),
    phone:               "11988887777".into(),
    course:              course.into(),
    registration_number: registration_number.into(),
    status:              Status::Active,
  }
}

pub fn record(full_name: &str, registration_number: &str, course: &str) -> Record {
  fields(full_name, registration_number, course).into_record(Uuid::new_v4(), Utc::now())
}

impl FakeService {
  /// Signed in as a member, no records.
  pub fn new() -> Self {
    let user_id = Uuid::new_v4();
    Self {
      user_id,
      inner: Mutex::new(Inner {
        records:  Vec::new(),
        calls:    Vec::new(),
        failing:  HashSet::new(),
        expired:  false,
        session:  Some(session(user_id, Duration::hours(1))),
        role:     Role::Member,
      }),
    }
  }

  pub fn with_role(self, role: Role) -> Self {
    self.inner.lock().unwrap().role = role;
    self
  }

  pub fn with_records(self, records: Vec<Record>) -> Self {
    self.inner.lock().unwrap().records = records;
    self
  }

  pub fn signed_out(self) -> Self {
    self.inner.lock().unwrap().session = None;
    self
  }

  pub fn shared(self) -> Arc<Self> { Arc::new(self) }

  pub fn user_id(&self) -> Uuid { self.user_id }

  pub fn fail(&self, op: Op) { self.inner.lock().unwrap().failing.insert(op); }

  pub fn recover(&self, op: Op) { self.inner.lock().unwrap().failing.remove(&op); }

  /// Every subsequent call reports an expired session.
  pub fn expire_session(&self) {
    let mut inner = self.inner.lock().unwrap();
    inner.expired = true;
    inner.session = None;
  }

  pub fn calls(&self) -> Vec<Call> { self.inner.lock().unwrap().calls.clone() }

  pub fn clear_calls(&self) { self.inner.lock().unwrap().calls.clear(); }

  pub fn records(&self) -> Vec<Record> { self.inner.lock().unwrap().records.clone() }

  /// Log `call`, then fail it if `op` is marked failing.
  fn enter(&self, call: Call, op: Op) -> Result<std::sync::MutexGuard<'_, Inner>, GatewayError> {
    let mut inner = self.inner.lock().unwrap();
    inner.calls.push(call);
    if inner.expired {
      return Err(GatewayError::SessionExpired);
    }
    if inner.failing.contains(&op) {
      return Err(GatewayError::Transport(format!("{op:?} failed")));
    }
    Ok(inner)
  }
}

impl RecordGateway for FakeService {
  async fn list_records(&self) -> Result<Vec<Record>, GatewayError> {
    let inner = self.enter(Call::List, Op::List)?;
    Ok(inner.records.clone())
  }

  async fn insert_record(&self, candidate: NewRecord) -> Result<Record, GatewayError> {
    let mut inner = self.enter(Call::Insert(candidate.clone()), Op::Insert)?;
    let record = candidate.into_record(Uuid::new_v4(), Utc::now());
    inner.records.insert(0, record.clone());
    Ok(record)
  }

  async fn update_record(
    &self,
    id: RecordId,
    candidate: NewRecord,
  ) -> Result<(), GatewayError> {
    let mut inner = self.enter(Call::Update(id, candidate.clone()), Op::Update)?;
    let existing = inner
      .records
      .iter_mut()
      .find(|r| r.id == id)
      .ok_or_else(|| GatewayError::Transport(format!("record {id} not found")))?;
    let created_at = existing.created_at;
    *existing = candidate.into_record(id, Utc::now());
    existing.created_at = created_at;
    Ok(())
  }

  async fn delete_record(&self, id: RecordId) -> Result<(), GatewayError> {
    let mut inner = self.enter(Call::Delete(id), Op::Delete)?;
    inner.records.retain(|r| r.id != id);
    Ok(())
  }
}

impl AuthProvider for FakeService {
  async fn get_session(&self) -> Result<Option<Session>, GatewayError> {
    let inner = self.enter(Call::GetSession, Op::GetSession)?;
    Ok(inner.session.clone())
  }

  async fn sign_out(&self) -> Result<(), GatewayError> {
    let mut inner = self.enter(Call::SignOut, Op::SignOut)?;
    inner.session = None;
    Ok(())
  }

  async fn fetch_role(&self, user_id: Uuid) -> Result<Role, GatewayError> {
    let inner = self.enter(Call::FetchRole(user_id), Op::FetchRole)?;
    Ok(inner.role)
  }
}

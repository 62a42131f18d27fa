//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{Duration, NaiveDate, Utc};
use roster_core::{
  record::{NewRecord, Status},
  store::RosterStore,
};
use uuid::Uuid;

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn student(full_name: &str, registration_number: &str) -> NewRecord {
  NewRecord {
    full_name:           full_name.into(),
    birth_date:          NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(),
    email:               "ana@x.com".into(),
    phone:               "11999999999".into(),
    course:              "Engenharia".into(),
    registration_number: registration_number.into(),
    status:              Status::Active,
  }
}

// ─── Students ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn insert_and_get_student() {
  let s = store().await;

  let created = s.insert_student(student("Ana Silva", "2024001")).await.unwrap();
  assert_eq!(created.created_at, created.updated_at);

  let fetched = s.get_student(created.id).await.unwrap().unwrap();
  assert_eq!(fetched.fields(), student("Ana Silva", "2024001"));
  assert_eq!(fetched.id, created.id);
}

#[tokio::test]
async fn get_student_missing_returns_none() {
  let s = store().await;
  assert!(s.get_student(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn list_is_newest_created_first() {
  let s = store().await;
  for (name, reg) in [("Ana Silva", "001"), ("Bruno Costa", "002"), ("Carla Souza", "003")] {
    s.insert_student(student(name, reg)).await.unwrap();
  }

  let names: Vec<String> = s
    .list_students()
    .await
    .unwrap()
    .into_iter()
    .map(|r| r.full_name)
    .collect();
  assert_eq!(names, ["Carla Souza", "Bruno Costa", "Ana Silva"]);
}

#[tokio::test]
async fn update_overwrites_fields_and_bumps_updated_at() {
  let s = store().await;
  let created = s.insert_student(student("Ana Silva", "2024001")).await.unwrap();

  let mut changed = created.fields();
  changed.course = "Arquitetura".into();
  changed.status = Status::Inactive;
  let updated = s.update_student(created.id, changed.clone()).await.unwrap().unwrap();

  assert_eq!(updated.fields(), changed);
  assert_eq!(updated.created_at, created.created_at);
  assert!(updated.updated_at >= created.updated_at);
}

#[tokio::test]
async fn update_missing_student_is_none() {
  let s = store().await;
  let id = Uuid::new_v4();
  let updated = s.update_student(id, student("Ana Silva", "2024001")).await.unwrap();
  assert!(updated.is_none());
  assert!(s.list_students().await.unwrap().is_empty());
}

#[tokio::test]
async fn delete_reports_whether_a_row_went_away() {
  let s = store().await;
  let created = s.insert_student(student("Ana Silva", "2024001")).await.unwrap();

  assert!(s.delete_student(created.id).await.unwrap());
  assert!(!s.delete_student(created.id).await.unwrap());
  assert!(s.list_students().await.unwrap().is_empty());
}

// ─── Users and profiles ──────────────────────────────────────────────────────

#[tokio::test]
async fn create_user_also_creates_profile() {
  let s = store().await;
  let user = s
    .create_user("admin@x.com".into(), "$argon2id$stub".into(), "admin".into())
    .await
    .unwrap();

  let found = s.find_user_by_email("admin@x.com".into()).await.unwrap().unwrap();
  assert_eq!(found.id, user.id);

  let by_id = s.get_user(user.id).await.unwrap().unwrap();
  assert_eq!(by_id.email, "admin@x.com");

  let profile = s.get_profile(user.id).await.unwrap().unwrap();
  assert_eq!(profile.role, "admin");
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
  let s = store().await;
  s.create_user("a@x.com".into(), "h".into(), "member".into()).await.unwrap();
  let err = s
    .create_user("a@x.com".into(), "h".into(), "admin".into())
    .await
    .unwrap_err();
  assert!(matches!(err, Error::EmailTaken(_)));
}

#[tokio::test]
async fn unknown_user_and_profile_are_none() {
  let s = store().await;
  assert!(s.find_user_by_email("nobody@x.com".into()).await.unwrap().is_none());
  assert!(s.get_profile(Uuid::new_v4()).await.unwrap().is_none());
}

// ─── Sessions ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn session_lifecycle() {
  let s = store().await;
  let user = s.create_user("a@x.com".into(), "h".into(), "member".into()).await.unwrap();

  s.create_session("digest-1".into(), user.id, Utc::now() + Duration::hours(1))
    .await
    .unwrap();
  let found = s.get_session("digest-1".into()).await.unwrap().unwrap();
  assert_eq!(found.user_id, user.id);

  s.delete_session("digest-1".into()).await.unwrap();
  assert!(s.get_session("digest-1".into()).await.unwrap().is_none());

  // Deleting again is fine.
  s.delete_session("digest-1".into()).await.unwrap();
}

#[tokio::test]
async fn expired_session_is_absent_and_purged() {
  let s = store().await;
  let user = s.create_user("a@x.com".into(), "h".into(), "member".into()).await.unwrap();
  s.create_session("stale".into(), user.id, Utc::now() - Duration::minutes(1))
    .await
    .unwrap();
  s.create_session("fresh".into(), user.id, Utc::now() + Duration::hours(1))
    .await
    .unwrap();

  assert!(s.get_session("stale".into()).await.unwrap().is_none());
  assert_eq!(s.purge_expired_sessions().await.unwrap(), 1);
  assert!(s.get_session("fresh".into()).await.unwrap().is_some());
}

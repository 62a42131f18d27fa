//! [`SqliteStore`]: the SQLite implementation of [`RosterStore`].

use std::path::Path;

use chrono::{DateTime, SubsecRound as _, Utc};
use rusqlite::OptionalExtension as _;
use tracing::debug;
use uuid::Uuid;

use roster_core::{
  record::{NewRecord, Record, RecordId},
  session::Profile,
  store::{RosterStore, StoredSession, User},
};

use crate::{
  Error, Result,
  encode::{
    RawProfile, RawSession, RawStudent, RawUser, STUDENT_COLUMNS, encode_date,
    encode_dt, encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A roster store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store; useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Fetch the user whose `column` equals `value`. `column` must be a unique
  /// column of `users`.
  async fn query_user(&self, column: &'static str, value: String) -> Result<Option<User>> {
    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!(
              "SELECT id, email, password_hash, created_at FROM users WHERE {column} = ?1"
            ),
            rusqlite::params![value],
            |row| {
              Ok(RawUser {
                id:            row.get(0)?,
                email:         row.get(1)?,
                password_hash: row.get(2)?,
                created_at:    row.get(3)?,
              })
            },
          )
          .optional()?)
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  /// Drop every session whose expiry has passed. Returns how many were removed.
  pub async fn purge_expired_sessions(&self) -> Result<usize> {
    let now_str = encode_dt(Utc::now());
    let removed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM sessions WHERE expires_at <= ?1",
          rusqlite::params![now_str],
        )?)
      })
      .await?;
    debug!(removed, "purged expired sessions");
    Ok(removed)
  }
}

/// The current time at the precision timestamps are stored with, so values
/// handed back to callers equal what a later read returns.
fn now() -> DateTime<Utc> { Utc::now().trunc_subsecs(6) }

// ─── RosterStore impl ────────────────────────────────────────────────────────

impl RosterStore for SqliteStore {
  type Error = Error;

  // ── Students ──────────────────────────────────────────────────────────────

  async fn list_students(&self) -> Result<Vec<Record>> {
    let raws: Vec<RawStudent> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {STUDENT_COLUMNS} FROM students ORDER BY created_at DESC, rowid DESC"
        ))?;
        let rows = stmt
          .query_map([], RawStudent::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawStudent::into_record).collect()
  }

  async fn get_student(&self, id: RecordId) -> Result<Option<Record>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawStudent> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {STUDENT_COLUMNS} FROM students WHERE id = ?1"),
            rusqlite::params![id_str],
            RawStudent::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawStudent::into_record).transpose()
  }

  async fn insert_student(&self, student: NewRecord) -> Result<Record> {
    let record = student.into_record(Uuid::new_v4(), now());

    let id_str         = encode_uuid(record.id);
    let birth_date_str = encode_date(record.birth_date);
    let status_str     = record.status.as_str();
    let at_str         = encode_dt(record.created_at);
    let full_name      = record.full_name.clone();
    let email          = record.email.clone();
    let phone          = record.phone.clone();
    let course         = record.course.clone();
    let registration   = record.registration_number.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO students (
             id, full_name, birth_date, email, phone, course,
             registration_number, status, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)",
          rusqlite::params![
            id_str,
            full_name,
            birth_date_str,
            email,
            phone,
            course,
            registration,
            status_str,
            at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(record)
  }

  async fn update_student(
    &self,
    id: RecordId,
    student: NewRecord,
  ) -> Result<Option<Record>> {
    let id_str         = encode_uuid(id);
    let birth_date_str = encode_date(student.birth_date);
    let status_str     = student.status.as_str();
    let at_str         = encode_dt(now());
    let NewRecord { full_name, email, phone, course, registration_number, .. } = student;

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE students SET
             full_name = ?2, birth_date = ?3, email = ?4, phone = ?5,
             course = ?6, registration_number = ?7, status = ?8, updated_at = ?9
           WHERE id = ?1",
          rusqlite::params![
            id_str,
            full_name,
            birth_date_str,
            email,
            phone,
            course,
            registration_number,
            status_str,
            at_str,
          ],
        )?)
      })
      .await?;

    if changed == 0 {
      return Ok(None);
    }
    self.get_student(id).await
  }

  async fn delete_student(&self, id: RecordId) -> Result<bool> {
    let id_str = encode_uuid(id);
    let removed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM students WHERE id = ?1", rusqlite::params![id_str])?)
      })
      .await?;
    Ok(removed > 0)
  }

  // ── Users and profiles ────────────────────────────────────────────────────

  async fn create_user(
    &self,
    email: String,
    password_hash: String,
    role: String,
  ) -> Result<User> {
    if self.find_user_by_email(email.clone()).await?.is_some() {
      return Err(Error::EmailTaken(email));
    }

    let user = User {
      id: Uuid::new_v4(),
      email,
      password_hash,
      created_at: now(),
    };

    let id_str    = encode_uuid(user.id);
    let email_str = user.email.clone();
    let hash_str  = user.password_hash.clone();
    let at_str    = encode_dt(user.created_at);

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "INSERT INTO users (id, email, password_hash, created_at) VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![id_str, email_str, hash_str, at_str],
        )?;
        tx.execute(
          "INSERT INTO profiles (id, role) VALUES (?1, ?2)",
          rusqlite::params![id_str, role],
        )?;
        tx.commit()?;
        Ok(())
      })
      .await?;

    Ok(user)
  }

  async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
    self.query_user("id", encode_uuid(id)).await
  }

  async fn find_user_by_email(&self, email: String) -> Result<Option<User>> {
    self.query_user("email", email).await
  }

  async fn get_profile(&self, user_id: Uuid) -> Result<Option<Profile>> {
    let id_str = encode_uuid(user_id);
    let raw: Option<RawProfile> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT id, role FROM profiles WHERE id = ?1",
            rusqlite::params![id_str],
            |row| Ok(RawProfile { id: row.get(0)?, role: row.get(1)? }),
          )
          .optional()?)
      })
      .await?;

    raw.map(RawProfile::into_profile).transpose()
  }

  // ── Sessions ──────────────────────────────────────────────────────────────

  async fn create_session(
    &self,
    token_digest: String,
    user_id: Uuid,
    expires_at: DateTime<Utc>,
  ) -> Result<StoredSession> {
    let session = StoredSession {
      token_digest,
      user_id,
      created_at: now(),
      expires_at,
    };

    let digest_str  = session.token_digest.clone();
    let user_id_str = encode_uuid(user_id);
    let created_str = encode_dt(session.created_at);
    let expires_str = encode_dt(expires_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO sessions (token_digest, user_id, created_at, expires_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![digest_str, user_id_str, created_str, expires_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(session)
  }

  async fn get_session(&self, token_digest: String) -> Result<Option<StoredSession>> {
    let raw: Option<RawSession> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT token_digest, user_id, created_at, expires_at
             FROM sessions WHERE token_digest = ?1",
            rusqlite::params![token_digest],
            |row| {
              Ok(RawSession {
                token_digest: row.get(0)?,
                user_id:      row.get(1)?,
                created_at:   row.get(2)?,
                expires_at:   row.get(3)?,
              })
            },
          )
          .optional()?)
      })
      .await?;

    let session = raw.map(RawSession::into_session).transpose()?;
    Ok(session.filter(|s| s.expires_at > Utc::now()))
  }

  async fn delete_session(&self, token_digest: String) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "DELETE FROM sessions WHERE token_digest = ?1",
          rusqlite::params![token_digest],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

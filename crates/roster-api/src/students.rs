//! Handlers for `/students` endpoints.
//!
//! | Method   | Path             | Notes |
//! |----------|------------------|-------|
//! | `GET`    | `/students`      | Any signed-in caller; newest-created first |
//! | `POST`   | `/students`      | Admin; 201 + record; 422 with violations |
//! | `PATCH`  | `/students/{id}` | Admin; 204; 404 if unknown |
//! | `DELETE` | `/students/{id}` | Admin; 204 even if already gone |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use roster_core::{
  record::{Record, RecordDraft},
  store::RosterStore,
  validate::validate,
};
use tracing::info;
use uuid::Uuid;

use crate::{
  AppState,
  auth::{Admin, Caller},
  error::ApiError,
};

/// `GET /students`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  _caller: Caller,
) -> Result<Json<Vec<Record>>, ApiError>
where
  S: RosterStore + 'static,
{
  let students = state.store.list_students().await.map_err(ApiError::store)?;
  Ok(Json(students))
}

/// `POST /students`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Admin(caller): Admin,
  Json(draft): Json<RecordDraft>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RosterStore + 'static,
{
  let candidate = validate(&draft).map_err(ApiError::Unprocessable)?;
  let record = state
    .store
    .insert_student(candidate)
    .await
    .map_err(ApiError::store)?;
  info!(id = %record.id, by = %caller.user_id, "student created");
  Ok((StatusCode::CREATED, Json(record)))
}

/// `PATCH /students/{id}`
///
/// The body carries every writable field; it replaces the stored values.
pub async fn update<S>(
  State(state): State<AppState<S>>,
  Admin(caller): Admin,
  Path(id): Path<Uuid>,
  Json(draft): Json<RecordDraft>,
) -> Result<StatusCode, ApiError>
where
  S: RosterStore + 'static,
{
  let candidate = validate(&draft).map_err(ApiError::Unprocessable)?;
  state
    .store
    .update_student(id, candidate)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("student {id} not found")))?;
  info!(%id, by = %caller.user_id, "student updated");
  Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /students/{id}`
pub async fn delete<S>(
  State(state): State<AppState<S>>,
  Admin(caller): Admin,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: RosterStore + 'static,
{
  let removed = state.store.delete_student(id).await.map_err(ApiError::store)?;
  info!(%id, removed, by = %caller.user_id, "student deleted");
  Ok(StatusCode::NO_CONTENT)
}

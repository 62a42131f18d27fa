//! `GET /profiles/{user_id}`: the role lookup.
//!
//! Callers may read only their own profile.

use axum::{
  Json,
  extract::{Path, State},
};
use roster_core::{session::Profile, store::RosterStore};
use uuid::Uuid;

use crate::{AppState, auth::Caller, error::ApiError};

pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  caller: Caller,
  Path(user_id): Path<Uuid>,
) -> Result<Json<Profile>, ApiError>
where
  S: RosterStore + 'static,
{
  if caller.user_id != user_id {
    return Err(ApiError::Forbidden("profiles are private".into()));
  }
  let profile = state
    .store
    .get_profile(user_id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("profile {user_id} not found")))?;
  Ok(Json(profile))
}

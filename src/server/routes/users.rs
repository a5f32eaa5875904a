use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
};
use serde::Deserialize;
use tracing::info;

use crate::db::models::{NewUser, UserRow, UserUpdate};

use super::super::{error::ApiError, session::AdminUser, state::AppState};
use super::auth::{RegisterPayload, parse_role};

pub async fn list_users_handler(
    _admin: AdminUser,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<UserRow>>, ApiError> {
    let users = state.db.users.get_users().await?;

    Ok(Json(users))
}

pub async fn add_user_handler(
    AdminUser(admin): AdminUser,
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RegisterPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<UserRow>), ApiError> {
    let Json(payload) = payload?;
    let new_user = NewUser::try_from(payload)?;
    let user = state.db.users.add_user(&new_user).await?;

    info!("Admin {} added user {}", admin.id, user.id);

    Ok((StatusCode::CREATED, Json(user)))
}

#[derive(Debug, Deserialize)]
pub struct UserUpdatePayload {
    username: Option<String>,
    email: Option<String>,
    address: Option<String>,
    contact: Option<String>,
    role: Option<String>,
}

impl TryFrom<UserUpdatePayload> for UserUpdate {
    type Error = ApiError;

    fn try_from(payload: UserUpdatePayload) -> Result<Self, Self::Error> {
        let (Some(username), Some(email), Some(address), Some(contact), Some(role)) = (
            payload.username,
            payload.email,
            payload.address,
            payload.contact,
            payload.role,
        ) else {
            return Err(ApiError::BadRequest("All fields are required."));
        };

        if [&username, &email, &address, &contact, &role]
            .iter()
            .any(|field| field.trim().is_empty())
        {
            return Err(ApiError::BadRequest("All fields are required."));
        }

        Ok(Self {
            username,
            email,
            address,
            contact,
            role: parse_role(&role)?,
        })
    }
}

pub async fn update_user_handler(
    AdminUser(admin): AdminUser,
    State(state): State<Arc<AppState>>,
    user_id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<UserUpdatePayload>, JsonRejection>,
) -> Result<Json<UserRow>, ApiError> {
    let Path(user_id) = user_id?;
    let Json(payload) = payload?;
    let update = UserUpdate::try_from(payload)?;
    let user = state
        .db
        .users
        .update_user(user_id, &update)
        .await?
        .ok_or(ApiError::NotFound("User"))?;

    info!("Admin {} updated user {user_id}", admin.id);

    Ok(Json(user))
}

pub async fn delete_user_handler(
    AdminUser(admin): AdminUser,
    State(state): State<Arc<AppState>>,
    user_id: Result<Path<i32>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(user_id) = user_id?;

    if admin.id == user_id {
        return Err(ApiError::BadRequest("You cannot delete your own account."));
    }

    if !state.db.users.remove_user(user_id).await? {
        return Err(ApiError::NotFound("User"));
    }

    info!("Admin {} deleted user {user_id}", admin.id);

    Ok(StatusCode::NO_CONTENT)
}

use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::info;

use crate::db::models::{NewUser, UserRole, UserRow};

use super::super::{
    error::ApiError,
    session::{SessionStore, SessionUser, session_id},
    state::AppState,
};

pub(crate) const MIN_PASSWORD_LEN: usize = 6;

/// Hex encoded SHA-256 digest of `password`.
pub(crate) fn hash_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

/// Registration form. Every field is required.
#[derive(Debug, Default, Deserialize)]
pub struct RegisterPayload {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub address: Option<String>,
    pub contact: Option<String>,
    pub role: Option<String>,
}

fn required(field: Option<String>) -> Result<String, ApiError> {
    field
        .filter(|value| !value.trim().is_empty())
        .ok_or(ApiError::BadRequest("All fields are required."))
}

pub(crate) fn parse_role(role: &str) -> Result<UserRole, ApiError> {
    role.parse().map_err(|_| ApiError::BadRequest("Invalid role"))
}

impl TryFrom<RegisterPayload> for NewUser {
    type Error = ApiError;

    fn try_from(payload: RegisterPayload) -> Result<Self, Self::Error> {
        let username = required(payload.username)?;
        let email = required(payload.email)?;
        let password = required(payload.password)?;
        let address = required(payload.address)?;
        let contact = required(payload.contact)?;
        let role = required(payload.role)?;

        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ApiError::BadRequest(
                "Password should be at least 6 or more characters long",
            ));
        }

        Ok(Self {
            username,
            email,
            password_hash: hash_password(&password),
            address,
            contact,
            role: parse_role(&role)?,
        })
    }
}

pub async fn register_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RegisterPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<UserRow>), ApiError> {
    let Json(payload) = payload?;
    let new_user = NewUser::try_from(payload)?;
    let user = state.db.users.add_user(&new_user).await?;

    info!("Registered user {} ({})", user.id, user.role);

    Ok((StatusCode::CREATED, Json(user)))
}

#[derive(Debug, Deserialize)]
pub struct LoginPayload {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: SessionUser,
    pub redirect: &'static str,
}

pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LoginPayload>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(payload) = payload?;
    let (Some(email), Some(password)) = (
        payload.email.filter(|e| !e.is_empty()),
        payload.password.filter(|p| !p.is_empty()),
    ) else {
        return Err(ApiError::BadRequest("Please enter email and password"));
    };

    let user = state
        .db
        .users
        .get_user_by_credentials(&email, &hash_password(&password))
        .await?
        .ok_or(ApiError::InvalidCredentials)?;

    let session_user = SessionUser::from(&user);
    let sid = state.sessions.create(session_user.clone());

    info!("User {} logged in", user.id);

    let redirect = match user.role {
        UserRole::Admin => "/inventory",
        UserRole::User => "/investment",
    };

    let body = LoginResponse {
        user: session_user,
        redirect,
    };

    Ok((
        [(header::SET_COOKIE, state.sessions.cookie(sid))],
        Json(body),
    )
        .into_response())
}

pub async fn logout_handler(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    if let Some(sid) = session_id(&headers) {
        state.sessions.remove(sid);
    }

    (
        StatusCode::NO_CONTENT,
        [(header::SET_COOKIE, SessionStore::expired_cookie())],
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> RegisterPayload {
        RegisterPayload {
            username: Some("alice".to_string()),
            email: Some("alice@example.com".to_string()),
            password: Some("hunter22".to_string()),
            address: Some("1 Marina Blvd".to_string()),
            contact: Some("91234567".to_string()),
            role: Some("user".to_string()),
        }
    }

    #[test]
    fn hash_password_is_hex_sha256() {
        assert_eq!(
            hash_password("password"),
            "5e884898da28047151d0e56f8dc6292773603d0d6aabbdd62a11ef721d1542d8"
        );
    }

    #[test]
    fn register_payload_builds_new_user() {
        let user = NewUser::try_from(payload()).unwrap();

        assert_eq!(user.username, "alice");
        assert_eq!(user.role, UserRole::User);
        assert_eq!(user.password_hash, hash_password("hunter22"));
    }

    #[test]
    fn register_payload_requires_every_field() {
        let mut missing = payload();
        missing.contact = None;
        let err = NewUser::try_from(missing).unwrap_err();
        assert_eq!(err.to_string(), "All fields are required.");

        let mut blank = payload();
        blank.username = Some("  ".to_string());
        assert!(NewUser::try_from(blank).is_err());
    }

    #[test]
    fn register_payload_rejects_short_password_and_unknown_role() {
        let mut short = payload();
        short.password = Some("12345".to_string());
        let err = NewUser::try_from(short).unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let mut role = payload();
        role.role = Some("superuser".to_string());
        let err = NewUser::try_from(role).unwrap_err();
        assert_eq!(err.to_string(), "Invalid role");
    }
}

//! Server-side sessions.
//!
//! The logged-in user is resolved per request from the `sid` cookie and handed to handlers
//! through the [`AuthUser`] and [`AdminUser`] extractors, instead of living in shared mutable
//! request state.

use std::{
    collections::HashMap,
    sync::{Arc, PoisonError, RwLock},
};

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header, request::Parts},
};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::db::models::{UserRole, UserRow};

use super::{error::ApiError, state::AppState};

pub const SESSION_COOKIE: &str = "sid";

/// Identity carried by a session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionUser {
    pub id: i32,
    pub username: String,
    pub role: UserRole,
}

impl From<&UserRow> for SessionUser {
    fn from(user: &UserRow) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            role: user.role,
        }
    }
}

struct SessionEntry {
    user: SessionUser,
    expires_at: DateTime<Utc>,
}

/// In-memory session store with a fixed max age.
pub struct SessionStore {
    max_age: Duration,
    sessions: RwLock<HashMap<Uuid, SessionEntry>>,
}

impl SessionStore {
    pub fn new(max_age: Duration) -> Self {
        Self {
            max_age,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub fn max_age(&self) -> Duration {
        self.max_age
    }

    /// Starts a session for `user`. Expired sessions are evicted on the way, so sessions that
    /// are never read again don't accumulate.
    pub fn create(&self, user: SessionUser) -> Uuid {
        let id = Uuid::new_v4();
        let now = Utc::now();
        let entry = SessionEntry {
            user,
            expires_at: now + self.max_age,
        };

        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        sessions.retain(|_, existing| existing.expires_at > now);
        sessions.insert(id, entry);

        id
    }


    /// Returns the session user, or `None` if the session is unknown or expired. Expired
    /// sessions are evicted.
    pub fn get(&self, id: Uuid) -> Option<SessionUser> {
        let now = Utc::now();

        {
            let sessions = self.sessions.read().unwrap_or_else(PoisonError::into_inner);
            match sessions.get(&id) {
                None => return None,
                Some(entry) if entry.expires_at > now => return Some(entry.user.clone()),
                Some(_) => {}
            }
        }

        self.remove(id);
        None
    }

    pub fn remove(&self, id: Uuid) -> bool {
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id)
            .is_some()
    }

    /// `Set-Cookie` value binding the client to session `id`.
    pub fn cookie(&self, id: Uuid) -> String {
        format!(
            "{SESSION_COOKIE}={id}; HttpOnly; Path=/; Max-Age={}; SameSite=Lax",
            self.max_age.num_seconds()
        )
    }

    /// `Set-Cookie` value clearing the session cookie.
    pub fn expired_cookie() -> String {
        format!("{SESSION_COOKIE}=; HttpOnly; Path=/; Max-Age=0; SameSite=Lax")
    }
}

/// Extracts the session id from the `Cookie` headers, if present and well formed.
pub fn session_id(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
}

/// Any logged-in user.
#[derive(Debug, Clone)]
pub struct AuthUser(pub SessionUser);

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        session_id(&parts.headers)
            .and_then(|id| state.sessions.get(id))
            .map(AuthUser)
            .ok_or(ApiError::Unauthenticated)
    }
}

/// A logged-in user with the admin role.
#[derive(Debug, Clone)]
pub struct AdminUser(pub SessionUser);

impl FromRequestParts<Arc<AppState>> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(user) = AuthUser::from_request_parts(parts, state).await?;

        if user.role != UserRole::Admin {
            return Err(ApiError::Forbidden);
        }

        Ok(AdminUser(user))
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn user(role: UserRole) -> SessionUser {
        SessionUser {
            id: 7,
            username: "alice".to_string(),
            role,
        }
    }

    #[test]
    fn create_get_remove() {
        let store = SessionStore::new(Duration::hours(1));
        let id = store.create(user(UserRole::User));

        assert_eq!(store.get(id), Some(user(UserRole::User)));
        assert_eq!(store.get(Uuid::new_v4()), None);

        assert!(store.remove(id));
        assert!(!store.remove(id));
        assert_eq!(store.get(id), None);
    }

    #[test]
    fn expired_sessions_are_evicted() {
        let store = SessionStore::new(Duration::seconds(-1));
        let id = store.create(user(UserRole::Admin));

        assert_eq!(store.get(id), None);
        assert!(!store.remove(id));
    }

    #[test]
    fn abandoned_expired_sessions_do_not_accumulate() {
        let store = SessionStore::new(Duration::seconds(-1));
        for _ in 0..1000 {
            store.create(user(UserRole::User));
        }

        assert_eq!(store.sessions.read().unwrap().len(), 1);

        let live = SessionStore::new(Duration::hours(1));
        let first = live.create(user(UserRole::User));
        let second = live.create(user(UserRole::Admin));

        assert_eq!(live.sessions.read().unwrap().len(), 2);
        assert!(live.get(first).is_some());
        assert!(live.get(second).is_some());
    }

    #[test]
    fn cookie_carries_id_and_max_age() {
        let store = SessionStore::new(Duration::days(7));
        let id = Uuid::new_v4();

        assert_eq!(
            store.cookie(id),
            format!("sid={id}; HttpOnly; Path=/; Max-Age=604800; SameSite=Lax")
        );
        assert!(SessionStore::expired_cookie().contains("Max-Age=0"));
    }

    #[test]
    fn session_id_is_read_among_other_cookies() {
        let id = Uuid::new_v4();
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("theme=dark; sid={id}; lang=en")).unwrap(),
        );

        assert_eq!(session_id(&headers), Some(id));
    }

    #[test]
    fn session_id_rejects_missing_or_malformed() {
        let mut headers = HeaderMap::new();
        assert_eq!(session_id(&headers), None);

        headers.insert(header::COOKIE, HeaderValue::from_static("sid=not-a-uuid"));
        assert_eq!(session_id(&headers), None);

        headers.insert(header::COOKIE, HeaderValue::from_static("xsid=abc; theme=dark"));
        assert_eq!(session_id(&headers), None);
    }
}

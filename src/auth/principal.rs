//! Resolve who, if anyone, is signed in for pages that also serve signed out visitors.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::{User, cookie::get_token_from_cookies, user::get_user_by_id},
};

/// The state needed to look up the signed in user.
#[derive(Debug, Clone)]
pub struct PrincipalState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The database connection for looking up users.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for PrincipalState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The signed in user, or `None` for visitors.
///
/// Unlike the auth middleware this never redirects, so the handler decides
/// what a visitor sees.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentUser(pub Option<User>);

impl<S> FromRequestParts<S> for CurrentUser
where
    PrincipalState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = PrincipalState::from_ref(state);
        let jar = PrivateCookieJar::from_headers(&parts.headers, state.cookie_key);

        let connection = state.db_connection.lock().map_err(|error| {
            tracing::error!("could not acquire database lock: {error}");
            Error::DatabaseLockError
        })?;

        resolve_principal(&jar, &connection).map(CurrentUser)
    }
}

/// Get the user named by the auth cookie in `jar`.
///
/// Missing, invalid and expired cookies, as well as tokens for users that no
/// longer exist, resolve to `Ok(None)`.
///
/// # Errors
///
/// Returns an error only if the database query fails.
pub fn resolve_principal(
    jar: &PrivateCookieJar,
    connection: &Connection,
) -> Result<Option<User>, Error> {
    let token = match get_token_from_cookies(jar) {
        Ok(token) => token,
        Err(error) => {
            tracing::debug!("No signed in user: {error}");
            return Ok(None);
        }
    };

    match get_user_by_id(token.user_id, connection) {
        Ok(user) => Ok(Some(user)),
        Err(Error::NotFound) => {
            tracing::warn!("Auth cookie names unknown user {}", token.user_id);
            Ok(None)
        }
        Err(error) => Err(error),
    }
}

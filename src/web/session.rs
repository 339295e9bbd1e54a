//! Cookie sessions: who is logged in, and the gate for protected routes.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Redirect, Response};
use tower_sessions::Session;

use super::{AppError, AppState};
use crate::models::User;

/// Session key holding the logged-in user's id.
pub const USER_ID_KEY: &str = "user_id";

/// Where anonymous visitors of protected routes are sent.
pub const LOGIN_PATH: &str = "/login";

/// The logged-in user, reloaded from the user table on every request.
///
/// Using it as a handler argument makes the route require a session:
/// without one the request is answered with a redirect to the login page.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?;

        match load_user(&session, state).await {
            Ok(Some(user)) => Ok(CurrentUser(user)),
            Ok(None) => Err(Redirect::to(LOGIN_PATH).into_response()),
            Err(e) => Err(e.into_response()),
        }
    }
}

async fn load_user(session: &Session, state: &AppState) -> Result<Option<User>, AppError> {
    let user_id: Option<i64> = session
        .get(USER_ID_KEY)
        .await
        .map_err(|e| AppError::Internal(format!("failed to read session: {e}")))?;

    let Some(user_id) = user_id else {
        return Ok(None);
    };
    Ok(state.with_db(move |db| db.get_user(user_id)).await??)
}

/// Bind the session to `user`, issuing a fresh session id.
pub async fn log_in(session: &Session, user: &User) -> Result<(), AppError> {
    session
        .cycle_id()
        .await
        .map_err(|e| AppError::Internal(format!("failed to cycle session: {e}")))?;
    session
        .insert(USER_ID_KEY, user.id)
        .await
        .map_err(|e| AppError::Internal(format!("failed to write session: {e}")))
}

/// Drop everything stored in the session and expire its cookie.
pub async fn log_out(session: &Session) -> Result<(), AppError> {
    session
        .flush()
        .await
        .map_err(|e| AppError::Internal(format!("failed to clear session: {e}")))
}

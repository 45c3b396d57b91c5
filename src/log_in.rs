//! The route handler for logging in with an email and password.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::{
    AppState, Error, category::CategoryStore, extract::JsonBody, transaction::TransactionStore,
    user::UserStore,
};

/// The credentials for logging in.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LogInData {
    /// Email entered during log-in.
    pub email: String,
    /// Password entered during log-in.
    pub password: String,
}

/// A route handler that checks a user's credentials.
///
/// On success, responds with the user's ID which the client then sends in
/// the `User-ID` header of requests to protected routes. No session is created.
///
/// # Errors
/// Responds with 401 Unauthorized if no user has the given email and password.
pub async fn log_in<C, T, U>(
    State(state): State<AppState<C, T, U>>,
    JsonBody(data): JsonBody<LogInData>,
) -> Result<Json<Value>, Error>
where
    C: CategoryStore + Send + Sync,
    T: TransactionStore + Send + Sync,
    U: UserStore + Send + Sync,
{
    let user = state
        .user_store
        .get_by_credentials(&data.email, &data.password)
        .map_err(|error| match error {
            Error::NotFound => Error::InvalidCredentials,
            error => error.into_internal("Could not log in"),
        })?;

    tracing::debug!("User {} logged in", user.id);

    Ok(Json(
        json!({ "message": "Login successful", "user_id": user.id }),
    ))
}

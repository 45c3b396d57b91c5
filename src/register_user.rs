//! The route handler for registering a new user.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::{
    AppState, Error,
    category::CategoryStore,
    extract::JsonBody,
    transaction::TransactionStore,
    user::{NewUser, UserStore},
};

/// The data for registering a new user.
///
/// Missing fields are treated the same as empty ones.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RegisterData {
    /// The user's display name.
    pub name: String,
    /// The email address the user will log in with.
    pub email: String,
    /// The password the user will log in with.
    pub password: String,
}

/// A route handler for creating a new user.
///
/// Responds with 201 Created and the new user's ID on success.
///
/// # Errors
/// Responds with 400 Bad Request if any of the fields are empty, or 409
/// Conflict if the email is already registered.
pub async fn register_user<C, T, U>(
    State(state): State<AppState<C, T, U>>,
    JsonBody(data): JsonBody<RegisterData>,
) -> Result<(StatusCode, Json<Value>), Error>
where
    C: CategoryStore + Send + Sync,
    T: TransactionStore + Send + Sync,
    U: UserStore + Send + Sync,
{
    if data.name.is_empty() || data.email.is_empty() || data.password.is_empty() {
        return Err(Error::MissingRegistrationFields);
    }

    let user = state
        .user_store
        .create(NewUser {
            name: data.name,
            email: data.email,
            password: data.password,
        })
        .map_err(|error| match error {
            Error::DuplicateEmail => Error::DuplicateEmail,
            error => error.into_internal("Could not create user"),
        })?;

    tracing::info!("Registered user {}", user.id);

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "User created", "id": user.id })),
    ))
}

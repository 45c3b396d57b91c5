//! Middleware that identifies the user making a request from the `User-ID` header.

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{
    AppState, Error,
    category::CategoryStore,
    transaction::TransactionStore,
    user::{UserID, UserStore},
};

/// The header that carries the ID of the user making the request.
pub const USER_ID_HEADER: &str = "User-ID";

/// Middleware function that checks the `User-ID` header refers to a registered user.
///
/// The user ID is placed into the request and then the request executed
/// normally if the user exists, otherwise a 401 Unauthorized JSON error is
/// returned without running the route handler.
///
/// This identifies the caller, it does not authenticate them: any ID of an
/// existing user is accepted.
///
/// **Note**: Route handlers can use the function argument `Extension(user_id): Extension<UserID>` to receive the user ID.
pub async fn identify_user<C, T, U>(
    State(state): State<AppState<C, T, U>>,
    mut request: Request,
    next: Next,
) -> Response
where
    C: CategoryStore + Send + Sync,
    T: TransactionStore + Send + Sync,
    U: UserStore + Send + Sync,
{
    let user_id = match resolve_user_id(request.headers(), &state.user_store) {
        Ok(user_id) => user_id,
        Err(error) => return error.into_response(),
    };

    request.extensions_mut().insert(user_id);

    next.run(request).await
}

/// Get the ID of the registered user named by the `User-ID` header.
///
/// The store is only queried when the header is present.
///
/// # Errors
/// Returns [Error::MissingUserId] if the header is missing or empty,
/// [Error::InvalidUser] if it does not name a registered user, or
/// [Error::Internal] if the store could not be queried.
fn resolve_user_id(headers: &HeaderMap, user_store: &impl UserStore) -> Result<UserID, Error> {
    let raw_user_id = match headers.get(USER_ID_HEADER) {
        Some(value) if !value.is_empty() => value,
        _ => return Err(Error::MissingUserId),
    };

    let user_id = raw_user_id
        .to_str()
        .ok()
        .and_then(|raw_user_id| raw_user_id.trim().parse::<i64>().ok())
        .map(UserID::new)
        .ok_or(Error::InvalidUser)?;

    user_store
        .get(user_id)
        .map(|user| user.id)
        .map_err(|error| match error {
            Error::NotFound => Error::InvalidUser,
            error => error.into_internal("Could not verify user"),
        })
}

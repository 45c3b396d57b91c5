//! Defines the app level error type and its conversion to JSON error responses.

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// The errors that may occur in the application.
///
/// Every error is sent to the client as a JSON object of the form
/// `{"error": "<message>"}`.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The request body could not be parsed as the expected JSON object.
    #[error("{0}")]
    InvalidJson(String),

    /// The query string could not be parsed.
    #[error("{0}")]
    InvalidQuery(String),

    /// One of the name, email or password fields was empty when registering.
    #[error("Name, email and password are required")]
    MissingRegistrationFields,

    /// A user with the given email address already exists.
    #[error("Email already exists")]
    DuplicateEmail,

    /// No user matched the email and password given at log in.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The `User-ID` header was missing from a request to a protected route.
    #[error("User-ID header required")]
    MissingUserId,

    /// The `User-ID` header did not refer to a registered user.
    #[error("Invalid user")]
    InvalidUser,

    /// The category ID used to create a transaction did not match a valid category.
    #[error("Invalid category")]
    InvalidCategory,

    /// A transaction date that is not a calendar date in the form YYYY-MM-DD.
    #[error("Invalid date \"{0}\", expected a date in the form YYYY-MM-DD")]
    InvalidDate(String),

    /// The month or year query parameter was missing from a summary request.
    #[error("Month and year parameters required")]
    MissingSummaryPeriod,

    /// The month or year query parameter could not be turned into a calendar month.
    #[error("Invalid month or year")]
    InvalidSummaryPeriod,

    /// The request body was larger than the server accepts.
    #[error("Request body too large")]
    PayloadTooLarge,

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("Not found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock.
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An unexpected error occurred while handling a request.
    ///
    /// The message is shown to the client and must not contain any details
    /// about the underlying cause.
    #[error("{0}")]
    Internal(&'static str),
}

impl Error {
    /// The HTTP status code the error is sent with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidJson(_)
            | Error::InvalidQuery(_)
            | Error::MissingRegistrationFields
            | Error::InvalidCategory
            | Error::InvalidDate(_)
            | Error::MissingSummaryPeriod
            | Error::InvalidSummaryPeriod => StatusCode::BAD_REQUEST,
            Error::DuplicateEmail => StatusCode::CONFLICT,
            Error::InvalidCredentials | Error::MissingUserId | Error::InvalidUser => {
                StatusCode::UNAUTHORIZED
            }
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Error::SqlError(_) | Error::DatabaseLockError | Error::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Log the error and replace it with [Error::Internal] so that the
    /// client only sees `message`.
    pub(crate) fn into_internal(self, message: &'static str) -> Self {
        tracing::error!("{message}: {self}");
        Error::Internal(message)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.ends_with("user.email") =>
            {
                Error::DuplicateEmail
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            // Logged by `into_internal` or when turned into a response.
            error => Error::SqlError(error),
        }
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::InvalidJson(rejection.body_text())
    }
}

impl From<QueryRejection> for Error {
    fn from(rejection: QueryRejection) -> Self {
        Error::InvalidQuery(rejection.body_text())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        let message = match self {
            // These errors may contain details that are not intended to be shown to the client.
            Error::SqlError(_) | Error::DatabaseLockError => {
                tracing::error!("An unexpected error occurred: {}", self);
                "Internal server error".to_owned()
            }
            error => error.to_string(),
        };

        (status_code, Json(json!({ "error": message }))).into_response()
    }
}

//! Helpers shared by the tests of the route handlers and middleware.

mod stores;

use axum_test::TestServer;
use rusqlite::Connection;
use serde_json::json;

use crate::{
    app_state::{SQLAppState, create_app_state},
    endpoints,
};

pub(crate) use stores::{FailingCategoryStore, FailingTransactionStore, FailingUserStore};

/// The password every user created by [register_test_user] has.
pub(crate) const TEST_PASSWORD: &str = "hunter2";

/// An app state backed by a fresh in-memory database with the default categories.
pub(crate) fn get_test_app_state() -> SQLAppState {
    let connection =
        Connection::open_in_memory().expect("Could not create in-memory SQLite database");

    create_app_state(connection).expect("Could not create app state")
}

/// Register a user with `email` and [TEST_PASSWORD] and return their ID.
pub(crate) async fn register_test_user(server: &TestServer, email: &str) -> i64 {
    let response = server
        .post(endpoints::REGISTER)
        .json(&json!({
            "name": "Test User",
            "email": email,
            "password": TEST_PASSWORD,
        }))
        .await;

    response.assert_status(axum::http::StatusCode::CREATED);

    response.json::<serde_json::Value>()["id"]
        .as_i64()
        .expect("Registration response missing the user ID")
}

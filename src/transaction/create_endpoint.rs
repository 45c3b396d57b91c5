//! The route handler for creating a new transaction for the current user.

use axum::{Extension, Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime, macros::format_description};

use crate::{
    AppState, Error,
    category::CategoryStore,
    database_id::DatabaseID,
    extract::JsonBody,
    transaction::{NewTransaction, Transaction, TransactionStore},
    user::{UserID, UserStore},
};

/// The JSON body for creating a transaction.
///
/// Missing fields take their default values. A missing category ID will
/// never match a category.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TransactionData {
    /// The ID of the category the transaction belongs to.
    pub category_id: DatabaseID,
    /// The amount of money spent or earned.
    pub amount: f64,
    /// What the transaction was for.
    pub description: String,
    /// A date in the form YYYY-MM-DD. Defaults to today if omitted or empty.
    pub date: Option<String>,
}

/// A route handler for creating a new transaction owned by the user making the request.
pub async fn create_transaction_endpoint<C, T, U>(
    State(state): State<AppState<C, T, U>>,
    Extension(user_id): Extension<UserID>,
    JsonBody(data): JsonBody<TransactionData>,
) -> Result<(StatusCode, Json<Transaction>), Error>
where
    C: CategoryStore + Send + Sync,
    T: TransactionStore + Send + Sync,
    U: UserStore + Send + Sync,
{
    let category = state
        .category_store
        .get(data.category_id)
        .map_err(|error| match error {
            Error::NotFound => Error::InvalidCategory,
            error => error.into_internal("Could not create transaction"),
        })?;

    let date = match data.date.as_deref() {
        None | Some("") => today(),
        Some(raw_date) => parse_date(raw_date)?,
    };

    let transaction = state
        .transaction_store
        .create(NewTransaction {
            user_id,
            category_id: category.id,
            amount: data.amount,
            description: data.description,
            date,
        })
        .map_err(|error| match error {
            Error::InvalidCategory => Error::InvalidCategory,
            error => error.into_internal("Could not create transaction"),
        })?;

    tracing::debug!(
        "Created transaction {} for user {}",
        transaction.id,
        transaction.user_id
    );

    Ok((StatusCode::CREATED, Json(transaction)))
}

/// Parse a date in the form YYYY-MM-DD.
///
/// # Errors
/// Returns [Error::InvalidDate] if `raw_date` is not a valid calendar date in that form.
pub(crate) fn parse_date(raw_date: &str) -> Result<Date, Error> {
    Date::parse(raw_date, format_description!("[year]-[month]-[day]"))
        .map_err(|_| Error::InvalidDate(raw_date.to_owned()))
}

/// Today's date in the server's local timezone, or UTC if the local offset cannot be determined.
fn today() -> Date {
    OffsetDateTime::now_local()
        .unwrap_or_else(|_| OffsetDateTime::now_utc())
        .date()
}

#[cfg(test)]
mod create_transaction_tests {
    use axum_test::TestServer;
    use serde_json::json;
    use time::macros::date;

    use crate::{
        Error, auth::USER_ID_HEADER, build_router, endpoints,
        test_utils::{get_test_app_state, register_test_user},
        transaction::Transaction,
    };

    use super::parse_date;

    async fn get_server_and_user() -> (TestServer, i64) {
        let server = TestServer::new(build_router(get_test_app_state()))
            .expect("Could not create test server.");
        let user_id = register_test_user(&server, "alice@example.com").await;

        (server, user_id)
    }

    #[tokio::test]
    async fn create_transaction_succeeds() {
        let (server, user_id) = get_server_and_user().await;

        let response = server
            .post(endpoints::TRANSACTIONS)
            .add_header(USER_ID_HEADER, user_id.to_string())
            .json(&json!({
                "category_id": 2,
                "amount": 40.5,
                "description": "Groceries",
                "date": "2024-03-15",
            }))
            .await;

        response.assert_status(axum::http::StatusCode::CREATED);
        let transaction = response.json::<Transaction>();
        assert!(transaction.id > 0);
        assert_eq!(transaction.user_id.as_i64(), user_id);
        assert_eq!(transaction.category_id, 2);
        assert_eq!(transaction.amount, 40.5);
        assert_eq!(transaction.description, "Groceries");
        assert_eq!(transaction.date, date!(2024 - 03 - 15));
    }

    #[tokio::test]
    async fn create_transaction_serializes_date_as_string() {
        let (server, user_id) = get_server_and_user().await;

        let response = server
            .post(endpoints::TRANSACTIONS)
            .add_header(USER_ID_HEADER, user_id.to_string())
            .json(&json!({
                "category_id": 1,
                "amount": 1000,
                "description": "Pay day",
                "date": "2024-03-01",
            }))
            .await;

        let body = response.json::<serde_json::Value>();
        assert_eq!(body["date"], "2024-03-01");
    }

    #[tokio::test]
    async fn create_transaction_without_date_uses_today() {
        let (server, user_id) = get_server_and_user().await;

        for body in [
            json!({ "category_id": 2, "amount": 5, "description": "Coffee" }),
            json!({ "category_id": 2, "amount": 5, "description": "Coffee", "date": "" }),
        ] {
            let response = server
                .post(endpoints::TRANSACTIONS)
                .add_header(USER_ID_HEADER, user_id.to_string())
                .json(&body)
                .await;

            response.assert_status(axum::http::StatusCode::CREATED);
            let transaction = response.json::<Transaction>();
            let today = time::OffsetDateTime::now_utc().date();
            assert!(
                (transaction.date - today).whole_days().abs() <= 1,
                "got date {}, want a date close to {today}",
                transaction.date
            );
        }
    }

    #[tokio::test]
    async fn create_transaction_fails_on_invalid_category() {
        let (server, user_id) = get_server_and_user().await;

        let response = server
            .post(endpoints::TRANSACTIONS)
            .add_header(USER_ID_HEADER, user_id.to_string())
            .json(&json!({
                "category_id": 999,
                "amount": 40,
                "description": "Groceries",
            }))
            .await;

        response.assert_status_bad_request();
        response.assert_json(&json!({ "error": "Invalid category" }));

        let transactions = server
            .get(endpoints::TRANSACTIONS)
            .add_header(USER_ID_HEADER, user_id.to_string())
            .await
            .json::<Vec<Transaction>>();
        assert!(transactions.is_empty());
    }

    #[tokio::test]
    async fn create_transaction_fails_on_missing_category() {
        let (server, user_id) = get_server_and_user().await;

        let response = server
            .post(endpoints::TRANSACTIONS)
            .add_header(USER_ID_HEADER, user_id.to_string())
            .json(&json!({ "amount": 40, "description": "Groceries" }))
            .await;

        response.assert_status_bad_request();
        response.assert_json(&json!({ "error": "Invalid category" }));
    }

    #[tokio::test]
    async fn create_transaction_fails_on_invalid_date() {
        let (server, user_id) = get_server_and_user().await;

        let response = server
            .post(endpoints::TRANSACTIONS)
            .add_header(USER_ID_HEADER, user_id.to_string())
            .json(&json!({
                "category_id": 2,
                "amount": 40,
                "description": "Groceries",
                "date": "2024-02-30",
            }))
            .await;

        response.assert_status_bad_request();
    }

    #[tokio::test]
    async fn create_transaction_fails_on_malformed_json() {
        let (server, user_id) = get_server_and_user().await;

        let response = server
            .post(endpoints::TRANSACTIONS)
            .add_header(USER_ID_HEADER, user_id.to_string())
            .json(&json!({ "category_id": "food", "amount": 40 }))
            .await;

        response.assert_status_bad_request();
    }

    #[test]
    fn parse_date_accepts_iso_dates() {
        assert_eq!(parse_date("2024-02-29"), Ok(date!(2024 - 02 - 29)));
    }

    #[test]
    fn parse_date_rejects_other_formats() {
        for raw_date in ["2023-02-29", "2024-3-1", "01/03/2024", "yesterday"] {
            assert_eq!(
                parse_date(raw_date),
                Err(Error::InvalidDate(raw_date.to_owned())),
                "want {raw_date} to be rejected"
            );
        }
    }
}

//! Monthly income and expense totals for a user's transactions.

use std::{collections::HashMap, ops::RangeInclusive};

use axum::{Extension, Json, extract::State};
use serde::{Deserialize, Serialize};
use time::{Date, Month};

use crate::{
    AppState, Error,
    category::{Category, CategoryStore},
    database_id::DatabaseID,
    extract::QueryParams,
    transaction::{Transaction, TransactionQuery, TransactionStore},
    user::{UserID, UserStore},
};

/// The key used in [MonthlySummary::category_summary] for transactions whose
/// category could not be found.
pub const UNCATEGORIZED_LABEL: &str = "Uncategorized";

/// The query parameters for [get_summary_endpoint].
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SummaryParams {
    /// The month as a number from 1 to 12.
    pub month: Option<String>,
    /// The year, e.g. 2024.
    pub year: Option<String>,
}

/// A calendar month in a specific year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryPeriod {
    year: i32,
    month: Month,
}

impl SummaryPeriod {
    /// Parse the month (1-12, zero padding optional) and year query parameters.
    ///
    /// # Errors
    /// Returns [Error::MissingSummaryPeriod] if either parameter is missing or
    /// empty, or [Error::InvalidSummaryPeriod] if they are not a valid month
    /// and year.
    pub fn parse(month: Option<&str>, year: Option<&str>) -> Result<Self, Error> {
        let (raw_month, raw_year) = match (month.map(str::trim), year.map(str::trim)) {
            (Some(month), Some(year)) if !month.is_empty() && !year.is_empty() => (month, year),
            _ => return Err(Error::MissingSummaryPeriod),
        };

        let month = raw_month
            .parse::<u8>()
            .ok()
            .and_then(|month| Month::try_from(month).ok())
            .ok_or(Error::InvalidSummaryPeriod)?;
        let year = raw_year
            .parse::<i32>()
            .map_err(|_| Error::InvalidSummaryPeriod)?;

        let period = Self { year, month };
        // Reject years that cannot be represented as a date.
        period.date_range()?;

        Ok(period)
    }

    /// The first to the last day of the month, inclusive.
    ///
    /// # Errors
    /// Returns [Error::InvalidSummaryPeriod] if the month lies outside the range of supported dates.
    pub fn date_range(&self) -> Result<RangeInclusive<Date>, Error> {
        let first_day = Date::from_calendar_date(self.year, self.month, 1)
            .map_err(|_| Error::InvalidSummaryPeriod)?;

        let last_day =
            Date::from_calendar_date(self.year, self.month, self.month.length(self.year))
                .map_err(|_| Error::InvalidSummaryPeriod)?;

        Ok(first_day..=last_day)
    }
}

/// The totals for income and expenses over a period of time.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySummary {
    /// The sum of amounts in income categories.
    pub total_income: f64,
    /// The sum of amounts in all other categories.
    pub total_expense: f64,
    /// Income minus expenses.
    pub net_balance: f64,
    /// The sum of amounts for each category name.
    pub category_summary: HashMap<String, f64>,
}

/// Add up `transactions` by category.
///
/// Transactions in a category whose type is exactly "income" count towards
/// income, everything else counts towards expenses. Transactions whose
/// category is not in `categories` are counted as expenses under
/// [UNCATEGORIZED_LABEL].
pub fn summarize(
    transactions: &[Transaction],
    categories: &HashMap<DatabaseID, Category>,
) -> MonthlySummary {
    let mut summary = MonthlySummary::default();

    for transaction in transactions {
        let category = categories.get(&transaction.category_id);

        match category {
            Some(category) if category.is_income() => summary.total_income += transaction.amount,
            _ => summary.total_expense += transaction.amount,
        }

        let label = match category {
            Some(category) => category.name.clone(),
            None => {
                tracing::warn!(
                    "Transaction {} refers to the missing category {}",
                    transaction.id,
                    transaction.category_id
                );
                UNCATEGORIZED_LABEL.to_owned()
            }
        };

        *summary.category_summary.entry(label).or_insert(0.0) += transaction.amount;
    }

    summary.net_balance = summary.total_income - summary.total_expense;

    summary
}

/// A route handler that summarizes the current user's transactions for one calendar month.
pub async fn get_summary_endpoint<C, T, U>(
    State(state): State<AppState<C, T, U>>,
    Extension(user_id): Extension<UserID>,
    QueryParams(params): QueryParams<SummaryParams>,
) -> Result<Json<MonthlySummary>, Error>
where
    C: CategoryStore + Send + Sync,
    T: TransactionStore + Send + Sync,
    U: UserStore + Send + Sync,
{
    let period = SummaryPeriod::parse(params.month.as_deref(), params.year.as_deref())?;

    let transactions = state
        .transaction_store
        .get_query(TransactionQuery {
            user_id,
            date_range: Some(period.date_range()?),
        })
        .map_err(|error| error.into_internal("Could not fetch transactions"))?;

    let categories = state
        .category_store
        .get_all()
        .map_err(|error| error.into_internal("Could not fetch transactions"))?
        .into_iter()
        .map(|category| (category.id, category))
        .collect();

    Ok(Json(summarize(&transactions, &categories)))
}



#[cfg(test)]
mod summary_endpoint_tests {
    use axum_test::TestServer;
    use serde_json::json;

    use crate::{
        auth::USER_ID_HEADER,
        build_router, endpoints,
        test_utils::{get_test_app_state, register_test_user},
    };

    async fn create_transaction(
        server: &TestServer,
        user_id: i64,
        category_id: i64,
        amount: f64,
        date: &str,
    ) {
        server
            .post(endpoints::TRANSACTIONS)
            .add_header(USER_ID_HEADER, user_id.to_string())
            .json(&json!({
                "category_id": category_id,
                "amount": amount,
                "description": "",
                "date": date,
            }))
            .await
            .assert_status(axum::http::StatusCode::CREATED);
    }

    async fn get_server_and_user() -> (TestServer, i64) {
        let server = TestServer::new(build_router(get_test_app_state()))
            .expect("Could not create test server.");
        let user_id = register_test_user(&server, "alice@example.com").await;

        (server, user_id)
    }

    #[tokio::test]
    async fn summary_of_salary_and_food() {
        let (server, user_id) = get_server_and_user().await;
        // Seeded categories: 1 is Salary (income), 2 is Food (expense).
        create_transaction(&server, user_id, 1, 1000.0, "2024-03-01").await;
        create_transaction(&server, user_id, 2, 40.0, "2024-03-15").await;

        let response = server
            .get(endpoints::TRANSACTION_SUMMARY)
            .add_header(USER_ID_HEADER, user_id.to_string())
            .add_query_param("month", "03")
            .add_query_param("year", "2024")
            .await;

        response.assert_status_ok();
        response.assert_json(&json!({
            "total_income": 1000.0,
            "total_expense": 40.0,
            "net_balance": 960.0,
            "category_summary": { "Salary": 1000.0, "Food": 40.0 },
        }));
    }

    #[tokio::test]
    async fn summary_only_includes_the_requested_month_and_user() {
        let (server, user_id) = get_server_and_user().await;
        let other_user_id = register_test_user(&server, "bob@example.com").await;
        create_transaction(&server, user_id, 2, 1.0, "2024-02-29").await;
        create_transaction(&server, user_id, 2, 2.0, "2024-03-01").await;
        create_transaction(&server, user_id, 2, 4.0, "2024-03-31").await;
        create_transaction(&server, user_id, 2, 8.0, "2024-04-01").await;
        create_transaction(&server, other_user_id, 2, 16.0, "2024-03-10").await;

        let response = server
            .get(endpoints::TRANSACTION_SUMMARY)
            .add_header(USER_ID_HEADER, user_id.to_string())
            .add_query_param("month", "3")
            .add_query_param("year", "2024")
            .await;

        response.assert_status_ok();
        response.assert_json(&json!({
            "total_income": 0.0,
            "total_expense": 6.0,
            "net_balance": -6.0,
            "category_summary": { "Food": 6.0 },
        }));
    }

    #[tokio::test]
    async fn summary_without_period_is_bad_request() {
        let (server, user_id) = get_server_and_user().await;

        let response = server
            .get(endpoints::TRANSACTION_SUMMARY)
            .add_header(USER_ID_HEADER, user_id.to_string())
            .add_query_param("month", "03")
            .await;

        response.assert_status_bad_request();
        response.assert_json(&json!({ "error": "Month and year parameters required" }));
    }

    #[tokio::test]
    async fn summary_with_invalid_month_is_bad_request() {
        let (server, user_id) = get_server_and_user().await;

        let response = server
            .get(endpoints::TRANSACTION_SUMMARY)
            .add_header(USER_ID_HEADER, user_id.to_string())
            .add_query_param("month", "13")
            .add_query_param("year", "2024")
            .await;

        response.assert_status_bad_request();
        response.assert_json(&json!({ "error": "Invalid month or year" }));
    }
}

//! Application router configuration with protected and unprotected route definitions.

use std::{any::Any, time::Duration};

use axum::{
    Json, Router,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;
use tower_http::{catch_panic::CatchPanicLayer, timeout::TimeoutLayer};

use crate::{
    AppState, Error,
    auth::identify_user,
    category::{CategoryStore, get_categories},
    endpoints,
    log_in::log_in,
    logging::logging_middleware,
    register_user::register_user,
    transaction::{
        TransactionStore, create_transaction_endpoint, get_summary_endpoint,
        list_transactions_endpoint,
    },
    user::UserStore,
};

/// Return a router with all the app's routes.
///
/// Routes under `/transactions` require the `User-ID` header.
pub fn build_router<C, T, U>(state: AppState<C, T, U>) -> Router
where
    C: CategoryStore + Clone + Send + Sync + 'static,
    T: TransactionStore + Clone + Send + Sync + 'static,
    U: UserStore + Clone + Send + Sync + 'static,
{
    let unprotected_routes = Router::new()
        .route(endpoints::REGISTER, post(register_user::<C, T, U>))
        .route(endpoints::LOG_IN, post(log_in::<C, T, U>))
        .route(endpoints::CATEGORIES, get(get_categories::<C, T, U>));

    let protected_routes = Router::new()
        .route(
            endpoints::TRANSACTIONS,
            get(list_transactions_endpoint::<C, T, U>).post(create_transaction_endpoint::<C, T, U>),
        )
        .route(
            endpoints::TRANSACTIONS_NO_TRAILING_SLASH,
            get(list_transactions_endpoint::<C, T, U>).post(create_transaction_endpoint::<C, T, U>),
        )
        .route(
            endpoints::TRANSACTION_SUMMARY,
            get(get_summary_endpoint::<C, T, U>),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            identify_user::<C, T, U>,
        ));

    protected_routes
        .merge(unprotected_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}

/// Wrap `router` in the layers every request goes through: request/response
/// logging, a timeout of `request_timeout` and conversion of panics into 500
/// responses.
pub fn add_service_layers(router: Router, request_timeout: Duration) -> Router {
    router
        .layer(middleware::from_fn(logging_middleware))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(CatchPanicLayer::custom(handle_panic))
}

async fn get_404_not_found() -> Error {
    Error::NotFound
}

fn handle_panic(error: Box<dyn Any + Send + 'static>) -> Response {
    let details = if let Some(message) = error.downcast_ref::<String>() {
        message.as_str()
    } else if let Some(message) = error.downcast_ref::<&str>() {
        message
    } else {
        "unknown panic message"
    };

    tracing::error!("A request handler panicked: {details}");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Internal server error" })),
    )
        .into_response()
}

#[cfg(test)]
mod routing_tests {
    use std::time::Duration;

    use axum::{Router, http::StatusCode, routing::get};
    use axum_test::TestServer;
    use serde_json::json;

    use crate::{build_router, endpoints, test_utils::get_test_app_state};

    use super::add_service_layers;

    async fn panicking_handler() -> &'static str {
        panic!("oh no")
    }

    #[tokio::test]
    async fn unknown_route_returns_json_not_found() {
        let server = TestServer::new(build_router(get_test_app_state()))
            .expect("Could not create test server.");

        let response = server.get("/does-not-exist").await;

        response.assert_status_not_found();
        response.assert_json(&json!({ "error": "Not found" }));
    }

    #[tokio::test]
    async fn categories_do_not_need_user_id() {
        let server = TestServer::new(build_router(get_test_app_state()))
            .expect("Could not create test server.");

        let response = server.get(endpoints::CATEGORIES).await;

        response.assert_status_ok();
        let categories = response.json::<serde_json::Value>();
        assert_eq!(categories.as_array().map(Vec::len), Some(4));
        assert_eq!(
            categories[0],
            json!({ "id": 1, "name": "Salary", "type": "income" })
        );
    }

    #[tokio::test]
    async fn transaction_routes_need_user_id() {
        let server = TestServer::new(build_router(get_test_app_state()))
            .expect("Could not create test server.");

        for response in [
            server.get(endpoints::TRANSACTIONS).await,
            server.get(endpoints::TRANSACTIONS_NO_TRAILING_SLASH).await,
            server.post(endpoints::TRANSACTIONS).json(&json!({})).await,
            server
                .get(endpoints::TRANSACTION_SUMMARY)
                .add_query_param("month", "03")
                .add_query_param("year", "2024")
                .await,
        ] {
            response.assert_status_unauthorized();
            response.assert_json(&json!({ "error": "User-ID header required" }));
        }
    }

    #[tokio::test]
    async fn panic_returns_json_internal_server_error() {
        let router = Router::new().route("/panic", get(panicking_handler));
        let server = TestServer::new(add_service_layers(router, Duration::from_secs(30)))
            .expect("Could not create test server.");

        let response = server.get("/panic").await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        response.assert_json(&json!({ "error": "Internal server error" }));
    }

    #[tokio::test]
    async fn slow_request_times_out() {
        let router = Router::new().route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                "done"
            }),
        );
        let server = TestServer::new(add_service_layers(router, Duration::from_millis(10)))
            .expect("Could not create test server.");

        let response = server.get("/slow").await;

        response.assert_status(StatusCode::REQUEST_TIMEOUT);
    }
}

//! Request extractors that reject with the app's JSON [Error] instead of axum's plain text rejections.

use axum::extract::{FromRequest, FromRequestParts};

use crate::Error;

/// Extracts a JSON request body like [axum::Json], rejecting with
/// [Error::InvalidJson].
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(Error))]
pub struct JsonBody<T>(pub T);

/// Extracts the query string like [axum::extract::Query], rejecting with
/// [Error::InvalidQuery].
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(Error))]
pub struct QueryParams<T>(pub T);

#[cfg(test)]
mod extract_tests {
    use axum::{Json, Router, routing::post};
    use axum_test::TestServer;
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    use super::JsonBody;

    #[derive(Serialize, Deserialize)]
    struct Foo {
        bar: i64,
    }

    async fn echo(JsonBody(foo): JsonBody<Foo>) -> Json<Foo> {
        Json(foo)
    }

    fn get_test_server() -> TestServer {
        let app = Router::new().route("/echo", post(echo));

        TestServer::new(app).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn valid_json_is_extracted() {
        let server = get_test_server();

        let response = server.post("/echo").json(&json!({ "bar": 42 })).await;

        response.assert_status_ok();
        response.assert_json(&json!({ "bar": 42 }));
    }

    #[tokio::test]
    async fn invalid_json_is_rejected_with_json_error() {
        let server = get_test_server();

        let response = server.post("/echo").json(&json!({ "bar": "baz" })).await;

        response.assert_status_bad_request();
        let body = response.json::<serde_json::Value>();
        assert!(body["error"].is_string(), "got body {body}");
    }

    #[tokio::test]
    async fn missing_content_type_is_rejected_with_bad_request() {
        let server = get_test_server();

        let response = server.post("/echo").text("{\"bar\": 42}").await;

        response.assert_status_bad_request();
    }
}

/// Request extractors
///
/// [`ApiJson`] is `axum::Json` with its rejections routed through
/// [`ApiError`], so a malformed or incomplete body gets the same
/// `{"error", "code"}` shape as every other failure.

use crate::error::ApiError;
use axum::extract::FromRequest;

/// JSON request body
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, Method, StatusCode},
        routing::post,
        Router,
    };
    use serde::Deserialize;
    use tower::ServiceExt;

    #[derive(Debug, Deserialize)]
    struct Credentials {
        email: String,
        password: String,
    }

    fn app() -> Router {
        Router::new().route(
            "/echo",
            post(|ApiJson(body): ApiJson<Credentials>| async move {
                format!("{}:{}", body.email, body.password.len())
            }),
        )
    }

    async fn send(body: &'static str, content_type: Option<&str>) -> (StatusCode, serde_json::Value) {
        let mut builder = axum::http::Request::builder()
            .method(Method::POST)
            .uri("/echo");
        if let Some(content_type) = content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }

        let response = app()
            .oneshot(builder.body(Body::from(body)).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn test_valid_body_passes_through() {
        let (status, _) = send(
            r#"{"email":"a@example.com","password":"pw"}"#,
            Some("application/json"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_missing_field_is_validation_error() {
        let (status, body) = send(r#"{"email":"a@example.com"}"#, Some("application/json")).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["code"], "validation_error");
        assert_eq!(body["details"][0]["field"], "body");
        assert!(body["details"][0]["message"]
            .as_str()
            .is_some_and(|m| m.contains("password")));
    }

    #[tokio::test]
    async fn test_syntax_error_is_bad_request() {
        let (status, body) = send("{not json", Some("application/json")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "bad_request");
    }

    #[tokio::test]
    async fn test_missing_content_type_is_bad_request() {
        let (status, body) = send(r#"{"email":"a","password":"b"}"#, None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "bad_request");
    }
}

//! Body, query and path extractors whose rejections render as the standard
//! error envelope with `E0008` instead of axum's plain-text bodies.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts};

use crate::errors::AppError;

#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct AppPath<T>(pub T);

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::bad_request(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::bad_request(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::bad_request(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use axum::routing::{get, post};
    use axum::Router;
    use serde::Deserialize;
    use tower::ServiceExt;

    use super::*;

    #[derive(Deserialize)]
    struct Paging {
        page: u32,
    }

    fn app() -> Router {
        Router::new()
            .route("/body", post(|AppJson(n): AppJson<u32>| async move { n.to_string() }))
            .route("/query", get(|AppQuery(p): AppQuery<Paging>| async move { p.page.to_string() }))
            .route("/path/:id", get(|AppPath(id): AppPath<u32>| async move { id.to_string() }))
    }

    async fn envelope(request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = app().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn wrongly_typed_body_is_a_bad_request_envelope() {
        let request = Request::post("/body")
            .header("content-type", "application/json")
            .body(Body::from("\"five\""))
            .unwrap();

        let (status, body) = envelope(request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "E0008");
    }

    #[tokio::test]
    async fn missing_content_type_is_a_bad_request_envelope() {
        let (status, body) = envelope(Request::post("/body").body(Body::from("5")).unwrap()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "E0008");
    }

    #[tokio::test]
    async fn unparseable_query_is_a_bad_request_envelope() {
        let (status, body) =
            envelope(Request::get("/query?page=abc").body(Body::empty()).unwrap()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "E0008");
    }

    #[tokio::test]
    async fn unparseable_path_is_a_bad_request_envelope() {
        let (status, body) =
            envelope(Request::get("/path/abc").body(Body::empty()).unwrap()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "E0008");
    }
}

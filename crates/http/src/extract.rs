//! Request extractors that reject with [`AppError`] instead of axum's plain-text
//! rejections.
//!
//! JSON handlers take these directly. HTML handlers take `Result<FormBody<T>, AppError>`
//! and convert with `?` so the rejection renders through `HtmlError`.

use axum::{
    extract::{
        rejection::{FormRejection, JsonRejection, PathRejection},
        FromRequest, FromRequestParts, Request,
    },
    http::{request::Parts, StatusCode},
};
use serde_json::json;

use crate::error::AppError;

/// [`axum::Json`] with an [`AppError`] rejection
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    axum::Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let axum::Json(value) = axum::Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

/// [`axum::Form`] with an [`AppError`] rejection
#[derive(Debug)]
pub struct FormBody<T>(pub T);

impl<S, T> FromRequest<S> for FormBody<T>
where
    axum::Form<T>: FromRequest<S, Rejection = FormRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let axum::Form(value) = axum::Form::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

/// [`axum::extract::Path`] with an [`AppError`] rejection
#[derive(Debug)]
pub struct PathParam<T>(pub T);

impl<S, T> FromRequestParts<S> for PathParam<T>
where
    axum::extract::Path<T>: FromRequestParts<S, Rejection = PathRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let axum::extract::Path(value) =
            axum::extract::Path::<T>::from_request_parts(parts, state).await?;
        Ok(Self(value))
    }
}

/// Well-formed bodies of the wrong shape are validation failures; anything
/// else the client sent is a bad request.
fn rejected(status: StatusCode, reason: String) -> AppError {
    if status == StatusCode::UNPROCESSABLE_ENTITY {
        AppError::validation(
            vec![json!({ "field": "body", "error": reason })],
            "Request body does not match the expected fields",
        )
    } else if status.is_server_error() {
        AppError::Internal(anyhow::anyhow!(reason))
    } else {
        AppError::bad_request(reason)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        rejected(rejection.status(), rejection.body_text())
    }
}

impl From<FormRejection> for AppError {
    fn from(rejection: FormRejection) -> Self {
        rejected(rejection.status(), rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        rejected(rejection.status(), rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request},
        routing::{get, post},
        Router,
    };
    use serde::Deserialize;
    use tower::ServiceExt;

    #[derive(Debug, Deserialize)]
    struct Named {
        name: String,
    }

    fn router() -> Router {
        Router::new()
            .route(
                "/json",
                post(|JsonBody(body): JsonBody<Named>| async move { body.name }),
            )
            .route(
                "/form",
                post(|FormBody(body): FormBody<Named>| async move { body.name }),
            )
            .route(
                "/items/{id}",
                get(|PathParam(id): PathParam<i64>| async move { id.to_string() }),
            )
    }

    async fn send(request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = router().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn json_request(body: &str) -> Request<Body> {
        Request::post("/json")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn accepted_input_passes_through() {
        let response = router()
            .oneshot(json_request(r#"{"name":"shelf"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request() {
        let (status, body) = send(json_request("{5: 1}")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "bad_request");
        assert!(body["error"]["message"].as_str().unwrap().contains("JSON"));
    }

    #[tokio::test]
    async fn mistyped_json_field_is_validation_error() {
        let (status, body) = send(json_request(r#"{"name": 5}"#)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "validation_error");
        assert_eq!(body["error"]["details"][0]["field"], "body");
    }

    #[tokio::test]
    async fn form_without_content_type_is_bad_request() {
        let (status, body) = send(
            Request::post("/form")
                .body(Body::from("name=shelf"))
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("Content-Type"));
    }

    #[tokio::test]
    async fn non_integer_path_param_is_bad_request() {
        let (status, body) = send(Request::get("/items/abc").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "bad_request");
    }
}

//! JSON body extractor with the API error envelope

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    response::{IntoResponse, Response},
    Json as AxumJson,
};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::error::{ApiError, BAD_REQUEST_MESSAGE};

/// JSON extractor whose rejections are `400 bad_request`
///
/// The body is parsed whatever the `Content-Type` header says.
#[derive(Debug, Clone, Copy, Default)]
pub struct Json<T>(pub T);

impl<T> Json<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> std::ops::Deref for Json<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S, T> FromRequest<S> for Json<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state).await.map_err(|rejection| {
            debug!(reason = %rejection.body_text(), "Unreadable request body");
            ApiError::bad_request(BAD_REQUEST_MESSAGE)
        })?;

        serde_json::from_slice(&body).map(Json).map_err(|e| {
            debug!(reason = %e, "Malformed JSON body");
            ApiError::bad_request(BAD_REQUEST_MESSAGE)
        })
    }
}

impl<T> IntoResponse for Json<T>
where
    T: serde::Serialize,
{
    fn into_response(self) -> Response {
        AxumJson(self.0).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::StatusCode};
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct NamePayload {
        name: String,
    }

    async fn extract(body: &'static str) -> Result<Json<NamePayload>, ApiError> {
        let request = Request::builder().body(Body::from(body)).unwrap();
        Json::<NamePayload>::from_request(request, &()).await
    }

    #[tokio::test]
    async fn test_parses_without_content_type() {
        let Json(payload) = extract(r#"{"name":"ApiHub"}"#).await.unwrap();
        assert_eq!(payload.name, "ApiHub");
    }

    #[tokio::test]
    async fn test_malformed_body_is_bad_request() {
        for body in ["{\"name\":", "", "[]", r#"{"other":1}"#] {
            let err = extract(body).await.unwrap_err();
            assert_eq!(err.status, StatusCode::BAD_REQUEST);
            assert_eq!(err.response.error_description, BAD_REQUEST_MESSAGE);
        }
    }
}

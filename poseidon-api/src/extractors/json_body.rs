//! Lenient JSON body extractor.
//!
//! Unlike `axum::Json`, `JsonBody<T>` does not require a JSON content type,
//! treats an empty body as `{}`, and rejects with the API error envelope
//! (`400 INVALID_INPUT`) instead of a plain-text body.

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;

use crate::error::ApiError;

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::invalid_input(format!("Failed to read body: {}", e.body_text())))?;

        let raw: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
            b"{}"
        } else {
            &bytes[..]
        };

        Ok(JsonBody(serde_json::from_slice(raw)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use axum::{body::Body, http};
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Payload {
        #[serde(default)]
        query: Option<String>,
    }

    async fn extract(body: &'static str) -> Result<Payload, ApiError> {
        let request = http::Request::builder()
            .method("POST")
            .uri("/")
            .body(Body::from(body))
            .map_err(|e| ApiError::internal_error(e.to_string()))?;
        let JsonBody(payload) = JsonBody::<Payload>::from_request(request, &()).await?;
        Ok(payload)
    }

    #[tokio::test]
    async fn test_empty_body_is_empty_object() -> Result<(), ApiError> {
        assert_eq!(extract("").await?, Payload { query: None });
        assert_eq!(extract("  \n").await?, Payload { query: None });
        Ok(())
    }

    #[tokio::test]
    async fn test_parses_json() -> Result<(), ApiError> {
        assert_eq!(
            extract(r#"{"query": "ai"}"#).await?,
            Payload {
                query: Some("ai".to_string())
            }
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_malformed_json_is_invalid_input() {
        let err = extract("{not json").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidInput);
    }
}

//! Caller identity extraction.
//!
//! The core never authenticates. An upstream gateway (the deployment's
//! auth layer) asserts the caller in the `X-User-Id` header; this
//! extractor only trusts and propagates it.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use studium_core::defaults;

use crate::error::ApiError;

/// The authenticated caller's owner id, taken from `X-User-Id`.
#[derive(Debug, Clone)]
pub struct UserId(pub String);

impl UserId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[async_trait::async_trait]
impl<S> FromRequestParts<S> for UserId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(defaults::USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty());

        match value {
            Some(user_id) => Ok(UserId(user_id.to_string())),
            None => Err(ApiError::Unauthorized(
                "Unauthorized - user id missing in X-User-Id header".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(request: Request<()>) -> Result<UserId, ApiError> {
        let (mut parts, _) = request.into_parts();
        UserId::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn extracts_user_id_from_header() {
        let request = Request::builder()
            .header("X-User-Id", "user-42")
            .body(())
            .unwrap();
        let user = extract(request).await.unwrap();
        assert_eq!(user.as_str(), "user-42");
    }

    #[tokio::test]
    async fn missing_header_is_unauthorized() {
        let request = Request::builder().body(()).unwrap();
        let err = extract(request).await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn blank_header_is_unauthorized() {
        let request = Request::builder()
            .header("X-User-Id", "   ")
            .body(())
            .unwrap();
        let err = extract(request).await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }
}

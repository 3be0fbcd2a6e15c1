use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    response::{IntoResponse, Response},
};

use crate::api::errors::ErrorResponse;
use crate::graph::Bearer;

/// The caller's graph API token. A missing header is anonymous; the token
/// itself is checked by the graph API, not here.
impl<S> FromRequestParts<S> for Bearer
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .map(|h| h.to_str().map(str::to_string));

        async move {
            let Some(auth_header) = auth_header else {
                return Ok(Bearer::anonymous());
            };
            let auth_header = auth_header.map_err(|_| AuthError::InvalidTokenFormat)?;

            let token = auth_header
                .strip_prefix("Bearer ")
                .map(str::trim)
                .filter(|token| !token.is_empty())
                .ok_or(AuthError::InvalidTokenFormat)?;

            Ok(Bearer::new(token))
        }
    }
}

#[derive(Debug)]
pub enum AuthError {
    InvalidTokenFormat,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::InvalidTokenFormat => (StatusCode::UNAUTHORIZED, "Invalid token format"),
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, http::Request, routing::get};
    use tower::ServiceExt;

    async fn echo_token(bearer: Bearer) -> String {
        bearer.token().unwrap_or("anonymous").to_string()
    }

    fn create_test_app() -> Router {
        Router::new().route("/whoami", get(echo_token))
    }

    async fn call(header: Option<&str>) -> (StatusCode, String) {
        let mut request = Request::builder().method("GET").uri("/whoami");
        if let Some(value) = header {
            request = request.header(AUTHORIZATION, value);
        }
        let response = create_test_app()
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_missing_header_is_anonymous() {
        assert_eq!(call(None).await, (StatusCode::OK, "anonymous".to_string()));
    }

    #[tokio::test]
    async fn test_bearer_token_forwarded() {
        assert_eq!(
            call(Some("Bearer abc.def.ghi")).await,
            (StatusCode::OK, "abc.def.ghi".to_string())
        );
    }

    #[tokio::test]
    async fn test_malformed_header_rejected() {
        let (status, _) = call(Some("Basic dXNlcjpwYXNz")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = call(Some("Bearer")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}

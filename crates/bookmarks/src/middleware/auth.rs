//! Caller identity extractor.
//!
//! Resolves the [`Caller`] of a request from its `Authorization` header:
//!
//! - no header: anonymous caller
//! - `Bearer <jwt>` with a valid token: the token's subject
//! - anything else: rejected with 401

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
};

use crate::error::AppError;
use crate::models::Caller;
use crate::state::AppState;

/// Extractor for the caller on whose behalf the request runs.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(CurrentCaller(caller): CurrentCaller) -> impl IntoResponse {
///     match caller.user_id() {
///         Some(id) => format!("Hello, {id}!"),
///         None => "Hello, guest!".to_string(),
///     }
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentCaller(pub Caller);

impl FromRequestParts<AppState> for CurrentCaller {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_token(&parts.headers)? else {
            return Ok(Self(Caller::Anonymous));
        };

        let user_id = state.verifier().verify(token).await.map_err(|e| {
            tracing::warn!(error = %e, "rejected bearer token");
            AppError::Unauthorized(e.to_string())
        })?;

        set_sentry_user(user_id.as_str());
        Ok(Self(Caller::user(user_id)))
    }
}

/// Extract the bearer token, if an `Authorization` header is present.
fn bearer_token(headers: &HeaderMap) -> Result<Option<&str>, AppError> {
    let Some(value) = headers.get(AUTHORIZATION) else {
        return Ok(None);
    };

    let value = value
        .to_str()
        .map_err(|_| AppError::Unauthorized("authorization header is not ASCII".to_string()))?;

    value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(Some)
        .ok_or_else(|| AppError::Unauthorized("expected a bearer token".to_string()))
}

/// Associate Sentry events of this request with the user.
fn set_sentry_user(user_id: &str) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            ..Default::default()
        }));
    });
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_missing_header_is_anonymous() {
        assert!(bearer_token(&HeaderMap::new()).unwrap().is_none());
    }

    #[test]
    fn test_bearer_token_extracted() {
        assert_eq!(bearer_token(&headers("Bearer abc.def")).unwrap(), Some("abc.def"));
        assert_eq!(bearer_token(&headers("bearer abc.def")).unwrap(), Some("abc.def"));
    }

    #[test]
    fn test_other_schemes_rejected() {
        assert!(matches!(
            bearer_token(&headers("Basic dXNlcjpwYXNz")),
            Err(AppError::Unauthorized(_))
        ));
        assert!(matches!(
            bearer_token(&headers("Bearer ")),
            Err(AppError::Unauthorized(_))
        ));
    }
}

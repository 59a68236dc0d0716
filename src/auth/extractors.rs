use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use tracing::warn;
use uuid::Uuid;

use super::jwt::JwtKeys;
use crate::error::AppError;

/// Identity of the caller, proven by a valid bearer token. Handlers pass it
/// down to every task operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(AppError::MissingToken)?
            .to_str()
            .map_err(|_| AppError::InvalidToken)?;

        // Expect "Bearer <token>"
        let token = header
            .strip_prefix("Bearer ")
            .or_else(|| header.strip_prefix("bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AppError::InvalidToken)?;

        let keys = JwtKeys::from_ref(state);
        let user_id = keys.verify(token).map_err(|e| {
            warn!(error = %e, "rejected bearer token");
            AppError::InvalidToken
        })?;

        Ok(AuthUser(user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::JwtConfig;
    use axum::http::Request;

    fn keys() -> JwtKeys {
        JwtKeys::new(&JwtConfig {
            secret: "extractor-secret".into(),
            issuer: "iss".into(),
            audience: "aud".into(),
            ttl_minutes: 5,
        })
    }

    async fn extract(header: Option<&str>) -> Result<AuthUser, AppError> {
        let mut builder = Request::builder().uri("/api/todos");
        if let Some(value) = header {
            builder = builder.header(AUTHORIZATION, value);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        AuthUser::from_request_parts(&mut parts, &keys()).await
    }

    #[tokio::test]
    async fn accepts_valid_bearer_token() {
        let user_id = Uuid::new_v4();
        let token = keys().issue(user_id).unwrap();
        let auth = extract(Some(&format!("Bearer {token}"))).await.unwrap();
        assert_eq!(auth, AuthUser(user_id));
    }

    #[tokio::test]
    async fn missing_header_is_missing_token() {
        assert!(matches!(extract(None).await, Err(AppError::MissingToken)));
    }

    #[tokio::test]
    async fn wrong_scheme_or_empty_token_is_invalid() {
        assert!(matches!(extract(Some("Basic abc")).await, Err(AppError::InvalidToken)));
        assert!(matches!(extract(Some("Bearer ")).await, Err(AppError::InvalidToken)));
    }

    #[tokio::test]
    async fn tampered_token_is_invalid() {
        let token = keys().issue(Uuid::new_v4()).unwrap();
        let tampered = format!("Bearer {token}x");
        assert!(matches!(extract(Some(&tampered)).await, Err(AppError::InvalidToken)));
    }
}

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;

use crate::{auth::jwt::JwtKeys, error::ApiError};

/// Auth gate for protected routes: validates the bearer token and hands the
/// embedded email claim to the handler. Checks run in a fixed order, so a
/// header without the `Bearer ` prefix is a format error even if the token
/// inside it is also expired.
#[derive(Debug)]
pub struct AuthUser(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(ApiError::AuthMissing)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(ApiError::AuthInvalidFormat)?;

        let keys = JwtKeys::from_ref(state);
        let claims = keys.verify(token).map_err(|e| {
            warn!("rejected bearer token: {e}");
            e
        })?;

        Ok(AuthUser(claims.email))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppState;
    use axum::http::Request;
    use jsonwebtoken::{encode, Header};
    use time::{Duration, OffsetDateTime};

    fn parts_with_auth(value: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/user/1");
        if let Some(v) = value {
            builder = builder.header(axum::http::header::AUTHORIZATION, v);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn missing_header_is_auth_missing() {
        let state = AppState::fake();
        let mut parts = parts_with_auth(None);
        let err = AuthUser::from_request_parts(&mut parts, &state)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::AuthMissing));
    }

    #[tokio::test]
    async fn missing_bearer_prefix_is_a_format_error() {
        let state = AppState::fake();
        let keys = JwtKeys::from_ref(&state);
        let token = keys.sign("a@b.com").unwrap();
        let mut parts = parts_with_auth(Some(&token));
        let err = AuthUser::from_request_parts(&mut parts, &state)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::AuthInvalidFormat));
    }

    #[tokio::test]
    async fn format_error_wins_over_expiry() {
        let state = AppState::fake();
        let keys = JwtKeys::from_ref(&state);
        let now = OffsetDateTime::now_utc();
        let claims = crate::auth::jwt::Claims {
            email: "a@b.com".into(),
            iat: (now - Duration::hours(11)).unix_timestamp() as usize,
            exp: (now - Duration::hours(1)).unix_timestamp() as usize,
        };
        let expired = encode(&Header::default(), &claims, &keys.encoding).unwrap();
        let mut parts = parts_with_auth(Some(&expired));
        let err = AuthUser::from_request_parts(&mut parts, &state)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::AuthInvalidFormat));
    }

    #[tokio::test]
    async fn expired_token_is_reported_as_expired() {
        let state = AppState::fake();
        let keys = JwtKeys::from_ref(&state);
        let now = OffsetDateTime::now_utc();
        let claims = crate::auth::jwt::Claims {
            email: "a@b.com".into(),
            iat: (now - Duration::hours(11)).unix_timestamp() as usize,
            exp: (now - Duration::hours(1)).unix_timestamp() as usize,
        };
        let expired = encode(&Header::default(), &claims, &keys.encoding).unwrap();
        let mut parts = parts_with_auth(Some(&format!("Bearer {expired}")));
        let err = AuthUser::from_request_parts(&mut parts, &state)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::AuthExpired));
    }

    #[tokio::test]
    async fn garbage_token_is_invalid() {
        let state = AppState::fake();
        let mut parts = parts_with_auth(Some("Bearer not.a.jwt"));
        let err = AuthUser::from_request_parts(&mut parts, &state)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::AuthInvalid));
    }

    #[tokio::test]
    async fn valid_token_yields_the_claim() {
        let state = AppState::fake();
        let keys = JwtKeys::from_ref(&state);
        let token = keys.sign("a@b.com").unwrap();
        let mut parts = parts_with_auth(Some(&format!("Bearer {token}")));
        let AuthUser(email) = AuthUser::from_request_parts(&mut parts, &state)
            .await
            .expect("valid token should pass the gate");
        assert_eq!(email, "a@b.com");
    }
}

//! Bearer token authentication.
//!
//! [`bearer_gate`] runs on every request and tags it with an
//! [`Authentication`] flag:
//!
//! | `Authorization` header | Outcome |
//! |------------------------|---------|
//! | absent | guest, request continues |
//! | malformed | 401 |
//! | `Bearer <token>`, token unknown or expired | 401 |
//! | `Bearer <token>`, token live | authenticated, request continues |
//!
//! [`require_authenticated`] then guards individual routes.

use std::convert::Infallible;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::ApiError;
use crate::state::AuthState;

/// Per-request authentication flag set by [`bearer_gate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Authentication {
    /// No credentials were presented.
    Guest,
    /// A live API key was presented.
    Authenticated,
}

impl Authentication {
    /// Returns `true` for [`Authentication::Authenticated`].
    #[must_use]
    pub const fn is_authenticated(self) -> bool {
        matches!(self, Self::Authenticated)
    }
}

/// Axum extractor for the authentication flag.
///
/// Requests that did not pass through [`bearer_gate`] count as guests.
///
/// ```ignore
/// async fn handler(auth: Authentication) -> impl IntoResponse {
///     if auth.is_authenticated() { /* ... */ }
/// }
/// ```
impl<S> FromRequestParts<S> for Authentication
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<Self>()
            .copied()
            .unwrap_or(Self::Guest))
    }
}

/// Middleware that checks bearer tokens against the key cache.
pub async fn bearer_gate(
    State(state): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Response {
    let flag = match request.headers().get(AUTHORIZATION) {
        None => Authentication::Guest,
        Some(value) => {
            let Some(token) = extract_bearer_token(value) else {
                tracing::debug!("malformed Authorization header");
                return ApiError::Unauthorized.into_response();
            };
            if !state.cache().contains(token) {
                tracing::debug!("unknown or expired API key");
                return ApiError::Unauthorized.into_response();
            }
            Authentication::Authenticated
        }
    };

    request.extensions_mut().insert(flag);
    next.run(request).await
}

/// Splits `scheme SP token` on the first space.
///
/// The scheme must be `Bearer` in any case; the token must be non-empty
/// and contain no further whitespace.
fn extract_bearer_token(value: &HeaderValue) -> Option<&str> {
    let (scheme, token) = value.to_str().ok()?.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("Bearer")
        || token.is_empty()
        || token.contains(char::is_whitespace)
    {
        return None;
    }
    Some(token)
}

/// Route guard that rejects anything but authenticated requests.
///
/// ```ignore
/// let router = Router::new()
///     .route("/pages", post(create_page))
///     .route_layer(middleware::from_fn(require_authenticated));
/// ```
pub async fn require_authenticated(request: Request, next: Next) -> Response {
    match request.extensions().get::<Authentication>() {
        Some(Authentication::Authenticated) => next.run(request).await,
        _ => ApiError::Unauthorized.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use axum::{body::Body, http::StatusCode, middleware, routing::get, Router};
    use folio_auth::{KeyIssuer, OtpLogin, SecretStore, TotpConfig};
    use folio_cache::InMemoryKeyCache;
    use folio_storage::InMemorySecretProvider;
    use tower::ServiceExt;

    fn state() -> AuthState {
        let store = SecretStore::new(
            Arc::new(InMemorySecretProvider::with_secret("MZXW6YTB")),
            "folio",
            TotpConfig::default(),
        );
        let cache = Arc::new(InMemoryKeyCache::new(Duration::from_secs(3600)));
        AuthState::new(OtpLogin::new(store, KeyIssuer::new(cache, 8)))
    }

    fn app(state: AuthState) -> Router {
        let protected = Router::new()
            .route("/protected", get(|| async { "secret" }))
            .route_layer(middleware::from_fn(require_authenticated));

        Router::new()
            .route(
                "/whoami",
                get(|auth: Authentication| async move { format!("{auth:?}") }),
            )
            .merge(protected)
            .layer(middleware::from_fn_with_state(state, bearer_gate))
    }

    async fn call(app: Router, uri: &str, authorization: Option<&str>) -> (StatusCode, String) {
        let mut request = axum::http::Request::builder().uri(uri);
        if let Some(value) = authorization {
            request = request.header(AUTHORIZATION, value);
        }
        let response = app
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
    async fn no_header_is_guest() {
        let (status, body) = call(app(state()), "/whoami", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "Guest");
    }

    #[tokio::test]
    async fn unknown_token_is_rejected() {
        let (status, _) = call(app(state()), "/whoami", Some("Bearer bogus")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn issued_token_is_authenticated() {
        let state = state();
        let key = state.login.issuer().issue_key().unwrap();

        let (status, body) = call(app(state), "/whoami", Some(&format!("Bearer {key}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "Authenticated");
    }

    #[tokio::test]
    async fn scheme_is_case_insensitive() {
        let state = state();
        let key = state.login.issuer().issue_key().unwrap();

        let (status, _) = call(app(state), "/whoami", Some(&format!("bearer {key}"))).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn malformed_headers_are_rejected() {
        let state = state();
        let key = state.login.issuer().issue_key().unwrap();

        for header in [
            key.clone(),
            "Bearer".to_string(),
            "Bearer ".to_string(),
            format!("Basic {key}"),
            format!("Bearer {key} extra"),
            format!("Bearer  {key}"),
        ] {
            let (status, _) = call(app(state.clone()), "/whoami", Some(&header)).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{header:?}");
        }
    }

    #[tokio::test]
    async fn expired_token_is_rejected() {
        let store = SecretStore::new(
            Arc::new(InMemorySecretProvider::new()),
            "folio",
            TotpConfig::default(),
        );
        let cache = Arc::new(InMemoryKeyCache::new(Duration::from_millis(5)));
        let state = AuthState::new(OtpLogin::new(store, KeyIssuer::new(cache, 8)));
        let key = state.login.issuer().issue_key().unwrap();

        tokio::time::sleep(Duration::from_millis(20)).await;
        let (status, _) = call(app(state), "/whoami", Some(&format!("Bearer {key}"))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn guard_rejects_guests() {
        let (status, _) = call(app(state()), "/protected", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn guard_admits_authenticated() {
        let state = state();
        let key = state.login.issuer().issue_key().unwrap();

        let (status, body) = call(app(state), "/protected", Some(&format!("Bearer {key}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "secret");
    }

    #[tokio::test]
    async fn guard_without_gate_rejects() {
        let app = Router::new()
            .route("/protected", get(|| async { "secret" }))
            .route_layer(middleware::from_fn(require_authenticated));

        let (status, _) = call(app, "/protected", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}

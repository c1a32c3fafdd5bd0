//! # Authentication & Authorization Middleware
//!
//! Bearer token middleware with store-scoped access control.
//!
//! ## Token Format
//!
//! ```text
//! Bearer {role}:{store_id}:{secret}   — scoped format
//! Bearer {secret}                      — legacy format (treated as platform_admin)
//! ```
//!
//! Every authenticated request gets a [`CallerIdentity`] injected into the
//! request extensions. Handlers extract it via the `FromRequestParts` impl
//! and check store access with [`require_store_access`].
//!
//! When no token is configured, all requests are allowed with
//! `platform_admin` identity (auth disabled / development mode).

use axum::extract::{FromRequestParts, Request};
use axum::http::request::Parts;
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use levy_core::StoreId;
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{AppError, ErrorBody, ErrorDetail};

// ── Role ────────────────────────────────────────────────────────────────────

/// Roles on the tax surface, ordered by privilege level.
///
/// The `Ord` derivation respects variant declaration order:
/// `StoreOperator < PlatformAdmin`. This enables `>=` comparison for
/// role checks.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Can read and write the resources of the store bound to the token.
    StoreOperator,
    /// Full access to all stores and to platform default administration.
    PlatformAdmin,
}

impl Role {
    /// Return the string representation of this role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StoreOperator => "store_operator",
            Self::PlatformAdmin => "platform_admin",
        }
    }
}

// ── CallerIdentity ──────────────────────────────────────────────────────────

/// Identity of the authenticated caller, extracted from the auth context
/// and available to all route handlers via Axum's `FromRequestParts`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    /// The caller's role.
    pub role: Role,
    /// The store bound to the token (for store_operator role).
    /// `None` for platform_admin (operates across stores).
    pub store_id: Option<StoreId>,
}

impl CallerIdentity {
    /// Check if the caller has at least the given minimum role.
    pub fn has_role(&self, minimum: Role) -> bool {
        self.role >= minimum
    }

    /// Check if the caller can act on the given store's resources.
    ///
    /// - `PlatformAdmin` can act on any store.
    /// - `StoreOperator` can act only on the store bound to its token.
    pub fn can_access_store(&self, store_id: StoreId) -> bool {
        match self.role {
            Role::PlatformAdmin => true,
            Role::StoreOperator => self.store_id == Some(store_id),
        }
    }
}

impl<S: Send + Sync> FromRequestParts<S> for CallerIdentity {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CallerIdentity>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("no caller identity in request context".into()))
    }
}

/// Check that the caller has at least the required role.
/// Returns 403 Forbidden if the caller's role is insufficient.
pub fn require_role(caller: &CallerIdentity, minimum: Role) -> Result<(), AppError> {
    if caller.has_role(minimum) {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "role '{}' required, caller has '{}'",
            minimum.as_str(),
            caller.role.as_str()
        )))
    }
}

/// Check that the caller can act on the given store.
/// Returns 403 Forbidden for a store operator bound to a different store.
pub fn require_store_access(caller: &CallerIdentity, store_id: StoreId) -> Result<(), AppError> {
    if caller.can_access_store(store_id) {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "caller is not authorized for store {store_id}"
        )))
    }
}

// ── Auth Configuration ──────────────────────────────────────────────────────

/// Auth configuration injected into request extensions.
///
/// Custom `Debug` redacts the token value to prevent credential leakage
/// in logs.
#[derive(Clone)]
pub struct AuthConfig {
    /// The expected bearer secret; `None` disables authentication.
    pub token: Option<String>,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

// ── Token Validation ────────────────────────────────────────────────────────

/// Constant-time comparison of bearer tokens.
///
/// Prevents timing side-channels that could reveal token length or prefix.
/// When lengths differ, performs a dummy comparison to avoid leaking length
/// information through timing variance.
fn constant_time_token_eq(provided: &str, expected: &str) -> bool {
    let provided = provided.as_bytes();
    let expected = expected.as_bytes();
    if provided.len() != expected.len() {
        let _ = expected.ct_eq(expected);
        return false;
    }
    provided.ct_eq(expected).into()
}

/// Parse the bearer token in format `{role}:{store_id}:{secret}` or
/// `{secret}` (legacy).
///
/// Legacy tokens (without role prefix) are treated as `platform_admin` for
/// backward compatibility with existing deployments.
pub fn parse_bearer_token(provided: &str, expected_secret: &str) -> Result<CallerIdentity, String> {
    let parts: Vec<&str> = provided.splitn(3, ':').collect();

    match parts.len() {
        // Legacy format: just the secret.
        1 => {
            if constant_time_token_eq(provided, expected_secret) {
                Ok(CallerIdentity {
                    role: Role::PlatformAdmin,
                    store_id: None,
                })
            } else {
                Err("invalid bearer token".into())
            }
        }
        // Scoped format: role:store_id:secret (store_id may be empty).
        3 => {
            let role_str = parts[0];
            let store_str = parts[1];
            let secret = parts[2];

            if !constant_time_token_eq(secret, expected_secret) {
                return Err("invalid bearer token".into());
            }

            let role = match role_str {
                "platform_admin" => Role::PlatformAdmin,
                "store_operator" => Role::StoreOperator,
                other => return Err(format!("unknown role: {other}")),
            };

            let store_id = if store_str.is_empty() {
                None
            } else {
                Some(StoreId::from(
                    store_str
                        .parse::<Uuid>()
                        .map_err(|e| format!("invalid store_id: {e}"))?,
                ))
            };

            if role == Role::StoreOperator && store_id.is_none() {
                return Err("store_operator tokens must bind a store_id".into());
            }

            Ok(CallerIdentity { role, store_id })
        }
        _ => Err("invalid token format — expected {role}:{store_id}:{secret} or {secret}".into()),
    }
}

// ── Middleware ───────────────────────────────────────────────────────────────

/// Extract and validate the Bearer token from the Authorization header.
///
/// Parses the token to extract [`CallerIdentity`] (role + store binding)
/// and injects it into request extensions for downstream handlers.
pub async fn auth_middleware(mut request: Request, next: Next) -> Response {
    let expected_token = request.extensions().get::<AuthConfig>().cloned();

    match expected_token {
        Some(AuthConfig {
            token: Some(ref expected),
        }) => {
            let auth_header = request
                .headers()
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok());

            match auth_header {
                Some(header_value) if header_value.starts_with("Bearer ") => {
                    let provided = &header_value[7..];
                    match parse_bearer_token(provided, expected) {
                        Ok(identity) => {
                            request.extensions_mut().insert(identity);
                            next.run(request).await
                        }
                        Err(msg) => {
                            tracing::warn!(reason = %msg, "authentication failed: invalid bearer token");
                            unauthorized_response(&msg)
                        }
                    }
                }
                Some(_) => {
                    tracing::warn!("authentication failed: non-Bearer authorization scheme");
                    unauthorized_response("authorization header must use Bearer scheme")
                }
                None => {
                    tracing::warn!("authentication failed: missing authorization header");
                    unauthorized_response("missing authorization header")
                }
            }
        }
        _ => {
            // Auth disabled — inject platform_admin identity for full access.
            request.extensions_mut().insert(CallerIdentity {
                role: Role::PlatformAdmin,
                store_id: None,
            });
            next.run(request).await
        }
    }
}

fn unauthorized_response(message: &str) -> Response {
    let body = ErrorBody {
        error: ErrorDetail {
            code: "UNAUTHORIZED".to_string(),
            message: message.to_string(),
        },
    };
    (StatusCode::UNAUTHORIZED, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use axum::middleware::from_fn;
    use axum::routing::get;
    use axum::Router;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    /// Build a minimal router with the auth middleware and a simple handler.
    fn test_app(token: Option<String>) -> Router {
        let auth_config = AuthConfig { token };
        Router::new()
            .route("/test", get(|| async { "ok" }))
            .layer(from_fn(auth_middleware))
            .layer(axum::Extension(auth_config))
    }

    #[tokio::test]
    async fn valid_bearer_token_accepted() {
        let app = test_app(Some("my-secret".to_string()));

        let request = Request::builder()
            .uri("/test")
            .header("Authorization", "Bearer my-secret")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"ok");
    }

    #[tokio::test]
    async fn missing_header_rejected() {
        let app = test_app(Some("my-secret".to_string()));

        let request = Request::builder().uri("/test").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn wrong_secret_rejected() {
        let app = test_app(Some("my-secret".to_string()));

        let request = Request::builder()
            .uri("/test")
            .header("Authorization", "Bearer other-secret")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn non_bearer_scheme_rejected() {
        let app = test_app(Some("my-secret".to_string()));

        let request = Request::builder()
            .uri("/test")
            .header("Authorization", "Basic dXNlcjpwYXNz")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn auth_disabled_allows_all() {
        let app = test_app(None);

        let request = Request::builder().uri("/test").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn parse_legacy_token_is_admin() {
        let identity = parse_bearer_token("my-secret", "my-secret").unwrap();
        assert_eq!(identity.role, Role::PlatformAdmin);
        assert!(identity.store_id.is_none());
    }

    #[test]
    fn parse_scoped_operator_token() {
        let store = Uuid::new_v4();
        let token = format!("store_operator:{store}:my-secret");
        let identity = parse_bearer_token(&token, "my-secret").unwrap();
        assert_eq!(identity.role, Role::StoreOperator);
        assert_eq!(identity.store_id, Some(StoreId::from(store)));
    }

    #[test]
    fn parse_admin_token_without_store() {
        let identity = parse_bearer_token("platform_admin::my-secret", "my-secret").unwrap();
        assert_eq!(identity.role, Role::PlatformAdmin);
        assert!(identity.store_id.is_none());
    }

    #[test]
    fn operator_token_requires_store_binding() {
        assert!(parse_bearer_token("store_operator::my-secret", "my-secret").is_err());
    }

    #[test]
    fn parse_rejects_unknown_role() {
        assert!(parse_bearer_token("superuser::my-secret", "my-secret").is_err());
    }

    #[test]
    fn parse_rejects_bad_store_id() {
        assert!(parse_bearer_token("store_operator:not-a-uuid:my-secret", "my-secret").is_err());
    }

    #[test]
    fn parse_rejects_wrong_secret_in_scoped_token() {
        let store = Uuid::new_v4();
        let token = format!("store_operator:{store}:wrong");
        assert!(parse_bearer_token(&token, "my-secret").is_err());
    }

    #[test]
    fn store_access_rules() {
        let store_a = StoreId::new();
        let store_b = StoreId::new();

        let admin = CallerIdentity {
            role: Role::PlatformAdmin,
            store_id: None,
        };
        assert!(admin.can_access_store(store_a));
        assert!(require_store_access(&admin, store_b).is_ok());

        let operator = CallerIdentity {
            role: Role::StoreOperator,
            store_id: Some(store_a),
        };
        assert!(operator.can_access_store(store_a));
        assert!(!operator.can_access_store(store_b));
        assert!(require_store_access(&operator, store_b).is_err());
    }

    #[test]
    fn role_ordering_for_require_role() {
        let operator = CallerIdentity {
            role: Role::StoreOperator,
            store_id: Some(StoreId::new()),
        };
        assert!(require_role(&operator, Role::StoreOperator).is_ok());
        assert!(require_role(&operator, Role::PlatformAdmin).is_err());
    }

    #[test]
    fn auth_config_debug_redacts_token() {
        let config = AuthConfig {
            token: Some("sensitive".into()),
        };
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("sensitive"));
        assert!(rendered.contains("REDACTED"));
    }
}

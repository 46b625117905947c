//! Authentication module for the CareDashboard API
//!
//! Provides JWT session resolution, authentication middleware for API routes,
//! a non-rejecting session middleware for pages, and role-based authorization.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Request, StatusCode},
    middleware::Next,
    response::Response,
    Extension,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Instant;
use tracing::{debug, warn};

use crate::auth::logging::{log_auth_event, AuthEvent, AuthEventType};

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

// JWT handling
pub mod token;

// Role-based access control
pub mod authorize;

// Audit logging
pub mod logging;

/// Cookie consulted when no Authorization header is present
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// Role metadata attached by the identity provider (Supabase `app_metadata`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct AppMetadata {
    /// Application role
    #[serde(default)]
    pub role: Option<String>,
}

/// Profile metadata attached by the identity provider (Supabase `user_metadata`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct UserMetadata {
    /// Display name
    #[serde(default)]
    pub full_name: Option<String>,
}

/// Authentication claims for JSON Web Tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Issuer
    pub iss: String,
    /// Issued at (as timestamp)
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
    /// Email address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Roles granted by this service
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,
    /// Provider-managed metadata carrying the application role
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_metadata: Option<AppMetadata>,
    /// Provider-managed profile metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_metadata: Option<UserMetadata>,
}

impl Claims {
    /// All roles carried by the token, lower-cased and deduplicated
    pub fn roles(&self) -> Vec<String> {
        let provider_role = self.app_metadata
            .as_ref()
            .and_then(|meta| meta.role.as_ref());

        let mut roles: Vec<String> = Vec::new();
        for role in self.roles.iter().chain(provider_role) {
            let role = role.trim().to_lowercase();
            if !role.is_empty() && !roles.contains(&role) {
                roles.push(role);
            }
        }
        roles
    }
}

/// User information extracted from authenticated requests
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct UserInfo {
    /// User ID
    pub user_id: String,
    /// User roles (lower-case)
    pub roles: Vec<String>,
    /// Email (if available)
    pub email: Option<String>,
    /// Display name (if available)
    pub name: Option<String>,
    /// Authentication source ("jwt", "cookie", "bypass")
    pub auth_source: String,
}

impl UserInfo {
    /// Build user info from validated claims
    pub fn from_claims(claims: &Claims, auth_source: &str) -> Self {
        Self {
            user_id: claims.sub.clone(),
            roles: claims.roles(),
            email: claims.email.clone(),
            name: claims.user_metadata.as_ref().and_then(|meta| meta.full_name.clone()),
            auth_source: auth_source.to_string(),
        }
    }

    /// Whether the user holds a role (case-insensitive)
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r.eq_ignore_ascii_case(role))
    }

    /// Whether the user holds any of the roles
    pub fn has_any_role<S: AsRef<str>>(&self, roles: &[S]) -> bool {
        roles.iter().any(|role| self.has_role(role.as_ref()))
    }

    /// Name to greet the user with
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or(&self.user_id)
    }

    fn development_bypass() -> Self {
        Self {
            user_id: "dev-user".to_string(),
            roles: vec!["admin".to_string()],
            email: None,
            name: Some("Development User".to_string()),
            auth_source: "bypass".to_string(),
        }
    }
}

/// Where a request's token came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    /// `Authorization: Bearer` header
    Header,
    /// `access_token` cookie
    Cookie,
}

impl TokenSource {
    fn as_str(&self) -> &'static str {
        match self {
            TokenSource::Header => "jwt",
            TokenSource::Cookie => "cookie",
        }
    }
}

/// Extract the access token from the Authorization header or the session cookie
///
/// A present but malformed Authorization header is an error; it does not fall
/// through to the cookie.
pub fn extract_token(headers: &HeaderMap) -> Result<(String, TokenSource), &'static str> {
    if let Some(value) = headers.get(header::AUTHORIZATION) {
        let auth_str = value
            .to_str()
            .map_err(|_| "Invalid Authorization header format")?;

        return match auth_str.strip_prefix("Bearer ") {
            Some(token) if !token.trim().is_empty() => Ok((token.trim().to_string(), TokenSource::Header)),
            _ => Err("Authorization header does not contain Bearer token"),
        };
    }

    for value in headers.get_all(header::COOKIE) {
        let Ok(cookies) = value.to_str() else {
            continue;
        };
        for pair in cookies.split(';') {
            if let Some((name, token)) = pair.trim().split_once('=') {
                if name == ACCESS_TOKEN_COOKIE && !token.is_empty() {
                    return Ok((token.to_string(), TokenSource::Cookie));
                }
            }
        }
    }

    Err("Missing Authorization header")
}

fn auth_bypassed() -> bool {
    cfg!(debug_assertions) && env::var("BYPASS_AUTH").is_ok()
}

/// Resolve the session for a request, logging the outcome
fn resolve_session(req: &Request<Body>) -> Result<(Claims, TokenSource), String> {
    let request_path = req.uri().path().to_string();
    let start_time = Instant::now();

    let mut event = match extract_token(req.headers()) {
        Ok((token, source)) => match token::validate_token(&token) {
            Ok(claims) => {
                debug!("Token validated for user: {}", claims.sub);

                let event = AuthEvent::new(AuthEventType::TokenValidation, Some(&claims.sub), true)
                    .with_details("JWT validation successful")
                    .with_resource(request_path)
                    .with_duration(start_time.elapsed().as_millis() as u64)
                    .with_auth_method(source.as_str());
                log_auth_event(event);

                return Ok((claims, source));
            },
            Err(e) => {
                warn!("Token validation failed: {}", e);
                AuthEvent::new(AuthEventType::TokenValidation, None, false)
                    .with_details(e.to_string())
                    .with_auth_method(source.as_str())
            }
        },
        Err(reason) => {
            debug!("{}", reason);
            AuthEvent::new(AuthEventType::TokenValidation, None, false)
                .with_details(reason)
                .with_auth_method("jwt")
        }
    };

    if let Some(user_agent) = req.headers().get(header::USER_AGENT).and_then(|v| v.to_str().ok()) {
        event = event.with_user_agent(user_agent);
    }

    let reason = event.details.clone().unwrap_or_default();
    log_auth_event(
        event
            .with_resource(request_path)
            .with_duration(start_time.elapsed().as_millis() as u64),
    );

    Err(reason)
}

/// Authentication middleware for protected API routes
///
/// Rejects requests without a valid token with `401 Unauthorized`; on success
/// the request carries `UserInfo` and `Claims` extensions.
pub async fn auth_middleware<S>(
    _state: State<S>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if auth_bypassed() {
        debug!("Auth bypass enabled in development mode");
        req.extensions_mut().insert(UserInfo::development_bypass());
        return next.run(req).await;
    }

    match resolve_session(&req) {
        Ok((claims, source)) => {
            req.extensions_mut().insert(UserInfo::from_claims(&claims, source.as_str()));
            req.extensions_mut().insert(claims);
            next.run(req).await
        },
        Err(_) => Response::builder()
            .status(StatusCode::UNAUTHORIZED)
            .header(header::WWW_AUTHENTICATE, "Bearer")
            .body(Body::empty())
            .unwrap_or_default(),
    }
}

/// Session middleware for pages
///
/// Attaches `UserInfo` when the request carries a valid token and always
/// continues; the page's route guard decides what to render.
pub async fn session_middleware<S>(
    _state: State<S>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if auth_bypassed() {
        req.extensions_mut().insert(UserInfo::development_bypass());
        return next.run(req).await;
    }

    if let Ok((claims, source)) = resolve_session(&req) {
        req.extensions_mut().insert(UserInfo::from_claims(&claims, source.as_str()));
        req.extensions_mut().insert(claims);
    }

    next.run(req).await
}

/// Configure CORS and security headers for the application
pub fn configure_auth(app: axum::Router) -> axum::Router {
    use axum::http::{HeaderName, HeaderValue, Method};
    use tower_http::cors::{Any, CorsLayer};
    use tower_http::set_header::SetResponseHeaderLayer;

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .max_age(std::time::Duration::from_secs(3600));

    let security_headers = tower::ServiceBuilder::new()
        .layer(SetResponseHeaderLayer::if_not_present(
            header::STRICT_TRANSPORT_SECURITY,
            HeaderValue::from_static("max-age=63072000; includeSubDomains; preload")
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff")
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY")
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::CONTENT_SECURITY_POLICY,
            HeaderValue::from_static(
                "default-src 'self'; script-src 'self'; connect-src 'self'; img-src 'self' data:; style-src 'self' 'unsafe-inline'; frame-ancestors 'none'; form-action 'self'; base-uri 'self'"
            )
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            HeaderName::from_static("referrer-policy"),
            HeaderValue::from_static("strict-origin-when-cross-origin")
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            HeaderName::from_static("permissions-policy"),
            HeaderValue::from_static("camera=(), microphone=(), geolocation=()")
        ));

    app.layer(cors).layer(security_headers)
}

/// Auth info endpoint
#[cfg_attr(feature = "with-api", utoipa::path(
    get,
    path = "/auth/info",
    responses(
        (status = 200, description = "Authenticated user", body = UserInfo),
        (status = 401, description = "Not authenticated")
    ),
    tag = "Authentication",
    security(
        ("bearer" = [])
    )
))]
pub async fn auth_info(
    Extension(user_info): Extension<UserInfo>
) -> axum::Json<UserInfo> {
    axum::Json(user_info)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{middleware, routing::get, Router};
    use axum::http::HeaderValue;
    use tower::ServiceExt;

    fn headers_with(name: header::HeaderName, value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(name, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_extract_token_from_header() {
        let headers = headers_with(header::AUTHORIZATION, "Bearer abc.def.ghi");
        assert_eq!(extract_token(&headers).unwrap(), ("abc.def.ghi".to_string(), TokenSource::Header));
    }

    #[test]
    fn test_extract_token_from_cookie() {
        let headers = headers_with(header::COOKIE, "theme=dark; access_token=abc.def.ghi");
        assert_eq!(extract_token(&headers).unwrap(), ("abc.def.ghi".to_string(), TokenSource::Cookie));
    }

    #[test]
    fn test_extract_token_rejects_non_bearer_header() {
        let mut headers = headers_with(header::AUTHORIZATION, "Basic dXNlcjpwYXNz");
        headers.insert(header::COOKIE, HeaderValue::from_static("access_token=abc"));
        assert!(extract_token(&headers).is_err());
        assert_eq!(extract_token(&HeaderMap::new()), Err("Missing Authorization header"));
    }

    #[test]
    fn test_claims_roles_merge_and_dedupe() {
        let claims = Claims {
            sub: "u".to_string(),
            iss: "i".to_string(),
            iat: 0,
            exp: 0,
            email: None,
            roles: vec!["Doctor".to_string(), "doctor".to_string()],
            app_metadata: Some(AppMetadata { role: Some("admin".to_string()) }),
            user_metadata: Some(UserMetadata { full_name: Some("Dr. Ann".to_string()) }),
        };

        assert_eq!(claims.roles(), vec!["doctor".to_string(), "admin".to_string()]);

        let info = UserInfo::from_claims(&claims, "jwt");
        assert!(info.has_role("ADMIN"));
        assert!(info.has_any_role(&["patient", "doctor"]));
        assert!(!info.has_role("vhv"));
        assert_eq!(info.display_name(), "Dr. Ann");
    }

    fn protected_app() -> Router {
        Router::new()
            .route("/auth/info", get(auth_info))
            .layer(middleware::from_fn_with_state((), auth_middleware::<()>))
    }

    #[tokio::test]
    async fn test_auth_middleware_rejects_missing_token() {
        token::tests::setup_test_env();

        let response = protected_app()
            .oneshot(Request::builder().uri("/auth/info").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_auth_middleware_attaches_user_info() {
        token::tests::setup_test_env();
        let token = token::generate_access_token("doc-1", &["doctor".to_string()], None).unwrap();

        let response = protected_app()
            .oneshot(
                Request::builder()
                    .uri("/auth/info")
                    .header(header::AUTHORIZATION, format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let info: UserInfo = serde_json::from_slice(&body).unwrap();
        assert_eq!(info.user_id, "doc-1");
        assert_eq!(info.roles, vec!["doctor".to_string()]);
        assert_eq!(info.auth_source, "jwt");
    }

    #[tokio::test]
    async fn test_session_middleware_never_rejects() {
        token::tests::setup_test_env();

        async fn whoami(user: Option<Extension<UserInfo>>) -> String {
            user.map(|Extension(u)| u.user_id).unwrap_or_else(|| "anonymous".to_string())
        }

        let app = Router::new()
            .route("/page", get(whoami))
            .layer(middleware::from_fn_with_state((), session_middleware::<()>));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/page")
                    .header(header::COOKIE, "access_token=garbage")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"anonymous");
    }
}

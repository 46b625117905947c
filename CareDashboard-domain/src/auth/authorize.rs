use axum::{
    extract::State,
    middleware::Next,
    response::{Response, IntoResponse},
    body::Body,
    http::{Request, StatusCode},
    Json,
};
use tracing::{debug, warn};
use serde_json::json;
use futures::future::BoxFuture;

use crate::auth::UserInfo;
use crate::auth::logging::{log_auth_event, AuthEvent, AuthEventType, log_access_denied};

/// Middleware for role-based access control
///
/// Runs after `auth_middleware`. Users holding none of the required roles get
/// `403 Forbidden`; a request without an auth context gets `500`.
pub async fn require_roles<S, I>(
    _state: State<S>,
    req: Request<Body>,
    next: Next,
    required_roles: I,
) -> Response
where
    I: IntoIterator<Item = String>,
{
    let required_roles: Vec<String> = required_roles.into_iter().collect();
    let request_path = req.uri().path().to_string();

    let user_info = req.extensions().get::<UserInfo>().cloned();

    match user_info {
        Some(user) if user.has_any_role(&required_roles) => {
            debug!("User {} has required role for resource access: {}", user.user_id, request_path);

            let event = AuthEvent::new(AuthEventType::AccessGranted, Some(&user.user_id), true)
                .with_details(format!("User authorized to access: {}", request_path))
                .with_resource(request_path)
                .with_auth_method("rbac");
            log_auth_event(event);

            next.run(req).await
        },
        Some(user) => {
            warn!("User {} lacks required roles: {:?} for resource: {}",
                  user.user_id, required_roles, request_path);

            log_access_denied(&user.user_id, &request_path, &required_roles);

            (
                StatusCode::FORBIDDEN,
                Json(json!({
                    "error": "forbidden",
                    "message": "You don't have the required permissions to access this resource",
                    "required_roles": required_roles
                }))
            ).into_response()
        },
        None => {
            // auth_middleware must be layered outside this one
            warn!("No user info found in request extensions for path: {}", request_path);

            let event = AuthEvent::new(AuthEventType::AccessDenied, None, false)
                .with_details("Authentication context missing in request extensions")
                .with_resource(request_path)
                .with_auth_method("rbac");
            log_auth_event(event);

            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "Authentication context missing"
                }))
            ).into_response()
        }
    }
}

/// Middleware factory that requires a specific role for access
///
/// # Example
/// ```ignore
/// let admin_routes = Router::new()
///    .route("/api/admin/users", get(get_users))
///    .layer(middleware::from_fn_with_state(state.clone(), require_role("admin")));
/// ```
pub fn require_role<S: Clone + Send + Sync + 'static>(role: &str) -> impl Fn(State<S>, Request<Body>, Next) -> BoxFuture<'static, Response> + Clone + Send + 'static {
    let role = role.to_string();
    move |state, req, next| {
        let role_vec = vec![role.clone()];
        Box::pin(async move {
            require_roles(state, req, next, role_vec).await
        })
    }
}

/// Middleware factory that requires any of the specified roles for access
pub fn require_any_role<S: Clone + Send + Sync + 'static>(roles: &[&str]) -> impl Fn(State<S>, Request<Body>, Next) -> BoxFuture<'static, Response> + Clone + Send + 'static {
    let roles: Vec<String> = roles.iter().map(|r| r.to_string()).collect();
    move |state, req, next| {
        let roles = roles.clone();
        Box::pin(async move {
            require_roles(state, req, next, roles).await
        })
    }
}
